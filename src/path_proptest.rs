//! Property-based tests for path handling.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{join_remote_path, RelativePath};
    use proptest::prelude::*;
    use std::path::Component;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.-]{1,12}".prop_filter("dot segments are not names", |s| s != "." && s != "..")
    }

    // ============================================================================
    // RelativePath property tests
    // ============================================================================

    proptest! {
        /// Property: a path built from valid segments parses and renders back unchanged
        #[test]
        fn parse_then_display_is_identity(segments in prop::collection::vec(segment(), 1..6)) {
            let raw = segments.join("/");
            let path = RelativePath::parse(&raw).unwrap();
            prop_assert_eq!(path.to_string(), raw);
            prop_assert_eq!(path.depth(), segments.len());
        }

        /// Property: a parsed path never yields a native path that leaves its root
        #[test]
        fn native_path_stays_below_root(input in "[a-z./]{0,24}") {
            if let Ok(path) = RelativePath::parse(&input) {
                for component in path.to_path_buf().components() {
                    prop_assert!(
                        matches!(component, Component::Normal(_)),
                        "'{}' produced component {:?}",
                        input,
                        component
                    );
                }
            }
        }

        /// Property: any '..' segment is rejected wherever it appears
        #[test]
        fn parent_segment_is_always_rejected(
            before in prop::collection::vec(segment(), 0..3),
            after in prop::collection::vec(segment(), 0..3),
        ) {
            let mut segments = before;
            segments.push("..".to_string());
            segments.extend(after);
            prop_assert!(RelativePath::parse(&segments.join("/")).is_err());
        }

        /// Property: a leading separator is always rejected
        #[test]
        fn absolute_input_is_rejected(rest in "[a-z/]{0,16}") {
            let raw = format!("/{}", rest);
            prop_assert!(RelativePath::parse(&raw).is_err());
        }
    }

    // ============================================================================
    // join_remote_path property tests
    // ============================================================================

    proptest! {
        /// Property: joined remote paths never start with a separator
        #[test]
        fn joined_path_never_starts_with_separator(dir in "[a-z/]{0,12}", name in segment()) {
            let joined = join_remote_path(&dir, &name);
            prop_assert!(!joined.starts_with('/'));
            prop_assert!(joined.ends_with(&name));
        }

        /// Property: joining onto the root yields the bare name
        #[test]
        fn joining_onto_root_yields_name(name in segment()) {
            prop_assert_eq!(join_remote_path("", &name), name);
        }

        /// Property: a trailing separator on the directory never doubles up
        #[test]
        fn trailing_separators_never_double(
            segments in prop::collection::vec(segment(), 1..4),
            trailing in 0usize..3,
            name in segment(),
        ) {
            let dir = format!("{}{}", segments.join("/"), "/".repeat(trailing));
            let joined = join_remote_path(&dir, &name);
            prop_assert!(!joined.contains("//"), "'{}' + '{}' gave '{}'", dir, name, joined);
            prop_assert_eq!(joined, format!("{}/{}", segments.join("/"), name));
        }
    }
}
