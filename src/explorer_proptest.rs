//! Property-based tests for tree exploration.
//!
//! Random directory trees, including empty directories and directories that
//! only hold directories, are loaded into a `MemoryProvider` and walked.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crate::explorer::TreeExplorer;
    use crate::path::join_remote_path;
    use crate::pool::WorkerPool;
    use crate::provider::{MemoryProvider, RemoteEntry};
    use proptest::prelude::*;

    const OWNER: &str = "octo";
    const REPO: &str = "tree";

    #[derive(Debug, Clone)]
    enum Node {
        File,
        Dir(BTreeMap<String, Node>),
    }

    fn name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,5}"
    }

    fn node() -> impl Strategy<Value = Node> {
        let leaf = prop_oneof![
            3 => Just(Node::File),
            1 => Just(Node::Dir(BTreeMap::new())),
        ];
        leaf.prop_recursive(4, 48, 5, |inner| {
            prop::collection::btree_map(name(), inner, 0..5).prop_map(Node::Dir)
        })
    }

    fn root() -> impl Strategy<Value = BTreeMap<String, Node>> {
        prop::collection::btree_map(name(), node(), 0..6)
    }

    fn locator(path: &str) -> String {
        format!("mem://{}/{}/{}", OWNER, REPO, path)
    }

    /// What the walk is expected to see.
    #[derive(Default)]
    struct Expected {
        leaves: BTreeMap<String, String>,
        directories: usize,
    }

    /// Register the listing of `dir` and every directory below it.
    fn load(
        provider: MemoryProvider,
        dir: &str,
        children: &BTreeMap<String, Node>,
        expected: &mut Expected,
    ) -> MemoryProvider {
        expected.directories += 1;

        let entries = children
            .iter()
            .map(|(name, child)| {
                let path = join_remote_path(dir, name);
                match child {
                    Node::File => {
                        expected.leaves.insert(path.clone(), locator(&path));
                        RemoteEntry::file(&path, &locator(&path))
                    }
                    Node::Dir(_) => RemoteEntry::directory(&path),
                }
            })
            .collect();

        let mut provider = provider.with_listing(OWNER, REPO, dir, entries);
        for (name, child) in children {
            if let Node::Dir(grandchildren) = child {
                provider = load(provider, &join_remote_path(dir, name), grandchildren, expected);
            }
        }
        provider
    }

    // ============================================================================
    // TreeExplorer property tests
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: the walk yields exactly the leaf files, each with its own
        /// locator, after listing every directory once
        #[test]
        fn explore_yields_exactly_the_leaves(tree in root(), threads in 1usize..5) {
            let mut expected = Expected::default();
            let provider = Arc::new(load(MemoryProvider::new(), "", &tree, &mut expected));
            let pool = Arc::new(WorkerPool::new(threads).unwrap());
            let explorer = TreeExplorer::new(provider.clone(), pool);

            let files = explorer.explore(OWNER, REPO, "").unwrap();

            let found: BTreeMap<String, String> = files
                .iter()
                .map(|f| (f.relative_path.to_string(), f.download_locator.clone()))
                .collect();
            prop_assert_eq!(found.len(), files.len(), "a path was returned twice");
            prop_assert_eq!(found, expected.leaves);
            prop_assert_eq!(provider.list_calls(), expected.directories);
            prop_assert_eq!(provider.fetch_calls(), 0);
        }
    }
}
