//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let provider = sample_template();
//!     // ... test code
//! }
//! ```

use std::env;

use kata::provider::{MemoryProvider, RemoteEntry};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{sample_template, should_skip_network_tests, OWNER, REPO};
}

pub const OWNER: &str = "octocat";
pub const REPO: &str = "katas";

/// A template repository with files at several depths, an empty directory,
/// and a submodule:
///
/// ```text
/// README.md
/// java/
///   pom.xml
///   src/main/java/Kata.java
///   src/test/java/KataTest.java
///   src/test/resources/        (empty)
/// python/
///   kata.py
///   test_kata.py
/// vendor                       (submodule)
/// ```
#[allow(dead_code)]
pub fn sample_template() -> MemoryProvider {
    let mut vendor = RemoteEntry::directory("vendor");
    vendor.entry_type = kata::provider::EntryType::Submodule;

    MemoryProvider::new()
        .with_listing(
            OWNER,
            REPO,
            "",
            vec![
                RemoteEntry::file("README.md", &raw("README.md")),
                RemoteEntry::directory("java"),
                RemoteEntry::directory("python"),
                vendor,
            ],
        )
        .with_listing(
            OWNER,
            REPO,
            "java",
            vec![
                RemoteEntry::file("java/pom.xml", &raw("java/pom.xml")),
                RemoteEntry::directory("java/src"),
            ],
        )
        .with_listing(
            OWNER,
            REPO,
            "java/src",
            vec![
                RemoteEntry::directory("java/src/main"),
                RemoteEntry::directory("java/src/test"),
            ],
        )
        .with_listing(
            OWNER,
            REPO,
            "java/src/main",
            vec![RemoteEntry::directory("java/src/main/java")],
        )
        .with_listing(
            OWNER,
            REPO,
            "java/src/main/java",
            vec![RemoteEntry::file(
                "java/src/main/java/Kata.java",
                &raw("java/src/main/java/Kata.java"),
            )],
        )
        .with_listing(
            OWNER,
            REPO,
            "java/src/test",
            vec![
                RemoteEntry::directory("java/src/test/java"),
                RemoteEntry::directory("java/src/test/resources"),
            ],
        )
        .with_listing(
            OWNER,
            REPO,
            "java/src/test/java",
            vec![RemoteEntry::file(
                "java/src/test/java/KataTest.java",
                &raw("java/src/test/java/KataTest.java"),
            )],
        )
        .with_listing(OWNER, REPO, "java/src/test/resources", vec![])
        .with_listing(
            OWNER,
            REPO,
            "python",
            vec![
                RemoteEntry::file("python/kata.py", &raw("python/kata.py")),
                RemoteEntry::file("python/test_kata.py", &raw("python/test_kata.py")),
            ],
        )
        .with_content(&raw("README.md"), "# Katas\n")
        .with_content(&raw("java/pom.xml"), "<project/>\n")
        .with_content(
            &raw("java/src/main/java/Kata.java"),
            "public class Kata {}\n",
        )
        .with_content(
            &raw("java/src/test/java/KataTest.java"),
            "class KataTest {}\n",
        )
        .with_content(&raw("python/kata.py"), "def kata():\n    pass\n")
        .with_content(&raw("python/test_kata.py"), "from kata import kata\n")
}

fn raw(path: &str) -> String {
    format!("https://raw.githubusercontent.com/{}/{}/main/{}", OWNER, REPO, path)
}

/// Check if network tests should be skipped.
///
/// Returns true if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}
