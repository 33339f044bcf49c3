//! Concurrent download of a flat file list into a local directory

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::explorer::DownloadableFile;
use crate::filesystem::FileWriter;
use crate::path::RelativePath;
use crate::pool::WorkerPool;
use crate::provider::ContentProvider;

/// Text fetched for one file, on its way to disk.
struct FetchedContent<'a> {
    relative_path: &'a RelativePath,
    text: String,
}

/// Fetches files through a content provider and writes them below a root
/// directory.
pub struct BulkDownloader {
    provider: Arc<dyn ContentProvider>,
    writer: Arc<dyn FileWriter>,
    pool: Arc<WorkerPool>,
}

impl BulkDownloader {
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        writer: Arc<dyn FileWriter>,
        pool: Arc<WorkerPool>,
    ) -> Self {
        Self {
            provider,
            writer,
            pool,
        }
    }

    /// Download every file in `files` to `root_dir / relative_path`.
    ///
    /// `root_dir` must be an existing directory; this is checked before any
    /// request is made. Each file is fetched and written as an independent
    /// unit of work on the pool. The first failure is returned as
    /// `Error::Download` naming the file; other files may already be on disk
    /// by then.
    pub fn download_all(&self, root_dir: &Path, files: &[DownloadableFile]) -> Result<()> {
        ensure_target_dir(root_dir)?;

        if files.is_empty() {
            debug!("Nothing to download into '{}'", root_dir.display());
            return Ok(());
        }

        debug!(
            "Downloading {} file(s) into '{}' on {} workers",
            files.len(),
            root_dir.display(),
            self.pool.capacity()
        );

        self.pool.install(|| {
            files
                .par_iter()
                .try_for_each(|file| self.download_file(root_dir, file))
        })?;

        info!(
            "Downloaded {} file(s) into '{}'",
            files.len(),
            root_dir.display()
        );
        Ok(())
    }

    fn download_file(&self, root_dir: &Path, file: &DownloadableFile) -> Result<()> {
        let wrap = |source: Error| Error::Download {
            path: file.relative_path.clone(),
            source: Box::new(source),
        };

        let fetched = self.fetch(file).map_err(wrap)?;
        self.writer
            .write_file(root_dir, fetched.relative_path, &fetched.text)
            .map_err(wrap)?;

        debug!("Wrote '{}'", file.relative_path);
        Ok(())
    }

    fn fetch<'a>(&self, file: &'a DownloadableFile) -> Result<FetchedContent<'a>> {
        let text = self.provider.fetch_raw_content(&file.download_locator)?;
        Ok(FetchedContent {
            relative_path: &file.relative_path,
            text,
        })
    }
}

fn ensure_target_dir(root_dir: &Path) -> Result<()> {
    if !root_dir.exists() {
        return Err(Error::InvalidTarget {
            path: root_dir.to_path_buf(),
            message: "does not exist".to_string(),
        });
    }
    if !root_dir.is_dir() {
        return Err(Error::InvalidTarget {
            path: root_dir.to_path_buf(),
            message: "is not a directory".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use crate::filesystem::DiskWriter;
    use crate::provider::MemoryProvider;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn downloadable(path: &str, locator: &str) -> DownloadableFile {
        DownloadableFile::new(RelativePath::parse(path).unwrap(), locator)
    }

    fn downloader_for(provider: MemoryProvider) -> (BulkDownloader, Arc<MemoryProvider>) {
        let provider = Arc::new(provider);
        let pool = Arc::new(WorkerPool::new(4).unwrap());
        let downloader = BulkDownloader::new(provider.clone(), Arc::new(DiskWriter::new()), pool);
        (downloader, provider)
    }

    /// Writer that records calls instead of touching the disk.
    #[derive(Default)]
    struct RecordingWriter {
        writes: Mutex<Vec<(PathBuf, String, String)>>,
        fail_on: Option<String>,
    }

    impl FileWriter for RecordingWriter {
        fn write_file(&self, root_dir: &Path, relative_path: &RelativePath, content: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(relative_path.to_string().as_str()) {
                return Err(Error::Filesystem {
                    message: "disk full".to_string(),
                });
            }
            self.writes.lock().unwrap().push((
                root_dir.to_path_buf(),
                relative_path.to_string(),
                content.to_string(),
            ));
            Ok(())
        }
    }

    #[test]
    fn test_file_at_root() {
        let temp_dir = TempDir::new().unwrap();
        let (downloader, _) = downloader_for(
            MemoryProvider::new().with_content("http://this_is_the_url/file.txt", "EXPECTED TEXT CONTENT"),
        );

        downloader
            .download_all(
                temp_dir.path(),
                &[downloadable("file.txt", "http://this_is_the_url/file.txt")],
            )
            .unwrap();

        let content = fs::read_to_string(temp_dir.path().join("file.txt")).unwrap();
        assert_eq!(content, "EXPECTED TEXT CONTENT");
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let (downloader, _) = downloader_for(MemoryProvider::new().with_content("url", ""));

        downloader
            .download_all(temp_dir.path(), &[downloadable("file.txt", "url")])
            .unwrap();

        let content = fs::read_to_string(temp_dir.path().join("file.txt")).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_file_in_sub_path() {
        let temp_dir = TempDir::new().unwrap();
        let (downloader, _) = downloader_for(
            MemoryProvider::new().with_content("http://u/this/is/a/sub_path/file.txt", "deep"),
        );

        downloader
            .download_all(
                temp_dir.path(),
                &[downloadable(
                    "this/is/a/sub_path/file.txt",
                    "http://u/this/is/a/sub_path/file.txt",
                )],
            )
            .unwrap();

        let content =
            fs::read_to_string(temp_dir.path().join("this/is/a/sub_path/file.txt")).unwrap();
        assert_eq!(content, "deep");
    }

    #[test]
    fn test_many_files_each_get_their_own_content() {
        let temp_dir = TempDir::new().unwrap();
        let mut provider = MemoryProvider::new();
        let mut files = Vec::new();
        for i in 0..50 {
            let locator = format!("http://u/{}", i);
            provider = provider.with_content(&locator, &format!("content {}", i));
            files.push(downloadable(&format!("dir{}/file{}.txt", i % 5, i), &locator));
        }
        let (downloader, provider) = downloader_for(provider);

        downloader.download_all(temp_dir.path(), &files).unwrap();

        assert_eq!(provider.fetch_calls(), 50);
        for i in 0..50 {
            let path = temp_dir.path().join(format!("dir{}/file{}.txt", i % 5, i));
            assert_eq!(fs::read_to_string(path).unwrap(), format!("content {}", i));
        }
    }

    #[test]
    fn test_name_comes_from_relative_path_not_locator() {
        let temp_dir = TempDir::new().unwrap();
        let (downloader, _) = downloader_for(
            MemoryProvider::new().with_content("https://cdn.example/blobs/7c1e9a", "payload"),
        );

        downloader
            .download_all(
                temp_dir.path(),
                &[downloadable("src/Main.java", "https://cdn.example/blobs/7c1e9a")],
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("src/Main.java")).unwrap(),
            "payload"
        );
        assert!(!temp_dir.path().join("7c1e9a").exists());
    }

    #[test]
    fn test_empty_list_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let (downloader, provider) = downloader_for(MemoryProvider::new());

        downloader.download_all(temp_dir.path(), &[]).unwrap();

        assert_eq!(provider.total_calls(), 0);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_target_is_rejected_before_any_request() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does_not_exist");
        let (downloader, provider) = downloader_for(MemoryProvider::new().with_content("u", "x"));

        let err = downloader
            .download_all(&missing, &[downloadable("a.txt", "u")])
            .unwrap_err();

        assert!(matches!(err, Error::InvalidTarget { .. }));
        assert_eq!(provider.total_calls(), 0);
        assert!(!missing.exists());
    }

    #[test]
    fn test_file_target_is_rejected_before_any_request() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("file");
        fs::write(&not_a_dir, "x").unwrap();
        let (downloader, provider) = downloader_for(MemoryProvider::new().with_content("u", "x"));

        let err = downloader
            .download_all(&not_a_dir, &[downloadable("a.txt", "u")])
            .unwrap_err();

        match err {
            Error::InvalidTarget { path, message } => {
                assert_eq!(path, not_a_dir);
                assert!(message.contains("not a directory"));
            }
            other => panic!("Expected InvalidTarget error, got {:?}", other),
        }
        assert_eq!(provider.total_calls(), 0);
    }

    #[test]
    fn test_fetch_failure_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let (downloader, _) = downloader_for(
            MemoryProvider::new()
                .with_content("ok", "fine")
                .with_content("bad", "never served")
                .with_fetch_failure("bad", ProviderErrorKind::RateLimited),
        );

        let err = downloader
            .download_all(
                temp_dir.path(),
                &[downloadable("ok.txt", "ok"), downloadable("sub/bad.txt", "bad")],
            )
            .unwrap_err();

        match &err {
            Error::Download { path, source } => {
                assert_eq!(path.to_string(), "sub/bad.txt");
                assert!(source.is_rate_limited());
            }
            other => panic!("Expected Download error, got {:?}", other),
        }
        assert!(err.is_rate_limited());
        assert!(!temp_dir.path().join("sub/bad.txt").exists());
    }

    #[test]
    fn test_write_failure_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Arc::new(MemoryProvider::new().with_content("u1", "a").with_content("u2", "b"));
        let writer = Arc::new(RecordingWriter {
            fail_on: Some("b.txt".to_string()),
            ..Default::default()
        });
        let downloader = BulkDownloader::new(
            provider,
            writer.clone(),
            Arc::new(WorkerPool::new(2).unwrap()),
        );

        let err = downloader
            .download_all(
                temp_dir.path(),
                &[downloadable("a.txt", "u1"), downloadable("b.txt", "u2")],
            )
            .unwrap_err();

        match err {
            Error::Download { path, source } => {
                assert_eq!(path.to_string(), "b.txt");
                assert!(source.to_string().contains("disk full"));
            }
            other => panic!("Expected Download error, got {:?}", other),
        }
    }

    #[test]
    fn test_writer_receives_root_path_and_content() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Arc::new(MemoryProvider::new().with_content("u", "hello"));
        let writer = Arc::new(RecordingWriter::default());
        let downloader = BulkDownloader::new(
            provider,
            writer.clone(),
            Arc::new(WorkerPool::new(2).unwrap()),
        );

        downloader
            .download_all(temp_dir.path(), &[downloadable("x/y.txt", "u")])
            .unwrap();

        let writes = writer.writes.lock().unwrap();
        assert_eq!(
            *writes,
            vec![(
                temp_dir.path().to_path_buf(),
                "x/y.txt".to_string(),
                "hello".to_string()
            )]
        );
    }
}
