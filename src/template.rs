//! Kata templates and bootstrapping a kata from one
//!
//! A template repository holds one top-level directory per language:
//!
//! ```text
//! java/
//!   junit5/...        one directory per template
//!   spock/...
//! python/
//!   README.md         the language directory is itself the template
//!   ...
//! ```
//!
//! [`TemplateCatalog`] answers which languages and templates exist, and
//! [`InitKataService`] turns a (language, template) choice into a fresh kata
//! directory:
//!
//! 1.  **Check**: the parent directory must exist and the kata name must be a
//!     plain identifier. Nothing is requested before both hold.
//!
//! 2.  **Resolve**: the language and template are looked up in the catalog.
//!     The template name may be left out when there is only one choice.
//!
//! 3.  **Fetch**: the template directory is explored and downloaded into
//!     `parent_dir/kata_name`, with paths re-rooted at the template.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::TemplateRepoConfig;
use crate::downloader::BulkDownloader;
use crate::error::{Error, Result};
use crate::explorer::{DownloadableFile, TreeExplorer};
use crate::path::{join_remote_path, RelativePath};
use crate::provider::{ContentProvider, EntryType};

/// The file whose presence marks a language directory as a template.
const ROOT_TEMPLATE_MARKER: &str = "README.md";

/// A validated kata name: non-empty, ASCII letters, digits and `_` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KataName(String);

impl KataName {
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidKataName {
            name: name.to_string(),
            message: message.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if let Some(c) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
            return Err(invalid(&format!(
                "'{}' is not allowed, use letters, digits and '_'",
                c
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KataName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One template of one language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct KataTemplate {
    pub language: String,
    /// `None` when the language directory is itself the template.
    pub template_name: Option<String>,
}

impl KataTemplate {
    pub fn new(language: impl Into<String>, template_name: Option<&str>) -> Self {
        Self {
            language: language.into(),
            template_name: template_name.map(str::to_string),
        }
    }

    /// The template's directory in the repository.
    pub fn path(&self) -> String {
        match &self.template_name {
            Some(name) => join_remote_path(&self.language, name),
            None => self.language.clone(),
        }
    }
}

impl fmt::Display for KataTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The languages and templates of a template repository.
pub struct TemplateCatalog {
    provider: Arc<dyn ContentProvider>,
    owner: String,
    repo: String,
    template_at_root: BTreeMap<String, bool>,
}

impl TemplateCatalog {
    pub fn new(provider: Arc<dyn ContentProvider>, repo: &TemplateRepoConfig) -> Self {
        Self {
            provider,
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
            template_at_root: repo.template_at_root.clone(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Every language, sorted. Hidden directories such as `.github` are not
    /// languages.
    pub fn languages(&self) -> Result<Vec<String>> {
        let mut languages: Vec<String> = self
            .provider
            .list_contents(&self.owner, &self.repo, "")?
            .into_iter()
            .filter(|entry| entry.is_directory() && !entry.name.starts_with('.'))
            .map(|entry| entry.name)
            .collect();
        languages.sort();
        Ok(languages)
    }

    /// Every template of `language`, sorted.
    pub fn templates_for(&self, language: &str) -> Result<Vec<KataTemplate>> {
        let languages = self.languages()?;
        if !languages.iter().any(|l| l == language) {
            return Err(Error::LanguageNotFound {
                language: language.to_string(),
                available: languages,
            });
        }

        let entries = self.provider.list_contents(&self.owner, &self.repo, language)?;
        let at_root = match self.template_at_root.get(language) {
            Some(at_root) => *at_root,
            None => entries
                .iter()
                .any(|e| e.entry_type == EntryType::File && e.name == ROOT_TEMPLATE_MARKER),
        };
        debug!(
            "Language '{}' has its template at the root: {}",
            language, at_root
        );

        if at_root {
            return Ok(vec![KataTemplate::new(language, None)]);
        }

        let mut templates: Vec<KataTemplate> = entries
            .iter()
            .filter(|entry| entry.is_directory())
            .map(|entry| KataTemplate::new(language, Some(&entry.name)))
            .collect();
        templates.sort();
        Ok(templates)
    }

    /// Pick the template to use. `template_name` may be left out when the
    /// language offers exactly one.
    pub fn resolve(&self, language: &str, template_name: Option<&str>) -> Result<KataTemplate> {
        let templates = self.templates_for(language)?;
        let available = || -> Vec<String> {
            templates
                .iter()
                .filter_map(|t| t.template_name.clone())
                .collect()
        };

        match template_name {
            Some(name) => templates
                .iter()
                .find(|t| t.template_name.as_deref() == Some(name))
                .cloned()
                .ok_or_else(|| Error::TemplateNotFound {
                    language: language.to_string(),
                    template: name.to_string(),
                    available: available(),
                }),
            None if templates.len() == 1 => Ok(templates[0].clone()),
            None => Err(Error::TemplateNotSpecified {
                language: language.to_string(),
                available: available(),
            }),
        }
    }
}

/// Bootstraps a new kata directory from a template.
pub struct InitKataService {
    catalog: TemplateCatalog,
    explorer: TreeExplorer,
    downloader: BulkDownloader,
}

impl InitKataService {
    pub fn new(catalog: TemplateCatalog, explorer: TreeExplorer, downloader: BulkDownloader) -> Self {
        Self {
            catalog,
            explorer,
            downloader,
        }
    }

    /// Create `parent_dir/kata_name` holding the files of the chosen template.
    ///
    /// Returns the new kata directory. An existing kata directory is never
    /// touched, and a failed download leaves no kata directory behind.
    pub fn init_kata(
        &self,
        parent_dir: &Path,
        kata_name: &str,
        language: &str,
        template_name: Option<&str>,
    ) -> Result<PathBuf> {
        if !parent_dir.is_dir() {
            return Err(Error::InvalidTarget {
                path: parent_dir.to_path_buf(),
                message: "parent directory does not exist".to_string(),
            });
        }
        let kata_name = KataName::parse(kata_name)?;
        let kata_dir = parent_dir.join(kata_name.as_str());
        if kata_dir.exists() {
            return Err(Error::InvalidTarget {
                path: kata_dir,
                message: "already exists".to_string(),
            });
        }

        let template = self.catalog.resolve(language, template_name)?;
        info!("Initialising kata '{}' from template '{}'", kata_name, template);

        let template_path = template.path();
        let files = self
            .explorer
            .explore(self.catalog.owner(), self.catalog.repo(), &template_path)?;
        let files = reroot(files, &template_path)?;

        fs::create_dir(&kata_dir)?;
        if let Err(e) = self.downloader.download_all(&kata_dir, &files) {
            // Remove the half-filled kata
            if let Err(cleanup) = fs::remove_dir_all(&kata_dir) {
                warn!("Could not remove '{}': {}", kata_dir.display(), cleanup);
            }
            return Err(e);
        }

        info!(
            "Created kata '{}' with {} file(s) at {}",
            kata_name,
            files.len(),
            kata_dir.display()
        );
        Ok(kata_dir)
    }
}

/// Make every file's path relative to the template directory.
fn reroot(files: Vec<DownloadableFile>, template_path: &str) -> Result<Vec<DownloadableFile>> {
    let prefix = RelativePath::parse(template_path)
        .map_err(|e| Error::traversal(template_path, e.to_string()))?;

    files
        .into_iter()
        .map(|file| {
            let relative_path = file.relative_path.strip_prefix(&prefix).ok_or_else(|| {
                Error::traversal(
                    template_path,
                    format!("'{}' lies outside the template", file.relative_path),
                )
            })?;
            Ok(DownloadableFile::new(relative_path, file.download_locator))
        })
        .collect()
}
