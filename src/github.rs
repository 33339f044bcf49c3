//! GitHub REST "contents" API as a `ContentProvider`
//!
//! Listings come from `GET {api_url}repos/{owner}/{repo}/contents/{path}` and
//! file text from the `download_url` GitHub hands out for each file. Status
//! codes are mapped onto `ProviderErrorKind` by [`classify_status`], and the
//! listing JSON is turned into `RemoteEntry` values by [`parse_listing`]; both
//! are pure so they can be tested without a network.

use std::fmt;
use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, ProviderErrorKind, Result};
use crate::provider::{ContentProvider, EntryType, RemoteEntry};

const USER_AGENT: &str = concat!("kata/", env!("CARGO_PKG_VERSION"));
const ACCEPT_JSON: &str = "application/vnd.github+json";
const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Connection settings for [`GithubApi`].
#[derive(Clone)]
pub struct GithubSettings {
    /// API base URL, ending in `/`.
    pub api_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for GithubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubSettings")
            .field("api_url", &self.api_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Blocking GitHub client.
///
/// One `reqwest` client is shared by every worker thread; it pools
/// connections internally.
pub struct GithubApi {
    client: Client,
    api_url: Url,
    token: Option<String>,
}

impl GithubApi {
    pub fn new(settings: GithubSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to build HTTP client: {}", e),
                hint: None,
            })?;

        Ok(Self {
            client,
            api_url: settings.api_url,
            token: settings.token,
        })
    }

    /// URL of the contents listing for `path` in `owner/repo`.
    pub fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config {
                message: format!("API URL '{}' cannot be a base", self.api_url),
                hint: Some("Use an absolute http(s) URL such as https://api.github.com/".to_string()),
            })?
            .pop_if_empty()
            .extend(["repos", owner, repo, "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Whether the token may be sent along with a request to `url`.
    ///
    /// Only the API host over the API's own scheme and the raw-content host
    /// over https qualify.
    fn trusts(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(host) => host,
            None => return false,
        };
        if Some(host) == self.api_url.host_str() {
            return url.scheme() == self.api_url.scheme();
        }
        host == RAW_CONTENT_HOST && url.scheme() == "https"
    }

    fn request(&self, url: Url) -> RequestBuilder {
        let trusted = self.trusts(&url);
        let builder = self.client.get(url);
        match &self.token {
            Some(token) if trusted => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Send a GET and turn every non-success answer into a provider error.
    fn get(&self, url: Url, target: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.request(url).send().map_err(|e| {
            Error::provider(ProviderErrorKind::Transport, target, e.to_string())
        })?;

        let status = response.status();
        let remaining = response
            .headers()
            .get(RATE_LIMIT_REMAINING)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        match classify_status(status, remaining.as_deref()) {
            None => Ok(response),
            Some(kind) => {
                let body = response.text().unwrap_or_default();
                Err(Error::provider(kind, target, error_message(status, &body)))
            }
        }
    }
}

impl fmt::Debug for GithubApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubApi")
            .field("api_url", &self.api_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ContentProvider for GithubApi {
    fn list_contents(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<RemoteEntry>> {
        let target = format!("{}/{}:{}", owner, repo, path);
        let url = self.contents_url(owner, repo, path)?;
        let body = self
            .get(url, &target)?
            .text()
            .map_err(|e| Error::provider(ProviderErrorKind::Transport, &target, e.to_string()))?;
        parse_listing(&body, path)
    }

    fn fetch_raw_content(&self, download_locator: &str) -> Result<String> {
        let url = Url::parse(download_locator).map_err(|e| {
            Error::provider(
                ProviderErrorKind::Transport,
                download_locator,
                format!("invalid download URL: {}", e),
            )
        })?;
        self.get(url, download_locator)?.text().map_err(|e| {
            Error::provider(ProviderErrorKind::Transport, download_locator, e.to_string())
        })
    }
}

/// Map an HTTP status onto a provider error kind; `None` means success.
///
/// GitHub reports an exhausted quota as `403` with `X-RateLimit-Remaining: 0`,
/// and secondary limits as `429`.
pub fn classify_status(status: StatusCode, rate_limit_remaining: Option<&str>) -> Option<ProviderErrorKind> {
    if status.is_success() {
        return None;
    }
    let exhausted = rate_limit_remaining.map(str::trim) == Some("0");
    let kind = match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderErrorKind::RateLimited,
        StatusCode::FORBIDDEN if exhausted => ProviderErrorKind::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderErrorKind::Forbidden,
        StatusCode::NOT_FOUND => ProviderErrorKind::NotFound,
        _ => ProviderErrorKind::Transport,
    };
    Some(kind)
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiMessage>(body) {
        Ok(api) => format!("{} ({})", status, api.message),
        Err(_) => status.to_string(),
    }
}

#[derive(Deserialize)]
struct RawEntry {
    name: Option<String>,
    path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    download_url: Option<String>,
    git_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawListing {
    Many(Vec<RawEntry>),
    One(RawEntry),
}

/// Decode a contents API response body for the listing of `listed_path`.
///
/// A single object (the path names a file) becomes a one-entry listing.
pub fn parse_listing(body: &str, listed_path: &str) -> Result<Vec<RemoteEntry>> {
    let listing: RawListing = serde_json::from_str(body).map_err(|e| {
        Error::traversal(listed_path, format!("response is not a contents listing: {}", e))
    })?;

    let raw_entries = match listing {
        RawListing::Many(entries) => entries,
        RawListing::One(entry) => vec![entry],
    };

    raw_entries
        .into_iter()
        .map(|raw| convert_entry(raw, listed_path))
        .collect()
}

fn convert_entry(raw: RawEntry, listed_path: &str) -> Result<RemoteEntry> {
    let name = raw
        .name
        .ok_or_else(|| Error::traversal(listed_path, "entry without a name"))?;
    let path = raw
        .path
        .ok_or_else(|| Error::traversal(listed_path, format!("entry '{}' has no path", name)))?;
    let kind = raw
        .kind
        .ok_or_else(|| Error::traversal(listed_path, format!("entry '{}' has no type", name)))?;

    let entry_type = match kind.as_str() {
        "dir" => EntryType::Directory,
        // Submodules show up in directory listings as files pointing at a tree
        "file" if raw.download_url.is_none() && is_tree_url(raw.git_url.as_deref()) => {
            EntryType::Submodule
        }
        "file" => EntryType::File,
        "symlink" => EntryType::Symlink,
        "submodule" => EntryType::Submodule,
        other => {
            return Err(Error::traversal(
                listed_path,
                format!("entry '{}' has unknown type '{}'", name, other),
            ))
        }
    };

    let download_locator = match entry_type {
        EntryType::File => raw.download_url,
        _ => None,
    };

    Ok(RemoteEntry {
        name,
        path,
        entry_type,
        download_locator,
    })
}

fn is_tree_url(git_url: Option<&str>) -> bool {
    git_url.is_some_and(|url| url.contains("/git/trees/"))
}
