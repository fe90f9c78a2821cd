use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const BINARY_CONTENT_MARKER: &str = "[Binary or non-text content]";

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const REPO_NOT_FOUND: &str = "Repository not found or private";
const TREE_FETCH_FAILED: &str = "Failed to fetch file tree";
const BLOB_FETCH_FAILED: &str = "Failed to fetch blob";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule commits and anything else the API may add.
    #[serde(other)]
    Other,
}

/// One path from a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: Option<u64>,
    /// API location of the blob; absent for submodule entries.
    #[serde(rename = "url", default)]
    pub content_ref: Option<String>,
    #[serde(skip, default = "selected_by_default")]
    pub selected: bool,
}

fn selected_by_default() -> bool {
    true
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>, content_ref: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            size: None,
            content_ref: Some(content_ref.into()),
            selected: true,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

#[derive(Debug, Clone)]
pub struct TreeListing {
    pub entries: Vec<TreeEntry>,
    /// The API cut the listing short; entries are partial.
    pub truncated: bool,
}

#[derive(Deserialize)]
struct RepoDetails {
    default_branch: String,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: Option<String>,
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct BlobResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

/// Anything that can turn a blob locator into text.
#[async_trait]
pub trait BlobSource: Send + Sync {
    async fn blob_content(&self, content_ref: &str) -> Result<String>;
}

pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    pub fn with_api_base(api_base: &str, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = Client::builder()
            .user_agent(concat!("gitmerge/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    pub async fn default_branch(&self, owner: &str, name: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, name);
        debug!("Fetching repository details from {}", url);

        let response = self.get(&url).send().await?;
        if !response.status().is_success() {
            let message = response
                .json::<ApiMessage>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| REPO_NOT_FOUND.to_string());
            return Err(Error::RemoteUnavailable(message));
        }

        let details: RepoDetails = response.json().await?;
        Ok(details.default_branch)
    }

    pub async fn tree(&self, owner: &str, name: &str, git_ref: &str) -> Result<TreeListing> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, owner, name, git_ref
        );
        debug!("Fetching tree from {}", url);

        let response = self.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::TreeFetch(TREE_FETCH_FAILED.to_string()));
        }

        let body: TreeResponse = response.json().await?;
        if body.truncated {
            warn!(
                "Git tree for {}/{}@{} truncated due to size limit, continuing with {} entries",
                owner,
                name,
                git_ref,
                body.tree.len()
            );
        }

        Ok(TreeListing {
            entries: body.tree,
            truncated: body.truncated,
        })
    }
}

#[async_trait]
impl BlobSource for GitHubClient {
    async fn blob_content(&self, content_ref: &str) -> Result<String> {
        let response = self.get(content_ref).send().await?;
        if !response.status().is_success() {
            return Err(Error::BlobFetch(BLOB_FETCH_FAILED.to_string()));
        }

        let body: BlobResponse = response.json().await?;
        Ok(decode_blob(&body.content, &body.encoding, content_ref))
    }
}

/// Turns a blob envelope into text. Never fails: undecodable payloads become markers.
pub fn decode_blob(content: &str, encoding: &str, content_ref: &str) -> String {
    if encoding != "base64" {
        return BINARY_CONTENT_MARKER.to_string();
    }

    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    match STANDARD.decode(compact) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => format!("[Error decoding file: {content_ref}]"),
    }
}
