use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

const GITHUB_HOST: &str = "github.com";

/// Identifies one repository snapshot on GitHub.
///
/// An empty `branch` means "use the remote's default branch"; the loader
/// replaces it with the concrete name once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl RepositoryRef {
    /// Returns a copy pinned to `branch`, unless `branch` is blank.
    pub fn with_branch(&self, branch: Option<&str>) -> Self {
        let mut repo = self.clone();
        if let Some(branch) = branch.map(str::trim).filter(|b| !b.is_empty()) {
            repo.branch = branch.to_string();
        }
        repo
    }

    pub fn has_branch(&self) -> bool {
        !self.branch.is_empty()
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)?;
        if self.has_branch() {
            write!(f, "@{}", self.branch)?;
        }
        Ok(())
    }
}

/// Parses `https://github.com/owner/repo[.git][/tree/<branch...>]`.
pub fn parse_repo_url(input: &str) -> Result<RepositoryRef> {
    let invalid = || Error::ReferenceParse(input.to_string());

    let trimmed = input.strip_suffix('/').unwrap_or(input);
    let url = Url::parse(trimmed).map_err(|_| invalid())?;

    if url.host_str() != Some(GITHUB_HOST) {
        return Err(invalid());
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(invalid());
    }

    let owner = segments[0].to_string();
    let name = segments[1]
        .strip_suffix(".git")
        .unwrap_or(segments[1])
        .to_string();

    // Branch names may themselves contain slashes.
    let branch = if segments.len() >= 4 && segments[2] == "tree" {
        segments[3..].join("/")
    } else {
        String::new()
    };

    Ok(RepositoryRef {
        owner,
        name,
        branch,
    })
}
