use tracing::info;

use crate::error::Result;
use crate::github::GitHubClient;
use crate::locator::RepositoryRef;
use crate::selector::{IgnoreRules, Selection};

#[derive(Debug, Clone)]
pub struct LoadedRepo {
    /// Always carries a concrete branch.
    pub repo: RepositoryRef,
    pub selection: Selection,
    pub truncated: bool,
}

/// Resolves the branch if needed, lists the tree and builds the initial
/// selection of eligible files.
pub async fn load_repository(
    client: &GitHubClient,
    repo: &RepositoryRef,
    rules: &IgnoreRules,
) -> Result<LoadedRepo> {
    let mut repo = repo.clone();
    if !repo.has_branch() {
        repo.branch = client.default_branch(&repo.owner, &repo.name).await?;
        info!(
            "Resolved default branch for {}/{}: {}",
            repo.owner, repo.name, repo.branch
        );
    }

    let listing = client.tree(&repo.owner, &repo.name, &repo.branch).await?;
    let total = listing.entries.len();
    let selection = Selection::from_listing(listing.entries, rules);
    info!(
        "Loaded {}: {} of {} tree entries eligible",
        repo,
        selection.len(),
        total
    );

    Ok(LoadedRepo {
        repo,
        selection,
        truncated: listing.truncated,
    })
}
