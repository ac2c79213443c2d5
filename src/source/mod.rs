//! Repository source contract.
//!
//! The viewer never talks to the network directly; it asks a source for the
//! flat tree and for blob content. [`GithubSource`] is the production
//! implementation.

pub mod github;

pub use github::GithubSource;

use crate::error::ApiError;
use crate::types::{BlobRecord, FlatEntry, RepoRef};
use async_trait::async_trait;

/// Access to a repository's listing and content.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Recursive flat listing of the configured branch.
    async fn fetch_tree(&self, repo: &RepoRef) -> Result<Vec<FlatEntry>, ApiError>;

    /// Blob content by sha.
    async fn fetch_blob(&self, repo: &RepoRef, sha: &str) -> Result<BlobRecord, ApiError>;

    /// File content by repository path.
    async fn fetch_contents(&self, repo: &RepoRef, path: &str) -> Result<BlobRecord, ApiError>;
}
