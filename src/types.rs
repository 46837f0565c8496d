//! Provider-neutral views of what the hosting service returns, and the trait the
//! fetcher and enricher are written against.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Handle reported for comments and reviews whose author account no longer exists.
pub const GHOST_LOGIN: &str = "ghost";

/// A closed pull request as listed by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub creator: String,
    pub created_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// One page of closed pull requests.
#[derive(Debug, Clone, Default)]
pub struct PullRequestPage {
    pub items: Vec<PullRequestSummary>,
    /// Page number to request next, `None` once the listing is exhausted.
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub reviewer: String,
}

/// Read access to the pull request history of a single repository.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// List one page of closed pull requests. Pages are numbered from 1.
    async fn list_closed_pull_requests(&self, page: u32, per_page: u8)
        -> Result<PullRequestPage>;

    /// List the conversation comments on a pull request (first page only).
    async fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>>;

    /// List the commits on a pull request (first page only).
    async fn list_commits(&self, number: u64) -> Result<Vec<CommitSummary>>;

    /// List the reviews submitted on a pull request (first page only).
    async fn list_reviews(&self, number: u64) -> Result<Vec<Review>>;
}
