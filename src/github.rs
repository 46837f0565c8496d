use crate::config::RepoId;
use crate::types::{
    CommitSummary, IssueComment, PullRequestPage, PullRequestSource, PullRequestSummary, Review,
    GHOST_LOGIN,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::models::pulls::PullRequest;
use octocrab::Octocrab;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiComment {
    user: Option<ApiUser>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiReview {
    user: Option<ApiUser>,
}

fn login_or_ghost(user: Option<ApiUser>) -> String {
    user.map_or_else(|| GHOST_LOGIN.to_string(), |u| u.login)
}

impl From<ApiComment> for IssueComment {
    fn from(comment: ApiComment) -> Self {
        Self {
            author: login_or_ghost(comment.user),
            created_at: comment.created_at,
        }
    }
}

impl From<ApiCommit> for CommitSummary {
    fn from(commit: ApiCommit) -> Self {
        Self { sha: commit.sha }
    }
}

impl From<ApiReview> for Review {
    fn from(review: ApiReview) -> Self {
        Self {
            reviewer: login_or_ghost(review.user),
        }
    }
}

fn summarize(pr: &PullRequest) -> PullRequestSummary {
    PullRequestSummary {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        creator: pr
            .user
            .as_ref()
            .map_or_else(|| GHOST_LOGIN.to_string(), |u| u.login.clone()),
        created_at: pr.created_at,
        merged_at: pr.merged_at,
    }
}

/// GitHub-backed [`PullRequestSource`] for one repository.
pub struct GitHubClient {
    octocrab: Octocrab,
    repo: RepoId,
}

impl GitHubClient {
    pub fn new(token: String, repo: RepoId) -> Result<Self> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;
        Ok(Self { octocrab, repo })
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    fn pull_route(&self, number: u64, resource: &str) -> String {
        format!(
            "/repos/{}/{}/pulls/{}/{}",
            self.repo.owner, self.repo.repo, number, resource
        )
    }

    async fn get_list<T>(&self, route: String) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let items: Vec<T> = self
            .octocrab
            .get(&route, None::<&()>)
            .await
            .with_context(|| format!("GET {route}"))?;
        Ok(items)
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn list_closed_pull_requests(
        &self,
        page: u32,
        per_page: u8,
    ) -> Result<PullRequestPage> {
        let current_page = self
            .octocrab
            .pulls(self.repo.owner.clone(), self.repo.repo.clone())
            .list()
            .state(octocrab::params::State::Closed)
            .per_page(per_page)
            .page(page)
            .send()
            .await?;

        Ok(PullRequestPage {
            items: current_page.items.iter().map(summarize).collect(),
            next_page: current_page.next.as_ref().map(|_| page + 1),
        })
    }

    async fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>> {
        let route = format!(
            "/repos/{}/{}/issues/{}/comments",
            self.repo.owner, self.repo.repo, number
        );
        let comments: Vec<ApiComment> = self.get_list(route).await?;
        Ok(comments.into_iter().map(IssueComment::from).collect())
    }

    async fn list_commits(&self, number: u64) -> Result<Vec<CommitSummary>> {
        let commits: Vec<ApiCommit> = self.get_list(self.pull_route(number, "commits")).await?;
        Ok(commits.into_iter().map(CommitSummary::from).collect())
    }

    async fn list_reviews(&self, number: u64) -> Result<Vec<Review>> {
        let reviews: Vec<ApiReview> = self.get_list(self.pull_route(number, "reviews")).await?;
        Ok(reviews.into_iter().map(Review::from).collect())
    }
}
