pub mod config;
pub mod enricher;
pub mod fetcher;
pub mod github;
pub mod metrics;
pub mod report;
pub mod types;

use anyhow::Result;
use enricher::EnrichedPullRequest;
use types::PullRequestSource;

/// Fetches up to `target` closed pull requests and enriches the merged ones.
///
/// Fails only if the pull request listing fails. Per-PR failures are logged and
/// the PR is left out.
pub async fn collect_records<S>(source: &S, target: usize) -> Result<Vec<EnrichedPullRequest>>
where
    S: PullRequestSource + ?Sized,
{
    let prs = fetcher::fetch_closed_pull_requests(source, target).await?;
    tracing::info!(count = prs.len(), "Fetched closed pull requests");

    let records = enricher::enrich_pull_requests(source, &prs).await;
    tracing::info!(count = records.len(), "Enriched merged pull requests");

    Ok(records)
}
