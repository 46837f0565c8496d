use crate::types::{PullRequestSource, PullRequestSummary};
use anyhow::{Context, Result};

/// Largest page size the pull request listing accepts.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Page size used when collecting `target` pull requests (0 means all of them).
pub fn page_size(target: usize) -> u8 {
    match u8::try_from(target) {
        Ok(n) if n > 0 && n < MAX_PAGE_SIZE => n,
        _ => MAX_PAGE_SIZE,
    }
}

/// Pages through closed pull requests until `target` have been collected, or every
/// page has been read when `target` is zero.
///
/// Any failed page request fails the whole fetch.
pub async fn fetch_closed_pull_requests<S>(
    source: &S,
    target: usize,
) -> Result<Vec<PullRequestSummary>>
where
    S: PullRequestSource + ?Sized,
{
    let per_page = page_size(target);
    let mut prs = Vec::new();
    let mut page = 1;

    loop {
        let current_page = source
            .list_closed_pull_requests(page, per_page)
            .await
            .with_context(|| format!("fetching page {page} of closed pull requests"))?;

        tracing::debug!(page, items = current_page.items.len(), "Fetched page");
        prs.extend(current_page.items);

        if target > 0 && prs.len() >= target {
            break;
        }

        match current_page.next_page {
            Some(next) => page = next,
            None => break,
        }
    }

    if target > 0 {
        prs.truncate(target);
    }

    Ok(prs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size() {
        assert_eq!(page_size(0), 100);
        assert_eq!(page_size(10), 10);
        assert_eq!(page_size(99), 99);
        assert_eq!(page_size(100), 100);
        assert_eq!(page_size(250), 100);
        assert_eq!(page_size(1000), 100);
    }
}
