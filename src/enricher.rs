//! Turns merged pull requests into flat, read-only records carrying the timing and
//! participant data the report aggregates over.

use crate::types::{IssueComment, PullRequestSource, PullRequestSummary, Review};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use std::fmt;

/// Handle suffix the hosting service gives to automation accounts.
pub const BOT_SUFFIX: &str = "[bot]";

/// Whether `login` belongs to an automation account.
pub fn is_bot(login: &str) -> bool {
    login.ends_with(BOT_SUFFIX)
}

/// A fixed UTC time-of-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    AfterMidnight,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket for an hour of the day in UTC. Lower bounds are inclusive.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::AfterMidnight,
            6..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=19 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AfterMidnight => "after midnight [UTC 00:00-06:00)",
            Self::Morning => "morning [UTC 06:00-12:00)",
            Self::Afternoon => "afternoon [UTC 12:00-17:00)",
            Self::Evening => "evening [UTC 17:00-20:00)",
            Self::Night => "night [UTC 20:00-00:00)",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Self::Q1,
            4..=6 => Self::Q2,
            7..=9 => Self::Q3,
            _ => Self::Q4,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        };
        f.write_str(s)
    }
}

/// Day of the week and time-of-day bucket of an instant, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Moment {
    pub day: Weekday,
    pub time: TimeOfDay,
}

impl Moment {
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            day: instant.weekday(),
            time: TimeOfDay::from_hour(instant.hour()),
        }
    }

    /// Full English name of the day, e.g. "Monday".
    pub fn day_name(&self) -> &'static str {
        match self.day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

/// A comment that responded to a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub responder: String,
    /// Time from pull request creation to the comment.
    pub latency: Duration,
    pub moment: Moment,
}

impl Response {
    fn to(created_at: DateTime<Utc>, comment: &IssueComment) -> Self {
        Self {
            responder: comment.author.clone(),
            latency: comment.created_at - created_at,
            moment: Moment::of(comment.created_at),
        }
    }
}

/// A merged pull request with its derived timing and participant data.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPullRequest {
    pub number: u64,
    pub title: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: DateTime<Utc>,
    /// Time from creation to merge.
    pub duration: Duration,
    pub quarter: Quarter,
    pub year: i32,
    pub creation: Moment,
    pub merge: Moment,
    /// First comment by any account, bots included.
    pub first_response: Option<Response>,
    /// First comment by a non-bot account.
    pub first_human_response: Option<Response>,
    pub commits: usize,
    /// Non-bot comment authors, one entry per comment.
    pub commenters: Vec<String>,
    /// Non-bot review authors, one entry per review.
    pub reviewers: Vec<String>,
}

/// First response overall and first non-bot response among `comments`, in order.
///
/// Stops reading comments at the first non-bot one.
fn first_responses(
    created_at: DateTime<Utc>,
    comments: &[IssueComment],
) -> (Option<Response>, Option<Response>) {
    let mut first = None;
    for comment in comments {
        if first.is_none() {
            first = Some(Response::to(created_at, comment));
        }
        if !is_bot(&comment.author) {
            return (first, Some(Response::to(created_at, comment)));
        }
    }
    (first, None)
}

fn human_commenters(comments: &[IssueComment]) -> Vec<String> {
    comments
        .iter()
        .filter(|c| !is_bot(&c.author))
        .map(|c| c.author.clone())
        .collect()
}

fn human_reviewers(reviews: &[Review]) -> Vec<String> {
    reviews
        .iter()
        .filter(|r| !is_bot(&r.reviewer))
        .map(|r| r.reviewer.clone())
        .collect()
}

/// Builds the record for one pull request.
///
/// Returns `Ok(None)` without touching `source` when the pull request lacks a
/// creation or merge time.
pub async fn enrich_pull_request<S>(
    source: &S,
    pr: &PullRequestSummary,
) -> Result<Option<EnrichedPullRequest>>
where
    S: PullRequestSource + ?Sized,
{
    let (Some(created_at), Some(merged_at)) = (pr.created_at, pr.merged_at) else {
        return Ok(None);
    };

    let comments = source
        .list_comments(pr.number)
        .await
        .with_context(|| format!("fetching comments for PR #{}", pr.number))?;
    let (first_response, first_human_response) = first_responses(created_at, &comments);

    let commits = source
        .list_commits(pr.number)
        .await
        .with_context(|| format!("fetching commits for PR #{}", pr.number))?;

    let reviews = source
        .list_reviews(pr.number)
        .await
        .with_context(|| format!("fetching reviews for PR #{}", pr.number))?;

    Ok(Some(EnrichedPullRequest {
        number: pr.number,
        title: pr.title.clone(),
        creator: pr.creator.clone(),
        created_at,
        merged_at,
        duration: merged_at - created_at,
        quarter: Quarter::from_month(created_at.month()),
        year: created_at.year(),
        creation: Moment::of(created_at),
        merge: Moment::of(merged_at),
        first_response,
        first_human_response,
        commits: commits.len(),
        commenters: human_commenters(&comments),
        reviewers: human_reviewers(&reviews),
    }))
}

/// Enriches every merged pull request in `prs`, in order.
///
/// A pull request whose comments, commits or reviews cannot be fetched is logged
/// and left out.
pub async fn enrich_pull_requests<S>(
    source: &S,
    prs: &[PullRequestSummary],
) -> Vec<EnrichedPullRequest>
where
    S: PullRequestSource + ?Sized,
{
    let mut records = Vec::new();

    for pr in prs {
        match enrich_pull_request(source, pr).await {
            Ok(Some(record)) => {
                tracing::debug!(pr = pr.number, "Enriched pull request");
                records.push(record);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(pr = pr.number, "Skipping PR #{}: {:#}", pr.number, e);
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, min, 0).unwrap()
    }

    fn comment(author: &str, created_at: DateTime<Utc>) -> IssueComment {
        IssueComment {
            author: author.to_string(),
            created_at,
        }
    }

    #[test]
    fn test_is_bot() {
        assert!(is_bot("dependabot[bot]"));
        assert!(is_bot("bot-x[bot]"));
        assert!(!is_bot("alice"));
        assert!(!is_bot("[bot]alice"));
        assert!(!is_bot("robot"));
    }

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::AfterMidnight);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(19), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::AfterMidnight);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Night);
        assert_eq!(
            TimeOfDay::Morning.to_string(),
            "morning [UTC 06:00-12:00)"
        );
    }

    #[test]
    fn test_quarters() {
        assert_eq!(Quarter::from_month(1), Quarter::Q1);
        assert_eq!(Quarter::from_month(3), Quarter::Q1);
        assert_eq!(Quarter::from_month(4), Quarter::Q2);
        assert_eq!(Quarter::from_month(9), Quarter::Q3);
        assert_eq!(Quarter::from_month(10), Quarter::Q4);
        assert_eq!(Quarter::from_month(12), Quarter::Q4);
    }

    #[test]
    fn test_moment_uses_utc_weekday() {
        // 2024-03-04 was a Monday.
        let moment = Moment::of(at(4, 23, 30));
        assert_eq!(moment.day, Weekday::Mon);
        assert_eq!(moment.day_name(), "Monday");
        assert_eq!(moment.time, TimeOfDay::Night);
    }

    #[test]
    fn test_bot_then_human_responses() {
        let created = at(4, 9, 0);
        let comments = vec![
            comment("bot-x[bot]", at(4, 9, 5)),
            comment("alice", at(4, 13, 0)),
        ];

        let (first, human) = first_responses(created, &comments);
        let first = first.unwrap();
        let human = human.unwrap();

        assert_eq!(first.responder, "bot-x[bot]");
        assert_eq!(first.latency, Duration::minutes(5));
        assert_eq!(human.responder, "alice");
        assert_eq!(human.latency, Duration::hours(4));
        assert_eq!(human.moment.time, TimeOfDay::Afternoon);
    }

    #[test]
    fn test_human_first_is_both_responses() {
        let created = at(4, 9, 0);
        let comments = vec![comment("alice", at(4, 10, 0)), comment("bob", at(4, 11, 0))];

        let (first, human) = first_responses(created, &comments);
        assert_eq!(first, human);
        assert_eq!(first.unwrap().responder, "alice");
    }

    #[test]
    fn test_no_comments_no_responses() {
        let (first, human) = first_responses(at(4, 9, 0), &[]);
        assert!(first.is_none());
        assert!(human.is_none());
    }

    #[test]
    fn test_only_bot_comments() {
        let comments = vec![comment("ci[bot]", at(4, 9, 1))];
        let (first, human) = first_responses(at(4, 9, 0), &comments);
        assert_eq!(first.unwrap().responder, "ci[bot]");
        assert!(human.is_none());
    }

    #[test]
    fn test_commenters_collects_past_first_human() {
        let comments = vec![
            comment("ci[bot]", at(4, 9, 1)),
            comment("alice", at(4, 9, 2)),
            comment("bob", at(4, 9, 3)),
            comment("alice", at(4, 9, 4)),
        ];
        assert_eq!(human_commenters(&comments), vec!["alice", "bob", "alice"]);
    }

    #[test]
    fn test_reviewers_exclude_bots() {
        let reviews = vec![
            Review {
                reviewer: "carol".to_string(),
            },
            Review {
                reviewer: "sonar[bot]".to_string(),
            },
            Review {
                reviewer: "carol".to_string(),
            },
        ];
        assert_eq!(human_reviewers(&reviews), vec!["carol", "carol"]);
    }
}
