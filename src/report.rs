//! Plain-text rendering of the summary statistics and per-PR lines.

use crate::enricher::{EnrichedPullRequest, Response};
use crate::metrics::Summary;
use chrono::Duration;
use std::io::{self, Write};

const SEPARATOR: &str = "----------------------------------------";

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// `value / unit` with the remainder as decimal places, trailing zeros dropped.
fn with_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Renders a duration the way Go prints one: `26h3m2s`, `1.5s`, `500ms`, `0s`.
pub fn format_duration(d: Duration) -> String {
    let total =
        i128::from(d.num_seconds()) * NANOS_PER_SEC as i128 + i128::from(d.subsec_nanos());
    if total == 0 {
        return "0s".to_string();
    }
    let sign = if total < 0 { "-" } else { "" };
    let nanos = total.unsigned_abs();

    if nanos < NANOS_PER_SEC {
        let (unit, suffix) = match nanos {
            0..=999 => (1, "ns"),
            1_000..=999_999 => (1_000, "µs"),
            _ => (1_000_000, "ms"),
        };
        return format!("{sign}{}{suffix}", with_fraction(nanos, unit));
    }

    let whole_secs = nanos / NANOS_PER_SEC;
    let (hours, minutes) = (whole_secs / 3600, whole_secs / 60 % 60);
    let seconds = with_fraction(nanos % (60 * NANOS_PER_SEC), NANOS_PER_SEC);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// Space-separated names in brackets, e.g. `[alice bob]`.
fn format_names(names: &[String]) -> String {
    format!("[{}]", names.join(" "))
}

fn human_response_clause(response: Option<&Response>) -> String {
    match response {
        Some(r) => format!(
            "had a first human response by {} on a {} in the {} after {}",
            r.responder,
            r.moment.day_name(),
            r.moment.time,
            format_duration(r.latency)
        ),
        None => "did not have a first human response".to_string(),
    }
}

/// One sentence describing a pull request.
pub fn pr_line(pr: &EnrichedPullRequest) -> String {
    let (responder, response_day, response_time, response_after) = match &pr.first_response {
        Some(r) => (
            r.responder.as_str(),
            r.moment.day_name(),
            r.moment.time.label(),
            format_duration(r.latency),
        ),
        None => ("", "", "", format_duration(Duration::zero())),
    };

    format!(
        "PR #{}: {} was created by {} on a {} in the {}, had a first response by {} on a {} in the {} after {}, {}, was merged on a {} in the {} in {}-{}, took {} to merge, included {} commits, and had {} review comments by {}, reviewed by {} people {}",
        pr.number,
        pr.title,
        pr.creator,
        pr.creation.day_name(),
        pr.creation.time,
        responder,
        response_day,
        response_time,
        response_after,
        human_response_clause(pr.first_human_response.as_ref()),
        pr.merge.day_name(),
        pr.merge.time,
        pr.quarter,
        pr.year,
        format_duration(pr.duration),
        pr.commits,
        pr.commenters.len(),
        format_names(&pr.commenters),
        pr.reviewers.len(),
        format_names(&pr.reviewers),
    )
}

pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out, "Average merge time: {}", format_duration(summary.average_merge_time))?;
    writeln!(
        out,
        "Average time to first human response: {}",
        format_duration(summary.average_time_to_first_human_response)
    )?;
    writeln!(
        out,
        "Average time to first bot response: {}",
        format_duration(summary.average_time_to_first_response)
    )?;
    writeln!(out, "Average number of comments per PR: {}", summary.average_comment_count)?;
    writeln!(out, "Average number of reviewers per PR: {}", summary.average_reviewer_count)?;
    writeln!(out, "Average number of commits per PR: {}", summary.average_commit_count)?;
    writeln!(out, "Day of the week with the most PRs created: {}", summary.busiest_creation_day)?;
    writeln!(out, "Time of the day with the most PRs created: {}", summary.busiest_creation_time)?;
    writeln!(out, "Day of the week with the most PRs merged: {}", summary.busiest_merge_day)?;
    writeln!(out, "Time of the day with the most PRs merged: {}", summary.busiest_merge_time)?;
    writeln!(
        out,
        "Day of the week with the most first human responses: {}",
        summary.busiest_first_human_response_day
    )?;
    writeln!(
        out,
        "Time of the day with the most first human responses: {}",
        summary.busiest_first_human_response_time
    )?;
    writeln!(
        out,
        "Day of the week with the most PR reviews: {}",
        summary.busiest_first_response_day
    )?;
    writeln!(
        out,
        "Time of the day with the most PR reviews: {}",
        summary.busiest_first_response_time
    )?;
    writeln!(
        out,
        "Names of all developers who created, merged, reviewed, commented on, or approved PRs: {}",
        format_names(&summary.all_participants)
    )?;
    writeln!(out, "Top reviewer: {}", summary.top_reviewer)?;
    writeln!(out, "Top commenter: {}", summary.top_commenter)?;
    writeln!(out, "Top creator: {}", summary.top_creator)?;
    writeln!(out, "Top first human responder: {}", summary.top_first_human_responder)?;
    writeln!(out, "Top first responder: {}", summary.top_first_responder)?;
    writeln!(out, "Top merger: {}", summary.top_merger)?;
    Ok(())
}

/// Writes the aggregate statistics, a separator, then one line per pull request.
pub fn write_report<W: Write>(out: &mut W, records: &[EnrichedPullRequest]) -> io::Result<()> {
    write_summary(out, &Summary::from_records(records))?;
    writeln!(out, "{SEPARATOR}")?;
    for pr in records {
        writeln!(out, "{}", pr_line(pr))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enricher::{Moment, Quarter};
    use chrono::{TimeZone, Utc};

    fn merged_pr() -> EnrichedPullRequest {
        // Monday morning to Tuesday afternoon.
        let created = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        let merged = Utc.with_ymd_and_hms(2024, 4, 2, 15, 30, 0).unwrap();
        let bot_reply = Utc.with_ymd_and_hms(2024, 4, 1, 9, 2, 0).unwrap();
        EnrichedPullRequest {
            number: 7,
            title: "Add readiness probe".to_string(),
            creator: "alice".to_string(),
            created_at: created,
            merged_at: merged,
            duration: merged - created,
            quarter: Quarter::Q2,
            year: 2024,
            creation: Moment::of(created),
            merge: Moment::of(merged),
            first_response: Some(Response {
                responder: "ci[bot]".to_string(),
                latency: bot_reply - created,
                moment: Moment::of(bot_reply),
            }),
            first_human_response: None,
            commits: 2,
            commenters: vec![],
            reviewers: vec!["bob".to_string(), "carol".to_string()],
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::zero()), "0s");
        assert_eq!(format_duration(Duration::seconds(12)), "12s");
        assert_eq!(format_duration(Duration::minutes(4)), "4m0s");
        assert_eq!(
            format_duration(Duration::hours(26) + Duration::minutes(3) + Duration::seconds(2)),
            "26h3m2s"
        );
        assert_eq!(format_duration(Duration::seconds(-90)), "-1m30s");
        assert_eq!(format_duration(Duration::milliseconds(1500)), "1.5s");
    }

    #[test]
    fn test_format_sub_second_durations() {
        assert_eq!(format_duration(Duration::milliseconds(500)), "500ms");
        assert_eq!(format_duration(Duration::microseconds(1500)), "1.5ms");
        assert_eq!(format_duration(Duration::nanoseconds(2500)), "2.5µs");
        assert_eq!(format_duration(Duration::nanoseconds(42)), "42ns");
        assert_eq!(format_duration(Duration::milliseconds(-250)), "-250ms");
        assert_eq!(
            format_duration(Duration::hours(1) + Duration::milliseconds(2050)),
            "1h0m2.05s"
        );
    }

    #[test]
    fn test_pr_line_without_human_response() {
        let line = pr_line(&merged_pr());
        assert_eq!(
            line,
            "PR #7: Add readiness probe was created by alice on a Monday in the morning [UTC 06:00-12:00), \
             had a first response by ci[bot] on a Monday in the morning [UTC 06:00-12:00) after 2m0s, \
             did not have a first human response, \
             was merged on a Tuesday in the afternoon [UTC 12:00-17:00) in Q2-2024, took 30h30m0s to merge, \
             included 2 commits, and had 0 review comments by [], reviewed by 2 people [bob carol]"
        );
    }

    #[test]
    fn test_pr_line_with_human_response() {
        let mut pr = merged_pr();
        let reply = Utc.with_ymd_and_hms(2024, 4, 1, 21, 0, 0).unwrap();
        pr.first_human_response = Some(Response {
            responder: "bob".to_string(),
            latency: reply - pr.created_at,
            moment: Moment::of(reply),
        });
        pr.commenters = vec!["bob".to_string()];

        let line = pr_line(&pr);
        assert!(line.contains(
            "had a first human response by bob on a Monday in the night [UTC 20:00-00:00) after 12h0m0s"
        ));
        assert!(line.contains("had 1 review comments by [bob]"));
    }

    #[test]
    fn test_report_layout() {
        let records = vec![merged_pr()];
        let mut out = Vec::new();
        write_report(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 23);
        assert_eq!(lines[0], "Average merge time: 30h30m0s");
        assert_eq!(lines[3], "Average number of comments per PR: 0");
        assert_eq!(lines[4], "Average number of reviewers per PR: 2");
        assert_eq!(lines[10], "Day of the week with the most first human responses: ");
        assert_eq!(
            lines[14],
            "Names of all developers who created, merged, reviewed, commented on, or approved PRs: [alice bob carol]"
        );
        assert_eq!(lines[20], "Top merger: alice");
        assert_eq!(lines[21], SEPARATOR);
        assert!(lines[22].starts_with("PR #7: Add readiness probe"));
    }

    #[test]
    fn test_empty_report() {
        let mut out = Vec::new();
        write_report(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Average merge time: 0s\n"));
        assert!(text.contains("Average number of commits per PR: 0\n"));
        assert!(text.contains("Top reviewer: \n"));
        assert!(text.ends_with(&format!("{SEPARATOR}\n")));
    }
}
