use crate::enricher::{EnrichedPullRequest, Moment, Response};
use chrono::Duration;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Every aggregate shown at the top of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub average_merge_time: Duration,
    pub average_time_to_first_human_response: Duration,
    pub average_time_to_first_response: Duration,
    pub average_comment_count: f64,
    pub average_reviewer_count: f64,
    pub average_commit_count: f64,
    pub busiest_creation_day: String,
    pub busiest_creation_time: String,
    pub busiest_merge_day: String,
    pub busiest_merge_time: String,
    pub busiest_first_human_response_day: String,
    pub busiest_first_human_response_time: String,
    pub busiest_first_response_day: String,
    pub busiest_first_response_time: String,
    pub all_participants: Vec<String>,
    pub top_reviewer: String,
    pub top_commenter: String,
    pub top_creator: String,
    pub top_first_human_responder: String,
    pub top_first_responder: String,
    pub top_merger: String,
}

impl Summary {
    pub fn from_records(records: &[EnrichedPullRequest]) -> Self {
        Self {
            average_merge_time: average_merge_time(records),
            average_time_to_first_human_response: average_time_to_first_human_response(records),
            average_time_to_first_response: average_time_to_first_response(records),
            average_comment_count: average_comment_count(records),
            average_reviewer_count: average_reviewer_count(records),
            average_commit_count: average_commit_count(records),
            busiest_creation_day: busiest_creation_day(records),
            busiest_creation_time: busiest_creation_time(records),
            busiest_merge_day: busiest_merge_day(records),
            busiest_merge_time: busiest_merge_time(records),
            busiest_first_human_response_day: busiest_first_human_response_day(records),
            busiest_first_human_response_time: busiest_first_human_response_time(records),
            busiest_first_response_day: busiest_first_response_day(records),
            busiest_first_response_time: busiest_first_response_time(records),
            all_participants: all_participants(records),
            top_reviewer: top_reviewer(records),
            top_commenter: top_commenter(records),
            top_creator: top_creator(records),
            top_first_human_responder: top_first_human_responder(records),
            top_first_responder: top_first_responder(records),
            top_merger: top_merger(records),
        }
    }
}

/// Most frequent value. Ties go to the value seen first.
fn mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut first_seen = Vec::new();

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    // max_by_key keeps the last of equal maxima, so walk backwards.
    first_seen.into_iter().rev().max_by_key(|v| counts[v])
}

fn mode_label<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    mode(values).unwrap_or_default().to_string()
}

fn average_duration<F>(records: &[EnrichedPullRequest], f: F) -> Duration
where
    F: Fn(&EnrichedPullRequest) -> Duration,
{
    if records.is_empty() {
        return Duration::zero();
    }
    let total = records
        .iter()
        .map(f)
        .fold(Duration::zero(), |acc, d| acc + d);
    total / records.len() as i32
}

fn average_count<F>(records: &[EnrichedPullRequest], f: F) -> f64
where
    F: Fn(&EnrichedPullRequest) -> usize,
{
    if records.is_empty() {
        return 0.0;
    }
    let total: usize = records.iter().map(f).sum();
    total as f64 / records.len() as f64
}

fn latency(response: Option<&Response>) -> Duration {
    response.map_or_else(Duration::zero, |r| r.latency)
}

fn first_response_moment(pr: &EnrichedPullRequest) -> Option<Moment> {
    pr.first_response.as_ref().map(|r| r.moment)
}

fn first_human_moments(records: &[EnrichedPullRequest]) -> impl Iterator<Item = Moment> + '_ {
    records
        .iter()
        .filter_map(|pr| pr.first_human_response.as_ref().map(|r| r.moment))
}

pub fn average_merge_time(records: &[EnrichedPullRequest]) -> Duration {
    average_duration(records, |pr| pr.duration)
}

/// Mean time to the first non-bot comment. PRs without one count as zero.
pub fn average_time_to_first_human_response(records: &[EnrichedPullRequest]) -> Duration {
    average_duration(records, |pr| latency(pr.first_human_response.as_ref()))
}

/// Mean time to the first comment from any account. PRs without one count as zero.
pub fn average_time_to_first_response(records: &[EnrichedPullRequest]) -> Duration {
    average_duration(records, |pr| latency(pr.first_response.as_ref()))
}

pub fn average_comment_count(records: &[EnrichedPullRequest]) -> f64 {
    average_count(records, |pr| pr.commenters.len())
}

pub fn average_reviewer_count(records: &[EnrichedPullRequest]) -> f64 {
    average_count(records, |pr| pr.reviewers.len())
}

pub fn average_commit_count(records: &[EnrichedPullRequest]) -> f64 {
    average_count(records, |pr| pr.commits)
}

pub fn busiest_creation_day(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().map(|pr| pr.creation.day_name()))
}

pub fn busiest_creation_time(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().map(|pr| pr.creation.time.label()))
}

pub fn busiest_merge_day(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().map(|pr| pr.merge.day_name()))
}

pub fn busiest_merge_time(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().map(|pr| pr.merge.time.label()))
}

pub fn busiest_first_human_response_day(records: &[EnrichedPullRequest]) -> String {
    mode_label(first_human_moments(records).map(|m| m.day_name()))
}

pub fn busiest_first_human_response_time(records: &[EnrichedPullRequest]) -> String {
    mode_label(first_human_moments(records).map(|m| m.time.label()))
}

/// Day with the most first responses. PRs without a response count as the empty day.
pub fn busiest_first_response_day(records: &[EnrichedPullRequest]) -> String {
    mode_label(
        records
            .iter()
            .map(|pr| first_response_moment(pr).map_or("", |m| m.day_name())),
    )
}

/// Bucket with the most first responses. PRs without a response count as the empty bucket.
pub fn busiest_first_response_time(records: &[EnrichedPullRequest]) -> String {
    mode_label(
        records
            .iter()
            .map(|pr| first_response_moment(pr).map_or("", |m| m.time.label())),
    )
}

/// Distinct creators, commenters and reviewers, sorted.
pub fn all_participants(records: &[EnrichedPullRequest]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for pr in records {
        names.insert(pr.creator.as_str());
        names.extend(pr.commenters.iter().map(String::as_str));
        names.extend(pr.reviewers.iter().map(String::as_str));
    }
    names.into_iter().map(str::to_string).collect()
}

pub fn top_reviewer(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().flat_map(|pr| pr.reviewers.iter().map(String::as_str)))
}

pub fn top_commenter(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().flat_map(|pr| pr.commenters.iter().map(String::as_str)))
}

pub fn top_creator(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().map(|pr| pr.creator.as_str()))
}

pub fn top_first_human_responder(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().filter_map(|pr| {
        pr.first_human_response
            .as_ref()
            .map(|r| r.responder.as_str())
    }))
}

pub fn top_first_responder(records: &[EnrichedPullRequest]) -> String {
    mode_label(records.iter().map(|pr| {
        pr.first_response
            .as_ref()
            .map_or("", |r| r.responder.as_str())
    }))
}

/// Most frequent merger.
///
/// Pull request listings carry no merge actor, so this counts creators and always
/// agrees with [`top_creator`].
pub fn top_merger(records: &[EnrichedPullRequest]) -> String {
    top_creator(records)
}
