//! Aggregate statistics over a collected comment set.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::comments::Comment;

const TOP_AUTHORS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Calendar month in `YYYY-MM` form (UTC).
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentStats {
    pub top_authors: Vec<AuthorCount>,
    pub monthly: Vec<MonthlyCount>,
}

/// Computes the most active authors and the per-month comment volume.
///
/// Authors are ordered by count descending, ties broken by name so the
/// output is stable. Months are ordered chronologically.
#[must_use]
pub fn comment_stats(comments: &[Comment]) -> CommentStats {
    let mut by_author: HashMap<&str, usize> = HashMap::new();
    let mut by_month: BTreeMap<String, usize> = BTreeMap::new();

    for comment in comments {
        *by_author.entry(comment.author.as_str()).or_default() += 1;
        let month = comment.published_at.format("%Y-%m").to_string();
        *by_month.entry(month).or_default() += 1;
    }

    let mut top_authors: Vec<AuthorCount> = by_author
        .into_iter()
        .map(|(author, count)| AuthorCount {
            author: author.to_string(),
            count,
        })
        .collect();
    top_authors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.author.cmp(&b.author)));
    top_authors.truncate(TOP_AUTHORS);

    let monthly = by_month
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect();

    CommentStats {
        top_authors,
        monthly,
    }
}
