//! CSV export of collected comments.
//!
//! Output is UTF-8 with a leading byte-order mark so spreadsheet tools pick
//! the right encoding for non-Latin comment text.

use chrono::NaiveDate;

use crate::comments::Comment;

const BOM: char = '\u{FEFF}';

const HEADERS: [&str; 7] = [
    "Comment",
    "Author",
    "Date",
    "Registration Date",
    "Registration Time",
    "Likes",
    "Replies",
];

/// Renders comments as a BOM-prefixed CSV document.
///
/// Text, author, and timestamp columns are always quoted with embedded quotes
/// doubled; the numeric columns are written bare.
#[must_use]
pub fn comments_to_csv(comments: &[Comment]) -> String {
    let mut lines = Vec::with_capacity(comments.len() + 1);
    lines.push(HEADERS.join(","));

    for comment in comments {
        let published = comment.published_at;
        let row = [
            quote(&comment.text),
            quote(&comment.author),
            quote(&published.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            quote(&published.format("%Y-%m-%d").to_string()),
            quote(&published.format("%H:%M:%S").to_string()),
            comment.like_count.to_string(),
            comment.reply_count.to_string(),
        ];
        lines.push(row.join(","));
    }

    let mut out = String::new();
    out.push(BOM);
    out.push_str(&lines.join("\n"));
    out
}

/// Download filename for an export produced on `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("youtube-comments-{}.csv", date.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
