//! Recovery of typed results from loosely formatted model replies.
//!
//! Field names in the reply are trusted; values are not. Scores are clamped,
//! lists are ordered and truncated, and items missing their name are dropped.

use serde_json::{Map, Value};

use crate::error::AnalysisError;
use crate::types::{AnalysisIntent, AnalysisResult, Keyword, Sentiment, Summary, Topic};

pub const MAX_KEYWORDS: usize = 10;
pub const MAX_TOPICS: usize = 5;
pub const MAX_TOPIC_TERMS: usize = 5;

const MIN_RELEVANCE: f64 = 1.0;
const MAX_RELEVANCE: f64 = 100.0;

/// Removes every literal "```json" and "```" marker, trimming before and after.
#[must_use]
pub fn strip_code_fences(content: &str) -> String {
    content
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_owned()
}

/// Strips fences and parses the reply as a JSON object.
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedResponse`] carrying `content` unchanged
/// if the normalized text is not JSON or its top level is not an object.
pub fn parse_content(content: &str) -> Result<Map<String, Value>, AnalysisError> {
    let normalized = strip_code_fences(content);
    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(malformed(
            format!("expected a JSON object, got {}", json_kind(&other)),
            content,
        )),
        Err(e) => Err(malformed(format!("invalid JSON: {e}"), content)),
    }
}

/// Parses a model reply into the result type for `intent`.
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedResponse`] if the reply is not a JSON
/// object, or if a summary reply has no English text.
pub fn parse_result(
    intent: AnalysisIntent,
    content: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let map = parse_content(content)?;
    match intent {
        AnalysisIntent::Summary => parse_summary(&map)
            .map(AnalysisResult::Summary)
            .ok_or_else(|| malformed("summary has no English text".to_owned(), content)),
        AnalysisIntent::Keywords => Ok(AnalysisResult::Keywords {
            keywords: parse_keywords(map.get("keywords")),
        }),
        AnalysisIntent::Topics => Ok(AnalysisResult::Topics {
            topics: parse_topics(map.get("topics")),
            sentiment: parse_sentiment(map.get("sentiment")),
        }),
        AnalysisIntent::Combined => Ok(AnalysisResult::Combined {
            keywords: parse_keywords(map.get("keywords")),
            topics: parse_topics(map.get("topics")),
        }),
    }
}

fn malformed(reason: String, content: &str) -> AnalysisError {
    AnalysisError::MalformedResponse {
        reason,
        content: content.to_owned(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_summary(map: &Map<String, Value>) -> Option<Summary> {
    let english_text = non_blank_str(map.get("english"))?;
    let translated_text =
        non_blank_str(map.get("translated")).unwrap_or_else(|| english_text.clone());
    let detected_language_name = non_blank_str(map.get("detectedLanguage")).unwrap_or_default();
    Some(Summary {
        detected_language_name,
        english_text,
        translated_text,
    })
}

fn parse_keywords(value: Option<&Value>) -> Vec<Keyword> {
    let mut keywords: Vec<Keyword> = array_items(value)
        .filter_map(|item| {
            Some(Keyword {
                word: non_blank_str(item.get("word"))?,
                relevance: clamp_relevance(item.get("relevance")),
            })
        })
        .collect();
    keywords.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

fn parse_topics(value: Option<&Value>) -> Vec<Topic> {
    let mut topics: Vec<Topic> = array_items(value)
        .filter_map(|item| {
            let topic = non_blank_str(item.get("topic"))?;
            let mut keywords: Vec<String> = array_items(item.get("keywords"))
                .filter_map(|term| non_blank_str(Some(term)))
                .collect();
            keywords.truncate(MAX_TOPIC_TERMS);
            Some(Topic {
                topic,
                relevance: clamp_relevance(item.get("relevance")),
                comment_count: floor_count(item.get("commentCount")),
                keywords,
            })
        })
        .collect();
    topics.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    topics.truncate(MAX_TOPICS);
    topics
}

fn parse_sentiment(value: Option<&Value>) -> Option<Sentiment> {
    let obj = value?.as_object()?;
    let component = |key: &str| {
        number(obj.get(key))
            .filter(|n| n.is_finite())
            .map_or(0.0, |n| n.clamp(0.0, 100.0))
    };
    Some(Sentiment {
        positive: component("positive"),
        negative: component("negative"),
        neutral: component("neutral"),
    })
}

fn array_items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flat_map(|items| items.iter())
}

fn non_blank_str(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

/// Accepts JSON numbers and numeric strings such as `"85"`.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Missing or non-numeric relevance counts as the minimum.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_relevance(value: Option<&Value>) -> u8 {
    let raw = number(value)
        .filter(|n| n.is_finite())
        .unwrap_or(MIN_RELEVANCE);
    raw.round().clamp(MIN_RELEVANCE, MAX_RELEVANCE) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_count(value: Option<&Value>) -> u64 {
    match number(value) {
        Some(n) if n.is_finite() && n > 0.0 => n.floor() as u64,
        _ => 0,
    }
}
