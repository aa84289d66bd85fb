use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which analysis to request from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisIntent {
    /// Language detection plus an English summary and its translation.
    Summary,
    /// Top keywords with relevance scores.
    Keywords,
    /// Topic clusters with per-topic terms and overall sentiment.
    Topics,
    /// Keywords and topics from a single completion.
    Combined,
}

impl AnalysisIntent {
    pub const ALL: [AnalysisIntent; 4] = [
        AnalysisIntent::Summary,
        AnalysisIntent::Keywords,
        AnalysisIntent::Topics,
        AnalysisIntent::Combined,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisIntent::Summary => "summary",
            AnalysisIntent::Keywords => "keywords",
            AnalysisIntent::Topics => "topics",
            AnalysisIntent::Combined => "combined",
        }
    }
}

impl fmt::Display for AnalysisIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        AnalysisIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == lowered)
            .ok_or_else(|| {
                format!("unknown analysis intent '{s}' (expected summary, keywords, topics, or combined)")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub comment_texts: Vec<String>,
    pub intent: AnalysisIntent,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(intent: AnalysisIntent, comment_texts: Vec<String>) -> Self {
        Self {
            comment_texts,
            intent,
        }
    }
}

/// Serialized with the field names the browser client already reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    #[serde(rename = "detectedLanguage")]
    pub detected_language_name: String,
    #[serde(rename = "english")]
    pub english_text: String,
    #[serde(rename = "translated")]
    pub translated_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub word: String,
    /// Always within `1..=100`.
    pub relevance: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub topic: String,
    /// Always within `1..=100`.
    pub relevance: u8,
    pub comment_count: u64,
    /// Three to five associated terms, as many as the model supplied up to five.
    pub keywords: Vec<String>,
}

/// Percentages as reported by the model, each clamped to `0..=100`.
/// Their sum is only approximately 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentiment {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "lowercase")]
pub enum AnalysisResult {
    Summary(Summary),
    Keywords {
        keywords: Vec<Keyword>,
    },
    Topics {
        topics: Vec<Topic>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sentiment: Option<Sentiment>,
    },
    Combined {
        keywords: Vec<Keyword>,
        topics: Vec<Topic>,
    },
}

impl AnalysisResult {
    #[must_use]
    pub fn intent(&self) -> AnalysisIntent {
        match self {
            AnalysisResult::Summary(_) => AnalysisIntent::Summary,
            AnalysisResult::Keywords { .. } => AnalysisIntent::Keywords,
            AnalysisResult::Topics { .. } => AnalysisIntent::Topics,
            AnalysisResult::Combined { .. } => AnalysisIntent::Combined,
        }
    }
}
