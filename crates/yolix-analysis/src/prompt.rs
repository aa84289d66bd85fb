//! Prompt templates, one per [`AnalysisIntent`].
//!
//! Each template pairs a system persona with a task description that embeds
//! the exact JSON shape the model must return. Comment texts are appended
//! last, one per line.

use crate::types::AnalysisIntent;

struct PromptTemplate {
    system: &'static str,
    task: &'static str,
}

const SUMMARY: PromptTemplate = PromptTemplate {
    system: "You are a multilingual comment analysis expert. Respond only with valid JSON.",
    task: r#"Analyze these comments and:
1. Determine the predominant language of the comments
2. Generate a concise summary in English focusing on main themes, sentiments, and key points
3. Translate the English summary to the predominant language

Return ONLY a raw JSON object starting with { and ending with }, with no code block markers or other text.
The JSON must follow this exact format:
{
  "detectedLanguage": "language name in English (e.g. English, Spanish, Persian)",
  "english": "the English summary",
  "translated": "summary translated to the predominant language"
}"#,
};

const KEYWORDS: PromptTemplate = PromptTemplate {
    system: "You are a keyword analysis expert. Respond only with valid JSON.",
    task: r#"Analyze these comments and provide a list of the top 10 most relevant keywords with their relevance scores (1-100), sorted by relevance in descending order.

Return the result in this exact JSON format:
{
  "keywords": [
    {
      "word": "keyword",
      "relevance": number between 1-100
    }
  ]
}

Only include the 10 keywords with highest relevance scores.
Sort keywords by relevance score from highest to lowest."#,
};

const TOPICS: PromptTemplate = PromptTemplate {
    system: "You are a topic analysis expert. Respond only with valid JSON.",
    task: r#"Analyze these comments and provide:
1. A list of main topics discussed (max 5 topics)
2. For each topic:
   - Calculate its relevance (1-100)
   - Count how many comments mention it
   - List 3-5 key terms associated with it
3. Overall sentiment analysis as percentages (positive, negative, neutral)

Return the result in this exact JSON format:
{
  "topics": [
    {
      "topic": "topic name",
      "relevance": number between 1-100,
      "commentCount": number of comments mentioning this topic,
      "keywords": ["keyword1", "keyword2", "keyword3"]
    }
  ],
  "sentiment": {
    "positive": number,
    "negative": number,
    "neutral": number
  }
}"#,
};

const COMBINED: PromptTemplate = PromptTemplate {
    system: "You are a comment analysis expert. Respond only with valid JSON.",
    task: r#"Analyze these comments and provide:
1. A list of keywords with their relevance scores (1-100)
2. A list of main topics discussed (max 5 topics)
   For each topic:
   - Calculate its relevance (1-100)
   - Count how many comments mention it
   - List 3-5 key terms associated with it

Return the result in this exact JSON format:
{
  "keywords": [
    {
      "word": "keyword",
      "relevance": number between 1-100
    }
  ],
  "topics": [
    {
      "topic": "topic name",
      "relevance": number between 1-100,
      "commentCount": number of comments mentioning this topic,
      "keywords": ["keyword1", "keyword2", "keyword3"]
    }
  ]
}

Ensure that the JSON is valid and does not contain any invalid characters, duplicate fields, or other formatting issues."#,
};

fn template(intent: AnalysisIntent) -> &'static PromptTemplate {
    match intent {
        AnalysisIntent::Summary => &SUMMARY,
        AnalysisIntent::Keywords => &KEYWORDS,
        AnalysisIntent::Topics => &TOPICS,
        AnalysisIntent::Combined => &COMBINED,
    }
}

/// The system message sent ahead of the user instruction.
#[must_use]
pub fn system_prompt(intent: AnalysisIntent) -> &'static str {
    template(intent).system
}

/// Builds the user instruction: task, schema, then the newline-joined comments.
#[must_use]
pub fn build_prompt(intent: AnalysisIntent, comment_texts: &[String]) -> String {
    format!(
        "{}\n\nComments:\n{}",
        template(intent).task,
        comment_texts.join("\n")
    )
}
