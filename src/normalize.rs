//! Turns a raw chat-completion response into the recommendation contract the
//! frontend consumes.
//!
//! The agent is asked for JSON but usually wraps it in a markdown fence and
//! uses its own field names (`repo_name`, `link`, `issues`). Everything here is
//! a pure function over `serde_json::Value` so each shape check maps to one
//! [`NormalizeError`] variant.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NormalizeError;

pub const FALLBACK_MESSAGE: &str = "Here are some great repositories for you:";
pub const DEFAULT_LANGUAGE: &str = "Unknown";
pub const DEFAULT_DIFFICULTY: &str = "Beginner";

const OPEN_FENCE: &str = "```json";
const CLOSE_FENCE: &str = "```";
const SNIPPET_CHARS: usize = 200;

// ─── Output Types ───────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GoodFirstIssue {
    pub title: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NormalizedRecommendation {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: String,
    pub stars: u32,
    pub difficulty: String,
    pub good_first_issues: Vec<GoodFirstIssue>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NormalizedResponse {
    pub recommendations: Vec<NormalizedRecommendation>,
    pub message: String,
    /// Any other top-level keys the agent returned, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─── Pipeline ───────────────────────────────────────────────────────────────

pub fn normalize(raw: &Value) -> Result<NormalizedResponse, NormalizeError> {
    let content = extract_content(raw)?;
    let payload = strip_fences(content);

    let parsed: Value = serde_json::from_str(payload).map_err(|e| {
        NormalizeError::RecommendationParse {
            reason: e.to_string(),
            snippet: snippet(payload),
        }
    })?;

    let Value::Object(mut object) = parsed else {
        return Err(NormalizeError::RecommendationParse {
            reason: "expected a JSON object".to_string(),
            snippet: snippet(payload),
        });
    };

    let recommendations = match object.remove("recommendations") {
        Some(Value::Array(items)) => items.iter().filter_map(remap_recommendation).collect(),
        _ => Vec::new(),
    };

    let message = match object.remove("message") {
        Some(Value::String(message)) => message,
        _ => FALLBACK_MESSAGE.to_string(),
    };

    Ok(NormalizedResponse {
        recommendations,
        message,
        extra: object,
    })
}

/// `choices[0].message.content`, with a distinct error for each missing level.
pub fn extract_content(raw: &Value) -> Result<&str, NormalizeError> {
    let first = raw
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or(NormalizeError::MissingChoices)?;

    let message = first
        .as_object()
        .and_then(|choice| choice.get("message"))
        .filter(|message| message.is_object())
        .ok_or(NormalizeError::MalformedChoice)?;

    message
        .get("content")
        .and_then(Value::as_str)
        .ok_or(NormalizeError::MissingContent)
}

/// Returns the JSON text inside a "```json" fence, or the whole content when
/// there is no opening fence. An unterminated fence runs to the end.
pub fn strip_fences(content: &str) -> &str {
    let Some(open) = content.find(OPEN_FENCE) else {
        return content.trim();
    };

    let after_marker = &content[open + OPEN_FENCE.len()..];
    let region = after_marker.trim_start_matches(['\r', '\n']);

    match region.find(CLOSE_FENCE) {
        Some(close) => region[..close].trim(),
        None => region.trim(),
    }
}

fn remap_recommendation(item: &Value) -> Option<NormalizedRecommendation> {
    let item = item.as_object()?;

    let good_first_issues = item
        .get("issues")
        .and_then(Value::as_array)
        .map(|issues| issues.iter().filter_map(remap_issue).collect())
        .unwrap_or_default();

    // language, stars and difficulty are fixed even when the agent sends them.
    Some(NormalizedRecommendation {
        name: string_field(item, "repo_name"),
        url: string_field(item, "link"),
        description: string_field(item, "description"),
        language: DEFAULT_LANGUAGE.to_string(),
        stars: 0,
        difficulty: DEFAULT_DIFFICULTY.to_string(),
        good_first_issues,
    })
}

fn remap_issue(issue: &Value) -> Option<GoodFirstIssue> {
    let issue = issue.as_object()?;
    Some(GoodFirstIssue {
        title: string_field(issue, "title"),
        url: string_field(issue, "link"),
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn snippet(text: &str) -> String {
    let mut out: String = text.chars().take(SNIPPET_CHARS).collect();
    if text.chars().count() > SNIPPET_CHARS {
        out.push_str("...");
    }
    out
}
