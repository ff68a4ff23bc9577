//! Reply parsing and per-task normalisation.
//!
//! The model's reply is free text. It is first reduced to a [`ParsedReply`]; a parsed
//! reply is then mapped field-by-field into [`AnalysisResult`], with an explicit default
//! for every field the model may omit or mistype.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::warn;

use crate::analysis::models::{AnalysisResult, AnalysisTask, ParameterScore};
use crate::llm_client::strip_json_fences;

/// Outcome of reading the model's raw reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Parsed(Value),
    /// The reply was not valid JSON; holds the untouched raw text.
    ParseError(String),
}

pub fn parse_reply(raw: &str) -> ParsedReply {
    match serde_json::from_str::<Value>(strip_json_fences(raw)) {
        Ok(value) => ParsedReply::Parsed(value),
        Err(e) => {
            warn!("Failed to parse JSON from model reply: {e}");
            ParsedReply::ParseError(raw.to_string())
        }
    }
}

/// Maps a reply into the uniform result for `task`.
pub fn normalize(task: AnalysisTask, reply: ParsedReply) -> AnalysisResult {
    let value = match reply {
        ParsedReply::Parsed(value) => value,
        ParsedReply::ParseError(raw) => {
            return AnalysisResult::message(format!(
                "Error processing response: Failed to parse JSON. Raw: {raw}"
            ));
        }
    };

    match task {
        AnalysisTask::ResumeCritique => map_feedback_reply(value, "No feedback provided."),
        AnalysisTask::ResumeSuggestions => map_feedback_reply(value, "Suggestions for your resume:"),
        AnalysisTask::PercentageMatch => map_match_reply(value),
        AnalysisTask::AtsScore => map_ats_reply(value),
        AnalysisTask::MockInterviewQuestions => map_interview_reply(value),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Expected reply shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedbackReply {
    #[serde(deserialize_with = "lenient::text")]
    feedback: Option<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    suggestions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MatchReply {
    #[serde(deserialize_with = "lenient::score")]
    match_score: Option<u32>,
    #[serde(deserialize_with = "lenient::text")]
    feedback: Option<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    matching_elements: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::string_list")]
    missing_elements: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AtsReply {
    #[serde(deserialize_with = "lenient::score")]
    overall_score: Option<u32>,
    /// Older reply shape: a percentage or a label such as "Medium".
    #[serde(deserialize_with = "lenient::text")]
    ats_score: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    feedback: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    parameter_breakdown: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient::string_list")]
    suggestions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParameterReply {
    #[serde(deserialize_with = "lenient::text")]
    parameter_name: Option<String>,
    #[serde(deserialize_with = "lenient::score")]
    score: Option<u32>,
    #[serde(deserialize_with = "lenient::text")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    feedback: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    recommendation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InterviewReply {
    #[serde(deserialize_with = "lenient::string_list")]
    questions: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::text")]
    feedback: Option<String>,
}

/// Field-level leniency lives in `lenient`; a root that is not an object at all
/// degrades to the all-defaults shape.
fn read_shape<T: DeserializeOwned + Default>(value: Value) -> T {
    // Derived struct visitors also accept arrays positionally; only objects are meaningful here.
    if !value.is_object() {
        warn!("Model reply was not a JSON object");
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("Model reply had an unexpected shape: {e}");
        T::default()
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Per-task mapping
// ────────────────────────────────────────────────────────────────────────────

fn map_feedback_reply(value: Value, default_feedback: &str) -> AnalysisResult {
    let reply: FeedbackReply = read_shape(value);
    AnalysisResult {
        feedback: reply
            .feedback
            .unwrap_or_else(|| default_feedback.to_string()),
        suggestions: Some(reply.suggestions.unwrap_or_default()),
        ..Default::default()
    }
}

fn map_match_reply(value: Value) -> AnalysisResult {
    let reply: MatchReply = read_shape(value);

    let score_label = reply
        .match_score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let detail = reply
        .feedback
        .unwrap_or_else(|| "No detailed feedback.".to_string());

    let mut suggestions = Vec::new();
    if let Some(matching) = reply.matching_elements {
        suggestions.push(format!("Matching: {}", matching.join(", ")));
    }
    if let Some(missing) = reply.missing_elements {
        suggestions.push(format!("Missing: {}", missing.join(", ")));
    }

    AnalysisResult {
        feedback: format!("Match Score: {score_label}%\n\n{detail}"),
        suggestions: Some(suggestions),
        overall_score: reply.match_score,
        detailed_breakdown: None,
    }
}

fn map_ats_reply(value: Value) -> AnalysisResult {
    let reply: AtsReply = read_shape(value);

    let overall_score = reply
        .overall_score
        .or_else(|| reply.ats_score.as_deref().and_then(lenient::parse_score));
    let detail = reply
        .feedback
        .unwrap_or_else(|| "No detailed feedback.".to_string());
    // A purely categorical estimate has nowhere else to go.
    let feedback = match (&overall_score, &reply.ats_score) {
        (None, Some(label)) => format!("ATS Score Estimate: {label}\n\n{detail}"),
        _ => detail,
    };

    let detailed_breakdown = reply.parameter_breakdown.map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| map_parameter(i, entry))
            .collect()
    });

    AnalysisResult {
        feedback,
        suggestions: Some(reply.suggestions.unwrap_or_default()),
        overall_score,
        detailed_breakdown,
    }
}

fn map_parameter(index: usize, entry: Value) -> ParameterScore {
    let reply: ParameterReply = read_shape(entry);
    ParameterScore {
        parameter_name: reply
            .parameter_name
            .unwrap_or_else(|| format!("Parameter {}", index + 1)),
        score: reply.score,
        status: reply.status,
        feedback: reply.feedback.unwrap_or_default(),
        recommendation: reply.recommendation,
    }
}

fn map_interview_reply(value: Value) -> AnalysisResult {
    let reply: InterviewReply = read_shape(value);
    let questions = reply
        .questions
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| vec!["No questions generated.".to_string()]);
    AnalysisResult {
        feedback: reply
            .feedback
            .unwrap_or_else(|| "Generated questions:".to_string()),
        suggestions: Some(questions),
        ..Default::default()
    }
}

/// Deserializers that never fail: a field of the wrong type reads as absent.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Value>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => Some(items),
            _ => None,
        })
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        Ok(list(d)?.map(|items| {
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        }))
    }

    pub fn score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64().map(clamp_score),
            Value::String(s) => parse_score(&s),
            _ => None,
        })
    }

    /// Reads "75", "75%" or "75.4 %" as a 0 – 100 score.
    pub fn parse_score(s: &str) -> Option<u32> {
        s.trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(clamp_score)
    }

    fn clamp_score(v: f64) -> u32 {
        v.round().clamp(0.0, 100.0) as u32
    }
}
