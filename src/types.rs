//! Core types for the ClarityCheck follow-up service
//!
//! Inputs are loose (every product field optional, profile an arbitrary JSON
//! mapping) because they come straight from the product backend. Outputs are
//! strict: a short ordered list of `Question`s with contiguous ids.

use crate::error::FollowupError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as submitted by the brand
///
/// Missing fields deserialize to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub description: String,
    pub claim: String,
}

/// Structured transparency profile (ingredients, sourcing, certifications, ...)
///
/// Always a JSON object once constructed. Key order of nested mappings is
/// preserved as received.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    /// Validate and unwrap a raw profile payload
    ///
    /// - `null` is an empty profile
    /// - `{"profile": {...}}` (single `profile` key) is unwrapped one level
    /// - anything that is not a mapping after unwrapping is rejected
    pub fn from_value(value: Value) -> Result<Self, FollowupError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(mut map) => {
                if map.len() == 1 && map.contains_key("profile") {
                    match map.remove("profile") {
                        Some(Value::Object(inner)) => Ok(Self(inner)),
                        Some(Value::Null) => Ok(Self::default()),
                        Some(other) => Err(FollowupError::InvalidProfileShape(format!(
                            "wrapped profile must be a mapping, got {}",
                            json_kind(&other)
                        ))),
                        None => Ok(Self::default()),
                    }
                } else {
                    Ok(Self(map))
                }
            }
            other => Err(FollowupError::InvalidProfileShape(format!(
                "profile must be a mapping, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Profile::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Answer type of a follow-up question
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free-text answer
    #[default]
    Text,
}

/// A follow-up question returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    /// Sequential id `q1`, `q2`, ... matching the position in the response
    pub id: String,
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    /// Reserved for multiple-choice questions
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

impl Question {
    /// Build a free-text question at zero-based `position`
    pub fn text(position: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("q{}", position + 1),
            text: text.into(),
            kind: QuestionKind::Text,
            options: None,
        }
    }
}

/// Request body for follow-up generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowupRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: Product,
    #[serde(default)]
    pub profile: Profile,
}

/// Response body: the ordered questions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowupsResponse {
    pub questions: Vec<Question>,
}

impl From<Vec<Question>> for FollowupsResponse {
    fn from(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
