//! Hugging Face–style text-generation API client
//!
//! Sends one request asking for `num_return_sequences` sampled completions
//! and reads back `[{"generated_text": ...}, ...]`.

use super::CandidateGenerator;
use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Generator backed by a remote inference endpoint
#[derive(Debug, Clone)]
pub struct InferenceApiGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
    api_url: String,
}

impl InferenceApiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let api_url = config.api_url.clone().ok_or_else(|| {
            GenerationError::Unavailable("AI_API_URL not set".to_string())
        })?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            api_url,
        })
    }

    fn request_body(prompt: &str, max_length: usize, num_candidates: usize) -> Value {
        serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": max_length,
                "num_return_sequences": num_candidates,
                "do_sample": true,
                "return_full_text": false
            },
            "options": {
                "wait_for_model": true
            }
        })
    }
}

#[async_trait]
impl CandidateGenerator for InferenceApiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_length: usize,
        num_candidates: usize,
    ) -> Result<Vec<String>, GenerationError> {
        let mut request = self
            .client
            .post(&self.api_url)
            .header("content-type", "application/json")
            .json(&Self::request_body(prompt, max_length, num_candidates));

        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let api_response = request.send().await?;
        let status = api_response.status();
        if !status.is_success() {
            let body = api_response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = api_response.json().await?;
        let candidates = parse_generations(&response_json)?;
        debug!(
            model = %self.config.model,
            requested = num_candidates,
            received = candidates.len(),
            "inference API returned candidates"
        );
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "inference-api"
    }
}

/// Extract completions from an API payload
///
/// Accepts a list of `{"generated_text": ...}` objects (or bare strings);
/// items of any other shape are skipped. An `{"error": ...}` object is an
/// API error.
pub fn parse_generations(payload: &Value) -> Result<Vec<String>, GenerationError> {
    match payload {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("generated_text")
                    .and_then(Value::as_str)
                    .map(String::from),
                _ => None,
            })
            .collect()),
        Value::Object(obj) => match obj.get("error") {
            Some(err) => Err(GenerationError::Api {
                status: 200,
                body: err.as_str().map(String::from).unwrap_or_else(|| err.to_string()),
            }),
            None => obj
                .get("generated_text")
                .and_then(Value::as_str)
                .map(|s| vec![s.to_string()])
                .ok_or_else(|| {
                    GenerationError::InvalidResponse("missing generated_text".to_string())
                }),
        },
        other => Err(GenerationError::InvalidResponse(format!(
            "unexpected payload: {}",
            other
        ))),
    }
}
