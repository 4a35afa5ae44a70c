//! Candidate generation: the text-generation oracle boundary
//!
//! The pipeline only sees [`CandidateGenerator`]. Production uses the
//! HTTP-backed [`InferenceApiGenerator`]; tests and offline runs use
//! [`StaticGenerator`] or [`DisabledGenerator`].

pub mod inference_api;

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use inference_api::InferenceApiGenerator;

/// Source of raw question candidates
///
/// Implementations may fail or return fewer than `num_candidates` items;
/// callers treat both as "fewer candidates", never as fatal.
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        max_length: usize,
        num_candidates: usize,
    ) -> Result<Vec<String>, GenerationError>;

    /// Short label for logs
    fn name(&self) -> &str;
}

/// Returns a fixed list of candidates, truncated to the requested count
#[derive(Debug, Clone, Default)]
pub struct StaticGenerator {
    candidates: Vec<String>,
}

impl StaticGenerator {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl CandidateGenerator for StaticGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _max_length: usize,
        num_candidates: usize,
    ) -> Result<Vec<String>, GenerationError> {
        Ok(self.candidates.iter().take(num_candidates).cloned().collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Generation switched off: every call yields zero candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl CandidateGenerator for DisabledGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _max_length: usize,
        _num_candidates: usize,
    ) -> Result<Vec<String>, GenerationError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Pick a generator for `config`: HTTP when an endpoint is configured,
/// disabled (fallback-only) otherwise
pub fn from_config(
    config: &GeneratorConfig,
) -> Result<Arc<dyn CandidateGenerator>, GenerationError> {
    match config.api_url {
        Some(_) => {
            let generator = InferenceApiGenerator::new(config.clone())?;
            info!(model = %config.model, "using inference API generator");
            Ok(Arc::new(generator))
        }
        None => {
            info!("no AI_API_URL configured, serving fallback questions only");
            Ok(Arc::new(DisabledGenerator))
        }
    }
}
