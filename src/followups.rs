//! Follow-up Question Engine
//!
//! The core of the service: turns a product and its transparency profile
//! into a short list of follow-up questions.
//!
//! ```text
//! profile ─► format_profile ─► build_prompt ─► generator (timeout)
//!                                                  │
//!                      normalize each candidate ◄──┘
//!                                │
//!        QuestionSelector: empty → forbidden → topical → excluded → dedupe
//!                                │
//!                 fallback pools (bucket, then generic)
//!                                │
//!                         q1..qN questions
//! ```
//!
//! The generator is never trusted: errors, timeouts and empty results all
//! degrade to fallback questions.

use crate::categories::CategoryBucket;
use crate::config::FollowupConfig;
use crate::error::GenerationError;
use crate::filter::{QuestionSelector, SelectionStats};
use crate::generator::CandidateGenerator;
use crate::normalize::normalize_candidate;
use crate::prompt::{build_prompt, format_profile};
use crate::types::{FollowupRequest, FollowupsResponse, Product, Profile, Question};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// How the generation call went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// Oracle answered (possibly with zero candidates)
    Ok { candidates: usize },
    /// Oracle failed or timed out; fallback only
    Unavailable { reason: String },
}

/// Full result of one invocation, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct FollowupReport {
    pub request_id: String,
    pub bucket: CategoryBucket,
    pub generation: GenerationOutcome,
    pub stats: SelectionStats,
    pub questions: Vec<Question>,
}

/// The engine that generates follow-up questions
///
/// Holds no mutable state; share it behind an `Arc` across requests.
pub struct FollowupEngine {
    generator: Arc<dyn CandidateGenerator>,
    config: FollowupConfig,
}

impl FollowupEngine {
    pub fn new(generator: Arc<dyn CandidateGenerator>, config: FollowupConfig) -> Self {
        Self {
            generator,
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &FollowupConfig {
        &self.config
    }

    /// Generate at most `target_count` questions for a product
    pub async fn generate_followups(&self, product: &Product, profile: &Profile) -> Vec<Question> {
        self.generate_report(product, profile).await.questions
    }

    /// Handle a decoded request body
    pub async fn respond(&self, request: &FollowupRequest) -> FollowupsResponse {
        self.generate_followups(&request.product, &request.profile)
            .await
            .into()
    }

    /// Same as [`generate_followups`](Self::generate_followups) but keeps
    /// the bucket, generation outcome and filter counters
    pub async fn generate_report(&self, product: &Product, profile: &Profile) -> FollowupReport {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("followups", request_id = %request_id);
        self.run(request_id, product, profile).instrument(span).await
    }

    /// Build the prompt exactly as it will be sent to the generator
    pub fn prompt_for(&self, product: &Product, profile: &Profile) -> String {
        build_prompt(product, &format_profile(profile))
    }

    async fn run(
        &self,
        request_id: String,
        product: &Product,
        profile: &Profile,
    ) -> FollowupReport {
        // 1. Bucket from the raw category string
        let bucket = CategoryBucket::classify(&product.category);

        // 2. Prompt
        let prompt = self.prompt_for(product, profile);

        // 3. Candidates (never fails)
        let (raw_candidates, generation) = self.fetch_candidates(&prompt).await;

        // 4. Normalize + filter
        let mut selector = QuestionSelector::new(
            bucket,
            self.config.target_count,
            self.config.dedupe_threshold,
        );
        selector.offer_all(raw_candidates.iter().map(|raw| normalize_candidate(raw)));

        // 5. Pad from fallback pools
        if !selector.is_full() {
            selector.fill_from_fallback();
        }

        let stats = selector.stats().clone();
        let questions = selector.into_questions();

        info!(
            bucket = %bucket,
            generated = stats.accepted,
            fallback = stats.fallback,
            rejected = stats.candidates - stats.accepted,
            returned = questions.len(),
            "follow-ups ready"
        );

        FollowupReport {
            request_id,
            bucket,
            generation,
            stats,
            questions,
        }
    }

    /// One bounded generation attempt; failures become zero candidates
    async fn fetch_candidates(&self, prompt: &str) -> (Vec<String>, GenerationOutcome) {
        let timeout = self.config.generation_timeout;
        let call = self.generator.generate(
            prompt,
            self.config.max_generated_length,
            self.config.candidate_count(),
        );

        let result = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(timeout)),
        };

        match result {
            Ok(candidates) => {
                let count = candidates.len();
                (candidates, GenerationOutcome::Ok { candidates: count })
            }
            Err(e) => {
                warn!(
                    generator = self.generator.name(),
                    error = %e,
                    "generation unavailable, using fallback questions"
                );
                (
                    Vec::new(),
                    GenerationOutcome::Unavailable {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }
}
