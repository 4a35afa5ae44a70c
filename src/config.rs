//! Pipeline and generator configuration
//!
//! Both configs have sane `Default`s and a `from_env()` that overrides them
//! from environment variables (a `.env` file is loaded by the binary).

use std::time::Duration;
use tracing::warn;

/// Minimum ratio of requested candidates to target questions
pub const MIN_CANDIDATE_MULTIPLIER: usize = 3;

/// Never ask the generator for fewer candidates than this
pub const MIN_CANDIDATES: usize = 10;

/// Largest accepted `target_count`; the fallback pools hold far fewer
pub const MAX_TARGET_COUNT: usize = 50;

/// Largest accepted `candidate_multiplier`
pub const MAX_CANDIDATE_MULTIPLIER: usize = 20;

/// Tunables of the follow-up pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct FollowupConfig {
    /// Output length ceiling
    pub target_count: usize,

    /// Raw candidates requested per target question
    pub candidate_multiplier: usize,

    /// Cap on generator output length (tokens)
    pub max_generated_length: usize,

    /// Similarity at or above which two questions are duplicates
    pub dedupe_threshold: f64,

    /// Upper bound on the generation call
    pub generation_timeout: Duration,
}

impl Default for FollowupConfig {
    fn default() -> Self {
        Self {
            target_count: 5,
            candidate_multiplier: MIN_CANDIDATE_MULTIPLIER,
            max_generated_length: 128,
            dedupe_threshold: 0.75,
            generation_timeout: Duration::from_secs(30),
        }
    }
}

impl FollowupConfig {
    /// Read overrides from `NUM_QUESTIONS`, `CANDIDATE_MULTIPLIER`,
    /// `MAX_LENGTH`, `DEDUPE_THRESHOLD` and `GENERATION_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            target_count: env_parse("NUM_QUESTIONS", defaults.target_count),
            candidate_multiplier: env_parse("CANDIDATE_MULTIPLIER", defaults.candidate_multiplier),
            max_generated_length: env_parse("MAX_LENGTH", defaults.max_generated_length),
            dedupe_threshold: env_parse("DEDUPE_THRESHOLD", defaults.dedupe_threshold),
            generation_timeout: Duration::from_secs(env_parse(
                "GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout.as_secs(),
            )),
        }
        .sanitized()
    }

    /// Clamp values into their usable ranges
    ///
    /// `target_count` lands in `1..=MAX_TARGET_COUNT` and
    /// `candidate_multiplier` in `MIN_CANDIDATE_MULTIPLIER..=MAX_CANDIDATE_MULTIPLIER`.
    pub fn sanitized(mut self) -> Self {
        if self.target_count > MAX_TARGET_COUNT {
            warn!(
                target_count = self.target_count,
                max = MAX_TARGET_COUNT,
                "target count too large, clamping"
            );
        }
        self.target_count = self.target_count.clamp(1, MAX_TARGET_COUNT);
        self.candidate_multiplier = self
            .candidate_multiplier
            .clamp(MIN_CANDIDATE_MULTIPLIER, MAX_CANDIDATE_MULTIPLIER);
        self.max_generated_length = self.max_generated_length.max(1);
        if !(self.dedupe_threshold > 0.0 && self.dedupe_threshold <= 1.0) {
            warn!(
                threshold = self.dedupe_threshold,
                "dedupe threshold out of range, using default"
            );
            self.dedupe_threshold = Self::default().dedupe_threshold;
        }
        self
    }

    /// How many raw candidates to request from the generator
    pub fn candidate_count(&self) -> usize {
        let multiplier = self.candidate_multiplier.max(MIN_CANDIDATE_MULTIPLIER);
        self.target_count
            .saturating_mul(multiplier)
            .max(MIN_CANDIDATES)
    }
}

/// Connection settings for the text-generation API
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model id (default: google/flan-t5-large)
    pub model: String,

    /// Endpoint URL; generation is disabled when unset
    pub api_url: Option<String>,

    /// Bearer token (from environment)
    pub api_key: Option<String>,

    /// Transport-level timeout for one request
    pub request_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "google/flan-t5-large".to_string(),
            api_url: None,
            api_key: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl GeneratorConfig {
    /// Read `AI_MODEL`, `AI_API_URL` and `AI_API_KEY` (or `HF_API_TOKEN`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let model = env_nonempty("AI_MODEL").unwrap_or(defaults.model);
        let api_url = env_nonempty("AI_API_URL").or_else(|| {
            env_nonempty("HF_API_TOKEN")
                .map(|_| format!("https://api-inference.huggingface.co/models/{}", model))
        });
        Self {
            api_url,
            api_key: env_nonempty("AI_API_KEY").or_else(|| env_nonempty("HF_API_TOKEN")),
            model,
            request_timeout: defaults.request_timeout,
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr + Copy + std::fmt::Debug>(key: &str, default: T) -> T {
    match env_nonempty(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, ?default, "unparsable config value, using default");
            default
        }),
    }
}
