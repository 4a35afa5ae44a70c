//! Candidate filtering, deduplication and fallback fill
//!
//! Rules run in a fixed order and stop at the first failure:
//!
//! ```text
//! 1. empty        → Empty
//! 2. forbidden    → Forbidden   (meta / identity questions)
//! 3. no topic     → OffTopic    (no transparency keyword)
//! 4. excluded     → Excluded    (bucket-specific terms)
//! 5. near-dup     → Duplicate   (vs. everything accepted so far)
//! ```
//!
//! Duplicate detection is last because it is the only pairwise check.

use crate::categories::CategoryBucket;
use crate::fallback;
use crate::normalize::is_near_duplicate;
use crate::types::Question;
use serde::Serialize;
use tracing::debug;

/// Lowercase substrings that disqualify a question outright
pub const FORBIDDEN_PATTERNS: &[&str] = &[
    "any other",
    "what else",
    "other questions",
    "anything else",
    "can i ask",
    "what can i ask",
    "manufactur",
    "who made",
    "who makes",
    "brand name",
    "batch number",
    "lot number",
    "product name",
];

/// A question is on-topic when it contains one of these
pub const TOPICAL_KEYWORDS: &[&str] = &[
    "ingredient",
    "sourc",
    "supplier",
    "origin",
    "trace",
    "test",
    "certif",
    "allergen",
    "process",
    "pesticide",
    "farming",
    "fertili",
    "harvest",
    "complian",
    "safety",
    "purity",
    "potency",
    "packaging",
    "recycl",
    "sustainab",
    "quality",
    "stability",
    "contaminant",
    "rohs",
    "audit",
    "provenance",
];

/// Short keywords that only count at the start of a word ("lab" vs "available")
pub const TOPICAL_WORD_PREFIXES: &[&str] = &["lab", "coa"];

/// Why a candidate was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Empty,
    Forbidden,
    OffTopic,
    Excluded,
    Duplicate,
}

pub fn is_forbidden(question: &str) -> bool {
    let lower = question.to_lowercase();
    FORBIDDEN_PATTERNS.iter().any(|p| lower.contains(p))
}

pub fn is_topical(question: &str) -> bool {
    let lower = question.to_lowercase();
    TOPICAL_KEYWORDS.iter().any(|k| lower.contains(k))
        || lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| TOPICAL_WORD_PREFIXES.iter().any(|p| word.starts_with(p)))
}

/// First bucket-excluded term found in `question`, if any
pub fn excluded_term(question: &str, bucket: CategoryBucket) -> Option<&'static str> {
    let lower = question.to_lowercase();
    bucket
        .excluded_terms()
        .iter()
        .copied()
        .find(|term| lower.contains(term))
}

/// Counters for one selection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    pub candidates: usize,
    pub accepted: usize,
    pub empty: usize,
    pub forbidden: usize,
    pub off_topic: usize,
    pub excluded: usize,
    pub duplicate: usize,
    pub fallback: usize,
}

impl SelectionStats {
    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Empty => self.empty += 1,
            Rejection::Forbidden => self.forbidden += 1,
            Rejection::OffTopic => self.off_topic += 1,
            Rejection::Excluded => self.excluded += 1,
            Rejection::Duplicate => self.duplicate += 1,
        }
    }
}

/// Accumulates accepted questions for one invocation
///
/// The accepted list doubles as the "seen" set for duplicate checks;
/// similarity is case-insensitive so no separate lowercase copy is kept.
pub struct QuestionSelector {
    bucket: CategoryBucket,
    target: usize,
    threshold: f64,
    accepted: Vec<String>,
    stats: SelectionStats,
}

impl QuestionSelector {
    pub fn new(bucket: CategoryBucket, target: usize, threshold: f64) -> Self {
        Self {
            bucket,
            target,
            threshold,
            accepted: Vec::new(),
            stats: SelectionStats::default(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.accepted.len() >= self.target
    }

    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }

    pub fn stats(&self) -> &SelectionStats {
        &self.stats
    }

    /// Run the full rule chain without mutating state
    pub fn check(&self, candidate: &str) -> Result<(), Rejection> {
        if candidate.trim().is_empty() {
            return Err(Rejection::Empty);
        }
        if is_forbidden(candidate) {
            return Err(Rejection::Forbidden);
        }
        if !is_topical(candidate) {
            return Err(Rejection::OffTopic);
        }
        if excluded_term(candidate, self.bucket).is_some() {
            return Err(Rejection::Excluded);
        }
        if is_near_duplicate(candidate, &self.accepted, self.threshold) {
            return Err(Rejection::Duplicate);
        }
        Ok(())
    }

    /// Offer one normalized generated candidate
    pub fn offer(&mut self, candidate: &str) -> Result<(), Rejection> {
        self.stats.candidates += 1;
        match self.check(candidate) {
            Ok(()) => {
                self.accepted.push(candidate.trim().to_string());
                self.stats.accepted += 1;
                Ok(())
            }
            Err(rejection) => {
                debug!(candidate, ?rejection, "candidate rejected");
                self.stats.record(rejection);
                Err(rejection)
            }
        }
    }

    /// Offer candidates in order until the target is reached
    pub fn offer_all<I, S>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for candidate in candidates {
            if self.is_full() {
                break;
            }
            let _ = self.offer(candidate.as_ref());
        }
    }

    /// Pad from the bucket pool, then the generic pool, dedupe-only
    ///
    /// One pass is enough: the accepted set only grows, so an entry rejected
    /// once stays rejected. Returns how many fallback questions were added;
    /// falling short of the target here is allowed.
    pub fn fill_from_fallback(&mut self) -> usize {
        let start = self.accepted.len();
        let mut pools = vec![fallback::pool(self.bucket)];
        if self.bucket != CategoryBucket::Generic {
            pools.push(fallback::pool(CategoryBucket::Generic));
        }

        for entry in pools.iter().flat_map(|p| p.iter()) {
            if self.is_full() {
                break;
            }
            if !is_near_duplicate(entry, &self.accepted, self.threshold) {
                self.accepted.push((*entry).to_string());
            }
        }

        let added = self.accepted.len() - start;
        self.stats.fallback += added;
        if !self.is_full() {
            debug!(
                bucket = %self.bucket,
                have = self.accepted.len(),
                target = self.target,
                "fallback pools exhausted"
            );
        }
        added
    }

    /// Final questions with ids `q1..qN`
    pub fn into_questions(self) -> Vec<Question> {
        self.accepted
            .into_iter()
            .take(self.target)
            .enumerate()
            .map(|(i, text)| Question::text(i, text))
            .collect()
    }
}
