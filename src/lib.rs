//! ClarityCheck follow-up service
//!
//! Generates transparency follow-up questions for a product from its
//! description and structured profile. A text-generation model proposes
//! candidates; a deterministic filter and fallback layer decides what is
//! actually returned.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use claritycheck_followups::{FollowupConfig, FollowupEngine, Product, Profile};
//! use claritycheck_followups::generator::DisabledGenerator;
//! use std::sync::Arc;
//!
//! let engine = FollowupEngine::new(Arc::new(DisabledGenerator), FollowupConfig::default());
//! let product = Product { category: "skincare".into(), ..Default::default() };
//! let questions = engine.generate_followups(&product, &Profile::default()).await;
//! assert_eq!(questions[0].id, "q1");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Product backend (HTTP caller)          │
//! └───────────────────────┬──────────────────────┘
//!                         │ POST /followups
//!                         ▼
//! ┌──────────────────────────────────────────────┐
//! │  server     → axum router                    │
//! │  followups  → FollowupEngine pipeline        │
//! │  filter     → rules, dedupe, fallback fill   │
//! │  generator  → CandidateGenerator oracle      │
//! └──────────────────────────────────────────────┘
//! ```

pub mod categories;
pub mod config;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod followups;
pub mod generator;
pub mod normalize;
pub mod prompt;
pub mod server;
pub mod types;

pub use categories::CategoryBucket;
pub use config::{FollowupConfig, GeneratorConfig};
pub use error::{FollowupError, GenerationError};
pub use followups::{FollowupEngine, FollowupReport, GenerationOutcome};
pub use generator::CandidateGenerator;
pub use types::*;
