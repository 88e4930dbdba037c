//! Synthetic audience for the auction simulation.
//!
//! This crate provides:
//! - **Features**: unit-norm embeddings and the logistic squash
//! - **Generator**: deterministic user vectors, arrival timestamps and diurnal factors
//! - **Scoring**: block-normalized interest scores turned into predicted CTR/CVR
//!
//! # Architecture
//!
//! A block draws all of its traffic up front, then the auction loop only reads
//! precomputed rows:
//!
//! ```text
//! Block:
//!   1. AudienceGenerator::batch()  → OpportunityBatch     (user vectors, timestamps)
//!   2. AudienceGenerator::score()  → ScoredOpportunities  (ctr/cvr per seller)
//!   3. auction loop reads ctr_row(t) / cvr_row(t)         (no further draws)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use audience::{AudienceConfig, AudienceGenerator, TimeWindow};
//!
//! let mut generator = AudienceGenerator::new(AudienceConfig::default(), 42);
//! let batch = generator.batch(1_000, TimeWindow::from_hours(0, 24));
//! let scored = generator.score(&batch, &seller_embeddings);
//! ```

pub mod config;
pub mod features;
pub mod generator;
pub mod scoring;

pub use config::{AudienceConfig, TimeWindow};
pub use features::{Embeddings, dot, logistic, unit_vector};
pub use generator::{AudienceGenerator, OpportunityBatch, diurnal_factor, generate};
pub use scoring::{ScoredOpportunities, score_opportunities};
