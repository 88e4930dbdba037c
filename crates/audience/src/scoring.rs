//! Interest scoring: user × seller alignment into predicted CTR and CVR.
//!
//! Raw scores are dot products between user and seller embeddings, optionally
//! perturbed with Gaussian noise, then z-normalized over the whole block:
//!
//! ```text
//! Q   = (U·Aᵀ + noise - mean) / (std + 1e-6)
//! CTR = logistic(Q) * base_ctr * diurnal_t
//! CVR = logistic(Q / 2) * base_cvr
//! ```

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

use crate::config::AudienceConfig;
use crate::features::{self, Embeddings};
use crate::generator::OpportunityBatch;

/// Floor added to the block standard deviation before dividing.
pub const STD_EPSILON: f64 = 1e-6;

/// Predicted rates for every (opportunity, seller) pair, row-major by opportunity.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredOpportunities {
    sellers: usize,
    ctr: Vec<f64>,
    cvr: Vec<f64>,
}

impl ScoredOpportunities {
    pub fn len(&self) -> usize {
        if self.sellers == 0 { 0 } else { self.ctr.len() / self.sellers }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sellers(&self) -> usize {
        self.sellers
    }

    /// Predicted CTR of every seller for opportunity `t`.
    pub fn ctr_row(&self, t: usize) -> &[f64] {
        &self.ctr[t * self.sellers..(t + 1) * self.sellers]
    }

    /// Predicted CVR of every seller for opportunity `t`.
    pub fn cvr_row(&self, t: usize) -> &[f64] {
        &self.cvr[t * self.sellers..(t + 1) * self.sellers]
    }
}

/// Score every opportunity in `batch` against every seller embedding.
pub fn score_opportunities(
    batch: &OpportunityBatch,
    sellers: &Embeddings,
    config: &AudienceConfig,
    rng: &mut impl Rng,
) -> ScoredOpportunities {
    let width = sellers.rows();
    let mut q: Vec<f64> = Vec::with_capacity(batch.len() * width);
    for user in batch.user_vectors.iter_rows().take(batch.len()) {
        q.extend(sellers.iter_rows().map(|seller| features::dot(user, seller)));
    }

    if config.noise_std > 0.0 {
        match Normal::new(0.0, config.noise_std) {
            Ok(noise) => q.iter_mut().for_each(|v| *v += noise.sample(rng)),
            Err(err) => warn!(noise_std = config.noise_std, %err, "skipping score noise"),
        }
    }

    z_normalize(&mut q);

    let mut ctr = Vec::with_capacity(q.len());
    let mut cvr = Vec::with_capacity(q.len());
    for (t, row) in q.chunks_exact(width.max(1)).enumerate() {
        let diurnal = batch.diurnal_factors[t];
        for &score in row {
            ctr.push(features::logistic(score) * config.base_ctr * diurnal);
            cvr.push(features::logistic(score / 2.0) * config.base_cvr);
        }
    }

    ScoredOpportunities {
        sellers: width,
        ctr,
        cvr,
    }
}

/// In-place `(x - mean) / (std + ε)` over all entries, using the population std.
fn z_normalize(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std == 0.0 && values.len() > 1 {
        warn!("interest scores have zero variance across the block");
    }
    let denom = std + STD_EPSILON;
    for v in values {
        *v = (*v - mean) / denom;
    }
}
