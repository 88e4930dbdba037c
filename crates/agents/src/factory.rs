//! Seller construction for one block.

use audience::{Embeddings, unit_vector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use types::{STREAM_POLICY, SimConfig, derive_seed};

use crate::seller::SellerAgent;

/// Build one agent per configured seller, in config order.
///
/// Embeddings are drawn in order from a single stream seeded with `seed`. Each
/// seller's policy randomness gets its own stream derived from `seed`, the
/// seller's configured seed and its position.
pub fn make_sellers(config: &SimConfig, seed: u64) -> Vec<SellerAgent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dim = config.world.embedding_dim;
    let policy_base = derive_seed(seed, STREAM_POLICY);

    config
        .sellers
        .iter()
        .enumerate()
        .map(|(index, seller)| {
            let embedding = unit_vector(&mut rng, dim);
            let policy_seed = derive_seed(policy_base ^ seller.seed, index as u64);
            SellerAgent::new(seller, embedding, StdRng::seed_from_u64(policy_seed))
        })
        .collect()
}

/// Stack seller embeddings into the matrix the scorer consumes.
pub fn embedding_matrix(sellers: &[SellerAgent]) -> Embeddings {
    let rows: Vec<Vec<f64>> = sellers.iter().map(|s| s.embedding().to_vec()).collect();
    Embeddings::from_rows(&rows)
}
