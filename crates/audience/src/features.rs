//! Embedding and squashing helpers.

use rand::Rng;
use rand_distr::StandardNormal;

/// Added to vector norms so a zero draw cannot divide by zero.
const NORM_EPSILON: f64 = 1e-8;

/// Row-major matrix of embedding vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    dim: usize,
    data: Vec<f64>,
}

impl Embeddings {
    /// Draw `rows` standard-normal vectors of length `dim`, each scaled to unit norm.
    pub fn unit(rng: &mut impl Rng, rows: usize, dim: usize) -> Self {
        let mut data = Vec::with_capacity(rows * dim);
        for _ in 0..rows {
            data.extend(unit_vector(rng, dim));
        }
        Self { dim, data }
    }

    /// Build from already-computed rows. All rows must share one length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let dim = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == dim));
        Self {
            dim,
            data: rows.iter().flatten().copied().collect(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn rows(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.dim.max(1))
    }
}

/// One standard-normal vector scaled to unit norm.
pub fn unit_vector(rng: &mut impl Rng, dim: usize) -> Vec<f64> {
    let mut v: Vec<f64> = (0..dim).map(|_| rng.sample(StandardNormal)).collect();
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt() + NORM_EPSILON;
    for x in &mut v {
        *x /= norm;
    }
    v
}

#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Logistic squashing `1 / (1 + e^-x)`.
#[inline]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_unit_rows_have_unit_norm() {
        let mut rng = StdRng::seed_from_u64(3);
        let e = Embeddings::unit(&mut rng, 20, 16);
        assert_eq!(e.rows(), 20);
        for row in e.iter_rows() {
            let norm = dot(row, row).sqrt();
            assert!((norm - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_logistic() {
        assert_eq!(logistic(0.0), 0.5);
        assert!(logistic(10.0) > 0.9999);
        assert!(logistic(-10.0) < 0.0001);
    }

    #[test]
    fn test_from_rows() {
        let e = Embeddings::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(e.rows(), 2);
        assert_eq!(e.row(1), &[0.0, 1.0]);
    }
}
