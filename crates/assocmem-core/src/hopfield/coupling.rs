//! Hebbian coupling matrix
//!
//! `J = (ξ⁰ξ⁰ᵀ + XᵀX) / n`, where the rows of `X` are the interference
//! patterns. Products are accumulated as integers and divided once, so the
//! matrix is exact up to that single division and independent of summation
//! order.
//!
//! The diagonal is left as produced by the outer products (`p / n` on every
//! entry). Textbook Hopfield networks zero it; this model does not, and
//! zeroing it changes the recall dynamics.

use crate::pattern::BipolarVector;
use rayon::prelude::*;

/// Dense `n × n` coupling matrix, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingMatrix {
    dim: usize,
    weights: Vec<f64>,
}

impl CouplingMatrix {
    /// Sum of the target's self-coupling and every interference pattern's
    /// outer product, normalized by `n`
    ///
    /// All patterns must have the target's length.
    pub(crate) fn hebbian(target: &BipolarVector, interference: &[BipolarVector]) -> Self {
        let dim = target.len();
        let norm = dim as f64;
        let mut weights = vec![0.0; dim * dim];

        weights
            .par_chunks_mut(dim.max(1))
            .enumerate()
            .for_each(|(i, row)| {
                let mut acc: Vec<i64> = target
                    .iter()
                    .map(|xj| i64::from(target.as_slice()[i] * xj))
                    .collect();

                for pattern in interference {
                    let xi = i64::from(pattern.as_slice()[i]);
                    for (a, xj) in acc.iter_mut().zip(pattern.iter()) {
                        *a += xi * i64::from(xj);
                    }
                }

                for (w, a) in row.iter_mut().zip(acc) {
                    *w = a as f64 / norm;
                }
            });

        Self { dim, weights }
    }

    /// Matrix dimension `n`
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `J[i][j]`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.dim && j < self.dim, "index ({}, {}) out of range", i, j);
        self.weights[i * self.dim + j]
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[f64] {
        &self.weights[i * self.dim..(i + 1) * self.dim]
    }

    /// Row-major backing storage
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Local fields `h = J · s`
    ///
    /// Rows are evaluated in parallel; each row is a sequential sum, so the
    /// result does not depend on the thread count.
    pub fn local_fields(&self, state: &BipolarVector) -> Vec<f64> {
        assert_eq!(state.len(), self.dim, "state length mismatch");
        self.weights
            .par_chunks(self.dim.max(1))
            .map(|row| {
                row.iter()
                    .zip(state.iter())
                    .map(|(w, s)| w * f64::from(s))
                    .sum::<f64>()
            })
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.dim).all(|i| (i + 1..self.dim).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Hopfield energy `E(s) = -½ sᵀ J s`
    pub fn energy(&self, state: &BipolarVector) -> f64 {
        let fields = self.local_fields(state);
        -0.5 * fields
            .iter()
            .zip(state.iter())
            .map(|(h, s)| h * f64::from(s))
            .sum::<f64>()
    }
}
