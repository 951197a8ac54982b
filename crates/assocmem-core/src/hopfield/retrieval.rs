//! Corruption, overlap and the synchronous update rule

use super::coupling::CouplingMatrix;
use crate::pattern::BipolarVector;
use crate::random::RandomSource;

/// Overlap `m = (ξ⁰ · s) / n`, in `[-1, 1]`
///
/// # Examples
///
/// ```rust
/// use assocmem_core::BipolarVector;
/// use assocmem_core::hopfield::overlap;
///
/// let target = BipolarVector::new(vec![1, 1, -1, -1]).unwrap();
/// assert_eq!(overlap(&target, &target), 1.0);
/// assert_eq!(overlap(&target, &target.negated()), -1.0);
/// ```
pub fn overlap(target: &BipolarVector, state: &BipolarVector) -> f64 {
    target.dot(state) as f64 / target.len() as f64
}

/// Number of units to flip so that the expected initial overlap is `m0`
///
/// `floor(n * (1 - m0) / 2)`, truncated rather than rounded.
pub fn flip_count(n: usize, m0: f64) -> usize {
    let k = (n as f64 * (1.0 - m0) / 2.0).floor();
    if k <= 0.0 {
        0
    } else {
        (k as usize).min(n)
    }
}

/// Copy of `target` with `flip_count(n, m0)` distinct units inverted
pub fn corrupt<S: RandomSource + ?Sized>(
    target: &BipolarVector,
    m0: f64,
    source: &mut S,
) -> BipolarVector {
    let k = flip_count(target.len(), m0);
    let indices = source.distinct_indices(target.len(), k);
    target.flipped(&indices)
}

/// One synchronous step: `s'[i] = +1 if (J·s)[i] >= 0 else -1`, every unit
/// computed from the previous state
pub fn synchronous_update(coupling: &CouplingMatrix, state: &BipolarVector) -> BipolarVector {
    BipolarVector::from_fields(&coupling.local_fields(state))
}
