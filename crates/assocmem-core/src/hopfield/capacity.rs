//! Storage load of a classical Hopfield network
//!
//! Random patterns can be recalled reliably while the load `α = p / n` stays
//! below roughly 0.138 (Amit, Gutfreund and Sompolinsky). Above that the
//! network falls into spurious states and recall plateaus below `m = 1`.

/// Critical load `α_c` for random bipolar patterns
pub const CRITICAL_LOAD: f64 = 0.138;

/// Load ratio `α = p / n`
///
/// # Examples
///
/// ```rust
/// use assocmem_core::hopfield::load_ratio;
///
/// assert_eq!(load_ratio(100, 1000), 0.1);
/// ```
pub fn load_ratio(patterns: usize, units: usize) -> f64 {
    if units == 0 {
        return f64::INFINITY;
    }
    patterns as f64 / units as f64
}

/// Largest pattern count below the critical load for `units` neurons
pub fn theoretical_capacity(units: usize) -> usize {
    (CRITICAL_LOAD * units as f64).floor() as usize
}

/// Whether storing `patterns` patterns overloads a network of `units` neurons
pub fn exceeds_capacity(patterns: usize, units: usize) -> bool {
    load_ratio(patterns, units) > CRITICAL_LOAD
}
