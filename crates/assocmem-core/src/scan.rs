//! Parameter scans over random targets
//!
//! Sweeps either the initial overlap `m0` of one memorized network, or the
//! pattern count `p` across freshly built networks. Each point keeps the
//! full overlap series of its recall run.

use crate::config::RecallConfig;
use crate::hopfield::AssociativeMemory;
use crate::pattern::BipolarVector;
use crate::random::SeededSource;
use crate::trajectory::Termination;
use crate::{AssocMemError, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Display;
use tracing::info;

/// Offset applied to the scan seed when drawing the random target, so the
/// target and the first interference pattern come from different streams
const TARGET_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Overlap series of one recall run, labelled with the swept parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapSeries<T> {
    pub parameter: T,
    pub overlaps: Vec<f64>,
    pub termination: Termination,
}

impl<T> OverlapSeries<T> {
    pub fn final_overlap(&self) -> f64 {
        self.overlaps.last().copied().unwrap_or(f64::NAN)
    }

    /// Synchronous updates performed
    pub fn updates(&self) -> usize {
        self.overlaps.len().saturating_sub(1)
    }
}

/// Random target of `units` components for scans seeded with `seed`
pub fn random_target(units: usize, seed: u64) -> BipolarVector {
    BipolarVector::random(units, &mut SeededSource::new(seed.wrapping_add(TARGET_STREAM)))
}

/// Memorize `patterns` patterns once, then recall from every `m0` in order
///
/// `recall.m0` is ignored; each entry of `m0s` replaces it. Recalls share
/// the engine's random stream, so the whole scan is reproducible from
/// `seed`.
pub fn initial_overlap(
    units: usize,
    patterns: usize,
    seed: u64,
    m0s: &[f64],
    recall: &RecallConfig,
) -> Result<Vec<OverlapSeries<f64>>> {
    let mut memory = AssociativeMemory::new(random_target(units, seed), seed)?;
    memory.memorize(patterns)?;

    let mut series = Vec::with_capacity(m0s.len());
    for &m0 in m0s {
        let config = RecallConfig { m0, ..*recall };
        let trajectory = memory.recall(&config)?;
        info!(
            m0,
            final_overlap = trajectory.final_overlap(),
            steps = trajectory.updates(),
            "scan point"
        );
        series.push(OverlapSeries {
            parameter: m0,
            overlaps: trajectory.overlaps(),
            termination: trajectory.termination(),
        });
    }
    Ok(series)
}

/// Build one network per entry of `pattern_counts` and recall the same
/// target from `recall.m0`
///
/// Networks are independent and run in parallel; results come back in input
/// order and are identical to a sequential run.
pub fn pattern_count(
    units: usize,
    pattern_counts: &[usize],
    seed: u64,
    recall: &RecallConfig,
) -> Result<Vec<OverlapSeries<usize>>> {
    recall.validate()?;
    let target = random_target(units, seed);

    pattern_counts
        .par_iter()
        .map(|&patterns| -> Result<OverlapSeries<usize>> {
            let mut memory = AssociativeMemory::new(target.clone(), seed)?;
            memory.memorize(patterns)?;
            let trajectory = memory.recall(recall)?;
            info!(
                patterns,
                final_overlap = trajectory.final_overlap(),
                steps = trajectory.updates(),
                "scan point"
            );
            Ok(OverlapSeries {
                parameter: patterns,
                overlaps: trajectory.overlaps(),
                termination: trajectory.termination(),
            })
        })
        .collect()
}

/// Evenly spaced values `from, from + step, ...` strictly below `to`
///
/// The count is `ceil((to - from) / step)`, so `0.0..1.0` by `0.1` yields
/// ten values ending at `0.9`.
pub fn float_range(from: f64, to: f64, step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) || !from.is_finite() || !to.is_finite() {
        return Err(AssocMemError::InvalidParameter(format!(
            "range step must be a positive finite number, got {}",
            step
        )));
    }
    if to <= from {
        return Ok(Vec::new());
    }

    let count = ((to - from) / step).ceil() as usize;
    Ok((0..count).map(|i| from + step * i as f64).collect())
}

/// Long-format CSV of scan results: `parameter,step,overlap`
pub fn series_csv<T: Display>(series: &[OverlapSeries<T>]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["parameter", "step", "overlap"])
        .map_err(std::io::Error::from)?;
    for s in series {
        for (step, overlap) in s.overlaps.iter().enumerate() {
            wtr.write_record([s.parameter.to_string(), step.to_string(), overlap.to_string()])
                .map_err(std::io::Error::from)?;
        }
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| AssocMemError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
