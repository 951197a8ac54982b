//! Behavioural tests for memorization and recall

use super::*;
use crate::config::RecallConfig;
use crate::pattern::BipolarVector;
use crate::random::{RandomSource, SeededSource};
use crate::trajectory::Termination;
use crate::AssocMemError;

/// Deterministic source: cycles through `spins` and always picks the lowest
/// indices for corruption
struct ScriptedSource {
    spins: Vec<i8>,
    cursor: usize,
    resets: usize,
}

impl ScriptedSource {
    fn new(spins: Vec<i8>) -> Self {
        Self {
            spins,
            cursor: 0,
            resets: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn reset(&mut self) {
        self.cursor = 0;
        self.resets += 1;
    }

    fn spin(&mut self) -> i8 {
        let value = self.spins[self.cursor % self.spins.len()];
        self.cursor += 1;
        value
    }

    fn distinct_indices(&mut self, _length: usize, amount: usize) -> Vec<usize> {
        (0..amount).collect()
    }
}

fn mixed_target(n: usize) -> BipolarVector {
    let values = (0..n)
        .map(|i| if (i * 7 + i / 3) % 5 < 2 { 1 } else { -1 })
        .collect();
    BipolarVector::new(values).unwrap()
}

#[test]
fn test_single_pattern_matrix_is_normalized_outer_product() {
    for n in [1, 2, 7, 16, 37] {
        let xi0 = BipolarVector::random(n, &mut SeededSource::new(n as u64));
        let mut memory = AssociativeMemory::new(xi0.clone(), 1234).unwrap();
        let j = memory.memorize(1).unwrap();

        for a in 0..n {
            for b in 0..n {
                let expected =
                    f64::from(xi0.as_slice()[a]) * f64::from(xi0.as_slice()[b]) / n as f64;
                assert_eq!(j.get(a, b), expected, "n={} entry ({}, {})", n, a, b);
            }
        }
    }
}

#[test]
fn test_scripted_interference_matrix() {
    let xi0 = BipolarVector::new(vec![1, 1, -1, -1, 1, -1, 1, -1]).unwrap();
    let x1 = vec![1, -1, -1, 1, 1, 1, -1, -1];
    let mut memory =
        AssociativeMemory::with_source(xi0.clone(), ScriptedSource::new(x1.clone())).unwrap();
    let j = memory.memorize(2).unwrap().clone();

    for a in 0..8 {
        for b in 0..8 {
            let sum = i32::from(xi0.as_slice()[a] * xi0.as_slice()[b]) + i32::from(x1[a] * x1[b]);
            assert_eq!(j.get(a, b), f64::from(sum) / 8.0);
        }
    }
    assert!(j.is_symmetric());
    assert_eq!(memory.source().resets, 1);
}

#[test]
fn test_scripted_corruption_uses_source_indices() {
    let xi0 = mixed_target(16);
    let mut memory =
        AssociativeMemory::with_source(xi0.clone(), ScriptedSource::new(vec![1])).unwrap();
    memory.memorize(1).unwrap();

    // k = floor(16 * 0.5 / 2) = 4
    let trajectory = memory.recall(&RecallConfig::new(0.5)).unwrap();
    assert_eq!(trajectory.initial_state(), &xi0.flipped(&[0, 1, 2, 3]));
    assert_eq!(trajectory.initial_overlap(), 0.5);
}

#[test]
fn test_determinism_across_engines() {
    let xi0 = mixed_target(64);
    let config = RecallConfig::new(0.3).with_delta_m(1e-4);

    let mut a = AssociativeMemory::new(xi0.clone(), 2024).unwrap();
    let mut b = AssociativeMemory::new(xi0, 2024).unwrap();

    assert_eq!(a.memorize(6).unwrap(), b.memorize(6).unwrap());
    let ta = a.recall(&config).unwrap().clone();
    let tb = b.recall(&config).unwrap().clone();
    assert_eq!(ta, tb);
}

#[test]
fn test_seed_changes_interference() {
    let xi0 = mixed_target(64);
    let mut a = AssociativeMemory::new(xi0.clone(), 1).unwrap();
    let mut b = AssociativeMemory::new(xi0, 2).unwrap();
    assert_ne!(a.memorize(5).unwrap(), b.memorize(5).unwrap());
}

#[test]
fn test_all_ones_target_terminates_immediately() {
    let mut memory = AssociativeMemory::new(BipolarVector::ones(16), 1234).unwrap();
    memory.memorize(1).unwrap();

    let trajectory = memory
        .recall(
            &RecallConfig::new(1.0)
                .with_delta_m(1e-4)
                .with_max_steps(100),
        )
        .unwrap();

    assert_eq!(trajectory.len(), 1);
    assert_eq!(trajectory.termination(), Termination::Converged { step: 0 });
    assert_eq!(trajectory.final_overlap(), 1.0);
}

#[test]
fn test_m0_one_starts_at_target() {
    let xi0 = mixed_target(50);
    let mut memory = AssociativeMemory::new(xi0.clone(), 8).unwrap();
    memory.memorize(3).unwrap();

    let trajectory = memory.recall(&RecallConfig::new(1.0)).unwrap();
    assert_eq!(trajectory.initial_state(), &xi0);
    assert_eq!(trajectory.initial_overlap(), 1.0);
}

#[test]
fn test_m0_minus_one_starts_at_inverse() {
    let xi0 = mixed_target(50);
    let mut memory = AssociativeMemory::new(xi0.clone(), 8).unwrap();
    memory.memorize(3).unwrap();

    let trajectory = memory.recall(&RecallConfig::new(-1.0)).unwrap();
    assert_eq!(trajectory.initial_state(), &xi0.negated());
    assert_eq!(trajectory.initial_overlap(), -1.0);
}

#[test]
fn test_inverse_is_a_fixed_point_for_single_pattern() {
    let xi0 = mixed_target(32);
    let mut memory = AssociativeMemory::new(xi0.clone(), 3).unwrap();
    memory.memorize(1).unwrap();

    let trajectory = memory.recall(&RecallConfig::new(-1.0)).unwrap();
    assert_eq!(trajectory.len(), 1);
    assert_eq!(trajectory.final_state(), &xi0.negated());
    assert!(trajectory.converged());
}

#[test]
fn test_single_update_then_fixed_point() {
    let xi0 = mixed_target(16);
    let mut memory = AssociativeMemory::new(xi0.clone(), 3).unwrap();
    memory.memorize(1).unwrap();

    // m = 0.5 -> first update restores the target, second reproduces it
    let trajectory = memory.recall(&RecallConfig::new(0.5)).unwrap();
    assert_eq!(trajectory.len(), 2);
    assert_eq!(trajectory.overlaps(), vec![0.5, 1.0]);
    assert_eq!(trajectory.final_state(), &xi0);
    assert_eq!(trajectory.termination(), Termination::Converged { step: 1 });
}

#[test]
fn test_loose_tolerance_stops_after_first_update() {
    let xi0 = mixed_target(16);
    let mut memory = AssociativeMemory::new(xi0, 3).unwrap();
    memory.memorize(1).unwrap();

    let trajectory = memory
        .recall(&RecallConfig::new(0.5).with_delta_m(1.0))
        .unwrap();
    assert_eq!(trajectory.len(), 2);
    assert_eq!(trajectory.termination(), Termination::Converged { step: 1 });
}

#[test]
fn test_low_load_recall_reaches_target() {
    let n = 400;
    let xi0 = BipolarVector::random(n, &mut SeededSource::new(77));
    let mut memory = AssociativeMemory::new(xi0, 1234).unwrap();
    memory.memorize(5).unwrap();

    let trajectory = memory.recall(&RecallConfig::new(0.6)).unwrap();
    assert!(trajectory.converged());
    assert!(
        trajectory.final_overlap() > 0.99,
        "final overlap: {}",
        trajectory.final_overlap()
    );
}

#[test]
fn test_trajectory_bounds_under_heavy_load() {
    let n = 64;
    for seed in 0..10 {
        let xi0 = BipolarVector::random(n, &mut SeededSource::new(1000 + seed));
        let mut memory = AssociativeMemory::new(xi0, seed).unwrap();
        memory.memorize(40).unwrap();

        for max_steps in [0, 1, 3, 25] {
            let config = RecallConfig::new(0.1)
                .with_delta_m(1e-9)
                .with_max_steps(max_steps);
            let trajectory = memory.recall(&config).unwrap();

            assert!(trajectory.len() <= max_steps + 1);
            for m in trajectory.overlaps() {
                assert!((-1.0..=1.0).contains(&m), "overlap out of range: {}", m);
            }
        }
    }
}

#[test]
fn test_no_duplicate_consecutive_states() {
    let n = 64;
    let xi0 = BipolarVector::random(n, &mut SeededSource::new(5));
    let mut memory = AssociativeMemory::new(xi0, 5).unwrap();
    memory.memorize(12).unwrap();

    let trajectory = memory
        .recall(&RecallConfig::new(0.2).with_delta_m(1e-9))
        .unwrap()
        .clone();
    for pair in trajectory.steps().windows(2) {
        assert_ne!(pair[0].state, pair[1].state);
    }

    // A converged run by fixed point stays put under further updates
    if let Termination::Converged { .. } = trajectory.termination() {
        let last = trajectory.final_state().clone();
        let coupling = memory.coupling().unwrap();
        let next = synchronous_update(coupling, &last);
        if next == last {
            assert_eq!(synchronous_update(coupling, &next), last);
            assert_eq!(overlap(memory.target(), &next), trajectory.final_overlap());
        }
    }
}

#[test]
fn test_recall_resets_trajectory() {
    let xi0 = mixed_target(32);
    let mut memory = AssociativeMemory::new(xi0, 11).unwrap();
    memory.memorize(2).unwrap();

    let first_len = memory.recall(&RecallConfig::new(0.5)).unwrap().len();
    let second = memory
        .recall(&RecallConfig::new(1.0).with_max_steps(0))
        .unwrap();
    assert_eq!(second.len(), 1);
    assert!(first_len >= 1);
    assert_eq!(second.parameters().max_steps, 0);
}

#[test]
fn test_recall_streams_continue_after_memorize() {
    // Both engines consume the same stream in the same order
    let xi0 = mixed_target(48);
    let config = RecallConfig::new(0.0);

    let mut a = AssociativeMemory::new(xi0.clone(), 31).unwrap();
    a.memorize(2).unwrap();
    let a1 = a.recall(&config).unwrap().initial_state().clone();
    let a2 = a.recall(&config).unwrap().initial_state().clone();

    let mut b = AssociativeMemory::new(xi0, 31).unwrap();
    b.memorize(2).unwrap();
    let b1 = b.recall(&config).unwrap().initial_state().clone();
    let b2 = b.recall(&config).unwrap().initial_state().clone();

    assert_eq!(a1, b1);
    assert_eq!(a2, b2);
}

#[test]
fn test_not_ready_and_invalid_parameters() {
    let mut memory = AssociativeMemory::new(mixed_target(8), 1).unwrap();
    assert!(matches!(
        memory.recall(&RecallConfig::new(0.5)),
        Err(AssocMemError::NotReady)
    ));
    assert!(matches!(
        memory.memorize(0),
        Err(AssocMemError::InvalidParameter(_))
    ));

    memory.memorize(1).unwrap();
    assert!(matches!(
        memory.recall(&RecallConfig::new(0.5).with_delta_m(0.0)),
        Err(AssocMemError::InvalidParameter(_))
    ));
    assert!(matches!(
        memory.recall(&RecallConfig::new(-1.2)),
        Err(AssocMemError::InvalidParameter(_))
    ));
}

#[test]
fn test_diagonal_kept_in_engine_matrix() {
    let mut memory = AssociativeMemory::new(mixed_target(20), 4).unwrap();
    let j = memory.memorize(6).unwrap();
    for i in 0..20 {
        assert_eq!(j.get(i, i), 6.0 / 20.0);
    }
}
