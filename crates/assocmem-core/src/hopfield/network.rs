//! Associative memory engine: memorize one target, recall it from noise

use super::capacity;
use super::coupling::CouplingMatrix;
use super::retrieval::{corrupt, overlap, synchronous_update};
use crate::config::RecallConfig;
use crate::pattern::BipolarVector;
use crate::random::{RandomSource, SeededSource};
use crate::trajectory::{RecallParameters, RecallStep, RecallTrajectory, Termination};
use crate::{AssocMemError, Result};
use tracing::{debug, trace, warn};

/// Lifecycle of an [`AssociativeMemory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No coupling matrix yet
    Uninitialized,
    /// Coupling matrix built, no recall run since
    Memorized,
    /// Inside [`AssociativeMemory::recall`]
    RecallInProgress,
    /// Last recall finished; its trajectory is available
    RecallComplete,
}

/// Classical Hopfield associative memory holding one target pattern
///
/// Owns the target, its seeded random stream, the coupling matrix and the
/// trajectory of the most recent recall.
///
/// # Examples
///
/// ```rust
/// use assocmem_core::{AssociativeMemory, BipolarVector, RecallConfig};
///
/// let target = BipolarVector::ones(16);
/// let mut memory = AssociativeMemory::new(target, 1234).unwrap();
/// memory.memorize(1).unwrap();
///
/// let trajectory = memory
///     .recall(&RecallConfig::new(1.0).with_delta_m(1e-4))
///     .unwrap();
///
/// // The uncorrupted target is already a fixed point
/// assert_eq!(trajectory.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AssociativeMemory<S: RandomSource = SeededSource> {
    target: BipolarVector,
    source: S,
    patterns: usize,
    coupling: Option<CouplingMatrix>,
    trajectory: Option<RecallTrajectory>,
    state: EngineState,
}

impl AssociativeMemory<SeededSource> {
    /// Create a memory for `target` whose random draws are seeded by `seed`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the target is empty.
    pub fn new(target: BipolarVector, seed: u64) -> Result<Self> {
        Self::with_source(target, SeededSource::new(seed))
    }

    pub fn seed(&self) -> u64 {
        self.source.seed()
    }
}

impl<S: RandomSource> AssociativeMemory<S> {
    /// Create a memory drawing from an injected random source
    pub fn with_source(target: BipolarVector, source: S) -> Result<Self> {
        if target.is_empty() {
            return Err(AssocMemError::InvalidParameter(
                "target pattern must have at least one unit".to_string(),
            ));
        }

        Ok(Self {
            target,
            source,
            patterns: 0,
            coupling: None,
            trajectory: None,
            state: EngineState::Uninitialized,
        })
    }

    /// Build the coupling matrix from the target and `patterns - 1` random
    /// interference patterns
    ///
    /// The random source is rewound first, so memorizing again with the same
    /// `patterns` reproduces the same matrix. Any previous matrix and
    /// trajectory are replaced.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `patterns == 0`. On error the engine is left
    /// exactly as it was.
    pub fn memorize(&mut self, patterns: usize) -> Result<&CouplingMatrix> {
        if patterns == 0 {
            return Err(AssocMemError::InvalidParameter(
                "pattern count p must be >= 1 (the target itself is always stored)".to_string(),
            ));
        }

        let n = self.target.len();
        self.source.reset();
        let interference: Vec<BipolarVector> = (1..patterns)
            .map(|_| BipolarVector::random(n, &mut self.source))
            .collect();

        let coupling = CouplingMatrix::hebbian(&self.target, &interference);
        debug!(
            units = n,
            patterns,
            load = capacity::load_ratio(patterns, n),
            "memorized coupling matrix"
        );
        if capacity::exceeds_capacity(patterns, n) {
            debug!(
                capacity = capacity::theoretical_capacity(n),
                "pattern load above critical capacity, recall may plateau"
            );
        }

        self.patterns = patterns;
        self.trajectory = None;
        self.state = EngineState::Memorized;
        Ok(&*self.coupling.insert(coupling))
    }

    /// Corrupt the target to initial overlap `m0` and run synchronous updates
    /// until the overlap settles or `max_steps` updates have been made
    ///
    /// The run stops as soon as `|m_t - m_{t-1}| <= delta_m`, keeping step
    /// `t`. An update that reproduces the current state exactly is a fixed
    /// point: it ends the run as converged and is not recorded again. The
    /// previous trajectory is discarded.
    ///
    /// # Errors
    ///
    /// `NotReady` before [`memorize`](Self::memorize); `InvalidParameter` if
    /// the configuration is out of range. Nothing is modified on error.
    pub fn recall(&mut self, config: &RecallConfig) -> Result<&RecallTrajectory> {
        let coupling = self.coupling.as_ref().ok_or(AssocMemError::NotReady)?;
        config.validate()?;

        self.state = EngineState::RecallInProgress;

        let initial = corrupt(&self.target, config.m0, &mut self.source);
        let initial_overlap = overlap(&self.target, &initial);
        let parameters = RecallParameters {
            patterns: self.patterns,
            m0: config.m0,
            delta_m: config.delta_m,
            max_steps: config.max_steps,
        };
        let mut trajectory = RecallTrajectory::start(
            parameters,
            RecallStep {
                state: initial,
                overlap: initial_overlap,
            },
        );

        let mut termination = Termination::StepBudgetExhausted;
        for _ in 0..config.max_steps {
            let next = synchronous_update(coupling, trajectory.final_state());
            if &next == trajectory.final_state() {
                termination = Termination::Converged {
                    step: trajectory.updates(),
                };
                break;
            }

            let next_overlap = overlap(&self.target, &next);
            let delta = (next_overlap - trajectory.final_overlap()).abs();
            trajectory.push(RecallStep {
                state: next,
                overlap: next_overlap,
            });
            trace!(
                step = trajectory.updates(),
                overlap = next_overlap,
                delta,
                "synchronous update"
            );

            if delta <= config.delta_m {
                termination = Termination::Converged {
                    step: trajectory.updates(),
                };
                break;
            }
        }
        trajectory.finish(termination);

        match termination {
            Termination::Converged { step } => debug!(
                step,
                m0 = config.m0,
                final_overlap = trajectory.final_overlap(),
                "recall converged"
            ),
            Termination::StepBudgetExhausted if config.max_steps > 0 => warn!(
                max_steps = config.max_steps,
                final_overlap = trajectory.final_overlap(),
                "recall stopped at step budget without converging"
            ),
            Termination::StepBudgetExhausted => {}
        }

        self.state = EngineState::RecallComplete;
        Ok(&*self.trajectory.insert(trajectory))
    }

    /// Move the last trajectory out of the engine
    pub fn take_trajectory(&mut self) -> Option<RecallTrajectory> {
        self.trajectory.take()
    }

    pub fn trajectory(&self) -> Option<&RecallTrajectory> {
        self.trajectory.as_ref()
    }

    pub fn coupling(&self) -> Option<&CouplingMatrix> {
        self.coupling.as_ref()
    }

    pub fn target(&self) -> &BipolarVector {
        &self.target
    }

    /// Number of units `n`
    pub fn units(&self) -> usize {
        self.target.len()
    }

    /// `p` of the last successful memorization, 0 before any
    pub fn patterns(&self) -> usize {
        self.patterns
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
