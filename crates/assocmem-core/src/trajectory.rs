//! Recorded recall runs

use crate::pattern::BipolarVector;
use serde::Serialize;

/// One recorded network state and its overlap with the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecallStep {
    pub state: BipolarVector,
    pub overlap: f64,
}

/// Why a recall run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Overlap settled (or the state reached a fixed point) at `step`
    Converged { step: usize },
    /// `max_steps` updates were performed without settling
    StepBudgetExhausted,
}

/// Parameters a trajectory was produced with, kept for labelling
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecallParameters {
    pub patterns: usize,
    pub m0: f64,
    pub delta_m: f64,
    pub max_steps: usize,
}

/// Ordered states of one recall run, starting with the corrupted initial
/// state
///
/// Always holds at least one step. Built append-only by
/// [`crate::AssociativeMemory::recall`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecallTrajectory {
    steps: Vec<RecallStep>,
    termination: Termination,
    parameters: RecallParameters,
}

impl RecallTrajectory {
    pub(crate) fn start(parameters: RecallParameters, initial: RecallStep) -> Self {
        Self {
            steps: vec![initial],
            termination: Termination::StepBudgetExhausted,
            parameters,
        }
    }

    pub(crate) fn push(&mut self, step: RecallStep) {
        self.steps.push(step);
    }

    pub(crate) fn finish(&mut self, termination: Termination) {
        self.termination = termination;
    }

    /// Number of recorded steps, initial state included
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[RecallStep] {
        &self.steps
    }

    pub fn get(&self, step: usize) -> Option<&RecallStep> {
        self.steps.get(step)
    }

    /// Overlap at every step
    pub fn overlaps(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.overlap).collect()
    }

    pub fn states(&self) -> impl Iterator<Item = &BipolarVector> + '_ {
        self.steps.iter().map(|s| &s.state)
    }

    pub fn initial_state(&self) -> &BipolarVector {
        &self.steps[0].state
    }

    pub fn final_state(&self) -> &BipolarVector {
        &self.last().state
    }

    pub fn initial_overlap(&self) -> f64 {
        self.steps[0].overlap
    }

    pub fn final_overlap(&self) -> f64 {
        self.last().overlap
    }

    /// Number of synchronous updates recorded after the initial state
    pub fn updates(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn converged(&self) -> bool {
        matches!(self.termination, Termination::Converged { .. })
    }

    pub fn parameters(&self) -> RecallParameters {
        self.parameters
    }

    /// Hand the recorded steps over without copying
    pub fn into_steps(self) -> Vec<RecallStep> {
        self.steps
    }

    pub fn into_states(self) -> Vec<BipolarVector> {
        self.steps.into_iter().map(|s| s.state).collect()
    }

    fn last(&self) -> &RecallStep {
        // `start` guarantees at least one step
        &self.steps[self.steps.len() - 1]
    }
}
