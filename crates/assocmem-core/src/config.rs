//! Configuration for memorization, recall and rendering
//!
//! Every section has a `Default` matching the reference experiment and a
//! `validate` that rejects out-of-range values instead of clamping them.

use crate::{AssocMemError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 1234;

// ---------------------------------------------------------------------------
// Memorization
// ---------------------------------------------------------------------------

/// How many patterns to store and how to seed the interference draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Total number of stored patterns `p`, the target included
    pub patterns: usize,
    /// Seed for interference generation and corruption sampling
    pub seed: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            patterns: 1,
            seed: DEFAULT_SEED,
        }
    }
}

impl MemoryConfig {
    pub fn new(patterns: usize) -> Self {
        Self {
            patterns,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.patterns == 0 {
            return Err(AssocMemError::InvalidParameter(
                "pattern count p must be >= 1 (the target itself is always stored)".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Recall
// ---------------------------------------------------------------------------

/// Initial overlap, convergence tolerance and step budget for one recall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// Target overlap of the corrupted initial state, in `[-1, 1]`
    pub m0: f64,
    /// Stop once consecutive overlaps differ by at most this much
    pub delta_m: f64,
    /// Upper bound on synchronous updates
    pub max_steps: usize,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            m0: 1.0,
            delta_m: 1e-3,
            max_steps: 100,
        }
    }
}

impl RecallConfig {
    pub fn new(m0: f64) -> Self {
        Self {
            m0,
            ..Self::default()
        }
    }

    pub fn with_delta_m(mut self, delta_m: f64) -> Self {
        self.delta_m = delta_m;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.m0.is_finite() || !(-1.0..=1.0).contains(&self.m0) {
            return Err(AssocMemError::InvalidParameter(format!(
                "initial overlap m0 must be in [-1, 1], got {}",
                self.m0
            )));
        }
        if !self.delta_m.is_finite() || self.delta_m <= 0.0 {
            return Err(AssocMemError::InvalidParameter(format!(
                "convergence tolerance delta_m must be > 0, got {}",
                self.delta_m
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Output canvas for rendered frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_width: 1920,
            frame_height: 1080,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(AssocMemError::InvalidParameter(format!(
                "frame size must be non-zero, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

/// Everything needed for one encode → memorize → recall → render run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub memory: MemoryConfig,
    pub recall: RecallConfig,
    pub render: RenderConfig,
}

impl SimulationConfig {
    /// Parse a TOML document; missing sections and keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AssocMemError::Config(e.to_string()))
    }

    /// Load and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AssocMemError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.memory.validate()?;
        self.recall.validate()?;
        self.render.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
