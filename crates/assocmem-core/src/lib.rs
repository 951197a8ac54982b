//! # assocmem-core
//!
//! Classical Hopfield associative memory: store one target bit pattern
//! together with `p - 1` random interference patterns in a coupling matrix,
//! then recall the target from a corrupted copy with synchronous threshold
//! dynamics.
//!
//! ## Pipeline
//!
//! 1. [`PatternEncoder`] turns a grayscale image into a [`BipolarVector`].
//! 2. [`AssociativeMemory::memorize`] builds the [`CouplingMatrix`].
//! 3. [`AssociativeMemory::recall`] corrupts the target to the requested
//!    initial overlap and iterates until the overlap settles, producing a
//!    [`RecallTrajectory`].
//! 4. [`render`] turns the trajectory into frames, CSV and terminal charts.
//!
//! ### Example
//!
//! ```rust
//! use assocmem_core::{AssociativeMemory, BipolarVector, RecallConfig};
//!
//! let target = BipolarVector::new(vec![1, -1, 1, 1, -1, -1, 1, -1]).unwrap();
//! let mut memory = AssociativeMemory::new(target, 1234).unwrap();
//! memory.memorize(1).unwrap();
//!
//! let trajectory = memory.recall(&RecallConfig::new(0.5)).unwrap();
//! assert_eq!(trajectory.final_overlap(), 1.0);
//! ```
//!
//! The engine itself performs no I/O. Everything it produces is exposed as
//! plain owned data.

pub mod config;
pub mod hopfield;
pub mod pattern;
pub mod random;
pub mod render;
pub mod scan;
pub mod trajectory;

pub use config::{MemoryConfig, RecallConfig, RenderConfig, SimulationConfig};
pub use hopfield::{AssociativeMemory, CouplingMatrix, EngineState};
pub use pattern::{BipolarVector, EncodedPattern, PatternEncoder, PatternShape};
pub use random::{RandomSource, SeededSource};
pub use trajectory::{RecallParameters, RecallStep, RecallTrajectory, Termination};

#[derive(Debug, thiserror::Error)]
pub enum AssocMemError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Recall requested before memorization")]
    NotReady,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Pattern source error: {0}")]
    PatternSource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AssocMemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_recall_workflow() {
        let target = BipolarVector::new(vec![1, 1, -1, -1, 1, -1, 1, -1, 1, 1]).unwrap();
        let mut memory = AssociativeMemory::new(target.clone(), 7).unwrap();
        assert_eq!(memory.state(), EngineState::Uninitialized);

        memory.memorize(1).unwrap();
        assert_eq!(memory.state(), EngineState::Memorized);

        let trajectory = memory.recall(&RecallConfig::new(0.6)).unwrap();
        assert_eq!(trajectory.final_state(), &target);
        assert_eq!(memory.state(), EngineState::RecallComplete);
    }

    #[test]
    fn test_error_messages() {
        let err = AssocMemError::InvalidParameter("p must be >= 1".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: p must be >= 1");

        let err = AssocMemError::DimensionMismatch {
            expected: 16,
            actual: 8,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 16, got 8");
    }
}
