//! Classical Hopfield associative memory
//!
//! Hebbian storage of one target pattern plus random interference patterns,
//! recalled with synchronous sign updates.
//!
//! ## Components
//!
//! - [`AssociativeMemory`]: the engine and its lifecycle
//! - [`CouplingMatrix`]: Hebbian coupling matrix (diagonal kept)
//! - [`retrieval`]: corruption, overlap and the update rule
//! - [`capacity`]: storage load and critical capacity

mod capacity;
mod coupling;
mod network;
mod retrieval;

pub use capacity::{exceeds_capacity, load_ratio, theoretical_capacity, CRITICAL_LOAD};
pub use coupling::CouplingMatrix;
pub use network::{AssociativeMemory, EngineState};
pub use retrieval::{corrupt, flip_count, overlap, synchronous_update};

#[cfg(test)]
mod tests;
