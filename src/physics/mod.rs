// src/physics/mod.rs
pub mod oxidation;

pub use oxidation::{assign_oxidation_states, OxidationError};
