// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod register;
pub mod state;

// Re-export public types for convenient access via `revq::core::TypeName`
pub use error::{QubitId, RevqError};
pub use register::Register;
pub use state::{AmplitudeState, BitState};

pub mod constants;
pub use constants::revq_constants::{
    DEFAULT_MAX_EXHAUSTIVE_INPUTS, DEFAULT_QUBIT_CAPACITY, MAX_AMPLITUDE_QUBITS,
};
