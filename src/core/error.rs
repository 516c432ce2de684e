//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Address of a single qubit inside a session, VM or simulator.
/// Addresses are handed out by a [`QubitPool`](crate::pool::QubitPool) and are
/// only meaningful within the context that allocated them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Position of this qubit in a dense bit or amplitude index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Failures raised while building, replaying or verifying reversible circuits.
///
/// None of these are recoverable at runtime: a gate sequence is either
/// well-formed and correct, or construction/verification stops at the first
/// violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevqError {
    /// Malformed gate or instruction request, e.g. a target listed among its own controls.
    #[error("Configuration Error: {message}")]
    Configuration {
        /// Configuration failure message
        message: String,
    },

    /// Qubit budget exhausted, double release, or release out of LIFO order.
    #[error("Resource Error: {message}")]
    Resource {
        /// Resource failure message
        message: String,
    },

    /// A correctness property did not hold: dirty ancilla on release, input
    /// register mutated, wrong output bit, forbidden operation.
    #[error("Invariant Violation: {message}")]
    InvariantViolation {
        /// InvariantViolation failure message
        message: String,
    },

    /// Caller contract violation: widths, sums or patterns outside documented bounds.
    #[error("Invalid Argument: {message}")]
    InvalidArgument {
        /// InvalidArgument failure message
        message: String,
    },

    /// Failure inside the simulation backend itself.
    #[error("Simulation Process Error: {message}")]
    Simulation {
        /// Simulation failure message
        message: String,
    },
}

impl RevqError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        RevqError::Configuration { message: message.into() }
    }

    pub(crate) fn resource(message: impl Into<String>) -> Self {
        RevqError::Resource { message: message.into() }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        RevqError::InvariantViolation { message: message.into() }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        RevqError::InvalidArgument { message: message.into() }
    }

    pub(crate) fn simulation(message: impl Into<String>) -> Self {
        RevqError::Simulation { message: message.into() }
    }
}
