// src/operations/mod.rs

//! The closed set of reversible gate primitives.
//!
//! Only two operations exist in the reversible-oracle subset: an unconditional
//! NOT and a NOT conditioned on one or more control qubits all reading 1.
//! Both are self-inverse, which is what lets a recorded computation be undone
//! by replaying it backwards.

use crate::core::{QubitId, RevqError};
use std::collections::HashSet;
use std::fmt;

/// The opcode families a gate can belong to, matched exhaustively by the
/// verification whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Unconditional bit flip (X).
    Not,
    /// Bit flip conditioned on k ≥ 1 controls (CNOT, Toffoli, k-controlled X).
    ControlledNot,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Not => write!(f, "X"),
            Opcode::ControlledNot => write!(f, "CX"),
        }
    }
}

/// A single reversible gate.
///
/// Construct controlled gates through [`Gate::controlled_not`], which rejects
/// malformed control sets; the variants are public for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Flip `target` unconditionally.
    Not {
        /// The flipped qubit.
        target: QubitId,
    },
    /// Flip `target` iff every qubit in `controls` reads 1.
    ControlledNot {
        /// The flipped qubit. Never one of `controls`.
        target: QubitId,
        /// Non-empty, duplicate-free control set.
        controls: Vec<QubitId>,
    },
}

impl Gate {
    /// Plain NOT on `target`.
    pub fn not(target: QubitId) -> Self {
        Gate::Not { target }
    }

    /// NOT on `target` conditioned on all of `controls`.
    ///
    /// An empty control list yields a plain [`Gate::Not`]. A target that also
    /// appears as a control, or a control listed twice, is a
    /// [`RevqError::Configuration`].
    pub fn controlled_not(target: QubitId, controls: Vec<QubitId>) -> Result<Self, RevqError> {
        if controls.is_empty() {
            return Ok(Gate::Not { target });
        }
        let mut seen = HashSet::with_capacity(controls.len());
        for c in &controls {
            if *c == target {
                return Err(RevqError::configuration(format!(
                    "target {} cannot be one of its own controls",
                    target
                )));
            }
            if !seen.insert(*c) {
                return Err(RevqError::configuration(format!(
                    "control {} listed more than once for target {}",
                    c, target
                )));
            }
        }
        Ok(Gate::ControlledNot { target, controls })
    }

    /// The qubit this gate may flip.
    pub fn target(&self) -> QubitId {
        match self {
            Gate::Not { target } | Gate::ControlledNot { target, .. } => *target,
        }
    }

    /// The control qubits; empty for a plain NOT.
    pub fn controls(&self) -> &[QubitId] {
        match self {
            Gate::Not { .. } => &[],
            Gate::ControlledNot { controls, .. } => controls,
        }
    }

    pub fn control_count(&self) -> usize {
        self.controls().len()
    }

    /// Every qubit the gate touches, controls first and target last.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits = self.controls().to_vec();
        qubits.push(self.target());
        qubits
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Gate::Not { .. } => Opcode::Not,
            Gate::ControlledNot { .. } => Opcode::ControlledNot,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Not { target } => write!(f, "X {}", target),
            Gate::ControlledNot { target, controls } => {
                write!(f, "C{}X {} <- [", controls.len(), target)?;
                for (i, c) in controls.iter().enumerate() {
                    write!(f, "{}{}", if i > 0 { ", " } else { "" }, c)?;
                }
                write!(f, "]")
            }
        }
    }
}
