// src/verification/metrics.rs

//! Resource accounting over captured instruction streams.

use crate::circuits::Circuit;
use crate::operations::Gate;
use crate::vm::Instruction;
use std::fmt;

/// Weights of the active-volume cost metric.
///
/// A NOT costs `not_weight`, a singly controlled NOT `cnot_weight`, and every
/// control beyond the first adds one `and_weight` (one more logical AND).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    pub not_weight: u64,
    pub cnot_weight: u64,
    pub and_weight: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            not_weight: 1,
            cnot_weight: 4,
            and_weight: 20,
        }
    }
}

impl CostModel {
    pub fn gate_cost(&self, gate: &Gate) -> u64 {
        match gate.control_count() {
            0 => self.not_weight,
            k => self.cnot_weight + (k as u64 - 1) * self.and_weight,
        }
    }

    /// Total cost of every gate in `circuit`.
    pub fn active_volume(&self, circuit: &Circuit) -> u64 {
        circuit.gates().iter().map(|g| self.gate_cost(g)).sum()
    }
}

/// Gate and allocation counts of an instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    /// Uncontrolled NOT gates.
    pub not_gates: usize,
    /// Gates with at least one control.
    pub controlled_gates: usize,
    /// Largest control count of any gate.
    pub max_controls: usize,
    /// `Allocate` instructions, mirrored re-allocations included.
    pub allocations: usize,
    /// Qubits across all `Allocate` instructions.
    pub allocated_qubits: usize,
    /// Most qubits simultaneously held by allocations in the stream.
    pub peak_live_ancillas: usize,
}

impl ResourceCounts {
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let mut counts = ResourceCounts::default();
        let mut live = 0usize;
        for instruction in instructions {
            match instruction {
                Instruction::Gate(gate) => {
                    if gate.control_count() == 0 {
                        counts.not_gates += 1;
                    } else {
                        counts.controlled_gates += 1;
                    }
                    counts.max_controls = counts.max_controls.max(gate.control_count());
                }
                Instruction::Allocate { register } => {
                    counts.allocations += 1;
                    counts.allocated_qubits += register.len();
                    live += register.len();
                    counts.peak_live_ancillas = counts.peak_live_ancillas.max(live);
                }
                Instruction::Release { register } => {
                    live = live.saturating_sub(register.len());
                }
                _ => {}
            }
        }
        counts
    }

    pub fn total_gates(&self) -> usize {
        self.not_gates + self.controlled_gates
    }
}

impl fmt::Display for ResourceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} gates ({} X, {} controlled, max {} controls), {} allocations / {} qubits, peak {} live",
            self.total_gates(),
            self.not_gates,
            self.controlled_gates,
            self.max_controls,
            self.allocations,
            self.allocated_qubits,
            self.peak_live_ancillas
        )
    }
}
