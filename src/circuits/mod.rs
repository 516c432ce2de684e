// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! reversible gates (`revq::operations::Gate`).
//!
//! A `Circuit` is the "gate sequence" of an oracle: immutable once built and
//! independent of the classical input it will later be replayed on.

use crate::core::{QubitId, RevqError};
use crate::operations::Gate;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Represents an ordered sequence of gates applied to a set of qubits.
///
/// Because every gate is self-inverse, the inverse of a circuit is the same
/// gates in reverse order (see [`Circuit::inverse`]).
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// The unique set of qubits touched across all gates.
    qubits: HashSet<QubitId>,

    /// The ordered sequence of gates.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            qubits: HashSet::new(),
            gates: Vec::new(),
        }
    }

    /// Appends a gate, registering the qubits it touches.
    pub fn add_gate(&mut self, gate: Gate) {
        self.qubits.extend(gate.qubits());
        self.gates.push(gate);
    }

    /// Appends every gate from an iterator.
    pub fn add_gates<I>(&mut self, gates: I)
    where
        I: IntoIterator<Item = Gate>,
    {
        for gate in gates {
            self.add_gate(gate);
        }
    }

    /// Returns a reference to the set of qubits involved in this circuit.
    pub fn qubits(&self) -> &HashSet<QubitId> {
        &self.qubits
    }

    /// Returns the ordered gates.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Returns the total number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Smallest state width able to hold every touched qubit.
    pub fn width(&self) -> usize {
        self.qubits.iter().map(|q| q.index() + 1).max().unwrap_or(0)
    }

    /// The same gates in reverse order, which undoes this circuit.
    pub fn inverse(&self) -> Circuit {
        let mut inverse = Circuit::new();
        inverse.add_gates(self.gates.iter().rev().cloned());
        inverse
    }

    /// This circuit followed by `other`.
    pub fn then(&self, other: &Circuit) -> Circuit {
        let mut joined = self.clone();
        joined.add_gates(other.gates.iter().cloned());
        joined
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Gate> for Circuit {
    fn from_iter<I: IntoIterator<Item = Gate>>(iter: I) -> Self {
        let mut circuit = Circuit::new();
        circuit.add_gates(iter);
        circuit
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Chained construction of a [`Circuit`] when no ancilla management is needed.
///
/// Malformed controlled gates are remembered and reported by [`build`](Self::build),
/// so the chain itself never has to be interrupted.
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<RevqError>,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self {
            circuit: Circuit::new(),
            error: None,
        }
    }

    /// Adds a NOT on `target`.
    pub fn not(self, target: QubitId) -> Self {
        self.add_gate(Gate::not(target))
    }

    /// Adds a singly controlled NOT.
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.mcx(&[control], target)
    }

    /// Adds a NOT on `target` conditioned on all of `controls`.
    pub fn mcx(mut self, controls: &[QubitId], target: QubitId) -> Self {
        match Gate::controlled_not(target, controls.to_vec()) {
            Ok(gate) => self.add_gate(gate),
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    /// Adds a prebuilt gate.
    pub fn add_gate(mut self, gate: Gate) -> Self {
        self.circuit.add_gate(gate);
        self
    }

    /// Adds every gate from an iterator.
    pub fn add_gates<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.circuit.add_gates(gates);
        self
    }

    /// Finalizes the construction, surfacing the first malformed gate request.
    pub fn build(self) -> Result<Circuit, RevqError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gates.is_empty() {
            return writeln!(f, "revq::Circuit[0 gates on 0 qubits]");
        }

        // --- Setup ---
        let gates = &self.gates;
        let num_gates = gates.len();

        let mut sorted_qubits: Vec<QubitId> = self.qubits.iter().cloned().collect();
        sorted_qubits.sort();
        let num_qubits = sorted_qubits.len();
        let qubit_to_row: HashMap<QubitId, usize> =
            sorted_qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        let max_label_width = sorted_qubits.iter().map(|q| q.to_string().len()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 5; // e.g., "──X──"
        const WIRE: &str = "─────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] holds the wire segment, v_connect[row][time] the connector below it
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_gates]; num_qubits];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_gates]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        // --- Populate Grids ---
        for (t, gate) in gates.iter().enumerate() {
            let rows: Vec<usize> = gate.qubits().iter().filter_map(|q| qubit_to_row.get(q).copied()).collect();
            for c in gate.controls() {
                if let Some(r) = qubit_to_row.get(c) {
                    op_grid[*r][t] = format_gate("●");
                }
            }
            if let Some(r) = qubit_to_row.get(&gate.target()) {
                op_grid[*r][t] = format_gate("X");
            }
            if let (Some(r_min), Some(r_max)) = (rows.iter().min(), rows.iter().max()) {
                for row_vec in v_connect.iter_mut().take(*r_max).skip(*r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }

        // --- Format Output String ---
        writeln!(f, "revq::Circuit[{} gates on {} qubits]", num_gates, num_qubits)?;
        for r in 0..num_qubits {
            let label = format!("{}: ", sorted_qubits[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_gates {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn inverse_reverses_gate_order() -> Result<(), RevqError> {
        let circuit = CircuitBuilder::new().not(q(0)).cnot(q(0), q(1)).mcx(&[q(0), q(1)], q(2)).build()?;
        let inverse = circuit.inverse();
        assert_eq!(inverse.len(), 3);
        assert_eq!(inverse.gates()[0], circuit.gates()[2]);
        assert_eq!(inverse.gates()[2], circuit.gates()[0]);
        assert_eq!(circuit.width(), 3);
        Ok(())
    }

    #[test]
    fn builder_surfaces_malformed_gate() {
        let result = CircuitBuilder::new().not(q(0)).cnot(q(1), q(1)).build();
        assert!(matches!(result, Err(RevqError::Configuration { .. })));
    }

    #[test]
    fn display_draws_controls_and_target() -> Result<(), RevqError> {
        let circuit = CircuitBuilder::new().cnot(q(0), q(1)).build()?;
        let drawing = circuit.to_string();
        assert!(drawing.starts_with("revq::Circuit[1 gates on 2 qubits]"));
        assert!(drawing.contains("q0: ──●──"));
        assert!(drawing.contains("q1: ──X──"));
        assert!(drawing.contains('│'));
        Ok(())
    }
}
