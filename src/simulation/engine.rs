// src/simulation/engine.rs
use crate::core::constants::revq_constants::MAX_AMPLITUDE_QUBITS;
use crate::core::{AmplitudeState, BitState, QubitId, RevqError};
use crate::operations::Gate;
use tracing::trace;

/// Applies gates to a single classical basis state.
/// (Internal visibility)
#[derive(Debug, Clone)]
pub(crate) struct BitEngine {
    state: BitState,
}

impl BitEngine {
    pub(crate) fn init(state: BitState) -> Self {
        Self { state }
    }

    /// Flips the target iff every control reads 1.
    pub(crate) fn apply_gate(&mut self, gate: &Gate) -> Result<(), RevqError> {
        let mut fire = true;
        for c in gate.controls() {
            fire &= self.state.get(*c)?;
        }
        // Target range is checked even when the gate does not fire.
        let target = gate.target();
        let before = self.state.get(target)?;
        if fire {
            self.state.set(target, !before)?;
        }
        trace!(gate = %gate, fired = fire, "bit gate");
        Ok(())
    }

    pub(crate) fn state(&self) -> &BitState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut BitState {
        &mut self.state
    }

    pub(crate) fn into_state(self) -> BitState {
        self.state
    }
}

/// Applies NOT/MCX gates to a full amplitude vector.
///
/// Both gates are permutations of the computational basis, so every
/// amplitude is moved, never mixed.
pub(crate) struct PermutationEngine {
    state: AmplitudeState,
}

impl PermutationEngine {
    pub(crate) fn init(state: AmplitudeState) -> Result<Self, RevqError> {
        if state.num_qubits() > MAX_AMPLITUDE_QUBITS {
            return Err(RevqError::resource(format!(
                "amplitude simulation limited to {} qubits, got {}",
                MAX_AMPLITUDE_QUBITS,
                state.num_qubits()
            )));
        }
        Ok(Self { state })
    }

    fn bit_of(&self, qubit: QubitId) -> Result<usize, RevqError> {
        let k = qubit.index();
        if k >= self.state.num_qubits() {
            return Err(RevqError::simulation(format!(
                "{} is outside a {}-qubit amplitude state",
                qubit,
                self.state.num_qubits()
            )));
        }
        Ok(k)
    }

    pub(crate) fn apply_gate(&mut self, gate: &Gate) -> Result<(), RevqError> {
        let k = self.bit_of(gate.target())?;
        let mut control_mask = 0usize;
        for c in gate.controls() {
            control_mask |= 1 << self.bit_of(*c)?;
        }

        let k_mask = 1usize << k; // Mask for the target bit
        let lower_mask = k_mask - 1; // Bits below the target
        let upper_mask = !((k_mask << 1) - 1); // Bits above the target

        let dim = self.state.dim();
        let vector = self.state.vector_mut();
        // Iterate over pairs of basis states differing only at the target position
        for i in 0..dim / 2 {
            let i0 = ((i << 1) & upper_mask) | (i & lower_mask);
            if i0 & control_mask == control_mask {
                vector.swap(i0, i0 | k_mask);
            }
        }
        trace!(gate = %gate, dim, "permutation gate");
        Ok(())
    }

    pub(crate) fn into_state(self) -> AmplitudeState {
        self.state
    }
}
