// src/core/state.rs

use super::constants::revq_constants::NORM_TOLERANCE;
use super::error::{QubitId, RevqError};
use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt;

/// A classical basis state over a fixed number of qubits.
///
/// Reversible NOT/controlled-NOT sequences map basis states to basis states,
/// so a single `BitState` is enough to replay a circuit on one classical input.
/// Bit `i` is the value of qubit `QubitId(i)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitState {
    bits: Vec<bool>,
}

impl BitState {
    /// All qubits in `|0⟩`.
    pub fn zeros(width: usize) -> Self {
        Self { bits: vec![false; width] }
    }

    /// Loads `value` little-endian into the first `min(width, 64)` qubits.
    pub fn from_value(width: usize, value: u64) -> Self {
        let bits = (0..width).map(|i| i < 64 && (value >> i) & 1 == 1).collect();
        Self { bits }
    }

    /// Number of qubits represented.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Gets the value of a qubit.
    pub fn get(&self, qubit: QubitId) -> Result<bool, RevqError> {
        self.bits.get(qubit.index()).copied().ok_or_else(|| out_of_range(qubit, self.bits.len()))
    }

    /// Sets the value of a qubit.
    pub fn set(&mut self, qubit: QubitId, value: bool) -> Result<(), RevqError> {
        let width = self.bits.len();
        let bit = self.bits.get_mut(qubit.index()).ok_or_else(|| out_of_range(qubit, width))?;
        *bit = value;
        Ok(())
    }

    /// Inverts the value of a qubit.
    pub fn flip(&mut self, qubit: QubitId) -> Result<(), RevqError> {
        let width = self.bits.len();
        let bit = self.bits.get_mut(qubit.index()).ok_or_else(|| out_of_range(qubit, width))?;
        *bit = !*bit;
        Ok(())
    }

    /// Reads `qubits` as a little-endian integer (at most 64 qubits).
    pub fn read(&self, qubits: &[QubitId]) -> Result<u64, RevqError> {
        if qubits.len() > 64 {
            return Err(RevqError::invalid_argument(format!(
                "cannot read {} qubits into a 64-bit value",
                qubits.len()
            )));
        }
        let mut value = 0u64;
        for (i, q) in qubits.iter().enumerate() {
            if self.get(*q)? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    /// Writes `value` little-endian into `qubits`, overwriting whatever was there.
    pub fn write(&mut self, qubits: &[QubitId], value: u64) -> Result<(), RevqError> {
        if qubits.len() < 64 && value >> qubits.len() != 0 {
            return Err(RevqError::invalid_argument(format!(
                "value {} does not fit into {} qubits",
                value,
                qubits.len()
            )));
        }
        for (i, q) in qubits.iter().enumerate() {
            self.set(*q, i < 64 && (value >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Returns `true` if every listed qubit reads 0.
    pub fn all_zero(&self, qubits: &[QubitId]) -> Result<bool, RevqError> {
        for q in qubits {
            if self.get(*q)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Provides read-only access to the underlying bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

fn out_of_range(qubit: QubitId, width: usize) -> RevqError {
    RevqError::simulation(format!("{} is outside a {}-qubit state", qubit, width))
}

impl fmt::Display for BitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Least significant qubit first, matching register order.
        write!(f, "|")?;
        for b in &self.bits {
            write!(f, "{}", if *b { '1' } else { '0' })?;
        }
        write!(f, "⟩")
    }
}

/// Complex amplitudes over the 2^n basis states of an n-qubit register.
///
/// Basis index `k` has qubit `i` set iff bit `i` of `k` is set, so index
/// arithmetic follows the same little-endian convention as [`BitState`].
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeState {
    state_vector: Vec<Complex<f64>>,
    num_qubits: usize,
}

impl AmplitudeState {
    /// Creates a state from an explicit amplitude vector whose length must be a power of two.
    pub fn new(state_vector: Vec<Complex<f64>>) -> Result<Self, RevqError> {
        let dim = state_vector.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(RevqError::invalid_argument(format!(
                "amplitude vector length {} is not a power of two",
                dim
            )));
        }
        Ok(Self { state_vector, num_qubits: dim.trailing_zeros() as usize })
    }

    /// The computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self, RevqError> {
        let dim = dimension(num_qubits)?;
        if index >= dim {
            return Err(RevqError::invalid_argument(format!(
                "basis index {} out of range for {} qubits",
                index, num_qubits
            )));
        }
        let mut state_vector = vec![Complex::zero(); dim];
        state_vector[index] = Complex::one();
        Ok(Self { state_vector, num_qubits })
    }

    /// Equal superposition over every basis state.
    pub fn uniform(num_qubits: usize) -> Result<Self, RevqError> {
        let dim = dimension(num_qubits)?;
        let amp = Complex::new(1.0 / (dim as f64).sqrt(), 0.0);
        Ok(Self { state_vector: vec![amp; dim], num_qubits })
    }

    /// Provides read-only access to the amplitude vector.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.state_vector
    }

    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.state_vector
    }

    /// Number of basis states (2^n).
    pub fn dim(&self) -> usize {
        self.state_vector.len()
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// |c_k|², or 0 outside the vector.
    pub fn probability(&self, index: usize) -> f64 {
        self.state_vector.get(index).map(|c| c.norm_sqr()).unwrap_or(0.0)
    }

    /// Checks that Σ|c_k|² is 1 within `tolerance` (defaults to 1e-9).
    pub fn check_normalization(&self, tolerance: Option<f64>) -> Result<(), RevqError> {
        let tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
        let norm_sq: f64 = self.state_vector.iter().map(|c| c.norm_sqr()).sum();
        if (norm_sq - 1.0).abs() > tolerance {
            Err(RevqError::invariant(format!(
                "state vector normalization failed: sum(|c_k|^2) = {} (deviation > {})",
                norm_sq, tolerance
            )))
        } else {
            Ok(())
        }
    }
}

fn dimension(num_qubits: usize) -> Result<usize, RevqError> {
    u32::try_from(num_qubits)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .ok_or_else(|| RevqError::resource(format!("{} qubits overflow the state dimension", num_qubits)))
}

impl fmt::Display for AmplitudeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amplitudes[")?;
        for (i, c) in self.state_vector.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_state_round_trips_little_endian() -> Result<(), RevqError> {
        let qubits: Vec<QubitId> = (0..4).map(QubitId).collect();
        let mut state = BitState::zeros(5);
        state.write(&qubits, 0b0110)?;
        assert!(!state.get(QubitId(0))?);
        assert!(state.get(QubitId(1))?);
        assert!(state.get(QubitId(2))?);
        assert_eq!(state.read(&qubits)?, 6);
        assert_eq!(state.to_string(), "|01100⟩");
        Ok(())
    }

    #[test]
    fn write_rejects_values_wider_than_register() {
        let mut state = BitState::zeros(2);
        let result = state.write(&[QubitId(0), QubitId(1)], 4);
        assert!(matches!(result, Err(RevqError::InvalidArgument { .. })));
    }

    #[test]
    fn out_of_range_qubit_is_a_simulation_error() {
        let state = BitState::zeros(2);
        assert!(matches!(state.get(QubitId(2)), Err(RevqError::Simulation { .. })));
    }

    #[test]
    fn amplitude_state_validates_dimension_and_norm() -> Result<(), RevqError> {
        assert!(AmplitudeState::new(vec![Complex::one(); 3]).is_err());

        let uniform = AmplitudeState::uniform(3)?;
        assert_eq!(uniform.dim(), 8);
        assert_eq!(uniform.num_qubits(), 3);
        uniform.check_normalization(None)?;

        let unnormalized = AmplitudeState::new(vec![Complex::one(), Complex::one()])?;
        assert!(matches!(
            unnormalized.check_normalization(None),
            Err(RevqError::InvariantViolation { .. })
        ));
        Ok(())
    }
}
