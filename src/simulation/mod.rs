// src/simulation/mod.rs

//! Replays `revq::circuits::Circuit` gate sequences.
//!
//! Reversible NOT/MCX circuits map basis states to basis states, so the main
//! entry point works on a single classical [`BitState`]. The amplitude path
//! exists to show the same sequence acting uniformly on every component of a
//! superposition.

mod results;
pub(crate) mod engine;

pub use results::SampleCounts;

use crate::circuits::Circuit;
use crate::core::constants::revq_constants::{MAX_AMPLITUDE_QUBITS, NORM_TOLERANCE};
use crate::core::{AmplitudeState, BitState, RevqError};
use engine::{BitEngine, PermutationEngine};
use num_complex::Complex;
use num_traits::{One, Zero};
use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use tracing::debug;

/// Stateless entry point for running circuits.
#[derive(Debug, Default)]
pub struct Simulator {}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `circuit` on one classical input.
    ///
    /// # Errors
    /// `Simulation` if a gate addresses a qubit beyond `input.width()`.
    pub fn run(&self, circuit: &Circuit, input: &BitState) -> Result<BitState, RevqError> {
        let mut engine = BitEngine::init(input.clone());
        for gate in circuit.gates() {
            engine.apply_gate(gate)?;
        }
        Ok(engine.into_state())
    }

    /// Runs `circuit` on every component of `state` at once.
    ///
    /// # Errors
    /// * `Resource` beyond `MAX_AMPLITUDE_QUBITS` qubits.
    /// * `Simulation` if a gate addresses a qubit outside the state.
    pub fn run_amplitudes(&self, circuit: &Circuit, state: AmplitudeState) -> Result<AmplitudeState, RevqError> {
        debug!(gates = circuit.len(), qubits = state.num_qubits(), "amplitude run");
        let mut engine = PermutationEngine::init(state)?;
        for gate in circuit.gates() {
            engine.apply_gate(gate)?;
        }
        Ok(engine.into_state())
    }

    /// Builds the `2^n × 2^n` matrix of `circuit`, indexed `U[out][in]`.
    pub fn unitary(&self, circuit: &Circuit, num_qubits: usize) -> Result<Vec<Vec<Complex<f64>>>, RevqError> {
        if num_qubits > MAX_AMPLITUDE_QUBITS {
            return Err(RevqError::resource(format!(
                "unitary limited to {} qubits, got {}",
                MAX_AMPLITUDE_QUBITS, num_qubits
            )));
        }
        let dim = 1usize << num_qubits;
        let mut matrix = vec![vec![Complex::zero(); dim]; dim];
        // Column `col` is the image of basis state |col⟩.
        for col in 0..dim {
            let out = self.run(circuit, &BitState::from_value(num_qubits, col as u64))?;
            let row = out
                .bits()
                .iter()
                .enumerate()
                .fold(0usize, |acc, (i, b)| if *b { acc | (1 << i) } else { acc });
            matrix[row][col] = Complex::one();
        }
        Ok(matrix)
    }

    /// Draws `shots` basis indices from `state` with a seeded generator.
    ///
    /// # Errors
    /// `InvariantViolation` if `state` is not normalized.
    pub fn sample(&self, state: &AmplitudeState, shots: usize, seed: u64) -> Result<SampleCounts, RevqError> {
        state.check_normalization(Some(NORM_TOLERANCE))?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts = SampleCounts::new(state.num_qubits());
        for _ in 0..shots {
            let draw: f64 = StandardUniform.sample(&mut rng);
            let mut cumulative = 0.0;
            let mut chosen = state.dim() - 1;
            for index in 0..state.dim() {
                cumulative += state.probability(index);
                if draw < cumulative {
                    chosen = index;
                    break;
                }
            }
            counts.record(chosen);
        }
        Ok(counts)
    }
}
