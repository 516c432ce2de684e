// src/oracles/mod.rs

//! Boolean predicates compiled into reversible marking oracles.
//!
//! Every oracle implements `|x⟩|y⟩ → |x⟩|y ⊕ f(x)⟩` using only NOT and
//! controlled-NOT gates. Ancillas an oracle allocates are returned to |0⟩ and
//! released before `compile` returns, so oracles nest freely (see
//! [`Conjunction`]).

mod compose;
pub mod grid;
mod logic;
mod pattern;
mod sum;
mod window;

pub use compose::{Clause, Conjunction};
pub use logic::{FlippedHalves, Nand, Palindrome, Parity, peres_gate};
pub use pattern::{FixedPattern, PatternBit, Regexp};
pub use sum::SumEquals;
pub use window::NoThreeInARow;

use crate::core::{QubitId, Register, RevqError};
use crate::session::Session;
use std::fmt;

/// A predicate over a fixed number of input bits that knows how to emit
/// itself as a marking oracle.
pub trait Oracle: fmt::Debug {
    /// Short human-readable description, used in logs and reports.
    fn name(&self) -> String;

    /// Number of input bits.
    fn arity(&self) -> usize;

    /// The classical truth value of the predicate. `input[i]` is bit `i`.
    ///
    /// `input.len()` must equal [`Oracle::arity`]; debug builds panic
    /// otherwise.
    fn evaluate(&self, input: &[bool]) -> bool;

    /// Emits the oracle into `session`, flipping `output` iff the predicate
    /// holds for `input`.
    ///
    /// # Errors
    /// `InvalidArgument` if `input.len() != self.arity()`; any session error.
    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError>;

    /// Ancilla qubits allocated over one `compile`, summed over every nested
    /// oracle.
    fn ancilla_count(&self) -> usize;
}

pub(crate) fn debug_check_input(oracle: &dyn Oracle, input: &[bool]) {
    debug_assert_eq!(
        input.len(),
        oracle.arity(),
        "{} evaluated on {} bits",
        oracle.name(),
        input.len()
    );
}

/// Rejects an input register whose width does not match the oracle.
pub(crate) fn check_arity(oracle: &dyn Oracle, input: &Register) -> Result<(), RevqError> {
    if input.len() != oracle.arity() {
        return Err(RevqError::invalid_argument(format!(
            "{} expects {} input qubits, got {}",
            oracle.name(),
            oracle.arity(),
            input.len()
        )));
    }
    Ok(())
}

/// Little-endian bits of `value`: `assignment(6, 4) == [false, true, true, false]`.
pub fn assignment(value: u64, width: usize) -> Vec<bool> {
    (0..width).map(|i| i < 64 && (value >> i) & 1 == 1).collect()
}

/// Parses a string written qubit 0 first, e.g. `"0110"`.
pub fn parse_bits(text: &str) -> Result<Vec<bool>, RevqError> {
    text.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(RevqError::invalid_argument(format!(
                "'{}' is not a bit in \"{}\"",
                other, text
            ))),
        })
        .collect()
}

/// Number of bits needed to write `n` in binary.
pub(crate) fn bit_length(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}
