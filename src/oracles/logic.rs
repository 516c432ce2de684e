// src/oracles/logic.rs

//! Small ancilla-free oracles built directly from NOT and controlled-NOT.

use super::{Oracle, check_arity, debug_check_input};
use crate::core::{QubitId, Register, RevqError};
use crate::session::Session;
use tracing::debug;

/// `f(x0, x1) = ¬(x0 ∧ x1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nand;

impl Oracle for Nand {
    fn name(&self) -> String {
        "nand".to_string()
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        !(input[0] && input[1])
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name(), "compile");
        session.apply_not(output)?;
        session.apply_controlled_not(output, input.qubits())
    }

    fn ancilla_count(&self) -> usize {
        0
    }
}

/// `f(x) = x0 ⊕ x1 ⊕ … ⊕ x(n-1)`.
#[derive(Debug, Clone, Copy)]
pub struct Parity {
    width: usize,
}

impl Parity {
    pub fn new(width: usize) -> Result<Self, RevqError> {
        if width == 0 {
            return Err(RevqError::invalid_argument("parity needs at least one input bit"));
        }
        Ok(Self { width })
    }
}

impl Oracle for Parity {
    fn name(&self) -> String {
        format!("parity(n={})", self.width)
    }

    fn arity(&self) -> usize {
        self.width
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        input.iter().fold(false, |acc, b| acc ^ b)
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name(), "compile");
        for q in input.iter() {
            session.apply_controlled_not(output, &[q])?;
        }
        Ok(())
    }

    fn ancilla_count(&self) -> usize {
        0
    }
}

/// `f(x) = 1` iff `x[j] ≠ x[j + K]` for every `j < K`, with `n = 2K`.
///
/// The second half is XORed with the first in place, marked, and restored.
#[derive(Debug, Clone, Copy)]
pub struct FlippedHalves {
    half: usize,
}

impl FlippedHalves {
    pub fn new(width: usize) -> Result<Self, RevqError> {
        if width < 2 || width % 2 != 0 {
            return Err(RevqError::invalid_argument(format!(
                "flipped halves needs an even width of at least 2, got {}",
                width
            )));
        }
        Ok(Self { half: width / 2 })
    }
}

impl Oracle for FlippedHalves {
    fn name(&self) -> String {
        format!("flipped_halves(n={})", 2 * self.half)
    }

    fn arity(&self) -> usize {
        2 * self.half
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        (0..self.half).all(|j| input[j] != input[j + self.half])
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name(), "compile");
        let k = self.half;
        let upper = input.slice(k..2 * k)?;
        session.within(
            |s| {
                for j in 0..k {
                    s.apply_controlled_not(input[j + k], &[input[j]])?;
                }
                Ok(())
            },
            |s, _| s.apply_controlled_not(output, upper.qubits()),
        )
    }

    fn ancilla_count(&self) -> usize {
        0
    }
}

/// `f(x) = 1` iff `x` reads the same in both directions.
///
/// Mirror pairs are compared in place on the upper half, then restored.
#[derive(Debug, Clone, Copy)]
pub struct Palindrome {
    width: usize,
}

impl Palindrome {
    pub fn new(width: usize) -> Result<Self, RevqError> {
        if width < 2 {
            return Err(RevqError::invalid_argument(format!(
                "palindrome needs at least 2 input bits, got {}",
                width
            )));
        }
        Ok(Self { width })
    }
}

impl Oracle for Palindrome {
    fn name(&self) -> String {
        format!("palindrome(n={})", self.width)
    }

    fn arity(&self) -> usize {
        self.width
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        (0..self.width / 2).all(|i| input[i] == input[self.width - 1 - i])
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name(), "compile");
        let n = self.width;
        let mirrors: Vec<QubitId> = (0..n / 2).map(|i| input[n - 1 - i]).collect();
        session.within(
            |s| {
                // x[n-1-i] becomes 1 exactly when it equals x[i].
                for (i, m) in mirrors.iter().enumerate() {
                    s.apply_controlled_not(*m, &[input[i]])?;
                    s.apply_not(*m)?;
                }
                Ok(())
            },
            |s, _| s.apply_controlled_not(output, &mirrors),
        )
    }

    fn ancilla_count(&self) -> usize {
        0
    }
}

/// The three-qubit Peres gate: `x2 ⊕= x0 ∧ x1`, then `x1 ⊕= x0`.
///
/// A permutation rather than a marking oracle, so it has no output qubit.
pub fn peres_gate(session: &mut Session, x: &Register) -> Result<(), RevqError> {
    if x.len() != 3 {
        return Err(RevqError::invalid_argument(format!(
            "peres gate acts on 3 qubits, got {}",
            x.len()
        )));
    }
    session.apply_controlled_not(x[2], &[x[0], x[1]])?;
    session.apply_controlled_not(x[1], &[x[0]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_reject_degenerate_widths() {
        assert!(matches!(Parity::new(0), Err(RevqError::InvalidArgument { .. })));
        assert!(matches!(FlippedHalves::new(3), Err(RevqError::InvalidArgument { .. })));
        assert!(matches!(FlippedHalves::new(0), Err(RevqError::InvalidArgument { .. })));
        assert!(matches!(Palindrome::new(1), Err(RevqError::InvalidArgument { .. })));
    }

    #[test]
    fn flipped_halves_truth_table() -> Result<(), RevqError> {
        let oracle = FlippedHalves::new(4)?;
        let marked: Vec<u64> = (0..16)
            .filter(|v| oracle.evaluate(&crate::oracles::assignment(*v, 4)))
            .collect();
        // |0011⟩, |0110⟩, |1001⟩, |1100⟩ written qubit 0 first.
        assert_eq!(marked, vec![3, 6, 9, 12]);
        Ok(())
    }

    #[test]
    fn palindrome_truth_table() -> Result<(), RevqError> {
        let oracle = Palindrome::new(4)?;
        let marked: Vec<u64> = (0..16)
            .filter(|v| oracle.evaluate(&crate::oracles::assignment(*v, 4)))
            .collect();
        assert_eq!(marked, vec![0, 6, 9, 15]);
        Ok(())
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "nand evaluated on 1 bits")]
    fn nand_evaluate_rejects_short_input() {
        Nand.evaluate(&[true]);
    }

    #[test]
    fn nand_rejects_wrong_width() -> Result<(), RevqError> {
        let mut session = Session::default();
        let x = session.allocate("x", 3)?;
        let y = session.allocate("y", 1)?;
        assert!(matches!(Nand.compile(&mut session, &x, y[0]), Err(RevqError::InvalidArgument { .. })));
        Ok(())
    }

    #[test]
    fn peres_gate_needs_three_qubits() -> Result<(), RevqError> {
        let mut session = Session::default();
        let x = session.allocate("x", 2)?;
        assert!(matches!(peres_gate(&mut session, &x), Err(RevqError::InvalidArgument { .. })));
        Ok(())
    }
}
