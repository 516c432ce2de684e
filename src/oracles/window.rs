// src/oracles/window.rs

use super::{Oracle, check_arity, debug_check_input};
use crate::core::{QubitId, Register, RevqError};
use crate::session::Session;
use tracing::debug;

/// `f(x) = 1` iff no three consecutive bits of `x` are equal.
///
/// One ancilla per window of three. Each starts at 1 and is flipped once by
/// the all-ones check and once by the all-zeros check, so it ends up 1 exactly
/// when its window is mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoThreeInARow {
    width: usize,
}

impl NoThreeInARow {
    pub fn new(width: usize) -> Result<Self, RevqError> {
        if width < 3 {
            return Err(RevqError::invalid_argument(format!(
                "three-in-a-row check needs at least 3 bits, got {}",
                width
            )));
        }
        Ok(Self { width })
    }

    fn windows(&self) -> usize {
        self.width - 2
    }
}

impl Oracle for NoThreeInARow {
    fn name(&self) -> String {
        format!("no_three_in_a_row(n={})", self.width)
    }

    fn arity(&self) -> usize {
        self.width
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        !input.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name(), windows = self.windows(), "compile");
        session.within(
            |s| {
                let mixed = s.allocate("mixed", self.windows())?;
                for j in 0..self.windows() {
                    let window = [input[j], input[j + 1], input[j + 2]];
                    s.apply_not(mixed[j])?;
                    s.apply_controlled_not(mixed[j], &window)?;
                    for q in window {
                        s.apply_not(q)?;
                    }
                    s.apply_controlled_not(mixed[j], &window)?;
                    for q in window {
                        s.apply_not(q)?;
                    }
                }
                Ok(mixed)
            },
            |s, mixed| s.apply_controlled_not(output, mixed.qubits()),
        )
    }

    fn ancilla_count(&self) -> usize {
        self.windows()
    }
}
