// src/oracles/sum.rs

use super::{Oracle, bit_length, check_arity, debug_check_input};
use crate::core::{QubitId, Register, RevqError};
use crate::session::Session;
use tracing::debug;

/// `f(x) = 1` iff exactly `sum` of the `width` input bits are set.
///
/// Compiles into a binary counter of `bit_length(width)` ancillas. Each input
/// bit increments the counter (carries first, highest bit down, each carry
/// conditioned on the input bit and every lower counter bit), the counter is
/// compared against `sum` by flipping the bits where `sum` has a 0, and the
/// output is marked on the all-ones counter. The whole compute block is then
/// mirrored away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumEquals {
    width: usize,
    sum: usize,
}

impl SumEquals {
    /// # Errors
    /// `InvalidArgument` when `width` is zero. A `sum` above `width` is
    /// accepted and yields an oracle that never fires.
    pub fn new(width: usize, sum: usize) -> Result<Self, RevqError> {
        if width == 0 {
            return Err(RevqError::invalid_argument("sum oracle needs at least one input bit"));
        }
        Ok(Self { width, sum })
    }

    pub fn sum(&self) -> usize {
        self.sum
    }

    /// Width of the counter register.
    pub fn counter_width(&self) -> usize {
        bit_length(self.width)
    }

    fn is_satisfiable(&self) -> bool {
        self.sum <= self.width
    }
}

impl Oracle for SumEquals {
    fn name(&self) -> String {
        format!("sum_equals(n={}, s={})", self.width, self.sum)
    }

    fn arity(&self) -> usize {
        self.width
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        input.iter().filter(|b| **b).count() == self.sum
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        if !self.is_satisfiable() {
            debug!(oracle = %self.name(), "sum exceeds width; nothing to mark");
            return Ok(());
        }
        debug!(oracle = %self.name(), counter = self.counter_width(), "compile");
        let w = self.counter_width();
        session.within(
            |s| {
                let count = s.allocate("count", w)?;
                for (b_idx, bit) in input.iter().enumerate() {
                    // Highest counter bit this increment can reach.
                    let max_i = (w - 1).min(bit_length(b_idx + 1) - 1);
                    for i in (1..=max_i).rev() {
                        let mut controls = Vec::with_capacity(i + 1);
                        controls.push(bit);
                        controls.extend_from_slice(&count.qubits()[..i]);
                        s.apply_controlled_not(count[i], &controls)?;
                    }
                    s.apply_controlled_not(count[0], &[bit])?;
                }
                for i in 0..w {
                    if (self.sum >> i) & 1 == 0 {
                        s.apply_not(count[i])?;
                    }
                }
                Ok(count)
            },
            |s, count| s.apply_controlled_not(output, count.qubits()),
        )
    }

    fn ancilla_count(&self) -> usize {
        if self.is_satisfiable() { self.counter_width() } else { 0 }
    }
}
