// src/oracles/pattern.rs

//! Oracles that compare the input against a (possibly masked) bit pattern.

use super::{Oracle, check_arity, debug_check_input};
use crate::core::{QubitId, Register, RevqError};
use crate::session::Session;
use std::fmt;
use tracing::debug;

/// One position of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternBit {
    Zero,
    One,
    /// Any value matches.
    Any,
}

impl PatternBit {
    /// Decodes the integer form used by masked patterns: `0`, `1` or `-1`.
    pub fn from_int(value: i32) -> Result<Self, RevqError> {
        match value {
            0 => Ok(PatternBit::Zero),
            1 => Ok(PatternBit::One),
            -1 => Ok(PatternBit::Any),
            other => Err(RevqError::invalid_argument(format!(
                "pattern values are 0, 1 or -1, got {}",
                other
            ))),
        }
    }

    pub fn matches(&self, bit: bool) -> bool {
        match self {
            PatternBit::Zero => !bit,
            PatternBit::One => bit,
            PatternBit::Any => true,
        }
    }
}

impl From<bool> for PatternBit {
    fn from(bit: bool) -> Self {
        if bit { PatternBit::One } else { PatternBit::Zero }
    }
}

impl fmt::Display for PatternBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternBit::Zero => write!(f, "0"),
            PatternBit::One => write!(f, "1"),
            PatternBit::Any => write!(f, "."),
        }
    }
}

fn pattern_string(pattern: &[PatternBit]) -> String {
    pattern.iter().map(|b| b.to_string()).collect()
}

/// Flip the zero positions, mark on every constrained position, flip back.
fn mark_pattern(
    session: &mut Session,
    input: &Register,
    pattern: &[PatternBit],
    output: QubitId,
) -> Result<(), RevqError> {
    let constrained: Vec<QubitId> = pattern
        .iter()
        .zip(input.iter())
        .filter(|(bit, _)| **bit != PatternBit::Any)
        .map(|(_, q)| q)
        .collect();
    if constrained.is_empty() {
        return session.apply_not(output);
    }
    session.within(
        |s| {
            for (bit, q) in pattern.iter().zip(input.iter()) {
                if *bit == PatternBit::Zero {
                    s.apply_not(q)?;
                }
            }
            Ok(())
        },
        |s, _| s.apply_controlled_not(output, &constrained),
    )
}

/// `f(x) = 1` iff `x` equals a fixed bit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPattern {
    pattern: Vec<PatternBit>,
}

impl FixedPattern {
    /// `bits[i]` is the required value of qubit `i`.
    pub fn new(bits: &[bool]) -> Result<Self, RevqError> {
        if bits.is_empty() {
            return Err(RevqError::invalid_argument("fixed pattern needs at least one bit"));
        }
        Ok(Self {
            pattern: bits.iter().map(|b| PatternBit::from(*b)).collect(),
        })
    }

    /// The pattern `011011…` cut to `width` bits.
    pub fn repeating_011(width: usize) -> Result<Self, RevqError> {
        if width < 2 {
            return Err(RevqError::invalid_argument(format!(
                "repeating 011 pattern needs at least 2 bits, got {}",
                width
            )));
        }
        let bits: Vec<bool> = (0..width).map(|i| i % 3 != 0).collect();
        Self::new(&bits)
    }
}

impl Oracle for FixedPattern {
    fn name(&self) -> String {
        format!("pattern({})", pattern_string(&self.pattern))
    }

    fn arity(&self) -> usize {
        self.pattern.len()
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        self.pattern.iter().zip(input).all(|(p, b)| p.matches(*b))
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name(), "compile");
        mark_pattern(session, input, &self.pattern, output)
    }

    fn ancilla_count(&self) -> usize {
        0
    }
}

/// `f(x) = 1` iff every constrained position of `x` matches; wildcards match anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regexp {
    pattern: Vec<PatternBit>,
}

impl Regexp {
    pub fn new(pattern: Vec<PatternBit>) -> Result<Self, RevqError> {
        if pattern.is_empty() {
            return Err(RevqError::invalid_argument("regexp pattern needs at least one position"));
        }
        Ok(Self { pattern })
    }

    /// Builds a pattern from `0`, `1` and `-1` (wildcard) values.
    pub fn from_ints(values: &[i32]) -> Result<Self, RevqError> {
        let pattern = values
            .iter()
            .map(|v| PatternBit::from_int(*v))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pattern)
    }

    pub fn pattern(&self) -> &[PatternBit] {
        &self.pattern
    }
}

impl Oracle for Regexp {
    fn name(&self) -> String {
        format!("regexp({})", pattern_string(&self.pattern))
    }

    fn arity(&self) -> usize {
        self.pattern.len()
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        self.pattern.iter().zip(input).all(|(p, b)| p.matches(*b))
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name(), "compile");
        mark_pattern(session, input, &self.pattern, output)
    }

    fn ancilla_count(&self) -> usize {
        0
    }
}
