// src/core/register.rs

use super::error::{QubitId, RevqError};
use std::fmt;
use std::ops::{Index, Range};

/// An ordered, named group of qubit addresses.
///
/// Registers follow the little-endian convention: `qubits()[0]` holds the
/// least significant bit of any integer written to or read from the register.
///
/// A register returned by a pool allocation owns its addresses until it is
/// released. Registers produced by [`Register::slice`] or [`Register::select`]
/// are views over an existing allocation and own nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Register {
    name: String,
    qubits: Vec<QubitId>,
}

impl Register {
    /// Wraps an explicit list of addresses. Exclusive ownership is tracked by
    /// the allocator, not by the register itself.
    pub fn new(name: impl Into<String>, qubits: Vec<QubitId>) -> Self {
        Self { name: name.into(), qubits }
    }

    /// Gets the name given at allocation time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the addresses in little-endian order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Returns `true` if the register holds no qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Returns the address at `position`, or `None` past the end.
    pub fn get(&self, position: usize) -> Option<QubitId> {
        self.qubits.get(position).copied()
    }

    /// Iterates over the addresses in little-endian order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Contiguous sub-register view, e.g. the second half of an input.
    pub fn slice(&self, range: Range<usize>) -> Result<Register, RevqError> {
        if range.start > range.end || range.end > self.qubits.len() {
            return Err(RevqError::invalid_argument(format!(
                "slice {}..{} out of range for register '{}' of length {}",
                range.start,
                range.end,
                self.name,
                self.qubits.len()
            )));
        }
        Ok(Register {
            name: format!("{}[{}..{}]", self.name, range.start, range.end),
            qubits: self.qubits[range].to_vec(),
        })
    }

    /// Non-contiguous view picking `positions` in the given order, e.g. one
    /// column of a row-major grid.
    pub fn select(&self, name: impl Into<String>, positions: &[usize]) -> Result<Register, RevqError> {
        let qubits = positions
            .iter()
            .map(|&p| {
                self.get(p).ok_or_else(|| {
                    RevqError::invalid_argument(format!(
                        "position {} out of range for register '{}' of length {}",
                        p,
                        self.name,
                        self.qubits.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Register { name: name.into(), qubits })
    }
}

impl Index<usize> for Register {
    type Output = QubitId;

    fn index(&self, position: usize) -> &QubitId {
        &self.qubits[position]
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, q) in self.qubits.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { ", " } else { "" }, q)?;
        }
        write!(f, "]")
    }
}
