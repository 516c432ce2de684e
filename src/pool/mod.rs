// src/pool/mod.rs

//! Qubit address management for oracle construction.
//!
//! Allocation is stack-like: registers are released in the reverse order they
//! were handed out, and a qubit belongs to at most one live register.

use crate::core::{QubitId, Register, RevqError};
use tracing::debug;

/// Hands out zero-initialized qubit addresses from a fixed budget.
///
/// The pool only tracks ownership. Whether a qubit is actually back at |0⟩
/// when released is a property of the gate stream and is checked by
/// [`RevVm`](crate::vm::RevVm) allocation debugging.
#[derive(Debug, Clone)]
pub struct QubitPool {
    capacity: usize,
    busy: Vec<bool>,
    /// Live registers, most recent last.
    stack: Vec<Register>,
}

impl QubitPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            busy: vec![false; capacity],
            stack: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of qubits currently owned by a live register.
    pub fn allocated_count(&self) -> usize {
        self.busy.iter().filter(|b| **b).count()
    }

    pub fn is_allocated(&self, qubit: QubitId) -> bool {
        self.busy.get(qubit.index()).copied().unwrap_or(false)
    }

    /// Live registers in allocation order.
    pub fn live_registers(&self) -> &[Register] {
        &self.stack
    }

    /// Takes the `count` lowest free addresses as a new register.
    ///
    /// # Errors
    /// * `InvalidArgument` if `count` is zero.
    /// * `Resource` if fewer than `count` qubits are free.
    pub fn allocate(&mut self, name: &str, count: usize) -> Result<Register, RevqError> {
        if count == 0 {
            return Err(RevqError::invalid_argument(format!(
                "register '{}' must hold at least one qubit",
                name
            )));
        }
        let free: Vec<usize> = self
            .busy
            .iter()
            .enumerate()
            .filter(|(_, busy)| !**busy)
            .map(|(i, _)| i)
            .take(count)
            .collect();
        if free.len() < count {
            return Err(RevqError::resource(format!(
                "cannot allocate {} qubits for '{}': {} of {} in use",
                count,
                name,
                self.allocated_count(),
                self.capacity
            )));
        }
        for i in &free {
            self.busy[*i] = true;
        }
        let register = Register::new(name, free.into_iter().map(|i| QubitId(i as u32)).collect());
        debug!(register = %register, live = self.stack.len() + 1, "allocate");
        self.stack.push(register.clone());
        Ok(register)
    }

    /// Re-takes exactly the addresses of `register`.
    ///
    /// Used when a mirrored segment re-allocates a register it released
    /// earlier; the replayed gates refer to the original addresses.
    pub fn reclaim(&mut self, register: &Register) -> Result<(), RevqError> {
        for q in register.iter() {
            if q.index() >= self.capacity {
                return Err(RevqError::resource(format!(
                    "cannot reclaim {}: beyond pool capacity {}",
                    q, self.capacity
                )));
            }
            if self.busy[q.index()] {
                return Err(RevqError::resource(format!(
                    "cannot reclaim '{}': {} is in use",
                    register.name(),
                    q
                )));
            }
        }
        for q in register.iter() {
            self.busy[q.index()] = true;
        }
        debug!(register = %register, live = self.stack.len() + 1, "reclaim");
        self.stack.push(register.clone());
        Ok(())
    }

    /// Returns `register` to the pool.
    ///
    /// # Errors
    /// `Resource` if the register is not live, or if it is live but not the
    /// most recent allocation.
    pub fn release(&mut self, register: &Register) -> Result<(), RevqError> {
        match self.stack.iter().rposition(|r| r == register) {
            None => Err(RevqError::resource(format!(
                "release of '{}' which is not allocated",
                register.name()
            ))),
            Some(pos) if pos + 1 != self.stack.len() => Err(RevqError::resource(format!(
                "out-of-order release of '{}': '{}' was allocated after it",
                register.name(),
                self.stack[self.stack.len() - 1].name()
            ))),
            Some(_) => {
                self.stack.pop();
                for q in register.iter() {
                    self.busy[q.index()] = false;
                }
                debug!(register = %register, live = self.stack.len(), "release");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_lowest_free_addresses() -> Result<(), RevqError> {
        let mut pool = QubitPool::new(8);
        let x = pool.allocate("x", 3)?;
        let y = pool.allocate("y", 1)?;
        assert_eq!(x.qubits(), &[QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(y.qubits(), &[QubitId(3)]);
        assert_eq!(pool.allocated_count(), 4);
        pool.release(&y)?;
        let z = pool.allocate("z", 2)?;
        assert_eq!(z.qubits(), &[QubitId(3), QubitId(4)]);
        Ok(())
    }

    #[test]
    fn zero_count_is_invalid() {
        let mut pool = QubitPool::new(4);
        assert!(matches!(pool.allocate("empty", 0), Err(RevqError::InvalidArgument { .. })));
    }

    #[test]
    fn exhaustion_is_resource_error() -> Result<(), RevqError> {
        let mut pool = QubitPool::new(3);
        pool.allocate("a", 2)?;
        assert!(matches!(pool.allocate("b", 2), Err(RevqError::Resource { .. })));
        Ok(())
    }

    #[test]
    fn release_must_be_lifo() -> Result<(), RevqError> {
        let mut pool = QubitPool::new(4);
        let a = pool.allocate("a", 1)?;
        let b = pool.allocate("b", 1)?;
        assert!(matches!(pool.release(&a), Err(RevqError::Resource { .. })));
        pool.release(&b)?;
        pool.release(&a)?;
        assert!(matches!(pool.release(&a), Err(RevqError::Resource { .. })));
        assert_eq!(pool.allocated_count(), 0);
        Ok(())
    }

    #[test]
    fn reclaim_takes_exact_addresses() -> Result<(), RevqError> {
        let mut pool = QubitPool::new(4);
        let a = pool.allocate("a", 2)?;
        pool.release(&a)?;
        pool.allocate("filler", 1)?;
        assert!(matches!(pool.reclaim(&a), Err(RevqError::Resource { .. })));

        let mut fresh = QubitPool::new(4);
        fresh.reclaim(&a)?;
        assert!(fresh.is_allocated(QubitId(0)) && fresh.is_allocated(QubitId(1)));
        assert_eq!(fresh.live_registers(), std::slice::from_ref(&a));
        Ok(())
    }
}
