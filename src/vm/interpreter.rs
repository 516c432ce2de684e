// src/vm/interpreter.rs

//! Defines the `RevVm` interpreter.

use super::program::{Instruction, Program};
use crate::core::{BitState, QubitId, Register, RevqError};
use crate::simulation::engine::BitEngine;
use std::collections::HashMap;
use tracing::trace;

/// A classical-basis virtual machine for reversible instruction streams.
///
/// Executes [`Program`]s (or raw captured instruction logs) against a
/// [`BitState`] of `capacity` qubits, storing `Read` results in named
/// classical registers. With allocation debugging enabled it also checks the
/// ancilla contract: qubits must be free and |0⟩ when allocated, and back at
/// |0⟩ when released.
///
/// # Examples
///
/// ```
/// # use revq::{Instruction, ProgramBuilder, RevVm, RevqError};
/// # use revq::core::{QubitId, Register};
/// # use revq::operations::Gate;
/// # fn main() -> Result<(), RevqError> {
/// let x = Register::new("x", vec![QubitId(0), QubitId(1)]);
/// let program = ProgramBuilder::new()
///     .add(Instruction::Allocate { register: x.clone() })
///     .add(Instruction::Write { qubits: x.qubits().to_vec(), value: 1 })
///     .add(Instruction::Gate(Gate::controlled_not(QubitId(1), vec![QubitId(0)])?))
///     .add(Instruction::Read { qubits: x.qubits().to_vec(), register: "x".to_string() })
///     .build()?;
///
/// let mut vm = RevVm::new(4).with_allocation_debugging(true);
/// vm.run(&program)?;
/// assert_eq!(vm.get_classical_register("x"), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RevVm {
    capacity: usize,
    engine: BitEngine,
    allocated: Vec<bool>,
    /// Named classical registers holding u64 values.
    classical_memory: HashMap<String, u64>,
    allocation_debugging: bool,
}

impl RevVm {
    /// Creates a VM over `capacity` qubits, all |0⟩ and unallocated.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            engine: BitEngine::init(BitState::zeros(capacity)),
            allocated: vec![false; capacity],
            classical_memory: HashMap::new(),
            allocation_debugging: false,
        }
    }

    /// Enables checking of allocation and release cleanliness.
    pub fn with_allocation_debugging(mut self, enabled: bool) -> Self {
        self.allocation_debugging = enabled;
        self
    }

    /// Resets qubits, allocations and classical memory.
    fn reset(&mut self) {
        self.engine = BitEngine::init(BitState::zeros(self.capacity));
        self.allocated = vec![false; self.capacity];
        self.classical_memory.clear();
    }

    /// Runs a `Program` from a clean VM state.
    ///
    /// # Returns
    /// * `Ok(())` once every instruction executed.
    /// * `Err(RevqError)` at the first failing instruction.
    pub fn run(&mut self, program: &Program) -> Result<(), RevqError> {
        self.reset();
        let mut pc = 0;
        while let Some(instruction) = program.get_instruction(pc) {
            trace!(pc, %instruction, "execute");
            self.execute(instruction)?;
            pc += 1;
        }
        Ok(())
    }

    /// Executes `instructions` against the current state without resetting.
    pub fn replay(&mut self, instructions: &[Instruction]) -> Result<(), RevqError> {
        for (pc, instruction) in instructions.iter().enumerate() {
            trace!(pc, %instruction, "replay");
            self.execute(instruction)?;
        }
        Ok(())
    }

    fn execute(&mut self, instruction: &Instruction) -> Result<(), RevqError> {
        match instruction {
            Instruction::Allocate { register } => self.allocate(register),
            Instruction::Release { register } => self.release(register),
            Instruction::Gate(gate) => self.engine.apply_gate(gate),
            Instruction::Write { qubits, value } => self.engine.state_mut().write(qubits, *value),
            Instruction::Read { qubits, register } => {
                let value = self.engine.state().read(qubits)?;
                self.classical_memory.insert(register.clone(), value);
                Ok(())
            }
            Instruction::Label(_) => Ok(()),
        }
    }

    fn slot(&self, qubit: QubitId) -> Result<usize, RevqError> {
        let i = qubit.index();
        if i >= self.capacity {
            return Err(RevqError::resource(format!(
                "{} is beyond VM capacity {}",
                qubit, self.capacity
            )));
        }
        Ok(i)
    }

    fn allocate(&mut self, register: &Register) -> Result<(), RevqError> {
        for q in register.iter() {
            let i = self.slot(q)?;
            if self.allocation_debugging {
                if self.allocated[i] {
                    return Err(RevqError::resource(format!(
                        "allocating '{}': {} is already allocated",
                        register.name(),
                        q
                    )));
                }
                if self.engine.state().get(q)? {
                    return Err(RevqError::resource(format!(
                        "allocating '{}': {} is not in |0⟩",
                        register.name(),
                        q
                    )));
                }
            }
            self.allocated[i] = true;
        }
        Ok(())
    }

    fn release(&mut self, register: &Register) -> Result<(), RevqError> {
        for q in register.iter() {
            let i = self.slot(q)?;
            if self.allocation_debugging {
                if !self.allocated[i] {
                    return Err(RevqError::resource(format!(
                        "releasing '{}': {} is not allocated",
                        register.name(),
                        q
                    )));
                }
                if self.engine.state().get(q)? {
                    return Err(RevqError::invariant(format!(
                        "releasing '{}': {} was not returned to |0⟩",
                        register.name(),
                        q
                    )));
                }
            }
            self.allocated[i] = false;
        }
        Ok(())
    }

    /// Gets the value of a classical register, 0 if never written.
    pub fn get_classical_register(&self, name: &str) -> u64 {
        self.classical_memory.get(name).copied().unwrap_or(0)
    }

    /// Provides read-only access to the entire classical memory map.
    pub fn get_classical_memory(&self) -> &HashMap<String, u64> {
        &self.classical_memory
    }

    /// Number of qubits currently allocated.
    pub fn allocated_count(&self) -> usize {
        self.allocated.iter().filter(|a| **a).count()
    }

    /// Current qubit values.
    pub fn state(&self) -> &BitState {
        self.engine.state()
    }
}
