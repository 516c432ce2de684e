// src/session/mod.rs

//! The explicit construction context every oracle compiles into.
//!
//! A [`Session`] owns the qubit pool and the ordered log of emitted
//! instructions. Oracles never build their uncompute pass by hand: they wrap
//! the forward pass in [`Session::compute`] and hand the resulting
//! [`Segment`] to [`Session::uncompute`], which emits its mirror image.

use crate::circuits::Circuit;
use crate::core::{DEFAULT_QUBIT_CAPACITY, QubitId, Register, RevqError};
use crate::operations::Gate;
use crate::pool::QubitPool;
use crate::vm::{Instruction, Program, ProgramBuilder};
use tracing::{debug, trace};

/// Settings for a construction [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Total number of qubits the session may hand out.
    pub capacity: usize,
}

impl SessionConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUBIT_CAPACITY,
        }
    }
}

/// A recorded slice of a session log, produced by [`Session::compute`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    instructions: Vec<Instruction>,
}

impl Segment {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The instruction sequence that undoes this segment.
    ///
    /// Order is reversed and gates are kept as they are (every gate is its own
    /// inverse). Allocations become releases and releases become
    /// re-allocations of the same addresses.
    ///
    /// # Errors
    /// `Configuration` if the segment contains a `Read` or `Write`.
    pub fn mirrored(&self) -> Result<Segment, RevqError> {
        let mut mirror = Vec::with_capacity(self.instructions.len());
        for instruction in self.instructions.iter().rev() {
            let inverse = match instruction {
                Instruction::Allocate { register } => Instruction::Release {
                    register: register.clone(),
                },
                Instruction::Release { register } => Instruction::Allocate {
                    register: register.clone(),
                },
                Instruction::Gate(_) | Instruction::Label(_) => instruction.clone(),
                Instruction::Read { .. } | Instruction::Write { .. } => {
                    return Err(RevqError::configuration(format!(
                        "'{}' cannot be uncomputed",
                        instruction
                    )));
                }
            };
            mirror.push(inverse);
        }
        Ok(Segment { instructions: mirror })
    }
}

/// Construction context for reversible oracles.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    pool: QubitPool,
    log: Vec<Instruction>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            pool: QubitPool::new(config.capacity),
            config,
            log: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pool(&self) -> &QubitPool {
        &self.pool
    }

    /// Allocates a fresh |0…0⟩ register of `count` qubits.
    pub fn allocate(&mut self, name: &str, count: usize) -> Result<Register, RevqError> {
        let register = self.pool.allocate(name, count)?;
        self.log.push(Instruction::Allocate {
            register: register.clone(),
        });
        Ok(register)
    }

    /// Releases `register`, which must be the most recent live allocation.
    pub fn release(&mut self, register: &Register) -> Result<(), RevqError> {
        self.pool.release(register)?;
        self.log.push(Instruction::Release {
            register: register.clone(),
        });
        Ok(())
    }

    pub fn apply_not(&mut self, target: QubitId) -> Result<(), RevqError> {
        self.apply_gate(Gate::not(target))
    }

    /// Flips `target` iff all of `controls` read 1. Empty controls is a plain NOT.
    pub fn apply_controlled_not(&mut self, target: QubitId, controls: &[QubitId]) -> Result<(), RevqError> {
        self.apply_gate(Gate::controlled_not(target, controls.to_vec())?)
    }

    /// Emits `gate` after checking every qubit it touches is allocated.
    pub fn apply_gate(&mut self, gate: Gate) -> Result<(), RevqError> {
        if let Some(q) = gate.qubits().into_iter().find(|q| !self.pool.is_allocated(*q)) {
            return Err(RevqError::configuration(format!(
                "gate '{}' touches unallocated qubit {}",
                gate, q
            )));
        }
        trace!(%gate, "emit");
        self.log.push(Instruction::Gate(gate));
        Ok(())
    }

    /// NOT on every qubit of `register`.
    pub fn apply_not_all(&mut self, register: &Register) -> Result<(), RevqError> {
        for q in register.iter() {
            self.apply_not(q)?;
        }
        Ok(())
    }

    /// Appends a position marker to the log.
    pub fn label(&mut self, name: &str) {
        self.log.push(Instruction::Label(name.to_string()));
    }

    /// Runs `f` and returns what it emitted as a [`Segment`], alongside its result.
    ///
    /// # Errors
    /// Whatever `f` returns, or `Configuration` if it emitted an irreversible
    /// instruction.
    pub fn compute<T, F>(&mut self, f: F) -> Result<(T, Segment), RevqError>
    where
        F: FnOnce(&mut Session) -> Result<T, RevqError>,
    {
        let start = self.log.len();
        let value = f(self)?;
        let instructions = self.log[start..].to_vec();
        if let Some(bad) = instructions.iter().find(|i| i.is_irreversible()) {
            return Err(RevqError::configuration(format!(
                "'{}' recorded inside a compute segment",
                bad
            )));
        }
        debug!(instructions = instructions.len(), "segment recorded");
        Ok((value, Segment { instructions }))
    }

    /// Emits the mirror image of `segment`, restoring everything it touched.
    pub fn uncompute(&mut self, segment: &Segment) -> Result<(), RevqError> {
        let mirror = segment.mirrored()?;
        debug!(instructions = mirror.len(), "uncompute");
        for instruction in mirror.instructions {
            match instruction {
                Instruction::Allocate { register } => {
                    self.pool.reclaim(&register)?;
                    self.log.push(Instruction::Allocate { register });
                }
                Instruction::Release { register } => self.release(&register)?,
                Instruction::Gate(gate) => self.apply_gate(gate)?,
                Instruction::Label(name) => self.log.push(Instruction::Label(name)),
                Instruction::Read { .. } | Instruction::Write { .. } => {
                    return Err(RevqError::configuration("irreversible instruction in mirror"));
                }
            }
        }
        Ok(())
    }

    /// Compute, act, then uncompute the compute block.
    ///
    /// The value returned by `compute` (typically the registers it allocated)
    /// is handed to `action`.
    pub fn within<T, C, A>(&mut self, compute: C, action: A) -> Result<(), RevqError>
    where
        C: FnOnce(&mut Session) -> Result<T, RevqError>,
        A: FnOnce(&mut Session, &T) -> Result<(), RevqError>,
    {
        let (value, segment) = self.compute(compute)?;
        action(self, &value)?;
        self.uncompute(&segment)
    }

    /// Everything emitted so far, in order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.log
    }

    /// The gates emitted so far, without allocation bookkeeping.
    pub fn circuit(&self) -> Circuit {
        self.log
            .iter()
            .filter_map(|i| match i {
                Instruction::Gate(g) => Some(g.clone()),
                _ => None,
            })
            .collect()
    }

    /// Packages the log as a runnable [`Program`].
    pub fn into_program(self) -> Result<Program, RevqError> {
        ProgramBuilder::new().add_many(self.log).build()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
