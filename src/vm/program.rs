// src/vm/program.rs

use crate::core::{QubitId, Register, RevqError};
use crate::operations::Gate;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::warn;

// --- Instruction Set Definition ---

/// Represents a single instruction executable by the [`RevVm`](super::RevVm).
///
/// This is also the form in which a [`Session`](crate::session::Session)
/// records everything an oracle emits, so a captured log can be inspected,
/// costed and replayed on any classical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Take ownership of the qubits of `register`, which must read |0…0⟩.
    Allocate {
        /// The register being brought into scope.
        register: Register,
    },
    /// Return the qubits of `register`, which must be back at |0…0⟩.
    Release {
        /// The register leaving scope.
        register: Register,
    },
    /// Apply a reversible gate.
    Gate(Gate),
    /// Overwrite `qubits` with the little-endian bits of `value`.
    ///
    /// Irreversible; only used by test harnesses to prepare inputs.
    Write {
        /// Destination qubits, least significant first.
        qubits: Vec<QubitId>,
        /// Value to load.
        value: u64,
    },
    /// Read `qubits` as a little-endian integer into a named classical register.
    Read {
        /// Source qubits, least significant first.
        qubits: Vec<QubitId>,
        /// The classical register receiving the value.
        register: String,
    },
    /// Marks a position in the instruction stream. No effect on execution.
    Label(String),
}

impl Instruction {
    /// `true` for instructions that cannot be undone by replaying them backwards.
    pub fn is_irreversible(&self) -> bool {
        matches!(self, Instruction::Read { .. } | Instruction::Write { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Allocate { register } => write!(f, "alloc {}", register),
            Instruction::Release { register } => write!(f, "release {}", register),
            Instruction::Gate(gate) => write!(f, "{}", gate),
            Instruction::Write { qubits, value } => write!(f, "write {} -> {:?}", value, qubits),
            Instruction::Read { qubits, register } => write!(f, "read {:?} -> {}", qubits, register),
            Instruction::Label(name) => write!(f, "{}:", name),
        }
    }
}

// --- Program Structure ---

/// Represents a complete program for the `RevVm`.
/// Contains instructions and the positions of their labels.
#[derive(Debug, Clone)]
pub struct Program {
    /// Ordered sequence of instructions.
    pub(crate) instructions: Vec<Instruction>,
    /// Map from label name to instruction index.
    pub(crate) label_map: HashMap<String, usize>,
}

impl Program {
    /// Gets the instruction at a specific index (program counter).
    pub(crate) fn get_instruction(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    /// Gets the position of a label, if defined.
    pub fn get_label_pc(&self, label: &str) -> Option<usize> {
        self.label_map.get(label).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns the total number of instructions.
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RevVm Program ({} instructions)", self.instruction_count())?;
        for (pc, instruction) in self.instructions.iter().enumerate() {
            if let Instruction::Label(name) = instruction {
                // Labels flush left
                writeln!(f, "{}:", name)?;
            } else {
                writeln!(f, "  {:04}: {}", pc, instruction)?;
            }
        }
        Ok(())
    }
}

// --- Program Builder ---

/// Facilitates the construction of [`Program`] instances using a fluent API.
///
/// # Examples
/// ```
/// # use revq::vm::{Instruction, ProgramBuilder};
/// # use revq::core::{QubitId, Register};
/// # use revq::operations::Gate;
/// let x = Register::new("x", vec![QubitId(0)]);
/// let program = ProgramBuilder::new()
///     .add(Instruction::Allocate { register: x.clone() })
///     .add(Instruction::Label("flip".to_string()))
///     .add(Instruction::Gate(Gate::not(QubitId(0))))
///     .add(Instruction::Read { qubits: x.qubits().to_vec(), register: "m".to_string() })
///     .build()
///     .expect("well-formed program");
///
/// assert_eq!(program.instruction_count(), 4);
/// assert_eq!(program.get_label_pc("flip"), Some(1));
/// ```
#[derive(Default)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
    label_map: HashMap<String, usize>,
    live: HashSet<Register>,
    error: Option<RevqError>,
}

impl ProgramBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instruction to the program sequence.
    pub fn add(mut self, instruction: Instruction) -> Self {
        let pc = self.instructions.len();
        match &instruction {
            Instruction::Label(name) => {
                if self.label_map.insert(name.clone(), pc).is_some() {
                    warn!(label = %name, pc, "duplicate label definition; keeping the later one");
                }
            }
            Instruction::Allocate { register } => {
                self.live.insert(register.clone());
            }
            Instruction::Release { register } => {
                if !self.live.remove(register) && self.error.is_none() {
                    self.error = Some(RevqError::configuration(format!(
                        "instruction {} releases '{}' which was never allocated",
                        pc,
                        register.name()
                    )));
                }
            }
            _ => {}
        }
        self.instructions.push(instruction);
        self
    }

    /// Adds multiple instructions from an iterator.
    pub fn add_many<I>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = Instruction>,
    {
        for instruction in instructions {
            self = self.add(instruction); // Reuse single add logic
        }
        self
    }

    /// Builds the final `Program`.
    /// Returns the first structural error recorded while adding instructions.
    pub fn build(self) -> Result<Program, RevqError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Program {
                instructions: self.instructions,
                label_map: self.label_map,
            }),
        }
    }
}
