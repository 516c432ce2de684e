// src/vm/mod.rs

//! Instruction streams and the interpreter that replays them.
//! Captured oracle logs are plain [`Instruction`] sequences, so the VM doubles
//! as the introspection and replay facility for testing.

mod interpreter;
mod program;

pub use interpreter::RevVm;
pub use program::{Instruction, Program, ProgramBuilder};
