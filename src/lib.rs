// src/lib.rs

//! `revq` - A compiler for reversible boolean oracles
//!
//! Predicates over N input bits are compiled into gate sequences built only
//! from NOT and multi-controlled NOT, implementing `|x⟩|y⟩ → |x⟩|y ⊕ f(x)⟩`
//! with every ancilla uncomputed and released. Construction happens in an
//! explicit [`Session`]; the uncompute half of every compute/mark/uncompute
//! block is derived mechanically from the recorded compute half.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod pool;
pub mod session;
pub mod oracles;
pub mod simulation;
pub mod vm;
pub mod verification;

// Re-export the most common types for easier top-level use
pub use crate::core::{BitState, QubitId, Register, RevqError};
pub use crate::operations::{Gate, Opcode};
pub use crate::circuits::{Circuit, CircuitBuilder};
pub use crate::session::{Segment, Session, SessionConfig};
pub use crate::oracles::Oracle;
pub use crate::simulation::Simulator;
pub use crate::vm::{Instruction, Program, ProgramBuilder, RevVm};
pub use crate::verification::{CostModel, Harness, HarnessConfig, VerificationReport};

// Example 1: Sum-equals oracle replayed on a classical input
// Compiles "exactly one of two bits is set" and checks the output bit flips
// for |10⟩ while the counter ancillas come back clean.
/// ```
/// use revq::{BitState, Oracle, RevqError, Session, Simulator};
/// use revq::oracles::SumEquals;
///
/// # fn main() -> Result<(), RevqError> {
/// let oracle = SumEquals::new(2, 1)?;
/// let mut session = Session::default();
/// let x = session.allocate("x", 2)?;
/// let y = session.allocate("y", 1)?;
/// oracle.compile(&mut session, &x, y[0])?;
///
/// // Only x and y are still allocated; the counter was released.
/// assert_eq!(session.pool().allocated_count(), 3);
///
/// let circuit = session.circuit();
/// println!("{}", circuit);
///
/// // Qubits: x = q0, q1; y = q2; counter = q3, q4.
/// let mut input = BitState::zeros(5);
/// input.write(x.qubits(), 0b01)?;
/// let out = Simulator::new().run(&circuit, &input)?;
/// assert!(out.get(y[0])?);
/// assert_eq!(out.read(x.qubits())?, 0b01);
/// assert!(out.all_zero(&[revq::QubitId(3), revq::QubitId(4)])?);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Exhaustive verification of a composed oracle
// A 2x2 Kakuro grid with row sums [1, 2] and column sums [1, 2] has exactly
// one solution, "0111" written qubit 0 first.
/// ```
/// use revq::{Harness, HarnessConfig, RevqError};
/// use revq::oracles::grid;
///
/// # fn main() -> Result<(), RevqError> {
/// let oracle = grid::kakuro(&[1, 2], &[1, 2])?;
/// let report = Harness::new(HarnessConfig::default()).verify_oracle(&oracle)?;
/// println!("{}", report);
///
/// assert!(report.is_success());
/// let marked: Vec<u64> = report
///     .outcomes
///     .iter()
///     .filter(|o| o.actual == Some(1))
///     .map(|o| o.input)
///     .collect();
/// assert_eq!(marked, vec![0b1110]);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
