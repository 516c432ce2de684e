// src/verification/mod.rs

//! Exhaustive checking of compiled oracles against their truth tables.
//!
//! An oracle is captured once in a fresh [`Session`], its instruction stream
//! is screened against an opcode whitelist, and the stream is then replayed
//! on a [`RevVm`] with allocation debugging for every classical input. Each
//! replay checks the output bit, the input register and ancilla cleanliness.

mod metrics;

pub use metrics::{CostModel, ResourceCounts};

use crate::circuits::Circuit;
use crate::core::constants::revq_constants::{READ_LABEL, SOLUTION_LABEL};
use crate::core::{DEFAULT_MAX_EXHAUSTIVE_INPUTS, DEFAULT_QUBIT_CAPACITY, Register, RevqError};
use crate::operations::Opcode;
use crate::oracles::{Oracle, assignment};
use crate::session::{Session, SessionConfig};
use crate::vm::{Instruction, RevVm};
use std::fmt;
use tracing::{debug, info, warn};

/// Settings for a verification [`Harness`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Opcodes a solution may use.
    pub allowed_opcodes: Vec<Opcode>,
    /// Upper bound on the controls of any single gate, if any.
    pub max_controls: Option<usize>,
    /// Largest input width that will be enumerated.
    pub max_exhaustive_inputs: usize,
    /// Active volume a solution must stay within, if any.
    pub active_volume_budget: Option<u64>,
    pub cost_model: CostModel,
    /// Qubits available to the capture session and to each replay.
    pub qubit_capacity: usize,
    /// Check allocation and release cleanliness during replay.
    pub allocation_debugging: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            allowed_opcodes: vec![Opcode::Not, Opcode::ControlledNot],
            max_controls: None,
            max_exhaustive_inputs: DEFAULT_MAX_EXHAUSTIVE_INPUTS,
            active_volume_budget: None,
            cost_model: CostModel::default(),
            qubit_capacity: DEFAULT_QUBIT_CAPACITY,
            allocation_debugging: true,
        }
    }
}

impl HarnessConfig {
    pub fn with_allowed_opcodes(mut self, opcodes: &[Opcode]) -> Self {
        self.allowed_opcodes = opcodes.to_vec();
        self
    }

    pub fn with_max_controls(mut self, max_controls: usize) -> Self {
        self.max_controls = Some(max_controls);
        self
    }

    pub fn with_max_exhaustive_inputs(mut self, width: usize) -> Self {
        self.max_exhaustive_inputs = width;
        self
    }

    pub fn with_active_volume_budget(mut self, budget: u64) -> Self {
        self.active_volume_budget = Some(budget);
        self
    }

    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn with_qubit_capacity(mut self, capacity: usize) -> Self {
        self.qubit_capacity = capacity;
        self
    }

    pub fn with_allocation_debugging(mut self, enabled: bool) -> Self {
        self.allocation_debugging = enabled;
        self
    }
}

/// A solution's instruction stream together with the registers it was built on.
#[derive(Debug, Clone)]
pub struct Capture {
    /// The `n`-qubit input register `x`.
    pub input: Register,
    /// The one-qubit output register `y`, absent for permutations.
    pub output: Option<Register>,
    /// Everything the solution emitted, without the set-up allocations.
    pub instructions: Vec<Instruction>,
}

impl Capture {
    /// The gates of the solution in order.
    pub fn circuit(&self) -> Circuit {
        self.instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Gate(g) => Some(g.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Result of replaying a solution on one classical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// The input value, qubit 0 as bit 0.
    pub input: u64,
    /// Expected read-out: the output bit for oracles, the input register for permutations.
    pub expected: u64,
    /// Observed read-out, `None` when replay failed.
    pub actual: Option<u64>,
    /// Whether the input register read back unchanged (always `true` for permutations).
    pub input_preserved: bool,
    /// The error that stopped replay, e.g. a dirty release.
    pub fault: Option<RevqError>,
}

impl AssignmentOutcome {
    pub fn passed(&self) -> bool {
        self.fault.is_none() && self.input_preserved && self.actual == Some(self.expected)
    }
}

impl fmt::Display for AssignmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input {:#b}: expected {}", self.input, self.expected)?;
        match self.actual {
            Some(a) => write!(f, ", got {}", a)?,
            None => write!(f, ", no result")?,
        }
        if !self.input_preserved {
            write!(f, ", input modified")?;
        }
        if let Some(e) = &self.fault {
            write!(f, ", {}", e)?;
        }
        Ok(())
    }
}

/// Per-input outcomes and resource figures of one verification run.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub name: String,
    pub outcomes: Vec<AssignmentOutcome>,
    pub resources: ResourceCounts,
    pub active_volume: u64,
    pub active_volume_budget: Option<u64>,
}

impl VerificationReport {
    pub fn within_budget(&self) -> bool {
        self.active_volume_budget.is_none_or(|b| self.active_volume <= b)
    }

    pub fn is_success(&self) -> bool {
        self.within_budget() && self.outcomes.iter().all(|o| o.passed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssignmentOutcome> + '_ {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// Converts the report into an error on the first failing assignment or a
    /// budget overrun.
    pub fn into_result(self) -> Result<VerificationReport, RevqError> {
        if let Some(failure) = self.failures().next() {
            return Err(RevqError::invariant(format!("{}: {}", self.name, failure)));
        }
        if !self.within_budget() {
            return Err(RevqError::invariant(format!(
                "{}: active volume {} exceeds budget {}",
                self.name,
                self.active_volume,
                self.active_volume_budget.unwrap_or_default()
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failures().count();
        writeln!(
            f,
            "{}: {}/{} assignments passed",
            self.name,
            self.outcomes.len() - failed,
            self.outcomes.len()
        )?;
        writeln!(f, "  resources: {}", self.resources)?;
        write!(f, "  active volume: {}", self.active_volume)?;
        if let Some(budget) = self.active_volume_budget {
            write!(f, " (budget {})", budget)?;
        }
        writeln!(f)
    }
}

/// Exhaustive verifier for reversible solutions.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs `op` on fresh registers `x` (`n` qubits) and `y` (one qubit).
    ///
    /// # Errors
    /// Whatever `op` returns, or `InvariantViolation` if it left anything
    /// besides `x` and `y` allocated.
    pub fn capture<F>(&self, n: usize, op: F) -> Result<Capture, RevqError>
    where
        F: FnOnce(&mut Session, &Register, &Register) -> Result<(), RevqError>,
    {
        let mut session = Session::new(SessionConfig::default().with_capacity(self.config.qubit_capacity));
        let x = session.allocate("x", n)?;
        let y = session.allocate("y", 1)?;
        op(&mut session, &x, &y)?;
        let instructions = Self::solution(&session, 2, n + 1)?;
        Ok(Capture {
            input: x,
            output: Some(y),
            instructions,
        })
    }

    /// Like [`capture`](Self::capture) for an output-less permutation on `x`.
    pub fn capture_permutation<F>(&self, n: usize, op: F) -> Result<Capture, RevqError>
    where
        F: FnOnce(&mut Session, &Register) -> Result<(), RevqError>,
    {
        let mut session = Session::new(SessionConfig::default().with_capacity(self.config.qubit_capacity));
        let x = session.allocate("x", n)?;
        op(&mut session, &x)?;
        let instructions = Self::solution(&session, 1, n)?;
        Ok(Capture {
            input: x,
            output: None,
            instructions,
        })
    }

    fn solution(session: &Session, setup: usize, expected_live: usize) -> Result<Vec<Instruction>, RevqError> {
        let pool = session.pool();
        if pool.live_registers().len() != setup || pool.allocated_count() != expected_live {
            let leaked: Vec<String> = pool
                .live_registers()
                .iter()
                .skip(setup)
                .map(|r| r.to_string())
                .collect();
            return Err(RevqError::invariant(format!(
                "{} qubits still allocated after the solution, expected {}; leaked: {}",
                pool.allocated_count(),
                expected_live,
                leaked.join(", ")
            )));
        }
        Ok(session.instructions()[setup..].to_vec())
    }

    /// Screens a stream against the whitelist.
    ///
    /// # Errors
    /// `InvariantViolation` on any measurement, write, non-whitelisted opcode
    /// or gate with too many controls.
    pub fn check_op_types(&self, instructions: &[Instruction]) -> Result<(), RevqError> {
        for (pc, instruction) in instructions.iter().enumerate() {
            match instruction {
                Instruction::Read { .. } => {
                    return Err(RevqError::invariant(format!("instruction {}: measurement is not allowed", pc)));
                }
                Instruction::Write { .. } => {
                    return Err(RevqError::invariant(format!("instruction {}: write is not allowed", pc)));
                }
                Instruction::Gate(gate) => {
                    if !self.config.allowed_opcodes.contains(&gate.opcode()) {
                        return Err(RevqError::invariant(format!(
                            "instruction {}: opcode {} is not allowed ('{}')",
                            pc,
                            gate.opcode(),
                            gate
                        )));
                    }
                    if let Some(max) = self.config.max_controls {
                        if gate.control_count() > max {
                            return Err(RevqError::invariant(format!(
                                "instruction {}: '{}' uses {} controls, at most {} allowed",
                                pc,
                                gate,
                                gate.control_count(),
                                max
                            )));
                        }
                    }
                }
                Instruction::Allocate { .. } | Instruction::Release { .. } | Instruction::Label(_) => {}
            }
        }
        Ok(())
    }

    fn check_width(&self, n: usize) -> Result<(), RevqError> {
        // Inputs are enumerated as u64 values.
        if n >= u64::BITS as usize {
            return Err(RevqError::invalid_argument(format!(
                "{} input bits cannot be enumerated exhaustively",
                n
            )));
        }
        if n > self.config.max_exhaustive_inputs {
            return Err(RevqError::invalid_argument(format!(
                "{} input bits exceed the exhaustive limit of {}",
                n, self.config.max_exhaustive_inputs
            )));
        }
        Ok(())
    }

    fn replay(&self, stream: &[Instruction]) -> Result<RevVm, RevqError> {
        let mut vm = RevVm::new(self.config.qubit_capacity).with_allocation_debugging(self.config.allocation_debugging);
        vm.replay(stream)?;
        Ok(vm)
    }

    fn report(&self, name: &str, capture: &Capture, outcomes: Vec<AssignmentOutcome>) -> VerificationReport {
        let report = VerificationReport {
            name: name.to_string(),
            outcomes,
            resources: ResourceCounts::from_instructions(&capture.instructions),
            active_volume: self.config.cost_model.active_volume(&capture.circuit()),
            active_volume_budget: self.config.active_volume_budget,
        };
        for failure in report.failures().take(8) {
            warn!(oracle = name, %failure, "assignment failed");
        }
        if !report.within_budget() {
            warn!(oracle = name, active_volume = report.active_volume, "active volume over budget");
        }
        info!(
            oracle = name,
            passed = report.is_success(),
            assignments = report.outcomes.len(),
            active_volume = report.active_volume,
            "verification finished"
        );
        report
    }

    /// Verifies that `op` implements `|x⟩|y⟩ → |x⟩|y ⊕ predicate(x)⟩` on every
    /// `n`-bit input.
    ///
    /// # Errors
    /// `InvalidArgument` beyond `max_exhaustive_inputs`; capture or whitelist
    /// violations. Per-input failures are reported in the returned report.
    pub fn verify_reversible<F, P>(&self, name: &str, n: usize, op: F, predicate: P) -> Result<VerificationReport, RevqError>
    where
        F: FnOnce(&mut Session, &Register, &Register) -> Result<(), RevqError>,
        P: Fn(&[bool]) -> bool,
    {
        self.check_width(n)?;
        let capture = self.capture(n, op)?;
        self.check_op_types(&capture.instructions)?;
        let x = capture.input.clone();
        let y = capture
            .output
            .clone()
            .ok_or_else(|| RevqError::configuration("oracle capture has no output register"))?;
        debug!(oracle = name, instructions = capture.instructions.len(), "replaying solution");

        let mut outcomes = Vec::with_capacity(1 << n);
        for input in 0..(1u64 << n) {
            let mut stream = vec![
                Instruction::Allocate { register: x.clone() },
                Instruction::Allocate { register: y.clone() },
                Instruction::Write {
                    qubits: x.qubits().to_vec(),
                    value: input,
                },
                Instruction::Label(SOLUTION_LABEL.to_string()),
            ];
            stream.extend(capture.instructions.iter().cloned());
            stream.push(Instruction::Label(READ_LABEL.to_string()));
            stream.push(Instruction::Read {
                qubits: x.qubits().to_vec(),
                register: "x".to_string(),
            });
            stream.push(Instruction::Read {
                qubits: y.qubits().to_vec(),
                register: "y".to_string(),
            });

            let expected = u64::from(predicate(&assignment(input, n)));
            let outcome = match self.replay(&stream) {
                Ok(vm) => {
                    let fault = if vm.allocated_count() != n + 1 {
                        Some(RevqError::invariant(format!(
                            "{} qubits allocated after replay, expected {}",
                            vm.allocated_count(),
                            n + 1
                        )))
                    } else {
                        None
                    };
                    AssignmentOutcome {
                        input,
                        expected,
                        actual: Some(vm.get_classical_register("y")),
                        input_preserved: vm.get_classical_register("x") == input,
                        fault,
                    }
                }
                Err(e) => AssignmentOutcome {
                    input,
                    expected,
                    actual: None,
                    input_preserved: false,
                    fault: Some(e),
                },
            };
            outcomes.push(outcome);
        }
        Ok(self.report(name, &capture, outcomes))
    }

    /// [`verify_reversible`](Self::verify_reversible) for an [`Oracle`].
    pub fn verify_oracle(&self, oracle: &dyn Oracle) -> Result<VerificationReport, RevqError> {
        self.verify_reversible(
            &oracle.name(),
            oracle.arity(),
            |session, x, y| oracle.compile(session, x, y[0]),
            |bits| oracle.evaluate(bits),
        )
    }

    /// Verifies an output-less reversible gate: every input `v` must become
    /// `expected(v)` with all ancillas clean.
    pub fn verify_permutation<F, E>(&self, name: &str, n: usize, op: F, expected: E) -> Result<VerificationReport, RevqError>
    where
        F: FnOnce(&mut Session, &Register) -> Result<(), RevqError>,
        E: Fn(u64) -> u64,
    {
        self.check_width(n)?;
        let capture = self.capture_permutation(n, op)?;
        self.check_op_types(&capture.instructions)?;
        let x = capture.input.clone();

        let mut outcomes = Vec::with_capacity(1 << n);
        for input in 0..(1u64 << n) {
            let mut stream = vec![
                Instruction::Allocate { register: x.clone() },
                Instruction::Write {
                    qubits: x.qubits().to_vec(),
                    value: input,
                },
                Instruction::Label(SOLUTION_LABEL.to_string()),
            ];
            stream.extend(capture.instructions.iter().cloned());
            stream.push(Instruction::Label(READ_LABEL.to_string()));
            stream.push(Instruction::Read {
                qubits: x.qubits().to_vec(),
                register: "x".to_string(),
            });

            let outcome = match self.replay(&stream) {
                Ok(vm) => AssignmentOutcome {
                    input,
                    expected: expected(input),
                    actual: Some(vm.get_classical_register("x")),
                    input_preserved: true,
                    fault: None,
                },
                Err(e) => AssignmentOutcome {
                    input,
                    expected: expected(input),
                    actual: None,
                    input_preserved: true,
                    fault: Some(e),
                },
            };
            outcomes.push(outcome);
        }
        Ok(self.report(name, &capture, outcomes))
    }
}
