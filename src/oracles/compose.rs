// src/oracles/compose.rs

use super::{Oracle, check_arity, debug_check_input};
use crate::core::{QubitId, Register, RevqError};
use crate::session::Session;
use std::collections::HashSet;
use tracing::debug;

/// A sub-oracle applied to a subset of the conjunction's input bits.
#[derive(Debug)]
pub struct Clause {
    pub oracle: Box<dyn Oracle>,
    /// Input positions fed to `oracle`, in its own bit order.
    pub positions: Vec<usize>,
}

impl Clause {
    pub fn new(oracle: Box<dyn Oracle>, positions: Vec<usize>) -> Self {
        Self { oracle, positions }
    }

    /// A clause that sees the whole input unchanged.
    pub fn over_all(oracle: Box<dyn Oracle>) -> Self {
        let positions = (0..oracle.arity()).collect();
        Self { oracle, positions }
    }

    fn project(&self, input: &[bool]) -> Vec<bool> {
        self.positions.iter().map(|p| input[*p]).collect()
    }
}

/// `f(x) = AND` of every clause predicate.
///
/// Each clause is computed into its own status qubit, in order. The output is
/// flipped on all statuses, then the compute block is mirrored (clauses undone
/// in reverse order) and the statuses are released.
#[derive(Debug)]
pub struct Conjunction {
    name: String,
    arity: usize,
    clauses: Vec<Clause>,
}

impl Conjunction {
    /// # Errors
    /// `InvalidArgument` when `arity` is zero, or a clause's positions do not
    /// match its oracle's arity, fall outside `0..arity`, or repeat.
    pub fn new(name: impl Into<String>, arity: usize, clauses: Vec<Clause>) -> Result<Self, RevqError> {
        let name = name.into();
        if arity == 0 {
            return Err(RevqError::invalid_argument(format!("'{}' needs at least one input bit", name)));
        }
        for (i, clause) in clauses.iter().enumerate() {
            if clause.positions.len() != clause.oracle.arity() {
                return Err(RevqError::invalid_argument(format!(
                    "clause {} of '{}': {} positions for {} which takes {}",
                    i,
                    name,
                    clause.positions.len(),
                    clause.oracle.name(),
                    clause.oracle.arity()
                )));
            }
            let mut seen = HashSet::new();
            for p in &clause.positions {
                if *p >= arity || !seen.insert(*p) {
                    return Err(RevqError::invalid_argument(format!(
                        "clause {} of '{}': position {} is out of range or repeated",
                        i, name, p
                    )));
                }
            }
        }
        Ok(Self { name, arity, clauses })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

impl Oracle for Conjunction {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&self, input: &[bool]) -> bool {
        debug_check_input(self, input);
        self.clauses.iter().all(|c| c.oracle.evaluate(&c.project(input)))
    }

    fn compile(&self, session: &mut Session, input: &Register, output: QubitId) -> Result<(), RevqError> {
        check_arity(self, input)?;
        debug!(oracle = %self.name, clauses = self.clauses.len(), "compile");
        if self.clauses.is_empty() {
            return session.apply_not(output);
        }
        let status = session.allocate("status", self.clauses.len())?;
        session.within(
            |s| {
                for (i, clause) in self.clauses.iter().enumerate() {
                    let view = input.select(format!("{}[{}]", self.name, i), &clause.positions)?;
                    clause.oracle.compile(s, &view, status[i])?;
                }
                Ok(())
            },
            |s, _| s.apply_controlled_not(output, status.qubits()),
        )?;
        session.release(&status)
    }

    fn ancilla_count(&self) -> usize {
        self.clauses.len() + self.clauses.iter().map(|c| c.oracle.ancilla_count()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracles::{Nand, Parity, assignment};

    #[test]
    fn positions_must_match_arity() -> Result<(), RevqError> {
        let short = Conjunction::new("bad", 3, vec![Clause::new(Box::new(Nand), vec![0])]);
        assert!(matches!(short, Err(RevqError::InvalidArgument { .. })));
        let repeated = Conjunction::new("bad", 3, vec![Clause::new(Box::new(Nand), vec![1, 1])]);
        assert!(matches!(repeated, Err(RevqError::InvalidArgument { .. })));
        let outside = Conjunction::new("bad", 2, vec![Clause::new(Box::new(Nand), vec![1, 2])]);
        assert!(matches!(outside, Err(RevqError::InvalidArgument { .. })));
        Ok(())
    }

    #[test]
    fn evaluates_and_of_projected_clauses() -> Result<(), RevqError> {
        let conj = Conjunction::new(
            "nand_and_parity",
            3,
            vec![
                Clause::new(Box::new(Nand), vec![0, 1]),
                Clause::new(Box::new(Parity::new(2)?), vec![2, 0]),
            ],
        )?;
        for v in 0..8 {
            let x = assignment(v, 3);
            assert_eq!(conj.evaluate(&x), !(x[0] && x[1]) && (x[2] ^ x[0]));
        }
        assert_eq!(conj.ancilla_count(), 2);
        Ok(())
    }

    #[test]
    fn empty_conjunction_always_marks() -> Result<(), RevqError> {
        let conj = Conjunction::new("true", 2, Vec::new())?;
        let mut session = Session::default();
        let x = session.allocate("x", 2)?;
        let y = session.allocate("y", 1)?;
        conj.compile(&mut session, &x, y[0])?;
        assert_eq!(session.circuit().len(), 1);
        assert!(conj.evaluate(&[false, true]));
        Ok(())
    }
}
