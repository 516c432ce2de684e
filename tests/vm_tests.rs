// tests/vm_tests.rs

use revq::core::{QubitId, Register};
use revq::oracles::SumEquals;
use revq::vm::{Instruction, ProgramBuilder, RevVm};
use revq::{Gate, Oracle, RevqError, Session};

fn reg(name: &str, ids: &[u32]) -> Register {
    Register::new(name, ids.iter().map(|i| QubitId(*i)).collect())
}

#[test]
fn test_vm_write_gate_read() -> Result<(), Box<dyn std::error::Error>> {
    let x = reg("x", &[0, 1, 2]);
    let program = ProgramBuilder::new()
        .add(Instruction::Allocate { register: x.clone() })
        .add(Instruction::Write { qubits: x.qubits().to_vec(), value: 0b011 })
        .add(Instruction::Label("toffoli".to_string()))
        .add(Instruction::Gate(Gate::controlled_not(QubitId(2), vec![QubitId(0), QubitId(1)])?))
        .add(Instruction::Read { qubits: x.qubits().to_vec(), register: "x".to_string() })
        .build()?;

    println!("Program:\n{}", program);
    assert_eq!(program.get_label_pc("toffoli"), Some(2));

    let mut vm = RevVm::new(4).with_allocation_debugging(true);
    vm.run(&program)?;
    assert_eq!(vm.get_classical_register("x"), 0b111);
    assert_eq!(vm.allocated_count(), 3);
    assert_eq!(vm.get_classical_register("never_written"), 0);
    Ok(())
}

#[test]
fn test_builder_rejects_release_of_unknown_register() {
    let result = ProgramBuilder::new()
        .add(Instruction::Allocate { register: reg("a", &[0]) })
        .add(Instruction::Release { register: reg("b", &[1]) })
        .build();
    assert!(matches!(result, Err(RevqError::Configuration { .. })));
}

#[test]
fn test_duplicate_label_keeps_latest() -> Result<(), RevqError> {
    let program = ProgramBuilder::new()
        .add(Instruction::Label("here".to_string()))
        .add(Instruction::Gate(Gate::not(QubitId(0))))
        .add(Instruction::Label("here".to_string()))
        .build()?;
    assert_eq!(program.get_label_pc("here"), Some(2));
    assert_eq!(program.instruction_count(), 3);
    Ok(())
}

#[test]
fn test_dirty_release_is_invariant_violation() -> Result<(), RevqError> {
    let anc = reg("anc", &[0]);
    let program = ProgramBuilder::new()
        .add(Instruction::Allocate { register: anc.clone() })
        .add(Instruction::Gate(Gate::not(QubitId(0))))
        .add(Instruction::Release { register: anc })
        .build()?;

    let mut debugging = RevVm::new(2).with_allocation_debugging(true);
    assert!(matches!(debugging.run(&program), Err(RevqError::InvariantViolation { .. })));

    let mut plain = RevVm::new(2);
    plain.run(&program)?;
    assert_eq!(plain.allocated_count(), 0);
    Ok(())
}

#[test]
fn test_allocation_checks() -> Result<(), RevqError> {
    let a = reg("a", &[0]);
    let mut vm = RevVm::new(2).with_allocation_debugging(true);

    vm.replay(&[Instruction::Allocate { register: a.clone() }])?;
    assert!(matches!(
        vm.replay(&[Instruction::Allocate { register: a.clone() }]),
        Err(RevqError::Resource { .. })
    ));

    // A qubit left at 1 cannot be handed out again.
    let b = reg("b", &[1]);
    let mut dirty = RevVm::new(2).with_allocation_debugging(true);
    dirty.replay(&[Instruction::Gate(Gate::not(QubitId(1)))])?;
    assert!(matches!(
        dirty.replay(&[Instruction::Allocate { register: b.clone() }]),
        Err(RevqError::Resource { .. })
    ));
    assert!(matches!(
        dirty.replay(&[Instruction::Release { register: b }]),
        Err(RevqError::Resource { .. })
    ));

    let beyond = reg("far", &[9]);
    assert!(matches!(
        vm.replay(&[Instruction::Allocate { register: beyond }]),
        Err(RevqError::Resource { .. })
    ));
    Ok(())
}

#[test]
fn test_run_resets_between_programs() -> Result<(), RevqError> {
    let x = reg("x", &[0]);
    let program = ProgramBuilder::new()
        .add(Instruction::Allocate { register: x.clone() })
        .add(Instruction::Gate(Gate::not(QubitId(0))))
        .add(Instruction::Read { qubits: x.qubits().to_vec(), register: "m".to_string() })
        .build()?;
    let mut vm = RevVm::new(1).with_allocation_debugging(true);
    vm.run(&program)?;
    vm.run(&program)?;
    assert_eq!(vm.get_classical_register("m"), 1);
    assert_eq!(vm.get_classical_memory().len(), 1);
    Ok(())
}

#[test]
fn test_session_program_replays_on_vm() -> Result<(), RevqError> {
    let oracle = SumEquals::new(3, 2)?;
    let mut session = Session::default();
    let x = session.allocate("x", 3)?;
    let y = session.allocate("y", 1)?;
    oracle.compile(&mut session, &x, y[0])?;
    let program = session.into_program()?;

    let mut vm = RevVm::new(16).with_allocation_debugging(true);
    vm.run(&program)?;
    // All-zero input: popcount 0, no flip, counter clean.
    assert!(!vm.state().get(y[0])?);
    assert_eq!(vm.allocated_count(), 4);
    assert!(vm.state().bits().iter().all(|b| !b));
    Ok(())
}
