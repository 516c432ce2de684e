// tests/oracle_tests.rs

use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use revq::oracles::{
    Clause, Conjunction, FixedPattern, FlippedHalves, Nand, NoThreeInARow, Palindrome, Parity, Regexp, SumEquals,
    assignment, grid, parse_bits,
};
use revq::{BitState, Harness, HarnessConfig, Oracle, RevqError, Session, Simulator, VerificationReport};

fn verify(oracle: &dyn Oracle) -> Result<VerificationReport, RevqError> {
    Harness::new(HarnessConfig::default()).verify_oracle(oracle)?.into_result()
}

fn marked(report: &VerificationReport) -> Vec<u64> {
    report
        .outcomes
        .iter()
        .filter(|o| o.actual == Some(1))
        .map(|o| o.input)
        .collect()
}

fn value_of(text: &str) -> Result<u64, RevqError> {
    Ok(parse_bits(text)?
        .iter()
        .enumerate()
        .fold(0, |acc, (i, b)| if *b { acc | (1 << i) } else { acc }))
}

/// Compiles `oracle` twice in a row and checks the result is the identity on
/// every `(x, y)` basis state, ancillas included.
fn assert_applied_twice_is_identity(oracle: &dyn Oracle) -> Result<(), RevqError> {
    let n = oracle.arity();
    let mut session = Session::default();
    let x = session.allocate("x", n)?;
    let y = session.allocate("y", 1)?;
    oracle.compile(&mut session, &x, y[0])?;
    oracle.compile(&mut session, &x, y[0])?;
    let circuit = session.circuit();
    let width = circuit.width().max(n + 1);
    let simulator = Simulator::new();
    for value in 0..(1u64 << (n + 1)) {
        let input = BitState::from_value(width, value);
        let out = simulator.run(&circuit, &input)?;
        assert_eq!(out, input, "{} changed state {:#b}", oracle.name(), value);
    }
    Ok(())
}

fn random_below(rng: &mut StdRng, bound: u32) -> u32 {
    let draw: u32 = StandardUniform.sample(rng);
    draw % bound
}

#[test]
fn test_sum_of_two_bits_equals_one() -> Result<(), RevqError> {
    let report = verify(&SumEquals::new(2, 1)?)?;
    // "01" and "10" flip the output, "00" and "11" do not.
    assert_eq!(marked(&report), vec![value_of("10")?, value_of("01")?]);
    Ok(())
}

#[test]
fn test_fixed_pattern_0110() -> Result<(), RevqError> {
    let report = verify(&FixedPattern::new(&parse_bits("0110")?)?)?;
    assert_eq!(marked(&report), vec![value_of("0110")?]);
    assert_eq!(report.outcomes.len(), 16);
    Ok(())
}

#[test]
fn test_two_by_two_grid_marks_single_assignment() -> Result<(), RevqError> {
    let report = verify(&grid::kakuro(&[1, 2], &[1, 2])?)?;
    assert_eq!(marked(&report), vec![value_of("0111")?]);
    Ok(())
}

#[test]
fn test_regexp_leading_one() -> Result<(), RevqError> {
    let report = verify(&Regexp::from_ints(&[1, -1, -1])?)?;
    let expected: Vec<u64> = ["100", "110", "101", "111"]
        .iter()
        .map(|t| value_of(t))
        .collect::<Result<_, _>>()?;
    assert_eq!(marked(&report), expected);
    Ok(())
}

#[test]
fn test_regexp_middle_wildcard() -> Result<(), RevqError> {
    let report = verify(&Regexp::from_ints(&[0, -1, 1])?)?;
    assert_eq!(marked(&report), vec![value_of("001")?, value_of("011")?]);
    Ok(())
}

#[test]
fn test_small_logic_oracles() -> Result<(), RevqError> {
    verify(&Nand)?;
    for n in 1..=5 {
        verify(&Parity::new(n)?)?;
    }
    for n in [2, 4, 6] {
        verify(&FlippedHalves::new(n)?)?;
    }
    Ok(())
}

#[test]
fn test_palindromes() -> Result<(), RevqError> {
    for n in 2..=7 {
        let oracle = Palindrome::new(n)?;
        let report = verify(&oracle)?;
        let expected = report.outcomes.iter().filter(|o| oracle.evaluate(&assignment(o.input, n))).count();
        assert_eq!(marked(&report).len(), expected, "width {}", n);
        assert_eq!(expected, 1 << n.div_ceil(2), "width {}", n);
    }
    let report = verify(&Palindrome::new(3)?)?;
    let expected: Vec<u64> = ["000", "010", "101", "111"]
        .iter()
        .map(|t| value_of(t))
        .collect::<Result<_, _>>()?;
    assert_eq!(marked(&report), expected);
    Ok(())
}

#[test]
fn test_oracle_applied_twice_is_identity() -> Result<(), RevqError> {
    assert_applied_twice_is_identity(&SumEquals::new(4, 2)?)?;
    assert_applied_twice_is_identity(&SumEquals::new(3, 5)?)?;
    assert_applied_twice_is_identity(&NoThreeInARow::new(5)?)?;
    assert_applied_twice_is_identity(&grid::kakuro(&[1, 2], &[1, 2])?)?;
    assert_applied_twice_is_identity(&Palindrome::new(5)?)?;
    assert_applied_twice_is_identity(&FlippedHalves::new(4)?)?;
    assert_applied_twice_is_identity(&Regexp::from_ints(&[1, -1, 0])?)?;
    Ok(())
}

#[test]
fn test_repeating_pattern_all_widths() -> Result<(), RevqError> {
    for n in 2..=6 {
        let oracle = FixedPattern::repeating_011(n)?;
        let report = verify(&oracle)?;
        assert_eq!(marked(&report).len(), 1, "width {}", n);
    }
    let report = verify(&FixedPattern::repeating_011(4)?)?;
    assert_eq!(marked(&report), vec![value_of("0110")?]);
    Ok(())
}

#[test]
fn test_no_three_in_a_row() -> Result<(), RevqError> {
    for n in 3..=7 {
        verify(&NoThreeInARow::new(n)?)?;
    }
    let report = verify(&NoThreeInARow::new(4)?)?;
    let unmarked: Vec<u64> = report
        .outcomes
        .iter()
        .filter(|o| o.actual == Some(0))
        .map(|o| o.input)
        .collect();
    let mut expected: Vec<u64> = ["0000", "0001", "0111", "1000", "1110", "1111"]
        .iter()
        .map(|t| value_of(t))
        .collect::<Result<_, _>>()?;
    expected.sort();
    assert_eq!(unmarked, expected);
    Ok(())
}

#[test]
fn test_sum_equals_every_target() -> Result<(), RevqError> {
    for n in 1..=6 {
        for s in 0..=n + 1 {
            let report = verify(&SumEquals::new(n, s)?)?;
            let expected = report
                .outcomes
                .iter()
                .filter(|o| (o.input.count_ones() as usize) == s)
                .count();
            assert_eq!(marked(&report).len(), expected, "n={} s={}", n, s);
        }
    }
    Ok(())
}

#[test]
fn test_sum_above_width_never_fires() -> Result<(), RevqError> {
    let oracle = SumEquals::new(3, 5)?;
    let report = verify(&oracle)?;
    assert!(marked(&report).is_empty());
    assert_eq!(report.resources.total_gates(), 0);
    Ok(())
}

#[test]
fn test_row_and_column_constraints() -> Result<(), RevqError> {
    let rows = grid::row_constraints(&[1, 0, 2], 2)?;
    let report = verify(&rows)?;
    // Row 0 has one of two cells set, row 1 none, row 2 both: 2 * 1 * 1 grids.
    assert_eq!(marked(&report).len(), 2);

    let columns = grid::column_constraints(&[1, 2], 3)?;
    let report = verify(&columns)?;
    // Column 0 picks one of three rows, column 1 two of three.
    assert_eq!(marked(&report).len(), 3 * 3);
    Ok(())
}

#[test]
fn test_random_regexp_patterns() -> Result<(), RevqError> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let n = 1 + random_below(&mut rng, 6) as usize;
        let pattern: Vec<i32> = (0..n).map(|_| random_below(&mut rng, 3) as i32 - 1).collect();
        let oracle = Regexp::from_ints(&pattern)?;
        let report = verify(&oracle)?;
        let wildcards = pattern.iter().filter(|v| **v == -1).count();
        assert_eq!(marked(&report).len(), 1 << wildcards, "pattern {:?}", pattern);
    }
    Ok(())
}

#[test]
fn test_random_kakuro_puzzles() -> Result<(), RevqError> {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..6 {
        let rows = 1 + random_below(&mut rng, 3) as usize;
        let cols = 1 + random_below(&mut rng, 3) as usize;
        let solution = (0..rows * cols).fold(0u64, |acc, i| acc | (u64::from(random_below(&mut rng, 2)) << i));
        let bits = assignment(solution, rows * cols);
        let row_sums: Vec<usize> = (0..rows)
            .map(|r| (0..cols).filter(|c| bits[r * cols + c]).count())
            .collect();
        let col_sums: Vec<usize> = (0..cols)
            .map(|c| (0..rows).filter(|r| bits[r * cols + c]).count())
            .collect();

        let report = verify(&grid::kakuro(&row_sums, &col_sums)?)?;
        assert!(marked(&report).contains(&solution), "rows {:?} cols {:?}", row_sums, col_sums);
    }
    Ok(())
}

#[test]
fn test_conjunction_composes_verified_oracles() -> Result<(), RevqError> {
    let first = NoThreeInARow::new(4)?;
    let second = SumEquals::new(4, 2)?;
    verify(&first)?;
    verify(&second)?;
    let sub_ancillas = first.ancilla_count() + second.ancilla_count();

    let conj = Conjunction::new(
        "mixed_and_balanced",
        4,
        vec![Clause::over_all(Box::new(first)), Clause::over_all(Box::new(second))],
    )?;
    let report = verify(&conj)?;
    for outcome in &report.outcomes {
        let x = assignment(outcome.input, 4);
        let expected = first.evaluate(&x) && second.evaluate(&x);
        assert_eq!(outcome.actual, Some(u64::from(expected)));
    }
    assert_eq!(conj.ancilla_count(), 2 + sub_ancillas);
    // Statuses once, every sub-oracle ancilla on the way in and again in the mirror.
    assert_eq!(report.resources.allocated_qubits, 2 + 2 * sub_ancillas);
    Ok(())
}

#[test]
fn test_input_width_mismatch_is_rejected() -> Result<(), RevqError> {
    let mut session = Session::default();
    let x = session.allocate("x", 3)?;
    let y = session.allocate("y", 1)?;
    let oracle = SumEquals::new(4, 1)?;
    assert!(matches!(
        oracle.compile(&mut session, &x, y[0]),
        Err(RevqError::InvalidArgument { .. })
    ));
    assert!(matches!(SumEquals::new(0, 0), Err(RevqError::InvalidArgument { .. })));
    assert!(matches!(NoThreeInARow::new(2), Err(RevqError::InvalidArgument { .. })));
    assert!(matches!(Palindrome::new(1), Err(RevqError::InvalidArgument { .. })));
    assert!(matches!(grid::kakuro(&[], &[1]), Err(RevqError::InvalidArgument { .. })));
    Ok(())
}

#[test]
fn test_output_inside_input_is_rejected() -> Result<(), RevqError> {
    let mut session = Session::default();
    let x = session.allocate("x", 2)?;
    assert!(matches!(Nand.compile(&mut session, &x, x[0]), Err(RevqError::Configuration { .. })));
    Ok(())
}
