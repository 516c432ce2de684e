//! Example: Kakuro grid oracle.
//! Compiles the row/column sum constraints of a 2x3 grid into a reversible
//! oracle, verifies it exhaustively and lists the grids it marks.

use revq::oracles::grid;
use revq::{CostModel, Harness, HarnessConfig, Oracle, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    println!("--- revq Example: Kakuro rows=[2, 1] cols=[1, 1, 1] ---");
    let rows = [2usize, 1];
    let cols = [1usize, 1, 1];
    let oracle = grid::kakuro(&rows, &cols)?;

    // --- Compile once to inspect the gate sequence ---
    let mut session = Session::default();
    let x = session.allocate("x", oracle.arity())?;
    let y = session.allocate("y", 1)?;
    oracle.compile(&mut session, &x, y[0])?;
    let circuit = session.circuit();
    println!(
        "Compiled {} gates, active volume {}, {} ancilla qubits over all sub-oracles",
        circuit.len(),
        CostModel::default().active_volume(&circuit),
        oracle.ancilla_count()
    );

    // --- Verify against the truth table ---
    let report = Harness::new(HarnessConfig::default()).verify_oracle(&oracle)?;
    print!("{}", report);

    println!("Marked grids:");
    for outcome in report.outcomes.iter().filter(|o| o.actual == Some(1)) {
        for r in 0..rows.len() {
            let row: String = (0..cols.len())
                .map(|c| if (outcome.input >> (r * cols.len() + c)) & 1 == 1 { '■' } else { '□' })
                .collect();
            println!("  {}", row);
        }
        println!();
    }

    report.into_result()?;
    Ok(())
}
