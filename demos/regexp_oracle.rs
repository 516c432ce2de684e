//! Example: Masked pattern ("regexp") oracle.
//! Marks every 4-bit string matching `1.0.` and shows the effect of the
//! compiled circuit on a uniform superposition.

use revq::core::AmplitudeState;
use revq::oracles::Regexp;
use revq::{Harness, Oracle, Session, Simulator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let oracle = Regexp::from_ints(&[1, -1, 0, -1])?;
    println!("--- revq Example: {} ---", oracle.name());

    let mut session = Session::default();
    let x = session.allocate("x", oracle.arity())?;
    let y = session.allocate("y", 1)?;
    oracle.compile(&mut session, &x, y[0])?;
    let circuit = session.circuit();
    println!("Circuit:\n{}", circuit);

    // Every basis component of x is tested at once; y picks up f(x).
    let n = oracle.arity() + 1;
    let state = Simulator::new().run_amplitudes(&circuit, AmplitudeState::uniform(n)?)?;
    let counts = Simulator::new().sample(&state, 1024, 7)?;
    print!("{}", counts);

    let report = Harness::default().verify_oracle(&oracle)?;
    print!("{}", report);
    report.into_result()?;
    Ok(())
}
