//! Limits and defaults shared by the construction and simulation layers.

/// Crate-wide defaults
pub mod revq_constants {
    /// Qubit budget of a construction session or replay VM unless configured otherwise.
    pub const DEFAULT_QUBIT_CAPACITY: usize = 128;
    /// Largest input width the harness will enumerate exhaustively (2^12 assignments).
    pub const DEFAULT_MAX_EXHAUSTIVE_INPUTS: usize = 12;
    /// Largest register the amplitude engine will expand into a dense vector.
    pub const MAX_AMPLITUDE_QUBITS: usize = 20;
    /// Tolerance used when comparing squared amplitude norms.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Label emitted in front of replayed solution instructions.
    pub const SOLUTION_LABEL: &str = "solution";
    /// Label emitted in front of the harness read-out.
    pub const READ_LABEL: &str = "read";
}
