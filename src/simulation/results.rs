// src/simulation/results.rs
use std::collections::BTreeMap;
use std::fmt;

/// Measurement histogram produced by [`Simulator::sample`](super::Simulator::sample).
/// Keys are little-endian basis indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCounts {
    num_qubits: usize,
    shots: usize,
    counts: BTreeMap<usize, usize>,
}

impl SampleCounts {
    /// Creates a new, empty histogram. (Internal visibility)
    pub(crate) fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            shots: 0,
            counts: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, index: usize) {
        *self.counts.entry(index).or_insert(0) += 1;
        self.shots += 1;
    }

    /// How often `index` was observed.
    pub fn count(&self, index: usize) -> usize {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Observed outcomes in ascending index order.
    pub fn outcomes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// The most frequently observed index, lowest index on ties.
    pub fn most_frequent(&self) -> Option<usize> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(k, _)| *k)
    }
}

impl fmt::Display for SampleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample Counts ({} shots):", self.shots)?;
        if self.counts.is_empty() {
            writeln!(f, "  No samples recorded.")?;
        }
        for (index, count) in &self.counts {
            // Least significant qubit first, matching BitState.
            let bits: String = (0..self.num_qubits)
                .map(|i| if (index >> i) & 1 == 1 { '1' } else { '0' })
                .collect();
            writeln!(f, "  |{}⟩: {}", bits, count)?;
        }
        Ok(())
    }
}
