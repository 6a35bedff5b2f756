use crate::solvers::SolverBackend;

/// Settings shared by the analysis modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// The solver used when a mode creates one.
    pub backend: SolverBackend,
    /// Whether experiments equivalent under a symmetry of the game are explored once. When
    /// disabled, every parameter tuple respecting the declared constraints is considered.
    pub symmetry_breaking: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            backend: SolverBackend::default(),
            symmetry_breaking: true,
        }
    }
}
