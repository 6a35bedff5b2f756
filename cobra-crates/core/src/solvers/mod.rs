//! Incremental solvers over the constraints of a game.
//!
//! Both backends implement [`Solver`]: constraints are added under a stack of contexts, and
//! closing a context removes everything added since the matching open. Queries are answered
//! lazily against the constraints present at the time of the call.
mod brute_force_solver;
mod context;
mod equivalences;
mod oracle_solver;

pub use brute_force_solver::BruteForceSolver;
pub use equivalences::VariableEquivalences;
pub use oracle_solver::OracleSolver;

use crate::basic_types::Model;
use crate::basic_types::Variable;
use crate::create_statistics_struct;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::Symbol;
use crate::statistics::QueryStatistic;

create_statistics_struct!(
    /// The number of calls to, and the time spent in, each family of queries.
    SolverStatistics {
        satisfiable: QueryStatistic,
        only_one_model: QueryStatistic,
        num_of_models: QueryStatistic,
        fixed_variables: QueryStatistic,
        equivalences: QueryStatistic,
    }
);

pub trait Solver {
    /// Adds `formula`, with its mapping terms resolved through `parameters`, to the current
    /// context.
    fn add_constraint(&mut self, formula: FormulaId, parameters: &[Symbol]);

    fn open_context(&mut self);

    /// Removes every constraint added since the matching [`Solver::open_context`].
    ///
    /// Panics if no context is open.
    fn close_context(&mut self);

    /// The number of contexts currently open.
    fn context_depth(&self) -> usize;

    fn satisfiable(&mut self) -> bool;

    /// Whether exactly one model remains. The constraints must be satisfiable, and on the brute
    /// force backend [`Solver::satisfiable`] must have been asked since the last change.
    fn only_one_model(&mut self) -> bool;

    fn num_of_models(&mut self) -> usize;

    /// Some model of the current constraints, over the original variables. The constraints
    /// must be satisfiable.
    fn assignment(&mut self) -> Model;

    /// Whether `variable` is true in every model (vacuously so without models).
    fn must_be_true(&mut self, variable: Variable) -> bool;

    /// Whether `variable` is false in every model (vacuously so without models).
    fn must_be_false(&mut self, variable: Variable) -> bool;

    /// The number of original variables taking the same value in every model.
    fn num_of_fixed_variables(&mut self) -> usize;

    fn generate_models(&mut self) -> Vec<Model>;

    /// Groups of free variables which are equal, or opposite, in every model.
    fn variable_equivalences(&mut self) -> VariableEquivalences;

    fn statistics(&self) -> SolverStatistics;
}

/// The available [`Solver`] implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SolverBackend {
    /// Compiles constraints to CNF and asks a SAT oracle ([`OracleSolver`]).
    #[default]
    Oracle,
    /// Enumerates the models of the restriction once and filters them ([`BruteForceSolver`]).
    BruteForce,
}

/// Creates a solver over the variables of `arena` which starts out with `restriction` asserted.
pub fn create_solver<'a>(
    arena: &'a FormulaArena,
    restriction: FormulaId,
    backend: SolverBackend,
) -> Box<dyn Solver + 'a> {
    match backend {
        SolverBackend::Oracle => Box::new(OracleSolver::new(arena, restriction)),
        SolverBackend::BruteForce => Box::new(BruteForceSolver::new(arena, restriction)),
    }
}
