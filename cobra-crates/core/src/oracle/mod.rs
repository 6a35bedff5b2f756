//! The boundary to SAT solving.
//!
//! The solvers talk to a [`SatOracle`]: clauses go in, and each call to [`SatOracle::solve`]
//! answers with a model or with unsatisfiability. [`CdclOracle`] is the built-in implementation.
mod cdcl;

pub use cdcl::CdclOracle;
pub use cdcl::OracleStatistics;

use crate::basic_types::Clause;
use crate::basic_types::Literal;
use crate::basic_types::Model;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SatResult {
    /// A model assigning every variable known to the oracle.
    Satisfiable(Model),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }
}

pub trait SatOracle {
    /// Makes sure the variables `1..=num_variables` exist, even if no clause mentions them.
    fn reserve_variables(&mut self, num_variables: usize);

    fn add_clause(&mut self, clause: &Clause);

    /// Decides the clauses added so far under the given assumptions. Assumptions only hold for
    /// this call.
    fn solve(&mut self, assumptions: &[Literal]) -> SatResult;
}
