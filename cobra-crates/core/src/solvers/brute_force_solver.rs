use std::time::Instant;

use log::debug;
use log::trace;

use super::OracleSolver;
use super::Solver;
use super::SolverStatistics;
use super::VariableEquivalences;
use crate::basic_types::Model;
use crate::basic_types::Variable;
use crate::cobra_assert_advanced;
use crate::cobra_assert_simple;
use crate::containers::Trail;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::Symbol;

#[derive(Clone, Debug)]
struct Constraint {
    formula: FormulaId,
    parameters: Vec<Symbol>,
}

/// A solver which materialises every model of the restriction up front and answers queries by
/// filtering that list with direct formula evaluation.
///
/// Constraints are applied lazily: a query filters the remaining candidates by the constraints
/// added since the last query. Candidates removed while a context is open are recorded in that
/// context and given back, in their original order, when it closes.
#[derive(Debug)]
pub struct BruteForceSolver<'a> {
    arena: &'a FormulaArena,
    codes: Vec<Model>,
    /// Indices into `codes` of the candidates satisfying the applied constraints, increasing
    satisfying: Vec<usize>,
    constraints: Trail<Constraint>,
    /// The number of constraints `satisfying` has been filtered by
    num_applied: usize,
    removed: Trail<usize>,
    statistics: SolverStatistics,
}

impl<'a> BruteForceSolver<'a> {
    pub fn new(arena: &'a FormulaArena, restriction: FormulaId) -> Self {
        let codes = OracleSolver::new(arena, restriction).generate_models();
        debug!("brute force solver starts with {} codes", codes.len());

        BruteForceSolver {
            arena,
            satisfying: (0..codes.len()).collect(),
            codes,
            constraints: Trail::default(),
            num_applied: 0,
            removed: Trail::default(),
            statistics: SolverStatistics::default(),
        }
    }

    fn is_ready(&self) -> bool {
        self.num_applied == self.constraints.len()
    }

    fn update(&mut self) {
        if self.is_ready() {
            return;
        }

        let pending = &self.constraints[self.num_applied..];
        let arena = self.arena;
        let codes = &self.codes;
        let record_removals = self.removed.get_checkpoint() > 0;
        let mut kept = Vec::with_capacity(self.satisfying.len());

        for &index in &self.satisfying {
            let satisfied = pending.iter().all(|constraint| {
                arena.evaluate(constraint.formula, &codes[index], &constraint.parameters)
            });
            if satisfied {
                kept.push(index);
            } else if record_removals {
                self.removed.push(index);
            }
        }

        trace!(
            "filtered {} candidates down to {}",
            self.satisfying.len(),
            kept.len()
        );
        self.satisfying = kept;
        self.num_applied = self.constraints.len();
    }

    fn satisfying_models(&mut self) -> impl Iterator<Item = &Model> {
        self.update();
        self.satisfying.iter().map(|&index| &self.codes[index])
    }

    fn num_variables(&self) -> usize {
        self.arena.num_variables()
    }

    /// For every variable, whether it is true in some model and whether it is false in some
    /// model.
    fn possible_values(&mut self) -> Vec<[bool; 2]> {
        let num_variables = self.num_variables();
        let mut possible = vec![[false; 2]; num_variables];
        for model in self.satisfying_models() {
            for variable in Variable::all(num_variables) {
                possible[variable.id() as usize - 1][model.value(variable) as usize] = true;
            }
        }
        possible
    }
}

impl Solver for BruteForceSolver<'_> {
    fn add_constraint(&mut self, formula: FormulaId, parameters: &[Symbol]) {
        self.constraints.push(Constraint {
            formula,
            parameters: parameters.to_vec(),
        });
    }

    fn open_context(&mut self) {
        // Removals caused by constraints of the enclosing context must not be attributed to
        // the new one.
        self.update();
        self.constraints.new_checkpoint();
        self.removed.new_checkpoint();
        trace!("opened context {}", self.constraints.get_checkpoint());
    }

    fn close_context(&mut self) {
        let depth = self.constraints.get_checkpoint();
        cobra_assert_simple!(depth > 0, "closing a context which was never opened");

        let _ = self.constraints.synchronise(depth - 1);
        let mut readmitted = self.removed.synchronise(depth - 1).collect::<Vec<_>>();
        readmitted.sort_unstable();

        let mut merged = Vec::with_capacity(self.satisfying.len() + readmitted.len());
        let (mut lhs, mut rhs) = (0, 0);
        while lhs < self.satisfying.len() || rhs < readmitted.len() {
            if rhs == readmitted.len()
                || (lhs < self.satisfying.len() && self.satisfying[lhs] < readmitted[rhs])
            {
                merged.push(self.satisfying[lhs]);
                lhs += 1;
            } else {
                merged.push(readmitted[rhs]);
                rhs += 1;
            }
        }

        cobra_assert_advanced!(merged.windows(2).all(|pair| pair[0] < pair[1]));
        self.satisfying = merged;
        self.num_applied = self.constraints.len();
        trace!("closed context {depth}");
    }

    fn context_depth(&self) -> usize {
        self.constraints.get_checkpoint()
    }

    fn satisfiable(&mut self) -> bool {
        let start = Instant::now();
        self.update();
        let satisfiable = !self.satisfying.is_empty();
        self.statistics.satisfiable.record(start);
        satisfiable
    }

    fn only_one_model(&mut self) -> bool {
        cobra_assert_simple!(
            self.is_ready(),
            "asked for a single model before the new constraints were checked"
        );
        cobra_assert_simple!(
            !self.satisfying.is_empty(),
            "asked for a single model of unsatisfiable constraints"
        );
        let start = Instant::now();
        let only_one = self.satisfying.len() == 1;
        self.statistics.only_one_model.record(start);
        only_one
    }

    fn num_of_models(&mut self) -> usize {
        let start = Instant::now();
        self.update();
        let num_models = self.satisfying.len();
        self.statistics.num_of_models.record(start);
        num_models
    }

    fn assignment(&mut self) -> Model {
        self.update();
        cobra_assert_simple!(
            !self.satisfying.is_empty(),
            "asked for an assignment of unsatisfiable constraints"
        );
        self.satisfying
            .first()
            .map(|&index| self.codes[index].clone())
            .unwrap_or_else(|| Model::new(self.num_variables()))
    }

    fn must_be_true(&mut self, variable: Variable) -> bool {
        self.satisfying_models().all(|model| model.value(variable))
    }

    fn must_be_false(&mut self, variable: Variable) -> bool {
        self.satisfying_models().all(|model| !model.value(variable))
    }

    fn num_of_fixed_variables(&mut self) -> usize {
        let start = Instant::now();
        let num_fixed = self
            .possible_values()
            .into_iter()
            .filter(|&[can_be_false, can_be_true]| !(can_be_false && can_be_true))
            .count();
        self.statistics.fixed_variables.record(start);
        num_fixed
    }

    fn generate_models(&mut self) -> Vec<Model> {
        self.satisfying_models().cloned().collect()
    }

    fn variable_equivalences(&mut self) -> VariableEquivalences {
        let start = Instant::now();
        self.update();
        let models = self
            .satisfying
            .iter()
            .map(|&index| &self.codes[index])
            .collect::<Vec<_>>();
        let equivalences =
            VariableEquivalences::from_models(self.num_variables(), models.iter().copied());
        self.statistics.equivalences.record(start);
        equivalences
    }

    fn statistics(&self) -> SolverStatistics {
        self.statistics
    }
}
