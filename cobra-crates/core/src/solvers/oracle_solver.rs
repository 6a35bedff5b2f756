use std::marker::PhantomData;
use std::time::Instant;

use log::debug;
use log::trace;

use super::Solver;
use super::SolverStatistics;
use super::VariableEquivalences;
use super::context::ContextStore;
use crate::basic_types::Clause;
use crate::basic_types::Literal;
use crate::basic_types::Model;
use crate::basic_types::Variable;
use crate::cnf::ClauseSink;
use crate::cnf::TseitinEncoder;
use crate::cobra_assert_simple;
use crate::containers::HashMap;
use crate::containers::UnionFind;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::Symbol;
use crate::oracle::CdclOracle;
use crate::oracle::SatOracle;
use crate::oracle::SatResult;

/// Answers of queries against the current constraints, dropped whenever they change.
#[derive(Clone, Debug, Default)]
struct QueryCache {
    model: Option<Option<Model>>,
    num_models: Option<usize>,
    num_fixed_variables: Option<usize>,
}

/// A solver which compiles its constraints to CNF and hands them to a [`SatOracle`].
///
/// Every query is answered by a fresh oracle fed the clauses of the current contexts in the
/// order in which they were added. Since the oracle is deterministic, closing a context brings
/// back exactly the answers given before it was opened.
#[derive(Debug)]
pub struct OracleSolver<'a, Oracle = CdclOracle> {
    arena: &'a FormulaArena,
    encoder: TseitinEncoder,
    store: ContextStore,
    cache: QueryCache,
    statistics: SolverStatistics,
    oracle: PhantomData<fn() -> Oracle>,
}

impl<'a> OracleSolver<'a> {
    pub fn new(arena: &'a FormulaArena, restriction: FormulaId) -> Self {
        OracleSolver::with_oracle(arena, restriction)
    }
}

impl<'a, Oracle: SatOracle + Default> OracleSolver<'a, Oracle> {
    pub fn with_oracle(arena: &'a FormulaArena, restriction: FormulaId) -> Self {
        let mut solver = OracleSolver {
            arena,
            encoder: TseitinEncoder::new(arena.num_variables()),
            store: ContextStore::default(),
            cache: QueryCache::default(),
            statistics: SolverStatistics::default(),
            oracle: PhantomData,
        };
        solver.add_constraint(restriction, &[]);
        solver
    }

    fn num_original_variables(&self) -> usize {
        self.encoder.num_original_variables()
    }

    /// A fresh oracle holding the clauses of the current contexts.
    ///
    /// Auxiliary variables are renumbered densely after the original ones, in order of first
    /// occurrence, so that auxiliaries of closed contexts never reach the oracle.
    fn build_oracle(&self) -> Oracle {
        let num_original = self.num_original_variables();
        let mut renamed: HashMap<Variable, Variable> = HashMap::default();
        let mut oracle = Oracle::default();
        oracle.reserve_variables(num_original);

        let mut num_clauses = 0;
        for clause in self.store.clauses(&self.encoder) {
            let literals = clause
                .literals()
                .iter()
                .map(|&literal| {
                    let variable = literal.variable();
                    if variable.id() as usize <= num_original {
                        return literal;
                    }
                    let next = Variable::new((num_original + renamed.len() + 1) as u32);
                    Literal::new(*renamed.entry(variable).or_insert(next), literal.is_positive())
                })
                .collect();
            oracle.add_clause(&Clause::new(literals));
            num_clauses += 1;
        }
        trace!(
            "built oracle with {num_clauses} clauses over {} variables",
            num_original + renamed.len()
        );
        oracle
    }

    /// Drops the auxiliary variables from a model of the oracle.
    fn restrict(&self, model: &Model) -> Model {
        Model::from_fn(self.num_original_variables(), |variable| {
            model.value(variable)
        })
    }

    /// The clause excluding exactly `model` over the original variables.
    fn blocking_clause(&self, model: &Model) -> Clause {
        Clause::new(
            Variable::all(self.num_original_variables())
                .map(|variable| Literal::new(variable, !model.value(variable)))
                .collect(),
        )
    }

    fn current_model(&mut self) -> Option<Model> {
        if self.cache.model.is_none() {
            let model = match self.build_oracle().solve(&[]) {
                SatResult::Satisfiable(model) => Some(self.restrict(&model)),
                SatResult::Unsatisfiable => None,
            };
            self.cache.model = Some(model);
        }
        self.cache.model.clone().flatten()
    }

    /// Whether the constraints stay satisfiable when `literal` is asserted in a nested context.
    fn admits(&mut self, literal: Literal) -> bool {
        self.store.open();
        self.store.add_clause(Clause::unit(literal));
        let satisfiable = self.build_oracle().solve(&[]).is_satisfiable();
        self.store.close();
        satisfiable
    }

    /// Marks which original variables take the same value in every model, given `model` is one
    /// of them. Models met along the way are appended to `samples`.
    fn fixed_variables(
        &self,
        oracle: &mut Oracle,
        model: &Model,
        samples: &mut Vec<Model>,
    ) -> Vec<bool> {
        let num_variables = self.num_original_variables();
        let mut flipped = vec![false; num_variables];
        let mut fixed = vec![false; num_variables];

        for variable in Variable::all(num_variables) {
            let index = variable.id() as usize - 1;
            if flipped[index] {
                continue;
            }
            match oracle.solve(&[Literal::new(variable, !model.value(variable))]) {
                SatResult::Unsatisfiable => fixed[index] = true,
                SatResult::Satisfiable(other) => {
                    let other = self.restrict(&other);
                    for variable in Variable::all(num_variables) {
                        if other.value(variable) != model.value(variable) {
                            flipped[variable.id() as usize - 1] = true;
                        }
                    }
                    samples.push(other);
                }
            }
        }

        fixed
    }
}

impl<Oracle: SatOracle + Default> Solver for OracleSolver<'_, Oracle> {
    fn add_constraint(&mut self, formula: FormulaId, parameters: &[Symbol]) {
        self.encoder
            .add_constraint(self.arena, formula, parameters, &mut self.store);
        self.cache = QueryCache::default();
    }

    fn open_context(&mut self) {
        self.store.open();
    }

    fn close_context(&mut self) {
        self.store.close();
        self.cache = QueryCache::default();
    }

    fn context_depth(&self) -> usize {
        self.store.depth()
    }

    fn satisfiable(&mut self) -> bool {
        let start = Instant::now();
        let satisfiable = self.current_model().is_some();
        self.statistics.satisfiable.record(start);
        satisfiable
    }

    fn only_one_model(&mut self) -> bool {
        let start = Instant::now();
        let model = self.current_model();
        cobra_assert_simple!(
            model.is_some(),
            "asked for a single model of unsatisfiable constraints"
        );
        let Some(model) = model else {
            return false;
        };

        let only_one = match self.cache.num_models {
            Some(num_models) => num_models == 1,
            None => {
                let mut oracle = self.build_oracle();
                oracle.add_clause(&self.blocking_clause(&model));
                !oracle.solve(&[]).is_satisfiable()
            }
        };
        self.statistics.only_one_model.record(start);
        only_one
    }

    fn num_of_models(&mut self) -> usize {
        let start = Instant::now();
        let num_models = match self.cache.num_models {
            Some(num_models) => num_models,
            None => self.generate_models().len(),
        };
        self.statistics.num_of_models.record(start);
        num_models
    }

    fn assignment(&mut self) -> Model {
        let model = self.current_model();
        cobra_assert_simple!(
            model.is_some(),
            "asked for an assignment of unsatisfiable constraints"
        );
        model.unwrap_or_else(|| Model::new(self.num_original_variables()))
    }

    fn must_be_true(&mut self, variable: Variable) -> bool {
        !self.admits(Literal::negative(variable))
    }

    fn must_be_false(&mut self, variable: Variable) -> bool {
        !self.admits(Literal::positive(variable))
    }

    fn num_of_fixed_variables(&mut self) -> usize {
        if let Some(num_fixed) = self.cache.num_fixed_variables {
            return num_fixed;
        }
        let start = Instant::now();

        let num_fixed = match self.current_model() {
            // Without models every variable is vacuously fixed.
            None => self.num_original_variables(),
            Some(model) => {
                let mut oracle = self.build_oracle();
                self.fixed_variables(&mut oracle, &model, &mut vec![])
                    .into_iter()
                    .filter(|&fixed| fixed)
                    .count()
            }
        };

        self.cache.num_fixed_variables = Some(num_fixed);
        self.statistics.fixed_variables.record(start);
        num_fixed
    }

    fn generate_models(&mut self) -> Vec<Model> {
        let mut oracle = self.build_oracle();
        let mut models = vec![];
        while let SatResult::Satisfiable(model) = oracle.solve(&[]) {
            let model = self.restrict(&model);
            oracle.add_clause(&self.blocking_clause(&model));
            models.push(model);
        }
        debug!("enumerated {} models", models.len());
        self.cache.num_models = Some(models.len());
        models
    }

    fn variable_equivalences(&mut self) -> VariableEquivalences {
        let start = Instant::now();
        let Some(model) = self.current_model() else {
            return VariableEquivalences::default();
        };

        let num_variables = self.num_original_variables();
        let mut oracle = self.build_oracle();
        let mut samples = vec![model.clone()];
        let included = self
            .fixed_variables(&mut oracle, &model, &mut samples)
            .into_iter()
            .map(|fixed| !fixed)
            .collect::<Vec<_>>();

        let mut union_find = UnionFind::new(num_variables);
        for lhs in Variable::all(num_variables) {
            let lhs_index = lhs.id() as usize - 1;
            if !included[lhs_index] || union_find.find(lhs_index).0 != lhs_index {
                continue;
            }
            for rhs in Variable::all(num_variables).skip(lhs.id() as usize) {
                let rhs_index = rhs.id() as usize - 1;
                if !included[rhs_index] || union_find.find(rhs_index).0 != rhs_index {
                    continue;
                }
                let parity = model.value(lhs) != model.value(rhs);
                if samples
                    .iter()
                    .any(|sample| (sample.value(lhs) != sample.value(rhs)) != parity)
                {
                    continue;
                }

                // Look for a model in which the relation between the two is broken.
                let mut holds = true;
                for lhs_value in [false, true] {
                    let rhs_value = lhs_value == parity;
                    let assumptions =
                        [Literal::new(lhs, lhs_value), Literal::new(rhs, rhs_value)];
                    if let SatResult::Satisfiable(other) = oracle.solve(&assumptions) {
                        samples.push(self.restrict(&other));
                        holds = false;
                        break;
                    }
                }
                if holds {
                    let _ = union_find.union(lhs_index, rhs_index, parity);
                }
            }
        }

        self.statistics.equivalences.record(start);
        VariableEquivalences::from_union_find(&mut union_find, &included)
    }

    fn statistics(&self) -> SolverStatistics {
        self.statistics
    }
}
