use std::collections::BTreeSet;

use itertools::Itertools;

use crate::basic_types::Model;
use crate::basic_types::Variable;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::MappingId;
use crate::formula::Symbol;
use crate::solvers::create_solver;
use crate::solvers::Solver;
use crate::solvers::SolverBackend;

#[derive(Clone, Debug)]
pub struct Outcome {
    pub(crate) name: String,
    pub(crate) formula: FormulaId,
    pub(crate) is_final: bool,
}

impl Outcome {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formula(&self) -> FormulaId {
        self.formula
    }

    /// Whether observing this outcome means the code itself was guessed, so that identifying
    /// the code takes no further experiment.
    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// A kind of experiment with its parameter constraints and the tables derived from its
/// outcomes.
#[derive(Clone, Debug)]
pub struct ExperimentType {
    pub(crate) name: String,
    pub(crate) num_parameters: usize,
    pub(crate) outcomes: Vec<Outcome>,
    /// `different[e]` holds the positions whose symbol has to differ from the one at `e`.
    pub(crate) different: Vec<BTreeSet<usize>>,
    /// `smaller[e]` holds the positions `d < e` whose symbol may not exceed the one at `e`.
    pub(crate) smaller: Vec<BTreeSet<usize>>,
    /// The mappings applied to each parameter by some outcome.
    pub(crate) used_mappings: Vec<Vec<MappingId>>,
    /// The variables some outcome refers to directly.
    pub(crate) used_variables: BTreeSet<Variable>,
    /// `interchangeable[d][a]`: the variables reached from symbol `a` at position `d` are never
    /// reached from another position, nor referred to directly.
    pub(crate) interchangeable: Vec<Vec<bool>>,
    /// Holds exactly when not exactly one outcome holds.
    pub(crate) ill_formedness: FormulaId,
}

impl ExperimentType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_parameters(&self) -> usize {
        self.num_parameters
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn num_outcomes(&self) -> usize {
        self.outcomes.len()
    }

    pub fn used_mappings(&self, position: usize) -> &[MappingId] {
        &self.used_mappings[position]
    }

    pub fn refers_to(&self, variable: Variable) -> bool {
        self.used_variables.contains(&variable)
    }

    pub fn is_interchangeable(&self, position: usize, symbol: Symbol) -> bool {
        self.interchangeable[position][symbol as usize]
    }

    /// A formula over the parameters which is satisfiable exactly when some code admits zero
    /// or several outcomes.
    pub fn ill_formedness(&self) -> FormulaId {
        self.ill_formedness
    }

    /// Whether `symbol` may be placed at `position` after `prefix` (the symbols of the earlier
    /// positions).
    pub fn admits(&self, prefix: &[Symbol], position: usize, symbol: Symbol) -> bool {
        self.different[position]
            .iter()
            .filter(|&&other| other < position)
            .all(|&other| prefix[other] != symbol)
            && self.smaller[position]
                .iter()
                .all(|&other| prefix[other] <= symbol)
    }

    /// Whether the parameter tuple respects every distinctness and ordering constraint.
    pub fn admits_all(&self, parameters: &[Symbol]) -> bool {
        parameters.len() == self.num_parameters
            && (0..self.num_parameters)
                .all(|position| self.admits(parameters, position, parameters[position]))
    }

    /// Whether symbols `a` at `d` and `b` at `e` can occur together.
    pub(crate) fn compatible(&self, d: usize, a: Symbol, e: usize, b: Symbol) -> bool {
        let conflicts_distinct = a == b && self.different[e].contains(&d);
        let conflicts_sorted =
            (a > b && self.smaller[e].contains(&d)) || (b > a && self.smaller[d].contains(&e));
        !(conflicts_distinct || conflicts_sorted)
    }

    /// Whether a constraint ties `position` to a later position.
    pub(crate) fn constrains_later(&self, position: usize) -> bool {
        self.different[position]
            .iter()
            .any(|&other| other > position)
            || (position + 1..self.num_parameters)
                .any(|later| self.smaller[later].contains(&position))
    }
}

/// A validated game: the variables and mappings, the restriction on the secret code, and the
/// experiment types the codebreaker may use.
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) arena: FormulaArena,
    pub(crate) alphabet: Vec<String>,
    pub(crate) restriction: FormulaId,
    pub(crate) experiments: Vec<ExperimentType>,
}

impl Game {
    pub fn arena(&self) -> &FormulaArena {
        &self.arena
    }

    pub fn num_variables(&self) -> usize {
        self.arena.num_variables()
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet.len()
    }

    pub fn restriction(&self) -> FormulaId {
        self.restriction
    }

    pub fn experiments(&self) -> &[ExperimentType] {
        &self.experiments
    }

    pub fn experiment(&self, index: usize) -> &ExperimentType {
        &self.experiments[index]
    }

    pub fn experiment_by_name(&self, name: &str) -> Option<usize> {
        self.experiments
            .iter()
            .position(|experiment| experiment.name == name)
    }

    /// A solver over the variables of the game holding just the restriction.
    pub fn solver(&self, backend: SolverBackend) -> Box<dyn Solver + '_> {
        create_solver(&self.arena, self.restriction, backend)
    }

    pub fn parameters_to_string(&self, parameters: &[Symbol]) -> String {
        parameters
            .iter()
            .map(|&symbol| self.alphabet[symbol as usize].as_str())
            .join(" ")
    }

    /// The names of the variables set to true in `code`.
    pub fn code_to_string(&self, code: &Model) -> String {
        code.true_variables()
            .map(|variable| self.arena.variable_name(variable))
            .join(" ")
    }

    /// The number of parameter tuples of an experiment type which respect its constraints,
    /// ignoring symmetries.
    pub fn num_parametrizations(&self, experiment: usize) -> u64 {
        fn count(
            experiment: &ExperimentType,
            alphabet_size: usize,
            prefix: &mut Vec<Symbol>,
        ) -> u64 {
            if prefix.len() == experiment.num_parameters {
                return 1;
            }
            let position = prefix.len();
            let mut total = 0;
            for symbol in (0..alphabet_size).map(|symbol| symbol as Symbol) {
                if experiment.admits(prefix, position, symbol) {
                    prefix.push(symbol);
                    total += count(experiment, alphabet_size, prefix);
                    let _ = prefix.pop();
                }
            }
            total
        }

        count(
            &self.experiments[experiment],
            self.alphabet.len(),
            &mut Vec::with_capacity(self.experiments[experiment].num_parameters),
        )
    }
}
