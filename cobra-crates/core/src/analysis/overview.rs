use log::info;
use log::warn;

use super::AnalysisError;
use super::AnalysisOptions;
use crate::basic_types::Model;
use crate::formula::Symbol;
use crate::game::Game;
use crate::solvers::Solver;
use crate::symmetry::KnowledgeGraph;
use crate::symmetry::ParameterGenerator;
use crate::symmetry::SearchCanonizer;
use crate::symmetry::VariableGroups;

/// A code for which an experiment has no outcome, or several.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellFormednessViolation {
    pub experiment: usize,
    pub parameters: Vec<Symbol>,
    pub code: Model,
}

/// Summary figures of a game.
#[derive(Clone, Debug, PartialEq)]
pub struct Overview {
    pub num_variables: usize,
    pub num_codes: usize,
    pub num_experiment_types: usize,
    pub alphabet_size: usize,
    /// Distinct formula nodes below each outcome, summed over all outcomes.
    pub num_formula_nodes: usize,
    /// Parameter tuples respecting the declared constraints, summed over experiment types.
    pub num_parametrizations: u64,
    pub max_branching: usize,
    /// `log(codes) / log(branching)`: no strategy can do better on average. Infinite when no
    /// experiment has two outcomes but several codes exist.
    pub expected_lower_bound: f64,
    /// Classes of free variables which are equal or opposite in every code.
    pub num_equivalence_classes: usize,
    /// The first experiment, in generation order, which is not well formed.
    pub violation: Option<WellFormednessViolation>,
}

impl Overview {
    pub fn average_parametrizations(&self) -> f64 {
        self.num_parametrizations as f64 / self.num_experiment_types as f64
    }

    /// No strategy needs fewer experiments than this in the worst case.
    pub fn worst_case_lower_bound(&self) -> f64 {
        self.expected_lower_bound.ceil()
    }

    pub fn is_well_formed(&self) -> bool {
        self.violation.is_none()
    }
}

/// Computes the [`Overview`] of `game` and checks that every experiment has exactly one
/// outcome for every code.
///
/// `solver` has to hold exactly the restriction of `game`; it is left in that state.
pub fn overview(
    game: &Game,
    solver: &mut dyn Solver,
    options: &AnalysisOptions,
) -> Result<Overview, AnalysisError> {
    let num_codes = solver.num_of_models();
    if num_codes == 0 {
        return Err(AnalysisError::NoCodes);
    }

    let num_formula_nodes = game
        .experiments()
        .iter()
        .flat_map(|experiment| experiment.outcomes())
        .map(|outcome| game.arena().reachable(outcome.formula()).len())
        .sum();
    let num_parametrizations = (0..game.experiments().len())
        .map(|experiment| game.num_parametrizations(experiment))
        .sum();
    let max_branching = game
        .experiments()
        .iter()
        .map(|experiment| experiment.num_outcomes())
        .max()
        .unwrap_or(0);
    let expected_lower_bound = if num_codes == 1 {
        0.0
    } else if max_branching < 2 {
        f64::INFINITY
    } else {
        (num_codes as f64).ln() / (max_branching as f64).ln()
    };

    let mut overview = Overview {
        num_variables: game.num_variables(),
        num_codes,
        num_experiment_types: game.experiments().len(),
        alphabet_size: game.alphabet_size(),
        num_formula_nodes,
        num_parametrizations,
        max_branching,
        expected_lower_bound,
        num_equivalence_classes: solver.variable_equivalences().num_classes(),
        violation: None,
    };
    info!(
        "{} variables, {} codes, {} experiment types with {} parametrizations, branching {}",
        overview.num_variables,
        overview.num_codes,
        overview.num_experiment_types,
        overview.num_parametrizations,
        overview.max_branching
    );

    let knowledge = KnowledgeGraph::new(game.arena(), game.restriction());
    let groups = if options.symmetry_breaking {
        VariableGroups::compute(solver, game.num_variables())
    } else {
        VariableGroups::singletons(game.num_variables())
    };
    let mut canonizer = SearchCanonizer::default();

    'experiments: for (index, experiment) in game.experiments().iter().enumerate() {
        let tuples = ParameterGenerator::new(
            game,
            index,
            &groups,
            &knowledge,
            &mut canonizer,
            options.symmetry_breaking,
        )
        .generate();

        for parameters in tuples {
            solver.open_context();
            solver.add_constraint(experiment.ill_formedness(), &parameters);
            let violation = solver.satisfiable().then(|| solver.assignment());
            solver.close_context();

            if let Some(code) = violation {
                warn!(
                    "experiment {} {} is not well formed for the code {}",
                    experiment.name(),
                    game.parameters_to_string(&parameters),
                    game.code_to_string(&code)
                );
                overview.violation = Some(WellFormednessViolation {
                    experiment: index,
                    parameters,
                    code,
                });
                break 'experiments;
            }
        }
    }

    super::log_statistics(solver, &canonizer);
    Ok(overview)
}
