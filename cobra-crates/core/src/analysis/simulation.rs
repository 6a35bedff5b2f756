use log::info;

use super::AnalysisError;
use super::AnalysisOptions;
use super::CodebreakerStrategy;
use super::CodemakerStrategy;
use crate::basic_types::Model;
use crate::formula::Symbol;
use crate::game::Game;
use crate::solvers::Solver;
use crate::symmetry::KnowledgeGraph;
use crate::symmetry::SearchCanonizer;

/// One experiment of a simulated game and its outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationRound {
    pub experiment: usize,
    pub parameters: Vec<Symbol>,
    pub outcome: usize,
    /// The number of codes still possible after the outcome.
    pub num_codes_left: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationReport {
    pub rounds: Vec<SimulationRound>,
    /// The code which remained.
    pub code: Model,
}

impl SimulationReport {
    pub fn num_experiments(&self) -> usize {
        self.rounds.len()
    }
}

/// Plays one game between `breaker` and `maker` until a single code remains.
///
/// Every revealed outcome is added to `solver` permanently; the solver has to hold exactly the
/// restriction of `game` when the simulation starts.
pub fn simulate(
    game: &Game,
    solver: &mut dyn Solver,
    breaker: &mut dyn CodebreakerStrategy,
    maker: &mut dyn CodemakerStrategy,
    options: &AnalysisOptions,
) -> Result<SimulationReport, AnalysisError> {
    if !solver.satisfiable() {
        return Err(AnalysisError::NoCodes);
    }

    let mut knowledge = KnowledgeGraph::new(game.arena(), game.restriction());
    let mut canonizer = SearchCanonizer::default();
    let mut rounds = vec![];

    while !solver.only_one_model() {
        let mut experiments =
            game.generate_experiments(solver, &knowledge, &mut canonizer, options);
        if experiments.is_empty() {
            return Err(AnalysisError::NoInformativeExperiment(
                solver.num_of_models(),
            ));
        }

        let choice = breaker.choose_experiment(&mut experiments, solver);
        if choice >= experiments.len() {
            return Err(AnalysisError::ExperimentOutOfRange {
                index: choice,
                num_experiments: experiments.len(),
            });
        }
        let mut experiment = experiments.swap_remove(choice);
        let experiment_type = experiment.experiment_type();

        let outcome = maker.choose_outcome(&mut experiment, solver);
        if outcome >= experiment_type.num_outcomes() {
            return Err(AnalysisError::OutcomeOutOfRange {
                index: outcome,
                num_outcomes: experiment_type.num_outcomes(),
            });
        }
        let revealed = &experiment_type.outcomes()[outcome];
        if !experiment.satisfiability(solver)[outcome] {
            return Err(AnalysisError::UnsatisfiableOutcome(
                revealed.name().to_owned(),
            ));
        }

        info!(
            "experiment {}: {}, outcome: {}",
            rounds.len() + 1,
            experiment.describe(),
            revealed.name()
        );

        solver.add_constraint(revealed.formula(), experiment.parameters());
        knowledge.record(game.arena(), revealed.formula(), experiment.parameters());
        let num_codes_left = solver.num_of_models();
        info!(
            "  -> {} ({num_codes_left} codes left)",
            game.arena()
                .display(revealed.formula(), Some(experiment.parameters()))
        );

        rounds.push(SimulationRound {
            experiment: experiment.experiment_index(),
            parameters: experiment.parameters().to_vec(),
            outcome,
            num_codes_left,
        });
    }

    let code = solver.assignment();
    info!(
        "solved in {} experiments: {}",
        rounds.len(),
        game.code_to_string(&code)
    );
    super::log_statistics(solver, &canonizer);

    Ok(SimulationReport { rounds, code })
}
