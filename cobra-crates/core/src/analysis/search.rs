use log::debug;
use log::info;

use super::AnalysisError;
use super::AnalysisOptions;
use super::CodebreakerStrategy;
use crate::cobra_assert_simple;
use crate::game::Game;
use crate::solvers::Solver;
use crate::symmetry::KnowledgeGraph;
use crate::symmetry::SearchCanonizer;

/// How a codebreaker strategy fares against every possible code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub num_codes: usize,
    /// The largest number of experiments needed to identify a code.
    pub worst_case: usize,
    /// The number of experiments needed, summed over all codes.
    pub total_experiments: usize,
    /// The number of codes identified by the exploration, which equals `num_codes` once it
    /// completes.
    pub num_solved: usize,
}

impl AnalysisReport {
    /// The expected number of experiments for a code drawn uniformly.
    pub fn average_case(&self) -> f64 {
        self.total_experiments as f64 / self.num_codes as f64
    }

    fn record(&mut self, experiments: usize) {
        self.num_solved += 1;
        self.total_experiments += experiments;
        self.worst_case = self.worst_case.max(experiments);
    }
}

struct SearchNode {
    knowledge: KnowledgeGraph,
    /// The number of experiments performed to reach this node, including the one about to be
    /// chosen.
    depth: usize,
}

struct Explorer<'a, 'game> {
    game: &'game Game,
    solver: &'a mut dyn Solver,
    breaker: &'a mut dyn CodebreakerStrategy,
    canonizer: SearchCanonizer,
    options: &'a AnalysisOptions,
    report: AnalysisReport,
}

impl Explorer<'_, '_> {
    fn explore(&mut self, node: &SearchNode) -> Result<(), AnalysisError> {
        let mut experiments = self.game.generate_experiments(
            self.solver,
            &node.knowledge,
            &mut self.canonizer,
            self.options,
        );
        if experiments.is_empty() {
            return Err(AnalysisError::NoInformativeExperiment(
                self.solver.num_of_models(),
            ));
        }

        let choice = self
            .breaker
            .choose_experiment(&mut experiments, self.solver);
        let experiment = experiments
            .get(choice)
            .ok_or(AnalysisError::ExperimentOutOfRange {
                index: choice,
                num_experiments: experiments.len(),
            })?;
        debug!(
            "depth {}: performing {}",
            node.depth,
            experiment.describe()
        );

        for outcome in experiment.experiment_type().outcomes() {
            self.solver.open_context();
            self.solver
                .add_constraint(outcome.formula(), experiment.parameters());

            let result = if !self.solver.satisfiable() {
                Ok(())
            } else if self.solver.only_one_model() {
                let num_experiments = if outcome.is_final() {
                    node.depth
                } else {
                    node.depth + 1
                };
                self.report.record(num_experiments);
                debug!(
                    "code {} identified after {num_experiments} experiments",
                    self.report.num_solved
                );
                Ok(())
            } else {
                let mut knowledge = node.knowledge.clone();
                knowledge.record(
                    self.game.arena(),
                    outcome.formula(),
                    experiment.parameters(),
                );
                self.explore(&SearchNode {
                    knowledge,
                    depth: node.depth + 1,
                })
            };

            self.solver.close_context();
            result?;
        }

        Ok(())
    }
}

/// Plays `breaker` against every code: after each experiment the search branches on every
/// outcome some remaining code produces, until a single code remains.
///
/// `solver` has to hold exactly the restriction of `game`; it is left in that state.
pub fn analyze(
    game: &Game,
    solver: &mut dyn Solver,
    breaker: &mut dyn CodebreakerStrategy,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, AnalysisError> {
    cobra_assert_simple!(
        solver.context_depth() == 0,
        "the analysis starts from the restriction alone"
    );

    let num_codes = solver.num_of_models();
    if num_codes == 0 {
        return Err(AnalysisError::NoCodes);
    }
    info!("analyzing a strategy over {num_codes} codes");

    let mut report = AnalysisReport {
        num_codes,
        ..AnalysisReport::default()
    };
    if num_codes == 1 {
        // The only code is known without any experiment.
        report.record(0);
        return Ok(report);
    }

    let mut explorer = Explorer {
        game,
        solver,
        breaker,
        canonizer: SearchCanonizer::default(),
        options,
        report,
    };
    explorer.explore(&SearchNode {
        knowledge: KnowledgeGraph::new(game.arena(), game.restriction()),
        depth: 1,
    })?;

    let report = explorer.report;
    super::log_statistics(explorer.solver, &explorer.canonizer);
    info!(
        "worst case {}, average case {:.4} ({}/{})",
        report.worst_case,
        report.average_case(),
        report.total_experiments,
        report.num_codes
    );
    Ok(report)
}
