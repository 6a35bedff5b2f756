use log::debug;

use super::ExperimentType;
use super::Game;
use crate::analysis::AnalysisOptions;
use crate::cobra_assert_eq_simple;
use crate::formula::Symbol;
use crate::solvers::Solver;
use crate::symmetry::AutomorphismOracle;
use crate::symmetry::KnowledgeGraph;
use crate::symmetry::ParameterGenerator;
use crate::symmetry::VariableGroups;

/// An experiment type together with concrete parameters.
///
/// Per-outcome facts are computed on request, each by asserting the outcome in a fresh solver
/// context, and cached afterwards. The cache is only meaningful for the solver state it was
/// computed against.
#[derive(Clone, Debug)]
pub struct ParametrizedExperiment<'game> {
    game: &'game Game,
    experiment: usize,
    parameters: Vec<Symbol>,
    satisfiable: Option<Vec<bool>>,
    num_models: Option<Vec<usize>>,
    num_fixed_variables: Option<Vec<usize>>,
}

impl<'game> ParametrizedExperiment<'game> {
    pub fn new(
        game: &'game Game,
        experiment: usize,
        parameters: Vec<Symbol>,
    ) -> ParametrizedExperiment<'game> {
        cobra_assert_eq_simple!(
            parameters.len(),
            game.experiment(experiment).num_parameters(),
            "one symbol per parameter"
        );
        ParametrizedExperiment {
            game,
            experiment,
            parameters,
            satisfiable: None,
            num_models: None,
            num_fixed_variables: None,
        }
    }

    pub fn experiment_index(&self) -> usize {
        self.experiment
    }

    pub fn experiment_type(&self) -> &'game ExperimentType {
        &self.game.experiments[self.experiment]
    }

    pub fn parameters(&self) -> &[Symbol] {
        &self.parameters
    }

    fn per_outcome<T>(
        &self,
        solver: &mut dyn Solver,
        query: impl Fn(&mut dyn Solver) -> T,
    ) -> Vec<T> {
        self.experiment_type()
            .outcomes()
            .iter()
            .map(|outcome| {
                solver.open_context();
                solver.add_constraint(outcome.formula(), &self.parameters);
                let answer = query(solver);
                solver.close_context();
                answer
            })
            .collect()
    }

    /// For every outcome, whether some remaining code produces it.
    pub fn satisfiability(&mut self, solver: &mut dyn Solver) -> &[bool] {
        if self.satisfiable.is_none() {
            self.satisfiable = Some(self.per_outcome(solver, |solver| solver.satisfiable()));
        }
        self.satisfiable.as_deref().expect("computed above")
    }

    pub fn num_satisfiable(&mut self, solver: &mut dyn Solver) -> usize {
        self.satisfiability(solver)
            .iter()
            .filter(|&&satisfiable| satisfiable)
            .count()
    }

    /// For every outcome, the number of remaining codes producing it.
    pub fn num_of_models(&mut self, solver: &mut dyn Solver) -> &[usize] {
        if self.num_models.is_none() {
            self.num_models = Some(self.per_outcome(solver, |solver| solver.num_of_models()));
        }
        self.num_models.as_deref().expect("computed above")
    }

    /// For every outcome, the number of variables fixed once it is observed (all of them for
    /// an outcome no remaining code produces).
    pub fn num_of_fixed_variables(&mut self, solver: &mut dyn Solver) -> &[usize] {
        if self.num_fixed_variables.is_none() {
            self.num_fixed_variables =
                Some(self.per_outcome(solver, |solver| solver.num_of_fixed_variables()));
        }
        self.num_fixed_variables
            .as_deref()
            .expect("computed above")
    }

    /// The experiment type name followed by the parameters.
    pub fn describe(&self) -> String {
        let experiment = self.experiment_type();
        if self.parameters.is_empty() {
            experiment.name().to_owned()
        } else {
            format!(
                "{} {}",
                experiment.name(),
                self.game.parameters_to_string(&self.parameters)
            )
        }
    }
}

impl Game {
    /// The experiments worth considering given the current knowledge: one per symmetry class
    /// of parameters of every experiment type, restricted to those for which at least two
    /// outcomes remain possible.
    ///
    /// `solver` must hold the same knowledge as `knowledge`, and be satisfiable.
    pub fn generate_experiments<'game>(
        &'game self,
        solver: &mut dyn Solver,
        knowledge: &KnowledgeGraph,
        canonizer: &mut dyn AutomorphismOracle,
        options: &AnalysisOptions,
    ) -> Vec<ParametrizedExperiment<'game>> {
        let groups = if options.symmetry_breaking {
            VariableGroups::compute(solver, self.num_variables())
        } else {
            VariableGroups::singletons(self.num_variables())
        };

        let mut experiments = vec![];
        for index in 0..self.experiments.len() {
            let tuples = ParameterGenerator::new(
                self,
                index,
                &groups,
                knowledge,
                canonizer,
                options.symmetry_breaking,
            )
            .generate();

            for parameters in tuples {
                let mut experiment = ParametrizedExperiment::new(self, index, parameters);
                if experiment.num_satisfiable(solver) >= 2 {
                    experiments.push(experiment);
                }
            }
        }

        debug!("{} informative experiments", experiments.len());
        experiments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ExperimentDefinition;
    use crate::game::GameBuilder;
    use crate::solvers::create_solver;
    use crate::solvers::SolverBackend;

    /// One of three cups hides a ball; lifting a cup shows whether the ball is below it.
    fn cups() -> Game {
        let mut builder = GameBuilder::new(["1", "2", "3"]);
        let cups = (1..=3)
            .map(|cup| builder.new_variable(format!("ball_{cup}")))
            .collect::<Vec<_>>();
        let cup = builder.new_mapping("cup", cups.clone());
        let formulas = builder.formulas();
        let leaves = cups
            .iter()
            .map(|&variable| formulas.variable(variable))
            .collect();
        let restriction = formulas.exactly(1, leaves);
        let found = formulas.mapping(0, cup);
        let empty = formulas.not(found);
        builder.set_restriction(restriction);
        builder.add_experiment(
            ExperimentDefinition::new("lift", 1)
                .final_outcome("found", found)
                .outcome("empty", empty),
        );
        builder.build().expect("valid game")
    }

    #[test]
    fn outcome_facts_are_computed_in_contexts() {
        let game = cups();
        let mut solver = create_solver(game.arena(), game.restriction(), SolverBackend::Oracle);
        let mut experiment = ParametrizedExperiment::new(&game, 0, vec![1]);

        assert_eq!(experiment.satisfiability(solver.as_mut()), &[true, true]);
        assert_eq!(experiment.num_of_models(solver.as_mut()), &[1, 2]);
        assert_eq!(experiment.num_of_fixed_variables(solver.as_mut()), &[3, 1]);
        assert_eq!(experiment.describe(), "lift 2");
        assert_eq!(solver.context_depth(), 0);
        assert_eq!(solver.num_of_models(), 3);
    }

    #[test]
    fn symmetric_cups_need_one_experiment() {
        let game = cups();
        let knowledge = KnowledgeGraph::new(game.arena(), game.restriction());
        let mut canonizer = crate::symmetry::SearchCanonizer::default();

        for backend in [SolverBackend::Oracle, SolverBackend::BruteForce] {
            let mut solver = create_solver(game.arena(), game.restriction(), backend);
            let _ = solver.satisfiable();
            let options = AnalysisOptions {
                backend,
                symmetry_breaking: true,
            };

            let experiments =
                game.generate_experiments(solver.as_mut(), &knowledge, &mut canonizer, &options);
            assert_eq!(experiments.len(), 1);

            let options = AnalysisOptions {
                symmetry_breaking: false,
                ..options
            };
            let experiments =
                game.generate_experiments(solver.as_mut(), &knowledge, &mut canonizer, &options);
            assert_eq!(experiments.len(), 3);
        }
    }
}
