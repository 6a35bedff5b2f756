//! The players' decisions, left to callbacks.
//!
//! A [`CodebreakerStrategy`] picks one of the offered experiments, a [`CodemakerStrategy`]
//! picks the outcome of the chosen experiment. Both receive the solver holding the current
//! knowledge, so they can ask the experiments about their outcomes. Closures of the right
//! shape implement the traits directly.
use std::cmp::Reverse;

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::game::ParametrizedExperiment;
use crate::solvers::Solver;

pub trait CodebreakerStrategy {
    /// Returns the index of the experiment to perform. `experiments` is never empty.
    fn choose_experiment(
        &mut self,
        experiments: &mut [ParametrizedExperiment<'_>],
        solver: &mut dyn Solver,
    ) -> usize;
}

pub trait CodemakerStrategy {
    /// Returns the index of the outcome to reveal; it has to be produced by a remaining code.
    fn choose_outcome(
        &mut self,
        experiment: &mut ParametrizedExperiment<'_>,
        solver: &mut dyn Solver,
    ) -> usize;
}

impl<F> CodebreakerStrategy for F
where
    F: FnMut(&mut [ParametrizedExperiment<'_>], &mut dyn Solver) -> usize,
{
    fn choose_experiment(
        &mut self,
        experiments: &mut [ParametrizedExperiment<'_>],
        solver: &mut dyn Solver,
    ) -> usize {
        self(experiments, solver)
    }
}

impl<F> CodemakerStrategy for F
where
    F: FnMut(&mut ParametrizedExperiment<'_>, &mut dyn Solver) -> usize,
{
    fn choose_outcome(
        &mut self,
        experiment: &mut ParametrizedExperiment<'_>,
        solver: &mut dyn Solver,
    ) -> usize {
        self(experiment, solver)
    }
}

/// The index of the first maximal value, or 0 without values.
fn first_max(values: impl IntoIterator<Item = usize>) -> usize {
    values
        .into_iter()
        .enumerate()
        .min_by_key(|&(_, value)| Reverse(value))
        .map_or(0, |(index, _)| index)
}

/// The index of the first minimal value, or 0 without values.
fn first_min(values: impl IntoIterator<Item = usize>) -> usize {
    values
        .into_iter()
        .enumerate()
        .min_by_key(|&(_, value)| value)
        .map_or(0, |(index, _)| index)
}

/// Always performs the first offered experiment.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstExperiment;

impl CodebreakerStrategy for FirstExperiment {
    fn choose_experiment(
        &mut self,
        _experiments: &mut [ParametrizedExperiment<'_>],
        _solver: &mut dyn Solver,
    ) -> usize {
        0
    }
}

/// Performs the experiment whose most likely outcome leaves the fewest codes; ties go to the
/// earlier experiment.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinMaxModels;

impl CodebreakerStrategy for MinMaxModels {
    fn choose_experiment(
        &mut self,
        experiments: &mut [ParametrizedExperiment<'_>],
        solver: &mut dyn Solver,
    ) -> usize {
        let worst_cases = experiments
            .iter_mut()
            .map(|experiment| {
                experiment
                    .num_of_models(solver)
                    .iter()
                    .copied()
                    .max()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();
        first_min(worst_cases)
    }
}

/// Reveals the first outcome some remaining code produces.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstSatisfiableOutcome;

impl CodemakerStrategy for FirstSatisfiableOutcome {
    fn choose_outcome(
        &mut self,
        experiment: &mut ParametrizedExperiment<'_>,
        solver: &mut dyn Solver,
    ) -> usize {
        experiment
            .satisfiability(solver)
            .iter()
            .position(|&satisfiable| satisfiable)
            .unwrap_or(0)
    }
}

/// Reveals the outcome which leaves the most codes; ties go to the earlier outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxModelsOutcome;

impl CodemakerStrategy for MaxModelsOutcome {
    fn choose_outcome(
        &mut self,
        experiment: &mut ParametrizedExperiment<'_>,
        solver: &mut dyn Solver,
    ) -> usize {
        first_max(experiment.num_of_models(solver).iter().copied())
    }
}

/// Reveals an outcome chosen uniformly among those some remaining code produces.
#[derive(Clone, Debug)]
pub struct RandomOutcome {
    rng: SmallRng,
}

impl RandomOutcome {
    pub fn new(seed: u64) -> RandomOutcome {
        RandomOutcome {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl CodemakerStrategy for RandomOutcome {
    fn choose_outcome(
        &mut self,
        experiment: &mut ParametrizedExperiment<'_>,
        solver: &mut dyn Solver,
    ) -> usize {
        let possible = experiment
            .satisfiability(solver)
            .iter()
            .enumerate()
            .filter(|&(_, &satisfiable)| satisfiable)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        if possible.is_empty() {
            return 0;
        }
        possible[self.rng.gen_range(0..possible.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_the_first_maximum() {
        assert_eq!(first_max([1, 3, 3, 2]), 1);
        assert_eq!(first_min([2, 1, 3, 1]), 1);
        assert_eq!(first_max([]), 0);
    }
}
