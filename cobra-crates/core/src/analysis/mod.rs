//! The analysis modes: a summary of a game with a well-formedness check, a simulated game
//! between two strategies, and the exhaustive evaluation of a codebreaker strategy.
mod error;
mod options;
mod overview;
mod search;
mod simulation;
pub mod strategy;

pub use error::AnalysisError;
pub use options::AnalysisOptions;
pub use overview::overview;
pub use overview::Overview;
pub use overview::WellFormednessViolation;
pub use search::analyze;
pub use search::AnalysisReport;
pub use simulation::simulate;
pub use simulation::SimulationReport;
pub use simulation::SimulationRound;
pub use strategy::CodebreakerStrategy;
pub use strategy::CodemakerStrategy;

use crate::solvers::Solver;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::symmetry::AutomorphismOracle;

fn log_statistics(solver: &dyn Solver, canonizer: &dyn AutomorphismOracle) {
    if should_log_statistics() {
        solver.statistics().log(StatisticLogger::new("solver"));
        canonizer
            .statistics()
            .log(StatisticLogger::new("canonizer"));
    }
}
