//! # Cobra
//! An analyzer for codebreaking games such as Mastermind.
//!
//! A game is described by propositional variables encoding the secret code, a restriction
//! which the code satisfies, and experiment types: parametrized questions whose outcomes are
//! formulas over the code. Given such a [`game::Game`], the crate can
//! - summarize it and check that every experiment has exactly one outcome for every code
//!   ([`analysis::overview`]),
//! - play it between a codebreaker and a codemaker strategy ([`analysis::simulate`]),
//! - evaluate a codebreaker strategy against every possible code ([`analysis::analyze`]).
//!
//! Knowledge about the code is held by a [`solvers::Solver`], which answers satisfiability,
//! model counting and fixed-variable queries under a stack of contexts. Experiments that are
//! equivalent under a symmetry of the game are explored only once, see
//! [`symmetry::ParameterGenerator`].
//!
//! ```rust
//! # use cobra_core::analysis::analyze;
//! # use cobra_core::analysis::strategy::FirstExperiment;
//! # use cobra_core::analysis::AnalysisOptions;
//! # use cobra_core::game::ExperimentDefinition;
//! # use cobra_core::game::GameBuilder;
//! // A ball is hidden under one of three cups.
//! let mut builder = GameBuilder::new(["1", "2", "3"]);
//! let balls = (1..=3)
//!     .map(|cup| builder.new_variable(format!("ball_{cup}")))
//!     .collect::<Vec<_>>();
//! let cup = builder.new_mapping("cup", balls.clone());
//!
//! let formulas = builder.formulas();
//! let leaves = balls.iter().map(|&ball| formulas.variable(ball)).collect();
//! let restriction = formulas.exactly(1, leaves);
//! let found = formulas.mapping(0, cup);
//! let empty = formulas.not(found);
//! builder.set_restriction(restriction);
//! builder.add_experiment(
//!     ExperimentDefinition::new("lift", 1)
//!         .final_outcome("found", found)
//!         .outcome("empty", empty),
//! );
//! let game = builder.build().unwrap();
//!
//! let options = AnalysisOptions::default();
//! let mut solver = game.solver(options.backend);
//! let report = analyze(&game, solver.as_mut(), &mut FirstExperiment, &options).unwrap();
//!
//! // Lifting the first cup either finds the ball, or leaves two cups of which one is lifted
//! // next; when that one is empty too, the ball is known to be under the last cup, and taking
//! // it counts as one more experiment.
//! assert_eq!(report.worst_case, 3);
//! assert_eq!(report.total_experiments, 1 + 2 + 3);
//! ```
#[doc(hidden)]
pub mod asserts;

pub mod analysis;
pub mod basic_types;
pub mod cnf;
pub mod containers;
pub mod formula;
pub mod game;
pub mod oracle;
pub mod solvers;
pub mod statistics;
pub mod symmetry;

pub use rand;
