#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use cobra_core::basic_types::Variable;
use cobra_core::formula::Symbol;
use cobra_core::game::Game;
use cobra_core::game::ParametrizedExperiment;
use cobra_core::solvers::Solver;
use cobra_core::solvers::SolverBackend;
use helpers::colored_positions;
use helpers::init_logging;
use helpers::mastermind;

fn parametrizations(game: &Game, experiment: usize) -> Vec<Vec<Symbol>> {
    let num_parameters = game.experiment(experiment).num_parameters();
    let mut tuples: Vec<Vec<Symbol>> = vec![vec![]];
    for _ in 0..num_parameters {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                (0..game.alphabet_size()).map(move |symbol| {
                    let mut tuple = prefix.clone();
                    tuple.push(symbol as Symbol);
                    tuple
                })
            })
            .collect();
    }
    tuples
        .into_iter()
        .filter(|tuple| game.experiment(experiment).admits_all(tuple))
        .collect()
}

fn assert_same_knowledge(game: &Game, oracle: &mut dyn Solver, brute_force: &mut dyn Solver) {
    assert_eq!(oracle.satisfiable(), brute_force.satisfiable());
    assert_eq!(oracle.num_of_models(), brute_force.num_of_models());
    if !oracle.satisfiable() {
        return;
    }

    assert_eq!(oracle.only_one_model(), brute_force.only_one_model());
    assert_eq!(
        oracle.num_of_fixed_variables(),
        brute_force.num_of_fixed_variables()
    );
    for variable in Variable::all(game.num_variables()) {
        assert_eq!(oracle.must_be_true(variable), brute_force.must_be_true(variable));
        assert_eq!(
            oracle.must_be_false(variable),
            brute_force.must_be_false(variable)
        );
    }
    assert_eq!(
        oracle.variable_equivalences(),
        brute_force.variable_equivalences()
    );

    let mut oracle_models = oracle.generate_models();
    let mut brute_force_models = brute_force.generate_models();
    oracle_models.sort_by_key(|model| game.code_to_string(model));
    brute_force_models.sort_by_key(|model| game.code_to_string(model));
    assert_eq!(oracle_models, brute_force_models);
}

#[test]
fn backends_agree_on_every_outcome_of_every_guess() {
    init_logging();
    let game = mastermind(3, 4);
    let mut oracle = game.solver(SolverBackend::Oracle);
    let mut brute_force = game.solver(SolverBackend::BruteForce);

    let tuples = parametrizations(&game, 0);
    assert_eq!(tuples.len(), 24);

    for parameters in tuples {
        let mut by_oracle = ParametrizedExperiment::new(&game, 0, parameters.clone());
        let mut by_brute_force = ParametrizedExperiment::new(&game, 0, parameters);

        assert_eq!(
            by_oracle.satisfiability(oracle.as_mut()),
            by_brute_force.satisfiability(brute_force.as_mut())
        );
        assert_eq!(
            by_oracle.num_of_models(oracle.as_mut()),
            by_brute_force.num_of_models(brute_force.as_mut())
        );
        assert_eq!(
            by_oracle.num_of_fixed_variables(oracle.as_mut()),
            by_brute_force.num_of_fixed_variables(brute_force.as_mut())
        );
        assert_eq!(by_oracle.num_of_models(oracle.as_mut()).iter().sum::<usize>(), 24);
    }
}

#[test]
fn backends_agree_along_a_played_game() {
    init_logging();
    let game = colored_positions(3, 3);
    let mut oracle = game.solver(SolverBackend::Oracle);
    let mut brute_force = game.solver(SolverBackend::BruteForce);
    assert_same_knowledge(&game, oracle.as_mut(), brute_force.as_mut());

    let experiment = game.experiment(0);
    // The code is c0 c1 c1.
    let revealed = [(vec![0, 0, 0], 3), (vec![1, 1, 2], 4), (vec![0, 1, 1], 5)];
    for (parameters, count) in revealed {
        let outcome = &experiment.outcomes()[count];
        oracle.add_constraint(outcome.formula(), &parameters);
        brute_force.add_constraint(outcome.formula(), &parameters);
        assert_same_knowledge(&game, oracle.as_mut(), brute_force.as_mut());
    }
}

#[test]
fn nested_contexts_restore_the_knowledge_of_their_parent() {
    init_logging();
    let game = colored_positions(3, 3);
    let experiment = game.experiment(0);

    for backend in [SolverBackend::Oracle, SolverBackend::BruteForce] {
        let mut solver = game.solver(backend);
        assert_eq!(solver.num_of_models(), 27);
        let at_root = solver.assignment();

        solver.open_context();
        // Exactly one position shows c0.
        solver.add_constraint(experiment.outcomes()[3].formula(), &[0, 0, 0]);
        assert_eq!(solver.num_of_models(), 12);
        let at_depth_one = solver.assignment();

        solver.open_context();
        // And no position shows c2.
        solver.add_constraint(experiment.outcomes()[0].formula(), &[2, 2, 2]);
        assert_eq!(solver.context_depth(), 2);
        assert!(solver.satisfiable());
        assert_eq!(solver.num_of_models(), 3);

        solver.close_context();
        assert_eq!(solver.context_depth(), 1);
        assert_eq!(solver.num_of_models(), 12);
        assert_eq!(solver.assignment(), at_depth_one, "{backend:?}");

        solver.open_context();
        solver.add_constraint(experiment.outcomes()[9].formula(), &[1, 1, 1]);
        assert!(!solver.satisfiable());
        solver.close_context();
        assert_eq!(solver.assignment(), at_depth_one, "{backend:?}");

        solver.close_context();
        assert_eq!(solver.context_depth(), 0);
        assert_eq!(solver.num_of_models(), 27);
        assert_eq!(solver.assignment(), at_root, "{backend:?}");
    }
}
