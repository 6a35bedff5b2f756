#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use std::collections::BTreeSet;

use cobra_core::analysis::AnalysisOptions;
use cobra_core::formula::Symbol;
use cobra_core::game::Game;
use cobra_core::solvers::Solver;
use cobra_core::solvers::SolverBackend;
use cobra_core::symmetry::KnowledgeGraph;
use cobra_core::symmetry::ParameterGenerator;
use cobra_core::symmetry::SearchCanonizer;
use cobra_core::symmetry::VariableGroups;
use helpers::colored_positions;
use helpers::init_logging;

const COLOR_PERMUTATIONS: [[Symbol; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// The orbit of a guess: its outcome does not depend on the order of the named colors, nor on
/// a renaming of the colors by one of `renamings`.
fn orbit(parameters: &[Symbol], renamings: &[[Symbol; 3]]) -> Vec<Symbol> {
    renamings
        .iter()
        .map(|renaming| {
            let mut renamed = parameters
                .iter()
                .map(|&color| renaming[color as usize])
                .collect::<Vec<_>>();
            renamed.sort_unstable();
            renamed
        })
        .min()
        .expect("at least the identity")
}

fn all_guesses() -> Vec<Vec<Symbol>> {
    let mut guesses = vec![];
    for a in 0..3 {
        for b in 0..3 {
            for c in 0..3 {
                guesses.push(vec![a, b, c]);
            }
        }
    }
    guesses
}

fn representatives(
    game: &Game,
    solver: &mut dyn Solver,
    knowledge: &KnowledgeGraph,
    symmetry_breaking: bool,
) -> Vec<Vec<Symbol>> {
    let groups = VariableGroups::compute(solver, game.num_variables());
    let mut canonizer = SearchCanonizer::default();
    ParameterGenerator::new(
        game,
        0,
        &groups,
        knowledge,
        &mut canonizer,
        symmetry_breaking,
    )
    .generate()
}

/// Checks that the representatives hit every orbit exactly once.
fn assert_one_per_orbit(generated: &[Vec<Symbol>], renamings: &[[Symbol; 3]]) {
    let expected = all_guesses()
        .iter()
        .map(|guess| orbit(guess, renamings))
        .collect::<BTreeSet<_>>();
    let covered = generated
        .iter()
        .map(|guess| orbit(guess, renamings))
        .collect::<BTreeSet<_>>();

    assert_eq!(generated.len(), expected.len(), "{generated:?}");
    assert_eq!(covered, expected);
}

#[test]
fn without_symmetry_breaking_every_guess_is_generated() {
    init_logging();
    let game = colored_positions(3, 3);
    let mut solver = game.solver(SolverBackend::Oracle);
    let knowledge = KnowledgeGraph::new(game.arena(), game.restriction());

    let generated = representatives(&game, solver.as_mut(), &knowledge, false);

    assert_eq!(generated, all_guesses());
}

#[test]
fn one_guess_per_orbit_of_the_full_symmetry_group() {
    init_logging();
    let game = colored_positions(3, 3);
    let mut solver = game.solver(SolverBackend::Oracle);
    let knowledge = KnowledgeGraph::new(game.arena(), game.restriction());

    let generated = representatives(&game, solver.as_mut(), &knowledge, true);

    assert_one_per_orbit(&generated, &COLOR_PERMUTATIONS);
    assert_eq!(generated.len(), 3);
}

#[test]
fn a_recorded_outcome_breaks_the_symmetry_of_its_colors() {
    init_logging();
    let game = colored_positions(3, 3);
    let mut solver = game.solver(SolverBackend::Oracle);
    let mut knowledge = KnowledgeGraph::new(game.arena(), game.restriction());

    // Exactly one position shows c0.
    let outcome = game.experiment(0).outcomes()[3].formula();
    solver.add_constraint(outcome, &[0, 0, 0]);
    knowledge.record(game.arena(), outcome, &[0, 0, 0]);

    let generated = representatives(&game, solver.as_mut(), &knowledge, true);

    let fixing_c0 = COLOR_PERMUTATIONS
        .into_iter()
        .filter(|renaming| renaming[0] == 0)
        .collect::<Vec<_>>();
    assert_one_per_orbit(&generated, &fixing_c0);
    assert_eq!(generated.len(), 6);
}

#[test]
fn uninformative_guesses_are_not_offered() {
    init_logging();
    let game = colored_positions(3, 3);
    let knowledge = KnowledgeGraph::new(game.arena(), game.restriction());
    let mut canonizer = SearchCanonizer::default();

    for backend in [SolverBackend::Oracle, SolverBackend::BruteForce] {
        let mut solver = game.solver(backend);
        let with_symmetry = AnalysisOptions {
            backend,
            symmetry_breaking: true,
        };
        let without_symmetry = AnalysisOptions {
            symmetry_breaking: false,
            ..with_symmetry
        };

        // Naming three different colors always matches three times.
        let offered = game.generate_experiments(
            solver.as_mut(),
            &knowledge,
            &mut canonizer,
            &without_symmetry,
        );
        assert_eq!(offered.len(), 27 - 6);

        let offered = game.generate_experiments(
            solver.as_mut(),
            &knowledge,
            &mut canonizer,
            &with_symmetry,
        );
        let parameters = offered
            .iter()
            .map(|experiment| experiment.parameters().to_vec())
            .collect::<Vec<_>>();
        assert_eq!(parameters, vec![vec![0, 0, 0], vec![0, 0, 1]]);
    }
}

#[test]
fn generation_is_deterministic() {
    let game = colored_positions(3, 3);
    let mut solver = game.solver(SolverBackend::BruteForce);
    let knowledge = KnowledgeGraph::new(game.arena(), game.restriction());

    let first = representatives(&game, solver.as_mut(), &knowledge, true);
    let second = representatives(&game, solver.as_mut(), &knowledge, true);

    assert_eq!(first, second);
}
