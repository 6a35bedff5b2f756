//! Games shared by the integration tests.
#![allow(
    dead_code,
    reason = "every test file uses a different subset of the games"
)]

use cobra_core::formula::MappingId;
use cobra_core::game::ExperimentDefinition;
use cobra_core::game::Game;
use cobra_core::game::GameBuilder;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Mastermind with `num_positions` pegs out of `num_colors` colors, where all pegs of the code
/// and of every guess have different colors.
///
/// The outcome `b{black}w{white}` tells how many pegs have the right color at the right
/// position, and how many more pegs have a color that appears elsewhere in the code.
pub(crate) fn mastermind(num_positions: usize, num_colors: usize) -> Game {
    let mut builder = GameBuilder::new((0..num_colors).map(|color| color.to_string()));
    let pegs = (0..num_positions)
        .map(|position| {
            (0..num_colors)
                .map(|color| builder.new_variable(format!("p{position}c{color}")))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let slots = pegs
        .iter()
        .enumerate()
        .map(|(position, colors)| builder.new_mapping(format!("slot{position}"), colors.clone()))
        .collect::<Vec<MappingId>>();

    let formulas = builder.formulas();
    let mut restriction = vec![];
    for colors in &pegs {
        let leaves = colors.iter().map(|&peg| formulas.variable(peg)).collect();
        restriction.push(formulas.exactly(1, leaves));
    }
    for color in 0..num_colors {
        let leaves = pegs.iter().map(|colors| formulas.variable(colors[color])).collect();
        restriction.push(formulas.at_most(1, leaves));
    }
    let restriction = formulas.and(restriction);

    let black = (0..num_positions)
        .map(|position| formulas.mapping(position, slots[position]))
        .collect::<Vec<_>>();
    let present = (0..num_positions)
        .map(|parameter| {
            let anywhere = slots
                .iter()
                .map(|&slot| formulas.mapping(parameter, slot))
                .collect();
            formulas.or(anywhere)
        })
        .collect::<Vec<_>>();

    let mut guess = ExperimentDefinition::new("guess", num_positions).params_distinct(0..num_positions);
    for num_black in 0..=num_positions {
        for num_white in 0..=num_positions - num_black {
            if num_black == num_positions - 1 && num_white == 1 {
                continue;
            }
            let exact_black = formulas.exactly(num_black as u32, black.clone());
            let exact_present = formulas.exactly((num_black + num_white) as u32, present.clone());
            let feedback = formulas.and(vec![exact_black, exact_present]);
            let name = format!("b{num_black}w{num_white}");
            guess = if num_black == num_positions {
                guess.final_outcome(name, feedback)
            } else {
                guess.outcome(name, feedback)
            };
        }
    }

    builder.set_restriction(restriction);
    builder.add_experiment(guess);
    builder.build().expect("mastermind is a valid game")
}

/// A code assigns one of `num_colors` colors to each of `num_positions` positions, repeats
/// allowed. The only experiment names as many colors as there are positions and reveals how
/// many (position, named color) pairs match the code.
///
/// Positions and colors are both interchangeable, which the symmetry tests rely on.
pub(crate) fn colored_positions(num_positions: usize, num_colors: usize) -> Game {
    let mut builder = GameBuilder::new((0..num_colors).map(|color| format!("c{color}")));
    let cells = (0..num_positions)
        .map(|position| {
            (0..num_colors)
                .map(|color| builder.new_variable(format!("x{position}_{color}")))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let rows = cells
        .iter()
        .enumerate()
        .map(|(position, colors)| builder.new_mapping(format!("row{position}"), colors.clone()))
        .collect::<Vec<_>>();

    let formulas = builder.formulas();
    let restriction = cells
        .iter()
        .map(|colors| {
            let leaves = colors.iter().map(|&cell| formulas.variable(cell)).collect();
            formulas.exactly(1, leaves)
        })
        .collect();
    let restriction = formulas.and(restriction);

    let mut matches = vec![];
    for parameter in 0..num_positions {
        for &row in &rows {
            matches.push(formulas.mapping(parameter, row));
        }
    }
    let mut counting = ExperimentDefinition::new("count", num_positions);
    for count in 0..=num_positions * num_positions {
        let outcome = formulas.exactly(count as u32, matches.clone());
        counting = counting.outcome(format!("{count}"), outcome);
    }

    builder.set_restriction(restriction);
    builder.add_experiment(counting);
    builder.build().expect("the colored positions game is valid")
}

/// Two coins, each heads or tails. Asking about a coin reveals it, but the question about the
/// second coin forgets to say anything when it shows tails.
pub(crate) fn forgetful_coins() -> Game {
    let mut builder = GameBuilder::new(["first", "second"]);
    let heads = [builder.new_variable("heads_1"), builder.new_variable("heads_2")];
    let coin = builder.new_mapping("coin", heads.to_vec());

    let formulas = builder.formulas();
    let first = formulas.variable(heads[0]);
    let first_tails = formulas.not(first);
    let restriction = formulas.or(vec![first, first_tails]);
    let shows_heads = formulas.mapping(0, coin);
    let shows_tails = formulas.not(shows_heads);
    let forgetful_tails = formulas.and(vec![shows_tails, first_tails]);

    builder.set_restriction(restriction);
    builder.add_experiment(
        ExperimentDefinition::new("look", 1)
            .outcome("heads", shows_heads)
            .outcome("tails", forgetful_tails),
    );
    builder.build().expect("the coins game is valid")
}
