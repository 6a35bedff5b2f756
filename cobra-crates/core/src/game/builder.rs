use std::collections::BTreeSet;

use log::debug;

use super::ExperimentType;
use super::Game;
use super::GameDefinitionError;
use super::Outcome;
use crate::basic_types::Variable;
use crate::formula::Formula;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::MappingId;
use crate::formula::Symbol;

/// An experiment type as declared by the game author.
///
/// Parameter positions are 0-based.
#[derive(Clone, Debug)]
pub struct ExperimentDefinition {
    name: String,
    num_parameters: usize,
    outcomes: Vec<Outcome>,
    distinct: Vec<Vec<usize>>,
    sorted: Vec<Vec<usize>>,
}

impl ExperimentDefinition {
    pub fn new(name: impl Into<String>, num_parameters: usize) -> ExperimentDefinition {
        ExperimentDefinition {
            name: name.into(),
            num_parameters,
            outcomes: vec![],
            distinct: vec![],
            sorted: vec![],
        }
    }

    pub fn outcome(mut self, name: impl Into<String>, formula: FormulaId) -> Self {
        self.outcomes.push(Outcome {
            name: name.into(),
            formula,
            is_final: false,
        });
        self
    }

    /// An outcome which can only be observed when the experiment hits the code itself.
    pub fn final_outcome(mut self, name: impl Into<String>, formula: FormulaId) -> Self {
        self.outcomes.push(Outcome {
            name: name.into(),
            formula,
            is_final: true,
        });
        self
    }

    /// The parameters at `positions` have to be pairwise different.
    pub fn params_distinct(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.distinct.push(positions.into_iter().collect());
        self
    }

    /// The parameters at `positions`, which have to be strictly increasing, are non-decreasing.
    pub fn params_sorted(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.sorted.push(positions.into_iter().collect());
        self
    }
}

/// Collects the parts of a game and validates them into a [`Game`].
///
/// ```rust
/// # use cobra_core::game::ExperimentDefinition;
/// # use cobra_core::game::GameBuilder;
/// let mut builder = GameBuilder::new(["left", "right"]);
/// let left = builder.new_variable("coin_left");
/// let right = builder.new_variable("coin_right");
/// let mapping = builder.new_mapping("coin", vec![left, right]);
///
/// let formulas = builder.formulas();
/// let left = formulas.variable(left);
/// let right = formulas.variable(right);
/// let restriction = formulas.exactly(1, vec![left, right]);
/// let found = formulas.mapping(0, mapping);
/// let not_found = formulas.not(found);
/// builder.set_restriction(restriction);
/// builder.add_experiment(
///     ExperimentDefinition::new("look", 1)
///         .final_outcome("found", found)
///         .outcome("empty", not_found),
/// );
///
/// let game = builder.build().unwrap();
/// assert_eq!(game.num_parametrizations(0), 2);
/// ```
#[derive(Debug)]
pub struct GameBuilder {
    arena: FormulaArena,
    alphabet: Vec<String>,
    restriction: Option<FormulaId>,
    experiments: Vec<ExperimentDefinition>,
}

impl GameBuilder {
    pub fn new<Name: Into<String>>(alphabet: impl IntoIterator<Item = Name>) -> GameBuilder {
        GameBuilder {
            arena: FormulaArena::default(),
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            restriction: None,
            experiments: vec![],
        }
    }

    pub fn new_variable(&mut self, name: impl Into<String>) -> Variable {
        self.arena.new_variable(name)
    }

    /// A mapping assigning `values[symbol]` to every symbol of the alphabet.
    pub fn new_mapping(&mut self, name: impl Into<String>, values: Vec<Variable>) -> MappingId {
        self.arena.new_mapping(name, values)
    }

    /// The arena in which the formulas of the game are built.
    pub fn formulas(&mut self) -> &mut FormulaArena {
        &mut self.arena
    }

    pub fn set_restriction(&mut self, restriction: FormulaId) {
        self.restriction = Some(restriction);
    }

    pub fn add_experiment(&mut self, experiment: ExperimentDefinition) {
        self.experiments.push(experiment);
    }

    pub fn build(self) -> Result<Game, GameDefinitionError> {
        let GameBuilder {
            mut arena,
            alphabet,
            restriction,
            experiments,
        } = self;

        if alphabet.is_empty() {
            return Err(GameDefinitionError::EmptyAlphabet);
        }
        if alphabet.len() > usize::from(Symbol::MAX) + 1 {
            return Err(GameDefinitionError::AlphabetTooLarge(alphabet.len()));
        }
        let mut symbols = BTreeSet::new();
        for symbol in &alphabet {
            if !symbols.insert(symbol.as_str()) {
                return Err(GameDefinitionError::DuplicateSymbol(symbol.clone()));
            }
        }

        for (_, mapping) in arena.mappings() {
            if mapping.values().len() != alphabet.len() {
                return Err(GameDefinitionError::MappingLength {
                    name: mapping.name().to_owned(),
                    expected: alphabet.len(),
                    actual: mapping.values().len(),
                });
            }
            if let Some(value) = mapping
                .values()
                .iter()
                .find(|value| value.id() as usize > arena.num_variables())
            {
                return Err(GameDefinitionError::UndeclaredVariable {
                    name: mapping.name().to_owned(),
                    variable: value.id(),
                });
            }
        }

        let restriction = restriction.ok_or(GameDefinitionError::MissingRestriction)?;
        let restriction = arena.simplify(restriction);
        if let Some((_, mapping)) = mapping_terms(&arena, restriction).next() {
            return Err(GameDefinitionError::MappingInRestriction(
                arena.mapping_info(mapping).name().to_owned(),
            ));
        }

        if experiments.is_empty() {
            return Err(GameDefinitionError::NoExperiments);
        }

        let mut experiment_types: Vec<ExperimentType> = Vec::with_capacity(experiments.len());
        for definition in experiments {
            if experiment_types
                .iter()
                .any(|other| other.name == definition.name)
            {
                return Err(GameDefinitionError::DuplicateExperiment(definition.name));
            }
            let experiment = build_experiment(&mut arena, alphabet.len(), definition)?;
            debug!(
                "experiment '{}': {} outcomes, {} parameters",
                experiment.name,
                experiment.outcomes.len(),
                experiment.num_parameters
            );
            experiment_types.push(experiment);
        }

        Ok(Game {
            arena,
            alphabet,
            restriction,
            experiments: experiment_types,
        })
    }
}

/// The `(parameter, mapping)` pairs of the mapping terms reachable from `root`.
fn mapping_terms(
    arena: &FormulaArena,
    root: FormulaId,
) -> impl Iterator<Item = (usize, MappingId)> + '_ {
    arena
        .reachable(root)
        .into_iter()
        .filter_map(|id| match arena.get(id) {
            Formula::Mapping { parameter, mapping } => Some((*parameter, *mapping)),
            _ => None,
        })
}

fn build_experiment(
    arena: &mut FormulaArena,
    alphabet_size: usize,
    definition: ExperimentDefinition,
) -> Result<ExperimentType, GameDefinitionError> {
    let ExperimentDefinition {
        name,
        num_parameters,
        mut outcomes,
        distinct,
        sorted,
    } = definition;

    if outcomes.is_empty() {
        return Err(GameDefinitionError::NoOutcomes(name));
    }

    let out_of_range = |parameter: usize| GameDefinitionError::ParameterOutOfRange {
        experiment: name.clone(),
        parameter,
        num_parameters,
    };

    let mut used_mappings = vec![BTreeSet::new(); num_parameters];
    let mut used_variables = BTreeSet::new();
    for outcome in &mut outcomes {
        outcome.formula = arena.simplify(outcome.formula);
        for id in arena.reachable(outcome.formula) {
            match arena.get(id) {
                Formula::Mapping { parameter, mapping } => {
                    if *parameter >= num_parameters {
                        return Err(out_of_range(*parameter));
                    }
                    let _ = used_mappings[*parameter].insert(*mapping);
                }
                Formula::Variable(variable) => {
                    let _ = used_variables.insert(*variable);
                }
                _ => {}
            }
        }
    }

    let mut different = vec![BTreeSet::new(); num_parameters];
    for positions in &distinct {
        if let Some(&position) = positions.iter().find(|&&p| p >= num_parameters) {
            return Err(out_of_range(position));
        }
        for (index, &d) in positions.iter().enumerate() {
            for &e in &positions[index + 1..] {
                let _ = different[d].insert(e);
                let _ = different[e].insert(d);
            }
        }
    }

    let mut smaller = vec![BTreeSet::new(); num_parameters];
    for positions in &sorted {
        if let Some(&position) = positions.iter().find(|&&p| p >= num_parameters) {
            return Err(out_of_range(position));
        }
        if positions.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(GameDefinitionError::UnsortedPositions(name));
        }
        for (index, &d) in positions.iter().enumerate() {
            for &e in &positions[index + 1..] {
                let _ = smaller[e].insert(d);
            }
        }
    }

    let outcome_formulas = outcomes.iter().map(|outcome| outcome.formula).collect();
    let exactly_one = arena.exactly(1, outcome_formulas);
    let ill_formedness = arena.not(exactly_one);

    let mut experiment = ExperimentType {
        name,
        num_parameters,
        outcomes,
        different,
        smaller,
        used_mappings: used_mappings
            .into_iter()
            .map(|mappings| mappings.into_iter().collect())
            .collect(),
        used_variables,
        interchangeable: vec![],
        ill_formedness,
    };
    experiment.interchangeable = interchangeability(arena, alphabet_size, &experiment);

    Ok(experiment)
}

/// For every position and symbol, whether the variables the symbol reaches at that position
/// are out of reach of every other position, whatever compatible symbol it holds, and are not
/// referred to directly.
fn interchangeability(
    arena: &FormulaArena,
    alphabet_size: usize,
    experiment: &ExperimentType,
) -> Vec<Vec<bool>> {
    let symbols = || (0..alphabet_size).map(|symbol| symbol as Symbol);

    (0..experiment.num_parameters)
        .map(|d| {
            symbols()
                .map(|a| {
                    let reached = experiment.used_mappings[d]
                        .iter()
                        .map(|&mapping| arena.mapping_value(mapping, a))
                        .collect::<BTreeSet<_>>();
                    if reached
                        .iter()
                        .any(|variable| experiment.used_variables.contains(variable))
                    {
                        return false;
                    }

                    (0..experiment.num_parameters)
                        .filter(|&e| e != d)
                        .all(|e| {
                            symbols()
                                .filter(|&b| experiment.compatible(d, a, e, b))
                                .all(|b| {
                                    experiment.used_mappings[e].iter().all(|&mapping| {
                                        !reached.contains(&arena.mapping_value(mapping, b))
                                    })
                                })
                        })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two positions and three colors, with one mapping per position.
    fn two_positions() -> (GameBuilder, [MappingId; 2]) {
        let mut builder = GameBuilder::new(["red", "green", "blue"]);
        let mut mappings = vec![];
        for position in 0..2 {
            let values = (0..3)
                .map(|color| builder.new_variable(format!("x{position}{color}")))
                .collect::<Vec<_>>();
            mappings.push(builder.new_mapping(format!("m{position}"), values));
        }
        let formulas = builder.formulas();
        let rows = (0..2)
            .map(|position| {
                let row = (0..3)
                    .map(|color| {
                        let variable = Variable::new(position * 3 + color + 1);
                        formulas.variable(variable)
                    })
                    .collect();
                formulas.exactly(1, row)
            })
            .collect();
        let restriction = formulas.and(rows);
        builder.set_restriction(restriction);
        (builder, [mappings[0], mappings[1]])
    }

    #[test]
    fn well_formed_game_is_built() {
        let (mut builder, [m0, m1]) = two_positions();
        let formulas = builder.formulas();
        let first = formulas.mapping(0, m0);
        let second = formulas.mapping(1, m1);
        let hits = formulas.or(vec![first, second]);
        let misses = formulas.not(hits);
        builder.add_experiment(
            ExperimentDefinition::new("look", 2)
                .outcome("hit", hits)
                .outcome("miss", misses)
                .params_sorted([0, 1]),
        );

        let game = builder.build().expect("valid game");

        let experiment = game.experiment(0);
        assert_eq!(experiment.used_mappings(0), &[m0]);
        assert_eq!(experiment.used_mappings(1), &[m1]);
        assert!(experiment.is_interchangeable(0, 2));
        assert!(experiment.admits_all(&[0, 2]));
        assert!(!experiment.admits_all(&[2, 0]));
        assert_eq!(game.num_parametrizations(0), 6);
        assert_eq!(game.parameters_to_string(&[0, 2]), "red blue");
    }

    #[test]
    fn shared_mapping_breaks_interchangeability() {
        let (mut builder, [m0, _]) = two_positions();
        let formulas = builder.formulas();
        let first = formulas.mapping(0, m0);
        let second = formulas.mapping(1, m0);
        let both = formulas.and(vec![first, second]);
        let not_both = formulas.not(both);
        builder.add_experiment(
            ExperimentDefinition::new("pair", 2)
                .outcome("both", both)
                .outcome("not both", not_both),
        );

        let game = builder.build().expect("valid game");

        assert!(!game.experiment(0).is_interchangeable(0, 1));
        assert_eq!(game.num_parametrizations(0), 9);
    }

    #[test]
    fn distinct_positions_cannot_share_a_symbol() {
        let (mut builder, [m0, _]) = two_positions();
        let formulas = builder.formulas();
        let first = formulas.mapping(0, m0);
        let second = formulas.mapping(1, m0);
        let either = formulas.or(vec![first, second]);
        let neither = formulas.not(either);
        builder.add_experiment(
            ExperimentDefinition::new("pair", 2)
                .outcome("either", either)
                .outcome("neither", neither)
                .params_distinct([0, 1]),
        );

        let game = builder.build().expect("valid game");

        assert!(!game.experiment(0).admits_all(&[1, 1]));
        assert_eq!(game.num_parametrizations(0), 6);
    }

    #[test]
    fn invalid_definitions_are_rejected() {
        let (mut builder, [m0, _]) = two_positions();
        let term = builder.formulas().mapping(2, m0);
        builder.add_experiment(ExperimentDefinition::new("bad", 2).outcome("only", term));
        assert_eq!(
            builder.build().unwrap_err(),
            GameDefinitionError::ParameterOutOfRange {
                experiment: "bad".to_owned(),
                parameter: 2,
                num_parameters: 2,
            }
        );

        let (mut builder, [m0, _]) = two_positions();
        let term = builder.formulas().mapping(0, m0);
        builder.add_experiment(
            ExperimentDefinition::new("bad", 2)
                .outcome("only", term)
                .params_sorted([1, 0]),
        );
        assert_eq!(
            builder.build().unwrap_err(),
            GameDefinitionError::UnsortedPositions("bad".to_owned())
        );

        let (mut builder, _) = two_positions();
        builder.add_experiment(ExperimentDefinition::new("empty", 1));
        assert_eq!(
            builder.build().unwrap_err(),
            GameDefinitionError::NoOutcomes("empty".to_owned())
        );

        let (builder, _) = two_positions();
        assert_eq!(
            builder.build().unwrap_err(),
            GameDefinitionError::NoExperiments
        );

        let mut builder = GameBuilder::new(["a", "b"]);
        let x = builder.new_variable("x");
        let _ = builder.new_mapping("short", vec![x]);
        let restriction = builder.formulas().variable(x);
        builder.set_restriction(restriction);
        assert!(matches!(
            builder.build(),
            Err(GameDefinitionError::MappingLength { actual: 1, .. })
        ));
    }

    #[test]
    fn mappings_only_refer_to_declared_variables() {
        let mut builder = GameBuilder::new(["a", "b"]);
        let x = builder.new_variable("x");
        let _ = builder.new_mapping("stray", vec![x, Variable::new(99)]);
        let restriction = builder.formulas().variable(x);
        builder.set_restriction(restriction);
        builder.add_experiment(ExperimentDefinition::new("look", 0).outcome("any", restriction));

        assert_eq!(
            builder.build().unwrap_err(),
            GameDefinitionError::UndeclaredVariable {
                name: "stray".to_owned(),
                variable: 99,
            }
        );
    }

    #[test]
    fn restriction_cannot_use_parameters() {
        let (mut builder, [m0, _]) = two_positions();
        let term = builder.formulas().mapping(0, m0);
        builder.set_restriction(term);
        builder.add_experiment(ExperimentDefinition::new("look", 1).outcome("hit", term));

        assert_eq!(
            builder.build().unwrap_err(),
            GameDefinitionError::MappingInRestriction("m0".to_owned())
        );
    }
}
