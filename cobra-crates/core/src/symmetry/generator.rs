use std::collections::BTreeSet;

use log::debug;

use super::AutomorphismOracle;
use super::CanonicalForm;
use super::KnowledgeGraph;
use super::Layer;
use super::VariableGroups;
use super::VertexColor;
use crate::containers::HashSet;
use crate::containers::UnionFind;
use crate::create_statistics_struct;
use crate::formula::MappingId;
use crate::formula::Symbol;
use crate::game::ExperimentType;
use crate::game::Game;

create_statistics_struct!(
    /// The number of parameter tuples which survive each phase of a [`ParameterGenerator`].
    GeneratorStatistics {
        num_enumerated: usize,
        num_basic: usize,
        num_final: usize,
    }
);

/// Enumerates the parameter tuples of one experiment type, one per symmetry class.
///
/// Tuples are produced in three phases, each feeding the next:
/// 1. the tuples respecting the distinctness and ordering constraints, in lexicographic order,
///    where a symbol is skipped at a position when an explored symbol at that position reaches
///    only variables of the same [`VariableGroups`];
/// 2. a cheap canonical key: positions reaching a common variable form a component, and a
///    component holding a single symbol is rewritten to the smallest symbol that reaches
///    variables of the same groups without clashing with the rest of the tuple; tuples with
///    an already seen key are dropped;
/// 3. the exact test: the knowledge graph extended by the outcomes of the experiment is
///    canonized, and tuples with an already seen canonical form are dropped.
///
/// Without symmetry breaking only the constraints of the first phase apply.
pub struct ParameterGenerator<'a> {
    game: &'a Game,
    experiment: &'a ExperimentType,
    groups: &'a VariableGroups,
    knowledge: &'a KnowledgeGraph,
    canonizer: &'a mut dyn AutomorphismOracle,
    symmetry_breaking: bool,
    current: Vec<Symbol>,
    basic_keys: HashSet<Vec<Symbol>>,
    canonical_forms: HashSet<CanonicalForm>,
    generated: BTreeSet<Vec<Symbol>>,
    statistics: GeneratorStatistics,
}

impl<'a> ParameterGenerator<'a> {
    pub fn new(
        game: &'a Game,
        experiment: usize,
        groups: &'a VariableGroups,
        knowledge: &'a KnowledgeGraph,
        canonizer: &'a mut dyn AutomorphismOracle,
        symmetry_breaking: bool,
    ) -> ParameterGenerator<'a> {
        let experiment = game.experiment(experiment);
        ParameterGenerator {
            game,
            experiment,
            groups,
            knowledge,
            canonizer,
            symmetry_breaking,
            current: vec![0; experiment.num_parameters()],
            basic_keys: HashSet::default(),
            canonical_forms: HashSet::default(),
            generated: BTreeSet::new(),
            statistics: GeneratorStatistics::default(),
        }
    }

    /// The representative tuples, in increasing lexicographic order.
    pub fn generate(&mut self) -> Vec<Vec<Symbol>> {
        self.statistics = GeneratorStatistics::default();
        self.basic_keys.clear();
        self.canonical_forms.clear();
        self.generated.clear();

        self.fill(0);

        debug!(
            "experiment '{}': {} tuples enumerated, {} after the basic filter, {} after the graph filter",
            self.experiment.name(),
            self.statistics.num_enumerated,
            self.statistics.num_basic,
            self.statistics.num_final
        );
        self.generated.iter().cloned().collect()
    }

    pub fn statistics(&self) -> GeneratorStatistics {
        self.statistics
    }

    fn symbols(&self) -> impl Iterator<Item = Symbol> {
        (0..self.game.alphabet_size()).map(|symbol| symbol as Symbol)
    }

    /// Whether every mapping sends `a` and `b` to variables of one group.
    fn equivalent_symbols(&self, mappings: &[MappingId], a: Symbol, b: Symbol) -> bool {
        let arena = self.game.arena();
        mappings.iter().all(|&mapping| {
            self.groups.same_group(
                arena.mapping_value(mapping, a),
                arena.mapping_value(mapping, b),
            )
        })
    }

    fn fill(&mut self, position: usize) {
        if position == self.experiment.num_parameters() {
            self.statistics.num_enumerated += 1;
            self.basic_filter();
            return;
        }

        // A symbol may stand in for an equivalent one only if no later position depends on it.
        let may_skip = self.symmetry_breaking && !self.experiment.constrains_later(position);
        let mut explored: Vec<Symbol> = vec![];

        for symbol in self.symbols() {
            if !self.experiment.admits(&self.current, position, symbol) {
                continue;
            }
            if may_skip
                && self.experiment.is_interchangeable(position, symbol)
                && explored.iter().any(|&other| {
                    self.equivalent_symbols(
                        self.experiment.used_mappings(position),
                        symbol,
                        other,
                    )
                })
            {
                continue;
            }

            explored.push(symbol);
            self.current[position] = symbol;
            self.fill(position + 1);
        }
    }

    fn basic_filter(&mut self) {
        if !self.symmetry_breaking {
            self.statistics.num_basic += 1;
            self.statistics.num_final += 1;
            let _ = self.generated.insert(self.current.clone());
            return;
        }

        let key = self.basic_key();
        if self.basic_keys.insert(key) {
            self.statistics.num_basic += 1;
            self.graph_filter();
        }
    }

    fn basic_key(&self) -> Vec<Symbol> {
        let arena = self.game.arena();
        let experiment = self.experiment;
        let parameters = &self.current;
        let num_parameters = parameters.len();
        let reached = |position: usize| {
            experiment
                .used_mappings(position)
                .iter()
                .map(move |&mapping| arena.mapping_value(mapping, parameters[position]))
        };

        let mut components = UnionFind::new(num_parameters);
        for i in 0..num_parameters {
            for j in i + 1..num_parameters {
                if reached(i).any(|variable| reached(j).any(|other| other == variable)) {
                    let _ = components.union(i, j, false);
                }
            }
        }

        let mut key = parameters.clone();
        for root in 0..num_parameters {
            if components.find(root).0 != root {
                continue;
            }
            let symbol = parameters[root];
            if experiment.is_interchangeable(root, symbol) {
                continue;
            }

            let members = (0..num_parameters)
                .filter(|&position| components.find(position).0 == root)
                .collect::<Vec<_>>();
            if members.iter().any(|&position| parameters[position] != symbol) {
                continue;
            }
            let mappings = members
                .iter()
                .flat_map(|&position| experiment.used_mappings(position).iter().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>();
            if mappings
                .iter()
                .any(|&mapping| experiment.refers_to(arena.mapping_value(mapping, symbol)))
            {
                continue;
            }
            let elsewhere = (0..num_parameters)
                .filter(|position| !members.contains(position))
                .flat_map(reached)
                .collect::<BTreeSet<_>>();

            for replacement in 0..symbol {
                if !self.equivalent_symbols(&mappings, replacement, symbol)
                    || mappings.iter().any(|&mapping| {
                        elsewhere.contains(&arena.mapping_value(mapping, replacement))
                    })
                {
                    continue;
                }

                let mut candidate = key.clone();
                for &position in &members {
                    candidate[position] = replacement;
                }
                if experiment.admits_all(&candidate) {
                    key = candidate;
                    break;
                }
            }
        }

        key
    }

    fn graph_filter(&mut self) {
        let arena = self.game.arena();
        let mut graph = self.knowledge.colored(self.groups);
        for (index, outcome) in self.experiment.outcomes().iter().enumerate() {
            let vertex = graph.add_vertex(VertexColor::Outcome {
                index: index as u32,
            });
            let root = graph.add_formula(
                arena,
                outcome.formula(),
                &self.current,
                Layer::Experiment,
            );
            graph.add_edge(vertex, root);
        }

        if self.canonical_forms.insert(self.canonizer.canonical_form(&graph)) {
            self.statistics.num_final += 1;
            let _ = self.generated.insert(self.current.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::FormulaId;
    use crate::game::ExperimentDefinition;
    use crate::game::GameBuilder;
    use crate::symmetry::SearchCanonizer;

    /// Two coins, each showing heads or tails; an experiment asks whether the coins at two
    /// positions both show heads.
    fn coins(sorted: bool) -> Game {
        let mut builder = GameBuilder::new(["first", "second"]);
        let heads = (0..2)
            .map(|coin| builder.new_variable(format!("heads_{coin}")))
            .collect::<Vec<_>>();
        let coin = builder.new_mapping("coin", heads.clone());
        let formulas = builder.formulas();
        let leaves: Vec<FormulaId> = heads
            .iter()
            .map(|&variable| formulas.variable(variable))
            .collect();
        let restriction = formulas.or(vec![leaves[0], leaves[1]]);
        let first = formulas.mapping(0, coin);
        let second = formulas.mapping(1, coin);
        let both = formulas.and(vec![first, second]);
        let not_both = formulas.not(both);
        builder.set_restriction(restriction);
        let mut experiment = ExperimentDefinition::new("both", 2)
            .outcome("yes", both)
            .outcome("no", not_both);
        if sorted {
            experiment = experiment.params_sorted([0, 1]);
        }
        builder.add_experiment(experiment);
        builder.build().expect("valid game")
    }

    fn generate(game: &Game, symmetry_breaking: bool) -> (Vec<Vec<Symbol>>, GeneratorStatistics) {
        let knowledge = KnowledgeGraph::new(game.arena(), game.restriction());
        let groups = VariableGroups::singletons(game.num_variables());
        let mut canonizer = SearchCanonizer::default();
        let mut generator = ParameterGenerator::new(
            game,
            0,
            &groups,
            &knowledge,
            &mut canonizer,
            symmetry_breaking,
        );
        let tuples = generator.generate();
        (tuples, generator.statistics())
    }

    #[test]
    fn without_symmetry_breaking_every_admitted_tuple_is_generated() {
        let game = coins(true);

        let (tuples, statistics) = generate(&game, false);

        assert_eq!(tuples, vec![vec![0, 0], vec![0, 1], vec![1, 1]]);
        assert_eq!(statistics.num_final as u64, game.num_parametrizations(0));
    }

    #[test]
    fn swapping_the_coins_is_a_symmetry() {
        let game = coins(false);

        let (tuples, statistics) = generate(&game, true);

        // (0, 1) and (1, 0) ask the same question, as do (0, 0) and (1, 1).
        assert_eq!(tuples, vec![vec![0, 0], vec![0, 1]]);
        assert_eq!(statistics.num_enumerated, 4);
        assert_eq!(statistics.num_final, 2);
    }

    #[test]
    fn generation_is_deterministic() {
        let game = coins(false);

        assert_eq!(generate(&game, true).0, generate(&game, true).0);
    }
}
