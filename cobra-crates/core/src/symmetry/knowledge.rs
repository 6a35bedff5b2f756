use super::ColoredGraph;
use super::Layer;
use super::VariableGroups;
use super::VertexColor;
use crate::basic_types::Variable;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::Symbol;

/// The structure of everything known about the code: the restriction and every outcome
/// observed so far, each drawn below its own [`VertexColor::Fact`] vertex.
///
/// The search clones it at every branch.
#[derive(Clone, Debug)]
pub struct KnowledgeGraph {
    graph: ColoredGraph,
    num_variables: usize,
    num_facts: usize,
}

impl KnowledgeGraph {
    pub fn new(arena: &FormulaArena, restriction: FormulaId) -> KnowledgeGraph {
        let mut knowledge = KnowledgeGraph {
            graph: ColoredGraph::with_variables(arena.num_variables()),
            num_variables: arena.num_variables(),
            num_facts: 0,
        };
        knowledge.record(arena, restriction, &[]);
        knowledge
    }

    /// Adds `formula`, instantiated with `parameters`, as a known fact.
    pub fn record(&mut self, arena: &FormulaArena, formula: FormulaId, parameters: &[Symbol]) {
        let fact = self.graph.add_vertex(VertexColor::Fact);
        let root = self
            .graph
            .add_formula(arena, formula, parameters, Layer::Knowledge);
        self.graph.add_edge(fact, root);
        self.num_facts += 1;
    }

    pub fn graph(&self) -> &ColoredGraph {
        &self.graph
    }

    pub fn num_facts(&self) -> usize {
        self.num_facts
    }

    /// A copy of the graph whose variable vertices carry their status in `groups`.
    pub(crate) fn colored(&self, groups: &VariableGroups) -> ColoredGraph {
        let mut graph = self.graph.clone();
        for variable in Variable::all(self.num_variables) {
            graph.set_color(
                ColoredGraph::variable_vertex(variable),
                VertexColor::Variable {
                    status: groups.status(variable),
                },
            );
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::AutomorphismOracle;
    use crate::symmetry::SearchCanonizer;

    #[test]
    fn recorded_facts_break_symmetry() {
        let mut arena = FormulaArena::default();
        let variables = (0..3)
            .map(|index| arena.new_variable(format!("x{index}")))
            .collect::<Vec<_>>();
        let leaves = variables
            .iter()
            .map(|&variable| arena.variable(variable))
            .collect::<Vec<_>>();
        let restriction = arena.exactly(1, leaves.clone());
        let mut canonizer = SearchCanonizer::default();
        let mut knowledge = KnowledgeGraph::new(&arena, restriction);

        let orbits = canonizer.canonical_labeling(knowledge.graph()).orbits();
        assert_eq!(&orbits[..3], &[0, 0, 0]);

        knowledge.record(&arena, leaves[0], &[]);
        let orbits = canonizer.canonical_labeling(knowledge.graph()).orbits();
        assert_eq!(&orbits[..3], &[0, 1, 1]);
        assert_eq!(knowledge.num_facts(), 2);
    }
}
