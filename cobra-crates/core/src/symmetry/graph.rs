use super::VariableStatus;
use crate::basic_types::Variable;
use crate::containers::HashMap;
use crate::containers::StorageKey;
use crate::formula::CardinalityKind;
use crate::formula::Formula;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::Symbol;

/// Distinguishes the formulas describing what is known from those of the experiment under
/// consideration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Knowledge,
    Experiment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorKind {
    Not,
    And,
    Or,
    Equivalent,
    Cardinality(CardinalityKind, u32),
}

/// The label of a vertex. Isomorphisms have to preserve it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VertexColor {
    Variable { status: VariableStatus },
    Operator { kind: OperatorKind, layer: Layer },
    /// The root of an asserted formula hangs below a fact vertex.
    Fact,
    /// The root of the formula of the `index`-th outcome hangs below its outcome vertex.
    Outcome { index: u32 },
}

/// A vertex-colored directed multigraph.
///
/// Vertex `i` for `i < num_variables` always stands for the variable with id `i + 1`.
/// Formulas are drawn as trees of operator vertices pointing to their operands; repeated
/// operands become parallel edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColoredGraph {
    colors: Vec<VertexColor>,
    edges: Vec<(u32, u32)>,
}

impl ColoredGraph {
    /// A graph with one vertex per variable, all of them free.
    pub fn with_variables(num_variables: usize) -> ColoredGraph {
        ColoredGraph {
            colors: vec![
                VertexColor::Variable {
                    status: VariableStatus::Free
                };
                num_variables
            ],
            edges: vec![],
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.colors.len()
    }

    pub fn colors(&self) -> &[VertexColor] {
        &self.colors
    }

    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    pub fn add_vertex(&mut self, color: VertexColor) -> u32 {
        self.colors.push(color);
        (self.colors.len() - 1) as u32
    }

    pub fn add_edge(&mut self, from: u32, to: u32) {
        self.edges.push((from, to));
    }

    pub fn set_color(&mut self, vertex: u32, color: VertexColor) {
        self.colors[vertex as usize] = color;
    }

    pub fn variable_vertex(variable: Variable) -> u32 {
        variable.index() as u32
    }

    /// Draws `formula` under `parameters` and returns the vertex of its root.
    ///
    /// Implications are drawn as `Or(Not(lhs), rhs)` so that every operator vertex is
    /// symmetric in its operands.
    pub fn add_formula(
        &mut self,
        arena: &FormulaArena,
        formula: FormulaId,
        parameters: &[Symbol],
        layer: Layer,
    ) -> u32 {
        let mut drawn = HashMap::default();
        self.draw(arena, formula, parameters, layer, &mut drawn)
    }

    fn draw(
        &mut self,
        arena: &FormulaArena,
        formula: FormulaId,
        parameters: &[Symbol],
        layer: Layer,
        drawn: &mut HashMap<FormulaId, u32>,
    ) -> u32 {
        if let Some(&vertex) = drawn.get(&formula) {
            return vertex;
        }

        let operator = |kind| VertexColor::Operator { kind, layer };
        let vertex = match arena.get(formula) {
            Formula::Variable(variable) => ColoredGraph::variable_vertex(*variable),
            Formula::Mapping { parameter, mapping } => ColoredGraph::variable_vertex(
                arena.mapping_value(*mapping, parameters[*parameter]),
            ),
            Formula::Implies([lhs, rhs]) => {
                let or = self.add_vertex(operator(OperatorKind::Or));
                let not = self.add_vertex(operator(OperatorKind::Not));
                let lhs = self.draw(arena, *lhs, parameters, layer, drawn);
                let rhs = self.draw(arena, *rhs, parameters, layer, drawn);
                self.add_edge(or, not);
                self.add_edge(not, lhs);
                self.add_edge(or, rhs);
                or
            }
            other => {
                let kind = match other {
                    Formula::Not(_) => OperatorKind::Not,
                    Formula::And(_) => OperatorKind::And,
                    Formula::Or(_) => OperatorKind::Or,
                    Formula::Equivalent(_) => OperatorKind::Equivalent,
                    Formula::Cardinality { kind, bound, .. } => {
                        OperatorKind::Cardinality(*kind, *bound)
                    }
                    Formula::Variable(_) | Formula::Mapping { .. } | Formula::Implies(_) => {
                        unreachable!("handled above")
                    }
                };
                let vertex = self.add_vertex(operator(kind));
                for &child in other.children() {
                    let child = self.draw(arena, child, parameters, layer, drawn);
                    self.add_edge(vertex, child);
                }
                vertex
            }
        };

        let _ = drawn.insert(formula, vertex);
        vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_subformulas_are_drawn_once_and_repeated_operands_twice() {
        let mut arena = FormulaArena::default();
        let a = arena.new_variable("a");
        let b = arena.new_variable("b");
        let a = arena.variable(a);
        let b = arena.variable(b);
        let or = arena.or(vec![a, b]);
        let root = arena.and(vec![or, or, a]);
        let mut graph = ColoredGraph::with_variables(2);

        let vertex = graph.add_formula(&arena, root, &[], Layer::Knowledge);

        // Two variables, the disjunction and the conjunction.
        assert_eq!(graph.num_vertices(), 4);
        let from_root = graph
            .edges()
            .iter()
            .filter(|(from, _)| *from == vertex)
            .count();
        assert_eq!(from_root, 3);
    }

    #[test]
    fn implications_become_disjunctions() {
        let mut arena = FormulaArena::default();
        let a = arena.new_variable("a");
        let b = arena.new_variable("b");
        let a = arena.variable(a);
        let b = arena.variable(b);
        let implies = arena.implies(a, b);
        let mut graph = ColoredGraph::with_variables(2);

        let vertex = graph.add_formula(&arena, implies, &[], Layer::Experiment);

        assert_eq!(
            graph.colors()[vertex as usize],
            VertexColor::Operator {
                kind: OperatorKind::Or,
                layer: Layer::Experiment
            }
        );
        assert_eq!(graph.edges(), &[(2, 3), (3, 0), (2, 1)]);
    }
}
