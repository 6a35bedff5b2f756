use super::CardinalityKind;
use super::Formula;
use super::FormulaId;
use super::MappingId;
use super::Symbol;
use crate::basic_types::Variable;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::KeyedVec;

/// A named table assigning a variable to every symbol of the alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapping {
    name: String,
    values: Vec<Variable>,
}

impl Mapping {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable at index `symbol`, for every symbol of the alphabet.
    pub fn values(&self) -> &[Variable] {
        &self.values
    }
}

#[derive(Clone, Debug)]
struct Node {
    formula: Formula,
    /// Whether a [`Formula::Mapping`] occurs anywhere below this node.
    parametrized: bool,
}

/// Owns every variable, mapping and formula node of a game.
///
/// Structurally identical formulas are interned, so building the same formula twice yields the
/// same [`FormulaId`]. The arena is append-only: handles stay valid for its whole lifetime.
#[derive(Clone, Debug, Default)]
pub struct FormulaArena {
    nodes: KeyedVec<FormulaId, Node>,
    unique_table: HashMap<Formula, FormulaId>,
    variable_names: KeyedVec<Variable, String>,
    mappings: KeyedVec<MappingId, Mapping>,
    simplified: HashMap<FormulaId, FormulaId>,
}

impl FormulaArena {
    pub fn new_variable(&mut self, name: impl Into<String>) -> Variable {
        self.variable_names.push(name.into())
    }

    pub fn num_variables(&self) -> usize {
        self.variable_names.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        self.variable_names.keys()
    }

    pub fn variable_name(&self, variable: Variable) -> &str {
        &self.variable_names[variable]
    }

    pub fn new_mapping(&mut self, name: impl Into<String>, values: Vec<Variable>) -> MappingId {
        self.mappings.push(Mapping {
            name: name.into(),
            values,
        })
    }

    pub fn mapping_info(&self, mapping: MappingId) -> &Mapping {
        &self.mappings[mapping]
    }

    pub fn mappings(&self) -> impl Iterator<Item = (MappingId, &Mapping)> {
        self.mappings.iter_with_keys()
    }

    pub fn mapping_value(&self, mapping: MappingId, symbol: Symbol) -> Variable {
        self.mappings[mapping].values[symbol as usize]
    }

    pub fn get(&self, id: FormulaId) -> &Formula {
        &self.nodes[id].formula
    }

    pub fn is_parametrized(&self, id: FormulaId) -> bool {
        self.nodes[id].parametrized
    }

    /// The number of distinct formula nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn variable(&mut self, variable: Variable) -> FormulaId {
        self.intern(Formula::Variable(variable))
    }

    pub fn not(&mut self, child: FormulaId) -> FormulaId {
        self.intern(Formula::Not(child))
    }

    pub fn and(&mut self, children: Vec<FormulaId>) -> FormulaId {
        self.intern(Formula::And(children))
    }

    pub fn or(&mut self, children: Vec<FormulaId>) -> FormulaId {
        self.intern(Formula::Or(children))
    }

    pub fn implies(&mut self, lhs: FormulaId, rhs: FormulaId) -> FormulaId {
        self.intern(Formula::Implies([lhs, rhs]))
    }

    pub fn equivalent(&mut self, lhs: FormulaId, rhs: FormulaId) -> FormulaId {
        self.intern(Formula::Equivalent([lhs, rhs]))
    }

    pub fn cardinality(
        &mut self,
        kind: CardinalityKind,
        bound: u32,
        children: Vec<FormulaId>,
    ) -> FormulaId {
        self.intern(Formula::Cardinality {
            kind,
            bound,
            children,
        })
    }

    pub fn at_least(&mut self, bound: u32, children: Vec<FormulaId>) -> FormulaId {
        self.cardinality(CardinalityKind::AtLeast, bound, children)
    }

    pub fn at_most(&mut self, bound: u32, children: Vec<FormulaId>) -> FormulaId {
        self.cardinality(CardinalityKind::AtMost, bound, children)
    }

    pub fn exactly(&mut self, bound: u32, children: Vec<FormulaId>) -> FormulaId {
        self.cardinality(CardinalityKind::Exactly, bound, children)
    }

    /// A mapping term for the 0-based `parameter`.
    pub fn mapping(&mut self, parameter: usize, mapping: MappingId) -> FormulaId {
        self.intern(Formula::Mapping { parameter, mapping })
    }

    fn intern(&mut self, formula: Formula) -> FormulaId {
        if let Some(&id) = self.unique_table.get(&formula) {
            return id;
        }

        let parametrized = matches!(formula, Formula::Mapping { .. })
            || formula
                .children()
                .iter()
                .any(|&child| self.nodes[child].parametrized);

        let id = self.nodes.push(Node {
            formula: formula.clone(),
            parametrized,
        });
        let _ = self.unique_table.insert(formula, id);
        id
    }

    /// The distinct nodes reachable from `root` (including it), in depth-first pre-order.
    pub fn reachable(&self, root: FormulaId) -> Vec<FormulaId> {
        let mut visited: HashSet<FormulaId> = HashSet::default();
        let mut order = vec![];
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            // Reversed so that the first child is visited first.
            stack.extend(self.get(id).children().iter().rev());
        }

        order
    }

    /// Rewrites `id` into an equivalent formula in which no conjunction has a conjunction as a
    /// direct child, and likewise for disjunctions. Children keep their relative order.
    ///
    /// The result is memoized, and simplifying a simplified formula returns it unchanged.
    pub fn simplify(&mut self, id: FormulaId) -> FormulaId {
        if let Some(&simplified) = self.simplified.get(&id) {
            return simplified;
        }

        let simplified = match self.get(id).clone() {
            Formula::Variable(_) | Formula::Mapping { .. } => id,
            Formula::Not(child) => {
                let child = self.simplify(child);
                self.not(child)
            }
            Formula::And(children) => {
                let children = self.flatten(children, |formula| match formula {
                    Formula::And(grandchildren) => Some(grandchildren),
                    _ => None,
                });
                self.and(children)
            }
            Formula::Or(children) => {
                let children = self.flatten(children, |formula| match formula {
                    Formula::Or(grandchildren) => Some(grandchildren),
                    _ => None,
                });
                self.or(children)
            }
            Formula::Implies([lhs, rhs]) => {
                let lhs = self.simplify(lhs);
                let rhs = self.simplify(rhs);
                self.implies(lhs, rhs)
            }
            Formula::Equivalent([lhs, rhs]) => {
                let lhs = self.simplify(lhs);
                let rhs = self.simplify(rhs);
                self.equivalent(lhs, rhs)
            }
            Formula::Cardinality {
                kind,
                bound,
                children,
            } => {
                let children = children
                    .into_iter()
                    .map(|child| self.simplify(child))
                    .collect();
                self.cardinality(kind, bound, children)
            }
        };

        let _ = self.simplified.insert(id, simplified);
        let _ = self.simplified.insert(simplified, simplified);
        simplified
    }

    fn flatten(
        &mut self,
        children: Vec<FormulaId>,
        same_operator: impl Fn(&Formula) -> Option<&Vec<FormulaId>>,
    ) -> Vec<FormulaId> {
        let mut flattened = Vec::with_capacity(children.len());
        for child in children {
            let child = self.simplify(child);
            match same_operator(self.get(child)) {
                Some(grandchildren) => flattened.extend_from_slice(grandchildren),
                None => flattened.push(child),
            }
        }
        flattened
    }

    /// Expands a cardinality operator into an equivalent conjunction of disjunctions over its
    /// children. Any other formula is returned unchanged.
    pub fn expand_cardinality(&mut self, id: FormulaId) -> FormulaId {
        let Formula::Cardinality {
            kind,
            bound,
            children,
        } = self.get(id).clone()
        else {
            return id;
        };

        let mut disjunctions = vec![];
        for clause in super::cardinality_clauses(kind, bound, &children) {
            let mut literals = Vec::with_capacity(clause.len());
            for (child, is_positive) in clause {
                literals.push(if is_positive { child } else { self.not(child) });
            }
            disjunctions.push(self.or(literals));
        }

        self.and(disjunctions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_variables(n: usize) -> (FormulaArena, Vec<FormulaId>) {
        let mut arena = FormulaArena::default();
        let leaves = (0..n)
            .map(|index| {
                let variable = arena.new_variable(format!("v{index}"));
                arena.variable(variable)
            })
            .collect();
        (arena, leaves)
    }

    #[test]
    fn identical_formulas_share_one_node() {
        let (mut arena, v) = arena_with_variables(2);

        let first = arena.and(vec![v[0], v[1]]);
        let second = arena.and(vec![v[0], v[1]]);
        let swapped = arena.and(vec![v[1], v[0]]);

        assert_eq!(first, second);
        assert_ne!(first, swapped);
    }

    #[test]
    fn nested_conjunctions_are_flattened_in_order() {
        let (mut arena, v) = arena_with_variables(4);
        let inner = arena.and(vec![v[1], v[2]]);
        let innermost = arena.and(vec![v[3]]);
        let middle = arena.and(vec![inner, innermost]);
        let outer = arena.and(vec![v[0], middle]);

        let simplified = arena.simplify(outer);

        assert_eq!(arena.get(simplified), &Formula::And(vec![v[0], v[1], v[2], v[3]]));
        assert_eq!(arena.simplify(simplified), simplified);
    }

    #[test]
    fn flattening_stops_at_other_operators() {
        let (mut arena, v) = arena_with_variables(3);
        let inner_or = arena.or(vec![v[1], v[2]]);
        let not = arena.not(inner_or);
        let outer_or = arena.or(vec![v[0], not, inner_or]);

        let simplified = arena.simplify(outer_or);

        assert_eq!(arena.get(simplified), &Formula::Or(vec![v[0], not, v[1], v[2]]));
    }

    #[test]
    fn parametrization_propagates_upwards() {
        let (mut arena, v) = arena_with_variables(2);
        let variables = arena.variables().collect::<Vec<_>>();
        let mapping = arena.new_mapping("m", variables);
        let term = arena.mapping(0, mapping);
        let conjunction = arena.and(vec![v[0], term]);
        let plain = arena.and(vec![v[0], v[1]]);

        assert!(arena.is_parametrized(conjunction));
        assert!(!arena.is_parametrized(plain));
    }

    #[test]
    fn reachable_counts_shared_nodes_once() {
        let (mut arena, v) = arena_with_variables(2);
        let shared = arena.or(vec![v[0], v[1]]);
        let negated = arena.not(shared);
        let root = arena.and(vec![shared, negated]);

        assert_eq!(arena.reachable(root), vec![root, shared, v[0], v[1], negated]);
    }
}
