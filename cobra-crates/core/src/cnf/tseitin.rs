use log::trace;

use crate::basic_types::Clause;
use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::containers::HashMap;
use crate::formula::cardinality_clauses;
use crate::formula::Formula;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::Symbol;

/// Identifies one encoded occurrence of a formula node.
///
/// A node containing mapping terms means something different under every parameter tuple, so
/// the parameters are part of the key; for all other nodes they are left empty so that the
/// encoding is shared between tuples.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodingKey {
    formula: FormulaId,
    parameters: Vec<Symbol>,
}

impl EncodingKey {
    fn new(arena: &FormulaArena, formula: FormulaId, parameters: &[Symbol]) -> EncodingKey {
        EncodingKey {
            formula,
            parameters: if arena.is_parametrized(formula) {
                parameters.to_vec()
            } else {
                vec![]
            },
        }
    }

    pub fn formula(&self) -> FormulaId {
        self.formula
    }
}

/// The receiver of the clauses produced by a [`TseitinEncoder`].
///
/// A sink remembers which nodes it already holds the definition of. The encoder emits the
/// definition of a node only after those of its children, so a sink which discards definitions
/// in reverse order of arrival never holds a definition whose children are missing.
pub trait ClauseSink {
    fn is_defined(&self, key: &EncodingKey) -> bool;

    /// Receives the defining clauses of the auxiliary variable of `key`.
    fn define(&mut self, key: &EncodingKey, clauses: &[Clause]);

    fn add_clause(&mut self, clause: Clause);
}

/// Incremental Tseitin transformation over a fixed set of original variables.
///
/// Auxiliary variables are numbered after the original variables and are never reused, so
/// compiling the same formula again returns the same literals and clauses.
#[derive(Clone, Debug)]
pub struct TseitinEncoder {
    num_original_variables: usize,
    num_variables: usize,
    literals: HashMap<EncodingKey, Literal>,
    definitions: HashMap<EncodingKey, Vec<Clause>>,
    origins: Vec<FormulaId>,
}

impl TseitinEncoder {
    pub fn new(num_original_variables: usize) -> TseitinEncoder {
        TseitinEncoder {
            num_original_variables,
            num_variables: num_original_variables,
            literals: HashMap::default(),
            definitions: HashMap::default(),
            origins: vec![],
        }
    }

    pub fn num_original_variables(&self) -> usize {
        self.num_original_variables
    }

    /// The number of original plus auxiliary variables allocated so far.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// The node whose truth value the auxiliary `variable` represents.
    pub fn origin(&self, variable: Variable) -> Option<FormulaId> {
        let index = (variable.id() as usize).checked_sub(self.num_original_variables + 1)?;
        self.origins.get(index).copied()
    }

    pub fn definition(&self, key: &EncodingKey) -> &[Clause] {
        &self.definitions[key]
    }

    /// Sends to `sink` the clauses asserting `formula` under `parameters`: the definitions of
    /// every node the sink does not hold yet, and a unit clause on the literal of `formula`.
    pub fn add_constraint(
        &mut self,
        arena: &FormulaArena,
        formula: FormulaId,
        parameters: &[Symbol],
        sink: &mut impl ClauseSink,
    ) {
        let root = self.encode(arena, formula, parameters, sink);
        sink.add_clause(Clause::unit(root));
    }

    /// Returns the literal representing `formula`, making sure `sink` holds its definition.
    pub fn encode(
        &mut self,
        arena: &FormulaArena,
        formula: FormulaId,
        parameters: &[Symbol],
        sink: &mut impl ClauseSink,
    ) -> Literal {
        match arena.get(formula) {
            Formula::Variable(variable) => return Literal::positive(*variable),
            Formula::Mapping { parameter, mapping } => {
                return Literal::positive(arena.mapping_value(*mapping, parameters[*parameter]))
            }
            _ => {}
        }

        let key = EncodingKey::new(arena, formula, parameters);
        if let Some(&literal) = self.literals.get(&key) {
            if sink.is_defined(&key) {
                return literal;
            }
        }

        let children = arena
            .get(formula)
            .children()
            .iter()
            .map(|&child| self.encode(arena, child, parameters, sink))
            .collect::<Vec<_>>();

        if !self.definitions.contains_key(&key) {
            let literal = self.new_auxiliary(formula);
            let clauses = self.define(arena.get(formula), formula, literal, &children);
            trace!(
                "encoded node {formula:?} as {literal} with {} clauses",
                clauses.len()
            );
            let _ = self.literals.insert(key.clone(), literal);
            let _ = self.definitions.insert(key.clone(), clauses);
        }

        sink.define(&key, &self.definitions[&key]);
        self.literals[&key]
    }

    fn new_auxiliary(&mut self, origin: FormulaId) -> Literal {
        self.num_variables += 1;
        self.origins.push(origin);
        Literal::positive(Variable::new(self.num_variables as u32))
    }

    /// The clauses forcing `x` to equal the operator of `formula` applied to `children`.
    fn define(
        &mut self,
        formula: &Formula,
        id: FormulaId,
        x: Literal,
        children: &[Literal],
    ) -> Vec<Clause> {
        match formula {
            Formula::Variable(_) | Formula::Mapping { .. } => {
                unreachable!("leaves are not defined by clauses")
            }
            Formula::Not(_) => {
                let a = children[0];
                vec![Clause::new(vec![!x, !a]), Clause::new(vec![x, a])]
            }
            Formula::And(_) => and_definition(x, children),
            Formula::Or(_) => or_definition(x, children),
            Formula::Implies(_) => {
                let (l, r) = (children[0], children[1]);
                vec![
                    Clause::new(vec![!x, !l, r]),
                    Clause::new(vec![l, x]),
                    Clause::new(vec![!r, x]),
                ]
            }
            Formula::Equivalent(_) => {
                let (l, r) = (children[0], children[1]);
                vec![
                    Clause::new(vec![!x, !l, r]),
                    Clause::new(vec![!x, l, !r]),
                    Clause::new(vec![x, l, r]),
                    Clause::new(vec![x, !l, !r]),
                ]
            }
            Formula::Cardinality { kind, bound, .. } => {
                // Every expansion clause gets a literal of its own (a fresh disjunction, or the
                // literal itself for singleton clauses), and `x` is their conjunction.
                let mut clauses = vec![];
                let mut conjuncts = vec![];
                for expansion_clause in cardinality_clauses(*kind, *bound, children) {
                    let literals = expansion_clause
                        .into_iter()
                        .map(|(literal, is_positive)| if is_positive { literal } else { !literal })
                        .collect::<Vec<_>>();
                    if let [literal] = literals[..] {
                        conjuncts.push(literal);
                    } else {
                        let y = self.new_auxiliary(id);
                        clauses.extend(or_definition(y, &literals));
                        conjuncts.push(y);
                    }
                }
                clauses.extend(and_definition(x, &conjuncts));
                clauses
            }
        }
    }
}

fn and_definition(x: Literal, children: &[Literal]) -> Vec<Clause> {
    let mut clauses = Vec::with_capacity(children.len() + 1);
    clauses.push(Clause::new(
        std::iter::once(x)
            .chain(children.iter().map(|&child| !child))
            .collect(),
    ));
    clauses.extend(children.iter().map(|&child| Clause::new(vec![child, !x])));
    clauses
}

fn or_definition(x: Literal, children: &[Literal]) -> Vec<Clause> {
    let mut clauses = Vec::with_capacity(children.len() + 1);
    clauses.push(Clause::new(
        std::iter::once(!x).chain(children.iter().copied()).collect(),
    ));
    clauses.extend(children.iter().map(|&child| Clause::new(vec![!child, x])));
    clauses
}
