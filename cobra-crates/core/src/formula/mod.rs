//! Logic formulas over game variables.
//!
//! Formulas are immutable and hash-consed inside a [`FormulaArena`]; they are addressed by
//! [`FormulaId`] handles. Besides the usual connectives a formula may contain cardinality
//! operators and [`Formula::Mapping`] terms, which only get a meaning once the parameters of an
//! experiment are known: `Mapping { parameter: 1, mapping }` denotes the variable the mapping
//! assigns to the symbol chosen for the second parameter.
mod arena;
mod cardinality;
mod display;
mod evaluate;

pub use arena::FormulaArena;
pub use arena::Mapping;
pub(crate) use cardinality::cardinality_clauses;
pub use display::FormulaDisplay;

use crate::basic_types::Variable;
use crate::containers::StorageKey;

/// The index of a symbol of the game alphabet, used as the value of an experiment parameter.
pub type Symbol = u8;

/// A handle to a formula stored in a [`FormulaArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormulaId(u32);

impl StorageKey for FormulaId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        FormulaId(index as u32)
    }
}

/// A handle to a [`Mapping`] stored in a [`FormulaArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MappingId(u32);

impl StorageKey for MappingId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        MappingId(index as u32)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardinalityKind {
    AtLeast,
    AtMost,
    Exactly,
}

impl CardinalityKind {
    /// Whether `count` true children satisfy the operator with the given bound.
    pub fn holds(self, count: usize, bound: u32) -> bool {
        let bound = bound as usize;
        match self {
            CardinalityKind::AtLeast => count >= bound,
            CardinalityKind::AtMost => count <= bound,
            CardinalityKind::Exactly => count == bound,
        }
    }

    fn name(self) -> &'static str {
        match self {
            CardinalityKind::AtLeast => "AtLeast",
            CardinalityKind::AtMost => "AtMost",
            CardinalityKind::Exactly => "Exactly",
        }
    }
}

/// A single formula node. Children are referred to by handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Formula {
    Variable(Variable),
    Not(FormulaId),
    And(Vec<FormulaId>),
    Or(Vec<FormulaId>),
    Implies([FormulaId; 2]),
    Equivalent([FormulaId; 2]),
    Cardinality {
        kind: CardinalityKind,
        bound: u32,
        children: Vec<FormulaId>,
    },
    /// The variable that `mapping` assigns to the value of the 0-based `parameter`.
    Mapping {
        parameter: usize,
        mapping: MappingId,
    },
}

impl Formula {
    pub fn children(&self) -> &[FormulaId] {
        match self {
            Formula::Variable(_) | Formula::Mapping { .. } => &[],
            Formula::Not(child) => std::slice::from_ref(child),
            Formula::And(children)
            | Formula::Or(children)
            | Formula::Cardinality { children, .. } => children,
            Formula::Implies(children) | Formula::Equivalent(children) => children,
        }
    }

    /// Leaves are their own literal during CNF compilation.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Formula::Variable(_) | Formula::Mapping { .. })
    }
}
