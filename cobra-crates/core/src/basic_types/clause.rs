use std::fmt::Display;
use std::fmt::Formatter;

use super::Literal;
use super::Model;

/// A disjunction of literals.
///
/// Literals are kept sorted and without duplicates, so two clauses over the same set of literals
/// compare equal regardless of the order in which they were built.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(mut literals: Vec<Literal>) -> Clause {
        literals.sort();
        literals.dedup();
        Clause { literals }
    }

    pub fn unit(literal: Literal) -> Clause {
        Clause {
            literals: vec![literal],
        }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A clause containing both polarities of some variable is satisfied by every assignment.
    pub fn is_tautology(&self) -> bool {
        // Complementary literals are adjacent after sorting.
        self.literals
            .windows(2)
            .any(|pair| pair[0].variable() == pair[1].variable())
    }

    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.literals
            .iter()
            .any(|&literal| model.literal_value(literal))
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (index, literal) in self.literals.iter().enumerate() {
            if index > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{literal}")?;
        }
        write!(f, ")")
    }
}
