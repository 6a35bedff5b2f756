use std::fmt::Display;
use std::fmt::Formatter;

use super::Variable;

/// A signed occurrence of a [`Variable`].
///
/// The literal is stored as `2 * id + polarity`, so that literals can index watch lists directly
/// and the two literals of a variable are adjacent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    code: u32,
}

impl Literal {
    pub fn new(variable: Variable, is_positive: bool) -> Literal {
        Literal {
            code: variable.id() * 2 + is_positive as u32,
        }
    }

    pub fn positive(variable: Variable) -> Literal {
        Literal::new(variable, true)
    }

    pub fn negative(variable: Variable) -> Literal {
        Literal::new(variable, false)
    }

    pub fn is_positive(&self) -> bool {
        (self.code & 1) == 1
    }

    pub fn is_negative(&self) -> bool {
        !self.is_positive()
    }

    pub fn variable(&self) -> Variable {
        Variable::new(self.code / 2)
    }

    /// The dense code of this literal, usable as an index.
    pub fn code(&self) -> usize {
        self.code as usize
    }

    /// The signed integer used for this literal in the DIMACS format.
    pub fn to_dimacs(&self) -> i64 {
        let id = i64::from(self.variable().id());
        if self.is_positive() {
            id
        } else {
            -id
        }
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_negative() {
            write!(f, "~{}", self.variable())
        } else {
            write!(f, "{}", self.variable())
        }
    }
}
