use std::fmt::Display;
use std::fmt::Formatter;

use crate::cobra_assert_simple;
use crate::containers::StorageKey;

/// A boolean variable, identified by a dense id starting at 1.
///
/// Id 0 is reserved (it has no signed counterpart in the DIMACS format), so the storage index of
/// a variable is its id minus one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    id: u32,
}

impl Variable {
    pub fn new(id: u32) -> Variable {
        cobra_assert_simple!(id > 0, "variable id 0 is reserved");
        Variable { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Iterate over the variables with ids `1..=num_variables`.
    pub fn all(num_variables: usize) -> impl Iterator<Item = Variable> {
        (1..=num_variables as u32).map(Variable::new)
    }
}

impl StorageKey for Variable {
    fn index(&self) -> usize {
        self.id as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        Variable::new(index as u32 + 1)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
