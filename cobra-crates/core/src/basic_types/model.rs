use std::fmt::Display;
use std::fmt::Formatter;

use super::Literal;
use super::Variable;

const WORD_BITS: usize = u64::BITS as usize;

/// A complete assignment to the variables `1..=num_variables`, stored as a bit vector indexed by
/// variable id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Model {
    num_variables: usize,
    words: Vec<u64>,
}

impl Model {
    /// An assignment setting every variable to false.
    pub fn new(num_variables: usize) -> Model {
        Model {
            num_variables,
            words: vec![0; (num_variables + 1).div_ceil(WORD_BITS)],
        }
    }

    pub fn from_fn(num_variables: usize, mut value: impl FnMut(Variable) -> bool) -> Model {
        let mut model = Model::new(num_variables);
        for variable in Variable::all(num_variables) {
            model.set(variable, value(variable));
        }
        model
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn value(&self, variable: Variable) -> bool {
        let id = variable.id() as usize;
        (self.words[id / WORD_BITS] >> (id % WORD_BITS)) & 1 == 1
    }

    pub fn literal_value(&self, literal: Literal) -> bool {
        self.value(literal.variable()) == literal.is_positive()
    }

    pub fn set(&mut self, variable: Variable, value: bool) {
        let id = variable.id() as usize;
        let mask = 1_u64 << (id % WORD_BITS);
        if value {
            self.words[id / WORD_BITS] |= mask;
        } else {
            self.words[id / WORD_BITS] &= !mask;
        }
    }

    pub fn true_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        Variable::all(self.num_variables).filter(|&variable| self.value(variable))
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for variable in Variable::all(self.num_variables) {
            write!(f, "{}", if self.value(variable) { '1' } else { '0' })?;
        }
        Ok(())
    }
}
