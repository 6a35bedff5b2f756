use std::fmt::Display;
use std::fmt::Formatter;

use super::ClauseSink;
use super::EncodingKey;
use super::TseitinEncoder;
use crate::basic_types::Clause;
use crate::basic_types::Model;
use crate::basic_types::Variable;
use crate::containers::HashSet;
use crate::formula::FormulaArena;
use crate::formula::FormulaId;
use crate::formula::Symbol;

/// A standalone CNF instance: its clauses, the original variables it ranges over and the origin
/// of every auxiliary variable.
#[derive(Clone, Debug, Default)]
pub struct CnfFormula {
    clauses: Vec<Clause>,
    num_original_variables: usize,
    /// `origins[i]` is the node represented by auxiliary variable `num_original_variables + 1 + i`
    origins: Vec<FormulaId>,
    defined: HashSet<EncodingKey>,
}

impl CnfFormula {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_variables(&self) -> usize {
        self.num_original_variables + self.origins.len()
    }

    pub fn original_variables(&self) -> impl Iterator<Item = Variable> {
        Variable::all(self.num_original_variables)
    }

    pub fn auxiliary_variables(&self) -> impl Iterator<Item = (Variable, FormulaId)> + '_ {
        self.origins.iter().enumerate().map(|(index, &origin)| {
            (
                Variable::new((self.num_original_variables + index + 1) as u32),
                origin,
            )
        })
    }

    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(model))
    }
}

impl ClauseSink for CnfFormula {
    fn is_defined(&self, key: &EncodingKey) -> bool {
        self.defined.contains(key)
    }

    fn define(&mut self, key: &EncodingKey, clauses: &[Clause]) {
        let _ = self.defined.insert(key.clone());
        self.clauses.extend_from_slice(clauses);
    }

    fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }
}

/// Compiles `formula` under `parameters` into an equisatisfiable CNF over the variables of
/// `arena` plus fresh auxiliary variables.
pub fn to_cnf(arena: &FormulaArena, formula: FormulaId, parameters: &[Symbol]) -> CnfFormula {
    let mut encoder = TseitinEncoder::new(arena.num_variables());
    let mut cnf = CnfFormula {
        num_original_variables: arena.num_variables(),
        ..Default::default()
    };

    encoder.add_constraint(arena, formula, parameters, &mut cnf);

    cnf.origins = Variable::all(encoder.num_variables())
        .skip(arena.num_variables())
        .filter_map(|variable| encoder.origin(variable))
        .collect();
    cnf
}

/// Writes the instance in the DIMACS format.
impl Display for CnfFormula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (variable, origin) in self.auxiliary_variables() {
            writeln!(f, "c {} {origin:?}", variable.id())?;
        }
        writeln!(f, "p cnf {} {}", self.num_variables(), self.clauses.len())?;
        for clause in &self.clauses {
            for literal in clause.literals() {
                write!(f, "{} ", literal.to_dimacs())?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}
