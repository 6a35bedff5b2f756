use super::Formula;
use super::FormulaArena;
use super::FormulaId;
use super::Symbol;
use crate::basic_types::Model;
use crate::cobra_assert_simple;

impl FormulaArena {
    /// Evaluates `id` directly under `model`, resolving mapping terms through `parameters`.
    pub fn evaluate(&self, id: FormulaId, model: &Model, parameters: &[Symbol]) -> bool {
        match self.get(id) {
            Formula::Variable(variable) => model.value(*variable),
            Formula::Mapping { parameter, mapping } => {
                cobra_assert_simple!(
                    *parameter < parameters.len(),
                    "mapping term refers to parameter {} but only {} were given",
                    parameter + 1,
                    parameters.len()
                );
                model.value(self.mapping_value(*mapping, parameters[*parameter]))
            }
            Formula::Not(child) => !self.evaluate(*child, model, parameters),
            Formula::And(children) => children
                .iter()
                .all(|&child| self.evaluate(child, model, parameters)),
            Formula::Or(children) => children
                .iter()
                .any(|&child| self.evaluate(child, model, parameters)),
            Formula::Implies([lhs, rhs]) => {
                !self.evaluate(*lhs, model, parameters) || self.evaluate(*rhs, model, parameters)
            }
            Formula::Equivalent([lhs, rhs]) => {
                self.evaluate(*lhs, model, parameters) == self.evaluate(*rhs, model, parameters)
            }
            Formula::Cardinality {
                kind,
                bound,
                children,
            } => {
                let count = children
                    .iter()
                    .filter(|&&child| self.evaluate(child, model, parameters))
                    .count();
                kind.holds(count, *bound)
            }
        }
    }
}
