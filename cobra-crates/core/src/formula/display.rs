use std::fmt::Display;
use std::fmt::Formatter;

use super::Formula;
use super::FormulaArena;
use super::FormulaId;
use super::Symbol;

/// Renders a formula in a human-readable infix notation.
///
/// Without parameters, mapping terms are shown as `name[$i]` with 1-based parameter positions;
/// with parameters they are replaced by the name of the variable they resolve to.
#[derive(Clone, Copy, Debug)]
pub struct FormulaDisplay<'a> {
    arena: &'a FormulaArena,
    id: FormulaId,
    parameters: Option<&'a [Symbol]>,
}

impl FormulaArena {
    pub fn display<'a>(
        &'a self,
        id: FormulaId,
        parameters: Option<&'a [Symbol]>,
    ) -> FormulaDisplay<'a> {
        FormulaDisplay {
            arena: self,
            id,
            parameters,
        }
    }
}

impl FormulaDisplay<'_> {
    fn child(&self, id: FormulaId) -> Self {
        FormulaDisplay { id, ..*self }
    }

    fn write_joined(
        &self,
        f: &mut Formatter<'_>,
        children: &[FormulaId],
        separator: &str,
    ) -> std::fmt::Result {
        for (index, &child) in children.iter().enumerate() {
            if index > 0 {
                write!(f, "{separator}")?;
            }
            write!(f, "{}", self.child(child))?;
        }
        Ok(())
    }
}

impl Display for FormulaDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.arena.get(self.id) {
            Formula::Variable(variable) => write!(f, "{}", self.arena.variable_name(*variable)),
            Formula::Mapping { parameter, mapping } => match self.parameters {
                Some(parameters) => {
                    let variable = self
                        .arena
                        .mapping_value(*mapping, parameters[*parameter]);
                    write!(f, "{}", self.arena.variable_name(variable))
                }
                None => write!(
                    f,
                    "{}[${}]",
                    self.arena.mapping_info(*mapping).name(),
                    parameter + 1
                ),
            },
            Formula::Not(child) => write!(f, "!{}", self.child(*child)),
            Formula::And(children) if children.is_empty() => write!(f, "true"),
            Formula::Or(children) if children.is_empty() => write!(f, "false"),
            Formula::And(children) => {
                write!(f, "(")?;
                self.write_joined(f, children, " & ")?;
                write!(f, ")")
            }
            Formula::Or(children) => {
                write!(f, "(")?;
                self.write_joined(f, children, " | ")?;
                write!(f, ")")
            }
            Formula::Implies([lhs, rhs]) => {
                write!(f, "({} -> {})", self.child(*lhs), self.child(*rhs))
            }
            Formula::Equivalent([lhs, rhs]) => {
                write!(f, "({} <-> {})", self.child(*lhs), self.child(*rhs))
            }
            Formula::Cardinality {
                kind,
                bound,
                children,
            } => {
                write!(f, "{}{bound}(", kind.name())?;
                self.write_joined(f, children, ", ")?;
                write!(f, ")")
            }
        }
    }
}
