//! The propositional vocabulary shared by all other modules.
mod clause;
mod literal;
mod model;
mod variable;

pub use clause::Clause;
pub use literal::Literal;
pub use model::Model;
pub use variable::Variable;
