//! Symmetry breaking for experiment parameters.
//!
//! The knowledge gathered so far and an experiment instantiated with a parameter tuple are drawn
//! as one [`ColoredGraph`]. Two tuples whose graphs have the same canonical form lead to
//! experiments that are equivalent up to a symmetry of the game, so only one of them needs to
//! be explored. The [`ParameterGenerator`] combines this exact test with cheaper filters based
//! on the declared parameter orderings and on [`VariableGroups`].
mod canonical;
mod generator;
mod graph;
mod groups;
mod knowledge;

pub use canonical::AutomorphismOracle;
pub use canonical::CanonicalForm;
pub use canonical::CanonicalLabeling;
pub use canonical::CanonizerStatistics;
pub use canonical::SearchCanonizer;
pub use generator::GeneratorStatistics;
pub use generator::ParameterGenerator;
pub use graph::ColoredGraph;
pub use graph::Layer;
pub use graph::OperatorKind;
pub use graph::VertexColor;
pub use groups::VariableGroups;
pub use groups::VariableStatus;
pub use knowledge::KnowledgeGraph;
