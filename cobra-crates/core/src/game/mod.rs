//! Games: the variables describing the secret code, the restriction on the possible codes and
//! the experiment types available to the codebreaker.
mod builder;
mod definition;
mod error;
mod experiment;

pub use builder::ExperimentDefinition;
pub use builder::GameBuilder;
pub use definition::ExperimentType;
pub use definition::Game;
pub use definition::Outcome;
pub use error::GameDefinitionError;
pub use experiment::ParametrizedExperiment;
