use thiserror::Error;

/// A reason why a game definition was rejected by [`GameBuilder::build`].
///
/// [`GameBuilder::build`]: super::GameBuilder::build
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameDefinitionError {
    #[error("The alphabet is empty")]
    EmptyAlphabet,
    #[error("The alphabet has {0} symbols, at most 256 are supported")]
    AlphabetTooLarge(usize),
    #[error("The alphabet contains the symbol '{0}' twice")]
    DuplicateSymbol(String),
    #[error("Mapping '{name}' has {actual} values, the alphabet has {expected} symbols")]
    MappingLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Mapping '{name}' refers to variable {variable}, which was never declared")]
    UndeclaredVariable { name: String, variable: u32 },
    #[error("No restriction was given")]
    MissingRestriction,
    #[error("The restriction refers to a parameter through mapping '{0}'")]
    MappingInRestriction(String),
    #[error("The game has no experiment types")]
    NoExperiments,
    #[error("Experiment '{0}' is defined twice")]
    DuplicateExperiment(String),
    #[error("Experiment '{0}' has no outcomes")]
    NoOutcomes(String),
    #[error("Experiment '{experiment}' refers to parameter {parameter}, it only has {num_parameters}")]
    ParameterOutOfRange {
        experiment: String,
        parameter: usize,
        num_parameters: usize,
    },
    #[error("Experiment '{0}' lists parameters to be sorted which are not strictly increasing")]
    UnsortedPositions(String),
}
