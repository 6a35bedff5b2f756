use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("The restriction admits no code")]
    NoCodes,
    #[error("The codebreaker chose experiment {index} out of {num_experiments}")]
    ExperimentOutOfRange {
        index: usize,
        num_experiments: usize,
    },
    #[error("The codemaker chose outcome {index} out of {num_outcomes}")]
    OutcomeOutOfRange { index: usize, num_outcomes: usize },
    #[error("The codemaker chose outcome '{0}', which no remaining code produces")]
    UnsatisfiableOutcome(String),
    #[error("No experiment distinguishes between the {0} remaining codes")]
    NoInformativeExperiment(usize),
}
