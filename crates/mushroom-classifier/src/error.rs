use thiserror::Error;

/// Errors produced while building, training or querying the classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// An encoded vector does not line up with the frozen schema.
    #[error("encoded vector has {actual} columns but the schema has {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("unknown attribute '{attribute}'")]
    InvalidQuery { attribute: String },

    #[error("training corpus is empty")]
    EmptyTrainingCorpus,

    /// Only one class is represented in the training labels.
    #[error("training corpus only contains '{class}' samples")]
    DegenerateTrainingCorpus { class: String },

    #[error("invalid training corpus: {0}")]
    InvalidCorpus(String),

    #[error("invalid feature catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} has not been fitted")]
    NotFitted(&'static str),

    #[error("tree learner failed: {0}")]
    Learner(#[from] linfa::Error),

    #[error("failed to read training corpus")]
    Csv(#[from] csv::Error),

    #[error("failed to read training corpus")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Text that is safe to show to an end user.
    ///
    /// Only `InvalidQuery` is something the user can act on; every other kind
    /// collapses to a generic message and should be logged in full instead.
    pub fn user_message(&self) -> String {
        match self {
            ClassifierError::InvalidQuery { attribute } => format!(
                "'{}' is not a known mushroom characteristic. Please check the attribute name.",
                attribute
            ),
            _ => "The classifier could not produce a prediction. See the log for details."
                .to_string(),
        }
    }
}
