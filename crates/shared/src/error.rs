use thiserror::Error;

/// Non-fatal flow conditions. The `Display` text is what the user sees as a
/// flash message; variants that never flash still carry a message for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Invalid survey selected.")]
    InvalidSelection,
    #[error("You have already completed this survey.")]
    AlreadyCompleted,
    #[error("No survey in progress.")]
    SessionDesync,
    #[error("Invalid question id: {requested}.")]
    IndexMismatch { requested: usize },
    #[error("Invalid survey.")]
    UnknownSurvey,
    #[error("Please choose an answer.")]
    MissingAnswer,
}

impl FlowError {
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::AlreadyCompleted | Self::SessionDesync)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse survey catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("survey catalog is empty")]
    Empty,
    #[error("survey id {0:?} must be non-empty and contain only ASCII letters, digits, '-' or '_'")]
    InvalidId(String),
    #[error("survey id {0:?} is defined more than once")]
    DuplicateId(String),
    #[error("survey {0:?} has no questions")]
    NoQuestions(String),
    #[error("question {index} of survey {survey:?} has no choices")]
    NoChoices { survey: String, index: usize },
    #[error("question {index} of survey {survey:?} repeats choice value {value:?}")]
    DuplicateChoice {
        survey: String,
        index: usize,
        value: String,
    },
}
