use shared::domain::{Question, Response, Survey};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    PickSurvey {
        surveys: &'a [Survey],
    },
    SurveyStart {
        survey: &'a Survey,
    },
    AlreadyCompleted {
        survey: &'a Survey,
    },
    Question {
        survey: &'a Survey,
        index: usize,
        question: &'a Question,
    },
    Completion {
        survey: &'a Survey,
        responses: Vec<Response>,
    },
}

impl View<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PickSurvey { .. } => "pick-survey",
            Self::SurveyStart { .. } => "survey-start",
            Self::AlreadyCompleted { .. } => "already-done",
            Self::Question { .. } => "question",
            Self::Completion { .. } => "completion",
        }
    }
}

/// A view plus the flash messages to show alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub view: View<'a>,
    pub flashes: Vec<String>,
}

#[derive(Debug, Error)]
#[error("failed to render view {view}: {message}")]
pub struct RenderError {
    pub view: &'static str,
    pub message: String,
}

impl RenderError {
    pub fn new(view: &'static str, message: impl Into<String>) -> Self {
        Self {
            view,
            message: message.into(),
        }
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, page: &Page<'_>) -> Result<String, RenderError>;
}
