use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub allow_text: bool,
}

impl Question {
    pub fn choice(&self, value: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    pub questions: Vec<Question>,
}

impl Survey {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn completion_cookie_name(&self) -> String {
        completion_cookie_name(&self.id)
    }
}

pub fn completion_cookie_name(survey_id: &str) -> String {
    format!("completed_{survey_id}")
}

/// One answered question. `text` is empty when no free text was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub choice: String,
    #[serde(default)]
    pub text: String,
}

/// Progress held server-side for one session token.
///
/// `responses` is `None` until the intro page is submitted; an empty vector
/// means "begun, nothing answered yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub current_survey: Option<String>,
    pub responses: Option<Vec<Response>>,
    #[serde(default)]
    pub flashes: Vec<String>,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.current_survey.is_none() && self.responses.is_none() && self.flashes.is_empty()
    }

    pub fn progress(&self) -> Option<usize> {
        self.responses.as_ref().map(Vec::len)
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
    }

    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flashes)
    }
}
