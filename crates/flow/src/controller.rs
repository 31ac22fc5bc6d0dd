use std::{fmt, sync::Arc};

use chrono::Duration;
use shared::{
    catalog::Catalog,
    domain::{Response, SessionState, Survey},
    error::FlowError,
};
use tracing::{debug, info};

use crate::{
    cookies::{CookieJar, SetCookie},
    view::View,
};

pub const COMPLETION_COOKIE_VALUE: &str = "yes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Picker,
    Question(usize),
    Complete,
}

impl Location {
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Picker => f.write_str("/"),
            Self::Question(index) => write!(f, "/questions/{index}"),
            Self::Complete => f.write_str("/complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<'a> {
    Render(View<'a>),
    Redirect(Location),
}

/// The survey-taking state machine.
///
/// Every operation takes the caller's session and cookies explicitly and
/// mutates them in place; nothing here touches I/O.
#[derive(Debug, Clone)]
pub struct SurveyFlow {
    catalog: Arc<Catalog>,
    completion_ttl: Duration,
}

impl SurveyFlow {
    pub fn new(catalog: Arc<Catalog>, completion_ttl: Duration) -> Self {
        Self {
            catalog,
            completion_ttl,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn completion_ttl(&self) -> Duration {
        self.completion_ttl
    }

    pub fn list_surveys(&self) -> Outcome<'_> {
        Outcome::Render(View::PickSurvey {
            surveys: self.catalog.surveys(),
        })
    }

    pub fn pick_survey(
        &self,
        session: &mut SessionState,
        jar: &CookieJar,
        survey_code: Option<&str>,
    ) -> Outcome<'_> {
        let survey = match survey_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .and_then(|code| self.catalog.get(code))
        {
            Some(survey) => survey,
            None => {
                debug!(survey_code, "rejected survey selection");
                return recover(session, FlowError::InvalidSelection);
            }
        };

        if jar.contains(&survey.completion_cookie_name()) {
            info!(survey_id = %survey.id, "survey already completed; not restarting");
            return Outcome::Render(View::AlreadyCompleted { survey });
        }

        session.current_survey = Some(survey.id.clone());
        session.responses = None;
        info!(survey_id = %survey.id, "survey picked");
        Outcome::Render(View::SurveyStart { survey })
    }

    pub fn begin(&self, session: &mut SessionState) -> Outcome<'_> {
        if session.current_survey.is_none() {
            return recover(session, FlowError::SessionDesync);
        }
        session.responses = Some(Vec::new());
        Outcome::Redirect(Location::Question(0))
    }

    pub fn answer(
        &self,
        session: &mut SessionState,
        answer: Option<&str>,
        text: Option<&str>,
    ) -> Outcome<'_> {
        let (survey, answered) = match self.active_survey(session) {
            Ok(active) => active,
            Err(error) => return recover(session, error),
        };
        if answered >= survey.question_count() {
            return Outcome::Redirect(Location::Complete);
        }

        let Some(choice) = answer.filter(|choice| !choice.trim().is_empty()) else {
            session.flash(FlowError::MissingAnswer.to_string());
            return Outcome::Redirect(Location::Question(answered));
        };

        let responses = session.responses.get_or_insert_with(Vec::new);
        responses.push(Response {
            choice: choice.to_string(),
            text: text.unwrap_or_default().to_string(),
        });
        let answered = responses.len();
        debug!(survey_id = %survey.id, answered, "response recorded");

        if answered == survey.question_count() {
            Outcome::Redirect(Location::Complete)
        } else {
            Outcome::Redirect(Location::Question(answered))
        }
    }

    pub fn show_question(&self, session: &mut SessionState, index: usize) -> Outcome<'_> {
        let (survey, answered) = match self.active_survey(session) {
            Ok(active) => active,
            Err(error) => return recover(session, error),
        };
        if answered >= survey.question_count() {
            return Outcome::Redirect(Location::Complete);
        }
        if index != answered {
            info!(
                survey_id = %survey.id,
                requested = index,
                expected = answered,
                "question index out of sync; redirecting"
            );
            session.flash(FlowError::IndexMismatch { requested: index }.to_string());
            return Outcome::Redirect(Location::Question(answered));
        }

        Outcome::Render(View::Question {
            survey,
            index,
            question: &survey.questions[index],
        })
    }

    pub fn complete(&self, session: &mut SessionState, jar: &mut CookieJar) -> Outcome<'_> {
        let (survey, answered) = match self.active_survey(session) {
            Ok(active) => active,
            Err(error) => return recover(session, error),
        };
        if answered < survey.question_count() {
            return Outcome::Redirect(Location::Question(answered));
        }

        jar.set(
            SetCookie::new(survey.completion_cookie_name(), COMPLETION_COOKIE_VALUE)
                .max_age(self.completion_ttl),
        );
        info!(survey_id = %survey.id, "survey completed");
        Outcome::Render(View::Completion {
            survey,
            responses: session.responses.clone().unwrap_or_default(),
        })
    }

    fn active_survey(&self, session: &SessionState) -> Result<(&Survey, usize), FlowError> {
        let (Some(survey_id), Some(answered)) = (&session.current_survey, session.progress())
        else {
            return Err(FlowError::SessionDesync);
        };
        let survey = self
            .catalog
            .get(survey_id)
            .ok_or(FlowError::UnknownSurvey)?;
        Ok((survey, answered))
    }
}

fn recover<'a>(session: &mut SessionState, error: FlowError) -> Outcome<'a> {
    if error.is_user_visible() {
        session.flash(error.to_string());
    }
    Outcome::Redirect(Location::Picker)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
