use askama::Template;
use shared::domain::{Question, Response, Survey};
use survey_flow::{Page, RenderError, Renderer, View};

#[derive(Template)]
#[template(path = "pick_survey.html")]
struct PickSurveyPage<'a> {
    flashes: &'a [String],
    surveys: &'a [Survey],
}

#[derive(Template)]
#[template(path = "survey_start.html")]
struct SurveyStartPage<'a> {
    flashes: &'a [String],
    survey: &'a Survey,
}

#[derive(Template)]
#[template(path = "already_done.html")]
struct AlreadyDonePage<'a> {
    flashes: &'a [String],
    survey: &'a Survey,
}

#[derive(Template)]
#[template(path = "question.html")]
struct QuestionPage<'a> {
    flashes: &'a [String],
    survey: &'a Survey,
    question_num: usize,
    total: usize,
    question: &'a Question,
}

#[derive(Template)]
#[template(path = "completion.html")]
struct CompletionPage<'a> {
    flashes: &'a [String],
    survey: &'a Survey,
    answers: Vec<AnsweredQuestion<'a>>,
}

struct AnsweredQuestion<'a> {
    prompt: &'a str,
    choice: &'a str,
    text: &'a str,
}

fn answered_questions<'a>(survey: &'a Survey, responses: &'a [Response]) -> Vec<AnsweredQuestion<'a>> {
    survey
        .questions
        .iter()
        .zip(responses)
        .map(|(question, response)| AnsweredQuestion {
            prompt: &question.prompt,
            choice: question
                .choice(&response.choice)
                .map_or(response.choice.as_str(), |choice| choice.label.as_str()),
            text: &response.text,
        })
        .collect()
}

/// askama-backed HTML for every flow view.
pub(crate) struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page<'_>) -> Result<String, RenderError> {
        let flashes = page.flashes.as_slice();
        let rendered = match &page.view {
            View::PickSurvey { surveys } => PickSurveyPage {
                flashes,
                surveys: *surveys,
            }
            .render(),
            View::SurveyStart { survey } => SurveyStartPage {
                flashes,
                survey: *survey,
            }
            .render(),
            View::AlreadyCompleted { survey } => AlreadyDonePage {
                flashes,
                survey: *survey,
            }
            .render(),
            View::Question {
                survey,
                index,
                question,
            } => QuestionPage {
                flashes,
                survey: *survey,
                question_num: *index,
                total: survey.question_count(),
                question: *question,
            }
            .render(),
            View::Completion { survey, responses } => CompletionPage {
                flashes,
                survey: *survey,
                answers: answered_questions(survey, responses),
            }
            .render(),
        };
        rendered.map_err(|error| RenderError::new(page.view.name(), error.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
