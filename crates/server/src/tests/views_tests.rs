use super::*;
use shared::{catalog::Catalog, domain::Choice};

fn render(view: View<'_>, flashes: &[&str]) -> String {
    HtmlRenderer
        .render(&Page {
            view,
            flashes: flashes.iter().map(|f| f.to_string()).collect(),
        })
        .expect("render")
}

fn survey_with_text() -> Survey {
    Survey {
        id: "pets".into(),
        title: "Pets <&> Owners".into(),
        instructions: String::new(),
        questions: vec![Question {
            prompt: "Cats or dogs?".into(),
            choices: vec![
                Choice {
                    value: "cats".into(),
                    label: "Cats".into(),
                },
                Choice {
                    value: "dogs".into(),
                    label: "Dogs".into(),
                },
            ],
            allow_text: true,
        }],
    }
}

#[test]
fn picker_lists_every_survey_and_flashes() {
    let catalog = Catalog::bundled().expect("catalog");
    let html = render(
        View::PickSurvey {
            surveys: catalog.surveys(),
        },
        &["Invalid survey selected."],
    );
    assert!(html.contains(r#"value="satisfaction""#));
    assert!(html.contains(r#"value="personality""#));
    assert!(html.contains("Customer Satisfaction Survey"));
    assert!(html.contains(r#"<p class="flash">Invalid survey selected.</p>"#));
}

#[test]
fn survey_titles_are_html_escaped() {
    let survey = survey_with_text();
    let html = render(View::SurveyStart { survey: &survey }, &[]);
    assert!(html.contains("Pets &lt;&amp;&gt; Owners"));
    assert!(!html.contains("Pets <&> Owners"));
    assert!(!html.contains("class=\"instructions\""));
    assert!(!html.contains("class=\"flashes\""));
}

#[test]
fn question_page_offers_choices_and_optional_text() {
    let survey = survey_with_text();
    let html = render(
        View::Question {
            survey: &survey,
            index: 0,
            question: &survey.questions[0],
        },
        &[],
    );
    assert!(html.contains("Question 1 of 1"));
    assert!(html.contains("Cats or dogs?"));
    assert!(html.contains(r#"name="answer" value="dogs""#));
    assert!(html.contains(r#"<textarea name="text">"#));
}

#[test]
fn completion_page_shows_labels_and_free_text_in_order() {
    let catalog = Catalog::bundled().expect("catalog");
    let survey = catalog.get("satisfaction").expect("survey");
    let responses: Vec<Response> = ["yes", "no", "under-10k", "yes"]
        .iter()
        .enumerate()
        .map(|(i, choice)| Response {
            choice: choice.to_string(),
            text: if i == 1 { "solo trip".into() } else { String::new() },
        })
        .collect();
    let html = render(View::Completion { survey, responses }, &[]);

    assert_eq!(html.matches("<li>").count(), 4);
    assert!(html.contains("Less than $10,000"));
    assert!(html.contains(r#"<span class="text">solo trip</span>"#));
    let first = html.find("Have you shopped here before?").expect("first");
    let last = html.find("Are you likely to shop here again?").expect("last");
    assert!(first < last);
}

#[test]
fn unknown_choice_value_falls_back_to_raw_value() {
    let survey = survey_with_text();
    let responses = [Response {
        choice: "parrots".into(),
        text: String::new(),
    }];
    let answers = answered_questions(&survey, &responses);
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].choice, "parrots");
}
