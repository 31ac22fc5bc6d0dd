use std::collections::HashSet;

use serde::Deserialize;

use crate::{domain::Survey, error::CatalogError};

const BUNDLED_CATALOG: &str = include_str!("../surveys.toml");

/// Read-only set of surveys, kept in the order they were declared.
#[derive(Debug, Clone)]
pub struct Catalog {
    surveys: Vec<Survey>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    surveys: Vec<Survey>,
}

impl Catalog {
    pub fn new(surveys: Vec<Survey>) -> Result<Self, CatalogError> {
        validate(&surveys)?;
        Ok(Self { surveys })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.surveys)
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    pub fn get(&self, survey_id: &str) -> Option<&Survey> {
        self.surveys.iter().find(|survey| survey.id == survey_id)
    }

    pub fn contains(&self, survey_id: &str) -> bool {
        self.get(survey_id).is_some()
    }

    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }
}

fn validate(surveys: &[Survey]) -> Result<(), CatalogError> {
    if surveys.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen_ids = HashSet::new();
    for survey in surveys {
        if !is_cookie_safe_id(&survey.id) {
            return Err(CatalogError::InvalidId(survey.id.clone()));
        }
        if !seen_ids.insert(survey.id.as_str()) {
            return Err(CatalogError::DuplicateId(survey.id.clone()));
        }
        if survey.questions.is_empty() {
            return Err(CatalogError::NoQuestions(survey.id.clone()));
        }

        for (index, question) in survey.questions.iter().enumerate() {
            if question.choices.is_empty() {
                return Err(CatalogError::NoChoices {
                    survey: survey.id.clone(),
                    index,
                });
            }
            let mut values = HashSet::new();
            for choice in &question.choices {
                if !values.insert(choice.value.as_str()) {
                    return Err(CatalogError::DuplicateChoice {
                        survey: survey.id.clone(),
                        index,
                        value: choice.value.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

// Survey ids end up inside `completed_<id>` cookie names.
fn is_cookie_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
