use std::sync::Arc;

use session_store::SessionStore;
use survey_flow::{Renderer, SurveyFlow};

use crate::session::SessionKeys;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) flow: SurveyFlow,
    pub(crate) sessions: SessionStore,
    pub(crate) session_keys: SessionKeys,
    pub(crate) renderer: Arc<dyn Renderer>,
}
