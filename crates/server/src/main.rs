use std::{net::SocketAddr, sync::Arc, time::Duration as StdDuration};

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Form, Router,
};
use chrono::Duration;
use serde::Deserialize;
use session_store::SessionStore;
use survey_flow::SurveyFlow;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod session;
mod views;

use app_state::AppState;
use config::{load_catalog, load_settings, Settings};
use session::{FlowRequest, SessionKeys};
use views::HtmlRenderer;

const MAX_FORM_BYTES: usize = 16 * 1024;

#[derive(Debug, Deserialize)]
struct PickSurveyForm {
    survey_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnswerForm {
    answer: Option<String>,
    text: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    if settings.secret_key == Settings::default().secret_key {
        warn!("using the built-in development secret key; set SURVEY_SECRET_KEY in production");
    }
    let catalog = load_catalog(settings.catalog_path.as_deref())?;
    info!(surveys = catalog.len(), "survey catalog loaded");

    let state = Arc::new(AppState {
        flow: SurveyFlow::new(catalog, Duration::seconds(settings.completion_ttl_seconds)),
        sessions: SessionStore::new(Duration::seconds(settings.session_ttl_seconds)),
        session_keys: SessionKeys::new(&settings.secret_key, settings.session_ttl_seconds),
        renderer: Arc::new(HtmlRenderer),
    });
    spawn_session_purge(
        state.sessions.clone(),
        StdDuration::from_secs(settings.purge_interval_seconds.max(1)),
    );

    let app = build_router(state);
    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_session_purge(sessions: SessionStore, every: StdDuration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                debug!(purged, "purged idle sessions");
            }
        }
    });
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(show_pick_survey_form).post(pick_survey))
        .route("/begin", post(begin_survey))
        .route("/answer", post(handle_answer))
        .route("/questions/:index", get(show_question))
        .route("/complete", get(say_thanks))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn show_pick_survey_form(State(state): State<Arc<AppState>>, flow: FlowRequest) -> Response {
    let outcome = state.flow.list_surveys();
    flow.respond(&state, outcome).await
}

async fn pick_survey(
    State(state): State<Arc<AppState>>,
    mut flow: FlowRequest,
    Form(form): Form<PickSurveyForm>,
) -> Response {
    let outcome = state
        .flow
        .pick_survey(&mut flow.session, &flow.jar, form.survey_code.as_deref());
    flow.respond(&state, outcome).await
}

async fn begin_survey(State(state): State<Arc<AppState>>, mut flow: FlowRequest) -> Response {
    let outcome = state.flow.begin(&mut flow.session);
    flow.respond(&state, outcome).await
}

async fn handle_answer(
    State(state): State<Arc<AppState>>,
    mut flow: FlowRequest,
    Form(form): Form<AnswerForm>,
) -> Response {
    let outcome = state.flow.answer(
        &mut flow.session,
        form.answer.as_deref(),
        form.text.as_deref(),
    );
    flow.respond(&state, outcome).await
}

async fn show_question(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    mut flow: FlowRequest,
) -> Response {
    let outcome = state.flow.show_question(&mut flow.session, index);
    flow.respond(&state, outcome).await
}

async fn say_thanks(State(state): State<Arc<AppState>>, mut flow: FlowRequest) -> Response {
    let outcome = state.flow.complete(&mut flow.session, &mut flow.jar);
    flow.respond(&state, outcome).await
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
