use std::{convert::Infallible, sync::Arc};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::domain::{SessionId, SessionState};
use survey_flow::{CookieJar, Outcome, Page, SetCookie};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::app_state::AppState;

pub(crate) const SESSION_COOKIE: &str = "survey_session";

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sid: Uuid,
    iat: i64,
    exp: i64,
}

/// Signs and verifies the session cookie. The token only carries the opaque
/// session id; progress lives in the server-side store.
#[derive(Clone)]
pub(crate) struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl SessionKeys {
    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    pub(crate) fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds)
    }

    pub(crate) fn issue(&self, session_id: SessionId) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sid: session_id.0,
            iat: now.timestamp(),
            exp: (now + self.ttl()).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub(crate) fn verify(&self, token: &str) -> Option<SessionId> {
        match decode::<SessionClaims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(SessionId(data.claims.sid)),
            Err(error) => {
                warn!(%error, "rejected session cookie");
                None
            }
        }
    }
}

/// Per-request view of the caller's session and cookies.
pub(crate) struct FlowRequest {
    session_id: Option<SessionId>,
    loaded: SessionState,
    pub(crate) session: SessionState,
    pub(crate) jar: CookieJar,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for FlowRequest {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(
            parts
                .headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );

        let mut session_id = None;
        let mut session = SessionState::default();
        if let Some(id) = jar
            .get(SESSION_COOKIE)
            .and_then(|token| state.session_keys.verify(token))
        {
            match state.sessions.load(id).await {
                Some(stored) => {
                    session_id = Some(id);
                    session = stored;
                }
                None => debug!(session_id = %id.0, "session cookie points at an unknown session"),
            }
        }

        Ok(Self {
            session_id,
            loaded: session.clone(),
            session,
            jar,
        })
    }
}

impl FlowRequest {
    /// Renders or redirects per `outcome`, persists the session if it changed
    /// and attaches every pending cookie.
    pub(crate) async fn respond(mut self, state: &AppState, outcome: Outcome<'_>) -> Response {
        let response = match outcome {
            Outcome::Redirect(location) => Redirect::to(&location.path()).into_response(),
            Outcome::Render(view) => {
                let page = Page {
                    view,
                    flashes: self.session.take_flashes(),
                };
                match state.renderer.render(&page) {
                    Ok(body) => Html(body).into_response(),
                    Err(render_error) => {
                        error!(error = %render_error, "failed to render page");
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
                            .into_response()
                    }
                }
            }
        };

        self.persist(state).await;
        attach_cookies(response, self.jar)
    }

    async fn persist(&mut self, state: &AppState) {
        if self.session == self.loaded {
            return;
        }
        if self.session_id.is_none() && self.session.is_empty() {
            return;
        }

        let session_id = *self.session_id.get_or_insert_with(SessionId::new);
        state.sessions.save(session_id, self.session.clone()).await;
        match state.session_keys.issue(session_id) {
            Ok(token) => self.jar.set(
                SetCookie::new(SESSION_COOKIE, token)
                    .max_age(state.session_keys.ttl())
                    .http_only(),
            ),
            Err(error) => error!(%error, "failed to sign session cookie"),
        }
    }
}

fn attach_cookies(mut response: Response, jar: CookieJar) -> Response {
    for cookie in jar.into_outgoing() {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(error) => warn!(cookie = %cookie.name, %error, "dropping unencodable cookie"),
        }
    }
    response
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
