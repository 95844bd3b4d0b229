pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::interview::handlers as interviews;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Upper bound on request bodies; résumé uploads are the largest.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Résumés
        .route("/api/resumes", get(resumes::handle_list))
        .route("/api/resumes/test", get(resumes::handle_test))
        .route("/api/resumes/upload", post(resumes::handle_upload))
        .route("/api/resumes/:id", delete(resumes::handle_delete))
        .route("/api/resumes/download/:id", get(resumes::handle_download))
        .route("/api/resumes/rename/:id", patch(resumes::handle_rename))
        // Interview sessions
        .route(
            "/api/interviews",
            post(interviews::handle_create).get(interviews::handle_list),
        )
        .route(
            "/api/interviews/:id",
            get(interviews::handle_get).delete(interviews::handle_delete),
        )
        .route(
            "/api/interviews/:id/feedback",
            patch(interviews::handle_save_feedback),
        )
        // Mock interview flow
        .route(
            "/api/mockinterview",
            get(interviews::handle_list_with_resumes),
        )
        .route("/api/mockinterview/:id/start", post(interviews::handle_start))
        .route(
            "/api/mockinterview/:id/message",
            post(interviews::handle_message),
        )
        .route(
            "/api/mockinterview/:id/finish",
            post(interviews::handle_finish),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Credentialed CORS for local frontends (`http://localhost:<any port>`).
/// With `allow_localhost` off no cross-origin request is allowed.
pub fn cors_layer(allow_localhost: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    if allow_localhost {
        layer.allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            is_localhost_origin(origin)
        }))
    } else {
        layer
    }
}

fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    match origin.strip_prefix("http://localhost") {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}
