//! REST endpoints for onboarding status.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::auth::{Destination, onboarding_completed};
use crate::store::ProfileStore;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub store: Arc<dyn ProfileStore>,
    pub collection: String,
}

/// Body of `GET /api/onboarding/status/{subject}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub subject: String,
    pub onboarding_completed: bool,
    /// Path the subject should land on.
    pub destination: &'static str,
    pub profile: Option<serde_json::Value>,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "quintaesencia-onboarding"
    }))
}

/// GET /api/onboarding/status/{subject}
///
/// Whether the subject finished onboarding, where they should land, and the
/// stored profile document (null when none exists).
async fn get_status(
    State(state): State<OnboardingRouteState>,
    Path(subject): Path<String>,
) -> impl IntoResponse {
    match state.store.read(&state.collection, &subject).await {
        Ok(snapshot) => {
            let completed = onboarding_completed(snapshot.data.as_ref());
            let destination = if completed {
                Destination::Dashboard
            } else {
                Destination::Onboarding
            };
            Json(OnboardingStatus {
                subject,
                onboarding_completed: completed,
                destination: destination.path(),
                profile: snapshot.data,
            })
            .into_response()
        }
        Err(e) => {
            warn!(subject = %subject, error = %e, "Failed to read onboarding status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/status/{subject}", get(get_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
