//! JSON API routes and handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::SignupError;
use crate::managers::{Health, SharedRegistrationManager, Stats};
use crate::messages;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub registration_manager: SharedRegistrationManager,
}

/// Body of POST /api/alpha-signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
}

/// `{success, message}` reply used by the signup endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// Create API router
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/alpha-signup", post(alpha_signup))
        .route("/api/alpha-signup/:id/resend", post(resend_welcome))
        .route("/api/alpha-stats", get(alpha_stats))
        .route("/api/health", get(health))
        .with_state(state)
}

/// POST /api/alpha-signup - Register a tester and send their key
async fn alpha_signup(
    State(state): State<ApiState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected signup body: {}", rejection);
            return SignupError::Validation {
                message: rejection.body_text(),
            }
            .into_response();
        }
    };

    match state
        .registration_manager
        .register(request.name, request.email, request.experience)
        .await
    {
        Ok(confirmation) => {
            info!(
                "Signup complete for registration {}",
                confirmation.registration.id
            );
            (StatusCode::OK, Json(ApiMessage::ok(messages::SIGNUP_SUCCESS))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /api/alpha-signup/:id/resend - Retry the welcome email for a registration
async fn resend_welcome(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let id = match Uuid::parse_str(&id) {
        Ok(id) => id,
        Err(_) => return SignupError::NotFound { id }.into_response(),
    };

    match state.registration_manager.resend_notification(id).await {
        Ok(()) => (StatusCode::OK, Json(ApiMessage::ok(messages::RESEND_SUCCESS))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/alpha-stats - Signup counters
async fn alpha_stats(State(state): State<ApiState>) -> Json<Stats> {
    Json(state.registration_manager.stats())
}

/// GET /api/health - Liveness probe
async fn health(State(state): State<ApiState>) -> Json<Health> {
    Json(state.registration_manager.health())
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SignupError::Validation { .. } => (StatusCode::BAD_REQUEST, messages::MISSING_FIELDS),
            SignupError::DuplicateEmail { .. } => (StatusCode::CONFLICT, messages::ALREADY_REGISTERED),
            SignupError::PoolExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, messages::NO_KEYS_LEFT)
            }
            SignupError::NotFound { .. } => (StatusCode::NOT_FOUND, messages::NOT_FOUND),
            SignupError::Notification { .. }
            | SignupError::ConfigLoad { .. }
            | SignupError::ConfigParse { .. }
            | SignupError::ConfigValidation { .. }
            | SignupError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, messages::SIGNUP_FAILED)
            }
        };

        if status.is_server_error() {
            error!("Alpha signup error: {}", self);
        } else {
            info!("Alpha signup rejected ({}): {}", status, self);
        }

        (status, Json(ApiMessage::failed(message))).into_response()
    }
}
