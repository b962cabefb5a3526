//! Account registration endpoint
//!
//! Every outcome is answered with the registration envelope. By default the
//! transport status is always 200 and callers must inspect `success`.

use axum::{extract::State, http::StatusCode, routing::post, Router};

use crate::api::state::AppState;
use crate::api::types::Json;
use crate::domain::registration::{RegistrationEnvelope, RegistrationRequest};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> (StatusCode, Json<RegistrationEnvelope>) {
    let outcome = state.registration_service.register(request).await;
    let envelope = RegistrationEnvelope::from(outcome.map(|_| ()));

    let status = if state.always_ok_status {
        StatusCode::OK
    } else {
        StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::OK)
    };

    (status, Json(envelope))
}
