use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};

use crate::api::v1::dto::principal_response::{PrincipalResponse, UserSeqResponse};
use crate::api::v1::extractors::AuthPrincipal;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /me` (behind the access middleware)
pub async fn me(AuthPrincipal(principal): AuthPrincipal) -> Json<PrincipalResponse> {
    Json(principal.into())
}

/// `GET /me/seq`
///
/// Reads the `Authorization` header itself instead of relying on the middleware.
pub async fn me_seq(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserSeqResponse>, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user_seq = state
        .tokens
        .verifier()
        .extract_user_seq(authorization)
        .map_err(|err| {
            tracing::warn!(error = %err, "user seq extraction failed");
            AppError::from(err)
        })?;

    Ok(Json(UserSeqResponse { user_seq }))
}
