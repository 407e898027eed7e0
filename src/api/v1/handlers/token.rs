use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};

use crate::api::v1::dto::{refresh_request::RefreshRequest, token_response::TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// `POST /token/refresh`
///
/// Exchanges a refresh token for a new pair. The new access token is
/// returned in the body and in the `Authorization` response header.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<TokenResponse>), AppError> {
    let Json(req) =
        payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

    if req.refresh_token.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "refresh_token must not be empty".to_string(),
        ));
    }

    let pair = state.tokens.refresh(&req.refresh_token).await?;
    let authorization = pair.authorization_header_value();

    Ok((
        StatusCode::OK,
        [(header::AUTHORIZATION, authorization)],
        Json(pair.into()),
    ))
}
