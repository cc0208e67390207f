use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};

use keyward_application::extract_bearer_token;

use crate::dto::{CheckTokenRequest, CheckTokenResponse, LoginRequest, LoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse::from(outcome)))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = extract_bearer_token(authorization)?;

    state.auth_service.logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_handler(
    State(state): State<AppState>,
    Json(payload): Json<CheckTokenRequest>,
) -> Json<CheckTokenResponse> {
    Json(CheckTokenResponse::from(
        state.auth_service.check(&payload.token).await,
    ))
}
