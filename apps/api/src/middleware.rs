use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;
use crate::state::AppState;

/// Runs the token gate and attaches the resulting `AccessContext`.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let operation = operation_name(request.uri().path());
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let context = state
        .token_claims_gate
        .authenticate(operation, authorization)
        .await?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Maps a request path to the operation name the gate matches bypass
/// rules against.
fn operation_name(path: &str) -> &str {
    match path {
        "/api/auth/login" => "login",
        "/api/auth/check" => "check",
        "/api/auth/logout" => "logout",
        other => other,
    }
}
