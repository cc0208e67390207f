use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use keyward_application::AccessContext;
use keyward_domain::{Permission, Scope};

use crate::dto::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    context.require(Scope::User, &[Permission::Read])?;

    let users = state
        .access_repository
        .list_accounts()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    context.require(Scope::User, &[Permission::Read])?;

    let account = state.access_repository.get_account(&username).await?;
    Ok(Json(UserResponse::from(account)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    context.require(Scope::User, &[Permission::Create])?;

    let account = state
        .access_repository
        .create_account(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    context.require(Scope::User, &[Permission::Update])?;

    let account = state
        .access_repository
        .update_account(payload.into_input(username))
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    context.require(Scope::User, &[Permission::Delete])?;

    state.access_repository.delete_account(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(username): Path<String>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    context.require_self(&username)?;

    state
        .access_repository
        .change_password(&username, &payload.old_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
