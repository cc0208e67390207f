use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use keyward_application::{AccessContext, RoleInput};
use keyward_domain::{Permission, Scope};

use crate::dto::{CloneRoleRequest, RoleRequest, RoleResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    context.require(Scope::User, &[Permission::Read])?;

    let roles = state
        .access_repository
        .list_roles()
        .await
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(name): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    context.require(Scope::User, &[Permission::Read])?;

    let role = state.access_repository.get_role(&name).await?;
    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    context.require(Scope::User, &[Permission::Create])?;

    let role = state.access_repository.create_role(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(name): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    context.require(Scope::User, &[Permission::Update])?;

    let role = state
        .access_repository
        .update_role(RoleInput {
            name,
            ..payload.into()
        })
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    context.require(Scope::User, &[Permission::Delete])?;

    state.access_repository.delete_role(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clone_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Path(name): Path<String>,
    Json(payload): Json<CloneRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    context.require(Scope::User, &[Permission::Read, Permission::Create])?;

    let role = state
        .access_repository
        .clone_role(&name, &payload.new_name)
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}
