//! User management handlers (admin)

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::api::dto::{error_response, ApiError, ApiResponse, ChangeRoleRequest, UserDto};
use crate::api::extract::ValidatedJson;
use crate::application::IdentityService;
use crate::domain::{DomainError, UserRole};

#[derive(Clone)]
pub struct UserHandlerState {
    pub identity: Arc<IdentityService>,
}

/// All staff accounts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list", body = ApiResponse<Vec<UserDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError<Vec<UserDto>>> {
    let users = state.identity.list_users().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserDto>),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "No user with that email")
    )
)]
pub async fn change_role(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let role = UserRole::parse(&request.role).ok_or_else(|| {
        error_response(DomainError::Validation(format!(
            "Unknown role '{}'",
            request.role
        )))
    })?;
    let user = state
        .identity
        .change_role(&request.email, role)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(user.into())))
}
