//! User management handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::{ApiResponse, PaginatedResponse};
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{domain_error, not_found, HandlerError};
use crate::application::audit::{auditor_name, AuthContext};
use crate::application::mappers::user as user_mapper;
use crate::application::mappers::user::UserDto;
use crate::domain::{CreateUserDto, GetUserDto, UpdateUserDto, UserRepositoryInterface, UserRole};

#[derive(Clone)]
pub struct UsersHandlerState {
    pub user_repo: Arc<dyn UserRepositoryInterface>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Substring match on first or last name
    pub search: Option<String>,
    /// Filter by role: `admin`, `mentor` or `intern`
    pub role: Option<String>,
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Items per page (1-100)
    pub page_size: Option<u32>,
    /// Sort field: `first_name`, `last_name` or `role`
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    pub position: Option<String>,
    /// One of `admin`, `mentor`, `intern`. Defaults to `intern`.
    #[schema(value_type = Option<String>, example = "mentor")]
    pub role: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub position: Option<String>,
    #[schema(value_type = Option<String>)]
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn parse_role(raw: &str) -> Result<UserRole, HandlerError> {
    match raw {
        "admin" => Ok(UserRole::Admin),
        "mentor" => Ok(UserRole::Mentor),
        "intern" => Ok(UserRole::Intern),
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Unknown role: {}", other))),
        )),
    }
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Paginated users", body = ApiResponse<PaginatedResponse<UserDto>>)
    )
)]
pub async fn list_users(
    State(state): State<UsersHandlerState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<UserDto>>>, HandlerError> {
    let role = query.role.as_deref().map(parse_role).transpose()?;

    let dto = GetUserDto {
        search: query.search,
        role,
        page: query.page,
        page_size: query.page_size,
        sort_by: query.sort_by,
    };

    let result = state.user_repo.list_users(dto).await.map_err(domain_error)?;

    let items: Vec<UserDto> = result.items.iter().map(user_mapper::to_response).collect();
    let response = PaginatedResponse::new(
        items,
        result.total,
        result.page as u64,
        result.limit as u64,
    );

    Ok(Json(ApiResponse::success(response)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, HandlerError> {
    let user = state
        .user_repo
        .get_user_by_id(&id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| not_found("User", &id))?;

    Ok(Json(ApiResponse::success(user_mapper::to_response(&user))))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<UsersHandlerState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), HandlerError> {
    let role = payload.role.as_deref().map(parse_role).transpose()?;

    let dto = CreateUserDto {
        first_name: payload.first_name,
        last_name: payload.last_name,
        position: payload.position,
        role,
        email: payload.email,
        password: payload.password,
    };

    let user = state
        .user_repo
        .create_user(dto, auditor_name(&ctx))
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user_mapper::to_response(&user))),
    ))
}

/// Update a user
///
/// Absent fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    State(state): State<UsersHandlerState>,
    Path(id): Path<String>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, HandlerError> {
    let role = payload.role.as_deref().map(parse_role).transpose()?;

    let dto = UpdateUserDto {
        first_name: payload.first_name,
        last_name: payload.last_name,
        position: payload.position,
        role,
        is_active: payload.is_active,
    };

    let user = state
        .user_repo
        .update_user(&id, dto, auditor_name(&ctx))
        .await
        .map_err(domain_error)?
        .ok_or_else(|| not_found("User", &id))?;

    Ok(Json(ApiResponse::success(user_mapper::to_response(&user))))
}

/// Delete a user
///
/// Cascades to the login account, absence requests and other
/// dependent rows.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    state.user_repo.delete_user(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
