//! Authentication handlers: login, registration, current user,
//! password change.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, domain_error, HandlerError};
use crate::application::audit::{auditor_name, AuthContext, SYSTEM_AUDITOR};
use crate::application::mappers::user as user_mapper;
use crate::application::mappers::user::UserDto;
use crate::auth::jwt::{create_token, JwtConfig};
use crate::auth::password::{hash_password, verify_password};
use crate::domain::{CreateUserDto, UserRepositoryInterface, UserRole};
use crate::infrastructure::database::entities::account;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub user_repo: Arc<dyn UserRepositoryInterface>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    pub position: Option<String>,
    /// One of `admin`, `mentor`, `intern`. Defaults to `intern`.
    #[schema(value_type = Option<String>, example = "intern")]
    pub role: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
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

fn invalid_credentials() -> HandlerError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Invalid email or password")),
    )
}

/// Login
///
/// Authenticates against the account email and returns a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, HandlerError> {
    let acct = account::Entity::find()
        .filter(account::Column::Email.eq(payload.email.as_str()))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(invalid_credentials)?;

    let valid = verify_password(&payload.password, &acct.password_hash)
        .map_err(|_| invalid_credentials())?;
    if !valid {
        return Err(invalid_credentials());
    }

    let user = state
        .user_repo
        .get_user_by_id(&acct.user_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Account is deactivated")),
        ));
    }

    let token = create_token(&user.id, &user.email, &user.role.to_string(), &state.jwt_config)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to create token: {}", e))),
            )
        })?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        user: user_mapper::to_response(&user),
    })))
}

/// Register a new user
///
/// Creates the user and its login account. The account email must be
/// unique across the service.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
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

    // Self-registration runs outside an authenticated context.
    let user = state
        .user_repo
        .create_user(dto, SYSTEM_AUDITOR)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user_mapper::to_response(&user))),
    ))
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AuthHandlerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<UserDto>>, HandlerError> {
    let user = state
        .user_repo
        .get_user_by_id(&ctx.user_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("User no longer exists")),
            )
        })?;

    Ok(Json(ApiResponse::success(user_mapper::to_response(&user))))
}

/// Change own password
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Auth",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Wrong current password"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    let acct = account::Entity::find()
        .filter(account::Column::UserId.eq(ctx.user_id.as_str()))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("User no longer exists")),
            )
        })?;

    let valid = verify_password(&payload.current_password, &acct.password_hash)
        .map_err(|_| invalid_credentials())?;
    if !valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Current password is incorrect")),
        ));
    }

    let new_hash = hash_password(&payload.new_password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to hash password: {}", e))),
        )
    })?;

    tracing::info!(auditor = auditor_name(&ctx), "password change");

    state
        .user_repo
        .update_user_password(&acct.user_id, &new_hash)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(())))
}
