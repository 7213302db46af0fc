//! Google authorization handlers
//!
//! Each user holds at most one token set; PUT is an upsert. Responses
//! never expose the stored tokens, only their metadata.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, domain_error, not_found, HandlerError};
use crate::application::mappers::UserResolver;
use crate::infrastructure::database::entities::google_authorization;

#[derive(Clone)]
pub struct GoogleAuthHandlerState {
    pub db: DatabaseConnection,
    pub resolver: Arc<dyn UserResolver>,
}

/// Token metadata; the tokens themselves stay server-side.
#[derive(Debug, Serialize, ToSchema)]
pub struct GoogleAuthorizationDto {
    pub id: String,
    pub user_id: String,
    pub token_type: String,
    pub scope: Option<String>,
    pub has_refresh_token: bool,
    pub expires_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertGoogleAuthorizationDto {
    #[validate(length(min = 1))]
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Default: `Bearer`
    pub token_type: Option<String>,
    pub scope: Option<String>,
    #[schema(value_type = String, example = "2024-12-31T23:59:59Z")]
    pub expires_at: DateTime<Utc>,
}

fn to_response(model: &google_authorization::Model) -> GoogleAuthorizationDto {
    GoogleAuthorizationDto {
        id: model.id.clone(),
        user_id: model.user_id.clone(),
        token_type: model.token_type.clone(),
        scope: model.scope.clone(),
        has_refresh_token: model.refresh_token.is_some(),
        expires_at: model.expires_at.to_rfc3339(),
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

async fn find_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<google_authorization::Model>, HandlerError> {
    google_authorization::Entity::find()
        .filter(google_authorization::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(db_error)
}

/// Get a user's Google authorization
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/google-authorization",
    tag = "GoogleAuth",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Authorization metadata", body = ApiResponse<GoogleAuthorizationDto>),
        (status = 404, description = "User or authorization not found")
    )
)]
pub async fn get_google_authorization(
    State(state): State<GoogleAuthHandlerState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<GoogleAuthorizationDto>>, HandlerError> {
    state
        .resolver
        .resolve_user_by_id(&user_id)
        .await
        .map_err(domain_error)?;

    let model = find_for_user(&state.db, &user_id)
        .await?
        .ok_or_else(|| not_found("GoogleAuthorization", &user_id))?;

    Ok(Json(ApiResponse::success(to_response(&model))))
}

/// Store or replace a user's Google authorization
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/google-authorization",
    tag = "GoogleAuth",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User id")),
    request_body = UpsertGoogleAuthorizationDto,
    responses(
        (status = 200, description = "Authorization stored", body = ApiResponse<GoogleAuthorizationDto>),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn upsert_google_authorization(
    State(state): State<GoogleAuthHandlerState>,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpsertGoogleAuthorizationDto>,
) -> Result<Json<ApiResponse<GoogleAuthorizationDto>>, HandlerError> {
    state
        .resolver
        .resolve_user_by_id(&user_id)
        .await
        .map_err(domain_error)?;

    let now = Utc::now();
    let token_type = payload.token_type.unwrap_or_else(|| "Bearer".to_string());

    let saved = match find_for_user(&state.db, &user_id).await? {
        Some(existing) => {
            let mut active: google_authorization::ActiveModel = existing.into();
            active.access_token = Set(payload.access_token);
            active.refresh_token = Set(payload.refresh_token);
            active.token_type = Set(token_type);
            active.scope = Set(payload.scope);
            active.expires_at = Set(payload.expires_at);
            active.updated_at = Set(now);
            active.update(&state.db).await.map_err(db_error)?
        }
        None => {
            let model = google_authorization::ActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                user_id: Set(user_id.clone()),
                access_token: Set(payload.access_token),
                refresh_token: Set(payload.refresh_token),
                token_type: Set(token_type),
                scope: Set(payload.scope),
                expires_at: Set(payload.expires_at),
                created_at: Set(now),
                updated_at: Set(now),
            };
            model.insert(&state.db).await.map_err(db_error)?
        }
    };

    Ok(Json(ApiResponse::success(to_response(&saved))))
}

/// Revoke a user's Google authorization
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/google-authorization",
    tag = "GoogleAuth",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Authorization revoked"),
        (status = 404, description = "User or authorization not found")
    )
)]
pub async fn delete_google_authorization(
    State(state): State<GoogleAuthHandlerState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    state
        .resolver
        .resolve_user_by_id(&user_id)
        .await
        .map_err(domain_error)?;

    let result = google_authorization::Entity::delete_many()
        .filter(google_authorization::Column::UserId.eq(user_id.as_str()))
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found("GoogleAuthorization", &user_id));
    }

    Ok(Json(ApiResponse::success(())))
}
