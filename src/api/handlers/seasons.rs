//! Season handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, not_found, HandlerError};
use crate::infrastructure::database::entities::season;
use crate::shared::datetime::{date_format, date_format_opt};

#[derive(Clone)]
pub struct SeasonsHandlerState {
    pub db: DatabaseConnection,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonDto {
    pub id: String,
    pub name: String,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-06-30")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSeasonDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-06-30")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, Default, ToSchema)]
pub struct UpdateSeasonDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default, with = "date_format_opt")]
    #[schema(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "date_format_opt")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
}

fn to_response(model: &season::Model) -> SeasonDto {
    SeasonDto {
        id: model.id.clone(),
        name: model.name.clone(),
        start_date: model.start_date,
        end_date: model.end_date,
    }
}

/// List seasons
#[utoipa::path(
    get,
    path = "/api/v1/seasons",
    tag = "Seasons",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All seasons", body = ApiResponse<Vec<SeasonDto>>)
    )
)]
pub async fn list_seasons(
    State(state): State<SeasonsHandlerState>,
) -> Result<Json<ApiResponse<Vec<SeasonDto>>>, HandlerError> {
    let rows = season::Entity::find()
        .order_by_desc(season::Column::StartDate)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let items = rows.iter().map(to_response).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// Get a season by id
#[utoipa::path(
    get,
    path = "/api/v1/seasons/{id}",
    tag = "Seasons",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Season id")),
    responses(
        (status = 200, description = "Season", body = ApiResponse<SeasonDto>),
        (status = 404, description = "Season not found")
    )
)]
pub async fn get_season(
    State(state): State<SeasonsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SeasonDto>>, HandlerError> {
    let model = season::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Season", &id))?;

    Ok(Json(ApiResponse::success(to_response(&model))))
}

/// Create a season
#[utoipa::path(
    post,
    path = "/api/v1/seasons",
    tag = "Seasons",
    security(("bearer_auth" = [])),
    request_body = CreateSeasonDto,
    responses(
        (status = 201, description = "Season created", body = ApiResponse<SeasonDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_season(
    State(state): State<SeasonsHandlerState>,
    ValidatedJson(payload): ValidatedJson<CreateSeasonDto>,
) -> Result<(StatusCode, Json<ApiResponse<SeasonDto>>), HandlerError> {
    let model = season::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(payload.name),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
    };

    let inserted = model.insert(&state.db).await.map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(to_response(&inserted))),
    ))
}

/// Update a season
///
/// Absent fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/v1/seasons/{id}",
    tag = "Seasons",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Season id")),
    request_body = UpdateSeasonDto,
    responses(
        (status = 200, description = "Season updated", body = ApiResponse<SeasonDto>),
        (status = 404, description = "Season not found")
    )
)]
pub async fn update_season(
    State(state): State<SeasonsHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateSeasonDto>,
) -> Result<Json<ApiResponse<SeasonDto>>, HandlerError> {
    let existing = season::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Season", &id))?;

    let mut active: season::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }

    let updated = active.update(&state.db).await.map_err(db_error)?;
    Ok(Json(ApiResponse::success(to_response(&updated))))
}

/// Delete a season
#[utoipa::path(
    delete,
    path = "/api/v1/seasons/{id}",
    tag = "Seasons",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Season id")),
    responses(
        (status = 200, description = "Season deleted"),
        (status = 404, description = "Season not found")
    )
)]
pub async fn delete_season(
    State(state): State<SeasonsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    let result = season::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found("Season", &id));
    }

    Ok(Json(ApiResponse::success(())))
}
