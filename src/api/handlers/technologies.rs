//! Technology handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, not_found, HandlerError};
use crate::application::mappers::technology as mapper;
use crate::application::mappers::technology::{
    CreateTechnologyDto, TechnologyDto, UpdateTechnologyDto,
};
use crate::infrastructure::database::entities::technology;

#[derive(Clone)]
pub struct TechnologiesHandlerState {
    pub db: DatabaseConnection,
}

fn name_taken(name: &str) -> HandlerError {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::error(format!(
            "Technology '{}' already exists",
            name
        ))),
    )
}

async fn exists_by_name(
    db: &DatabaseConnection,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<bool, HandlerError> {
    let mut query = technology::Entity::find().filter(technology::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(technology::Column::Id.ne(id));
    }
    Ok(query.one(db).await.map_err(db_error)?.is_some())
}

/// List technologies
#[utoipa::path(
    get,
    path = "/api/v1/technologies",
    tag = "Technologies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All technologies", body = ApiResponse<Vec<TechnologyDto>>)
    )
)]
pub async fn list_technologies(
    State(state): State<TechnologiesHandlerState>,
) -> Result<Json<ApiResponse<Vec<TechnologyDto>>>, HandlerError> {
    let rows = technology::Entity::find()
        .order_by_asc(technology::Column::Name)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let items = rows.iter().map(mapper::to_response).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// Get a technology by id
#[utoipa::path(
    get,
    path = "/api/v1/technologies/{id}",
    tag = "Technologies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Technology id")),
    responses(
        (status = 200, description = "Technology", body = ApiResponse<TechnologyDto>),
        (status = 404, description = "Technology not found")
    )
)]
pub async fn get_technology(
    State(state): State<TechnologiesHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TechnologyDto>>, HandlerError> {
    let model = technology::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Technology", &id))?;

    Ok(Json(ApiResponse::success(mapper::to_response(&model))))
}

/// Create a technology
///
/// Names are unique; a duplicate name is rejected with 409.
#[utoipa::path(
    post,
    path = "/api/v1/technologies",
    tag = "Technologies",
    security(("bearer_auth" = [])),
    request_body = CreateTechnologyDto,
    responses(
        (status = 201, description = "Technology created", body = ApiResponse<TechnologyDto>),
        (status = 409, description = "Name already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_technology(
    State(state): State<TechnologiesHandlerState>,
    ValidatedJson(payload): ValidatedJson<CreateTechnologyDto>,
) -> Result<(StatusCode, Json<ApiResponse<TechnologyDto>>), HandlerError> {
    if exists_by_name(&state.db, &payload.name, None).await? {
        return Err(name_taken(&payload.name));
    }

    let mut model = mapper::to_model(&payload);
    model.id = Set(uuid::Uuid::new_v4().to_string());

    let inserted = model.insert(&state.db).await.map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(mapper::to_response(&inserted))),
    ))
}

/// Update a technology
#[utoipa::path(
    put,
    path = "/api/v1/technologies/{id}",
    tag = "Technologies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Technology id")),
    request_body = UpdateTechnologyDto,
    responses(
        (status = 200, description = "Technology updated", body = ApiResponse<TechnologyDto>),
        (status = 404, description = "Technology not found"),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn update_technology(
    State(state): State<TechnologiesHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTechnologyDto>,
) -> Result<Json<ApiResponse<TechnologyDto>>, HandlerError> {
    let existing = technology::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Technology", &id))?;

    if let Some(ref name) = payload.name {
        if exists_by_name(&state.db, name, Some(&id)).await? {
            return Err(name_taken(name));
        }
    }

    let mut active: technology::ActiveModel = existing.into();
    mapper::apply_update(&payload, &mut active);

    let updated = active.update(&state.db).await.map_err(db_error)?;
    Ok(Json(ApiResponse::success(mapper::to_response(&updated))))
}

/// Delete a technology
#[utoipa::path(
    delete,
    path = "/api/v1/technologies/{id}",
    tag = "Technologies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Technology id")),
    responses(
        (status = 200, description = "Technology deleted"),
        (status = 404, description = "Technology not found")
    )
)]
pub async fn delete_technology(
    State(state): State<TechnologiesHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    let result = technology::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found("Technology", &id));
    }

    Ok(Json(ApiResponse::success(())))
}
