//! Absence request handlers
//!
//! Creation is two-phase: the mapper produces the row with relation
//! columns unset, then the handler resolves and attaches the season.
//! The assignee is managed only through its dedicated endpoint.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, domain_error, not_found, HandlerError};
use crate::application::audit::{auditor_name, AuthContext};
use crate::application::mappers::absence_request as mapper;
use crate::application::mappers::absence_request::{
    AbsenceRequestDto, CreateAbsenceRequestDto, UpdateAbsenceRequestDto,
};
use crate::application::mappers::UserResolver;
use crate::infrastructure::database::entities::absence_request::{self, RequestStatus};
use crate::infrastructure::database::entities::season;

#[derive(Clone)]
pub struct AbsenceRequestsHandlerState {
    pub db: DatabaseConnection,
    pub resolver: Arc<dyn UserResolver>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAbsenceRequestsQuery {
    /// Filter by status: `Pending`, `Approved` or `Rejected`
    pub status: Option<String>,
    /// Filter by requester
    pub requester_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRequestDto {
    /// Reviewer user id; `null` removes the current assignee
    pub assignee_id: Option<String>,
}

fn parse_status(raw: &str) -> Result<RequestStatus, HandlerError> {
    match raw {
        "Pending" => Ok(RequestStatus::Pending),
        "Approved" => Ok(RequestStatus::Approved),
        "Rejected" => Ok(RequestStatus::Rejected),
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Unknown status: {}", other))),
        )),
    }
}

async fn load_with_requester(
    state: &AbsenceRequestsHandlerState,
    model: absence_request::Model,
) -> Result<AbsenceRequestDto, HandlerError> {
    let requester = state
        .resolver
        .resolve_user_by_id(&model.requester_id)
        .await
        .map_err(domain_error)?;
    Ok(mapper::to_response(&model, &requester))
}

/// List absence requests
#[utoipa::path(
    get,
    path = "/api/v1/absence-requests",
    tag = "AbsenceRequests",
    security(("bearer_auth" = [])),
    params(ListAbsenceRequestsQuery),
    responses(
        (status = 200, description = "Absence requests", body = ApiResponse<Vec<AbsenceRequestDto>>)
    )
)]
pub async fn list_absence_requests(
    State(state): State<AbsenceRequestsHandlerState>,
    Query(query): Query<ListAbsenceRequestsQuery>,
) -> Result<Json<ApiResponse<Vec<AbsenceRequestDto>>>, HandlerError> {
    let mut find = absence_request::Entity::find();

    if let Some(ref status) = query.status {
        find = find.filter(absence_request::Column::Status.eq(parse_status(status)?));
    }
    if let Some(ref requester_id) = query.requester_id {
        find = find.filter(absence_request::Column::RequesterId.eq(requester_id.as_str()));
    }

    let rows = find
        .order_by_desc(absence_request::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let mut items = Vec::with_capacity(rows.len());
    for model in rows {
        items.push(load_with_requester(&state, model).await?);
    }

    Ok(Json(ApiResponse::success(items)))
}

/// Get an absence request by id
#[utoipa::path(
    get,
    path = "/api/v1/absence-requests/{id}",
    tag = "AbsenceRequests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Absence request id")),
    responses(
        (status = 200, description = "Absence request", body = ApiResponse<AbsenceRequestDto>),
        (status = 404, description = "Absence request not found")
    )
)]
pub async fn get_absence_request(
    State(state): State<AbsenceRequestsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AbsenceRequestDto>>, HandlerError> {
    let model = absence_request::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("AbsenceRequest", &id))?;

    let dto = load_with_requester(&state, model).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// Create an absence request
///
/// The requester must exist; the season, when given, must exist and is
/// attached after mapping.
#[utoipa::path(
    post,
    path = "/api/v1/absence-requests",
    tag = "AbsenceRequests",
    security(("bearer_auth" = [])),
    request_body = CreateAbsenceRequestDto,
    responses(
        (status = 201, description = "Absence request created", body = ApiResponse<AbsenceRequestDto>),
        (status = 404, description = "Requester or season not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_absence_request(
    State(state): State<AbsenceRequestsHandlerState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<CreateAbsenceRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AbsenceRequestDto>>), HandlerError> {
    let requester = state
        .resolver
        .resolve_user_by_id(&payload.requester_id)
        .await
        .map_err(domain_error)?;

    if let Some(ref season_id) = payload.season_id {
        season::Entity::find_by_id(season_id)
            .one(&state.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| not_found("Season", season_id))?;
    }

    let now = Utc::now();
    let auditor = auditor_name(&ctx).to_string();

    let mut model = mapper::to_model(&payload);
    model.id = Set(uuid::Uuid::new_v4().to_string());
    model.season_id = Set(payload.season_id.clone());
    model.created_at = Set(now);
    model.updated_at = Set(now);
    model.created_by = Set(auditor.clone());
    model.modified_by = Set(auditor);

    let inserted = model.insert(&state.db).await.map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(mapper::to_response(
            &inserted, &requester,
        ))),
    ))
}

/// Update an absence request
///
/// Absent fields are left unchanged; the assignee cannot be changed here.
#[utoipa::path(
    put,
    path = "/api/v1/absence-requests/{id}",
    tag = "AbsenceRequests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Absence request id")),
    request_body = UpdateAbsenceRequestDto,
    responses(
        (status = 200, description = "Absence request updated", body = ApiResponse<AbsenceRequestDto>),
        (status = 404, description = "Absence request not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_absence_request(
    State(state): State<AbsenceRequestsHandlerState>,
    Path(id): Path<String>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<UpdateAbsenceRequestDto>,
) -> Result<Json<ApiResponse<AbsenceRequestDto>>, HandlerError> {
    let existing = absence_request::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("AbsenceRequest", &id))?;

    let mut active: absence_request::ActiveModel = existing.into();
    mapper::apply_update(&payload, &mut active);
    active.updated_at = Set(Utc::now());
    active.modified_by = Set(auditor_name(&ctx).to_string());

    let updated = active.update(&state.db).await.map_err(db_error)?;
    let dto = load_with_requester(&state, updated).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// Assign or clear the reviewer
#[utoipa::path(
    put,
    path = "/api/v1/absence-requests/{id}/assignee",
    tag = "AbsenceRequests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Absence request id")),
    request_body = AssignRequestDto,
    responses(
        (status = 200, description = "Assignee updated", body = ApiResponse<AbsenceRequestDto>),
        (status = 404, description = "Absence request or assignee not found")
    )
)]
pub async fn assign_absence_request(
    State(state): State<AbsenceRequestsHandlerState>,
    Path(id): Path<String>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<AssignRequestDto>,
) -> Result<Json<ApiResponse<AbsenceRequestDto>>, HandlerError> {
    let existing = absence_request::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("AbsenceRequest", &id))?;

    if let Some(ref assignee_id) = payload.assignee_id {
        state
            .resolver
            .resolve_user_by_id(assignee_id)
            .await
            .map_err(domain_error)?;
    }

    let mut active: absence_request::ActiveModel = existing.into();
    active.assignee_id = Set(payload.assignee_id.clone());
    active.updated_at = Set(Utc::now());
    active.modified_by = Set(auditor_name(&ctx).to_string());

    let updated = active.update(&state.db).await.map_err(db_error)?;
    let dto = load_with_requester(&state, updated).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// Delete an absence request
#[utoipa::path(
    delete,
    path = "/api/v1/absence-requests/{id}",
    tag = "AbsenceRequests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Absence request id")),
    responses(
        (status = 200, description = "Absence request deleted"),
        (status = 404, description = "Absence request not found")
    )
)]
pub async fn delete_absence_request(
    State(state): State<AbsenceRequestsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    let result = absence_request::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found("AbsenceRequest", &id));
    }

    Ok(Json(ApiResponse::success(())))
}
