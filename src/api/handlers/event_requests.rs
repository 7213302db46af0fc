//! Event request handlers
//!
//! Same two-phase creation as absence requests: the mapper leaves the
//! season unset, the handler resolves and attaches it.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, domain_error, not_found, HandlerError};
use crate::application::audit::{auditor_name, AuthContext};
use crate::application::mappers::event_request as mapper;
use crate::application::mappers::event_request::{
    CreateEventRequestDto, EventRequestDto, UpdateEventRequestDto,
};
use crate::application::mappers::UserResolver;
use crate::infrastructure::database::entities::absence_request::RequestStatus;
use crate::infrastructure::database::entities::{event_request, season};

#[derive(Clone)]
pub struct EventRequestsHandlerState {
    pub db: DatabaseConnection,
    pub resolver: Arc<dyn UserResolver>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEventRequestsQuery {
    /// Filter by status: `Pending`, `Approved` or `Rejected`
    pub status: Option<String>,
    /// Filter by requester
    pub requester_id: Option<String>,
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

/// List event requests
#[utoipa::path(
    get,
    path = "/api/v1/event-requests",
    tag = "EventRequests",
    security(("bearer_auth" = [])),
    params(ListEventRequestsQuery),
    responses(
        (status = 200, description = "Event requests", body = ApiResponse<Vec<EventRequestDto>>)
    )
)]
pub async fn list_event_requests(
    State(state): State<EventRequestsHandlerState>,
    Query(query): Query<ListEventRequestsQuery>,
) -> Result<Json<ApiResponse<Vec<EventRequestDto>>>, HandlerError> {
    let mut find = event_request::Entity::find();

    if let Some(ref status) = query.status {
        find = find.filter(event_request::Column::Status.eq(parse_status(status)?));
    }
    if let Some(ref requester_id) = query.requester_id {
        find = find.filter(event_request::Column::RequesterId.eq(requester_id.as_str()));
    }

    let rows = find
        .order_by_desc(event_request::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let items = rows.iter().map(mapper::to_response).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// Get an event request by id
#[utoipa::path(
    get,
    path = "/api/v1/event-requests/{id}",
    tag = "EventRequests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event request id")),
    responses(
        (status = 200, description = "Event request", body = ApiResponse<EventRequestDto>),
        (status = 404, description = "Event request not found")
    )
)]
pub async fn get_event_request(
    State(state): State<EventRequestsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventRequestDto>>, HandlerError> {
    let model = event_request::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("EventRequest", &id))?;

    Ok(Json(ApiResponse::success(mapper::to_response(&model))))
}

/// Create an event request
#[utoipa::path(
    post,
    path = "/api/v1/event-requests",
    tag = "EventRequests",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequestDto,
    responses(
        (status = 201, description = "Event request created", body = ApiResponse<EventRequestDto>),
        (status = 404, description = "Requester or season not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_event_request(
    State(state): State<EventRequestsHandlerState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<CreateEventRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventRequestDto>>), HandlerError> {
    state
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
        Json(ApiResponse::success(mapper::to_response(&inserted))),
    ))
}

/// Update an event request
///
/// Absent fields are left unchanged; `end_time` is recomputed when the
/// start time or duration changes. Status transitions also go through
/// this endpoint.
#[utoipa::path(
    put,
    path = "/api/v1/event-requests/{id}",
    tag = "EventRequests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event request id")),
    request_body = UpdateEventRequestDto,
    responses(
        (status = 200, description = "Event request updated", body = ApiResponse<EventRequestDto>),
        (status = 404, description = "Event request not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_event_request(
    State(state): State<EventRequestsHandlerState>,
    Path(id): Path<String>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequestDto>,
) -> Result<Json<ApiResponse<EventRequestDto>>, HandlerError> {
    let existing = event_request::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("EventRequest", &id))?;

    let mut active: event_request::ActiveModel = existing.clone().into();
    mapper::apply_update(&payload, &existing, &mut active);
    active.updated_at = Set(Utc::now());
    active.modified_by = Set(auditor_name(&ctx).to_string());

    let updated = active.update(&state.db).await.map_err(db_error)?;
    Ok(Json(ApiResponse::success(mapper::to_response(&updated))))
}

/// Delete an event request
#[utoipa::path(
    delete,
    path = "/api/v1/event-requests/{id}",
    tag = "EventRequests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event request id")),
    responses(
        (status = 200, description = "Event request deleted"),
        (status = 404, description = "Event request not found")
    )
)]
pub async fn delete_event_request(
    State(state): State<EventRequestsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    let result = event_request::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found("EventRequest", &id));
    }

    Ok(Json(ApiResponse::success(())))
}
