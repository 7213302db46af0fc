//! Event handlers
//!
//! The attendee list is replaced wholesale through its own endpoint;
//! the generic event update never touches it.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, domain_error, not_found, HandlerError};
use crate::application::audit::{auditor_name, AuthContext};
use crate::application::mappers::event as mapper;
use crate::application::mappers::event::{
    AttendeeSummaryDto, CreateEventDto, EventDto, UpdateEventDto,
};
use crate::application::mappers::UserResolver;
use crate::infrastructure::database::entities::{account, event, event_attendee, user};

#[derive(Clone)]
pub struct EventsHandlerState {
    pub db: DatabaseConnection,
    pub resolver: Arc<dyn UserResolver>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetAttendeesDto {
    #[validate(nested)]
    pub attendees: Vec<AttendeeEntryDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AttendeeEntryDto {
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Required vs. optional attendance. Default: required.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// Loads the join rows for an event and joins in the user and account
/// data the summary view needs.
async fn attendee_rows(
    state: &EventsHandlerState,
    event_id: &str,
) -> Result<Vec<(event_attendee::Model, user::Model, String)>, HandlerError> {
    let joins = event_attendee::Entity::find()
        .filter(event_attendee::Column::EventId.eq(event_id))
        .all(&state.db)
        .await
        .map_err(db_error)?;

    if joins.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids: Vec<String> = joins.iter().map(|j| j.user_id.clone()).collect();
    let users = state
        .resolver
        .resolve_users_by_ids(&user_ids)
        .await
        .map_err(domain_error)?;

    let accounts = account::Entity::find()
        .filter(account::Column::UserId.is_in(user_ids))
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let mut rows = Vec::with_capacity(joins.len());
    for join in joins {
        let Some(user) = users.iter().find(|u| u.id == join.user_id).cloned() else {
            continue;
        };
        let email = accounts
            .iter()
            .find(|a| a.user_id == join.user_id)
            .map(|a| a.email.clone())
            .unwrap_or_default();
        rows.push((join, user, email));
    }

    Ok(rows)
}

/// List events
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All events", body = ApiResponse<Vec<EventDto>>)
    )
)]
pub async fn list_events(
    State(state): State<EventsHandlerState>,
) -> Result<Json<ApiResponse<Vec<EventDto>>>, HandlerError> {
    let rows = event::Entity::find()
        .order_by_desc(event::Column::StartTime)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let items = rows.iter().map(mapper::to_response).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// Get an event by id
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = ApiResponse<EventDto>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<EventsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventDto>>, HandlerError> {
    let model = event::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Event", &id))?;

    Ok(Json(ApiResponse::success(mapper::to_response(&model))))
}

/// Create an event
///
/// `end_time` is derived from the start time and duration.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_event(
    State(state): State<EventsHandlerState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventDto>>), HandlerError> {
    let now = Utc::now();
    let auditor = auditor_name(&ctx).to_string();

    let mut model = mapper::to_model(&payload);
    model.id = Set(uuid::Uuid::new_v4().to_string());
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

/// Update an event
///
/// Absent fields are left unchanged; `end_time` is recomputed when the
/// start time or duration changes.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event id")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventDto>),
        (status = 404, description = "Event not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_event(
    State(state): State<EventsHandlerState>,
    Path(id): Path<String>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<UpdateEventDto>,
) -> Result<Json<ApiResponse<EventDto>>, HandlerError> {
    let existing = event::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Event", &id))?;

    let mut active: event::ActiveModel = existing.clone().into();
    mapper::apply_update(&payload, &existing, &mut active);
    active.updated_at = Set(Utc::now());
    active.modified_by = Set(auditor_name(&ctx).to_string());

    let updated = active.update(&state.db).await.map_err(db_error)?;
    Ok(Json(ApiResponse::success(mapper::to_response(&updated))))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    State(state): State<EventsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    let result = event::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found("Event", &id));
    }

    Ok(Json(ApiResponse::success(())))
}

/// List event attendees
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/attendees",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Attendees", body = ApiResponse<Vec<AttendeeSummaryDto>>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_attendees(
    State(state): State<EventsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AttendeeSummaryDto>>>, HandlerError> {
    event::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Event", &id))?;

    let rows = attendee_rows(&state, &id).await?;
    Ok(Json(ApiResponse::success(mapper::attendees_view(&rows))))
}

/// Replace the attendee list
///
/// Every referenced user must exist; a single unknown id rejects the
/// whole replacement.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}/attendees",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event id")),
    request_body = SetAttendeesDto,
    responses(
        (status = 200, description = "Attendees replaced", body = ApiResponse<Vec<AttendeeSummaryDto>>),
        (status = 404, description = "Event or user not found")
    )
)]
pub async fn set_attendees(
    State(state): State<EventsHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<SetAttendeesDto>,
) -> Result<Json<ApiResponse<Vec<AttendeeSummaryDto>>>, HandlerError> {
    event::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Event", &id))?;

    // First entry wins when a user id is listed more than once
    let mut seen = HashSet::new();
    let entries: Vec<&AttendeeEntryDto> = payload
        .attendees
        .iter()
        .filter(|e| seen.insert(e.user_id.clone()))
        .collect();

    let user_ids: Vec<String> = entries.iter().map(|e| e.user_id.clone()).collect();
    if !user_ids.is_empty() {
        state
            .resolver
            .resolve_users_by_ids(&user_ids)
            .await
            .map_err(domain_error)?;
    }

    // Delete and re-insert atomically
    let txn = state.db.begin().await.map_err(db_error)?;

    event_attendee::Entity::delete_many()
        .filter(event_attendee::Column::EventId.eq(id.as_str()))
        .exec(&txn)
        .await
        .map_err(db_error)?;

    for entry in entries {
        let join = event_attendee::ActiveModel {
            event_id: Set(id.clone()),
            user_id: Set(entry.user_id.clone()),
            required: Set(entry.required),
            ..Default::default()
        };
        join.insert(&txn).await.map_err(db_error)?;
    }

    txn.commit().await.map_err(db_error)?;

    let rows = attendee_rows(&state, &id).await?;
    Ok(Json(ApiResponse::success(mapper::attendees_view(&rows))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::resolver::SeaOrmUserResolver;

    async fn test_state() -> EventsHandlerState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        EventsHandlerState {
            resolver: Arc::new(SeaOrmUserResolver::new(db.clone())),
            db,
        }
    }

    async fn insert_user(db: &DatabaseConnection, id: &str) {
        let now = Utc::now();
        user::ActiveModel {
            id: Set(id.to_string()),
            first_name: Set("Jane".to_string()),
            last_name: Set("Doe".to_string()),
            position: Set(None),
            role: Set(user::UserRole::Intern),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set("SYSTEM".to_string()),
            modified_by: Set("SYSTEM".to_string()),
        }
        .insert(db)
        .await
        .unwrap();
    }

    async fn insert_event(db: &DatabaseConnection, id: &str) {
        let now = Utc::now();
        let start = now.naive_utc();
        event::ActiveModel {
            id: Set(id.to_string()),
            title: Set("Standup".to_string()),
            description: Set(None),
            location: Set(None),
            start_time: Set(start),
            duration_seconds: Set(1800),
            end_time: Set(start + chrono::Duration::seconds(1800)),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set("SYSTEM".to_string()),
            modified_by: Set("SYSTEM".to_string()),
        }
        .insert(db)
        .await
        .unwrap();
    }

    async fn join_rows(db: &DatabaseConnection, event_id: &str) -> Vec<event_attendee::Model> {
        event_attendee::Entity::find()
            .filter(event_attendee::Column::EventId.eq(event_id))
            .all(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_attendees_collapses_repeated_user_ids() {
        let state = test_state().await;
        insert_user(&state.db, "u1").await;
        insert_event(&state.db, "e1").await;

        let payload = SetAttendeesDto {
            attendees: vec![
                AttendeeEntryDto {
                    user_id: "u1".to_string(),
                    required: true,
                },
                AttendeeEntryDto {
                    user_id: "u1".to_string(),
                    required: false,
                },
            ],
        };

        let result = set_attendees(
            State(state.clone()),
            Path("e1".to_string()),
            ValidatedJson(payload),
        )
        .await;
        assert!(result.is_ok());

        let rows = join_rows(&state.db, "e1").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, "u1");
        assert!(rows[0].required);
    }

    #[tokio::test]
    async fn test_set_attendees_replaces_previous_set() {
        let state = test_state().await;
        insert_user(&state.db, "u1").await;
        insert_user(&state.db, "u2").await;
        insert_event(&state.db, "e1").await;

        let first = SetAttendeesDto {
            attendees: vec![
                AttendeeEntryDto {
                    user_id: "u1".to_string(),
                    required: true,
                },
                AttendeeEntryDto {
                    user_id: "u2".to_string(),
                    required: false,
                },
            ],
        };
        set_attendees(
            State(state.clone()),
            Path("e1".to_string()),
            ValidatedJson(first),
        )
        .await
        .unwrap();

        let second = SetAttendeesDto {
            attendees: vec![AttendeeEntryDto {
                user_id: "u2".to_string(),
                required: true,
            }],
        };
        set_attendees(
            State(state.clone()),
            Path("e1".to_string()),
            ValidatedJson(second),
        )
        .await
        .unwrap();

        let rows = join_rows(&state.db, "e1").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, "u2");
    }
}
