//! Mentorship handlers
//!
//! Responses carry nested mentor, intern and season summaries plus the
//! attached technologies. The technology set is replaced wholesale
//! through its own endpoint.

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

use crate::api::dto::ApiResponse;
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{db_error, domain_error, not_found, HandlerError};
use crate::application::audit::{auditor_name, AuthContext};
use crate::application::mappers::mentorship as mapper;
use crate::application::mappers::mentorship::{
    CreateMentorshipDto, MentorshipDto, UpdateMentorshipDto,
};
use crate::application::mappers::UserResolver;
use crate::infrastructure::database::entities::{
    account, mentorship, mentorship_technology, season, technology, user,
};

#[derive(Clone)]
pub struct MentorshipsHandlerState {
    pub db: DatabaseConnection,
    pub resolver: Arc<dyn UserResolver>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetTechnologiesDto {
    /// Replaces the attached technology set
    pub technology_ids: Vec<String>,
}

async fn email_for(db: &DatabaseConnection, user_id: &str) -> Result<String, HandlerError> {
    let acct = account::Entity::find()
        .filter(account::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(db_error)?;
    Ok(acct.map(|a| a.email).unwrap_or_default())
}

async fn technologies_for(
    db: &DatabaseConnection,
    mentorship_id: &str,
) -> Result<Vec<technology::Model>, HandlerError> {
    let joins = mentorship_technology::Entity::find()
        .filter(mentorship_technology::Column::MentorshipId.eq(mentorship_id))
        .all(db)
        .await
        .map_err(db_error)?;

    let ids: Vec<String> = joins.into_iter().map(|j| j.technology_id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    technology::Entity::find()
        .filter(technology::Column::Id.is_in(ids))
        .order_by_asc(technology::Column::Name)
        .all(db)
        .await
        .map_err(db_error)
}

/// Assembles the full response for one mentorship row.
async fn to_full_response(
    state: &MentorshipsHandlerState,
    model: &mentorship::Model,
) -> Result<MentorshipDto, HandlerError> {
    let mentor = state
        .resolver
        .resolve_user_by_id(&model.mentor_id)
        .await
        .map_err(domain_error)?;
    let intern = state
        .resolver
        .resolve_user_by_id(&model.intern_id)
        .await
        .map_err(domain_error)?;
    let season = season::Entity::find_by_id(&model.season_id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Season", &model.season_id))?;

    let mentor_email = email_for(&state.db, &mentor.id).await?;
    let intern_email = email_for(&state.db, &intern.id).await?;
    let technologies = technologies_for(&state.db, &model.id).await?;

    Ok(mapper::to_response(
        model,
        &mentor,
        &mentor_email,
        &intern,
        &intern_email,
        &season,
        &technologies,
    ))
}

fn role_mismatch(expected: &str, user: &user::Model) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(format!(
            "User '{}' does not have the {} role",
            user.id, expected
        ))),
    )
}

/// List mentorships
#[utoipa::path(
    get,
    path = "/api/v1/mentorships",
    tag = "Mentorships",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All mentorships", body = ApiResponse<Vec<MentorshipDto>>)
    )
)]
pub async fn list_mentorships(
    State(state): State<MentorshipsHandlerState>,
) -> Result<Json<ApiResponse<Vec<MentorshipDto>>>, HandlerError> {
    let rows = mentorship::Entity::find()
        .order_by_desc(mentorship::Column::StartDate)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let mut items = Vec::with_capacity(rows.len());
    for model in &rows {
        items.push(to_full_response(&state, model).await?);
    }

    Ok(Json(ApiResponse::success(items)))
}

/// Get a mentorship by id
#[utoipa::path(
    get,
    path = "/api/v1/mentorships/{id}",
    tag = "Mentorships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Mentorship id")),
    responses(
        (status = 200, description = "Mentorship", body = ApiResponse<MentorshipDto>),
        (status = 404, description = "Mentorship not found")
    )
)]
pub async fn get_mentorship(
    State(state): State<MentorshipsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MentorshipDto>>, HandlerError> {
    let model = mentorship::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Mentorship", &id))?;

    let dto = to_full_response(&state, &model).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// Create a mentorship
///
/// Mentor, intern and season are resolved before the row is written;
/// the mentor must hold the mentor role and the intern the intern role.
#[utoipa::path(
    post,
    path = "/api/v1/mentorships",
    tag = "Mentorships",
    security(("bearer_auth" = [])),
    request_body = CreateMentorshipDto,
    responses(
        (status = 201, description = "Mentorship created", body = ApiResponse<MentorshipDto>),
        (status = 400, description = "Role mismatch"),
        (status = 404, description = "Mentor, intern or season not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_mentorship(
    State(state): State<MentorshipsHandlerState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<CreateMentorshipDto>,
) -> Result<(StatusCode, Json<ApiResponse<MentorshipDto>>), HandlerError> {
    let mentor = state
        .resolver
        .resolve_user_by_id(&payload.mentor_id)
        .await
        .map_err(domain_error)?;
    let intern = state
        .resolver
        .resolve_user_by_id(&payload.intern_id)
        .await
        .map_err(domain_error)?;

    if mentor.role == user::UserRole::Intern {
        return Err(role_mismatch("mentor", &mentor));
    }
    if intern.role != user::UserRole::Intern {
        return Err(role_mismatch("intern", &intern));
    }

    season::Entity::find_by_id(&payload.season_id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Season", &payload.season_id))?;

    let now = Utc::now();
    let auditor = auditor_name(&ctx).to_string();

    let mut model = mapper::to_model(&payload);
    model.id = Set(uuid::Uuid::new_v4().to_string());
    model.mentor_id = Set(payload.mentor_id.clone());
    model.intern_id = Set(payload.intern_id.clone());
    model.season_id = Set(payload.season_id.clone());
    model.created_at = Set(now);
    model.updated_at = Set(now);
    model.created_by = Set(auditor.clone());
    model.modified_by = Set(auditor);

    let inserted = model.insert(&state.db).await.map_err(db_error)?;
    let dto = to_full_response(&state, &inserted).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

/// Update a mentorship
///
/// Only dates and notes; mentor, intern, season and technologies are
/// fixed or have their own endpoint.
#[utoipa::path(
    put,
    path = "/api/v1/mentorships/{id}",
    tag = "Mentorships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Mentorship id")),
    request_body = UpdateMentorshipDto,
    responses(
        (status = 200, description = "Mentorship updated", body = ApiResponse<MentorshipDto>),
        (status = 404, description = "Mentorship not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_mentorship(
    State(state): State<MentorshipsHandlerState>,
    Path(id): Path<String>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<UpdateMentorshipDto>,
) -> Result<Json<ApiResponse<MentorshipDto>>, HandlerError> {
    let existing = mentorship::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Mentorship", &id))?;

    let mut active: mentorship::ActiveModel = existing.into();
    mapper::apply_update(&payload, &mut active);
    active.updated_at = Set(Utc::now());
    active.modified_by = Set(auditor_name(&ctx).to_string());

    let updated = active.update(&state.db).await.map_err(db_error)?;
    let dto = to_full_response(&state, &updated).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// Replace the technology set
///
/// Every referenced technology must exist; one unknown id rejects the
/// whole replacement.
#[utoipa::path(
    put,
    path = "/api/v1/mentorships/{id}/technologies",
    tag = "Mentorships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Mentorship id")),
    request_body = SetTechnologiesDto,
    responses(
        (status = 200, description = "Technologies replaced", body = ApiResponse<MentorshipDto>),
        (status = 404, description = "Mentorship or technology not found")
    )
)]
pub async fn set_technologies(
    State(state): State<MentorshipsHandlerState>,
    Path(id): Path<String>,
    Json(payload): Json<SetTechnologiesDto>,
) -> Result<Json<ApiResponse<MentorshipDto>>, HandlerError> {
    let model = mentorship::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Mentorship", &id))?;

    // Repeated ids count once
    let mut technology_ids = payload.technology_ids.clone();
    technology_ids.sort();
    technology_ids.dedup();

    if !technology_ids.is_empty() {
        let found = technology::Entity::find()
            .filter(technology::Column::Id.is_in(technology_ids.clone()))
            .all(&state.db)
            .await
            .map_err(db_error)?;
        if found.len() != technology_ids.len() {
            let missing = technology_ids
                .iter()
                .find(|id| !found.iter().any(|t| &t.id == *id))
                .cloned()
                .unwrap_or_default();
            return Err(not_found("Technology", &missing));
        }
    }

    // Delete and re-insert atomically
    let txn = state.db.begin().await.map_err(db_error)?;

    mentorship_technology::Entity::delete_many()
        .filter(mentorship_technology::Column::MentorshipId.eq(id.as_str()))
        .exec(&txn)
        .await
        .map_err(db_error)?;

    for technology_id in &technology_ids {
        let join = mentorship_technology::ActiveModel {
            mentorship_id: Set(id.clone()),
            technology_id: Set(technology_id.clone()),
        };
        join.insert(&txn).await.map_err(db_error)?;
    }

    txn.commit().await.map_err(db_error)?;

    let dto = to_full_response(&state, &model).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// Delete a mentorship
#[utoipa::path(
    delete,
    path = "/api/v1/mentorships/{id}",
    tag = "Mentorships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Mentorship id")),
    responses(
        (status = 200, description = "Mentorship deleted"),
        (status = 404, description = "Mentorship not found")
    )
)]
pub async fn delete_mentorship(
    State(state): State<MentorshipsHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HandlerError> {
    let result = mentorship::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found("Mentorship", &id));
    }

    Ok(Json(ApiResponse::success(())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::resolver::SeaOrmUserResolver;

    async fn test_state() -> MentorshipsHandlerState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        MentorshipsHandlerState {
            resolver: Arc::new(SeaOrmUserResolver::new(db.clone())),
            db,
        }
    }

    async fn insert_user(db: &DatabaseConnection, id: &str, role: user::UserRole) {
        let now = Utc::now();
        user::ActiveModel {
            id: Set(id.to_string()),
            first_name: Set("Jane".to_string()),
            last_name: Set("Doe".to_string()),
            position: Set(None),
            role: Set(role),
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

    async fn insert_fixture(db: &DatabaseConnection) {
        insert_user(db, "mentor1", user::UserRole::Mentor).await;
        insert_user(db, "intern1", user::UserRole::Intern).await;

        season::ActiveModel {
            id: Set("s1".to_string()),
            name: Set("Summer 2026".to_string()),
            start_date: Set(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()),
            end_date: Set(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()),
        }
        .insert(db)
        .await
        .unwrap();

        let now = Utc::now();
        mentorship::ActiveModel {
            id: Set("m1".to_string()),
            mentor_id: Set("mentor1".to_string()),
            intern_id: Set("intern1".to_string()),
            season_id: Set("s1".to_string()),
            start_date: Set(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()),
            end_date: Set(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set("SYSTEM".to_string()),
            modified_by: Set("SYSTEM".to_string()),
        }
        .insert(db)
        .await
        .unwrap();

        for (id, name) in [("t1", "Rust"), ("t2", "Go")] {
            technology::ActiveModel {
                id: Set(id.to_string()),
                name: Set(name.to_string()),
            }
            .insert(db)
            .await
            .unwrap();
        }
    }

    async fn join_rows(db: &DatabaseConnection, mentorship_id: &str) -> Vec<mentorship_technology::Model> {
        mentorship_technology::Entity::find()
            .filter(mentorship_technology::Column::MentorshipId.eq(mentorship_id))
            .all(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_technologies_collapses_repeated_ids() {
        let state = test_state().await;
        insert_fixture(&state.db).await;

        let payload = SetTechnologiesDto {
            technology_ids: vec!["t1".to_string(), "t1".to_string()],
        };
        set_technologies(State(state.clone()), Path("m1".to_string()), Json(payload))
            .await
            .unwrap();

        let rows = join_rows(&state.db, "m1").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].technology_id, "t1");
    }

    #[tokio::test]
    async fn test_set_technologies_replaces_previous_set() {
        let state = test_state().await;
        insert_fixture(&state.db).await;

        let first = SetTechnologiesDto {
            technology_ids: vec!["t1".to_string(), "t2".to_string()],
        };
        set_technologies(State(state.clone()), Path("m1".to_string()), Json(first))
            .await
            .unwrap();

        let second = SetTechnologiesDto {
            technology_ids: vec!["t2".to_string()],
        };
        set_technologies(State(state.clone()), Path("m1".to_string()), Json(second))
            .await
            .unwrap();

        let rows = join_rows(&state.db, "m1").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].technology_id, "t2");
    }

    #[tokio::test]
    async fn test_set_technologies_unknown_id_rejects_whole_replacement() {
        let state = test_state().await;
        insert_fixture(&state.db).await;

        let seed = SetTechnologiesDto {
            technology_ids: vec!["t1".to_string()],
        };
        set_technologies(State(state.clone()), Path("m1".to_string()), Json(seed))
            .await
            .unwrap();

        let bad = SetTechnologiesDto {
            technology_ids: vec!["t2".to_string(), "ghost".to_string()],
        };
        let err = set_technologies(State(state.clone()), Path("m1".to_string()), Json(bad))
            .await
            .err()
            .unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);

        // Existing set untouched
        let rows = join_rows(&state.db, "m1").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].technology_id, "t1");
    }
}
