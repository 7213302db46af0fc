//! EventRequest DTOs and mapping
//!
//! Same derived end-time rule as events; the season relation follows
//! the two-phase construction used by absence requests.

use chrono::NaiveDateTime;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::duration::{duration_from_minutes, duration_minutes, end_time};
use crate::infrastructure::database::entities::absence_request::RequestStatus;
use crate::infrastructure::database::entities::event_request;
use crate::shared::datetime::{date_time_format, date_time_format_opt};

#[derive(Debug, Serialize, ToSchema)]
pub struct EventRequestDto {
    pub id: String,
    pub requester_id: String,
    pub season_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "date_time_format")]
    #[schema(value_type = String, example = "2024-02-01 14:00")]
    pub start_time: NaiveDateTime,
    pub duration_minutes: i64,
    #[serde(with = "date_time_format")]
    #[schema(value_type = String, example = "2024-02-01 15:00")]
    pub end_time: NaiveDateTime,
    #[schema(value_type = String, example = "Pending")]
    pub status: RequestStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequestDto {
    pub requester_id: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(with = "date_time_format")]
    #[schema(value_type = String, example = "2024-02-01 14:00")]
    pub start_time: NaiveDateTime,
    #[validate(range(min = 1))]
    pub duration_minutes: i64,
    /// Resolved and attached by the caller, not by the mapper
    pub season_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default, ToSchema)]
pub struct UpdateEventRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default, with = "date_time_format_opt")]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveDateTime>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i64>,
    #[schema(value_type = Option<String>)]
    pub status: Option<RequestStatus>,
}

/// New entity from a creation DTO; `season_id`, `id`, timestamps and
/// audit columns are left for the caller.
pub fn to_model(dto: &CreateEventRequestDto) -> event_request::ActiveModel {
    event_request::ActiveModel {
        requester_id: Set(dto.requester_id.clone()),
        title: Set(dto.title.clone()),
        description: Set(dto.description.clone()),
        start_time: Set(dto.start_time),
        duration_seconds: Set(duration_from_minutes(dto.duration_minutes)),
        end_time: Set(end_time(dto.start_time, dto.duration_minutes)),
        status: Set(RequestStatus::Pending),
        ..Default::default()
    }
}

pub fn to_response(model: &event_request::Model) -> EventRequestDto {
    EventRequestDto {
        id: model.id.clone(),
        requester_id: model.requester_id.clone(),
        season_id: model.season_id.clone(),
        title: model.title.clone(),
        description: model.description.clone(),
        start_time: model.start_time,
        duration_minutes: duration_minutes(model.duration_seconds),
        end_time: model.end_time,
        status: model.status.clone(),
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

/// Applies provided fields; `end_time` recomputed like on create.
pub fn apply_update(
    dto: &UpdateEventRequestDto,
    current: &event_request::Model,
    target: &mut event_request::ActiveModel,
) {
    if let Some(title) = &dto.title {
        target.title = Set(title.clone());
    }
    if let Some(description) = &dto.description {
        target.description = Set(Some(description.clone()));
    }
    if let Some(status) = &dto.status {
        target.status = Set(status.clone());
    }

    let effective_start = dto.start_time.unwrap_or(current.start_time);
    let effective_minutes = dto
        .duration_minutes
        .unwrap_or_else(|| duration_minutes(current.duration_seconds));

    if let Some(start_time) = dto.start_time {
        target.start_time = Set(start_time);
    }
    if let Some(minutes) = dto.duration_minutes {
        target.duration_seconds = Set(duration_from_minutes(minutes));
    }
    if dto.start_time.is_some() || dto.duration_minutes.is_some() {
        target.end_time = Set(end_time(effective_start, effective_minutes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{ActiveValue, IntoActiveModel};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn existing() -> event_request::Model {
        event_request::Model {
            id: "er1".to_string(),
            requester_id: "u1".to_string(),
            season_id: None,
            title: "Tech talk".to_string(),
            description: None,
            start_time: start(),
            duration_seconds: 60 * 60,
            end_time: end_time(start(), 60),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "SYSTEM".to_string(),
            modified_by: "SYSTEM".to_string(),
        }
    }

    #[test]
    fn test_create_derives_end_time_and_leaves_season_unset() {
        let dto = CreateEventRequestDto {
            requester_id: "u1".to_string(),
            title: "Tech talk".to_string(),
            description: None,
            start_time: start(),
            duration_minutes: 60,
            season_id: Some("s1".to_string()),
        };
        let model = to_model(&dto);
        assert_eq!(model.season_id, ActiveValue::NotSet);
        assert_eq!(
            model.end_time.as_ref().format("%H:%M").to_string(),
            "15:00"
        );
    }

    #[test]
    fn test_update_end_time_rule_matches_create() {
        let current = existing();
        let mut target = current.clone().into_active_model();
        let dto = UpdateEventRequestDto {
            start_time: Some(start() + chrono::Duration::hours(1)),
            duration_minutes: Some(45),
            ..Default::default()
        };
        apply_update(&dto, &current, &mut target);
        assert_eq!(
            target.end_time.as_ref().format("%H:%M").to_string(),
            "15:45"
        );
    }

    #[test]
    fn test_status_transition_via_partial_update() {
        let current = existing();
        let mut target = current.clone().into_active_model();
        let dto = UpdateEventRequestDto {
            status: Some(RequestStatus::Approved),
            ..Default::default()
        };
        apply_update(&dto, &current, &mut target);
        assert_eq!(*target.status.as_ref(), RequestStatus::Approved);
        // everything else untouched
        assert_eq!(target.title.as_ref(), "Tech talk");
        assert_eq!(*target.end_time.as_ref(), current.end_time);
    }
}
