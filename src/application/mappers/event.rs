//! Event DTOs and mapping
//!
//! The wire exchanges whole minutes and a derived `end_time`; storage
//! keeps seconds. `end_time` is recomputed on every create and update
//! from the effective start time and duration.

use chrono::NaiveDateTime;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::duration::{duration_from_minutes, duration_minutes, end_time};
use crate::infrastructure::database::entities::{event, event_attendee, user};
use crate::shared::datetime::{date_time_format, date_time_format_opt};

#[derive(Debug, Serialize, ToSchema)]
pub struct EventDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "date_time_format")]
    #[schema(value_type = String, example = "2024-01-15 09:30")]
    pub start_time: NaiveDateTime,
    /// Whole minutes; sub-minute storage precision is truncated
    pub duration_minutes: i64,
    #[serde(with = "date_time_format")]
    #[schema(value_type = String, example = "2024-01-15 11:00")]
    pub end_time: NaiveDateTime,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(with = "date_time_format")]
    #[schema(value_type = String, example = "2024-01-15 09:30")]
    pub start_time: NaiveDateTime,
    #[validate(range(min = 1))]
    pub duration_minutes: i64,
}

#[derive(Debug, Deserialize, Validate, Default, ToSchema)]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(default, with = "date_time_format_opt")]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveDateTime>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i64>,
}

/// Attendee summary exposed on event responses. The join row's own
/// identity is discarded.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendeeSummaryDto {
    pub id: String,
    pub display_name: String,
    pub email: String,
    /// Required vs. optional attendance
    pub required: bool,
}

/// New entity from a creation DTO; `end_time` is derived here.
pub fn to_model(dto: &CreateEventDto) -> event::ActiveModel {
    event::ActiveModel {
        title: Set(dto.title.clone()),
        description: Set(dto.description.clone()),
        location: Set(dto.location.clone()),
        start_time: Set(dto.start_time),
        duration_seconds: Set(duration_from_minutes(dto.duration_minutes)),
        end_time: Set(end_time(dto.start_time, dto.duration_minutes)),
        ..Default::default()
    }
}

pub fn to_response(model: &event::Model) -> EventDto {
    EventDto {
        id: model.id.clone(),
        title: model.title.clone(),
        description: model.description.clone(),
        location: model.location.clone(),
        start_time: model.start_time,
        duration_minutes: duration_minutes(model.duration_seconds),
        end_time: model.end_time,
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

/// Applies provided fields onto the target; `end_time` is recomputed
/// from the effective start time and duration, exactly as on create.
pub fn apply_update(dto: &UpdateEventDto, current: &event::Model, target: &mut event::ActiveModel) {
    if let Some(title) = &dto.title {
        target.title = Set(title.clone());
    }
    if let Some(description) = &dto.description {
        target.description = Set(Some(description.clone()));
    }
    if let Some(location) = &dto.location {
        target.location = Set(Some(location.clone()));
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

/// Flattens the attendee join rows into summary records.
pub fn attendees_view(
    attendees: &[(event_attendee::Model, user::Model, String)],
) -> Vec<AttendeeSummaryDto> {
    attendees
        .iter()
        .map(|(attendee, user, email)| AttendeeSummaryDto {
            id: user.id.clone(),
            display_name: user.full_name(),
            email: email.clone(),
            required: attendee.required,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sea_orm::IntoActiveModel;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn existing() -> event::Model {
        event::Model {
            id: "e1".to_string(),
            title: "Demo day".to_string(),
            description: None,
            location: None,
            start_time: start(),
            duration_seconds: 90 * 60,
            end_time: end_time(start(), 90),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "SYSTEM".to_string(),
            modified_by: "SYSTEM".to_string(),
        }
    }

    #[test]
    fn test_create_derives_end_time() {
        let dto = CreateEventDto {
            title: "Demo day".to_string(),
            description: None,
            location: None,
            start_time: start(),
            duration_minutes: 90,
        };
        let model = to_model(&dto);
        assert_eq!(*model.duration_seconds.as_ref(), 5400);
        assert_eq!(
            model.end_time.as_ref().format("%H:%M").to_string(),
            "11:00"
        );
    }

    #[test]
    fn test_update_recomputes_end_time_from_duration_only() {
        let current = existing();
        let mut target = current.clone().into_active_model();
        let dto = UpdateEventDto {
            duration_minutes: Some(30),
            ..Default::default()
        };
        apply_update(&dto, &current, &mut target);
        assert_eq!(
            target.end_time.as_ref().format("%H:%M").to_string(),
            "10:00"
        );
    }

    #[test]
    fn test_update_recomputes_end_time_from_start_only() {
        let current = existing();
        let mut target = current.clone().into_active_model();
        let new_start = NaiveDate::from_ymd_opt(2024, 1, 16)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        let dto = UpdateEventDto {
            start_time: Some(new_start),
            ..Default::default()
        };
        apply_update(&dto, &current, &mut target);
        // duration kept at 90 minutes
        assert_eq!(
            target.end_time.as_ref().format("%Y-%m-%d %H:%M").to_string(),
            "2024-01-16 15:30"
        );
    }

    #[test]
    fn test_all_null_update_changes_nothing() {
        let current = existing();
        let mut target = current.clone().into_active_model();
        let before = target.clone();
        apply_update(&UpdateEventDto::default(), &current, &mut target);
        assert_eq!(before, target);
    }

    #[test]
    fn test_attendees_view_discards_join_identity() {
        let attendee = event_attendee::Model {
            id: 42,
            event_id: "e1".to_string(),
            user_id: "u1".to_string(),
            required: true,
        };
        let user = user::Model {
            id: "u1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            position: None,
            role: user::UserRole::Intern,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "SYSTEM".to_string(),
            modified_by: "SYSTEM".to_string(),
        };
        let view = attendees_view(&[(attendee, user, "jane@example.com".to_string())]);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "u1");
        assert_eq!(view[0].display_name, "Jane Doe");
        assert!(view[0].required);
        let json = serde_json::to_value(&view[0]).unwrap();
        assert!(json.get("id").is_some());
        assert!(json.get("event_id").is_none());
    }
}
