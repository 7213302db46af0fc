//! AbsenceRequest DTOs and mapping
//!
//! The creation DTO carries only scalar foreign keys; the season and
//! assignee relations are never set here. The caller resolves and
//! populates them afterwards (two-phase construction). The generic
//! update path likewise excludes `assignee`, which has its own endpoint.

use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infrastructure::database::entities::absence_request::{
    self, AbsenceType, RequestStatus,
};
use crate::infrastructure::database::entities::user;
use crate::shared::datetime::{date_format, date_format_opt};

#[derive(Debug, Serialize, ToSchema)]
pub struct AbsenceRequestDto {
    pub id: String,
    pub requester_id: String,
    pub assignee_id: Option<String>,
    pub season_id: Option<String>,
    #[schema(value_type = String, example = "Vacation")]
    pub absence_type: AbsenceType,
    #[schema(value_type = String, example = "Pending")]
    pub status: RequestStatus,
    /// Derived: `"{requester full name} - {absence type}"`
    pub display_name: String,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-05")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAbsenceRequestDto {
    pub requester_id: String,
    #[schema(value_type = String, example = "Vacation")]
    pub absence_type: AbsenceType,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-05")]
    pub end_date: NaiveDate,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
    /// Resolved and attached by the caller, not by the mapper
    pub season_id: Option<String>,
}

/// Partial update; `null` means "no change". `assignee` is deliberately
/// absent, assignment goes through its own endpoint.
#[derive(Debug, Deserialize, Validate, Default, ToSchema)]
pub struct UpdateAbsenceRequestDto {
    #[schema(value_type = Option<String>)]
    pub absence_type: Option<AbsenceType>,
    #[schema(value_type = Option<String>)]
    pub status: Option<RequestStatus>,
    #[serde(default, with = "date_format_opt")]
    #[schema(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "date_format_opt")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// `"{requester.full_name} - {absence_type}"`
pub fn display_name(requester_full_name: &str, absence_type: &AbsenceType) -> String {
    format!("{} - {}", requester_full_name, absence_type)
}

/// New entity from a creation DTO. `id`, `season_id`, `assignee_id`,
/// timestamps and audit columns are left for the caller.
pub fn to_model(dto: &CreateAbsenceRequestDto) -> absence_request::ActiveModel {
    absence_request::ActiveModel {
        requester_id: Set(dto.requester_id.clone()),
        absence_type: Set(dto.absence_type.clone()),
        status: Set(RequestStatus::Pending),
        start_date: Set(dto.start_date),
        end_date: Set(dto.end_date),
        reason: Set(dto.reason.clone()),
        ..Default::default()
    }
}

pub fn to_response(model: &absence_request::Model, requester: &user::Model) -> AbsenceRequestDto {
    AbsenceRequestDto {
        id: model.id.clone(),
        requester_id: model.requester_id.clone(),
        assignee_id: model.assignee_id.clone(),
        season_id: model.season_id.clone(),
        absence_type: model.absence_type.clone(),
        status: model.status.clone(),
        display_name: display_name(&requester.full_name(), &model.absence_type),
        start_date: model.start_date,
        end_date: model.end_date,
        reason: model.reason.clone(),
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

/// Applies only provided fields onto the target.
pub fn apply_update(dto: &UpdateAbsenceRequestDto, target: &mut absence_request::ActiveModel) {
    if let Some(absence_type) = &dto.absence_type {
        target.absence_type = Set(absence_type.clone());
    }
    if let Some(status) = &dto.status {
        target.status = Set(status.clone());
    }
    if let Some(start_date) = dto.start_date {
        target.start_date = Set(start_date);
    }
    if let Some(end_date) = dto.end_date {
        target.end_date = Set(end_date);
    }
    if let Some(reason) = &dto.reason {
        target.reason = Set(Some(reason.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{ActiveValue, IntoActiveModel};

    fn requester() -> user::Model {
        user::Model {
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
        }
    }

    fn request() -> absence_request::Model {
        absence_request::Model {
            id: "ar1".to_string(),
            requester_id: "u1".to_string(),
            assignee_id: None,
            season_id: None,
            absence_type: AbsenceType::Vacation,
            status: RequestStatus::Pending,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "SYSTEM".to_string(),
            modified_by: "SYSTEM".to_string(),
        }
    }

    #[test]
    fn test_display_name_for_every_absence_type() {
        let cases = [
            (AbsenceType::Vacation, "Jane Doe - Vacation"),
            (AbsenceType::SickLeave, "Jane Doe - SickLeave"),
            (AbsenceType::Personal, "Jane Doe - Personal"),
            (AbsenceType::Unpaid, "Jane Doe - Unpaid"),
        ];
        for (absence_type, expected) in cases {
            assert_eq!(display_name("Jane Doe", &absence_type), expected);
        }
    }

    #[test]
    fn test_create_leaves_relations_unset() {
        let dto = CreateAbsenceRequestDto {
            requester_id: "u1".to_string(),
            absence_type: AbsenceType::Personal,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            reason: Some("appointment".to_string()),
            season_id: Some("s1".to_string()),
        };
        let model = to_model(&dto);
        assert_eq!(model.season_id, ActiveValue::NotSet);
        assert_eq!(model.assignee_id, ActiveValue::NotSet);
        assert_eq!(model.id, ActiveValue::NotSet);
        assert_eq!(model.requester_id.as_ref(), "u1");
        assert_eq!(*model.status.as_ref(), RequestStatus::Pending);
    }

    #[test]
    fn test_response_flattens_ids_and_derives_display_name() {
        let mut model = request();
        model.season_id = Some("s3".to_string());
        let dto = to_response(&model, &requester());
        assert_eq!(dto.season_id.as_deref(), Some("s3"));
        assert_eq!(dto.display_name, "Jane Doe - Vacation");
    }

    #[test]
    fn test_all_null_update_changes_nothing() {
        let mut target = request().into_active_model();
        let before = target.clone();
        apply_update(&UpdateAbsenceRequestDto::default(), &mut target);
        assert_eq!(before, target);
    }

    #[test]
    fn test_update_is_idempotent() {
        let dto = UpdateAbsenceRequestDto {
            status: Some(RequestStatus::Approved),
            reason: Some("approved by lead".to_string()),
            ..Default::default()
        };
        let base = request();
        let mut once = base.clone().into_active_model();
        apply_update(&dto, &mut once);
        let mut twice = base.into_active_model();
        apply_update(&dto, &mut twice);
        apply_update(&dto, &mut twice);
        assert_eq!(once, twice);
    }
}
