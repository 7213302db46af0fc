//! Mentorship DTOs and mapping
//!
//! Creation carries scalar ids; the caller resolves mentor, intern and
//! season through the collaborators and attaches them. The response
//! exposes nested summaries, never the full entity graph. Technologies
//! are excluded from the generic update path and set through a
//! dedicated endpoint.

use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::technology::TechnologyDto;
use super::user::UserSummaryDto;
use crate::infrastructure::database::entities::{mentorship, season, technology, user};
use crate::shared::datetime::{date_format, date_format_opt};

#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonSummaryDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MentorshipDto {
    pub id: String,
    pub mentor: UserSummaryDto,
    pub intern: UserSummaryDto,
    pub season: SeasonSummaryDto,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-06-01")]
    pub end_date: NaiveDate,
    pub technologies: Vec<TechnologyDto>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMentorshipDto {
    pub mentor_id: String,
    pub intern_id: String,
    pub season_id: String,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "2024-06-01")]
    pub end_date: NaiveDate,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Partial update; mentor, intern, season and technologies are not
/// updatable through this path.
#[derive(Debug, Deserialize, Validate, Default, ToSchema)]
pub struct UpdateMentorshipDto {
    #[serde(default, with = "date_format_opt")]
    #[schema(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "date_format_opt")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// New entity from a creation DTO. All three relations are left unset
/// for the caller to populate after resolution.
pub fn to_model(dto: &CreateMentorshipDto) -> mentorship::ActiveModel {
    mentorship::ActiveModel {
        start_date: Set(dto.start_date),
        end_date: Set(dto.end_date),
        notes: Set(dto.notes.clone()),
        ..Default::default()
    }
}

/// Response with nested summaries. Emails come from the 1:1 account
/// rows of mentor and intern.
#[allow(clippy::too_many_arguments)]
pub fn to_response(
    model: &mentorship::Model,
    mentor: &user::Model,
    mentor_email: &str,
    intern: &user::Model,
    intern_email: &str,
    season: &season::Model,
    technologies: &[technology::Model],
) -> MentorshipDto {
    MentorshipDto {
        id: model.id.clone(),
        mentor: super::user::summary(mentor, mentor_email),
        intern: super::user::summary(intern, intern_email),
        season: SeasonSummaryDto {
            id: season.id.clone(),
            name: season.name.clone(),
        },
        start_date: model.start_date,
        end_date: model.end_date,
        technologies: technologies.iter().map(super::technology::to_response).collect(),
        notes: model.notes.clone(),
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

/// Applies only provided fields onto the target.
pub fn apply_update(dto: &UpdateMentorshipDto, target: &mut mentorship::ActiveModel) {
    if let Some(start_date) = dto.start_date {
        target.start_date = Set(start_date);
    }
    if let Some(end_date) = dto.end_date {
        target.end_date = Set(end_date);
    }
    if let Some(notes) = &dto.notes {
        target.notes = Set(Some(notes.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn person(id: &str, first: &str, last: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            position: None,
            role: user::UserRole::Mentor,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "SYSTEM".to_string(),
            modified_by: "SYSTEM".to_string(),
        }
    }

    #[test]
    fn test_create_leaves_relations_unset() {
        let dto = CreateMentorshipDto {
            mentor_id: "7".to_string(),
            intern_id: "9".to_string(),
            season_id: "3".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            notes: None,
        };
        let model = to_model(&dto);
        assert_eq!(model.mentor_id, ActiveValue::NotSet);
        assert_eq!(model.intern_id, ActiveValue::NotSet);
        assert_eq!(model.season_id, ActiveValue::NotSet);
        assert_eq!(
            *model.start_date.as_ref(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_response_exposes_summaries_and_literal_dates() {
        let model = mentorship::Model {
            id: "m1".to_string(),
            mentor_id: "7".to_string(),
            intern_id: "9".to_string(),
            season_id: "3".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "SYSTEM".to_string(),
            modified_by: "SYSTEM".to_string(),
        };
        let season = season::Model {
            id: "3".to_string(),
            name: "Summer 2024".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
        };
        let dto = to_response(
            &model,
            &person("7", "Max", "Mentor"),
            "max@example.com",
            &person("9", "Ivy", "Intern"),
            "ivy@example.com",
            &season,
            &[],
        );

        assert_eq!(dto.mentor.display_name, "Max Mentor");
        assert_eq!(dto.intern.id, "9");
        assert_eq!(dto.season.name, "Summer 2024");

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["start_date"], "2024-01-01");
        assert_eq!(json["end_date"], "2024-06-01");
        // nested graph stays shallow: no password or account material
        assert!(json["mentor"].get("created_at").is_none());
    }
}
