//! Technology DTOs and mapping

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infrastructure::database::entities::technology;

#[derive(Debug, Serialize, ToSchema)]
pub struct TechnologyDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTechnologyDto {
    /// Unique technology name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// All fields optional; `null` means "no change".
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTechnologyDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

pub fn to_response(model: &technology::Model) -> TechnologyDto {
    TechnologyDto {
        id: model.id.clone(),
        name: model.name.clone(),
    }
}

/// New entity from a creation DTO. `id` is left for the caller.
pub fn to_model(dto: &CreateTechnologyDto) -> technology::ActiveModel {
    technology::ActiveModel {
        name: Set(dto.name.clone()),
        ..Default::default()
    }
}

/// Applies only provided fields onto the target.
pub fn apply_update(dto: &UpdateTechnologyDto, target: &mut technology::ActiveModel) {
    if let Some(name) = &dto.name {
        target.name = Set(name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::IntoActiveModel;

    fn java() -> technology::Model {
        technology::Model {
            id: "t1".to_string(),
            name: "Java".to_string(),
        }
    }

    #[test]
    fn test_null_name_means_no_change() {
        let mut target = java().into_active_model();
        apply_update(&UpdateTechnologyDto { name: None }, &mut target);
        assert_eq!(target.name.as_ref(), "Java");
    }

    #[test]
    fn test_update_is_idempotent() {
        let dto = UpdateTechnologyDto {
            name: Some("Rust".to_string()),
        };
        let mut once = java().into_active_model();
        apply_update(&dto, &mut once);
        let mut twice = java().into_active_model();
        apply_update(&dto, &mut twice);
        apply_update(&dto, &mut twice);
        assert_eq!(once, twice);
    }
}
