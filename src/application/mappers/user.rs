//! User DTOs and mapping

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::User;
use crate::infrastructure::database::entities::user;

/// Wire-facing user shape
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Derived: first and last name separated by a space
    pub display_name: String,
    pub position: Option<String>,
    pub role: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Short user shape embedded in other responses (mentorships,
/// event attendees). Never exposes the full user graph.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

pub fn to_response(user: &User) -> UserDto {
    UserDto {
        id: user.id.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        display_name: user.full_name(),
        position: user.position.clone(),
        role: user.role.to_string(),
        email: user.email.clone(),
        is_active: user.is_active,
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }
}

pub fn summary(model: &user::Model, email: &str) -> UserSummaryDto {
    UserSummaryDto {
        id: model.id.clone(),
        display_name: model.full_name(),
        email: email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use chrono::Utc;

    #[test]
    fn test_display_name_concatenation() {
        let user = User {
            id: "u1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            position: None,
            role: UserRole::Mentor,
            email: "jane@example.com".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let dto = to_response(&user);
        assert_eq!(dto.display_name, "Jane Doe");
        assert_eq!(dto.role, "mentor");
    }
}
