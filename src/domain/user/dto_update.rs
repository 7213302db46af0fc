use super::UserRole;

/// Partial update: `None` means "no change requested".
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}
