use super::UserRole;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub role: Option<UserRole>,
    pub email: String,
    pub password: String,
}
