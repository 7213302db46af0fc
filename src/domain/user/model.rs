use chrono::{DateTime, Utc};

/// User role within the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Mentor,
    Intern,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Mentor => write!(f, "mentor"),
            Self::Intern => write!(f, "intern"),
        }
    }
}

/// Domain user: the person record joined with its login account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub role: UserRole,
    /// From the 1:1 account row
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
