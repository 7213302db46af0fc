//! Collaborators the mapping layer depends on but does not implement.
//!
//! Relationship resolution and password hashing are injected so the
//! mappers stay free of persistence and crypto concerns. A resolver
//! failure ("not found") propagates to the caller unchanged.

use async_trait::async_trait;

use crate::domain::DomainResult;
use crate::infrastructure::database::entities::user;

/// Resolves foreign-key scalars to loaded user rows.
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Fails with `DomainError::NotFound` when the id does not exist.
    async fn resolve_user_by_id(&self, id: &str) -> DomainResult<user::Model>;

    /// Resolves a set of ids; any missing id fails the whole call.
    async fn resolve_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<user::Model>>;
}

/// One-way password hashing. The output must never allow recovery of the
/// raw password.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw_password: &str) -> DomainResult<String>;
}
