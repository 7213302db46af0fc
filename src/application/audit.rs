//! Current-actor resolution for audit columns.
//!
//! The original design read an ambient security context; here the context
//! is an explicit value built by the auth middleware and handed to every
//! audited write. Resolution is total: a context without granted
//! authorities attributes the write to the `SYSTEM` sentinel.

/// Sentinel auditor for writes that cannot be attributed to a person
/// (startup seeding, contexts without authorities).
pub const SYSTEM_AUDITOR: &str = "SYSTEM";

/// The authenticated caller, as established by the auth middleware.
#[derive(Clone, Debug)]
pub struct AuthContext {
    /// User id (JWT subject)
    pub user_id: String,
    /// Principal name (account email)
    pub principal: String,
    /// Granted authorities, e.g. `ROLE_ADMIN`
    pub authorities: Vec<String>,
}

impl AuthContext {
    /// Context for unattended writes (migrations, admin seeding).
    pub fn system() -> Self {
        Self {
            user_id: String::new(),
            principal: SYSTEM_AUDITOR.to_string(),
            authorities: Vec::new(),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

/// Name recorded in `created_by` / `modified_by` for a write performed
/// under `ctx`.
pub fn auditor_name(ctx: &AuthContext) -> &str {
    if ctx.authorities.is_empty() {
        SYSTEM_AUDITOR
    } else {
        &ctx.principal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_authorities_resolves_to_system() {
        let ctx = AuthContext {
            user_id: "u1".to_string(),
            principal: "jane@example.com".to_string(),
            authorities: vec![],
        };
        assert_eq!(auditor_name(&ctx), "SYSTEM");
    }

    #[test]
    fn test_authorities_resolve_to_principal() {
        let ctx = AuthContext {
            user_id: "u1".to_string(),
            principal: "jane@example.com".to_string(),
            authorities: vec!["ROLE_MENTOR".to_string()],
        };
        assert_eq!(auditor_name(&ctx), "jane@example.com");
    }

    #[test]
    fn test_system_context() {
        assert_eq!(auditor_name(&AuthContext::system()), "SYSTEM");
    }
}
