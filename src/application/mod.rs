//! Application layer: mapping and audit attribution.

pub mod audit;
pub mod mappers;

pub use audit::{auditor_name, AuthContext, SYSTEM_AUDITOR};
