//! # MentorHub
//!
//! Administration backend for an internship program: users and their
//! login accounts, mentorships, seasons, technologies, events and the
//! absence/event request review workflow.
//!
//! ## Architecture
//!
//! - **domain**: Core entities, DTOs and repository traits
//! - **application**: Entity-to-DTO mapping layer and audit resolution
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **api**: REST API with Swagger documentation
//! - **auth**: JWT authentication and password hashing
//! - **shared**: Wire date formats, pagination and validation helpers

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod support;

pub use config::{app_property, default_config_path, init_app_properties, AppConfig, Properties};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmUserResolver};

// Re-export API router
pub use api::create_api_router;
