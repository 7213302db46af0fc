//! Infrastructure layer: database access and collaborator implementations.

pub mod database;
pub mod resolver;

pub use database::{init_database, DatabaseConfig};
pub use resolver::SeaOrmUserResolver;
