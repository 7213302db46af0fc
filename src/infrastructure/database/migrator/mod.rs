//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_users;
mod m20240901_000002_create_seasons;
mod m20240901_000003_create_technologies;
mod m20240901_000004_create_absence_requests;
mod m20240901_000005_create_events;
mod m20240901_000006_create_event_requests;
mod m20240901_000007_create_mentorships;
mod m20240901_000008_create_google_authorizations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_users::Migration),
            Box::new(m20240901_000002_create_seasons::Migration),
            Box::new(m20240901_000003_create_technologies::Migration),
            Box::new(m20240901_000004_create_absence_requests::Migration),
            Box::new(m20240901_000005_create_events::Migration),
            Box::new(m20240901_000006_create_event_requests::Migration),
            Box::new(m20240901_000007_create_mentorships::Migration),
            Box::new(m20240901_000008_create_google_authorizations::Migration),
        ]
    }
}
