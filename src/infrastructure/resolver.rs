//! Database-backed implementation of the mapping layer's user resolver.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::application::mappers::UserResolver;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserResolver {
    db: DatabaseConnection,
}

impl SeaOrmUserResolver {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

#[async_trait]
impl UserResolver for SeaOrmUserResolver {
    async fn resolve_user_by_id(&self, id: &str) -> DomainResult<user::Model> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
    }

    async fn resolve_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<user::Model>> {
        // Repeated ids count once
        let mut distinct: Vec<String> = ids.to_vec();
        distinct.sort();
        distinct.dedup();

        let found = user::Entity::find()
            .filter(user::Column::Id.is_in(distinct.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        // Any missing id fails the whole call
        if found.len() != distinct.len() {
            let missing = distinct
                .iter()
                .find(|id| !found.iter().any(|u| &u.id == *id))
                .cloned()
                .unwrap_or_default();
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: missing,
            });
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Database, Set};
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;

    async fn test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert_user(db: &DatabaseConnection, id: &str) {
        let now = Utc::now();
        user::ActiveModel {
            id: Set(id.to_string()),
            first_name: Set("Jane".to_string()),
            last_name: Set("Doe".to_string()),
            position: Set(None),
            role: Set(user::UserRole::Intern),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set("SYSTEM".to_string()),
            modified_by: Set("SYSTEM".to_string()),
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_repeated_ids_of_an_existing_user_resolve() {
        let db = test_db().await;
        insert_user(&db, "u1").await;

        let resolver = SeaOrmUserResolver::new(db);
        let found = resolver
            .resolve_users_by_ids(&["u1".to_string(), "u1".to_string()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "u1");
    }

    #[tokio::test]
    async fn test_missing_id_fails_and_names_it() {
        let db = test_db().await;
        insert_user(&db, "u1").await;

        let resolver = SeaOrmUserResolver::new(db);
        let err = resolver
            .resolve_users_by_ids(&["u1".to_string(), "ghost".to_string()])
            .await
            .unwrap_err();

        match err {
            DomainError::NotFound { value, .. } => assert_eq!(value, "ghost"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
