use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::application::mappers::PasswordEncoder;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, UpdateUserDto, User,
    UserRepositoryInterface, UserRole,
};
use crate::infrastructure::database::entities::{account, user};
use crate::shared::{validate_pagination, PaginatedResult};

pub struct UserRepository {
    db: DatabaseConnection,
    encoder: Arc<dyn PasswordEncoder>,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { db, encoder }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Mentor => UserRole::Mentor,
        user::UserRole::Intern => UserRole::Intern,
    }
}

fn domain_role_to_entity(role: &UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Mentor => user::UserRole::Mentor,
        UserRole::Intern => user::UserRole::Intern,
    }
}

fn to_domain(model: user::Model, email: String) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        position: model.position,
        role: entity_role_to_domain(model.role),
        email,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

fn conflict_or_db_err(e: sea_orm::DbErr) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict("Email already exists".to_string())
    } else {
        db_err(e)
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    /// Inserts the user row and its 1:1 account row in one transaction.
    async fn create_user(&self, dto: CreateUserDto, auditor: &str) -> DomainResult<User> {
        let now = Utc::now();
        let user_id = uuid::Uuid::new_v4().to_string();

        let password_hash = self.encoder.encode(&dto.password)?;

        let role = dto
            .role
            .as_ref()
            .map_or(user::UserRole::Intern, domain_role_to_entity);

        let txn = self.db.begin().await.map_err(db_err)?;

        let new_user = user::ActiveModel {
            id: Set(user_id.clone()),
            first_name: Set(dto.first_name),
            last_name: Set(dto.last_name),
            position: Set(dto.position),
            role: Set(role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(auditor.to_string()),
            modified_by: Set(auditor.to_string()),
        };
        let inserted = new_user.insert(&txn).await.map_err(conflict_or_db_err)?;

        let new_account = account::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            email: Set(dto.email.clone()),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };
        new_account.insert(&txn).await.map_err(conflict_or_db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(to_domain(inserted, dto.email))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let (page, page_size) = validate_pagination(dto.page, dto.page_size);

        let mut query = user::Entity::find();

        // Search on first or last name
        if let Some(ref search) = dto.search {
            query = query.filter(
                user::Column::FirstName
                    .contains(search)
                    .or(user::Column::LastName.contains(search)),
            );
        }

        if let Some(ref role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        match dto.sort_by.as_deref() {
            Some("first_name") => {
                query = query.order_by_asc(user::Column::FirstName);
            }
            Some("last_name") => {
                query = query.order_by_asc(user::Column::LastName);
            }
            Some("role") => {
                query = query.order_by_asc(user::Column::Role);
            }
            _ => {
                query = query.order_by_desc(user::Column::CreatedAt);
            }
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let offset = ((page - 1) * page_size) as u64;
        let rows = query
            .find_also_related(account::Entity)
            .offset(offset)
            .limit(page_size as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<User> = rows
            .into_iter()
            .map(|(model, acct)| {
                let email = acct.map(|a| a.email).unwrap_or_default();
                to_domain(model, email)
            })
            .collect();

        Ok(PaginatedResult::new(items, total, page, page_size))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row = account::Entity::find()
            .filter(account::Column::Email.eq(email))
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.and_then(|(acct, model)| model.map(|m| to_domain(m, acct.email))))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let row = user::Entity::find_by_id(id)
            .find_also_related(account::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(|(model, acct)| {
            let email = acct.map(|a| a.email).unwrap_or_default();
            to_domain(model, email)
        }))
    }

    async fn update_user(
        &self,
        id: &str,
        dto: UpdateUserDto,
        auditor: &str,
    ) -> DomainResult<Option<User>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(first_name) = dto.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = dto.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(position) = dto.position {
            active.position = Set(Some(position));
        }
        if let Some(role) = dto.role {
            active.role = Set(domain_role_to_entity(&role));
        }
        if let Some(is_active) = dto.is_active {
            active.is_active = Set(is_active);
        }

        active.updated_at = Set(Utc::now());
        active.modified_by = Set(auditor.to_string());

        let updated = active.update(&self.db).await.map_err(db_err)?;

        self.get_user_by_id(&updated.id).await
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let existing = account::Entity::find()
            .filter(account::Column::UserId.eq(id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Account",
                field: "user_id",
                value: id.to_string(),
            });
        };

        let mut active: account::ActiveModel = existing.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        }

        Ok(())
    }
}
