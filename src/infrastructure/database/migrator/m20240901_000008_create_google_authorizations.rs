//! Migration to create google_authorizations table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GoogleAuthorizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoogleAuthorizations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GoogleAuthorizations::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GoogleAuthorizations::AccessToken)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GoogleAuthorizations::RefreshToken).string().null())
                    .col(
                        ColumnDef::new(GoogleAuthorizations::TokenType)
                            .string_len(20)
                            .not_null()
                            .default("Bearer"),
                    )
                    .col(ColumnDef::new(GoogleAuthorizations::Scope).string().null())
                    .col(
                        ColumnDef::new(GoogleAuthorizations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoogleAuthorizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoogleAuthorizations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_google_authorizations_user")
                            .from(GoogleAuthorizations::Table, GoogleAuthorizations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GoogleAuthorizations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GoogleAuthorizations {
    Table,
    Id,
    UserId,
    AccessToken,
    RefreshToken,
    TokenType,
    Scope,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
