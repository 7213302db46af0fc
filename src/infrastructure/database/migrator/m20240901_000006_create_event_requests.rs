//! Migration to create event_requests table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventRequests::RequesterId).string().not_null())
                    .col(ColumnDef::new(EventRequests::SeasonId).string().null())
                    .col(ColumnDef::new(EventRequests::Title).string_len(255).not_null())
                    .col(ColumnDef::new(EventRequests::Description).string_len(1000).null())
                    .col(ColumnDef::new(EventRequests::StartTime).timestamp().not_null())
                    .col(
                        ColumnDef::new(EventRequests::DurationSeconds)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventRequests::EndTime).timestamp().not_null())
                    .col(
                        ColumnDef::new(EventRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(EventRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventRequests::CreatedBy)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventRequests::ModifiedBy)
                            .string_len(255)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_requests_requester")
                            .from(EventRequests::Table, EventRequests::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_requests_season")
                            .from(EventRequests::Table, EventRequests::SeasonId)
                            .to(Seasons::Table, Seasons::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_requests_requester")
                    .table(EventRequests::Table)
                    .col(EventRequests::RequesterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EventRequests {
    Table,
    Id,
    RequesterId,
    SeasonId,
    Title,
    Description,
    StartTime,
    DurationSeconds,
    EndTime,
    Status,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    ModifiedBy,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Seasons {
    Table,
    Id,
}
