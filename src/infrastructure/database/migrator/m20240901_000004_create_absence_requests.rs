//! Migration to create absence_requests table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AbsenceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AbsenceRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AbsenceRequests::RequesterId).string().not_null())
                    .col(ColumnDef::new(AbsenceRequests::AssigneeId).string().null())
                    .col(ColumnDef::new(AbsenceRequests::SeasonId).string().null())
                    .col(
                        ColumnDef::new(AbsenceRequests::AbsenceType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AbsenceRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(AbsenceRequests::StartDate).date().not_null())
                    .col(ColumnDef::new(AbsenceRequests::EndDate).date().not_null())
                    .col(ColumnDef::new(AbsenceRequests::Reason).string_len(500).null())
                    .col(
                        ColumnDef::new(AbsenceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AbsenceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AbsenceRequests::CreatedBy)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AbsenceRequests::ModifiedBy)
                            .string_len(255)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_absence_requests_requester")
                            .from(AbsenceRequests::Table, AbsenceRequests::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_absence_requests_assignee")
                            .from(AbsenceRequests::Table, AbsenceRequests::AssigneeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_absence_requests_season")
                            .from(AbsenceRequests::Table, AbsenceRequests::SeasonId)
                            .to(Seasons::Table, Seasons::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_absence_requests_requester")
                    .table(AbsenceRequests::Table)
                    .col(AbsenceRequests::RequesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_absence_requests_status")
                    .table(AbsenceRequests::Table)
                    .col(AbsenceRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AbsenceRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AbsenceRequests {
    Table,
    Id,
    RequesterId,
    AssigneeId,
    SeasonId,
    AbsenceType,
    Status,
    StartDate,
    EndDate,
    Reason,
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
