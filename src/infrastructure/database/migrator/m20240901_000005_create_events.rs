//! Migration to create events and event_attendees tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Events::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Events::Description).string_len(1000).null())
                    .col(ColumnDef::new(Events::Location).string_len(255).null())
                    .col(ColumnDef::new(Events::StartTime).timestamp().not_null())
                    .col(ColumnDef::new(Events::DurationSeconds).big_integer().not_null())
                    .col(ColumnDef::new(Events::EndTime).timestamp().not_null())
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::CreatedBy).string_len(255).not_null())
                    .col(ColumnDef::new(Events::ModifiedBy).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventAttendees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventAttendees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventAttendees::EventId).string().not_null())
                    .col(ColumnDef::new(EventAttendees::UserId).string().not_null())
                    .col(
                        ColumnDef::new(EventAttendees::Required)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_attendees_event")
                            .from(EventAttendees::Table, EventAttendees::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_attendees_user")
                            .from(EventAttendees::Table, EventAttendees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_attendees_event")
                    .table(EventAttendees::Table)
                    .col(EventAttendees::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventAttendees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    Title,
    Description,
    Location,
    StartTime,
    DurationSeconds,
    EndTime,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    ModifiedBy,
}

#[derive(Iden)]
enum EventAttendees {
    Table,
    Id,
    EventId,
    UserId,
    Required,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
