//! Migration to create mentorships and mentorship_technologies tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mentorships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mentorships::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mentorships::MentorId).string().not_null())
                    .col(ColumnDef::new(Mentorships::InternId).string().not_null())
                    .col(ColumnDef::new(Mentorships::SeasonId).string().not_null())
                    .col(ColumnDef::new(Mentorships::StartDate).date().not_null())
                    .col(ColumnDef::new(Mentorships::EndDate).date().not_null())
                    .col(ColumnDef::new(Mentorships::Notes).string_len(1000).null())
                    .col(
                        ColumnDef::new(Mentorships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Mentorships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Mentorships::CreatedBy).string_len(255).not_null())
                    .col(ColumnDef::new(Mentorships::ModifiedBy).string_len(255).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentorships_mentor")
                            .from(Mentorships::Table, Mentorships::MentorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentorships_intern")
                            .from(Mentorships::Table, Mentorships::InternId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentorships_season")
                            .from(Mentorships::Table, Mentorships::SeasonId)
                            .to(Seasons::Table, Seasons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MentorshipTechnologies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MentorshipTechnologies::MentorshipId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipTechnologies::TechnologyId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MentorshipTechnologies::MentorshipId)
                            .col(MentorshipTechnologies::TechnologyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentorship_technologies_mentorship")
                            .from(
                                MentorshipTechnologies::Table,
                                MentorshipTechnologies::MentorshipId,
                            )
                            .to(Mentorships::Table, Mentorships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentorship_technologies_technology")
                            .from(
                                MentorshipTechnologies::Table,
                                MentorshipTechnologies::TechnologyId,
                            )
                            .to(Technologies::Table, Technologies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mentorships_season")
                    .table(Mentorships::Table)
                    .col(Mentorships::SeasonId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(MentorshipTechnologies::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Mentorships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Mentorships {
    Table,
    Id,
    MentorId,
    InternId,
    SeasonId,
    StartDate,
    EndDate,
    Notes,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    ModifiedBy,
}

#[derive(Iden)]
enum MentorshipTechnologies {
    Table,
    MentorshipId,
    TechnologyId,
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

#[derive(Iden)]
enum Technologies {
    Table,
    Id,
}
