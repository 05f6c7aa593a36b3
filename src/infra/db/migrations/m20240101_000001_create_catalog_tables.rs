//! Migration: accounts, media and catalog tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Avatars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Avatars::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Avatars::ImageUrl).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::AvatarId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_avatar_id")
                            .from(Users::Table, Users::AvatarId)
                            .to(Avatars::Table, Avatars::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthClients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthClients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthClients::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_auth_clients_user_id")
                            .from(AuthClients::Table, AuthClients::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Staffs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Staffs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Staffs::UserId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Staffs::Role).string_len(16).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staffs_user_id")
                            .from(Staffs::Table, Staffs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Styles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Styles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Styles::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Styles::ImageUrl).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Tags::Usages).integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Workouts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workouts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workouts::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Workouts::Calories).integer().not_null())
                    .col(ColumnDef::new(Workouts::Duration).integer().not_null())
                    .col(ColumnDef::new(Workouts::Level).string_len(16).not_null())
                    .col(ColumnDef::new(Workouts::Description).text().not_null())
                    .col(ColumnDef::new(Workouts::DanceVideo).string().not_null())
                    .col(ColumnDef::new(Workouts::ThumbnailImage).string().not_null())
                    .col(ColumnDef::new(Workouts::AuthorName).string().not_null())
                    .col(
                        ColumnDef::new(Workouts::ViewsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Workouts::StyleId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workouts_style_id")
                            .from(Workouts::Table, Workouts::StyleId)
                            .to(Styles::Table, Styles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkoutTagAssociation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkoutTagAssociation::WorkoutId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkoutTagAssociation::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(WorkoutTagAssociation::WorkoutId)
                            .col(WorkoutTagAssociation::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workout_tag_workout_id")
                            .from(WorkoutTagAssociation::Table, WorkoutTagAssociation::WorkoutId)
                            .to(Workouts::Table, Workouts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workout_tag_tag_id")
                            .from(WorkoutTagAssociation::Table, WorkoutTagAssociation::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkoutTagAssociation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Styles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staffs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthClients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Avatars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Avatars {
    Table,
    Id,
    ImageUrl,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    Password,
    AvatarId,
}

#[derive(Iden)]
enum AuthClients {
    Table,
    Id,
    UserId,
}

#[derive(Iden)]
enum Staffs {
    Table,
    Id,
    UserId,
    Role,
}

#[derive(Iden)]
enum Styles {
    Table,
    Id,
    Name,
    ImageUrl,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    Usages,
}

#[derive(Iden)]
enum Workouts {
    Table,
    Id,
    Name,
    Calories,
    Duration,
    Level,
    Description,
    DanceVideo,
    ThumbnailImage,
    AuthorName,
    ViewsCount,
    StyleId,
}

#[derive(Iden)]
enum WorkoutTagAssociation {
    Table,
    WorkoutId,
    TagId,
}
