//! Migration: Create users table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null().default(""))
                    .col(ColumnDef::new(Users::FullName).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Biography).text().not_null().default(""))
                    .col(ColumnDef::new(Users::Gender).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Active).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::Blocked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::Language).string().not_null().default(""))
                    .col(ColumnDef::new(Users::ConfirmEmail).string().not_null().default(""))
                    .col(ColumnDef::new(Users::AcceptTerms).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::Birthdate).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Phone).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Roles).text().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Default listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_users_created_at")
                    .table(Users::Table)
                    .col(Users::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    DisplayName,
    FullName,
    Biography,
    Gender,
    Active,
    Blocked,
    Language,
    ConfirmEmail,
    AcceptTerms,
    Birthdate,
    Phone,
    Roles,
    CreatedAt,
    UpdatedAt,
}
