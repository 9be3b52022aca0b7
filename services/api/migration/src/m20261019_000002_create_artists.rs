use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artists::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artists::RefUserId).big_integer().null())
                    .col(ColumnDef::new(Artists::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Artists::Bio).text().not_null())
                    .col(ColumnDef::new(Artists::Genre).string_len(100).null())
                    .col(ColumnDef::new(Artists::Country).string_len(100).null())
                    .col(ColumnDef::new(Artists::DebutYear).string_len(4).null())
                    .col(ColumnDef::new(Artists::Website).string_len(255).null())
                    .col(ColumnDef::new(Artists::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Artists::Phone).string_len(20).null())
                    .col(ColumnDef::new(Artists::ProfileImage).string_len(255).null())
                    .col(
                        ColumnDef::new(Artists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Artists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Artists::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Artists::Table, Artists::RefUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Artists::Table)
                    .col(Artists::RefUserId)
                    .name("idx_artists_ref_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Artists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Artists {
    Table,
    Id,
    RefUserId,
    Name,
    Bio,
    Genre,
    Country,
    DebutYear,
    Website,
    Email,
    Phone,
    ProfileImage,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
