use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Follows::FanId).big_integer().not_null())
                    .col(ColumnDef::new(Follows::TargetKind).string_len(16).not_null())
                    .col(ColumnDef::new(Follows::TargetId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Follows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // One edge per (fan, target): the database rejects duplicates.
                    .primary_key(
                        Index::create()
                            .col(Follows::FanId)
                            .col(Follows::TargetKind)
                            .col(Follows::TargetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Follows::Table, Follows::FanId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(Follows::TargetKind).is_in(["user", "artist"]))
                    .to_owned(),
            )
            .await?;

        // Follower counts and listings filter by target.
        manager
            .create_index(
                Index::create()
                    .table(Follows::Table)
                    .col(Follows::TargetKind)
                    .col(Follows::TargetId)
                    .col(Follows::CreatedAt)
                    .name("idx_follows_target")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Follows {
    Table,
    FanId,
    TargetKind,
    TargetId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
