//! Create reply table migration.
//!
//! Replies reference comments only; there is no self-reference, so the
//! one-level nesting rule is enforced by the schema itself.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reply::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reply::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reply::CommentId).string_len(32).not_null())
                    .col(ColumnDef::new(Reply::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Reply::Text).text().not_null())
                    .col(
                        ColumnDef::new(Reply::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reply_comment")
                            .from(Reply::Table, Reply::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (comment_id, id) for in-order reply listing
        manager
            .create_index(
                Index::create()
                    .name("idx_reply_comment_id_id")
                    .table(Reply::Table)
                    .col(Reply::CommentId)
                    .col(Reply::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reply::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reply {
    Table,
    Id,
    CommentId,
    AuthorId,
    Text,
    CreatedAt,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}
