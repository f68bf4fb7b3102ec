//! Create post table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Post::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Post::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Post::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Post::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Post::Text).text())
                    .col(ColumnDef::new(Post::Photos).json_binary().not_null().default("[]"))
                    .col(ColumnDef::new(Post::Videos).json_binary().not_null().default("[]"))
                    .col(ColumnDef::new(Post::Event).json_binary())
                    .col(ColumnDef::new(Post::Occasion).json_binary())
                    .col(ColumnDef::new(Post::JobOpening).json_binary())
                    .col(ColumnDef::new(Post::Document).json_binary())
                    .col(ColumnDef::new(Post::Trending).boolean().not_null().default(false))
                    .col(ColumnDef::new(Post::LikesCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Post::CommentsCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Post::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (author_id, id) for author feed pages
        manager
            .create_index(
                Index::create()
                    .name("idx_post_author_id_id")
                    .table(Post::Table)
                    .col(Post::AuthorId)
                    .col(Post::Id)
                    .to_owned(),
            )
            .await?;

        // Composite index: (category, id) for category feed pages
        manager
            .create_index(
                Index::create()
                    .name("idx_post_category_id")
                    .table(Post::Table)
                    .col(Post::Category)
                    .col(Post::Id)
                    .to_owned(),
            )
            .await?;

        // Index: trending (for the trending feed view)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_trending")
                    .table(Post::Table)
                    .col(Post::Trending)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
    AuthorId,
    Category,
    Kind,
    Text,
    Photos,
    Videos,
    Event,
    Occasion,
    JobOpening,
    Document,
    Trending,
    LikesCount,
    CommentsCount,
    CreatedAt,
}
