use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LiveBlogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LiveBlogs::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(LiveBlogs::Slug)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LiveBlogs::Title).string().not_null())
                    .col(ColumnDef::new(LiveBlogs::Excerpt).text())
                    .col(ColumnDef::new(LiveBlogs::Summary).text())
                    .col(
                        ColumnDef::new(LiveBlogs::IsLive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LiveBlogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LiveBlogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TimelineEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimelineEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimelineEntries::BlogId).uuid().not_null())
                    .col(
                        ColumnDef::new(TimelineEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimelineEntries::Content).text().not_null())
                    .col(ColumnDef::new(TimelineEntries::ImageUrl).string())
                    .col(ColumnDef::new(TimelineEntries::ImageAlt).string())
                    .col(ColumnDef::new(TimelineEntries::AuthorName).string())
                    .col(
                        ColumnDef::new(TimelineEntries::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timeline_entries_blog_id")
                            .from(TimelineEntries::Table, TimelineEntries::BlogId)
                            .to(LiveBlogs::Table, LiveBlogs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the incremental poll: WHERE blog_id = ? AND created_at > ?
        manager
            .create_index(
                Index::create()
                    .name("idx_timeline_entries_blog_created")
                    .table(TimelineEntries::Table)
                    .col(TimelineEntries::BlogId)
                    .col(TimelineEntries::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimelineEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LiveBlogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LiveBlogs {
    Table,
    Id,
    Slug,
    Title,
    Excerpt,
    Summary,
    IsLive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TimelineEntries {
    Table,
    Id,
    BlogId,
    CreatedAt,
    Content,
    ImageUrl,
    ImageAlt,
    AuthorName,
    IsPinned,
}
