//! Timeline entry entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "timeline_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub blog_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub author_name: Option<String>,
    pub is_pinned: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::live_blog::Entity",
        from = "Column::BlogId",
        to = "super::live_blog::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    LiveBlog,
}

impl Related<super::live_blog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LiveBlog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain TimelineEntry.
impl From<Model> for newsdesk_core::domain::TimelineEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            blog_id: model.blog_id,
            created_at: model.created_at.into(),
            content: model.content,
            image_url: model.image_url,
            image_alt: model.image_alt,
            author_name: model.author_name,
            is_pinned: model.is_pinned,
        }
    }
}

/// Conversion from Domain TimelineEntry to SeaORM ActiveModel.
impl From<newsdesk_core::domain::TimelineEntry> for ActiveModel {
    fn from(entry: newsdesk_core::domain::TimelineEntry) -> Self {
        Self {
            id: Set(entry.id),
            blog_id: Set(entry.blog_id),
            created_at: Set(entry.created_at.into()),
            content: Set(entry.content),
            image_url: Set(entry.image_url),
            image_alt: Set(entry.image_alt),
            author_name: Set(entry.author_name),
            is_pinned: Set(entry.is_pinned),
        }
    }
}
