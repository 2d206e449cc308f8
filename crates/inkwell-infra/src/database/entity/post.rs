//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::PostStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub preview_img_url: String,
    /// Two-letter [`PostStatus`] code.
    pub status: String,
    pub post_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl TryFrom<Model> for inkwell_core::domain::Post {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: PostStatus = model
            .status
            .parse()
            .map_err(|e: inkwell_core::domain::UnknownStatus| DbErr::Type(e.to_string()))?;

        Ok(Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            description: model.description,
            content: model.content,
            preview_img_url: model.preview_img_url,
            status,
            post_date: model.post_date.into(),
            modified_date: model.modified_date.into(),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<inkwell_core::domain::Post> for ActiveModel {
    fn from(post: inkwell_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            description: Set(post.description),
            content: Set(post.content),
            preview_img_url: Set(post.preview_img_url),
            status: Set(post.status.code().to_string()),
            post_date: Set(post.post_date.into()),
            modified_date: Set(post.modified_date.into()),
        }
    }
}
