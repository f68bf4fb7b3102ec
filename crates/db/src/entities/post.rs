//! Post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Post categories (fixed enumeration).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[sea_orm(string_value = "startup_essentials")]
    StartupEssentials,
    #[sea_orm(string_value = "marketing_branding")]
    MarketingBranding,
    #[sea_orm(string_value = "legal_compliance")]
    LegalCompliance,
    #[sea_orm(string_value = "finance_investment")]
    FinanceInvestment,
    #[sea_orm(string_value = "sales_customer_acquisition")]
    SalesCustomerAcquisition,
    #[sea_orm(string_value = "technology_tools")]
    TechnologyTools,
    #[sea_orm(string_value = "inspirations")]
    Inspirations,
}

/// Post kind tag, indicating which payload fields are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum PostKind {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "media")]
    Media,
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "occasion")]
    Occasion,
    #[sea_orm(string_value = "job_opening")]
    JobOpening,
    #[sea_orm(string_value = "poll")]
    Poll,
    #[sea_orm(string_value = "document")]
    Document,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author user ID (opaque reference to the external user provider)
    #[sea_orm(indexed)]
    pub author_id: String,

    /// Category this post is filed under
    pub category: Category,

    /// Which payload fields are populated
    pub kind: PostKind,

    /// Post text content
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,

    /// Photo URLs (opaque strings from the media storage provider)
    #[sea_orm(column_type = "JsonBinary")]
    pub photos: Json,

    /// Video URLs (opaque strings from the media storage provider)
    #[sea_orm(column_type = "JsonBinary")]
    pub videos: Json,

    /// Event payload (title, date, location, ...)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub event: Option<Json>,

    /// Occasion payload
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub occasion: Option<Json>,

    /// Job opening payload
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub job_opening: Option<Json>,

    /// Document payload (name + URL)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub document: Option<Json>,

    /// Moderation-controlled trending flag, orthogonal to engagement
    #[sea_orm(default_value = false)]
    pub trending: bool,

    /// Like count (denormalized display counter)
    #[sea_orm(default_value = 0)]
    pub likes_count: i32,

    /// Comment count (denormalized display counter)
    #[sea_orm(default_value = 0)]
    pub comments_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,

    #[sea_orm(has_many = "super::post_like::Entity")]
    PostLike,

    #[sea_orm(has_one = "super::poll::Entity")]
    Poll,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostLike.def()
    }
}

impl Related<super::poll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Poll.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
