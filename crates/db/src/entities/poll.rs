//! Poll entity for post polls.
//!
//! Tallies are not stored here; they are derived from `poll_vote` rows so
//! that the vote count and the voter set cannot diverge.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: String,

    /// Poll question
    pub question: String,

    /// Poll options (JSON array of 2-4 distinct strings)
    #[sea_orm(column_type = "Json")]
    pub options: JsonValue,

    /// When the poll closes
    pub ends_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the poll has ended relative to `now`.
    ///
    /// Single source of truth for expiry; both the vote path and the
    /// results path go through this check.
    #[must_use]
    pub fn is_ended(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.ends_at < now
    }

    /// Poll options decoded from their JSON column.
    pub fn option_texts(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_value(self.options.clone())
    }
}
