//! Profile entity - swipe-deck display attributes, one per credential.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning credential id. Unique: one profile per user.
    #[sea_orm(unique)]
    pub user_id: String,
    pub name: String,
    pub phone_number: String,
    /// JSON array of preference tags (e.g. "sports", "economics").
    #[sea_orm(column_type = "Text")]
    pub preferences: String,
    pub location: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::credential::Entity",
        from = "Column::UserId",
        to = "super::credential::Column::Id"
    )]
    Credential,
}

impl Related<super::credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credential.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse the stored preference tags from their JSON column.
    pub fn preferences_list(&self) -> Vec<String> {
        serde_json::from_str(&self.preferences).unwrap_or_default()
    }
}

/// Encode preference tags for the JSON text column.
pub fn encode_preferences(preferences: &[String]) -> String {
    serde_json::to_string(preferences).unwrap_or_else(|_| "[]".to_string())
}
