//! Card entity - a swipeable content item.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub image: String,
    pub data: String,
    /// Overlay label shown on a right swipe (e.g. "Like", "Invest").
    pub is_liked: String,
    /// Overlay label shown on a left swipe (e.g. "Pass", "Ignore").
    pub is_skipped: String,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
