//! Credential entity - one row per registered user.
//!
//! The password is stored only as an Argon2id hash and the refresh token only
//! as a SHA-256 fingerprint. No `Serialize` here: this row must never be
//! written to a response body as-is.

use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "credential")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    /// Fingerprint of the single active refresh token; `None` after logout.
    pub refresh_token_hash: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether a refresh token is currently outstanding for this user.
    pub fn has_active_session(&self) -> bool {
        self.refresh_token_hash.is_some()
    }
}
