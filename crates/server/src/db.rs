//! Database schema bootstrap.
//!
//! Tables are created idempotently from the entity definitions at startup.
//! Works against both Postgres and SQLite backends.

use sea_orm::{ConnectionTrait, DbErr, Schema};

use crate::entity;

/// Create all tables if they do not exist yet.
pub async fn create_tables(db: &impl ConnectionTrait) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(entity::credential::Entity),
        schema.create_table_from_entity(entity::profile::Entity),
        schema.create_table_from_entity(entity::card::Entity),
    ];

    for mut statement in statements {
        statement.if_not_exists();
        db.execute(backend.build(&statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, EntityTrait};

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.expect("connect");
        create_tables(&db).await.expect("first bootstrap");
        create_tables(&db).await.expect("second bootstrap");

        let card = entity::card::ActiveModel {
            id: Set("card-1".into()),
            image: Set("https://example.org/a.jpg".into()),
            data: Set("data".into()),
            is_liked: Set("Like".into()),
            is_skipped: Set("Pass".into()),
            created_at: Set(time::OffsetDateTime::now_utc()),
        };
        card.insert(&db).await.expect("insert card");

        let cards = entity::card::Entity::find().all(&db).await.expect("find");
        assert_eq!(cards.len(), 1);
    }
}
