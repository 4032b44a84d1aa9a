//! Card feed endpoints: the swipeable content items.

use axum::{Extension, Json, http::StatusCode};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::AppResources;
use crate::auth::AuthUser;
use crate::entity::card;
use crate::error::{ApiError, ErrorBody};

/// Tag for OpenAPI documentation.
pub const CARDS_TAG: &str = "Cards";

/// Creates the cards router.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(list_cards, create_card))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCardRequest {
    pub image: Option<String>,
    pub data: Option<String>,
    pub is_liked: Option<String>,
    pub is_skipped: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardResponse {
    pub id: String,
    pub image: String,
    pub data: String,
    /// Overlay label for a right swipe.
    pub is_liked: String,
    /// Overlay label for a left swipe.
    pub is_skipped: String,
}

impl From<card::Model> for CardResponse {
    fn from(model: card::Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
            data: model.data,
            is_liked: model.is_liked,
            is_skipped: model.is_skipped,
        }
    }
}

/// List all cards in the deck.
#[tracing::instrument(skip(resources, _user))]
#[utoipa::path(
    get,
    path = "/",
    tag = CARDS_TAG,
    operation_id = "List Cards",
    summary = "List all swipe cards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All cards", body = [CardResponse]),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn list_cards(
    Extension(resources): Extension<AppResources>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<CardResponse>>, ApiError> {
    let cards = card::Entity::find().all(resources.db.as_ref()).await?;

    Ok(Json(cards.into_iter().map(CardResponse::from).collect()))
}

/// Add a card to the deck.
#[tracing::instrument(skip(resources, _user, payload))]
#[utoipa::path(
    post,
    path = "/",
    tag = CARDS_TAG,
    operation_id = "Create Card",
    summary = "Create a swipe card",
    security(("bearer_auth" = [])),
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card created", body = CardResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn create_card(
    Extension(resources): Extension<AppResources>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let (Some(image), Some(data), Some(is_liked), Some(is_skipped)) =
        (payload.image, payload.data, payload.is_liked, payload.is_skipped)
    else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let saved = card::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        image: Set(image),
        data: Set(data),
        is_liked: Set(is_liked),
        is_skipped: Set(is_skipped),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(resources.db.as_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(CardResponse::from(saved))))
}
