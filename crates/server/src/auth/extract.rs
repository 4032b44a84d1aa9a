//! Bearer-token extractor for protected routes.
//!
//! Handlers take `AuthUser(user)` as an argument; the identity context is an
//! explicit value in the signature rather than ambient request state.

use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::AppResources;
use crate::auth::tokens::TokenSigner;
use crate::entity::credential;
use crate::error::ApiError;

/// The authenticated caller, resolved from the access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Stable credential id.
    pub user_id: String,
    /// The user's email address.
    pub email: String,
}

/// Axum extractor that validates `Authorization: Bearer <access token>`.
///
/// # Example
///
/// ```ignore
/// async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     format!("Hello, {}", user.email)
/// }
/// ```
pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resources = parts
            .extensions
            .get::<AppResources>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AppResources not found in extensions");
                ApiError::Internal
            })?;

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => &header[7..],
            Some(_) => {
                return Err(ApiError::Unauthorized(
                    "Authorization header must use Bearer scheme".to_string(),
                ));
            }
            None => {
                return Err(ApiError::Unauthorized(
                    "Missing Authorization header".to_string(),
                ));
            }
        };

        let signer = TokenSigner::from_config(&resources.config.auth);
        let email = signer.verify_access_token(token)?;

        // The token may outlive the account state it was minted for; the
        // credential row is authoritative.
        let credential = credential::Entity::find()
            .filter(credential::Column::Email.eq(&email))
            .one(resources.db.as_ref())
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(AuthUser(CurrentUser {
            user_id: credential.id,
            email: credential.email,
        }))
    }
}
