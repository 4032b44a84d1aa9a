//! Registration, login, logout and session refresh.
//!
//! [`AccountService`] owns every write to the credential table. Registration
//! creates the credential and its profile inside one database transaction, so
//! a failed profile insert rolls the credential back and no orphaned
//! credential can survive. Login and refresh overwrite the stored refresh
//! fingerprint; a user has at most one live refresh token.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionError, TransactionTrait,
};
use time::OffsetDateTime;

use crate::auth::{self, TokenSigner, fingerprint};
use crate::entity::{credential, profile};
use crate::error::{ApiError, ApiResult};

/// Everything a registration request must carry.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
    pub preferences: Vec<String>,
    pub location: String,
}

impl NewAccount {
    fn validate(&self) -> ApiResult<()> {
        if self.email.is_empty()
            || self.password.is_empty()
            || self.name.is_empty()
            || self.phone_number.is_empty()
            || self.location.is_empty()
        {
            return Err(ApiError::Validation("Missing required fields".to_string()));
        }
        if self.preferences.is_empty() {
            return Err(ApiError::Validation(
                "Preferences must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a successful registration.
pub struct RegisteredAccount {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    pub name: String,
}

/// Result of a successful login. `profile` is `None` for accounts that have
/// not finished onboarding.
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    pub profile: Option<profile::Model>,
}

/// A freshly rotated token pair.
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AccountService {
    db: Arc<DatabaseConnection>,
    signer: TokenSigner,
}

impl AccountService {
    pub fn new(db: Arc<DatabaseConnection>, signer: TokenSigner) -> Self {
        Self { db, signer }
    }

    /// Create a credential and its linked profile, returning a live session.
    ///
    /// Both inserts run in one transaction: if the profile insert fails the
    /// credential insert is rolled back with it and the failure is logged
    /// distinctly.
    pub async fn register(&self, new: NewAccount) -> ApiResult<RegisteredAccount> {
        new.validate()?;

        let access_token = self.signer.issue_access_token(&new.email)?;
        let refresh_token = self.signer.issue_refresh_token(&new.email)?;
        let refresh_token_hash = fingerprint(&refresh_token);

        let password_hash = auth::hash_password(&new.password).map_err(|e| {
            tracing::error!("password hashing failed: {e}");
            ApiError::Internal
        })?;

        let email = new.email.clone();
        let name = new.name.clone();

        let result = self
            .db
            .transaction::<_, (), ApiError>(|txn| {
                Box::pin(async move {
                    let existing = credential::Entity::find()
                        .filter(credential::Column::Email.eq(&new.email))
                        .one(txn)
                        .await?;
                    if existing.is_some() {
                        return Err(ApiError::Conflict("User already exists".to_string()));
                    }

                    let now = OffsetDateTime::now_utc();
                    let saved = credential::ActiveModel {
                        id: Set(uuid::Uuid::new_v4().to_string()),
                        email: Set(new.email.clone()),
                        password_hash: Set(password_hash),
                        refresh_token_hash: Set(Some(refresh_token_hash)),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    profile::ActiveModel {
                        id: Set(uuid::Uuid::new_v4().to_string()),
                        user_id: Set(saved.id),
                        name: Set(new.name),
                        phone_number: Set(new.phone_number),
                        preferences: Set(profile::encode_preferences(&new.preferences)),
                        location: Set(new.location),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            "profile insert failed during registration, rolling back credential: {e}"
                        );
                        ApiError::Internal
                    })?;

                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(RegisteredAccount {
                access_token,
                refresh_token,
                email,
                name,
            }),
            Err(TransactionError::Connection(e)) => {
                tracing::error!("registration transaction failed: {e}");
                Err(ApiError::Internal)
            }
            Err(TransactionError::Transaction(e)) => Err(e),
        }
    }

    /// Verify credentials, rotate the session and report onboarding state.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginOutcome> {
        let user = credential::Entity::find()
            .filter(credential::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if !auth::verify_password(password, &user.password_hash) {
            return Err(ApiError::Unauthorized("Invalid password".to_string()));
        }

        let access_token = self.signer.issue_access_token(email)?;
        let refresh_token = self.signer.issue_refresh_token(email)?;

        // Overwrites any previous session token: one live session per user.
        let user_id = user.id.clone();
        let user_email = user.email.clone();
        let mut active: credential::ActiveModel = user.into();
        active.refresh_token_hash = Set(Some(fingerprint(&refresh_token)));
        active.update(self.db.as_ref()).await?;

        let profile = profile::Entity::find()
            .filter(profile::Column::UserId.eq(&user_id))
            .one(self.db.as_ref())
            .await?;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            email: user_email,
            profile,
        })
    }

    /// Clear the stored refresh fingerprint so outstanding refresh tokens die
    /// on their next use. Idempotent for unknown identities.
    pub async fn logout(&self, email: &str) -> ApiResult<()> {
        let user = credential::Entity::find()
            .filter(credential::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;

        if let Some(user) = user {
            let mut active: credential::ActiveModel = user.into();
            active.refresh_token_hash = Set(None);
            active.update(self.db.as_ref()).await?;
        }

        Ok(())
    }

    /// Exchange a refresh token for a new pair, invalidating the one just
    /// presented (rotation-on-use).
    pub async fn refresh_session(&self, refresh_token: &str) -> ApiResult<TokenPair> {
        let email = self
            .signer
            .verify_refresh_token(refresh_token)
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

        let user = credential::Entity::find()
            .filter(credential::Column::Email.eq(&email))
            .one(self.db.as_ref())
            .await?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized(
                "Invalid refresh token request".to_string(),
            ));
        };
        let Some(stored_hash) = user.refresh_token_hash.clone() else {
            return Err(ApiError::Unauthorized(
                "Invalid refresh token request".to_string(),
            ));
        };

        // A rotated (already used) token no longer matches the stored
        // fingerprint and dies here.
        if fingerprint(refresh_token) != stored_hash {
            return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
        }

        let access_token = self.signer.issue_access_token(&email)?;
        let new_refresh_token = self.signer.issue_refresh_token(&email)?;

        let mut active: credential::ActiveModel = user.into();
        active.refresh_token_hash = Set(Some(fingerprint(&new_refresh_token)));
        active.update(self.db.as_ref()).await?;

        Ok(TokenPair {
            access_token,
            refresh_token: new_refresh_token,
        })
    }
}
