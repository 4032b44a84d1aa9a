//! Registration, login, logout and token refresh endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::accounts::{AccountService, NewAccount};
use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorBody};

/// Tag for OpenAPI documentation.
pub const AUTH_TAG: &str = "Auth";

/// Creates the auth router.
pub fn router(accounts: AccountService) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
        .routes(routes!(logout))
        .routes(routes!(refresh_token))
        .with_state(accounts)
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub preferences: Option<Vec<String>>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogoutRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Minimal user-facing account fields. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_profile_complete: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// Whether the account has a profile yet; drives the client's
/// swipe-deck-vs-finish-setup routing after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStatus {
    Complete,
    IncompleteProfile,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub onboarding_status: OnboardingStatus,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AckResponse {
    pub message: String,
}

// =============================================================================
// Endpoints
// =============================================================================

/// Register a new account.
///
/// Creates the credential and its profile atomically: a registration either
/// leaves both records or neither.
#[tracing::instrument(skip(accounts, payload))]
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    operation_id = "Register",
    summary = "Register a new account with its profile",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; a session is already live", body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn register(
    State(accounts): State<AccountService>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let (Some(email), Some(password), Some(name), Some(phone_number), Some(preferences), Some(location)) = (
        payload.email,
        payload.password,
        payload.name,
        payload.phone_number,
        payload.preferences,
        payload.location,
    ) else {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    };

    let account = accounts
        .register(NewAccount {
            email,
            password,
            name,
            phone_number,
            preferences,
            location,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            access_token: account.access_token,
            refresh_token: account.refresh_token,
            user: UserSummary {
                email: account.email,
                name: Some(account.name),
                is_profile_complete: true,
            },
        }),
    ))
}

/// Log in with email + password.
#[tracing::instrument(skip(accounts, payload))]
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    operation_id = "Login",
    summary = "Authenticate and start a session",
    description = "Issues a fresh access/refresh pair and invalidates any previous session \
                   for this account. `onboarding_status` tells the client whether to show \
                   the swipe deck (`COMPLETE`) or the finish-setup screen (`INCOMPLETE_PROFILE`).",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Wrong password", body = ErrorBody),
        (status = 404, description = "No such account", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn login(
    State(accounts): State<AccountService>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let outcome = accounts.login(&email, &password).await?;

    let (onboarding_status, user) = match &outcome.profile {
        Some(profile) => (
            OnboardingStatus::Complete,
            UserSummary {
                email: outcome.email.clone(),
                name: Some(profile.name.clone()),
                is_profile_complete: true,
            },
        ),
        None => (
            OnboardingStatus::IncompleteProfile,
            UserSummary {
                email: outcome.email.clone(),
                name: None,
                is_profile_complete: false,
            },
        ),
    };

    Ok(Json(LoginResponse {
        access_token: outcome.access_token,
        refresh_token: outcome.refresh_token,
        onboarding_status,
        user,
    }))
}

/// Log out, invalidating the outstanding refresh token.
#[tracing::instrument(skip(accounts, _user, payload))]
#[utoipa::path(
    post,
    path = "/logout",
    tag = AUTH_TAG,
    operation_id = "Logout",
    summary = "End the current session",
    security(("bearer_auth" = [])),
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Session cleared", body = AckResponse),
        (status = 400, description = "Email missing from request", body = ErrorBody),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn logout(
    State(accounts): State<AccountService>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let Some(email) = payload.email else {
        return Err(ApiError::Validation("Email is required".to_string()));
    };

    accounts.logout(&email).await?;

    Ok(Json(AckResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Exchange a refresh token for a new token pair.
#[tracing::instrument(skip(accounts, payload))]
#[utoipa::path(
    post,
    path = "/refresh-token",
    tag = AUTH_TAG,
    operation_id = "Refresh Session",
    summary = "Rotate the session tokens",
    description = "Verifies the presented refresh token against the stored fingerprint and \
                   issues a new pair. Each refresh token is single-use: rotation immediately \
                   invalidates the token that was just presented.",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPairResponse),
        (status = 400, description = "Refresh token missing from request", body = ErrorBody),
        (status = 401, description = "Invalid, expired, reused or revoked refresh token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn refresh_token(
    State(accounts): State<AccountService>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let Some(refresh_token) = payload.refresh_token else {
        return Err(ApiError::Validation(
            "Refresh token is required".to_string(),
        ));
    };

    let pair = accounts.refresh_session(&refresh_token).await?;

    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}
