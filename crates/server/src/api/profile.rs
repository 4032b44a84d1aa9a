//! Profile CRUD endpoints. All routes require a valid access token.

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::AppResources;
use crate::api::auth::AckResponse;
use crate::auth::AuthUser;
use crate::entity::profile;
use crate::error::{ApiError, ErrorBody};

/// Tag for OpenAPI documentation.
pub const PROFILE_TAG: &str = "Profile";

/// Creates the profile router.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_profile, list_profiles))
        .routes(routes!(my_profile))
        .routes(routes!(get_profile, update_profile, delete_profile))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub preferences: Option<Vec<String>>,
    pub location: Option<String>,
}

/// Partial update: only provided fields change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub preferences: Option<Vec<String>>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub phone_number: String,
    /// Present only on `/me`, joined from the credential record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub preferences: Vec<String>,
    pub location: String,
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl ProfileResponse {
    fn from_model(model: profile::Model, email: Option<String>) -> Self {
        let preferences = model.preferences_list();
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            phone_number: model.phone_number,
            email,
            preferences,
            location: model.location,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// =============================================================================
// Endpoints
// =============================================================================

/// Create the caller's profile (onboarding completion).
#[tracing::instrument(skip(resources, user, payload))]
#[utoipa::path(
    post,
    path = "/",
    tag = PROFILE_TAG,
    operation_id = "Create Profile",
    summary = "Create the caller's profile",
    security(("bearer_auth" = [])),
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Missing fields or empty preferences", body = ErrorBody),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 409, description = "Profile already exists for this user", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn create_profile(
    Extension(resources): Extension<AppResources>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let (Some(name), Some(phone_number), Some(preferences), Some(location)) = (
        payload.name,
        payload.phone_number,
        payload.preferences,
        payload.location,
    ) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };
    if preferences.is_empty() {
        return Err(ApiError::Validation(
            "Preferences must not be empty".to_string(),
        ));
    }

    let existing = profile::Entity::find()
        .filter(profile::Column::UserId.eq(&user.user_id))
        .one(resources.db.as_ref())
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Profile already exists for this user".to_string(),
        ));
    }

    let now = OffsetDateTime::now_utc();
    let saved = profile::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(user.user_id),
        name: Set(name),
        phone_number: Set(phone_number),
        preferences: Set(profile::encode_preferences(&preferences)),
        location: Set(location),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(resources.db.as_ref())
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse::from_model(saved, None)),
    ))
}

/// Fetch the caller's own profile, including the account email.
#[tracing::instrument(skip(resources, user))]
#[utoipa::path(
    get,
    path = "/me",
    tag = PROFILE_TAG,
    operation_id = "Get Own Profile",
    summary = "Fetch the caller's profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 404, description = "No profile yet", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn my_profile(
    Extension(resources): Extension<AppResources>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = profile::Entity::find()
        .filter(profile::Column::UserId.eq(&user.user_id))
        .one(resources.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse::from_model(profile, Some(user.email))))
}

/// Fetch a profile by id.
#[tracing::instrument(skip(resources, _user))]
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PROFILE_TAG,
    operation_id = "Get Profile",
    summary = "Fetch a profile by id",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "The profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 404, description = "Profile not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn get_profile(
    Extension(resources): Extension<AppResources>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = profile::Entity::find_by_id(&id)
        .one(resources.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse::from_model(profile, None)))
}

/// List all profiles.
#[tracing::instrument(skip(resources, _user))]
#[utoipa::path(
    get,
    path = "/",
    tag = PROFILE_TAG,
    operation_id = "List Profiles",
    summary = "List all profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All profiles", body = [ProfileResponse]),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn list_profiles(
    Extension(resources): Extension<AppResources>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let profiles = profile::Entity::find().all(resources.db.as_ref()).await?;

    Ok(Json(
        profiles
            .into_iter()
            .map(|p| ProfileResponse::from_model(p, None))
            .collect(),
    ))
}

/// Partially update a profile.
#[tracing::instrument(skip(resources, _user, payload))]
#[utoipa::path(
    put,
    path = "/{id}",
    tag = PROFILE_TAG,
    operation_id = "Update Profile",
    summary = "Update a profile (partial merge)",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Profile id")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Empty preferences", body = ErrorBody),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 404, description = "Profile not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn update_profile(
    Extension(resources): Extension<AppResources>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = profile::Entity::find_by_id(&id)
        .one(resources.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let mut active: profile::ActiveModel = profile.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(preferences) = payload.preferences {
        if preferences.is_empty() {
            return Err(ApiError::Validation(
                "Preferences must not be empty".to_string(),
            ));
        }
        active.preferences = Set(profile::encode_preferences(&preferences));
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    let updated = active.update(resources.db.as_ref()).await?;

    Ok(Json(ProfileResponse::from_model(updated, None)))
}

/// Delete a profile. The credential stays; the account can onboard again.
#[tracing::instrument(skip(resources, _user))]
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PROFILE_TAG,
    operation_id = "Delete Profile",
    summary = "Delete a profile",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile deleted", body = AckResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorBody),
        (status = 404, description = "Profile not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    )
)]
pub async fn delete_profile(
    Extension(resources): Extension<AppResources>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<AckResponse>, ApiError> {
    let result = profile::Entity::delete_by_id(&id)
        .exec(resources.db.as_ref())
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Profile not found".to_string()));
    }

    Ok(Json(AckResponse {
        message: "Profile deleted successfully".to_string(),
    }))
}
