//! OpenAPI/Utoipa configuration.

use crate::api::{AUTH_TAG, CARDS_TAG, MISC_TAG, PROFILE_TAG};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

/// Security addon for OpenAPI documentation.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let bearer = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .description(Some(
                    "Use the access token obtained from `/api/auth/register`, `/api/auth/login` \
                     or `/api/auth/refresh-token` to authenticate.",
                ))
                .build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(bearer));
        }
    }
}

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "MacroMind API",
        version = "1.0.0",
        description = "Backend API for the MacroMind card-swiping app."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = AUTH_TAG, description = "Registration, login and session endpoints"),
        (name = PROFILE_TAG, description = "Profile management endpoints"),
        (name = CARDS_TAG, description = "Card feed endpoints")
    )
)]
pub struct ApiDoc;
