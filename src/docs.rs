use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{
    AuthData, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, User, UserRole,
};
use crate::modules::movies::model::{
    CreateMovieRequest, Movie, MovieFilterParams, UpdateMovieRequest,
};
use crate::modules::uploads::model::{UploadedFile, UploadedMovieImage};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::update_profile,
        crate::modules::auth::controller::verify_email,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::movies::controller::get_movies,
        crate::modules::movies::controller::get_movie_by_id,
        crate::modules::movies::controller::create_movie,
        crate::modules::movies::controller::update_movie,
        crate::modules::movies::controller::delete_movie,
        crate::modules::uploads::controller::upload_profile_image,
        crate::modules::uploads::controller::upload_movie_image,
        crate::modules::uploads::controller::delete_file,
    ),
    components(
        schemas(
            User,
            UserRole,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            AuthData,
            Movie,
            CreateMovieRequest,
            UpdateMovieRequest,
            MovieFilterParams,
            UploadedFile,
            UploadedMovieImage,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, profile, and email flows"),
        (name = "Movies", description = "Movie catalog with filtering, sorting, and pagination"),
        (name = "Uploads", description = "Profile and movie image uploads")
    ),
    info(
        title = "Chill Movie API",
        version = "0.1.0",
        description = "REST API for the Chill Movie catalog: JWT authentication, movie CRUD with search and pagination, and image uploads.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
