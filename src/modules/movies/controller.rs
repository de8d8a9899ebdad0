use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

use super::model::{CreateMovieRequest, Movie, MovieFilterParams, UpdateMovieRequest, UpdateOutcome};
use super::service::MovieService;

/// List movies with filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/movies",
    params(
        ("search" = Option<String>, Query, description = "Substring match against title or description"),
        ("genre" = Option<String>, Query, description = "Genre name or slug"),
        ("year" = Option<String>, Query, description = "Exact release year"),
        ("rating_min" = Option<String>, Query, description = "Minimum rating, inclusive"),
        ("rating_max" = Option<String>, Query, description = "Maximum rating, inclusive"),
        ("language" = Option<String>, Query, description = "Exact language match"),
        ("sort" = Option<String>, Query, description = "One of: title, rating, release_year, created_at, id"),
        ("order" = Option<String>, Query, description = "ASC or DESC (default DESC)"),
        ("limit" = Option<String>, Query, description = "Page size, 1-100 (default 20)"),
        ("page" = Option<String>, Query, description = "Page number, from 1")
    ),
    responses(
        (status = 200, description = "Paged movie list", body = [Movie]),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, filters))]
pub async fn get_movies(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<MovieFilterParams>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, AppError> {
    let (movies, pagination) = MovieService::get_all(&state.db, filters).await?;

    Ok(Json(ApiResponse::paginated(
        movies,
        pagination,
        "Movies fetched successfully",
    )))
}

/// Get a single movie by id
#[utoipa::path(
    get,
    path = "/api/movie/{id}",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie details", body = Movie),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies"
)]
#[instrument(skip(state))]
pub async fn get_movie_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Movie>>, AppError> {
    let movie = MovieService::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie not found"))?;

    Ok(Json(ApiResponse::data(movie)))
}

/// Create a movie (admin only)
#[utoipa::path(
    post,
    path = "/api/movie",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = Movie),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateMovieRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Movie>>), AppError> {
    let movie = MovieService::create(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(movie, "Movie created successfully")),
    ))
}

/// Update a movie (admin only)
#[utoipa::path(
    patch,
    path = "/api/movie/{id}",
    params(("id" = i64, Path, description = "Movie id")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = Movie),
        (status = 400, description = "Validation failure or no fields provided"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateMovieRequest>,
) -> Result<Json<ApiResponse<Movie>>, AppError> {
    match MovieService::update(&state.db, id, dto).await? {
        UpdateOutcome::Updated(movie) => Ok(Json(ApiResponse::with_message(
            movie,
            "Movie updated successfully",
        ))),
        UpdateOutcome::NotFound => Err(AppError::not_found("Movie not found")),
    }
}

/// Delete a movie (admin only)
#[utoipa::path(
    delete,
    path = "/api/movie/{id}",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let deleted = MovieService::delete(&state.db, id).await?;

    if !deleted {
        return Err(AppError::not_found("Movie not found"));
    }

    Ok(Json(ApiResponse::message("Movie deleted successfully")))
}
