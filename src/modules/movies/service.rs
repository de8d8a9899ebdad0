use sqlx::PgPool;
use tracing::{debug, error, instrument};

use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

use super::filter::{MovieQuery, SqlParam};
use super::model::{CreateMovieRequest, Movie, MovieFilterParams, UpdateMovieRequest, UpdateOutcome};

pub struct MovieService;

impl MovieService {
    /// List movies matching the filters. The count and data queries come
    /// from the same [`MovieQuery`], so `total` always agrees with the rows
    /// a windowless query would return.
    #[instrument(skip(db, filters))]
    pub async fn get_all(
        db: &PgPool,
        filters: MovieFilterParams,
    ) -> Result<(Vec<Movie>, PaginationMeta), AppError> {
        let query = MovieQuery::from_filters(&filters);

        let count_sql = query.count_sql();
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in query.params() {
            count_query = match param {
                SqlParam::Text(v) => count_query.bind(v.clone()),
                SqlParam::Int(v) => count_query.bind(*v),
                SqlParam::Float(v) => count_query.bind(*v),
            };
        }
        let total = count_query.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting movies");
            AppError::from(e)
        })?;

        let data_sql = query.data_sql();
        let mut data_query = sqlx::query_as::<_, Movie>(&data_sql);
        for param in query.params() {
            data_query = match param {
                SqlParam::Text(v) => data_query.bind(v.clone()),
                SqlParam::Int(v) => data_query.bind(*v),
                SqlParam::Float(v) => data_query.bind(*v),
            };
        }
        let movies = data_query.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching movies");
            AppError::from(e)
        })?;

        debug!(
            total = %total,
            returned = %movies.len(),
            page = %query.page(),
            "Movies fetched"
        );

        let meta = PaginationMeta::new(total, query.page(), query.limit());

        Ok((movies, meta))
    }

    pub async fn get_by_id(db: &PgPool, movie_id: i64) -> Result<Option<Movie>, AppError> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(movie_id)
            .fetch_optional(db)
            .await?;
        Ok(movie)
    }

    #[instrument(skip(db, dto), fields(movie.title = %dto.title))]
    pub async fn create(db: &PgPool, dto: CreateMovieRequest) -> Result<Movie, AppError> {
        let movie = sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (title, description, release_year, duration_min, rating, language, image_url, trailer_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.release_year)
        .bind(dto.duration_min)
        .bind(dto.rating)
        .bind(&dto.language)
        .bind(&dto.image_url)
        .bind(&dto.trailer_url)
        .fetch_one(db)
        .await?;

        debug!(movie.id = %movie.id, "Movie created");

        Ok(movie)
    }

    /// Partial update. Only provided fields enter the SET clause and
    /// `updated_at` is refreshed alongside them; zero provided fields is a
    /// caller error.
    #[instrument(skip(db, dto), fields(movie.id = %movie_id))]
    pub async fn update(
        db: &PgPool,
        movie_id: i64,
        dto: UpdateMovieRequest,
    ) -> Result<UpdateOutcome, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request("No fields to update"));
        }

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        if let Some(title) = dto.title {
            params.push(SqlParam::Text(title));
            sets.push(format!("title = ${}", params.len()));
        }
        if let Some(description) = dto.description {
            params.push(SqlParam::Text(description));
            sets.push(format!("description = ${}", params.len()));
        }
        if let Some(release_year) = dto.release_year {
            params.push(SqlParam::Int(release_year as i64));
            sets.push(format!("release_year = ${}", params.len()));
        }
        if let Some(duration_min) = dto.duration_min {
            params.push(SqlParam::Int(duration_min as i64));
            sets.push(format!("duration_min = ${}", params.len()));
        }
        if let Some(rating) = dto.rating {
            params.push(SqlParam::Float(rating));
            sets.push(format!("rating = ${}", params.len()));
        }
        if let Some(language) = dto.language {
            params.push(SqlParam::Text(language));
            sets.push(format!("language = ${}", params.len()));
        }
        if let Some(image_url) = dto.image_url {
            params.push(SqlParam::Text(image_url));
            sets.push(format!("image_url = ${}", params.len()));
        }
        if let Some(trailer_url) = dto.trailer_url {
            params.push(SqlParam::Text(trailer_url));
            sets.push(format!("trailer_url = ${}", params.len()));
        }

        sets.push("updated_at = NOW()".to_string());

        let sql = format!(
            "UPDATE movies SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            params.len() + 1
        );

        let mut query = sqlx::query_as::<_, Movie>(&sql);
        for param in &params {
            query = match param {
                SqlParam::Text(v) => query.bind(v.clone()),
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Float(v) => query.bind(*v),
            };
        }

        let updated = query.bind(movie_id).fetch_optional(db).await?;

        match updated {
            Some(movie) => {
                debug!(movie.id = %movie.id, "Movie updated");
                Ok(UpdateOutcome::Updated(movie))
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    #[instrument(skip(db), fields(movie.id = %movie_id))]
    pub async fn delete(db: &PgPool, movie_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(movie_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
