use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::utils::pagination::PaginationParams;
use crate::utils::serde::{deserialize_lenient_f64, deserialize_lenient_i32};

/// A catalog entry. `title` is the only required field; everything else is
/// metadata that may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub duration_min: Option<i32>,
    pub rating: Option<f64>,
    pub language: Option<String>,
    pub image_url: Option<String>,
    pub trailer_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = validate_release_year))]
    pub release_year: Option<i32>,
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub duration_min: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
    pub rating: Option<f64>,
    #[validate(length(max = 50, message = "Language must be at most 50 characters"))]
    pub language: Option<String>,
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "Invalid trailer URL"))]
    pub trailer_url: Option<String>,
}

/// Partial update: only the provided fields are written.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMovieRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = validate_release_year))]
    pub release_year: Option<i32>,
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub duration_min: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
    pub rating: Option<f64>,
    #[validate(length(max = 50, message = "Language must be at most 50 characters"))]
    pub language: Option<String>,
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "Invalid trailer URL"))]
    pub trailer_url: Option<String>,
}

impl UpdateMovieRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.release_year.is_none()
            && self.duration_min.is_none()
            && self.rating.is_none()
            && self.language.is_none()
            && self.image_url.is_none()
            && self.trailer_url.is_none()
    }
}

/// Listing filters. Numeric values arrive as query-string text; anything
/// unparsable coerces to absent instead of failing the request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MovieFilterParams {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i32")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub rating_min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub rating_max: Option<f64>,
    pub sort: Option<String>,
    pub order: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Outcome of an update, keeping "nothing matched" distinct from a row that
/// happened to be written with identical values.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(Movie),
    NotFound,
}

fn validate_release_year(year: i32) -> Result<(), ValidationError> {
    let max_year = chrono::Utc::now().year() + 5;
    if (1900..=max_year).contains(&year) {
        Ok(())
    } else {
        let mut err = ValidationError::new("release_year_range");
        err.message = Some(format!("Release year must be between 1900 and {}", max_year).into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create_request() -> CreateMovieRequest {
        CreateMovieRequest {
            title: "Dune".to_string(),
            description: Some("Spice and sand".to_string()),
            release_year: Some(2021),
            duration_min: Some(155),
            rating: Some(8.5),
            language: Some("en".to_string()),
            image_url: Some("https://example.com/dune.jpg".to_string()),
            trailer_url: Some("https://example.com/dune-trailer".to_string()),
        }
    }

    #[test]
    fn test_create_request_valid() {
        assert!(valid_create_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_empty_title() {
        let dto = CreateMovieRequest {
            title: String::new(),
            ..valid_create_request()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_request_rating_out_of_range() {
        let dto = CreateMovieRequest {
            rating: Some(10.5),
            ..valid_create_request()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_request_release_year_bounds() {
        let dto = CreateMovieRequest {
            release_year: Some(1899),
            ..valid_create_request()
        };
        assert!(dto.validate().is_err());

        let dto = CreateMovieRequest {
            release_year: Some(chrono::Utc::now().year() + 6),
            ..valid_create_request()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_request_bad_url() {
        let dto = CreateMovieRequest {
            image_url: Some("not a url".to_string()),
            ..valid_create_request()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_request_is_empty() {
        let dto = UpdateMovieRequest {
            title: None,
            description: None,
            release_year: None,
            duration_min: None,
            rating: None,
            language: None,
            image_url: None,
            trailer_url: None,
        };
        assert!(dto.is_empty());
    }
}
