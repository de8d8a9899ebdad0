mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    attach_genre, create_admin_with_token, create_test_movie, create_user_with_token,
    setup_test_app,
};

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn authed_json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Collect the ids returned for a listing request.
async fn listed_ids(app: &axum::Router, uri: &str, token: &str) -> Vec<i64> {
    let response = app.clone().oneshot(authed_get(uri, token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|movie| movie["id"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_then_fetch_round_trips(pool: PgPool) {
    let (_admin, token) = create_admin_with_token(&pool).await;
    let app = setup_test_app(pool).await;

    let request = authed_json_request(
        "POST",
        "/api/movie",
        &token,
        json!({
            "title": "Dune",
            "description": "Spice and sand",
            "release_year": 2021,
            "duration_min": 155,
            "rating": 8.5,
            "language": "en",
            "image_url": "https://example.com/dune.jpg",
            "trailer_url": "https://example.com/dune-trailer"
        }),
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/movie/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(response).await;
    assert_eq!(fetched["data"]["title"], "Dune");
    assert_eq!(fetched["data"]["description"], "Spice and sand");
    assert_eq!(fetched["data"]["release_year"], 2021);
    assert_eq!(fetched["data"]["duration_min"], 155);
    assert_eq!(fetched["data"]["rating"], 8.5);
    assert_eq!(fetched["data"]["language"], "en");
    assert_eq!(fetched["data"]["image_url"], "https://example.com/dune.jpg");
    assert_eq!(
        fetched["data"]["trailer_url"],
        "https://example.com/dune-trailer"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_movie_requires_admin_role(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;
    let app = setup_test_app(pool).await;

    let request = authed_json_request("POST", "/api/movie", &token, json!({"title": "Nope"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_movie_requires_token(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/movie")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"title":"Nope"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_movie_validation(pool: PgPool) {
    let (_admin, token) = create_admin_with_token(&pool).await;
    let app = setup_test_app(pool).await;

    let request = authed_json_request(
        "POST",
        "/api/movie",
        &token,
        json!({"title": "", "rating": 11.0}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["errors"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_movie_not_found(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/movie/999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_nonexistent_movie_returns_404(pool: PgPool) {
    let (_admin, token) = create_admin_with_token(&pool).await;
    let app = setup_test_app(pool).await;

    let request = authed_json_request(
        "PATCH",
        "/api/movie/999999",
        &token,
        json!({"title": "Ghost"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_movie_partial(pool: PgPool) {
    let (_admin, token) = create_admin_with_token(&pool).await;
    let movie = create_test_movie(&pool, "Original Title", Some(2000), Some(5.0)).await;

    let app = setup_test_app(pool).await;

    let request = authed_json_request(
        "PATCH",
        &format!("/api/movie/{}", movie.id),
        &token,
        json!({"rating": 9.1}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["rating"], 9.1);
    // Fields outside the patch are untouched.
    assert_eq!(body["data"]["title"], "Original Title");
    assert_eq!(body["data"]["release_year"], 2000);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_movie_no_fields(pool: PgPool) {
    let (_admin, token) = create_admin_with_token(&pool).await;
    let movie = create_test_movie(&pool, "Unchanged", None, None).await;

    let app = setup_test_app(pool).await;

    let request = authed_json_request(
        "PATCH",
        &format!("/api/movie/{}", movie.id),
        &token,
        json!({}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_movie(pool: PgPool) {
    let (_admin, token) = create_admin_with_token(&pool).await;
    let movie = create_test_movie(&pool, "Doomed", None, None).await;

    let app = setup_test_app(pool).await;

    let uri = format!("/api/movie/{}", movie.id);
    let request = Request::builder()
        .method("DELETE")
        .uri(uri.as_str())
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A second delete finds nothing.
    let request = Request::builder()
        .method("DELETE")
        .uri(uri.as_str())
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_movies_requires_token(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/movies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_movies_dune_scenario(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;
    create_test_movie(&pool, "Dune", Some(2021), Some(8.5)).await;
    create_test_movie(&pool, "Old Classic", Some(1975), Some(9.0)).await;

    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(authed_get(
            "/api/movies?year=2021&sort=rating&order=DESC&limit=5&page=1",
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|movie| movie["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Dune"));
    assert!(!titles.contains(&"Old Classic"));
    assert!(body["pagination"]["total"].as_i64().unwrap() >= 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_pagination_total_and_disjoint_pages(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;
    for i in 0..7 {
        create_test_movie(&pool, &format!("Movie {}", i), Some(2000 + i), None).await;
    }

    let app = setup_test_app(pool).await;

    let all_ids = listed_ids(&app, "/api/movies?limit=100", &token).await;
    assert_eq!(all_ids.len(), 7);

    let page1 = listed_ids(&app, "/api/movies?limit=3&page=1", &token).await;
    let page2 = listed_ids(&app, "/api/movies?limit=3&page=2", &token).await;
    let page3 = listed_ids(&app, "/api/movies?limit=3&page=3", &token).await;

    assert_eq!(page1.len(), 3);
    assert_eq!(page2.len(), 3);
    assert_eq!(page3.len(), 1);

    // Pages are disjoint and, concatenated, reproduce the unpaged ordering.
    let mut combined = page1.clone();
    combined.extend(&page2);
    combined.extend(&page3);
    assert_eq!(combined, all_ids);

    let response = app
        .oneshot(authed_get("/api/movies?limit=3&page=1", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 7);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_unknown_sort_falls_back_to_id_desc(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;
    let a = create_test_movie(&pool, "Alpha", None, None).await;
    let b = create_test_movie(&pool, "Beta", None, None).await;
    let c = create_test_movie(&pool, "Gamma", None, None).await;

    let app = setup_test_app(pool).await;

    let ids = listed_ids(&app, "/api/movies?sort=bogus_column", &token).await;

    assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_sort_by_rating_ascending(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;
    let low = create_test_movie(&pool, "Low", None, Some(2.0)).await;
    let high = create_test_movie(&pool, "High", None, Some(9.0)).await;
    let mid = create_test_movie(&pool, "Mid", None, Some(5.5)).await;

    let app = setup_test_app(pool).await;

    let ids = listed_ids(&app, "/api/movies?sort=rating&order=asc", &token).await;

    assert_eq!(ids, vec![low.id, mid.id, high.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_search_matches_title_and_description(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;

    let by_title = create_test_movie(&pool, "The Spice Wars", None, None).await;
    let by_description =
        sqlx::query_as::<_, chillmovie::modules::movies::model::Movie>(
            "INSERT INTO movies (title, description) VALUES ($1, $2) RETURNING *",
        )
        .bind("Unrelated Title")
        .bind("A story about spice traders")
        .fetch_one(&pool)
        .await
        .unwrap();
    create_test_movie(&pool, "No Match Here", None, None).await;

    let app = setup_test_app(pool).await;

    let ids = listed_ids(&app, "/api/movies?search=spice", &token).await;

    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&by_title.id));
    assert!(ids.contains(&by_description.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_rating_bounds_are_inclusive(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;
    create_test_movie(&pool, "Too Low", None, Some(3.0)).await;
    let exact_min = create_test_movie(&pool, "Exact Min", None, Some(5.0)).await;
    let exact_max = create_test_movie(&pool, "Exact Max", None, Some(8.0)).await;
    create_test_movie(&pool, "Too High", None, Some(9.5)).await;

    let app = setup_test_app(pool).await;

    let ids = listed_ids(&app, "/api/movies?rating_min=5&rating_max=8", &token).await;

    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&exact_min.id));
    assert!(ids.contains(&exact_max.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_genre_filter_joins_without_duplicates(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;

    let tagged = create_test_movie(&pool, "Tagged", None, None).await;
    attach_genre(&pool, tagged.id, "Science Fiction", "sci-fi").await;
    attach_genre(&pool, tagged.id, "Adventure", "adventure").await;
    create_test_movie(&pool, "Untagged", None, None).await;

    let app = setup_test_app(pool).await;

    // Filter by slug.
    let ids = listed_ids(&app, "/api/movies?genre=sci-fi", &token).await;
    assert_eq!(ids, vec![tagged.id]);

    // Filter by display name (URL-encoded space).
    let ids = listed_ids(&app, "/api/movies?genre=Science%20Fiction", &token).await;
    assert_eq!(ids, vec![tagged.id]);

    let response = app
        .oneshot(authed_get("/api/movies?genre=sci-fi", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_non_numeric_params_fall_back_to_defaults(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;
    create_test_movie(&pool, "Still Listed", Some(2010), None).await;

    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(authed_get(
            "/api/movies?limit=abc&page=xyz&year=notayear&rating_min=high",
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 20);
    // The unparsable year/rating filters are ignored entirely.
    assert_eq!(body["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_limit_is_capped_at_100(pool: PgPool) {
    let (_user, token) = create_user_with_token(&pool).await;

    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(authed_get("/api/movies?limit=5000", &token))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["pagination"]["limit"], 100);
}
