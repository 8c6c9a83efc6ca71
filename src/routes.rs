use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::{
    AppState,
    cors::{self, OriginPolicy},
    error::{AppError, AppResult},
    models::{GenreQuery, Message, Movie, MoviePatch, NewMovie},
    schema::{Issue, MOVIE_SCHEMA, Mode},
};

type JsonBody = WithRejection<Json<Value>, AppError>;

pub fn router(state: Arc<AppState>, origins: OriginPolicy) -> Router {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{id}", get(get_movie).delete(delete_movie).patch(update_movie))
        .with_state(state)
        .layer(origins.layer())
        .layer(middleware::from_fn_with_state(origins, cors::enforce))
        .layer(TraceLayer::new_for_http())
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(q), _): WithRejection<Query<GenreQuery>, AppError>,
) -> Json<Vec<Movie>> {
    let genre = q.genre.as_deref().filter(|g| !g.is_empty());
    let movies = state.movies.list(genre).await;
    debug!(genre = ?genre, count = movies.len(), "listed movies");
    Json(movies)
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    state.movies.get(&id).await.map(Json).ok_or(AppError::NotFound)
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): JsonBody,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let new: NewMovie = MOVIE_SCHEMA.parse(&body, Mode::Full).map_err(rejected)?;
    let movie = state.movies.insert(new).await;
    debug!(id = %movie.id, title = %movie.title, "created movie");
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Message<&'static str>>> {
    state.movies.remove(&id).await.ok_or(AppError::NotFound)?;
    debug!(id = %id, "deleted movie");
    Ok(Json(Message { message: "Movie deleted" }))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): JsonBody,
) -> AppResult<Json<Movie>> {
    let patch: MoviePatch = MOVIE_SCHEMA.parse(&body, Mode::Partial).map_err(rejected)?;
    let movie = state.movies.update(&id, patch).await.ok_or(AppError::NotFound)?;
    debug!(id = %movie.id, "updated movie");
    Ok(Json(movie))
}

fn rejected(issues: Vec<Issue>) -> AppError {
    let fields: Vec<&str> = issues.iter().filter_map(Issue::field).collect();
    debug!(issues = issues.len(), fields = ?fields, "payload failed validation");
    AppError::Validation(issues)
}
