mod config;
mod cors;
mod error;
mod models;
mod routes;
mod schema;
mod store;

use std::sync::Arc;

use crate::{config::Config, cors::OriginPolicy, store::MovieStore};

pub struct AppState {
    pub movies: MovieStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,movies_api=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let movies = match &config.movies_file {
        Some(path) => MovieStore::from_file(path).await?,
        None => MovieStore::bundled()?,
    };
    tracing::info!(movies = movies.len().await, "movie collection loaded");

    let origins = OriginPolicy::new(&config.allowed_origins)?;
    let app = routes::router(Arc::new(AppState { movies }), origins);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
