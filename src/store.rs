use std::{collections::HashSet, path::Path, sync::Arc};

use anyhow::Context;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    models::{Movie, MoviePatch, NewMovie},
    schema::{Issue, MOVIE_SCHEMA, Mode},
};

const SEED: &str = include_str!("../data/movies.json");

/// In-memory movie collection. Every operation holds the lock for its whole scan
/// or mutation, so ids stay unique and readers never see a half-applied write.
#[derive(Clone, Default)]
pub struct MovieStore {
    movies: Arc<Mutex<Vec<Movie>>>,
}

impl MovieStore {
    pub fn new(movies: Vec<Movie>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = movies.iter().find(|m| !seen.insert(m.id.as_str())) {
            anyhow::bail!("duplicate movie id in seed data: {}", dup.id);
        }
        Ok(Self { movies: Arc::new(Mutex::new(movies)) })
    }

    /// Parses seed records, holding each one to the same schema as a create.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let records: Vec<Value> = serde_json::from_str(json).context("parsing movie seed data")?;
        let mut movies = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let Some(id) = record.get("id").and_then(Value::as_str) else {
                anyhow::bail!("seed record {idx} has no string id");
            };
            let new: NewMovie = MOVIE_SCHEMA.parse(record, Mode::Full).map_err(|issues| {
                let detail: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
                let fields: Vec<&str> = issues.iter().filter_map(Issue::field).collect();
                anyhow::anyhow!("seed record {idx} ({id}) is invalid: {fields:?} {detail:?}")
            })?;
            movies.push(Movie::from_new(id.to_string(), new));
        }
        Self::new(movies)
    }

    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("loading {}", path.display()))
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(SEED)
    }

    pub async fn len(&self) -> usize {
        self.movies.lock().await.len()
    }

    pub async fn list(&self, genre: Option<&str>) -> Vec<Movie> {
        let movies = self.movies.lock().await;
        match genre {
            Some(tag) => movies.iter().filter(|m| m.has_genre(tag)).cloned().collect(),
            None => movies.clone(),
        }
    }

    pub async fn get(&self, id: &str) -> Option<Movie> {
        self.movies.lock().await.iter().find(|m| m.id == id).cloned()
    }

    pub async fn insert(&self, new: NewMovie) -> Movie {
        let mut movies = self.movies.lock().await;
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !movies.iter().any(|m| m.id == candidate) {
                break candidate;
            }
        };
        let movie = Movie::from_new(id, new);
        movies.push(movie.clone());
        movie
    }

    pub async fn remove(&self, id: &str) -> Option<Movie> {
        let mut movies = self.movies.lock().await;
        let idx = movies.iter().position(|m| m.id == id)?;
        Some(movies.remove(idx))
    }

    pub async fn update(&self, id: &str, patch: MoviePatch) -> Option<Movie> {
        let mut movies = self.movies.lock().await;
        let movie = movies.iter_mut().find(|m| m.id == id)?;
        movie.apply(patch);
        Some(movie.clone())
    }
}
