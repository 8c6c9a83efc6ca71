use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:8080",
    "http://localhost:8000",
    "https://movies.com",
    "https://midu.dev",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub movies_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().context("PORT")?;

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect());

        let movies_file = std::env::var("MOVIES_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            allowed_origins,
            movies_file,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" https://a.dev/ , ,http://localhost:3000");
        assert_eq!(origins, vec!["https://a.dev", "http://localhost:3000"]);
    }

    #[test]
    fn empty_origin_list_parses_to_nothing() {
        assert!(parse_origins(" , ").is_empty());
    }
}
