use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    pub const NAMES: [&'static str; 8] =
        ["Action", "Adventure", "Comedy", "Drama", "Fantasy", "Horror", "Thriller", "Sci-Fi"];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Case-insensitive exact match against a free-text tag.
    pub fn matches(self, tag: &str) -> bool {
        self.as_str().to_lowercase() == tag.to_lowercase()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub genre: Vec<Genre>,
    pub director: String,
    pub year: i32,
    pub duration: u32,
    pub rate: f64,
    pub poster: String,
}

/// A fully validated create payload, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub genre: Vec<Genre>,
    pub director: String,
    pub year: i32,
    pub duration: u32,
    pub rate: f64,
    pub poster: String,
}

/// A validated partial update. `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub genre: Option<Vec<Genre>>,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<u32>,
    pub rate: Option<f64>,
    pub poster: Option<String>,
}

impl Movie {
    pub fn from_new(id: String, new: NewMovie) -> Self {
        Self {
            id,
            title: new.title,
            genre: new.genre,
            director: new.director,
            year: new.year,
            duration: new.duration,
            rate: new.rate,
            poster: new.poster,
        }
    }

    pub fn has_genre(&self, tag: &str) -> bool {
        self.genre.iter().any(|g| g.matches(tag))
    }

    pub fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(director) = patch.director {
            self.director = director;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(poster) = patch.poster {
            self.poster = poster;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenreQuery {
    pub genre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Message<T> {
    pub message: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Movie {
        Movie {
            id: "m-1".to_string(),
            title: "A".to_string(),
            genre: vec![Genre::Drama, Genre::SciFi],
            director: "D".to_string(),
            year: 2000,
            duration: 120,
            rate: 7.5,
            poster: "https://img/a.jpg".to_string(),
        }
    }

    #[test]
    fn genre_names_line_up_with_variants() {
        for name in Genre::NAMES {
            let genre: Genre = serde_json::from_value(serde_json::json!(name)).unwrap();
            assert_eq!(genre.as_str(), name);
        }
    }

    #[test]
    fn sci_fi_keeps_its_hyphen_on_the_wire() {
        let json = serde_json::to_string(&Genre::SciFi).unwrap();
        assert_eq!(json, "\"Sci-Fi\"");
        let back: Genre = serde_json::from_str("\"Sci-Fi\"").unwrap();
        assert_eq!(back, Genre::SciFi);
    }

    #[test]
    fn genre_match_is_case_insensitive_but_exact() {
        let movie = sample();
        assert!(movie.has_genre("drama"));
        assert!(movie.has_genre("SCI-FI"));
        assert!(!movie.has_genre("dram"));
        assert!(!movie.has_genre("Action"));
    }

    #[test]
    fn patch_overwrites_only_given_fields() {
        let mut movie = sample();
        movie.apply(MoviePatch { year: Some(2010), ..Default::default() });

        let expected = Movie { year: 2010, ..sample() };
        assert_eq!(movie, expected);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut movie = sample();
        movie.apply(MoviePatch::default());
        assert_eq!(movie, sample());
    }
}
