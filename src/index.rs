use std::collections::{HashMap, HashSet};

use log::{debug, info, log_enabled};

use crate::content::{CelebrityDetails, FilmographyItem, MovieDetails, Post, PostKind};

#[derive(Debug, Clone, PartialEq)]
pub enum MovieEntry {
    /// Only the title is known, from a filmography listing.
    Stub { title: String },
    Full(MovieDetails),
}

impl MovieEntry {
    pub fn title(&self) -> &str {
        match self {
            Self::Stub { title } => title,
            Self::Full(details) => &details.title,
        }
    }

    pub fn details(&self) -> Option<&MovieDetails> {
        match self {
            Self::Stub { .. } => None,
            Self::Full(details) => Some(details),
        }
    }
}

/// Lookup tables derived from the post list. Rebuilt from scratch on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedIndex {
    pub genres: HashSet<String>,
    pub movies: HashMap<String, MovieEntry>,
    pub celebrities: HashMap<String, CelebrityDetails>,
    pub cast_names: HashSet<String>,
}

impl DerivedIndex {
    pub fn movie(&self, id: &str) -> Option<&MovieEntry> {
        self.movies.get(id)
    }

    pub fn celebrity(&self, id: &str) -> Option<&CelebrityDetails> {
        self.celebrities.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
            && self.movies.is_empty()
            && self.celebrities.is_empty()
            && self.cast_names.is_empty()
    }

    fn insert_movie(&mut self, details: &MovieDetails) {
        self.genres.extend(details.genres.iter().cloned());
        self.cast_names.extend(details.cast.iter().cloned());
        self.movies
            .insert(details.id.clone(), MovieEntry::Full(details.clone()));
    }

    fn insert_stub(&mut self, item: &FilmographyItem) {
        self.movies
            .entry(item.id.clone())
            .or_insert_with(|| MovieEntry::Stub {
                title: item.title.clone(),
            });
    }
}

pub fn build_index(posts: &[Post]) -> DerivedIndex {
    let mut index = DerivedIndex::default();
    for post in posts {
        match &post.kind {
            PostKind::MovieDetails(details) => index.insert_movie(details),
            PostKind::Celebrity(details) => {
                index
                    .celebrities
                    .insert(details.id.clone(), details.clone());
            }
            PostKind::Filmography { items, .. } => {
                for item in items {
                    index.insert_stub(item);
                }
            }
            _ => {}
        }
    }
    debug!(
        "Indexed {} movies, {} celebrities, {} genres from {} posts",
        index.movies.len(),
        index.celebrities.len(),
        index.genres.len(),
        posts.len()
    );
    index
}

pub fn display_index(index: &DerivedIndex) {
    if log_enabled!(log::Level::Info) {
        let mut movies: Vec<(&String, &MovieEntry)> = index.movies.iter().collect();
        movies.sort_by(|a, b| a.0.cmp(b.0));

        let mut id_width = 8_usize;
        for (id, _) in movies.iter() {
            id_width = id.len().max(id_width);
        }

        info!("+-{:-<id_width$}-+-{}------- - -", " MovieId ", " Title ");
        for (id, entry) in movies.iter() {
            let marker = if entry.details().is_some() { "" } else { " (stub)" };
            info!("| {:id_width$} | {}{}", id, entry.title(), marker);
        }
        info!("+-{}-+------------ - -", "-".repeat(id_width));

        let mut genres: Vec<&String> = index.genres.iter().collect();
        genres.sort();
        info!("Genres: {}", join(genres));

        let mut celebrities: Vec<&str> =
            index.celebrities.values().map(|c| c.name.as_str()).collect();
        celebrities.sort();
        info!("Celebrities: {}", celebrities.join(", "));

        let mut cast: Vec<&String> = index.cast_names.iter().collect();
        cast.sort();
        info!("Cast: {}", join(cast));
    }

    fn join(list: Vec<&String>) -> String {
        list.into_iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::{post, trivia};

    fn movie(id: &str, title: &str, genres: &[&str], cast: &[&str]) -> MovieDetails {
        MovieDetails {
            id: id.to_string(),
            title: title.to_string(),
            rating: Some(8.0),
            director: "Someone".to_string(),
            cast: cast.iter().map(|s| s.to_string()).collect(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
            synopsis: String::new(),
            release_date: None,
            runtime_minutes: None,
            poster_url: None,
        }
    }

    fn filmography(id: &str, items: &[(&str, &str)]) -> Post {
        post(
            id,
            PostKind::Filmography {
                celebrity_name: "Denis".to_string(),
                items: items
                    .iter()
                    .map(|(id, title)| FilmographyItem {
                        id: id.to_string(),
                        title: title.to_string(),
                        year: None,
                        role: None,
                    })
                    .collect(),
            },
        )
    }

    #[test]
    fn empty_posts_give_empty_index() {
        assert!(build_index(&[]).is_empty());
        assert!(build_index(&[trivia("p1")]).is_empty());
    }

    #[test]
    fn movie_details_fill_genres_and_cast() {
        let posts = vec![
            post("p1", PostKind::MovieDetails(movie("m1", "Heat", &["Crime"], &["Pacino", "De Niro"]))),
            post("p2", PostKind::MovieDetails(movie("m2", "Ronin", &["Crime", "Action"], &["De Niro"]))),
        ];
        let index = build_index(&posts);

        assert_eq!(index.movies.len(), 2);
        assert_eq!(
            index.genres,
            HashSet::from(["Crime".to_string(), "Action".to_string()])
        );
        assert_eq!(index.cast_names.len(), 2);
    }

    #[test]
    fn rebuilding_gives_the_same_index() {
        let posts = vec![
            post("p1", PostKind::MovieDetails(movie("m1", "Heat", &["Crime"], &["Pacino"]))),
            filmography("p2", &[("m2", "Ronin"), ("m1", "Heat")]),
            trivia("p3"),
        ];
        assert_eq!(build_index(&posts), build_index(&posts));
    }

    #[test]
    fn stub_is_upgraded_by_later_details() {
        let full = movie("m1", "X", &["Drama"], &[]);
        let posts = vec![
            filmography("p1", &[("m1", "X")]),
            post("p2", PostKind::MovieDetails(full.clone())),
        ];
        let index = build_index(&posts);
        assert_eq!(index.movie("m1"), Some(&MovieEntry::Full(full)));
    }

    #[test]
    fn details_are_never_downgraded_to_stub() {
        let full = movie("m1", "X", &["Drama"], &[]);
        let posts = vec![
            post("p1", PostKind::MovieDetails(full.clone())),
            filmography("p2", &[("m1", "X (stub)"), ("m9", "Other")]),
        ];
        let index = build_index(&posts);
        assert_eq!(index.movie("m1"), Some(&MovieEntry::Full(full)));
        assert_eq!(index.movie("m9").map(MovieEntry::title), Some("Other"));
    }

    #[test]
    fn celebrities_are_keyed_by_id() {
        let details = CelebrityDetails {
            id: "c1".to_string(),
            name: "Zendaya".to_string(),
            profession: "Actor".to_string(),
            bio: String::new(),
            birth_date: None,
            known_for: vec![],
            photo_url: None,
        };
        let posts = vec![
            post("p1", PostKind::Celebrity(details.clone())),
            post("p2", PostKind::Celebrity(details.clone())),
        ];
        let index = build_index(&posts);
        assert_eq!(index.celebrities.len(), 1);
        assert_eq!(index.celebrity("c1"), Some(&details));
    }
}
