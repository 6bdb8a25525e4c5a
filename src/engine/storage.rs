// Storage abstraction for the movie fixtures
// This defines the interface the handlers and resolvers read and write through

//! # Storage Abstraction Layer
//!
//! The fixture store is the only mutable state in the server. It holds the movie
//! catalog and, per movie, an append-only list of reviews.
//!
//! ## Storage Architecture
//!
//! The storage layer follows the **Repository Pattern**:
//! - **MovieStorage trait**: The operations handlers and resolvers may perform
//! - **InMemoryMovieStore**: The only implementation; seeded once at startup
//!
//! There is deliberately no way to remove or edit a movie. The one write path is
//! [`MovieStorage::append_review`].
//!
//! ## Thread Safety
//!
//! The store is shared across request tasks behind an `Arc`. Each operation takes
//! a `tokio::sync::RwLock` for its own duration, so single operations are atomic
//! but two requests are not isolated from each other.
//!
//! ## Rust Learning Notes:
//!
//! ### Async Traits
//! The `async-trait` crate lets the trait declare `async fn` methods and still be
//! used as `Arc<dyn MovieStorage>`.

use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

use crate::engine::fixtures::seed_movies;
use crate::models::{Movie, Review};
use crate::{MockError, Result};

/// Storage trait for the movie catalog
///
/// ## Return Values
/// Lookups return `Option<Movie>`: a missing movie is not an error at this layer.
/// Call sites decide whether absence means 404, an empty list, or a domain error.
#[async_trait::async_trait]
pub trait MovieStorage: Send + Sync {
    /// Find a movie by its unique slug
    async fn find_by_slug(&self, slug: &str) -> Option<Movie>;

    /// Find a movie by id
    async fn find_by_id(&self, id: &str) -> Option<Movie>;

    /// Every movie, in seed order
    async fn all(&self) -> Vec<Movie>;

    /// Reviews of one movie; empty when the movie does not exist
    async fn reviews(&self, movie_id: &str) -> Vec<Review>;

    /// Append a review to a movie
    ///
    /// ## Errors
    /// - `MockError::NotFound` if no movie has `movie_id`. The store is untouched.
    async fn append_review(&self, movie_id: &str, review: Review) -> Result<Review>;

    /// Restore the seed catalog, dropping every appended review
    async fn reset(&self);
}

/// In-memory fixture store
///
/// ## Limitations
///
/// - **Not persistent**: Appended reviews are lost when the process restarts
/// - **Not isolated**: Concurrent add-review calls interleave freely
pub struct InMemoryMovieStore {
    /// Catalog as it was at construction, used by `reset`
    seed: Vec<Movie>,

    /// Live catalog. A `Vec` keeps seed order stable for the featured list.
    movies: RwLock<Vec<Movie>>,
}

impl InMemoryMovieStore {
    /// Build a store from an explicit catalog
    ///
    /// ## Errors
    /// - `MockError::DuplicateFixture` if two movies share an id or a slug
    pub fn new(movies: Vec<Movie>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();

        for movie in &movies {
            if !ids.insert(movie.id.as_str()) {
                return Err(MockError::DuplicateFixture {
                    field: "id",
                    value: movie.id.clone(),
                });
            }
            if !slugs.insert(movie.slug.as_str()) {
                return Err(MockError::DuplicateFixture {
                    field: "slug",
                    value: movie.slug.clone(),
                });
            }
        }

        Ok(Self {
            seed: movies.clone(),
            movies: RwLock::new(movies),
        })
    }

    /// Build a store seeded with the default catalog
    pub fn with_fixtures() -> Result<Self> {
        Self::new(seed_movies())
    }
}

#[async_trait::async_trait]
impl MovieStorage for InMemoryMovieStore {
    async fn find_by_slug(&self, slug: &str) -> Option<Movie> {
        let movies = self.movies.read().await;
        movies.iter().find(|movie| movie.slug == slug).cloned()
    }

    async fn find_by_id(&self, id: &str) -> Option<Movie> {
        let movies = self.movies.read().await;
        movies.iter().find(|movie| movie.id == id).cloned()
    }

    async fn all(&self) -> Vec<Movie> {
        self.movies.read().await.clone()
    }

    async fn reviews(&self, movie_id: &str) -> Vec<Review> {
        let movies = self.movies.read().await;
        movies
            .iter()
            .find(|movie| movie.id == movie_id)
            .map(|movie| movie.reviews.clone())
            .unwrap_or_default()
    }

    async fn append_review(&self, movie_id: &str, review: Review) -> Result<Review> {
        let mut movies = self.movies.write().await;

        let movie = movies
            .iter_mut()
            .find(|movie| movie.id == movie_id)
            .ok_or_else(|| MockError::NotFound(format!("movie {}", movie_id)))?;

        movie.reviews.push(review.clone());
        debug!(
            "Appended review {} to movie {} ({} reviews)",
            review.id,
            movie_id,
            movie.reviews.len()
        );

        Ok(review)
    }

    async fn reset(&self) {
        let mut movies = self.movies.write().await;
        *movies = self.seed.clone();
        debug!("Fixture store reset to {} seed movies", movies.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn movie(id: &str, slug: &str) -> Movie {
        Movie::new(id, slug.to_uppercase(), slug, "Drama", "2020-01-01", "", "")
    }

    fn review(id: &str) -> Review {
        Review {
            id: id.to_string(),
            text: "Loved it".to_string(),
            rating: 4,
            author: User {
                id: "u-1".to_string(),
                first_name: "Kate".to_string(),
                avatar_url: "https://i.pravatar.cc/100?img=3".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_lookup_by_slug_and_id() {
        let store = InMemoryMovieStore::new(vec![movie("1", "alpha"), movie("2", "beta")]).unwrap();

        assert_eq!(store.find_by_slug("beta").await.unwrap().id, "2");
        assert_eq!(store.find_by_id("1").await.unwrap().slug, "alpha");
        assert!(store.find_by_slug("gamma").await.is_none());
        assert!(store.find_by_id("3").await.is_none());
    }

    #[tokio::test]
    async fn test_all_keeps_seed_order() {
        let store = InMemoryMovieStore::new(vec![
            movie("3", "c"),
            movie("1", "a"),
            movie("2", "b"),
        ])
        .unwrap();

        let ids: Vec<String> = store.all().await.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = InMemoryMovieStore::new(vec![movie("1", "a"), movie("1", "b")]);
        assert!(matches!(
            result,
            Err(MockError::DuplicateFixture { field: "id", .. })
        ));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let result = InMemoryMovieStore::new(vec![movie("1", "same"), movie("2", "same")]);
        assert!(matches!(
            result,
            Err(MockError::DuplicateFixture { field: "slug", .. })
        ));
    }

    #[tokio::test]
    async fn test_append_review_is_visible_to_later_reads() {
        let store = InMemoryMovieStore::new(vec![movie("1", "alpha")]).unwrap();

        store.append_review("1", review("r-1")).await.unwrap();
        store.append_review("1", review("r-2")).await.unwrap();

        let reviews = store.reviews("1").await;
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[1].id, "r-2");
        assert_eq!(store.find_by_slug("alpha").await.unwrap().reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_append_review_unknown_movie_leaves_store_untouched() {
        let store = InMemoryMovieStore::new(vec![movie("1", "alpha")]).unwrap();
        let before = store.all().await;

        let result = store.append_review("missing", review("r-1")).await;

        assert!(matches!(result, Err(MockError::NotFound(_))));
        assert_eq!(store.all().await, before);
    }

    #[tokio::test]
    async fn test_reviews_of_unknown_movie_is_empty() {
        let store = InMemoryMovieStore::with_fixtures().unwrap();
        assert!(store.reviews("does-not-exist").await.is_empty());
    }

    #[tokio::test]
    async fn test_reset_drops_appended_reviews() {
        let store = InMemoryMovieStore::with_fixtures().unwrap();
        let seed = store.all().await;
        let target = seed[0].id.clone();

        store.append_review(&target, review("r-new")).await.unwrap();
        assert_ne!(store.all().await, seed);

        store.reset().await;
        assert_eq!(store.all().await, seed);
    }
}
