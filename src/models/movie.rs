// Movie domain models - catalog entries and their reviews

//! # Movie Models
//!
//! This module defines the records the mock server hands out:
//! - `Movie`: A catalog entry with an append-only list of reviews
//! - `Review`: An immutable review, created only through the add-review mutation
//! - `User`: The author of a review, supplied by the caller as-is
//!
//! All records serialize with camelCase field names so the JSON matches what the
//! web client expects from the real API (`releasedAt`, `imageUrl`, `firstName`).
//!
//! ## Rust Learning Notes:
//!
//! ### Serde Attributes
//! `#[serde(rename_all = "camelCase")]` rewrites every field name on the way in
//! and out, so Rust code keeps snake_case while the wire format stays camelCase.

use serde::{Deserialize, Serialize};

/// A movie in the fixture catalog
///
/// Identity is `id`; `slug` is a second unique key used by the REST routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub released_at: String,
    pub description: String,
    pub image_url: String,

    /// Insertion-ordered, only ever appended to
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Movie {
    /// Create a movie with no reviews
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        slug: impl Into<String>,
        category: impl Into<String>,
        released_at: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            category: category.into(),
            released_at: released_at.into(),
            description: description.into(),
            image_url: image_url.into(),
            reviews: Vec::new(),
        }
    }

    /// Builder-style helper used by the seed fixtures
    pub fn with_review(mut self, review: Review) -> Self {
        self.reviews.push(review);
        self
    }
}

/// A single review left on a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub text: String,
    pub rating: i32,
    pub author: User,
}

/// Review author
///
/// Not validated against any user registry; whatever the caller sends is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub avatar_url: String,
}

/// User record returned by the auth validation mock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: String,
}
