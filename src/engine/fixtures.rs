// Seed catalog for the fixture store

//! Default movies served by the mock server.
//!
//! The catalog is rebuilt on every call to [`seed_movies`], so each store gets
//! its own copy and tests never share review state.

use crate::models::{Movie, Review, User};

/// Movie id that makes the recommendations route answer 500 with an empty body
///
/// It belongs to a real catalog entry, so the client can reach the failure path
/// by navigating to that movie.
pub const FAILING_RECOMMENDATIONS_MOVIE_ID: &str = "b2b7e2d9-8b2e-4b7a-9b8a-7f9a0d7f7e0e";

/// Canned user returned by the auth validation route
pub const AUTH_USER_ID: &str = "2b225b31-904a-443b-a898-a280fa8e0356";
pub const AUTH_USER_FIRST_NAME: &str = "John";
pub const AUTH_USER_LAST_NAME: &str = "Maverick";
pub const AUTH_USER_AVATAR_URL: &str = "https://i.pravatar.cc/100?img=12";

/// Demo video proxied by the stream route
pub const DEMO_VIDEO_URL: &str = "https://nickdesaulniers.github.io/netfix/demo/frag_bunny.mp4";

fn critic(id: &str, first_name: &str, img: u8) -> User {
    User {
        id: id.to_string(),
        first_name: first_name.to_string(),
        avatar_url: format!("https://i.pravatar.cc/100?img={}", img),
    }
}

fn review(id: &str, text: &str, rating: i32, author: User) -> Review {
    Review {
        id: id.to_string(),
        text: text.to_string(),
        rating,
        author,
    }
}

/// The default catalog
pub fn seed_movies() -> Vec<Movie> {
    vec![
        Movie::new(
            "6c0bd4d6-2a6e-4b8f-9f3f-3b8d1c7d2a11",
            "The Lord of the Rings",
            "the-lord-of-the-rings",
            "Adventure",
            "2001-12-19",
            "A young hobbit sets out to destroy a ring of unimaginable power.",
            "https://images.unsplash.com/photo-1506466010722-395aa2bef877",
        )
        .with_review(review(
            "0c9f6e2e-44a1-4d45-9d8b-1a3c2e5f7b90",
            "The best fantasy adventure ever filmed.",
            5,
            critic("8a1f0e7c-5b2d-4c3e-9f61-2d7b3a9c4e15", "Sarah", 5),
        )),
        Movie::new(
            FAILING_RECOMMENDATIONS_MOVIE_ID,
            "The Matrix",
            "the-matrix",
            "Sci-Fi",
            "1999-03-31",
            "A hacker learns the world he lives in is a simulation.",
            "https://images.unsplash.com/photo-1526374965328-7f61d4dc18c5",
        ),
        Movie::new(
            "3f2a9b71-6d4e-4c18-8e5a-9b0c7d6e5f42",
            "Spirited Away",
            "spirited-away",
            "Animation",
            "2001-07-20",
            "A girl wanders into a world ruled by gods, witches and spirits.",
            "https://images.unsplash.com/photo-1578632767115-351597cf2477",
        )
        .with_review(review(
            "5e7d3c1b-9a8f-4e2d-b6c4-0f1e2d3c4b5a",
            "Every frame is a painting.",
            5,
            critic("c4d5e6f7-0a1b-4c2d-8e3f-4a5b6c7d8e9f", "Kenji", 33),
        ))
        .with_review(review(
            "9b8a7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d",
            "A bit long for the kids, still wonderful.",
            4,
            critic("1f2e3d4c-5b6a-4798-a8b9-c0d1e2f3a4b5", "Maria", 47),
        )),
        Movie::new(
            "a7c4e2f0-1b3d-4e5f-9a8b-7c6d5e4f3a21",
            "Parasite",
            "parasite",
            "Thriller",
            "2019-05-30",
            "A poor family schemes to become employed by a wealthy household.",
            "https://images.unsplash.com/photo-1489599849927-2ee91cede3ba",
        ),
        Movie::new(
            "e1d2c3b4-a5f6-4789-8a0b-c1d2e3f4a5b6",
            "Arrival",
            "arrival",
            "Sci-Fi",
            "2016-11-11",
            "A linguist works to communicate with visitors from another world.",
            "https://images.unsplash.com/photo-1446776811953-b23d57bd21aa",
        ),
    ]
}
