// Mock REST API types
// Typed request and response payloads for every REST route

use serde::{Deserialize, Serialize};

/// Body of the 400 returned when `movieId` is missing
pub const MISSING_MOVIE_ID_MESSAGE: &str = r#"Missing query param "movieId""#;

/// Query string of `GET /api/recommendations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationsQuery {
    #[serde(rename = "movieId")]
    pub movie_id: Option<String>,
}

impl RecommendationsQuery {
    /// Build from raw query pairs; a repeated `movieId` keeps its first value
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            movie_id: first_value(pairs, "movieId"),
        }
    }

    /// The movie id, treating an empty value as absent
    pub fn movie_id(&self) -> Option<&str> {
        self.movie_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Form body of `POST /auth/validate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthValidateForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AuthValidateForm {
    /// Build from decoded form fields, first value of each name wins
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            email: first_value(pairs, "email"),
            password: first_value(pairs, "password"),
        }
    }

    /// The email, if both fields are present and non-empty
    ///
    /// The password is only checked for presence; its value is discarded.
    pub fn credentials_email(&self) -> Option<&str> {
        let email = self.email.as_deref().filter(|e| !e.is_empty())?;
        self.password.as_deref().filter(|p| !p.is_empty())?;
        Some(email)
    }
}

fn first_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

/// Structured error body: `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// GraphQL-over-HTTP request sent to the review service link
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
}

/// One entry of the review service's `serviceReviews` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReview {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReviewsData {
    pub service_reviews: Vec<ServiceReview>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    pub message: String,
}

/// Response of the review service link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceGraphQLResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ServiceReviewsData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ServiceError>,
}

impl ServiceGraphQLResponse {
    pub fn data(service_reviews: Vec<ServiceReview>) -> Self {
        Self {
            data: Some(ServiceReviewsData { service_reviews }),
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![ServiceError {
                message: message.into(),
            }],
        }
    }
}

/// Current time as RFC 3339
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
