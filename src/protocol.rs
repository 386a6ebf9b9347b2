//! Wire types for the generation service.
//!
//! The service speaks plain JSON over HTTP: one POST to `/generate` per
//! prompt, answered with a path the artifact can be fetched from.

use serde::{Deserialize, Serialize};

/// Path of the generation endpoint, relative to the service base URL.
pub const GENERATE_PATH: &str = "/generate";

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The prompt exactly as the user typed it. May be empty.
    pub user_request: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            user_request: prompt.into(),
        }
    }
}

/// Body of a successful `POST /generate` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Server-relative path of the generated artifact, e.g. `/output/generated.pptx`.
    pub download_url: String,
}

/// Body of `GET /` on the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Join the service base URL with a path returned by the service.
///
/// This is plain concatenation: the service returns paths with a leading
/// slash, and the base is configured without a trailing one.
pub fn resolve_download_url(base_url: &str, download_path: &str) -> String {
    format!("{}{}", base_url, download_path)
}

/// Full URL of the generation endpoint.
pub fn generate_url(base_url: &str) -> String {
    format!("{}{}", base_url, GENERATE_PATH)
}
