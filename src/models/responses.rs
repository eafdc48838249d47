use serde::{Deserialize, Serialize};
use crate::models::domain::{ApplicationStatus, RecommendationResult};

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationResult>,
    pub count: usize,
}

impl RecommendationsResponse {
    pub fn new(recommendations: Vec<RecommendationResult>) -> Self {
        let count = recommendations.len();
        Self { recommendations, count }
    }
}

/// Lightweight applied flag for a single project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedProjectInfo {
    pub pid: String,
    pub status: ApplicationStatus,
}

/// Response for the applied projects endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedProjectsResponse {
    #[serde(rename = "appliedProjects")]
    pub applied_projects: Vec<AppliedProjectInfo>,
    pub count: usize,
}

/// Recommendation cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheStats,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
