// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ApplicationHistory, ApplicationRecord, ApplicationStatus, ProjectDetail, ProjectListing,
    RecommendationResult, RecommendationSettings, ResearchPreference, StudentProfile,
};
pub use requests::RecommendationsQuery;
pub use responses::{
    AppliedProjectInfo, AppliedProjectsResponse, CacheStats, ErrorResponse, HealthResponse,
    RecommendationsResponse,
};
