//! Research Match - project recommendation service for student research placements
//!
//! The core scores how well a research project fits a student's profile
//! (fuzzy skill matching, description overlap, preferences, application
//! history) and ranks the projects a student can still apply to.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, fuzzy_match, jaccard_similarity, text_similarity, Recommender};
pub use models::{
    ApplicationHistory, ProjectListing, RecommendationResult, RecommendationSettings,
    ResearchPreference, StudentProfile,
};
