// Core algorithm exports
pub mod filters;
pub mod recommender;
pub mod scoring;
pub mod similarity;
pub mod text;

pub use filters::{is_deadline_passed, is_eligible, parse_deadline};
pub use recommender::{RecommendationOutcome, Recommender};
pub use scoring::{applied_project_similarity, calculate_match_score, recency_bonus};
pub use similarity::{fuzzy_match, jaccard_similarity, text_similarity};
pub use text::{normalize_string, tokenize};
