// Service exports
pub mod cache;
pub mod postgres;

pub use cache::{CacheKey, RecommendationCache};
pub use postgres::{PostgresClient, PostgresError};
