use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::auth::{AuthError, AuthenticatedUser};
use crate::core::Recommender;
use crate::models::{
    AppliedProjectInfo, AppliedProjectsResponse, ErrorResponse, HealthResponse,
    RecommendationsQuery, RecommendationsResponse,
};
use crate::services::{PostgresClient, PostgresError, RecommendationCache};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: RecommendationCache,
    pub recommender: Recommender,
    pub history_window_days: i64,
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::get().to(get_recommendations))
        .route("/applications/applied", web::get().to(get_applied_projects));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.stats(),
    })
}

fn store_failure(context: &str, uid: &str, error: &PostgresError) -> HttpResponse {
    tracing::error!("{} for {}: {}", context, uid, error);
    HttpResponse::InternalServerError().json(ErrorResponse::new(context, error.to_string(), 500))
}

/// Personalized project recommendations
///
/// GET /api/v1/recommendations?limit=10&refresh=true
///
/// Response body:
/// ```json
/// {
///   "recommendations": [{ "project": {...}, "matchScore": 72.5, "matchReasons": ["..."] }],
///   "count": 1
/// }
/// ```
async fn get_recommendations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<RecommendationsQuery>,
) -> Result<HttpResponse, AuthError> {
    user.require_student("Only students can get recommendations")?;

    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for recommendations query: {:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        )));
    }

    let uid = &user.uid;
    let limit = query.limit.map(usize::from);

    if query.refresh {
        state.cache.invalidate(uid).await;
    } else if let Some(cached) = state.cache.get(uid).await {
        // Applications and deadlines may have changed since the ranking was cached
        let applied = match state.postgres.get_applied_project_ids(uid).await {
            Ok(applied) => applied,
            Err(e) => return Ok(store_failure("Failed to fetch applications", uid, &e)),
        };
        let current = state.recommender.revalidate(&cached, &applied);

        tracing::debug!("Serving cached recommendations for {}", uid);
        return Ok(HttpResponse::Ok().json(limited_response(&current, limit)));
    }

    let student = match state.postgres.get_student(uid).await {
        Ok(student) => student,
        Err(PostgresError::NotFound(_)) => {
            return Ok(HttpResponse::NotFound().json(ErrorResponse::new(
                "Student profile not found",
                "Student profile not found. Please complete your profile first.",
                404,
            )));
        }
        Err(e) => return Ok(store_failure("Failed to fetch student profile", uid, &e)),
    };

    let preferences = match state.postgres.get_preferences(uid).await {
        Ok(preferences) => preferences,
        Err(e) => {
            tracing::warn!("Failed to fetch preferences for {}, scoring without them: {}", uid, e);
            None
        }
    };

    let candidates = match state.postgres.get_candidate_projects(uid).await {
        Ok(projects) => projects,
        Err(e) => return Ok(store_failure("Failed to fetch projects", uid, &e)),
    };

    let history = match state
        .postgres
        .get_application_history(uid, state.history_window_days)
        .await
    {
        Ok(history) => history,
        Err(e) => return Ok(store_failure("Failed to fetch applications", uid, &e)),
    };

    let outcome = state
        .recommender
        .recommend(&student, candidates, &history, preferences.as_ref());

    tracing::info!(
        "Returning {} recommendations for {} (from {} candidates, {} eligible)",
        outcome.recommendations.len(),
        uid,
        outcome.total_candidates,
        outcome.eligible_candidates
    );

    let ranked = state.cache.insert(uid, outcome.recommendations).await;

    Ok(HttpResponse::Ok().json(limited_response(&ranked, limit)))
}

fn limited_response(
    ranked: &[crate::models::RecommendationResult],
    limit: Option<usize>,
) -> RecommendationsResponse {
    let take = limit.unwrap_or(ranked.len()).min(ranked.len());
    RecommendationsResponse::new(ranked[..take].to_vec())
}

/// Projects the student has applied to, with their status
///
/// GET /api/v1/applications/applied
async fn get_applied_projects(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AuthError> {
    user.require_student("Only students can view their applied projects")?;

    match state.postgres.get_applications(&user.uid).await {
        Ok(applications) => {
            let applied_projects: Vec<AppliedProjectInfo> = applications
                .into_iter()
                .map(|application| AppliedProjectInfo {
                    pid: application.project_id,
                    status: application.status,
                })
                .collect();

            Ok(HttpResponse::Ok().json(AppliedProjectsResponse {
                count: applied_projects.len(),
                applied_projects,
            }))
        }
        Err(e) => Ok(store_failure("Failed to fetch applied projects", &user.uid, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CacheStats, ProjectListing, RecommendationResult};
    use crate::services::RecommendationCache;
    use std::collections::HashSet;

    fn ranked(n: usize) -> Vec<RecommendationResult> {
        (0..n)
            .map(|i| RecommendationResult {
                project: ProjectListing {
                    project_id: format!("p{}", i),
                    ..Default::default()
                },
                match_score: 90.0 - i as f64,
                match_reasons: vec![],
            })
            .collect()
    }

    #[test]
    fn test_limited_response() {
        let all = ranked(5);

        let response = limited_response(&all, Some(2));
        assert_eq!(response.count, 2);
        assert_eq!(response.recommendations[1].project.project_id, "p1");

        let response = limited_response(&all, None);
        assert_eq!(response.count, 5);

        let response = limited_response(&all, Some(20));
        assert_eq!(response.count, 5);
    }

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            cache: CacheStats {
                enabled: true,
                entries: 0,
            },
        };

        assert_eq!(response.status, "healthy");
        assert!(response.cache.enabled);
    }

    #[tokio::test]
    async fn test_cached_ranking_excludes_later_applications() {
        let cache = RecommendationCache::new(100, 60, true);
        let recommender = Recommender::default();

        cache.insert("stu1", ranked(3)).await;

        // The student applies to p0 after the ranking was cached
        let applied = HashSet::from(["p0".to_string()]);
        let cached = cache.get("stu1").await.expect("ranking should be cached");
        let current = recommender.revalidate(&cached, &applied);

        let response = limited_response(&current, Some(5));
        assert_eq!(response.count, 2);
        assert!(response
            .recommendations
            .iter()
            .all(|r| r.project.project_id != "p0"));
    }
}
