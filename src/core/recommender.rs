use chrono::{DateTime, Utc};
use std::collections::HashSet;
use crate::models::{
    ApplicationHistory, ProjectListing, RecommendationResult, RecommendationSettings,
    ResearchPreference, StudentProfile,
};
use crate::core::{
    filters::{is_deadline_passed, is_eligible},
    scoring::calculate_match_score,
};

/// Result of a recommendation run
#[derive(Debug)]
pub struct RecommendationOutcome {
    pub recommendations: Vec<RecommendationResult>,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility: active, not self-authored, not applied to, deadline open
/// 2. Match scoring against the student profile and application history
/// 3. Minimum score threshold
/// 4. Ranking (highest score first, ties keep input order) and truncation
#[derive(Debug, Clone)]
pub struct Recommender {
    settings: RecommendationSettings,
}

impl Recommender {
    pub fn new(settings: RecommendationSettings) -> Self {
        Self { settings }
    }

    pub fn with_default_settings() -> Self {
        Self {
            settings: RecommendationSettings::default(),
        }
    }

    pub fn settings(&self) -> RecommendationSettings {
        self.settings
    }

    /// Rank candidate projects for a student as of now
    pub fn recommend(
        &self,
        student: &StudentProfile,
        candidates: Vec<ProjectListing>,
        history: &ApplicationHistory,
        preferences: Option<&ResearchPreference>,
    ) -> RecommendationOutcome {
        self.recommend_at(student, candidates, history, preferences, Utc::now())
    }

    /// Rank candidate projects for a student, judging deadlines against `now`
    pub fn recommend_at(
        &self,
        student: &StudentProfile,
        candidates: Vec<ProjectListing>,
        history: &ApplicationHistory,
        preferences: Option<&ResearchPreference>,
        now: DateTime<Utc>,
    ) -> RecommendationOutcome {
        let total_candidates = candidates.len();
        let mut eligible_candidates = 0;

        let mut recommendations: Vec<RecommendationResult> = candidates
            .into_iter()
            .filter(|project| is_eligible(project, student, history, now))
            .inspect(|_| eligible_candidates += 1)
            .filter_map(|project| {
                let (match_score, match_reasons) =
                    calculate_match_score(student, &project, preferences, &history.recent_projects);

                if match_score >= self.settings.min_score {
                    Some(RecommendationResult {
                        project,
                        match_score,
                        match_reasons,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stable sort keeps encounter order among equal scores
        recommendations.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        recommendations.truncate(self.settings.max_results);

        tracing::debug!(
            "Scored {} of {} candidates for {}, kept {}",
            eligible_candidates,
            total_candidates,
            student.uid,
            recommendations.len()
        );

        RecommendationOutcome {
            recommendations,
            total_candidates,
            eligible_candidates,
        }
    }

    /// Re-apply the time- and application-dependent exclusions to an
    /// earlier ranking as of now
    pub fn revalidate(
        &self,
        ranked: &[RecommendationResult],
        applied_project_ids: &HashSet<String>,
    ) -> Vec<RecommendationResult> {
        self.revalidate_at(ranked, applied_project_ids, Utc::now())
    }

    /// Drop entries of an earlier ranking the student has since applied to,
    /// or whose deadline has passed by `now`. Order is preserved.
    pub fn revalidate_at(
        &self,
        ranked: &[RecommendationResult],
        applied_project_ids: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> Vec<RecommendationResult> {
        let current: Vec<RecommendationResult> = ranked
            .iter()
            .filter(|r| !applied_project_ids.contains(&r.project.project_id))
            .filter(|r| !is_deadline_passed(&r.project, now))
            .cloned()
            .collect();

        if current.len() < ranked.len() {
            tracing::debug!(
                "Dropped {} stale entries from a cached ranking",
                ranked.len() - current.len()
            );
        }

        current
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_settings()
    }
}
