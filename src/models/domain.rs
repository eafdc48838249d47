use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A past project the student described on their profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Student profile as consumed by the scorer
///
/// Every field may be empty; a brand-new student scores zero rather than
/// producing an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    pub uid: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "researchInterest", default)]
    pub research_interest: String,
    #[serde(default)]
    pub intention: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(rename = "projectsDetails", default)]
    pub projects_details: Vec<ProjectDetail>,
}

impl StudentProfile {
    /// True when there is nothing to score against
    pub fn is_blank(&self) -> bool {
        self.skills.is_empty() && self.research_interest.is_empty() && self.intention.is_empty()
    }
}

/// A project listing posted by a faculty member
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectListing {
    #[serde(rename = "pid")]
    pub project_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "fieldOfStudy", default)]
    pub field_of_study: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub duration: String,
    #[serde(rename = "shortDesc", default)]
    pub short_desc: String,
    #[serde(rename = "longDesc", default)]
    pub long_desc: String,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "creatorId", default)]
    pub creator_id: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool { true }

/// Optional research preferences questionnaire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchPreference {
    #[serde(rename = "fieldOfStudy", default)]
    pub field_of_study: String,
    #[serde(rename = "experienceLevel", default)]
    pub experience_level: String,
    #[serde(rename = "interestAreas", default)]
    pub interest_areas: String,
    #[serde(default)]
    pub goals: String,
}

/// Workflow status of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Accepted,
    Rejected,
    Waitlisted,
    Interview,
    UnderReview,
    Approved,
    Unknown,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Waitlisted => "waitlisted",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Unknown => "unknown",
        }
    }
}

impl From<&str> for ApplicationStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "accepted" => ApplicationStatus::Accepted,
            "rejected" => ApplicationStatus::Rejected,
            "waitlisted" => ApplicationStatus::Waitlisted,
            "interview" => ApplicationStatus::Interview,
            "under_review" => ApplicationStatus::UnderReview,
            "approved" => ApplicationStatus::Approved,
            _ => ApplicationStatus::Unknown,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student's application to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(rename = "pid")]
    pub project_id: String,
    pub status: ApplicationStatus,
    #[serde(rename = "timeCreated")]
    pub time_created: DateTime<Utc>,
}

/// Everything the recommender needs to know about past applications
#[derive(Debug, Clone, Default)]
pub struct ApplicationHistory {
    /// Projects applied to in any status
    pub applied_project_ids: HashSet<String>,
    /// Projects applied to within the trailing history window
    pub recent_projects: Vec<ProjectListing>,
}

impl ApplicationHistory {
    pub fn new(applied_project_ids: HashSet<String>, recent_projects: Vec<ProjectListing>) -> Self {
        Self {
            applied_project_ids,
            recent_projects,
        }
    }

    pub fn has_applied(&self, project_id: &str) -> bool {
        self.applied_project_ids.contains(project_id)
    }
}

/// Scored recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub project: ProjectListing,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
}

/// Thresholds applied by the recommender after scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationSettings {
    pub min_score: f64,
    pub max_results: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            min_score: 20.0,
            max_results: 20,
        }
    }
}
