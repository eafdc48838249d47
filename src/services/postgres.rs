use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration as StdDuration;
use thiserror::Error;
use crate::models::{
    ApplicationHistory, ApplicationRecord, ApplicationStatus, ProjectDetail, ProjectListing,
    ResearchPreference, StudentProfile,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

const PROJECT_COLUMNS: &str = r#"
    p.project_id, p.name, p.tags, p.field_of_study, p.specialization, p.duration,
    p.short_desc, p.long_desc, p.is_active, p.creator_id, p.deadline,
    p.created_at, p.updated_at
"#;

/// Read-only PostgreSQL client for the records the recommender consumes
///
/// The schema is owned by the platform backend; this client only runs
/// SELECTs against it and never migrates.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: StdDuration,
        idle_timeout: StdDuration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            StdDuration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            StdDuration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch a student's profile
    pub async fn get_student(&self, uid: &str) -> Result<StudentProfile, PostgresError> {
        let query = r#"
            SELECT uid, skills, research_interest, intention, projects, projects_details
            FROM students
            WHERE uid = $1 AND deleted_at IS NULL
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Student profile {}", uid)))?;

        let details: Option<Json<Vec<ProjectDetail>>> = row.try_get("projects_details")?;

        Ok(StudentProfile {
            uid: row.try_get("uid")?,
            skills: row.try_get::<Option<Vec<String>>, _>("skills")?.unwrap_or_default(),
            research_interest: row.try_get::<Option<String>, _>("research_interest")?.unwrap_or_default(),
            intention: row.try_get::<Option<String>, _>("intention")?.unwrap_or_default(),
            projects: row.try_get::<Option<Vec<String>>, _>("projects")?.unwrap_or_default(),
            projects_details: details.map(|Json(details)| details).unwrap_or_default(),
        })
    }

    /// Fetch the student's research preferences, if they filled them in
    pub async fn get_preferences(&self, uid: &str) -> Result<Option<ResearchPreference>, PostgresError> {
        let query = r#"
            SELECT field_of_study, experience_level, interest_areas, goals
            FROM research_preferences
            WHERE user_id = $1 AND deleted_at IS NULL
            LIMIT 1
        "#;

        let row = sqlx::query(query).bind(uid).fetch_optional(&self.pool).await?;

        row.map(|row| -> Result<ResearchPreference, PostgresError> {
            Ok(ResearchPreference {
                field_of_study: row.try_get::<Option<String>, _>("field_of_study")?.unwrap_or_default(),
                experience_level: row.try_get::<Option<String>, _>("experience_level")?.unwrap_or_default(),
                interest_areas: row.try_get::<Option<String>, _>("interest_areas")?.unwrap_or_default(),
                goals: row.try_get::<Option<String>, _>("goals")?.unwrap_or_default(),
            })
        })
        .transpose()
    }

    /// Fetch active projects not created by the student
    ///
    /// Projects whose creator account no longer exists are left out.
    pub async fn get_candidate_projects(&self, uid: &str) -> Result<Vec<ProjectListing>, PostgresError> {
        let query = format!(
            r#"
            SELECT {}
            FROM projects p
            JOIN users u ON u.uid = p.creator_id AND u.deleted_at IS NULL
            WHERE p.is_active = TRUE AND p.creator_id <> $1 AND p.deleted_at IS NULL
            ORDER BY p.created_at DESC
            "#,
            PROJECT_COLUMNS
        );

        let rows = sqlx::query(&query).bind(uid).fetch_all(&self.pool).await?;
        let projects = rows.iter().map(project_from_row).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} candidate projects for {}", projects.len(), uid);

        Ok(projects)
    }

    /// Fetch every application the student has made, in any status
    pub async fn get_applications(&self, uid: &str) -> Result<Vec<ApplicationRecord>, PostgresError> {
        let query = r#"
            SELECT p_id, status, time_created
            FROM proj_requests
            WHERE uid = $1 AND deleted_at IS NULL
            ORDER BY time_created DESC
        "#;

        let rows = sqlx::query(query).bind(uid).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<ApplicationRecord, PostgresError> {
                let status: Option<String> = row.try_get("status")?;
                Ok(ApplicationRecord {
                    project_id: row.try_get("p_id")?,
                    status: status.as_deref().map(ApplicationStatus::from).unwrap_or(ApplicationStatus::Unknown),
                    time_created: row.try_get("time_created")?,
                })
            })
            .collect()
    }

    /// Ids of every project the student has applied to, in any status
    pub async fn get_applied_project_ids(&self, uid: &str) -> Result<HashSet<String>, PostgresError> {
        Ok(self
            .get_applications(uid)
            .await?
            .into_iter()
            .map(|application| application.project_id)
            .collect())
    }

    /// Fetch the projects behind applications made since `since`
    pub async fn get_recent_applied_projects(
        &self,
        uid: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ProjectListing>, PostgresError> {
        let query = format!(
            r#"
            SELECT {}
            FROM projects p
            WHERE p.project_id IN (
                SELECT r.p_id FROM proj_requests r
                WHERE r.uid = $1 AND r.time_created >= $2 AND r.deleted_at IS NULL
            )
            "#,
            PROJECT_COLUMNS
        );

        let rows = sqlx::query(&query).bind(uid).bind(since).fetch_all(&self.pool).await?;

        rows.iter().map(project_from_row).collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Build the application history the recommender filters and scores with
    pub async fn get_application_history(
        &self,
        uid: &str,
        window_days: i64,
    ) -> Result<ApplicationHistory, PostgresError> {
        let applied = self.get_applied_project_ids(uid).await?;

        let since = Utc::now() - Duration::days(window_days);
        let recent = self.get_recent_applied_projects(uid, since).await?;

        tracing::debug!(
            "User {} has {} applications, {} in the last {} days",
            uid,
            applied.len(),
            recent.len(),
            window_days
        );

        Ok(ApplicationHistory::new(applied, recent))
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn project_from_row(row: &PgRow) -> Result<ProjectListing, sqlx::Error> {
    Ok(ProjectListing {
        project_id: row.try_get("project_id")?,
        name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
        tags: row.try_get::<Option<Vec<String>>, _>("tags")?.unwrap_or_default(),
        field_of_study: row.try_get::<Option<String>, _>("field_of_study")?.unwrap_or_default(),
        specialization: row.try_get::<Option<String>, _>("specialization")?.unwrap_or_default(),
        duration: row.try_get::<Option<String>, _>("duration")?.unwrap_or_default(),
        short_desc: row.try_get::<Option<String>, _>("short_desc")?.unwrap_or_default(),
        long_desc: row.try_get::<Option<String>, _>("long_desc")?.unwrap_or_default(),
        is_active: row.try_get("is_active")?,
        creator_id: row.try_get("creator_id")?,
        deadline: row.try_get("deadline")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
