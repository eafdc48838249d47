use chrono::{DateTime, NaiveDate, Utc};
use crate::models::{ApplicationHistory, ProjectListing, StudentProfile};

/// Deadline formats, tried in order: ISO, day-first, month-first
const DEADLINE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m-%d-%Y"];

/// Every accepted layout is zero-padded to exactly this many bytes
const DEADLINE_LEN: usize = 10;

/// Parse a free-form deadline into midnight UTC of that day
///
/// The first format that parses wins. Returns `None` for anything else,
/// including unpadded dates and surrounding whitespace.
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    if raw.len() != DEADLINE_LEN || raw.starts_with(char::is_whitespace) {
        return None;
    }

    DEADLINE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Check whether a project's deadline lies strictly before `now`
///
/// Missing or unparseable deadlines never expire a project.
#[inline]
pub fn is_deadline_passed(project: &ProjectListing, now: DateTime<Utc>) -> bool {
    project
        .deadline
        .as_deref()
        .and_then(parse_deadline)
        .map(|deadline| deadline < now)
        .unwrap_or(false)
}

/// Check if a project may be recommended to the student at all
///
/// Drops inactive projects, the student's own projects, anything already
/// applied to (in any status) and projects past their deadline.
#[inline]
pub fn is_eligible(
    project: &ProjectListing,
    student: &StudentProfile,
    history: &ApplicationHistory,
    now: DateTime<Utc>,
) -> bool {
    if !project.is_active {
        return false;
    }

    if !student.uid.is_empty() && project.creator_id == student.uid {
        return false;
    }

    if history.has_applied(&project.project_id) {
        return false;
    }

    !is_deadline_passed(project, now)
}
