use crate::core::similarity::{fuzzy_match, jaccard_similarity, text_similarity};
use crate::core::text::{normalize_string, tokenize};
use crate::models::{ProjectListing, ResearchPreference, StudentProfile};

/// Component ceilings, in score points
const SKILLS_WEIGHT: f64 = 30.0;
const RESEARCH_WEIGHT: f64 = 25.0;
const INTENTION_WEIGHT: f64 = 10.0;
const FIELD_CAP: f64 = 20.0;
const TAGS_WEIGHT: f64 = 15.0;
const PREFERENCES_CAP: f64 = 10.0;
const PAST_PROJECTS_WEIGHT: f64 = 10.0;
const RECENCY_CAP: f64 = 3.0;
const RECENCY_WINDOW_DAYS: i64 = 30;

const INCOMPLETE_PROFILE_REASON: &str = "Complete your profile for better matches";
const RECENT_APPLICATIONS_REASON: &str = "Similar to projects you've applied to recently";

/// Calculate a match score (0-100) for a project against a student profile
///
/// Score composition (points):
/// - skills: fuzzy Jaccard of skills vs project terms, up to 30
/// - research interest: text overlap with the descriptions, up to 25
/// - intention: text overlap, up to 10 (only above 0.3)
/// - field and specialization: up to 20 combined
/// - tags: fuzzy Jaccard of skills vs tags, up to 15
/// - research preferences: up to 10
/// - past projects: up to 10
/// - recency: up to 3
/// - similarity to recently applied projects: up to 15
///
/// The total is clamped to [0, 100] and rounded to one decimal. Reasons are
/// returned in the order the components fire, each component gating its own
/// reason on how many are already present.
pub fn calculate_match_score(
    student: &StudentProfile,
    project: &ProjectListing,
    preferences: Option<&ResearchPreference>,
    recent_applied: &[ProjectListing],
) -> (f64, Vec<String>) {
    if student.is_blank() {
        return (0.0, vec![INCOMPLETE_PROFILE_REASON.to_string()]);
    }

    let mut reasons = Vec::new();
    let mut score: f64 = 0.0;

    score += skills_score(student, project, &mut reasons);
    score += research_interest_score(student, project, &mut reasons);
    score += intention_score(student, project, &mut reasons);
    score += field_score(student, project, preferences, &mut reasons);
    score += tags_score(student, project, &mut reasons);
    if let Some(preferences) = preferences {
        score += preferences_score(preferences, project, &mut reasons);
    }
    score += past_projects_score(student, project, &mut reasons);
    score += recency_bonus(project);
    score += application_history_score(project, recent_applied, &mut reasons);

    let score = (score.clamp(0.0, 100.0) * 10.0).round() / 10.0;

    if reasons.is_empty() && score >= 30.0 {
        reasons.push("Matches your profile".to_string());
    }
    if reasons.is_empty() && score >= 20.0 {
        reasons.push("Potential fit based on your background".to_string());
    }

    (score, reasons)
}

/// Terms describing the project: tags, field, specialization and long
/// description words
fn project_terms(project: &ProjectListing) -> Vec<String> {
    let mut terms = project.tags.clone();

    if !project.field_of_study.is_empty() {
        terms.push(project.field_of_study.clone());
    }
    if !project.specialization.is_empty() {
        terms.push(project.specialization.clone());
    }

    let description = format!("{} {}", project.long_desc, project.short_desc);
    terms.extend(tokenize(&description).into_iter().filter(|word| word.len() > 4));

    terms
}

fn skills_score(student: &StudentProfile, project: &ProjectListing, reasons: &mut Vec<String>) -> f64 {
    if student.skills.is_empty() {
        return 0.0;
    }

    let terms = project_terms(project);
    let similarity = jaccard_similarity(&student.skills, &terms);

    let match_count = student
        .skills
        .iter()
        .filter(|skill| terms.iter().any(|term| fuzzy_match(skill, term)))
        .count();

    match match_count {
        0 => {}
        1 => reasons.push("Relevant skills match".to_string()),
        2 => reasons.push("Several relevant skills".to_string()),
        _ => reasons.push("Multiple matching skills".to_string()),
    }

    (similarity * SKILLS_WEIGHT).min(SKILLS_WEIGHT)
}

fn research_interest_score(
    student: &StudentProfile,
    project: &ProjectListing,
    reasons: &mut Vec<String>,
) -> f64 {
    if student.research_interest.is_empty() {
        return 0.0;
    }

    let similarity = text_similarity(&student.research_interest, &[project.long_desc.as_str(), project.short_desc.as_str()]);

    if similarity > 0.5 {
        reasons.push("Strong research interest alignment".to_string());
    } else if similarity > 0.3 {
        reasons.push("Moderate research interest match".to_string());
    }

    (similarity * RESEARCH_WEIGHT).min(RESEARCH_WEIGHT)
}

fn intention_score(student: &StudentProfile, project: &ProjectListing, reasons: &mut Vec<String>) -> f64 {
    if student.intention.is_empty() {
        return 0.0;
    }

    let similarity = text_similarity(&student.intention, &[project.long_desc.as_str(), project.short_desc.as_str()]);
    if similarity <= 0.3 {
        return 0.0;
    }

    if reasons.len() < 3 {
        reasons.push("Aligns with your career goals".to_string());
    }

    (similarity * INTENTION_WEIGHT).min(INTENTION_WEIGHT)
}

fn field_score(
    student: &StudentProfile,
    project: &ProjectListing,
    preferences: Option<&ResearchPreference>,
    reasons: &mut Vec<String>,
) -> f64 {
    let mut points = 0.0;

    if let Some(preferences) = preferences {
        if !preferences.field_of_study.is_empty() && !project.field_of_study.is_empty() {
            let preferred = normalize_string(&preferences.field_of_study);
            let offered = normalize_string(&project.field_of_study);

            if fuzzy_match(&preferences.field_of_study, &project.field_of_study) {
                points += 20.0;
                reasons.push("Matches your field of study".to_string());
            } else if offered.contains(&preferred) || preferred.contains(&offered) {
                points += 12.0;
                reasons.push("Related field of study".to_string());
            }
        }
    }

    if !project.specialization.is_empty() {
        let specialization = normalize_string(&project.specialization);

        if student.skills.iter().any(|skill| fuzzy_match(skill, &project.specialization)) {
            points += 15.0;
            if reasons.len() < 4 {
                reasons.push("Specialization matches your skills".to_string());
            }
        }

        if !student.research_interest.is_empty()
            && (normalize_string(&student.research_interest).contains(&specialization)
                || fuzzy_match(&student.research_interest, &project.specialization))
        {
            points += 12.0;
            if reasons.len() < 4 {
                reasons.push("Specialization matches your research interest".to_string());
            }
        }
    }

    f64::min(points, FIELD_CAP)
}

fn tags_score(student: &StudentProfile, project: &ProjectListing, reasons: &mut Vec<String>) -> f64 {
    if project.tags.is_empty() || student.skills.is_empty() {
        return 0.0;
    }

    let points = (jaccard_similarity(&student.skills, &project.tags) * TAGS_WEIGHT).min(TAGS_WEIGHT);
    if points > 10.0 && reasons.len() < 4 {
        reasons.push("Strong tag alignment".to_string());
    }

    points
}

fn preferences_score(
    preferences: &ResearchPreference,
    project: &ProjectListing,
    reasons: &mut Vec<String>,
) -> f64 {
    let descriptions = [project.long_desc.as_str(), project.short_desc.as_str()];
    let mut points = 0.0;

    if !preferences.interest_areas.is_empty() {
        let similarity = text_similarity(&preferences.interest_areas, &descriptions);
        if similarity > 0.5 {
            points += 8.0;
        } else if similarity > 0.3 {
            points += 5.0;
        }
    }

    if !preferences.experience_level.is_empty() {
        points += experience_fit(&preferences.experience_level, &project.duration);
    }

    if !preferences.goals.is_empty() && text_similarity(&preferences.goals, &descriptions) > 0.4 {
        points += 3.0;
    }

    if points >= 7.0 && reasons.len() < 5 {
        reasons.push("Aligns with your learning preferences".to_string());
    }

    f64::min(points, PREFERENCES_CAP)
}

/// Beginners suit short projects, advanced students long ones
fn experience_fit(experience_level: &str, duration: &str) -> f64 {
    let level = experience_level.to_lowercase();
    let duration = duration.to_lowercase();
    let mentions = |needles: &[&str]| !duration.is_empty() && needles.iter().any(|n| duration.contains(n));

    if level.contains("beginner") {
        if mentions(&["short", "3", "6"]) { 4.0 } else { 0.0 }
    } else if level.contains("advanced") {
        if mentions(&["long", "12"]) { 4.0 } else { 0.0 }
    } else {
        3.0
    }
}

fn past_projects_score(student: &StudentProfile, project: &ProjectListing, reasons: &mut Vec<String>) -> f64 {
    if student.projects.is_empty() && student.projects_details.is_empty() {
        return 0.0;
    }

    let descriptions = [project.short_desc.as_str(), project.long_desc.as_str()];

    let titles = student.projects.iter().cloned();
    let detailed = student
        .projects_details
        .iter()
        .map(|detail| format!("{} {}", detail.title, detail.description));

    let best = titles
        .chain(detailed)
        .map(|text| text_similarity(&text, &descriptions))
        .fold(0.0, f64::max);

    if best <= 0.4 {
        return 0.0;
    }

    if reasons.len() < 5 {
        reasons.push("Similar to your past projects".to_string());
    }

    (best * PAST_PROJECTS_WEIGHT).min(PAST_PROJECTS_WEIGHT)
}

/// Small boost for projects whose last update came soon after creation
pub fn recency_bonus(project: &ProjectListing) -> f64 {
    let Some(created_at) = project.created_at else {
        return 0.0;
    };
    let updated_at = project.updated_at.unwrap_or(created_at);

    let hours = (updated_at - created_at).num_seconds() as f64 / 3600.0;
    let days = (hours / 24.0).round() as i64;

    if days > RECENCY_WINDOW_DAYS {
        return 0.0;
    }

    let bonus = RECENCY_CAP * (1.0 - days as f64 / RECENCY_WINDOW_DAYS as f64);
    bonus.clamp(0.0, RECENCY_CAP)
}

/// Similarity (0-100) between a candidate and a project the student applied to
///
/// Weighted as tags 40, field of study 25, specialization 20, description 15.
pub fn applied_project_similarity(candidate: &ProjectListing, applied: &ProjectListing) -> f64 {
    let mut similarity = 0.0;

    if !candidate.tags.is_empty() && !applied.tags.is_empty() {
        similarity += jaccard_similarity(&candidate.tags, &applied.tags) * 40.0;
    }

    if !candidate.field_of_study.is_empty()
        && !applied.field_of_study.is_empty()
        && fuzzy_match(&candidate.field_of_study, &applied.field_of_study)
    {
        similarity += 25.0;
    }

    if !candidate.specialization.is_empty()
        && !applied.specialization.is_empty()
        && fuzzy_match(&candidate.specialization, &applied.specialization)
    {
        similarity += 20.0;
    }

    let candidate_text = format!("{} {}", candidate.short_desc, candidate.long_desc);
    similarity += text_similarity(&candidate_text, &[applied.short_desc.as_str(), applied.long_desc.as_str()]) * 15.0;

    similarity
}

fn application_history_score(
    project: &ProjectListing,
    recent_applied: &[ProjectListing],
    reasons: &mut Vec<String>,
) -> f64 {
    let mut best = 0.0;
    let mut most_similar: Option<&ProjectListing> = None;

    for applied in recent_applied {
        let similarity = applied_project_similarity(project, applied);
        if similarity > best {
            best = similarity;
            most_similar = Some(applied);
        }
    }

    if best > 50.0 {
        let named = most_similar
            .map(|applied| applied.name.as_str())
            .filter(|name| !name.is_empty() && best > 70.0);

        match named {
            Some(name) => reasons.push(format!("Similar to \"{}\" you applied to", name)),
            None => reasons.push(RECENT_APPLICATIONS_REASON.to_string()),
        }

        (best / 100.0) * 15.0
    } else if best > 30.0 {
        if reasons.len() < 5 {
            reasons.push("Matches your application interests".to_string());
        }
        (best / 100.0) * 8.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectDetail;
    use chrono::{Duration, TimeZone, Utc};

    fn create_test_student() -> StudentProfile {
        StudentProfile {
            uid: "stu1".to_string(),
            skills: vec!["python".to_string(), "machine learning".to_string()],
            research_interest: "neural networks for medical imaging".to_string(),
            intention: String::new(),
            projects: vec![],
            projects_details: vec![],
        }
    }

    fn create_test_project() -> ProjectListing {
        ProjectListing {
            project_id: "p1".to_string(),
            name: "Imaging Lab".to_string(),
            tags: vec!["python".to_string(), "machine-learning".to_string()],
            field_of_study: "Computer Science".to_string(),
            specialization: "Medical Imaging".to_string(),
            duration: "6 months".to_string(),
            short_desc: "Neural networks for imaging".to_string(),
            long_desc: "Build neural networks that segment medical scans".to_string(),
            is_active: true,
            creator_id: "prof1".to_string(),
            deadline: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_blank_profile_scores_zero() {
        let student = StudentProfile::default();
        let (score, reasons) = calculate_match_score(&student, &create_test_project(), None, &[]);

        assert_eq!(score, 0.0);
        assert_eq!(reasons, vec!["Complete your profile for better matches"]);
    }

    #[test]
    fn test_score_in_range() {
        let (score, reasons) =
            calculate_match_score(&create_test_student(), &create_test_project(), None, &[]);

        assert!(score > 0.0 && score <= 100.0, "score {}", score);
        assert!(!reasons.is_empty());
    }

    #[test]
    fn test_score_rounded_to_one_decimal() {
        let (score, _) = calculate_match_score(&create_test_student(), &create_test_project(), None, &[]);
        assert_eq!((score * 10.0).round() / 10.0, score);
    }

    #[test]
    fn test_skills_reason_levels() {
        let project = create_test_project();
        let mut student = create_test_student();
        student.research_interest.clear();

        student.skills = vec!["python".to_string()];
        let mut reasons = Vec::new();
        skills_score(&student, &project, &mut reasons);
        assert_eq!(reasons, vec!["Relevant skills match"]);

        student.skills = vec!["python".to_string(), "machine learning".to_string()];
        let mut reasons = Vec::new();
        skills_score(&student, &project, &mut reasons);
        assert_eq!(reasons, vec!["Several relevant skills"]);

        student.skills.push("computer science".to_string());
        let mut reasons = Vec::new();
        skills_score(&student, &project, &mut reasons);
        assert_eq!(reasons, vec!["Multiple matching skills"]);
    }

    #[test]
    fn test_project_terms_include_long_description_words() {
        let terms = project_terms(&create_test_project());
        assert!(terms.contains(&"segment".to_string()));
        assert!(terms.contains(&"Medical Imaging".to_string()));
        // four letters or fewer are left out
        assert!(!terms.contains(&"that".to_string()));
    }

    #[test]
    fn test_field_score_capped() {
        let student = create_test_student();
        let project = create_test_project();
        let preferences = ResearchPreference {
            field_of_study: "computer science".to_string(),
            ..Default::default()
        };

        let mut reasons = Vec::new();
        let points = field_score(&student, &project, Some(&preferences), &mut reasons);

        assert_eq!(points, 20.0);
        assert_eq!(reasons[0], "Matches your field of study");
    }

    #[test]
    fn test_specialization_matches_research_interest() {
        let mut student = create_test_student();
        student.skills.clear();
        let project = create_test_project();

        let mut reasons = Vec::new();
        let points = field_score(&student, &project, None, &mut reasons);

        assert_eq!(points, 12.0);
        assert_eq!(reasons, vec!["Specialization matches your research interest"]);
    }

    #[test]
    fn test_experience_fit() {
        assert_eq!(experience_fit("Beginner", "3 months"), 4.0);
        assert_eq!(experience_fit("beginner", "1 year"), 0.0);
        assert_eq!(experience_fit("Advanced", "12 months"), 4.0);
        assert_eq!(experience_fit("advanced", ""), 0.0);
        assert_eq!(experience_fit("intermediate", ""), 3.0);
    }

    #[test]
    fn test_preferences_reason_threshold() {
        let project = create_test_project();
        let preferences = ResearchPreference {
            field_of_study: String::new(),
            experience_level: "beginner".to_string(),
            interest_areas: "neural networks imaging".to_string(),
            goals: String::new(),
        };

        let mut reasons = Vec::new();
        let points = preferences_score(&preferences, &project, &mut reasons);

        // interest areas fully covered (+8) and short duration (+4), capped
        assert_eq!(points, 10.0);
        assert_eq!(reasons, vec!["Aligns with your learning preferences"]);
    }

    #[test]
    fn test_past_projects_bonus() {
        let mut student = create_test_student();
        student.projects_details = vec![ProjectDetail {
            title: "Medical scans".to_string(),
            description: "segment scans using neural networks".to_string(),
        }];
        let project = create_test_project();

        let mut reasons = Vec::new();
        let points = past_projects_score(&student, &project, &mut reasons);

        assert!(points > 4.0 && points <= 10.0, "points {}", points);
        assert_eq!(reasons, vec!["Similar to your past projects"]);
    }

    #[test]
    fn test_past_projects_below_threshold() {
        let mut student = create_test_student();
        student.projects = vec!["Compiler construction".to_string()];

        let mut reasons = Vec::new();
        assert_eq!(past_projects_score(&student, &create_test_project(), &mut reasons), 0.0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_recency_bonus() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut project = create_test_project();

        assert_eq!(recency_bonus(&project), 0.0);

        project.created_at = Some(created);
        project.updated_at = Some(created);
        assert_eq!(recency_bonus(&project), 3.0);

        project.updated_at = Some(created + Duration::days(15));
        assert!((recency_bonus(&project) - 1.5).abs() < 1e-9);

        project.updated_at = Some(created + Duration::days(45));
        assert_eq!(recency_bonus(&project), 0.0);

        // clock skew never pushes the bonus past its ceiling
        project.updated_at = Some(created - Duration::days(10));
        assert_eq!(recency_bonus(&project), 3.0);
    }

    #[test]
    fn test_applied_project_similarity_identical() {
        let project = create_test_project();
        let similarity = applied_project_similarity(&project, &project);
        // tags 40 + field 25 + specialization 20 + description 15
        assert!((similarity - 100.0).abs() < 1e-9, "similarity {}", similarity);
    }

    #[test]
    fn test_application_history_named_reason() {
        let project = create_test_project();
        let mut applied = create_test_project();
        applied.project_id = "p0".to_string();
        applied.name = "Scan Segmentation".to_string();

        let mut reasons = Vec::new();
        let points = application_history_score(&project, &[applied], &mut reasons);

        assert!((points - 15.0).abs() < 1e-9);
        assert_eq!(reasons, vec!["Similar to \"Scan Segmentation\" you applied to"]);
    }

    #[test]
    fn test_application_history_moderate() {
        let project = create_test_project();
        let applied = ProjectListing {
            project_id: "p0".to_string(),
            name: "Other".to_string(),
            field_of_study: "computer science".to_string(),
            specialization: "Robotics".to_string(),
            short_desc: "Neural networks".to_string(),
            ..Default::default()
        };

        let mut reasons = Vec::new();
        let points = application_history_score(&project, &[applied], &mut reasons);

        assert!(points > 0.0 && points <= 8.0, "points {}", points);
        assert_eq!(reasons, vec!["Matches your application interests"]);
    }
}
