use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::profile::{
    EducationRequirement, JobLocation, JobPosting, SalaryRange, SkillRequirement, WorkMode,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub required_skills: Json<Vec<SkillRequirement>>,
    pub min_experience: f64,
    pub max_experience: Option<f64>,
    pub education: Json<Vec<EducationRequirement>>,
    pub locations: Json<Vec<JobLocation>>,
    pub work_mode: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

fn parse_work_mode(raw: &str) -> WorkMode {
    match raw.trim().to_ascii_lowercase().as_str() {
        "remote" | "work_from_home" | "wfh" => WorkMode::Remote,
        "hybrid" => WorkMode::Hybrid,
        _ => WorkMode::Onsite,
    }
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        let salary = match (row.salary_min, row.salary_max) {
            (None, None) => None,
            (min, max) => Some(SalaryRange::from_bounds(min, max)),
        };

        JobPosting {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            required_skills: row.required_skills.0,
            min_experience: row.min_experience,
            max_experience: row.max_experience,
            education: row.education.0,
            locations: row.locations.0,
            work_mode: parse_work_mode(&row.work_mode),
            salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: "Graduate Engineer Trainee".to_string(),
            company_name: "Acme Infra".to_string(),
            description: "Site engineering".to_string(),
            required_skills: Json(vec![SkillRequirement::new("AutoCAD")]),
            min_experience: 0.0,
            max_experience: Some(1.0),
            education: Json(vec![]),
            locations: Json(vec![JobLocation {
                city: "Nagpur".to_string(),
                remote: false,
            }]),
            work_mode: "WFH".to_string(),
            salary_min: Some(250_000.0),
            salary_max: None,
            status: "open".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_posting() {
        let row = row();
        let id = row.id;
        let posting = JobPosting::from(row);

        assert_eq!(posting.id, Some(id));
        assert_eq!(posting.work_mode, WorkMode::Remote);
        assert_eq!(posting.required_skills[0].name, "AutoCAD");
        let salary = posting.salary.unwrap();
        assert_eq!(salary.min, 250_000.0);
        assert_eq!(salary.max, f64::MAX);
    }

    #[test]
    fn test_unknown_work_mode_is_onsite() {
        assert_eq!(parse_work_mode("field"), WorkMode::Onsite);
        assert_eq!(parse_work_mode(" Hybrid "), WorkMode::Hybrid);
    }
}
