use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::profile::CandidateProfile;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub degree: Option<String>,
    pub city: Option<String>,
    pub expected_salary: Option<f64>,
    pub summary: Option<String>,
    pub whatsapp_opt_in: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&StudentRow> for CandidateProfile {
    fn from(row: &StudentRow) -> Self {
        CandidateProfile {
            id: Some(row.id),
            name: row.name.clone(),
            skills: row.skills.clone(),
            experience_years: row.experience_years,
            degree: row.degree.clone(),
            city: row.city.clone(),
            expected_salary: row.expected_salary,
            summary: row.summary.clone(),
        }
    }
}

impl StudentRow {
    /// Phone number to alert on, if the student opted in.
    pub fn alert_phone(&self) -> Option<&str> {
        if !self.whatsapp_opt_in {
            return None;
        }
        self.phone.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> StudentRow {
        StudentRow {
            id: Uuid::new_v4(),
            name: "Meera".to_string(),
            email: "meera@example.edu".to_string(),
            phone: Some("+919800000000".to_string()),
            skills: vec!["java".to_string()],
            experience_years: 0.5,
            degree: Some("BCA".to_string()),
            city: Some("Indore".to_string()),
            expected_salary: None,
            summary: None,
            whatsapp_opt_in: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_profile() {
        let row = row();
        let profile = CandidateProfile::from(&row);
        assert_eq!(profile.id, Some(row.id));
        assert_eq!(profile.skills, vec!["java"]);
        assert_eq!(profile.city.as_deref(), Some("Indore"));
    }

    #[test]
    fn test_alert_phone_requires_opt_in() {
        let mut row = row();
        assert_eq!(row.alert_phone(), Some("+919800000000"));

        row.whatsapp_opt_in = false;
        assert_eq!(row.alert_phone(), None);

        row.whatsapp_opt_in = true;
        row.phone = Some("  ".to_string());
        assert_eq!(row.alert_phone(), None);
    }
}
