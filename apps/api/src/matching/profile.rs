//! Domain records compared by the match engine.
//!
//! Inline payloads are permissive: a missing, null or wrongly typed field
//! falls back to its default instead of rejecting the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// `T::default()` when the value is null or does not fit `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Keeps the well-formed elements of a list; anything but an array is empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    #[default]
    Onsite,
    Remote,
    Hybrid,
}

/// Accepts either `"Python"` or `{"name": "Python", "mandatory": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SkillRequirementRepr")]
pub struct SkillRequirement {
    pub name: String,
    pub mandatory: bool,
    /// Stored with the job but not used in scoring: the skills sub-score is
    /// the plain fraction of requirements matched.
    pub weight: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillRequirementRepr {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, deserialize_with = "lenient")]
        mandatory: bool,
        #[serde(default = "default_skill_weight")]
        weight: f64,
    },
}

impl From<SkillRequirementRepr> for SkillRequirement {
    fn from(repr: SkillRequirementRepr) -> Self {
        match repr {
            SkillRequirementRepr::Name(name) => Self {
                name,
                mandatory: false,
                weight: default_skill_weight(),
            },
            SkillRequirementRepr::Detailed {
                name,
                mandatory,
                weight,
            } => Self {
                name,
                mandatory,
                weight,
            },
        }
    }
}

fn default_skill_weight() -> f64 {
    1.0
}

#[cfg(test)]
impl SkillRequirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            weight: default_skill_weight(),
        }
    }

    pub fn mandatory(name: impl Into<String>) -> Self {
        Self {
            mandatory: true,
            ..Self::new(name)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationRequirement {
    pub degree: String,
    #[serde(default, deserialize_with = "lenient")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mandatory: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobLocation {
    #[serde(default, deserialize_with = "lenient")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient")]
    pub remote: bool,
}

/// Salary band. A missing lower bound is 0 and a missing upper bound is
/// unbounded, for inline payloads and stored rows alike.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "SalaryBounds")]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.unwrap_or(0.0),
            max: max.unwrap_or(f64::MAX),
        }
    }
}

#[derive(Deserialize)]
struct SalaryBounds {
    #[serde(default, deserialize_with = "lenient")]
    min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    max: Option<f64>,
}

impl From<SalaryBounds> for SalaryRange {
    fn from(bounds: SalaryBounds) -> Self {
        Self::from_bounds(bounds.min, bounds.max)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub required_skills: Vec<SkillRequirement>,
    #[serde(default, deserialize_with = "lenient")]
    pub min_experience: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub max_experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub education: Vec<EducationRequirement>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub locations: Vec<JobLocation>,
    #[serde(default, deserialize_with = "lenient")]
    pub work_mode: WorkMode,
    #[serde(default, deserialize_with = "lenient")]
    pub salary: Option<SalaryRange>,
}

impl JobPosting {
    /// Text fed to the embedder for the semantic dimension.
    pub fn embedding_text(&self) -> String {
        let skills = self
            .required_skills
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        [self.title.as_str(), self.description.as_str(), skills.as_str()]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub experience_years: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub expected_salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
}

impl CandidateProfile {
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<&str> = self.skills.iter().map(String::as_str).collect();
        if let Some(degree) = self.degree.as_deref() {
            parts.push(degree);
        }
        if let Some(summary) = self.summary.as_deref() {
            parts.push(summary);
        }
        parts
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fraction of optional profile signals that are filled in.
    pub fn completeness(&self) -> f64 {
        let present = [
            self.skills.iter().any(|s| !s.trim().is_empty()),
            self.experience_years > 0.0,
            self.degree.as_deref().is_some_and(|d| !d.trim().is_empty()),
            self.city.as_deref().is_some_and(|c| !c.trim().is_empty()),
            self.summary.as_deref().is_some_and(|s| !s.trim().is_empty()),
        ];
        present.iter().filter(|p| **p).count() as f64 / present.len() as f64
    }
}
