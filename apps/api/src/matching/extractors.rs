//! Feature extractors — one sub-score in [0, 1] per fit dimension.
//!
//! None of these fail: missing data falls back to a perfect or neutral score.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::profile::{CandidateProfile, JobPosting, WorkMode};

/// Experience above the maximum never drops below this.
const OVERQUALIFIED_FLOOR: f64 = 0.7;
/// Score when the job lists degrees and none matches.
const EDUCATION_MISMATCH_SCORE: f64 = 0.5;
/// Score when the job is on site somewhere the candidate is not.
const LOCATION_MISMATCH_SCORE: f64 = 0.3;

/// How a required skill is compared against candidate skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchMode {
    /// Bidirectional substring: "react" ↔ "react.js" ↔ "react native".
    #[default]
    Substring,
    /// A candidate skill must contain every token of the requirement.
    Token,
}

impl std::str::FromStr for SkillMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(SkillMatchMode::Substring),
            "token" => Ok(SkillMatchMode::Token),
            other => Err(format!("unknown skill match mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub score: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub missing_mandatory: Vec<String>,
}

/// Fraction of required skills the candidate covers. Every requirement counts
/// once; `SkillRequirement::weight` is not applied.
pub fn skills_match(
    job: &JobPosting,
    candidate: &CandidateProfile,
    mode: SkillMatchMode,
) -> SkillMatch {
    let required: Vec<_> = job
        .required_skills
        .iter()
        .filter(|s| !s.name.trim().is_empty())
        .collect();

    if required.is_empty() {
        return SkillMatch {
            score: 1.0,
            ..Default::default()
        };
    }

    let candidate_skills: Vec<String> = candidate
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut result = SkillMatch::default();
    for requirement in &required {
        let wanted = requirement.name.trim().to_lowercase();
        let hit = candidate_skills
            .iter()
            .any(|have| skill_covers(have, &wanted, mode));

        if hit {
            result.matched.push(requirement.name.clone());
        } else {
            result.missing.push(requirement.name.clone());
            if requirement.mandatory {
                result.missing_mandatory.push(requirement.name.clone());
            }
        }
    }

    result.score = result.matched.len() as f64 / required.len() as f64;
    result
}

fn skill_covers(have: &str, wanted: &str, mode: SkillMatchMode) -> bool {
    match mode {
        SkillMatchMode::Substring => have.contains(wanted) || wanted.contains(have),
        SkillMatchMode::Token => {
            let have_tokens = tokens(have);
            let wanted_tokens = tokens(wanted);
            !wanted_tokens.is_empty() && wanted_tokens.is_subset(&have_tokens)
        }
    }
}

fn tokens(skill: &str) -> HashSet<&str> {
    skill
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '-' | '_' | '(' | ')'))
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn experience_match(job: &JobPosting, candidate: &CandidateProfile) -> f64 {
    let years = candidate.experience_years.max(0.0);
    let min = job.min_experience.max(0.0);

    if years < min {
        return (1.0 - (min - years) / min).clamp(0.0, 1.0);
    }

    match job.max_experience {
        Some(max) if max > 0.0 && years > max => {
            (1.0 - (years - max) / max).max(OVERQUALIFIED_FLOOR)
        }
        _ => 1.0,
    }
}

pub fn education_match(job: &JobPosting, candidate: &CandidateProfile) -> f64 {
    let requirements: Vec<String> = job
        .education
        .iter()
        .map(|e| e.degree.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .collect();

    if requirements.is_empty() {
        return 1.0;
    }

    let degree = match candidate.degree.as_deref().map(|d| d.trim().to_lowercase()) {
        Some(d) if !d.is_empty() => d,
        _ => return EDUCATION_MISMATCH_SCORE,
    };

    if requirements
        .iter()
        .any(|req| req.contains(&degree) || degree.contains(req.as_str()))
    {
        1.0
    } else {
        EDUCATION_MISMATCH_SCORE
    }
}

pub fn location_match(job: &JobPosting, candidate: &CandidateProfile) -> f64 {
    if job.work_mode == WorkMode::Remote || job.locations.is_empty() {
        return 1.0;
    }
    if job.locations.iter().any(|l| l.remote) {
        return 1.0;
    }

    let city = match candidate.city.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => return LOCATION_MISMATCH_SCORE,
    };

    let city = city.to_lowercase();
    if job
        .locations
        .iter()
        .any(|l| l.city.trim().to_lowercase() == city)
    {
        1.0
    } else {
        LOCATION_MISMATCH_SCORE
    }
}
