//! Match engine — runs the extractors, weights the sub-scores, explains the result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::embedding::{cosine_similarity, Embedder};
use crate::matching::extractors::{
    education_match, experience_match, location_match, skills_match, SkillMatch, SkillMatchMode,
};
use crate::matching::profile::{CandidateProfile, JobPosting};
use crate::matching::weights::{aggregate, MatchBreakdown, MatchWeights};

const NEUTRAL_SCORE: f64 = 0.5;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Score for {dimension} is not a finite value in [0, 1]")]
    NonFinite { dimension: &'static str },
}

/// Where the candidate's expected salary sits against the job's band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryFit {
    Over,
    Under,
    Match,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: f64,
    pub breakdown: MatchBreakdown,
    pub reasoning: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub salary_fit: Option<SalaryFit>,
    pub embedder: String,
}

impl MatchResult {
    /// Mid-scale result handed to clients when scoring fails.
    pub fn neutral(embedder: &str) -> Self {
        Self {
            overall_score: NEUTRAL_SCORE,
            breakdown: MatchBreakdown {
                skills: NEUTRAL_SCORE,
                experience: NEUTRAL_SCORE,
                education: NEUTRAL_SCORE,
                location: NEUTRAL_SCORE,
                semantic: None,
            },
            reasoning: vec!["Insufficient data for a reliable match".to_string()],
            matched_skills: Vec::new(),
            missing_skills: Vec::new(),
            salary_fit: None,
            embedder: embedder.to_string(),
        }
    }
}

pub struct MatchEngine {
    weights: MatchWeights,
    skill_mode: SkillMatchMode,
    embedder: Arc<dyn Embedder>,
}

impl MatchEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            weights: MatchWeights::default(),
            skill_mode: SkillMatchMode::default(),
            embedder,
        }
    }

    pub fn with_skill_mode(mut self, mode: SkillMatchMode) -> Self {
        self.skill_mode = mode;
        self
    }

    #[cfg(test)]
    pub fn with_weights(mut self, weights: MatchWeights) -> Self {
        self.weights = weights;
        self
    }

    pub async fn score(
        &self,
        job: &JobPosting,
        candidate: &CandidateProfile,
    ) -> Result<MatchResult, MatchError> {
        let skills = skills_match(job, candidate, self.skill_mode);
        let breakdown = MatchBreakdown {
            skills: skills.score,
            experience: experience_match(job, candidate),
            education: education_match(job, candidate),
            location: location_match(job, candidate),
            semantic: self.semantic_match(job, candidate).await,
        };
        check_breakdown(&breakdown)?;

        let overall_score = aggregate(&breakdown, &self.weights);
        if !overall_score.is_finite() {
            return Err(MatchError::NonFinite {
                dimension: "overall",
            });
        }

        debug!(
            job_id = ?job.id,
            candidate_id = ?candidate.id,
            overall_score,
            "computed match score"
        );

        Ok(MatchResult {
            overall_score,
            reasoning: build_reasoning(&breakdown, &skills),
            breakdown,
            matched_skills: skills.matched,
            missing_skills: skills.missing,
            salary_fit: salary_fit(job, candidate),
            embedder: self.embedder.name().to_string(),
        })
    }

    /// Scores for an HTTP response: a scoring error is logged and answered
    /// with `MatchResult::neutral`.
    pub async fn score_or_neutral(
        &self,
        job: &JobPosting,
        candidate: &CandidateProfile,
    ) -> MatchResult {
        match self.score(job, candidate).await {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    job_id = ?job.id,
                    candidate_id = ?candidate.id,
                    "match scoring fell back to neutral: {e}"
                );
                MatchResult::neutral(self.embedder.name())
            }
        }
    }

    /// `None` when either side has no text or the embedder fails; the
    /// aggregator then drops the dimension.
    async fn semantic_match(&self, job: &JobPosting, candidate: &CandidateProfile) -> Option<f64> {
        let job_text = job.embedding_text();
        let candidate_text = candidate.embedding_text();
        if job_text.trim().is_empty() || candidate_text.trim().is_empty() {
            return None;
        }

        let job_vec = match self.embedder.embed(&job_text).await {
            Ok(v) => v,
            Err(e) => {
                warn!(job_id = ?job.id, "job embedding failed, skipping semantic score: {e}");
                return None;
            }
        };
        let candidate_vec = match self.embedder.embed(&candidate_text).await {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    candidate_id = ?candidate.id,
                    "candidate embedding failed, skipping semantic score: {e}"
                );
                return None;
            }
        };

        Some(cosine_similarity(&job_vec, &candidate_vec))
    }
}

fn check_breakdown(breakdown: &MatchBreakdown) -> Result<(), MatchError> {
    let dimensions = [
        ("skills", Some(breakdown.skills)),
        ("experience", Some(breakdown.experience)),
        ("education", Some(breakdown.education)),
        ("location", Some(breakdown.location)),
        ("semantic", breakdown.semantic),
    ];
    for (dimension, score) in dimensions {
        if let Some(score) = score {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(MatchError::NonFinite { dimension });
            }
        }
    }
    Ok(())
}

/// Canned phrases gated on sub-score thresholds.
pub fn build_reasoning(breakdown: &MatchBreakdown, skills: &SkillMatch) -> Vec<String> {
    let mut reasons = Vec::new();

    if breakdown.skills > 0.8 {
        reasons.push("Strong skill alignment".to_string());
    }
    if breakdown.experience > 0.8 {
        reasons.push("Experience level matches requirements".to_string());
    }
    if breakdown.education > 0.8 {
        reasons.push("Educational background fits the role".to_string());
    }
    if breakdown.location > 0.8 {
        reasons.push("Location preference aligned".to_string());
    }
    if breakdown.semantic.is_some_and(|s| s > 0.7) {
        reasons.push("Profile closely matches the job description".to_string());
    }
    if !skills.missing_mandatory.is_empty() {
        reasons.push(format!(
            "Missing mandatory skills: {}",
            skills.missing_mandatory.join(", ")
        ));
    }

    reasons
}

pub fn salary_fit(job: &JobPosting, candidate: &CandidateProfile) -> Option<SalaryFit> {
    let expected = candidate.expected_salary?;
    let band = job.salary?;

    if expected > band.max {
        Some(SalaryFit::Over)
    } else if expected < band.min {
        Some(SalaryFit::Under)
    } else {
        Some(SalaryFit::Match)
    }
}
