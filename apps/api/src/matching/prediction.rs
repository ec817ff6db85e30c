use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::matching::engine::{MatchEngine, MatchResult};
use crate::matching::profile::{CandidateProfile, JobPosting};

const NEUTRAL_PROBABILITY: f64 = 0.5;
const BASE_CONFIDENCE: f64 = 0.3;
const COMPLETENESS_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessPrediction {
    pub probability: f64,
    pub confidence: f64,
    pub factors: Vec<String>,
    pub match_result: Option<MatchResult>,
}

impl SuccessPrediction {
    pub fn neutral() -> Self {
        Self {
            probability: NEUTRAL_PROBABILITY,
            confidence: BASE_CONFIDENCE,
            factors: vec!["Insufficient data for a reliable prediction".to_string()],
            match_result: None,
        }
    }
}

/// Likelihood that an application from `candidate` to `job` succeeds.
///
/// Never fails: a scoring error yields `SuccessPrediction::neutral()`.
pub async fn predict_application_success(
    engine: &MatchEngine,
    job: &JobPosting,
    candidate: &CandidateProfile,
) -> SuccessPrediction {
    match engine.score(job, candidate).await {
        Ok(result) => SuccessPrediction {
            probability: result.overall_score,
            confidence: BASE_CONFIDENCE + COMPLETENESS_CONFIDENCE * candidate.completeness(),
            factors: result.reasoning.clone(),
            match_result: Some(result),
        },
        Err(e) => {
            warn!(job_id = ?job.id, candidate_id = ?candidate.id, "prediction fell back to neutral: {e}");
            SuccessPrediction::neutral()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::matching::engine::tests::ConstantEmbedder;
    use crate::matching::profile::SkillRequirement;
    use crate::matching::weights::MatchWeights;

    #[tokio::test]
    async fn test_probability_is_overall_score() {
        let engine = MatchEngine::new(Arc::new(ConstantEmbedder));
        let job = JobPosting {
            required_skills: vec![SkillRequirement::new("Excel")],
            ..Default::default()
        };
        let candidate = CandidateProfile {
            skills: vec!["excel".to_string()],
            experience_years: 1.0,
            degree: Some("BCom".to_string()),
            city: Some("Surat".to_string()),
            summary: Some("Commerce graduate".to_string()),
            ..Default::default()
        };

        let prediction = predict_application_success(&engine, &job, &candidate).await;
        let result = prediction.match_result.as_ref().unwrap();
        assert_eq!(prediction.probability, result.overall_score);
        assert!((prediction.confidence - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sparse_profile_has_low_confidence() {
        let engine = MatchEngine::new(Arc::new(ConstantEmbedder));
        let prediction =
            predict_application_success(&engine, &JobPosting::default(), &CandidateProfile::default())
                .await;
        assert!((prediction.confidence - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_scoring_error_returns_neutral() {
        let weights = MatchWeights {
            skills: f64::NAN,
            ..Default::default()
        };
        let engine = MatchEngine::new(Arc::new(ConstantEmbedder)).with_weights(weights);

        let prediction =
            predict_application_success(&engine, &JobPosting::default(), &CandidateProfile::default())
                .await;
        assert_eq!(prediction.probability, 0.5);
        assert_eq!(prediction.confidence, 0.3);
        assert!(prediction.match_result.is_none());
    }
}
