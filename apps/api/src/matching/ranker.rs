//! Ranking — score many jobs for one candidate (or many candidates for one
//! job), keep those above the threshold, best first.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::matching::engine::{MatchEngine, MatchResult};
use crate::matching::profile::{CandidateProfile, JobPosting};

pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    /// Exclusive lower bound on the overall score.
    pub threshold: f64,
    pub limit: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub job_id: Option<Uuid>,
    pub title: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub candidate_id: Option<Uuid>,
    pub name: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

pub async fn recommend_jobs(
    engine: &MatchEngine,
    candidate: &CandidateProfile,
    jobs: &[JobPosting],
    options: RankOptions,
) -> Vec<JobRecommendation> {
    let mut ranked = Vec::with_capacity(jobs.len());
    for job in jobs {
        match engine.score(job, candidate).await {
            Ok(result) => ranked.push(JobRecommendation {
                job_id: job.id,
                title: job.title.clone(),
                result,
            }),
            Err(e) => warn!(job_id = ?job.id, "skipping job in recommendations: {e}"),
        }
    }
    select_top(ranked, options, |r| r.result.overall_score)
}

pub async fn rank_candidates(
    engine: &MatchEngine,
    job: &JobPosting,
    candidates: &[CandidateProfile],
    options: RankOptions,
) -> Vec<CandidateMatch> {
    let mut ranked = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match engine.score(job, candidate).await {
            Ok(result) => ranked.push(CandidateMatch {
                candidate_id: candidate.id,
                name: candidate.name.clone(),
                result,
            }),
            Err(e) => warn!(candidate_id = ?candidate.id, "skipping candidate in ranking: {e}"),
        }
    }
    select_top(ranked, options, |r| r.result.overall_score)
}

/// Threshold filter, stable descending sort, truncate.
fn select_top<T>(mut items: Vec<T>, options: RankOptions, score: impl Fn(&T) -> f64) -> Vec<T> {
    items.retain(|item| score(item) > options.threshold);
    items.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items.truncate(options.limit);
    items
}
