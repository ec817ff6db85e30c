//! Axum route handlers for the Match API.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::engine::MatchResult;
use crate::matching::prediction::{predict_application_success, SuccessPrediction};
use crate::matching::profile::{CandidateProfile, JobPosting};
use crate::matching::ranker::{
    rank_candidates, recommend_jobs, CandidateMatch, JobRecommendation, RankOptions,
};
use crate::matching::store::{fetch_job, fetch_open_jobs, fetch_student, fetch_students};
use crate::models::student::StudentRow;
use crate::notify::JobAlert;
use crate::state::AppState;

const MAX_LIMIT: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub job: JobPosting,
    #[serde(default)]
    pub candidate: CandidateProfile,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct StoredMatchResponse {
    pub job_id: Uuid,
    pub student_id: Uuid,
    #[serde(flatten)]
    pub result: MatchResult,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub student_id: Uuid,
    pub recommendations: Vec<JobRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub job_id: Uuid,
    pub candidates: Vec<CandidateMatch>,
}

#[derive(Debug, Default, Serialize)]
pub struct AlertResponse {
    pub job_id: Uuid,
    pub matched: usize,
    pub notified: usize,
    pub skipped_no_phone: usize,
    pub failed: usize,
    pub scanned: usize,
    pub notifier: String,
}

fn rank_options(state: &AppState, limit: Option<usize>) -> Result<RankOptions, AppError> {
    let limit = match limit {
        Some(0) => return Err(AppError::Validation("limit must be at least 1".to_string())),
        Some(n) => n.min(MAX_LIMIT),
        None => state.config.recommendation_limit,
    };
    Ok(RankOptions {
        threshold: state.config.match_threshold,
        limit,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matches/score
///
/// Scores inline job and candidate payloads; nothing is read from the DB.
/// A scoring failure comes back as the neutral result.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Json<MatchResult> {
    Json(
        state
            .engine
            .score_or_neutral(&request.job, &request.candidate)
            .await,
    )
}

/// POST /api/v1/matches/predict
///
/// Always 200: scoring failures come back as the neutral prediction.
pub async fn handle_predict(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Json<SuccessPrediction> {
    Json(predict_application_success(&state.engine, &request.job, &request.candidate).await)
}

/// GET /api/v1/jobs/:job_id/matches/:student_id
pub async fn handle_stored_match(
    State(state): State<AppState>,
    Path((job_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StoredMatchResponse>, AppError> {
    let job = JobPosting::from(fetch_job(&state.db, job_id).await?);
    let student = fetch_student(&state.db, student_id).await?;
    let candidate = CandidateProfile::from(&student);

    let result = state.engine.score_or_neutral(&job, &candidate).await;

    Ok(Json(StoredMatchResponse {
        job_id,
        student_id,
        result,
    }))
}

/// GET /api/v1/students/:student_id/recommendations?limit=
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let options = rank_options(&state, query.limit)?;
    let candidate = CandidateProfile::from(&fetch_student(&state.db, student_id).await?);
    let jobs: Vec<JobPosting> = fetch_open_jobs(&state.db)
        .await?
        .into_iter()
        .map(JobPosting::from)
        .collect();

    let recommendations = recommend_jobs(&state.engine, &candidate, &jobs, options).await;
    info!(
        %student_id,
        scanned = jobs.len(),
        returned = recommendations.len(),
        "job recommendations computed"
    );

    Ok(Json(RecommendationsResponse {
        student_id,
        recommendations,
    }))
}

/// GET /api/v1/jobs/:job_id/candidates?limit=
pub async fn handle_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<CandidatesResponse>, AppError> {
    let options = rank_options(&state, query.limit)?;
    let job = JobPosting::from(fetch_job(&state.db, job_id).await?);
    let profiles: Vec<CandidateProfile> = fetch_students(&state.db)
        .await?
        .iter()
        .map(CandidateProfile::from)
        .collect();

    let candidates = rank_candidates(&state.engine, &job, &profiles, options).await;
    info!(
        %job_id,
        scanned = profiles.len(),
        returned = candidates.len(),
        "candidate ranking computed"
    );

    Ok(Json(CandidatesResponse { job_id, candidates }))
}

/// POST /api/v1/jobs/:job_id/alerts?limit=
///
/// Ranks students for the job and sends each match a job alert. Delivery
/// failures are counted, not returned as errors.
pub async fn handle_job_alerts(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<AlertResponse>, AppError> {
    let options = rank_options(&state, query.limit)?;
    let job_row = fetch_job(&state.db, job_id).await?;
    let company_name = job_row.company_name.clone();
    let job = JobPosting::from(job_row);

    let students = fetch_students(&state.db).await?;
    let profiles: Vec<CandidateProfile> = students.iter().map(CandidateProfile::from).collect();
    let by_id: HashMap<Uuid, &StudentRow> = students.iter().map(|s| (s.id, s)).collect();

    let matches = rank_candidates(&state.engine, &job, &profiles, options).await;

    let mut response = AlertResponse {
        job_id,
        matched: matches.len(),
        scanned: students.len(),
        notifier: state.notifier.name().to_string(),
        ..Default::default()
    };

    for m in &matches {
        let Some(student) = m.candidate_id.and_then(|id| by_id.get(&id)) else {
            continue;
        };
        let Some(phone) = student.alert_phone() else {
            response.skipped_no_phone += 1;
            continue;
        };

        let alert = JobAlert {
            student_id: student.id,
            student_name: student.name.clone(),
            phone: phone.to_string(),
            job_id,
            job_title: job.title.clone(),
            company_name: company_name.clone(),
            match_percent: (m.result.overall_score * 100.0).round() as u32,
        };

        match state.notifier.send_job_alert(&alert).await {
            Ok(()) => response.notified += 1,
            Err(e) => {
                warn!(student_id = %student.id, %job_id, "job alert failed: {e}");
                response.failed += 1;
            }
        }
    }

    info!(
        %job_id,
        scanned = response.scanned,
        matched = response.matched,
        notified = response.notified,
        failed = response.failed,
        "job alerts dispatched"
    );

    Ok(Json(response))
}
