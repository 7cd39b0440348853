use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::models::recommendation::Recommendation;
use crate::recommend::engine::RecommendationEngine;
use crate::state::AppState;

/// Incoming candidate payload. `education_level` and `skills` are required;
/// everything else is optional.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub education_level: Option<String>,
    pub skills: Option<Vec<String>>,
    pub major_field: Option<String>,
    pub preferred_sectors: Option<Vec<String>>,
    pub preferred_locations: Option<Vec<String>>,
    pub remote_ok: Option<bool>,
    pub years_of_experience: Option<u32>,
    pub duration_weeks_pref: Option<u32>,
    pub stipend_pref: Option<String>,
    pub career_goal: Option<String>,
    pub availability_start: Option<String>,
}

impl RecommendRequest {
    pub fn into_profile(self) -> Result<CandidateProfile, AppError> {
        let mut missing = Vec::new();
        if self
            .education_level
            .as_deref()
            .map_or(true, |e| e.trim().is_empty())
        {
            missing.push("education_level");
        }
        if self.skills.is_none() {
            missing.push("skills");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(CandidateProfile {
            education_level: self.education_level,
            major_field: self.major_field,
            skills: self.skills.unwrap_or_default(),
            preferred_sectors: self.preferred_sectors.unwrap_or_default(),
            preferred_locations: self.preferred_locations.unwrap_or_default(),
            remote_ok: self.remote_ok.unwrap_or(false),
            years_of_experience: self.years_of_experience.unwrap_or(0),
            duration_weeks_pref: self.duration_weeks_pref,
            stipend_pref: self.stipend_pref,
            career_goal: self.career_goal,
            availability_start: self.availability_start,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub education_level: Option<String>,
    pub skills_count: usize,
    pub preferred_sectors: Vec<String>,
    pub remote_ok: bool,
}

impl From<&CandidateProfile> for ProfileSummary {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            education_level: profile.education_level.clone(),
            skills_count: profile.skills.len(),
            preferred_sectors: profile.preferred_sectors.clone(),
            remote_ok: profile.remote_ok,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub candidate_profile: ProfileSummary,
    pub recommendations: Vec<Recommendation>,
    pub total_recommendations: usize,
}

#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub success: bool,
    pub message: &'static str,
    pub sample_candidate: CandidateProfile,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_internships: usize,
    pub index_size: usize,
    pub index_type: &'static str,
    pub embedding_dimension: usize,
    pub embedding_model: &'static str,
}

/// Scoring is CPU-bound; keep it off the async workers.
async fn run_engine(
    engine: Arc<RecommendationEngine>,
    profile: CandidateProfile,
) -> Result<(CandidateProfile, Vec<Recommendation>), AppError> {
    let result = tokio::task::spawn_blocking(move || {
        let recs = engine.recommend(&profile);
        (profile, recs)
    })
    .await
    .context("recommendation worker failed")?;
    Ok(result)
}

/// POST /recommend
pub async fn handle_recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let profile = req.into_profile()?;
    info!(%request_id, "Received recommendation request");

    let (profile, recommendations) = run_engine(state.engine.clone(), profile).await?;
    info!(%request_id, "Returning {} recommendations", recommendations.len());

    Ok(Json(RecommendResponse {
        success: true,
        candidate_profile: ProfileSummary::from(&profile),
        total_recommendations: recommendations.len(),
        recommendations,
    }))
}

/// Fixed profile used by the smoke-test endpoint.
pub fn sample_candidate() -> CandidateProfile {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    CandidateProfile {
        education_level: Some("ug".to_string()),
        major_field: Some("Computer Science".to_string()),
        skills: strings(&["python", "javascript", "data analysis"]),
        preferred_sectors: strings(&["technology", "research"]),
        preferred_locations: strings(&["bangalore", "karnataka"]),
        remote_ok: true,
        years_of_experience: 0,
        duration_weeks_pref: Some(12),
        stipend_pref: Some("10000-20000".to_string()),
        career_goal: Some(
            "Looking for data analysis and software development opportunities".to_string(),
        ),
        availability_start: Some("2025-01-01".to_string()),
    }
}

/// GET /recommend/test
pub async fn handle_sample(
    State(state): State<AppState>,
) -> Result<Json<SampleResponse>, AppError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, "Running sample recommendation");

    let (sample_candidate, recommendations) =
        run_engine(state.engine.clone(), sample_candidate()).await?;

    Ok(Json(SampleResponse {
        success: true,
        message: "Test recommendations generated",
        sample_candidate,
        recommendations,
    }))
}

/// GET /stats
pub async fn handle_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let engine = &state.engine;
    Json(StatsResponse {
        total_internships: engine.catalog_size(),
        index_size: engine.index_size(),
        index_type: engine.index_name(),
        embedding_dimension: engine.dimension(),
        embedding_model: engine.embedder_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::test_support::{engine, posting};

    fn app() -> axum::Router {
        let mut python = posting("INT001");
        python.preferred_skills = "python, data analysis".to_string();
        python.eligibility_min_qualification = Some("ug".to_string());
        python.sector_tags = "technology".to_string();
        python.location_city = "Bangalore".to_string();
        python.location_state = "Karnataka".to_string();

        let state = AppState {
            engine: Arc::new(engine(vec![python, posting("INT002")])),
        };
        build_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_missing_required_fields_listed() {
        let req: RecommendRequest = serde_json::from_value(json!({"major_field": "CS"})).unwrap();
        match req.into_profile() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: education_level, skills")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_skills_list_is_accepted() {
        let req: RecommendRequest =
            serde_json::from_value(json!({"education_level": "ug", "skills": []})).unwrap();
        let profile = req.into_profile().unwrap();
        assert!(profile.skills.is_empty());
        assert!(!profile.remote_ok);
    }

    #[tokio::test]
    async fn test_recommend_returns_envelope() {
        let response = app()
            .oneshot(post_json(
                "/recommend",
                json!({
                    "education_level": "ug",
                    "skills": ["python"],
                    "preferred_sectors": ["technology"],
                    "preferred_locations": ["bangalore"],
                    "remote_ok": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["candidate_profile"]["skills_count"], 1);
        assert_eq!(body["recommendations"][0]["internship_id"], "INT001");
        assert_eq!(body["recommendations"][0]["source"], "personalized");
        assert_eq!(
            body["total_recommendations"].as_u64().unwrap() as usize,
            body["recommendations"].as_array().unwrap().len()
        );
    }

    #[tokio::test]
    async fn test_recommend_without_skills_is_bad_request() {
        let response = app()
            .oneshot(post_json("/recommend", json!({"education_level": "ug"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/recommend")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sample_endpoint() {
        let request = Request::builder()
            .uri("/recommend/test")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sample_candidate"]["education_level"], "ug");
        assert!(body["recommendations"].is_array());
    }

    #[tokio::test]
    async fn test_stats_reports_catalog() {
        let request = Request::builder().uri("/stats").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        let body = body_json(response).await;
        assert_eq!(body["total_internships"], 2);
        assert_eq!(body["index_size"], 2);
        assert_eq!(body["embedding_dimension"], 64);
        assert_eq!(body["embedding_model"], "hashing-fnv1a");
    }
}
