//! Shared fixtures for scorer and engine tests.

use crate::catalog::embedder::{Embedder, HashingEmbedder};
use crate::catalog::index::FlatIpIndex;
use crate::models::candidate::CandidateProfile;
use crate::models::posting::PostingRecord;
use crate::recommend::engine::RecommendationEngine;
use crate::scoring::settings::EngineSettings;

const TEST_DIMENSION: usize = 64;

pub const SETTINGS_JSON: &str = include_str!("../config/engine.json");

pub fn settings() -> EngineSettings {
    EngineSettings::from_json_str(SETTINGS_JSON).expect("shipped engine.json must be valid")
}

pub fn posting(id: &str) -> PostingRecord {
    PostingRecord {
        internship_id: id.to_string(),
        title: format!("Intern {id}"),
        organization: format!("Org {id}"),
        preferred_skills: String::new(),
        eligibility_min_qualification: None,
        experience_required: None,
        sector_tags: String::new(),
        location_city: String::new(),
        location_district: String::new(),
        location_state: String::new(),
        remote_allowed: false,
        duration_weeks: 12,
        stipend: None,
        posted_date: None,
        application_deadline: None,
        description: String::new(),
        url: format!("https://internships.example/{id}"),
    }
}

pub fn candidate(education: &str, skills: &[&str]) -> CandidateProfile {
    CandidateProfile {
        education_level: Some(education.to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Engine over `postings`, each embedded from its title, skills, sectors and city.
pub fn engine(postings: Vec<PostingRecord>) -> RecommendationEngine {
    let embedder = HashingEmbedder::new(TEST_DIMENSION);
    let rows = postings
        .iter()
        .map(|p| {
            embedder.embed(&format!(
                "{}. Preferred skills: {}. Sectors: {}. Location: {}",
                p.title, p.preferred_skills, p.sector_tags, p.location_city
            ))
        })
        .collect();
    let index = FlatIpIndex::new(rows).expect("test postings embed to equal-length rows");
    RecommendationEngine::new(postings, Box::new(index), Box::new(embedder), settings())
        .expect("test engine dimensions agree")
}
