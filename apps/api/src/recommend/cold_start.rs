//! Fallback for sparse profiles: a relaxed filter-and-score pass over the
//! whole catalog instead of semantic retrieval.

use crate::models::candidate::CandidateProfile;
use crate::models::posting::PostingRecord;
use crate::models::recommendation::Recommendation;
use crate::recommend::explain;
use crate::scoring::settings::EngineSettings;

const REQUIRED_FIELD_CREDIT: f64 = 1.0;
const OPTIONAL_FIELD_CREDIT: f64 = 0.5;
/// 3 required fields at 1.0 plus 4 optional fields at 0.5.
const MAX_COMPLETENESS_CREDIT: f64 = 5.0;

/// Survivors of the relaxed filter considered for scoring, in catalog order.
const BOOTSTRAP_POOL: usize = 50;
const BOOTSTRAP_BASE_SCORE: f64 = 0.5;
const SECTOR_BOOST: f64 = 0.2;
const CITY_BOOST: f64 = 0.2;

/// Share of the profile that is filled in, in [0, 1].
pub fn profile_completeness(candidate: &CandidateProfile) -> f64 {
    let required = [
        has_entries(&candidate.skills),
        candidate.education().is_some(),
        has_entries(&candidate.preferred_sectors),
    ];
    let optional = [
        candidate.has_locations(),
        candidate.years_of_experience > 0,
        candidate.stipend_preference().is_some(),
        candidate.goal().is_some(),
    ];

    let earned = required.iter().filter(|f| **f).count() as f64 * REQUIRED_FIELD_CREDIT
        + optional.iter().filter(|f| **f).count() as f64 * OPTIONAL_FIELD_CREDIT;
    earned / MAX_COMPLETENESS_CREDIT
}

fn has_entries(values: &[String]) -> bool {
    values.iter().any(|v| !v.trim().is_empty())
}

fn lowered(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Relaxed content-based ranking used when the profile is too sparse.
pub fn bootstrap(
    postings: &[PostingRecord],
    candidate: &CandidateProfile,
    settings: &EngineSettings,
) -> Vec<Recommendation> {
    let skills = lowered(&candidate.skills);
    let sectors = lowered(&candidate.preferred_sectors);
    let locations = lowered(&candidate.preferred_locations);
    let candidate_level = candidate
        .education()
        .map(|e| settings.qualification_level(e));

    let mut scored: Vec<(f64, &PostingRecord, bool)> = postings
        .iter()
        .filter(|p| {
            let required_level = p
                .required_qualification()
                .map(|q| settings.qualification_level(q));
            match (candidate_level, required_level) {
                // Only skip when more than one level short.
                (Some(have), Some(need)) => i16::from(have) >= i16::from(need) - 1,
                _ => true,
            }
        })
        .filter(|p| {
            let offered = p.preferred_skills.to_lowercase();
            skills.is_empty() || offered.trim().is_empty() || skills.iter().any(|s| offered.contains(s))
        })
        .take(BOOTSTRAP_POOL)
        .map(|p| {
            let tags = p.sector_tags.to_lowercase();
            let city = p.location_city.trim().to_lowercase();
            let sector_hit = !tags.trim().is_empty() && sectors.iter().any(|s| tags.contains(s));
            let city_hit = !city.is_empty() && locations.iter().any(|l| city.contains(l));

            let mut score = BOOTSTRAP_BASE_SCORE;
            if sector_hit {
                score += SECTOR_BOOST;
            }
            if city_hit {
                score += CITY_BOOST;
            }
            (score, p, city_hit)
        })
        .collect();

    // Stable: equal scores keep catalog order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .take(settings.cold_start.default_recommendations)
        .map(|(score, posting, city_hit)| explain::bootstrap(posting, score, candidate, city_hit))
        .collect()
}
