//! Human-readable match reasons, explanation text and the per-component
//! scoring breakdown attached to every recommendation.

use crate::models::candidate::CandidateProfile;
use crate::models::posting::PostingRecord;
use crate::models::recommendation::{
    ComponentContribution, Recommendation, RecommendationSource, RecommendationStrength,
    ScoringBreakdown,
};
use crate::scoring::attributes::matched_sectors;
use crate::scoring::combined::{ScoreComponents, ScoredPosting};
use crate::scoring::location::LocationMatchKind;
use crate::scoring::settings::{ScoringWeights, SkillScoring};
use crate::scoring::taxonomy::{matched_skills, MatchType};
use crate::scoring::Signal;

const MAX_LISTED_SKILLS: usize = 3;
const MAX_LISTED_DOMAINS: usize = 2;
const MAX_LISTED_SECTORS: usize = 2;
const STRONG_SIMILARITY: f64 = 0.7;

pub fn personalized(
    scored: &ScoredPosting<'_>,
    candidate: &CandidateProfile,
    weights: &ScoringWeights,
    skill_scoring: &SkillScoring,
) -> Recommendation {
    let posting = scored.posting;
    let components = &scored.components;
    Recommendation::from_posting(
        posting,
        scored.final_score,
        RecommendationSource::Personalized,
        match_reasons(components, posting, candidate, skill_scoring),
        explanation_text(components, posting, candidate),
        breakdown(components, weights, scored.final_score),
    )
}

/// Cold-start results carry reasons and text but no component breakdown.
pub fn bootstrap(
    posting: &PostingRecord,
    score: f64,
    candidate: &CandidateProfile,
    city_hit: bool,
) -> Recommendation {
    let skills = matched_skills(&candidate.skills, &posting.skill_list());
    let sectors = matched_sectors(&candidate.preferred_sectors, &posting.sector_list());

    let mut reasons = Vec::new();
    if !skills.is_empty() {
        reasons.push(format!("Skills matched: {}", list(&skills, MAX_LISTED_SKILLS)));
    }
    if !sectors.is_empty() {
        reasons.push(format!("Sectors: {}", list(&sectors, MAX_LISTED_SECTORS)));
    }
    if city_hit {
        reasons.push(format!("Location: {}", posting.location_city));
    }
    reasons.push("Based on a partial profile; add more details for personalized matches".to_string());

    let mut lines = vec![header(posting)];
    if !skills.is_empty() {
        lines.push(format!(
            "- Your skills ({}) match the job requirements",
            list(&skills, MAX_LISTED_SKILLS)
        ));
    }
    if !sectors.is_empty() {
        lines.push(format!(
            "- The role is in {}, matching your career interests",
            list(&sectors, MAX_LISTED_SECTORS)
        ));
    }
    if city_hit {
        lines.push(format!(
            "- The location ({}) matches your preferences",
            posting.location_city
        ));
    }
    finish(&mut lines);

    Recommendation::from_posting(
        posting,
        score,
        RecommendationSource::ColdStart,
        reasons,
        lines.join(" "),
        ScoringBreakdown {
            overall_score: score,
            component_scores: Vec::new(),
            weights_used: None,
            recommendation_strength: RecommendationStrength::from_score(score),
        },
    )
}

pub fn match_reasons(
    components: &ScoreComponents,
    posting: &PostingRecord,
    candidate: &CandidateProfile,
    skill_scoring: &SkillScoring,
) -> Vec<String> {
    let mut reasons = Vec::new();
    let details = &components.skill_details;

    if !details.matched_skills.is_empty() {
        reasons.push(format!(
            "Skills matched: {}",
            list(&details.matched_skills, MAX_LISTED_SKILLS)
        ));
    }

    let domains: Vec<String> = details
        .domain_matches
        .iter()
        .take(MAX_LISTED_DOMAINS)
        .map(|m| match (&m.match_type, &m.target_domain) {
            (MatchType::CrossDomain, Some(target)) => format!("{} → {}", m.domain, target),
            (match_type, _) => format!("{} skills ({})", m.domain, match_type.label()),
        })
        .collect();
    if !domains.is_empty() {
        reasons.push(format!("Domain alignment: {}", domains.join(", ")));
    }

    if details.points > 0.0 {
        reasons.push(format!(
            "Skill compatibility: {:.1}/{:.1}",
            details.points, skill_scoring.exact_match
        ));
    }

    let have = candidate.education().unwrap_or("unknown");
    let need = posting.required_qualification().unwrap_or("unknown");
    let qualification = components.qualification_reason;
    if qualification.is_rejection() {
        reasons.push(format!(
            "Qualification concern: {} ({have} vs required {need})",
            qualification.label()
        ));
    } else {
        reasons.push(format!(
            "Education: {} ({have} → {need})",
            qualification.label()
        ));
    }

    if components.experience_compatibility > 0.0 {
        reasons.push(format!(
            "Experience: {}",
            components.experience_reason.label()
        ));
    }

    if components.location_match > 0.5 {
        reasons.push(format!("Location: {}", components.location_kind.label()));
    } else if components.location_match > 0.0 {
        reasons.push("Location: not in preferred area".to_string());
    }

    if components.sector_relevance > 0.0 {
        let sectors = matched_sectors(&candidate.preferred_sectors, &posting.sector_list());
        if !sectors.is_empty() {
            reasons.push(format!("Sectors: {}", list(&sectors, MAX_LISTED_SECTORS)));
        }
    }

    if components.diversity_bonus > 0.0 {
        reasons.push("Diversity: provides variety in opportunities".to_string());
    }

    if components.stipend_match > 0.5 {
        reasons.push(format!(
            "Compensation: {} (offered: {})",
            candidate.stipend_preference().unwrap_or("any"),
            posting.stipend.as_deref().unwrap_or("not specified")
        ));
    }

    reasons
}

pub fn explanation_text(
    components: &ScoreComponents,
    posting: &PostingRecord,
    candidate: &CandidateProfile,
) -> String {
    let mut lines = vec![header(posting)];

    let skills = matched_skills(&candidate.skills, &posting.skill_list());
    if !skills.is_empty() {
        lines.push(format!(
            "- Your skills ({}) match the job requirements",
            list(&skills, MAX_LISTED_SKILLS)
        ));
    } else if components.skill_overlap > 0.0 {
        lines.push("- Your technical skills align well with the role requirements".to_string());
    }

    let have = candidate
        .education()
        .map(|e| format!("Your {e} qualification"))
        .unwrap_or_else(|| "Your qualification".to_string());
    let need = posting.required_qualification().unwrap_or("unspecified");
    lines.push(match components.qualification_fit {
        q if q >= 0.8 => format!("- {have} is an excellent match for this position"),
        q if q >= 0.3 => format!("- {have} meets the requirements (position requires {need})"),
        _ => format!("- {have} is compatible with this {need} position"),
    });

    match components.location_kind {
        LocationMatchKind::City | LocationMatchKind::District => lines.push(format!(
            "- The location ({}) perfectly matches your preferences",
            posting.location_city
        )),
        LocationMatchKind::State => lines.push(format!(
            "- The location is in {}, which aligns with your preferences",
            posting.location_state
        )),
        LocationMatchKind::RemoteFlexible | LocationMatchKind::NoMatchRemoteOk => lines
            .push("- Remote work options make this accessible from your location".to_string()),
        _ => {}
    }

    if components.sector_relevance > 0.0 {
        let sectors = matched_sectors(&candidate.preferred_sectors, &posting.sector_list());
        if !sectors.is_empty() {
            lines.push(format!(
                "- The role is in {}, matching your career interests",
                list(&sectors, MAX_LISTED_SECTORS)
            ));
        }
    }

    if components.embedding_similarity > STRONG_SIMILARITY {
        lines.push(
            "- Your overall profile and career goals align exceptionally well with this opportunity"
                .to_string(),
        );
    }

    finish(&mut lines);
    lines.join(" ")
}

/// Per-signal contribution under the weights applied in this request.
pub fn breakdown(
    components: &ScoreComponents,
    weights: &ScoringWeights,
    overall_score: f64,
) -> ScoringBreakdown {
    let component_scores = Signal::ALL
        .iter()
        .map(|&signal| {
            let raw_score = components.get(signal);
            let weight = weights.get(signal);
            let contribution = raw_score * weight;
            let percentage = if overall_score > 0.0 {
                (contribution / overall_score * 1000.0).round() / 10.0
            } else {
                0.0
            };
            ComponentContribution {
                component: signal,
                raw_score,
                weight,
                contribution,
                percentage,
            }
        })
        .collect();

    ScoringBreakdown {
        overall_score,
        component_scores,
        weights_used: Some(weights.clone()),
        recommendation_strength: RecommendationStrength::from_score(overall_score),
    }
}

fn header(posting: &PostingRecord) -> String {
    format!(
        "This {} position at {} is recommended because:",
        posting.title, posting.organization
    )
}

fn finish(lines: &mut Vec<String>) {
    if lines.len() == 1 {
        lines.push("- It matches your general profile characteristics and interests".to_string());
    }
}

fn list(items: &[String], max: usize) -> String {
    items
        .iter()
        .take(max)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::qualification::{ExperienceReason, QualificationReason};
    use crate::scoring::taxonomy::{DomainMatch, SkillDetails};
    use crate::test_support::{candidate, posting, settings, strings};

    fn components() -> ScoreComponents {
        ScoreComponents {
            embedding_similarity: 0.9,
            skill_overlap: 1.0,
            qualification_fit: 1.0,
            experience_compatibility: 1.0,
            location_match: 1.0,
            sector_relevance: 1.0,
            stipend_match: 0.8,
            recency: 1.0,
            diversity_bonus: 1.0,
            skill_details: SkillDetails {
                matched_skills: strings(&["python"]),
                domain_matches: vec![DomainMatch {
                    skill: "python".to_string(),
                    match_type: MatchType::Exact,
                    domain: "programming".to_string(),
                    target_domain: None,
                }],
                skill_gaps: Vec::new(),
                points: 3.0,
            },
            qualification_reason: QualificationReason::ExactMatch,
            experience_reason: ExperienceReason::BeginnerFriendly,
            location_kind: LocationMatchKind::City,
        }
    }

    fn python_posting() -> PostingRecord {
        let mut p = posting("INT001");
        p.title = "Data Analyst Intern".to_string();
        p.organization = "Acme".to_string();
        p.preferred_skills = "Python, SQL".to_string();
        p.eligibility_min_qualification = Some("ug".to_string());
        p.sector_tags = "Technology".to_string();
        p.location_city = "Bangalore".to_string();
        p.stipend = Some("10000".to_string());
        p
    }

    fn python_candidate() -> CandidateProfile {
        let mut c = candidate("ug", &["python"]);
        c.preferred_sectors = strings(&["technology"]);
        c.stipend_pref = Some("8000-12000".to_string());
        c
    }

    #[test]
    fn test_reasons_cover_each_signal() {
        let s = settings();
        let reasons = match_reasons(&components(), &python_posting(), &python_candidate(), &s.skill_scoring);

        assert_eq!(reasons[0], "Skills matched: python");
        assert!(reasons.contains(&"Domain alignment: programming skills (exact match)".to_string()));
        assert!(reasons.contains(&"Skill compatibility: 3.0/3.0".to_string()));
        assert!(reasons.contains(&"Education: exact match (ug → ug)".to_string()));
        assert!(reasons.contains(&"Location: same city".to_string()));
        assert!(reasons.contains(&"Sectors: technology".to_string()));
        assert!(reasons.contains(&"Compensation: 8000-12000 (offered: 10000)".to_string()));
    }

    #[test]
    fn test_low_location_gets_warning() {
        let s = settings();
        let mut c = components();
        c.location_match = 0.2;
        c.location_kind = LocationMatchKind::DifferentState;
        let reasons = match_reasons(&c, &python_posting(), &python_candidate(), &s.skill_scoring);
        assert!(reasons.contains(&"Location: not in preferred area".to_string()));
    }

    #[test]
    fn test_cross_domain_reason_names_both_domains() {
        let s = settings();
        let mut c = components();
        c.skill_details.domain_matches[0].match_type = MatchType::CrossDomain;
        c.skill_details.domain_matches[0].target_domain = Some("data_science".to_string());
        let reasons = match_reasons(&c, &python_posting(), &python_candidate(), &s.skill_scoring);
        assert!(reasons.contains(&"Domain alignment: programming → data_science".to_string()));
    }

    #[test]
    fn test_explanation_mentions_skills_location_and_sector() {
        let text = explanation_text(&components(), &python_posting(), &python_candidate());
        assert!(text.starts_with("This Data Analyst Intern position at Acme is recommended because:"));
        assert!(text.contains("Your skills (python) match"));
        assert!(text.contains("Your ug qualification is an excellent match"));
        assert!(text.contains("The location (Bangalore) perfectly matches"));
        assert!(text.contains("The role is in technology"));
        assert!(text.contains("align exceptionally well"));
    }

    #[test]
    fn test_breakdown_uses_applied_weights() {
        let s = settings();
        let mut weights = s.scoring_weights.clone();
        weights.location_match = 0.24;
        let c = components();
        let overall = c.weighted_total(&weights);

        let b = breakdown(&c, &weights, overall);
        assert_eq!(b.component_scores.len(), Signal::ALL.len());
        assert!(b.has_component(Signal::DiversityBonus));
        let location = b
            .component_scores
            .iter()
            .find(|c| c.component == Signal::LocationMatch)
            .unwrap();
        assert_eq!(location.weight, 0.24);
        assert_eq!(b.weights_used.as_ref(), Some(&weights));
        assert_eq!(b.recommendation_strength, RecommendationStrength::Excellent);
    }

    #[test]
    fn test_bootstrap_has_no_components() {
        let rec = bootstrap(&python_posting(), 0.7, &python_candidate(), true);
        assert_eq!(rec.source, RecommendationSource::ColdStart);
        assert!(rec.scoring_breakdown.component_scores.is_empty());
        assert!(rec.scoring_breakdown.weights_used.is_none());
        assert!(rec.match_reasons.contains(&"Location: Bangalore".to_string()));
        assert_eq!(rec.score, 0.7);
    }
}
