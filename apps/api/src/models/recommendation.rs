use serde::{Deserialize, Serialize};

use crate::models::posting::PostingRecord;
use crate::scoring::settings::ScoringWeights;
use crate::scoring::taxonomy::SkillGap;
use crate::scoring::Signal;

/// Which pipeline produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Personalized,
    ColdStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationStrength {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Low,
}

impl RecommendationStrength {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => Self::Excellent,
            s if s >= 0.6 => Self::VeryGood,
            s if s >= 0.4 => Self::Good,
            s if s >= 0.2 => Self::Fair,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentContribution {
    pub component: Signal,
    pub raw_score: f64,
    pub weight: f64,
    pub contribution: f64,
    /// Share of the overall score, rounded to one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringBreakdown {
    pub overall_score: f64,
    pub component_scores: Vec<ComponentContribution>,
    /// Request-scoped weights actually applied; absent on the cold-start path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights_used: Option<ScoringWeights>,
    pub recommendation_strength: RecommendationStrength,
}

#[cfg(test)]
impl ScoringBreakdown {
    pub fn has_component(&self, signal: Signal) -> bool {
        self.component_scores.iter().any(|c| c.component == signal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub city: String,
    pub district: String,
    pub state: String,
}

/// A ranked, explained posting returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub internship_id: String,
    pub title: String,
    pub organization: String,
    /// `final_score` rounded to three decimals for display.
    pub score: f64,
    pub final_score: f64,
    pub match_reasons: Vec<String>,
    pub explain_text: String,
    pub scoring_breakdown: ScoringBreakdown,
    pub source: RecommendationSource,
    pub location: LocationSnapshot,
    pub stipend: Option<String>,
    pub duration_weeks: u32,
    pub remote_allowed: bool,
    pub application_deadline: Option<String>,
    pub url: String,
    pub posted_date: Option<String>,
    pub sector_tags: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_development_opportunities: Vec<SkillGap>,
}

impl Recommendation {
    /// Snapshots the posting; scoring fields are supplied by the caller.
    pub fn from_posting(
        posting: &PostingRecord,
        final_score: f64,
        source: RecommendationSource,
        match_reasons: Vec<String>,
        explain_text: String,
        scoring_breakdown: ScoringBreakdown,
    ) -> Self {
        Self {
            internship_id: posting.internship_id.clone(),
            title: posting.title.clone(),
            organization: posting.organization.clone(),
            score: (final_score * 1000.0).round() / 1000.0,
            final_score,
            match_reasons,
            explain_text,
            scoring_breakdown,
            source,
            location: LocationSnapshot {
                city: posting.location_city.clone(),
                district: posting.location_district.clone(),
                state: posting.location_state.clone(),
            },
            stipend: posting.stipend.clone(),
            duration_weeks: posting.duration_weeks,
            remote_allowed: posting.remote_allowed,
            application_deadline: posting.application_deadline.clone(),
            url: posting.url.clone(),
            posted_date: posting.posted_date.clone(),
            sector_tags: posting.sector_tags.clone(),
            description: posting.description.clone(),
            skill_development_opportunities: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(RecommendationStrength::from_score(0.85), RecommendationStrength::Excellent);
        assert_eq!(RecommendationStrength::from_score(0.6), RecommendationStrength::VeryGood);
        assert_eq!(RecommendationStrength::from_score(0.45), RecommendationStrength::Good);
        assert_eq!(RecommendationStrength::from_score(0.2), RecommendationStrength::Fair);
        assert_eq!(RecommendationStrength::from_score(0.05), RecommendationStrength::Low);
    }

    #[test]
    fn test_strength_serializes_with_space() {
        let json = serde_json::to_string(&RecommendationStrength::VeryGood).unwrap();
        assert_eq!(json, "\"Very Good\"");
    }
}
