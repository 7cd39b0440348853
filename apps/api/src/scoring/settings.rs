//! Engine settings: every scorer constant, weight and table, loaded once at startup.
//!
//! No field carries a serde default: a key missing from the settings file is a
//! startup failure, never a silently defaulted weight.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::EngineError;
use crate::scoring::Signal;

/// Allowed drift of the weight total from 1.0 before a warning is logged.
const WEIGHT_TOTAL_TOLERANCE: f64 = 0.05;

/// Ladder position of any qualification the settings do not name.
pub const UNRANKED_QUALIFICATION_LEVEL: u8 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    pub scoring_weights: ScoringWeights,
    pub similarity: SimilarityRange,
    pub skill_scoring: SkillScoring,
    pub skill_taxonomy: SkillTaxonomySettings,
    pub qualification_levels: BTreeMap<String, u8>,
    pub qualification_compatibility: QualificationCompatibility,
    pub qualification_filtering: QualificationFiltering,
    pub experience_levels: ExperienceLevels,
    pub experience_compatibility: ExperienceCompatibility,
    pub location_scoring: LocationScoring,
    pub stipend_scoring: StipendScoring,
    pub recency_scoring: RecencyScoring,
    pub diversity: DiversitySettings,
    pub cold_start: ColdStartSettings,
    pub retrieval: RetrievalSettings,
    pub recommendation: RecommendationLimits,
}

/// Weight per scoring signal. The request-scoped copy produced by
/// `combined::derive_weights` is the only thing that ever differs from this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub embedding_similarity: f64,
    pub skill_overlap: f64,
    pub qualification_fit: f64,
    pub experience_compatibility: f64,
    pub location_match: f64,
    pub sector_relevance: f64,
    pub stipend_match: f64,
    pub recency: f64,
    pub diversity_bonus: f64,
}

impl ScoringWeights {
    pub fn get(&self, signal: Signal) -> f64 {
        match signal {
            Signal::EmbeddingSimilarity => self.embedding_similarity,
            Signal::SkillOverlap => self.skill_overlap,
            Signal::QualificationFit => self.qualification_fit,
            Signal::ExperienceCompatibility => self.experience_compatibility,
            Signal::LocationMatch => self.location_match,
            Signal::SectorRelevance => self.sector_relevance,
            Signal::StipendMatch => self.stipend_match,
            Signal::Recency => self.recency,
            Signal::DiversityBonus => self.diversity_bonus,
        }
    }

    pub fn get_mut(&mut self, signal: Signal) -> &mut f64 {
        match signal {
            Signal::EmbeddingSimilarity => &mut self.embedding_similarity,
            Signal::SkillOverlap => &mut self.skill_overlap,
            Signal::QualificationFit => &mut self.qualification_fit,
            Signal::ExperienceCompatibility => &mut self.experience_compatibility,
            Signal::LocationMatch => &mut self.location_match,
            Signal::SectorRelevance => &mut self.sector_relevance,
            Signal::StipendMatch => &mut self.stipend_match,
            Signal::Recency => &mut self.recency,
            Signal::DiversityBonus => &mut self.diversity_bonus,
        }
    }

    pub fn total(&self) -> f64 {
        Signal::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Observed range of raw retrieval similarity, rescaled linearly into [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityRange {
    pub floor: f64,
    pub ceiling: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScoring {
    pub exact_match: f64,
    pub domain_match: f64,
    pub cross_domain: f64,
    pub max_skills: usize,
    pub min_skill_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTaxonomySettings {
    pub compatible_domain_weight: f64,
    pub domains: BTreeMap<String, Vec<String>>,
    pub domain_compatibility: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationCompatibility {
    pub exact: f64,
    pub higher: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationFiltering {
    pub strict_mode: bool,
    pub allow_lower_qual: bool,
    pub allow_higher_qual: bool,
    pub experience_override: bool,
    pub override_min_years: u32,
    pub exact_match_bonus: f64,
    pub experience_bonus_per_year: f64,
    pub max_experience_bonus: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceLevels {
    pub beginner: u8,
    pub intermediate: u8,
    pub advanced: u8,
    pub expert: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceCompatibility {
    pub exact: f64,
    pub higher: f64,
    pub lower: f64,
    pub beginner_boost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationScoring {
    pub exact_city: f64,
    pub same_district: f64,
    pub same_state: f64,
    pub different_state: f64,
    pub remote_allowed: f64,
    pub no_match_remote_ok: f64,
    pub neutral: f64,
    pub remote_averse_no_preference: f64,
    pub remote_averse_no_match: f64,
    /// Remote-averse candidates with location preferences never see postings below this.
    pub low_match_threshold: f64,
    pub max_location_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StipendScoring {
    pub exact_match: f64,
    pub within_range: f64,
    pub no_preference: f64,
    pub mismatch: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyScoring {
    pub very_recent: f64,
    pub recent: f64,
    pub moderate: f64,
    pub old: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversitySettings {
    pub max_same_sector: usize,
    pub max_same_location: usize,
    pub max_same_org: usize,
    pub sector_diversity_weight: f64,
    pub location_diversity_weight: f64,
    pub organization_diversity_weight: f64,
    pub stipend_range_diversity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColdStartSettings {
    pub profile_bootstrap_threshold: f64,
    pub default_recommendations: usize,
    pub skill_gap_analysis: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationLimits {
    pub max_results: usize,
    pub min_score_threshold: f64,
}

impl EngineSettings {
    /// Parses and validates settings from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(raw).map_err(|e| {
            let message = e.to_string();
            if message.starts_with("missing field") {
                EngineError::ConfigurationMissing(message)
            } else {
                EngineError::ConfigurationInvalid(message)
            }
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings that would break scorer invariants.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: String| -> Result<(), EngineError> {
            Err(EngineError::ConfigurationInvalid(msg))
        };

        for signal in Signal::ALL {
            let w = self.scoring_weights.get(signal);
            if !(0.0..=1.0).contains(&w) {
                return invalid(format!("weight '{}' must lie in [0, 1], got {w}", signal.as_str()));
            }
        }

        let total = self.scoring_weights.total();
        if (total - 1.0).abs() > WEIGHT_TOTAL_TOLERANCE {
            warn!("Scoring weights sum to {total:.3}; final scores are clamped to [0, 1]");
        }

        if self.similarity.ceiling <= self.similarity.floor {
            return invalid(format!(
                "similarity.ceiling ({}) must exceed similarity.floor ({})",
                self.similarity.ceiling, self.similarity.floor
            ));
        }

        if self.skill_scoring.exact_match <= 0.0 {
            return invalid("skill_scoring.exact_match must be positive".to_string());
        }
        if self.skill_scoring.max_skills == 0 {
            return invalid("skill_scoring.max_skills must be at least 1".to_string());
        }

        let loc = &self.location_scoring;
        if loc.remote_averse_no_match >= loc.low_match_threshold {
            return invalid(format!(
                "location_scoring.remote_averse_no_match ({}) must stay below low_match_threshold ({})",
                loc.remote_averse_no_match, loc.low_match_threshold
            ));
        }
        if !(0.0..=1.0).contains(&loc.max_location_weight) {
            return invalid("location_scoring.max_location_weight must lie in [0, 1]".to_string());
        }

        if self.qualification_levels.is_empty() {
            return Err(EngineError::ConfigurationMissing(
                "qualification_levels must name at least one level".to_string(),
            ));
        }
        if self.skill_taxonomy.domains.is_empty() {
            return Err(EngineError::ConfigurationMissing(
                "skill_taxonomy.domains must name at least one domain".to_string(),
            ));
        }

        if self.diversity.max_same_sector == 0 {
            return invalid("diversity.max_same_sector must be at least 1".to_string());
        }

        Ok(())
    }

    /// Case-insensitive lookup of a qualification's ordinal level. Names missing
    /// from the ladder rank as [`UNRANKED_QUALIFICATION_LEVEL`].
    pub fn qualification_level(&self, qualification: &str) -> u8 {
        let key = qualification.trim().to_lowercase();
        self.qualification_levels
            .get(&key)
            .copied()
            .unwrap_or(UNRANKED_QUALIFICATION_LEVEL)
    }
}

/// Reads, parses and validates the settings file.
pub fn load_settings(path: &Path) -> Result<EngineSettings, EngineError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        EngineError::ConfigurationMissing(format!(
            "cannot read engine settings at {}: {e}",
            path.display()
        ))
    })?;
    let settings = EngineSettings::from_json_str(&raw)?;
    info!(
        "Engine settings loaded from {} ({} taxonomy domains, {} qualification levels)",
        path.display(),
        settings.skill_taxonomy.domains.len(),
        settings.qualification_levels.len()
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{settings, SETTINGS_JSON};

    #[test]
    fn test_shipped_settings_are_valid() {
        let s = settings();
        assert!((s.scoring_weights.total() - 1.0).abs() < 1e-9);
        assert_eq!(s.qualification_level("UG"), 3);
        assert_eq!(s.qualification_level(" btech "), UNRANKED_QUALIFICATION_LEVEL);
    }

    #[test]
    fn test_missing_weight_is_configuration_missing() {
        let mut value: serde_json::Value = serde_json::from_str(SETTINGS_JSON).unwrap();
        value["scoring_weights"]
            .as_object_mut()
            .unwrap()
            .remove("diversity_bonus");

        let err = EngineSettings::from_json_str(&value.to_string()).unwrap_err();
        assert!(
            matches!(err, EngineError::ConfigurationMissing(ref m) if m.contains("diversity_bonus")),
            "got {err:?}"
        );
    }

    #[test]
    fn test_missing_section_is_configuration_missing() {
        let mut value: serde_json::Value = serde_json::from_str(SETTINGS_JSON).unwrap();
        value.as_object_mut().unwrap().remove("location_scoring");

        let err = EngineSettings::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationMissing(_)));
    }

    #[test]
    fn test_no_match_score_must_stay_below_exclusion_threshold() {
        let mut value: serde_json::Value = serde_json::from_str(SETTINGS_JSON).unwrap();
        value["location_scoring"]["remote_averse_no_match"] = serde_json::json!(0.5);

        let err = EngineSettings::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationInvalid(_)));
    }

    #[test]
    fn test_inverted_similarity_range_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(SETTINGS_JSON).unwrap();
        value["similarity"]["floor"] = serde_json::json!(0.6);
        value["similarity"]["ceiling"] = serde_json::json!(0.5);

        let err = EngineSettings::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationInvalid(_)));
    }

    #[test]
    fn test_unreadable_file_is_configuration_missing() {
        let err = load_settings(Path::new("/nonexistent/engine.json")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationMissing(_)));
    }
}
