//! Weighted combination of every signal for one (candidate, posting) pair.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::candidate::CandidateProfile;
use crate::models::posting::PostingRecord;
use crate::scoring::attributes::{recency, sector_relevance, stipend_match};
use crate::scoring::diversity::DiversityTracker;
use crate::scoring::location::{location_match, LocationMatchKind};
use crate::scoring::qualification::{
    experience_compatibility, qualification_fit, ExperienceReason, QualificationReason,
};
use crate::scoring::settings::{EngineSettings, ScoringWeights, SimilarityRange};
use crate::scoring::taxonomy::{SkillDetails, SkillTaxonomy};
use crate::scoring::Signal;

/// Request-scoped weights. Remote-averse candidates who named locations get the
/// location weight doubled (capped at `max_location_weight`); the other weights
/// shrink proportionally so the total matches the base total.
pub fn derive_weights(
    base: &ScoringWeights,
    candidate: &CandidateProfile,
    max_location_weight: f64,
) -> ScoringWeights {
    let mut weights = base.clone();
    if !candidate.is_remote_averse_with_locations() {
        return weights;
    }

    let total = base.total();
    let location = (base.location_match * 2.0).min(max_location_weight);
    let others = total - base.location_match;
    let factor = if others > 0.0 {
        ((total - location) / others).max(0.0)
    } else {
        0.0
    };

    for signal in Signal::ALL {
        if signal == Signal::LocationMatch {
            *weights.get_mut(signal) = location;
        } else {
            *weights.get_mut(signal) *= factor;
        }
    }
    weights
}

/// Maps raw inner-product similarity onto [0, 1] using the configured range.
pub fn normalize_similarity(similarity: f32, range: &SimilarityRange) -> f64 {
    let span = range.ceiling - range.floor;
    ((similarity as f64 - range.floor) / span).clamp(0.0, 1.0)
}

/// Every signal value for one posting plus the metadata explanations need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub embedding_similarity: f64,
    /// Skill points divided by the exact-match ceiling; raw points are in `skill_details`.
    pub skill_overlap: f64,
    pub qualification_fit: f64,
    pub experience_compatibility: f64,
    pub location_match: f64,
    pub sector_relevance: f64,
    pub stipend_match: f64,
    pub recency: f64,
    pub diversity_bonus: f64,
    pub skill_details: SkillDetails,
    pub qualification_reason: QualificationReason,
    pub experience_reason: ExperienceReason,
    pub location_kind: LocationMatchKind,
}

impl ScoreComponents {
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

    /// Weighted sum, clamped to [0, 1].
    pub fn weighted_total(&self, weights: &ScoringWeights) -> f64 {
        Signal::ALL
            .iter()
            .map(|s| weights.get(*s) * self.get(*s))
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }
}

/// Why a shortlisted posting was dropped before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    Qualification(QualificationReason),
    LocationNotPreferred,
}

impl ExclusionReason {
    pub fn label(&self) -> &'static str {
        match self {
            ExclusionReason::Qualification(reason) => reason.label(),
            ExclusionReason::LocationNotPreferred => "location not preferred",
        }
    }
}

/// A posting that survived exclusion, with everything needed to rank and explain it.
#[derive(Debug, Clone)]
pub struct ScoredPosting<'a> {
    /// Position in the catalog; breaks score ties.
    pub index: usize,
    pub posting: &'a PostingRecord,
    pub final_score: f64,
    pub components: ScoreComponents,
}

pub struct CombinedScorer {
    settings: EngineSettings,
    taxonomy: SkillTaxonomy,
}

impl CombinedScorer {
    pub fn new(settings: EngineSettings) -> Self {
        let taxonomy = SkillTaxonomy::from_settings(&settings.skill_taxonomy);
        Self { settings, taxonomy }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn request_weights(&self, candidate: &CandidateProfile) -> ScoringWeights {
        derive_weights(
            &self.settings.scoring_weights,
            candidate,
            self.settings.location_scoring.max_location_weight,
        )
    }

    /// Computes every component for `posting` and the final clamped score
    /// under `weights`.
    pub fn score(
        &self,
        similarity: f32,
        posting: &PostingRecord,
        candidate: &CandidateProfile,
        weights: &ScoringWeights,
        tracker: &DiversityTracker,
        today: NaiveDate,
    ) -> (f64, ScoreComponents) {
        let s = &self.settings;

        let (points, skill_details) =
            self.taxonomy
                .score_skills(&candidate.skills, &posting.skill_list(), &s.skill_scoring);

        let candidate_level = candidate.education().map(|e| s.qualification_level(e));
        let required_level = posting
            .required_qualification()
            .map(|q| s.qualification_level(q));
        let (qualification, qualification_reason) = qualification_fit(
            candidate_level,
            required_level,
            candidate.years_of_experience,
            &s.qualification_compatibility,
            &s.qualification_filtering,
        );

        let (experience, experience_reason) = experience_compatibility(
            candidate.years_of_experience,
            posting.experience_requirement(),
            &s.experience_levels,
            &s.experience_compatibility,
        );

        let location = location_match(candidate, posting, &s.location_scoring);

        let components = ScoreComponents {
            embedding_similarity: normalize_similarity(similarity, &s.similarity),
            skill_overlap: (points / s.skill_scoring.exact_match).clamp(0.0, 1.0),
            qualification_fit: qualification,
            experience_compatibility: experience,
            location_match: location.score,
            sector_relevance: sector_relevance(&candidate.preferred_sectors, &posting.sector_list()),
            stipend_match: stipend_match(
                candidate.stipend_preference(),
                posting.stipend.as_deref(),
                &s.stipend_scoring,
            ),
            recency: recency(posting.posted_date.as_deref(), today, &s.recency_scoring),
            diversity_bonus: tracker.bonus(posting, &s.diversity),
            skill_details,
            qualification_reason,
            experience_reason,
            location_kind: location.kind,
        };

        (components.weighted_total(weights), components)
    }

    /// Hard exclusions: failed the qualification filter, or a remote-averse
    /// candidate with locations got a low location match.
    pub fn exclusion(
        &self,
        components: &ScoreComponents,
        candidate: &CandidateProfile,
    ) -> Option<ExclusionReason> {
        if components.qualification_fit == 0.0 {
            return Some(ExclusionReason::Qualification(
                components.qualification_reason,
            ));
        }
        if candidate.is_remote_averse_with_locations()
            && components.location_match < self.settings.location_scoring.low_match_threshold
        {
            return Some(ExclusionReason::LocationNotPreferred);
        }
        None
    }
}
