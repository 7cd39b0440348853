// Rule-based reranking: per-signal scorers, the weighted combination, and the
// diversity/fairness selection that runs over the scored shortlist.
// Every scorer here is a pure, total function of its inputs.

pub mod attributes;
pub mod combined;
pub mod diversity;
pub mod location;
pub mod qualification;
pub mod settings;
pub mod taxonomy;

use serde::{Deserialize, Serialize};

/// One scoring signal. Each has a weight in `ScoringWeights` and a value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    EmbeddingSimilarity,
    SkillOverlap,
    QualificationFit,
    ExperienceCompatibility,
    LocationMatch,
    SectorRelevance,
    StipendMatch,
    Recency,
    DiversityBonus,
}

impl Signal {
    pub const ALL: [Signal; 9] = [
        Signal::EmbeddingSimilarity,
        Signal::SkillOverlap,
        Signal::QualificationFit,
        Signal::ExperienceCompatibility,
        Signal::LocationMatch,
        Signal::SectorRelevance,
        Signal::StipendMatch,
        Signal::Recency,
        Signal::DiversityBonus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::EmbeddingSimilarity => "embedding_similarity",
            Signal::SkillOverlap => "skill_overlap",
            Signal::QualificationFit => "qualification_fit",
            Signal::ExperienceCompatibility => "experience_compatibility",
            Signal::LocationMatch => "location_match",
            Signal::SectorRelevance => "sector_relevance",
            Signal::StipendMatch => "stipend_match",
            Signal::Recency => "recency",
            Signal::DiversityBonus => "diversity_bonus",
        }
    }
}
