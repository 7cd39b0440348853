use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::catalog::embedder::Embedder;
use crate::catalog::index::VectorIndex;
use crate::errors::EngineError;
use crate::models::candidate::CandidateProfile;
use crate::models::posting::PostingRecord;
use crate::models::recommendation::Recommendation;
use crate::recommend::{cold_start, explain};
use crate::scoring::combined::{CombinedScorer, ScoredPosting};
use crate::scoring::diversity::{rebalance_by_sector, sort_by_score, DiversityTracker};
use crate::scoring::settings::EngineSettings;

/// Results that also get skill-gap annotations.
const SKILL_GAP_RESULTS: usize = 3;

/// Retrieval plus rule-based reranking over a read-only catalog.
///
/// Built once at startup and shared behind an `Arc`; every call owns its own
/// request-scoped state, so concurrent calls never interact.
pub struct RecommendationEngine {
    postings: Vec<PostingRecord>,
    index: Box<dyn VectorIndex>,
    embedder: Box<dyn Embedder>,
    scorer: CombinedScorer,
}

impl RecommendationEngine {
    pub fn new(
        postings: Vec<PostingRecord>,
        index: Box<dyn VectorIndex>,
        embedder: Box<dyn Embedder>,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        if embedder.dimension() != index.dimension() {
            return Err(EngineError::ArtifactUnavailable(format!(
                "embedder '{}' produces {} dimensions but the index holds {}",
                embedder.name(),
                embedder.dimension(),
                index.dimension()
            )));
        }
        if index.len() != postings.len() {
            return Err(EngineError::ArtifactUnavailable(format!(
                "index holds {} vectors for {} postings",
                index.len(),
                postings.len()
            )));
        }

        Ok(Self {
            postings,
            index,
            embedder,
            scorer: CombinedScorer::new(settings),
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        self.scorer.settings()
    }

    pub fn catalog_size(&self) -> usize {
        self.postings.len()
    }

    pub fn index_size(&self) -> usize {
        self.index.len()
    }

    pub fn index_name(&self) -> &'static str {
        self.index.name()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    pub fn recommend(&self, candidate: &CandidateProfile) -> Vec<Recommendation> {
        self.recommend_on(candidate, Utc::now().date_naive())
    }

    /// Same as [`recommend`](Self::recommend) with recency measured against `today`.
    pub fn recommend_on(&self, candidate: &CandidateProfile, today: NaiveDate) -> Vec<Recommendation> {
        let settings = self.scorer.settings();

        let completeness = cold_start::profile_completeness(candidate);
        if completeness < settings.cold_start.profile_bootstrap_threshold {
            info!(
                "Profile completeness {:.2} below {:.2}, using cold-start bootstrap",
                completeness, settings.cold_start.profile_bootstrap_threshold
            );
            let recs = cold_start::bootstrap(&self.postings, candidate, settings);
            info!("Generated {} cold-start recommendations", recs.len());
            return recs;
        }

        let query = self.embedder.embed(&profile_text(candidate));
        let hits = self.index.search(&query, settings.retrieval.top_k);
        let weights = self.scorer.request_weights(candidate);

        let mut tracker = DiversityTracker::default();
        let mut scored: Vec<ScoredPosting<'_>> = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(posting) = self.postings.get(hit.index) else {
                debug!(
                    "Skipping retrieval hit {} beyond catalog of {}",
                    hit.index,
                    self.postings.len()
                );
                continue;
            };

            let (final_score, components) =
                self.scorer
                    .score(hit.similarity, posting, candidate, &weights, &tracker, today);

            if let Some(reason) = self.scorer.exclusion(&components, candidate) {
                debug!("Excluded {}: {}", posting.internship_id, reason.label());
                continue;
            }

            tracker.record(posting);
            scored.push(ScoredPosting {
                index: hit.index,
                posting,
                final_score,
                components,
            });
        }
        debug!("{} of the shortlist survived exclusion", tracker.accepted());

        sort_by_score(&mut scored);
        let balanced = rebalance_by_sector(scored, settings.diversity.max_same_sector);

        let limits = &settings.recommendation;
        let recs: Vec<Recommendation> = balanced
            .iter()
            .filter(|s| s.final_score >= limits.min_score_threshold)
            .take(limits.max_results)
            .enumerate()
            .map(|(rank, s)| {
                let mut rec = explain::personalized(s, candidate, &weights, &settings.skill_scoring);
                if settings.cold_start.skill_gap_analysis && rank < SKILL_GAP_RESULTS {
                    rec.skill_development_opportunities =
                        s.components.skill_details.skill_gaps.clone();
                }
                rec
            })
            .collect();

        info!("Generated {} personalized recommendations", recs.len());
        recs
    }
}

/// Renders a profile in the same shape as posting text so both embed alike.
pub fn profile_text(candidate: &CandidateProfile) -> String {
    let mut parts: Vec<String> = Vec::new();

    let major = candidate
        .major_field
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    let title = match (major, candidate.education()) {
        (Some(m), Some(e)) => Some(format!("{m} ({e})")),
        (Some(m), None) => Some(m.to_string()),
        (None, Some(e)) => Some(format!("({e})")),
        (None, None) => None,
    };
    parts.extend(title);

    if !candidate.skills.is_empty() {
        parts.push(format!("Preferred skills: {}", candidate.skills.join(", ")));
    }
    if let Some(education) = candidate.education() {
        parts.push(format!("Required qualifications: {education}"));
    }
    if !candidate.preferred_sectors.is_empty() {
        parts.push(format!("Sectors: {}", candidate.preferred_sectors.join(", ")));
    }
    if let Some(goal) = candidate.goal() {
        parts.push(format!(
            "{goal}. Looking for internship opportunities in relevant field."
        ));
    }
    if candidate.has_locations() {
        parts.push(format!("Location: {}", candidate.preferred_locations.join(", ")));
    }
    if candidate.remote_ok {
        parts.push("Remote work allowed".to_string());
    }
    if let Some(weeks) = candidate.duration_weeks_pref.filter(|w| *w > 0) {
        parts.push(format!("Duration: {weeks} weeks"));
    }
    if let Some(stipend) = candidate.stipend_preference() {
        parts.push(format!("Stipend: {stipend}"));
    }

    parts.join(". ")
}
