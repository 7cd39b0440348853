//! Per-request diversity tracking and post-sort sector fairness.

use std::collections::{HashMap, HashSet};

use crate::models::posting::{PostingRecord, StipendRange};
use crate::scoring::combined::ScoredPosting;
use crate::scoring::settings::DiversitySettings;

/// Share of already-accepted stipend ranges a posting may overlap before its
/// compensation counts as repetitive.
const STIPEND_OVERLAP_RATIO: f64 = 0.7;

const FULL_BONUS: f64 = 1.0;

/// Counts of what has been accepted so far in one request. Never shared
/// between requests.
#[derive(Debug, Default)]
pub struct DiversityTracker {
    sectors: HashMap<String, usize>,
    cities: HashMap<String, usize>,
    organizations: HashMap<String, usize>,
    stipends: Vec<StipendRange>,
    accepted: usize,
}

impl DiversityTracker {
    pub fn record(&mut self, posting: &PostingRecord) {
        *self.sectors.entry(sector_key(posting)).or_default() += 1;
        *self.cities.entry(city_key(posting)).or_default() += 1;
        *self
            .organizations
            .entry(posting.organization.trim().to_lowercase())
            .or_default() += 1;
        if let Some(range) = posting.stipend_range() {
            self.stipends.push(range);
        }
        self.accepted += 1;
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// 1.0 minus the weight of every dimension where `posting` would repeat
    /// what is already accepted, floored at 0.
    pub fn bonus(&self, posting: &PostingRecord, settings: &DiversitySettings) -> f64 {
        if self.accepted == 0 {
            return FULL_BONUS;
        }

        let count = |map: &HashMap<String, usize>, key: &str| map.get(key).copied().unwrap_or(0);
        let mut penalty = 0.0;

        if count(&self.sectors, &sector_key(posting)) >= settings.max_same_sector {
            penalty += settings.sector_diversity_weight;
        }
        if count(&self.cities, &city_key(posting)) >= settings.max_same_location {
            penalty += settings.location_diversity_weight;
        }
        let org = posting.organization.trim().to_lowercase();
        if count(&self.organizations, &org) >= settings.max_same_org {
            penalty += settings.organization_diversity_weight;
        }

        if let Some(range) = posting.stipend_range() {
            if !self.stipends.is_empty() {
                let overlapping = self.stipends.iter().filter(|s| s.overlaps(&range)).count();
                if overlapping as f64 / self.stipends.len() as f64 > STIPEND_OVERLAP_RATIO {
                    penalty += settings.stipend_range_diversity;
                }
            }
        }

        (FULL_BONUS - penalty).max(0.0)
    }
}

fn sector_key(posting: &PostingRecord) -> String {
    posting.sector_tags.trim().to_lowercase()
}

fn city_key(posting: &PostingRecord) -> String {
    posting.location_city.trim().to_lowercase()
}

/// Orders by final score descending, ties by catalog position.
pub fn sort_by_score(scored: &mut [ScoredPosting<'_>]) {
    scored.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then(a.index.cmp(&b.index))
    });
}

/// Keeps at most `max_per_sector` postings per sector group (groups in order of
/// first appearance, each already score-sorted), drops duplicate ids, then
/// restores score order.
pub fn rebalance_by_sector<'a>(
    scored: Vec<ScoredPosting<'a>>,
    max_per_sector: usize,
) -> Vec<ScoredPosting<'a>> {
    let input_len = scored.len();

    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<ScoredPosting<'a>>> = HashMap::new();
    for item in scored {
        let key = sector_key(item.posting);
        let group = groups.entry(key.clone()).or_insert_with(|| {
            group_order.push(key);
            Vec::new()
        });
        group.push(item);
    }

    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(input_len);
    for key in group_order {
        let Some(group) = groups.remove(&key) else {
            continue;
        };
        for item in group.into_iter().take(max_per_sector) {
            if seen.insert(item.posting.internship_id.clone()) {
                selected.push(item);
            }
        }
    }
    selected.truncate(input_len);

    sort_by_score(&mut selected);
    selected
}
