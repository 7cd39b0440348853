//! Skill taxonomy matcher. Domain-aware skill overlap between a candidate and a posting.
//!
//! Numeric score, per candidate skill (first `max_skills` only), first rule that holds:
//! 1. exact (case-insensitive) against any posting skill → `exact_match`
//! 2. same known domain and one string contains the other → `domain_match`
//! 3. compatible domains and one string contains the other → `cross_domain × compatible_domain_weight`
//! 4. nothing → 0, recorded as a skill gap
//!
//! The fuzzy matcher at the bottom only feeds the human-readable matched-skills list.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::scoring::settings::{SkillScoring, SkillTaxonomySettings};

pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Normalized edit similarity above which two skills count as the same for explanations.
const FUZZY_MATCH_THRESHOLD: f64 = 0.7;
const MAX_MATCHED_SKILLS: usize = 5;

const DESIGN_TOOL_SYNONYMS: &[(&str, &[&str])] = &[
    ("photoshop", &["photoshop", "adobe photoshop", "ps", "photoshop cc"]),
    ("figma", &["figma", "figma design", "ui design"]),
    ("illustrator", &["illustrator", "adobe illustrator", "ai"]),
    ("premiere", &["premiere", "premiere pro", "adobe premiere"]),
    ("after effects", &["after effects", "ae", "motion graphics"]),
    ("indesign", &["indesign", "adobe indesign"]),
    ("sketch", &["sketch", "sketch app"]),
    ("xd", &["xd", "adobe xd", "experience design"]),
    ("canva", &["canva", "canva design"]),
    (
        "video editing",
        &["video editing", "video production", "editing", "post production"],
    ),
];

const GENERAL_DESIGN_TERMS: &[&str] = &["design", "creative", "graphic", "ui", "ux"];

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    DomainMatch,
    CrossDomain,
}

impl MatchType {
    pub fn label(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact match",
            MatchType::DomainMatch => "same-domain match",
            MatchType::CrossDomain => "cross-domain match",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMatch {
    pub skill: String,
    pub match_type: MatchType,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_domain: Option<String>,
}

/// A candidate skill the posting gave no credit for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub domain: String,
    /// Posting skills from the same domain, suggested for closing the gap.
    pub suggested_matches: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillDetails {
    pub matched_skills: Vec<String>,
    pub domain_matches: Vec<DomainMatch>,
    pub skill_gaps: Vec<SkillGap>,
    /// Averaged per-skill points, capped at `exact_match`.
    pub points: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Taxonomy
// ────────────────────────────────────────────────────────────────────────────

/// Lookup tables built once from settings.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    skill_domain: HashMap<String, String>,
    compatibility: HashMap<String, HashSet<String>>,
    compatible_domain_weight: f64,
}

impl SkillTaxonomy {
    pub fn from_settings(settings: &SkillTaxonomySettings) -> Self {
        let mut skill_domain = HashMap::new();
        // BTreeMap iteration is ordered, so a skill listed under two domains
        // deterministically belongs to the alphabetically first one.
        for (domain, skills) in &settings.domains {
            for skill in skills {
                skill_domain
                    .entry(skill.trim().to_lowercase())
                    .or_insert_with(|| domain.clone());
            }
        }

        let compatibility = settings
            .domain_compatibility
            .iter()
            .map(|(domain, others)| (domain.clone(), others.iter().cloned().collect()))
            .collect();

        Self {
            skill_domain,
            compatibility,
            compatible_domain_weight: settings.compatible_domain_weight,
        }
    }

    pub fn domain_of(&self, skill: &str) -> &str {
        self.skill_domain
            .get(&skill.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(UNKNOWN_DOMAIN)
    }

    /// 1.0 for the same domain, the configured weight for a listed compatible
    /// domain (directed: looked up from the candidate's domain), else 0.0.
    pub fn compatibility(&self, candidate_domain: &str, posting_domain: &str) -> f64 {
        if candidate_domain == posting_domain {
            return 1.0;
        }
        match self.compatibility.get(candidate_domain) {
            Some(others) if others.contains(posting_domain) => self.compatible_domain_weight,
            _ => 0.0,
        }
    }

    /// Scores skill overlap. `posting_skills` are the posting's lowercased skills.
    pub fn score_skills(
        &self,
        candidate_skills: &[String],
        posting_skills: &[String],
        scoring: &SkillScoring,
    ) -> (f64, SkillDetails) {
        // The first `max_skills` entries are considered; blank ones among them score nothing.
        let considered: Vec<&str> = candidate_skills
            .iter()
            .take(scoring.max_skills)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        if considered.is_empty() || posting_skills.is_empty() {
            return (0.0, SkillDetails::default());
        }

        let mut details = SkillDetails::default();
        let mut total = 0.0_f64;

        for skill in &considered {
            let lower = skill.to_lowercase();
            let domain = self.domain_of(&lower).to_string();

            let best = self.best_match(&lower, &domain, posting_skills, scoring);

            let best_score = match &best {
                Some((score, match_type, target_domain)) => {
                    details.matched_skills.push(skill.to_string());
                    details.domain_matches.push(DomainMatch {
                        skill: skill.to_string(),
                        match_type: *match_type,
                        domain: domain.clone(),
                        target_domain: target_domain.clone(),
                    });
                    *score
                }
                None => 0.0,
            };

            if best_score < scoring.min_skill_threshold {
                let suggested_matches = if domain == UNKNOWN_DOMAIN {
                    Vec::new()
                } else {
                    posting_skills
                        .iter()
                        .filter(|p| self.domain_of(p) == domain)
                        .cloned()
                        .collect()
                };
                details.skill_gaps.push(SkillGap {
                    skill: skill.to_string(),
                    domain: domain.clone(),
                    suggested_matches,
                });
            }

            total += best_score;
        }

        let points = (total / considered.len() as f64).min(scoring.exact_match);
        details.points = points;
        (points, details)
    }

    fn best_match(
        &self,
        skill: &str,
        domain: &str,
        posting_skills: &[String],
        scoring: &SkillScoring,
    ) -> Option<(f64, MatchType, Option<String>)> {
        if posting_skills.iter().any(|p| p == skill) {
            return Some((scoring.exact_match, MatchType::Exact, None));
        }

        // Skills outside the taxonomy can only match exactly.
        if domain == UNKNOWN_DOMAIN {
            return None;
        }

        let overlaps = |p: &str| p.contains(skill) || skill.contains(p);

        if posting_skills
            .iter()
            .any(|p| self.domain_of(p) == domain && overlaps(p.as_str()))
        {
            return Some((scoring.domain_match, MatchType::DomainMatch, None));
        }

        posting_skills.iter().find_map(|p| {
            let posting_domain = self.domain_of(p);
            if posting_domain == domain || posting_domain == UNKNOWN_DOMAIN || !overlaps(p.as_str()) {
                return None;
            }
            let weight = self.compatibility(domain, posting_domain);
            (weight > 0.0).then(|| {
                (
                    scoring.cross_domain * weight,
                    MatchType::CrossDomain,
                    Some(posting_domain.to_string()),
                )
            })
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fuzzy matcher (explanations only)
// ────────────────────────────────────────────────────────────────────────────

/// Candidate skills that match a posting skill exactly, by normalized edit
/// similarity above 0.7, or through the design-tool synonym table. At most 5.
pub fn matched_skills(candidate_skills: &[String], posting_skills: &[String]) -> Vec<String> {
    if posting_skills.is_empty() {
        return Vec::new();
    }

    let mut matched = Vec::new();
    for skill in candidate_skills {
        let lower = skill.trim().to_lowercase();
        if lower.is_empty() {
            continue;
        }

        let hit = posting_skills.iter().any(|p| {
            *p == lower
                || strsim::normalized_levenshtein(&lower, p) > FUZZY_MATCH_THRESHOLD
                || is_design_tool_match(&lower, p)
        });
        if hit {
            matched.push(skill.clone());
        }
        if matched.len() == MAX_MATCHED_SKILLS {
            break;
        }
    }
    matched
}

fn is_design_tool_match(candidate_skill: &str, posting_skill: &str) -> bool {
    DESIGN_TOOL_SYNONYMS
        .iter()
        .filter(|(_, variations)| variations.contains(&candidate_skill))
        .any(|(_, variations)| {
            variations.iter().any(|v| posting_skill.contains(v))
                || GENERAL_DESIGN_TERMS.iter().any(|t| posting_skill.contains(t))
        })
}
