//! Qualification fit (hard filter with graded score) and experience compatibility.

use serde::{Deserialize, Serialize};

use crate::scoring::settings::{
    ExperienceCompatibility, ExperienceLevels, QualificationCompatibility, QualificationFiltering,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationReason {
    ExactMatch,
    HigherQualification,
    LowerQualification,
    Underqualified,
    Overqualified,
    QualificationUnknown,
}

impl QualificationReason {
    pub fn label(&self) -> &'static str {
        match self {
            QualificationReason::ExactMatch => "exact match",
            QualificationReason::HigherQualification => "higher qualification",
            QualificationReason::LowerQualification => "lower qualification",
            QualificationReason::Underqualified => "underqualified",
            QualificationReason::Overqualified => "overqualified",
            QualificationReason::QualificationUnknown => "partial fit",
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            QualificationReason::Underqualified | QualificationReason::Overqualified
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceReason {
    BeginnerFriendly,
    ExperienceMatch,
    MoreExperienced,
    LessExperienced,
}

impl ExperienceReason {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceReason::BeginnerFriendly => "beginner friendly",
            ExperienceReason::ExperienceMatch => "experience level matches",
            ExperienceReason::MoreExperienced => "more experienced than required",
            ExperienceReason::LessExperienced => "less experienced (learning opportunity)",
        }
    }
}

/// Neutral score when either side's qualification is missing.
const UNKNOWN_QUALIFICATION_SCORE: f64 = 0.5;

/// Scores a candidate's education level against a posting's minimum.
///
/// Levels are ordinals from settings (`None` = missing or blank). A returned
/// score of exactly 0.0 means the posting must be excluded.
pub fn qualification_fit(
    candidate_level: Option<u8>,
    required_level: Option<u8>,
    years_of_experience: u32,
    compatibility: &QualificationCompatibility,
    filtering: &QualificationFiltering,
) -> (f64, QualificationReason) {
    let (candidate, required) = match (candidate_level, required_level) {
        (Some(c), Some(r)) => (c, r),
        _ => {
            return (
                UNKNOWN_QUALIFICATION_SCORE,
                QualificationReason::QualificationUnknown,
            )
        }
    };

    if filtering.strict_mode {
        if candidate < required && !filtering.allow_lower_qual {
            return (0.0, QualificationReason::Underqualified);
        }

        let experience_overrides =
            filtering.experience_override && years_of_experience >= filtering.override_min_years;
        if candidate > required && !filtering.allow_higher_qual && !experience_overrides {
            return (0.0, QualificationReason::Overqualified);
        }
    }

    let (mut score, reason) = match candidate.cmp(&required) {
        std::cmp::Ordering::Equal => (
            compatibility.exact * filtering.exact_match_bonus,
            QualificationReason::ExactMatch,
        ),
        std::cmp::Ordering::Greater => (
            compatibility.higher,
            QualificationReason::HigherQualification,
        ),
        std::cmp::Ordering::Less => (compatibility.lower, QualificationReason::LowerQualification),
    };

    if filtering.experience_override && candidate != required {
        let bonus = (years_of_experience as f64 * filtering.experience_bonus_per_year)
            .min(filtering.max_experience_bonus);
        score += bonus;
    }

    (score.clamp(0.0, 1.0), reason)
}

/// Experience buckets, ordered so they compare by seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ExperienceBucket {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceBucket {
    fn from_years(years: u32) -> Self {
        match years {
            0..=1 => Self::Beginner,
            2..=3 => Self::Intermediate,
            4..=5 => Self::Advanced,
            _ => Self::Expert,
        }
    }

    /// Keyword heuristic over free-text requirements. Text naming none of the
    /// known phrases is read as demanding expert-level experience.
    fn from_requirement(text: &str) -> Self {
        let lower = text.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if mentions(&["fresher", "beginner", "entry", "no experience"]) {
            Self::Beginner
        } else if mentions(&["1-3", "intermediate", "some experience"]) {
            Self::Intermediate
        } else if mentions(&["3-5", "advanced", "experienced"]) {
            Self::Advanced
        } else {
            Self::Expert
        }
    }

    fn level(&self, levels: &ExperienceLevels) -> u8 {
        match self {
            Self::Beginner => levels.beginner,
            Self::Intermediate => levels.intermediate,
            Self::Advanced => levels.advanced,
            Self::Expert => levels.expert,
        }
    }
}

/// Scores years of experience against a posting's free-text requirement.
pub fn experience_compatibility(
    years_of_experience: u32,
    requirement: Option<&str>,
    levels: &ExperienceLevels,
    compatibility: &ExperienceCompatibility,
) -> (f64, ExperienceReason) {
    let requirement = match requirement.map(str::trim).filter(|r| !r.is_empty()) {
        Some(r) => r,
        None => {
            let score = compatibility.exact * compatibility.beginner_boost;
            return (score.clamp(0.0, 1.0), ExperienceReason::BeginnerFriendly);
        }
    };

    let candidate = ExperienceBucket::from_years(years_of_experience).level(levels);
    let required = ExperienceBucket::from_requirement(requirement).level(levels);

    let (score, reason) = match candidate.cmp(&required) {
        std::cmp::Ordering::Equal => (compatibility.exact, ExperienceReason::ExperienceMatch),
        std::cmp::Ordering::Greater => (compatibility.higher, ExperienceReason::MoreExperienced),
        std::cmp::Ordering::Less => (compatibility.lower, ExperienceReason::LessExperienced),
    };

    (score.clamp(0.0, 1.0), reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::settings;

    fn qual(candidate: Option<u8>, required: Option<u8>, years: u32) -> (f64, QualificationReason) {
        let s = settings();
        qualification_fit(
            candidate,
            required,
            years,
            &s.qualification_compatibility,
            &s.qualification_filtering,
        )
    }

    #[test]
    fn test_exact_level_gets_bonus_clamped_to_one() {
        let (score, reason) = qual(Some(3), Some(3), 0);
        assert_eq!(score, 1.0);
        assert_eq!(reason, QualificationReason::ExactMatch);
    }

    #[test]
    fn test_underqualified_rejected_in_strict_mode() {
        let (score, reason) = qual(Some(3), Some(4), 10);
        assert_eq!(score, 0.0);
        assert_eq!(reason, QualificationReason::Underqualified);
        assert!(reason.is_rejection());
    }

    #[test]
    fn test_overqualified_rejected_without_experience() {
        let (score, reason) = qual(Some(4), Some(3), 1);
        assert_eq!(score, 0.0);
        assert_eq!(reason, QualificationReason::Overqualified);
    }

    #[test]
    fn test_overqualified_admitted_by_experience_override_with_bonus() {
        // higher 0.8 + min(2 × 0.1, 0.3) = 1.0
        let (score, reason) = qual(Some(4), Some(3), 2);
        assert!((score - 1.0).abs() < 1e-9, "score was {score}");
        assert_eq!(reason, QualificationReason::HigherQualification);
    }

    #[test]
    fn test_lower_admitted_when_allowed_gets_capped_bonus() {
        let mut s = settings();
        s.qualification_filtering.allow_lower_qual = true;
        let (score, reason) = qualification_fit(
            Some(2),
            Some(3),
            9,
            &s.qualification_compatibility,
            &s.qualification_filtering,
        );
        // lower 0.3 + capped 0.3
        assert!((score - 0.6).abs() < 1e-9, "score was {score}");
        assert_eq!(reason, QualificationReason::LowerQualification);
    }

    #[test]
    fn test_lenient_mode_never_rejects() {
        let mut s = settings();
        s.qualification_filtering.strict_mode = false;
        let (score, _) = qualification_fit(
            Some(1),
            Some(4),
            0,
            &s.qualification_compatibility,
            &s.qualification_filtering,
        );
        assert!(score > 0.0);
    }

    #[test]
    fn test_unknown_levels_are_neutral() {
        assert_eq!(
            qual(None, Some(3), 0),
            (0.5, QualificationReason::QualificationUnknown)
        );
        assert_eq!(
            qual(Some(3), None, 0),
            (0.5, QualificationReason::QualificationUnknown)
        );
    }

    fn exp(years: u32, requirement: Option<&str>) -> (f64, ExperienceReason) {
        let s = settings();
        experience_compatibility(
            years,
            requirement,
            &s.experience_levels,
            &s.experience_compatibility,
        )
    }

    #[test]
    fn test_missing_requirement_is_beginner_friendly() {
        assert_eq!(exp(0, None), (1.0, ExperienceReason::BeginnerFriendly));
        assert_eq!(exp(7, Some("  ")), (1.0, ExperienceReason::BeginnerFriendly));
    }

    #[test]
    fn test_fresher_posting_matches_beginner() {
        assert_eq!(
            exp(1, Some("Freshers welcome")),
            (1.0, ExperienceReason::ExperienceMatch)
        );
    }

    #[test]
    fn test_more_experienced_candidate() {
        assert_eq!(
            exp(4, Some("1-3 years")),
            (0.8, ExperienceReason::MoreExperienced)
        );
    }

    #[test]
    fn test_unrecognised_text_reads_as_expert() {
        assert_eq!(
            exp(3, Some("8+ years leading teams")),
            (0.4, ExperienceReason::LessExperienced)
        );
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(ExperienceBucket::from_years(1), ExperienceBucket::Beginner);
        assert_eq!(ExperienceBucket::from_years(3), ExperienceBucket::Intermediate);
        assert_eq!(ExperienceBucket::from_years(5), ExperienceBucket::Advanced);
        assert_eq!(ExperienceBucket::from_years(6), ExperienceBucket::Expert);
    }
}
