//! Small per-attribute scorers: sector relevance, stipend match, recency.

use chrono::NaiveDate;

use crate::models::posting::StipendRange;
use crate::scoring::settings::{RecencyScoring, StipendScoring};

const NEUTRAL_SECTOR_SCORE: f64 = 0.5;
const POSTED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Fraction of the candidate's sectors that appear (either way round as a
/// substring) in at least one of the posting's sectors.
pub fn sector_relevance(candidate_sectors: &[String], posting_sectors: &[String]) -> f64 {
    let wanted: Vec<String> = candidate_sectors
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if wanted.is_empty() || posting_sectors.is_empty() {
        return NEUTRAL_SECTOR_SCORE;
    }

    let hits = wanted
        .iter()
        .filter(|w| posting_sectors.iter().any(|p| sectors_overlap(w, p)))
        .count();

    hits as f64 / wanted.len() as f64
}

/// Candidate sectors that hit the posting, in candidate order.
pub fn matched_sectors(candidate_sectors: &[String], posting_sectors: &[String]) -> Vec<String> {
    candidate_sectors
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let lower = s.to_lowercase();
            posting_sectors.iter().any(|p| sectors_overlap(&lower, p))
        })
        .map(str::to_string)
        .collect()
}

fn sectors_overlap(candidate: &str, posting: &str) -> bool {
    candidate.contains(posting) || posting.contains(candidate)
}

pub fn stipend_match(
    candidate_pref: Option<&str>,
    posting_stipend: Option<&str>,
    scoring: &StipendScoring,
) -> f64 {
    let wanted = candidate_pref.and_then(StipendRange::parse);
    let offered = posting_stipend.and_then(StipendRange::parse);

    match (wanted, offered) {
        (Some(w), Some(o)) if w == o => scoring.exact_match,
        (Some(w), Some(o)) if w.overlaps(&o) => scoring.within_range,
        (Some(_), Some(_)) => scoring.mismatch,
        _ => scoring.no_preference,
    }
}

/// Buckets the posting's age relative to `today`. Dates in the future count
/// as very recent.
pub fn recency(posted_date: Option<&str>, today: NaiveDate, scoring: &RecencyScoring) -> f64 {
    let posted = match posted_date
        .map(str::trim)
        .and_then(|d| NaiveDate::parse_from_str(d, POSTED_DATE_FORMAT).ok())
    {
        Some(d) => d,
        None => return scoring.neutral,
    };

    match (today - posted).num_days() {
        d if d <= 7 => scoring.very_recent,
        d if d <= 30 => scoring.recent,
        d if d <= 90 => scoring.moderate,
        _ => scoring.old,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{settings, strings};

    #[test]
    fn test_sector_ratio_counts_partial_matches() {
        let posting = strings(&["technology", "data science"]);
        assert_eq!(sector_relevance(&strings(&["Tech", "Finance"]), &posting), 0.5);
        assert_eq!(sector_relevance(&strings(&["data"]), &posting), 1.0);
        assert_eq!(sector_relevance(&strings(&["healthcare"]), &posting), 0.0);
    }

    #[test]
    fn test_sector_neutral_when_either_side_empty() {
        assert_eq!(sector_relevance(&[], &strings(&["technology"])), 0.5);
        assert_eq!(sector_relevance(&strings(&["technology"]), &[]), 0.5);
        assert_eq!(sector_relevance(&strings(&["  "]), &strings(&["technology"])), 0.5);
    }

    #[test]
    fn test_matched_sectors_keeps_candidate_spelling() {
        let matched = matched_sectors(
            &strings(&["Technology", "Finance"]),
            &strings(&["technology"]),
        );
        assert_eq!(matched, vec!["Technology"]);
    }

    #[test]
    fn test_stipend_buckets() {
        let s = settings().stipend_scoring;
        assert_eq!(stipend_match(Some("5000-8000"), Some("8000-5000"), &s), 1.0);
        assert_eq!(stipend_match(Some("5000-8000"), Some("7000"), &s), 0.8);
        assert_eq!(stipend_match(Some("5000-8000"), Some("12000"), &s), 0.3);
    }

    #[test]
    fn test_stipend_unspecified_or_garbage_is_no_preference() {
        let s = settings().stipend_scoring;
        assert_eq!(stipend_match(None, Some("7000"), &s), 0.5);
        assert_eq!(stipend_match(Some("5000"), Some("0"), &s), 0.5);
        assert_eq!(stipend_match(Some("negotiable"), Some("7000"), &s), 0.5);
    }

    #[test]
    fn test_recency_buckets() {
        let s = settings().recency_scoring;
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(recency(Some("2024-06-25"), today, &s), 1.0);
        assert_eq!(recency(Some("2024-06-10"), today, &s), 0.8);
        assert_eq!(recency(Some("2024-04-15"), today, &s), 0.6);
        assert_eq!(recency(Some("2023-01-01"), today, &s), 0.3);
        assert_eq!(recency(Some("2024-07-05"), today, &s), 1.0);
    }

    #[test]
    fn test_recency_unparsable_is_neutral() {
        let s = settings().recency_scoring;
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(recency(None, today, &s), 0.5);
        assert_eq!(recency(Some("last week"), today, &s), 0.5);
    }
}
