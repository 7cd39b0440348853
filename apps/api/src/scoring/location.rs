use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateProfile;
use crate::models::posting::PostingRecord;
use crate::scoring::settings::LocationScoring;

/// How a posting's location related to the candidate's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMatchKind {
    City,
    District,
    State,
    /// Remote-tolerant candidate without preferences, posting allows remote.
    RemoteFlexible,
    /// Remote-tolerant candidate without preferences, on-site posting.
    Neutral,
    NoMatchRemoteOk,
    DifferentState,
    /// Remote-averse candidate and the posting is not where they want to be.
    NotPreferred,
}

impl LocationMatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            LocationMatchKind::City => "same city",
            LocationMatchKind::District => "same district",
            LocationMatchKind::State => "same state",
            LocationMatchKind::RemoteFlexible => "flexible remote work",
            LocationMatchKind::Neutral => "no location preference",
            LocationMatchKind::NoMatchRemoteOk => "remote option available",
            LocationMatchKind::DifferentState => "different state",
            LocationMatchKind::NotPreferred => "not in preferred area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationMatch {
    pub score: f64,
    pub kind: LocationMatchKind,
}

/// Scores a posting's location against the candidate's preferences.
///
/// Remote-averse candidates only ever earn a real score through geography;
/// remote availability never substitutes for a named city/district/state.
pub fn location_match(
    candidate: &CandidateProfile,
    posting: &PostingRecord,
    scoring: &LocationScoring,
) -> LocationMatch {
    let geographic = best_geographic_match(&candidate.preferred_locations, posting, scoring);

    if !candidate.remote_ok {
        if !candidate.has_locations() {
            return LocationMatch {
                score: scoring.remote_averse_no_preference,
                kind: LocationMatchKind::NotPreferred,
            };
        }
        return geographic.unwrap_or(LocationMatch {
            score: scoring.remote_averse_no_match,
            kind: LocationMatchKind::NotPreferred,
        });
    }

    if !candidate.has_locations() {
        return if posting.remote_allowed {
            LocationMatch {
                score: scoring.remote_allowed,
                kind: LocationMatchKind::RemoteFlexible,
            }
        } else {
            LocationMatch {
                score: scoring.neutral,
                kind: LocationMatchKind::Neutral,
            }
        };
    }

    match geographic {
        Some(m) => m,
        None if posting.remote_allowed => LocationMatch {
            score: scoring.no_match_remote_ok,
            kind: LocationMatchKind::NoMatchRemoteOk,
        },
        None => LocationMatch {
            score: scoring.different_state,
            kind: LocationMatchKind::DifferentState,
        },
    }
}

/// Best of city > district > state across all preferred locations.
fn best_geographic_match(
    preferred: &[String],
    posting: &PostingRecord,
    scoring: &LocationScoring,
) -> Option<LocationMatch> {
    let city = posting.location_city.trim().to_lowercase();
    let district = posting.location_district.trim().to_lowercase();
    let state = posting.location_state.trim().to_lowercase();

    preferred
        .iter()
        .map(|loc| loc.trim().to_lowercase())
        .filter(|loc| !loc.is_empty())
        .filter_map(|loc| {
            if loc == city {
                Some(LocationMatch {
                    score: scoring.exact_city,
                    kind: LocationMatchKind::City,
                })
            } else if loc == district {
                Some(LocationMatch {
                    score: scoring.same_district,
                    kind: LocationMatchKind::District,
                })
            } else if loc == state {
                Some(LocationMatch {
                    score: scoring.same_state,
                    kind: LocationMatchKind::State,
                })
            } else {
                None
            }
        })
        .fold(None, |best: Option<LocationMatch>, m| match best {
            Some(b) if b.score >= m.score => Some(b),
            _ => Some(m),
        })
}
