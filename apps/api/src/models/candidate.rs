use serde::{Deserialize, Serialize};

/// A candidate's profile as submitted with a recommendation request.
/// Immutable for the lifetime of the request; list fields may contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub major_field: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferred_sectors: Vec<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub remote_ok: bool,
    #[serde(default)]
    pub years_of_experience: u32,
    #[serde(default)]
    pub duration_weeks_pref: Option<u32>,
    #[serde(default)]
    pub stipend_pref: Option<String>,
    #[serde(default)]
    pub career_goal: Option<String>,
    #[serde(default)]
    pub availability_start: Option<String>,
}

impl CandidateProfile {
    pub fn education(&self) -> Option<&str> {
        non_blank(self.education_level.as_deref())
    }

    pub fn stipend_preference(&self) -> Option<&str> {
        non_blank(self.stipend_pref.as_deref())
    }

    pub fn goal(&self) -> Option<&str> {
        non_blank(self.career_goal.as_deref())
    }

    /// Whether at least one preferred location is more than whitespace.
    pub fn has_locations(&self) -> bool {
        self.preferred_locations.iter().any(|l| !l.trim().is_empty())
    }

    /// Candidates who refuse remote work but named where they want to be.
    /// Location dominates scoring for them and unmatched postings are dropped.
    pub fn is_remote_averse_with_locations(&self) -> bool {
        !self.remote_ok && self.has_locations()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_profile() {
        let profile: CandidateProfile = serde_json::from_str(r#"{"skills": ["python"]}"#).unwrap();
        assert_eq!(profile.skills, vec!["python"]);
        assert!(!profile.remote_ok);
        assert_eq!(profile.years_of_experience, 0);
        assert!(profile.education().is_none());
    }

    #[test]
    fn test_blank_fields_read_as_absent() {
        let profile = CandidateProfile {
            education_level: Some("  ".to_string()),
            stipend_pref: Some(String::new()),
            ..Default::default()
        };
        assert!(profile.education().is_none());
        assert!(profile.stipend_preference().is_none());
    }

    #[test]
    fn test_remote_averse_requires_locations() {
        let mut profile = CandidateProfile::default();
        assert!(!profile.is_remote_averse_with_locations());
        profile.preferred_locations = vec!["pune".to_string()];
        assert!(profile.is_remote_averse_with_locations());
        profile.remote_ok = true;
        assert!(!profile.is_remote_averse_with_locations());
    }

    #[test]
    fn test_blank_locations_count_as_none() {
        let profile = CandidateProfile {
            preferred_locations: vec!["  ".to_string(), String::new()],
            ..Default::default()
        };
        assert!(!profile.has_locations());
        assert!(!profile.is_remote_averse_with_locations());
    }
}
