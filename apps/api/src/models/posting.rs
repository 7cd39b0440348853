use serde::{Deserialize, Deserializer, Serialize};

/// One catalog row. Loaded once, never mutated.
///
/// Nullable columns are explicit `Option`s; comma-separated columns stay raw and
/// are split on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingRecord {
    pub internship_id: String,
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub preferred_skills: String,
    #[serde(default)]
    pub eligibility_min_qualification: Option<String>,
    #[serde(default)]
    pub experience_required: Option<String>,
    #[serde(default)]
    pub sector_tags: String,
    #[serde(default)]
    pub location_city: String,
    #[serde(default)]
    pub location_district: String,
    #[serde(default)]
    pub location_state: String,
    #[serde(default, deserialize_with = "yes_no_flag")]
    pub remote_allowed: bool,
    #[serde(default)]
    pub duration_weeks: u32,
    #[serde(default, deserialize_with = "stipend_text")]
    pub stipend: Option<String>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

impl PostingRecord {
    /// Lowercased, trimmed, non-empty entries of `preferred_skills`.
    pub fn skill_list(&self) -> Vec<String> {
        split_csv(&self.preferred_skills)
    }

    /// Lowercased, trimmed, non-empty entries of `sector_tags`.
    pub fn sector_list(&self) -> Vec<String> {
        split_csv(&self.sector_tags)
    }

    pub fn stipend_range(&self) -> Option<StipendRange> {
        self.stipend.as_deref().and_then(StipendRange::parse)
    }

    pub fn required_qualification(&self) -> Option<&str> {
        self.eligibility_min_qualification
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    pub fn experience_requirement(&self) -> Option<&str> {
        self.experience_required
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Inclusive stipend range. A single value parses as `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StipendRange {
    pub min: u32,
    pub max: u32,
}

impl StipendRange {
    /// Parses `"5000"` or `"5000-8000"`. Empty, `"0"` and anything unparsable
    /// mean "unspecified" and return `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "0" {
            return None;
        }

        if let Some((lo, hi)) = raw.split_once('-') {
            let lo: u32 = lo.trim().parse().ok()?;
            let hi: u32 = hi.trim().parse().ok()?;
            return Some(Self {
                min: lo.min(hi),
                max: lo.max(hi),
            });
        }

        let value: u32 = raw.parse().ok()?;
        Some(Self {
            min: value,
            max: value,
        })
    }

    pub fn overlaps(&self, other: &StipendRange) -> bool {
        self.min <= other.max && self.max >= other.min
    }
}

/// Accepts `true`/`false` as well as the catalog's `"yes"`/`"no"` strings.
fn yes_no_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(t)) => matches!(t.trim().to_lowercase().as_str(), "yes" | "true" | "y"),
        None => false,
    })
}

/// Stipends arrive as numbers or strings; both are kept as text.
fn stipend_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n.to_string()),
        Some(Raw::Text(t)) => Some(t),
        None => None,
    })
}
