// Read-only posting catalog and its retrieval artifacts. Everything here is
// loaded once at startup and shared immutably afterwards.

pub mod embedder;
pub mod index;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::errors::EngineError;
use crate::models::posting::PostingRecord;

const ID_PREFIX: &str = "INT";

/// Postings and their embedding rows, row `i` belonging to posting `i`.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Name of the embedder that produced `embeddings`.
    pub embedder: String,
    pub postings: Vec<PostingRecord>,
    pub embeddings: Vec<Vec<f32>>,
}

impl Catalog {
    pub fn dimension(&self) -> usize {
        self.embeddings.first().map(Vec::len).unwrap_or(0)
    }

    /// `embedder` names the query-side embedder; rows from any other model are unusable.
    pub fn validate(&self, embedder: &str) -> Result<(), EngineError> {
        if self.embedder != embedder {
            return Err(EngineError::ArtifactUnavailable(format!(
                "catalog was embedded with '{}' but queries use '{embedder}'",
                self.embedder
            )));
        }

        if self.postings.is_empty() {
            return Err(EngineError::ArtifactUnavailable(
                "catalog contains no postings".to_string(),
            ));
        }

        if self.postings.len() != self.embeddings.len() {
            return Err(EngineError::ArtifactUnavailable(format!(
                "catalog has {} postings but {} embedding rows",
                self.postings.len(),
                self.embeddings.len()
            )));
        }

        let dimension = self.dimension();
        if dimension == 0 {
            return Err(EngineError::ArtifactUnavailable(
                "embedding rows are empty".to_string(),
            ));
        }
        if let Some(row) = self.embeddings.iter().position(|r| r.len() != dimension) {
            return Err(EngineError::ArtifactUnavailable(format!(
                "embedding row {row} has {} values, expected {dimension}",
                self.embeddings[row].len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.postings.len());
        for posting in &self.postings {
            let id = posting.internship_id.as_str();
            if !is_valid_posting_id(id) {
                return Err(EngineError::ArtifactUnavailable(format!(
                    "invalid internship_id '{id}'"
                )));
            }
            if !seen.insert(id) {
                return Err(EngineError::ArtifactUnavailable(format!(
                    "duplicate internship_id '{id}'"
                )));
            }
        }

        Ok(())
    }
}

/// `INT` followed by ASCII letters, digits, `_` or `-`.
pub fn is_valid_posting_id(id: &str) -> bool {
    id.strip_prefix(ID_PREFIX).is_some_and(|rest| {
        rest.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    })
}

/// Reads and validates the catalog artifact
/// (`{"embedder": "...", "postings": [...], "embeddings": [[...]]}`).
pub fn load_catalog(path: &Path, embedder: &str) -> Result<Catalog, EngineError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        EngineError::ArtifactUnavailable(format!("cannot read {}: {e}", path.display()))
    })?;

    let catalog: Catalog = serde_json::from_str(&raw).map_err(|e| {
        EngineError::ArtifactUnavailable(format!("cannot parse {}: {e}", path.display()))
    })?;
    catalog.validate(embedder)?;

    info!(
        "Catalog loaded from {}: {} postings, dimension {}, embedder {}",
        path.display(),
        catalog.postings.len(),
        catalog.dimension(),
        catalog.embedder
    );
    Ok(catalog)
}
