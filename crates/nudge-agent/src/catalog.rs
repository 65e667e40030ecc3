//! Static project idea catalog, the last step of the fallback chain.

use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::error::{AgentError, Result};
use crate::idea::ProjectIdea;

const BUNDLED_IDEAS: &str = include_str!("../assets/project-ideas.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    ideas: Vec<ProjectIdea>,
}

/// A non-empty list of curated ideas, loaded once.
#[derive(Debug, Clone)]
pub struct IdeaCatalog {
    ideas: Vec<ProjectIdea>,
}

impl IdeaCatalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_IDEAS)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        if file.ideas.is_empty() {
            return Err(AgentError::Catalog("catalog contains no ideas".into()));
        }
        Ok(Self { ideas: file.ideas })
    }

    /// Loads a catalog from disk, for overriding the bundled one.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AgentError::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Loads from `path` when given, the bundled catalog otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    /// Uniformly random entry.
    pub fn pick_random(&self) -> ProjectIdea {
        let index = rand::rng().random_range(0..self.ideas.len());
        self.ideas[index].clone()
    }

    pub fn ideas(&self) -> &[ProjectIdea] {
        &self.ideas
    }

    pub fn contains(&self, idea: &ProjectIdea) -> bool {
        self.ideas.iter().any(|i| i == idea)
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }
}
