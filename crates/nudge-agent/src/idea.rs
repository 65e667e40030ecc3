//! Project idea value type.

use serde::{Deserialize, Serialize};

/// Effort level of a project idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("unknown difficulty: {}", value)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

/// A project suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdea {
    pub title: String,
    pub description: String,
    #[serde(rename = "techStack", alias = "tech_stack")]
    pub tech_stack: String,
    pub difficulty: Difficulty,
}

impl ProjectIdea {
    /// Whether all text fields carry content.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.tech_stack.trim().is_empty()
    }
}

/// Where a generated idea came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaSource {
    /// A completion provider, by name.
    Provider(String),
    /// The bundled catalog.
    Catalog,
}

impl std::fmt::Display for IdeaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(name) => write!(f, "{}", name),
            Self::Catalog => write!(f, "catalog"),
        }
    }
}

/// An idea together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIdea {
    pub idea: ProjectIdea,
    pub source: IdeaSource,
}
