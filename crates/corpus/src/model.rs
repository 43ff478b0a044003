//! The knowledge corpus record.
//!
//! Every optional field is an explicit `Option` so each fallback path in
//! the prompt renderer is enumerable and testable. The corpus maps
//! directly to `~/.folio/corpus.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The read-only, process-wide knowledge record the assistant answers from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeCorpus {
    /// Who this corpus describes
    pub profile: Profile,

    /// Portfolio projects, in display order
    #[serde(default)]
    pub projects: Vec<Project>,

    /// Work history, most recent first
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,

    /// Formal education
    #[serde(default)]
    pub education: Vec<EducationEntry>,

    /// Technical skills, grouped by area
    #[serde(default)]
    pub skills: Vec<SkillGroup>,

    #[serde(default)]
    pub soft_skills: Vec<String>,

    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Identity block: name, headline, and how to reach the person.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub title: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Spoken languages, not programming languages
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub links: ProfileLinks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// One portfolio project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub title: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Tech stack, joined with a stable separator when rendered
    #[serde(default)]
    pub tech: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
}

/// One work-experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,

    /// Free-form period, e.g. "2022 – present"
    #[serde(default)]
    pub period: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    pub highlights: Vec<String>,
}

/// One education entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,

    #[serde(default)]
    pub period: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A group of technical skills; the renderer flattens all groups into a
/// single list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,

    #[serde(default)]
    pub items: Vec<String>,
}

impl KnowledgeCorpus {
    /// Load a corpus from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|e| CorpusError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let corpus: Self = toml::from_str(&content).map_err(|e| CorpusError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        corpus.validate()?;

        tracing::debug!(
            path = %path.display(),
            projects = corpus.projects.len(),
            experience = corpus.experience.len(),
            "Knowledge corpus loaded"
        );

        Ok(corpus)
    }

    /// Validate the loaded record.
    fn validate(&self) -> Result<(), CorpusError> {
        if self.profile.name.trim().is_empty() {
            return Err(CorpusError::ValidationError(
                "profile.name must not be empty".into(),
            ));
        }
        if self.profile.title.trim().is_empty() {
            return Err(CorpusError::ValidationError(
                "profile.title must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a starter corpus TOML string (for `onboard`).
    pub fn starter_toml() -> &'static str {
        concat!(
            "[profile]\n",
            "name = \"Ada Example\"\n",
            "title = \"Software Engineer\"\n",
            "bio = \"I build reliable backend systems.\"\n",
            "location = \"Berlin, Germany\"\n",
            "email = \"ada@example.com\"\n",
            "languages = [\"English\", \"German\"]\n",
            "\n",
            "[profile.links]\n",
            "github = \"https://github.com/ada-example\"\n",
            "\n",
            "[[projects]]\n",
            "title = \"Sample Project\"\n",
            "category = \"Web\"\n",
            "description = \"A sample project entry — replace with your own.\"\n",
            "tech = [\"Rust\", \"Axum\"]\n",
            "role = \"Author\"\n",
            "\n",
            "[[experience]]\n",
            "position = \"Backend Engineer\"\n",
            "company = \"Acme Corp\"\n",
            "period = \"2022 - present\"\n",
            "summary = \"Own the billing pipeline.\"\n",
            "\n",
            "[[education]]\n",
            "degree = \"B.Sc. Computer Science\"\n",
            "institution = \"Example University\"\n",
            "period = \"2018 - 2022\"\n",
            "\n",
            "[[skills]]\n",
            "category = \"Backend\"\n",
            "items = [\"Rust\", \"PostgreSQL\"]\n",
            "\n",
            "soft_skills = [\"Clear written communication\"]\n",
            "tools = [\"Git\", \"Docker\"]\n",
            "achievements = [\"Shipped v1.0 of the billing pipeline\"]\n",
        )
    }
}

/// Corpus loading errors.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read corpus file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse corpus file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Corpus validation failed: {0}")]
    ValidationError(String),
}
