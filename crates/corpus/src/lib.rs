//! # Folio Corpus
//!
//! The knowledge corpus is the single source of truth the assistant is
//! allowed to speak from: one developer's profile, projects, experience,
//! education, skills, and achievements. It is loaded once at startup,
//! never mutated, and serialized into a system prompt per request.

pub mod model;
pub mod prompt;

pub use model::{
    CorpusError, EducationEntry, ExperienceEntry, KnowledgeCorpus, Profile, ProfileLinks, Project,
    SkillGroup,
};
pub use prompt::{DEFAULT_LOCALE, build_system_prompt};
