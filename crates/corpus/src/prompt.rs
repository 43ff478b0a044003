//! System prompt rendering — serializes the knowledge corpus into the
//! instruction text sent with every provider request.
//!
//! Rendering is a pure function of `(corpus, locale)`: same inputs, same
//! bytes. Sections are delimited with XML-style tags for clear section
//! delineation (LLM-friendly). Absent optional fields render a fixed
//! fallback phrase instead of an empty line, and empty lists render a
//! fallback sentence instead of an empty section, so the downstream
//! model never sees a blank it could misread.

use crate::model::{
    EducationEntry, ExperienceEntry, KnowledgeCorpus, Profile, Project, SkillGroup,
};

/// Locale used when the caller does not supply one.
pub const DEFAULT_LOCALE: &str = "en";

/// Fallback for an absent scalar field.
const NOT_PROVIDED: &str = "not specified";

/// Fallback line for an empty list section.
const NONE_LISTED: &str = "None listed.";

/// Build the full system prompt for one request.
pub fn build_system_prompt(corpus: &KnowledgeCorpus, locale: &str) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(
        "You are the portfolio assistant on the personal website of the \
         person described below. Visitors ask you questions about them; \
         everything you are allowed to say comes from the sections that \
         follow.\n\n",
    );

    push_section(&mut prompt, "profile", &render_profile(&corpus.profile));
    push_section(&mut prompt, "projects", &render_projects(&corpus.projects));
    push_section(
        &mut prompt,
        "experience",
        &render_experience(&corpus.experience),
    );
    push_section(
        &mut prompt,
        "education",
        &render_education(&corpus.education),
    );
    push_section(&mut prompt, "skills", &render_skills(&corpus.skills));
    push_section(
        &mut prompt,
        "soft_skills",
        &render_plain_list(&corpus.soft_skills),
    );
    push_section(&mut prompt, "tools", &render_plain_list(&corpus.tools));
    push_section(
        &mut prompt,
        "achievements",
        &render_plain_list(&corpus.achievements),
    );
    push_section(&mut prompt, "instructions", &render_instructions(locale));

    prompt
}

fn push_section(prompt: &mut String, tag: &str, body: &str) {
    prompt.push_str(&format!("<{tag}>\n"));
    prompt.push_str(body.trim_end());
    prompt.push_str(&format!("\n</{tag}>\n\n"));
}

fn or_fallback(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_PROVIDED,
    }
}

fn text_or_fallback(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

fn joined_or_fallback(items: &[String]) -> String {
    if items.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        items.join(", ")
    }
}

fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    out.push_str(&format!("Name: {}\n", profile.name));
    out.push_str(&format!("Title: {}\n", profile.title));
    out.push_str(&format!("Bio: {}\n", text_or_fallback(&profile.bio)));
    out.push_str(&format!(
        "Location: {}\n",
        or_fallback(profile.location.as_deref())
    ));
    out.push_str(&format!(
        "Email: {}\n",
        or_fallback(profile.email.as_deref())
    ));
    out.push_str(&format!(
        "Phone: {}\n",
        or_fallback(profile.phone.as_deref())
    ));
    out.push_str(&format!(
        "Spoken languages: {}\n",
        joined_or_fallback(&profile.languages)
    ));
    out.push_str(&format!(
        "GitHub: {}\n",
        or_fallback(profile.links.github.as_deref())
    ));
    out.push_str(&format!(
        "LinkedIn: {}\n",
        or_fallback(profile.links.linkedin.as_deref())
    ));
    out.push_str(&format!(
        "Website: {}\n",
        or_fallback(profile.links.website.as_deref())
    ));
    out
}

fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return NONE_LISTED.to_string();
    }

    let mut out = String::new();
    for (i, project) in projects.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            project.title,
            text_or_fallback(&project.category)
        ));
        out.push_str(&format!(
            "   Description: {}\n",
            text_or_fallback(&project.description)
        ));
        out.push_str(&format!("   Tech: {}\n", joined_or_fallback(&project.tech)));
        out.push_str(&format!(
            "   Role: {}\n",
            or_fallback(project.role.as_deref())
        ));
        out.push_str(&format!(
            "   Demo: {}\n",
            or_fallback(project.demo_url.as_deref())
        ));
        out.push_str(&format!(
            "   Repository: {}\n",
            or_fallback(project.repo_url.as_deref())
        ));
    }
    out
}

fn render_experience(entries: &[ExperienceEntry]) -> String {
    if entries.is_empty() {
        return NONE_LISTED.to_string();
    }

    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "- {} at {} ({})\n",
            entry.position,
            entry.company,
            text_or_fallback(&entry.period)
        ));
        out.push_str(&format!(
            "  Summary: {}\n",
            or_fallback(entry.summary.as_deref())
        ));
        for highlight in &entry.highlights {
            out.push_str(&format!("  * {highlight}\n"));
        }
    }
    out
}

fn render_education(entries: &[EducationEntry]) -> String {
    if entries.is_empty() {
        return NONE_LISTED.to_string();
    }

    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "- {}, {} ({})",
            entry.degree,
            entry.institution,
            text_or_fallback(&entry.period)
        ));
        if let Some(note) = entry.note.as_deref() {
            out.push_str(&format!(" — {note}"));
        }
        out.push('\n');
    }
    out
}

/// Skill groups are flattened into one list; the group name prefixes each
/// item so grouping survives the flattening.
fn render_skills(groups: &[SkillGroup]) -> String {
    let flattened: Vec<String> = groups
        .iter()
        .flat_map(|group| {
            group
                .items
                .iter()
                .map(move |item| format!("{} ({})", item, group.category))
        })
        .collect();

    if flattened.is_empty() {
        NONE_LISTED.to_string()
    } else {
        flattened.join(", ")
    }
}

fn render_plain_list(items: &[String]) -> String {
    if items.is_empty() {
        return NONE_LISTED.to_string();
    }

    let mut out = String::new();
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
    out
}

fn render_instructions(locale: &str) -> String {
    format!(
        "Answer in the language indicated by the locale \"{locale}\". If \
         the visitor writes in a different language, switch to their \
         language instead.\n\
         Keep answers short and concrete; prefer bullet points when \
         listing more than two items.\n\
         Only answer questions about the person described above. If a \
         question is not about them, their work, or their background, \
         politely decline to answer it.\n\
         Never invent facts that are not present in the sections above. \
         If the answer is not covered, say so."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProfileLinks;

    fn sample_corpus() -> KnowledgeCorpus {
        KnowledgeCorpus {
            profile: Profile {
                name: "Ada Example".into(),
                title: "Software Engineer".into(),
                bio: "I build reliable backend systems.".into(),
                location: Some("Berlin, Germany".into()),
                email: None,
                phone: None,
                languages: vec!["English".into(), "German".into()],
                links: ProfileLinks {
                    github: Some("https://github.com/ada-example".into()),
                    linkedin: None,
                    website: None,
                },
            },
            projects: vec![
                Project {
                    title: "Billing Pipeline".into(),
                    category: "Backend".into(),
                    description: "Invoice processing at scale.".into(),
                    tech: vec!["Rust".into(), "PostgreSQL".into()],
                    role: Some("Lead".into()),
                    demo_url: None,
                    repo_url: Some("https://github.com/ada-example/billing".into()),
                },
                Project {
                    title: "Side Quest".into(),
                    ..Project::default()
                },
            ],
            experience: vec![ExperienceEntry {
                position: "Backend Engineer".into(),
                company: "Acme Corp".into(),
                period: "2022 - present".into(),
                summary: None,
                highlights: vec!["Cut invoice latency by 40%".into()],
            }],
            education: vec![EducationEntry {
                degree: "B.Sc. Computer Science".into(),
                institution: "Example University".into(),
                period: "2018 - 2022".into(),
                note: Some("graduated with honours".into()),
            }],
            skills: vec![SkillGroup {
                category: "Backend".into(),
                items: vec!["Rust".into(), "PostgreSQL".into()],
            }],
            soft_skills: vec!["Clear written communication".into()],
            tools: vec!["Git".into(), "Docker".into()],
            achievements: vec![],
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let corpus = sample_corpus();
        let first = build_system_prompt(&corpus, "en");
        let second = build_system_prompt(&corpus, "en");
        assert_eq!(first, second);
    }

    #[test]
    fn locale_changes_instruction_block() {
        let corpus = sample_corpus();
        let english = build_system_prompt(&corpus, "en");
        let portuguese = build_system_prompt(&corpus, "pt-BR");
        assert_ne!(english, portuguese);
        assert!(portuguese.contains("\"pt-BR\""));
    }

    #[test]
    fn absent_fields_render_fallback_phrase() {
        let corpus = sample_corpus();
        let prompt = build_system_prompt(&corpus, "en");

        // email and phone are absent in the sample
        assert!(prompt.contains("Email: not specified"));
        assert!(prompt.contains("Phone: not specified"));
        // the second project has no tech, role, or links
        assert!(prompt.contains("Tech: not specified"));
    }

    #[test]
    fn empty_lists_never_render_empty_sections() {
        let corpus = KnowledgeCorpus {
            profile: Profile {
                name: "Ada".into(),
                title: "Engineer".into(),
                ..Profile::default()
            },
            ..KnowledgeCorpus::default()
        };
        let prompt = build_system_prompt(&corpus, "en");

        assert!(prompt.contains("<projects>\nNone listed.\n</projects>"));
        assert!(prompt.contains("<achievements>\nNone listed.\n</achievements>"));
        assert!(!prompt.contains("<projects>\n\n</projects>"));
    }

    #[test]
    fn projects_are_enumerated_in_order() {
        let corpus = sample_corpus();
        let prompt = build_system_prompt(&corpus, "en");

        let first = prompt.find("1. Billing Pipeline").unwrap();
        let second = prompt.find("2. Side Quest").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Tech: Rust, PostgreSQL"));
    }

    #[test]
    fn skills_are_flattened_with_group_labels() {
        let corpus = sample_corpus();
        let prompt = build_system_prompt(&corpus, "en");
        assert!(prompt.contains("Rust (Backend), PostgreSQL (Backend)"));
    }

    #[test]
    fn instruction_block_carries_refusal_policy() {
        let prompt = build_system_prompt(&sample_corpus(), "en");
        assert!(prompt.contains("politely decline"));
        assert!(prompt.contains("Never invent facts"));
    }

    #[test]
    fn every_section_tag_present() {
        let prompt = build_system_prompt(&sample_corpus(), "en");
        for tag in [
            "profile",
            "projects",
            "experience",
            "education",
            "skills",
            "soft_skills",
            "tools",
            "achievements",
            "instructions",
        ] {
            assert!(prompt.contains(&format!("<{tag}>")), "missing <{tag}>");
            assert!(prompt.contains(&format!("</{tag}>")), "missing </{tag}>");
        }
    }
}
