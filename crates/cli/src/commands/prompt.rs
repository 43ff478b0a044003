//! `folio prompt` — Render the system prompt and print it.
//!
//! Useful for eyeballing exactly what the providers receive; the output
//! is byte-identical across runs for the same corpus and locale.

use folio_config::AppConfig;
use folio_corpus::{KnowledgeCorpus, build_system_prompt};

pub async fn run(locale: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let corpus = KnowledgeCorpus::load_from(&config.corpus_path).map_err(|e| {
        format!("{e}\nhint: run `folio onboard` to create a starter corpus")
    })?;

    let locale = locale.unwrap_or_else(|| config.default_locale.clone());
    print!("{}", build_system_prompt(&corpus, &locale));

    Ok(())
}
