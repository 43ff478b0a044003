//! `folio doctor` — Diagnose configuration and corpus health.
//!
//! Runs entirely offline: provider checks report whether credentials
//! are configured, never whether the services answer.

use folio_config::AppConfig;
use folio_corpus::KnowledgeCorpus;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Folio Doctor — Deployment Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file present: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — run `folio onboard` (using defaults)");
    }

    match AppConfig::load() {
        Ok(config) => {
            // Corpus
            match KnowledgeCorpus::load_from(&config.corpus_path) {
                Ok(corpus) => {
                    println!(
                        "  ✅ Corpus loaded: {} projects, {} experience entries",
                        corpus.projects.len(),
                        corpus.experience.len()
                    );
                }
                Err(e) => {
                    println!("  ❌ Corpus unavailable: {e}");
                    issues += 1;
                }
            }

            // Provider credentials — the same probe the gateway exposes at /health
            let orchestrator = folio_providers::build_orchestrator(&config);
            if orchestrator.primary_configured() {
                println!("  ✅ Primary provider credential configured");
            } else {
                println!("  ⚠️  Primary provider credential missing — set OPENAI_API_KEY");
                issues += 1;
            }
            if orchestrator.secondary_configured() {
                println!("  ✅ Secondary provider credential configured");
            } else {
                println!("  ⚠️  Secondary provider credential missing — set GEMINI_API_KEY");
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
