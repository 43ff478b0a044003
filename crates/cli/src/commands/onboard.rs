//! `folio onboard` — First-time setup.

use folio_config::AppConfig;
use folio_corpus::KnowledgeCorpus;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let corpus_path = config_dir.join("corpus.toml");

    println!("📁 Folio — First-Time Setup");
    println!("===========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    if corpus_path.exists() {
        println!("⚠️  Corpus already exists at: {}", corpus_path.display());
    } else {
        std::fs::write(&corpus_path, KnowledgeCorpus::starter_toml())?;
        println!("✅ Created starter corpus.toml at: {}", corpus_path.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Edit {} with your own profile", corpus_path.display());
    println!("   2. Export OPENAI_API_KEY and/or GEMINI_API_KEY");
    println!("   3. Run: folio serve\n");

    Ok(())
}
