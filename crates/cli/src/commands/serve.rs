//! `folio serve` — Start the HTTP gateway server.

use folio_config::AppConfig;
use folio_corpus::KnowledgeCorpus;

pub async fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;
    if let Some(port) = port {
        config.gateway.port = port;
    }

    let corpus = KnowledgeCorpus::load_from(&config.corpus_path).map_err(|e| {
        format!("{e}\nhint: run `folio onboard` to create a starter corpus")
    })?;

    tracing::info!(
        corpus = %config.corpus_path.display(),
        projects = corpus.projects.len(),
        "Corpus loaded"
    );

    folio_gateway::start(config, corpus).await
}
