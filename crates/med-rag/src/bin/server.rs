//! Medical RAG server binary
//!
//! Run with: cargo run -p med-rag --bin med-rag-server

use med_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "med_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Medical RAG Service                    ║
║     Multi-Source Q&A with Attributed Medical Answers      ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration from MEDRAG_CONFIG if set, defaults otherwise
    let config = match std::env::var("MEDRAG_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            RagConfig::from_file(&path)?
        }
        Err(_) => RagConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embedding.model);
    tracing::info!("  - Embedding dimensions: {}", config.embedding.dimensions);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Vector index: {} (namespace '{}')", config.vector_index.index, config.vector_index.namespace);
    tracing::info!("  - Dataset directory: {}", config.registry.data_dir.display());
    tracing::info!("  - Session window: {} exchanges", config.session.window_size);

    // Create the server (loads the dataset registry from disk)
    let server = RagServer::new(config)?;

    // Probe the language model; the server still starts without it
    match server.state().llm().health_check().await {
        Ok(true) => tracing::info!("Language model is reachable"),
        _ => {
            tracing::warn!("Language model is not reachable");
            tracing::warn!("Set OPENAI_API_KEY (and PINECONE_API_KEY, EXA_API_KEY) before asking questions");
        }
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ask             - Ask a medical question");
    println!("  GET  /api/datasets        - List ingested datasets");
    println!("  POST /api/datasets/ingest - Ingest a dataset file");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
