use anyhow::Context;
use docqa::{
    api::routes::create_router,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    llm::LLMClientFactory,
    rag::embeddings::OllamaEmbedder,
    utils::logging::init_tracing,
    AppState, DocQaConfig,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&cli.config, cli.json).await,
        Commands::Init {
            path,
            force,
            host,
            port,
        } => match init::run(
            InitConfig {
                path,
                force,
                host,
                port,
            },
            &output,
        ) {
            InitResult::Success | InitResult::AlreadyExists => Ok(()),
            InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
        },
        Commands::Config { validate } => show_config(&cli.config, validate, &output),
    }
}

async fn serve(config_path: &Path, json_logs: bool) -> anyhow::Result<()> {
    let config = DocQaConfig::load(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    init_tracing(&config.server.log_level, json_logs);

    let embedder = Arc::new(OllamaEmbedder::new(
        &config.ollama.base_url,
        config.ollama.embedding_model.clone(),
    ));
    let llm_factory = Arc::new(LLMClientFactory::new(config.ollama.base_url.clone()));

    let addr = config.bind_addr();
    let state = AppState::new(config, embedder, llm_factory)?;
    state
        .uploads
        .ensure_dir()
        .await
        .with_context(|| format!("creating {}", state.uploads.dir().display()))?;

    tracing::info!(
        ollama = %state.config.ollama.base_url,
        embedding_model = %state.config.ollama.embedding_model,
        models = ?state.config.models,
        uploads = %state.uploads.dir().display(),
        "Starting docqa"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn show_config(config_path: &Path, validate_only: bool, output: &Output) -> anyhow::Result<()> {
    let config = match DocQaConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            anyhow::bail!("invalid configuration in {}", config_path.display());
        }
    };

    if validate_only {
        output.success(&format!("{} is valid", config_path.display()));
        return Ok(());
    }

    output.header("Configuration");
    output.kv("file", &config_path.display().to_string());
    output.kv("listen", &config.bind_addr());
    output.kv("log level", &config.server.log_level);

    output.subheader("Uploads");
    output.kv("directory", &config.uploads.dir.display().to_string());
    output.kv("max size", &format!("{} bytes", config.uploads.max_file_size));
    output.kv("extensions", &config.uploads.allowed_extensions.join(", "));

    output.subheader("Ollama");
    output.kv("base url", &config.ollama.base_url);
    output.kv("embedding model", &config.ollama.embedding_model);

    output.subheader("Retrieval");
    output.kv("chunk size", &config.rag.chunk_size.to_string());
    output.kv("chunk overlap", &config.rag.chunk_overlap.to_string());
    output.kv("top k", &config.rag.top_k.to_string());
    output.kv("distance", &config.rag.distance.to_string());

    output.subheader("Models");
    for model in &config.models {
        output.list_item(model);
    }
    output.newline();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
