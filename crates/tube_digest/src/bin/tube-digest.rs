use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tube_digest::{
    gemini::GeminiClient,
    http::router,
    models::{refresh_ollama_models, ModelCatalog, DEFAULT_OLLAMA_MODELS_FILE},
    ollama::OllamaClient,
    tracing::init_tracing_subscriber,
    ProviderConfig, ProviderFactory, SummaryPipelineBuilder, DEFAULT_MAX_TRANSCRIPT_CHARS,
};
use yt_transcript::YoutubeTranscriptApi;

#[derive(Parser)]
#[command(name = "tube-digest", about = "Streams LLM summaries of YouTube videos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Snapshot the locally installed Ollama models into a JSON file
    RefreshOllamaModels {
        /// Where to write the model list
        #[arg(long, env = "OLLAMA_MODELS_FILE", default_value = DEFAULT_OLLAMA_MODELS_FILE)]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Provider used when a request names none
    #[arg(long, env = "LLM_PROVIDER")]
    llm_provider: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Ollama server URL
    #[arg(long, env = "OLLAMA_URL", default_value = OllamaClient::DEFAULT_BASE_URL)]
    ollama_url: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_API_URL", default_value = GeminiClient::DEFAULT_BASE_URL)]
    gemini_url: String,

    /// Model list written by `refresh-ollama-models`
    #[arg(long, env = "OLLAMA_MODELS_FILE", default_value = DEFAULT_OLLAMA_MODELS_FILE)]
    ollama_models_file: PathBuf,

    /// Transcripts longer than this many characters are truncated
    #[arg(long, default_value_t = DEFAULT_MAX_TRANSCRIPT_CHARS)]
    max_transcript_chars: usize,

    /// Timeout for outbound HTTP calls, unbounded when unset
    #[arg(long)]
    http_timeout_secs: Option<u64>,
}

struct ServeConfig {
    bind: SocketAddr,
    providers: ProviderConfig,
    ollama_models_file: PathBuf,
    max_transcript_chars: usize,
    http_timeout: Option<Duration>,
}

impl From<ServeArgs> for ServeConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            bind: args.bind,
            providers: ProviderConfig {
                default_provider: args.llm_provider.filter(|p| !p.is_empty()),
                gemini_api_key: args.gemini_api_key,
                ollama_url: args.ollama_url,
                gemini_url: args.gemini_url,
            },
            ollama_models_file: args.ollama_models_file,
            max_transcript_chars: args.max_transcript_chars,
            http_timeout: args.http_timeout_secs.map(Duration::from_secs),
        }
    }
}

async fn serve(config: ServeConfig) -> anyhow::Result<()> {
    let mut client = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout {
        client = client.timeout(timeout);
    }
    let client = client.build().context("Failed to build HTTP client")?;

    if config.providers.gemini_api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, Gemini requests will fail");
    }

    let catalog = ModelCatalog::new(
        client.clone(),
        &config.providers,
        &config.ollama_models_file,
    );

    let pipeline = SummaryPipelineBuilder::new()
        .transcripts(YoutubeTranscriptApi::new(client.clone()))
        .providers(ProviderFactory::new(client, config.providers))
        .max_transcript_chars(config.max_transcript_chars)
        .build();

    let app = router(Arc::new(pipeline), Arc::new(catalog));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, "Listening...");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match cli.command {
        Command::Serve(args) => serve(args.into()).await?,
        Command::RefreshOllamaModels { output } => {
            let models = refresh_ollama_models(&output).await?;
            tracing::info!(
                count = models.len(),
                path = %output.display(),
                "Saved Ollama models"
            );
        }
    }

    Ok(())
}
