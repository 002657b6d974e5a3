//! CERT command-line interface
//!
//! The `cert` command measures agents locally or against a running `certd`.
//!
//! ## Commands
//!
//! - `consistency`: behavioral consistency of one agent's responses
//! - `coordination`: coordination effect γ between two agents
//! - `remote`: the same measurements (plus `health`) through the HTTP API

use anyhow::{Context, Result};
use cert_client::{CertClient, DEFAULT_BASE_URL};
use cert_core::{
    measure_coordination, patterns, ConsistencyEngine, ConsistencyResult, CoordinationInput,
    CoordinationResult, EmbeddingBackend, EmbeddingProvider, HashingEmbedder, HttpEmbedder,
    HttpEmbedderConfig, DEFAULT_EMBEDDING_MODEL,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn, Level};

#[derive(Parser)]
#[command(name = "cert")]
#[command(author = "CERT Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Consistency and coordination measurement for AI agents", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure behavioral consistency locally
    Consistency {
        #[command(flatten)]
        args: ConsistencyArgs,

        #[command(flatten)]
        embedding: EmbeddingArgs,
    },

    /// Measure the coordination effect between two agents locally
    Coordination {
        #[command(flatten)]
        args: CoordinationArgs,
    },

    /// Talk to a running CERT server
    Remote {
        /// Server base URL
        #[arg(long, env = "CERT_URL", default_value = DEFAULT_BASE_URL)]
        url: String,

        #[command(subcommand)]
        action: RemoteAction,
    },
}

#[derive(Subcommand)]
enum RemoteAction {
    /// POST /measure/consistency
    Consistency {
        #[command(flatten)]
        args: ConsistencyArgs,
    },
    /// POST /measure/coordination
    Coordination {
        #[command(flatten)]
        args: CoordinationArgs,
    },
    /// GET /health
    Health,
}

#[derive(Args, Debug, Clone)]
struct ConsistencyArgs {
    /// Agent identifier
    #[arg(long)]
    agent_id: String,

    /// Prompt the responses answer
    #[arg(long)]
    prompt: String,

    /// A response (repeat for each response)
    #[arg(short, long = "response", conflicts_with = "file")]
    responses: Vec<String>,

    /// JSON file with the responses: `["..", ".."]` or `{"responses": [..]}`
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct EmbeddingArgs {
    /// Embedding backend: `http` (sentence-model endpoint) or `hashing` (lexical only)
    #[arg(long, env = "CERT_EMBEDDING_BACKEND", default_value = "http")]
    embedding_backend: EmbeddingBackend,

    /// OpenAI-compatible embeddings endpoint (required for the `http` backend)
    #[arg(long, env = "CERT_EMBEDDING_URL")]
    embedding_url: Option<String>,

    /// Model requested from the embeddings endpoint
    #[arg(long, env = "CERT_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    /// Bearer token for the embeddings endpoint
    #[arg(long, env = "CERT_EMBEDDING_API_KEY", hide_env_values = true)]
    embedding_api_key: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct CoordinationArgs {
    /// Agent A's independent performance
    #[arg(long, allow_negative_numbers = true)]
    baseline_a: f64,

    /// Agent B's independent performance
    #[arg(long, allow_negative_numbers = true)]
    baseline_b: f64,

    /// Performance observed when the agents work together
    #[arg(long, allow_negative_numbers = true)]
    observed: f64,

    /// Interaction pattern label
    #[arg(long, default_value = patterns::SEQUENTIAL)]
    pattern: String,
}

impl CoordinationArgs {
    fn to_input(&self) -> CoordinationInput {
        CoordinationInput::new(
            self.baseline_a,
            self.baseline_b,
            self.observed,
            self.pattern.clone(),
        )
    }
}

/// Accepted shapes of a `--file` responses document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponsesFile {
    List(Vec<String>),
    Object { responses: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    cert_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Consistency { args, embedding } => {
            let engine = ConsistencyEngine::new(build_provider(&embedding)?);
            let result = cmd_consistency(&engine, &args).await?;
            print_json(&result)
        }
        Commands::Coordination { args } => print_json(&cmd_coordination(&args)?),
        Commands::Remote { url, action } => {
            let client = CertClient::new(&url).context("Failed to create CERT client")?;
            match action {
                RemoteAction::Consistency { args } => {
                    let responses = collect_responses(&args)?;
                    let result = client
                        .measure_consistency(&args.agent_id, &args.prompt, &responses)
                        .await
                        .with_context(|| format!("Consistency request to {} failed", url))?;
                    print_json(&result)
                }
                RemoteAction::Coordination { args } => {
                    let result = client
                        .measure_coordination(&args.to_input())
                        .await
                        .with_context(|| format!("Coordination request to {} failed", url))?;
                    print_json(&result)
                }
                RemoteAction::Health => {
                    let health = client
                        .health()
                        .await
                        .with_context(|| format!("CERT server at {} is not reachable", url))?;
                    print_json(&health)
                }
            }
        }
    }
}

fn build_provider(args: &EmbeddingArgs) -> Result<Arc<dyn EmbeddingProvider>> {
    match args.embedding_backend {
        EmbeddingBackend::Http => {
            let url = args.embedding_url.as_deref().with_context(|| {
                "--embedding-url (or CERT_EMBEDDING_URL) is required; \
                 pass --embedding-backend hashing for lexical-only scores"
            })?;
            let mut config = HttpEmbedderConfig::new(url).with_model(&args.embedding_model);
            if let Some(key) = &args.embedding_api_key {
                config = config.with_api_key(key);
            }
            let embedder =
                HttpEmbedder::new(config).context("Failed to create embedding HTTP client")?;
            debug!(url = %url, model = %args.embedding_model, "using remote embeddings");
            Ok(Arc::new(embedder))
        }
        EmbeddingBackend::Hashing => {
            warn!("using lexical hashing embedder; scores do not reflect semantic similarity");
            Ok(Arc::new(HashingEmbedder::new()))
        }
    }
}

async fn cmd_consistency(
    engine: &ConsistencyEngine,
    args: &ConsistencyArgs,
) -> Result<ConsistencyResult> {
    let responses = collect_responses(args)?;
    engine
        .measure_consistency(&args.agent_id, &args.prompt, &responses)
        .await
        .context("Consistency measurement failed")
}

fn cmd_coordination(args: &CoordinationArgs) -> Result<CoordinationResult> {
    measure_coordination(&args.to_input()).context("Coordination measurement failed")
}

fn collect_responses(args: &ConsistencyArgs) -> Result<Vec<String>> {
    match &args.file {
        Some(path) => read_responses_file(path),
        None => Ok(args.responses.clone()),
    }
}

fn read_responses_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read responses file {:?}", path))?;
    let parsed: ResponsesFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid responses JSON in {:?}", path))?;
    Ok(match parsed {
        ResponsesFile::List(responses) => responses,
        ResponsesFile::Object { responses } => responses,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}
