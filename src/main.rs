use clap::{Args, Parser, Subcommand};
use ollama_batch::chat::ChatService;
use ollama_batch::config::{self, Limits, Settings};
use ollama_batch::events::EventLog;
use ollama_batch::llm::OllamaClient;
use ollama_batch::{pipeline, server};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name="ollama-batch", version)]
struct Cli {
  #[command(subcommand)]
  cmd: Cmd,
  #[command(flatten)]
  common: Common,
}

#[derive(Args)]
struct Common {
  /// Root of the datasets (contains steamreviews/ and imatges/animals/)
  #[arg(long, global=true, env="DATA_PATH")] data_path: Option<PathBuf>,
  /// Ollama API base, e.g. http://localhost:11434/api
  #[arg(long, global=true, env="CHAT_API_OLLAMA_URL")] ollama_url: Option<String>,
  #[arg(long, global=true, env="CHAT_API_OLLAMA_MODEL_TEXT")] text_model: Option<String>,
  #[arg(long, global=true, env="CHAT_API_OLLAMA_MODEL_VISION")] vision_model: Option<String>,
  /// Where reports are written
  #[arg(long, global=true, default_value="./data")] output_dir: PathBuf,
  /// Per-request timeout
  #[arg(long, global=true, default_value_t=1000)] timeout_secs: u64,
}

#[derive(Subcommand)]
enum Cmd {
  /// Classify Steam reviews and count sentiments per game
  Sentiment { #[arg(long)] max_games: Option<usize>, #[arg(long)] max_reviews_per_game: Option<usize> },
  /// Describe animal images as structured JSON
  Classify { #[arg(long)] max_category_dirs: Option<usize> },
  /// Serve the chat REST API
  Serve { #[arg(long, default_value="127.0.0.1:3000")] addr: String, #[arg(long)] default_model: Option<String> },
}

fn settings(common: Common, limits: Limits) -> Settings {
  Settings {
    data_path: common.data_path,
    ollama_url: common.ollama_url,
    text_model: common.text_model,
    vision_model: common.vision_model,
    output_dir: common.output_dir,
    timeout: Duration::from_secs(common.timeout_secs),
    limits,
  }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
  let mut events = EventLog::new();
  match cli.cmd {
    Cmd::Sentiment { max_games, max_reviews_per_game } => {
      let s = settings(cli.common, Limits { max_games, max_reviews_per_game, ..Limits::default() });
      s.validate_sentiment()?;
      let client = OllamaClient::new(s.ollama_url()?, s.timeout)?;
      let path = pipeline::sentiment::execute(&s, &client, &mut events).await?;
      info!(path = %path.display(), warnings = events.warnings(), "sentiment report saved");
    }
    Cmd::Classify { max_category_dirs } => {
      let s = settings(cli.common, Limits { max_category_dirs, ..Limits::default() });
      s.validate_vision()?;
      let client = OllamaClient::new(s.ollama_url()?, s.timeout)?;
      let path = pipeline::vision::execute(&s, &client, &mut events).await?;
      info!(path = %path.display(), warnings = events.warnings(), "classification report saved");
    }
    Cmd::Serve { addr, default_model } => {
      let s = settings(cli.common, Limits::default());
      let client = OllamaClient::new(s.ollama_url()?, s.timeout)?;
      let model = default_model.or(s.text_model.clone()).unwrap_or_else(|| config::DEFAULT_CHAT_MODEL.to_string());
      server::run_server(ChatService::new(Arc::new(client), model), &addr).await?;
    }
  }
  Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "ollama_batch=info".into()))
    .with(tracing_subscriber::fmt::layer())
    .init();

  match run(Cli::parse()).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("run failed: {e:#}");
      ExitCode::FAILURE
    }
  }
}
