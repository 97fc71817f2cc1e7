//! Highlight generation pipeline, driven from the terminal.

mod progress;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hlgen_client::{ClientConfig, ProcessCredentials};
use hlgen_models::{is_blob_url, PipelineStage, DOWNLOAD_FILE_NAME};
use hlgen_pipeline::{load_video_file, PipelineError, PipelineStore, Transition, ViewAction};

#[derive(Parser, Debug)]
#[command(name = "hlgen", version, about = "Upload a video, edit its highlights, generate the final cut")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full session for one source video
    Run(RunArgs),
    /// Print the pipeline stages in order
    Stages,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Source video file
    file: PathBuf,

    /// Process endpoint URL
    #[arg(long, env = "HLGEN_PROCESS_URL")]
    process_url: Option<String>,

    /// Generate endpoint URL
    #[arg(long, env = "HLGEN_GENERATE_URL")]
    generate_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Avatar service API key forwarded to the process endpoint
    #[arg(long, env = "HLGEN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Avatar identifier forwarded to the process endpoint
    #[arg(long, env = "HLGEN_AVATAR_ID")]
    avatar_id: Option<String>,

    /// Where to save the video when the service returns raw bytes
    #[arg(long, short, default_value = DOWNLOAD_FILE_NAME)]
    output: PathBuf,

    /// Do not wait for confirmation before generating; never retry
    #[arg(long, short)]
    yes: bool,
}

impl RunArgs {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.process_url {
            config.process_url = url.clone();
        }
        if let Some(url) = &self.generate_url {
            config.generate_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if self.api_key.is_some() || self.avatar_id.is_some() {
            config.credentials = ProcessCredentials {
                api_key: self.api_key.clone().or(config.credentials.api_key),
                avatar_id: self.avatar_id.clone().or(config.credentials.avatar_id),
            };
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    match cli.command {
        Command::Stages => {
            for stage in PipelineStage::ALL {
                println!("{}. {}", stage.index() + 1, stage.label());
            }
            Ok(())
        }
        Command::Run(args) => run(args).await,
    }
}

/// Colored text output for dev, JSON when `LOG_FORMAT=json`.
fn init_tracing() -> Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"))
        .add_directive("hlgen=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let config = args.client_config();
    debug!("Client config: {:?}", config);

    let file = load_video_file(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    if !file.is_video() {
        return Err(PipelineError::not_a_video(format!(
            "{} ({})",
            file.name(),
            file.media_type()
        ))
        .into());
    }

    let store = Arc::new(PipelineStore::with_client(config)?);
    info!(session_id = %store.session_id(), "Session started");

    let watcher = tokio::spawn(watch_progress(store.clone()));
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let mut transition = store.dispatch(ViewAction::FileSelected(file)).await;
    while transition == Transition::Failed(PipelineStage::Processing) {
        if args.yes || !confirm(&mut stdin, "Retry upload? [y/N] ").await? {
            bail!("processing failed: {}", error_text(&store));
        }
        transition = store.dispatch(ViewAction::Retry).await;
    }

    if store.stage() != PipelineStage::Editing {
        bail!("unexpected stage after processing: {}", store.stage());
    }

    if !args.yes {
        prompt(&mut stdin, "Press Enter when your highlights are ready to generate... ").await?;
    }

    transition = store.dispatch(ViewAction::Continue).await;
    while transition == Transition::Failed(PipelineStage::Editing) {
        if args.yes || !confirm(&mut stdin, "Try generating again? [y/N] ").await? {
            bail!("generation failed: {}", error_text(&store));
        }
        transition = store.dispatch(ViewAction::Continue).await;
    }

    let state = store.snapshot();
    let Some(download_url) = state.download_url else {
        bail!("generation finished without a download URL");
    };

    if is_blob_url(&download_url) {
        let written = store.blobs().save_to(&download_url, &args.output).await?;
        println!("Saved {} bytes to {}", written, args.output.display());
    } else {
        println!("Download your video: {}", download_url);
    }

    store.dispatch(ViewAction::Reset).await;
    watcher.abort();
    Ok(())
}

async fn watch_progress(store: Arc<PipelineStore>) {
    let mut rx = store.subscribe();
    drop(store);

    loop {
        let (steps, status) = {
            let state = rx.borrow_and_update();
            (progress::render_steps(state.stage), progress::render_status(&state))
        };
        eprintln!("{}", steps);
        if let Some(status) = status {
            eprintln!("  {}", status);
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
}

fn error_text(store: &PipelineStore) -> String {
    store
        .snapshot()
        .error
        .unwrap_or_else(|| "unknown error".to_string())
}

async fn prompt<R>(lines: &mut tokio::io::Lines<R>, message: &str) -> Result<String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    eprint!("{}", message);
    let line = lines.next_line().await?.unwrap_or_default();
    Ok(line.trim().to_string())
}

async fn confirm<R>(lines: &mut tokio::io::Lines<R>, message: &str) -> Result<bool>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let answer = prompt(lines, message).await?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
