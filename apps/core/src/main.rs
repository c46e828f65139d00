// Saathi terminal front-end
// Reads one message per line and prints the assistant's reply.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

use saathi_core::actors::supervisor::SupervisorHandle;
use saathi_core::knowledge::IndexStatus;
use saathi_core::preflight::run_preflight_checks;
use saathi_core::telemetry::init_tracing;
use saathi_core::AppConfig;

const QUIT_COMMAND: &str = "/quit";

/// Saathi - a calm companion for students, in your terminal
#[derive(Parser)]
#[command(name = "saathi", version, about)]
struct Cli {
    /// Knowledge-base JSON file (array of {id, category, text})
    #[arg(short, long, env = "SAATHI_KNOWLEDGE_PATH")]
    knowledge: Option<PathBuf>,

    /// Category table JSON file (array of {name, keywords})
    #[arg(short, long, env = "SAATHI_CATEGORIES_PATH")]
    categories: Option<PathBuf>,

    /// Run preflight checks, print the report as JSON and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("fatal: {e:#}");
            eprintln!("saathi: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if cli.knowledge.is_some() {
        config.knowledge_path = cli.knowledge;
    }
    if cli.categories.is_some() {
        config.categories_path = cli.categories;
    }

    init_tracing(config.log_format).context("failed to initialise logging")?;

    if cli.check {
        let report = run_preflight_checks(&config).await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(if report.ready_to_start {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    config.paths.init().context("failed to create data directory")?;
    let knowledge = config.load_knowledge().context("failed to load knowledge base")?;
    let categories = config.load_categories().context("failed to load category table")?;
    if !config.has_api_key() {
        warn!("No completion API key set; emotional messages will get the fallback reply");
    }

    let supervisor = SupervisorHandle::new(&config, knowledge, categories);
    spawn_readiness_logger(supervisor.clone());

    chat_loop(&supervisor).await?;

    supervisor.shutdown().await.ok();
    info!("Goodbye");
    Ok(ExitCode::SUCCESS)
}

fn spawn_readiness_logger(supervisor: SupervisorHandle) {
    tokio::spawn(async move {
        match supervisor.wait_until_settled().await {
            IndexStatus::Ready(index) => info!("Knowledge index ready ({} entries)", index.len()),
            IndexStatus::Failed(reason) => {
                error!("Knowledge index unavailable: {}", reason)
            }
            IndexStatus::Building => warn!("Knowledge index build abandoned"),
        }
    });
}

async fn chat_loop(supervisor: &SupervisorHandle) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Saathi is here. Type a message and press Enter (/quit to leave).\n")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == QUIT_COMMAND {
            break;
        }

        let outcome = supervisor.process_message(text.to_string()).await?;
        stdout
            .write_all(format!("assistant: {}\n", outcome.reply).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    Ok(())
}
