use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use vault_ask::{
    load_config, AskError, ChatCompletionClient, EmbeddingGenerator, ModelError, QaSession,
    SessionOptions,
};

const EXIT_VAULT_NOT_FOUND: u8 = 1;
const EXIT_MODEL_FAILURE: u8 = 2;
const EXIT_OTHER: u8 = 3;

/// Ask a question to a vault of Markdown notes and print the answer.
#[derive(Parser)]
#[command(name = "vault-ask")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the vault (defaults to vault.path from the config)
    #[arg(long)]
    vault_path: Option<PathBuf>,

    /// Question to ask the vault (prompted for when omitted)
    #[arg(long)]
    question: Option<String>,

    /// Number of related notes to pass to the model
    #[arg(long)]
    top_k: Option<usize>,

    /// Config file (defaults to $VAULT_ASK_CONFIG_PATH, then ./vault_ask.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_OTHER)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(answer) => {
            println!("{}", answer);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.vault_path {
        config.vault.path = path;
    }
    if let Some(top_k) = cli.top_k {
        anyhow::ensure!(top_k > 0, "--top-k must be at least 1");
        config.retrieval.top_k = top_k;
    }
    log::debug!("Configuration loaded: {:?}", config);

    if !config.vault.path.is_dir() {
        return Err(AskError::VaultNotFound(config.vault.path.clone()).into());
    }

    let question = match cli.question {
        Some(question) => question,
        None => prompt_question()?,
    };
    let question = question.trim().to_string();
    anyhow::ensure!(!question.is_empty(), "Question must not be empty");

    let model = ChatCompletionClient::from_env(&config.llm).map_err(AskError::from)?;

    let embedding = config.embedding.clone();
    let embedder = tokio::task::spawn_blocking(move || {
        EmbeddingGenerator::from_name(&embedding.model, embedding.cache_dir)
    })
    .await
    .context("Embedding model initialisation panicked")??;

    let session = QaSession::open(
        SessionOptions::from(&config),
        Arc::new(embedder),
        Arc::new(model),
    )
    .await?;

    Ok(session.ask(&question).await?)
}

fn prompt_question() -> Result<String> {
    eprint!("Question: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read question from stdin")?;
    Ok(line)
}

fn exit_code(error: &anyhow::Error) -> u8 {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<AskError>() {
            return match e {
                AskError::VaultNotFound(_) => EXIT_VAULT_NOT_FOUND,
                AskError::Model(_) => EXIT_MODEL_FAILURE,
                _ => EXIT_OTHER,
            };
        }
        if cause.downcast_ref::<ModelError>().is_some() {
            return EXIT_MODEL_FAILURE;
        }
    }
    EXIT_OTHER
}
