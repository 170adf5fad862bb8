use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use opengpts_client::cli::{Args, Command};
use opengpts_client::config::{default_log_filter, Config};
use opengpts_client::identity::UserIdStore;
use opengpts_client::models::{threads_for_assistant, IngestOptions};
use opengpts_client::orchestrator::{self, ChatRequest};
use opengpts_client::ui::{write_assistants, write_history, write_json, write_threads};
use opengpts_client::OpenGptsClient;
use serde_json::Value;
use std::fs;
use std::io;
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{} {}", "Error:".red(), e);
        for cause in e.chain().skip(1) {
            eprintln!("   caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_filter(verbose))),
        )
        .with_ansi(is_tty)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_user_id(config: &Config) -> Result<Option<String>> {
    if config.user_id.is_some() {
        return Ok(None);
    }
    match UserIdStore::default_location() {
        Some(store) => {
            let id = store.load_or_create().with_context(|| {
                format!("Failed to persist user id at {}", store.path().display())
            })?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

fn read_assistant_config(raw: &str) -> Result<Value> {
    let contents = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read assistant config: {}", path))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&contents).context("Assistant config must be valid JSON")
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_env_and_args(&args)?;
    init_tracing(config.verbose);

    let user_id = resolve_user_id(&config)?;
    let client = OpenGptsClient::new(config.client_config(user_id))?;
    tracing::debug!(url = %client.base_url(), user_id = %client.user_id(), "client ready");

    let mut stdout = io::stdout();

    match args.command {
        Command::Health => {
            let health = client.health().await?;
            println!("{}", health.status.green());
        }
        Command::Assistants { public } => {
            let assistants = match public {
                Some(shared_id) => client.list_public_assistants(&shared_id).await?,
                None => client.list_assistants().await?,
            };
            write_assistants(&mut stdout, &assistants)?;
        }
        Command::Assistant { assistant_id } => {
            let assistant = client.get_assistant(&assistant_id).await?;
            write_json(&mut stdout, &assistant)?;
        }
        Command::CreateAssistant {
            name,
            config: assistant_config,
            public,
        } => {
            let assistant_config = read_assistant_config(&assistant_config)?;
            let assistant = client
                .create_assistant(&name, assistant_config, public)
                .await?;
            println!("{} {}", "Created assistant".green(), assistant.assistant_id);
        }
        Command::Threads { assistant_id } => {
            let threads = client.list_threads().await?;
            let threads = match assistant_id {
                Some(id) => threads_for_assistant(threads, &id),
                None => threads,
            };
            write_threads(&mut stdout, &threads)?;
        }
        Command::Thread { thread_id } => {
            let thread = client.get_thread(&thread_id).await?;
            write_json(&mut stdout, &thread)?;
        }
        Command::CreateThread { name, assistant_id } => {
            let thread = client.create_thread(&name, &assistant_id).await?;
            println!("{} {}", "Created thread".green(), thread.thread_id);
        }
        Command::Messages { thread_id } => {
            let messages = client.get_messages(&thread_id).await?;
            write_history(&mut stdout, &messages.messages)?;
        }
        Command::History { thread_id } => {
            let history = client.get_thread_history(&thread_id).await?;
            for (index, state) in history.iter().enumerate() {
                println!("{}", format!("--- state {} ---", index).dimmed());
                write_history(&mut stdout, &state.values)?;
            }
        }
        Command::Ingest {
            assistant_id,
            chunk_size,
            chunk_overlap,
            separators,
            files,
        } => {
            let options = IngestOptions {
                chunk_size,
                chunk_overlap,
                separators: if separators.is_empty() {
                    None
                } else {
                    Some(separators)
                },
            };
            let response = client.ingest_files(&files, &assistant_id, &options).await?;
            println!(
                "{} {} file(s) (status {})",
                "Ingested".green(),
                files.len(),
                response.status
            );
        }
        Command::Chat {
            assistant_id,
            thread_id,
            prompt,
        } => {
            let prompt = prompt.join(" ");
            let outcome = orchestrator::chat(
                &client,
                ChatRequest {
                    assistant_id: assistant_id.as_deref(),
                    thread_id: thread_id.as_deref(),
                    target_assistant_ids: config.target_assistant_ids.as_deref(),
                    prompt: &prompt,
                },
                &mut stdout,
            )
            .await?;
            eprintln!("{}", format!("thread: {}", outcome.thread_id).dimmed());
        }
    }

    Ok(())
}
