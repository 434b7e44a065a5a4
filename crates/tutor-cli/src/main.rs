//! Local command-line entry point: exercises `start_session`/`post_message`
//! against an in-process `Orchestrator` and `StateStore`, for manual demo
//! tutoring sessions without standing up the HTTP API.

use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use tutor_cognitive::Orchestrator;
use tutor_infra::{build_default_adapters, ConnectionConfig, StateStore};
use tutor_types::config::TutorConfig;

#[derive(Parser)]
#[command(name = "tutor", about = "Architectural design tutoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Start an interactive tutoring session in this terminal.
    Chat {
        /// Design domain, e.g. "residential", "commercial".
        #[arg(long, default_value = "residential")]
        domain: String,
        /// Initial design brief, if any.
        #[arg(long, default_value = "")]
        brief: String,
    },
    /// Print the resolved engine configuration and exit.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Cmd::Chat { domain: "residential".to_string(), brief: String::new() }) {
        Cmd::Config => {
            let config = TutorConfig::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Cmd::Chat { domain, brief } => run_chat(domain, brief).await,
    }
}

async fn run_chat(domain: String, brief: String) -> anyhow::Result<()> {
    let config = TutorConfig::load()?;
    let connection = ConnectionConfig::from_env();
    let (llm, knowledge, _visual_analyzer) = build_default_adapters(&connection, &config.llm);
    let orchestrator = Arc::new(Orchestrator::new(llm, knowledge, config));
    let sessions = StateStore::new();

    let session_id = sessions.create_session(domain, brief)?;
    let handle = sessions.handle(&session_id)?;

    println!("🏛️  Studio Tutor — session {session_id}");
    println!("Type your message and press enter. Type 'exit' to leave.");
    println!();

    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            println!("👋 Ending session. Goodbye!");
            break;
        }

        let mut state = handle.lock().await;
        let turn = orchestrator.run_turn(&mut state, input.to_string(), None, CancellationToken::new()).await;
        drop(state);

        match &turn.tutor_message {
            Some(message) => println!("tutor> {}", message.text),
            None => println!("tutor> I had trouble composing a full reply; could you rephrase or give me a moment?"),
        }
        println!();
    }

    Ok(())
}
