mod cli;
mod server;
mod tools;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::memory::search::MemoryFilter;
use lifecapsule::memory::types::{Mood, SubscriptionTier};

#[derive(Parser)]
#[command(name = "lifecapsule", version, about = "Gamified journal with a scripted companion, served over MCP")]
struct Cli {
    /// Config file to use instead of ~/.lifecapsule/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport: stdio or sse. Defaults to server.transport from config.
        #[arg(long)]
        transport: Option<String>,
        /// Keep everything in memory; nothing is written to disk
        #[arg(long)]
        ephemeral: bool,
    },
    /// Capture and browse memories
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// Send a message to the companion
    Chat {
        message: String,
        /// Name the companion should use
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the chat conversation
    History {
        /// Only show the last N messages
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write and open messages to your future self
    Capsule {
        #[command(subcommand)]
        action: CapsuleAction,
    },
    /// Show level, XP, streak and badges
    Profile {
        /// Change the display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Grant XP manually
    Xp { amount: u32 },
    /// Switch between the free and premium tier
    Subscription { tier: SubscriptionTier },
    /// Print today's reflection prompt
    Prompt,
    /// Show journal statistics
    Stats,
    /// Export the journal as JSON to stdout
    Export,
    /// Check database health
    Doctor,
    /// Delete the whole journal
    Reset,
}

#[derive(Subcommand)]
enum MemoryAction {
    /// Capture a new memory
    Add {
        text: String,
        #[arg(long)]
        mood: Option<Mood>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List memories, newest first
    List {
        /// Text to look for in memory text and tags
        #[arg(long)]
        query: Option<String>,
        /// Required tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        mood: Option<Mood>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show a memory in full
    Show { id: String },
    /// Delete a memory
    Delete { id: String },
    /// List every tag in use
    Tags,
}

#[derive(Subcommand)]
enum CapsuleAction {
    /// Seal a message until a date (YYYY-MM-DD)
    Create {
        message: String,
        #[arg(long)]
        unlock: NaiveDate,
    },
    /// Change a locked capsule's message or unlock date
    Edit {
        id: String,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        unlock: Option<NaiveDate>,
    },
    /// List capsules by unlock date
    List,
    /// Open a capsule whose date has arrived
    Unlock { id: String },
    /// Delete a capsule
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = match &cli.config {
        Some(path) => LifeCapsuleConfig::load_from(path)?,
        None => LifeCapsuleConfig::load()?,
    };

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC and CLI output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve {
            transport,
            ephemeral,
        } => {
            let transport = transport.unwrap_or_else(|| config.server.transport.clone());
            match transport.as_str() {
                "stdio" => server::serve_stdio(config, ephemeral).await?,
                "sse" => server::serve_sse(config, ephemeral).await?,
                other => bail!("unknown transport '{other}' (expected stdio or sse)"),
            }
        }
        Command::Memory { action } => match action {
            MemoryAction::Add { text, mood, tags } => cli::memories::add(&config, &text, mood, &tags)?,
            MemoryAction::List {
                query,
                tags,
                mood,
                limit,
            } => {
                let filter = MemoryFilter { query, tags, mood };
                cli::memories::list(&config, &filter, limit)?
            }
            MemoryAction::Show { id } => cli::memories::show(&config, &id)?,
            MemoryAction::Delete { id } => cli::memories::delete(&config, &id)?,
            MemoryAction::Tags => cli::memories::tags(&config)?,
        },
        Command::Chat { message, name } => {
            cli::chat::chat(&config, &message, name.as_deref()).await?
        }
        Command::History { limit } => cli::chat::history(&config, limit)?,
        Command::Capsule { action } => match action {
            CapsuleAction::Create { message, unlock } => {
                cli::capsules::create(&config, &message, unlock)?
            }
            CapsuleAction::Edit {
                id,
                message,
                unlock,
            } => cli::capsules::edit(&config, &id, message.as_deref(), unlock)?,
            CapsuleAction::List => cli::capsules::list(&config)?,
            CapsuleAction::Unlock { id } => cli::capsules::unlock(&config, &id)?,
            CapsuleAction::Delete { id } => cli::capsules::delete(&config, &id)?,
        },
        Command::Profile { name } => cli::profile::profile(&config, name.as_deref())?,
        Command::Xp { amount } => cli::profile::grant_xp(&config, amount)?,
        Command::Subscription { tier } => cli::profile::subscription(&config, tier)?,
        Command::Prompt => cli::profile::prompt(),
        Command::Stats => cli::stats::stats(&config)?,
        Command::Export => cli::export::export(&config)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
