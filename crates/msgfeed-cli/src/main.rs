use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "msgfeed")]
#[command(about = "msgfeed - import a message dataset and page through it", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file (defaults to ~/.config/msgfeed/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the message store and import state
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Source dataset name (overrides the config file)
    #[arg(long, global = true)]
    pub source: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the next chunk of the source dataset
    Import,
    /// Rewind the import cursor to the start of the source
    Reset,
    /// Print one page of stored messages
    Page {
        #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
        limit: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },
    /// Store a new message
    Send {
        #[arg(long)]
        text: String,
        #[arg(long, default_value = "")]
        author: String,
        /// Mark the message as written by the local user
        #[arg(long)]
        sender: bool,
    },
    /// Start a fresh session and load a number of pages
    Browse {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("msgfeed=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let feed = bootstrap::bootstrap(&cli.global).await?;

    match cli.command {
        Commands::Import => commands::import::run(&feed).await?,
        Commands::Reset => commands::import::reset(&feed).await?,
        Commands::Page { limit, offset } => commands::page::run(&feed, limit, offset).await?,
        Commands::Send {
            text,
            author,
            sender,
        } => commands::send::run(&feed, text, sender, author).await?,
        Commands::Browse { pages } => commands::browse::run(&feed, pages).await?,
    }

    Ok(())
}
