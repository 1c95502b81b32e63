//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for tabletalk
#[derive(Parser, Debug)]
#[command(name = "tabletalk")]
#[command(author, version, about = "Chat with a SQL data assistant from the terminal")]
#[command(long_about = r#"
tabletalk is a terminal chat client for a SQL data assistant backend.

Assistant turns tagged with `SQL:` are shown as verbatim query blocks;
everything else is rendered as markdown. Each turn is a single
request/response round trip, serialized per session.

Configuration is merged from (in priority order):
1. API_BASE_URL / TABLETALK_* environment variables
2. --config <path>     Explicit config file
3. ./tabletalk.toml    Project-level config
4. ~/.config/tabletalk/config.toml   Global config

Example:
  tabletalk                          # interactive chat
  tabletalk "How many users signed up last week?"
  API_BASE_URL=http://backend:3000/api tabletalk
"#)]
pub struct Cli {
    /// One-shot question: start a conversation, send it, print the
    /// reply, exit. Omit to start interactive chat.
    pub question: Option<String>,

    /// Override the backend base URL from config
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Write a JSONL conversation transcript to this path
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub plain: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the in-flight spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
