//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for mindgate
#[derive(Parser, Debug)]
#[command(name = "mindgate")]
#[command(author, version, about = "Unified inference gateway with training-data capture")]
#[command(long_about = r#"
mindgate sends an agent's prompts to any supported inference backend through
one gateway (retry, repair, throttling) and records accepted interactions as
training data.

Configuration files are loaded from (in priority order):
1. MINDGATE_* environment variables (MINDGATE_GATEWAY__COOLDOWN_MS=2000)
2. --config <path>     Explicit config file
3. ./mindgate.toml     Project-level config
4. ~/.config/mindgate/config.toml   Global config

Example:
  mindgate ask "steve: can you get me some oak logs?"
  mindgate ask --code "build a small house"
  mindgate stats
  mindgate export --output train.jsonl --code-only
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one message through the orchestrator and print the reply
    Ask {
        /// The message, e.g. "steve: hi andy"
        message: String,

        /// Generate code instead of a conversational reply
        #[arg(long, conflicts_with = "image")]
        code: bool,

        /// Describe this JPEG image instead of replying
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },

    /// Show dataset counters recovered from the log files
    Stats {
        /// Dataset root (defaults to logging.root)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Convert dataset logs into a JSONL training file
    Export {
        /// Output file
        #[arg(short, long, value_name = "PATH", default_value = "dataset.jsonl")]
        output: PathBuf,

        /// Export vision rows instead of text conversations
        #[arg(long, conflicts_with = "code_only")]
        vision: bool,

        /// Keep coding conversations plus a small sample of the rest
        #[arg(long)]
        code_only: bool,

        /// Dataset root (defaults to logging.root)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Show configuration file locations and validation results
    Config,
}
