use std::path::PathBuf;

use clap::Parser;

use crate::ai::client::{DEFAULT_ENDPOINT, DEFAULT_MAX_COMPLETION_TOKENS, DEFAULT_MODEL};
use crate::ai::LlmConfig;
use crate::cmd::Commands;
use crate::logging::LoggingConfig;

/// File-backed task tracker with AI-assisted task breakdown.
/// Storage defaults to ./tasks.json or a path passed via --db.
/// Running without a subcommand opens the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "st", version, about = "Smart task tracking CLI")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true, env = "SMART_TASKS_DB", default_value = "tasks.json")]
    pub db: PathBuf,

    /// API key for the chat-completion service.
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for task breakdown.
    #[arg(long, global = true, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Chat-completion endpoint URL.
    #[arg(long, global = true, env = "OPENAI_CHAT_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Upper bound on tokens generated per breakdown.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_COMPLETION_TOKENS)]
    pub max_tokens: u32,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_completion_tokens: self.max_tokens,
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            verbosity: self.verbose,
            file: self.log_file.clone(),
            interactive: matches!(self.command, None | Some(Commands::Menu)),
        }
    }
}
