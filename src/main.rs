//! # ST - Smart Task CLI
//!
//! A personal task tracker with optional AI-assisted task breakdown.
//!
//! ## Key Features
//!
//! - **Simple Tasks**: add, list, complete and delete tasks with stable numeric IDs
//! - **AI Breakdown**: ask a chat model to split a complex task into 3-5 simple subtasks,
//!   each added as its own task
//! - **Two Interfaces**: one-shot subcommands for scripting + a retro numbered menu
//! - **Local File Storage**: a single JSON array, rewritten after every change
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch interactive menu
//! st
//!
//! # Add a task
//! st add "Buy milk"
//!
//! # Break a complex task down (needs OPENAI_API_KEY)
//! st breakdown "Organise a team offsite"
//!
//! # List, complete, delete
//! st list
//! st complete 1
//! st delete 1
//! ```
//!
//! Data is stored in `./tasks.json` unless `--db` or `SMART_TASKS_DB` says otherwise.
//! IDs are never reused while a store is open, so a deleted task's ID stays retired.

use clap::Parser;

pub mod ai;
pub mod cli;
pub mod cmd;
pub mod db;
pub mod error;
pub mod logging;
pub mod task;
pub mod tui {
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod menu;
    pub mod utils;
}

use std::path::Path;

use ai::{GenerationSettings, LlmConfig, OpenAiClient, SubtaskGenerator};
use cli::Cli;
use cmd::*;
use db::TaskStore;

fn exit_with(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

fn open_store(path: &Path) -> TaskStore {
    TaskStore::open(path).unwrap_or_else(|e| exit_with(e))
}

fn build_generator(config: LlmConfig) -> SubtaskGenerator<OpenAiClient> {
    let settings = GenerationSettings::from(&config);
    let client = OpenAiClient::new(config).unwrap_or_else(|e| exit_with(e));
    SubtaskGenerator::new(client, settings)
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.logging_config()) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let llm_config = cli.llm_config();
    match cli.command.unwrap_or(Commands::Menu) {
        // Completions never touch the task file.
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Menu => cmd_menu(&mut open_store(&cli.db), &build_generator(llm_config)),
        Commands::Add { description } => cmd_add(&mut open_store(&cli.db), description),
        Commands::Breakdown { description } => {
            let mut store = open_store(&cli.db);
            cmd_breakdown(&mut store, &build_generator(llm_config), description)
        }
        Commands::List => cmd_list(&open_store(&cli.db)),
        Commands::Complete { id } => cmd_complete(&mut open_store(&cli.db), id),
        Commands::Delete { id } => cmd_delete(&mut open_store(&cli.db), id),
    }
}
