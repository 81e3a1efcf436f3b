//! Command implementations for the CLI interface.
//!
//! Each handler prints its result to stdout and reports failures on stderr
//! with exit status 1.

use std::io;

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::ai::{ChatClient, SubtaskGenerator};
use crate::cli::Cli;
use crate::db::TaskStore;
use crate::tui::menu::MenuApp;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive numbered menu (default).
    Menu,

    /// Add a new task.
    Add {
        /// Task description.
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Break a complex task into 3-5 subtasks with AI and add each one.
    #[command(alias = "ai")]
    Breakdown {
        /// Complex task description.
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// List all tasks in insertion order.
    #[command(alias = "ls")]
    List,

    /// Mark a task completed.
    #[command(alias = "done")]
    Complete {
        /// Task ID.
        id: u64,
    },

    /// Delete a task.
    #[command(alias = "rm")]
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

/// Add a single task.
pub fn cmd_add(store: &mut TaskStore, description: Vec<String>) {
    match store.add(description.join(" ")) {
        Ok(task) => println!("Task added: {task}"),
        Err(e) => fail(format!("Error: {e}")),
    }
}

/// Generate subtasks for a complex task and add each as its own task.
pub fn cmd_breakdown<C: ChatClient>(
    store: &mut TaskStore,
    generator: &SubtaskGenerator<C>,
    description: Vec<String>,
) {
    let description = description.join(" ");
    let subtasks = match generator.generate(&description) {
        Ok(subtasks) => subtasks,
        Err(e) => fail(e.sentinel()),
    };
    for subtask in subtasks {
        match store.add(subtask) {
            Ok(task) => println!("Task added: {task}"),
            Err(e) => fail(format!("Error: {e}")),
        }
    }
}

/// Print every task, or the empty-store message.
pub fn cmd_list(store: &TaskStore) {
    println!("{}", store.list());
}

/// Mark a task completed.
pub fn cmd_complete(store: &mut TaskStore, id: u64) {
    match store.complete(id) {
        Ok(Some(task)) => println!("Task completed: {task}"),
        Ok(None) => fail(format!("No task found with id #{id}")),
        Err(e) => fail(format!("Error: {e}")),
    }
}

/// Delete a task.
pub fn cmd_delete(store: &mut TaskStore, id: u64) {
    match store.delete(id) {
        Ok(Some(_)) => println!("Task #{id} has been deleted"),
        Ok(None) => fail(format!("No task found with id #{id}")),
        Err(e) => fail(format!("Error: {e}")),
    }
}

/// Write a completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Run the interactive menu until the user exits.
pub fn cmd_menu<C: ChatClient>(store: &mut TaskStore, generator: &SubtaskGenerator<C>) {
    if let Err(e) = run_menu(store, generator) {
        fail(format!("Menu error: {e}"));
    }
    println!("Leaving the task manager. Goodbye!");
}

fn run_menu<C: ChatClient>(store: &mut TaskStore, generator: &SubtaskGenerator<C>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    restore_on_err(execute!(stdout, EnterAlternateScreen), restore_terminal)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = restore_on_err(Terminal::new(backend), restore_terminal)?;

    let mut app = MenuApp::new(store, generator);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Best-effort terminal reset used when menu setup fails half way.
fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Run `restore` before handing back a setup error.
fn restore_on_err<T>(res: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if res.is_err() {
        restore();
    }
    res
}
