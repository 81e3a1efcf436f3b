//! Retro-style numbered menu for managing tasks.
//!
//! Options are picked with the digit keys or with ↑↓ and Enter. Text prompts
//! open as a centred dialog; the task list stays visible on the right.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::ai::{ChatClient, SubtaskGenerator};
use crate::db::{Listing, TaskStore};
use crate::tui::colors::{DARK_RED, DONE_GREEN, GOLD};
use crate::tui::enums::{MenuState, PromptKind, StatusKind, MENU_ITEMS};
use crate::tui::input::InputField;
use crate::tui::utils::centered_rect;

const INVALID_OPTION: &str = "Invalid option. Please try again.";
const INVALID_INPUT: &str = "Invalid input. Please enter a number.";
const INVALID_ID: &str = "Invalid input. Please enter a valid number.";

/// Main menu application state.
pub struct MenuApp<'a, C: ChatClient> {
    store: &'a mut TaskStore,
    generator: &'a SubtaskGenerator<C>,
    state: MenuState,
    list_state: ListState,
    input: InputField,
    status_message: String,
    status_kind: StatusKind,
    should_exit: bool,
}

impl<'a, C: ChatClient> MenuApp<'a, C> {
    /// Create a new menu application.
    pub fn new(store: &'a mut TaskStore, generator: &'a SubtaskGenerator<C>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        MenuApp {
            store,
            generator,
            state: MenuState::MainMenu,
            list_state,
            input: InputField::new(),
            status_message: String::new(),
            status_kind: StatusKind::Info,
            should_exit: false,
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn status_kind(&self) -> StatusKind {
        self.status_kind
    }

    /// Check if the application should exit.
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_kind = StatusKind::Info;
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_kind = StatusKind::Error;
    }

    fn back_to_menu(&mut self) {
        self.state = MenuState::MainMenu;
        self.input.clear();
    }

    /// Poll for one key press and dispatch it.
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    /// Handle a key based on current state.
    pub fn handle_key(&mut self, key: KeyCode) {
        match self.state.clone() {
            MenuState::MainMenu => {
                self.status_message.clear();
                self.handle_main_menu_input(key);
            }
            MenuState::Prompt(kind) => self.handle_prompt_input(kind, key),
            // Keys are ignored until the pending breakdown has run.
            MenuState::Generating(_) => {}
        }
    }

    fn handle_main_menu_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => {
                if let Some(selected) = self.list_state.selected() {
                    if selected > 0 {
                        self.list_state.select(Some(selected - 1));
                    }
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.list_state.selected() {
                    if selected < MENU_ITEMS.len() - 1 {
                        self.list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(selected) = self.list_state.selected() {
                    self.choose(selected + 1);
                }
            }
            KeyCode::Esc => self.should_exit = true,
            KeyCode::Char(c) => match c.to_digit(10) {
                Some(n) => self.choose(n as usize),
                None => self.error(INVALID_INPUT),
            },
            _ => {}
        }
    }

    /// Act on a 1-based menu option.
    fn choose(&mut self, option: usize) {
        debug!(option, "menu option chosen");
        match option {
            1 => self.open_prompt(PromptKind::AddTask),
            2 => self.open_prompt(PromptKind::AddComplexTask),
            3 => {
                let msg = match self.store.list() {
                    Listing::Empty => "No pending tasks.".to_string(),
                    Listing::Tasks(tasks) => {
                        let done = tasks.iter().filter(|t| t.completed).count();
                        format!("{} task(s), {} completed.", tasks.len(), done)
                    }
                };
                self.info(msg);
            }
            4 => self.open_prompt(PromptKind::CompleteTask),
            5 => self.open_prompt(PromptKind::DeleteTask),
            6 => self.should_exit = true,
            _ => {
                self.error(INVALID_OPTION);
                return;
            }
        }
        self.list_state.select(Some(option - 1));
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.input.clear();
        self.state = MenuState::Prompt(kind);
    }

    fn handle_prompt_input(&mut self, kind: PromptKind, key: KeyCode) {
        match key {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Enter => self.submit(kind),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Char(c) => self.input.handle_char(c),
            _ => {}
        }
    }

    fn submit(&mut self, kind: PromptKind) {
        let value = self.input.take();
        self.state = MenuState::MainMenu;

        match kind {
            PromptKind::AddTask => match self.store.add(value) {
                Ok(task) => self.info(format!("Task added: {task}")),
                Err(e) => self.error(format!("Error: {e}")),
            },
            PromptKind::AddComplexTask => {
                if value.trim().is_empty() {
                    self.error("Error: task description cannot be empty");
                } else {
                    self.info("Generating subtasks...");
                    self.state = MenuState::Generating(value);
                }
            }
            PromptKind::CompleteTask => {
                let Ok(id) = value.trim().parse::<u64>() else {
                    self.error(INVALID_ID);
                    return;
                };
                match self.store.complete(id) {
                    Ok(Some(task)) => self.info(format!("Task completed: {task}")),
                    Ok(None) => self.error(format!("No task found with id #{id}")),
                    Err(e) => self.error(format!("Error: {e}")),
                }
            }
            PromptKind::DeleteTask => {
                let Ok(id) = value.trim().parse::<u64>() else {
                    self.error(INVALID_ID);
                    return;
                };
                match self.store.delete(id) {
                    Ok(Some(_)) => self.info(format!("Task #{id} has been deleted")),
                    Ok(None) => self.error(format!("No task found with id #{id}")),
                    Err(e) => self.error(format!("Error: {e}")),
                }
            }
        }
    }

    /// Run a breakdown queued by the AI prompt, if any.
    pub fn process_pending(&mut self) {
        let MenuState::Generating(description) = &self.state else {
            return;
        };
        let description = description.clone();
        self.state = MenuState::MainMenu;

        let subtasks = match self.generator.generate(&description) {
            Ok(subtasks) => subtasks,
            Err(e) => {
                self.error(e.sentinel());
                return;
            }
        };
        match self.store.add_all(subtasks) {
            Ok(added) => {
                let ids: Vec<String> = added.iter().map(|t| format!("#{}", t.id)).collect();
                self.info(format!("Added {} subtask(s): {}", added.len(), ids.join(", ")));
            }
            Err(e) => self.error(format!("Error: {e}")),
        }
    }

    /// Main render function.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Menu + tasks
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        let header = Paragraph::new(Line::from(Span::styled(
            "SMART TASK MANAGER",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
        f.render_widget(header, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);

        self.render_main_menu(f, body[0]);
        self.render_tasks(f, body[1]);

        if let MenuState::Prompt(kind) = self.state {
            self.render_prompt(f, chunks[1], kind);
        }

        self.render_status_bar(f, chunks[2]);
    }

    fn render_main_menu(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(i, item)| ListItem::new(Line::from(format!("{}. {}", i + 1, item))))
            .collect();

        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");

        f.render_stateful_widget(menu, area, &mut self.list_state);
    }

    fn render_tasks(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Tasks");
        match self.store.list() {
            Listing::Empty => {
                let empty = Paragraph::new("No pending tasks.")
                    .block(block)
                    .alignment(Alignment::Center);
                f.render_widget(empty, area);
            }
            Listing::Tasks(tasks) => {
                let items: Vec<ListItem> = tasks
                    .iter()
                    .map(|t| {
                        let style = if t.completed {
                            Style::default().fg(DONE_GREEN).add_modifier(Modifier::DIM)
                        } else {
                            Style::default().fg(GOLD)
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("[{}] ", t.status_mark()), style),
                            Span::styled(format!("#{}: ", t.id), Style::default().add_modifier(Modifier::BOLD)),
                            Span::raw(t.description.clone()),
                        ]))
                    })
                    .collect();
                f.render_widget(List::new(items).block(block), area);
            }
        }
    }

    fn render_prompt(&self, f: &mut Frame, area: Rect, kind: PromptKind) {
        let area = centered_rect(60, 40, area);
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Label
                Constraint::Length(3), // Input field
                Constraint::Min(0),
            ])
            .split(area);

        let label = Paragraph::new(kind.label())
            .block(Block::default().borders(Borders::ALL).title(kind.title()))
            .wrap(Wrap { trim: true });
        f.render_widget(label, chunks[0]);

        let input = Paragraph::new(self.input.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(input, chunks[1]);

        f.set_cursor_position((chunks[1].x + self.input.cursor as u16 + 1, chunks[1].y + 1));
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                MenuState::MainMenu => "Press 1-6 or use ↑↓ and Enter, Esc to quit".to_string(),
                MenuState::Prompt(_) => "Type, Enter to submit, Esc to cancel".to_string(),
                MenuState::Generating(_) => "Generating subtasks...".to_string(),
            }
        };
        let bg = match self.status_kind {
            StatusKind::Error if !self.status_message.is_empty() => DARK_RED,
            _ => Color::Blue,
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(bg).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main event loop for the menu application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if matches!(self.state, MenuState::Generating(_)) {
                self.process_pending();
                continue;
            }

            self.handle_input()?;

            if self.should_exit {
                break;
            }
        }
        Ok(())
    }
}
