//! Enumerations for menu state management.

/// Entries of the numbered main menu, in display order.
pub const MENU_ITEMS: [&str; 6] = [
    "Add task",
    "Add complex task (AI)",
    "List tasks",
    "Complete task",
    "Delete task",
    "Exit",
];

/// What the menu is currently doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Prompt(PromptKind),
    /// Waiting for the next tick to run a breakdown of this description.
    Generating(String),
}

/// Which value a text prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AddTask,
    AddComplexTask,
    CompleteTask,
    DeleteTask,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::AddTask => "Add Task",
            PromptKind::AddComplexTask => "Add Complex Task (AI)",
            PromptKind::CompleteTask => "Complete Task",
            PromptKind::DeleteTask => "Delete Task",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PromptKind::AddTask => "Enter the task description:",
            PromptKind::AddComplexTask => "Enter the complex task description:",
            PromptKind::CompleteTask => "Enter the ID of the task to complete:",
            PromptKind::DeleteTask => "Enter the ID of the task to delete:",
        }
    }
}

/// Tone of the status bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Error,
}
