// Task view filtering

use crate::models::Task;
use chrono::{DateTime, Local};

/// View selector for the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TaskFilter {
    /// Every task, incomplete ones first
    #[default]
    All,
    /// Tasks due on the current local calendar day
    Today,
    /// Tasks due strictly after the current instant
    Upcoming,
}

impl TaskFilter {
    /// Whether a task belongs to this view at the given instant.
    /// Tasks without a due date only ever appear in the `all` view.
    pub fn matches(self, task: &Task, now: DateTime<Local>) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Today => task
                .due_at
                .is_some_and(|due| due.date_naive() == now.date_naive()),
            TaskFilter::Upcoming => task.due_at.is_some_and(|due| due > now),
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Today => write!(f, "today"),
            TaskFilter::Upcoming => write!(f, "upcoming"),
        }
    }
}
