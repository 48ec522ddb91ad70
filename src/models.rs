// Data models for diddit

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single tracked task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub due_at: Option<DateTime<Local>>,
    pub priority: Priority,
    pub category: Category,
    /// Times this task went from incomplete to complete. Never decays.
    pub streak: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Local>,
}

impl Task {
    /// New incomplete task with default priority and category.
    pub fn new(title: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            completed: false,
            due_at: None,
            priority: Priority::Medium,
            category: Category::Personal,
            streak: 0,
            notes: None,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
    Education,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Personal => write!(f, "personal"),
            Category::Work => write!(f, "work"),
            Category::Shopping => write!(f, "shopping"),
            Category::Health => write!(f, "health"),
            Category::Education => write!(f, "education"),
        }
    }
}

/// Catalog entry unlockable by reaching a configured point threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points_cost: i64,
    #[serde(default)]
    pub unlocked: bool,
}
