// Authoritative task collection with durable persistence

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::filter::TaskFilter;
use crate::kv::KvStore;
use crate::models::Task;
use crate::notify::{LogScheduler, ReminderScheduler};
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

const TASKS_KEY: &str = "tasks";

/// Derived counters over the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub completed_today: usize,
    pub total_completed: usize,
    pub active: usize,
    /// Percentage of tasks completed, truncated toward zero.
    pub completion_rate: u32,
}

/// Owns the task collection and writes it back as a single unit after every
/// mutation. Reads are served from memory.
pub struct TaskStore {
    kv: KvStore,
    tasks: Vec<Task>,
    clock: Box<dyn Clock>,
    reminders: Box<dyn ReminderScheduler>,
}

impl TaskStore {
    /// Open a store in the given directory with the system clock and the
    /// logging reminder scheduler.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::with_parts(
            KvStore::open(dir)?,
            Box::new(SystemClock),
            Box::new(LogScheduler),
        )
    }

    /// Assemble a store from explicit parts. An unreadable stored collection
    /// is logged and masked with an empty one.
    pub fn with_parts(
        kv: KvStore,
        clock: Box<dyn Clock>,
        reminders: Box<dyn ReminderScheduler>,
    ) -> Result<Self> {
        let tasks = match kv.get_json::<Vec<Task>>(TASKS_KEY) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Stored task collection unreadable, starting empty");
                Vec::new()
            }
        };
        debug!(count = tasks.len(), "Loaded task collection");

        Ok(Self {
            kv,
            tasks,
            clock,
            reminders,
        })
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a task and persist. Duplicate ids are rejected. A reminder is
    /// requested for tasks that carry a due date.
    pub fn add(&mut self, task: Task) -> Result<()> {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(Error::Validation(format!("duplicate task id: {}", task.id)));
        }

        if task.due_at.is_some() {
            self.reminders.schedule(&task);
        }

        debug!(task_id = %task.id, title = %task.title, "Adding task");
        self.tasks.push(task);
        self.persist()
    }

    /// Flip a task's completion state. The per-task streak counts completion
    /// events, so it only moves on the incomplete-to-complete edge.
    pub fn toggle(&mut self, id: Uuid) -> Result<&Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::NotFound(id))?;

        let task = &mut self.tasks[idx];
        task.completed = !task.completed;
        if task.completed {
            task.streak += 1;
        }
        debug!(task_id = %id, completed = self.tasks[idx].completed, "Toggled task");

        self.persist()?;
        Ok(&self.tasks[idx])
    }

    /// Remove a task if present. Unknown ids are a silent no-op, but the
    /// collection is persisted either way.
    pub fn remove(&mut self, id: Uuid) -> Result<()> {
        self.tasks.retain(|t| t.id != id);
        self.persist()
    }

    /// Tasks belonging to the given view, as a snapshot.
    pub fn filtered(&self, filter: TaskFilter) -> Vec<Task> {
        let now = self.clock.now();
        let mut view: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| filter.matches(t, now))
            .cloned()
            .collect();

        if filter == TaskFilter::All {
            // Stable: incomplete tasks first, insertion order otherwise.
            view.sort_by_key(|t| t.completed);
        }

        view
    }

    /// Derived counters at the current instant. A completed task without a
    /// due date counts toward today using its creation time.
    pub fn stats(&self) -> TaskStats {
        let today = self.clock.today();

        let completed_today = self
            .tasks
            .iter()
            .filter(|t| t.completed && t.due_at.unwrap_or(t.created_at).date_naive() == today)
            .count();
        let total_completed = self.tasks.iter().filter(|t| t.completed).count();
        let total = self.tasks.len();

        TaskStats {
            completed_today,
            total_completed,
            active: total - total_completed,
            completion_rate: if total == 0 {
                0
            } else {
                (100 * total_completed / total) as u32
            },
        }
    }

    fn persist(&mut self) -> Result<()> {
        self.kv.put_json(TASKS_KEY, &self.tasks)
    }
}
