// Due-date reminder scheduling

use crate::models::Task;
use tracing::info;

/// Capability for requesting a one-shot local reminder at a task's due time.
/// Requests are fire-and-forget; the core never observes delivery.
pub trait ReminderScheduler {
    fn schedule(&self, task: &Task);
}

/// Scheduler that records the request in the log, standing in for a platform
/// notification service.
#[derive(Debug, Default)]
pub struct LogScheduler;

impl ReminderScheduler for LogScheduler {
    fn schedule(&self, task: &Task) {
        if let Some(due_at) = task.due_at {
            info!(task_id = %task.id, title = %task.title, due_at = %due_at, "Reminder scheduled");
        }
    }
}

/// Scheduler that drops all requests.
#[derive(Debug, Default)]
pub struct NullScheduler;

impl ReminderScheduler for NullScheduler {
    fn schedule(&self, _task: &Task) {}
}
