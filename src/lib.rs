// diddit - task tracking with daily streaks, points, and rewards

pub mod clock;
pub mod error;
pub mod filter;
pub mod kv;
pub mod lock;
pub mod models;
pub mod notify;
pub mod rewards;
pub mod streak;
pub mod tasks;

// Re-export main types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use filter::TaskFilter;
pub use kv::{KvStore, now_ms};
pub use lock::SessionLock;
pub use models::{Category, Priority, Reward, Task};
pub use notify::{LogScheduler, NullScheduler, ReminderScheduler};
pub use rewards::RewardCatalog;
pub use streak::{Checkin, StreakEngine};
pub use tasks::{TaskStats, TaskStore};
