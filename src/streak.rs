// Daily streak bookkeeping and point accounting

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::kv::KvStore;
use crate::models::Reward;
use crate::rewards::RewardCatalog;
use chrono::NaiveDate;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

const CURRENT_STREAK_KEY: &str = "current_streak";
const LONGEST_STREAK_KEY: &str = "longest_streak";
const POINTS_KEY: &str = "points";
const LAST_CHECKIN_KEY: &str = "last_checkin";

const POINTS_PER_STREAK_DAY: i64 = 10;

/// Outcome of a daily check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkin {
    /// Consecutive-day check-in. The streak grew and points were awarded.
    Extended { streak: u32, awarded: i64 },
    /// One or more days were missed and the streak reset to zero.
    Broken { lost: u32 },
    /// Already checked in today.
    AlreadyToday,
    /// First check-in ever.
    Started,
}

/// Tracks the consecutive-day check-in streak, the point balance, and the
/// reward catalog derived from it.
///
/// Each scalar lives under its own entry and is written independently. A
/// mutation that fails partway may leave some entries updated and others not.
pub struct StreakEngine {
    kv: KvStore,
    clock: Box<dyn Clock>,
    catalog: RewardCatalog,
    current_streak: u32,
    longest_streak: u32,
    points: i64,
    last_checkin: Option<NaiveDate>,
}

impl StreakEngine {
    /// Open an engine in the given directory with the system clock.
    pub fn open<P: AsRef<Path>>(dir: P, catalog: RewardCatalog) -> Result<Self> {
        Self::with_parts(KvStore::open(dir)?, Box::new(SystemClock), catalog)
    }

    /// Assemble an engine from explicit parts. Unreadable entries are logged
    /// and masked with defaults, so a damaged store degrades to a fresh one.
    pub fn with_parts(kv: KvStore, clock: Box<dyn Clock>, catalog: RewardCatalog) -> Result<Self> {
        let current_streak = load_parsed(&kv, CURRENT_STREAK_KEY)?;
        let longest_streak = load_parsed(&kv, LONGEST_STREAK_KEY)?;
        let points = load_parsed(&kv, POINTS_KEY)?;
        let last_checkin = load_date(&kv, LAST_CHECKIN_KEY)?;

        let mut engine = Self {
            kv,
            clock,
            catalog,
            current_streak,
            longest_streak,
            points,
            last_checkin,
        };
        // Re-derive unlocked flags from the persisted balance.
        engine.catalog.evaluate(engine.points, engine.current_streak);
        Ok(engine)
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn last_checkin(&self) -> Option<NaiveDate> {
        self.last_checkin
    }

    pub fn rewards(&self) -> &[Reward] {
        self.catalog.rewards()
    }

    /// Advance the streak state machine for the current calendar day.
    ///
    /// Exactly one day since the last check-in extends the streak and awards
    /// ten points per day of the new length. More than one day resets the
    /// streak to zero without touching points. A repeat check-in on the same
    /// day changes nothing. In every case the check-in date moves to today,
    /// the longest streak is refreshed, and the state is persisted.
    pub fn check_daily_streak(&mut self) -> Result<Checkin> {
        let today = self.clock.today();

        let outcome = match self.last_checkin {
            Some(last) => {
                let gap = (today - last).num_days();
                if gap == 1 {
                    self.current_streak += 1;
                    let awarded = POINTS_PER_STREAK_DAY * i64::from(self.current_streak);
                    self.award_points(awarded)?;
                    info!(streak = self.current_streak, awarded, "Streak extended");
                    Checkin::Extended {
                        streak: self.current_streak,
                        awarded,
                    }
                } else if gap > 1 {
                    let lost = self.current_streak;
                    self.current_streak = 0;
                    info!(lost, missed_days = gap - 1, "Streak broken");
                    Checkin::Broken { lost }
                } else {
                    Checkin::AlreadyToday
                }
            }
            None => {
                info!("First check-in");
                Checkin::Started
            }
        };

        self.last_checkin = Some(today);
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.persist()?;

        Ok(outcome)
    }

    /// Add points to the balance and re-run reward unlocks. Negative amounts
    /// are rejected; points only ever accumulate.
    pub fn award_points(&mut self, amount: i64) -> Result<()> {
        if amount < 0 {
            return Err(Error::Validation(format!(
                "point award cannot be negative: {amount}"
            )));
        }

        self.points += amount;
        self.catalog.evaluate(self.points, self.current_streak);
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        // Four independent entries, written in sequence.
        self.kv
            .put_raw(CURRENT_STREAK_KEY, &self.current_streak.to_string())?;
        self.kv
            .put_raw(LONGEST_STREAK_KEY, &self.longest_streak.to_string())?;
        self.kv.put_raw(POINTS_KEY, &self.points.to_string())?;
        if let Some(date) = self.last_checkin {
            self.kv.put_raw(LAST_CHECKIN_KEY, &date.to_string())?;
        }
        Ok(())
    }
}

fn load_parsed<T: FromStr + Default>(kv: &KvStore, key: &str) -> Result<T> {
    match kv.get_raw(key)? {
        Some(raw) => match raw.parse() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(key, %raw, "Unreadable stored value, using default");
                Ok(T::default())
            }
        },
        None => Ok(T::default()),
    }
}

fn load_date(kv: &KvStore, key: &str) -> Result<Option<NaiveDate>> {
    match kv.get_raw(key)? {
        Some(raw) => match raw.parse() {
            Ok(date) => Ok(Some(date)),
            Err(_) => {
                warn!(key, %raw, "Unreadable stored date, treating as unset");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn seed(dir: &Path, current: u32, longest: u32, points: i64, last: &str) {
        let mut kv = KvStore::open(dir).unwrap();
        kv.put_raw(CURRENT_STREAK_KEY, &current.to_string()).unwrap();
        kv.put_raw(LONGEST_STREAK_KEY, &longest.to_string()).unwrap();
        kv.put_raw(POINTS_KEY, &points.to_string()).unwrap();
        kv.put_raw(LAST_CHECKIN_KEY, last).unwrap();
    }

    fn engine_at(dir: &Path, y: i32, m: u32, d: u32) -> StreakEngine {
        let instant = Local.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap();
        StreakEngine::with_parts(
            KvStore::open(dir).unwrap(),
            Box::new(FixedClock(instant)),
            RewardCatalog::empty(),
        )
        .unwrap()
    }

    #[test]
    fn test_consecutive_day_extends_and_awards() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), 4, 4, 100, "2026-03-13");

        let mut engine = engine_at(temp.path(), 2026, 3, 14);
        let outcome = engine.check_daily_streak().unwrap();

        assert_eq!(outcome, Checkin::Extended { streak: 5, awarded: 50 });
        assert_eq!(engine.current_streak(), 5);
        assert_eq!(engine.longest_streak(), 5);
        assert_eq!(engine.points(), 150);
        assert_eq!(
            engine.last_checkin(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
    }

    #[test]
    fn test_missed_day_resets_without_touching_points() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), 7, 7, 300, "2026-03-09");

        let mut engine = engine_at(temp.path(), 2026, 3, 14);
        let outcome = engine.check_daily_streak().unwrap();

        assert_eq!(outcome, Checkin::Broken { lost: 7 });
        assert_eq!(engine.current_streak(), 0);
        assert_eq!(engine.longest_streak(), 7);
        assert_eq!(engine.points(), 300);
        assert_eq!(
            engine.last_checkin(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
    }

    #[test]
    fn test_same_day_checkin_is_idempotent() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), 4, 4, 100, "2026-03-13");

        let mut engine = engine_at(temp.path(), 2026, 3, 14);
        engine.check_daily_streak().unwrap();
        let outcome = engine.check_daily_streak().unwrap();

        assert_eq!(outcome, Checkin::AlreadyToday);
        assert_eq!(engine.current_streak(), 5);
        assert_eq!(engine.points(), 150);
    }

    #[test]
    fn test_first_checkin_starts_at_zero() {
        let temp = TempDir::new().unwrap();

        let mut engine = engine_at(temp.path(), 2026, 3, 14);
        let outcome = engine.check_daily_streak().unwrap();

        assert_eq!(outcome, Checkin::Started);
        assert_eq!(engine.current_streak(), 0);
        assert_eq!(engine.points(), 0);
        assert_eq!(
            engine.last_checkin(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
    }

    #[test]
    fn test_day_after_first_checkin_extends_to_one() {
        let temp = TempDir::new().unwrap();

        {
            let mut engine = engine_at(temp.path(), 2026, 3, 14);
            engine.check_daily_streak().unwrap();
        }

        let mut engine = engine_at(temp.path(), 2026, 3, 15);
        let outcome = engine.check_daily_streak().unwrap();

        assert_eq!(outcome, Checkin::Extended { streak: 1, awarded: 10 });
        assert_eq!(engine.points(), 10);
    }

    #[test]
    fn test_negative_award_is_rejected() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), 2, 2, 40, "2026-03-14");

        let mut engine = engine_at(temp.path(), 2026, 3, 14);
        let result = engine.award_points(-5);

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(engine.points(), 40);
    }

    #[test]
    fn test_awards_unlock_catalog_rewards() {
        let temp = TempDir::new().unwrap();
        let catalog = RewardCatalog::new(vec![
            Reward {
                id: "bronze".to_string(),
                title: "Bronze".to_string(),
                description: "First milestone".to_string(),
                points_cost: 50,
                unlocked: false,
            },
            Reward {
                id: "gold".to_string(),
                title: "Gold".to_string(),
                description: "Big milestone".to_string(),
                points_cost: 1000,
                unlocked: false,
            },
        ]);

        let mut engine = StreakEngine::with_parts(
            KvStore::open(temp.path()).unwrap(),
            Box::new(FixedClock(Local.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap())),
            catalog,
        )
        .unwrap();

        engine.award_points(60).unwrap();
        assert!(engine.rewards()[0].unlocked);
        assert!(!engine.rewards()[1].unlocked);
    }

    #[test]
    fn test_state_survives_reopen() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), 4, 6, 100, "2026-03-13");

        {
            let mut engine = engine_at(temp.path(), 2026, 3, 14);
            engine.check_daily_streak().unwrap();
        }

        let engine = engine_at(temp.path(), 2026, 3, 14);
        assert_eq!(engine.current_streak(), 5);
        assert_eq!(engine.longest_streak(), 6);
        assert_eq!(engine.points(), 150);
        assert_eq!(
            engine.last_checkin(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
    }

    #[test]
    fn test_unreadable_scalar_masks_to_default() {
        let temp = TempDir::new().unwrap();

        {
            let mut kv = KvStore::open(temp.path()).unwrap();
            kv.put_raw(POINTS_KEY, "a lot").unwrap();
            kv.put_raw(LAST_CHECKIN_KEY, "someday").unwrap();
        }

        let engine = engine_at(temp.path(), 2026, 3, 14);
        assert_eq!(engine.points(), 0);
        assert_eq!(engine.last_checkin(), None);
    }
}
