// diddit CLI

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use colored::Colorize;
use diddit::{
    Category, Checkin, Priority, RewardCatalog, SessionLock, StreakEngine, Task, TaskFilter,
    TaskStore,
};
use eyre::{Result, WrapErr, bail, eyre};
use std::path::PathBuf;
use uuid::Uuid;

/// Points granted for completing any task, on top of streak awards.
const COMPLETION_BONUS: i64 = 10;

#[derive(Parser)]
#[command(name = "diddit")]
#[command(about = "Diddit CLI - personal task tracking with daily streaks and rewards")]
#[command(version)]
struct Cli {
    /// Path to the store directory (defaults to the platform data dir)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Path to the reward catalog YAML (defaults to rewards.yaml in the store)
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Due date, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD"
        #[arg(long)]
        due: Option<String>,

        #[arg(long, value_enum, default_value_t)]
        priority: Priority,

        #[arg(long, value_enum, default_value_t)]
        category: Category,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Toggle a task's completion state
    Done {
        /// Task id or unique prefix
        id: String,
    },
    /// Delete a task
    Rm {
        /// Task id or unique prefix
        id: String,
    },
    /// List tasks
    List {
        #[arg(long, value_enum, default_value_t)]
        filter: TaskFilter,
    },
    /// Show task and streak statistics
    Stats,
    /// Show streak status
    Checkin,
    /// Show the reward catalog
    Rewards,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store_dir = match cli.store_path {
        Some(path) => path,
        None => default_store_dir()?,
    };
    let catalog_path = cli
        .catalog
        .unwrap_or_else(|| store_dir.join("rewards.yaml"));

    let _lock = SessionLock::acquire(&store_dir)?;

    let mut store = TaskStore::open(&store_dir)?;
    let catalog = RewardCatalog::load_or_empty(&catalog_path)?;
    let mut streaks = StreakEngine::open(&store_dir, catalog)?;

    // Every session counts as the day's check-in.
    let checkin = streaks.check_daily_streak()?;
    report_checkin(&checkin);

    match cli.command {
        Commands::Add {
            title,
            due,
            priority,
            category,
            notes,
        } => {
            if title.trim().is_empty() {
                bail!("task title cannot be empty");
            }

            let mut task = Task::new(title, Local::now());
            task.priority = priority;
            task.category = category;
            task.notes = notes;
            if let Some(due) = due {
                task.due_at = Some(parse_due(&due)?);
            }

            let id = task.id;
            store.add(task)?;
            println!("Added task {}", id.to_string().bold());
        }
        Commands::Done { id } => {
            let id = resolve_id(&store, &id)?;
            let task = store.toggle(id)?;
            let completed = task.completed;
            let title = task.title.clone();

            if completed {
                streaks.award_points(COMPLETION_BONUS)?;
                println!(
                    "{} {} (+{} pts)",
                    "done".green().bold(),
                    title,
                    COMPLETION_BONUS
                );
            } else {
                println!("{} {}", "reopened".yellow().bold(), title);
            }
        }
        Commands::Rm { id } => {
            let id = resolve_id(&store, &id)?;
            store.remove(id)?;
            println!("Removed task {}", id.to_string().bold());
        }
        Commands::List { filter } => {
            let tasks = store.filtered(filter);
            if tasks.is_empty() {
                println!("No tasks in the {} view", filter);
            } else {
                for task in &tasks {
                    print_task(task);
                }
            }
        }
        Commands::Stats => {
            print_stats(&store, &streaks);
        }
        Commands::Checkin => {
            println!(
                "Streak: {} day(s) (longest {}), {} points",
                streaks.current_streak().to_string().bold(),
                streaks.longest_streak(),
                streaks.points()
            );
        }
        Commands::Rewards => {
            let rewards = streaks.rewards();
            if rewards.is_empty() {
                println!("No rewards configured (add a rewards.yaml to the store directory)");
            } else {
                for reward in rewards {
                    let status = if reward.unlocked {
                        "unlocked".green().bold()
                    } else {
                        "locked".dimmed()
                    };
                    println!(
                        "[{}] {} ({} pts) - {}",
                        status,
                        reward.title.bold(),
                        reward.points_cost,
                        reward.description
                    );
                }
            }
        }
    }

    Ok(())
}

fn report_checkin(checkin: &Checkin) {
    match checkin {
        Checkin::Extended { streak, awarded } => {
            println!(
                "{} day {} (+{} pts)",
                "Streak!".green().bold(),
                streak,
                awarded
            );
        }
        Checkin::Broken { lost } => {
            println!("{} lost a {}-day streak", "Streak broken.".red(), lost);
        }
        Checkin::AlreadyToday | Checkin::Started => {}
    }
}

/// Resolve a full uuid or a unique id prefix against the store.
fn resolve_id(store: &TaskStore, input: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }

    let matches: Vec<Uuid> = store
        .tasks()
        .iter()
        .filter(|t| t.id.to_string().starts_with(input))
        .map(|t| t.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(eyre!("no task matches id '{input}'")),
        _ => Err(eyre!("id '{input}' is ambiguous ({} matches)", matches.len())),
    }
}

/// Parse "YYYY-MM-DD HH:MM", or a bare date meaning end of that day.
fn parse_due(input: &str) -> Result<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| {
            input
                .parse::<NaiveDate>()
                .map(|d| d.and_hms_opt(23, 59, 59).unwrap())
        })
        .wrap_err_with(|| format!("invalid due date '{input}' (use YYYY-MM-DD or YYYY-MM-DD HH:MM)"))?;

    naive
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| eyre!("due date '{input}' does not exist in the local timezone"))
}

fn default_store_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre!("could not determine the platform data directory"))?;
    Ok(base.join("diddit"))
}

fn print_task(task: &Task) {
    let short_id = &task.id.to_string()[..8];
    let marker = if task.completed { "x" } else { " " };
    let title = if task.completed {
        task.title.dimmed().strikethrough()
    } else {
        task.title.normal()
    };

    let mut line = format!(
        "[{}] {} {} ({}, {})",
        marker,
        short_id.dimmed(),
        title,
        task.priority,
        task.category
    );
    if task.streak > 0 {
        line.push_str(&format!(" streak {}", task.streak));
    }
    if let Some(due) = task.due_at {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d %H:%M")));
    }
    println!("{}", line);

    if let Some(notes) = &task.notes {
        println!("    {}", notes.dimmed());
    }
}

fn print_stats(store: &TaskStore, streaks: &StreakEngine) {
    let stats = store.stats();

    println!("{}", "Tasks".bold());
    println!("  completed today: {}", stats.completed_today);
    println!("  total completed: {}", stats.total_completed);
    println!("  active:          {}", stats.active);
    println!("  completion rate: {}%", stats.completion_rate);

    println!("{}", "Streak".bold());
    println!("  current: {} day(s)", streaks.current_streak());
    println!("  longest: {} day(s)", streaks.longest_streak());
    println!("  points:  {}", streaks.points());
}
