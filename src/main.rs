mod app;
mod domain;
mod error;
mod focus;
mod input;
mod logging;
mod notifications;
mod persistence;
mod reminders;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::TaskStore;
use chrono::Local;
use clap::{Parser, Subcommand};
use domain::{Filter, NewTask, Priority, SortKey, TaskPatch};
use focus::PomodoroTimer;
use input::{parse_datetime, split_list};
use notifications::DesktopNotifier;
use persistence::{
    config_file, ensure_data_dir, init_local_data_dir, load_config, log_dir, save_config, AppConfig, FileStore,
};

#[derive(Parser)]
#[command(name = "notedo")]
#[command(about = "A personal task manager with tags, due dates and reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .notedo directory in the current directory
    Init,
    /// Add a new task
    Add {
        /// Task title
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Due date (YYYY-MM-DD, "YYYY-MM-DD HH:MM" or +2d)
        #[arg(long)]
        due: Option<String>,
        /// Reminder time (same formats as --due)
        #[arg(short, long)]
        remind: Option<String>,
        /// Tag names or ids, repeatable or comma separated
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// List tasks
    List {
        /// all, pending, completed, overdue, or a tag name/id
        #[arg(short, long)]
        filter: Option<String>,
        /// dueDate, priority, name or createdAt
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Show one task in detail
    Show { id: String },
    /// Edit an existing task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
        #[arg(short, long, conflicts_with = "clear_remind")]
        remind: Option<String>,
        #[arg(long)]
        clear_remind: bool,
        /// Replace the task's tags
        #[arg(short, long)]
        tag: Vec<String>,
        #[arg(long, conflicts_with = "tag")]
        clear_tags: bool,
    },
    /// Toggle a task between pending and completed
    Done { id: String },
    /// Delete a task
    Delete { id: String },
    /// List tags
    Tags,
    /// Create a tag
    TagAdd {
        name: String,
        /// blue, green, red, yellow, purple, pink, indigo or gray
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a tag (tasks keep their reference)
    TagDelete { tag: String },
    /// Show counts and dashboard statistics
    Stats,
    /// Show tasks due in the next 7 days
    Upcoming,
    /// Write a markdown overview report
    Report {
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Stay running and deliver reminders as they come due
    Watch {
        /// Exit once no reminders are left to deliver
        #[arg(long)]
        until_idle: bool,
    },
    /// Run a Pomodoro focus timer
    Focus {
        /// Focus length in minutes (1-120)
        #[arg(short, long)]
        minutes: Option<u32>,
        /// Task to focus on
        #[arg(short, long)]
        task: Option<String>,
        /// Number of focus sessions to run before exiting
        #[arg(long, default_value_t = 1)]
        rounds: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(Commands::Init) => return init(),
        other => other,
    };

    let data_dir = ensure_data_dir()?;
    let config = load_config(config_file()?)?;

    // Logging is best effort; the command still runs without it
    if let Err(e) = logging::init_logging(&config.log_level, &log_dir()?) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let mut app = TaskStore::load(FileStore::new(&data_dir), Local::now());

    match command {
        None => list(&app, &config, None, None),
        Some(command) => run_command(&mut app, &config, command),
    }
}

fn init() -> Result<()> {
    let data_dir = init_local_data_dir()?;
    let config_path = data_dir.join("config.json");
    if !config_path.exists() {
        save_config(&config_path, &AppConfig::default())?;
    }
    println!("Initialized notedo directory: {}", data_dir.display());
    println!();
    println!("NoteDo will now use this local directory for task storage.");
    Ok(())
}

fn run_command(app: &mut TaskStore<FileStore>, config: &AppConfig, command: Commands) -> Result<()> {
    let now = Local::now();

    match command {
        Commands::Init => init(),
        Commands::Add {
            title,
            description,
            priority,
            due,
            remind,
            tag,
        } => {
            let data = NewTask {
                title,
                description,
                priority: Priority::from_name(&priority),
                due_date: due.map(|d| parse_datetime(&d, now)).transpose()?,
                reminder_time: remind.map(|r| parse_datetime(&r, now)).transpose()?,
                tags: resolve_tag_ids(app, &tag)?,
            };
            if let Some(reminder) = data.reminder_time {
                if reminder <= now {
                    eprintln!("Warning: reminder time is in the past and will not fire");
                }
            }
            let task = app.add_task(data, now)?.clone();
            println!("Added {}", ui::render_task_line(&task, app.tags(), now));
            Ok(())
        }
        Commands::List { filter, sort } => list(app, config, filter, sort),
        Commands::Show { id } => {
            let id = app.resolve_id(&id)?;
            if let Some(task) = app.find_task(&id) {
                print!("{}", ui::render_task_detail(task, app.tags(), now));
            }
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
            remind,
            clear_remind,
            tag,
            clear_tags,
        } => {
            let id = app.resolve_id(&id)?;
            let patch = TaskPatch {
                title,
                description,
                priority: priority.map(|p| Priority::from_name(&p)),
                due_date: optional_date(due, clear_due, now)?,
                reminder_time: optional_date(remind, clear_remind, now)?,
                tags: if clear_tags {
                    Some(Vec::new())
                } else if tag.is_empty() {
                    None
                } else {
                    Some(resolve_tag_ids(app, &tag)?)
                },
                completed: None,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to change");
            }
            if !app.edit_task(&id, patch, now) {
                anyhow::bail!("Task was not changed (title cannot be empty)");
            }
            if let Some(task) = app.find_task(&id) {
                println!("Updated {}", ui::render_task_line(task, app.tags(), now));
            }
            Ok(())
        }
        Commands::Done { id } => {
            let id = app.resolve_id(&id)?;
            if let Some(completed) = app.toggle_complete(&id, now) {
                let state = if completed { "Completed" } else { "Reopened" };
                if let Some(task) = app.find_task(&id) {
                    println!("{}: {}", state, task.title);
                }
            }
            Ok(())
        }
        Commands::Delete { id } => {
            let id = app.resolve_id(&id)?;
            let title = app.find_task(&id).map(|t| t.title.clone()).unwrap_or_default();
            if app.delete_task(&id) {
                println!("Deleted: {}", title);
            }
            Ok(())
        }
        Commands::Tags => {
            print!("{}", ui::render_tags(app.tags(), app.tasks()));
            Ok(())
        }
        Commands::TagAdd { name, color } => {
            let tag = app.add_tag(&name, color.as_deref())?;
            println!("Added tag {} ({})", tag.name, tag.id);
            Ok(())
        }
        Commands::TagDelete { tag } => {
            let tag_id = app.resolve_tag_id(&tag)?;
            app.delete_tag(&tag_id);
            println!("Deleted tag {}", tag);
            Ok(())
        }
        Commands::Stats => {
            println!("{}", ui::render_counts(&app.counts(now)));
            println!();
            let stats = report::calculate_dashboard_stats(app.tasks(), now);
            let quick = report::calculate_quick_stats(app.tasks(), now);
            print!("{}", ui::render_dashboard(&stats, &quick));
            Ok(())
        }
        Commands::Upcoming => {
            let upcoming = report::upcoming_tasks(app.tasks(), now);
            if upcoming.is_empty() {
                println!("No upcoming tasks in the next 7 days");
            }
            for task in &upcoming {
                println!("{}", ui::render_task_line(task, app.tags(), now));
            }
            Ok(())
        }
        Commands::Report { output } => {
            let output_path = output.map(std::path::PathBuf::from);
            let path = report::generate_report(app.tasks(), app.tags(), now, output_path)?;
            println!("Report generated: {}", path.display());
            Ok(())
        }
        Commands::Watch { until_idle } => watch(app, config, until_idle),
        Commands::Focus {
            minutes,
            task,
            rounds,
        } => {
            let title = match task {
                Some(id) => {
                    let id = app.resolve_id(&id)?;
                    app.find_task(&id).map(|t| t.title.clone())
                }
                None => None,
            };
            let mut timer = PomodoroTimer::new(minutes.unwrap_or(config.focus_minutes), title)?;
            run_focus(&mut timer, config, rounds)
        }
    }
}

fn list(
    app: &TaskStore<FileStore>,
    config: &AppConfig,
    filter: Option<String>,
    sort: Option<String>,
) -> Result<()> {
    let now = Local::now();
    let filter = resolve_filter(app, filter.as_deref().unwrap_or(&config.default_filter));
    let sort = sort.map(|s| SortKey::parse(&s)).unwrap_or(config.default_sort);

    let tasks = app.view(&filter, sort, now);
    print!("{}", ui::render_task_list(&filter, &tasks, app.tags(), now));
    println!("{}", ui::render_counts(&app.counts(now)));
    Ok(())
}

/// Built-in view names win; anything else is looked up as a tag name or id
fn resolve_filter(app: &TaskStore<FileStore>, name: &str) -> Filter {
    match Filter::parse(name) {
        Filter::ByTag(raw) => Filter::ByTag(app.resolve_tag_id(&raw).unwrap_or(raw)),
        builtin => builtin,
    }
}

fn resolve_tag_ids(app: &TaskStore<FileStore>, values: &[String]) -> Result<Vec<String>> {
    split_list(values)
        .iter()
        .map(|v| app.resolve_tag_id(v).map_err(anyhow::Error::from))
        .collect()
}

fn optional_date(
    value: Option<String>,
    clear: bool,
    now: chrono::DateTime<Local>,
) -> Result<Option<Option<chrono::DateTime<Local>>>> {
    if clear {
        return Ok(Some(None));
    }
    value.map(|v| parse_datetime(&v, now).map(Some)).transpose()
}

fn watch(app: &mut TaskStore<FileStore>, config: &AppConfig, until_idle: bool) -> Result<()> {
    let notifier = DesktopNotifier::new(config.desktop_notifications);
    let tick = ticker::watch_tick();
    let mut tick_count: u32 = 0;

    println!(
        "Watching {} reminder(s). Press Ctrl-C to stop.",
        app.reminders().len()
    );
    if let Some(next) = app.reminders().next_deadline() {
        println!("Next reminder at {}", domain::format_date(Some(next)));
    }

    loop {
        if until_idle && app.reminders().is_empty() {
            println!("No reminders left.");
            return Ok(());
        }

        std::thread::sleep(tick);
        tick_count = tick_count.wrapping_add(1);

        let now = Local::now();
        if ticker::should_reload(tick_count) {
            app.reload(now);
        }
        app.fire_due_reminders(now, &notifier);
    }
}

fn run_focus(timer: &mut PomodoroTimer, config: &AppConfig, rounds: u32) -> Result<()> {
    use std::io::Write;

    let notifier = DesktopNotifier::new(config.desktop_notifications);
    let tick = ticker::focus_tick();
    let mut completed_rounds = 0;

    timer.toggle();
    loop {
        print!("\r{}   ", ui::render_focus_status(timer));
        std::io::stdout().flush().context("Failed to write to terminal")?;

        std::thread::sleep(tick);
        if let Some(next) = timer.tick(&notifier) {
            println!();
            if next == domain::FocusMode::Break {
                completed_rounds += 1;
                if completed_rounds >= rounds {
                    println!("Focus complete: {} round(s).", completed_rounds);
                    return Ok(());
                }
            }
            timer.toggle();
        }
    }
}
