mod app;
mod domain;
mod input;
mod messages;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::{parse_deadline, AppState};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{deadline_from_date, CommonBlockableApp, Goal, MessageCategory, YearProgress};
use notifications::LocalScheduler;
use persistence::{ensure_finite_dir, init_local_finite, schedule_file, widget_file, WidgetEntry, WidgetSync};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "finite")]
#[command(about = "Goal countdowns that make the passage of time tangible", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .finite directory in the current directory
    Init,
    /// Add a goal
    Add {
        /// What you want to achieve
        name: String,
        /// Deadline date (YYYY-MM-DD format)
        #[arg(short, long)]
        deadline: String,
        /// Why this goal matters to you
        #[arg(long)]
        why: Option<String>,
        /// What you'll regret if you don't finish
        #[arg(long)]
        regret: Option<String>,
    },
    /// List goals, nearest deadline first
    List,
    /// Edit a goal by list number or id
    Edit {
        goal: String,
        #[arg(long)]
        name: Option<String>,
        /// New deadline (YYYY-MM-DD format)
        #[arg(short, long)]
        deadline: Option<String>,
        #[arg(long)]
        why: Option<String>,
        #[arg(long)]
        regret: Option<String>,
    },
    /// Remove a goal by list number or id
    Remove { goal: String },
    /// Show how much of the year is gone
    Year,
    /// Print a generated reminder message
    Message {
        /// time-decay, year-progress, sunk-cost or life-context
        #[arg(short, long, default_value = "time-decay")]
        category: String,
    },
    /// Rebuild and show the daily reminder schedule
    Schedule,
    /// Set productive years remaining (0 resets to the default)
    Years { years: u32 },
    /// Manage apps to block while focusing
    Blocked {
        #[command(subcommand)]
        action: BlockedCommand,
    },
    /// Show what the home-screen widget would display right now
    Widget,
    /// Generate a Markdown countdown report
    Report {
        /// Output file path. Defaults to ~/.finite/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
enum BlockedCommand {
    /// Block an app from the catalogue, or any app with --bundle-id
    Add {
        name: String,
        #[arg(long)]
        bundle_id: Option<String>,
    },
    List,
    Toggle { id: Uuid },
    Remove { id: Uuid },
    /// Show the catalogue of common distracting apps
    Catalog,
}

/// Initialize logging (reads RUST_LOG env var)
fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            init_logging("warn");
            let finite_dir = init_local_finite()?;
            println!("Initialized finite directory: {}", finite_dir.display());
            println!();
            println!("Finite will now use this local directory for goal storage.");
            println!("Run 'finite' to open the dashboard.");
            Ok(())
        }
        Some(command) => {
            init_logging("warn");
            run_command(command)
        }
        None => {
            // The dashboard owns the terminal, so stay quiet unless asked
            init_logging("off");
            run_tui()
        }
    }
}

/// Open app state from the data directory with goals loaded
fn open_app() -> Result<(PathBuf, AppState)> {
    let dir = ensure_finite_dir()?;
    let mut app = AppState::open(&dir)?;
    if let Some(warning) = app.error_message.take() {
        eprintln!("Warning: {}", warning);
    }
    app.load_goals();
    fail_on_error(&mut app)?;
    Ok((dir, app))
}

fn fail_on_error(app: &mut AppState) -> Result<()> {
    match app.error_message.take() {
        Some(message) => anyhow::bail!(message),
        None => Ok(()),
    }
}

fn parse_date_arg(value: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    let date = parse_deadline(value)
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", value))?;
    Ok(deadline_from_date(date))
}

/// Resolve a goal by 1-based list number or id prefix
fn find_goal(app: &AppState, key: &str) -> Result<Goal> {
    if let Ok(number) = key.parse::<usize>() {
        if number >= 1 {
            if let Some(goal) = app.goals.get(number - 1) {
                return Ok(goal.clone());
            }
        }
    }

    let matches: Vec<&Goal> = app
        .goals
        .iter()
        .filter(|g| g.id.to_string().starts_with(key))
        .collect();
    match matches.as_slice() {
        [goal] => Ok((*goal).clone()),
        [] => anyhow::bail!("No goal matches '{}'", key),
        _ => anyhow::bail!("'{}' matches more than one goal", key),
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init => Ok(()),
        Commands::Add { name, deadline, why, regret } => {
            let (_, mut app) = open_app()?;
            let goal = Goal::new(app.user.id, name, parse_date_arg(&deadline)?)
                .with_why(why.unwrap_or_default())
                .with_regret(regret.unwrap_or_default());
            let summary = goal.time_remaining_at(&app.now).formatted_countdown();
            app.create_goal(goal);
            fail_on_error(&mut app)?;
            println!("Goal added. {} left.", summary);
            Ok(())
        }
        Commands::List => {
            let (_, app) = open_app()?;
            if app.goals.is_empty() {
                println!("No goals yet. Add one with 'finite add <name> --deadline YYYY-MM-DD'.");
            }
            for (idx, goal) in app.goals.iter().enumerate() {
                println!(
                    "{:>3}. {} {:<30} {:>14}  {:>5.1}% used  {}  ({})",
                    idx + 1,
                    goal.urgency_level().icon(),
                    goal.name,
                    goal.time_remaining().formatted_countdown(),
                    goal.time_elapsed().percent_elapsed,
                    goal.deadline.with_timezone(&chrono::Local).format("%Y-%m-%d"),
                    &goal.id.to_string()[..8]
                );
            }
            Ok(())
        }
        Commands::Edit { goal, name, deadline, why, regret } => {
            let (_, mut app) = open_app()?;
            let mut edited = find_goal(&app, &goal)?;
            if let Some(name) = name {
                edited.rename(name)?;
            }
            if let Some(deadline) = deadline {
                edited.reschedule(parse_date_arg(&deadline)?);
            }
            if let Some(why) = why {
                edited = edited.with_why(why);
            }
            if let Some(regret) = regret {
                edited = edited.with_regret(regret);
            }
            app.update_goal(edited);
            fail_on_error(&mut app)?;
            println!("Goal updated.");
            Ok(())
        }
        Commands::Remove { goal } => {
            let (_, mut app) = open_app()?;
            let target = find_goal(&app, &goal)?;
            app.delete_goal(target.id);
            fail_on_error(&mut app)?;
            println!("Removed \"{}\".", target.name);
            Ok(())
        }
        Commands::Year => {
            let year = YearProgress::current();
            println!(
                "{}: {:.1}% gone, {:.1}% remaining ({} of {} days left)",
                year.year, year.percent_gone, year.percent_remaining, year.days_remaining, year.days_in_year
            );
            Ok(())
        }
        Commands::Message { category } => {
            let category = MessageCategory::from_tag(&category).with_context(|| {
                let known: Vec<&str> = MessageCategory::all().iter().map(|c| c.to_tag()).collect();
                format!("Unknown category '{}'. Use one of: {}", category, known.join(", "))
            })?;
            let (_, app) = open_app()?;
            let message = messages::generate_message(
                &app.goals,
                app.productive_life(),
                category,
                &app.now,
                &mut rand::thread_rng(),
            );
            println!("{}", message);
            Ok(())
        }
        Commands::Schedule => {
            let (dir, mut app) = open_app()?;
            app.reschedule_notifications()?;
            let scheduler = LocalScheduler::load(schedule_file(&dir))?;
            if scheduler.entries().is_empty() {
                println!("Nothing scheduled. Reminders start once you add a goal.");
            }
            for entry in scheduler.entries() {
                println!("{:02}:{:02} [{}] {}", entry.hour, entry.minute, entry.identifier, entry.body);
            }
            Ok(())
        }
        Commands::Years { years } => {
            let (_, mut app) = open_app()?;
            app.set_productive_years(years)?;
            let life = app.productive_life();
            println!(
                "{} productive years: ~{} days, {} weeks, {} months.",
                life.years,
                domain::calendar::group_thousands(life.total_days()),
                domain::calendar::group_thousands(life.total_weeks()),
                life.total_months()
            );
            Ok(())
        }
        Commands::Blocked { action } => run_blocked(action),
        Commands::Widget => {
            let (dir, _app) = open_app()?;
            let snapshot = WidgetSync::new(widget_file(&dir)).load()?;
            let entry = WidgetEntry::compute(snapshot.as_ref(), &chrono::Local::now());
            println!("{} {}", entry.urgency.icon(), entry.goal_name);
            println!(
                "{} days · {} hours · {:.0}% left · {:.0}% of the year",
                entry.days_remaining, entry.hours_remaining, entry.percent_remaining, entry.percent_of_year
            );
            println!("Next refresh: {}", entry.next_refresh.with_timezone(&chrono::Local).format("%H:%M"));
            Ok(())
        }
        Commands::Report { output } => {
            let (dir, app) = open_app()?;
            let output_path = output.map(PathBuf::from);
            let report_path =
                report::generate_report(&app.goals, app.productive_life(), &app.now, &dir, output_path)?;
            println!("Report generated: {}", report_path.display());
            Ok(())
        }
    }
}

fn run_blocked(action: BlockedCommand) -> Result<()> {
    if let BlockedCommand::Catalog = action {
        for app in CommonBlockableApp::all() {
            println!("{:<12} {}", app.name, app.bundle_id);
        }
        return Ok(());
    }

    let (_, mut app) = open_app()?;
    match action {
        BlockedCommand::Add { name, bundle_id } => {
            let blocked = app.block_app(&name, bundle_id.as_deref())?;
            println!("Blocking {} ({})", blocked.app_name, blocked.id);
        }
        BlockedCommand::List => {
            for blocked in app.blocked_apps()? {
                let state = if blocked.is_enabled { "on " } else { "off" };
                println!("[{}] {:<12} {}  {}", state, blocked.app_name, blocked.app_bundle_id, blocked.id);
            }
        }
        BlockedCommand::Toggle { id } => {
            let blocked = app.toggle_blocked_app(id)?;
            println!(
                "{} is now {}",
                blocked.app_name,
                if blocked.is_enabled { "blocked" } else { "allowed" }
            );
        }
        BlockedCommand::Remove { id } => {
            app.unblock_app(id)?;
            println!("Removed.");
        }
        BlockedCommand::Catalog => {}
    }
    Ok(())
}

fn run_tui() -> Result<()> {
    // Ensure finite directory exists
    let finite_dir = ensure_finite_dir()?;
    eprintln!("Using finite directory: {}", finite_dir.display());

    let mut app = AppState::open(&finite_dir)?;
    app.load_goals();
    if !app.settings.has_completed_onboarding {
        app.start_onboarding();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let should_quit = input::handle_key(app, key)?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }

        // Tick clock
        app.tick();

        // Deliver reminders whose time has come
        app.deliver_reminders();
    }
}
