use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use raceday::config::AppConfig;
use raceday::display;
use raceday::i18n::Language;
use raceday::logging::{init_logging, LogConfig, LogLevel};
use raceday::models::CompletionMark;
use raceday::plan::PlanGenerator;
use raceday::session::{replay_timeline, RunEvent, RunSession};
use raceday::source::ReplaySource;
use raceday::store::{self, JsonFileStore, PreferenceStore};
use raceday::warmup::{WarmupSequencer, WarmupTick};

/// raceday - Race Countdown Training CLI
///
/// A training companion counting down to a fixed race date: weekly plan,
/// guided warm-up, GPS run replay with live metrics, and a post-run
/// summary with route rendering.
#[derive(Parser)]
#[command(name = "raceday")]
#[command(version = "0.1.0")]
#[command(about = "Race countdown training tracker", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the countdown and the weekly training plan
    Plan {
        /// Expand one week's sessions
        #[arg(short, long)]
        week: Option<u32>,
    },

    /// Run the guided warm-up countdown
    Warmup {
        /// Print the routine without running the countdown
        #[arg(long)]
        list: bool,
    },

    /// Replay a recorded run through the tracking engine
    Track {
        /// Replay file (GPX or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Render the route to an image (requires the charts feature)
        #[arg(long, value_name = "PNG")]
        route: Option<PathBuf>,
    },

    /// Mark a planned session as done, skipped, or pending
    Mark {
        /// Session id, e.g. week3_session2
        #[arg(short, long)]
        session: String,

        /// New mark
        #[arg(long)]
        status: CompletionMark,
    },

    /// Show or change the display language
    Lang {
        /// Two-letter code to switch to (es, en)
        #[arg(long)]
        set: Option<Language>,
    },

    /// Show or edit application settings
    Config {
        /// List the active configuration
        #[arg(short, long)]
        list: bool,

        /// Get a single value, e.g. race.date
        #[arg(short, long)]
        get: Option<String>,

        /// Set a value, e.g. race.date=2026-12-31
        #[arg(short, long)]
        set: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        ..LogConfig::default()
    })?;

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    let mut prefs = JsonFileStore::open(JsonFileStore::default_path());
    let lang = if prefs.get(store::LANGUAGE_KEY).is_some() {
        store::language(&prefs)
    } else {
        config.language
    };

    match cli.command {
        Commands::Plan { week } => show_plan(&config, &prefs, lang, week),
        Commands::Warmup { list } => run_warmup(lang, list),
        Commands::Track { file, route } => track_run(&config, lang, &file, route.as_deref()),
        Commands::Mark { session, status } => mark_session(&config, &mut prefs, &session, status),
        Commands::Lang { set } => switch_language(&mut prefs, lang, set),
        Commands::Config { list, get, set } => edit_config(config, cli.config, list, get, set),
    }
}

fn show_plan(
    config: &AppConfig,
    prefs: &JsonFileStore,
    lang: Language,
    week: Option<u32>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let plan = PlanGenerator::generate(today, config.race.date, &config.plan)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let marks = store::completion_marks(prefs);
    let labels = lang.labels();

    println!("{}", config.race.name.bold());
    println!(
        "{} {}",
        plan.days_until_race.to_string().green().bold(),
        labels.days_until_race
    );
    println!();

    if let Some(number) = week {
        let Some(selected) = plan.weeks.iter().find(|w| w.week == number) else {
            bail!("Plan has no week {}", number);
        };
        println!(
            "{} {} - {} km - {}",
            labels.week,
            selected.week,
            selected.distance_km,
            selected.phase.description(lang)
        );
        println!("{}", display::session_table(selected, lang, &marks));
        return Ok(());
    }

    let current = plan.current_week();
    println!(
        "{}: {} km, {} {}",
        labels.target_distance,
        current.distance_km,
        current.sessions.len(),
        labels.sessions.to_lowercase()
    );
    println!();
    println!("{}", display::plan_table(&plan, lang, &marks));
    Ok(())
}

fn run_warmup(lang: Language, list_only: bool) -> Result<()> {
    let labels = lang.labels();

    if list_only {
        for (i, exercise) in raceday::warmup::exercises(lang).iter().enumerate() {
            println!(
                "{:2}. {} ({})",
                i + 1,
                exercise.name.bold(),
                display::format_time(exercise.duration_seconds)
            );
            println!("    {}", exercise.description.dimmed());
        }
        return Ok(());
    }

    let mut sequencer = WarmupSequencer::new(lang);
    println!("{}", labels.warmup.green().bold());
    let bar = ProgressBar::new(u64::from(sequencer.total_seconds()));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );

    while let Some(exercise) = sequencer.current() {
        bar.set_message(format!(
            "{} {}/{}: {} ({}s)",
            labels.exercise,
            sequencer.index() + 1,
            sequencer.len(),
            exercise.name,
            sequencer.remaining_seconds()
        ));

        std::thread::sleep(std::time::Duration::from_secs(1));
        if sequencer.on_tick() == WarmupTick::Advanced {
            bar.println(format!("{} {}", "✓".green(), exercise.name));
        }
        bar.inc(1);
    }

    bar.finish_with_message(labels.training_completed.to_string());
    Ok(())
}

fn track_run(
    config: &AppConfig,
    lang: Language,
    file: &std::path::Path,
    route: Option<&std::path::Path>,
) -> Result<()> {
    let labels = lang.labels();
    let source = ReplaySource::from_file(file).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let samples = source.samples();
    let events = replay_timeline(samples);

    println!(
        "{} {}",
        "Replaying".green().bold(),
        file.display().to_string().bold()
    );

    let start_ms = samples.first().map(|s| s.timestamp_ms).unwrap_or(0);
    let mut session = RunSession::start(config.tracker.clone(), start_ms);

    let bar = ProgressBar::new(events.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );

    for event in events {
        let is_tick = event == RunEvent::Tick;
        session.handle(event);
        if is_tick {
            if let Some(state) = session.state() {
                bar.set_message(display::live_line(state, lang));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let today = Local::now().date_naive();
    let summary = session
        .stop(today)
        .context("session already stopped")?;

    println!();
    println!("{}", labels.training_completed.green().bold());
    println!("{}", display::summary_table(&summary, lang));

    if let Some(route_path) = route {
        render_route(&summary, route_path, lang)?;
    }

    Ok(())
}

#[cfg(feature = "charts")]
fn render_route(
    summary: &raceday::models::RunSummary,
    path: &std::path::Path,
    lang: Language,
) -> Result<()> {
    raceday::route::render_route(&summary.track, path, raceday::route::Canvas::default())
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("{}: {}", lang.labels().route_map, path.display());
    Ok(())
}

#[cfg(not(feature = "charts"))]
fn render_route(
    _summary: &raceday::models::RunSummary,
    _path: &std::path::Path,
    _lang: Language,
) -> Result<()> {
    bail!("Route rendering requires a build with the 'charts' feature")
}

fn mark_session(
    config: &AppConfig,
    prefs: &mut JsonFileStore,
    session_id: &str,
    status: CompletionMark,
) -> Result<()> {
    let today = Local::now().date_naive();
    let plan = PlanGenerator::generate(today, config.race.date, &config.plan)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let known = plan
        .weeks
        .iter()
        .flat_map(|w| &w.sessions)
        .any(|s| s.id == session_id);
    if !known {
        bail!("Unknown session id: {}", session_id);
    }

    store::set_completion_mark(prefs, session_id, status)?;
    println!("{} {} -> {}", "✓".green(), session_id, status);
    Ok(())
}

fn switch_language(
    prefs: &mut JsonFileStore,
    current: Language,
    set: Option<Language>,
) -> Result<()> {
    match set {
        Some(lang) => {
            store::set_language(prefs, lang)?;
            println!("{} {}", "Language:".bold(), lang.code());
        }
        None => println!("{} {}", "Language:".bold(), current.code()),
    }
    Ok(())
}

fn edit_config(
    mut config: AppConfig,
    config_path: Option<PathBuf>,
    list: bool,
    get: Option<String>,
    set: Option<String>,
) -> Result<()> {
    if let Some(key) = get {
        match key.as_str() {
            "race.name" => println!("{}", config.race.name),
            "race.date" => println!("{}", config.race.date),
            "language" => println!("{}", config.language.code()),
            other => bail!("Unknown config key: {}", other),
        }
        return Ok(());
    }

    if let Some(assignment) = set {
        let (key, value) = assignment
            .split_once('=')
            .context("expected key=value, e.g. race.date=2026-12-31")?;

        match key {
            "race.name" => config.race.name = value.to_string(),
            "race.date" => {
                config.race.date = value
                    .parse()
                    .with_context(|| format!("invalid date: {}", value))?;
            }
            "language" => {
                config.language = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
            }
            other => bail!("Unknown config key: {}", other),
        }

        let path = config_path.unwrap_or_else(AppConfig::default_config_path);
        config.save_to_file(&path)?;
        println!("{} {} = {}", "✓".green(), key, value);
        return Ok(());
    }

    if list {
        print!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}
