mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    ProfileArgs, WorkoutArgs, cmd_delete, cmd_eat, cmd_food_list, cmd_food_show, cmd_params,
    cmd_profile_set, cmd_profile_show, cmd_progress_nutrition, cmd_progress_workouts, cmd_report,
    cmd_target, cmd_today, cmd_workout,
};
use crate::config::Config;
use gymrat_core::service::GymratService;

/// Longest window the `progress` and `report` commands accept.
const MAX_WINDOW_DAYS: i64 = 3650;

#[derive(Parser)]
#[command(
    name = "gymrat",
    version,
    about = "Heavy Duty training and nutrition tracker",
    long_about = "Log workouts and meals to local files, get 60/25/15 macro targets \
                  from your profile, and see progress by day or week."
)]
struct Cli {
    /// Data directory (default: $GYMRAT_DATA_DIR or the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Show daily calorie and macro targets
    Target {
        /// Phase to compute for (maintenance, bulk, cut; default: profile phase)
        #[arg(short, long)]
        phase: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse the food table
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },
    /// Log a food
    Eat {
        /// Food name (case-insensitive)
        food: String,
        /// Quantity in grams (e.g. "150" or "150g")
        grams: String,
        /// Meal: breakfast, lunch, dinner, snack, pre-workout, post-workout
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Time of day (HH:MM, default: now)
        #[arg(long)]
        time: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log an exercise with its sets
    Workout {
        /// Exercise name
        exercise: String,
        /// Set as WEIGHTxREPS[@RPE], e.g. 100x8@9 (repeatable)
        #[arg(short, long = "set", value_name = "SET", required = true)]
        sets: Vec<String>,
        /// Training mode: heavy-duty or general (default: profile mode)
        #[arg(long)]
        mode: Option<String>,
        /// Training goal (default: profile goal)
        #[arg(long)]
        goal: Option<String>,
        /// Session duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Time of day (HH:MM, default: now)
        #[arg(long)]
        time: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a nutrition or workout entry by ID
    Delete {
        /// Entry ID to delete
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one day's food log against the target (defaults to today)
    Today {
        /// Date to show (YYYY-MM-DD or today/yesterday/tomorrow)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show bucketed progress
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },
    /// Summary report for the last N days
    Report {
        /// Number of days to cover (1-3650)
        #[arg(
            short,
            long,
            default_value = "30",
            value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS)
        )]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Training parameters and exercise templates per goal
    Params {
        /// Goal: strength, hypertrophy, power, endurance (default: all)
        goal: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the current profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update one or more profile fields
    Set {
        #[command(flatten)]
        args: ProfileArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FoodCommands {
    /// List foods
    List {
        /// Only this category (protein, carbohydrate, fat, vegetable, fruit, dairy)
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show nutrition for one food
    Show {
        /// Food name
        name: String,
        /// Scale to this many grams (default: 100)
        #[arg(short, long)]
        grams: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct ProgressOpts {
    /// Bucket size: day or week
    #[arg(short, long, default_value = "day")]
    by: String,
    /// Number of days back from today to include (1-3650)
    #[arg(
        short,
        long,
        default_value = "30",
        value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS)
    )]
    days: u32,
    /// Exercise name (workouts) or meal type / food name (nutrition)
    #[arg(short, long)]
    filter: Option<String>,
    /// Include empty buckets as zero rows
    #[arg(long)]
    dense: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ProgressCommands {
    /// Volume, sets and RPE per bucket
    Workouts {
        #[command(flatten)]
        opts: ProgressOpts,
    },
    /// Intake per bucket against the daily target
    Nutrition {
        #[command(flatten)]
        opts: ProgressOpts,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GYMRAT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir)?;
    let mut svc = GymratService::open(&config.data_dir, None)
        .with_context(|| format!("Failed to load data from {}", config.data_dir.display()))?;

    match cli.command {
        Commands::Profile { command } => match command {
            ProfileCommands::Show { json } => cmd_profile_show(&svc, json),
            ProfileCommands::Set { args, json } => cmd_profile_set(&mut svc, &args, json),
        },
        Commands::Target { phase, json } => cmd_target(&svc, phase.as_deref(), json),
        Commands::Food { command } => match command {
            FoodCommands::List { category, json } => {
                cmd_food_list(&svc, category.as_deref(), json)
            }
            FoodCommands::Show { name, grams, json } => {
                cmd_food_show(&svc, &name, grams.as_deref(), json)
            }
        },
        Commands::Eat {
            food,
            grams,
            meal,
            date,
            time,
            json,
        } => cmd_eat(&mut svc, &food, &grams, &meal, date, time.as_deref(), json),
        Commands::Workout {
            exercise,
            sets,
            mode,
            goal,
            duration,
            date,
            time,
            json,
        } => cmd_workout(
            &mut svc,
            &WorkoutArgs {
                exercise,
                sets,
                mode,
                goal,
                duration,
                date,
                time,
            },
            json,
        ),
        Commands::Delete { id, json } => cmd_delete(&mut svc, &id, json),
        Commands::Today { date, json } => cmd_today(&svc, date, json),
        Commands::Progress { command } => match command {
            ProgressCommands::Workouts { opts } => cmd_progress_workouts(
                &svc,
                &opts.by,
                opts.days,
                opts.filter,
                opts.dense,
                opts.json,
            ),
            ProgressCommands::Nutrition { opts } => cmd_progress_nutrition(
                &svc,
                &opts.by,
                opts.days,
                opts.filter,
                opts.dense,
                opts.json,
            ),
        },
        Commands::Report { days, json } => cmd_report(&svc, days, json),
        Commands::Params { goal, json } => cmd_params(goal.as_deref(), json),
    }
}
