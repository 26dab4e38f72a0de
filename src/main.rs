use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use skitour::catalog::describe;
use skitour::config::SkiTourConfig;
use skitour::models::ProfileUpdate;
use skitour::planner::{Planner, Providers, SearchParameters};
use skitour::profiles::{list_profiles, load_profile, save_profile};
use skitour::providers::{Gazetteer, SnapshotProvider};
use skitour::quiz;
use skitour::report::{list_reports, save_report};
use skitour::{
    Catalog, PersistentCache, RegionalOptions, SkiTourError, UserProfile, logging,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "skitour",
    about = "Find Norwegian ski touring destinations that match your conditions and personality",
    version
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank destinations (or regions) for a start location and trip
    Recommend(RecommendArgs),
    /// Show the personality quiz, or score and save a set of answers
    Quiz {
        /// Quiz answers to turn into a profile, e.g. 2,1,3,2,1,1,2
        #[arg(long)]
        answers: Option<String>,
        /// Save the resulting profile under this name
        #[arg(long, requires = "answers")]
        save: Option<String>,
    },
    /// Show catalog details for one destination
    Destination {
        /// Destination name (case-insensitive)
        name: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// List saved recommendation reports
    Reports,
    /// Manage saved personality profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// List saved profiles
    List,
    /// Show one saved profile
    Show { name: String },
    /// Edit fields of a saved profile (created from the neutral profile if missing)
    Set {
        name: String,
        /// Edits such as powder_priority=9 or terrain_preference=high_alpine
        #[arg(required = true)]
        edits: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Start location: a Norwegian town or "lat,lon"
    #[arg(long)]
    from: String,
    /// Maximum driving time in hours
    #[arg(long)]
    hours: Option<f64>,
    /// Hours you accept walking with skis before reaching snow (see `quiz`)
    #[arg(long)]
    walk: Option<f64>,
    /// Walking tolerance to retry with when nothing is skiable
    #[arg(long)]
    walk_fallback: Option<f64>,
    /// Quiz answers, one number per question, e.g. 2,1,3,2,1,1,2
    #[arg(long, conflicts_with = "profile")]
    answers: Option<String>,
    /// Use a profile saved with `quiz --save` or `profiles set`
    #[arg(long)]
    profile: Option<String>,
    /// Number of recommendations to show
    #[arg(long)]
    top: Option<usize>,
    /// Destination catalog JSON
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Conditions snapshot JSON
    #[arg(long)]
    conditions: Option<PathBuf>,
    /// Save the report to the results directory
    #[arg(long, conflicts_with = "by_region")]
    save: bool,
    /// Rank ski regions instead of single destinations
    #[arg(long)]
    by_region: bool,
    /// Number of regions to show with --by-region
    #[arg(long, default_value_t = 3)]
    regions: usize,
    /// Tours listed per region with --by-region
    #[arg(long, default_value_t = 3)]
    tours_per_region: usize,
    /// Trip date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{raw}': {e}"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        match err.downcast_ref::<SkiTourError>() {
            Some(domain) => eprintln!("❌ {}", domain.user_message()),
            None => eprintln!("❌ {err:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SkiTourConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Recommend(args) => recommend(&config, args).await,
        Command::Quiz { answers, save } => run_quiz(&config, answers.as_deref(), save.as_deref()),
        Command::Destination { name, catalog } => {
            let path = catalog.unwrap_or_else(|| config.data.destinations_file.clone());
            show_destination(&config, &path, &name)
        }
        Command::Reports => {
            let reports = list_reports(&config.data.results_dir)?;
            if reports.is_empty() {
                println!("No saved reports in {}", config.data.results_dir.display());
            }
            for path in reports {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Profiles { action } => manage_profiles(&config, action),
    }
}

async fn recommend(config: &SkiTourConfig, args: RecommendArgs) -> Result<()> {
    let catalog_path = args
        .catalog
        .unwrap_or_else(|| config.data.destinations_file.clone());
    let conditions_path = args
        .conditions
        .unwrap_or_else(|| config.data.conditions_file.clone());

    let start = Gazetteer::default().resolve(&args.from)?;
    let profile = match (args.answers.as_deref(), args.profile.as_deref()) {
        (Some(raw), _) => quiz::profile_from_answers(&quiz::parse_answers(raw)?)?,
        (None, Some(name)) => load_profile(&config.data.results_dir, name)?,
        (None, None) => UserProfile::default(),
    };

    let mut params = SearchParameters::new(start, &config.search);
    if let Some(hours) = args.hours {
        params.max_driving_hours = hours;
    }
    if let Some(walk) = args.walk {
        params.max_walking_hours = walk;
    }
    if let Some(top) = args.top {
        params.top_n = top;
    }
    params.walking_fallback_hours = args.walk_fallback;

    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let snapshot = SnapshotProvider::load(&conditions_path)
        .with_context(|| format!("Failed to load conditions {}", conditions_path.display()))?;
    let cache = PersistentCache::from_config(config).with_context(|| {
        format!("Failed to open cache {}", config.data.cache_dir.display())
    })?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let planner = Planner::new(
        config,
        Providers::from_single(Arc::new(snapshot)),
        Arc::new(cache),
    );

    println!("{}", profile.summary());
    println!();

    if args.by_region {
        let options = RegionalOptions {
            top_regions: args.regions,
            tours_per_region: args.tours_per_region,
        };
        let report = planner
            .recommend_by_region(&catalog, &profile, &params, options, date)
            .await?;
        print!("{report}");
    } else {
        let report = planner.recommend(&catalog, &profile, &params, date).await?;
        print!("{report}");

        if args.save {
            let path = save_report(&config.data.results_dir, &report)?;
            println!();
            println!("💾 Results saved to: {}", path.display());
        }
    }
    info!("Recommendation run finished");
    Ok(())
}

fn run_quiz(config: &SkiTourConfig, answers: Option<&str>, save: Option<&str>) -> Result<()> {
    let Some(raw) = answers else {
        print!("{}", quiz::render_quiz());
        return Ok(());
    };

    let profile = quiz::profile_from_answers(&quiz::parse_answers(raw)?)?;
    println!("{}", profile.summary());
    if let Some(name) = save {
        let path = save_profile(&config.data.results_dir, name, &profile)?;
        println!();
        println!("👤 Profile saved to: {}", path.display());
    }
    Ok(())
}

fn manage_profiles(config: &SkiTourConfig, action: ProfileAction) -> Result<()> {
    let results_dir = &config.data.results_dir;
    match action {
        ProfileAction::List => {
            let names = list_profiles(results_dir)?;
            if names.is_empty() {
                println!("No saved profiles in {}", results_dir.display());
            }
            for name in names {
                println!("{name}");
            }
        }
        ProfileAction::Show { name } => {
            println!("{}", load_profile(results_dir, &name)?.summary());
        }
        ProfileAction::Set { name, edits } => {
            let mut profile = match load_profile(results_dir, &name) {
                Ok(profile) => profile,
                Err(SkiTourError::NotFound { .. }) => UserProfile::default(),
                Err(e) => return Err(e.into()),
            };
            profile.apply(ProfileUpdate::from_assignments(&edits)?)?;
            let path = save_profile(results_dir, &name, &profile)?;
            println!("{}", profile.summary());
            println!();
            println!("👤 Profile saved to: {}", path.display());
        }
    }
    Ok(())
}

fn show_destination(config: &SkiTourConfig, path: &std::path::Path, name: &str) -> Result<()> {
    let catalog = Catalog::load(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
    let destination = catalog
        .find(name)
        .ok_or_else(|| SkiTourError::not_found(format!("No destination named '{name}'")))?;

    print!("{}", describe(destination, &config.scoring));
    Ok(())
}
