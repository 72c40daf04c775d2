//! Main entry point for flight-calc
//!
//! Parses the trip from the command line, loads configuration, and prints
//! when to leave for the airport.

use anyhow::Result;
use clap::Parser;
use flight_calc::config::AppConfig;
use flight_calc::service::{render_report, TripPlanner, TripRequest};
use flight_calc::TripPreferences;
use std::path::PathBuf;
use tracing::{error, info};

/// flight-calc - When should I leave for the airport?
#[derive(Parser)]
#[command(
    name = "flight-calc",
    version,
    about = "Calculates when to leave for your flight from real-time checkpoint wait times and traffic",
    long_about = "flight-calc combines TSA checkpoint wait times, airport metadata and a travel \
                 duration estimate into a recommended buffer and the total time to allow before \
                 the scheduled departure."
)]
struct Args {
    /// Destination airport shortcode (3 letters)
    #[arg(short, long, value_name = "CODE")]
    airport: String,

    /// Departure address
    #[arg(short, long, value_name = "ADDRESS")]
    origin: String,

    /// Traveler holds an expedited screening credential
    #[arg(long)]
    precheck: bool,

    /// International flight
    #[arg(long)]
    international: bool,

    /// Checking bags
    #[arg(long)]
    checked_bags: bool,

    /// Returning a rental car
    #[arg(long)]
    rental_car: bool,

    /// Inflate travel time for traffic surprises
    #[arg(long)]
    pessimistic: bool,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Airport metadata override
    #[arg(long, value_name = "FILE", help = "Override airport metadata JSON file")]
    metadata: Option<PathBuf>,

    /// Snapshot directory override
    #[arg(long, value_name = "DIR", help = "Override directory of recorded payloads")]
    snapshots: Option<PathBuf>,

    /// Cache file override
    #[arg(long, value_name = "FILE", help = "Override response cache file")]
    cache: Option<PathBuf>,

    /// Disable the response cache
    #[arg(long)]
    no_cache: bool,

    /// Print the estimate as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without estimating")]
    dry_run: bool,
}

impl Args {
    fn preferences(&self) -> TripPreferences {
        TripPreferences {
            has_expedited_credential: self.precheck,
            international: self.international,
            checked_bags: self.checked_bags,
            rental_car: self.rental_car,
            pessimistic: self.pessimistic,
        }
    }
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(metadata) = &args.metadata {
        config.data.metadata_path = metadata.clone();
    }

    if let Some(snapshots) = &args.snapshots {
        config.data.snapshot_dir = snapshots.clone();
    }

    if let Some(cache) = &args.cache {
        config.data.cache_path = cache.clone();
    }

    if args.no_cache {
        config.data.use_cache = false;
    }

    flight_calc::config::validate_config(&config)?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting {} v{}", config.service.name, flight_calc::VERSION);
    info!("Metadata: {}", config.data.metadata_path.display());
    info!("Snapshots: {}", config.data.snapshot_dir.display());
    if config.data.use_cache {
        info!("Response cache: {}", config.data.cache_path.display());
    }

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    let planner = TripPlanner::from_config(&config)?;
    let request = TripRequest {
        airport: args.airport.clone(),
        origin: args.origin.clone(),
        preferences: args.preferences(),
    };

    let estimate = match planner.plan(&request) {
        Ok(estimate) => estimate,
        Err(e) => {
            error!("Estimate failed: {:#}", e);
            eprintln!("Unable to estimate departure time: {:#}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("\n*********\n");
        print!("{}", render_report(&estimate));
        println!("\n*********\n");
    }

    planner.shutdown()?;
    Ok(())
}
