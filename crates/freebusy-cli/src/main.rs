use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod calendar_client;
mod config;
mod output;

use calendar_client::CalendarClient;
use config::Config;
use output::OutputType;
use slot_engine::FreeSlotComputer;

#[derive(Parser)]
#[command(name = "freebusy")]
#[command(about = "Compute free time slots from a Google Calendar")]
#[command(
    long_about = "Lists the gaps between calendar events on each working day of a date range,\n\
    keeping a configurable buffer around every event.\n\n\
    Run 'authenticate' once to walk through the Google consent flow, then 'generate'\n\
    to print the availability list."
)]
struct Cli {
    /// Path to the TOML configuration file.
    ///
    /// Optional; built-in defaults apply when the file does not exist.
    /// Command-line flags override file values.
    #[arg(short, long, default_value = "freebusy.toml", env = "FREEBUSY_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the installed-app consent flow and cache the token
    ///
    /// Opens the Google consent page in a browser; the resulting token is
    /// written to the token cache path so later runs refresh silently.
    Authenticate {
        /// Path to the Google OAuth client credentials JSON file.
        #[arg(long, value_name = "FILE", env = "GOOGLE_CREDENTIALS_PATH")]
        credentials_filepath: Option<PathBuf>,
    },

    /// Generate the availability list
    ///
    /// Walks each working day of the range (default: today through a week
    /// from today), fetches that day's events, and prints the free slots
    /// left once every event is padded by the buffer.
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to the Google OAuth client credentials JSON file.
    #[arg(long, value_name = "FILE", env = "GOOGLE_CREDENTIALS_PATH")]
    credentials_filepath: Option<PathBuf>,

    /// How to print the results.
    #[arg(long, value_enum, default_value_t = OutputType::Default)]
    output_type: OutputType,

    /// Minutes kept free around each event.
    #[arg(long, value_name = "MINUTES")]
    buffer_minutes: Option<i64>,

    /// First hour of the working window (0-23).
    #[arg(long, value_name = "HOUR")]
    hour_start: Option<u32>,

    /// Hour the working window closes (1-24; 24 means full day).
    #[arg(long, value_name = "HOUR")]
    hour_end: Option<u32>,

    /// IANA timezone for window bounds and display (e.g. Europe/Berlin).
    #[arg(long, value_name = "TZ")]
    timezone: Option<String>,

    /// Calendar to read busy events from.
    #[arg(long, value_name = "ID")]
    calendar_id: Option<String>,

    /// First day of the range (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    start_date: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD). Defaults to a week after the
    /// first day.
    #[arg(long, value_name = "DATE")]
    end_date: Option<NaiveDate>,
}

impl GenerateArgs {
    /// Flags beat file values, file values beat defaults.
    fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.credentials_filepath {
            config.credentials_path = path.clone();
        }
        if let Some(buffer) = self.buffer_minutes {
            config.buffer_minutes = buffer;
        }
        if let Some(hour) = self.hour_start {
            config.hour_start = hour;
        }
        if let Some(hour) = self.hour_end {
            config.hour_end = hour;
        }
        if let Some(timezone) = &self.timezone {
            config.timezone = timezone.clone();
        }
        if let Some(calendar_id) = &self.calendar_id {
            config.calendar_id = calendar_id.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install crypto provider");
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Authenticate {
            credentials_filepath,
        } => {
            if let Some(path) = credentials_filepath {
                config.credentials_path = path;
            }
            authenticate(&config).await
        }
        Commands::Generate(args) => {
            args.apply_to(&mut config);
            generate(&config, &args).await
        }
    }
}

async fn authenticate(config: &Config) -> Result<()> {
    let client = CalendarClient::new(config).await?;
    client.authorize().await?;

    println!(
        "Authentication complete; token cached at {}",
        config.token_cache_path.display()
    );
    Ok(())
}

async fn generate(config: &Config, args: &GenerateArgs) -> Result<()> {
    let slot_config = config.slot_config()?;
    let computer = FreeSlotComputer::new(slot_config)?;

    let today = Utc::now().with_timezone(&slot_config.timezone).date_naive();
    let start_date = args.start_date.unwrap_or(today);
    let end_date = args.end_date.unwrap_or(start_date + Duration::days(7));

    tracing::info!(
        "computing availability from {} to {} ({})",
        start_date,
        end_date,
        config.calendar_id
    );

    let client = CalendarClient::new(config).await?;
    let reports = computer.compute(&client, start_date, end_date).await?;

    print!(
        "{}",
        output::render(&reports, args.output_type, slot_config.timezone)?
    );
    Ok(())
}
