use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fieldyield::{
    catalog::Crop,
    config::{Config, ConfigLoader},
    report::render_table,
    session::Session,
    view::{parse_selector, SortKey},
    weather::{OpenWeatherClient, WeatherProvider},
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Farm field yield planner")]
struct Cli {
    /// Path to the YAML config file (defaults apply when it does not exist)
    #[arg(long, default_value = "fieldyield.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the web UI and JSON API
    Serve {
        /// Override the configured listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the projection table for the configured fields
    Report {
        /// Only show fields growing this crop
        #[arg(long)]
        crop: Option<String>,

        /// Sort by area, yield or crop
        #[arg(long)]
        sort: Option<String>,
    },
    /// Look up current weather once
    Weather {
        /// City name (uses the configured default city when omitted)
        #[arg(long)]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ConfigLoader::new(".");
    let config = loader.load_or_default(&cli.config)?.with_env_overrides();
    init_logging(&config.logging.level);

    match cli.command {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Report { crop, sort } => report(&config, crop.as_deref(), sort.as_deref()),
        Command::Weather { city, lat, lon } => weather(&config, city, lat.zip(lon)).await,
    }
}

async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let session = Session::with_drafts(&config.fields);
    web::run(WebServerConfig {
        session,
        weather: OpenWeatherClient::new(&config.weather),
        default_city: config.weather.default_city.clone(),
        host: host.unwrap_or(config.server.host),
        port: port.unwrap_or(config.server.port),
    })
    .await
}

fn report(config: &Config, crop: Option<&str>, sort: Option<&str>) -> Result<()> {
    let crop = parse_selector::<Crop>(crop).context("invalid --crop")?;
    let sort = parse_selector::<SortKey>(sort).context("invalid --sort")?;
    let session = Session::with_drafts(&config.fields);
    let view = session.registry().view(crop, sort);
    print!("{}", render_table(&view));
    Ok(())
}

async fn weather(config: &Config, city: Option<String>, coords: Option<(f64, f64)>) -> Result<()> {
    let client = OpenWeatherClient::new(&config.weather);
    let (label, outcome) = match coords {
        Some((lat, lon)) => (
            format!("{lat:.4},{lon:.4}"),
            client.current_by_coords(lat, lon).await,
        ),
        None => {
            let city = city.unwrap_or_else(|| config.weather.default_city.clone());
            let outcome = client.current_by_city(&city).await;
            (city, outcome)
        }
    };
    match outcome {
        Ok(snapshot) => {
            println!(
                "{label} at {}: {}",
                snapshot.observed_at.format("%H:%M:%S UTC"),
                snapshot.summary()
            );
            Ok(())
        }
        Err(err) => bail!("weather lookup for {label} failed: {err}"),
    }
}
