//! weathermap binary
//!
//! ```sh
//! weathermap                       # start over Tehran
//! weathermap --lat 48.85 --lon 2.35 --initial-zoom 10
//! RUST_LOG=weathermap=debug weathermap --log-file /tmp/wm.log
//! ```

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;
use weathermap::{App, CanvasMap, ControllerConfig, FlyToOptions, MapConfig, Viewport};
use weathermap_core::config::{DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL};
use weathermap_core::{GeoPoint, NominatimClient, OpenMeteoClient, ServiceEndpoints};

/// Search places and inspect current weather anywhere on the map
#[derive(Parser, Debug)]
#[command(name = "weathermap", version)]
struct Args {
    /// Geocoding search endpoint (Nominatim-compatible)
    #[arg(long, default_value = DEFAULT_GEOCODING_URL)]
    geocoding_url: String,

    /// Forecast endpoint (Open-Meteo-compatible)
    #[arg(long, default_value = DEFAULT_FORECAST_URL)]
    forecast_url: String,

    /// Zoom level after a successful search
    #[arg(long, default_value_t = 14.0)]
    zoom: f64,

    /// Length of the fly-to animation in milliseconds
    #[arg(long, default_value_t = 1500)]
    fly_duration_ms: u64,

    /// Seconds the error notification stays visible
    #[arg(long, default_value_t = 5)]
    toast_secs: u64,

    /// Initial map center latitude
    #[arg(long, default_value_t = 35.6892, allow_negative_numbers = true)]
    lat: f64,

    /// Initial map center longitude
    #[arg(long, default_value_t = 51.389, allow_negative_numbers = true)]
    lon: f64,

    /// Initial zoom level
    #[arg(long, default_value_t = 6.0)]
    initial_zoom: f64,

    /// Log file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints {
            geocoding_url: self.geocoding_url.clone(),
            forecast_url: self.forecast_url.clone(),
            ..ServiceEndpoints::default()
        }
    }

    fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            fly_to: FlyToOptions {
                zoom: self.zoom,
                duration: Duration::from_millis(self.fly_duration_ms),
            },
            error_toast: Duration::from_secs(self.toast_secs),
            ..ControllerConfig::default()
        }
    }

    fn map_config(&self) -> MapConfig {
        MapConfig {
            initial: Viewport {
                center: GeoPoint::new(self.lat, self.lon),
                zoom: self.initial_zoom,
            },
            ..MapConfig::default()
        }
    }
}

fn init_logging(path: Option<PathBuf>) -> io::Result<PathBuf> {
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("weathermap.log"));
    let file = File::create(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let log_path = init_logging(args.log_file.clone())?;

    let endpoints = args.endpoints();
    let geocoder = NominatimClient::new(&endpoints).map_err(io::Error::other)?;
    let weather = OpenMeteoClient::new(&endpoints).map_err(io::Error::other)?;
    tracing::info!(url = %endpoints.geocoding_url, "Geocoding via Nominatim (OpenStreetMap)");
    tracing::info!(url = %endpoints.forecast_url, "Weather via Open-Meteo");
    tracing::info!(log = %log_path.display(), "weathermap starting");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(
        CanvasMap::new(args.map_config()),
        Arc::new(geocoder),
        Arc::new(weather),
        args.controller_config(),
        (size.width, size.height),
    );
    let result = app.run(&mut terminal).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("weathermap stopped");
    result
}
