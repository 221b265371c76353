//! citycast: browse world cities and check their weather from the terminal
//!
//! ```sh
//! OPENWEATHER_API_KEY=... citycast
//! citycast --city Lisbon --units imperial
//! ```

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use citycast_core::api::{http_client, DatasetClient, WeatherClient};
use citycast_core::{Config, Units};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{EffectRuntime, EffectStoreWithMiddleware, LoggingMiddleware};

use citycast_tui::action::Action;
use citycast_tui::app::CitycastUi;
use citycast_tui::effect::{handle_effect, Services};
use citycast_tui::logging;
use citycast_tui::reducer::reducer;
use citycast_tui::state::{Activation, AppState};

const TICK_MS: u64 = 100;

#[derive(Parser, Debug)]
#[command(name = "citycast", version)]
#[command(about = "Browse world cities and their current weather")]
struct Args {
    /// Open the weather view for this city on start
    #[arg(long, short)]
    city: Option<String>,

    /// OpenWeatherMap API key (overrides OPENWEATHER_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// metric or imperial
    #[arg(long, short)]
    units: Option<Units>,

    /// Config file (default: {config_dir}/citycast/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: {cache_dir}/citycast/citycast.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;

    let config = load_config(&args)?;
    if config.api.api_key.is_none() {
        tracing::warn!("no OpenWeatherMap API key configured, weather requests will fail");
    }

    let client = http_client(config.api.timeout()).context("building HTTP client")?;
    let services = Services {
        cities: DatasetClient::new(client.clone(), config.api.dataset_url.clone()),
        weather: WeatherClient::new(
            client,
            config.api.weather_url.clone(),
            config.api.api_key.clone(),
        ),
    };

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config, services, args.city).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("running UI loop")
}

/// File, then environment, then command line.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("loading config")?;
    config.apply_env().context("reading environment")?;

    if let Some(key) = args.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        config.api.api_key = Some(key.to_string());
    }
    if let Some(units) = args.units {
        config.display.units = units;
    }
    Ok(config)
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    services: Services,
    city: Option<String>,
) -> io::Result<()> {
    let store = EffectStoreWithMiddleware::new(
        AppState::from_config(config),
        reducer,
        LoggingMiddleware::new(),
    );
    let mut runtime = EffectRuntime::from_store(store);

    runtime
        .subscriptions()
        .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);

    runtime.enqueue(Action::CitiesFetch);
    if let Some(name) = city {
        runtime.enqueue(Action::CitySelect {
            name,
            activation: Activation::Primary,
        });
    }

    let ui = RefCell::new(CitycastUi::new());

    runtime
        .run(
            terminal,
            |frame, area, state, _ctx| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handle_effect(effect, ctx.tasks(), &services),
        )
        .await
}
