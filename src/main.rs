//! Tandem demo binary - mounts a synchronized viewing session over the
//! simulated widget backend and replays a short scripted interaction, so the
//! propagation and re-basing behavior can be watched in the logs.

use std::{error::Error, path::PathBuf, process, sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use tracing::info;

use tandem::config::TandemConfig;
use tandem::player::{VideoWidget, WidgetFactory};
use tandem::player::sim::SimulatedFactory;
use tandem::session::{PlayMode, SessionView, WatchRequest};
use tandem::tracing_config;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Regular on-demand videos
    Video,
    /// Live streams (suppresses live chat)
    Live,
}

impl From<ModeArg> for PlayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Video => PlayMode::Video,
            ModeArg::Live => PlayMode::Live,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tandem", about = "Synchronized side-by-side video viewing")]
struct Cli {
    /// Playback mode for the session
    #[arg(long, value_enum, default_value_t = ModeArg::Video)]
    mode: ModeArg,

    /// Video URL to open; repeat up to three times
    #[arg(long = "url")]
    urls: Vec<String>,

    /// Full handoff query string (mode=...&url=...&url=...), alternative
    /// to --mode/--url
    #[arg(long, conflicts_with_all = ["mode", "urls"])]
    query: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_config::init()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TandemConfig::load(path)?,
        None => TandemConfig::default(),
    };

    let request = match &cli.query {
        Some(query) => WatchRequest::from_query(query),
        None => WatchRequest::from_urls(cli.mode.into(), &cli.urls),
    };
    if request.refs.is_empty() {
        eprintln!("No valid video URLs given; nothing to watch");
        process::exit(1);
    }

    let sim = Arc::new(SimulatedFactory::new());
    let factory: Arc<dyn WidgetFactory> = sim.clone();
    let session = SessionView::mount(factory, request, &config).await?;
    info!(players = session.player_count(), mode = %session.mode(), "Session mounted");

    run_demo(&session, &sim).await;

    session.unmount();
    Ok(())
}

/// Plays the role of the user on player 0 and reports what the coordinator
/// did to the siblings.
async fn run_demo(session: &SessionView, sim: &SimulatedFactory) {
    // Let the widgets finish their ready handshake.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let Some(driver) = sim.widget(0) else {
        return;
    };

    info!("Demo: pressing play on player 0");
    driver.play();
    tokio::time::sleep(Duration::from_secs(2)).await;
    report_positions(session, sim);

    info!("Demo: seeking player 0 to 30s");
    driver.seek_to(30.0);
    tokio::time::sleep(Duration::from_millis(400)).await;
    report_positions(session, sim);

    info!("Demo: pausing player 0");
    driver.pause();
    tokio::time::sleep(Duration::from_millis(400)).await;
    report_positions(session, sim);
}

fn report_positions(session: &SessionView, sim: &SimulatedFactory) {
    for ordinal in 0..session.player_count() {
        if let Some(adapter) = session.adapter(ordinal) {
            let handle = adapter.handle();
            info!(
                ordinal,
                video = %adapter.video(),
                state = %handle.state(),
                position = handle.position(),
                "Player status"
            );
        }
    }
}
