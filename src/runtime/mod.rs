use std::sync::mpsc;
use std::time::Duration;

use tracing::{error, info};

use crate::display::{DisplayError, DisplaySink};
use crate::mpris;
use crate::session::{PlayerEvent, Session};

mod event_loop;
mod settings;
mod startup;

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orbital=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let settings = settings::load_settings();
    let tick_interval = Duration::try_from_secs_f64(settings.display.tick_interval_ms / 1000.0)?;
    let mut session = startup::open_session(&settings);

    let (tx, rx) = mpsc::channel::<PlayerEvent>();
    let result = session.start().and_then(|()| {
        mpris::spawn_follower(settings.player.clone(), tx);
        event_loop::run(&mut session, &rx, tick_interval)
    });

    shut_down(&mut session, result)?;
    Ok(())
}

/// Switch the display off whatever ended the session, then hand back its error.
fn shut_down<S: DisplaySink>(
    session: &mut Session<S>,
    result: Result<(), DisplayError>,
) -> Result<(), DisplayError> {
    if let Err(e) = &result {
        error!("display write failed: {e}");
    }
    if let Err(e) = session.stop() {
        error!("failed to switch display off: {e}");
    }
    info!("exiting");
    result
}
