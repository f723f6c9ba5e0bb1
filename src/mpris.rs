//! Follows an MPRIS media player on the session bus.
//!
//! The player is polled rather than watched: `Position` is never signalled,
//! and polling keeps working across player restarts under the same bus name.
//! Changes are sent to the runtime as [`PlayerEvent`]s.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use async_io::{Timer, block_on};
use tracing::{debug, error, info};
use zbus::Connection;
use zbus::proxy::CacheProperties;
use zvariant::OwnedValue;

use crate::config::PlayerSettings;
use crate::session::PlayerEvent;

mod snapshot;

pub use snapshot::{Snapshot, Status, Tracker};

#[zbus::proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait Player {
    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// Microseconds into the current track.
    #[zbus(property)]
    fn position(&self) -> zbus::Result<i64>;
}

async fn player_proxy<'a>(
    connection: &Connection,
    bus_name: &'a str,
) -> zbus::Result<PlayerProxy<'a>> {
    PlayerProxy::builder(connection)
        .destination(bus_name)?
        .cache_properties(CacheProperties::No)
        .build()
        .await
}

async fn poll(proxy: &PlayerProxy<'_>) -> Snapshot {
    let status = match proxy.playback_status().await {
        Ok(status) => status,
        Err(e) => {
            debug!("MPRIS: player not answering: {e}");
            return Snapshot::absent();
        }
    };
    let metadata = proxy.metadata().await.unwrap_or_default();
    let position = proxy.position().await.ok();
    Snapshot::from_properties(&status, &metadata, position)
}

/// Poll the player named in `settings` on a background thread.
///
/// The thread exits when `tx` is disconnected or the session bus is unavailable.
pub fn spawn_follower(settings: PlayerSettings, tx: Sender<PlayerEvent>) {
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    error!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            let proxy = match player_proxy(&connection, &settings.bus_name).await {
                Ok(p) => p,
                Err(e) => {
                    error!("MPRIS: invalid player name {}: {e}", settings.bus_name);
                    return;
                }
            };
            info!(player = %settings.bus_name, "following MPRIS player");

            let interval = Duration::from_millis(settings.poll_interval_ms.max(1));
            let mut tracker = Tracker::new(settings.seek_tolerance_ms);
            let mut last_poll = Instant::now();

            loop {
                let snapshot = poll(&proxy).await;
                let now = Instant::now();
                let events = tracker.update(&snapshot, now.duration_since(last_poll));
                last_poll = now;

                for event in events {
                    if tx.send(event).is_err() {
                        return;
                    }
                }

                Timer::after(interval).await;
            }
        });
    });
}
