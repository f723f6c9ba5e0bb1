use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{info, trace};

use crate::display::{DisplayError, DisplaySink};
use crate::session::{PlayerEvent, Session};

/// Fixed-rate tick schedule that does not drift with handler run time.
pub struct TickClock {
    interval: Duration,
    next: Instant,
}

impl TickClock {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// Time left until the next tick is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Number of ticks due at `now`; advances the schedule past them.
    ///
    /// After a long stall only one tick is reported and the schedule restarts
    /// from `now`, so the display does not race to catch up.
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = now.duration_since(self.next);
        if behind >= self.interval * 4 {
            self.next = now + self.interval;
            return 1;
        }
        let mut ticks = 0;
        while self.next <= now {
            self.next += self.interval;
            ticks += 1;
        }
        ticks
    }
}

/// Deliver player events and ticks to `session` until the event source goes
/// away or the display fails.
pub fn run<S: DisplaySink>(
    session: &mut Session<S>,
    events: &Receiver<PlayerEvent>,
    tick_interval: Duration,
) -> Result<(), DisplayError> {
    let mut clock = TickClock::new(tick_interval, Instant::now());

    loop {
        match events.recv_timeout(clock.until_next(Instant::now())) {
            Ok(event) => {
                trace!(?event, "player event");
                session.handle(event)?;
                // Drain whatever else arrived before ticking.
                while let Ok(event) = events.try_recv() {
                    trace!(?event, "player event");
                    session.handle(event)?;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("player follower stopped");
                return Ok(());
            }
        }

        for _ in 0..clock.due(Instant::now()) {
            session.on_tick()?;
        }
    }
}
