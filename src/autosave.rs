//! Debounced note saving.
//!
//! Each edit re-arms a single delayed task. When it fires it posts
//! [`Event::AutoSaveDue`] with the ticket it was armed with; only the most
//! recent ticket is honoured. After a save the "saving" indicator stays on
//! for at least the configured indicator duration.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::event::Event;

/// Default debounce between the last edit and the save.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);
/// Default minimum time the saving indicator is shown.
pub const DEFAULT_INDICATOR: Duration = Duration::from_millis(500);

pub struct AutoSave {
    delay: Duration,
    indicator: Duration,
    tx: UnboundedSender<Event>,
    pending: Option<JoinHandle<()>>,
    ticket: u64,
    saving_since: Option<Instant>,
    pub last_saved: Option<DateTime<Local>>,
}

impl AutoSave {
    pub fn new(delay: Duration, indicator: Duration, tx: UnboundedSender<Event>) -> Self {
        Self {
            delay,
            indicator,
            tx,
            pending: None,
            ticket: 0,
            saving_since: None,
            last_saved: None,
        }
    }

    /// Start or restart the debounce timer, replacing any pending one.
    pub fn arm(&mut self) -> u64 {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.ticket += 1;
        let ticket = self.ticket;
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::AutoSaveDue(ticket));
        }));
        ticket
    }

    /// Consume a due ticket. Returns true only for the latest armed timer.
    pub fn take_due(&mut self, ticket: u64) -> bool {
        if ticket != self.ticket || self.pending.is_none() {
            tracing::debug!(ticket, current = self.ticket, "stale autosave ignored");
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending save, e.g. when another note is opened.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Record a completed save and start the indicator.
    pub fn mark_saved(&mut self) {
        self.saving_since = Some(Instant::now());
        self.last_saved = Some(Local::now());
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving_at(Instant::now())
    }

    pub fn is_saving_at(&self, now: Instant) -> bool {
        self.saving_since
            .is_some_and(|since| now.saturating_duration_since(since) < self.indicator)
    }
}

impl Drop for AutoSave {
    fn drop(&mut self) {
        self.cancel();
    }
}
