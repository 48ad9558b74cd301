use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_secs(5);

/// One-shot success message: hidden -> shown -> hidden.
///
/// Reads after the deadline clear the message, so it cannot come back
/// without a new [`Flash::show`].
#[derive(Debug)]
pub struct Flash {
    ttl: Duration,
    shown: Option<(String, Instant)>,
}

impl Flash {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, shown: None }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        let deadline = Instant::now() + self.ttl;
        self.shown = Some((message.into(), deadline));
    }

    pub fn current(&mut self) -> Option<&str> {
        let expired = matches!(&self.shown, Some((_, deadline)) if Instant::now() >= *deadline);
        if expired {
            debug!("Flash message expired");
            self.shown = None;
        }
        self.shown.as_ref().map(|(message, _)| message.as_str())
    }
}

impl Default for Flash {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH_DURATION)
    }
}
