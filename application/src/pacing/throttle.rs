//! Cadence throttle

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum spacing between outbound calls of one orchestrator.
///
/// The lock is held across the wait, so concurrent callers are serialized
/// and each one is spaced from the previous dispatch.
#[derive(Debug)]
pub struct CadenceThrottle {
    cooldown: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl CadenceThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_call: Mutex::new(None),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Wait until the cooldown since the previous call has elapsed, then
    /// record this call's dispatch time.
    pub async fn acquire(&self) {
        if self.cooldown.is_zero() {
            return;
        }
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = Instant::now().saturating_duration_since(previous);
            if elapsed < self.cooldown {
                let wait = self.cooldown - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Throttling outbound call");
                tokio::time::sleep(wait).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
