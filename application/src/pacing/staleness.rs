//! Staleness clock
//!
//! Every inbound message advances the clock. A call captures a
//! [`StalenessMark`] when it starts and checks it after each suspension
//! point; if a newer message arrived meanwhile, the result is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct MessageClock {
    latest: AtomicU64,
}

impl MessageClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new inbound message and return its sequence number.
    pub fn advance(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn mark(self: &Arc<Self>) -> StalenessMark {
        StalenessMark {
            clock: Some(self.clone()),
            seen: self.current(),
        }
    }
}

/// Snapshot of the clock taken at call start
#[derive(Debug, Clone)]
pub struct StalenessMark {
    clock: Option<Arc<MessageClock>>,
    seen: u64,
}

impl StalenessMark {
    /// A mark that never goes stale.
    pub fn never() -> Self {
        Self {
            clock: None,
            seen: 0,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.clock
            .as_ref()
            .is_some_and(|clock| clock.current() != self.seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_goes_stale_on_new_message() {
        let clock = Arc::new(MessageClock::new());
        clock.advance();
        let mark = clock.mark();
        assert!(!mark.is_stale());
        clock.advance();
        assert!(mark.is_stale());
    }

    #[test]
    fn test_never_mark() {
        let mark = StalenessMark::never();
        assert!(!mark.is_stale());
    }
}
