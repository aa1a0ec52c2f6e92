//! Call pacing: the cadence throttle and the staleness clock.

pub mod staleness;
pub mod throttle;

pub use staleness::{MessageClock, StalenessMark};
pub use throttle::CadenceThrottle;
