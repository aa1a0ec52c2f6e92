//! Dataset domain: categories, record filtering, the CSV codec and the
//! transforms used when exporting training data.

pub mod category;
pub mod codec;
pub mod export;
pub mod filter;

pub use category::{IMAGE_DIR, LogCategory};
pub use export::{Conversation, ShareGptMessage, Speaker, VisionExample};
pub use filter::{DatasetLogFlags, RecordDecision, SkipReason, decide_text, decide_vision};
