//! Inference domain: canonical error taxonomy, raw backend errors, the rule
//! table classifier and reasoning-marker handling.

pub mod backend_error;
pub mod classifier;
pub mod error_kind;
pub mod reasoning;
pub mod result;

pub use backend_error::{BackendError, ErrorOrigin};
pub use classifier::{ClassifierRule, ErrorClassifier, MessageMatch};
pub use error_kind::ErrorKind;
pub use reasoning::{MarkerState, ReasoningMarkers};
pub use result::InferenceResult;
