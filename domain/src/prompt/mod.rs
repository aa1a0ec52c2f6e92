//! Prompt domain
//!
//! Named templates, the placeholder vocabulary and the renderer that
//! substitutes `$TOKEN`s from a [`PromptContext`].

pub mod context;
pub mod placeholder;
pub mod render;
mod template;

pub use context::{PromptContext, format_transcript};
pub use placeholder::Placeholder;
pub use render::{RenderedPrompt, render};
pub use template::{PromptKind, TemplateSet};
