//! Pre-write filtering for dataset records

use super::category::LogCategory;
use crate::core::messages::is_failure_placeholder;
use crate::inference::ReasoningMarkers;
use serde::{Deserialize, Serialize};

/// Per-category enable flags. Everything is off unless configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetLogFlags {
    pub normal: bool,
    pub reasoning: bool,
    pub vision: bool,
}

impl DatasetLogFlags {
    pub fn all() -> Self {
        Self {
            normal: true,
            reasoning: true,
            vision: true,
        }
    }

    pub fn is_enabled(&self, category: LogCategory) -> bool {
        match category {
            LogCategory::Normal => self.normal,
            LogCategory::Reasoning => self.reasoning,
            LogCategory::Vision => self.vision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty, echoed or placeholder content
    Empty,
    /// The target category is switched off
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordDecision {
    Write(LogCategory),
    Skip(SkipReason),
}

/// Category a text output belongs to.
pub fn text_category(markers: &ReasoningMarkers, output: &str) -> LogCategory {
    if markers.has_reasoning(output) {
        LogCategory::Reasoning
    } else {
        LogCategory::Normal
    }
}

/// Decide whether and where a text interaction is written.
///
/// Content checks run before the enable flags, so an echoed record counts as
/// an empty skip even when its category is disabled.
pub fn decide_text(
    flags: &DatasetLogFlags,
    markers: &ReasoningMarkers,
    input: &str,
    output: &str,
) -> RecordDecision {
    if input.is_empty() && output.is_empty() {
        return RecordDecision::Skip(SkipReason::Empty);
    }
    if input == output || is_failure_placeholder(output) {
        return RecordDecision::Skip(SkipReason::Empty);
    }
    let category = text_category(markers, output);
    if !flags.is_enabled(category) {
        return RecordDecision::Skip(SkipReason::Disabled);
    }
    RecordDecision::Write(category)
}

/// Decide whether a vision transcript is written.
pub fn decide_vision(flags: &DatasetLogFlags, transcript: &str) -> RecordDecision {
    if transcript.trim().is_empty() || is_failure_placeholder(transcript) {
        return RecordDecision::Skip(SkipReason::Empty);
    }
    if !flags.vision {
        return RecordDecision::Skip(SkipReason::Disabled);
    }
    RecordDecision::Write(LogCategory::Vision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::messages;

    fn decide(flags: DatasetLogFlags, input: &str, output: &str) -> RecordDecision {
        decide_text(&flags, &ReasoningMarkers::default(), input, output)
    }

    #[test]
    fn test_echo_is_empty_skip() {
        assert_eq!(
            decide(DatasetLogFlags::all(), "hello", "hello"),
            RecordDecision::Skip(SkipReason::Empty)
        );
    }

    #[test]
    fn test_both_empty_is_empty_skip() {
        assert_eq!(
            decide(DatasetLogFlags::all(), "", ""),
            RecordDecision::Skip(SkipReason::Empty)
        );
    }

    #[test]
    fn test_placeholder_output_is_empty_skip() {
        assert_eq!(
            decide(DatasetLogFlags::all(), "[]", messages::NETWORK_FAILURE),
            RecordDecision::Skip(SkipReason::Empty)
        );
    }

    #[test]
    fn test_malformed_fallback_is_written() {
        assert_eq!(
            decide(DatasetLogFlags::all(), "[]", messages::MALFORMED_FALLBACK),
            RecordDecision::Write(LogCategory::Normal)
        );
    }

    #[test]
    fn test_reasoning_routing() {
        assert_eq!(
            decide(DatasetLogFlags::all(), "q", "<think>hm</think>a"),
            RecordDecision::Write(LogCategory::Reasoning)
        );
        assert_eq!(
            decide(DatasetLogFlags::all(), "q", "<think>\nundefined</think>a"),
            RecordDecision::Write(LogCategory::Normal)
        );
        assert_eq!(
            decide(DatasetLogFlags::all(), "q", "<think>partial"),
            RecordDecision::Write(LogCategory::Normal)
        );
    }

    #[test]
    fn test_disabled_category() {
        let flags = DatasetLogFlags {
            normal: true,
            reasoning: false,
            vision: false,
        };
        assert_eq!(
            decide(flags, "q", "<think>hm</think>a"),
            RecordDecision::Skip(SkipReason::Disabled)
        );
        assert_eq!(decide(flags, "q", "a"), RecordDecision::Write(LogCategory::Normal));
    }

    #[test]
    fn test_vision_decision() {
        assert_eq!(
            decide_vision(&DatasetLogFlags::all(), "a red cube"),
            RecordDecision::Write(LogCategory::Vision)
        );
        assert_eq!(
            decide_vision(&DatasetLogFlags::default(), "a red cube"),
            RecordDecision::Skip(SkipReason::Disabled)
        );
        assert_eq!(
            decide_vision(&DatasetLogFlags::all(), messages::VISION_UNSUPPORTED),
            RecordDecision::Skip(SkipReason::Empty)
        );
    }
}
