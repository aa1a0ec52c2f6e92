//! Reasoning-marker inspection and repair
//!
//! Some backends stream a private reasoning trace bracketed by an open and a
//! close marker. A truncated stream leaves the open marker dangling; some
//! backends strip the open marker and emit only the close one.

/// Body some backends emit when no reasoning was produced
const UNDEFINED_BODY: &str = "undefined";

/// State of the marker pair in a raw output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    NoMarkers,
    Balanced,
    /// Open marker without close: the output was cut off mid-reasoning
    MissingClose,
    /// Close marker without open: repairable by prepending an open marker
    MissingOpen,
}

/// Open/close marker pair bracketing private reasoning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningMarkers {
    pub open: String,
    pub close: String,
}

impl Default for ReasoningMarkers {
    fn default() -> Self {
        Self::new("<think>", "</think>")
    }
}

impl ReasoningMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Classify the marker layout of `text`.
    ///
    /// A close marker ahead of the first open marker reads as `MissingOpen`.
    /// Otherwise any open marker with no close after it reads as
    /// `MissingClose`, even when complete pairs precede it.
    pub fn inspect(&self, text: &str) -> MarkerState {
        let first_open = text.find(&self.open);
        let first_close = text.find(&self.close);
        match (first_open, first_close) {
            (None, None) => MarkerState::NoMarkers,
            (None, Some(_)) => MarkerState::MissingOpen,
            (Some(open), Some(close)) if close < open => MarkerState::MissingOpen,
            (Some(_), _) if self.unterminated_at(text).is_some() => MarkerState::MissingClose,
            (Some(_), _) => MarkerState::Balanced,
        }
    }

    /// Prepend a synthetic open marker.
    pub fn repair_missing_open(&self, text: &str) -> String {
        format!("{}{}", self.open, text)
    }

    /// Remove every complete `open ... close` span and trim the remainder.
    /// A dangling open marker with no close after it is left untouched.
    pub fn strip(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in self.spans(text) {
            out.push_str(&text[cursor..span.start]);
            cursor = span.end;
        }
        out.push_str(&text[cursor..]);
        out.trim().to_string()
    }

    /// Whether `text` carries at least one complete pair with a real body.
    /// A pair wrapping only the `undefined` placeholder does not count.
    pub fn has_reasoning(&self, text: &str) -> bool {
        self.spans(text)
            .iter()
            .any(|span| text[span.body.clone()].trim() != UNDEFINED_BODY)
    }

    /// Remove placeholder pairs (`open undefined close`) only.
    pub fn strip_undefined(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in self.spans(text) {
            if text[span.body.clone()].trim() == UNDEFINED_BODY {
                out.push_str(&text[cursor..span.start]);
                cursor = span.end;
            }
        }
        out.push_str(&text[cursor..]);
        out
    }

    /// Cut `text` at the first open marker that has no close after it.
    pub fn truncate_unterminated(&self, text: &str) -> String {
        match self.unterminated_at(text) {
            Some(start) => text[..start].to_string(),
            None => text.to_string(),
        }
    }

    /// Byte offset of the first open marker with no close after it.
    fn unterminated_at(&self, text: &str) -> Option<usize> {
        let mut search_from = 0;
        while let Some(rel) = text[search_from..].find(&self.open) {
            let start = search_from + rel;
            let body_start = start + self.open.len();
            match text[body_start..].find(&self.close) {
                Some(close_rel) => search_from = body_start + close_rel + self.close.len(),
                None => return Some(start),
            }
        }
        None
    }

    fn spans(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut search_from = 0;
        while let Some(rel) = text[search_from..].find(&self.open) {
            let start = search_from + rel;
            let body_start = start + self.open.len();
            let Some(close_rel) = text[body_start..].find(&self.close) else {
                break;
            };
            let body_end = body_start + close_rel;
            let end = body_end + self.close.len();
            spans.push(Span {
                start,
                body: body_start..body_end,
                end,
            });
            search_from = end;
        }
        spans
    }
}

struct Span {
    start: usize,
    body: std::ops::Range<usize>,
    end: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> ReasoningMarkers {
        ReasoningMarkers::default()
    }

    #[test]
    fn test_inspect_states() {
        let m = markers();
        assert_eq!(m.inspect("plain"), MarkerState::NoMarkers);
        assert_eq!(m.inspect("<think>a</think>b"), MarkerState::Balanced);
        assert_eq!(m.inspect("<think>partial"), MarkerState::MissingClose);
        assert_eq!(m.inspect("reason</think>answer"), MarkerState::MissingOpen);
    }

    #[test]
    fn test_inspect_dangling_open_after_complete_pair() {
        let m = markers();
        assert_eq!(
            m.inspect("a<think>b</think>c<think>dangling"),
            MarkerState::MissingClose
        );
        assert_eq!(
            m.inspect("<think>a</think>b<think>c</think>"),
            MarkerState::Balanced
        );
    }

    #[test]
    fn test_inspect_close_before_first_open() {
        let m = markers();
        assert_eq!(m.inspect("x</think>y<think>z"), MarkerState::MissingOpen);
        let repaired = m.repair_missing_open("x</think>y<think>z");
        assert_eq!(m.inspect(&repaired), MarkerState::MissingClose);
    }

    #[test]
    fn test_repair_then_strip() {
        let m = markers();
        let repaired = m.repair_missing_open("reason</think> answer");
        assert_eq!(m.inspect(&repaired), MarkerState::Balanced);
        assert_eq!(m.strip(&repaired), "answer");
    }

    #[test]
    fn test_strip_trailing_span() {
        assert_eq!(markers().strip("done<think>reason</think>"), "done");
    }

    #[test]
    fn test_strip_multiple_spans() {
        let text = "<think>a</think>one <think>b</think>two";
        assert_eq!(markers().strip(text), "one two");
    }

    #[test]
    fn test_has_reasoning_ignores_undefined_body() {
        let m = markers();
        assert!(m.has_reasoning("<think>plan</think>ok"));
        assert!(!m.has_reasoning("<think>\nundefined</think>ok"));
        assert!(!m.has_reasoning("no markers"));
        assert!(m.has_reasoning("<think></think>empty body still counts"));
    }

    #[test]
    fn test_strip_undefined_keeps_real_reasoning() {
        let m = markers();
        let text = "<think>\nundefined</think>hi <think>real</think>";
        assert_eq!(m.strip_undefined(text), "hi <think>real</think>");
    }

    #[test]
    fn test_truncate_unterminated() {
        let m = markers();
        assert_eq!(m.truncate_unterminated("answer <think>cut off"), "answer ");
        assert_eq!(
            m.truncate_unterminated("<think>a</think>b <think>c"),
            "<think>a</think>b "
        );
        assert_eq!(m.truncate_unterminated("fine"), "fine");
    }
}
