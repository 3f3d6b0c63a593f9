//! Backend-neutral error event, hint, and breadcrumb types.
//!
//! These are the values the suppression filter inspects and the gateway
//! relays. They deserialize from JSON so reports produced elsewhere (an
//! embedded frontend, the `reportgate filter` command) can be fed in as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A captured error as seen by the filter.
///
/// `exceptions` is ordered most-recent first: index 0 is the top-level
/// raised error, later entries are its causes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<ExceptionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExceptionRecord {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Stack frames, oldest call first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<StackFrame>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<Mechanism>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StackFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Mechanism {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handled: Option<bool>,
}

/// Side information about how an event was raised.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EventHint {
    /// The value originally thrown: a string, an object with `message`,
    /// or an object wrapping a nested `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_exception: Option<Value>,
}

impl EventHint {
    #[must_use]
    pub fn with_original(original: impl Into<Value>) -> Self {
        Self {
            original_exception: Some(original.into()),
        }
    }
}

/// An event plus its hint, the shape `reportgate filter` reads from disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorReport {
    #[serde(default)]
    pub event: ErrorEvent,

    #[serde(default)]
    pub hint: EventHint,
}

impl ErrorEvent {
    #[must_use]
    pub fn first_exception(&self) -> Option<&ExceptionRecord> {
        self.exceptions.first()
    }

    /// Filename of the first frame of the first exception.
    #[must_use]
    pub fn origin_filename(&self) -> Option<&str> {
        self.first_exception()?
            .frames
            .first()?
            .filename
            .as_deref()
    }

    /// Filename of the innermost frame of the first exception, used for
    /// URL allow/deny matching.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.first_exception()?.frames.last()?.filename.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Fatal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Breadcrumb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub level: Level,
}

impl Breadcrumb {
    #[must_use]
    pub fn new(category: impl Into<String>, message: impl Into<String>, level: Level) -> Self {
        Self {
            category: Some(category.into()),
            message: Some(message.into()),
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_parses_with_defaults() {
        let report: ErrorReport =
            serde_json::from_str(r#"{"event": {"message": "boom"}}"#).unwrap();
        assert_eq!(report.event.message.as_deref(), Some("boom"));
        assert!(report.hint.original_exception.is_none());
    }

    #[test]
    fn origin_and_source_url_use_opposite_ends_of_the_stack() {
        let event = ErrorEvent {
            message: None,
            exceptions: vec![ExceptionRecord {
                frames: vec![
                    StackFrame {
                        filename: Some("/outer.js".into()),
                    },
                    StackFrame {
                        filename: Some("/inner.js".into()),
                    },
                ],
                ..Default::default()
            }],
        };
        assert_eq!(event.origin_filename(), Some("/outer.js"));
        assert_eq!(event.source_url(), Some("/inner.js"));
    }

    #[test]
    fn empty_event_has_no_filenames() {
        let event = ErrorEvent::default();
        assert_eq!(event.origin_filename(), None);
        assert_eq!(event.source_url(), None);
    }

    #[test]
    fn exception_type_uses_type_key() {
        let record: ExceptionRecord =
            serde_json::from_str(r#"{"type": "TypeError", "value": "x is undefined"}"#).unwrap();
        assert_eq!(record.ty.as_deref(), Some("TypeError"));
    }
}
