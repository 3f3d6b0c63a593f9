//! The per-event suppression predicate.
//!
//! Recognises error signatures that are known to be noise for an editor
//! hosting sandboxed user code: stack overflows in the nested compiler
//! worker, errors thrown from dynamically loaded editor extensions,
//! wrapped non-`Error` values bubbling out of a sandbox frame, and an
//! error-polyfill artifact on one browser engine.

use serde_json::Value;

use super::DropReason;
use crate::config::model::NoiseRules;
use crate::event::{ErrorEvent, EventHint};

/// Returns the rule that drops `event`, or `None` to forward it.
#[must_use]
pub fn classify(rules: &NoiseRules, event: &ErrorEvent, hint: &EventHint) -> Option<DropReason> {
    let message = error_message(event, hint);

    if let Some(filename) = event.origin_filename().filter(|f| !f.is_empty()) {
        if filename.contains(rules.compiler_worker.as_str())
            && message.contains(rules.recursion_phrase.as_str())
        {
            return Some(DropReason::CompilerRecursion);
        }

        if filename.ends_with(rules.editor_bundle.as_str())
            || filename.starts_with(rules.extensions_prefix.as_str())
        {
            return Some(DropReason::EditorExtension);
        }
    }

    let handled = event
        .first_exception()
        .and_then(|e| e.mechanism.as_ref())
        .and_then(|m| m.handled)
        .unwrap_or(false);

    if wraps_nested_error(hint) && message.starts_with(rules.non_error_prefix.as_str()) && handled
    {
        return Some(DropReason::SandboxedFrame);
    }

    if message.contains(rules.unexpected_frame_phrase.as_str()) {
        return Some(DropReason::StackPolyfill);
    }

    None
}

/// The text the predicate matches against.
///
/// A string original wins outright. Otherwise a truthy `message` on an
/// object original, then the first exception's value. Anything that is
/// not text collapses to `""`.
#[must_use]
pub fn error_message(event: &ErrorEvent, hint: &EventHint) -> String {
    let from_original = match hint.original_exception.as_ref() {
        Some(Value::String(s)) => return s.clone(),
        Some(Value::Object(map)) => map.get("message").filter(|v| is_truthy(v)),
        _ => None,
    };

    match from_original {
        Some(Value::String(s)) => s.clone(),
        Some(_) => String::new(),
        None => event
            .first_exception()
            .and_then(|e| e.value.clone())
            .unwrap_or_default(),
    }
}

fn wraps_nested_error(hint: &EventHint) -> bool {
    match hint.original_exception.as_ref() {
        Some(Value::Object(map)) => map.get("error").is_some_and(is_truthy),
        _ => false,
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
