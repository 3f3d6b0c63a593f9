//! Event suppression: decides whether a captured error is transmitted.
//!
//! [`EventFilter`] runs the inbound filters first (message ignore-list,
//! URL deny-list, URL allow-list) and then the noise predicate in
//! [`noise`]. The first matching rule wins and is reported as a
//! [`DropReason`]. Evaluation is synchronous and never panics.

pub mod noise;
pub mod pattern;

use serde::Serialize;

use crate::config::model::{FilterConfig, NoiseRules};
use crate::error::GatewayError;
use crate::event::{ErrorEvent, EventHint};
use pattern::PatternSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// A candidate message matched the ignore-list.
    IgnoredError,
    /// The source URL matched the deny-list.
    DeniedUrl,
    /// An allow-list is configured and the source URL matched none of it.
    UrlNotAllowed,
    CompilerRecursion,
    EditorExtension,
    SandboxedFrame,
    StackPolyfill,
}

impl DropReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IgnoredError => "ignored_error",
            Self::DeniedUrl => "denied_url",
            Self::UrlNotAllowed => "url_not_allowed",
            Self::CompilerRecursion => "compiler_recursion",
            Self::EditorExtension => "editor_extension",
            Self::SandboxedFrame => "sandboxed_frame",
            Self::StackPolyfill => "stack_polyfill",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Forward,
    Drop(DropReason),
}

impl Verdict {
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        matches!(self, Self::Forward)
    }
}

#[derive(Debug, Clone)]
pub struct EventFilter {
    ignore_errors: PatternSet,
    allow_urls: PatternSet,
    deny_urls: PatternSet,
    noise: NoiseRules,
}

impl Default for EventFilter {
    /// The built-in ignore-list and noise rules, with no URL lists.
    fn default() -> Self {
        match Self::from_config(&FilterConfig::default()) {
            Ok(filter) => filter,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "built-in ignore patterns failed to compile, using noise rules only"
                );
                Self {
                    ignore_errors: PatternSet::default(),
                    allow_urls: PatternSet::default(),
                    deny_urls: PatternSet::default(),
                    noise: NoiseRules::default(),
                }
            }
        }
    }
}

impl EventFilter {
    pub fn from_config(config: &FilterConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            ignore_errors: PatternSet::compile(&config.ignore_errors)?,
            allow_urls: PatternSet::compile(&config.allow_urls)?,
            deny_urls: PatternSet::compile(&config.deny_urls)?,
            noise: config.noise.clone(),
        })
    }

    #[must_use]
    pub fn decide(&self, event: &ErrorEvent, hint: &EventHint) -> Verdict {
        match self.inbound(event, hint).or_else(|| noise::classify(&self.noise, event, hint)) {
            Some(reason) => Verdict::Drop(reason),
            None => Verdict::Forward,
        }
    }

    /// Returns the event unchanged when it should be sent, `None` to drop it.
    #[must_use]
    pub fn before_send(&self, event: ErrorEvent, hint: &EventHint) -> Option<ErrorEvent> {
        self.decide(&event, hint).is_forward().then_some(event)
    }

    fn inbound(&self, event: &ErrorEvent, hint: &EventHint) -> Option<DropReason> {
        if self.is_ignored(event, hint) {
            return Some(DropReason::IgnoredError);
        }

        let url = event.source_url()?;
        if self.deny_urls.is_match(url) {
            return Some(DropReason::DeniedUrl);
        }
        if !self.allow_urls.is_empty() && !self.allow_urls.is_match(url) {
            return Some(DropReason::UrlNotAllowed);
        }
        None
    }

    fn is_ignored(&self, event: &ErrorEvent, hint: &EventHint) -> bool {
        if self.ignore_errors.is_empty() {
            return false;
        }

        let mut candidates = Vec::with_capacity(4);
        let message = noise::error_message(event, hint);
        if !message.is_empty() {
            candidates.push(message);
        }
        if let Some(ref m) = event.message {
            candidates.push(m.clone());
        }
        if let Some(value) = event.first_exception().and_then(|e| e.value.as_deref()) {
            candidates.push(value.to_string());
            if let Some(ty) = event.first_exception().and_then(|e| e.ty.as_deref()) {
                candidates.push(format!("{ty}: {value}"));
            }
        }

        candidates
            .iter()
            .any(|c| self.ignore_errors.is_match(c))
    }
}
