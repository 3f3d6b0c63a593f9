//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for problems the
//! type system cannot catch: empty text patterns (which would match every
//! message), regexes that fail to compile, blank noise-rule phrases, and
//! blank release or environment tags. Returns a list of
//! [`ValidationError`] values with per-field suggestions.

use regex::Regex;

use super::model::{Config, Pattern};
use crate::error::ValidationError;

/// Validate a single pattern. Returns `Ok(())` or a human-readable error.
pub fn validate_pattern(pattern: &Pattern) -> Result<(), String> {
    match pattern {
        Pattern::Text(s) if s.is_empty() => Err("text pattern cannot be empty".into()),
        Pattern::Text(_) => Ok(()),
        Pattern::Regex(s) if s.is_empty() => Err("regex pattern cannot be empty".into()),
        Pattern::Regex(s) => Regex::new(s)
            .map(|_| ())
            .map_err(|e| format!("'{s}' is not a valid regex: {e}")),
    }
}

fn validate_patterns(
    errors: &mut Vec<ValidationError>,
    section: &str,
    patterns: &[Pattern],
) {
    for (i, pattern) in patterns.iter().enumerate() {
        if let Err(msg) = validate_pattern(pattern) {
            let suggestion = match pattern {
                Pattern::Regex(s) if !s.is_empty() => {
                    Some("use `text:` for a literal substring match".to_string())
                }
                _ => None,
            };
            errors.push(ValidationError {
                section: section.into(),
                field: format!("[{i}]"),
                message: msg,
                suggestion,
            });
        }
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.release.as_deref().is_some_and(|r| r.trim().is_empty()) {
        errors.push(ValidationError {
            section: "(root)".into(),
            field: "release".into(),
            message: "release cannot be blank".into(),
            suggestion: Some(format!("omit it to use the built-in '{}'", crate::RELEASE)),
        });
    }

    if config
        .environment
        .as_deref()
        .is_some_and(|e| e.trim().is_empty())
    {
        errors.push(ValidationError {
            section: "(root)".into(),
            field: "environment".into(),
            message: "environment cannot be blank".into(),
            suggestion: None,
        });
    }

    let filter = &config.filter;
    validate_patterns(&mut errors, "filter.ignore_errors", &filter.ignore_errors);
    validate_patterns(&mut errors, "filter.allow_urls", &filter.allow_urls);
    validate_patterns(&mut errors, "filter.deny_urls", &filter.deny_urls);

    for (field, value) in filter.noise.fields() {
        if value.trim().is_empty() {
            errors.push(ValidationError {
                section: "filter.noise".into(),
                field: field.into(),
                message: "phrase cannot be blank".into(),
                suggestion: Some("omit it to use the built-in default".into()),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let filter = &config.filter;
    let mut lines = vec![format!(
        "  {} ignore patterns, {} allowed urls, {} denied urls\n",
        filter.ignore_errors.len(),
        filter.allow_urls.len(),
        filter.deny_urls.len(),
    )];

    lines.push(format!("  release: {}", config.release()));
    if let Some(ref env) = config.environment {
        lines.push(format!("  environment: {env}"));
    }
    for pattern in &filter.allow_urls {
        lines.push(format!("  allow {pattern}"));
    }
    for pattern in &filter.deny_urls {
        lines.push(format!("  deny  {pattern}"));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{FilterConfig, NoiseRules};

    #[test]
    fn default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn empty_text_pattern_fails() {
        let config = Config {
            filter: FilterConfig {
                ignore_errors: vec![Pattern::text("")],
                ..FilterConfig::default()
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].section, "filter.ignore_errors");
        assert!(errors[0].message.contains("cannot be empty"));
    }

    #[test]
    fn broken_regex_fails_with_suggestion() {
        let config = Config {
            filter: FilterConfig {
                deny_urls: vec![Pattern::regex("editor.main.js("), Pattern::text("ok")],
                ..FilterConfig::default()
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "[0]");
        assert!(errors[0].message.contains("not a valid regex"));
        assert!(errors[0].suggestion.is_some());
    }

    #[test]
    fn blank_noise_phrase_fails() {
        let config = Config {
            filter: FilterConfig {
                noise: NoiseRules {
                    recursion_phrase: "  ".into(),
                    ..NoiseRules::default()
                },
                ..FilterConfig::default()
            },
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "recursion_phrase"));
    }

    #[test]
    fn blank_release_fails() {
        let config = Config {
            release: Some(String::new()),
            environment: Some(" ".into()),
            ..Config::default()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn report_lists_url_patterns() {
        let config = Config {
            filter: FilterConfig {
                allow_urls: vec![Pattern::regex(r"^https://app\.example\.io")],
                ..FilterConfig::default()
            },
            ..Config::default()
        };
        let report = format_validation_report("gateway.yaml", &config);
        assert!(report.starts_with("gateway.yaml is valid"));
        assert!(report.contains(r"allow /^https://app\.example\.io/"));
    }
}
