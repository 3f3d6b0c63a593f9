//! `reportgate check` — check a configuration file for errors.
//!
//! Parses and validates the config file, reporting results in either
//! human-readable text or machine-readable JSON format.

use std::path::Path;

use crate::cli::{CheckArgs, OutputFormat};
use crate::config::model::Config;
use crate::config::parse_config_str;
use crate::config::validation;
use crate::error::{GatewayError, ValidationError};

pub fn execute(args: &CheckArgs) -> Result<(), GatewayError> {
    match inspect(&args.config) {
        Ok(config) => {
            println!("{}", render_valid(&args.config, &config, &args.format));
            Ok(())
        }
        Err(GatewayError::ConfigValidation { errors }) => {
            let rendered = render_invalid(&args.config, &errors, &args.format);
            match args.format {
                OutputFormat::Text => eprintln!("{rendered}"),
                OutputFormat::Json => println!("{rendered}"),
            }
            Err(GatewayError::ConfigValidation { errors })
        }
        Err(e) => Err(e),
    }
}

/// Parses and validates `path`, returning the config when it is usable.
pub fn inspect(path: &Path) -> Result<Config, GatewayError> {
    if !path.exists() {
        return Err(GatewayError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    validation::validate(&config).map_err(|errors| GatewayError::ConfigValidation { errors })?;
    Ok(config)
}

#[must_use]
pub fn render_valid(path: &Path, config: &Config, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "\u{2713} {}",
            validation::format_validation_report(&path.display().to_string(), config)
        ),
        OutputFormat::Json => serde_json::json!({
            "valid": true,
            "release": config.release(),
            "ignore_errors": config.filter.ignore_errors.len(),
            "allow_urls": config.filter.allow_urls.len(),
            "deny_urls": config.filter.deny_urls.len(),
        })
        .to_string(),
    }
}

#[must_use]
pub fn render_invalid(path: &Path, errors: &[ValidationError], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = format!("\u{2717} {} has {} errors\n", path.display(), errors.len());
            for error in errors {
                out.push('\n');
                out.push_str(&error.to_string());
            }
            out
        }
        OutputFormat::Json => {
            let json_errors: Vec<serde_json::Value> = errors
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "section": e.section,
                        "field": e.field,
                        "message": e.message,
                        "suggestion": e.suggestion,
                    })
                })
                .collect();
            serde_json::json!({
                "valid": false,
                "errors": json_errors,
            })
            .to_string()
        }
    }
}
