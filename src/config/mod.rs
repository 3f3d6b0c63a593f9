//! Configuration loading and validation.
//!
//! [`load`] reads a config file asynchronously, picks the format from the
//! extension via [`parse_config_str`], and validates the result.
//! Submodules provide the data model and validation logic.

pub mod model;
pub mod validation;

use std::path::Path;

use crate::error::GatewayError;
use model::Config;

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, GatewayError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| GatewayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| GatewayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| GatewayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(GatewayError::UnsupportedFormat(other.to_string())),
    }
}

/// Read, parse, and validate a config file.
pub async fn load(path: &Path) -> Result<Config, GatewayError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GatewayError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            GatewayError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        return Err(GatewayError::ConfigValidation { errors });
    }

    tracing::debug!(
        path = %path.display(),
        patterns = config.filter.pattern_count(),
        "config loaded"
    );
    Ok(config)
}

/// Load `path` when given, otherwise fall back to the built-in defaults.
pub async fn load_or_default(path: Option<&Path>) -> Result<Config, GatewayError> {
    match path {
        Some(path) => load(path).await,
        None => Ok(Config::default()),
    }
}
