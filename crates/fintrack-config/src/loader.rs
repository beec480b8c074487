//! JSON file loading with defaults and command-line overrides.
//!
//! Resolution order, lowest to highest precedence: built-in defaults, the
//! optional config file, then [`ConfigOverrides`] supplied by the caller.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::defaults::{self, DEFAULT_API_BASE_URL, DEFAULT_CURRENCY, DEFAULT_LOG_LEVEL};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    ApiSettings, ClientConfig, LogFormatSetting, LoggingSettings, PresentationSettings,
};
use crate::validate::{parse_base_url, validate_currency, validate_level, validate_palette};

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `api.base_url`.
    pub api_url: Option<String>,
    /// Replaces `logging.level`.
    pub log_level: Option<String>,
    /// Replaces `logging.format`.
    pub log_format: Option<LogFormatSetting>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigDocument {
    api: ApiSection,
    presentation: PresentationSection,
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ApiSection {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PresentationSection {
    default_currency: Option<String>,
    chart_palette: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingSection {
    level: Option<String>,
    format: Option<LogFormatSetting>,
}

/// Load the client configuration.
///
/// A missing `path` means "defaults only"; a path that does not exist is an
/// error because the caller asked for it explicitly.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read,
/// [`ConfigError::Parse`] for malformed JSON or unknown keys, and
/// [`ConfigError::InvalidField`] when a resolved value fails validation.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> ConfigResult<ClientConfig> {
    let document = match path {
        Some(path) => read_document(path)?,
        None => ConfigDocument::default(),
    };
    resolve(document, overrides)
}

fn read_document(path: &Path) -> ConfigResult<ConfigDocument> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "read_config",
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(document)
}

fn resolve(document: ConfigDocument, overrides: &ConfigOverrides) -> ConfigResult<ClientConfig> {
    let base_url = overrides
        .api_url
        .as_deref()
        .or(document.api.base_url.as_deref())
        .unwrap_or(DEFAULT_API_BASE_URL);

    let currency = document
        .presentation
        .default_currency
        .as_deref()
        .unwrap_or(DEFAULT_CURRENCY);

    let palette = document
        .presentation
        .chart_palette
        .unwrap_or_else(defaults::chart_palette);

    let level = overrides
        .log_level
        .as_deref()
        .or(document.logging.level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let format = overrides
        .log_format
        .or(document.logging.format)
        .unwrap_or_default();

    Ok(ClientConfig {
        api: ApiSettings {
            base_url: parse_base_url(base_url)?,
        },
        presentation: PresentationSettings {
            default_currency: validate_currency(currency)?,
            chart_palette: validate_palette(palette)?,
        },
        logging: LoggingSettings {
            level: validate_level(level)?,
            format,
        },
    })
}
