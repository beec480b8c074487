//! Validation helpers for configuration values.

use fintrack_api_models::normalize_currency;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Parse the backend origin; only `http` and `https` with a host are accepted.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for unparsable URLs, other schemes,
/// or URLs without a host.
pub fn parse_base_url(value: &str) -> ConfigResult<Url> {
    let invalid = |reason| ConfigError::InvalidField {
        section: "api",
        field: "base_url",
        value: Some(value.to_string()),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|_| invalid("must be an absolute URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("must include a host"));
    }
    Ok(url)
}

/// Upper-case a currency code and require three ASCII letters, using the
/// same rule as the profile and registration forms.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the code is malformed.
pub fn validate_currency(value: &str) -> ConfigResult<String> {
    normalize_currency(value).map_err(|_| ConfigError::InvalidField {
        section: "presentation",
        field: "default_currency",
        value: Some(value.to_string()),
        reason: "must be a three-letter currency code",
    })
}

/// Require a non-empty palette without blank entries.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for an empty palette or blank colour.
pub fn validate_palette(palette: Vec<String>) -> ConfigResult<Vec<String>> {
    if palette.is_empty() {
        return Err(ConfigError::InvalidField {
            section: "presentation",
            field: "chart_palette",
            value: None,
            reason: "must contain at least one colour",
        });
    }
    if let Some(blank) = palette.iter().find(|colour| colour.trim().is_empty()) {
        return Err(ConfigError::InvalidField {
            section: "presentation",
            field: "chart_palette",
            value: Some(blank.clone()),
            reason: "colours cannot be blank",
        });
    }
    Ok(palette)
}

/// Require a non-blank log filter directive.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for a blank level.
pub fn validate_level(value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidField {
            section: "logging",
            field: "level",
            value: Some(value.to_string()),
            reason: "cannot be empty",
        });
    }
    Ok(trimmed.to_string())
}
