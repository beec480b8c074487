//! Typed configuration sections.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Fully resolved and validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Backend connection settings.
    pub api: ApiSettings,
    /// Display fallbacks.
    pub presentation: PresentationSettings,
    /// Logging settings handed to the telemetry crate.
    pub logging: LoggingSettings,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiSettings {
    /// Origin every request path is appended to.
    pub base_url: Url,
}

/// Presentation fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationSettings {
    /// Currency used when the session has none.
    pub default_currency: String,
    /// Chart colours used while the segment count fits.
    pub chart_palette: Vec<String>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is absent.
    pub level: String,
    /// Output format.
    pub format: LogFormatSetting,
}

/// Log output format selectable from config or flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormatSetting {
    /// Config-file spelling of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl Display for LogFormatSetting {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormatSetting {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}
