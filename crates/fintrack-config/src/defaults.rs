//! Built-in configuration values.
//!
//! # Design
//! - Presentation fallbacks (currency, chart palette) are configuration, not
//!   constants baked into the renderers.
//! - Every default here is what an empty config file resolves to.

/// Backend origin used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
/// Currency used for formatting when the session carries none.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Palette used for chart segments while the segment count fits.
pub const DEFAULT_CHART_PALETTE: [&str; 9] = [
    "rgba(54, 162, 235, 0.6)",
    "rgba(255, 99, 132, 0.6)",
    "rgba(255, 206, 86, 0.6)",
    "rgba(75, 192, 192, 0.6)",
    "rgba(153, 102, 255, 0.6)",
    "rgba(255, 159, 64, 0.6)",
    "rgba(101, 176, 109, 0.6)",
    "rgba(230, 126, 34, 0.6)",
    "rgba(41, 128, 185, 0.6)",
];

/// Owned copy of [`DEFAULT_CHART_PALETTE`].
#[must_use]
pub fn chart_palette() -> Vec<String> {
    DEFAULT_CHART_PALETTE
        .iter()
        .map(|colour| (*colour).to_string())
        .collect()
}
