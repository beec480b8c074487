//! Presentation helpers: money formatting and chart colours.

use numfmt::{Formatter, Precision};
use rand::Rng;

const GENERATED_ALPHA: &str = "0.6";

/// Format `amount` as `CCY 1,234.50`, with a leading minus for negatives.
#[must_use]
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let rounded = (amount * 100.0).round() / 100.0;
    if !rounded.is_finite() {
        return format!("{code} {amount}");
    }
    // numfmt renders zero as a bare "0", and a rounded -0.001 must not keep its sign
    if rounded.abs() < f64::EPSILON {
        return format!("{code} 0.00");
    }

    let prefix = if rounded < 0.0 {
        format!("-{code} ")
    } else {
        format!("{code} ")
    };
    Formatter::currency(&prefix).map_or_else(
        |_| format!("{prefix}{:.2}", rounded.abs()),
        |formatter| {
            let formatted = formatter
                .precision(Precision::Decimals(2))
                .fmt_string(rounded.abs());
            pad_cents(formatted, &prefix)
        },
    )
}

/// numfmt drops trailing zeros ("12.3", "12"), so restore both cent digits.
fn pad_cents(mut formatted: String, prefix: &str) -> String {
    let fraction_len = formatted
        .strip_prefix(prefix)
        .and_then(|digits| digits.split_once('.'))
        .map(|(_, fraction)| fraction.len());
    match fraction_len {
        None => formatted.push_str(".00"),
        Some(1) => formatted.push('0'),
        Some(_) => {}
    }
    formatted
}

/// Fill colours for `count` chart slices.
///
/// Uses the palette prefix while it is long enough, otherwise spreads
/// generated hues evenly around the wheel starting at `base_hue`.
#[must_use]
pub fn chart_colors(count: usize, palette: &[String], base_hue: f64) -> Vec<String> {
    if count <= palette.len() {
        return palette[..count].to_vec();
    }
    let step = 360.0 / count_to_f64(count + 1);
    (0..count)
        .map(|idx| {
            let hue = (base_hue + count_to_f64(idx) * step).rem_euclid(360.0);
            format!("hsla({hue:.0}, 70%, 60%, {GENERATED_ALPHA})")
        })
        .collect()
}

/// Random starting hue for [`chart_colors`].
#[must_use]
pub fn random_base_hue() -> f64 {
    rand::rng().random_range(0.0..360.0)
}

/// Opaque variant of a fill colour, used for slice borders.
#[must_use]
pub fn border_color(fill: &str) -> String {
    let suffix = format!(", {GENERATED_ALPHA})");
    match fill.strip_suffix(&suffix) {
        Some(head) => format!("{head}, 1)"),
        None => fill.to_string(),
    }
}

fn count_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<String> {
        vec![
            "rgba(255, 99, 132, 0.6)".to_string(),
            "rgba(54, 162, 235, 0.6)".to_string(),
        ]
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(1234.5, "usd"), "USD 1,234.50");
        assert_eq!(format_currency(1_234_567.891, "USD"), "USD 1,234,567.89");
        assert_eq!(format_currency(999.999, "USD"), "USD 1,000.00");
        assert_eq!(format_currency(0.0, "GBP"), "GBP 0.00");
    }

    #[test]
    fn currency_keeps_both_cent_digits() {
        assert_eq!(format_currency(12.3, "USD"), "USD 12.30");
        assert_eq!(format_currency(12.0, "USD"), "USD 12.00");
        assert_eq!(format_currency(-1500.0, "EUR"), "-EUR 1,500.00");
        assert_eq!(format_currency(0.07, "EUR"), "EUR 0.07");
    }

    #[test]
    fn currency_sign_precedes_code() {
        assert_eq!(format_currency(-12.0, "EUR"), "-EUR 12.00");
        assert_eq!(format_currency(-0.001, "EUR"), "EUR 0.00");
    }

    #[test]
    fn palette_prefix_when_long_enough() {
        assert_eq!(chart_colors(1, &palette(), 0.0), vec![palette()[0].clone()]);
        assert!(chart_colors(0, &palette(), 0.0).is_empty());
    }

    #[test]
    fn generated_hues_are_evenly_spaced() {
        let colors = chart_colors(3, &palette(), 350.0);
        assert_eq!(
            colors,
            vec![
                "hsla(350, 70%, 60%, 0.6)",
                "hsla(80, 70%, 60%, 0.6)",
                "hsla(170, 70%, 60%, 0.6)",
            ]
        );
    }

    #[test]
    fn border_is_opaque() {
        assert_eq!(border_color("hsla(80, 70%, 60%, 0.6)"), "hsla(80, 70%, 60%, 1)");
        assert_eq!(border_color("rgba(54, 162, 235, 0.6)"), "rgba(54, 162, 235, 1)");
        assert_eq!(border_color("#fff"), "#fff");
    }

    #[test]
    fn random_hue_is_in_range() {
        let hue = random_base_hue();
        assert!((0.0..360.0).contains(&hue));
    }
}
