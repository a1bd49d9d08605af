use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::traits::LocaleFormatter;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whole calendar days between the two instants, rounded to nearest.
/// Rounding (not truncation) decides the label boundaries: 7 days and 11
/// hours is still "7 days ago", 7 days and 13 hours falls through to the
/// locale formatter.
fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let seconds = (b - a).num_seconds().abs();
    (seconds as f64 / SECONDS_PER_DAY).round() as i64
}

/// "Today" / "Yesterday" / "n days ago" for recent movements, the locale
/// date formatter for anything older than a week.
pub fn relative_day_label<F: LocaleFormatter>(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    locale: &str,
    formatter: &F,
) -> String {
    match days_between(timestamp, now) {
        0 => "Today".to_owned(),
        1 => "Yesterday".to_owned(),
        days @ 2..=7 => format!("{days} days ago"),
        _ => formatter.date(timestamp, locale),
    }
}

/// Stand-in for a full internationalization API: day-month order follows the
/// locale tag, currency symbols cover the seeded currencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicLocaleFormatter;

impl LocaleFormatter for BasicLocaleFormatter {
    fn date(&self, date: DateTime<Utc>, locale: &str) -> String {
        if locale.starts_with("en-US") {
            date.format("%m/%d/%Y").to_string()
        } else {
            date.format("%d/%m/%Y").to_string()
        }
    }

    fn currency(&self, amount: Decimal, locale: &str, currency: &str) -> String {
        let symbol = match currency {
            "EUR" => "€",
            "USD" => "$",
            "GBP" => "£",
            other => other,
        };
        let sign = if amount.is_sign_negative() { "-" } else { "" };
        let magnitude = amount.abs();
        if locale.starts_with("en") {
            format!("{sign}{symbol}{magnitude:.2}")
        } else {
            format!("{sign}{magnitude:.2} {symbol}")
        }
    }
}
