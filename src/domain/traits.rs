use chrono::{DateTime, Utc};
use futures::Stream;
use rust_decimal::Decimal;

use crate::domain::{Command, Error};

pub trait CommandStream {
    type Commands: Stream<Item = Result<Command, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::Commands;
}

pub trait RejectionSink {
    fn report(&self, error: &Error);
}

/// Locale-aware formatting capability supplied by the environment. The
/// engine passes locale and currency tags through unchanged and returns the
/// result verbatim.
pub trait LocaleFormatter {
    fn date(&self, date: DateTime<Utc>, locale: &str) -> String;
    fn currency(&self, amount: Decimal, locale: &str, currency: &str) -> String;
}
