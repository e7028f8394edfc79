//! Exchange-rate value types and their live-protocol JSON shape.
//!
//! A [`RateTable`] serializes as an array of single-key objects, newest
//! date first:
//!
//! ```json
//! [
//!   { "16.10.2026": { "USD": { "sale": 41.5, "purchase": 40.9 }, "EUR": "N/A" } },
//!   { "15.10.2026": { "USD": { "sale": 41.4, "purchase": 40.8 }, "EUR": { "sale": 45.1, "purchase": 44.2 } } }
//! ]
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Date format used by the rate provider and the live protocol.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Marker emitted in place of a quote the provider did not supply.
pub const UNAVAILABLE_MARKER: &str = "N/A";

/// Older spelling of the marker, accepted when decoding.
const LEGACY_UNAVAILABLE_MARKER: &str = "Not available";

/// Formats a date as `DD.MM.YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `DD.MM.YYYY` date.
///
/// # Errors
///
/// Returns the underlying [`chrono::ParseError`] if `text` is not a valid
/// `DD.MM.YYYY` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
}

/// Currencies tracked by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Euro.
    Eur,
    /// US dollar.
    Usd,
}

impl Currency {
    /// ISO 4217 code as used by the provider.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sale and purchase price of one currency against UAH.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateQuote {
    /// Price at which the bank sells the currency.
    pub sale: f64,
    /// Price at which the bank buys the currency.
    pub purchase: f64,
}

/// A quote for one currency on one date, or the unavailable marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrencyQuote {
    /// The provider returned both prices.
    Available(RateQuote),
    /// The provider had no usable entry for this currency.
    Unavailable,
}

impl CurrencyQuote {
    /// Returns the quote if available.
    #[must_use]
    pub const fn as_quote(&self) -> Option<RateQuote> {
        match self {
            Self::Available(quote) => Some(*quote),
            Self::Unavailable => None,
        }
    }

    /// Returns `true` if the quote is the unavailable marker.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl Serialize for CurrencyQuote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Available(quote) => quote.serialize(serializer),
            Self::Unavailable => serializer.serialize_str(UNAVAILABLE_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for CurrencyQuote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Quote(RateQuote),
            Marker(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Quote(quote) => Ok(Self::Available(quote)),
            Repr::Marker(marker)
                if marker == UNAVAILABLE_MARKER || marker == LEGACY_UNAVAILABLE_MARKER =>
            {
                Ok(Self::Unavailable)
            }
            Repr::Marker(other) => Err(D::Error::custom(format!(
                "unknown currency marker: {other:?}"
            ))),
        }
    }
}

/// EUR and USD quotes for a single calendar date.
///
/// Produced fresh for every lookup and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// US dollar quote.
    #[serde(rename = "USD")]
    pub usd: CurrencyQuote,
    /// Euro quote.
    #[serde(rename = "EUR")]
    pub eur: CurrencyQuote,
}

impl ExchangeRate {
    /// Creates a rate entry from the two quotes.
    #[must_use]
    pub const fn new(eur: CurrencyQuote, usd: CurrencyQuote) -> Self {
        Self { usd, eur }
    }

    /// An entry with both currencies marked unavailable.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self::new(CurrencyQuote::Unavailable, CurrencyQuote::Unavailable)
    }

    /// Returns the quote for `currency`.
    #[must_use]
    pub const fn quote(&self, currency: Currency) -> CurrencyQuote {
        match currency {
            Currency::Eur => self.eur,
            Currency::Usd => self.usd,
        }
    }
}

/// Date-keyed collection of [`ExchangeRate`]s.
///
/// Keyed by date rather than by arrival order, so concurrently fetched
/// entries always come out in the same order. Iteration and JSON encoding
/// go newest date first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<NaiveDate, ExchangeRate>,
}

impl RateTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the rate for `date`, returning the previous entry if any.
    pub fn insert(&mut self, date: NaiveDate, rate: ExchangeRate) -> Option<ExchangeRate> {
        self.rates.insert(date, rate)
    }

    /// Returns the rate recorded for `date`.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&ExchangeRate> {
        self.rates.get(&date)
    }

    /// Number of dates in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns `true` if the table holds no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Iterates entries newest date first.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &ExchangeRate)> {
        self.rates.iter().rev().map(|(date, rate)| (*date, rate))
    }

    /// Dates in the table, newest first.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rates.keys().rev().copied().collect()
    }
}

impl FromIterator<(NaiveDate, ExchangeRate)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, ExchangeRate)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

/// One `{"DD.MM.YYYY": {...}}` element of the encoded table.
struct DatedEntry<'a> {
    date: NaiveDate,
    rate: &'a ExchangeRate,
}

impl Serialize for DatedEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&format_date(self.date), self.rate)?;
        map.end()
    }
}

impl Serialize for RateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rates.len()))?;
        for (date, rate) in self.iter() {
            seq.serialize_element(&DatedEntry { date, rate })?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<BTreeMap<String, ExchangeRate>>::deserialize(deserializer)?;
        let mut table = Self::new();
        for entry in entries {
            for (key, rate) in entry {
                let date = parse_date(&key)
                    .map_err(|err| D::Error::custom(format!("invalid date {key:?}: {err}")))?;
                if table.insert(date, rate).is_some() {
                    return Err(D::Error::custom(format!("duplicate date {key:?}")));
                }
            }
        }
        Ok(table)
    }
}
