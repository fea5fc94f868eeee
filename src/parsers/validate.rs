//! Record validation shared by all order sources

use crate::types::{OrderStatsError, RecordId, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Order dates are written year-day-month (e.g. `2024-31-12`)
pub const DATE_FORMAT: &str = "%Y-%d-%m";

/// Individual drop warnings logged per source before going quiet
const MAX_LOGGED_DROPS: usize = 10;

/// Parse a `YYYY-DD-MM` date.
///
/// The day comes before the month. A string that only parses as
/// year-month-day is rejected, never reinterpreted.
pub fn parse_date_ydm(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        OrderStatsError::InvalidDateFormat {
            value: value.to_string(),
        }
    })
}

/// Parse an identifier field.
///
/// Only canonical integers become `Int`; `007` or `+7` stay text so distinct
/// ids never collapse into the same value.
pub fn parse_record_id(value: &str) -> RecordId {
    let value = value.trim();
    match value.parse::<i64>() {
        Ok(n) if n.to_string() == value => RecordId::Int(n),
        _ => RecordId::Text(value.to_string()),
    }
}

/// Return the trimmed field, or `MissingRequiredField` if absent or blank
pub fn require<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(OrderStatsError::MissingRequiredField { field }),
    }
}

/// Validate a price: finite and ≥ 0
pub fn check_price(price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(OrderStatsError::InvalidNumber {
            field: "price",
            value: price.to_string(),
        });
    }
    if price < 0.0 {
        return Err(OrderStatsError::NegativeValue {
            field: "price",
            value: price.to_string(),
        });
    }
    Ok(price)
}

/// Validate a quantity: ≥ 0
pub fn check_quantity(quantity: i64) -> Result<u64> {
    u64::try_from(quantity).map_err(|_| OrderStatsError::NegativeValue {
        field: "quantity",
        value: quantity.to_string(),
    })
}

/// Parse and validate a textual price
pub fn parse_price(value: &str) -> Result<f64> {
    let price = value
        .trim()
        .parse::<f64>()
        .map_err(|_| OrderStatsError::InvalidNumber {
            field: "price",
            value: value.to_string(),
        })?;
    check_price(price)
}

/// Parse and validate a textual quantity.
///
/// Spreadsheet exports often write whole numbers as `3.0`, which is accepted;
/// `2.5` is not.
pub fn parse_quantity(value: &str) -> Result<u64> {
    let trimmed = value.trim();
    let invalid = || OrderStatsError::InvalidNumber {
        field: "quantity",
        value: value.to_string(),
    };

    let quantity = match trimmed.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = trimmed.parse::<f64>().map_err(|_| invalid())?;
            if !f.is_finite() || f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                return Err(invalid());
            }
            f as i64
        }
    };
    check_quantity(quantity)
}

/// Tracks date parsing across a whole input.
///
/// Single bad dates drop their record; if every date fails, the input as a
/// whole is probably in another convention and loading fails.
#[derive(Debug, Default)]
pub struct DateGuard {
    seen: usize,
    parsed: usize,
    first_bad: Option<String>,
}

impl DateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, value: &str) -> Result<NaiveDate> {
        self.seen += 1;
        match parse_date_ydm(value) {
            Ok(date) => {
                self.parsed += 1;
                Ok(date)
            }
            Err(e) => {
                if self.first_bad.is_none() {
                    self.first_bad = Some(value.to_string());
                }
                Err(e)
            }
        }
    }

    /// Fail if dates were present but none of them parsed
    pub fn finish(self) -> Result<()> {
        match self.first_bad {
            Some(value) if self.parsed == 0 && self.seen > 0 => {
                Err(OrderStatsError::InvalidDateFormat { value })
            }
            _ => Ok(()),
        }
    }
}

/// Counts records dropped during loading, grouped by reason
#[derive(Debug)]
pub struct DropTally {
    source: &'static str,
    counts: BTreeMap<&'static str, usize>,
    total: usize,
}

impl DropTally {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    /// Record one dropped record; `location` is e.g. "line 12" or "order #3"
    pub fn record(&mut self, location: &str, err: &OrderStatsError) {
        self.total += 1;
        *self.counts.entry(err.reason()).or_insert(0) += 1;
        if self.total <= MAX_LOGGED_DROPS {
            warn!(source = self.source, "Dropped {}: {}", location, err);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, reason: &str) -> usize {
        self.counts.get(reason).copied().unwrap_or(0)
    }

    /// Log a one-line summary once loading is done
    pub fn log_summary(&self, kept: usize) {
        if self.total == 0 {
            info!(source = self.source, "Loaded {} orders", kept);
            return;
        }
        let reasons = self
            .counts
            .iter()
            .map(|(reason, n)| format!("{}: {}", reason, n))
            .collect::<Vec<_>>()
            .join(", ");
        warn!(
            source = self.source,
            "Loaded {} orders, dropped {} records ({})", kept, self.total, reasons
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Dates ==========

    #[test]
    fn test_parse_date_day_before_month() {
        assert_eq!(
            parse_date_ydm("2024-05-03").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_parse_date_end_of_year() {
        assert_eq!(
            parse_date_ydm("2024-31-12").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_year_month_day() {
        let err = parse_date_ydm("2024-12-31").unwrap_err();
        assert!(matches!(err, OrderStatsError::InvalidDateFormat { .. }));
    }

    #[test]
    fn test_parse_date_trims_whitespace() {
        assert!(parse_date_ydm(" 2024-01-02 ").is_ok());
    }

    #[test]
    fn test_parse_date_garbage() {
        assert!(parse_date_ydm("yesterday").is_err());
        assert!(parse_date_ydm("").is_err());
    }

    // ========== Identifiers ==========

    #[test]
    fn test_parse_record_id_integer() {
        assert_eq!(parse_record_id("42"), RecordId::Int(42));
        assert_eq!(parse_record_id(" -7 "), RecordId::Int(-7));
    }

    #[test]
    fn test_parse_record_id_text() {
        assert_eq!(parse_record_id("A-42"), RecordId::from("A-42"));
        assert_eq!(parse_record_id("4.2"), RecordId::from("4.2"));
    }

    #[test]
    fn test_parse_record_id_leading_zeros_stay_text() {
        assert_eq!(parse_record_id("007"), RecordId::from("007"));
        assert_eq!(parse_record_id("+7"), RecordId::from("+7"));
        assert_eq!(parse_record_id("-0"), RecordId::from("-0"));
        assert_ne!(parse_record_id("007"), parse_record_id("7"));
    }

    #[test]
    fn test_parse_record_id_overflow_stays_text() {
        let big = "99999999999999999999999";
        assert_eq!(parse_record_id(big), RecordId::from(big));
    }

    // ========== Fields ==========

    #[test]
    fn test_require() {
        assert_eq!(require(Some(" x "), "user_id").unwrap(), "x");
        assert!(matches!(
            require(Some("  "), "user_id"),
            Err(OrderStatsError::MissingRequiredField { field: "user_id" })
        ));
        assert!(require(None, "date").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("19.99").unwrap(), 19.99);
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert!(matches!(
            parse_price("-1"),
            Err(OrderStatsError::NegativeValue { field: "price", .. })
        ));
        assert!(matches!(
            parse_price("abc"),
            Err(OrderStatsError::InvalidNumber { .. })
        ));
        assert!(parse_price("NaN").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity("3.0").unwrap(), 3);
        assert!(parse_quantity("2.5").is_err());
        assert!(matches!(
            parse_quantity("-2"),
            Err(OrderStatsError::NegativeValue { field: "quantity", .. })
        ));
    }

    // ========== DateGuard ==========

    #[test]
    fn test_date_guard_all_bad_is_fatal() {
        let mut guard = DateGuard::new();
        assert!(guard.check("2024-12-31").is_err());
        assert!(guard.check("2024-11-30").is_err());
        match guard.finish() {
            Err(OrderStatsError::InvalidDateFormat { value }) => assert_eq!(value, "2024-12-31"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_date_guard_some_good_is_ok() {
        let mut guard = DateGuard::new();
        assert!(guard.check("2024-12-31").is_err());
        assert!(guard.check("2024-31-12").is_ok());
        assert!(guard.finish().is_ok());
    }

    #[test]
    fn test_date_guard_no_dates_is_ok() {
        assert!(DateGuard::new().finish().is_ok());
    }

    // ========== DropTally ==========

    #[test]
    fn test_drop_tally_counts_by_reason() {
        let mut drops = DropTally::new("csv");
        drops.record(
            "line 2",
            &OrderStatsError::MissingRequiredField { field: "price" },
        );
        drops.record(
            "line 3",
            &OrderStatsError::MissingRequiredField { field: "date" },
        );
        drops.record(
            "line 4",
            &OrderStatsError::NegativeValue {
                field: "quantity",
                value: "-1".into(),
            },
        );
        assert_eq!(drops.total(), 3);
        assert_eq!(drops.count("missing field"), 2);
        assert_eq!(drops.count("negative value"), 1);
        assert_eq!(drops.count("invalid date"), 0);
    }
}
