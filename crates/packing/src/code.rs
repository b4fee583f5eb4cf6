//! Packing-list codes: `LOMPL` followed by a `ddMMyyHHmmss` stamp.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use lomartex_core::{DomainError, DomainResult};

const PREFIX: &str = "LOMPL";
const STAMP_DIGITS: usize = 12;
const STAMP_FORMAT: &str = "%d%m%y%H%M%S";

/// A validated packing-list code, e.g. `LOMPL160126143005`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackingListCode(String);

impl PackingListCode {
    /// Generate a code from the current local wall-clock time.
    ///
    /// Two calls within the same second yield the same code; the record store
    /// rejects the second insert as a conflict.
    pub fn generate() -> Self {
        Self::generate_at(&Local::now())
    }

    pub fn generate_at<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: core::fmt::Display,
    {
        Self(format!("{PREFIX}{}", at.format(STAMP_FORMAT)))
    }

    /// Whether `s` has the exact shape `LOMPL` + 12 ASCII digits.
    pub fn is_valid(s: &str) -> bool {
        match s.strip_prefix(PREFIX) {
            Some(stamp) => stamp.len() == STAMP_DIGITS && stamp.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(DomainError::invalid_id(format!(
                "PackingListCode: expected {PREFIX} followed by {STAMP_DIGITS} digits, got {s:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for PackingListCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for PackingListCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    #[test]
    fn generate_at_formats_day_month_year_time() {
        let at = Utc.with_ymd_and_hms(2026, 1, 16, 14, 30, 5).unwrap();
        assert_eq!(PackingListCode::generate_at(&at).as_str(), "LOMPL160126143005");
    }

    #[test]
    fn validity_checks_prefix_and_digit_count() {
        assert!(PackingListCode::is_valid("LOMPL160126143005"));
        assert!(!PackingListCode::is_valid("LOMPL16012614300"));
        assert!(!PackingListCode::is_valid("LOMPL1601261430055"));
        assert!(!PackingListCode::is_valid("lompl160126143005"));
        assert!(!PackingListCode::is_valid("LOMPL16012614300a"));
        assert!(!PackingListCode::is_valid(""));
    }

    #[test]
    fn parse_rejects_invalid_codes() {
        match PackingListCode::parse("PL-1").unwrap_err() {
            DomainError::InvalidId(msg) => assert!(msg.contains("PL-1")),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn generated_code_from_clock_is_valid() {
        assert!(PackingListCode::is_valid(PackingListCode::generate().as_str()));
    }

    proptest! {
        #[test]
        fn generated_codes_always_validate(secs in 0i64..4_102_444_800i64) {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            let code = PackingListCode::generate_at(&at);
            prop_assert!(PackingListCode::is_valid(code.as_str()));
            prop_assert_eq!(PackingListCode::parse(code.as_str()).unwrap(), code);
        }
    }
}
