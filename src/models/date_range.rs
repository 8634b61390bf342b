use chrono::NaiveDate;

/// Canonical wire format for dates sent upstream.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Lower bound used when the caller omits `FromDate`.
pub const DATE_MIN: &str = "0001-01-01";

/// Upper bound used when the caller omits `ToDate`.
pub const DATE_MAX: &str = "3001-01-01";

/// An inclusive calendar range. Always satisfies `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        if from > to {
            return None;
        }
        Some(Self { from, to })
    }

    pub fn from_param(&self) -> String {
        self.from.format(CANONICAL_DATE_FORMAT).to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format(CANONICAL_DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(DateRange::new(date(2023, 1, 5), date(2023, 1, 3)).is_none());
    }

    #[test]
    fn test_single_day_range_is_valid() {
        let range = DateRange::new(date(2023, 1, 3), date(2023, 1, 3)).unwrap();
        assert_eq!(range.from_param(), range.to_param());
    }

    #[test]
    fn test_canonical_strings_are_zero_padded() {
        let range = DateRange::new(date(1, 1, 1), date(3001, 1, 1)).unwrap();
        assert_eq!(range.from_param(), DATE_MIN);
        assert_eq!(range.to_param(), DATE_MAX);
    }
}
