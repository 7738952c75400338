use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Year parsing
// ---------------------------------------------------------------------------

/// Parse the leading integer of a year field (`"1990"`, `" 2001"`, `"1990Q1"`).
///
/// Anything without a leading integer is treated as absent, never as zero.
pub fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let digits_start = usize::from(text.starts_with(['+', '-']));
    let digits_len = text[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    text[..digits_start + digits_len].parse().ok()
}

// ---------------------------------------------------------------------------
// YearValue / Series
// ---------------------------------------------------------------------------

/// One observation of a yearly series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue {
    /// `None` when the source year could not be parsed.
    pub year: Option<i32>,
    /// `None` when the source reported no value for the year.
    pub value: Option<f64>,
}

#[cfg(test)]
impl YearValue {
    pub fn new(year: i32, value: Option<f64>) -> Self {
        Self {
            year: Some(year),
            value,
        }
    }
}

/// A yearly series as delivered by a source. Order is not relied upon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<YearValue>,
}

impl Series {
    pub fn new(points: Vec<YearValue>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &YearValue> {
        self.points.iter()
    }
}

impl FromIterator<YearValue> for Series {
    fn from_iter<I: IntoIterator<Item = YearValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// YearRange
// ---------------------------------------------------------------------------

/// Inclusive range of calendar years selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: 1980,
            end: 2012,
        }
    }
}

impl YearRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Number of years between the bounds (0 for a single-year range).
    pub fn span(&self) -> i32 {
        self.end - self.start
    }

    /// Clamp both bounds into `extent`.
    ///
    /// A range lying entirely outside `extent` becomes `extent` itself.
    pub fn clamp_to(&self, extent: YearRange) -> YearRange {
        if self.end < extent.start || self.start > extent.end {
            return extent;
        }
        YearRange::new(
            self.start.clamp(extent.start, extent.end),
            self.end.clamp(extent.start, extent.end),
        )
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// NumericDomain
// ---------------------------------------------------------------------------

/// Raised when a series has no usable values to build a domain from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("series has no usable values")]
    NoData,
}

/// Finite `[min, max]` extent of a series' values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
}

impl NumericDomain {
    /// Build a domain from finite bounds, ordering them.
    pub fn new(a: f64, b: f64) -> Result<Self, DomainError> {
        if !a.is_finite() || !b.is_finite() {
            return Err(DomainError::NoData);
        }
        Ok(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

impl From<YearRange> for NumericDomain {
    fn from(range: YearRange) -> Self {
        Self {
            min: f64::from(range.start),
            max: f64::from(range.end),
        }
    }
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

/// One entry of the country selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// ISO3 code used in the API URLs.
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year_reads_leading_integer() {
        assert_eq!(parse_year("1990"), Some(1990));
        assert_eq!(parse_year("  2001"), Some(2001));
        assert_eq!(parse_year("1990Q1"), Some(1990));
        assert_eq!(parse_year("-44"), Some(-44));
    }

    #[test]
    fn parse_year_failure_is_absent_not_zero() {
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("n/a"), None);
        assert_eq!(parse_year("-"), None);
        assert_eq!(parse_year("99999999999"), None);
    }

    #[test]
    fn year_range_orders_bounds() {
        assert_eq!(YearRange::new(2012, 1980), YearRange::new(1980, 2012));
        assert_eq!(YearRange::new(1980, 2012).span(), 32);
    }

    #[test]
    fn year_range_clamps_into_extent() {
        let extent = YearRange::new(1960, 2023);
        assert_eq!(YearRange::new(1950, 2012).clamp_to(extent), YearRange::new(1960, 2012));
        assert_eq!(YearRange::new(1980, 2030).clamp_to(extent), YearRange::new(1980, 2023));
        assert_eq!(YearRange::new(1900, 1950).clamp_to(extent), extent);
    }

    #[test]
    fn numeric_domain_rejects_non_finite_bounds() {
        assert_eq!(
            NumericDomain::new(f64::INFINITY, f64::NEG_INFINITY),
            Err(DomainError::NoData)
        );
        let d = NumericDomain::new(3.0, 1.0).unwrap();
        assert_eq!((d.min, d.max), (1.0, 3.0));
    }
}
