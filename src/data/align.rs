use super::model::{DomainError, NumericDomain, Series, YearRange};

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// Whether a value takes part in domain computation and in the bar chart.
///
/// Zero counts as absent, so a year reporting exactly `0` is neither scaled
/// nor drawn.
pub fn is_usable(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v != 0.0 && v.is_finite())
}

/// Min/max over the usable values of `series`.
pub fn compute_domain(series: &Series) -> Result<NumericDomain, DomainError> {
    let (min, max) = series
        .iter()
        .filter(|p| is_usable(p.value))
        .filter_map(|p| p.value)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    // Folding nothing leaves the infinite seeds, which `new` refuses.
    NumericDomain::new(min, max)
}

/// Earliest and latest parseable year in `series`.
pub fn year_extent(series: &Series) -> Option<YearRange> {
    let mut years = series.iter().filter_map(|p| p.year);
    let first = years.next()?;
    let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    Some(YearRange::new(min, max))
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Value of the first entry for `year`, rounded to two decimals.
///
/// Only the first matching entry is consulted: if it has no value the result
/// is `None` even when a later duplicate does.
pub fn lookup_value_for_year(series: &Series, year: i32) -> Option<f64> {
    series
        .iter()
        .find(|p| p.year == Some(year))
        .and_then(|p| p.value)
        .filter(|v| v.is_finite())
        .map(|v| (v * 100.0).round() / 100.0)
}

// ---------------------------------------------------------------------------
// Tooltip
// ---------------------------------------------------------------------------

/// Paired values shown when hovering a year.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipData {
    pub year: i32,
    pub gdp: f64,
    pub avg_temp: Option<f64>,
}

impl TooltipData {
    /// Tooltip text lines: year, GDP, and temperature when known.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.year.to_string(), format_gdp(self.gdp)];
        if let Some(t) = self.avg_temp {
            lines.push(format_temp(t));
        }
        lines
    }
}

/// Combine one GDP observation with the climate value for the same year.
pub fn pair_for_tooltip(year: i32, gdp_value: f64, climate: &Series) -> TooltipData {
    TooltipData {
        year,
        gdp: gdp_value,
        avg_temp: lookup_value_for_year(climate, year),
    }
}

/// `"GDP $<value / 1e11>bln."` with two decimals.
pub fn format_gdp(value: f64) -> String {
    let billions = value / 100_000_000_000.0;
    format!("GDP ${billions:.2}bln.")
}

pub fn format_temp(value: f64) -> String {
    format!("{value:.2}C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::YearValue;

    fn series(points: &[(i32, Option<f64>)]) -> Series {
        points.iter().map(|&(y, v)| YearValue::new(y, v)).collect()
    }

    #[test]
    fn domain_skips_zero_and_absent() {
        let s = series(&[(2000, Some(10.0)), (2001, Some(0.0)), (2002, Some(30.0)), (2003, None)]);
        assert_eq!(compute_domain(&s), Ok(NumericDomain { min: 10.0, max: 30.0 }));
    }

    #[test]
    fn domain_of_all_absent_series_is_no_data() {
        let s = series(&[(2000, None), (2001, None)]);
        assert_eq!(compute_domain(&s), Err(DomainError::NoData));
        assert_eq!(compute_domain(&Series::default()), Err(DomainError::NoData));
    }

    #[test]
    fn domain_ignores_order_and_negative_values_count() {
        let s = series(&[(2005, Some(-3.5)), (1990, Some(12.0)), (2001, Some(4.0))]);
        assert_eq!(compute_domain(&s), Ok(NumericDomain { min: -3.5, max: 12.0 }));
    }

    #[test]
    fn domain_skips_non_finite_values() {
        let s = series(&[(2000, Some(f64::NAN)), (2001, Some(2.0))]);
        assert_eq!(compute_domain(&s), Ok(NumericDomain { min: 2.0, max: 2.0 }));
    }

    #[test]
    fn year_extent_ignores_unparsed_years() {
        let mut s = series(&[(1995, None), (1960, Some(1.0)), (2023, None)]);
        s.points.push(YearValue { year: None, value: Some(5.0) });
        assert_eq!(year_extent(&s), Some(YearRange::new(1960, 2023)));
        assert_eq!(year_extent(&Series::default()), None);
    }

    #[test]
    fn lookup_uses_first_duplicate() {
        let s = series(&[(1999, Some(1.0)), (2000, Some(7.123)), (2000, Some(9.0))]);
        assert_eq!(lookup_value_for_year(&s, 2000), Some(7.12));
        assert_eq!(lookup_value_for_year(&s, 2001), None);
    }

    #[test]
    fn lookup_first_match_without_value_is_absent() {
        let s = series(&[(2000, None), (2000, Some(9.0))]);
        assert_eq!(lookup_value_for_year(&s, 2000), None);
    }

    #[test]
    fn lookup_keeps_zero_temperature() {
        let s = series(&[(1950, Some(0.0))]);
        assert_eq!(lookup_value_for_year(&s, 1950), Some(0.0));
    }

    #[test]
    fn tooltip_pairs_gdp_with_temperature() {
        let climate = series(&[(1992, Some(8.456))]);
        let tip = pair_for_tooltip(1992, 3e12, &climate);
        assert_eq!(tip.avg_temp, Some(8.46));
        assert_eq!(tip.lines(), vec!["1992", "GDP $30.00bln.", "8.46C"]);

        let tip = pair_for_tooltip(1993, 3e12, &climate);
        assert_eq!(tip.lines().len(), 2);
    }

    #[test]
    fn gdp_formatting() {
        assert_eq!(format_gdp(3e12), "GDP $30.00bln.");
        assert_eq!(format_gdp(2.5e10), "GDP $0.25bln.");
    }
}
