use super::model::{DomainError, NumericDomain};

// ---------------------------------------------------------------------------
// Linear scale: data value → pixel
// ---------------------------------------------------------------------------

/// Maps a data domain linearly onto a pixel range.
///
/// The range may be inverted (`(height, 0)`) for y axes growing downwards.
/// A collapsed domain maps every input to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: NumericDomain,
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: NumericDomain, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// `range_min + (value - domain_min) / (domain_max - domain_min) * (range_max - range_min)`
    pub fn map(&self, value: f64) -> f64 {
        let (r0, r1) = self.range;
        if self.domain.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        let t = (value - self.domain.min) / (self.domain.max - self.domain.min);
        r0 + t * (r1 - r0)
    }

    pub fn map_f32(&self, value: f64) -> f32 {
        self.map(value) as f32
    }

    /// Round tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.min, self.domain.max, count)
    }
}

/// Build a scale from a computed domain, passing `NoData` straight through.
pub fn make_linear_scale(
    domain: Result<NumericDomain, DomainError>,
    range: (f64, f64),
) -> Result<LinearScale, DomainError> {
    domain.map(|d| LinearScale::new(d, range))
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

/// Round a step to 1, 2, 5 or 10 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let exponent = raw.log10().floor();
    let magnitude = 10_f64.powf(exponent);
    let fraction = raw / magnitude;
    let nice = if fraction < 1.5 {
        1.0
    } else if fraction < 3.0 {
        2.0
    } else if fraction < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Multiples of a nice step lying inside `[min, max]`.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) {
        return Vec::new();
    }
    if min == max || count < 2 {
        return vec![min];
    }
    let step = nice_step((max - min) / (count - 1) as f64);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}
