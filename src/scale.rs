//! Scale functions mapping data values to pixel positions.
//!
//! Based on the Grammar of Graphics [Wilkinson 2005]. Charts only need two
//! position scales: linear (with a zero floor on the y axis) and base-10
//! logarithmic.

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min and domain_max are equal at f32
    /// precision, or either is not finite.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        let span = (domain.0 - domain.1).abs();
        if !span.is_finite() || span <= f32::EPSILON * domain.0.abs().max(domain.1.abs()) {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Evenly spaced "nice" tick values (1, 2, 2.5 or 5 times a power of ten)
    /// covering the domain.
    #[must_use]
    pub fn ticks(&self, target: usize) -> Vec<f32> {
        let (lo, hi) = if self.domain_min <= self.domain_max {
            (self.domain_min, self.domain_max)
        } else {
            (self.domain_max, self.domain_min)
        };
        let step = nice_step((hi - lo) / target.max(1) as f32);
        if step <= 0.0 || !step.is_finite() {
            return vec![lo, hi];
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f32 * step).collect()
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Base-10 logarithmic scale.
#[derive(Debug, Clone, Copy)]
pub struct LogScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LogScale {
    /// Create a new logarithmic scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain contains non-positive values or is empty.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if domain.0 <= 0.0 || domain.1 <= 0.0 {
            return Err(Error::ScaleDomain("Log scale domain must be positive".to_string()));
        }
        if (domain.0.log10() - domain.1.log10()).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Powers of ten inside the domain. Falls back to the domain bounds when
    /// the domain spans less than one decade.
    #[must_use]
    pub fn ticks(&self) -> Vec<f32> {
        let lo = self.domain_min.min(self.domain_max);
        let hi = self.domain_min.max(self.domain_max);
        let first = (lo.log10() - DECADE_TOLERANCE).ceil() as i32;
        let last = (hi.log10() + DECADE_TOLERANCE).floor() as i32;

        if first > last {
            return vec![lo, hi];
        }
        (first..=last).map(|p| 10f32.powi(p)).collect()
    }
}

impl Scale<f32, f32> for LogScale {
    fn scale(&self, value: f32) -> f32 {
        let log_min = self.domain_min.log10();
        let log_max = self.domain_max.log10();
        let log_val = value.max(f32::MIN_POSITIVE).log10();

        let t = (log_val - log_min) / (log_max - log_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Which transform a chart's y axis uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    /// Linear axis starting at zero.
    Linear,
    /// Base-10 logarithmic axis.
    Log,
}

/// Lower bound used for a log axis when no value is positive.
pub const LOG_FLOOR: f32 = 1e-3;

/// Slack for `log10` rounding so exact powers of ten stay on their decade.
const DECADE_TOLERANCE: f32 = 1e-4;

/// A concrete y-axis mapping built from an [`AxisScale`] and the data extent.
#[derive(Debug, Clone, Copy)]
pub enum AxisMapping {
    /// Linear mapping.
    Linear(LinearScale),
    /// Logarithmic mapping.
    Log(LogScale),
}

impl AxisMapping {
    /// Build the value axis for data in `values`, mapped onto `range`.
    ///
    /// Linear axes start at zero and end 5% above the maximum. Log axes start
    /// at the smallest positive value (or [`LOG_FLOOR`]) rounded down to a
    /// decade and end at the maximum rounded up to a decade.
    ///
    /// # Errors
    ///
    /// Propagates scale construction errors.
    pub fn for_values(kind: AxisScale, values: &[f32], range: (f32, f32)) -> Result<Self> {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let max = finite.clone().fold(f32::NEG_INFINITY, f32::max);

        match kind {
            AxisScale::Linear => {
                let top = if max > 0.0 { max * 1.05 } else { 1.0 };
                Ok(Self::Linear(LinearScale::new((0.0, top), range)?))
            }
            AxisScale::Log => {
                let min_positive = finite
                    .filter(|v| *v > 0.0)
                    .fold(f32::INFINITY, f32::min);
                let lo = if min_positive.is_finite() {
                    min_positive
                } else {
                    LOG_FLOOR
                };
                let hi = max.max(lo);
                let lo = 10f32.powf((lo.log10() + DECADE_TOLERANCE).floor());
                let mut hi = 10f32.powf((hi.log10() - DECADE_TOLERANCE).ceil());
                if hi <= lo {
                    hi = lo * 10.0;
                }
                Ok(Self::Log(LogScale::new((lo, hi), range)?))
            }
        }
    }

    /// Which transform this mapping applies.
    #[must_use]
    pub fn kind(&self) -> AxisScale {
        match self {
            Self::Linear(_) => AxisScale::Linear,
            Self::Log(_) => AxisScale::Log,
        }
    }

    /// Map a value, clamping non-positive values on log axes to the axis floor.
    #[must_use]
    pub fn map(&self, value: f32) -> f32 {
        match self {
            Self::Linear(s) => s.scale(value),
            Self::Log(s) => s.scale(value.max(s.domain().0)),
        }
    }

    /// Tick values for this axis.
    #[must_use]
    pub fn ticks(&self) -> Vec<f32> {
        match self {
            Self::Linear(s) => s.ticks(6),
            Self::Log(s) => s.ticks(),
        }
    }
}

/// Round a raw step up to 1, 2, 2.5 or 5 times a power of ten.
fn nice_step(raw: f32) -> f32 {
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let magnitude = 10f32.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Compact label for a tick value: integers without decimals, small values
/// with up to three significant decimals, large values in exponent form.
#[must_use]
pub fn format_tick(value: f32) -> String {
    let abs = value.abs();
    if abs == 0.0 {
        return "0".to_string();
    }
    if abs >= 1e6 || abs < 1e-3 {
        return format!("{value:.0e}");
    }
    if (value - value.round()).abs() < 1e-4 * abs.max(1.0) {
        return format!("{}", value.round() as i64);
    }
    let text = if abs >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.3}")
    };
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_scale_maps_endpoints() {
        let s = LinearScale::new((0.0, 10.0), (100.0, 0.0)).unwrap();
        assert_relative_eq!(s.scale(0.0), 100.0);
        assert_relative_eq!(s.scale(10.0), 0.0);
        assert_relative_eq!(s.scale(5.0), 50.0);
    }

    #[test]
    fn test_linear_scale_rejects_empty_domain() {
        assert!(LinearScale::new((1.0, 1.0), (0.0, 1.0)).is_err());
        assert!(LinearScale::new((1e8, 1e8 + 1.0), (0.0, 1.0)).is_err());
        assert!(LinearScale::new((0.0, f32::INFINITY), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_linear_scale_accepts_tiny_positive_domain() {
        let s = LinearScale::new((0.0, 1e-8), (0.0, 100.0)).unwrap();
        assert_relative_eq!(s.scale(5e-9), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_linear_ticks_are_nice() {
        let s = LinearScale::new((0.0, 10.5), (0.0, 1.0)).unwrap();
        assert_eq!(s.ticks(5), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_log_scale_rejects_non_positive() {
        assert!(LogScale::new((0.0, 10.0), (0.0, 1.0)).is_err());
        assert!(LogScale::new((-1.0, 10.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_log_scale_decades_are_evenly_spaced() {
        let s = LogScale::new((1.0, 1000.0), (0.0, 300.0)).unwrap();
        assert_relative_eq!(s.scale(10.0), 100.0, epsilon = 1e-3);
        assert_relative_eq!(s.scale(100.0), 200.0, epsilon = 1e-3);
        assert_eq!(s.ticks().len(), 4);
    }

    #[test]
    fn test_linear_mapping_floors_at_zero() {
        let m = AxisMapping::for_values(AxisScale::Linear, &[5.0, 8.0], (100.0, 0.0)).unwrap();
        assert_eq!(m.kind(), AxisScale::Linear);
        assert_relative_eq!(m.map(0.0), 100.0);
    }

    #[test]
    fn test_log_mapping_clamps_zero_values() {
        let m = AxisMapping::for_values(AxisScale::Log, &[0.0, 0.5, 40.0], (100.0, 0.0)).unwrap();
        assert_eq!(m.kind(), AxisScale::Log);
        // 0.5 rounds down to the 0.1 decade, so zero lands on the axis floor.
        assert_relative_eq!(m.map(0.0), 100.0);
        assert_relative_eq!(m.map(0.1), 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_log_mapping_without_positive_values() {
        let m = AxisMapping::for_values(AxisScale::Log, &[0.0, 0.0], (1.0, 0.0)).unwrap();
        assert!(matches!(m, AxisMapping::Log(_)));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(5.0), "5");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.125), "0.125");
        assert_eq!(format_tick(1000.0), "1000");
        assert_eq!(format_tick(1e7), "1e7");
    }
}
