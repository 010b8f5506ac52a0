//! Contour band quantization: value ranges, levels and colorbar ticks

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    #[error("range bounds ({0}, {1}) are not finite and increasing")]
    Bounds(f64, f64),
    #[error("a range needs at least one level")]
    Levels,
    #[error("tick step must be positive and finite, got {0}")]
    TickStep(f64),
}
type Result<T> = std::result::Result<T, RangeError>;

/// Quantization of a field into `level_count` evenly spaced contour bands
/// over `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawValueRange")]
pub struct ValueRange {
    min: f64,
    max: f64,
    level_count: usize,
}
impl ValueRange {
    pub fn new(min: f64, max: f64, level_count: usize) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(RangeError::Bounds(min, max));
        }
        if level_count == 0 {
            return Err(RangeError::Levels);
        }
        Ok(Self {
            min,
            max,
            level_count,
        })
    }
    pub fn min(&self) -> f64 {
        self.min
    }
    pub fn max(&self) -> f64 {
        self.max
    }
    pub fn level_count(&self) -> usize {
        self.level_count
    }
    /// Same bounds, different band count
    pub fn with_level_count(self, level_count: usize) -> Result<Self> {
        Self::new(self.min, self.max, level_count)
    }
    /// `level_count` evenly spaced values, first = min, last = max
    pub fn levels(&self) -> Vec<f64> {
        if self.level_count == 1 {
            return vec![self.min];
        }
        let n = (self.level_count - 1) as f64;
        (0..self.level_count)
            .map(|i| self.min + (self.max - self.min) * i as f64 / n)
            .collect()
    }
    /// Colorbar ticks from min to max inclusive at a fixed increment
    pub fn ticks(&self, step: f64) -> Result<Vec<f64>> {
        if !(step.is_finite() && step > 0.0) {
            return Err(RangeError::TickStep(step));
        }
        let mut ticks = vec![];
        let mut k = 0usize;
        loop {
            let tick = self.min + step * k as f64;
            if tick > self.max + step * 1e-6 {
                break;
            }
            ticks.push(tick);
            k += 1;
        }
        Ok(ticks)
    }
    /// Fallback ticks when no step is configured: one per integer between
    /// floor(min) and ceil(max)
    pub fn integer_ticks(&self) -> Vec<f64> {
        let lo = self.min.floor() as i64;
        let hi = self.max.ceil() as i64;
        (lo..=hi).map(|t| t as f64).collect()
    }
    /// Position of `value` within the range, clamped to [0, 1]
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[derive(Deserialize)]
struct RawValueRange {
    min: f64,
    max: f64,
    levels: usize,
}
impl TryFrom<RawValueRange> for ValueRange {
    type Error = RangeError;
    fn try_from(raw: RawValueRange) -> Result<Self> {
        ValueRange::new(raw.min, raw.max, raw.levels)
    }
}

/// What happens to samples outside the configured range
///
/// The source charts use both policies and they are not interchangeable:
/// `Clamp` flattens extremes into the end bands before banding, `Extend`
/// leaves the field untouched and renders out-of-range samples with the
/// extreme band colors plus colorbar extension arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    Clamp,
    Extend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_evenly_spaced() {
        let range = ValueRange::new(0.0, 10.0, 5).unwrap();
        assert_eq!(range.levels(), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        let levels = ValueRange::new(0.0, 2.0, 14).unwrap().levels();
        assert_eq!(levels.len(), 14);
        assert_eq!(levels[0], 0.0);
        assert_eq!(*levels.last().unwrap(), 2.0);
        let spacing = levels[1] - levels[0];
        for w in levels.windows(2) {
            assert!((w[1] - w[0] - spacing).abs() < 1e-12);
        }
    }

    #[test]
    fn single_level() {
        assert_eq!(ValueRange::new(-1.0, 1.0, 1).unwrap().levels(), vec![-1.0]);
    }

    #[test]
    fn invalid_bounds() {
        assert!(ValueRange::new(1.0, 1.0, 5).is_err());
        assert!(ValueRange::new(2.0, 1.0, 5).is_err());
        assert!(ValueRange::new(0.0, f64::NAN, 5).is_err());
        assert!(ValueRange::new(0.0, 1.0, 0).is_err());
    }

    #[test]
    fn stepped_ticks_reach_the_upper_bound() {
        let range = ValueRange::new(0.0, 0.5, 30).unwrap();
        let ticks = range.ticks(0.1).unwrap();
        assert_eq!(ticks.len(), 6);
        assert!((ticks[5] - 0.5).abs() < 1e-9);
        assert!(range.ticks(0.0).is_err());
        assert!(range.ticks(-0.1).is_err());
    }

    #[test]
    fn integer_tick_fallback() {
        let range = ValueRange::new(12.4, 17.2, 14).unwrap();
        assert_eq!(
            range.integer_ticks(),
            vec![12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0]
        );
    }

    #[test]
    fn deserialized_ranges_are_checked() {
        let range: ValueRange = toml::from_str::<ValueRange>(
            r#"
            min = 0.0
            max = 2.0
            levels = 14
            "#,
        )
        .unwrap();
        assert_eq!(range, ValueRange::new(0.0, 2.0, 14).unwrap());
        assert!(toml::from_str::<ValueRange>("min = 2.0\nmax = 0.0\nlevels = 5").is_err());
    }
}
