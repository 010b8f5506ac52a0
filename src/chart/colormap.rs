//! Named colormaps and the spliced variants the legacy charts use
//!
//! Spread colormaps are "white-floored": the bottom fraction of the scale
//! is plain white so near-zero spread reads as no signal. The ssh mean
//! colormap is a rainbow with its lower end dropped, resampled through a
//! small number of stops.

use colorous::Gradient;
use plotters::style::RGBColor;

#[derive(Debug, thiserror::Error)]
pub enum ColormapError {
    #[error("unknown colormap {0:?}")]
    Unknown(String),
    #[error("colormap fraction {0} is outside [0, 1)")]
    Fraction(f64),
}
type Result<T> = std::result::Result<T, ColormapError>;

/// A continuous color scale, optionally white-floored, truncated or
/// resampled through a fixed number of stops
#[derive(Clone, Copy)]
pub struct Colormap {
    gradient: Gradient,
    white_floor: f64,
    clip: (f64, f64),
    stops: Option<usize>,
}
impl Colormap {
    /// Looks a colormap up by its configured identifier
    ///
    /// The identifiers are the legacy chart names; close `colorous`
    /// equivalents stand in where no exact counterpart exists.
    pub fn named(name: &str) -> Result<Self> {
        let gradient = match name.to_ascii_lowercase().as_str() {
            "viridis" => colorous::VIRIDIS,
            "plasma" => colorous::PLASMA,
            "inferno" => colorous::INFERNO,
            "magma" => colorous::MAGMA,
            "jet" | "turbo" => colorous::TURBO,
            "rainbow" | "gist_rainbow" => colorous::RAINBOW,
            "reds" => colorous::REDS,
            "blues" => colorous::BLUES,
            "greens" => colorous::GREENS,
            "oranges" => colorous::ORANGES,
            "purples" => colorous::PURPLES,
            "greys" | "grays" => colorous::GREYS,
            "cool" => colorous::COOL,
            "warm" => colorous::WARM,
            _ => return Err(ColormapError::Unknown(name.to_string())),
        };
        Ok(Self {
            gradient,
            white_floor: 0.0,
            clip: (0.0, 1.0),
            stops: None,
        })
    }
    /// Whites out the bottom `fraction` of the scale and compresses the
    /// gradient into the remainder
    pub fn white_floored(self, fraction: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(ColormapError::Fraction(fraction));
        }
        Ok(Self {
            white_floor: fraction,
            ..self
        })
    }
    /// Drops the gradient outside `[lo, hi]` and resamples what is left
    /// through `stops` evenly spaced colors
    pub fn truncated(self, lo: f64, hi: f64, stops: usize) -> Result<Self> {
        if !(0.0..1.0).contains(&lo) || hi <= lo || hi > 1.0 {
            return Err(ColormapError::Fraction(lo));
        }
        Ok(Self {
            clip: (lo, hi),
            stops: Some(stops.max(2)),
            ..self
        })
    }
    /// Color at position `u` of the scale; `u` is clamped into [0, 1]
    pub fn eval(&self, u: f64) -> RGBColor {
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        if u < self.white_floor {
            return RGBColor(255, 255, 255);
        }
        let u = if self.white_floor > 0.0 {
            (u - self.white_floor) / (1.0 - self.white_floor)
        } else {
            u
        };
        let u = match self.stops {
            // piecewise-linear through the resampled stops
            Some(n) => {
                let scaled = u * (n - 1) as f64;
                let k = (scaled.floor() as usize).min(n - 2);
                let frac = scaled - k as f64;
                let lo = self.stop_position(k, n);
                let hi = self.stop_position(k + 1, n);
                lo + (hi - lo) * frac
            }
            None => self.clip.0 + (self.clip.1 - self.clip.0) * u,
        };
        let c = self.gradient.eval_continuous(u);
        RGBColor(c.r, c.g, c.b)
    }
    fn stop_position(&self, k: usize, n: usize) -> f64 {
        self.clip.0 + (self.clip.1 - self.clip.0) * k as f64 / (n - 1) as f64
    }
}
