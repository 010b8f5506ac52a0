//! Gridded scalar and vector fields and the transforms that make them
//! renderable
//!
//! Every operation returns a new field; inputs are never mutated and no
//! operation performs I/O. The missing-value marker is `f64::NAN`.

mod range;
pub use range::{RangeError, RangePolicy, ValueRange};

use itertools::Itertools;
use itertools::MinMaxResult::{MinMax, OneElement};

use crate::grid::{Grid, MaskRegion};

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("field shape ({0}, {1}) does not match ({2}, {3})")]
    ShapeMismatch(usize, usize, usize, usize),
    #[error("sample buffer holds {0} values, expected {1}x{2}")]
    BufferSize(usize, usize, usize),
    #[error("the field has no finite values")]
    NoFiniteValues,
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Grid(#[from] crate::grid::GridError),
}
type Result<T> = std::result::Result<T, FieldError>;

/// 2-D array of samples, row-major, indexed `[row = lat, col = lon]`
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    values: Vec<f64>,
    nlat: usize,
    nlon: usize,
}
impl ScalarField {
    pub fn new(values: Vec<f64>, nlat: usize, nlon: usize) -> Result<Self> {
        if values.len() != nlat * nlon {
            return Err(FieldError::BufferSize(values.len(), nlat, nlon));
        }
        Ok(Self { values, nlat, nlon })
    }
    pub fn nlat(&self) -> usize {
        self.nlat
    }
    pub fn nlon(&self) -> usize {
        self.nlon
    }
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.nlon + col]
    }
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }
    fn same_shape(&self, other: &ScalarField) -> Result<()> {
        if (self.nlat, self.nlon) != (other.nlat, other.nlon) {
            return Err(FieldError::ShapeMismatch(
                self.nlat, self.nlon, other.nlat, other.nlon,
            ));
        }
        Ok(())
    }
    fn matches_grid(&self, grid: &Grid) -> Result<()> {
        if (self.nlat, self.nlon) != (grid.nlat(), grid.nlon()) {
            return Err(FieldError::ShapeMismatch(
                self.nlat,
                self.nlon,
                grid.nlat(),
                grid.nlon(),
            ));
        }
        Ok(())
    }
    /// Clips every sample into `[range.min, range.max]`; NaN passes through
    pub fn clamp_to_range(&self, range: &ValueRange) -> ScalarField {
        let values = self
            .values
            .iter()
            .map(|&v| {
                if v.is_nan() {
                    v
                } else {
                    v.clamp(range.min(), range.max())
                }
            })
            .collect();
        ScalarField {
            values,
            nlat: self.nlat,
            nlon: self.nlon,
        }
    }
    /// Blanks the cells inside the exclusion corner
    ///
    /// The field shape must match the grid; a mismatch is a caller error,
    /// never an all-missing result.
    pub fn mask_region(&self, grid: &Grid, region: &MaskRegion) -> Result<ScalarField> {
        self.matches_grid(grid)?;
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(k, &v)| {
                let (row, col) = (k / self.nlon, k % self.nlon);
                if region.masks(grid.lats()[row], grid.lons()[col]) {
                    f64::NAN
                } else {
                    v
                }
            })
            .collect();
        Ok(ScalarField {
            values,
            nlat: self.nlat,
            nlon: self.nlon,
        })
    }
    /// Blanks non-positive samples (temperature means treat them as land)
    pub fn mask_non_positive(&self) -> ScalarField {
        let values = self
            .values
            .iter()
            .map(|&v| if v > 0.0 { v } else { f64::NAN })
            .collect();
        ScalarField {
            values,
            nlat: self.nlat,
            nlon: self.nlon,
        }
    }
    /// Keeps every `stride`-th sample along both axes
    pub fn decimate(&self, stride: usize) -> Result<ScalarField> {
        if stride == 0 {
            return Err(crate::grid::GridError::ZeroStride.into());
        }
        let values: Vec<f64> = (0..self.nlat)
            .step_by(stride)
            .flat_map(|row| {
                (0..self.nlon)
                    .step_by(stride)
                    .map(move |col| self.get(row, col))
            })
            .collect();
        let nlat = self.nlat.div_ceil(stride);
        let nlon = self.nlon.div_ceil(stride);
        ScalarField::new(values, nlat, nlon)
    }
    /// Range spanning the finite samples of the field
    ///
    /// An all-missing field is a distinct failure, never a degenerate
    /// min = max range.
    pub fn adaptive_range(&self, level_count: usize) -> Result<ValueRange> {
        match self.values.iter().filter(|v| v.is_finite()).minmax() {
            MinMax(&min, &max) => Ok(ValueRange::new(min, max, level_count)?),
            OneElement(&v) => Err(RangeError::Bounds(v, v).into()),
            _ => Err(FieldError::NoFiniteValues),
        }
    }
}

/// (u, v) component pair over one grid
#[derive(Debug, Clone)]
pub struct VectorField {
    pub u: ScalarField,
    pub v: ScalarField,
}
impl VectorField {
    pub fn new(u: ScalarField, v: ScalarField) -> Result<Self> {
        u.same_shape(&v)?;
        Ok(Self { u, v })
    }
    /// Element-wise `sqrt(u^2 + v^2)`; NaN in either component propagates
    pub fn magnitude(&self) -> ScalarField {
        let values = self
            .u
            .values
            .iter()
            .zip(&self.v.values)
            .map(|(&u, &v)| u.hypot(v))
            .collect();
        ScalarField {
            values,
            nlat: self.u.nlat,
            nlon: self.u.nlon,
        }
    }
    /// Keeps every `stride`-th sample of both components and the grid axes,
    /// for arrow rendering; stride 1 is the full-density identity
    pub fn decimate(&self, grid: &Grid, stride: usize) -> Result<(VectorField, Grid)> {
        self.u.matches_grid(grid)?;
        Ok((
            VectorField {
                u: self.u.decimate(stride)?,
                v: self.v.decimate(stride)?,
            },
            grid.decimate(stride)?,
        ))
    }
    pub fn mask_region(&self, grid: &Grid, region: &MaskRegion) -> Result<VectorField> {
        Ok(VectorField {
            u: self.u.mask_region(grid, region)?,
            v: self.v.mask_region(grid, region)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(values: Vec<f64>, nlat: usize, nlon: usize) -> ScalarField {
        ScalarField::new(values, nlat, nlon).unwrap()
    }

    #[test]
    fn clamp_is_idempotent() {
        let range = ValueRange::new(0.0, 1.0, 10).unwrap();
        let raw = field(vec![-0.5, 0.3, 1.7, f64::NAN], 2, 2);
        let once = raw.clamp_to_range(&range);
        assert_eq!(once.get(0, 0), 0.0);
        assert_eq!(once.get(0, 1), 0.3);
        assert_eq!(once.get(1, 0), 1.0);
        assert!(once.get(1, 1).is_nan());
        let twice = once.clamp_to_range(&range);
        assert_eq!(once.get(0, 0), twice.get(0, 0));
        assert_eq!(once.get(1, 0), twice.get(1, 0));
    }

    #[test]
    fn magnitude_of_a_3_4_flow() {
        let u = field(vec![3.0, -3.0, f64::NAN, 0.0], 2, 2);
        let v = field(vec![4.0, 4.0, 1.0, 0.0], 2, 2);
        let mag = VectorField::new(u, v).unwrap().magnitude();
        assert_eq!(mag.get(0, 0), 5.0);
        // sign flips do not change the magnitude
        assert_eq!(mag.get(0, 1), 5.0);
        assert!(mag.get(1, 0).is_nan());
        assert_eq!(mag.get(1, 1), 0.0);
    }

    #[test]
    fn component_shape_mismatch() {
        let u = field(vec![0.0; 4], 2, 2);
        let v = field(vec![0.0; 6], 2, 3);
        assert!(matches!(
            VectorField::new(u, v),
            Err(FieldError::ShapeMismatch(2, 2, 2, 3))
        ));
    }

    #[test]
    fn mask_boundary_extremes() {
        let grid = Grid::new(vec![30.0, 40.0], vec![-6.0, 36.0]).unwrap();
        let raw = field(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        // boundary above the domain: nothing masked
        let kept = raw
            .mask_region(
                &grid,
                &MaskRegion {
                    boundary_lat: 90.0,
                    boundary_lon: 180.0,
                },
            )
            .unwrap();
        assert_eq!(kept, raw);
        // boundary below the domain: everything masked
        let gone = raw
            .mask_region(
                &grid,
                &MaskRegion {
                    boundary_lat: -90.0,
                    boundary_lon: -180.0,
                },
            )
            .unwrap();
        assert!(gone.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn mask_blanks_the_north_east_corner() {
        let grid = Grid::new(vec![40.0, 42.0], vec![20.0, 30.0]).unwrap();
        let raw = field(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let masked = raw
            .mask_region(
                &grid,
                &MaskRegion {
                    boundary_lat: 41.3,
                    boundary_lon: 26.3,
                },
            )
            .unwrap();
        assert_eq!(masked.get(0, 0), 1.0);
        assert_eq!(masked.get(0, 1), 2.0);
        assert_eq!(masked.get(1, 0), 3.0);
        assert!(masked.get(1, 1).is_nan());
    }

    #[test]
    fn mask_rejects_a_mismatched_grid() {
        let grid = Grid::new(vec![30.0, 40.0, 45.0], vec![-6.0, 36.0]).unwrap();
        let raw = field(vec![0.0; 4], 2, 2);
        let region = MaskRegion {
            boundary_lat: 41.3,
            boundary_lon: 26.3,
        };
        assert!(raw.mask_region(&grid, &region).is_err());
    }

    #[test]
    fn decimation_keeps_a_subsequence() {
        let grid =
            Grid::new((0..5).map(f64::from).collect(), (0..5).map(f64::from).collect()).unwrap();
        let u = field((0..25).map(f64::from).collect(), 5, 5);
        let v = u.clone();
        let flow = VectorField::new(u.clone(), v).unwrap();
        let (decimated, coarse) = flow.decimate(&grid, 2).unwrap();
        assert_eq!(decimated.u.nlat(), 3);
        assert_eq!(decimated.u.nlon(), 3);
        assert_eq!(coarse.nlat(), 3);
        assert_eq!(decimated.u.get(1, 1), u.get(2, 2));
        assert_eq!(decimated.u.get(2, 0), u.get(4, 0));
        let (identity, full) = flow.decimate(&grid, 1).unwrap();
        assert_eq!(identity.u, u);
        assert_eq!(full, grid);
        assert!(flow.decimate(&grid, 0).is_err());
    }

    #[test]
    fn adaptive_range_ignores_missing_samples() {
        let raw = field(vec![1.0, f64::NAN, 3.0, 2.0], 2, 2);
        let range = raw.adaptive_range(14).unwrap();
        assert_eq!(range.min(), 1.0);
        assert_eq!(range.max(), 3.0);
        let empty = field(vec![f64::NAN; 4], 2, 2);
        assert!(matches!(
            empty.adaptive_range(14),
            Err(FieldError::NoFiniteValues)
        ));
    }

    #[test]
    fn non_positive_mask() {
        let raw = field(vec![14.2, 0.0, -3.0, 18.1], 2, 2);
        let masked = raw.mask_non_positive();
        assert_eq!(masked.get(0, 0), 14.2);
        assert!(masked.get(0, 1).is_nan());
        assert!(masked.get(1, 0).is_nan());
    }
}
