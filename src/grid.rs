//! Geographic grid axes and the Black Sea exclusion corner

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("the {0} axis is empty")]
    EmptyAxis(&'static str),
    #[error("the {0} axis is not strictly increasing")]
    NotIncreasing(&'static str),
    #[error("decimation stride must be at least 1")]
    ZeroStride,
}
type Result<T> = std::result::Result<T, GridError>;

/// Rectangular geographic domain given by its 1-D coordinate axes
///
/// Latitudes run south to north, longitudes west to east, both strictly
/// increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lats: Vec<f64>,
    lons: Vec<f64>,
}
impl Grid {
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self> {
        check_axis(&lats, "latitude")?;
        check_axis(&lons, "longitude")?;
        Ok(Self { lats, lons })
    }
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }
    pub fn nlat(&self) -> usize {
        self.lats.len()
    }
    pub fn nlon(&self) -> usize {
        self.lons.len()
    }
    /// Domain corners as ((south, west), (north, east))
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        (
            (self.lats[0], self.lons[0]),
            (*self.lats.last().unwrap(), *self.lons.last().unwrap()),
        )
    }
    /// Keeps every `stride`-th coordinate along both axes
    pub fn decimate(&self, stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(GridError::ZeroStride);
        }
        Ok(Self {
            lats: self.lats.iter().step_by(stride).copied().collect(),
            lons: self.lons.iter().step_by(stride).copied().collect(),
        })
    }
}

fn check_axis(axis: &[f64], name: &'static str) -> Result<()> {
    if axis.is_empty() {
        return Err(GridError::EmptyAxis(name));
    }
    if axis.windows(2).any(|w| w[0] >= w[1]) {
        return Err(GridError::NotIncreasing(name));
    }
    Ok(())
}

/// Rectangular exclusion corner, used to blank the Black Sea
///
/// A cell is masked out when its latitude exceeds `boundary_lat` AND its
/// longitude exceeds `boundary_lon`; it is kept when either coordinate is
/// within the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MaskRegion {
    pub boundary_lat: f64,
    pub boundary_lon: f64,
}
impl MaskRegion {
    pub fn masks(&self, lat: f64, lon: f64) -> bool {
        lat > self.boundary_lat && lon > self.boundary_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increasing_axes() {
        assert!(Grid::new(vec![30., 31., 32.], vec![-6., -5.]).is_ok());
        assert!(matches!(
            Grid::new(vec![32., 31.], vec![-6., -5.]),
            Err(GridError::NotIncreasing("latitude"))
        ));
        assert!(matches!(
            Grid::new(vec![30., 31.], vec![]),
            Err(GridError::EmptyAxis("longitude"))
        ));
    }

    #[test]
    fn decimation_is_a_subsequence() {
        let grid = Grid::new((0..10).map(f64::from).collect(), (0..7).map(f64::from).collect())
            .unwrap();
        let coarse = grid.decimate(3).unwrap();
        assert_eq!(coarse.lats(), &[0., 3., 6., 9.]);
        assert_eq!(coarse.lons(), &[0., 3., 6.]);
        assert_eq!(grid.decimate(1).unwrap(), grid);
        assert!(grid.decimate(0).is_err());
    }

    #[test]
    fn mask_corner_rule() {
        let region = MaskRegion {
            boundary_lat: 41.3,
            boundary_lon: 26.3,
        };
        assert!(region.masks(42.0, 30.0));
        assert!(!region.masks(42.0, 20.0));
        assert!(!region.masks(40.0, 30.0));
        // a boundary above the whole domain masks nothing
        let top = MaskRegion {
            boundary_lat: 90.0,
            boundary_lon: 180.0,
        };
        assert!(!top.masks(45.0, 36.0));
        // a boundary below the whole domain masks everything
        let bottom = MaskRegion {
            boundary_lat: -90.0,
            boundary_lon: -180.0,
        };
        assert!(bottom.masks(30.0, -6.0));
    }
}
