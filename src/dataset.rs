//! NetCDF ensemble datasets: coordinate axes, CF time parsing, hyperslab
//! field reads and the day-grouped forecast timeline
//!
//! The mean/spread files carry the regular `lat`/`lon`/`depth`/`time`
//! axes; the raw member files use the NEMO names (`nav_lat`/`nav_lon`
//! 2-D, `deptht`/`depthu`/`depthv`, `time_counter`). Both schemes are
//! accepted.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use itertools::Itertools;

use crate::config::expand_member_template;
use crate::field::{FieldError, ScalarField, VectorField};
use crate::grid::{Grid, GridError};

/// Number of members of the forecast ensemble
pub const ENSEMBLE_SIZE: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open the dataset {0}")]
    Open(PathBuf, #[source] netcdf::Error),
    #[error("failed to read from the dataset")]
    Read(#[from] netcdf::Error),
    #[error("variable {0} is missing from {1}")]
    MissingVariable(String, PathBuf),
    #[error("no {0} coordinate found in {1}")]
    MissingCoordinate(&'static str, PathBuf),
    #[error("unsupported time units {0:?}")]
    TimeUnits(String),
    #[error("variable {0} has rank {1}, expected {2}")]
    Rank(String, usize, usize),
    #[error("forecast day {0} requested but the timeline holds {1} days")]
    DayOutOfRange(usize, usize),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Field(#[from] FieldError),
}
type Result<T> = std::result::Result<T, DatasetError>;

/// One open gridded NetCDF input
pub struct NcSource {
    file: netcdf::File,
    path: PathBuf,
}
impl NcSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path).map_err(|e| DatasetError::Open(path.clone(), e))?;
        Ok(Self { file, path })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn variable(&self, name: &str) -> Result<netcdf::Variable> {
        self.file
            .variable(name)
            .ok_or_else(|| DatasetError::MissingVariable(name.to_string(), self.path.clone()))
    }
    fn first_of<'a>(&self, names: &[&'a str]) -> Option<(&'a str, netcdf::Variable)> {
        names
            .iter()
            .find_map(|&name| self.file.variable(name).map(|var| (name, var)))
    }
    /// Coordinate axes of the domain
    ///
    /// Either the 1-D `lat`/`lon` pair or the 2-D NEMO `nav_lat`/`nav_lon`
    /// pair, reduced to its first column/row.
    pub fn grid(&self) -> Result<Grid> {
        if let (Some((_, lat)), Some((_, lon))) =
            (self.first_of(&["lat"]), self.first_of(&["lon"]))
        {
            return Ok(Grid::new(lat.get_values(..)?, lon.get_values(..)?)?);
        }
        let (_, lat) = self
            .first_of(&["nav_lat"])
            .ok_or(DatasetError::MissingCoordinate("latitude", self.path.clone()))?;
        let (_, lon) = self
            .first_of(&["nav_lon"])
            .ok_or(DatasetError::MissingCoordinate("longitude", self.path.clone()))?;
        let lats: Vec<f64> = lat.get_values((.., 0))?;
        let lons: Vec<f64> = lon.get_values((0, ..))?;
        Ok(Grid::new(lats, lons)?)
    }
    /// Depth axis values in metres
    pub fn depths(&self) -> Result<Vec<f64>> {
        let (_, var) = self
            .first_of(&["depth", "deptht", "depthu", "depthv"])
            .ok_or(DatasetError::MissingCoordinate("depth", self.path.clone()))?;
        Ok(var.get_values(..)?)
    }
    /// Time axis decoded from its CF `"<unit> since <origin>"` units
    pub fn times(&self) -> Result<Vec<NaiveDateTime>> {
        let (_, var) = self
            .first_of(&["time", "time_counter"])
            .ok_or(DatasetError::MissingCoordinate("time", self.path.clone()))?;
        let units = match var
            .attribute("units")
            .ok_or(DatasetError::TimeUnits(String::from("<none>")))?
            .value()?
        {
            netcdf::AttributeValue::Str(s) => s,
            other => return Err(DatasetError::TimeUnits(format!("{other:?}"))),
        };
        let (seconds_per_unit, origin) = parse_time_units(&units)?;
        let offsets: Vec<f64> = var.get_values(..)?;
        Ok(offsets
            .into_iter()
            .map(|offset| origin + Duration::seconds((offset * seconds_per_unit).round() as i64))
            .collect())
    }
    /// One (lat, lon) hyperslab of `name` at a timestep and optional depth
    /// index; fill values become NaN
    pub fn field(&self, name: &str, timestep: usize, depth: Option<usize>) -> Result<ScalarField> {
        let var = self.variable(name)?;
        let rank = var.dimensions().len();
        let values: Vec<f64> = match (rank, depth) {
            (4, Some(d)) => var.get_values((timestep, d, .., ..))?,
            (3, None) => var.get_values((timestep, .., ..))?,
            (_, Some(_)) => return Err(DatasetError::Rank(name.to_string(), rank, 4)),
            (_, None) => return Err(DatasetError::Rank(name.to_string(), rank, 3)),
        };
        let dims = var.dimensions();
        let (nlat, nlon) = (dims[rank - 2].len(), dims[rank - 1].len());
        let fill = fill_value(&var);
        let values = values
            .into_iter()
            .map(|v| match fill {
                Some(fill) if v == fill => f64::NAN,
                _ => v,
            })
            .collect();
        Ok(ScalarField::new(values, nlat, nlon)?)
    }
    /// Vector field read as a (u, v) variable pair from two sources
    pub fn vector_field(
        u_source: &NcSource,
        v_source: &NcSource,
        u_name: &str,
        v_name: &str,
        timestep: usize,
        depth: Option<usize>,
    ) -> Result<VectorField> {
        Ok(VectorField::new(
            u_source.field(u_name, timestep, depth)?,
            v_source.field(v_name, timestep, depth)?,
        )?)
    }
}

fn fill_value(var: &netcdf::Variable) -> Option<f64> {
    ["_FillValue", "missing_value"]
        .iter()
        .find_map(|&name| var.attribute(name))
        .and_then(|attr| attr.value().ok())
        .and_then(|value| match value {
            netcdf::AttributeValue::Double(x) => Some(x),
            netcdf::AttributeValue::Float(x) => Some(x as f64),
            netcdf::AttributeValue::Int(x) => Some(x as f64),
            netcdf::AttributeValue::Short(x) => Some(x as f64),
            _ => None,
        })
}

fn parse_time_units(units: &str) -> Result<(f64, NaiveDateTime)> {
    let (unit, origin) = units
        .split_once(" since ")
        .ok_or_else(|| DatasetError::TimeUnits(units.to_string()))?;
    let seconds_per_unit = match unit.trim() {
        "seconds" | "second" => 1.0,
        "minutes" | "minute" => 60.0,
        "hours" | "hour" => 3600.0,
        "days" | "day" => 86400.0,
        _ => return Err(DatasetError::TimeUnits(units.to_string())),
    };
    let origin = origin.trim();
    let origin = NaiveDateTime::parse_from_str(origin, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(origin, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(origin, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap())
        })
        .map_err(|_| DatasetError::TimeUnits(units.to_string()))?;
    Ok((seconds_per_unit, origin))
}

/// The ten member files of one quantity, resolved from the `{INSTANCE}` /
/// `{DATE}` directory template
pub fn open_members(dir_template: &str, file_name: &str, date: &str) -> Result<Vec<NcSource>> {
    (0..ENSEMBLE_SIZE)
        .map(|instance| {
            let dir = expand_member_template(dir_template, instance, date);
            NcSource::open(Path::new(&dir).join(file_name))
        })
        .collect()
}

/// One calendar day of the forecast timeline and the timestep indices
/// belonging to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub timesteps: Vec<usize>,
}

/// Groups consecutive timesteps by calendar day, in timeline order
pub fn group_by_day(times: &[NaiveDateTime]) -> Vec<ForecastDay> {
    let grouped = times.iter().enumerate().chunk_by(|(_, t)| t.date());
    let mut days = vec![];
    for (date, group) in &grouped {
        days.push(ForecastDay {
            date,
            timesteps: group.map(|(index, _)| index).collect(),
        });
    }
    days
}

/// Timestep indices of the selected forecast day
pub fn select_day(days: &[ForecastDay], day_index: usize) -> Result<&ForecastDay> {
    days.get(day_index)
        .ok_or(DatasetError::DayOutOfRange(day_index, days.len()))
}

/// Date and time labels of one rendered frame
#[derive(Debug, Clone, Copy)]
pub struct FrameStamp(pub NaiveDateTime);
impl FrameStamp {
    /// `{DATE}` substitution of the output name templates
    pub fn file_stamp(&self) -> String {
        self.0.format("%Y-%m-%d_%H%M").to_string()
    }
    /// "Timestep:" line of the chart titles; the forecast timeline is
    /// half-hourly so the minute is fixed at :30 as in the legacy charts
    pub fn title_stamp(&self) -> String {
        format!("{}, {:02}:30", self.0.date(), self.0.hour())
    }
    /// "Daily mean:" line of the daily charts
    pub fn day_stamp(&self) -> String {
        self.0.date().to_string()
    }
    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    #[test]
    fn time_units_parsing() {
        let (scale, origin) = parse_time_units("seconds since 2021-05-17 00:30:00").unwrap();
        assert_eq!(scale, 1.0);
        assert_eq!(origin, datetime(2021, 5, 17, 0));
        let (scale, origin) = parse_time_units("days since 1950-01-01").unwrap();
        assert_eq!(scale, 86400.0);
        assert_eq!(origin.date(), NaiveDate::from_ymd_opt(1950, 1, 1).unwrap());
        assert!(parse_time_units("fortnights since 1950-01-01").is_err());
        assert!(parse_time_units("seconds").is_err());
    }

    #[test]
    fn days_are_grouped_in_timeline_order() {
        let times: Vec<_> = (0..6)
            .map(|k| datetime(2021, 5, 17, 0) + Duration::hours(12 * k))
            .collect();
        let days = group_by_day(&times);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2021, 5, 17).unwrap());
        assert_eq!(days[0].timesteps, vec![0, 1]);
        assert_eq!(days[2].timesteps, vec![4, 5]);
        assert_eq!(select_day(&days, 1).unwrap(), &days[1]);
        assert!(matches!(
            select_day(&days, 3),
            Err(DatasetError::DayOutOfRange(3, 3))
        ));
    }

    #[test]
    fn frame_stamps() {
        let stamp = FrameStamp(datetime(2021, 5, 17, 13));
        assert_eq!(stamp.file_stamp(), "2021-05-17_1330");
        assert_eq!(stamp.title_stamp(), "2021-05-17, 13:30");
        assert_eq!(stamp.day_stamp(), "2021-05-17");
        assert_eq!(stamp.month(), 5);
    }

    #[test]
    fn fields_read_from_a_real_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stat.nc");
        {
            let mut file = netcdf::create(&path)?;
            file.add_dimension("time", 2)?;
            file.add_dimension("depth", 2)?;
            file.add_dimension("lat", 2)?;
            file.add_dimension("lon", 3)?;
            let mut time = file.add_variable::<f64>("time", &["time"])?;
            time.put_attribute("units", "hours since 2021-05-17 00:30:00")?;
            time.put_values(&[0.0, 24.0], ..)?;
            let mut depth = file.add_variable::<f64>("depth", &["depth"])?;
            depth.put_values(&[1.0, 10.0], ..)?;
            let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
            lat.put_values(&[30.0, 31.0], ..)?;
            let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
            lon.put_values(&[-6.0, -5.0, -4.0], ..)?;
            let mut var =
                file.add_variable::<f64>("votemper", &["time", "depth", "lat", "lon"])?;
            var.put_attribute("_FillValue", 1e20)?;
            let samples: Vec<f64> = (0..24)
                .map(|k| if k == 13 { 1e20 } else { k as f64 })
                .collect();
            var.put_values(&samples, (.., .., .., ..))?;
        }
        let source = NcSource::open(&path)?;
        let grid = source.grid()?;
        assert_eq!(grid.nlat(), 2);
        assert_eq!(grid.nlon(), 3);
        assert_eq!(source.depths()?, vec![1.0, 10.0]);
        let times = source.times()?;
        assert_eq!(times[1], datetime(2021, 5, 18, 0));
        let field = source.field("votemper", 1, Some(0))?;
        // timestep 1, depth 0 starts at flat offset 12; offset 13 is filled
        assert_eq!(field.get(0, 0), 12.0);
        assert!(field.get(0, 1).is_nan());
        assert_eq!(field.get(1, 2), 17.0);
        assert!(source.field("vosaline", 0, Some(0)).is_err());
        assert!(source.field("votemper", 0, None).is_err());
        Ok(())
    }
}
