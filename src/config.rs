//! TOML run configuration
//!
//! One `[quantity]` section per mean/spread chart and one `[postage.*]`
//! section per postage chart, plus the shared paths and the Black Sea mask
//! boundary. Anything missing or malformed is fatal at load time; no
//! partial render is ever attempted.

use std::{fs, path::Path, path::PathBuf};

use log::info;
use serde::Deserialize;

use crate::field::ValueRange;
use crate::grid::MaskRegion;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read the configuration file {0}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to parse the configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("the [{0}] monthly {1} table holds {2} entries, expected 12")]
    MonthlyTable(&'static str, &'static str, usize),
}
type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub paths: Paths,
    pub mask: MaskRegion,
    pub currents: CurrentsChart,
    pub salinity: ScalarChart,
    pub ssh: ScalarChart,
    pub temperature: TemperatureChart,
    pub postage: Postage,
}
impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Config = toml::from_str(&contents)?;
        config.temperature.check_monthly_tables()?;
        info!("configuration loaded from {:?}", path);
        info!("input base path: {:?}", config.paths.base);
        info!("output base path: {:?}", config.paths.output);
        info!(
            "Black Sea boundary: {}, {}",
            config.mask.boundary_lat, config.mask.boundary_lon
        );
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    /// Mean/spread inputs live under `{base}/{date}/`
    pub base: PathBuf,
    /// Member directory template with `{INSTANCE}` and `{DATE}` placeholders
    pub members: String,
    pub output: PathBuf,
}

/// Mean/spread chart of the one vector quantity
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentsChart {
    pub mean_u_file: String,
    pub mean_v_file: String,
    pub spread_u_file: String,
    pub spread_v_file: String,
    pub output_dir: String,
    pub output_name: String,
    pub mean_colormap: String,
    pub spread_colormap: String,
    pub mean_range: ValueRange,
    pub spread_range: ValueRange,
    pub arrow_stride: usize,
}

/// Mean/spread chart of a scalar quantity with fixed configured ranges
#[derive(Debug, Clone, Deserialize)]
pub struct ScalarChart {
    pub mean_file: String,
    pub spread_file: String,
    pub output_dir: String,
    pub output_name: String,
    pub mean_colormap: String,
    pub spread_colormap: String,
    pub mean_range: ValueRange,
    pub spread_range: ValueRange,
}

/// Spread bounds of one calendar month; the band count comes from the
/// chart's `spread_levels`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MonthlyBounds {
    pub min: f64,
    pub max: f64,
}

/// Mean/spread chart of temperature: the mean range is adaptive and the
/// spread ranges are monthly, split between surface and bottom levels
#[derive(Debug, Clone, Deserialize)]
pub struct TemperatureChart {
    pub mean_file: String,
    pub spread_file: String,
    pub output_dir: String,
    pub output_name: String,
    pub mean_colormap: String,
    pub spread_colormap: String,
    pub mean_levels: usize,
    pub spread_levels: usize,
    pub spread_surface: Vec<MonthlyBounds>,
    pub spread_bottom: Vec<MonthlyBounds>,
}
impl TemperatureChart {
    fn check_monthly_tables(&self) -> Result<()> {
        for (name, table) in [
            ("surface", &self.spread_surface),
            ("bottom", &self.spread_bottom),
        ] {
            if table.len() != 12 {
                return Err(ConfigError::MonthlyTable("temperature", name, table.len()));
            }
        }
        Ok(())
    }
    /// Spread range of a given month (1-12) and depth index; depth indices
    /// 0 and 1 use the surface table
    pub fn spread_range(
        &self,
        month: u32,
        depth_index: usize,
    ) -> std::result::Result<ValueRange, crate::field::RangeError> {
        let table = if depth_index < 2 {
            &self.spread_surface
        } else {
            &self.spread_bottom
        };
        let bounds = table[(month as usize) - 1];
        ValueRange::new(bounds.min, bounds.max, self.spread_levels)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postage {
    pub currents: PostageVectorChart,
    pub salinity: PostageScalarChart,
    pub ssh: PostageScalarChart,
    pub temperature: PostageTemperatureChart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostageVectorChart {
    pub input_u_file: String,
    pub input_v_file: String,
    pub output_dir: String,
    pub output_name: String,
    pub colormap: String,
    pub range: ValueRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostageScalarChart {
    pub input_file: String,
    pub output_dir: String,
    pub output_name: String,
    pub colormap: String,
    pub range: ValueRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostageTemperatureChart {
    pub input_file: String,
    pub output_dir: String,
    pub output_name: String,
    pub colormap: String,
    pub levels: usize,
    pub surface: MonthlyBounds,
    pub bottom: MonthlyBounds,
}
impl PostageTemperatureChart {
    pub fn range(
        &self,
        depth_index: usize,
    ) -> std::result::Result<ValueRange, crate::field::RangeError> {
        let bounds = if depth_index < 2 {
            self.surface
        } else {
            self.bottom
        };
        ValueRange::new(bounds.min, bounds.max, self.levels)
    }
}

/// Substitutes the `{DATE}` and `{DEPTH}` placeholders of a file or
/// directory name template
pub fn expand_template(template: &str, date: &str, depth_index: Option<usize>) -> String {
    let expanded = template.replace("{DATE}", date);
    match depth_index {
        Some(d) => expanded.replace("{DEPTH}", &d.to_string()),
        None => expanded,
    }
}

/// Substitutes the `{INSTANCE}` and `{DATE}` placeholders of a member
/// directory template
pub fn expand_member_template(template: &str, instance: usize, date: &str) -> String {
    template
        .replace("{INSTANCE}", &instance.to_string())
        .replace("{DATE}", date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(n: usize) -> String {
        (0..n)
            .map(|i| format!("{{ min = 0.{i}, max = 1.{i} }}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn sample_config(months: usize) -> String {
        format!(
            r#"
[paths]
base = "/data/ensemble"
members = "/data/ens/{{INSTANCE}}/{{DATE}}"
output = "/data/charts"

[mask]
boundary_lat = 41.3
boundary_lon = 26.3

[currents]
mean_u_file = "mean_u.nc"
mean_v_file = "mean_v.nc"
spread_u_file = "std_u.nc"
spread_v_file = "std_v.nc"
output_dir = "currents"
output_name = "ens_mean_spread_currents_{{DATE}}_{{DEPTH}}.png"
mean_colormap = "viridis"
spread_colormap = "reds"
mean_range = {{ min = 0.0, max = 2.0, levels = 14 }}
spread_range = {{ min = 0.0, max = 0.5, levels = 30 }}
arrow_stride = 10

[salinity]
mean_file = "mean_sal.nc"
spread_file = "std_sal.nc"
output_dir = "salinity"
output_name = "ens_mean_spread_salinity_{{DATE}}_{{DEPTH}}.png"
mean_colormap = "viridis"
spread_colormap = "reds"
mean_range = {{ min = 31.0, max = 41.0, levels = 14 }}
spread_range = {{ min = 0.0, max = 0.5, levels = 30 }}

[ssh]
mean_file = "mean_ssh.nc"
spread_file = "std_ssh.nc"
output_dir = "ssh"
output_name = "ens_mean_spread_ssh_{{DATE}}.png"
mean_colormap = "rainbow"
spread_colormap = "reds"
mean_range = {{ min = -0.6, max = 0.6, levels = 14 }}
spread_range = {{ min = 0.0, max = 0.2, levels = 30 }}

[temperature]
mean_file = "mean_tem.nc"
spread_file = "std_tem.nc"
output_dir = "temperature_{{DATE}}"
output_name = "ens_mean_spread_temperature_{{DATE}}_{{DEPTH}}.png"
mean_colormap = "viridis"
spread_colormap = "reds"
mean_levels = 14
spread_levels = 30
spread_surface = [ {surf} ]
spread_bottom = [ {bott} ]

[postage.currents]
input_u_file = "U_{{DATE}}.nc"
input_v_file = "V_{{DATE}}.nc"
output_dir = "postage_currents"
output_name = "postage_currents_{{DATE}}_{{DEPTH}}.png"
colormap = "jet"
range = {{ min = 0.0, max = 2.0, levels = 14 }}

[postage.salinity]
input_file = "S_{{DATE}}.nc"
output_dir = "postage_salinity"
output_name = "postage_salinity_{{DATE}}_{{DEPTH}}.png"
colormap = "jet"
range = {{ min = 31.0, max = 41.0, levels = 14 }}

[postage.ssh]
input_file = "SSH_{{DATE}}.nc"
output_dir = "postage_ssh"
output_name = "postage_ssh_{{DATE}}.png"
colormap = "jet"
range = {{ min = -0.6, max = 0.6, levels = 14 }}

[postage.temperature]
input_file = "T_{{DATE}}.nc"
output_dir = "postage_temperature"
output_name = "postage_temperature_{{DATE}}_{{DEPTH}}.png"
colormap = "jet"
levels = 14
surface = {{ min = 10.0, max = 30.0 }}
bottom = {{ min = 12.0, max = 16.0 }}
"#,
            surf = monthly(months),
            bott = monthly(months),
        )
    }

    #[test]
    fn a_complete_file_parses() {
        let config: Config = toml::from_str(&sample_config(12)).unwrap();
        config.temperature.check_monthly_tables().unwrap();
        assert_eq!(config.currents.arrow_stride, 10);
        assert_eq!(config.mask.boundary_lat, 41.3);
        assert_eq!(config.postage.temperature.range(0).unwrap().max(), 30.0);
        assert_eq!(config.postage.temperature.range(3).unwrap().max(), 16.0);
    }

    #[test]
    fn a_missing_section_is_fatal() {
        let truncated = sample_config(12).replace("[postage.ssh]", "[postage.mssh]");
        assert!(toml::from_str::<Config>(&truncated).is_err());
    }

    #[test]
    fn an_inverted_range_is_fatal() {
        let broken = sample_config(12).replace(
            "mean_range = { min = 31.0, max = 41.0, levels = 14 }",
            "mean_range = { min = 41.0, max = 31.0, levels = 14 }",
        );
        assert!(toml::from_str::<Config>(&broken).is_err());
    }

    #[test]
    fn a_short_monthly_table_is_fatal() {
        let config: Config = toml::from_str(&sample_config(7)).unwrap();
        assert!(matches!(
            config.temperature.check_monthly_tables(),
            Err(ConfigError::MonthlyTable("temperature", "surface", 7))
        ));
    }

    #[test]
    fn monthly_spread_selection() {
        let config: Config = toml::from_str(&sample_config(12)).unwrap();
        let march_surface = config.temperature.spread_range(3, 0).unwrap();
        assert_eq!(march_surface.min(), 0.2);
        let march_bottom = config.temperature.spread_range(3, 5).unwrap();
        assert_eq!(march_bottom.min(), 0.2);
        assert_eq!(march_surface.level_count(), 30);
    }

    #[test]
    fn template_expansion() {
        assert_eq!(
            expand_template("postage_ssh_{DATE}.png", "2021-05-17_0130", None),
            "postage_ssh_2021-05-17_0130.png"
        );
        assert_eq!(
            expand_template("ens_{DATE}_{DEPTH}.png", "2021-05-17_0130", Some(3)),
            "ens_2021-05-17_0130_3.png"
        );
        assert_eq!(
            expand_member_template("/data/ens/{INSTANCE}/{DATE}", 7, "20210517"),
            "/data/ens/7/20210517"
        );
    }
}
