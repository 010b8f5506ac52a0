//! The shared render pipeline
//!
//! One parameterized driver replaces the original per-quantity chart
//! procedures: open the inputs, group the timeline by forecast day,
//! prepare each field and hand it to the chart layer, one PNG per
//! timestep/depth combination, strictly in sequence.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::info;

use crate::chart::{
    Colormap, FillLayer, FilledPanel, LineLayer, MemberPanel, OverlayFigure, PostageFigure,
    StackedFigure, LAND_GRAY, LAND_WHITE,
};
use crate::config::{expand_template, Config, PostageScalarChart, ScalarChart};
use crate::dataset::{group_by_day, open_members, select_day, FrameStamp, NcSource};
use crate::field::{RangePolicy, ScalarField, ValueRange};
use crate::grid::Grid;
use crate::quantity::Quantity;
use crate::Error;

type Result<T> = std::result::Result<T, Error>;

/// One chart run: the loaded configuration, the forecast run date
/// (`YYYYMMDD`, used in input paths) and the selected forecast day
pub struct Job<'a> {
    pub config: &'a Config,
    pub date: String,
    pub day_index: usize,
}

impl Job<'_> {
    /// Renders the mean/spread chart family of one quantity
    pub fn mean_spread(&self, quantity: Quantity) -> Result<()> {
        info!("rendering mean/spread {quantity} charts for run {}", self.date);
        match quantity {
            Quantity::Currents => self.mean_spread_currents(),
            Quantity::Salinity => self.mean_spread_scalar(Quantity::Salinity, &self.config.salinity),
            Quantity::Ssh => self.mean_spread_ssh(),
            Quantity::Temperature => self.mean_spread_temperature(),
        }
    }

    /// Renders the postage-stamp chart of one quantity
    pub fn postage(&self, quantity: Quantity) -> Result<()> {
        info!("rendering postage {quantity} charts for run {}", self.date);
        match quantity {
            Quantity::Currents => self.postage_currents(),
            Quantity::Salinity => self.postage_scalar(Quantity::Salinity, &self.config.postage.salinity),
            Quantity::Ssh => self.postage_scalar(Quantity::Ssh, &self.config.postage.ssh),
            Quantity::Temperature => self.postage_temperature(),
        }
    }

    fn input(&self, file: &str) -> PathBuf {
        self.config.paths.base.join(&self.date).join(file)
    }

    fn output_dir(&self, template: &str) -> Result<PathBuf> {
        let dir = self
            .config
            .paths
            .output
            .join(expand_template(template, &self.date, None));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Timestep indices to render: the whole timeline, or one forecast day
    fn frame_timesteps(&self, source: &NcSource, day_selected: bool) -> Result<Vec<(usize, FrameStamp)>> {
        let times = source.times()?;
        let indices: Vec<usize> = if day_selected {
            let days = group_by_day(&times);
            select_day(&days, self.day_index)?.timesteps.clone()
        } else {
            (0..times.len()).collect()
        };
        Ok(indices
            .into_iter()
            .map(|t| (t, FrameStamp(times[t])))
            .collect())
    }

    fn mean_spread_currents(&self) -> Result<()> {
        let chart = &self.config.currents;
        let mean_u = NcSource::open(self.input(&chart.mean_u_file))?;
        let mean_v = NcSource::open(self.input(&chart.mean_v_file))?;
        let spread_u = NcSource::open(self.input(&chart.spread_u_file))?;
        let spread_v = NcSource::open(self.input(&chart.spread_v_file))?;
        let grid = spread_u.grid()?;
        let depths = spread_u.depths()?;
        let frames = self.frame_timesteps(&spread_u, Quantity::Currents.day_selected())?;
        let dir = self.output_dir(&chart.output_dir)?;
        let mean_cmap = Colormap::named(&chart.mean_colormap)?;
        let spread_cmap = Colormap::named(&chart.spread_colormap)?;
        let [u_name, v_name] = [
            Quantity::Currents.variables()[0],
            Quantity::Currents.variables()[1],
        ];
        let pb = ProgressBar::new((frames.len() * depths.len()) as u64);
        for (t, stamp) in frames {
            for depth_index in 0..depths.len() {
                let mean_flow = NcSource::vector_field(
                    &mean_u, &mean_v, u_name, v_name, t, Some(depth_index),
                )?;
                let spread_flow = NcSource::vector_field(
                    &spread_u, &spread_v, u_name, v_name, t, Some(depth_index),
                )?;
                let raw_spread = spread_flow.magnitude();
                // clip-into-range policy: both series are clamped before banding
                let spread = raw_spread.clamp_to_range(&chart.spread_range);
                let mean = mean_flow.magnitude().clamp_to_range(&chart.mean_range);
                let (arrow_flow, arrow_grid) = mean_flow.decimate(&grid, chart.arrow_stride)?;
                let figure = OverlayFigure {
                    grid: &grid,
                    land: &raw_spread,
                    land_color: LAND_WHITE,
                    spread: FillLayer {
                        field: &spread,
                        range: chart.spread_range,
                        levels: chart.spread_range.levels(),
                        colormap: spread_cmap,
                        ticks: chart.spread_range.ticks(0.1)?,
                        label: Quantity::Currents.spread_label(),
                        extend: false,
                    },
                    mean: LineLayer {
                        field: &mean,
                        range: chart.mean_range,
                        levels: chart.mean_range.levels(),
                        colormap: mean_cmap,
                        ticks: chart.mean_range.integer_ticks(),
                        label: Quantity::Currents.mean_label(),
                        extend: false,
                    },
                    arrows: Some((&arrow_flow, &arrow_grid)),
                    graticule: false,
                    title: [
                        Quantity::Currents.mean_spread_title(None),
                        format!("Timestep: {}", stamp.title_stamp()),
                    ],
                };
                let path = dir.join(expand_template(
                    &chart.output_name,
                    &stamp.file_stamp(),
                    Some(depth_index),
                ));
                figure.render(&path)?;
                generated(&path);
                pb.inc(1);
            }
        }
        pb.finish_and_clear();
        Ok(())
    }

    fn mean_spread_scalar(&self, quantity: Quantity, chart: &ScalarChart) -> Result<()> {
        let mean_src = NcSource::open(self.input(&chart.mean_file))?;
        let spread_src = NcSource::open(self.input(&chart.spread_file))?;
        let grid = spread_src.grid()?;
        let depths = spread_src.depths()?;
        let frames = self.frame_timesteps(&spread_src, quantity.day_selected())?;
        let dir = self.output_dir(&chart.output_dir)?;
        let mean_cmap = Colormap::named(&chart.mean_colormap)?;
        let spread_cmap = Colormap::named(&chart.spread_colormap)?;
        let variable = quantity.variables()[0];
        let pb = ProgressBar::new((frames.len() * depths.len()) as u64);
        for (t, stamp) in frames {
            for depth_index in 0..depths.len() {
                let raw_mean = mean_src.field(variable, t, Some(depth_index))?;
                let raw_spread = spread_src.field(variable, t, Some(depth_index))?;
                let spread = raw_spread.mask_region(&grid, &self.config.mask)?;
                self.render_overlay(OverlayParams {
                    quantity,
                    grid: &grid,
                    land: &raw_spread,
                    mean: &raw_mean,
                    spread: &spread,
                    mean_range: chart.mean_range,
                    spread_range: chart.spread_range,
                    mean_cmap,
                    spread_cmap,
                    stamp,
                    depth: Some(depths[depth_index]),
                    path: dir.join(expand_template(
                        &chart.output_name,
                        &stamp.file_stamp(),
                        Some(depth_index),
                    )),
                })?;
                pb.inc(1);
            }
        }
        pb.finish_and_clear();
        Ok(())
    }

    fn mean_spread_ssh(&self) -> Result<()> {
        let chart = &self.config.ssh;
        let mean_src = NcSource::open(self.input(&chart.mean_file))?;
        let spread_src = NcSource::open(self.input(&chart.spread_file))?;
        let grid = spread_src.grid()?;
        let frames = self.frame_timesteps(&spread_src, Quantity::Ssh.day_selected())?;
        let dir = self.output_dir(&chart.output_dir)?;
        // the legacy ssh chart splices its own mean scale: a rainbow with
        // the bottom 15% dropped, resampled through 10 stops
        let mean_cmap = Colormap::named(&chart.mean_colormap)?.truncated(0.15, 1.0, 10)?;
        let spread_cmap = Colormap::named(&chart.spread_colormap)?.white_floored(0.3)?;
        let variable = Quantity::Ssh.variables()[0];
        let pb = ProgressBar::new(frames.len() as u64);
        for (t, stamp) in frames {
            let raw_mean = mean_src.field(variable, t, None)?;
            let raw_spread = spread_src.field(variable, t, None)?;
            let spread = raw_spread.mask_region(&grid, &self.config.mask)?;
            self.render_overlay(OverlayParams {
                quantity: Quantity::Ssh,
                grid: &grid,
                land: &raw_spread,
                mean: &raw_mean,
                spread: &spread,
                mean_range: chart.mean_range,
                spread_range: chart.spread_range,
                mean_cmap,
                spread_cmap,
                stamp,
                depth: None,
                path: dir.join(expand_template(&chart.output_name, &stamp.file_stamp(), None)),
            })?;
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(())
    }

    fn render_overlay(&self, params: OverlayParams) -> Result<()> {
        let quantity = params.quantity;
        let figure = OverlayFigure {
            grid: params.grid,
            land: params.land,
            land_color: LAND_GRAY,
            spread: FillLayer {
                field: params.spread,
                range: params.spread_range,
                levels: params.spread_range.levels(),
                colormap: params.spread_cmap,
                ticks: params.spread_range.ticks(quantity.spread_tick_step())?,
                label: quantity.spread_label(),
                extend: quantity.range_policy() == RangePolicy::Extend,
            },
            mean: LineLayer {
                field: params.mean,
                range: params.mean_range,
                levels: params.mean_range.levels(),
                colormap: params.mean_cmap,
                ticks: params.mean_range.integer_ticks(),
                label: quantity.mean_label(),
                extend: quantity.range_policy() == RangePolicy::Extend,
            },
            arrows: None,
            graticule: true,
            title: [
                quantity.mean_spread_title(params.depth),
                format!("Timestep: {}", params.stamp.title_stamp()),
            ],
        };
        figure.render(&params.path)?;
        generated(&params.path);
        Ok(())
    }

    fn mean_spread_temperature(&self) -> Result<()> {
        let chart = &self.config.temperature;
        let mean_src = NcSource::open(self.input(&chart.mean_file))?;
        let spread_src = NcSource::open(self.input(&chart.spread_file))?;
        let grid = spread_src.grid()?;
        let depths = spread_src.depths()?;
        let frames = self.frame_timesteps(&spread_src, Quantity::Temperature.day_selected())?;
        let dir = self.output_dir(&chart.output_dir)?;
        let mean_cmap = Colormap::named(&chart.mean_colormap)?;
        let spread_cmap = Colormap::named(&chart.spread_colormap)?.white_floored(0.2)?;
        let variable = Quantity::Temperature.variables()[0];
        let pb = ProgressBar::new((frames.len() * depths.len()) as u64);
        for (t, stamp) in frames {
            for depth_index in 0..depths.len() {
                let raw_mean = mean_src.field(variable, t, Some(depth_index))?;
                let raw_spread = spread_src.field(variable, t, Some(depth_index))?;
                // land first, then the Black Sea corner; the mean scale
                // adapts to what is left
                let mean = raw_mean
                    .mask_non_positive()
                    .mask_region(&grid, &self.config.mask)?;
                let mean_range = mean.adaptive_range(chart.mean_levels)?;
                let spread = raw_spread.mask_region(&grid, &self.config.mask)?;
                let spread_range = chart.spread_range(stamp.month(), depth_index)?;
                let depth = depths[depth_index] as i64;
                let figure = StackedFigure {
                    grid: &grid,
                    top: FilledPanel {
                        land: &raw_mean,
                        land_color: LAND_GRAY,
                        layer: FillLayer {
                            field: &mean,
                            range: mean_range,
                            levels: mean_range.levels(),
                            colormap: mean_cmap,
                            ticks: mean_range.integer_ticks(),
                            label: Quantity::Temperature.mean_label(),
                            extend: true,
                        },
                        title: [
                            format!("Ensemble mean for Sea temperature at {depth} m"),
                            format!("Daily mean: {}", stamp.day_stamp()),
                        ],
                    },
                    bottom: FilledPanel {
                        land: &raw_spread,
                        land_color: LAND_GRAY,
                        layer: FillLayer {
                            field: &spread,
                            range: spread_range,
                            // one extra boundary, as the legacy spread panel
                            levels: spread_range
                                .with_level_count(spread_range.level_count() + 1)?
                                .levels(),
                            colormap: spread_cmap,
                            ticks: spread_range.ticks(0.1)?,
                            label: Quantity::Temperature.spread_label(),
                            extend: true,
                        },
                        title: [
                            format!("Ensemble spread for Sea temperature at {depth} m"),
                            format!("Daily mean: {}", stamp.day_stamp()),
                        ],
                    },
                    graticule: true,
                };
                let path = dir.join(expand_template(
                    &chart.output_name,
                    &stamp.file_stamp(),
                    Some(depth_index),
                ));
                figure.render(&path)?;
                generated(&path);
                pb.inc(1);
            }
        }
        pb.finish_and_clear();
        Ok(())
    }

    fn postage_currents(&self) -> Result<()> {
        let chart = &self.config.postage.currents;
        let u_name = expand_template(&chart.input_u_file, &self.date, None);
        let v_name = expand_template(&chart.input_v_file, &self.date, None);
        let u_members = open_members(&self.config.paths.members, &u_name, &self.date)?;
        let v_members = open_members(&self.config.paths.members, &v_name, &self.date)?;
        let grid = u_members[0].grid()?;
        let depths = u_members[0].depths()?;
        let frames = self.frame_timesteps(&u_members[0], true)?;
        let dir = self.output_dir(&chart.output_dir)?;
        let colormap = Colormap::named(&chart.colormap)?;
        let pb = ProgressBar::new((frames.len() * depths.len()) as u64);
        for (t, stamp) in frames {
            for depth_index in 0..depths.len() {
                let mut flows = Vec::with_capacity(u_members.len());
                let mut magnitudes = Vec::with_capacity(u_members.len());
                for (u_src, v_src) in u_members.iter().zip(&v_members) {
                    let flow = NcSource::vector_field(
                        u_src,
                        v_src,
                        Quantity::Currents.variables()[0],
                        Quantity::Currents.variables()[1],
                        t,
                        Some(depth_index),
                    )?;
                    magnitudes
                        .push(flow.mask_region(&grid, &self.config.mask)?.magnitude());
                    flows.push(flow);
                }
                let figure = PostageFigure {
                    grid: &grid,
                    members: magnitudes
                        .iter()
                        .zip(&flows)
                        .map(|(field, flow)| MemberPanel {
                            field,
                            land: field,
                            flow: Some(flow),
                        })
                        .collect(),
                    land_color: LAND_WHITE,
                    range: chart.range,
                    levels: chart.range.levels(),
                    colormap,
                    ticks: chart.range.integer_ticks(),
                    label: Quantity::Currents.postage_label(),
                    extend: true,
                    title: [
                        Quantity::Currents.postage_title(Some(depths[depth_index])),
                        format!("Timestep: {}", stamp.title_stamp()),
                    ],
                };
                let path = dir.join(expand_template(
                    &chart.output_name,
                    &stamp.file_stamp(),
                    Some(depth_index),
                ));
                figure.render(&path)?;
                generated(&path);
                pb.inc(1);
            }
        }
        pb.finish_and_clear();
        Ok(())
    }

    fn postage_scalar(&self, quantity: Quantity, chart: &PostageScalarChart) -> Result<()> {
        let file_name = expand_template(&chart.input_file, &self.date, None);
        let members = open_members(&self.config.paths.members, &file_name, &self.date)?;
        let grid = members[0].grid()?;
        let depths = if quantity.has_depth() {
            members[0].depths()?.into_iter().map(Some).collect()
        } else {
            vec![None]
        };
        let frames = self.frame_timesteps(&members[0], true)?;
        let dir = self.output_dir(&chart.output_dir)?;
        let colormap = Colormap::named(&chart.colormap)?;
        let variable = quantity.variables()[0];
        let pb = ProgressBar::new((frames.len() * depths.len()) as u64);
        for (t, stamp) in frames {
            for (depth_index, depth) in depths.iter().enumerate() {
                let depth_arg = depth.map(|_| depth_index);
                let fields = members
                    .iter()
                    .map(|source| {
                        source
                            .field(variable, t, depth_arg)?
                            .mask_region(&grid, &self.config.mask)
                            .map_err(Error::from)
                    })
                    .collect::<Result<Vec<ScalarField>>>()?;
                let timestamp_line = if quantity == Quantity::Ssh {
                    format!("Daily mean: {}", stamp.day_stamp())
                } else {
                    format!("Timestep: {}", stamp.title_stamp())
                };
                let ticks = if quantity == Quantity::Ssh {
                    chart.range.ticks(0.1)?
                } else {
                    chart.range.integer_ticks()
                };
                let figure = PostageFigure {
                    grid: &grid,
                    members: fields
                        .iter()
                        .map(|field| MemberPanel {
                            field,
                            land: field,
                            flow: None,
                        })
                        .collect(),
                    land_color: LAND_WHITE,
                    range: chart.range,
                    levels: chart.range.levels(),
                    colormap,
                    ticks,
                    label: quantity.postage_label(),
                    extend: true,
                    title: [quantity.postage_title(*depth), timestamp_line],
                };
                let path = dir.join(expand_template(
                    &chart.output_name,
                    &stamp.file_stamp(),
                    depth.map(|_| depth_index),
                ));
                figure.render(&path)?;
                generated(&path);
                pb.inc(1);
            }
        }
        pb.finish_and_clear();
        Ok(())
    }

    fn postage_temperature(&self) -> Result<()> {
        let chart = &self.config.postage.temperature;
        let file_name = expand_template(&chart.input_file, &self.date, None);
        let members = open_members(&self.config.paths.members, &file_name, &self.date)?;
        let grid = members[0].grid()?;
        let depths = members[0].depths()?;
        let frames = self.frame_timesteps(&members[0], true)?;
        let dir = self.output_dir(&chart.output_dir)?;
        let colormap = Colormap::named(&chart.colormap)?;
        let variable = Quantity::Temperature.variables()[0];
        let pb = ProgressBar::new((frames.len() * depths.len()) as u64);
        for (t, stamp) in frames {
            for depth_index in 0..depths.len() {
                let range = chart.range(depth_index)?;
                let fields = members
                    .iter()
                    .map(|source| {
                        source
                            .field(variable, t, Some(depth_index))?
                            .mask_region(&grid, &self.config.mask)
                            .map_err(Error::from)
                    })
                    .collect::<Result<Vec<ScalarField>>>()?;
                let figure = PostageFigure {
                    grid: &grid,
                    members: fields
                        .iter()
                        .map(|field| MemberPanel {
                            field,
                            land: field,
                            flow: None,
                        })
                        .collect(),
                    land_color: LAND_WHITE,
                    range,
                    levels: range.levels(),
                    colormap,
                    ticks: range.integer_ticks(),
                    label: Quantity::Temperature.postage_label(),
                    extend: true,
                    title: [
                        Quantity::Temperature.postage_title(Some(depths[depth_index])),
                        format!("Timestep: {}", stamp.title_stamp()),
                    ],
                };
                let path = dir.join(expand_template(
                    &chart.output_name,
                    &stamp.file_stamp(),
                    Some(depth_index),
                ));
                figure.render(&path)?;
                generated(&path);
                pb.inc(1);
            }
        }
        pb.finish_and_clear();
        Ok(())
    }
}

fn generated(path: &Path) {
    info!("File {} generated", path.display());
}

struct OverlayParams<'a> {
    quantity: Quantity,
    grid: &'a Grid,
    land: &'a ScalarField,
    mean: &'a ScalarField,
    spread: &'a ScalarField,
    mean_range: ValueRange,
    spread_range: ValueRange,
    mean_cmap: Colormap,
    spread_cmap: Colormap,
    stamp: FrameStamp,
    depth: Option<f64>,
    path: PathBuf,
}
