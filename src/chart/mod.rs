//! Map chart rendering on a `plotters` bitmap backend
//!
//! Three figure layouts cover the whole chart family: the single-map
//! mean/spread overlay, the two-panel stacked layout (temperature) and the
//! 5x2 postage grid. Fields arrive already prepared (masked, clamped,
//! magnitude taken); this module only turns them into pixels.

mod colormap;
mod contour;
pub use colormap::{Colormap, ColormapError};
pub use contour::isoline;

use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::field::{ScalarField, ValueRange, VectorField};
use crate::grid::Grid;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error(transparent)]
    Colormap(#[from] ColormapError),
    #[error("chart drawing failed: {0}")]
    Draw(String),
}
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(e.to_string())
    }
}
type Result<T> = std::result::Result<T, ChartError>;

pub const LAND_WHITE: RGBColor = RGBColor(255, 255, 255);
pub const LAND_GRAY: RGBColor = RGBColor(210, 210, 210);

type MapChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// One filled-contour layer with its colorbar ingredients
pub struct FillLayer<'a> {
    pub field: &'a ScalarField,
    pub range: ValueRange,
    /// band boundaries; usually `range.levels()`, but the temperature
    /// spread panel carries one extra boundary
    pub levels: Vec<f64>,
    pub colormap: Colormap,
    pub ticks: Vec<f64>,
    pub label: &'a str,
    /// draw colorbar extension arrows for out-of-range samples
    pub extend: bool,
}

/// One contour-line layer with its colorbar ingredients
pub struct LineLayer<'a> {
    pub field: &'a ScalarField,
    pub range: ValueRange,
    pub levels: Vec<f64>,
    pub colormap: Colormap,
    pub ticks: Vec<f64>,
    pub label: &'a str,
    pub extend: bool,
}

/// Mean contour lines over spread filled bands on a single map, mean
/// colorbar right, spread colorbar bottom
pub struct OverlayFigure<'a> {
    pub grid: &'a Grid,
    /// unprepared field whose missing cells are painted as land
    pub land: &'a ScalarField,
    pub land_color: RGBColor,
    pub spread: FillLayer<'a>,
    pub mean: LineLayer<'a>,
    /// direction arrows of the (already decimated) mean flow
    pub arrows: Option<(&'a VectorField, &'a Grid)>,
    pub graticule: bool,
    pub title: [String; 2],
}
impl OverlayFigure<'_> {
    pub fn render<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (1400, 1000)).into_drawing_area();
        root.fill(&WHITE)?;
        let (title_area, rest) = root.split_vertically(60);
        draw_title(&title_area, &self.title)?;
        let (body, bottom_bar) = rest.split_vertically(rest.dim_in_pixel().1 as i32 - 90);
        let (map_area, right_bar) = body.split_horizontally(body.dim_in_pixel().0 as i32 - 130);
        let mut chart = build_map(&map_area, self.grid)?;
        fill_bands(&mut chart, self.grid, &self.spread)?;
        land_overlay(&mut chart, self.grid, self.land, self.land_color)?;
        contour_lines(&mut chart, self.grid, &self.mean)?;
        if let Some((flow, coarse)) = self.arrows {
            direction_arrows(&mut chart, coarse, flow)?;
        }
        if self.graticule {
            graticule(&mut chart, self.grid)?;
        }
        colorbar_vertical(
            &right_bar,
            &self.mean.levels,
            self.mean.range,
            self.mean.colormap,
            &self.mean.ticks,
            self.mean.label,
            self.mean.extend,
        )?;
        colorbar_horizontal(
            &bottom_bar,
            &self.spread.levels,
            self.spread.range,
            self.spread.colormap,
            &self.spread.ticks,
            self.spread.label,
            self.spread.extend,
        )?;
        root.present()?;
        Ok(())
    }
}

/// One map panel with a filled layer and its own right-hand colorbar
pub struct FilledPanel<'a> {
    pub land: &'a ScalarField,
    pub land_color: RGBColor,
    pub layer: FillLayer<'a>,
    pub title: [String; 2],
}

/// Two stacked filled panels sharing one grid (the temperature layout)
pub struct StackedFigure<'a> {
    pub grid: &'a Grid,
    pub top: FilledPanel<'a>,
    pub bottom: FilledPanel<'a>,
    pub graticule: bool,
}
impl StackedFigure<'_> {
    pub fn render<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (1100, 1400)).into_drawing_area();
        root.fill(&WHITE)?;
        let halves = root.split_evenly((2, 1));
        for (area, panel) in halves.iter().zip([&self.top, &self.bottom]) {
            let (title_area, body) = area.split_vertically(55);
            draw_title(&title_area, &panel.title)?;
            let (map_area, right_bar) = body.split_horizontally(body.dim_in_pixel().0 as i32 - 120);
            let mut chart = build_map(&map_area, self.grid)?;
            fill_bands(&mut chart, self.grid, &panel.layer)?;
            land_overlay(&mut chart, self.grid, panel.land, panel.land_color)?;
            if self.graticule {
                graticule(&mut chart, self.grid)?;
            }
            colorbar_vertical(
                &right_bar,
                &panel.layer.levels,
                panel.layer.range,
                panel.layer.colormap,
                &panel.layer.ticks,
                panel.layer.label,
                panel.layer.extend,
            )?;
        }
        root.present()?;
        Ok(())
    }
}

/// One member panel of the postage grid
pub struct MemberPanel<'a> {
    pub field: &'a ScalarField,
    pub land: &'a ScalarField,
    /// full-density flow for the streamline overlay (currents only)
    pub flow: Option<&'a VectorField>,
}

/// 5x2 grid of identically scaled member panels with one shared colorbar
pub struct PostageFigure<'a> {
    pub grid: &'a Grid,
    pub members: Vec<MemberPanel<'a>>,
    pub land_color: RGBColor,
    pub range: ValueRange,
    pub levels: Vec<f64>,
    pub colormap: Colormap,
    pub ticks: Vec<f64>,
    pub label: &'a str,
    pub extend: bool,
    pub title: [String; 2],
}
impl PostageFigure<'_> {
    pub fn render<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (1200, 1500)).into_drawing_area();
        root.fill(&WHITE)?;
        let (title_area, rest) = root.split_vertically(60);
        draw_title(&title_area, &self.title)?;
        let (panel_area, right_bar) = rest.split_horizontally(rest.dim_in_pixel().0 as i32 - 130);
        let panels = panel_area.split_evenly((5, 2));
        for (index, (area, member)) in panels.iter().zip(&self.members).enumerate() {
            let (head, body) = area.split_vertically(24);
            draw_panel_title(&head, &format!("Member {index}"))?;
            let mut chart = build_map(&body, self.grid)?;
            let layer = FillLayer {
                field: member.field,
                range: self.range,
                levels: self.levels.clone(),
                colormap: self.colormap,
                ticks: vec![],
                label: "",
                extend: self.extend,
            };
            fill_bands(&mut chart, self.grid, &layer)?;
            land_overlay(&mut chart, self.grid, member.land, self.land_color)?;
            graticule(&mut chart, self.grid)?;
            if let Some(flow) = member.flow {
                streamlines(&mut chart, self.grid, flow)?;
            }
        }
        colorbar_vertical(
            &right_bar,
            &self.levels,
            self.range,
            self.colormap,
            &self.ticks,
            self.label,
            self.extend,
        )?;
        root.present()?;
        Ok(())
    }
}

fn build_map<'a, 'b>(
    area: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    grid: &Grid,
) -> Result<MapChart<'a, 'b>> {
    let ((south, west), (north, east)) = grid.bounds();
    let chart = ChartBuilder::on(area)
        .margin(5)
        .build_cartesian_2d(west..east, south..north)?;
    Ok(chart)
}

/// Edges of the cell centered on each coordinate, clamped at the domain
/// boundary
fn cell_edges(axis: &[f64]) -> Vec<f64> {
    let mut edges = Vec::with_capacity(axis.len() + 1);
    edges.push(axis[0]);
    edges.extend(axis.windows(2).map(|w| 0.5 * (w[0] + w[1])));
    edges.push(*axis.last().unwrap());
    edges
}

/// Index of the band holding `value`; out-of-range samples take the end
/// bands
fn band_of(levels: &[f64], value: f64) -> usize {
    let bands = levels.len().saturating_sub(1).max(1);
    levels
        .partition_point(|&level| level <= value)
        .saturating_sub(1)
        .min(bands - 1)
}

fn fill_bands(chart: &mut MapChart, grid: &Grid, layer: &FillLayer) -> Result<()> {
    let bands = layer.levels.len().saturating_sub(1).max(1) as f64;
    let lat_edges = cell_edges(grid.lats());
    let lon_edges = cell_edges(grid.lons());
    let (lat_edges, lon_edges) = (&lat_edges, &lon_edges);
    chart.draw_series((0..layer.field.nlat()).flat_map(move |row| {
        (0..layer.field.nlon()).filter_map(move |col| {
            let value = layer.field.get(row, col);
            if value.is_nan() {
                return None;
            }
            let band = band_of(&layer.levels, value);
            let color = layer.colormap.eval((band as f64 + 0.5) / bands);
            Some(Rectangle::new(
                [
                    (lon_edges[col], lat_edges[row]),
                    (lon_edges[col + 1], lat_edges[row + 1]),
                ],
                color.filled(),
            ))
        })
    }))?;
    Ok(())
}

fn land_overlay(
    chart: &mut MapChart,
    grid: &Grid,
    land: &ScalarField,
    color: RGBColor,
) -> Result<()> {
    let lat_edges = cell_edges(grid.lats());
    let lon_edges = cell_edges(grid.lons());
    let (lat_edges, lon_edges) = (&lat_edges, &lon_edges);
    chart.draw_series((0..land.nlat()).flat_map(move |row| {
        (0..land.nlon()).filter_map(move |col| {
            land.get(row, col).is_nan().then(|| {
                Rectangle::new(
                    [
                        (lon_edges[col], lat_edges[row]),
                        (lon_edges[col + 1], lat_edges[row + 1]),
                    ],
                    color.filled(),
                )
            })
        })
    }))?;
    Ok(())
}

fn contour_lines(chart: &mut MapChart, grid: &Grid, layer: &LineLayer) -> Result<()> {
    for &level in &layer.levels {
        let color = layer.colormap.eval(layer.range.normalize(level));
        for (from, to) in isoline(layer.field, grid, level) {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![from, to],
                color.stroke_width(1),
            )))?;
        }
    }
    Ok(())
}

/// Fixed-scale direction arrows of an already decimated flow
fn direction_arrows(chart: &mut MapChart, grid: &Grid, flow: &VectorField) -> Result<()> {
    const ARROW_DEG: f64 = 0.25;
    for row in 0..flow.u.nlat() {
        for col in 0..flow.u.nlon() {
            let (u, v) = (flow.u.get(row, col), flow.v.get(row, col));
            let speed = u.hypot(v);
            if !speed.is_finite() || speed == 0.0 {
                continue;
            }
            let (dx, dy) = (u / speed * ARROW_DEG, v / speed * ARROW_DEG);
            let tail = (grid.lons()[col], grid.lats()[row]);
            let head = (tail.0 + dx, tail.1 + dy);
            // two back-strokes at +-150 degrees off the shaft
            let (c, s) = (150f64.to_radians().cos(), 150f64.to_radians().sin());
            let barb = ARROW_DEG * 0.4;
            let left = (
                head.0 + (dx * c - dy * s) / ARROW_DEG * barb,
                head.1 + (dx * s + dy * c) / ARROW_DEG * barb,
            );
            let right = (
                head.0 + (dx * c + dy * s) / ARROW_DEG * barb,
                head.1 + (-dx * s + dy * c) / ARROW_DEG * barb,
            );
            chart.draw_series(std::iter::once(PathElement::new(
                vec![tail, head, left, head, right],
                BLACK.stroke_width(1),
            )))?;
        }
    }
    Ok(())
}

/// Bilinear sample of a field at fractional (lon, lat) coordinates
fn sample(field: &ScalarField, grid: &Grid, lon: f64, lat: f64) -> Option<f64> {
    let col = grid.lons().partition_point(|&x| x <= lon).checked_sub(1)?;
    let row = grid.lats().partition_point(|&y| y <= lat).checked_sub(1)?;
    if col + 1 >= grid.nlon() || row + 1 >= grid.nlat() {
        return None;
    }
    let tx = (lon - grid.lons()[col]) / (grid.lons()[col + 1] - grid.lons()[col]);
    let ty = (lat - grid.lats()[row]) / (grid.lats()[row + 1] - grid.lats()[row]);
    let v00 = field.get(row, col);
    let v01 = field.get(row, col + 1);
    let v10 = field.get(row + 1, col);
    let v11 = field.get(row + 1, col + 1);
    let value = v00 * (1.0 - tx) * (1.0 - ty)
        + v01 * tx * (1.0 - ty)
        + v10 * (1.0 - tx) * ty
        + v11 * tx * ty;
    value.is_finite().then_some(value)
}

/// Black streamlines traced through the full-density flow
fn streamlines(chart: &mut MapChart, grid: &Grid, flow: &VectorField) -> Result<()> {
    const STEP_DEG: f64 = 0.08;
    const MAX_STEPS: usize = 150;
    const SEED_STRIDE: usize = 12;
    for seed_row in (0..grid.nlat()).step_by(SEED_STRIDE) {
        for seed_col in (0..grid.nlon()).step_by(SEED_STRIDE) {
            for direction in [1.0, -1.0] {
                let mut pos = (grid.lons()[seed_col], grid.lats()[seed_row]);
                let mut line = vec![pos];
                for _ in 0..MAX_STEPS {
                    let (Some(u), Some(v)) = (
                        sample(&flow.u, grid, pos.0, pos.1),
                        sample(&flow.v, grid, pos.0, pos.1),
                    ) else {
                        break;
                    };
                    let speed = u.hypot(v);
                    if speed < 1e-6 {
                        break;
                    }
                    pos = (
                        pos.0 + direction * u / speed * STEP_DEG,
                        pos.1 + direction * v / speed * STEP_DEG,
                    );
                    line.push(pos);
                }
                if line.len() > 2 {
                    chart.draw_series(std::iter::once(PathElement::new(
                        line,
                        BLACK.stroke_width(1),
                    )))?;
                }
            }
        }
    }
    Ok(())
}

/// 5-degree graticule with degree labels along the south and west edges
fn graticule(chart: &mut MapChart, grid: &Grid) -> Result<()> {
    let ((south, west), (north, east)) = grid.bounds();
    let style = RGBColor(120, 120, 120).mix(0.4).stroke_width(1);
    let font = TextStyle::from(("sans-serif", 11).into_font()).color(&RGBColor(80, 80, 80));
    let mut lon = (west / 5.0).ceil() * 5.0;
    while lon <= east {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(lon, south), (lon, north)],
            style,
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{lon}°"),
            (lon, south),
            font.clone(),
        )))?;
        lon += 5.0;
    }
    let mut lat = (south / 5.0).ceil() * 5.0;
    while lat <= north {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(west, lat), (east, lat)],
            style,
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{lat}°"),
            (west, lat),
            font.clone(),
        )))?;
        lat += 5.0;
    }
    Ok(())
}

fn draw_title(area: &DrawingArea<BitMapBackend, Shift>, lines: &[String; 2]) -> Result<()> {
    let (w, _) = area.dim_in_pixel();
    let style = TextStyle::from(("sans-serif", 20).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(lines[0].clone(), (w as i32 / 2, 8), style.clone()))?;
    area.draw(&Text::new(lines[1].clone(), (w as i32 / 2, 32), style))?;
    Ok(())
}

fn draw_panel_title(area: &DrawingArea<BitMapBackend, Shift>, text: &str) -> Result<()> {
    let (w, _) = area.dim_in_pixel();
    let style = TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(text.to_string(), (w as i32 / 2, 4), style))?;
    Ok(())
}

fn colorbar_vertical(
    area: &DrawingArea<BitMapBackend, Shift>,
    levels: &[f64],
    range: ValueRange,
    colormap: Colormap,
    ticks: &[f64],
    label: &str,
    extend: bool,
) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let (bar_x0, bar_x1) = (10i32, 34i32);
    let (top, bottom) = (30i32, h as i32 - 30);
    let bands = levels.len().saturating_sub(1);
    // value v sits at pixel y(v); the scale runs bottom = min, top = max
    let y_of = |v: f64| bottom - ((bottom - top) as f64 * range.normalize(v)) as i32;
    for (band, pair) in levels.windows(2).enumerate() {
        let color = colormap.eval((band as f64 + 0.5) / bands as f64);
        area.draw(&Rectangle::new(
            [(bar_x0, y_of(pair[0])), (bar_x1, y_of(pair[1]))],
            color.filled(),
        ))?;
    }
    area.draw(&Rectangle::new(
        [(bar_x0, top), (bar_x1, bottom)],
        BLACK.stroke_width(1),
    ))?;
    if extend {
        let mid = (bar_x0 + bar_x1) / 2;
        area.draw(&Polygon::new(
            vec![(bar_x0, top), (bar_x1, top), (mid, top - 14)],
            colormap.eval(1.0).filled(),
        ))?;
        area.draw(&Polygon::new(
            vec![(bar_x0, bottom), (bar_x1, bottom), (mid, bottom + 14)],
            colormap.eval(0.0).filled(),
        ))?;
    }
    let tick_font = TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    for &tick in ticks {
        if tick < range.min() || tick > range.max() {
            continue;
        }
        let y = y_of(tick);
        area.draw(&PathElement::new(vec![(bar_x1, y), (bar_x1 + 4, y)], BLACK))?;
        area.draw(&Text::new(
            format_tick(tick),
            (bar_x1 + 7, y),
            tick_font.clone(),
        ))?;
    }
    let label_style = TextStyle::from(("sans-serif", 13).into_font())
        .transform(FontTransform::Rotate270)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        label.to_string(),
        (w as i32 - 14, (top + bottom) / 2),
        label_style,
    ))?;
    Ok(())
}

fn colorbar_horizontal(
    area: &DrawingArea<BitMapBackend, Shift>,
    levels: &[f64],
    range: ValueRange,
    colormap: Colormap,
    ticks: &[f64],
    label: &str,
    extend: bool,
) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let (bar_y0, bar_y1) = (10i32, 32i32);
    let (left, right) = (w as i32 / 4, 3 * w as i32 / 4);
    let bands = levels.len().saturating_sub(1);
    let x_of = |v: f64| left + ((right - left) as f64 * range.normalize(v)) as i32;
    for (band, pair) in levels.windows(2).enumerate() {
        let color = colormap.eval((band as f64 + 0.5) / bands as f64);
        area.draw(&Rectangle::new(
            [(x_of(pair[0]), bar_y0), (x_of(pair[1]), bar_y1)],
            color.filled(),
        ))?;
    }
    area.draw(&Rectangle::new(
        [(left, bar_y0), (right, bar_y1)],
        BLACK.stroke_width(1),
    ))?;
    if extend {
        let mid = (bar_y0 + bar_y1) / 2;
        area.draw(&Polygon::new(
            vec![(left, bar_y0), (left, bar_y1), (left - 14, mid)],
            colormap.eval(0.0).filled(),
        ))?;
        area.draw(&Polygon::new(
            vec![(right, bar_y0), (right, bar_y1), (right + 14, mid)],
            colormap.eval(1.0).filled(),
        ))?;
    }
    let tick_font = TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for &tick in ticks {
        if tick < range.min() || tick > range.max() {
            continue;
        }
        let x = x_of(tick);
        area.draw(&PathElement::new(
            vec![(x, bar_y1), (x, bar_y1 + 4)],
            BLACK,
        ))?;
        area.draw(&Text::new(
            format_tick(tick),
            (x, bar_y1 + 6),
            tick_font.clone(),
        ))?;
    }
    let label_style = TextStyle::from(("sans-serif", 13).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(
        label.to_string(),
        (w as i32 / 2, h as i32 - 18),
        label_style,
    ))?;
    Ok(())
}

fn format_tick(tick: f64) -> String {
    if (tick - tick.round()).abs() < 1e-9 {
        format!("{}", tick.round() as i64)
    } else {
        format!("{tick:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_edges_are_midpoints() {
        let edges = cell_edges(&[0.0, 1.0, 3.0]);
        assert_eq!(edges, vec![0.0, 0.5, 2.0, 3.0]);
    }

    #[test]
    fn band_lookup_clips_out_of_range_values() {
        let levels = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(band_of(&levels, -5.0), 0);
        assert_eq!(band_of(&levels, 0.5), 0);
        assert_eq!(band_of(&levels, 1.0), 1);
        assert_eq!(band_of(&levels, 2.7), 2);
        assert_eq!(band_of(&levels, 9.0), 2);
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(2.0), "2");
        assert_eq!(format_tick(0.1), "0.10");
        assert_eq!(format_tick(-1.0), "-1");
    }

    #[test]
    fn a_single_level_range_still_renders() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        // levels() of a one-level range is a single boundary, so the
        // colorbars have no band to fill; the figure must come out anyway
        let dir = tempfile::tempdir()?;
        let grid = Grid::new(vec![0.0, 1.0], vec![0.0, 1.0])?;
        let field = ScalarField::new(vec![0.1, 0.2, 0.3, f64::NAN], 2, 2)?;
        let range = ValueRange::new(0.0, 1.0, 1)?;
        let colormap = Colormap::named("reds")?;
        let figure = OverlayFigure {
            grid: &grid,
            land: &field,
            land_color: LAND_GRAY,
            spread: FillLayer {
                field: &field,
                range,
                levels: range.levels(),
                colormap,
                ticks: range.ticks(0.5)?,
                label: "Spread",
                extend: false,
            },
            mean: LineLayer {
                field: &field,
                range,
                levels: range.levels(),
                colormap,
                ticks: range.integer_ticks(),
                label: "Mean ssh (m)",
                extend: true,
            },
            arrows: None,
            graticule: false,
            title: [
                "Ensemble mean and spread for ssh.".to_string(),
                "Timestep: 2021-05-17, 01:30".to_string(),
            ],
        };
        let path = dir.path().join("single_level.png");
        figure.render(&path)?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn bilinear_sampling() {
        let grid = Grid::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let field = ScalarField::new(vec![0.0, 1.0, 2.0, 3.0], 2, 2).unwrap();
        assert_eq!(sample(&field, &grid, 0.0, 0.0), Some(0.0));
        assert_eq!(sample(&field, &grid, 0.5, 0.5), Some(1.5));
        assert_eq!(sample(&field, &grid, 2.0, 0.5), None);
        let holed = ScalarField::new(vec![0.0, f64::NAN, 2.0, 3.0], 2, 2).unwrap();
        assert_eq!(sample(&holed, &grid, 0.5, 0.5), None);
    }
}
