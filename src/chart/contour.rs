//! Marching-squares contour extraction
//!
//! Walks every grid cell and emits the line segments where the field
//! crosses a level. Cells touching a missing sample are skipped, which
//! leaves contours ending cleanly at the coast.

use crate::field::ScalarField;
use crate::grid::Grid;

pub type Segment = ((f64, f64), (f64, f64));

/// Line segments of the `level` isoline, in (lon, lat) chart coordinates
pub fn isoline(field: &ScalarField, grid: &Grid, level: f64) -> Vec<Segment> {
    let mut segments = vec![];
    for row in 0..field.nlat().saturating_sub(1) {
        for col in 0..field.nlon().saturating_sub(1) {
            cell_segments(field, grid, level, row, col, &mut segments);
        }
    }
    segments
}

fn cell_segments(
    field: &ScalarField,
    grid: &Grid,
    level: f64,
    row: usize,
    col: usize,
    segments: &mut Vec<Segment>,
) {
    // corner order: sw, se, ne, nw
    let corners = [
        field.get(row, col),
        field.get(row, col + 1),
        field.get(row + 1, col + 1),
        field.get(row + 1, col),
    ];
    if corners.iter().any(|v| v.is_nan()) {
        return;
    }
    let mut case = 0usize;
    for (bit, &v) in corners.iter().enumerate() {
        if v >= level {
            case |= 1 << bit;
        }
    }
    if case == 0 || case == 0b1111 {
        return;
    }
    let (x0, x1) = (grid.lons()[col], grid.lons()[col + 1]);
    let (y0, y1) = (grid.lats()[row], grid.lats()[row + 1]);
    // crossing point on each cell edge: south, east, north, west
    let cross = |a: f64, b: f64| (level - a) / (b - a);
    let south = (x0 + (x1 - x0) * cross(corners[0], corners[1]), y0);
    let east = (x1, y0 + (y1 - y0) * cross(corners[1], corners[2]));
    let north = (x0 + (x1 - x0) * cross(corners[3], corners[2]), y1);
    let west = (x0, y0 + (y1 - y0) * cross(corners[0], corners[3]));
    match case {
        0b0001 | 0b1110 => segments.push((west, south)),
        0b0010 | 0b1101 => segments.push((south, east)),
        0b0100 | 0b1011 => segments.push((east, north)),
        0b1000 | 0b0111 => segments.push((north, west)),
        0b0011 | 0b1100 => segments.push((west, east)),
        0b0110 | 0b1001 => segments.push((south, north)),
        // saddles: disambiguate with the cell-center average
        0b0101 => {
            if corners.iter().sum::<f64>() / 4.0 >= level {
                segments.push((west, north));
                segments.push((south, east));
            } else {
                segments.push((west, south));
                segments.push((east, north));
            }
        }
        0b1010 => {
            if corners.iter().sum::<f64>() / 4.0 >= level {
                segments.push((west, south));
                segments.push((east, north));
            } else {
                segments.push((west, north));
                segments.push((south, east));
            }
        }
        _ => unreachable!(),
    }
}
