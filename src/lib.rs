//! Mediterranean Sea ensemble forecast chart generator
//!
//! Renders the gridded NetCDF output of an ocean ensemble forecast as
//! geographic map charts: per run either the ensemble mean/spread pair of
//! a quantity (currents, salinity, sea-surface height, temperature) or a
//! 5x2 postage grid of the ten individual members, one PNG per
//! timestep/depth combination.
//!
//! The crate splits along the pipeline stages:
//! - [`dataset`]: NetCDF inputs, coordinate axes, the day-grouped timeline
//! - [`grid`] and [`field`]: the pure numeric transforms (masking,
//!   clamping, magnitude, contour levels, ticks, decimation)
//! - [`chart`]: `plotters`-based map rendering
//! - [`pipeline`]: the frame loop both binaries drive

pub mod chart;
pub mod config;
pub mod dataset;
mod error;
pub mod field;
pub mod grid;
pub mod pipeline;
pub mod quantity;

pub use config::Config;
pub use error::Error;
pub use pipeline::Job;
pub use quantity::Quantity;
