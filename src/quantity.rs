//! The four charted quantities and their per-quantity rendering policies
//!
//! The ten original chart procedures differ only in the values collected
//! here; everything else is the one shared pipeline.

use std::fmt;

use strum_macros::{EnumIter, EnumString};

use crate::field::RangePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Quantity {
    Currents,
    Salinity,
    Ssh,
    Temperature,
}
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Currents => write!(f, "currents"),
            Quantity::Salinity => write!(f, "salinity"),
            Quantity::Ssh => write!(f, "ssh"),
            Quantity::Temperature => write!(f, "temperature"),
        }
    }
}
impl Quantity {
    /// NetCDF variable name(s); two entries for a vector quantity
    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            Quantity::Currents => &["vozocrtx", "vomecrty"],
            Quantity::Salinity => &["vosaline"],
            Quantity::Ssh => &["sossheig"],
            Quantity::Temperature => &["votemper"],
        }
    }
    pub fn is_vector(&self) -> bool {
        matches!(self, Quantity::Currents)
    }
    pub fn has_depth(&self) -> bool {
        !matches!(self, Quantity::Ssh)
    }
    /// The currents chart renders the whole timeline; the others select one
    /// forecast day
    pub fn day_selected(&self) -> bool {
        !matches!(self, Quantity::Currents)
    }
    /// Out-of-range policy of the mean/spread chart
    pub fn range_policy(&self) -> RangePolicy {
        match self {
            Quantity::Currents => RangePolicy::Clamp,
            _ => RangePolicy::Extend,
        }
    }
    /// Colorbar label of the mean series
    pub fn mean_label(&self) -> &'static str {
        match self {
            Quantity::Currents => "Mean currents (m/s)",
            Quantity::Salinity => "Mean salinity (psu)",
            Quantity::Ssh => "Mean ssh (m)",
            Quantity::Temperature => "Mean Temperature (degC)",
        }
    }
    /// Colorbar label of the spread series
    pub fn spread_label(&self) -> &'static str {
        match self {
            Quantity::Temperature => "Spread (degC)",
            _ => "Spread",
        }
    }
    /// Colorbar tick increment of the spread series
    pub fn spread_tick_step(&self) -> f64 {
        match self {
            Quantity::Ssh => 0.05,
            _ => 0.1,
        }
    }
    /// Colorbar label of the postage chart
    pub fn postage_label(&self) -> &'static str {
        match self {
            Quantity::Currents => "Currents (m/s)",
            Quantity::Salinity => "Salinity (psu)",
            Quantity::Ssh => "Sea Level Height (m)",
            Quantity::Temperature => "Temperature (degC)",
        }
    }
    /// Figure title of the postage chart, without the timestep line
    pub fn postage_title(&self, depth: Option<f64>) -> String {
        match (self, depth) {
            (Quantity::Ssh, _) => "Sea Surface Height.".to_string(),
            (Quantity::Currents, Some(d)) => format!("Currents at {} m.", d as i64),
            (Quantity::Salinity, Some(d)) => format!("Salinity at {} m.", d as i64),
            (Quantity::Temperature, Some(d)) => format!("Temperature at {} m.", d as i64),
            (q, None) => format!("{q}."),
        }
    }
    /// Title of the mean/spread chart, without the timestep line
    pub fn mean_spread_title(&self, depth: Option<f64>) -> String {
        match (self, depth) {
            (Quantity::Salinity, Some(d)) => {
                format!("Ensemble mean and spread for salinity at {} m.", d as i64)
            }
            (q, _) => format!("Ensemble mean and spread for {q}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parsed_from_the_command_line() {
        assert_eq!(Quantity::from_str("ssh").unwrap(), Quantity::Ssh);
        assert_eq!(
            Quantity::from_str("temperature").unwrap(),
            Quantity::Temperature
        );
        assert!(Quantity::from_str("waves").is_err());
    }

    #[test]
    fn only_currents_is_a_vector() {
        let vectors: Vec<_> = Quantity::iter().filter(Quantity::is_vector).collect();
        assert_eq!(vectors, vec![Quantity::Currents]);
    }

    #[test]
    fn ssh_has_no_depth_axis() {
        assert!(!Quantity::Ssh.has_depth());
        assert!(Quantity::Salinity.has_depth());
    }
}
