use crate::{
    chart::ChartError, chart::ColormapError, config::ConfigError, dataset::DatasetError,
    field::FieldError, field::RangeError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `config` module")]
    Config(#[from] ConfigError),
    #[error("Error in the `dataset` module")]
    Dataset(#[from] DatasetError),
    #[error("Error in the `field` module")]
    Field(#[from] FieldError),
    #[error("Error in the `field::range` module")]
    Range(#[from] RangeError),
    #[error("Error in the `chart` module")]
    Chart(#[from] ChartError),
    #[error("Error in the `chart::colormap` module")]
    Colormap(#[from] ColormapError),
    #[error("Failed to create the output directory")]
    Io(#[from] std::io::Error),
}
