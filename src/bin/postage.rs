use chrono::Local;
use ens_charts::{Config, Job, Quantity};
use structopt::StructOpt;
use strum::IntoEnumIterator;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "postage",
    about = "Per-member postage-stamp map charts"
)]
struct Opt {
    /// Path to the TOML configuration file
    config: std::path::PathBuf,
    /// Forecast run date (YYYYMMDD), defaults to today
    #[structopt(long)]
    date: Option<String>,
    /// Forecast day index into the run's timeline
    #[structopt(long, default_value = "0")]
    day: usize,
    /// Quantity to chart (currents|salinity|ssh|temperature); all when omitted
    #[structopt(short, long)]
    quantity: Option<Quantity>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    let config = Config::load(&opt.config)?;
    let job = Job {
        config: &config,
        date: opt
            .date
            .unwrap_or_else(|| Local::now().format("%Y%m%d").to_string()),
        day_index: opt.day,
    };
    match opt.quantity {
        Some(quantity) => job.postage(quantity)?,
        None => {
            for quantity in Quantity::iter() {
                job.postage(quantity)?;
            }
        }
    }
    Ok(())
}
