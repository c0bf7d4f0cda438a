use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Population-tile ETL CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "tilepop", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate raw location pings into a quadkey × window population table
    Aggregate(AggregateArgs),

    /// Merge two place datasets into one combined dataset
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Raw ping CSV (identifier, timestamp, date, device_lat, device_lon)
    #[arg(value_hint = ValueHint::FilePath)]
    pub pings: PathBuf,

    /// Output population CSV, defaults to "./population.csv"
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Tile zoom level (quadkey length)
    #[arg(
        short,
        long,
        default_value_t = crate::tile::DEFAULT_LEVEL,
        value_parser = clap::value_parser!(u8).range(1..=crate::tile::MAX_LEVEL as i64),
    )]
    pub level: u8,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Data root directory containing one sub-directory per place
    #[arg(value_hint = ValueHint::DirPath)]
    pub data_root: PathBuf,

    /// First place name
    pub place_1: String,

    /// Second place name
    pub place_2: String,

    /// Output root, defaults to the data root
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}
