use anyhow::Result;

use crate::cli::{AggregateArgs, Cli, MergeArgs};
use crate::{mobility, place};

pub fn aggregate(cli: &Cli, args: &AggregateArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| "population.csv".into());
    if cli.verbose > 0 {
        eprintln!(
            "[aggregate] level={} {} -> {}",
            args.level,
            args.pings.display(),
            output.display()
        );
    }

    let report = mobility::run(&args.pings, &output, args.level, cli.verbose)?;
    println!(
        "Aggregated {} pings into {} rows ({} duplicates dropped)",
        report.input_rows, report.output_rows, report.duplicates_dropped
    );
    Ok(())
}

pub fn merge(cli: &Cli, args: &MergeArgs) -> Result<()> {
    let out_root = args.output.clone().unwrap_or_else(|| args.data_root.clone());
    if cli.verbose > 0 {
        eprintln!(
            "[merge] {} + {} under {} -> {}",
            args.place_1,
            args.place_2,
            args.data_root.display(),
            out_root.display()
        );
    }

    let report = place::merge(&args.data_root, &args.place_1, &args.place_2, &out_root, cli.verbose)?;
    println!(
        "Merged {}-{}: {} density rows, {} points, {} polygons, {} road segments ({} pairs dissolved)",
        args.place_1,
        args.place_2,
        report.density_rows,
        report.points,
        report.polygons,
        report.road_segments,
        report.road_pairs_dissolved
    );
    Ok(())
}
