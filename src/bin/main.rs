use std::path::PathBuf;

use anyhow::{bail, Context};
use radial_profile::{Center, Halving, PixelGrid, RadialProfile, RowProfile, ScanRegion};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "radial-profile",
    about = "Radial intensity profile of a plain-text P3 pixmap"
)]
struct Opt {
    /// Path to the pixmap file (.ppm, .ppm.gz or .ppm.bz2)
    #[structopt(parse(from_os_str))]
    path: PathBuf,
    /// Center row [px], defaults to the image midpoint
    #[structopt(long)]
    center_row: Option<f64>,
    /// Center column [px], defaults to the image midpoint
    #[structopt(long)]
    center_col: Option<f64>,
    /// Halve the image size without truncation for the default center
    #[structopt(long)]
    exact_halving: bool,
    /// Include the first row and the first column
    #[structopt(long)]
    full_scan: bool,
    /// Write the radial profile to a CSV file
    #[structopt(long, parse(from_os_str))]
    csv: Option<PathBuf>,
    /// Write the row profile to a CSV file
    #[structopt(long, parse(from_os_str))]
    rows_csv: Option<PathBuf>,
    /// Plot the radial profile to a SVG file
    #[cfg(feature = "plot")]
    #[structopt(long, parse(from_os_str))]
    plot: Option<PathBuf>,
    /// Plot the row profile to a SVG file
    #[cfg(feature = "plot")]
    #[structopt(long, parse(from_os_str))]
    rows_plot: Option<PathBuf>,
    /// Do not print the profile summary
    #[structopt(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let grid = PixelGrid::from_path(&opt.path)
        .with_context(|| format!("failed to load {:?}", opt.path))?;

    let mut builder = RadialProfile::builder();
    match (opt.center_row, opt.center_col) {
        (Some(row), Some(col)) => builder = builder.center(Center::new(row, col)?),
        (None, None) => (),
        _ => bail!("both --center-row and --center-col are required to set the center"),
    }
    if opt.exact_halving {
        builder = builder.halving(Halving::Exact);
    }
    if opt.full_scan {
        builder = builder.scan(ScanRegion::Full);
    }
    let profile = builder.build(&grid);

    if !opt.quiet {
        profile.summary();
    }
    if let Some(path) = &opt.csv {
        profile.to_csv(path)?;
    }
    if let Some(path) = &opt.rows_csv {
        RowProfile::from_grid(&grid).to_csv(path)?;
    }
    #[cfg(feature = "plot")]
    {
        if let Some(path) = &opt.plot {
            radial_profile::plot::radial(&profile, path)?;
        }
        if let Some(path) = &opt.rows_plot {
            radial_profile::plot::rows(&RowProfile::from_grid(&grid), path)?;
        }
    }

    Ok(())
}
