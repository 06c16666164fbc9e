//! SVG line plots of radial and row profiles

use std::path::Path;

use plotters::prelude::*;
use strum::IntoEnumIterator;

use crate::{pixels::Channel, profile::RadialProfile, rows::RowProfile};

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("failed to draw the plot: {0}")]
    Drawing(String),
}
impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(error.to_string())
    }
}
type Result<T> = std::result::Result<T, PlotError>;

const PURPLE: RGBColor = RGBColor(128, 0, 128);

fn color(channel: Channel) -> RGBColor {
    match channel {
        Channel::Red => RED,
        Channel::Green => GREEN,
        Channel::Blue => BLUE,
    }
}

/// Plots the channel averages and their sum versus the distance to the center
pub fn radial<P: AsRef<Path>>(profile: &RadialProfile, path: P) -> Result<()> {
    let mut series: Vec<_> = Channel::iter()
        .map(|c| (c.to_string(), color(c), profile.averages(c)))
        .collect();
    series.push(("Total".to_string(), PURPLE, profile.totals()));
    draw(
        path,
        "Distance from centre of image [px]",
        "Radial average",
        series,
    )
}

/// Plots the channel averages and their sum versus the row index
pub fn rows<P: AsRef<Path>>(profile: &RowProfile, path: P) -> Result<()> {
    let mut series: Vec<_> = Channel::iter()
        .map(|c| (c.to_string(), color(c), profile.averages(c)))
        .collect();
    series.push(("Total".to_string(), PURPLE, profile.totals()));
    draw(path, "Row", "Row average", series)
}

fn draw<P: AsRef<Path>>(
    path: P,
    x_desc: &str,
    y_desc: &str,
    series: Vec<(String, RGBColor, Vec<f64>)>,
) -> Result<()> {
    // profiles have at least one entry
    let n = series.iter().map(|(_, _, y)| y.len()).max().unwrap_or(1);
    let max_value = series
        .iter()
        .flat_map(|(_, _, y)| y.iter().cloned())
        .fold(0f64, f64::max);
    log::info!("making figure: {:?}", path.as_ref());

    let plot = SVGBackend::new(path.as_ref(), (768, 512)).into_drawing_area();
    plot.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&plot)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(
            0f64..n.saturating_sub(1).max(1) as f64,
            0f64..max_value.max(1.) * 1.05,
        )?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    for (label, rgb, values) in series {
        chart
            .draw_series(LineSeries::new(
                values.into_iter().enumerate().map(|(x, y)| (x as f64, y)),
                &rgb,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));
    }
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    plot.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PixelGrid;

    #[test]
    fn svg_files() {
        let grid: PixelGrid = "P3 3 3 255 1 2 3 1 2 3 1 2 3 4 5 6 4 5 6 4 5 6 7 8 9 7 8 9 7 8 9"
            .parse()
            .unwrap();
        let dir = std::env::temp_dir().join(format!("radial-profile-plot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let radial_svg = dir.join("radial.svg");
        radial(&RadialProfile::from_grid(&grid), &radial_svg).unwrap();
        let rows_svg = dir.join("rows.svg");
        rows(&RowProfile::from_grid(&grid), &rows_svg).unwrap();

        for svg in [radial_svg, rows_svg] {
            let contents = std::fs::read_to_string(svg).unwrap();
            assert!(contents.contains("<svg"));
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
