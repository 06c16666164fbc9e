//! Radial intensity profile
//!
//! Pixels are binned by their distance to a [Center], rounded to the nearest
//! integer (ties to even), and the samples of each bin are averaged per
//! channel. Bins without samples are kept with a zero average.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
    center::{Center, Halving},
    pixels::{Channel, PixelGrid, CHANNELS},
};

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("center ({row},{col}) must be finite")]
    Center { row: f64, col: f64 },
    #[error("failed to write the profile to CSV")]
    Csv(#[from] csv::Error),
    #[error("failed to create the profile file")]
    Io(#[from] std::io::Error),
}
type Result<T> = std::result::Result<T, ProfileError>;

/// Pixels visited while binning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanRegion {
    /// Every pixel but the ones in the first row and in the first column
    #[default]
    Interior,
    /// Every pixel
    Full,
}
impl ScanRegion {
    /// Index of the first scanned row and column
    pub fn first(self) -> usize {
        match self {
            ScanRegion::Interior => 1,
            ScanRegion::Full => 0,
        }
    }
}

/// Samples of one channel at a given distance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelBin {
    sum: f64,
    count: usize,
    average: f64,
}
impl ChannelBin {
    pub fn sum(&self) -> f64 {
        self.sum
    }
    pub fn count(&self) -> usize {
        self.count
    }
    /// Mean sample value, 0 if the bin is empty
    pub fn average(&self) -> f64 {
        self.average
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialBin {
    distance: usize,
    channels: [ChannelBin; CHANNELS],
}
impl RadialBin {
    pub fn distance(&self) -> usize {
        self.distance
    }
    pub fn channel(&self, channel: Channel) -> &ChannelBin {
        &self.channels[channel.index()]
    }
    pub fn average(&self, channel: Channel) -> f64 {
        self.channel(channel).average
    }
    pub fn count(&self, channel: Channel) -> usize {
        self.channel(channel).count
    }
    pub fn sum(&self, channel: Channel) -> f64 {
        self.channel(channel).sum
    }
    /// Sum of the channel averages
    pub fn total(&self) -> f64 {
        self.channels.iter().map(|c| c.average).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.channels.iter().all(|c| c.count == 0)
    }
}

/// Radial profile builder
///
/// The center defaults to the image midpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialProfileBuilder {
    center: Option<Center>,
    halving: Halving,
    scan: ScanRegion,
}
impl RadialProfileBuilder {
    pub fn center(self, center: Center) -> Self {
        Self {
            center: Some(center),
            ..self
        }
    }
    /// Midpoint convention, ignored if a center is set
    pub fn halving(self, halving: Halving) -> Self {
        Self { halving, ..self }
    }
    pub fn scan(self, scan: ScanRegion) -> Self {
        Self { scan, ..self }
    }
    /// Bins the pixels of `grid`
    pub fn build(&self, grid: &PixelGrid) -> RadialProfile {
        let center = self
            .center
            .unwrap_or_else(|| Center::midpoint(grid, self.halving));
        let first = self.scan.first();
        let Some(max_distance) = max_distance(grid, &center, first) else {
            log::warn!(
                "center {} too far from the {}x{} pixels to bin them",
                center,
                grid.width(),
                grid.height()
            );
            return RadialProfile {
                center,
                scan: self.scan,
                max_distance: 0,
                bins: vec![RadialBin {
                    distance: 0,
                    channels: Default::default(),
                }],
            };
        };

        let mut accumulators = vec![[ChannelBin::default(); CHANNELS]; max_distance + 1];
        let mut skipped = 0usize;
        for row in first..grid.height() {
            for col in first..grid.width() {
                let distance = center
                    .distance(row as f64, col as f64)
                    .round_ties_even();
                // one distance for all channels
                if distance <= 0. {
                    skipped += 1;
                    continue;
                }
                let bins = &mut accumulators[distance as usize];
                let pixel = grid.pixel(row, col);
                for channel in Channel::iter() {
                    let bin = &mut bins[channel.index()];
                    bin.sum += f64::from(pixel[channel.index()]);
                    bin.count += 1;
                }
            }
        }
        log::debug!("{} pixel(s) at the center left out", skipped);

        let bins: Vec<RadialBin> = accumulators
            .into_iter()
            .enumerate()
            .map(|(distance, channels)| RadialBin {
                distance,
                channels: channels.map(|bin| ChannelBin {
                    average: if bin.count > 0 {
                        bin.sum / bin.count as f64
                    } else {
                        0f64
                    },
                    ..bin
                }),
            })
            .collect();
        log::info!(
            "Radial profile of {}x{} pixels about {}: {} bins, {} populated",
            grid.width(),
            grid.height(),
            center,
            bins.len(),
            bins.iter().filter(|bin| !bin.is_empty()).count()
        );
        RadialProfile {
            center,
            scan: self.scan,
            max_distance,
            bins,
        }
    }
}

/// Ceiling of the largest distance from `center` to the corners of the scanned area
///
/// `None` if the distance does not fit a bin index
fn max_distance(grid: &PixelGrid, center: &Center, first: usize) -> Option<usize> {
    let first = first as f64;
    let (height, width) = (grid.height() as f64, grid.width() as f64);
    let distance = [(first, first), (first, width), (height, first), (height, width)]
        .into_iter()
        .map(|(row, col)| center.distance(row, col))
        .fold(0f64, f64::max)
        .ceil();
    // max_distance + 1 bins must fit an allocation
    let limit = isize::MAX as usize / std::mem::size_of::<[ChannelBin; CHANNELS]>();
    (distance.is_finite() && distance < limit as f64).then_some(distance as usize)
}

#[derive(Serialize)]
struct Record {
    #[serde(rename = "Distance [px]")]
    distance: usize,
    #[serde(rename = "Red")]
    red: f64,
    #[serde(rename = "Green")]
    green: f64,
    #[serde(rename = "Blue")]
    blue: f64,
    #[serde(rename = "Red count")]
    red_count: usize,
    #[serde(rename = "Green count")]
    green_count: usize,
    #[serde(rename = "Blue count")]
    blue_count: usize,
    #[serde(rename = "Total")]
    total: f64,
}
impl From<&RadialBin> for Record {
    fn from(bin: &RadialBin) -> Self {
        Self {
            distance: bin.distance,
            red: bin.average(Channel::Red),
            green: bin.average(Channel::Green),
            blue: bin.average(Channel::Blue),
            red_count: bin.count(Channel::Red),
            green_count: bin.count(Channel::Green),
            blue_count: bin.count(Channel::Blue),
            total: bin.total(),
        }
    }
}

/// Per channel average sample value versus distance to the center
#[derive(Debug, Clone, PartialEq)]
pub struct RadialProfile {
    center: Center,
    scan: ScanRegion,
    max_distance: usize,
    // one bin per distance in 0..=max_distance
    bins: Vec<RadialBin>,
}
impl RadialProfile {
    /// Profile about the image midpoint (integer halving, interior scan)
    pub fn from_grid(grid: &PixelGrid) -> Self {
        RadialProfileBuilder::default().build(grid)
    }
    pub fn builder() -> RadialProfileBuilder {
        RadialProfileBuilder::default()
    }
    pub fn center(&self) -> Center {
        self.center
    }
    pub fn scan(&self) -> ScanRegion {
        self.scan
    }
    pub fn max_distance(&self) -> usize {
        self.max_distance
    }
    /// Number of bins, `max_distance + 1`
    pub fn len(&self) -> usize {
        self.bins.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
    pub fn bins(&self) -> &[RadialBin] {
        &self.bins
    }
    pub fn bin(&self, distance: usize) -> Option<&RadialBin> {
        self.bins.get(distance)
    }
    /// Iterator over the bins with samples
    pub fn populated(&self) -> impl Iterator<Item = &RadialBin> + '_ {
        self.bins.iter().filter(|bin| !bin.is_empty())
    }
    /// Panics if `distance` is larger than [RadialProfile::max_distance]
    pub fn average(&self, distance: usize, channel: Channel) -> f64 {
        self.bins[distance].average(channel)
    }
    pub fn count(&self, distance: usize, channel: Channel) -> usize {
        self.bins[distance].count(channel)
    }
    pub fn sum(&self, distance: usize, channel: Channel) -> f64 {
        self.bins[distance].sum(channel)
    }
    pub fn total(&self, distance: usize) -> f64 {
        self.bins[distance].total()
    }
    /// Averages of one channel, indexed by distance
    pub fn averages(&self, channel: Channel) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.average(channel)).collect()
    }
    /// Sample counts of one channel, indexed by distance
    pub fn counts(&self, channel: Channel) -> Vec<usize> {
        self.bins.iter().map(|bin| bin.count(channel)).collect()
    }
    /// Sums of the channel averages, indexed by distance
    pub fn totals(&self) -> Vec<f64> {
        self.bins.iter().map(RadialBin::total).collect()
    }
    pub fn summary(&self) {
        println!("RADIAL PROFILE:");
        println!(" - center: {}", self.center);
        println!(" - scan: {:?}", self.scan);
        println!(" - max. distance: {}px", self.max_distance);
        println!(" - # of populated bins: {}", self.populated().count());
        println!(
            "    {:>8}: {:^22}  {:^22}  {:^22}  {:>10}",
            "DISTANCE", "RED (MEAN,COUNT)", "GREEN (MEAN,COUNT)", "BLUE (MEAN,COUNT)", "TOTAL"
        );
        self.populated().for_each(|bin| {
            let stats: Vec<String> = Channel::iter()
                .map(|c| format!("({:>10.3},{:>9})", bin.average(c), bin.count(c)))
                .collect();
            println!(
                "  - {:>8}: {}  {:>10.3}",
                bin.distance,
                stats.join("  "),
                bin.total()
            );
        });
    }
    /// Writes the profile into a CSV file
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        log::info!("Writing radial profile to {:?}", path.as_ref());
        self.to_writer(File::create(path)?)
    }
    /// Writes the profile as CSV records, one per bin
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for bin in &self.bins {
            wtr.serialize(Record::from(bin))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
