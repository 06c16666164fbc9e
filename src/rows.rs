use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::{
    pixels::{Channel, PixelGrid, CHANNELS},
    profile::ProfileError,
};

/// Mean sample value of every image row
#[derive(Debug, Clone, PartialEq)]
pub struct RowProfile {
    averages: Vec<[f64; CHANNELS]>,
}
impl RowProfile {
    pub fn from_grid(grid: &PixelGrid) -> Self {
        let width = grid.width() as f64;
        let averages = grid
            .rows()
            .map(|row| {
                let mut sums = [0f64; CHANNELS];
                row.chunks(CHANNELS).for_each(|pixel| {
                    sums.iter_mut()
                        .zip(pixel)
                        .for_each(|(sum, &value)| *sum += f64::from(value))
                });
                sums.map(|sum| sum / width)
            })
            .collect();
        Self { averages }
    }
    pub fn len(&self) -> usize {
        self.averages.len()
    }
    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
    /// Row averages of one channel
    pub fn averages(&self, channel: Channel) -> Vec<f64> {
        self.averages.iter().map(|a| a[channel.index()]).collect()
    }
    /// Sums of the channel averages of every row
    pub fn totals(&self) -> Vec<f64> {
        self.averages.iter().map(|a| a.iter().sum::<f64>()).collect()
    }
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ProfileError> {
        log::info!("Writing row profile to {:?}", path.as_ref());
        self.to_writer(File::create(path)?)
    }
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ProfileError> {
        #[derive(Serialize)]
        struct Record {
            #[serde(rename = "Row")]
            row: usize,
            #[serde(rename = "Red")]
            red: f64,
            #[serde(rename = "Green")]
            green: f64,
            #[serde(rename = "Blue")]
            blue: f64,
            #[serde(rename = "Total")]
            total: f64,
        }
        let mut wtr = csv::Writer::from_writer(writer);
        for (row, &[red, green, blue]) in self.averages.iter().enumerate() {
            wtr.serialize(Record {
                row,
                red,
                green,
                blue,
                total: red + green + blue,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}
