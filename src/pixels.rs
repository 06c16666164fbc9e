//! Plain-text `P3` pixmaps
//!
//! The detector images are written as a whitespace separated token stream:
//! a format tag, the width, the height, the maximum sample value and then
//! `width x height` red, green and blue samples in row-major order.

use std::{
    fmt,
    fs::File,
    io::{BufReader, Read},
    num::ParseIntError,
    path::Path,
    str::FromStr,
    time::Instant,
};

use bzip2::bufread::BzDecoder;
use flate2::bufread::GzDecoder;
use strum_macros::EnumIter;

/// Number of samples per pixel
pub const CHANNELS: usize = 3;

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("missing {0} in the pixmap header")]
    MissingHeader(&'static str),
    #[error("invalid {field} {token:?} in the pixmap header")]
    Header {
        field: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid pixmap dimensions {width}x{height}")]
    Dimensions { width: usize, height: usize },
    #[error("invalid sample #{index}: {token:?}")]
    Sample {
        index: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },
    #[error("expected {expected} samples, found {found}")]
    SampleCount { expected: usize, found: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum PixelsError {
    #[error("failed to read the pixmap file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse the pixmap")]
    Format(#[from] FormatError),
}
type Result<T> = std::result::Result<T, PixelsError>;

/// Pixel color component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Channel {
    Red,
    Green,
    Blue,
}
impl Channel {
    /// Position of the channel within a pixel
    pub fn index(self) -> usize {
        self as usize
    }
}
impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => write!(f, "Red"),
            Channel::Green => write!(f, "Green"),
            Channel::Blue => write!(f, "Blue"),
        }
    }
}

/// RGB image samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    tag: String,
    width: usize,
    height: usize,
    max_value: u32,
    // row-major, 3 samples per pixel
    samples: Vec<u32>,
}
impl PixelGrid {
    /// Creates a grid from `width x height x 3` interleaved RGB samples
    pub fn new<S: Into<String>>(
        tag: S,
        width: usize,
        height: usize,
        max_value: u32,
        samples: Vec<u32>,
    ) -> std::result::Result<Self, FormatError> {
        let expected = Self::sample_count(width, height)?;
        if samples.len() != expected {
            return Err(FormatError::SampleCount {
                expected,
                found: samples.len(),
            });
        }
        let saturated = samples.iter().filter(|&&s| s > max_value).count();
        if saturated > 0 {
            log::debug!(
                "{} samples are larger than the declared maximum {}",
                saturated,
                max_value
            );
        }
        Ok(Self {
            tag: tag.into(),
            width,
            height,
            max_value,
            samples,
        })
    }
    fn sample_count(width: usize, height: usize) -> std::result::Result<usize, FormatError> {
        if width == 0 || height == 0 {
            return Err(FormatError::Dimensions { width, height });
        }
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(FormatError::Dimensions { width, height })
    }
    /// Loads a pixmap file
    ///
    /// Files with a `gz` or `bz2` extension are decompressed first
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading {:?}...", path);
        let now = Instant::now();
        let mut buf = BufReader::new(File::open(path)?);
        let mut contents = String::new();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => GzDecoder::new(buf).read_to_string(&mut contents)?,
            Some("bz2") => BzDecoder::new(buf).read_to_string(&mut contents)?,
            _ => buf.read_to_string(&mut contents)?,
        };
        let grid: Self = contents.parse()?;
        log::info!(
            "... loaded {}x{} pixels in {}ms",
            grid.width,
            grid.height,
            now.elapsed().as_millis()
        );
        Ok(grid)
    }
    pub fn tag(&self) -> &str {
        &self.tag
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn channel_count(&self) -> usize {
        CHANNELS
    }
    pub fn max_value(&self) -> u32 {
        self.max_value
    }
    /// All the samples, row-major and RGB interleaved
    pub fn samples(&self) -> &[u32] {
        &self.samples
    }
    /// Returns the sample at (`row`,`col`) for the given channel
    ///
    /// Panics if `row` or `col` is outside the grid
    pub fn sample(&self, row: usize, col: usize, channel: Channel) -> u32 {
        self.pixel(row, col)[channel.index()]
    }
    /// Returns the RGB samples at (`row`,`col`)
    ///
    /// Panics if `row` or `col` is outside the grid, see [PixelGrid::get]
    pub fn pixel(&self, row: usize, col: usize) -> [u32; CHANNELS] {
        self.get(row, col).unwrap_or_else(|| {
            panic!(
                "pixel ({row},{col}) outside of a {}x{} grid",
                self.width, self.height
            )
        })
    }
    /// Returns the RGB samples at (`row`,`col`) or `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<[u32; CHANNELS]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let k = (row * self.width + col) * CHANNELS;
        Some([self.samples[k], self.samples[k + 1], self.samples[k + 2]])
    }
    /// Returns the sample at (`row`,`col`) for the given channel or `None` outside the grid
    pub fn get_sample(&self, row: usize, col: usize, channel: Channel) -> Option<u32> {
        self.get(row, col).map(|pixel| pixel[channel.index()])
    }
    /// Iterator over the samples of one channel, row-major
    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = u32> + '_ {
        self.samples
            .iter()
            .skip(channel.index())
            .step_by(CHANNELS)
            .copied()
    }
    /// Iterator over the image rows, each with `width x 3` samples
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.samples.chunks(self.width * CHANNELS)
    }
}

fn header<'a, T, I>(tokens: &mut I, field: &'static str) -> std::result::Result<T, FormatError>
where
    T: FromStr<Err = ParseIntError>,
    I: Iterator<Item = &'a str>,
{
    let token = tokens.next().ok_or(FormatError::MissingHeader(field))?;
    token.parse().map_err(|source| FormatError::Header {
        field,
        token: token.to_owned(),
        source,
    })
}

impl FromStr for PixelGrid {
    type Err = FormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let tag = tokens
            .next()
            .ok_or(FormatError::MissingHeader("format tag"))?;
        let width: usize = header(&mut tokens, "width")?;
        let height: usize = header(&mut tokens, "height")?;
        let max_value: u32 = header(&mut tokens, "maximum value")?;
        // fail on dimensions before parsing the body
        Self::sample_count(width, height)?;
        let samples = tokens
            .enumerate()
            .map(|(index, token)| {
                token.parse::<u32>().map_err(|source| FormatError::Sample {
                    index,
                    token: token.to_owned(),
                    source,
                })
            })
            .collect::<std::result::Result<Vec<u32>, FormatError>>()?;
        Self::new(tag, width, height, max_value, samples)
    }
}

impl fmt::Display for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.tag)?;
        writeln!(f, "{} {}", self.width, self.height)?;
        writeln!(f, "{}", self.max_value)?;
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|s| s.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::io::Write;
    use strum::IntoEnumIterator;

    const TWO_BY_TWO: &str = "P3\n2 2\n255\n1 2 3\t4 5 6\n7 8 9 10 11 12\n";

    #[test]
    fn parse_row_major() {
        let grid: PixelGrid = TWO_BY_TWO.parse().unwrap();
        assert_eq!(grid.tag(), "P3");
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(grid.max_value(), 255);
        assert_eq!(grid.pixel(0, 0), [1, 2, 3]);
        assert_eq!(grid.pixel(0, 1), [4, 5, 6]);
        assert_eq!(grid.pixel(1, 0), [7, 8, 9]);
        assert_eq!(grid.sample(1, 1, Channel::Blue), 12);
        assert_eq!(grid.channel(Channel::Green).collect::<Vec<_>>(), vec![2, 5, 8, 11]);
    }

    #[test]
    fn parse_non_square() {
        let grid: PixelGrid = "P3 3 1 9 0 0 1 0 0 2 0 0 3".parse().unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 1));
        assert_eq!(grid.sample(0, 2, Channel::Blue), 3);
        assert_eq!(grid.rows().count(), 1);
    }

    #[test]
    fn missing_trailing_sample() {
        let text = "P3 2 2 255 1 2 3 4 5 6 7 8 9 10 11";
        match text.parse::<PixelGrid>() {
            Err(FormatError::SampleCount { expected, found }) => {
                assert_eq!((expected, found), (12, 11))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn extra_sample() {
        let text = format!("{} 13", TWO_BY_TWO);
        assert!(matches!(
            text.parse::<PixelGrid>(),
            Err(FormatError::SampleCount {
                expected: 12,
                found: 13
            })
        ));
    }

    #[test]
    fn bad_tokens() {
        assert!(matches!(
            "".parse::<PixelGrid>(),
            Err(FormatError::MissingHeader("format tag"))
        ));
        assert!(matches!(
            "P3 2".parse::<PixelGrid>(),
            Err(FormatError::MissingHeader("height"))
        ));
        assert!(matches!(
            "P3 two 2 255".parse::<PixelGrid>(),
            Err(FormatError::Header { field: "width", .. })
        ));
        assert!(matches!(
            "P3 1 1 255 1 x 3".parse::<PixelGrid>(),
            Err(FormatError::Sample { index: 1, .. })
        ));
        assert!(matches!(
            "P3 1 1 255 1 -2 3".parse::<PixelGrid>(),
            Err(FormatError::Sample { index: 1, .. })
        ));
        assert!(matches!(
            "P3 0 4 255".parse::<PixelGrid>(),
            Err(FormatError::Dimensions {
                width: 0,
                height: 4
            })
        ));
    }

    #[test]
    fn zero_or_overflowing_dimensions() {
        assert!(matches!(
            "P3 4 0 255".parse::<PixelGrid>(),
            Err(FormatError::Dimensions {
                width: 4,
                height: 0
            })
        ));
        let text = format!("P3 {} 2 255 1 2 3", usize::MAX);
        assert!(matches!(
            text.parse::<PixelGrid>(),
            Err(FormatError::Dimensions { height: 2, .. })
        ));
        let width = usize::MAX / 4;
        assert!(matches!(
            PixelGrid::new("P3", width, 2, 255, vec![]),
            Err(FormatError::Dimensions { height: 2, .. })
        ));
    }

    #[test]
    fn pixels_outside_the_grid() {
        let grid: PixelGrid = TWO_BY_TWO.parse().unwrap();
        assert_eq!(grid.get(1, 0), Some([7, 8, 9]));
        assert_eq!(grid.get_sample(0, 1, Channel::Red), Some(4));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
        assert_eq!(grid.get_sample(5, 5, Channel::Blue), None);
    }

    #[test]
    #[should_panic]
    fn pixel_outside_the_grid_panics() {
        let grid: PixelGrid = TWO_BY_TWO.parse().unwrap();
        grid.pixel(0, 2);
    }

    #[test]
    fn samples_above_max_are_kept() {
        let grid: PixelGrid = "P3 1 1 10 11 300 0".parse().unwrap();
        assert_eq!(grid.pixel(0, 0), [11, 300, 0]);
    }

    #[test]
    fn text_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let width = rng.gen_range(1..12);
            let height = rng.gen_range(1..12);
            let samples: Vec<u32> = (0..width * height * CHANNELS)
                .map(|_| rng.gen_range(0..=255))
                .collect();
            let grid = PixelGrid::new("P3", width, height, 255, samples.clone()).unwrap();
            let loaded: PixelGrid = grid.to_string().parse().unwrap();
            assert_eq!(loaded.tag(), "P3");
            assert_eq!((loaded.width(), loaded.height()), (width, height));
            assert_eq!(loaded.max_value(), 255);
            assert_eq!(loaded.samples(), samples.as_slice());
        }
    }

    #[test]
    fn channels_in_pixel_order() {
        let indices: Vec<usize> = Channel::iter().map(Channel::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn load_plain_and_compressed_files() {
        let dir = std::env::temp_dir().join(format!("radial-profile-pixels-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let plain = dir.join("ccd.ppm");
        std::fs::write(&plain, TWO_BY_TWO).unwrap();

        let gz = dir.join("ccd.ppm.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&gz).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(TWO_BY_TWO.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let bz2 = dir.join("ccd.ppm.bz2");
        let mut encoder =
            bzip2::write::BzEncoder::new(File::create(&bz2).unwrap(), bzip2::Compression::default());
        encoder.write_all(TWO_BY_TWO.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let expected: PixelGrid = TWO_BY_TWO.parse().unwrap();
        for path in [plain, gz, bz2] {
            assert_eq!(PixelGrid::from_path(&path).unwrap(), expected);
        }
        assert!(matches!(
            PixelGrid::from_path(dir.join("missing.ppm")),
            Err(PixelsError::Io(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
