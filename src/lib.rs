/*!
# Radial profiles of CCD images

Computes how the intensity of a simulated detector image falls off with the
distance to a reference point.

The image is read from a plain-text `P3` pixmap into a [PixelGrid], then the
pixels are binned by their distance to a [Center] (by default the image
midpoint) and averaged per color [Channel] into a [RadialProfile].

```no_run
use radial_profile::{PixelGrid, RadialProfile, ScanRegion};

let grid = PixelGrid::from_path("ccd_images/ccd_one.ppm")?;
let profile = RadialProfile::builder()
    .scan(ScanRegion::Interior)
    .build(&grid);
profile.summary();
profile.to_csv("ccd_one_radial.csv")?;
# Ok::<(), radial_profile::Error>(())
```
*/

pub mod center;
mod error;
pub mod pixels;
#[cfg(feature = "plot")]
pub mod plot;
pub mod profile;
pub mod rows;

pub use center::{Center, Halving};
pub use error::Error;
pub use pixels::{Channel, FormatError, PixelGrid, PixelsError};
pub use profile::{RadialBin, RadialProfile, RadialProfileBuilder, ScanRegion};
pub use rows::RowProfile;

pub type Result<T> = std::result::Result<T, Error>;
