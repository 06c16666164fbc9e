use crate::{
    pixels::{FormatError, PixelsError},
    profile::ProfileError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `pixels` module")]
    Pixels(#[from] PixelsError),
    #[error("Error in the `profile` module")]
    Profile(#[from] ProfileError),
    #[cfg(feature = "plot")]
    #[error("Error in the `plot` module")]
    Plot(#[from] crate::plot::PlotError),
}
impl From<FormatError> for Error {
    fn from(error: FormatError) -> Self {
        Error::Pixels(PixelsError::Format(error))
    }
}
