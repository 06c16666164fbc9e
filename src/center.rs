use std::fmt;

use crate::{pixels::PixelGrid, profile::ProfileError};

/// Midpoint convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Halving {
    /// `height / 2` and `width / 2` truncated to integers
    #[default]
    Integer,
    /// `height / 2` and `width / 2` as floating point numbers
    Exact,
}

/// Reference point of a radial profile in (row,column) pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Center {
    row: f64,
    col: f64,
}
impl Center {
    pub fn new(row: f64, col: f64) -> Result<Self, ProfileError> {
        if row.is_finite() && col.is_finite() {
            Ok(Self { row, col })
        } else {
            Err(ProfileError::Center { row, col })
        }
    }
    /// Image midpoint
    pub fn midpoint(grid: &PixelGrid, halving: Halving) -> Self {
        let (height, width) = (grid.height(), grid.width());
        match halving {
            Halving::Integer => Self {
                row: (height / 2) as f64,
                col: (width / 2) as f64,
            },
            Halving::Exact => Self {
                row: height as f64 * 0.5,
                col: width as f64 * 0.5,
            },
        }
    }
    pub fn row(&self) -> f64 {
        self.row
    }
    pub fn col(&self) -> f64 {
        self.col
    }
    /// Euclidean distance to (`row`,`col`)
    pub fn distance(&self, row: f64, col: f64) -> f64 {
        let (dr, dc) = (row - self.row, col - self.col);
        (dr * dr + dc * dc).sqrt()
    }
}
impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1},{:.1})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize) -> PixelGrid {
        PixelGrid::new("P3", width, height, 255, vec![0; width * height * 3]).unwrap()
    }

    #[test]
    fn integer_midpoint() {
        let center = Center::midpoint(&grid(5, 3), Halving::Integer);
        assert_eq!((center.row(), center.col()), (1., 2.));
    }

    #[test]
    fn exact_midpoint() {
        let center = Center::midpoint(&grid(5, 3), Halving::Exact);
        assert_eq!((center.row(), center.col()), (1.5, 2.5));
    }

    #[test]
    fn non_finite_center() {
        assert!(Center::new(f64::NAN, 0.).is_err());
        assert!(Center::new(0., f64::INFINITY).is_err());
        assert!(Center::new(-3.5, 120.25).is_ok());
    }

    #[test]
    fn distance() {
        let center = Center::new(2., 2.).unwrap();
        assert_eq!(center.distance(5., 6.), 5.);
    }
}
