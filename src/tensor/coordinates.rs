//! Coordinates: a point in N-dimensional index space

use super::shape::MAX_DIMS;
use std::fmt;

/// A point in index space, dimension 0 first
///
/// Unset dimensions read as 0.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Coordinates {
    values: [usize; MAX_DIMS],
    num_dimensions: usize,
}

impl Coordinates {
    /// Origin with `num_dimensions` declared dimensions
    pub fn origin(num_dimensions: usize) -> Self {
        debug_assert!(num_dimensions <= MAX_DIMS);
        Self {
            values: [0; MAX_DIMS],
            num_dimensions,
        }
    }

    /// Coordinate along `dim`
    #[inline]
    pub fn get(&self, dim: usize) -> usize {
        self.values[dim]
    }

    /// Set the coordinate along `dim`, extending the declared rank if needed
    #[inline]
    pub fn set(&mut self, dim: usize, value: usize) {
        self.values[dim] = value;
        self.num_dimensions = self.num_dimensions.max(dim + 1);
    }

    /// Number of declared dimensions
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.num_dimensions
    }

    /// Declared coordinates as a slice
    pub fn as_slice(&self) -> &[usize] {
        &self.values[..self.num_dimensions]
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<const N: usize> From<[usize; N]> for Coordinates {
    fn from(value: [usize; N]) -> Self {
        let mut coords = Self::origin(0);
        for (dim, v) in value.into_iter().enumerate() {
            coords.set(dim, v);
        }
        coords
    }
}
