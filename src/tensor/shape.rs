//! Shape type: dimensions of a tensor

use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Maximum number of dimensions a descriptor or window can describe
pub const MAX_DIMS: usize = 6;

/// Dimension indices, fastest varying first
pub const DIM_X: usize = 0;
/// Height / rows
pub const DIM_Y: usize = 1;
/// Depth / channels
pub const DIM_Z: usize = 2;
/// Batch
pub const DIM_W: usize = 3;

/// Shape type: dimensions of a tensor
///
/// Dimension 0 is X (width) and varies fastest in memory. Reading a dimension
/// at or beyond the rank yields 1, so a `[4, 3]` shape behaves like
/// `[4, 3, 1, 1, 1, 1]` wherever dimensions are compared.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Shape(SmallVec<[usize; MAX_DIMS]>);

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Push a dimension.
    pub fn push(&mut self, dim: usize) {
        self.0.push(dim);
    }

    /// Set dimension `index`, growing the rank with 1s if needed.
    pub fn set(&mut self, index: usize, value: usize) {
        debug_assert!(index < MAX_DIMS);
        while self.0.len() <= index {
            self.0.push(1);
        }
        self.0[index] = value;
    }

    /// Size along `index`, 1 beyond the rank.
    #[inline]
    pub fn dim(&self, index: usize) -> usize {
        self.0.get(index).copied().unwrap_or(1)
    }

    /// X (width).
    #[inline]
    pub fn x(&self) -> usize {
        self.dim(DIM_X)
    }

    /// Y (height).
    #[inline]
    pub fn y(&self) -> usize {
        self.dim(DIM_Y)
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of declared dimensions.
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn total_size(&self) -> usize {
        self.0.iter().product()
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
