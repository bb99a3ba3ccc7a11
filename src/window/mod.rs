//! Windows: per-dimension `(start, end, step)` iteration ranges
//!
//! A [`Window`] says which part of index space a kernel visits and with what
//! step, independently of any tensor. Kernels compute their full window at
//! configure time; a dispatcher then [`split`](Window::split)s it into
//! disjoint sub-windows, one per worker.
//!
//! ```text
//! full window, dim Y = (0, 8, 1), split into 3:
//!
//!   worker 0: (0, 3, 1)   rows 0 1 2
//!   worker 1: (3, 6, 1)   rows 3 4 5
//!   worker 2: (6, 8, 1)   rows 6 7
//! ```

mod iterator;

pub use iterator::{WindowIterator, execute_window_loop};

use crate::tensor::{MAX_DIMS, ValidRegion};
use std::fmt;
use std::ops::Index;

/// Iteration range along one dimension
///
/// Invariants: `start <= end`, `step > 0`. `end - start` need not be a
/// multiple of `step`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    start: usize,
    end: usize,
    step: usize,
}

impl Dimension {
    /// Create a range `[start, end)` visited every `step` indices
    ///
    /// # Panics
    /// If `start > end` or `step == 0`.
    #[inline]
    pub const fn new(start: usize, end: usize, step: usize) -> Self {
        assert!(start <= end, "window dimension start must not exceed end");
        assert!(step > 0, "window dimension step must be positive");
        Self { start, end, step }
    }

    /// First visited index
    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// One past the last index of the range
    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Distance between visited indices
    #[inline]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Number of visited indices, counting a partial final step
    #[inline]
    pub const fn num_iterations(&self) -> usize {
        (self.end - self.start).div_ceil(self.step)
    }
}

impl Default for Dimension {
    /// The degenerate range `(0, 1, 1)`: visited exactly once at index 0
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.start, self.end, self.step)
    }
}

/// One `Dimension` per axis, axis 0 varying fastest
///
/// Axes never set stay at `(0, 1, 1)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Window {
    dims: [Dimension; MAX_DIMS],
}

impl Window {
    /// Window with every axis at `(0, 1, 1)`
    pub fn new() -> Self {
        Self::default()
    }

    /// Window from leading axis specs
    ///
    /// # Panics
    /// If more than [`MAX_DIMS`] dimensions are given.
    pub fn from_dimensions(dims: impl IntoIterator<Item = Dimension>) -> Self {
        let mut window = Self::new();
        for (axis, dim) in dims.into_iter().enumerate() {
            window.set(axis, dim);
        }
        window
    }

    /// Replace the range of `axis`
    #[inline]
    pub fn set(&mut self, axis: usize, dim: Dimension) {
        self.dims[axis] = dim;
    }

    /// Range of `axis`
    #[inline]
    pub fn get(&self, axis: usize) -> Dimension {
        self.dims[axis]
    }

    /// Range of axis 0
    #[inline]
    pub fn x(&self) -> Dimension {
        self.dims[0]
    }

    /// Range of axis 1
    #[inline]
    pub fn y(&self) -> Dimension {
        self.dims[1]
    }

    /// Range of axis 2
    #[inline]
    pub fn z(&self) -> Dimension {
        self.dims[2]
    }

    /// Iterations along `axis`
    #[inline]
    pub fn num_iterations(&self, axis: usize) -> usize {
        self.dims[axis].num_iterations()
    }

    /// Iterations over the whole cartesian product
    pub fn num_iterations_total(&self) -> usize {
        self.dims.iter().map(Dimension::num_iterations).product()
    }

    /// Part `id` of `total` near-equal parts along `axis`
    ///
    /// The first `iterations % total` parts take one extra step. Parts are
    /// step-aligned and together cover this window exactly; a part may be
    /// empty when `total` exceeds the number of iterations.
    pub fn split_window(&self, axis: usize, id: usize, total: usize) -> Self {
        assert!(id < total, "split id {id} out of range for {total} parts");

        let dim = self.dims[axis];
        let iterations = dim.num_iterations();
        let base = iterations / total;
        let remainder = iterations % total;

        let (first, work) = if id < remainder {
            (id * (base + 1), base + 1)
        } else {
            (remainder * (base + 1) + (id - remainder) * base, base)
        };

        let start = (dim.start + first * dim.step).min(dim.end);
        let end = (start + work * dim.step).min(dim.end);

        let mut out = *self;
        out.dims[axis] = Dimension::new(start, end, dim.step);
        out
    }

    /// Split along `axis` into at most `parts` non-empty sub-windows
    ///
    /// Returns fewer windows when the axis has fewer iterations than `parts`,
    /// and the window itself when it is empty along `axis`.
    pub fn split(&self, axis: usize, parts: usize) -> Vec<Self> {
        let total = parts.clamp(1, self.num_iterations(axis).max(1));
        (0..total)
            .map(|id| self.split_window(axis, id, total))
            .collect()
    }

    /// True if `self` lies inside `full` on every axis with the same step
    /// and a step-aligned start
    ///
    /// An empty range only has to lie inside `full`; it visits nothing.
    pub fn is_sub_window_of(&self, full: &Window) -> bool {
        self.dims.iter().zip(full.dims.iter()).all(|(sub, full)| {
            sub.step == full.step
                && sub.start >= full.start
                && sub.end <= full.end
                && (sub.start == sub.end || (sub.start - full.start) % full.step == 0)
        })
    }
}

impl Index<usize> for Window {
    type Output = Dimension;

    fn index(&self, axis: usize) -> &Self::Output {
        &self.dims[axis]
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.dims.iter()).finish()
    }
}

/// Per-axis step policy used when computing a kernel's window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Steps([usize; MAX_DIMS]);

impl Steps {
    /// Leading steps; remaining axes step by 1
    ///
    /// # Panics
    /// If any step is zero or more than [`MAX_DIMS`] steps are given.
    pub fn new(steps: &[usize]) -> Self {
        assert!(steps.len() <= MAX_DIMS, "too many steps");
        assert!(steps.iter().all(|&s| s > 0), "steps must be positive");
        let mut out = [1; MAX_DIMS];
        out[..steps.len()].copy_from_slice(steps);
        Self(out)
    }

    /// Step of `axis`
    #[inline]
    pub fn get(&self, axis: usize) -> usize {
        self.0[axis]
    }
}

impl Default for Steps {
    fn default() -> Self {
        Self([1; MAX_DIMS])
    }
}

/// Largest window covering `region` with the given steps
///
/// Axes of the region are rounded up to a multiple of their step; axes past
/// the region's rank stay at `(0, 1, 1)`.
pub fn calculate_max_window(region: &ValidRegion, steps: &Steps) -> Window {
    let mut window = Window::new();
    for axis in 0..region.shape.num_dimensions() {
        let step = steps.get(axis);
        let start = region.start(axis);
        let extent = region.shape.dim(axis).div_ceil(step) * step;
        window.set(axis, Dimension::new(start, start + extent, step));
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Shape;

    #[test]
    fn test_default_axes_are_degenerate() {
        let window = Window::new();
        for axis in 0..MAX_DIMS {
            assert_eq!(window[axis], Dimension::new(0, 1, 1));
        }
        assert_eq!(window.num_iterations_total(), 1);
    }

    #[test]
    fn test_num_iterations_counts_partial_step() {
        assert_eq!(Dimension::new(0, 10, 4).num_iterations(), 3);
        assert_eq!(Dimension::new(2, 2, 1).num_iterations(), 0);
    }

    #[test]
    #[should_panic(expected = "step must be positive")]
    fn test_zero_step_panics() {
        let _ = Dimension::new(0, 4, 0);
    }

    #[test]
    fn test_split_window_distributes_remainder_first() {
        let window = Window::from_dimensions([Dimension::new(0, 4, 1), Dimension::new(0, 8, 1)]);
        let parts: Vec<_> = (0..3).map(|id| window.split_window(1, id, 3).y()).collect();
        assert_eq!(
            parts,
            [
                Dimension::new(0, 3, 1),
                Dimension::new(3, 6, 1),
                Dimension::new(6, 8, 1)
            ]
        );
        // Other axes are untouched
        assert_eq!(window.split_window(1, 2, 3).x(), Dimension::new(0, 4, 1));
    }

    #[test]
    fn test_split_respects_step_and_end() {
        let window = Window::from_dimensions([Dimension::new(2, 13, 4)]);
        let parts = window.split(0, 2);
        assert_eq!(parts[0].x(), Dimension::new(2, 10, 4));
        assert_eq!(parts[1].x(), Dimension::new(10, 13, 4));
        assert!(parts.iter().all(|p| p.is_sub_window_of(&window)));
    }

    #[test]
    fn test_split_never_returns_empty_parts() {
        let window = Window::from_dimensions([Dimension::new(0, 4, 1), Dimension::new(0, 2, 1)]);
        assert_eq!(window.split(1, 8).len(), 2);
        assert_eq!(window.split(1, 0).len(), 1);
    }

    #[test]
    fn test_split_window_empty_part_stays_inside() {
        let window = Window::from_dimensions([Dimension::new(0, 3, 2)]);
        let last = window.split_window(0, 4, 5);
        assert_eq!(last.x(), Dimension::new(3, 3, 2));
        assert_eq!(last.num_iterations(0), 0);
        assert!(last.is_sub_window_of(&window));
    }

    #[test]
    fn test_sub_window_checks() {
        let full = Window::from_dimensions([Dimension::new(0, 16, 4), Dimension::new(0, 5, 1)]);

        let mut sub = full;
        sub.set(1, Dimension::new(1, 3, 1));
        assert!(sub.is_sub_window_of(&full));

        let mut past_end = full;
        past_end.set(1, Dimension::new(3, 6, 1));
        assert!(!past_end.is_sub_window_of(&full));

        let mut misaligned = full;
        misaligned.set(0, Dimension::new(2, 16, 4));
        assert!(!misaligned.is_sub_window_of(&full));

        let mut other_step = full;
        other_step.set(0, Dimension::new(0, 16, 8));
        assert!(!other_step.is_sub_window_of(&full));
    }

    #[test]
    fn test_calculate_max_window() {
        let region = ValidRegion::full(&Shape::from([10, 3]));
        let window = calculate_max_window(&region, &Steps::new(&[4]));
        assert_eq!(window.x(), Dimension::new(0, 12, 4));
        assert_eq!(window.y(), Dimension::new(0, 3, 1));
        assert_eq!(window.z(), Dimension::new(0, 1, 1));
    }
}
