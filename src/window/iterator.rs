//! Window iteration: turning window positions into byte offsets
//!
//! A [`WindowIterator`] never reads or writes memory. It tracks the byte
//! offset of the current window position inside one tensor, so the same
//! traversal can drive a copy, a requantize, or any other per-row logic.

use super::Window;
use crate::tensor::{Coordinates, MAX_DIMS, TensorInfo};

#[derive(Clone, Copy, Default)]
struct IteratorDim {
    /// Bytes to advance per window step along this dimension
    stride: usize,
    /// Offset of the start of the current slice along this dimension
    dim_start: usize,
}

/// Cursor over one tensor's bytes, driven by [`execute_window_loop`]
#[derive(Clone, Copy)]
pub struct WindowIterator {
    base: *const u8,
    dims: [IteratorDim; MAX_DIMS],
}

impl WindowIterator {
    /// Position a cursor at the first point of `window` inside the tensor
    /// described by `info` whose memory starts at `base`
    ///
    /// The offset includes `info.offset_first_element_in_bytes()`.
    pub fn new(base: *const u8, info: &TensorInfo, window: &Window) -> Self {
        let mut dims = [IteratorDim::default(); MAX_DIMS];
        let mut start = info.offset_first_element_in_bytes();
        for (axis, dim) in dims.iter_mut().enumerate() {
            let stride = info.stride(axis);
            dim.stride = stride * window[axis].step();
            start += stride * window[axis].start();
        }
        for dim in dims.iter_mut() {
            dim.dim_start = start;
        }
        Self { base, dims }
    }

    /// Byte offset of the current position from the buffer base
    #[inline]
    pub fn offset(&self) -> usize {
        self.dims[0].dim_start
    }

    /// Address of the current position
    ///
    /// Computing the address is always safe; dereferencing it is only valid
    /// while the position lies inside the window the cursor was built for.
    #[inline]
    pub fn ptr(&self) -> *const u8 {
        self.base.wrapping_add(self.offset())
    }

    /// Step along `axis`, restarting every faster axis at the new position
    #[inline]
    pub fn increment(&mut self, axis: usize) {
        let next = self.dims[axis].dim_start + self.dims[axis].stride;
        self.dims[axis].dim_start = next;
        for dim in &mut self.dims[..axis] {
            dim.dim_start = next;
        }
    }
}

/// Visit every point of `window`, axis 0 fastest
///
/// `f` is called once per point with the point's coordinates and the
/// iterators positioned on it; all iterators then advance in lock-step.
///
/// # Example
/// ```
/// use windowr::dtype::DType;
/// use windowr::tensor::TensorInfo;
/// use windowr::window::{Dimension, Window, WindowIterator, execute_window_loop};
///
/// let info = TensorInfo::new([4, 3], DType::U8).unwrap();
/// let window = Window::from_dimensions([Dimension::new(0, 1, 1), Dimension::new(0, 3, 1)]);
/// let mut its = [WindowIterator::new(std::ptr::null(), &info, &window)];
///
/// let mut rows = Vec::new();
/// execute_window_loop(&window, &mut its, |_, [it]| rows.push(it.offset()));
/// assert_eq!(rows, [0, 4, 8]);
/// ```
pub fn execute_window_loop<const N: usize, F>(
    window: &Window,
    iterators: &mut [WindowIterator; N],
    mut f: F,
) where
    F: FnMut(&Coordinates, &[WindowIterator; N]),
{
    let mut id = Coordinates::origin(MAX_DIMS);
    for_each_dimension(MAX_DIMS, window, &mut id, iterators, &mut f);
}

fn for_each_dimension<const N: usize, F>(
    dims_left: usize,
    window: &Window,
    id: &mut Coordinates,
    iterators: &mut [WindowIterator; N],
    f: &mut F,
) where
    F: FnMut(&Coordinates, &[WindowIterator; N]),
{
    if dims_left == 0 {
        f(id, iterators);
        return;
    }

    let axis = dims_left - 1;
    let dim = window[axis];
    let mut v = dim.start();
    while v < dim.end() {
        id.set(axis, v);
        for_each_dimension(axis, window, id, iterators, f);
        for it in iterators.iter_mut() {
            it.increment(axis);
        }
        v += dim.step();
    }
}
