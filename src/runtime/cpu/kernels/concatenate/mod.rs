//! Concatenate kernels: place one input inside an output at an axis offset
//!
//! [`HeightConcatenateKernel`] writes the input's rows at a row offset;
//! [`WidthConcatenateKernel`] writes each input row at a column offset.
//! Both share the row loop below: the window is walked row by row (X is
//! collapsed to a single step) and each row is either copied byte for byte
//! or requantized when the two sides carry different 8-bit quantization.

mod height;
mod width;

pub use height::HeightConcatenateKernel;
pub use width::WidthConcatenateKernel;

use std::ops::Range;

use tracing::trace;

use super::simd::detect_simd;
use super::simd::lanes::{ByteLanes, copy_row, dispatch_lanes, requantize_i8_row, requantize_u8_row};
use crate::dtype::{DType, QuantizationInfo};
use crate::error::{Error, Result};
use crate::runtime::{Kernel, ThreadInfo};
use crate::tensor::{DIM_X, MAX_DIMS, Shape, TensorInfo, TensorPack, ValidRegion};
use crate::window::{Dimension, Window, WindowIterator, execute_window_loop};

/// A concatenate kernel for one concatenation axis
#[derive(Debug)]
pub enum ConcatenateKernel {
    /// Offset along X
    Width(WidthConcatenateKernel),
    /// Offset along Y
    Height(HeightConcatenateKernel),
}

impl ConcatenateKernel {
    /// Unconfigured kernel for `axis`
    pub fn for_axis(axis: usize) -> Result<Self> {
        match axis {
            0 => Ok(Self::Width(WidthConcatenateKernel::new())),
            1 => Ok(Self::Height(HeightConcatenateKernel::new())),
            dim => Err(Error::UnsupportedAxis { dim }),
        }
    }

    /// Check that `input` fits in `output` at `axis_offset` along `axis`
    ///
    /// Same errors as the concrete kernels' `validate`, including the
    /// contiguous-row requirement, plus
    /// [`UnsupportedAxis`](crate::error::Error::UnsupportedAxis) past Y.
    pub fn validate(
        axis: usize,
        input: Option<&TensorInfo>,
        axis_offset: usize,
        output: Option<&TensorInfo>,
    ) -> Result<()> {
        match axis {
            0 => WidthConcatenateKernel::validate(input, axis_offset, output),
            1 => HeightConcatenateKernel::validate(input, axis_offset, output),
            dim => Err(Error::UnsupportedAxis { dim }),
        }
    }

    /// The concatenation axis
    pub fn axis(&self) -> usize {
        match self {
            Self::Width(_) => 0,
            Self::Height(_) => 1,
        }
    }

    /// Configure the wrapped kernel; see the concrete kernels' `configure`
    pub fn configure(
        &mut self,
        input: &TensorInfo,
        axis_offset: usize,
        output: &TensorInfo,
    ) -> ValidRegion {
        match self {
            Self::Width(k) => k.configure(input, axis_offset, output),
            Self::Height(k) => k.configure(input, axis_offset, output),
        }
    }

    /// Offset recorded at configure time
    pub fn axis_offset(&self) -> Option<usize> {
        match self {
            Self::Width(k) => k.axis_offset(),
            Self::Height(k) => k.axis_offset(),
        }
    }
}

impl Kernel for ConcatenateKernel {
    fn name(&self) -> &'static str {
        match self {
            Self::Width(k) => k.name(),
            Self::Height(k) => k.name(),
        }
    }

    fn window(&self) -> Option<&Window> {
        match self {
            Self::Width(k) => k.window(),
            Self::Height(k) => k.window(),
        }
    }

    fn run(&self, pack: &TensorPack<'_>, window: &Window, info: &ThreadInfo) {
        match self {
            Self::Width(k) => k.run(pack, window, info),
            Self::Height(k) => k.run(pack, window, info),
        }
    }
}

// ============================================================================
// Shared validation and configuration state
// ============================================================================

/// Presence, dtype, and row layout checks shared by both kernels
fn validate_operands<'a>(
    input: Option<&'a TensorInfo>,
    output: Option<&'a TensorInfo>,
) -> Result<(&'a TensorInfo, &'a TensorInfo)> {
    let input = input.ok_or(Error::MissingTensor { role: "input" })?;
    let output = output.ok_or(Error::MissingTensor { role: "output" })?;

    if input.data_type().is_unknown() {
        return Err(Error::UnknownDType);
    }
    if input.data_type() != output.data_type() {
        return Err(Error::DTypeMismatch {
            lhs: input.data_type(),
            rhs: output.data_type(),
        });
    }
    for (role, info) in [("input", input), ("output", output)] {
        if !has_contiguous_rows(info) {
            return Err(Error::invalid_argument(
                role,
                format!("elements along X must be contiguous, stride is {}", info.stride(DIM_X)),
            ));
        }
    }
    Ok((input, output))
}

/// `input` placed at `offset` along `axis` must end inside `output`
fn validate_extent(input: &TensorInfo, axis: usize, offset: usize, output: &TensorInfo) -> Result<()> {
    let extent = input.dimension(axis);
    let available = output.dimension(axis);
    let fits = extent
        .checked_add(offset)
        .is_some_and(|end| end <= available);
    if !fits {
        return Err(Error::OffsetOutOfRange {
            dim: axis,
            offset,
            extent,
            available,
        });
    }
    Ok(())
}

/// Every dimension in `dims` must agree between input and output
fn validate_same_dims(input: &TensorInfo, output: &TensorInfo, dims: Range<usize>) -> Result<()> {
    for dim in dims {
        if input.dimension(dim) != output.dimension(dim) {
            return Err(Error::dimension_mismatch(
                dim,
                input.dimension(dim),
                output.dimension(dim),
            ));
        }
    }
    Ok(())
}

fn has_contiguous_rows(info: &TensorInfo) -> bool {
    info.dimension(DIM_X) == 1 || info.stride(DIM_X) == info.element_size()
}

/// What a configured kernel remembers
#[derive(Clone, Debug)]
struct Configured {
    axis_offset: usize,
    window: Window,
    input: Signature,
    output: Signature,
}

/// The parts of a descriptor a run must agree with
#[derive(Clone, Debug, PartialEq)]
struct Signature {
    dims: [usize; MAX_DIMS],
    dtype: DType,
}

impl Signature {
    fn of(info: &TensorInfo) -> Self {
        Self {
            dims: std::array::from_fn(|dim| info.dimension(dim)),
            dtype: info.data_type(),
        }
    }

    fn matches(&self, info: &TensorInfo) -> bool {
        *self == Self::of(info) && has_contiguous_rows(info)
    }
}

impl Configured {
    fn new(input: &TensorInfo, axis_offset: usize, output: &TensorInfo, window: Window) -> Self {
        Self {
            axis_offset,
            window,
            input: Signature::of(input),
            output: Signature::of(output),
        }
    }

    /// Run-time preconditions common to both kernels
    fn check_run(&self, name: &str, pack: &TensorPack<'_>, window: &Window) {
        assert!(
            window.is_sub_window_of(&self.window),
            "{name}: {window:?} is not a sub-window of the configured window {:?}",
            self.window
        );
        assert!(
            self.input.matches(pack.src.info()),
            "{name}: source {:?} does not match the configured input",
            pack.src.info()
        );
        assert!(
            self.output.matches(pack.dst.info()),
            "{name}: destination {:?} does not match the configured output",
            pack.dst.info()
        );
    }
}

fn not_configured(name: &str) -> ! {
    panic!("{name}: run called before configure")
}

// ============================================================================
// Row loop
// ============================================================================

/// Per-row transform, chosen once per run
#[derive(Clone, Copy, Debug)]
enum RowOp {
    Copy,
    RequantizeU8 {
        from: QuantizationInfo,
        to: QuantizationInfo,
    },
    RequantizeI8 {
        from: QuantizationInfo,
        to: QuantizationInfo,
    },
}

impl RowOp {
    fn select(src: &TensorInfo, dst: &TensorInfo) -> Self {
        let from = src.quantization_info();
        let to = dst.quantization_info();
        match src.data_type() {
            DType::QAsymm8 if from != to => Self::RequantizeU8 { from, to },
            DType::QAsymm8Signed if from != to => Self::RequantizeI8 { from, to },
            _ => Self::Copy,
        }
    }
}

/// Write the rows of `window` from the source into the destination,
/// `dst_origin` bytes past each row's position in the destination
///
/// `window` must already have X collapsed to `(0, 1, 1)`; `row_bytes` is the
/// byte range of each row to transfer.
fn concatenate_rows(
    name: &str,
    pack: &TensorPack<'_>,
    window: &Window,
    row_bytes: Range<usize>,
    dst_origin: usize,
) {
    debug_assert_eq!(window.x(), Dimension::new(0, 1, 1));
    if row_bytes.is_empty() || window.num_iterations_total() == 0 {
        return;
    }

    let src_info = pack.src.info();
    let dst_info = pack.dst.info();
    let op = RowOp::select(src_info, dst_info);
    let level = detect_simd();
    trace!(kernel = name, ?window, ?row_bytes, dst_origin, ?op, %level, "concatenate rows");

    let mut iterators = [
        WindowIterator::new(pack.src.as_ptr(), src_info, window),
        WindowIterator::new(pack.dst.as_mut_ptr(), dst_info, window),
    ];
    dispatch_lanes!(level, L => for_each_row::<L>(op, window, &mut iterators, row_bytes, dst_origin));
}

#[inline(always)]
fn for_each_row<L: ByteLanes>(
    op: RowOp,
    window: &Window,
    iterators: &mut [WindowIterator; 2],
    row_bytes: Range<usize>,
    dst_origin: usize,
) {
    let Range { start, end } = row_bytes;

    // SAFETY (all three arms): the caller validated both descriptors against
    // the configured shapes and the window against the configured window, so
    // every source row lies inside the source buffer and every shifted
    // destination row inside the destination buffer. The buffers come from a
    // shared and an exclusive borrow and cannot overlap.
    match op {
        RowOp::Copy => execute_window_loop(window, iterators, |_, [src, dst]| unsafe {
            let dst = dst.ptr().cast_mut().add(dst_origin);
            copy_row::<L>(src.ptr(), dst, start, end);
        }),
        RowOp::RequantizeU8 { from, to } => {
            execute_window_loop(window, iterators, |_, [src, dst]| unsafe {
                let dst = dst.ptr().cast_mut().add(dst_origin);
                requantize_u8_row::<L>(src.ptr(), dst, start, end, &from, &to);
            })
        }
        RowOp::RequantizeI8 { from, to } => {
            execute_window_loop(window, iterators, |_, [src, dst]| unsafe {
                let dst = dst.ptr().cast_mut().add(dst_origin);
                requantize_i8_row::<L>(src.ptr().cast(), dst.cast(), start, end, &from, &to);
            })
        }
    }
}

/// Output shape of concatenating `inputs` along `axis`
///
/// Every other dimension is taken from the first input; the result's rank is
/// the largest input rank (and at least `axis + 1`).
pub fn calculate_concatenate_shape(inputs: &[&TensorInfo], axis: usize) -> Result<Shape> {
    if axis >= MAX_DIMS {
        return Err(Error::UnsupportedAxis { dim: axis });
    }
    let first = inputs
        .first()
        .ok_or_else(|| Error::invalid_argument("inputs", "at least one input is required"))?;

    let rank = inputs
        .iter()
        .map(|info| info.num_dimensions())
        .max()
        .unwrap_or(1)
        .max(axis + 1);
    let mut shape: Shape = (0..rank).map(|dim| first.dimension(dim)).collect();
    shape.set(axis, inputs.iter().map(|info| info.dimension(axis)).sum());
    Ok(shape)
}
