//! Concatenation along Y (rows)

use tracing::debug;

use super::{
    Configured, concatenate_rows, not_configured, validate_extent, validate_operands,
    validate_same_dims,
};
use crate::error::Result;
use crate::runtime::{Kernel, ThreadInfo};
use crate::tensor::{DIM_X, DIM_Y, DIM_Z, MAX_DIMS, TensorInfo, TensorPack, ValidRegion};
use crate::window::{Dimension, Steps, Window, calculate_max_window};

const NAME: &str = "HeightConcatenateKernel";

/// Writes every row of an input into an output starting at a row offset
///
/// The output must match the input on X and on every dimension from Z
/// upward. The kernel's window spans the whole output, so a dispatcher may
/// split it along any axis; rows outside `[offset, offset + input rows)`
/// are never touched.
#[derive(Debug, Default)]
pub struct HeightConcatenateKernel {
    state: Option<Configured>,
}

impl HeightConcatenateKernel {
    /// An unconfigured kernel
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `input` can be written into `output` starting at row
    /// `axis_offset`
    ///
    /// Errors, in the order they are checked:
    /// - [`MissingTensor`](crate::error::Error::MissingTensor)
    /// - [`UnknownDType`](crate::error::Error::UnknownDType)
    /// - [`DTypeMismatch`](crate::error::Error::DTypeMismatch)
    /// - [`InvalidArgument`](crate::error::Error::InvalidArgument) when the
    ///   elements of a row are not contiguous in memory. Rows are moved as
    ///   byte ranges, so this holds even though the shapes would fit.
    /// - [`DimensionMismatch`](crate::error::Error::DimensionMismatch) on X
    /// - [`OffsetOutOfRange`](crate::error::Error::OffsetOutOfRange) when
    ///   `input rows + axis_offset` exceeds the output rows
    /// - [`DimensionMismatch`](crate::error::Error::DimensionMismatch) on Z
    ///   and above
    pub fn validate(
        input: Option<&TensorInfo>,
        axis_offset: usize,
        output: Option<&TensorInfo>,
    ) -> Result<()> {
        let (input, output) = validate_operands(input, output)?;
        validate_same_dims(input, output, DIM_X..DIM_Y)?;
        validate_extent(input, DIM_Y, axis_offset, output)?;
        validate_same_dims(input, output, DIM_Z..MAX_DIMS)
    }

    /// Record the offset and compute the window over the whole output
    ///
    /// Returns the output's valid region after the kernel runs, which the
    /// caller applies with [`TensorInfo::set_valid_region`].
    ///
    /// # Panics
    /// If [`validate`](Self::validate) fails or the kernel is already
    /// configured.
    pub fn configure(
        &mut self,
        input: &TensorInfo,
        axis_offset: usize,
        output: &TensorInfo,
    ) -> ValidRegion {
        if let Err(err) = Self::validate(Some(input), axis_offset, Some(output)) {
            panic!("{NAME}: invalid configuration: {err}");
        }
        assert!(self.state.is_none(), "{NAME}: already configured");

        let region = ValidRegion::full(output.tensor_shape());
        let window = calculate_max_window(&region, &Steps::default());
        debug!(
            kernel = NAME,
            axis_offset,
            input = ?input.tensor_shape(),
            output = ?output.tensor_shape(),
            dtype = %input.data_type(),
            ?window,
            "configured"
        );

        self.state = Some(Configured::new(input, axis_offset, output, window));
        region
    }

    /// Row offset recorded at configure time
    pub fn axis_offset(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.axis_offset)
    }
}

impl Kernel for HeightConcatenateKernel {
    fn name(&self) -> &'static str {
        NAME
    }

    fn window(&self) -> Option<&Window> {
        self.state.as_ref().map(|s| &s.window)
    }

    fn run(&self, pack: &TensorPack<'_>, window: &Window, _info: &ThreadInfo) {
        let state = self.state.as_ref().unwrap_or_else(|| not_configured(NAME));
        state.check_run(NAME, pack, window);

        // Output rows of this sub-window that receive input rows
        let offset = state.axis_offset;
        let input_rows = state.input.dims[DIM_Y];
        let first = window.y().start().max(offset);
        let last = window.y().end().min(offset + input_rows);
        if first >= last {
            return;
        }

        let element_size = pack.src.info().element_size();
        let row_bytes = window.x().start() * element_size..window.x().end() * element_size;

        let mut rows = *window;
        rows.set(DIM_X, Dimension::new(0, 1, 1));
        rows.set(DIM_Y, Dimension::new(first - offset, last - offset, 1));

        let dst_origin = offset * pack.dst.info().stride(DIM_Y);
        concatenate_rows(NAME, pack, &rows, row_bytes, dst_origin);
    }
}
