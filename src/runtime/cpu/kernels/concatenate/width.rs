//! Concatenation along X (columns)

use tracing::debug;

use super::{
    Configured, concatenate_rows, not_configured, validate_extent, validate_operands,
    validate_same_dims,
};
use crate::error::Result;
use crate::runtime::{Kernel, ThreadInfo};
use crate::tensor::{DIM_X, DIM_Y, MAX_DIMS, TensorInfo, TensorPack, ValidRegion};
use crate::window::{Dimension, Steps, Window, calculate_max_window};

const NAME: &str = "WidthConcatenateKernel";

/// Writes each input row into the matching output row at a column offset
///
/// The window spans the input, so every visited row is a row to write.
#[derive(Debug, Default)]
pub struct WidthConcatenateKernel {
    state: Option<Configured>,
}

impl WidthConcatenateKernel {
    /// An unconfigured kernel
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `input` can be written into `output` starting at
    /// column `axis_offset`
    ///
    /// Errors, in the order they are checked:
    /// - [`MissingTensor`](crate::error::Error::MissingTensor)
    /// - [`UnknownDType`](crate::error::Error::UnknownDType)
    /// - [`DTypeMismatch`](crate::error::Error::DTypeMismatch)
    /// - [`InvalidArgument`](crate::error::Error::InvalidArgument) when the
    ///   elements of a row are not contiguous in memory. Rows are moved as
    ///   byte ranges, so this holds even though the shapes would fit.
    /// - [`OffsetOutOfRange`](crate::error::Error::OffsetOutOfRange) when
    ///   `input columns + axis_offset` exceeds the output columns
    /// - [`DimensionMismatch`](crate::error::Error::DimensionMismatch) on Y
    ///   and above
    pub fn validate(
        input: Option<&TensorInfo>,
        axis_offset: usize,
        output: Option<&TensorInfo>,
    ) -> Result<()> {
        let (input, output) = validate_operands(input, output)?;
        validate_extent(input, DIM_X, axis_offset, output)?;
        validate_same_dims(input, output, DIM_Y..MAX_DIMS)
    }

    /// Record the offset and compute the window over the whole input
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

        let window = calculate_max_window(&ValidRegion::full(input.tensor_shape()), &Steps::default());
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
        ValidRegion::full(output.tensor_shape())
    }

    /// Column offset recorded at configure time
    pub fn axis_offset(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.axis_offset)
    }
}

impl Kernel for WidthConcatenateKernel {
    fn name(&self) -> &'static str {
        NAME
    }

    fn window(&self) -> Option<&Window> {
        self.state.as_ref().map(|s| &s.window)
    }

    fn run(&self, pack: &TensorPack<'_>, window: &Window, _info: &ThreadInfo) {
        let state = self.state.as_ref().unwrap_or_else(|| not_configured(NAME));
        state.check_run(NAME, pack, window);

        let element_size = pack.src.info().element_size();
        let row_bytes = window.x().start() * element_size..window.x().end() * element_size;

        let mut rows = *window;
        rows.set(DIM_X, Dimension::new(0, 1, 1));

        let dst_origin = state.axis_offset * pack.dst.info().stride(DIM_X);
        concatenate_rows(NAME, pack, &rows, row_bytes, dst_origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::{DType, QuantizationInfo};
    use crate::error::Error;
    use crate::tensor::{DIM_Z, Tensor};

    #[test]
    fn test_writes_columns_at_offset() {
        let src_info = TensorInfo::new([2, 3], DType::I16).unwrap();
        let dst_info = TensorInfo::new([5, 3], DType::I16).unwrap();
        let src = Tensor::from_slice(src_info.clone(), &[1i16, 2, 3, 4, 5, 6]).unwrap();
        let mut dst = Tensor::from_slice(dst_info.clone(), &[-1i16; 15]).unwrap();

        let mut kernel = WidthConcatenateKernel::new();
        kernel.configure(&src_info, 3, &dst_info);
        let window = *kernel.window().unwrap();
        assert_eq!(window.x(), Dimension::new(0, 2, 1));

        let pack = TensorPack::new(src.view(), dst.view_mut());
        kernel.run(&pack, &window, &ThreadInfo::single());

        let out: &[i16] = bytemuck::cast_slice(dst.as_bytes());
        #[rustfmt::skip]
        let expected: [i16; 15] = [
            -1, -1, -1, 1, 2,
            -1, -1, -1, 3, 4,
            -1, -1, -1, 5, 6,
        ];
        assert_eq!(out, &expected);
    }

    #[test]
    fn test_requantizes_signed_rows() {
        let from = QuantizationInfo::new(0.5, -10).unwrap();
        let to = QuantizationInfo::new(0.25, 5).unwrap();
        let src_info = TensorInfo::new([18, 2], DType::QAsymm8Signed).unwrap().with_quantization(from);
        let dst_info = TensorInfo::new([20, 2], DType::QAsymm8Signed).unwrap().with_quantization(to);
        let values: Vec<i8> = (0..36).map(|i| (i * 7 - 120) as i8).collect();
        let src = Tensor::from_slice(src_info.clone(), &values).unwrap();
        let mut dst = Tensor::zeros(dst_info.clone());

        let mut kernel = WidthConcatenateKernel::new();
        kernel.configure(&src_info, 2, &dst_info);
        let window = *kernel.window().unwrap();
        let pack = TensorPack::new(src.view(), dst.view_mut());
        kernel.run(&pack, &window, &ThreadInfo::single());

        let out: &[i8] = bytemuck::cast_slice(dst.as_bytes());
        for row in 0..2 {
            assert_eq!(&out[row * 20..row * 20 + 2], &[0, 0]);
            for x in 0..18 {
                // (v + 10) * 0.5 / 0.25 + 5, saturated
                let v = values[row * 18 + x] as i32;
                let expected = (2 * (v + 10) + 5).clamp(-128, 127) as i8;
                assert_eq!(out[row * 20 + 2 + x], expected, "row {row} x {x}");
            }
        }
    }

    #[test]
    fn test_split_along_x_matches_whole() {
        let src_info = TensorInfo::new([37, 2, 2], DType::U8).unwrap();
        let dst_info = TensorInfo::new([40, 2, 2], DType::U8).unwrap();
        let values: Vec<u8> = (0..148).map(|i| i as u8).collect();
        let src = Tensor::from_slice(src_info.clone(), &values).unwrap();

        let mut kernel = WidthConcatenateKernel::new();
        kernel.configure(&src_info, 3, &dst_info);
        let full = *kernel.window().unwrap();

        let mut whole = Tensor::zeros(dst_info.clone());
        let pack = TensorPack::new(src.view(), whole.view_mut());
        kernel.run(&pack, &full, &ThreadInfo::single());

        for (axis, parts) in [(DIM_X, 3), (DIM_Y, 2), (DIM_Z, 2)] {
            let mut split = Tensor::zeros(dst_info.clone());
            for sub in full.split(axis, parts) {
                let pack = TensorPack::new(src.view(), split.view_mut());
                kernel.run(&pack, &sub, &ThreadInfo::single());
            }
            assert_eq!(split.as_bytes(), whole.as_bytes(), "axis {axis}");
        }
    }

    #[test]
    fn test_validate_errors() {
        let input = TensorInfo::new([3, 2], DType::F32).unwrap();
        let output = TensorInfo::new([5, 2], DType::F32).unwrap();
        let taller = TensorInfo::new([5, 3], DType::F32).unwrap();

        assert!(WidthConcatenateKernel::validate(Some(&input), 2, Some(&output)).is_ok());
        assert_eq!(
            WidthConcatenateKernel::validate(Some(&input), 3, Some(&output)),
            Err(Error::OffsetOutOfRange {
                dim: 0,
                offset: 3,
                extent: 3,
                available: 5
            })
        );
        assert_eq!(
            WidthConcatenateKernel::validate(Some(&input), 0, Some(&taller)),
            Err(Error::dimension_mismatch(1, 2, 3))
        );
    }

    #[test]
    fn test_validate_rejects_strided_rows() {
        let input = TensorInfo::new([3, 2], DType::U8).unwrap();
        let output = TensorInfo::with_strides([5, 2], DType::U8, [2, 10], 0).unwrap();
        assert!(matches!(
            WidthConcatenateKernel::validate(Some(&input), 1, Some(&output)),
            Err(Error::InvalidArgument { arg: "output", .. })
        ));

        // The row layout is checked before the offset
        assert!(matches!(
            WidthConcatenateKernel::validate(Some(&input), 4, Some(&output)),
            Err(Error::InvalidArgument { arg: "output", .. })
        ));
    }
}
