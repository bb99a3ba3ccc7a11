//! TensorInfo: shape, byte strides, data type and quantization of a tensor
//!
//! A `TensorInfo` describes memory it does not own. The layer that allocates
//! tensor memory builds one per tensor; kernels only read it.
//!
//! Address of element at coordinates `[c0, c1, ..., cn]`:
//!   offset_first_element + c0 * strides[0] + c1 * strides[1] + ... + cn * strides[n]

use super::coordinates::Coordinates;
use super::shape::{DIM_X, DIM_Y, MAX_DIMS, Shape};
use super::strides::Strides;
use crate::dtype::{DType, QuantizationInfo};
use crate::error::{Error, Result};
use std::fmt;

/// Padding around the X/Y plane, in elements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaddingSize {
    /// Rows above the first row
    pub top: usize,
    /// Elements after the last column
    pub right: usize,
    /// Rows below the last row
    pub bottom: usize,
    /// Elements before the first column
    pub left: usize,
}

impl PaddingSize {
    /// Same padding on every side
    pub const fn uniform(border: usize) -> Self {
        Self {
            top: border,
            right: border,
            bottom: border,
            left: border,
        }
    }

    /// True if no padding is present
    pub const fn is_empty(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }
}

/// Sub-rectangle of a tensor's shape that holds meaningful data
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidRegion {
    /// First valid coordinate along each dimension
    pub anchor: Coordinates,
    /// Number of valid elements along each dimension
    pub shape: Shape,
}

impl ValidRegion {
    /// Region covering the whole of `shape`
    pub fn full(shape: &Shape) -> Self {
        Self {
            anchor: Coordinates::origin(shape.num_dimensions()),
            shape: shape.clone(),
        }
    }

    /// First valid index along `dim`
    #[inline]
    pub fn start(&self, dim: usize) -> usize {
        self.anchor.get(dim)
    }

    /// One past the last valid index along `dim`
    #[inline]
    pub fn end(&self, dim: usize) -> usize {
        self.anchor.get(dim) + self.shape.dim(dim)
    }
}

/// Immutable per-tensor metadata
///
/// Invariants, checked at construction:
/// - 1 to [`MAX_DIMS`] dimensions, none of size zero
/// - `stride(i) * size(i) <= stride(i + 1)` unless `size(i) == 1`
#[derive(Clone, PartialEq)]
pub struct TensorInfo {
    shape: Shape,
    dtype: DType,
    strides: Strides,
    offset_first_element: usize,
    total_size: usize,
    padding: PaddingSize,
    quantization: QuantizationInfo,
    valid_region: ValidRegion,
}

impl TensorInfo {
    /// Create a dense (unpadded) descriptor
    ///
    /// # Example
    /// ```
    /// use windowr::dtype::DType;
    /// use windowr::tensor::TensorInfo;
    /// let info = TensorInfo::new([4, 3, 2], DType::F32).unwrap();
    /// assert_eq!(info.strides_in_bytes(), &[4, 16, 48]);
    /// assert_eq!(info.total_size(), 96);
    /// ```
    pub fn new(shape: impl Into<Shape>, dtype: DType) -> Result<Self> {
        Self::with_padding(shape, dtype, PaddingSize::default())
    }

    /// Create a descriptor whose X/Y plane is surrounded by `padding`
    pub fn with_padding(shape: impl Into<Shape>, dtype: DType, padding: PaddingSize) -> Result<Self> {
        let shape = shape.into();
        Self::check_shape(&shape)?;

        let overflow = || Error::invalid_shape(&shape, "byte size overflows usize");
        let extent = |dim| Self::padded_extent(&shape, &padding, dim).ok_or_else(overflow);

        let element_size = dtype.size_in_bytes();
        let mut strides = Strides::new();
        let mut stride = element_size;
        for dim in 0..shape.num_dimensions() {
            strides.push(stride);
            stride = stride.checked_mul(extent(dim)?).ok_or_else(overflow)?;
        }
        if shape.num_dimensions() == 1 {
            stride = stride.checked_mul(extent(DIM_Y)?).ok_or_else(overflow)?;
        }

        // Bounded by `stride`, which did not overflow
        let row_stride = element_size * extent(DIM_X)?;
        let offset_first_element = padding.top * row_stride + padding.left * element_size;

        Ok(Self {
            valid_region: ValidRegion::full(&shape),
            shape,
            dtype,
            strides,
            offset_first_element,
            total_size: stride,
            padding,
            quantization: QuantizationInfo::default(),
        })
    }

    /// Create a descriptor with explicit byte strides and first-element offset
    pub fn with_strides(
        shape: impl Into<Shape>,
        dtype: DType,
        strides: impl Into<Strides>,
        offset_first_element: usize,
    ) -> Result<Self> {
        let shape = shape.into();
        let strides = strides.into();
        Self::check_shape(&shape)?;

        if strides.len() != shape.num_dimensions() {
            return Err(Error::invalid_argument(
                "strides",
                format!(
                    "expected {} strides, got {}",
                    shape.num_dimensions(),
                    strides.len()
                ),
            ));
        }

        let element_size = dtype.size_in_bytes();
        if shape.x() > 1 && strides[DIM_X] < element_size {
            return Err(Error::OverlappingStrides {
                dim: DIM_X,
                stride: strides[DIM_X],
                size: 1,
                next: element_size,
            });
        }
        let overflow = || Error::invalid_argument("strides", "byte size overflows usize");

        // Size-1 dimensions are never stepped, so only the others must nest
        let mut stepped = (0..shape.num_dimensions()).filter(|&dim| shape[dim] > 1);
        if let Some(mut prev) = stepped.next() {
            for dim in stepped {
                let span = strides[prev].checked_mul(shape[prev]).ok_or_else(overflow)?;
                if span > strides[dim] {
                    return Err(Error::OverlappingStrides {
                        dim: prev,
                        stride: strides[prev],
                        size: shape[prev],
                        next: strides[dim],
                    });
                }
                prev = dim;
            }
        }

        // Every stride times its size must fit, so `stride()` past the rank
        // cannot overflow either
        let mut last_element = 0usize;
        for (&size, &stride) in shape.iter().zip(strides.iter()) {
            stride.checked_mul(size).ok_or_else(overflow)?;
            last_element = last_element
                .checked_add((size - 1) * stride)
                .ok_or_else(overflow)?;
        }
        let total_size = offset_first_element
            .checked_add(last_element)
            .and_then(|end| end.checked_add(element_size))
            .ok_or_else(overflow)?;

        Ok(Self {
            valid_region: ValidRegion::full(&shape),
            shape,
            dtype,
            strides,
            offset_first_element,
            total_size,
            padding: PaddingSize::default(),
            quantization: QuantizationInfo::default(),
        })
    }

    /// Attach quantization parameters
    pub fn with_quantization(mut self, quantization: QuantizationInfo) -> Self {
        self.quantization = quantization;
        self
    }

    fn check_shape(shape: &Shape) -> Result<()> {
        if shape.num_dimensions() == 0 {
            return Err(Error::invalid_shape(shape, "at least one dimension is required"));
        }
        if shape.num_dimensions() > MAX_DIMS {
            return Err(Error::invalid_shape(shape, "too many dimensions"));
        }
        if shape.contains(&0) {
            return Err(Error::invalid_shape(shape, "zero-sized dimension"));
        }
        Ok(())
    }

    fn padded_extent(shape: &Shape, padding: &PaddingSize, dim: usize) -> Option<usize> {
        match dim {
            DIM_X => padding.left.checked_add(shape.x())?.checked_add(padding.right),
            DIM_Y => padding.top.checked_add(shape.y())?.checked_add(padding.bottom),
            _ => Some(shape.dim(dim)),
        }
    }

    /// Get the shape
    #[inline]
    pub fn tensor_shape(&self) -> &Shape {
        &self.shape
    }

    /// Size along `dim` (1 beyond the rank)
    #[inline]
    pub fn dimension(&self, dim: usize) -> usize {
        self.shape.dim(dim)
    }

    /// Number of declared dimensions
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.shape.num_dimensions()
    }

    /// Element data type
    #[inline]
    pub fn data_type(&self) -> DType {
        self.dtype
    }

    /// Size of one element in bytes
    #[inline]
    pub fn element_size(&self) -> usize {
        self.dtype.size_in_bytes()
    }

    /// Byte strides of the declared dimensions
    #[inline]
    pub fn strides_in_bytes(&self) -> &[usize] {
        &self.strides
    }

    /// Byte stride along `dim`
    ///
    /// Dimensions beyond the rank hold a single element; their stride is the
    /// span of the last declared dimension.
    #[inline]
    pub fn stride(&self, dim: usize) -> usize {
        match self.strides.get(dim) {
            Some(&stride) => stride,
            None => {
                let last = self.num_dimensions() - 1;
                self.strides[last] * self.shape[last]
            }
        }
    }

    /// Byte offset of element `[0, 0, ...]` from the buffer start
    #[inline]
    pub fn offset_first_element_in_bytes(&self) -> usize {
        self.offset_first_element
    }

    /// Byte offset of the element at `coords` from the buffer start
    pub fn offset_element_in_bytes(&self, coords: &Coordinates) -> usize {
        (0..coords.num_dimensions()).fold(self.offset_first_element, |acc, dim| {
            acc + coords.get(dim) * self.stride(dim)
        })
    }

    /// Bytes a buffer must hold to back this descriptor
    #[inline]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Padding around the X/Y plane
    #[inline]
    pub fn padding(&self) -> PaddingSize {
        self.padding
    }

    /// Quantization parameters (identity for non-quantized types)
    #[inline]
    pub fn quantization_info(&self) -> QuantizationInfo {
        self.quantization
    }

    /// Region holding meaningful data
    #[inline]
    pub fn valid_region(&self) -> &ValidRegion {
        &self.valid_region
    }

    /// Replace the valid region, typically with the one a kernel's
    /// `configure` returned
    pub fn set_valid_region(&mut self, region: ValidRegion) {
        self.valid_region = region;
    }
}

impl fmt::Debug for TensorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TensorInfo {{ shape: {:?}, dtype: {}, strides: {:?}, offset: {}, qinfo: {:?} }}",
            self.shape.as_slice(),
            self.dtype,
            self.strides.as_slice(),
            self.offset_first_element,
            self.quantization
        )
    }
}
