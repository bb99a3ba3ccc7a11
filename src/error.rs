//! Error types for windowr

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using windowr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported while building descriptors or validating kernel arguments
///
/// These are configuration-time failures. Nothing in a kernel's run path
/// returns an `Error`: once a kernel is configured, running it on a
/// conforming sub-window cannot fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required tensor descriptor was not supplied
    #[error("Missing {role} tensor")]
    MissingTensor {
        /// Which operand was absent ("input" or "output")
        role: &'static str,
    },

    /// The input tensor has an unknown (uninitialized) data type
    #[error("Tensor data type is unknown")]
    UnknownDType,

    /// DType mismatch between operands
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Input dtype
        lhs: DType,
        /// Output dtype
        rhs: DType,
    },

    /// A dimension that must agree between operands differs
    #[error("Dimension {dim} mismatch: input has {input}, output has {output}")]
    DimensionMismatch {
        /// The dimension index
        dim: usize,
        /// Input size along `dim`
        input: usize,
        /// Output size along `dim`
        output: usize,
    },

    /// The input, placed at `offset` along `dim`, does not fit in the output
    #[error(
        "Input extent {extent} at offset {offset} exceeds output size {available} along dimension {dim}"
    )]
    OffsetOutOfRange {
        /// The concatenation dimension
        dim: usize,
        /// Requested offset
        offset: usize,
        /// Input size along `dim`
        extent: usize,
        /// Output size along `dim`
        available: usize,
    },

    /// Shape has no dimensions, a zero-sized dimension, or too many dimensions
    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape {
        /// The offending shape
        shape: Vec<usize>,
        /// Reason for invalidity
        reason: &'static str,
    },

    /// Strides overlap across a dimension boundary
    #[error("Stride {stride} of dimension {dim} with size {size} overlaps next stride {next}")]
    OverlappingStrides {
        /// The dimension whose extent overflows into the next one
        dim: usize,
        /// Byte stride of `dim`
        stride: usize,
        /// Size of `dim`
        size: usize,
        /// Byte stride of `dim + 1`
        next: usize,
    },

    /// Quantization parameters are not usable
    #[error("Invalid quantization: {reason}")]
    InvalidQuantization {
        /// Reason for invalidity
        reason: String,
    },

    /// A byte buffer is smaller than its descriptor requires
    #[error("Buffer too small: descriptor needs {required} bytes, got {got}")]
    BufferTooSmall {
        /// Bytes required by the descriptor
        required: usize,
        /// Bytes provided
        got: usize,
    },

    /// Unsupported concatenation axis
    #[error("Concatenation along dimension {dim} is not supported")]
    UnsupportedAxis {
        /// The requested dimension
        dim: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(dim: usize, input: usize, output: usize) -> Self {
        Self::DimensionMismatch { dim, input, output }
    }

    /// Create an invalid shape error
    pub fn invalid_shape(shape: &[usize], reason: &'static str) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
            reason,
        }
    }

    /// Create an invalid quantization error
    pub fn invalid_quantization(reason: impl Into<String>) -> Self {
        Self::InvalidQuantization {
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
