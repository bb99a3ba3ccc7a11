//! Concatenation of several inputs into one output
//!
//! One kernel per input, each configured with the running offset along the
//! concatenation axis:
//!
//! ```text
//! axis = 1 (rows), inputs of 2, 3 and 1 rows
//!
//!   output rows 0..2  <- input 0   (offset 0)
//!   output rows 2..5  <- input 1   (offset 2)
//!   output rows 5..6  <- input 2   (offset 5)
//! ```

use tracing::debug;

use crate::error::{Error, Result};
use crate::runtime::Kernel;
use crate::runtime::cpu::CpuScheduler;
use crate::runtime::cpu::kernels::concatenate::{ConcatenateKernel, calculate_concatenate_shape};
use crate::tensor::{MAX_DIMS, TensorInfo, TensorMut, TensorPack, TensorRef, ValidRegion};

/// Concatenates a list of tensors along X or Y
#[derive(Debug)]
pub struct ConcatenateLayer {
    axis: usize,
    kernels: Vec<ConcatenateKernel>,
    valid_region: ValidRegion,
}

impl ConcatenateLayer {
    /// Check that `inputs` concatenated along `axis` exactly fill `output`
    pub fn validate(inputs: &[&TensorInfo], output: &TensorInfo, axis: usize) -> Result<()> {
        if inputs.is_empty() {
            return Err(Error::invalid_argument("inputs", "at least one input is required"));
        }
        ConcatenateKernel::for_axis(axis)?;

        let mut offset = 0usize;
        for input in inputs {
            ConcatenateKernel::validate(axis, Some(*input), offset, Some(output))?;
            offset += input.dimension(axis);
        }

        let expected = calculate_concatenate_shape(inputs, axis)?;
        for dim in 0..MAX_DIMS {
            if expected.dim(dim) != output.dimension(dim) {
                return Err(Error::dimension_mismatch(
                    dim,
                    expected.dim(dim),
                    output.dimension(dim),
                ));
            }
        }
        Ok(())
    }

    /// Validate and configure one kernel per input
    ///
    /// The output's valid region after [`run`](Self::run) is available from
    /// [`valid_region`](Self::valid_region).
    pub fn configure(inputs: &[&TensorInfo], output: &TensorInfo, axis: usize) -> Result<Self> {
        Self::validate(inputs, output, axis)?;

        let mut kernels = Vec::with_capacity(inputs.len());
        let mut valid_region = ValidRegion::full(output.tensor_shape());
        let mut offset = 0;
        for input in inputs {
            let mut kernel = ConcatenateKernel::for_axis(axis)?;
            valid_region = kernel.configure(input, offset, output);
            offset += input.dimension(axis);
            kernels.push(kernel);
        }
        debug!(axis, inputs = kernels.len(), output = ?output.tensor_shape(), "configured concatenate layer");

        Ok(Self {
            axis,
            kernels,
            valid_region,
        })
    }

    /// The concatenation axis
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Number of inputs the layer was configured with
    pub fn num_inputs(&self) -> usize {
        self.kernels.len()
    }

    /// The configured per-input kernels, in input order
    pub fn kernels(&self) -> &[ConcatenateKernel] {
        &self.kernels
    }

    /// Valid region of the output once the layer has run
    pub fn valid_region(&self) -> &ValidRegion {
        &self.valid_region
    }

    /// Write every input into `output` through `scheduler`
    ///
    /// # Panics
    /// If the number of inputs differs from the configured one, or if any
    /// tensor does not match the descriptors the layer was configured with.
    pub fn run(&self, scheduler: &CpuScheduler, inputs: &[TensorRef<'_>], mut output: TensorMut<'_>) {
        assert_eq!(
            inputs.len(),
            self.kernels.len(),
            "concatenate layer configured for {} inputs, got {}",
            self.kernels.len(),
            inputs.len()
        );
        for (kernel, input) in self.kernels.iter().zip(inputs) {
            let pack = TensorPack::new(*input, output.reborrow());
            debug_assert!(kernel.is_configured());
            scheduler.schedule(kernel, &pack);
        }
    }
}
