//! Common test utilities
#![allow(dead_code)]

use windowr::dtype::{DType, QuantizationInfo};
use windowr::runtime::cpu::{CpuScheduler, ParallelismConfig};
use windowr::runtime::{Kernel, ThreadInfo};
use windowr::tensor::{PaddingSize, Tensor, TensorInfo, TensorPack};

/// Quantization parameters that are known to be valid
pub fn qinfo(scale: f32, zero_point: i32) -> QuantizationInfo {
    QuantizationInfo::new(scale, zero_point).unwrap()
}

/// Dense descriptor
pub fn info(shape: &[usize], dtype: DType) -> TensorInfo {
    TensorInfo::new(shape, dtype).unwrap()
}

/// Dense quantized descriptor
pub fn quantized_info(shape: &[usize], dtype: DType, q: QuantizationInfo) -> TensorInfo {
    info(shape, dtype).with_quantization(q)
}

/// Descriptor with the same padding on every side of the X/Y plane
pub fn padded_info(shape: &[usize], dtype: DType, border: usize) -> TensorInfo {
    TensorInfo::with_padding(shape, dtype, PaddingSize::uniform(border)).unwrap()
}

/// Deterministic byte pattern, different for every element of a small tensor
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

/// Tensor whose every byte (padding included) follows `pattern`
pub fn patterned_tensor(info: TensorInfo, seed: u8) -> Tensor {
    let data = pattern(info.total_size(), seed);
    Tensor::from_bytes(info, data).unwrap()
}

/// Byte offset of element `coords` (X first) inside the tensor's buffer
pub fn element_offset(info: &TensorInfo, coords: &[usize]) -> usize {
    let mut offset = info.offset_first_element_in_bytes();
    for (dim, &c) in coords.iter().enumerate() {
        offset += c * info.stride(dim);
    }
    offset
}

/// Copy out the elements of a 2-D tensor row by row, skipping padding
pub fn read_plane(tensor: &Tensor) -> Vec<Vec<u8>> {
    let info = tensor.info();
    let es = info.element_size();
    (0..info.dimension(1))
        .map(|y| {
            let start = element_offset(info, &[0, y]);
            tensor.as_bytes()[start..start + info.dimension(0) * es].to_vec()
        })
        .collect()
}

/// Run `kernel` once over its whole window on the calling thread
pub fn run_full<K: Kernel>(kernel: &K, src: &Tensor, dst: &mut Tensor) {
    let window = *kernel.window().unwrap();
    let pack = TensorPack::new(src.view(), dst.view_mut());
    kernel.run(&pack, &window, &ThreadInfo::single());
}

/// Run `kernel` through a scheduler bounded to `threads` parts
pub fn run_scheduled<K: Kernel>(kernel: &K, src: &Tensor, dst: &mut Tensor, threads: usize) {
    let scheduler = CpuScheduler::new().with_parallelism(ParallelismConfig::new(Some(threads), None));
    let pack = TensorPack::new(src.view(), dst.view_mut());
    scheduler.schedule(kernel, &pack);
}
