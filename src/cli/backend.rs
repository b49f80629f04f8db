use burn::backend::Autodiff;

/// The backend used for inference and validation
#[cfg(not(feature = "tch"))]
pub type Backend = burn::backend::NdArray;

/// The backend used for inference and validation
#[cfg(feature = "tch")]
pub type Backend = burn::backend::LibTorch;

/// The backend used for training
pub type TrainingBackend = Autodiff<Backend>;

/// The device jobs run on
#[cfg(not(feature = "tch"))]
pub fn device() -> burn::backend::ndarray::NdArrayDevice {
    burn::backend::ndarray::NdArrayDevice::Cpu
}

/// The device jobs run on
#[cfg(feature = "tch")]
pub fn device() -> burn::backend::libtorch::LibTorchDevice {
    burn::backend::libtorch::LibTorchDevice::Cuda(0)
}
