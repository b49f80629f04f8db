/// The recurrent classifier and its configuration
pub mod model;

/// Batcher
pub mod batcher;

/// Text Classification Items
pub mod item;

/// Training
pub mod training;

/// Inference
pub mod inference;

pub use batcher::Batcher;
pub use inference::{infer, Prediction, Predictor};
pub use item::Item;
pub use model::{Model, ModelConfig};
pub use training::{evaluate, fit, train, Evaluation, TrainingConfig};
