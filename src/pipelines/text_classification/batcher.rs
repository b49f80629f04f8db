use std::sync::Arc;

use burn::{
    data::dataloader,
    tensor::{backend::Backend, Int, Tensor},
};
use derive_new::new;

use crate::{
    text::{pad_sequence, Side, Tokenizer},
    utils::tensors,
};

use super::Item;

/// Struct for inference batches
#[derive(Clone, Debug, new)]
pub struct Infer<B: Backend> {
    /// Padded word indices, `[batch_size, max_len]`
    pub tokens: Tensor<B, 2, Int>,
}

/// Struct for training batches
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Model input
    pub input: Infer<B>,

    /// Class ids for the batch
    pub targets: Tensor<B, 1, Int>,
}

/// Turns texts into fixed-length index tensors
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Tokenizer for converting text to word indices
    tokenizer: Arc<Tokenizer>,

    /// Length every sequence is padded or truncated to
    max_len: usize,

    /// Where padding goes
    padding: Side,

    /// Which end is cut from long sequences
    truncating: Side,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(
        tokenizer: Arc<Tokenizer>,
        max_len: usize,
        padding: Side,
        truncating: Side,
        device: B::Device,
    ) -> Self {
        Self {
            tokenizer,
            max_len,
            padding,
            truncating,
            device,
        }
    }

    /// The shared tokenizer
    pub fn tokenizer(&self) -> Arc<Tokenizer> {
        self.tokenizer.clone()
    }

    /// The device batches are created on
    pub fn device(&self) -> B::Device {
        self.device.clone()
    }

    /// Encode and pad a single text
    pub fn encode(&self, text: &str) -> Vec<usize> {
        let sequence = self.tokenizer.text_to_sequence(text);

        pad_sequence(&sequence, self.max_len, self.padding, self.truncating, 0)
    }
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<String, Infer<B>> for Batcher<B> {
    /// Collects a vector of texts into an inference batch
    fn batch(&self, items: Vec<String>) -> Infer<B> {
        let rows = items.iter().map(|text| self.encode(text)).collect();

        Infer {
            tokens: tensors::index_matrix(rows, self.max_len, &self.device),
        }
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend, I: Item> dataloader::batcher::Batcher<I, Train<B>> for Batcher<B> {
    /// Collects a vector of labeled items into a training batch
    fn batch(&self, items: Vec<I>) -> Train<B> {
        let inputs: Vec<String> = items.iter().map(|item| item.input().to_string()).collect();
        let input =
            <Self as dataloader::batcher::Batcher<String, Infer<B>>>::batch(self, inputs);

        let class_ids = items.iter().map(Item::class_id).collect();

        Train {
            input,
            targets: tensors::index_vector(class_ids, &self.device),
        }
    }
}
