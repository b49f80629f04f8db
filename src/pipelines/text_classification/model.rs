use burn::{
    config::Config,
    module::Module,
    nn::{
        loss::CrossEntropyLossConfig, Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear,
        LinearConfig, Lstm, LstmConfig,
    },
    tensor::{
        activation::{relu, softmax},
        backend::{AutodiffBackend, Backend},
        Int, Tensor,
    },
    train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep},
};

use super::batcher::{Infer, Train};

/// Layer sizes of the recurrent classifier
#[derive(Config)]
pub struct ModelConfig {
    /// Embedding rows, also the tokenizer's vocabulary cap
    #[config(default = 10_000)]
    pub vocab_size: usize,

    /// Size of each word embedding
    #[config(default = 128)]
    pub embedding_size: usize,

    /// Hidden size of the first LSTM, which reads the whole sequence
    #[config(default = 128)]
    pub sequence_hidden_size: usize,

    /// Hidden size of the second LSTM, whose last step summarizes the text
    #[config(default = 64)]
    pub summary_hidden_size: usize,

    /// Width of the dense layer before the output
    #[config(default = 32)]
    pub dense_size: usize,

    /// Dropout rate after the dense layer
    #[config(default = 0.3)]
    pub dropout: f64,

    /// Total number of classes
    #[config(default = 2)]
    pub n_classes: usize,
}

impl ModelConfig {
    /// Initialize the model
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        Model {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embedding_size).init(device),
            sequence: LstmConfig::new(self.embedding_size, self.sequence_hidden_size, true)
                .init(device),
            summary: LstmConfig::new(self.sequence_hidden_size, self.summary_hidden_size, true)
                .init(device),
            dense: LinearConfig::new(self.summary_hidden_size, self.dense_size).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            output: LinearConfig::new(self.dense_size, self.n_classes).init(device),
            n_classes: self.n_classes,
        }
    }
}

/// Embedding, two stacked LSTMs and a small dense head
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Word embeddings
    pub embedding: Embedding<B>,

    /// LSTM over the embedded sequence
    pub sequence: Lstm<B>,

    /// LSTM over the first LSTM's hidden states
    pub summary: Lstm<B>,

    /// Dense layer, ReLU activated
    pub dense: Linear<B>,

    /// Dropout after the dense layer
    pub dropout: Dropout,

    /// Linear layer producing class logits
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,
}

impl<B: Backend> Model<B> {
    /// Class logits, `[batch_size, n_classes]`
    pub fn logits(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, seq_length] = tokens.dims();

        let embedded = self.embedding.forward(tokens);
        let (_, hidden) = self.sequence.forward(embedded, None);
        let (_, hidden) = self.summary.forward(hidden, None);

        let [_, _, hidden_size] = hidden.dims();
        let last = hidden
            .slice([0..batch_size, seq_length - 1..seq_length, 0..hidden_size])
            .reshape([batch_size, hidden_size]);

        let dense = self.dropout.forward(relu(self.dense.forward(last)));

        self.output.forward(dense)
    }

    /// Defines forward pass for training
    pub fn forward(&self, item: Train<B>) -> ClassificationOutput<B> {
        let targets = item.targets;
        let output = self.logits(item.input.tokens);

        let loss = CrossEntropyLossConfig::new()
            .init(&output.device())
            .forward(output.clone(), targets.clone());

        ClassificationOutput {
            loss,
            output,
            targets,
        }
    }

    /// Defines forward pass for inference, returning class probabilities
    pub fn infer(&self, input: Infer<B>) -> Tensor<B, 2> {
        softmax(self.logits(input.tokens), 1)
    }
}

impl<B: AutodiffBackend> TrainStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> TrainOutput<ClassificationOutput<B>> {
        let item = self.forward(item);

        TrainOutput::new(self, item.loss.backward(), item)
    }
}

impl<B: Backend> ValidStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> ClassificationOutput<B> {
        self.forward(item)
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use pretty_assertions::assert_eq;

    use crate::utils::tensors;

    use super::*;

    type B = NdArray;

    fn small_config() -> ModelConfig {
        ModelConfig::new()
            .with_vocab_size(20)
            .with_embedding_size(8)
            .with_sequence_hidden_size(6)
            .with_summary_hidden_size(4)
            .with_dense_size(3)
    }

    #[test]
    fn probabilities_have_one_row_per_text() {
        let device = NdArrayDevice::default();
        let model = small_config().init::<B>(&device);

        let tokens = tensors::index_matrix::<B>(vec![vec![0, 0, 4, 5], vec![7, 1, 2, 19]], 4, &device);
        let probabilities = model.infer(Infer::new(tokens));

        assert_eq!(probabilities.dims(), [2, 2]);

        let values = probabilities.into_data().convert::<f32>().value;
        for row in values.chunks(2) {
            assert!((row[0] + row[1] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn training_forward_reports_a_finite_loss() {
        let device = NdArrayDevice::default();
        let model = small_config().init::<B>(&device);

        let tokens = tensors::index_matrix::<B>(vec![vec![1, 2, 3], vec![3, 2, 1]], 3, &device);
        let targets = tensors::index_vector::<B>(vec![0, 1], &device);

        let output = model.forward(Train::new(Infer::new(tokens), targets));
        let loss = output.loss.into_data().convert::<f32>().value[0];

        assert_eq!(output.output.dims(), [2, 2]);
        assert!(loss.is_finite() && loss > 0.0);
    }
}
