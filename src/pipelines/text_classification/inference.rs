use std::{path::Path, sync::Arc};

use burn::{
    data::dataloader::batcher::Batcher as _,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};

use crate::{
    datasets::{DataLayout, Sentiment},
    text::{Side, Tokenizer},
};

use super::{batcher::Infer, training::load_config, Batcher, Model, TrainingConfig};

/// Probability above which a text is called positive
pub const POSITIVE_THRESHOLD: f32 = 0.5;

/// The classification of one text
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// The input text
    pub text: String,

    /// Padded word indices fed to the model
    pub tokens: Vec<usize>,

    /// Class probabilities, indexed by class id
    pub probabilities: Vec<f32>,

    /// Positive when P(positive) exceeds the threshold
    pub sentiment: Sentiment,
}

impl Prediction {
    /// Label a probability row
    pub fn from_probabilities(text: String, tokens: Vec<usize>, probabilities: Vec<f32>) -> Self {
        let positive = probabilities
            .get(Sentiment::Positive.class_id())
            .copied()
            .unwrap_or_default();

        let sentiment = if positive > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };

        Self {
            text,
            tokens,
            probabilities,
            sentiment,
        }
    }
}

/// A trained classifier with its tokenizer
pub struct Predictor<B: Backend> {
    /// The configuration the model was trained with
    config: TrainingConfig,

    /// Trained weights
    model: Model<B>,

    /// Text to padded index tensors
    batcher: Batcher<B>,
}

impl<B: Backend> Predictor<B> {
    /// Assemble a predictor from loaded parts, padding as configured. A tokenizer able to emit
    /// indices past the model's embedding table is capped to it.
    pub fn new(
        config: TrainingConfig,
        model: Model<B>,
        mut tokenizer: Tokenizer,
        device: B::Device,
    ) -> Self {
        let vocab_size = config.model.vocab_size;
        if tokenizer.vocab_size() > vocab_size {
            log::warn!(
                "Tokenizer indexes {} words but the model embeds {} indices, rarer words are dropped",
                tokenizer.word_index().len(),
                vocab_size
            );
            tokenizer.limit_num_words(vocab_size);
        }

        let batcher = Batcher::new(
            Arc::new(tokenizer),
            config.max_len,
            config.padding,
            config.truncating,
            device,
        );

        Self {
            config,
            model,
            batcher,
        }
    }

    /// Load the config and weights from the layout's artifact directory, and the tokenizer from
    /// `tokenizer_file`
    pub async fn load(
        device: B::Device,
        layout: &DataLayout,
        tokenizer_file: &Path,
    ) -> anyhow::Result<Self> {
        let config = load_config(&layout.config())?;

        log::info!("Loading tokenizer from {}", tokenizer_file.display());
        let tokenizer = Tokenizer::load(tokenizer_file).await?;
        log::info!(
            "Tokenizer loaded, first words: {:?}",
            tokenizer.top_words(5)
        );

        log::info!("Loading weights...");
        let record = CompactRecorder::new()
            .load(layout.model(), &device)
            .map_err(|e| anyhow!("Unable to load trained model weights: {}", e))?;

        let model = config.model.init::<B>(&device).load_record(record);

        Ok(Self::new(config, model, tokenizer, device))
    }

    /// Use different padding and truncation sides than the model was trained with
    pub fn with_sides(mut self, padding: Side, truncating: Side) -> Self {
        self.config.padding = padding;
        self.config.truncating = truncating;
        self.batcher = Batcher::new(
            self.batcher.tokenizer(),
            self.config.max_len,
            padding,
            truncating,
            self.batcher.device(),
        );

        self
    }

    /// The configuration the model was trained with
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Classify each text
    pub fn predict(&self, texts: Vec<String>) -> Vec<Prediction> {
        if texts.is_empty() {
            return Vec::new();
        }

        let tokens: Vec<Vec<usize>> = texts.iter().map(|text| self.batcher.encode(text)).collect();

        let input: Infer<B> = self.batcher.batch(texts.clone());
        let probabilities = self.model.infer(input).into_data().convert::<f32>().value;

        let n_classes = self.model.n_classes;

        texts
            .into_iter()
            .zip(tokens)
            .zip(probabilities.chunks(n_classes))
            .map(|((text, tokens), row)| Prediction::from_probabilities(text, tokens, row.to_vec()))
            .collect()
    }
}

/// Define inference function
pub async fn infer<B: Backend>(
    device: B::Device,     // Device on which to perform computation (e.g., CPU or CUDA device)
    layout: &DataLayout,   // Directories holding the model artifacts
    tokenizer_file: &Path, // Tokenizer artifact, possibly a repaired one
    sides: Option<(Side, Side)>, // Padding and truncation overrides
    texts: Vec<String>,    // Text samples for inference
) -> anyhow::Result<Vec<Prediction>> {
    let mut predictor = Predictor::<B>::load(device, layout, tokenizer_file).await?;

    if let Some((padding, truncating)) = sides {
        predictor = predictor.with_sides(padding, truncating);
    }

    log::info!("Running inference...");

    Ok(predictor.predict(texts))
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use pretty_assertions::assert_eq;

    use crate::{
        pipelines::text_classification::ModelConfig,
        text::TokenizerConfig,
    };

    use super::*;

    #[test]
    fn threshold_is_strict() {
        let even = Prediction::from_probabilities("x".to_string(), vec![], vec![0.5, 0.5]);
        let positive = Prediction::from_probabilities("y".to_string(), vec![], vec![0.2, 0.8]);

        assert_eq!(even.sentiment, Sentiment::Negative);
        assert_eq!(positive.sentiment, Sentiment::Positive);
    }

    #[test]
    fn predicts_one_row_per_text() {
        let device = NdArrayDevice::default();

        let mut tokenizer = Tokenizer::new(TokenizerConfig::default().with_num_words(16));
        tokenizer.fit_on_texts(&["très bien", "très mauvais", "جيد"]);

        let config = TrainingConfig::new(
            ModelConfig::new()
                .with_vocab_size(16)
                .with_embedding_size(4)
                .with_sequence_hidden_size(4)
                .with_summary_hidden_size(4)
                .with_dense_size(4),
        )
        .with_max_len(5);

        let model = config.model.init::<NdArray>(&device);
        let predictor = Predictor::new(config, model, tokenizer, device)
            .with_sides(Side::Post, Side::Post);

        let predictions = predictor.predict(vec!["très mauvais".to_string(), "جيد".to_string()]);

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].tokens, vec![1, 3, 0, 0, 0]);
        assert_eq!(predictions[1].tokens, vec![4, 0, 0, 0, 0]);
        assert_eq!(predictions[1].probabilities.len(), 2);
        assert!(predictor.predict(Vec::new()).is_empty());
    }

    #[test]
    fn uncapped_tokenizer_stays_inside_the_embedding_table() {
        let device = NdArrayDevice::default();

        let words: Vec<String> = (0..40).map(|i| format!("w{i}")).collect();
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        tokenizer.fit_on_texts(&[words.join(" ")]);
        assert_eq!(tokenizer.index_of("w39"), Some(40));

        let config = TrainingConfig::new(
            ModelConfig::new()
                .with_vocab_size(16)
                .with_embedding_size(4)
                .with_sequence_hidden_size(4)
                .with_summary_hidden_size(4)
                .with_dense_size(4),
        )
        .with_max_len(4);

        let model = config.model.init::<NdArray>(&device);
        let predictor = Predictor::new(config, model, tokenizer, device)
            .with_sides(Side::Post, Side::Post);

        let predictions = predictor.predict(vec!["w39 w2 w15".to_string()]);

        assert_eq!(predictions[0].tokens, vec![3, 0, 0, 0]);
        assert_eq!(predictions[0].probabilities.len(), 2);
    }
}
