use std::{path::Path, sync::Arc};

use burn::{
    config::Config as _,
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::Dataset as _,
    },
    module::{AutodiffModule, Module},
    optim::AdamConfig,
    record::{CompactRecorder, Recorder},
    tensor::{
        backend::{AutodiffBackend, Backend},
        ElementConversion,
    },
    train::{
        metric::{AccuracyMetric, LossMetric},
        LearnerBuilder,
    },
    LearningRate,
};

use crate::{
    datasets::{DataLayout, SentimentDataset},
    text::{Side, Tokenizer, TokenizerConfig},
    utils::renderer,
};

use super::{batcher::Train, Batcher, Model, ModelConfig};

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct TrainingConfig {
    /// Classifier layer sizes. `vocab_size` also caps the tokenizer.
    pub model: ModelConfig,

    /// Length every sequence is padded or truncated to
    #[config(default = 50)]
    pub max_len: usize,

    /// Batch size
    #[config(default = 1024)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 10)]
    pub num_epochs: usize,

    /// Adam learning rate
    #[config(default = 1e-3)]
    pub learning_rate: LearningRate,

    /// Share of the data held out for evaluation
    #[config(default = 0.2)]
    pub test_ratio: f64,

    /// Seed for the train/test split and batch shuffling
    #[config(default = 42)]
    pub seed: u64,

    /// Where padding goes
    #[config(default = "Side::Pre")]
    pub padding: Side,

    /// Which end is cut from long sequences
    #[config(default = "Side::Pre")]
    pub truncating: Side,

    /// Data loader worker threads
    #[config(default = 4)]
    pub num_workers: usize,
}

/// Loss and accuracy over a held-out split
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Mean cross entropy loss per item
    pub loss: f64,

    /// Share of items classified correctly
    pub accuracy: f64,

    /// Items evaluated
    pub items: usize,
}

/// Compute loss and accuracy of a model over every batch of a loader
pub fn evaluate<B: Backend>(model: &Model<B>, loader: &Arc<dyn DataLoader<Train<B>>>) -> Evaluation {
    let mut loss_sum = 0.0;
    let mut correct = 0;
    let mut items = 0;

    for batch in loader.iter() {
        let [batch_size] = batch.targets.dims();
        let output = model.forward(batch);

        loss_sum += output.loss.into_scalar().elem::<f64>() * batch_size as f64;

        let predicted = output.output.argmax(1).reshape([batch_size]);
        correct += predicted
            .equal(output.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>() as usize;
        items += batch_size;
    }

    if items == 0 {
        return Evaluation {
            loss: 0.0,
            accuracy: 0.0,
            items,
        };
    }

    Evaluation {
        loss: loss_sum / items as f64,
        accuracy: correct as f64 / items as f64,
        items,
    }
}

/// Load the layout's merged CSV and fit the classifier on it
pub async fn train<B: AutodiffBackend>(
    device: B::Device,
    config: TrainingConfig,
    layout: &DataLayout,
) -> anyhow::Result<Evaluation> {
    let merged = layout.merged();
    let dataset = SentimentDataset::load(&merged)
        .map_err(|e| anyhow!("Unable to load {}: {}", merged.display(), e))?;

    fit::<B>(device, dataset, config, layout).await
}

/// Fit a tokenizer and the classifier on a labeled dataset, then save config, weights and
/// tokenizer into the layout's artifact directory
pub async fn fit<B: AutodiffBackend>(
    device: B::Device,
    dataset: SentimentDataset,
    config: TrainingConfig,
    layout: &DataLayout,
) -> anyhow::Result<Evaluation> {
    if config.max_len == 0 {
        return Err(anyhow!("max_len must be at least 1"));
    }

    if config.batch_size == 0 {
        return Err(anyhow!("batch_size must be at least 1"));
    }

    std::fs::create_dir_all(&layout.artifact_dir)?;

    let (positive, negative) = dataset.class_balance();
    log::info!("Positive: {positive}, Negative: {negative}");

    // Fit the tokenizer on every text, before the split
    let mut tokenizer = Tokenizer::new(
        TokenizerConfig::default().with_num_words(config.model.vocab_size),
    );
    tokenizer.fit_on_texts(&dataset.texts());
    log::info!(
        "Tokenizer fit on {} texts, {} distinct words",
        tokenizer.config().document_count,
        tokenizer.word_index().len()
    );

    let tokenizer = Arc::new(tokenizer);

    let (dataset_train, dataset_test) = dataset.split(config.test_ratio, config.seed);
    log::info!(
        "Training on {} items, evaluating on {}",
        dataset_train.len(),
        dataset_test.len()
    );

    // Initialize batchers for training and testing data
    let batcher_train = Batcher::<B>::new(
        tokenizer.clone(),
        config.max_len,
        config.padding,
        config.truncating,
        device.clone(),
    );
    let batcher_test = Batcher::<B::InnerBackend>::new(
        tokenizer.clone(),
        config.max_len,
        config.padding,
        config.truncating,
        device.clone(),
    );

    // Initialize data loaders for training and testing data
    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(config.num_workers)
        .build(dataset_train);

    let dataloader_test = DataLoaderBuilder::new(batcher_test)
        .batch_size(config.batch_size)
        .num_workers(config.num_workers)
        .build(dataset_test);

    let model = config.model.init::<B>(&device);
    let optimizer = AdamConfig::new().init();

    let artifact_dir = layout.artifact_dir.to_string_lossy().to_string();

    // Initialize learner
    let learner = LearnerBuilder::new(&artifact_dir)
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .with_file_checkpointer(CompactRecorder::new())
        .devices(vec![device])
        .num_epochs(config.num_epochs)
        .renderer(renderer::Logged::new())
        .summary()
        .build(model, optimizer, config.learning_rate);

    // Train the model
    let model_trained = learner.fit(dataloader_train, dataloader_test.clone());

    let evaluation = evaluate(&model_trained.valid(), &dataloader_test);
    log::info!(
        "Test loss: {:.4}, accuracy: {:.4} ({} items)",
        evaluation.loss,
        evaluation.accuracy,
        evaluation.items
    );

    // Save the configuration, the trained model and the tokenizer
    save_artifacts(layout, &config, model_trained, &tokenizer).await?;

    Ok(evaluation)
}

async fn save_artifacts<B: Backend>(
    layout: &DataLayout,
    config: &TrainingConfig,
    model: Model<B>,
    tokenizer: &Tokenizer,
) -> anyhow::Result<()> {
    let config_file = layout.config();
    config
        .save(&config_file)
        .map_err(|e| anyhow!("Unable to save config to {}: {}", config_file.display(), e))?;

    CompactRecorder::new()
        .record(model.into_record(), layout.model())
        .map_err(|e| anyhow!("Unable to save trained model weights: {}", e))?;

    tokenizer.save(layout.tokenizer()).await?;

    log::info!("Saved model artifacts to {}", layout.artifact_dir.display());

    Ok(())
}

/// Load a training configuration saved next to a model
pub fn load_config(path: &Path) -> anyhow::Result<TrainingConfig> {
    TrainingConfig::load(path)
        .map_err(|e| anyhow!("Unable to load config file {}: {}", path.display(), e))
}
