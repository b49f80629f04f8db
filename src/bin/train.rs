//! Command line tool fitting the tokenizer and the sentiment classifier on the merged dataset

use anyhow::Result;
use multilang_sentiment::{
    cli::{
        self,
        backend::{self, TrainingBackend},
    },
    datasets::DataLayout,
    pipelines::text_classification::{self, ModelConfig, TrainingConfig},
    text::Side,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: train [OPTIONS]

Options:
  -h, --help           Print help
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -a, --artifact-dir   Where to save the model (defaults to 'models/multilang_sentiment_model')
  -n, --num-epochs     Number of epochs to train for (defaults to 10)
  -b, --batch-size     Batch size (defaults to 1024)
  -w, --max-words      Vocabulary size (defaults to 10000)
  -l, --max-len        Sequence length (defaults to 50)
  --padding            Padding side, 'pre' or 'post' (defaults to 'pre')
  --truncating         Truncation side, 'pre' or 'post' (defaults to 'pre')
  --seed               Seed for the split and shuffling (defaults to 42)
";

#[derive(Debug)]
struct Args {
    data_dir: Option<String>,
    artifact_dir: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    max_words: Option<usize>,
    max_len: Option<usize>,
    padding: Option<Side>,
    truncating: Option<Side>,
    seed: Option<u64>,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            artifact_dir: pargs.opt_value_from_str(["-a", "--artifact-dir"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            max_words: pargs.opt_value_from_str(["-w", "--max-words"])?,
            max_len: pargs.opt_value_from_str(["-l", "--max-len"])?,
            padding: pargs.opt_value_from_str("--padding")?,
            truncating: pargs.opt_value_from_str("--truncating")?,
            seed: pargs.opt_value_from_str("--seed")?,
        };

        Ok(Some(args))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_logging();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let mut layout = DataLayout::default();

    if let Some(data_dir) = &args.data_dir {
        layout = layout.with_data_dir(data_dir);
    }

    if let Some(artifact_dir) = &args.artifact_dir {
        layout = layout.with_artifact_dir(artifact_dir);
    }

    let mut model_config = ModelConfig::new();

    if let Some(max_words) = args.max_words {
        model_config.vocab_size = max_words;
    }

    let mut config = TrainingConfig::new(model_config);

    if let Some(num_epochs) = args.num_epochs {
        config.num_epochs = num_epochs;
    }

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    if let Some(max_len) = args.max_len {
        config.max_len = max_len;
    }

    if let Some(padding) = args.padding {
        config.padding = padding;
    }

    if let Some(truncating) = args.truncating {
        config.truncating = truncating;
    }

    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let evaluation =
        text_classification::train::<TrainingBackend>(backend::device(), config, &layout).await?;

    println!("Accuracy: {}", evaluation.accuracy);
    println!("Model saved to {}", layout.artifact_dir.display());

    Ok(())
}
