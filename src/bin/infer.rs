//! Command line tool classifying a few texts with a trained model

use std::path::PathBuf;

use anyhow::Result;
use multilang_sentiment::{
    cli::{
        self,
        backend::{self, Backend},
    },
    datasets::DataLayout,
    pipelines::text_classification::infer,
    text::Side,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: infer [TEXT...] [OPTIONS]

Arguments:
  TEXT                 Texts to classify (defaults to a few Arabic and French samples)

Options:
  -h, --help           Print help
  -a, --artifact-dir   The model artifact directory (defaults to 'models/multilang_sentiment_model')
  -t, --tokenizer      The tokenizer file (defaults to ARTIFACT_DIR/tokenizer.json)
  --padding            Padding side, 'pre' or 'post' (defaults to 'post')
  --truncating         Truncation side, 'pre' or 'post' (defaults to 'post')
";

/// Texts classified when none are given
const SAMPLES: [&str; 3] = ["جيد", "سيء", "très mauvais"];

#[derive(Debug)]
struct Args {
    artifact_dir: Option<String>,
    tokenizer: Option<PathBuf>,
    padding: Side,
    truncating: Side,
    texts: Vec<String>,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let artifact_dir = pargs.opt_value_from_str(["-a", "--artifact-dir"])?;
        let tokenizer = pargs.opt_value_from_str(["-t", "--tokenizer"])?;
        let padding = pargs.opt_value_from_str("--padding")?.unwrap_or(Side::Post);
        let truncating = pargs
            .opt_value_from_str("--truncating")?
            .unwrap_or(Side::Post);

        let texts = pargs
            .finish()
            .into_iter()
            .map(|text| text.to_string_lossy().into_owned())
            .collect();

        Ok(Some(Args {
            artifact_dir,
            tokenizer,
            padding,
            truncating,
            texts,
        }))
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
    if let Some(artifact_dir) = &args.artifact_dir {
        layout = layout.with_artifact_dir(artifact_dir);
    }

    let tokenizer = args.tokenizer.unwrap_or_else(|| layout.tokenizer());

    let texts = if args.texts.is_empty() {
        SAMPLES.iter().map(|text| text.to_string()).collect()
    } else {
        args.texts
    };

    let predictions = infer::<Backend>(
        backend::device(),
        &layout,
        &tokenizer,
        Some((args.padding, args.truncating)),
        texts,
    )
    .await?;

    for prediction in predictions {
        println!(
            "Text: {}\
             \nTokens: {:?}\
             \nPrediction: {:?}\
             \nSentiment: {}\n",
            prediction.text, prediction.tokens, prediction.probabilities, prediction.sentiment
        );
    }

    Ok(())
}
