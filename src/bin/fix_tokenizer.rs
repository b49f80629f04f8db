//! Command line tool repairing a tokenizer artifact whose word index was saved as a string

use anyhow::{anyhow, Result};
use multilang_sentiment::{cli, datasets::DataLayout, text::repair::repair_tokenizer};
use pico_args::Arguments;

const HELP: &str = "\
Usage: fix_tokenizer [OPTIONS]

Options:
  -h, --help           Print help
  -a, --artifact-dir   The model artifact directory (defaults to 'models/multilang_sentiment_model')
  -i, --input          The tokenizer to repair (defaults to ARTIFACT_DIR/tokenizer.json)
  -o, --output         Where to write the result (defaults to ARTIFACT_DIR/tokenizer_fixed.json)
";

#[derive(Debug)]
struct Args {
    artifact_dir: Option<String>,
    input: Option<String>,
    output: Option<String>,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            artifact_dir: pargs.opt_value_from_str(["-a", "--artifact-dir"])?,
            input: pargs.opt_value_from_str(["-i", "--input"])?,
            output: pargs.opt_value_from_str(["-o", "--output"])?,
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
    if let Some(artifact_dir) = &args.artifact_dir {
        layout = layout.with_artifact_dir(artifact_dir);
    }

    let input = args.input.map(Into::into).unwrap_or_else(|| layout.tokenizer());
    let output = args
        .output
        .map(Into::into)
        .unwrap_or_else(|| layout.tokenizer_fixed());

    let outcome = repair_tokenizer(&input, &output)
        .await
        .map_err(|e| anyhow!("Unable to repair {}: {}", input.display(), e))?;

    println!("{}", outcome);
    println!("Repaired tokenizer saved to {}", output.display());

    Ok(())
}
