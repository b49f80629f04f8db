//! Command line tool reporting missing and invalid labels in the merged dataset

use anyhow::{anyhow, Result};
use multilang_sentiment::{
    cli,
    datasets::{quality::check_quality, DataLayout},
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: check [OPTIONS]

Options:
  -h, --help           Print help
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -i, --input          The merged CSV file (defaults to DATA_DIR/multilang_sentiment_data.csv)

Exits with status 1 when any row has a missing or invalid sentiment.
";

#[derive(Debug)]
struct Args {
    data_dir: Option<String>,
    input: Option<String>,
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
            input: pargs.opt_value_from_str(["-i", "--input"])?,
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

    let input = args.input.map(Into::into).unwrap_or_else(|| layout.merged());

    let report = check_quality(&input)
        .map_err(|e| anyhow!("Unable to check {}: {}", input.display(), e))?;

    print!("{}", report);

    if !report.is_clean() {
        log::warn!(
            "{} rows cannot be used for training",
            report.missing + report.invalid
        );
        std::process::exit(1);
    }

    Ok(())
}
