//! Command line tool cleaning and merging the raw tweet files into one labeled CSV

use anyhow::Result;
use multilang_sentiment::{
    cli,
    datasets::{
        prepare::{prepare, PrepareConfig},
        DataLayout,
    },
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: prepare [OPTIONS]

Options:
  -h, --help           Print help
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -n, --english-sample Number of Sentiment140 rows to sample (defaults to 500000)
  -s, --seed           Seed for the English sample (random by default)
";

#[derive(Debug)]
struct Args {
    data_dir: Option<String>,
    english_sample: Option<usize>,
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
            english_sample: pargs.opt_value_from_str(["-n", "--english-sample"])?,
            seed: pargs.opt_value_from_str(["-s", "--seed"])?,
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

    let mut config = PrepareConfig::new();

    if let Some(english_sample) = args.english_sample {
        config.english_sample = english_sample;
    }

    config.seed = args.seed;

    let summary = prepare(&layout, &config)?;

    println!("{}", summary);

    Ok(())
}
