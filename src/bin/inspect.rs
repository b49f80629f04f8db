//! Command line tool printing the column names of the raw tweet files

use anyhow::{anyhow, Result};
use multilang_sentiment::{
    cli::{self, datasets::Selection},
    datasets::{columns::inspect_columns, DataLayout},
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: inspect [SOURCE] [OPTIONS]

Arguments:
  SOURCE               The raw file to inspect: 'sentiment140', 'french',
                       'arabic-negative', 'arabic-positive' or 'all' (default)

Options:
  -h, --help           Print help
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
";

#[derive(Debug)]
struct Args {
    selection: Option<String>,
    data_dir: Option<String>,
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
            selection: pargs.opt_free_from_str()?,
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

    let selection = match &args.selection {
        Some(selection) => Selection::try_from(selection.as_str())?,
        None => Selection::All,
    };

    let mut layout = DataLayout::default();
    if let Some(data_dir) = &args.data_dir {
        layout = layout.with_data_dir(data_dir);
    }

    for source in selection.sources() {
        let path = layout.source(source);
        let columns = inspect_columns(source, &path)
            .map_err(|e| anyhow!("Unable to inspect {}: {}", path.display(), e))?;

        println!("{}", columns);
    }

    Ok(())
}
