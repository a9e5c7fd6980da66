//! csv-superkey CLI - find the column sets that uniquely identify CSV rows

use clap::Parser;
use csv_superkey::{
    Dataset, DatasetReader, HeaderNaming, KeyCandidate, KeyError, KeyFinder, Quote, SearchBounds,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Find all super keys in a CSV file.
///
/// Prints every set of columns whose combined values are unique across all
/// rows, smallest sets first. Column names carry their position by default,
/// e.g. the first column titled `id` is `id - 0`.
#[derive(Parser, Debug)]
#[command(name = "csv-superkey")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file to analyze
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// Number of keys to show
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    number: Option<i64>,

    /// Column names to exclude from keys
    #[arg(short = 'e', long, num_args = 1..)]
    exclusion: Vec<String>,

    /// Regular expression to exclude columns (matched at the start of the name)
    #[arg(short = 'r', long)]
    regex_exclusion: Option<String>,

    /// Maximum key size to accept
    #[arg(short = 's', long, allow_negative_numbers = true)]
    max_key_size: Option<i64>,

    /// Field delimiter (single character)
    #[arg(short = 'd', long, default_value = ",")]
    delimiter: char,

    /// Quote character (single character, or 'none' to disable quoting)
    #[arg(short = 'q', long)]
    quote: Option<Quote>,

    /// Use header titles as column names without appending their position
    #[arg(long)]
    verbatim_headers: bool,

    /// Only report keys that contain no smaller key
    #[arg(long)]
    minimal: bool,

    /// Test candidates of the same size in parallel
    #[arg(long)]
    parallel: bool,

    /// Output format: text (default), json, or csv
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Only print the number of keys found
    #[arg(short = 'c', long)]
    count: bool,

    /// Log search progress to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error processing {}: {}", args.file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let finder = build_finder(args)?;
    let dataset = read_dataset(args)?;

    if args.parallel {
        let keys = finder.find_all_par(&dataset)?;
        return emit(args, keys.into_iter().map(Ok));
    }

    let search = finder.search(&dataset)?;
    emit(args, search)
}

fn build_finder(args: &Args) -> Result<KeyFinder, KeyError> {
    let mut finder = KeyFinder::new();
    finder
        .exclude(args.exclusion.iter().cloned())
        .bounds(SearchBounds::from_signed(args.max_key_size, args.number)?)
        .minimal_only(args.minimal);

    if let Some(ref pattern) = args.regex_exclusion {
        finder.exclude_pattern(pattern)?;
    }

    Ok(finder)
}

fn read_dataset(args: &Args) -> Result<Dataset, Box<dyn std::error::Error>> {
    let delimiter = u8::try_from(args.delimiter).map_err(|_| {
        format!(
            "delimiter must be a single-byte character, got {:?}",
            args.delimiter
        )
    })?;

    let mut reader = DatasetReader::new();
    reader.delimiter(delimiter);
    if let Some(quote) = args.quote {
        reader.quote(quote);
    }
    if args.verbatim_headers {
        reader.header_naming(HeaderNaming::Verbatim);
    }

    Ok(reader.read_path(&args.file)?)
}

fn emit<I>(args: &Args, keys: I) -> Result<(), Box<dyn std::error::Error>>
where
    I: Iterator<Item = csv_superkey::Result<KeyCandidate>>,
{
    if args.count {
        let mut total = 0usize;
        for key in keys {
            key?;
            total += 1;
        }
        println!("{total}");
        return Ok(());
    }

    let stdout = io::stdout();
    match args.format {
        OutputFormat::Text => {
            let mut out = stdout.lock();
            for key in keys {
                writeln!(out, "{}", key?)?;
            }
        }
        OutputFormat::Json => {
            let mut out = stdout.lock();
            for key in keys {
                writeln!(out, "{}", serde_json::to_string(key?.columns())?)?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(stdout.lock());
            for key in keys {
                writer.write_record(key?.columns())?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}
