//! jotquote CLI
//!
//! Command-line interface for managing a quote file, plus the quote of the
//! day web server.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use jotquote_core::{Config, Criteria, QuoteStore};

mod commands;
mod output;
mod web;

use output::{ListStyle, Output, OutputFormat};

/// Environment variable holding the log filter
const LOG_ENV: &str = "JOTQUOTE_LOG";

#[derive(Parser)]
#[command(name = "jotquote")]
#[command(about = "Manage a collection of quotes kept in a text file")]
#[command(
    long_about = "Manage a collection of quotes contained in a text file; you can add, view, \
                  and tag quotes.  The command can also start a simple web server to display \
                  a quote of the day.  Without a subcommand a random quote is shown."
)]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the quote file (defaults to quote_file in the settings file)
    #[arg(long, global = true, value_name = "PATH")]
    quotefile: Option<PathBuf>,

    /// Path to the settings file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new quote to the quote file
    Add {
        /// Use the pipe-delimited quote file format:
        /// "<quote>|<author>|[<publication>]|[<tag1>,<tag2>,...]"
        #[arg(short, long)]
        extended: bool,
        /// A quote as "<quote> - <author> [(publication)]", or "-" to read
        /// one quote per line from stdin
        quote: String,
    },
    /// List the quotes matching some criteria
    List {
        /// Only quotes with all of the given comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
        /// Only quotes with the keyword in quote, author, publication or tags
        #[arg(short, long)]
        keyword: Option<String>,
        /// Only the quote on the given line number
        #[arg(short, long)]
        number: Option<String>,
        /// Only the quote with the given hash
        #[arg(short = 's', long)]
        hash: Option<String>,
        /// Long form output including publication, tags and hash
        #[arg(short, long)]
        long: bool,
        /// Output in the pipe-delimited quote file format
        #[arg(short, long)]
        extended: bool,
    },
    /// Show all tags used in the quote file
    Showalltags,
    /// Replace the tags of one quote
    Settags {
        /// The quote at the given position in the file
        #[arg(short, long)]
        number: Option<String>,
        /// The quote with the given hash
        #[arg(short = 's', long)]
        hash: Option<String>,
        /// Comma-separated list of new tags
        newtags: String,
    },
    /// Show a random quote
    Random {
        /// Only pick from quotes with all of the given tags
        #[arg(short, long)]
        tags: Option<String>,
        /// Only pick from quotes containing the keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Show the quote of the day, which stays the same for the whole day
    Today,
    /// Show the version and the location of the settings and quote files
    Info,
    /// Start a web server that displays the quote of the day
    Webserver,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("jotquote_core=debug,jotquote=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let settings_path = cli.config.clone().unwrap_or_else(Config::config_file_path);
    let mut config = Config::load_or_bootstrap(&settings_path)
        .with_context(|| format!("Failed to load settings from {:?}", settings_path))?;

    let from_settings = cli.quotefile.is_none();
    if let Some(quotefile) = cli.quotefile {
        config.quote_file = quotefile;
    }
    debug!("Using quote file {:?}", config.quote_file);

    // Everything but webserver and info needs the configured file to exist
    let needs_file = !matches!(cli.command, Some(Commands::Webserver | Commands::Info));
    if from_settings && needs_file && !config.quote_file.exists() {
        anyhow::bail!(
            "the quote file '{}' does not exist.  Either create an empty file with this name, \
             or edit the settings file {} and change the quote_file property to refer to a \
             quote file that exists.",
            config.quote_file.display(),
            settings_path.display()
        );
    }

    let output = Output::new(OutputFormat::from_flags(cli.json));
    let store = QuoteStore::open(config.clone());

    match cli.command {
        None => commands::random::random(&store, &Criteria::default(), &output),
        Some(Commands::Add { extended, quote }) => {
            commands::add::add(&store, &quote, extended, &output)
        }
        Some(Commands::List {
            tags,
            keyword,
            number,
            hash,
            long,
            extended,
        }) => {
            let style = ListStyle::from_flags(long, extended)?;
            let criteria = commands::criteria(
                tags.as_deref(),
                keyword.as_deref(),
                number.as_deref(),
                hash.as_deref(),
            )?;
            commands::list::list(&store, &criteria, style, &output)
        }
        Some(Commands::Showalltags) => commands::tags::show_all(&store, &output),
        Some(Commands::Settags {
            number,
            hash,
            newtags,
        }) => {
            let number = number.as_deref().map(commands::parse_number).transpose()?;
            commands::tags::set(&store, number, hash.as_deref(), &newtags, &output)
        }
        Some(Commands::Random { tags, keyword }) => {
            let criteria = commands::criteria(tags.as_deref(), keyword.as_deref(), None, None)?;
            commands::random::random(&store, &criteria, &output)
        }
        Some(Commands::Today) => commands::random::today(&store, &output),
        Some(Commands::Info) => commands::info::show(&store, &settings_path, &output),
        Some(Commands::Webserver) => commands::webserver::run(&config).await,
    }
}
