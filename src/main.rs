// Command-line entry point for avi-steg.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;

mod cli;

use cli::output::Status;

/// Hide short text messages in the low bits of AVI files
#[derive(Parser, Debug)]
#[command(name = "avi-steg")]
#[command(about = "Hide and extract text messages in AVI files", long_about = None)]
#[command(version)]
pub struct Config {
    /// Quiet mode (suppress status messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging, RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show stream headers and available space
    Info {
        /// AVI file path
        #[arg(value_name = "AVI")]
        file: PathBuf,
    },

    /// Hide a message in an AVI file
    Hide {
        /// AVI file path
        #[arg(value_name = "AVI")]
        file: PathBuf,

        #[command(flatten)]
        message: MessageSource,

        /// Write the result here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        selection: StreamSelection,
    },

    /// Extract a hidden message from an AVI file
    Extract {
        /// AVI file path
        #[arg(value_name = "AVI")]
        file: PathBuf,

        /// Write the message to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        selection: StreamSelection,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct MessageSource {
    /// Message text
    #[arg(short, long)]
    pub message: Option<String>,

    /// Read the message from a file
    #[arg(long, value_name = "PATH")]
    pub message_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StreamSelection {
    /// Streams to use, in order
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["junk", "video", "audio"]
    )]
    pub streams: Vec<StreamKind>,

    /// Allow writing into (and reading from) compressed streams
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StreamKind {
    Junk,
    Video,
    Audio,
}

fn main() {
    let config = Config::parse();

    let default_filter = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let status = Status::new(config.quiet);

    let result = match &config.command {
        Commands::Info { file } => cli::commands::info(file, &status),
        Commands::Hide {
            file,
            message,
            output,
            selection,
        } => cli::commands::hide(file, message, output.as_deref(), selection, &status),
        Commands::Extract {
            file,
            output,
            selection,
        } => cli::commands::extract(file, output.as_deref(), selection, &status),
    };

    if let Err(err) = result {
        status.failure(&format!("{:#}", err));
        process::exit(1);
    }
}
