use clap::{Parser, Subcommand, ValueEnum};
use flexi_logger::{Logger, LoggerHandle};
use quire::error::{QuireError, Result};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "quire", bin_name = "quire", version = get_version())]
#[command(about = "Paged notebooks in a single storage slot", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notebooks (default)
    #[command(alias = "ls")]
    List,

    /// Create a notebook and select it
    New {
        /// Notebook name (multiple words are joined)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Select a notebook by list position, id or name
    Select { notebook: String },

    /// Show a page of the current notebook
    View {
        /// Page number, clamped to 1-100
        #[arg(default_value = "1", allow_hyphen_values = true)]
        page: String,
    },

    /// Write fields of a page; omitted fields keep their stored value
    Save {
        #[arg(allow_hyphen_values = true)]
        page: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        title: Option<String>,

        /// Page content, or "-" to read it from stdin
        #[arg(long)]
        content: Option<String>,
    },

    /// Reset one page to blank
    Clear {
        #[arg(allow_hyphen_values = true)]
        page: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Reset every page of the current notebook
    Erase {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export the current notebook as CSV or the whole store as JSON
    Export {
        #[arg(value_enum)]
        format: ExportKind,

        /// Output path; "-" writes to stdout. Defaults to a generated filename.
        #[arg(long, short = 'o')]
        output: Option<String>,
    },

    /// Replace all notebooks with a JSON export
    Import { file: String },

    /// Show how much storage the slot uses
    Size,

    /// Get or set configuration values
    Config {
        /// Configuration key (slot-key, log-level, date-format)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Csv,
    Json,
}

/// Start stderr logging. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .map_err(|err| QuireError::Api(format!("invalid log level `{}`: {}", level, err)))?
        .log_to_stderr()
        .start()
        .map_err(|err| QuireError::Api(format!("failed to start logger: {}", err)))
}
