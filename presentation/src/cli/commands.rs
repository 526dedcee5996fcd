//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use forge_domain::{ContentId, OutputFormat};
use std::path::PathBuf;

/// Output format flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Human-readable console output
    Text,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for content-forge
#[derive(Parser, Debug)]
#[command(name = "content-forge")]
#[command(author, version, about = "Generate content from a prompt and manage the history")]
#[command(long_about = r#"
content-forge sends a prompt to a content-generation webhook, turns whatever
comes back (JSON, XML or plain text) into text, and keeps a history of what
was generated.

Configuration files are loaded from (in priority order):
1. FORGE_* environment variables (e.g. FORGE_WEBHOOK__URL)
2. --config <path>     Explicit config file
3. ./forge.toml        Project-level config
4. ~/.config/content-forge/config.toml   Global config

Example:
  content-forge login my-user-id
  content-forge generate "Write a haiku about autumn"
  content-forge history
  content-forge watch
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress the progress spinner
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate content for a prompt and store it
    Generate {
        /// The prompt (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// List your generated content, newest first
    History,

    /// Replace the generated content of a history entry
    Edit {
        /// Entry id
        id: ContentId,

        /// New content
        content: String,
    },

    /// Delete a history entry
    Delete {
        /// Entry id
        id: ContentId,
    },

    /// Show the history and refresh it whenever it changes (Ctrl-C to stop)
    Watch {
        /// How often to look for changes made by other processes
        #[arg(long, value_name = "SECS", default_value_t = 2)]
        poll_secs: u64,
    },

    /// Store a session for the given user id
    Login {
        /// User id issued by the identity provider
        user_id: String,
    },

    /// Remove the stored session
    Logout,

    /// Show the signed-in user
    Whoami,
}

impl Cli {
    /// Output format chosen on the command line, if any
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.map(Into::into)
    }
}
