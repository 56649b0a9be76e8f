use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ryzen-set",
    about = "Switch AMD Ryzen power/thermal profiles through libryzenadj",
    version,
    disable_version_flag = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print program version
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Output as JSON instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    /// Settings file to use instead of /etc and ~/.config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log native calls and show live values
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List profile categories, or the profiles in a category
    List {
        /// Category to print profiles from ("categories" lists categories)
        #[arg(value_name = "CATEGORY")]
        category: Option<String>,
    },

    /// Set specified profile
    Set {
        /// Profile name from the config
        #[arg(value_name = "PROFILE")]
        profile: Option<String>,
    },

    /// Get current profile
    Get,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout. Returns false if no shell could be determined.
pub fn print_completions(shell: Option<Shell>) -> bool {
    let Some(shell) = shell.or_else(Shell::from_env) else {
        eprintln!(
            "Could not detect shell. Specify one: ryzen-set completions bash|zsh|fish|elvish|powershell"
        );
        return false;
    };
    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "ryzen-set",
        &mut std::io::stdout(),
    );
    true
}

pub fn version_string() -> String {
    format!("Version: {}", env!("CARGO_PKG_VERSION"))
}

pub fn print_help() -> std::io::Result<()> {
    Cli::command().print_help()
}
