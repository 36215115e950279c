use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Command line interface for mddocs
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "mddocs: markdown reference documentation for .NET"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,

  /// Fail if any documentation warning was recorded
  #[arg(long, global = true)]
  pub fail_on_warnings: bool,
}

/// Arguments shared by the generating subcommands.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct GenerateArgs {
  /// Metadata file or directory (can be specified multiple times). Replaces
  /// the inputs from the configuration file.
  #[arg(short, long = "input", action = clap::ArgAction::Append)]
  pub inputs: Vec<PathBuf>,

  /// Output directory for generated markdown.
  #[arg(short, long)]
  pub output_dir: Option<PathBuf>,

  /// Remove the contents of the output directory before writing.
  #[arg(long)]
  pub clean: bool,
}

/// All supported subcommands for the mddocs CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Generate API reference pages from assembly metadata.
  #[command(name = "apireference")]
  ApiReference(GenerateArgs),

  /// Generate command-line help pages from application metadata.
  #[command(name = "commandlinehelp")]
  CommandLineHelp(GenerateArgs),

  /// Initialize a new mddocs configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mddocs.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Generate shell completions.
  Completions {
    /// Shell to generate completions for.
    shell: Shell,

    /// Directory to write the completion file to. Writes to stdout if not
    /// given.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
