use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

const BIN_NAME: &str = "mddocs";

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the mddocs CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Only generate shell completions.
    #[arg(long, conflicts_with = "manpage_only")]
    completions_only: bool,

    /// Only generate manpages.
    #[arg(long, conflicts_with = "completions_only")]
    manpage_only: bool,
  },
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();

  match xtask.command {
    Commands::Dist {
      output_dir,
      completions_only,
      manpage_only,
    } => {
      if !manpage_only {
        generate_completions(&output_dir)?;
      }
      if !completions_only {
        generate_manpages(&output_dir)?;
      }
    },
  }

  Ok(())
}

/// Completions for every shell clap knows about.
fn generate_completions(output_dir: &Path) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir).with_context(|| {
    format!("Failed to create {}", completions_dir.display())
  })?;

  let mut cmd = mddocs::cli::Cli::command();
  for &shell in Shell::value_variants() {
    generate_to(shell, &mut cmd, BIN_NAME, &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
  }
  eprintln!(
    "Shell completions generated in {}",
    completions_dir.display()
  );
  Ok(())
}

/// `mddocs.1` plus one page per subcommand, e.g. `mddocs-apireference.1`.
fn generate_manpages(output_dir: &Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)
    .with_context(|| format!("Failed to create {}", man_dir.display()))?;

  let cmd = mddocs::cli::Cli::command();
  render_manpage(cmd.clone(), &man_dir.join(format!("{BIN_NAME}.1")))?;

  for sub in cmd.get_subcommands() {
    let name = format!("{BIN_NAME}-{}", sub.get_name());
    let page = sub.clone().name(name.clone());
    render_manpage(page, &man_dir.join(format!("{name}.1")))?;
  }

  eprintln!("Manpages generated in {}", man_dir.display());
  Ok(())
}

fn render_manpage(cmd: clap::Command, path: &Path) -> Result<()> {
  let mut file = fs::File::create(path).with_context(|| {
    format!("Failed to create manpage file at {}", path.display())
  })?;
  Man::new(cmd)
    .render(&mut file)
    .with_context(|| format!("Failed to render {}", path.display()))
}
