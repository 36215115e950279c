use std::{fs, io, path::Path};

use clap::CommandFactory;
use clap_complete::{Shell, generate, generate_to};
use color_eyre::eyre::{Context, Result};

use crate::cli::Cli;

/// Write shell completions for the mddocs CLI, either into `output_dir` or
/// to stdout.
///
/// # Errors
///
/// Returns an error if the output directory or file cannot be written.
pub fn generate_completions(shell: Shell, output_dir: Option<&Path>) -> Result<()> {
  let mut cmd = Cli::command();

  match output_dir {
    Some(dir) => {
      fs::create_dir_all(dir).wrap_err_with(|| {
        format!("Failed to create directory: {}", dir.display())
      })?;
      let path = generate_to(shell, &mut cmd, "mddocs", dir).wrap_err_with(|| {
        format!("Failed to write {shell} completions to {}", dir.display())
      })?;
      log::info!("Shell completions generated in {}", path.display());
    },
    None => generate(shell, &mut cmd, "mddocs", &mut io::stdout()),
  }

  Ok(())
}
