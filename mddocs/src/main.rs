use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use mddocs::{
  cli::{Cli, Commands},
  completion,
  generate::{self, Target},
};
use mddocs_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let (target, args) = match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!("Failed to generate configuration file: {}", output.display())
      })?;

      info!(
        "Configuration file created successfully. Edit it to customize your \
         documentation generation."
      );
      return Ok(());
    },

    Commands::Completions { shell, output_dir } => {
      return completion::generate_completions(*shell, output_dir.as_deref());
    },

    Commands::ApiReference(args) => (Target::ApiReference, args),
    Commands::CommandLineHelp(args) => (Target::CommandLineHelp, args),
  };

  let mut config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  generate::apply_args(&mut config, args);
  if cli.fail_on_warnings {
    config.fail_on_warnings = true;
  }
  config.validate_paths()?;

  generate::run(target, &config)?;
  Ok(())
}
