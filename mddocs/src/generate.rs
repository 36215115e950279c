use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result, bail};
use log::info;
use mddocs_config::{Config, PageConfig};
use mddocs_core::{
  ApplicationRecord,
  AssemblyRecord,
  Diagnostics,
  MetadataDocument,
  Model,
  loader,
  metadata,
};
use mddocs_pages::{
  MarkdownWriter,
  Page,
  api_reference_pages,
  command_line_pages,
  output,
};

use crate::cli::GenerateArgs;

/// Which set of pages to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  ApiReference,
  CommandLineHelp,
}

impl Target {
  const fn page_config(self, config: &Config) -> &PageConfig {
    match self {
      Self::ApiReference => &config.apireference,
      Self::CommandLineHelp => &config.commandlinehelp,
    }
  }
}

/// Apply subcommand arguments on top of the loaded configuration.
pub fn apply_args(config: &mut Config, args: &GenerateArgs) {
  if !args.inputs.is_empty() {
    config.inputs.clone_from(&args.inputs);
  }
  if let Some(output_dir) = &args.output_dir {
    config.output_dir.clone_from(output_dir);
  }
  if args.clean {
    config.clean_output_dir = true;
  }
}

/// Load the inputs, build the model and write its pages.
///
/// Returns the paths of the written files.
///
/// # Errors
///
/// Returns an error if the inputs cannot be read or are inconsistent, if
/// the output cannot be written, or if warnings were recorded while
/// `fail_on_warnings` is set.
pub fn run(target: Target, config: &Config) -> Result<Vec<PathBuf>> {
  info!("Starting documentation generation...");

  let documents = metadata::load_inputs(&config.inputs)
    .wrap_err("Failed to load metadata inputs")?;

  let mut diagnostics = Diagnostics::new();
  let page_config = target.page_config(config);
  let options = page_config.page_options();

  let pages = match target {
    Target::ApiReference => {
      let model = api_model(documents, &mut diagnostics)?;
      api_reference_pages(&model, options, &mut diagnostics)
    },
    Target::CommandLineHelp => {
      let model = application_model(documents, &mut diagnostics)?;
      command_line_pages(&model, options, &mut diagnostics)
    },
  };

  let written = write(&pages, &config.output_dir, config, page_config)?;

  diagnostics.log_summary();
  if config.fail_on_warnings && !diagnostics.is_empty() {
    bail!(
      "{} warning(s) recorded and fail_on_warnings is set",
      diagnostics.len()
    );
  }

  info!(
    "Documentation generated successfully in {}",
    config.output_dir.display()
  );
  Ok(written)
}

fn api_model(
  documents: Vec<(PathBuf, MetadataDocument)>,
  diagnostics: &mut Diagnostics,
) -> Result<Model> {
  let mut assemblies: Vec<AssemblyRecord> = Vec::with_capacity(documents.len());
  for (path, document) in documents {
    match document {
      MetadataDocument::Assembly(assembly) => assemblies.push(assembly),
      MetadataDocument::Application(_) => {
        bail!(
          "{} contains application metadata, which has no API reference",
          path.display()
        );
      },
    }
  }
  if assemblies.is_empty() {
    bail!("No assembly metadata found in the inputs");
  }

  info!("Building API reference for {} assembly(ies)", assemblies.len());
  Model::from_assemblies(&assemblies, diagnostics)
    .wrap_err("Failed to build the API reference model")
}

fn application_model(
  mut documents: Vec<(PathBuf, MetadataDocument)>,
  diagnostics: &mut Diagnostics,
) -> Result<Model> {
  if documents.len() != 1 {
    bail!(
      "Command-line help takes exactly one metadata input, found {}",
      documents.len()
    );
  }
  let Some((path, document)) = documents.pop() else {
    bail!("No metadata input found");
  };

  let application: ApplicationRecord = match document {
    MetadataDocument::Application(application) => application,
    MetadataDocument::Assembly(assembly) => {
      loader::load_application(&assembly, diagnostics).wrap_err_with(|| {
        format!("Failed to read application metadata from {}", path.display())
      })?
    },
  };

  info!("Building command-line help for {}", application.name);
  Model::from_application(&application, diagnostics)
    .wrap_err("Failed to build the command-line help model")
}

fn write(
  pages: &[Page],
  output_dir: &Path,
  config: &Config,
  page_config: &PageConfig,
) -> Result<Vec<PathBuf>> {
  if config.clean_output_dir {
    output::clean_output_dir(output_dir).wrap_err_with(|| {
      format!("Failed to clean output directory: {}", output_dir.display())
    })?;
  }

  let writer = MarkdownWriter::new(page_config.markdown_preset);
  output::write_pages(pages, output_dir, &writer).wrap_err_with(|| {
    format!("Failed to write pages to {}", output_dir.display())
  })
}
