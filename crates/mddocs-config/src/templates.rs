use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, with a comment for every field.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# mddocs Configuration File

# Metadata files or directories to document. Directories are searched
# recursively for .json files.
inputs = ["metadata"]

# Output directory for generated markdown
output_dir = "docs"

# Remove everything inside the output directory before writing
clean_output_dir = false

# Treat documentation warnings (unresolved references, stale parameter
# docs, ...) as errors
fail_on_warnings = false

# API reference pages
[apireference]
# Append a "generated by" notice to every page
include_auto_generated_notice = false

# Show the assembly version on type and member pages
include_version = false

# Markdown flavour: "default" or "mkdocs"
markdown_preset = "default"

# Command-line help pages
[commandlinehelp]
include_auto_generated_notice = false
include_version = false
markdown_preset = "default"
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "inputs": ["metadata"],
  "output_dir": "docs",
  "clean_output_dir": false,
  "fail_on_warnings": false,
  "apireference": {
    "include_auto_generated_notice": false,
    "include_version": false,
    "markdown_preset": "default"
  },
  "commandlinehelp": {
    "include_auto_generated_notice": false,
    "include_version": false,
    "markdown_preset": "default"
  }
}
"#;

/// Get the configuration template for the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
