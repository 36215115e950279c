use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use mddocs_pages::{MarkdownPreset, PageOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the mddocs documentation generator.
///
/// Fields are typically loaded from a TOML or JSON config file, and can be
/// adjusted with `--config KEY=VALUE` overrides or CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Metadata files or directories to document.
  pub inputs: Vec<PathBuf>,

  /// Output directory for generated markdown.
  pub output_dir: PathBuf,

  /// Remove the contents of the output directory before writing.
  pub clean_output_dir: bool,

  /// Fail the run if any documentation warning was recorded.
  pub fail_on_warnings: bool,

  /// Settings for API reference pages.
  pub apireference: PageConfig,

  /// Settings for command-line help pages.
  pub commandlinehelp: PageConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      inputs:           Vec::new(),
      output_dir:       PathBuf::from("docs"),
      clean_output_dir: false,
      fail_on_warnings: false,
      apireference:     PageConfig::default(),
      commandlinehelp:  PageConfig::default(),
    }
  }
}

/// Page settings shared by both generators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
  /// Append a "generated by" notice to every page.
  pub include_auto_generated_notice: bool,

  /// Show the assembly or application version.
  pub include_version: bool,

  /// Markdown flavour of the output.
  pub markdown_preset: MarkdownPreset,
}

impl PageConfig {
  #[must_use]
  pub const fn page_options(&self) -> PageOptions {
    PageOptions {
      include_auto_generated_notice: self.include_auto_generated_notice,
      include_version:               self.include_version,
    }
  }

  fn apply_override(
    &mut self,
    section: &str,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "include_auto_generated_notice" => {
        self.include_auto_generated_notice =
          parse_bool(&format!("{section}.{key}"), value)?;
      },
      "include_version" => {
        self.include_version = parse_bool(&format!("{section}.{key}"), value)?;
      },
      "markdown_preset" => {
        self.markdown_preset = value.parse().map_err(|e: String| {
          ConfigError::Config(format!(
            "Invalid value for '{section}.{key}': '{value}' - {e}"
          ))
        })?;
      },
      _ => return Err(unknown_key(&format!("{section}.{key}"))),
    }
    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn unknown_key(key: &str) -> ConfigError {
  ConfigError::Config(format!(
    "Unknown configuration key: '{key}'. See documentation for supported \
     keys."
  ))
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content)
              .map_err(ConfigError::from)
              .map_err(|e| {
                ConfigError::Config(format!(
                  "Failed to parse JSON config from {}: {}",
                  path.display(),
                  e
                ))
              })
          },
          "toml" => {
            toml::from_str(&content)
              .map_err(ConfigError::from)
              .map_err(|e| {
                ConfigError::Config(format!(
                  "Failed to parse TOML config from {}: {}",
                  path.display(),
                  e
                ))
              })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files (merged in order) or a
  /// discovered config file, then apply `KEY=VALUE` overrides.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      // Config file(s) explicitly specified via CLI
      let mut merged_config = Self::from_file(first).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load config from {}: {}",
          first.display(),
          e
        ))
      })?;

      for config_path in rest {
        let additional_config = Self::from_file(config_path).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to load config from {}: {}",
            config_path.display(),
            e
          ))
        })?;
        merged_config.merge(additional_config);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Nested keys use a dot: `apireference.markdown_preset=mkdocs`.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// `inputs` takes a comma-separated list that replaces the configured
  /// inputs; an empty value clears them.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparseable values.
  pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
    match key.split_once('.') {
      Some(("apireference", rest)) => {
        self.apireference.apply_override("apireference", rest, value)
      },
      Some(("commandlinehelp", rest)) => {
        self
          .commandlinehelp
          .apply_override("commandlinehelp", rest, value)
      },
      Some(_) => Err(unknown_key(key)),
      None => {
        match key {
          "inputs" => {
            self.inputs = value
              .split(',')
              .map(str::trim)
              .filter(|s| !s.is_empty())
              .map(PathBuf::from)
              .collect();
          },
          "output_dir" => self.output_dir = PathBuf::from(value),
          "clean_output_dir" => {
            self.clean_output_dir = parse_bool(key, value)?;
          },
          "fail_on_warnings" => {
            self.fail_on_warnings = parse_bool(key, value)?;
          },
          _ => return Err(unknown_key(key)),
        }
        Ok(())
      },
    }
  }

  /// Merge another config into this one, with the other config's values
  /// taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Vec<T>`] fields: Other's vec is appended to this config's vec
  /// - Plain fields and page sections: Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    self.inputs.extend(other.inputs);
    self.output_dir = other.output_dir;
    self.clean_output_dir = other.clean_output_dir;
    self.fail_on_warnings = other.fail_on_warnings;
    self.apireference = other.apireference;
    self.commandlinehelp = other.commandlinehelp;
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        Self::find_config_file_in(&current_dir).or_else(|| {
          let xdg_config_home = std::env::var("XDG_CONFIG_HOME").ok()?;
          let config_path = PathBuf::from(xdg_config_home).join("mddocs.toml");
          config_path.exists().then_some(config_path)
        })
      })
      .clone()
  }

  /// Look for a config file directly inside `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    ["mddocs.toml", "mddocs.json", ".mddocs.toml"]
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.exists())
  }

  /// Validate the inputs and output directory.
  ///
  /// # Errors
  ///
  /// Returns an error listing every missing input and an output path that
  /// is not a directory.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if self.inputs.is_empty() {
      errors.push("No inputs given".to_string());
    }

    for (index, input) in self.inputs.iter().enumerate() {
      if !input.exists() {
        errors.push(format!(
          "Input {} does not exist: {}",
          index + 1,
          input.display()
        ));
      }
    }

    if self.output_dir.exists() && !self.output_dir.is_dir() {
      errors.push(format!(
        "Output path is not a directory: {}",
        self.output_dir.display()
      ));
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the template cannot be retrieved or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_config_merge_vec_fields_append() {
    let mut base = Config::default();
    base.inputs = vec![PathBuf::from("a.json")];

    let mut override_config = Config::default();
    override_config.inputs = vec![PathBuf::from("b.json")];
    override_config.fail_on_warnings = true;
    override_config.apireference.markdown_preset = MarkdownPreset::MkDocs;

    base.merge(override_config);

    assert_eq!(base.inputs, vec![
      PathBuf::from("a.json"),
      PathBuf::from("b.json")
    ]);
    assert!(base.fail_on_warnings);
    assert_eq!(base.apireference.markdown_preset, MarkdownPreset::MkDocs);
  }

  #[test]
  fn test_apply_overrides_nested_sections() {
    let mut config = Config::default();

    config
      .apply_overrides(&[
        "apireference.markdown_preset=mkdocs".to_string(),
        "commandlinehelp.include_version=yes".to_string(),
        "output_dir=/tmp/output".to_string(),
        "inputs=a.json, b".to_string(),
      ])
      .unwrap();

    assert_eq!(config.apireference.markdown_preset, MarkdownPreset::MkDocs);
    assert!(config.commandlinehelp.include_version);
    assert_eq!(config.output_dir, PathBuf::from("/tmp/output"));
    assert_eq!(config.inputs, vec![PathBuf::from("a.json"), PathBuf::from("b")]);
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();
    let result = config.apply_overrides(&["no_equals_sign".to_string()]);
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();
    for key in ["unknown_key=value", "apireference.title=x", "other.key=1"] {
      let result = config.apply_overrides(&[key.to_string()]);
      assert!(
        result
          .unwrap_err()
          .to_string()
          .contains("Unknown configuration key")
      );
    }
  }

  #[test]
  fn test_apply_overrides_invalid_values() {
    let mut config = Config::default();

    let result = config.apply_override("fail_on_warnings", "maybe");
    assert!(result.unwrap_err().to_string().contains("Invalid boolean"));

    let result = config.apply_override("apireference.markdown_preset", "html");
    assert!(result.unwrap_err().to_string().contains("Invalid value"));
  }

  #[test]
  fn test_page_options_follow_section() {
    let mut config = Config::default();
    config.apply_override("apireference.include_auto_generated_notice", "1").unwrap();
    let options = config.apireference.page_options();
    assert!(options.include_auto_generated_notice);
    assert!(!options.include_version);
  }
}
