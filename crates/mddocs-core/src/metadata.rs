//! Raw metadata records.
//!
//! These mirror what the metadata reader hands over: an ordered list of
//! types and members (or commands and options) together with their parsed
//! documentation trees. Records are deserialized from JSON snapshots; the
//! model never mutates them.

use std::{
  fs,
  path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use walkdir::WalkDir;

use crate::{
  docs::DocElement,
  error::{CoreError, CoreResult},
};

/// A single metadata input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataDocument {
  /// Library metadata: types, members and their documentation.
  Assembly(AssemblyRecord),
  /// Explicit command-line application metadata.
  Application(ApplicationRecord),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyRecord {
  pub name:       String,
  #[serde(default)]
  pub version:    Option<String>,
  #[serde(default)]
  pub attributes: Vec<AttributeRecord>,
  #[serde(default)]
  pub types:      Vec<TypeRecord>,
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
  #[default]
  Class,
  Struct,
  Interface,
  Enum,
  Delegate,
}

impl TypeKind {
  /// Human readable kind, used in headings.
  #[must_use]
  pub const fn label(self) -> &'static str {
    match self {
      Self::Class => "Class",
      Self::Struct => "Struct",
      Self::Interface => "Interface",
      Self::Enum => "Enum",
      Self::Delegate => "Delegate",
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRecord {
  pub namespace:       String,
  pub name:            String,
  pub kind:            TypeKind,
  pub is_abstract:     bool,
  /// Full name of the base type, if any.
  pub base_type:       Option<String>,
  /// Full names of implemented interfaces.
  pub interfaces:      Vec<String>,
  pub type_parameters: Vec<String>,
  /// Source-like declaration, e.g. `public sealed class Foo : IBar`.
  pub definition:      Option<String>,
  pub attributes:      Vec<AttributeRecord>,
  pub docs:            Option<DocElement>,
  pub members:         Vec<MemberRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
  Field,
  Property,
  Indexer,
  Event,
  Constructor,
  Method,
  Operator,
}

impl MemberKind {
  /// Whether members of this kind are grouped into overload groups.
  #[must_use]
  pub const fn is_overloadable(self) -> bool {
    matches!(
      self,
      Self::Indexer | Self::Constructor | Self::Method | Self::Operator
    )
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
  pub kind:            MemberKind,
  pub name:            String,
  #[serde(default)]
  pub parameters:      Vec<ParameterRecord>,
  #[serde(default)]
  pub type_parameters: Vec<String>,
  /// Return type for methods and operators, value type for properties,
  /// fields, events and indexers.
  #[serde(default, alias = "return_type", alias = "value_type")]
  pub type_name:       Option<String>,
  #[serde(default)]
  pub definition:      Option<String>,
  #[serde(default)]
  pub attributes:      Vec<AttributeRecord>,
  #[serde(default)]
  pub docs:            Option<DocElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
  pub name:      String,
  #[serde(rename = "type")]
  pub type_name: String,
}

/// A custom attribute applied to a type or member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeRecord {
  /// Full name of the attribute type.
  #[serde(rename = "type")]
  pub type_name:             String,
  #[serde(default)]
  pub constructor_arguments: Vec<AttributeArgument>,
  #[serde(default)]
  pub named_arguments:       IndexMap<String, Value>,
}

impl AttributeRecord {
  /// Look up a named argument.
  #[must_use]
  pub fn named(&self, name: &str) -> Option<&Value> {
    self.named_arguments.get(name)
  }

  /// Named boolean argument, `false` when absent or not a boolean.
  #[must_use]
  pub fn named_bool(&self, name: &str) -> bool {
    self.named(name).and_then(Value::as_bool).unwrap_or(false)
  }

  /// Named string argument; empty strings count as absent.
  #[must_use]
  pub fn named_str(&self, name: &str) -> Option<String> {
    self
      .named(name)
      .and_then(Value::as_str)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeArgument {
  #[serde(rename = "type")]
  pub type_name: String,
  pub value:     Value,
}

/// Explicit command-line application metadata.
///
/// An application without commands is a single-command application; its
/// options and values are declared at the application level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationRecord {
  pub name:     String,
  pub version:  Option<String>,
  pub commands: Vec<CommandRecord>,
  pub options:  Vec<OptionRecord>,
  pub values:   Vec<ValueRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandRecord {
  pub name:      String,
  pub help_text: Option<String>,
  pub hidden:    bool,
  pub options:   Vec<OptionRecord>,
  pub values:    Vec<ValueRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionRecord {
  pub name:       Option<String>,
  pub short_name: Option<char>,
  pub required:   bool,
  pub hidden:     bool,
  pub default:    Option<Value>,
  pub help_text:  Option<String>,
  pub meta_value: Option<String>,
  /// Declared value type; a boolean type makes the option a switch.
  pub value_type: Option<String>,
}

impl OptionRecord {
  /// Switch options take no value on the command line.
  #[must_use]
  pub fn is_switch(&self) -> bool {
    matches!(
      self.value_type.as_deref(),
      Some("System.Boolean" | "bool" | "boolean")
    )
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueRecord {
  pub index:      u32,
  pub name:       Option<String>,
  pub required:   bool,
  pub hidden:     bool,
  pub default:    Option<Value>,
  pub help_text:  Option<String>,
  pub meta_value: Option<String>,
}

/// Render a default value the way it is shown in documentation: strings
/// verbatim, everything else in its JSON form.
#[must_use]
pub fn display_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Read a single metadata file.
///
/// # Errors
///
/// Returns [`CoreError::ReadFile`] if the file cannot be read and
/// [`CoreError::ParseMetadata`] if it is not a valid metadata document.
pub fn load_file(path: impl AsRef<Path>) -> CoreResult<MetadataDocument> {
  let path = path.as_ref();
  let content = fs::read_to_string(path).map_err(|source| {
    CoreError::ReadFile {
      path: path.to_path_buf(),
      source,
    }
  })?;

  serde_json::from_str(&content).map_err(|source| {
    CoreError::ParseMetadata {
      path: path.to_path_buf(),
      source,
    }
  })
}

/// Read every metadata input. Directories are walked recursively for
/// `.json` files, which are visited in sorted order so that the resulting
/// model does not depend on directory iteration order.
///
/// # Errors
///
/// Returns the first read or parse error encountered.
pub fn load_inputs(
  inputs: &[PathBuf],
) -> CoreResult<Vec<(PathBuf, MetadataDocument)>> {
  let mut documents = Vec::new();

  for input in inputs {
    if input.is_dir() {
      let mut files = Vec::new();
      for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry.map_err(|e| {
          CoreError::ReadFile {
            path:   input.clone(),
            source: e.into(),
          }
        })?;
        if entry.file_type().is_file()
          && entry.path().extension().and_then(|e| e.to_str()) == Some("json")
        {
          files.push(entry.into_path());
        }
      }
      files.sort();

      for file in files {
        log::debug!("Reading metadata from {}", file.display());
        let document = load_file(&file)?;
        documents.push((file, document));
      }
    } else {
      log::debug!("Reading metadata from {}", input.display());
      documents.push((input.clone(), load_file(input)?));
    }
  }

  Ok(documents)
}
