use std::path::PathBuf;

use thiserror::Error;

use crate::identity::IdentityKey;

/// Fatal errors raised while building the documentation model.
///
/// Any of these aborts the whole run. Recoverable conditions are recorded as
/// [`crate::Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum CoreError {
  /// A metadata file could not be read from disk.
  #[error("failed to read metadata file `{path}`: {source}")]
  ReadFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A metadata file is not valid JSON or does not match the record layout.
  #[error("failed to parse metadata file `{path}`: {source}")]
  ParseMetadata {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Two raw records resolve to the same identity key.
  #[error("duplicate identity `{key}`: the input declares `{name}` twice")]
  DuplicateIdentity { key: IdentityKey, name: String },

  /// Two output units would be written to the same locator.
  #[error(
    "locator collision at `{locator}`: `{existing}` and `{incoming}` would \
     be written to the same file"
  )]
  LocatorCollision {
    locator:  String,
    existing: IdentityKey,
    incoming: IdentityKey,
  },

  /// The input is structurally unusable.
  #[error("invalid metadata: {0}")]
  InvalidMetadata(String),
}

/// Result type for model operations.
pub type CoreResult<T> = Result<T, CoreError>;
