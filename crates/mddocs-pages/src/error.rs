use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for writing pages
#[derive(Debug, Error)]
pub enum PageError {
  #[error("Failed to create directory {path}: {source}")]
  CreateDir {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to write page {path}: {source}")]
  WriteFile {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to clean output directory {path}: {source}")]
  CleanDir {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

pub type PageResult<T> = Result<T, PageError>;
