//! Writing rendered pages to disk.

use std::{
  fs,
  path::{Path, PathBuf},
};

use crate::{
  document::Page,
  error::{PageError, PageResult},
  markdown::MarkdownWriter,
};

/// Remove every entry inside `dir`, keeping the directory itself.
///
/// # Errors
///
/// Returns [`PageError::CleanDir`] if an entry cannot be removed.
pub fn clean_output_dir(dir: &Path) -> PageResult<()> {
  if !dir.exists() {
    return Ok(());
  }
  let clean_err = |source| {
    PageError::CleanDir {
      path: dir.to_path_buf(),
      source,
    }
  };

  log::debug!("Cleaning output directory {}", dir.display());
  for entry in fs::read_dir(dir).map_err(clean_err)? {
    let path = entry.map_err(clean_err)?.path();
    if path.is_dir() {
      fs::remove_dir_all(&path).map_err(clean_err)?;
    } else {
      fs::remove_file(&path).map_err(clean_err)?;
    }
  }
  Ok(())
}

/// Render all pages, then write them below `output_dir`. Nothing is
/// written until every page has been rendered.
///
/// Returns the paths of the written files.
///
/// # Errors
///
/// Returns [`PageError::CreateDir`] or [`PageError::WriteFile`] on I/O
/// failure.
pub fn write_pages(
  pages: &[Page],
  output_dir: &Path,
  writer: &MarkdownWriter,
) -> PageResult<Vec<PathBuf>> {
  let rendered: Vec<(PathBuf, String)> = pages
    .iter()
    .map(|page| {
      (
        page.locator.to_path(output_dir),
        writer.render(&page.document),
      )
    })
    .collect();

  let mut written = Vec::with_capacity(rendered.len());
  for (path, content) in rendered {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|source| {
        PageError::CreateDir {
          path: parent.to_path_buf(),
          source,
        }
      })?;
    }
    fs::write(&path, content).map_err(|source| {
      PageError::WriteFile {
        path: path.clone(),
        source,
      }
    })?;
    log::trace!("Wrote {}", path.display());
    written.push(path);
  }

  log::info!(
    "Wrote {} page(s) to {}",
    written.len(),
    output_dir.display()
  );
  Ok(written)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use mddocs_core::Locator;
  use tempfile::tempdir;

  use super::*;
  use crate::document::{Block, Document};

  fn page(locator: &str, heading: &str) -> Page {
    let mut document = Document::new();
    document.push(Block::heading(1, heading));
    Page {
      locator: Locator::new(locator),
      document,
    }
  }

  #[test]
  fn test_write_pages_creates_directories() {
    let dir = tempdir().unwrap();
    let pages = vec![
      page("index.md", "Root"),
      page("Lib/Widget/methods/Run.md", "Widget.Run Method"),
    ];

    let written = write_pages(&pages, dir.path(), &MarkdownWriter::default()).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(
      fs::read_to_string(dir.path().join("Lib/Widget/methods/Run.md")).unwrap(),
      "# Widget.Run Method\n"
    );
  }

  #[test]
  fn test_clean_output_dir_keeps_directory() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("stale/nested")).unwrap();
    fs::write(dir.path().join("stale.md"), "old").unwrap();

    clean_output_dir(dir.path()).unwrap();
    assert!(dir.path().exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    clean_output_dir(&dir.path().join("missing")).unwrap();
  }
}
