//! Page building and markdown output for mddocs.
//!
//! Pages are assembled as [`Document`] trees from a finished
//! [`mddocs_core::Model`] and serialized by a [`MarkdownWriter`].

pub mod api;
pub mod command;
pub mod content;
pub mod document;
pub mod error;
pub mod markdown;
pub mod output;

pub use content::{PageContext, PageOptions};
pub use document::{Block, Document, Page, Span, Table};
pub use error::{PageError, PageResult};
pub use markdown::{MarkdownPreset, MarkdownWriter};
use mddocs_core::{Diagnostics, Model};

/// Build the API reference pages of a model.
#[must_use]
pub fn api_reference_pages(
  model: &Model,
  options: PageOptions,
  diagnostics: &mut Diagnostics,
) -> Vec<Page> {
  let mut ctx = PageContext::new(model, options, diagnostics);
  api::build_pages(&mut ctx)
}

/// Build the command-line help pages of a model.
#[must_use]
pub fn command_line_pages(
  model: &Model,
  options: PageOptions,
  diagnostics: &mut Diagnostics,
) -> Vec<Page> {
  let ctx = PageContext::new(model, options, diagnostics);
  command::build_pages(&ctx)
}
