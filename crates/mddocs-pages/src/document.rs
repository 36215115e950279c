//! Abstract document tree.
//!
//! Pages are built as a sequence of [`Block`]s made of inline [`Span`]s and
//! only turned into markdown text by the serializer.

use mddocs_core::Locator;

/// Inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
  Empty,
  Text(String),
  Code(String),
  Emphasis(Box<Span>),
  Strong(Box<Span>),
  Link { content: Box<Span>, target: String },
  Composite(Vec<Span>),
}

impl Span {
  pub fn text(text: impl Into<String>) -> Self {
    Self::Text(text.into())
  }

  pub fn code(code: impl Into<String>) -> Self {
    Self::Code(code.into())
  }

  #[must_use]
  pub fn emphasis(content: Self) -> Self {
    Self::Emphasis(Box::new(content))
  }

  #[must_use]
  pub fn strong(content: Self) -> Self {
    Self::Strong(Box::new(content))
  }

  pub fn link(content: Self, target: impl Into<String>) -> Self {
    Self::Link {
      content: Box::new(content),
      target:  target.into(),
    }
  }

  /// Combine spans, flattening nested composites and dropping empty spans.
  #[must_use]
  pub fn composite(spans: Vec<Self>) -> Self {
    let mut flat = Vec::with_capacity(spans.len());
    for span in spans {
      match span {
        Self::Empty => {},
        Self::Composite(inner) => flat.extend(inner),
        other => flat.push(other),
      }
    }
    match flat.len() {
      0 => Self::Empty,
      1 => flat.pop().unwrap_or(Self::Empty),
      _ => Self::Composite(flat),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Empty => true,
      Self::Text(text) | Self::Code(text) => text.is_empty(),
      Self::Emphasis(inner) | Self::Strong(inner) => inner.is_empty(),
      Self::Link { content, .. } => content.is_empty(),
      Self::Composite(spans) => spans.iter().all(Self::is_empty),
    }
  }

  /// Plain text of the span, without markup.
  #[must_use]
  pub fn plain_text(&self) -> String {
    match self {
      Self::Empty => String::new(),
      Self::Text(text) | Self::Code(text) => text.clone(),
      Self::Emphasis(inner) | Self::Strong(inner) => inner.plain_text(),
      Self::Link { content, .. } => content.plain_text(),
      Self::Composite(spans) => spans.iter().map(Self::plain_text).collect(),
    }
  }
}

impl From<&str> for Span {
  fn from(value: &str) -> Self {
    Self::text(value)
  }
}

impl From<String> for Span {
  fn from(value: String) -> Self {
    Self::Text(value)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  pub header: Vec<Span>,
  pub rows:   Vec<Vec<Span>>,
}

impl Table {
  #[must_use]
  pub fn new(header: Vec<Span>) -> Self {
    Self {
      header,
      rows: Vec::new(),
    }
  }

  pub fn push(&mut self, row: Vec<Span>) {
    self.rows.push(row);
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
  Heading {
    level:   u8,
    content: Span,
    anchor:  Option<String>,
  },
  Paragraph(Span),
  Table(Table),
  CodeBlock {
    language: Option<String>,
    code:     String,
  },
  BulletList(Vec<Span>),
  ThematicBreak,
}

impl Block {
  pub fn heading(level: u8, content: impl Into<Span>) -> Self {
    Self::Heading {
      level,
      content: content.into(),
      anchor: None,
    }
  }

  pub fn anchored_heading(
    level: u8,
    content: impl Into<Span>,
    anchor: impl Into<String>,
  ) -> Self {
    Self::Heading {
      level,
      content: content.into(),
      anchor: Some(anchor.into()),
    }
  }

  pub fn paragraph(content: impl Into<Span>) -> Self {
    Self::Paragraph(content.into())
  }

  pub fn code_block(code: impl Into<String>, language: Option<&str>) -> Self {
    Self::CodeBlock {
      language: language.map(str::to_owned),
      code:     code.into(),
    }
  }
}

/// An ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  blocks: Vec<Block>,
}

impl Document {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, block: Block) {
    self.blocks.push(block);
  }

  #[must_use]
  pub fn blocks(&self) -> &[Block] {
    &self.blocks
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  /// Find the first heading whose plain text equals `text`.
  #[must_use]
  pub fn heading(&self, text: &str) -> Option<&Block> {
    self.blocks.iter().find(|b| {
      matches!(b, Block::Heading { content, .. } if content.plain_text() == text)
    })
  }
}

impl Extend<Block> for Document {
  fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
    self.blocks.extend(iter);
  }
}

/// A finished page and the locator it is written to.
#[derive(Debug, Clone)]
pub struct Page {
  pub locator:  Locator,
  pub document: Document,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_composite_flattens_and_drops_empty() {
    let span = Span::composite(vec![
      Span::Empty,
      Span::composite(vec![Span::text("a"), Span::code("b")]),
      Span::text("c"),
    ]);
    assert_eq!(
      span,
      Span::Composite(vec![Span::text("a"), Span::code("b"), Span::text("c")])
    );
    assert_eq!(Span::composite(vec![Span::text("x")]), Span::text("x"));
    assert!(Span::composite(vec![Span::Empty]).is_empty());
  }

  #[test]
  fn test_plain_text() {
    let span = Span::composite(vec![
      Span::code("Widget"),
      Span::text(" "),
      Span::link(Span::strong(Span::text("Class")), "index.md"),
    ]);
    assert_eq!(span.plain_text(), "Widget Class");
  }
}
