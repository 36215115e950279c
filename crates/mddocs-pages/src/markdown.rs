//! Markdown serialization of the document tree.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::document::{Block, Document, Span, Table};

/// Markdown dialect used for output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownPreset {
  /// CommonMark with HTML anchors before headings.
  #[default]
  Default,
  /// MkDocs flavour: anchors as attribute lists on the heading line.
  MkDocs,
}

impl FromStr for MarkdownPreset {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "default" => Ok(Self::Default),
      "mkdocs" => Ok(Self::MkDocs),
      other => {
        Err(format!(
          "unknown markdown preset `{other}`, expected `default` or `mkdocs`"
        ))
      },
    }
  }
}

impl fmt::Display for MarkdownPreset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Default => f.write_str("default"),
      Self::MkDocs => f.write_str("mkdocs"),
    }
  }
}

/// Serializes [`Document`]s to markdown text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter {
  preset: MarkdownPreset,
}

impl MarkdownWriter {
  #[must_use]
  pub const fn new(preset: MarkdownPreset) -> Self {
    Self { preset }
  }

  #[must_use]
  pub fn render(&self, document: &Document) -> String {
    let mut out = document
      .blocks()
      .iter()
      .map(|b| self.block(b))
      .collect::<Vec<_>>()
      .join("\n\n");
    out.push('\n');
    out
  }

  fn block(&self, block: &Block) -> String {
    match block {
      Block::Heading {
        level,
        content,
        anchor,
      } => {
        let hashes = "#".repeat(usize::from((*level).clamp(1, 6)));
        let text = span(content);
        match (anchor, self.preset) {
          (None, _) => format!("{hashes} {text}"),
          (Some(anchor), MarkdownPreset::Default) => {
            format!("<a id=\"{anchor}\"></a>\n\n{hashes} {text}")
          },
          (Some(anchor), MarkdownPreset::MkDocs) => {
            format!("{hashes} {text} {{: #{anchor} }}")
          },
        }
      },
      Block::Paragraph(content) => span(content),
      Block::Table(table) => render_table(table),
      Block::CodeBlock { language, code } => {
        let fence = "`".repeat(longest_backtick_run(code).max(2) + 1);
        format!(
          "{fence}{}\n{code}\n{fence}",
          language.as_deref().unwrap_or_default()
        )
      },
      Block::BulletList(items) => {
        items
          .iter()
          .map(|item| format!("- {}", span(item)))
          .collect::<Vec<_>>()
          .join("\n")
      },
      Block::ThematicBreak => "___".to_string(),
    }
  }
}

fn longest_backtick_run(code: &str) -> usize {
  let mut longest = 0;
  let mut current = 0;
  for c in code.chars() {
    if c == '`' {
      current += 1;
      longest = longest.max(current);
    } else {
      current = 0;
    }
  }
  longest
}

fn render_table(table: &Table) -> String {
  let row = |cells: &[Span]| {
    let cells: Vec<String> = cells.iter().map(table_cell).collect();
    format!("| {} |", cells.join(" | "))
  };

  let mut lines = Vec::with_capacity(table.rows.len() + 2);
  lines.push(row(&table.header));
  lines.push(format!(
    "|{}|",
    vec!["-----"; table.header.len()].join("|")
  ));
  for cells in &table.rows {
    lines.push(row(cells));
  }
  lines.join("\n")
}

fn table_cell(cell: &Span) -> String {
  span(cell).replace('\n', " ").replace('|', "\\|")
}

/// Serialize an inline span.
#[must_use]
pub fn span(span: &Span) -> String {
  match span {
    Span::Empty => String::new(),
    Span::Text(text) => escape_text(text),
    Span::Code(code) => code_span(code),
    Span::Emphasis(inner) => format!("*{}*", self::span(inner)),
    Span::Strong(inner) => format!("**{}**", self::span(inner)),
    Span::Link { content, target } => {
      format!("[{}]({})", self::span(content), target.replace(' ', "%20"))
    },
    Span::Composite(spans) => spans.iter().map(self::span).collect(),
  }
}

fn code_span(code: &str) -> String {
  if code.contains('`') {
    format!("`` {code} ``")
  } else {
    format!("`{code}`")
  }
}

/// Escape text for use in markdown. Angle brackets and ampersands are
/// HTML-escaped, markdown punctuation is backslash-escaped.
#[must_use]
pub fn escape_text(text: &str) -> String {
  let encoded = html_escape::encode_text(text);
  let mut out = String::with_capacity(encoded.len());
  for c in encoded.chars() {
    if matches!(c, '\\' | '*' | '_' | '[' | ']' | '`' | '#') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}
