//! Small text helpers shared by the documentation merge and page builders.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s+").unwrap_or_else(|e| {
    log::error!("Failed to compile WHITESPACE_RUN regex: {e}");
    never_matching_regex()
  })
});

/// Create a regex that never matches anything.
///
/// Used as a fallback when a pattern fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(clippy::unwrap_used, reason = "Pattern is a valid literal")]
    Regex::new(r"^\b$").unwrap()
  })
}

/// Collapse every run of whitespace into a single space.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
  WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Remove the indentation shared by all non-blank lines, together with
/// leading and trailing blank lines.
#[must_use]
pub fn dedent(code: &str) -> String {
  let lines: Vec<&str> = code.lines().collect();
  let first = lines.iter().position(|l| !l.trim().is_empty());
  let last = lines.iter().rposition(|l| !l.trim().is_empty());
  let (Some(first), Some(last)) = (first, last) else {
    return String::new();
  };
  let lines = &lines[first..=last];

  let indent = lines
    .iter()
    .filter(|l| !l.trim().is_empty())
    .map(|l| l.len() - l.trim_start().len())
    .min()
    .unwrap_or(0);

  lines
    .iter()
    .map(|l| {
      if l.trim().is_empty() {
        ""
      } else {
        l.get(indent..).unwrap_or(l).trim_end()
      }
    })
    .collect::<Vec<_>>()
    .join("\n")
}
