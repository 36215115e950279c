//! Recoverable conditions found while building or rendering the model.
//!
//! None of these abort a run. Each one is logged when it is recorded and the
//! whole collection is summarized once generation has finished.

use std::fmt;

use indexmap::IndexMap;

use crate::identity::IdentityKey;

/// A single recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
  /// A parameter tag names a parameter the entity does not declare. The tag
  /// was dropped.
  UnmatchedParameter {
    entity:    IdentityKey,
    parameter: String,
  },

  /// A reference could not be resolved to any entity or output unit and is
  /// rendered as plain text.
  UnresolvedReference {
    origin:    IdentityKey,
    reference: String,
  },

  /// Several types declare command-line options; only `chosen` is used.
  AmbiguousOptionSource {
    chosen:  String,
    ignored: Vec<String>,
  },

  /// No type declares command-line options; the application has an empty
  /// unnamed command.
  NoOptionSource { application: String },

  /// A second summary/remarks/returns/value block was found and dropped.
  DuplicateSection {
    entity:  IdentityKey,
    section: &'static str,
  },

  /// An option attribute carries an argument of an unexpected type.
  UnexpectedAttributeArgument {
    member:        String,
    argument_type: String,
  },
}

impl Diagnostic {
  /// Short stable name, used to group the summary.
  #[must_use]
  pub const fn code(&self) -> &'static str {
    match self {
      Self::UnmatchedParameter { .. } => "unmatched-parameter",
      Self::UnresolvedReference { .. } => "unresolved-reference",
      Self::AmbiguousOptionSource { .. } => "ambiguous-option-source",
      Self::NoOptionSource { .. } => "no-option-source",
      Self::DuplicateSection { .. } => "duplicate-section",
      Self::UnexpectedAttributeArgument { .. } => {
        "unexpected-attribute-argument"
      },
    }
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnmatchedParameter { entity, parameter } => {
        write!(
          f,
          "{entity}: documentation for parameter `{parameter}` does not \
           match any declared parameter"
        )
      },
      Self::UnresolvedReference { origin, reference } => {
        write!(f, "{origin}: could not resolve reference `{reference}`")
      },
      Self::AmbiguousOptionSource { chosen, ignored } => {
        write!(
          f,
          "multiple option classes found, generating documentation for \
           {chosen}; ignored types: {}",
          ignored.join(", ")
        )
      },
      Self::NoOptionSource { application } => {
        write!(f, "{application}: no option classes found")
      },
      Self::DuplicateSection { entity, section } => {
        write!(f, "{entity}: duplicate `{section}` section dropped")
      },
      Self::UnexpectedAttributeArgument {
        member,
        argument_type,
      } => {
        write!(
          f,
          "{member}: unexpected constructor argument of type \
           `{argument_type}` in option attribute"
        )
      },
    }
  }
}

/// Append-only collection of [`Diagnostic`]s for one generation run.
#[derive(Debug, Default)]
pub struct Diagnostics {
  items: Vec<Diagnostic>,
}

impl Diagnostics {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a diagnostic and log it.
  pub fn push(&mut self, diagnostic: Diagnostic) {
    log::warn!("{diagnostic}");
    self.items.push(diagnostic);
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
    self.items.iter()
  }

  /// Count diagnostics per [`Diagnostic::code`], in order of first
  /// occurrence.
  #[must_use]
  pub fn summary(&self) -> IndexMap<&'static str, usize> {
    let mut counts = IndexMap::new();
    for item in &self.items {
      *counts.entry(item.code()).or_insert(0) += 1;
    }
    counts
  }

  /// Log the summary at the end of a run.
  pub fn log_summary(&self) {
    if self.items.is_empty() {
      log::info!("Generation finished without warnings");
      return;
    }

    log::warn!("Generation finished with {} warning(s):", self.items.len());
    for (code, count) in self.summary() {
      log::warn!("  {code}: {count}");
    }
  }
}

impl Extend<Diagnostic> for Diagnostics {
  fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
    for diagnostic in iter {
      self.push(diagnostic);
    }
  }
}
