//! Cross-reference resolution.
//!
//! Maps entities, overload groups and identity keys found in documentation
//! to output locations. Results are cached per identity key; the cache is
//! the only state that changes once the unit index exists.

use std::{cell::RefCell, collections::HashMap, path::Path};

use crate::{
  entity::{EntityGraph, EntityId},
  grouping::Grouping,
  identity::IdentityKey,
  units::{Anchor, Locator, UnitIndex},
};

/// Resolved target of a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
  pub locator: Locator,
  pub anchor:  Option<Anchor>,
}

impl Link {
  /// Link target as written into the unit at `from`: a relative path, with
  /// the anchor appended as a fragment. Links into the same unit are
  /// reduced to the fragment.
  #[must_use]
  pub fn relative_to(&self, from: &Locator) -> String {
    if &self.locator == from
      && let Some(anchor) = &self.anchor
    {
      return format!("#{anchor}");
    }

    let target = Path::new(self.locator.as_str());
    let base = Path::new(from.directory());
    let relative = pathdiff::diff_paths(target, base)
      .unwrap_or_else(|| target.to_path_buf());

    let mut href = relative
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");
    if let Some(anchor) = &self.anchor {
      href.push('#');
      href.push_str(anchor.as_str());
    }
    href
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Resolved(Link),
  /// Carries the original reference text.
  Unresolved(String),
}

impl Resolution {
  #[must_use]
  pub const fn link(&self) -> Option<&Link> {
    match self {
      Self::Resolved(link) => Some(link),
      Self::Unresolved(_) => None,
    }
  }

  #[must_use]
  pub const fn is_resolved(&self) -> bool {
    matches!(self, Self::Resolved(_))
  }
}

/// Resolves references against a finished unit index.
#[derive(Debug)]
pub struct Resolver<'a> {
  graph:    &'a EntityGraph,
  grouping: &'a Grouping,
  units:    &'a UnitIndex,
  cache:    RefCell<HashMap<IdentityKey, Resolution>>,
}

impl<'a> Resolver<'a> {
  #[must_use]
  pub fn new(
    graph: &'a EntityGraph,
    grouping: &'a Grouping,
    units: &'a UnitIndex,
  ) -> Self {
    Self {
      graph,
      grouping,
      units,
      cache: RefCell::new(HashMap::new()),
    }
  }

  /// Resolve an entity of the graph.
  #[must_use]
  pub fn resolve_entity(&self, id: EntityId) -> Resolution {
    self.resolve(&self.graph.get(id).key)
  }

  /// Resolve an identity key of an entity or an overload group.
  ///
  /// Grouped members resolve to their group's unit with the member's
  /// anchor; a group key resolves to the group's unit itself.
  #[must_use]
  pub fn resolve(&self, key: &IdentityKey) -> Resolution {
    if let Some(cached) = self.cache.borrow().get(key) {
      return cached.clone();
    }

    let resolution = self.compute(key);
    if !resolution.is_resolved() {
      log::debug!("Unresolved reference `{key}`");
    }
    self
      .cache
      .borrow_mut()
      .insert(key.clone(), resolution.clone());
    resolution
  }

  fn compute(&self, key: &IdentityKey) -> Resolution {
    if let Some(id) = self.graph.lookup(key) {
      if let Some(placement) = self.units.placement(id) {
        return Resolution::Resolved(Link {
          locator: self.units.get(placement.unit).locator.clone(),
          anchor:  placement.anchor.clone(),
        });
      }
    } else if let Some(group) = self.grouping.lookup(key)
      && let Some(unit) = self.units.unit_of_group(group.id)
    {
      return Resolution::Resolved(Link {
        locator: unit.locator.clone(),
        anchor:  None,
      });
    }

    Resolution::Unresolved(key.to_string())
  }

  /// Number of cached resolutions.
  #[must_use]
  pub fn cached(&self) -> usize {
    self.cache.borrow().len()
  }

  #[must_use]
  pub const fn graph(&self) -> &'a EntityGraph {
    self.graph
  }

  #[must_use]
  pub const fn grouping(&self) -> &'a Grouping {
    self.grouping
  }

  #[must_use]
  pub const fn units(&self) -> &'a UnitIndex {
    self.units
  }
}
