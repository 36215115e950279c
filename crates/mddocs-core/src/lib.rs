//! Documentation model and cross-reference resolution for mddocs.
//!
//! The model is built in strictly ordered phases:
//!
//! 1. [`EntityGraph`]: one entity per documentable item, each with a stable
//!    [`IdentityKey`].
//! 2. [`docs::merge`]: typed documentation payloads, `inheritdoc` applied.
//! 3. [`Grouping`]: overload groups and command sets.
//! 4. [`UnitIndex`]: output units and locators.
//! 5. [`Resolver`]: links between units, resolved lazily and cached.
//!
//! Recoverable problems are collected in [`Diagnostics`]; anything else is
//! a [`CoreError`] and aborts the run.

pub mod diagnostics;
pub mod docs;
pub mod entity;
pub mod error;
pub mod grouping;
pub mod identity;
pub mod loader;
pub mod metadata;
pub mod resolve;
pub mod text;
pub mod units;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use docs::{DocBlock, DocBlockKind, DocNode, DocPayload, Documentation};
pub use entity::{Entity, EntityDetail, EntityGraph, EntityId, EntityKind};
pub use error::{CoreError, CoreResult};
pub use grouping::{GroupKind, Grouping, OverloadGroup};
pub use identity::IdentityKey;
pub use metadata::{ApplicationRecord, AssemblyRecord, MetadataDocument};
pub use resolve::{Link, Resolution, Resolver};
pub use units::{Anchor, Locator, OutputUnit, UnitIndex, UnitSubject};

/// The finished documentation model of one generation run.
#[derive(Debug)]
pub struct Model {
  pub graph:         EntityGraph,
  pub documentation: Documentation,
  pub grouping:      Grouping,
  pub units:         UnitIndex,
}

impl Model {
  /// Build the API reference model of one or more assemblies.
  ///
  /// # Errors
  ///
  /// Returns [`CoreError::DuplicateIdentity`] or
  /// [`CoreError::LocatorCollision`] on conflicting input.
  pub fn from_assemblies(
    assemblies: &[AssemblyRecord],
    diagnostics: &mut Diagnostics,
  ) -> CoreResult<Self> {
    Self::build(EntityGraph::from_assemblies(assemblies)?, diagnostics)
  }

  /// Build the command-line help model of an application.
  ///
  /// # Errors
  ///
  /// Returns [`CoreError::InvalidMetadata`] for unusable application
  /// metadata and [`CoreError::DuplicateIdentity`] for repeated
  /// parameters.
  pub fn from_application(
    application: &ApplicationRecord,
    diagnostics: &mut Diagnostics,
  ) -> CoreResult<Self> {
    Self::build(EntityGraph::from_application(application)?, diagnostics)
  }

  fn build(graph: EntityGraph, diagnostics: &mut Diagnostics) -> CoreResult<Self> {
    let documentation = docs::merge(&graph, diagnostics);
    let grouping = Grouping::build(&graph);
    let units = UnitIndex::build(&graph, &grouping)?;
    Ok(Self {
      graph,
      documentation,
      grouping,
      units,
    })
  }

  /// A resolver over this model. Each resolver has its own cache.
  #[must_use]
  pub fn resolver(&self) -> Resolver<'_> {
    Resolver::new(&self.graph, &self.grouping, &self.units)
  }
}
