//! Output units and the unit index.
//!
//! The unit factory decides which entities get a page of their own and
//! which are rendered as anchored sections of another page, and assigns a
//! locator to every unit. The resulting [`UnitIndex`] is built once and is
//! read-only afterwards.

use std::{
  collections::{HashMap, HashSet},
  fmt,
  path::{Path, PathBuf},
};

use crate::{
  entity::{Entity, EntityGraph, EntityId, EntityKind},
  error::{CoreError, CoreResult},
  grouping::{GroupId, GroupKind, Grouping},
  identity::IdentityKey,
  metadata::TypeKind,
};

/// Path of an output unit relative to the output directory, with `/` as
/// separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator(String);

impl Locator {
  #[must_use]
  pub fn new(path: impl Into<String>) -> Self {
    Self(path.into())
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Destination of the unit below `root`.
  #[must_use]
  pub fn to_path(&self, root: &Path) -> PathBuf {
    self.0.split('/').fold(root.to_path_buf(), |p, c| p.join(c))
  }

  /// Directory part of the locator, empty for top-level units.
  #[must_use]
  pub fn directory(&self) -> &str {
    self.0.rsplit_once('/').map_or("", |(dir, _)| dir)
  }
}

impl fmt::Display for Locator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Identifier of a section inside a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor(String);

impl Anchor {
  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for Anchor {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl fmt::Display for Anchor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Turn arbitrary text into an anchor-safe slug: lowercase ASCII letters,
/// digits and single dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  for c in text.chars() {
    if c.is_ascii_alphanumeric() {
      slug.push(c.to_ascii_lowercase());
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }
  while slug.ends_with('-') {
    slug.pop();
  }
  if slug.is_empty() {
    slug.push_str("section");
  }
  slug
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(usize);

/// What a unit renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSubject {
  Entity(EntityId),
  Group(GroupId),
}

/// Where an entity is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
  pub unit:   UnitId,
  /// Section inside the unit; `None` when the entity is the unit's subject
  /// or is not rendered as a section of its own.
  pub anchor: Option<Anchor>,
}

#[derive(Debug, Clone)]
pub struct OutputUnit {
  pub id:       UnitId,
  pub locator:  Locator,
  pub subject:  UnitSubject,
  /// Identity key of the subject, entity or group.
  pub key:      IdentityKey,
  /// Entities rendered as anchored sections, in order.
  pub sections: Vec<(EntityId, Anchor)>,
}

impl OutputUnit {
  #[must_use]
  pub fn anchor_of(&self, entity: EntityId) -> Option<&Anchor> {
    self
      .sections
      .iter()
      .find(|(id, _)| *id == entity)
      .map(|(_, anchor)| anchor)
  }
}

/// Entity and group to unit mapping.
#[derive(Debug, Default)]
pub struct UnitIndex {
  units:      Vec<OutputUnit>,
  by_entity:  HashMap<EntityId, Placement>,
  by_group:   HashMap<GroupId, UnitId>,
  by_subject: HashMap<IdentityKey, UnitId>,
  locators:   HashMap<String, UnitId>,
  siblings:   HashMap<(Option<EntityId>, &'static str), HashSet<String>>,
  anchors:    HashMap<UnitId, HashSet<String>>,
}

impl UnitIndex {
  /// Assign a unit to every entity of the graph, in dependency order:
  /// namespaces, types, type members, then applications and commands.
  ///
  /// # Errors
  ///
  /// Returns [`CoreError::LocatorCollision`] if two units that are not
  /// siblings would be written to the same locator (compared without
  /// regard to case).
  pub fn build(graph: &EntityGraph, grouping: &Grouping) -> CoreResult<Self> {
    let mut index = Self::default();

    for namespace in graph.by_kind(EntityKind::Namespace) {
      let locator = if namespace.name.is_empty() {
        "index.md".to_string()
      } else {
        let dir = index.sibling_name(None, "namespace", &namespace.name);
        format!("{dir}/index.md")
      };
      index.create_unit(
        locator,
        UnitSubject::Entity(namespace.id),
        namespace.key.clone(),
      )?;
    }

    let mut type_dirs: HashMap<EntityId, String> = HashMap::new();
    for ty in graph.by_kind(EntityKind::Type) {
      let namespace_dir = ty
        .parent
        .and_then(|ns| index.by_entity.get(&ns))
        .map(|p| index.get(p.unit).locator.directory().to_string())
        .unwrap_or_default();
      let segment = index.sibling_name(ty.parent, "type", &type_segment(&ty.name));
      let dir = join(&namespace_dir, &segment);
      index.create_unit(
        format!("{dir}/index.md"),
        UnitSubject::Entity(ty.id),
        ty.key.clone(),
      )?;
      type_dirs.insert(ty.id, dir);
    }

    for ty in graph.by_kind(EntityKind::Type) {
      let dir = type_dirs.get(&ty.id).cloned().unwrap_or_default();
      let type_unit = index.by_entity.get(&ty.id).map(|p| p.unit);
      let is_enum = ty.as_type().is_some_and(|t| t.kind == TypeKind::Enum);

      for member in graph.children(ty.id) {
        if let Some(group) = grouping.group_of(member.id) {
          let unit = match index.by_group.get(&group.id) {
            Some(&unit) => unit,
            None => {
              let locator = match group.kind {
                GroupKind::Constructor => format!("{dir}/constructors/index.md"),
                kind => {
                  let category = group_category(kind);
                  let name =
                    index.sibling_name(Some(ty.id), category, &group.name);
                  format!("{dir}/{category}/{name}.md")
                },
              };
              index.create_group_unit(locator, group.id, group.key.clone())?
            },
          };
          index.add_section(unit, member, &member.signature_label());
          continue;
        }

        if is_enum
          && member.kind == EntityKind::Field
          && let Some(unit) = type_unit
        {
          index.add_section(unit, member, &member.name);
          continue;
        }

        let category = match member.kind {
          EntityKind::Property => "properties",
          EntityKind::Field => "fields",
          EntityKind::Event => "events",
          _ => {
            return Err(CoreError::InvalidMetadata(format!(
              "member `{}` of kind {} cannot be placed",
              member.key,
              member.kind.label()
            )));
          },
        };
        let name = index.sibling_name(Some(ty.id), category, &member.name);
        index.create_unit(
          format!("{dir}/{category}/{name}.md"),
          UnitSubject::Entity(member.id),
          member.key.clone(),
        )?;
      }
    }

    for application in graph.by_kind(EntityKind::Application) {
      let app_unit = index.create_unit(
        "index.md".to_string(),
        UnitSubject::Entity(application.id),
        application.key.clone(),
      )?;

      for command in graph.children(application.id) {
        let unnamed = command.as_command().is_some_and(|c| c.name.is_none());
        let unit = if unnamed {
          index
            .by_entity
            .insert(command.id, Placement { unit: app_unit, anchor: None });
          app_unit
        } else {
          let name = index.sibling_name(
            Some(application.id),
            "commands",
            &command.name,
          );
          index.create_unit(
            format!("commands/{name}.md"),
            UnitSubject::Entity(command.id),
            command.key.clone(),
          )?
        };

        for parameter in graph.children(command.id) {
          if parameter.is_hidden() {
            index
              .by_entity
              .insert(parameter.id, Placement { unit, anchor: None });
          } else {
            index.add_section(unit, parameter, &parameter_anchor(parameter));
          }
        }
      }
    }

    log::debug!("Assigned {} output unit(s)", index.units.len());
    Ok(index)
  }

  /// Name of an entity within its sibling scope, suffixed with `-2`, `-3`
  /// and so on if a sibling already uses the name (ignoring case).
  fn sibling_name(
    &mut self,
    parent: Option<EntityId>,
    category: &'static str,
    name: &str,
  ) -> String {
    let used = self.siblings.entry((parent, category)).or_default();
    let mut candidate = name.to_string();
    let mut counter = 1;
    while used.contains(&candidate.to_lowercase()) {
      counter += 1;
      candidate = format!("{name}-{counter}");
    }
    used.insert(candidate.to_lowercase());
    candidate
  }

  fn create_unit(
    &mut self,
    locator: String,
    subject: UnitSubject,
    key: IdentityKey,
  ) -> CoreResult<UnitId> {
    let id = self.push_unit(locator, subject, key)?;
    if let UnitSubject::Entity(entity) = subject {
      self.by_entity.insert(entity, Placement {
        unit:   id,
        anchor: None,
      });
    }
    Ok(id)
  }

  fn create_group_unit(
    &mut self,
    locator: String,
    group: GroupId,
    key: IdentityKey,
  ) -> CoreResult<UnitId> {
    let id = self.push_unit(locator, UnitSubject::Group(group), key)?;
    self.by_group.insert(group, id);
    Ok(id)
  }

  fn push_unit(
    &mut self,
    locator: String,
    subject: UnitSubject,
    key: IdentityKey,
  ) -> CoreResult<UnitId> {
    let folded = locator.to_lowercase();
    if let Some(&existing) = self.locators.get(&folded) {
      return Err(CoreError::LocatorCollision {
        locator,
        existing: self.units[existing.0].key.clone(),
        incoming: key,
      });
    }

    let id = UnitId(self.units.len());
    self.locators.insert(folded, id);
    self.by_subject.insert(key.clone(), id);
    self.units.push(OutputUnit {
      id,
      locator: Locator(locator),
      subject,
      key,
      sections: Vec::new(),
    });
    Ok(id)
  }

  fn add_section(&mut self, unit: UnitId, entity: &Entity, label: &str) {
    let used = self.anchors.entry(unit).or_default();
    let base = slugify(label);
    let mut anchor = base.clone();
    let mut counter = 1;
    while used.contains(&anchor) {
      counter += 1;
      anchor = format!("{base}-{counter}");
    }
    used.insert(anchor.clone());

    let anchor = Anchor(anchor);
    self.units[unit.0].sections.push((entity.id, anchor.clone()));
    self.by_entity.insert(entity.id, Placement {
      unit,
      anchor: Some(anchor),
    });
  }

  #[must_use]
  pub fn get(&self, id: UnitId) -> &OutputUnit {
    &self.units[id.0]
  }

  /// Where an entity is rendered.
  #[must_use]
  pub fn placement(&self, entity: EntityId) -> Option<&Placement> {
    self.by_entity.get(&entity)
  }

  #[must_use]
  pub fn unit_of_group(&self, group: GroupId) -> Option<&OutputUnit> {
    self.by_group.get(&group).map(|&u| self.get(u))
  }

  /// The unit whose subject has the given identity key.
  #[must_use]
  pub fn unit_of_subject(&self, key: &IdentityKey) -> Option<&OutputUnit> {
    self.by_subject.get(key).map(|&u| self.get(u))
  }

  /// Units in creation order.
  pub fn iter(&self) -> impl Iterator<Item = &OutputUnit> {
    self.units.iter()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.units.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.units.is_empty()
  }
}

fn join(dir: &str, segment: &str) -> String {
  if dir.is_empty() {
    segment.to_string()
  } else {
    format!("{dir}/{segment}")
  }
}

/// Directory name of a type; generic arity markers are not path friendly.
fn type_segment(name: &str) -> String {
  name.replace('`', "-")
}

const fn group_category(kind: GroupKind) -> &'static str {
  match kind {
    GroupKind::Method => "methods",
    GroupKind::Constructor => "constructors",
    GroupKind::Operator => "operators",
    GroupKind::Indexer => "indexers",
  }
}

/// Anchor label of an option or positional value section.
fn parameter_anchor(parameter: &Entity) -> String {
  match (parameter.as_option(), parameter.as_value()) {
    (Some(option), _) => {
      format!(
        "option-{}",
        option
          .long_name
          .clone()
          .or_else(|| option.short_name.map(String::from))
          .unwrap_or_default()
      )
    },
    (None, Some(value)) => {
      match &value.name {
        Some(name) => format!("value-{name}"),
        None => format!("value-{}", value.index),
      }
    },
    (None, None) => parameter.name.clone(),
  }
}
