//! The entity graph.
//!
//! Entities live in an arena owned by [`EntityGraph`] and refer to each other
//! through [`EntityId`] indices. Ownership is tree shaped: namespaces own
//! types, types own members, applications own commands and commands own
//! their options and positional values. The graph is built once and is
//! read-only afterwards.

use std::collections::HashMap;

use crate::{
  docs::DocElement,
  error::{CoreError, CoreResult},
  identity::{self, IdentityKey},
  metadata::{
    ApplicationRecord,
    AssemblyRecord,
    AttributeRecord,
    MemberKind,
    OptionRecord,
    ParameterRecord,
    TypeKind,
    ValueRecord,
    display_value,
  },
};

/// Index of an entity inside its [`EntityGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

impl EntityId {
  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
  Namespace,
  Type,
  Property,
  Field,
  Event,
  Indexer,
  Constructor,
  Method,
  Operator,
  Application,
  Command,
  Option,
  PositionalValue,
}

impl From<MemberKind> for EntityKind {
  fn from(kind: MemberKind) -> Self {
    match kind {
      MemberKind::Field => Self::Field,
      MemberKind::Property => Self::Property,
      MemberKind::Indexer => Self::Indexer,
      MemberKind::Event => Self::Event,
      MemberKind::Constructor => Self::Constructor,
      MemberKind::Method => Self::Method,
      MemberKind::Operator => Self::Operator,
    }
  }
}

impl EntityKind {
  /// Whether entities of this kind belong to an overload group.
  #[must_use]
  pub const fn is_overloadable(self) -> bool {
    matches!(
      self,
      Self::Indexer | Self::Constructor | Self::Method | Self::Operator
    )
  }

  #[must_use]
  pub const fn label(self) -> &'static str {
    match self {
      Self::Namespace => "Namespace",
      Self::Type => "Type",
      Self::Property => "Property",
      Self::Field => "Field",
      Self::Event => "Event",
      Self::Indexer => "Indexer",
      Self::Constructor => "Constructor",
      Self::Method => "Method",
      Self::Operator => "Operator",
      Self::Application => "Application",
      Self::Command => "Command",
      Self::Option => "Option",
      Self::PositionalValue => "Value",
    }
  }
}

#[derive(Debug, Clone)]
pub struct TypeDetail {
  pub assembly:        String,
  pub version:         Option<String>,
  pub namespace:       String,
  pub full_name:       String,
  pub kind:            TypeKind,
  pub is_abstract:     bool,
  pub base_type:       Option<String>,
  pub interfaces:      Vec<String>,
  pub type_parameters: Vec<String>,
  pub definition:      Option<String>,
  pub attributes:      Vec<AttributeRecord>,
}

#[derive(Debug, Clone)]
pub struct MemberDetail {
  pub parameters:      Vec<ParameterRecord>,
  pub type_parameters: Vec<String>,
  pub type_name:       Option<String>,
  pub definition:      Option<String>,
  pub attributes:      Vec<AttributeRecord>,
}

#[derive(Debug, Clone)]
pub struct CommandDetail {
  /// `None` for the implicit command of a single-command application.
  pub name:      Option<String>,
  pub help_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Mirrors the declared option flags"
)]
pub struct OptionDetail {
  pub long_name:  Option<String>,
  pub short_name: Option<char>,
  pub required:   bool,
  pub hidden:     bool,
  pub is_switch:  bool,
  pub default:    Option<String>,
  pub help_text:  Option<String>,
  pub meta_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDetail {
  pub index:      u32,
  pub name:       Option<String>,
  pub required:   bool,
  pub hidden:     bool,
  pub default:    Option<String>,
  pub help_text:  Option<String>,
  pub meta_value: Option<String>,
}

/// Kind-specific data of an entity.
#[derive(Debug, Clone)]
pub enum EntityDetail {
  Namespace,
  Type(TypeDetail),
  Member(MemberDetail),
  Application { version: Option<String> },
  Command(CommandDetail),
  Option(OptionDetail),
  Value(ValueDetail),
}

/// One documentable item.
#[derive(Debug, Clone)]
pub struct Entity {
  pub id:       EntityId,
  pub key:      IdentityKey,
  pub kind:     EntityKind,
  /// Display name: the declared name of the item.
  pub name:     String,
  pub parent:   Option<EntityId>,
  pub children: Vec<EntityId>,
  pub detail:   EntityDetail,
}

impl Entity {
  /// Declared parameters; empty for entities without a parameter list.
  #[must_use]
  pub fn parameters(&self) -> &[ParameterRecord] {
    match &self.detail {
      EntityDetail::Member(member) => &member.parameters,
      _ => &[],
    }
  }

  /// Declared type parameters of a type or generic method.
  #[must_use]
  pub fn type_parameters(&self) -> &[String] {
    match &self.detail {
      EntityDetail::Type(ty) => &ty.type_parameters,
      EntityDetail::Member(member) => &member.type_parameters,
      _ => &[],
    }
  }

  #[must_use]
  pub const fn as_type(&self) -> Option<&TypeDetail> {
    match &self.detail {
      EntityDetail::Type(ty) => Some(ty),
      _ => None,
    }
  }

  #[must_use]
  pub const fn as_member(&self) -> Option<&MemberDetail> {
    match &self.detail {
      EntityDetail::Member(member) => Some(member),
      _ => None,
    }
  }

  #[must_use]
  pub const fn as_option(&self) -> Option<&OptionDetail> {
    match &self.detail {
      EntityDetail::Option(option) => Some(option),
      _ => None,
    }
  }

  #[must_use]
  pub const fn as_value(&self) -> Option<&ValueDetail> {
    match &self.detail {
      EntityDetail::Value(value) => Some(value),
      _ => None,
    }
  }

  #[must_use]
  pub const fn as_command(&self) -> Option<&CommandDetail> {
    match &self.detail {
      EntityDetail::Command(command) => Some(command),
      _ => None,
    }
  }

  /// Whether the entity is excluded from rendered parameter listings.
  #[must_use]
  pub const fn is_hidden(&self) -> bool {
    match &self.detail {
      EntityDetail::Option(option) => option.hidden,
      EntityDetail::Value(value) => value.hidden,
      _ => false,
    }
  }

  /// Signature-like label of a member: `Name<T>(Type1, Type2)`, with the
  /// target type appended for conversion operators.
  #[must_use]
  pub fn signature_label(&self) -> String {
    if !self.kind.is_overloadable() {
      return self.name.clone();
    }
    let params = self
      .parameters()
      .iter()
      .map(|p| short_type_name(&p.type_name))
      .collect::<Vec<_>>()
      .join(", ");
    if self.kind == EntityKind::Indexer {
      return format!("{}[{params}]", self.name);
    }

    let mut label = self.name.clone();
    let type_parameters = self.type_parameters();
    if self.kind != EntityKind::Constructor && !type_parameters.is_empty() {
      label.push('<');
      label.push_str(&type_parameters.join(", "));
      label.push('>');
    }
    label.push('(');
    label.push_str(&params);
    label.push(')');

    if self.kind == EntityKind::Operator
      && matches!(self.name.as_str(), "op_Implicit" | "op_Explicit")
      && let Some(target) = self.as_member().and_then(|m| m.type_name.as_deref())
    {
      label.push_str(" → ");
      label.push_str(&short_type_name(target));
    }
    label
  }
}

/// Strip the namespace from a full type name, keeping generic arguments
/// readable: `System.Collections.Generic.List<System.String>` becomes
/// `List<String>`.
#[must_use]
pub fn short_type_name(full_name: &str) -> String {
  let mut out = String::with_capacity(full_name.len());
  let mut segment = String::new();
  for c in full_name.chars() {
    match c {
      '.' => segment.clear(),
      '<' | '>' | ',' | '[' | ']' | ' ' => {
        out.push_str(&segment);
        segment.clear();
        out.push(c);
      },
      _ => segment.push(c),
    }
  }
  out.push_str(&segment);
  out
}

/// Arena of all entities of one generation run.
#[derive(Debug, Default)]
pub struct EntityGraph {
  entities: Vec<Entity>,
  raw_docs: Vec<Option<DocElement>>,
  by_key:   HashMap<IdentityKey, EntityId>,
  roots:    Vec<EntityId>,
}

impl EntityGraph {
  /// Build the graph for one or more assemblies, in input order.
  ///
  /// Namespaces are created on first use and shared between assemblies.
  ///
  /// # Errors
  ///
  /// Returns [`CoreError::DuplicateIdentity`] if two types or two members
  /// of one type have the same identity key.
  pub fn from_assemblies(assemblies: &[AssemblyRecord]) -> CoreResult<Self> {
    let mut graph = Self::default();

    for assembly in assemblies {
      for ty in &assembly.types {
        let namespace_key = identity::namespace_key(&ty.namespace);
        let namespace = match graph.lookup(&namespace_key) {
          Some(id) => id,
          None => {
            graph.insert(
              namespace_key,
              EntityKind::Namespace,
              ty.namespace.clone(),
              None,
              EntityDetail::Namespace,
              None,
            )?
          },
        };

        let full_name = identity::full_type_name(&ty.namespace, &ty.name);
        let type_id = graph.insert(
          identity::type_key(&full_name),
          EntityKind::Type,
          ty.name.clone(),
          Some(namespace),
          EntityDetail::Type(TypeDetail {
            assembly:        assembly.name.clone(),
            version:         assembly.version.clone(),
            namespace:       ty.namespace.clone(),
            full_name:       full_name.clone(),
            kind:            ty.kind,
            is_abstract:     ty.is_abstract,
            base_type:       ty.base_type.clone(),
            interfaces:      ty.interfaces.clone(),
            type_parameters: ty.type_parameters.clone(),
            definition:      ty.definition.clone(),
            attributes:      ty.attributes.clone(),
          }),
          ty.docs.clone(),
        )?;

        for member in &ty.members {
          graph.insert(
            identity::member_key(&full_name, member),
            member.kind.into(),
            member.name.clone(),
            Some(type_id),
            EntityDetail::Member(MemberDetail {
              parameters:      member.parameters.clone(),
              type_parameters: member.type_parameters.clone(),
              type_name:       member.type_name.clone(),
              definition:      member.definition.clone(),
              attributes:      member.attributes.clone(),
            }),
            member.docs.clone(),
          )?;
        }
      }
    }

    log::debug!("Built entity graph with {} entities", graph.len());
    Ok(graph)
  }

  /// Build the graph of a command-line application.
  ///
  /// An application without declared commands gets a single unnamed
  /// command holding the application-level options and values. Hidden
  /// commands are left out.
  ///
  /// # Errors
  ///
  /// Returns [`CoreError::InvalidMetadata`] if an option has neither a long
  /// nor a short name, or if an application declares both commands and
  /// application-level parameters, and [`CoreError::DuplicateIdentity`] for
  /// repeated commands, options or value positions.
  pub fn from_application(application: &ApplicationRecord) -> CoreResult<Self> {
    let mut graph = Self::default();
    let app = application.name.as_str();

    let app_id = graph.insert(
      identity::application_key(app),
      EntityKind::Application,
      application.name.clone(),
      None,
      EntityDetail::Application {
        version: application.version.clone(),
      },
      None,
    )?;

    if application.commands.is_empty() {
      let command = graph.insert(
        identity::command_key(app, None),
        EntityKind::Command,
        String::new(),
        Some(app_id),
        EntityDetail::Command(CommandDetail {
          name:      None,
          help_text: None,
        }),
        None,
      )?;
      graph.insert_parameters(
        app,
        None,
        command,
        &application.options,
        &application.values,
      )?;
    } else {
      if !application.options.is_empty() || !application.values.is_empty() {
        return Err(CoreError::InvalidMetadata(format!(
          "application `{app}` declares commands and application-level \
           parameters at the same time"
        )));
      }

      for record in &application.commands {
        if record.hidden {
          log::debug!("Skipping hidden command `{}`", record.name);
          continue;
        }

        let command = graph.insert(
          identity::command_key(app, Some(&record.name)),
          EntityKind::Command,
          record.name.clone(),
          Some(app_id),
          EntityDetail::Command(CommandDetail {
            name:      Some(record.name.clone()),
            help_text: record.help_text.clone(),
          }),
          None,
        )?;
        graph.insert_parameters(
          app,
          Some(&record.name),
          command,
          &record.options,
          &record.values,
        )?;
      }
    }

    Ok(graph)
  }

  fn insert_parameters(
    &mut self,
    app: &str,
    command_name: Option<&str>,
    command: EntityId,
    options: &[OptionRecord],
    values: &[ValueRecord],
  ) -> CoreResult<()> {
    for value in values {
      self.insert(
        identity::value_key(app, command_name, value.index),
        EntityKind::PositionalValue,
        value
          .name
          .clone()
          .unwrap_or_else(|| format!("#{}", value.index)),
        Some(command),
        EntityDetail::Value(ValueDetail {
          index:      value.index,
          name:       value.name.clone().filter(|n| !n.is_empty()),
          required:   value.required,
          hidden:     value.hidden,
          default:    value.default.as_ref().map(display_value),
          help_text:  value.help_text.clone().filter(|h| !h.is_empty()),
          meta_value: value.meta_value.clone().filter(|m| !m.is_empty()),
        }),
        None,
      )?;
    }

    for option in options {
      let long_name = option.name.clone().filter(|n| !n.is_empty());
      let display = match (&long_name, option.short_name) {
        (Some(long), _) => long.clone(),
        (None, Some(short)) => short.to_string(),
        (None, None) => {
          return Err(CoreError::InvalidMetadata(format!(
            "an option of command `{}` in `{app}` has neither a long nor a \
             short name",
            command_name.unwrap_or("<unnamed>")
          )));
        },
      };

      self.insert(
        identity::option_key(
          app,
          command_name,
          long_name.as_deref(),
          option.short_name,
        ),
        EntityKind::Option,
        display,
        Some(command),
        EntityDetail::Option(OptionDetail {
          long_name,
          short_name: option.short_name,
          required: option.required,
          hidden: option.hidden,
          is_switch: option.is_switch(),
          default: option.default.as_ref().map(display_value),
          help_text: option.help_text.clone().filter(|h| !h.is_empty()),
          meta_value: option.meta_value.clone().filter(|m| !m.is_empty()),
        }),
        None,
      )?;
    }

    Ok(())
  }

  fn insert(
    &mut self,
    key: IdentityKey,
    kind: EntityKind,
    name: String,
    parent: Option<EntityId>,
    detail: EntityDetail,
    docs: Option<DocElement>,
  ) -> CoreResult<EntityId> {
    if self.by_key.contains_key(&key) {
      return Err(CoreError::DuplicateIdentity { key, name });
    }

    let id = EntityId(self.entities.len());
    self.by_key.insert(key.clone(), id);
    match parent {
      Some(parent) => self.entities[parent.0].children.push(id),
      None => self.roots.push(id),
    }
    self.entities.push(Entity {
      id,
      key,
      kind,
      name,
      parent,
      children: Vec::new(),
      detail,
    });
    self.raw_docs.push(docs);
    Ok(id)
  }

  /// Get an entity by id. Ids are only handed out by this graph, so the
  /// lookup cannot fail.
  #[must_use]
  pub fn get(&self, id: EntityId) -> &Entity {
    &self.entities[id.0]
  }

  /// Identity-key lookup.
  #[must_use]
  pub fn lookup(&self, key: &IdentityKey) -> Option<EntityId> {
    self.by_key.get(key).copied()
  }

  /// Raw documentation tree as supplied by the documentation reader.
  #[must_use]
  pub fn raw_docs(&self, id: EntityId) -> Option<&DocElement> {
    self.raw_docs[id.0].as_ref()
  }

  #[must_use]
  pub fn parent(&self, id: EntityId) -> Option<&Entity> {
    self.get(id).parent.map(|p| self.get(p))
  }

  /// Children in declaration order.
  pub fn children(&self, id: EntityId) -> impl Iterator<Item = &Entity> {
    self.get(id).children.iter().map(|&c| self.get(c))
  }

  /// All entities of one kind, in creation order.
  pub fn by_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
    self.entities.iter().filter(move |e| e.kind == kind)
  }

  pub fn roots(&self) -> impl Iterator<Item = &Entity> {
    self.roots.iter().map(|&r| self.get(r))
  }

  pub fn iter(&self) -> impl Iterator<Item = &Entity> {
    self.entities.iter()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entities.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entities.is_empty()
  }

  /// Find a type by its full name.
  #[must_use]
  pub fn find_type(&self, full_name: &str) -> Option<EntityId> {
    self.lookup(&identity::type_key(full_name))
  }

  /// The type declaring a member, or the type itself.
  #[must_use]
  pub fn declaring_type(&self, id: EntityId) -> Option<&Entity> {
    let entity = self.get(id);
    match entity.kind {
      EntityKind::Type => Some(entity),
      EntityKind::Namespace
      | EntityKind::Application
      | EntityKind::Command
      | EntityKind::Option
      | EntityKind::PositionalValue => None,
      _ => self.parent(id).filter(|p| p.kind == EntityKind::Type),
    }
  }

  /// The application owning a command-line entity.
  #[must_use]
  pub fn application_of(&self, id: EntityId) -> Option<&Entity> {
    let mut current = Some(self.get(id));
    while let Some(entity) = current {
      if entity.kind == EntityKind::Application {
        return Some(entity);
      }
      current = entity.parent.map(|p| self.get(p));
    }
    None
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]

  use serde_json::json;

  use super::*;

  fn assembly(value: serde_json::Value) -> AssemblyRecord {
    serde_json::from_value(value).unwrap()
  }

  fn sample() -> AssemblyRecord {
    assembly(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "Widget", "members": [
          { "kind": "constructor", "name": "Widget" },
          { "kind": "method", "name": "Run" },
          { "kind": "method", "name": "Run",
            "parameters": [{ "name": "x", "type": "System.Int32" }] },
          { "kind": "property", "name": "Size", "type_name": "System.Int32" }
        ]},
        { "namespace": "Lib.Extra", "name": "Gadget" },
        { "namespace": "Lib", "name": "Other" }
      ]
    }))
  }

  #[test]
  fn test_builds_namespaces_types_and_members() {
    let graph = EntityGraph::from_assemblies(&[sample()]).unwrap();

    let namespaces: Vec<_> = graph
      .by_kind(EntityKind::Namespace)
      .map(|e| e.key.to_string())
      .collect();
    assert_eq!(namespaces, vec!["N:Lib", "N:Lib.Extra"]);

    let widget = graph.find_type("Lib.Widget").unwrap();
    let members: Vec<_> =
      graph.children(widget).map(|e| e.key.to_string()).collect();
    assert_eq!(members, vec![
      "M:Lib.Widget.#ctor",
      "M:Lib.Widget.Run",
      "M:Lib.Widget.Run(System.Int32)",
      "P:Lib.Widget.Size",
    ]);

    let lib = graph.lookup(&IdentityKey::from("N:Lib")).unwrap();
    let types: Vec<_> = graph.children(lib).map(|e| e.name.clone()).collect();
    assert_eq!(types, vec!["Widget", "Other"]);
  }

  #[test]
  fn test_keys_are_stable_across_runs() {
    let first = EntityGraph::from_assemblies(&[sample()]).unwrap();
    let second = EntityGraph::from_assemblies(&[sample()]).unwrap();
    let keys = |g: &EntityGraph| {
      g.iter().map(|e| e.key.clone()).collect::<Vec<_>>()
    };
    assert_eq!(keys(&first), keys(&second));
  }

  #[test]
  fn test_duplicate_signature_is_fatal() {
    let input = assembly(json!({
      "name": "Lib",
      "types": [{ "namespace": "Lib", "name": "Widget", "members": [
        { "kind": "method", "name": "Run",
          "parameters": [{ "name": "a", "type": "System.String" }] },
        { "kind": "method", "name": "Run",
          "parameters": [{ "name": "b", "type": "System.String" }] }
      ]}]
    }));

    let err = EntityGraph::from_assemblies(&[input]).unwrap_err();
    match err {
      CoreError::DuplicateIdentity { key, .. } => {
        assert_eq!(key.as_str(), "M:Lib.Widget.Run(System.String)");
      },
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn test_duplicate_type_across_assemblies_is_fatal() {
    let a = assembly(json!({
      "name": "A", "types": [{ "namespace": "Lib", "name": "Widget" }]
    }));
    let b = assembly(json!({
      "name": "B", "types": [{ "namespace": "Lib", "name": "Widget" }]
    }));
    assert!(matches!(
      EntityGraph::from_assemblies(&[a, b]),
      Err(CoreError::DuplicateIdentity { .. })
    ));
  }

  #[test]
  fn test_application_without_commands_gets_unnamed_command() {
    let app: ApplicationRecord = serde_json::from_value(json!({
      "name": "tool",
      "options": [{ "name": "verbose", "value_type": "System.Boolean" }],
      "values": [{ "index": 0 }]
    }))
    .unwrap();

    let graph = EntityGraph::from_application(&app).unwrap();
    let command = graph
      .lookup(&IdentityKey::from("C:tool:"))
      .map(|id| graph.get(id))
      .unwrap();
    assert_eq!(command.as_command().unwrap().name, None);

    let children: Vec<_> =
      graph.children(command.id).map(|e| e.key.to_string()).collect();
    assert_eq!(children, vec!["V:tool::#0", "O:tool::--verbose"]);
    assert!(
      graph
        .children(command.id)
        .filter_map(Entity::as_option)
        .all(|o| o.is_switch)
    );
  }

  #[test]
  fn test_option_without_any_name_is_invalid() {
    let app: ApplicationRecord = serde_json::from_value(json!({
      "name": "tool",
      "commands": [{ "name": "run", "options": [{ "required": true }] }]
    }))
    .unwrap();
    assert!(matches!(
      EntityGraph::from_application(&app),
      Err(CoreError::InvalidMetadata(_))
    ));
  }

  #[test]
  fn test_hidden_commands_are_skipped() {
    let app: ApplicationRecord = serde_json::from_value(json!({
      "name": "tool",
      "commands": [
        { "name": "run" },
        { "name": "secret", "hidden": true }
      ]
    }))
    .unwrap();
    let graph = EntityGraph::from_application(&app).unwrap();
    assert_eq!(graph.by_kind(EntityKind::Command).count(), 1);
  }

  #[test]
  fn test_short_type_name() {
    assert_eq!(short_type_name("System.String"), "String");
    assert_eq!(
      short_type_name("System.Collections.Generic.List<System.String>"),
      "List<String>"
    );
    assert_eq!(
      short_type_name("System.Collections.Generic.Dictionary<System.String, \
                       System.Int32>"),
      "Dictionary<String, Int32>"
    );
  }

  #[test]
  fn test_signature_label() {
    let graph = EntityGraph::from_assemblies(&[sample()]).unwrap();
    let run = graph
      .lookup(&IdentityKey::from("M:Lib.Widget.Run(System.Int32)"))
      .unwrap();
    assert_eq!(graph.get(run).signature_label(), "Run(Int32)");
  }

  fn overloads() -> AssemblyRecord {
    assembly(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "Widget", "members": [
          { "kind": "method", "name": "Run" },
          { "kind": "method", "name": "Run", "type_parameters": ["T"] }
        ]},
        { "namespace": "Lib", "name": "Money", "kind": "struct", "members": [
          { "kind": "operator", "name": "op_Implicit", "return_type": "System.Int32",
            "parameters": [{ "name": "value", "type": "Lib.Money" }] },
          { "kind": "operator", "name": "op_Implicit", "return_type": "System.Decimal",
            "parameters": [{ "name": "value", "type": "Lib.Money" }] }
        ]}
      ]
    }))
  }

  #[test]
  fn test_generic_and_conversion_overloads_get_distinct_keys() {
    let graph = EntityGraph::from_assemblies(&[overloads()]).unwrap();

    let widget = graph.find_type("Lib.Widget").unwrap();
    let keys: Vec<_> =
      graph.children(widget).map(|e| e.key.to_string()).collect();
    assert_eq!(keys, vec!["M:Lib.Widget.Run", "M:Lib.Widget.Run``1"]);

    let money = graph.find_type("Lib.Money").unwrap();
    let keys: Vec<_> =
      graph.children(money).map(|e| e.key.to_string()).collect();
    assert_eq!(keys, vec![
      "M:Lib.Money.op_Implicit(Lib.Money)~System.Int32",
      "M:Lib.Money.op_Implicit(Lib.Money)~System.Decimal",
    ]);
  }

  #[test]
  fn test_signature_labels_of_generic_and_conversion_members() {
    let graph = EntityGraph::from_assemblies(&[overloads()]).unwrap();
    let label = |key: &str| {
      graph
        .get(graph.lookup(&IdentityKey::from(key)).unwrap())
        .signature_label()
    };

    assert_eq!(label("M:Lib.Widget.Run"), "Run()");
    assert_eq!(label("M:Lib.Widget.Run``1"), "Run<T>()");
    assert_eq!(
      label("M:Lib.Money.op_Implicit(Lib.Money)~System.Decimal"),
      "op_Implicit(Money) → Decimal"
    );
  }
}
