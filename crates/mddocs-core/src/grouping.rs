//! Overload and command grouping.
//!
//! Overloadable members (methods, constructors, operators and indexers) of
//! a type are clustered by kind and declared name. Constructors form a
//! single group per type. Commands are collected per application.

use std::collections::HashMap;

use crate::{
  entity::{EntityGraph, EntityId, EntityKind},
  identity::{self, IdentityKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
  Method,
  Constructor,
  Operator,
  Indexer,
}

impl GroupKind {
  /// Letter used in the group's identity key.
  #[must_use]
  pub const fn code(self) -> char {
    match self {
      Self::Method => 'M',
      Self::Constructor => 'C',
      Self::Operator => 'O',
      Self::Indexer => 'I',
    }
  }

  #[must_use]
  pub const fn from_entity_kind(kind: EntityKind) -> Option<Self> {
    match kind {
      EntityKind::Method => Some(Self::Method),
      EntityKind::Constructor => Some(Self::Constructor),
      EntityKind::Operator => Some(Self::Operator),
      EntityKind::Indexer => Some(Self::Indexer),
      _ => None,
    }
  }

  #[must_use]
  pub const fn member_kind(self) -> EntityKind {
    match self {
      Self::Method => EntityKind::Method,
      Self::Constructor => EntityKind::Constructor,
      Self::Operator => EntityKind::Operator,
      Self::Indexer => EntityKind::Indexer,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

/// A set of overloads sharing kind and declared name within one type.
#[derive(Debug, Clone)]
pub struct OverloadGroup {
  pub id:      GroupId,
  pub key:     IdentityKey,
  pub kind:    GroupKind,
  /// Declared name shared by all members.
  pub name:    String,
  pub owner:   EntityId,
  /// Members in declaration order; never empty.
  pub members: Vec<EntityId>,
}

/// Result of the grouping pass. Read-only once built.
#[derive(Debug, Default)]
pub struct Grouping {
  groups:    Vec<OverloadGroup>,
  by_member: HashMap<EntityId, GroupId>,
  by_key:    HashMap<IdentityKey, GroupId>,
  by_owner:  HashMap<EntityId, Vec<GroupId>>,
  commands:  HashMap<EntityId, Vec<EntityId>>,
}

impl Grouping {
  /// Group the members of every type and the commands of every
  /// application in the graph.
  #[must_use]
  pub fn build(graph: &EntityGraph) -> Self {
    let mut grouping = Self::default();

    for ty in graph.by_kind(EntityKind::Type) {
      let type_name = ty.as_type().map(|t| t.full_name.as_str()).unwrap_or_default();
      let mut local: HashMap<(GroupKind, &str), GroupId> = HashMap::new();

      for member in graph.children(ty.id) {
        let Some(kind) = GroupKind::from_entity_kind(member.kind) else {
          continue;
        };
        let name = if kind == GroupKind::Constructor {
          "#ctor"
        } else {
          member.name.as_str()
        };

        let group_id = *local.entry((kind, name)).or_insert_with(|| {
          let id = GroupId(grouping.groups.len());
          let key = identity::group_key(kind.code(), type_name, name);
          grouping.by_key.insert(key.clone(), id);
          grouping.by_owner.entry(ty.id).or_default().push(id);
          grouping.groups.push(OverloadGroup {
            id,
            key,
            kind,
            name: member.name.clone(),
            owner: ty.id,
            members: Vec::new(),
          });
          id
        });

        grouping.groups[group_id.0].members.push(member.id);
        grouping.by_member.insert(member.id, group_id);
      }
    }

    for application in graph.by_kind(EntityKind::Application) {
      let commands = graph
        .children(application.id)
        .filter(|c| c.kind == EntityKind::Command)
        .map(|c| c.id)
        .collect();
      grouping.commands.insert(application.id, commands);
    }

    log::debug!("Built {} overload group(s)", grouping.groups.len());
    grouping
  }

  #[must_use]
  pub fn get(&self, id: GroupId) -> &OverloadGroup {
    &self.groups[id.0]
  }

  /// The group a member belongs to.
  #[must_use]
  pub fn group_of(&self, member: EntityId) -> Option<&OverloadGroup> {
    self.by_member.get(&member).map(|&g| self.get(g))
  }

  #[must_use]
  pub fn lookup(&self, key: &IdentityKey) -> Option<&OverloadGroup> {
    self.by_key.get(key).map(|&g| self.get(g))
  }

  /// Groups owned by a type, in order of first appearance.
  pub fn groups_of(&self, owner: EntityId) -> impl Iterator<Item = &OverloadGroup> {
    self
      .by_owner
      .get(&owner)
      .into_iter()
      .flatten()
      .map(|&g| self.get(g))
  }

  pub fn iter(&self) -> impl Iterator<Item = &OverloadGroup> {
    self.groups.iter()
  }

  /// Commands of an application in declaration order. A single-command
  /// application has exactly one unnamed command.
  #[must_use]
  pub fn commands_of(&self, application: EntityId) -> &[EntityId] {
    self
      .commands
      .get(&application)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Whether the application consists of its implicit unnamed command.
  #[must_use]
  pub fn is_single_command(
    &self,
    graph: &EntityGraph,
    application: EntityId,
  ) -> bool {
    matches!(
      self.commands_of(application),
      [only] if graph.get(*only).as_command().is_some_and(|c| c.name.is_none())
    )
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use serde_json::json;

  use super::*;
  use crate::metadata::{ApplicationRecord, AssemblyRecord};

  fn graph() -> EntityGraph {
    let assembly: AssemblyRecord = serde_json::from_value(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "Widget", "members": [
          { "kind": "method", "name": "Run",
            "parameters": [{ "name": "a", "type": "System.String" }] },
          { "kind": "constructor", "name": "Widget" },
          { "kind": "method", "name": "Stop" },
          { "kind": "property", "name": "Size" },
          { "kind": "method", "name": "Run" },
          { "kind": "constructor", "name": "Widget",
            "parameters": [{ "name": "size", "type": "System.Int32" }] },
          { "kind": "operator", "name": "op_Equality",
            "parameters": [
              { "name": "a", "type": "Lib.Widget" },
              { "name": "b", "type": "Lib.Widget" }
            ]},
          { "kind": "indexer", "name": "Item",
            "parameters": [{ "name": "i", "type": "System.Int32" }] }
        ]},
        { "namespace": "Lib", "name": "Other", "members": [
          { "kind": "method", "name": "Run" }
        ]}
      ]
    }))
    .unwrap();
    EntityGraph::from_assemblies(&[assembly]).unwrap()
  }

  #[test]
  fn test_groups_in_order_of_first_appearance() {
    let graph = graph();
    let grouping = Grouping::build(&graph);
    let widget = graph.find_type("Lib.Widget").unwrap();

    let keys: Vec<_> = grouping
      .groups_of(widget)
      .map(|g| g.key.to_string())
      .collect();
    assert_eq!(keys, vec![
      "G:M:Lib.Widget.Run",
      "G:C:Lib.Widget.#ctor",
      "G:M:Lib.Widget.Stop",
      "G:O:Lib.Widget.op_Equality",
      "G:I:Lib.Widget.Item",
    ]);
  }

  #[test]
  fn test_members_keep_declaration_order() {
    let graph = graph();
    let grouping = Grouping::build(&graph);
    let run = grouping
      .lookup(&IdentityKey::from("G:M:Lib.Widget.Run"))
      .unwrap();
    let members: Vec<_> = run
      .members
      .iter()
      .map(|&m| graph.get(m).key.to_string())
      .collect();
    assert_eq!(members, vec![
      "M:Lib.Widget.Run(System.String)",
      "M:Lib.Widget.Run"
    ]);
  }

  #[test]
  fn test_every_overloadable_member_is_in_exactly_one_group_of_its_owner() {
    let graph = graph();
    let grouping = Grouping::build(&graph);

    for member in graph.iter().filter(|e| e.kind.is_overloadable()) {
      let containing: Vec<_> = grouping
        .iter()
        .filter(|g| g.members.contains(&member.id))
        .collect();
      assert_eq!(containing.len(), 1, "{}", member.key);
      assert_eq!(Some(containing[0].owner), member.parent);
    }

    let size = graph.lookup(&IdentityKey::from("P:Lib.Widget.Size")).unwrap();
    assert!(grouping.group_of(size).is_none());
  }

  #[test]
  fn test_single_member_still_forms_group() {
    let graph = graph();
    let grouping = Grouping::build(&graph);
    let other = grouping
      .lookup(&IdentityKey::from("G:M:Lib.Other.Run"))
      .unwrap();
    assert_eq!(other.members.len(), 1);
  }

  #[test]
  fn test_commands_in_declaration_order() {
    let app: ApplicationRecord = serde_json::from_value(json!({
      "name": "tool",
      "commands": [{ "name": "build" }, { "name": "clean" }, { "name": "add" }]
    }))
    .unwrap();
    let graph = EntityGraph::from_application(&app).unwrap();
    let grouping = Grouping::build(&graph);
    let app_id = graph.lookup(&IdentityKey::from("A:tool")).unwrap();

    let names: Vec<_> = grouping
      .commands_of(app_id)
      .iter()
      .map(|&c| graph.get(c).name.clone())
      .collect();
    assert_eq!(names, vec!["build", "clean", "add"]);
    assert!(!grouping.is_single_command(&graph, app_id));
  }

  #[test]
  fn test_application_without_commands_is_single_command() {
    let app: ApplicationRecord =
      serde_json::from_value(json!({ "name": "tool" })).unwrap();
    let graph = EntityGraph::from_application(&app).unwrap();
    let grouping = Grouping::build(&graph);
    let app_id = graph.lookup(&IdentityKey::from("A:tool")).unwrap();
    assert_eq!(grouping.commands_of(app_id).len(), 1);
    assert!(grouping.is_single_command(&graph, app_id));
  }
}
