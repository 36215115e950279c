//! Documentation payloads and the documentation merge.
//!
//! The documentation reader hands over a raw tree of tagged elements per
//! entity ([`DocElement`]). [`merge`] turns every tree into a typed
//! [`DocPayload`], matches parameter descriptions against the entity's
//! declared parameters, resolves `inheritdoc` and turns inline references
//! into identity keys. References are not resolved to output units here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  diagnostics::{Diagnostic, Diagnostics},
  entity::{EntityGraph, EntityId, EntityKind},
  grouping::GroupKind,
  identity::{self, IdentityKey},
  metadata::TypeKind,
  text,
};

/// Raw documentation element as produced by the documentation reader.
///
/// Text content is carried by `#text` elements. Attributes of interest
/// (`name`, `cref`, `language`) are lifted into fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocElement {
  pub tag:      String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cref:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub text:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub language: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<DocElement>,
}

impl DocElement {
  /// Concatenated text of this element and all its descendants.
  #[must_use]
  pub fn inner_text(&self) -> String {
    let mut out = self.text.clone().unwrap_or_default();
    for child in &self.children {
      out.push_str(&child.inner_text());
    }
    out
  }
}

/// Inline documentation content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocNode {
  Text(String),
  /// Inline code (`<c>`).
  Code(String),
  CodeBlock {
    language: Option<String>,
    code:     String,
  },
  Paragraph(Vec<DocNode>),
  /// Reference to a parameter or type parameter of the documented entity.
  ParamRef(String),
  /// Reference to another entity. `text` overrides the link text.
  Reference {
    key:  IdentityKey,
    text: Option<String>,
  },
  /// An element outside the recognized vocabulary; its content is kept.
  Unknown {
    tag:      String,
    children: Vec<DocNode>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlockKind {
  Summary,
  Remarks,
  Parameter(String),
  TypeParameter(String),
  Returns,
  Value,
  Example,
  Exception(IdentityKey),
  SeeAlso(IdentityKey),
  /// Any other top-level tag, kept as opaque free text.
  FreeText(String),
}

impl DocBlockKind {
  /// Section name used in diagnostics.
  #[must_use]
  pub const fn section(&self) -> &'static str {
    match self {
      Self::Summary => "summary",
      Self::Remarks => "remarks",
      Self::Parameter(_) => "param",
      Self::TypeParameter(_) => "typeparam",
      Self::Returns => "returns",
      Self::Value => "value",
      Self::Example => "example",
      Self::Exception(_) => "exception",
      Self::SeeAlso(_) => "seealso",
      Self::FreeText(_) => "text",
    }
  }

  /// Blocks that may appear at most once per entity.
  const fn is_unique(&self) -> bool {
    matches!(
      self,
      Self::Summary
        | Self::Remarks
        | Self::Returns
        | Self::Value
        | Self::Parameter(_)
        | Self::TypeParameter(_)
    )
  }

  /// Whether an inherited block of kind `other` is shadowed by an explicit
  /// block of this kind.
  fn shadows(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Example, Self::Example) => true,
      (Self::FreeText(a), Self::FreeText(b)) => a == b,
      _ => self == other,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
  pub kind:    DocBlockKind,
  pub content: Vec<DocNode>,
}

/// Ordered, typed documentation of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocPayload {
  blocks: Vec<DocBlock>,
}

impl DocPayload {
  #[must_use]
  pub fn new(blocks: Vec<DocBlock>) -> Self {
    Self { blocks }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  #[must_use]
  pub fn blocks(&self) -> &[DocBlock] {
    &self.blocks
  }

  fn find(&self, kind: &DocBlockKind) -> Option<&[DocNode]> {
    self
      .blocks
      .iter()
      .find(|b| &b.kind == kind)
      .map(|b| b.content.as_slice())
  }

  #[must_use]
  pub fn summary(&self) -> Option<&[DocNode]> {
    self.find(&DocBlockKind::Summary)
  }

  #[must_use]
  pub fn remarks(&self) -> Option<&[DocNode]> {
    self.find(&DocBlockKind::Remarks)
  }

  #[must_use]
  pub fn returns(&self) -> Option<&[DocNode]> {
    self.find(&DocBlockKind::Returns)
  }

  #[must_use]
  pub fn value(&self) -> Option<&[DocNode]> {
    self.find(&DocBlockKind::Value)
  }

  #[must_use]
  pub fn parameter(&self, name: &str) -> Option<&[DocNode]> {
    self.find(&DocBlockKind::Parameter(name.to_string()))
  }

  #[must_use]
  pub fn type_parameter(&self, name: &str) -> Option<&[DocNode]> {
    self.find(&DocBlockKind::TypeParameter(name.to_string()))
  }

  pub fn examples(&self) -> impl Iterator<Item = &[DocNode]> {
    self
      .blocks
      .iter()
      .filter(|b| b.kind == DocBlockKind::Example)
      .map(|b| b.content.as_slice())
  }

  pub fn exceptions(&self) -> impl Iterator<Item = (&IdentityKey, &[DocNode])> {
    self.blocks.iter().filter_map(|b| {
      match &b.kind {
        DocBlockKind::Exception(key) => Some((key, b.content.as_slice())),
        _ => None,
      }
    })
  }

  pub fn see_also(&self) -> impl Iterator<Item = (&IdentityKey, &[DocNode])> {
    self.blocks.iter().filter_map(|b| {
      match &b.kind {
        DocBlockKind::SeeAlso(key) => Some((key, b.content.as_slice())),
        _ => None,
      }
    })
  }

  pub fn free_text(&self) -> impl Iterator<Item = (&str, &[DocNode])> {
    self.blocks.iter().filter_map(|b| {
      match &b.kind {
        DocBlockKind::FreeText(tag) => Some((tag.as_str(), b.content.as_slice())),
        _ => None,
      }
    })
  }
}

/// Merged documentation of every entity, indexed by [`EntityId`].
#[derive(Debug, Default)]
pub struct Documentation {
  payloads: Vec<DocPayload>,
}

impl Documentation {
  /// Payload of an entity; entities without documentation have an empty
  /// payload.
  #[must_use]
  pub fn get(&self, id: EntityId) -> &DocPayload {
    &self.payloads[id.index()]
  }
}

/// Turn a reference found in documentation into an identity key.
///
/// Prefixed ids are used as they are, except that a method or indexer id
/// without a parameter list that is not itself an entity maps to the key of
/// the overload group of that name. Bare names are tried as a type full
/// name, then as a unique simple type name, then as `Type.Member`. Anything
/// else is returned verbatim and will not resolve later.
#[must_use]
pub fn resolve_reference_text(graph: &EntityGraph, reference: &str) -> IdentityKey {
  let reference = reference.trim();
  let key = IdentityKey::new(reference);

  if let Some(prefix) = key.prefix() {
    if graph.lookup(&key).is_some() || !matches!(prefix, 'M' | 'P') {
      return key;
    }
    if !reference.contains('(')
      && let Some((type_name, member)) = key.body().rsplit_once('.')
      && let Some(group) =
        overload_group_key(graph, type_name, identity::strip_arity(member))
    {
      return group;
    }
    if let Some(conversion) = unique_conversion(graph, &key) {
      return conversion;
    }
    return key;
  }

  if let Some(id) = graph.find_type(reference) {
    return graph.get(id).key.clone();
  }
  if let Some(id) = unique_type_by_simple_name(graph, reference) {
    return graph.get(id).key.clone();
  }

  if let Some((type_name, member)) = reference.rsplit_once('.') {
    let owner = graph
      .find_type(type_name)
      .or_else(|| unique_type_by_simple_name(graph, type_name));
    if let Some(owner) = owner {
      let full_name = graph
        .get(owner)
        .as_type()
        .map(|t| t.full_name.clone())
        .unwrap_or_default();
      let matches: Vec<_> = graph
        .children(owner)
        .filter(|c| c.name == member)
        .collect();
      match matches.as_slice() {
        [single] if !single.kind.is_overloadable() => {
          return single.key.clone();
        },
        [first, ..] if first.kind.is_overloadable() => {
          if let Some(group) = GroupKind::from_entity_kind(first.kind) {
            return identity::group_key(group.code(), &full_name, member);
          }
        },
        _ => {},
      }
    }
  }

  key
}

/// A conversion operator id written without its `~ReturnType` suffix
/// resolves when exactly one conversion matches.
fn unique_conversion(graph: &EntityGraph, key: &IdentityKey) -> Option<IdentityKey> {
  let body = key.body();
  if key.prefix() != Some('M')
    || body.contains('~')
    || !(body.contains(".op_Implicit") || body.contains(".op_Explicit"))
  {
    return None;
  }
  let (type_name, _) = body.split_once('(').unwrap_or((body, ""));
  let (type_name, _) = type_name.rsplit_once('.')?;
  let owner = graph.find_type(type_name)?;

  let prefix = format!("{}~", key.as_str());
  let mut found = graph
    .children(owner)
    .filter(|c| c.key.as_str().starts_with(&prefix));
  let first = found.next()?;
  if found.next().is_some() {
    return None;
  }
  Some(first.key.clone())
}

fn unique_type_by_simple_name(graph: &EntityGraph, name: &str) -> Option<EntityId> {
  let mut found = graph.by_kind(EntityKind::Type).filter(|t| t.name == name);
  let first = found.next()?;
  if found.next().is_some() {
    return None;
  }
  Some(first.id)
}

fn overload_group_key(
  graph: &EntityGraph,
  type_name: &str,
  member: &str,
) -> Option<IdentityKey> {
  let owner = graph.find_type(type_name)?;
  let kind = graph
    .children(owner)
    .filter(|c| c.kind.is_overloadable())
    .find(|c| {
      if member == "#ctor" {
        c.kind == EntityKind::Constructor
      } else {
        c.kind != EntityKind::Constructor && c.name == member
      }
    })?
    .kind;
  let group = GroupKind::from_entity_kind(kind)?;
  Some(identity::group_key(group.code(), type_name, member))
}

/// Explicit documentation of one entity plus its `inheritdoc` directive.
#[derive(Debug, Default)]
struct ParsedDocs {
  explicit: Vec<DocBlock>,
  /// `Some` when an `inheritdoc` block was present; the inner value is its
  /// optional `cref`.
  inherit:  Option<Option<String>>,
}

/// Produce the documentation payload of every entity in the graph.
///
/// Recoverable problems (unmatched parameter tags, duplicate sections,
/// unresolvable `inheritdoc` targets) are recorded in `diagnostics`.
pub fn merge(graph: &EntityGraph, diagnostics: &mut Diagnostics) -> Documentation {
  let parsed: Vec<ParsedDocs> = graph
    .iter()
    .map(|entity| parse_entity(graph, entity.id, diagnostics))
    .collect();

  let mut merger = Merger {
    graph,
    parsed: &parsed,
    done: vec![None; graph.len()],
    in_progress: Vec::new(),
    cyclic: HashSet::new(),
    diagnostics,
  };

  let payloads = graph.iter().map(|e| merger.resolve(e.id)).collect();
  Documentation { payloads }
}

struct Merger<'a> {
  graph:       &'a EntityGraph,
  parsed:      &'a [ParsedDocs],
  done:        Vec<Option<DocPayload>>,
  /// Entities whose inheritance is being resolved, outermost first.
  in_progress: Vec<EntityId>,
  cyclic:      HashSet<EntityId>,
  diagnostics: &'a mut Diagnostics,
}

impl Merger<'_> {
  /// Payload of `id` with inherited blocks merged in. Every entity on an
  /// inheritance cycle keeps its explicit blocks only, whichever member of
  /// the cycle is reached first.
  fn resolve(&mut self, id: EntityId) -> DocPayload {
    if let Some(done) = &self.done[id.index()] {
      return done.clone();
    }

    let all = self.parsed;
    let parsed = &all[id.index()];
    let mut blocks = parsed.explicit.clone();

    if let Some(cref) = &parsed.inherit
      && !self.cyclic.contains(&id)
    {
      self.in_progress.push(id);
      let source = self.inheritance_source(id, cref.as_deref());
      let cycle_start = source
        .and_then(|source| self.in_progress.iter().position(|&e| e == source));

      if let Some(start) = cycle_start {
        log::debug!(
          "Inheritance cycle at `{}`, keeping explicit documentation only",
          self.graph.get(id).key
        );
        self.cyclic.extend(self.in_progress[start..].iter().copied());
      } else if let Some(source) = source {
        let inherited = self.resolve(source);
        if !self.cyclic.contains(&id) {
          self.inherit_blocks(id, &mut blocks, inherited);
        }
      }
      self.in_progress.pop();
    }

    let payload = DocPayload::new(blocks);
    self.done[id.index()] = Some(payload.clone());
    payload
  }

  fn inherit_blocks(&self, id: EntityId, blocks: &mut Vec<DocBlock>, inherited: DocPayload) {
    let entity = self.graph.get(id);
    for block in inherited.blocks {
      let declared = match &block.kind {
        DocBlockKind::Parameter(name) => {
          entity.parameters().iter().any(|p| &p.name == name)
        },
        DocBlockKind::TypeParameter(name) => {
          entity.type_parameters().iter().any(|p| p == name)
        },
        _ => true,
      };
      if declared && !blocks.iter().any(|b| b.kind.shadows(&block.kind)) {
        blocks.push(block);
      }
    }
  }

  fn inheritance_source(
    &mut self,
    id: EntityId,
    cref: Option<&str>,
  ) -> Option<EntityId> {
    if let Some(cref) = cref {
      let key = resolve_reference_text(self.graph, cref);
      let source = self.graph.lookup(&key);
      if source.is_none() {
        self.diagnostics.push(Diagnostic::UnresolvedReference {
          origin:    self.graph.get(id).key.clone(),
          reference: cref.to_string(),
        });
      }
      return source;
    }

    let entity = self.graph.get(id);
    let owner = if entity.kind == EntityKind::Type {
      entity
    } else {
      self.graph.declaring_type(id)?
    };

    for candidate in ancestor_types(self.graph, owner.id) {
      if entity.kind == EntityKind::Type {
        return Some(candidate);
      }
      let found = self.graph.children(candidate).find(|c| {
        c.kind == entity.kind
          && (c.kind == EntityKind::Constructor || c.name == entity.name)
          && c.parameters().iter().map(|p| &p.type_name).eq(
            entity.parameters().iter().map(|p| &p.type_name),
          )
      });
      if let Some(found) = found {
        return Some(found.id);
      }
    }

    log::debug!(
      "No inheritance source for `{}`, keeping explicit documentation only",
      entity.key
    );
    None
  }
}

/// Base types of a type (nearest first) followed by the interfaces of the
/// type and of its bases, restricted to types present in the graph.
fn ancestor_types(graph: &EntityGraph, id: EntityId) -> Vec<EntityId> {
  let mut seen = HashSet::from([id]);
  let mut bases = Vec::new();

  let mut current = graph.get(id).as_type();
  while let Some(ty) = current {
    let Some(base) = ty.base_type.as_deref().and_then(|b| graph.find_type(b))
    else {
      break;
    };
    if !seen.insert(base) {
      break;
    }
    bases.push(base);
    current = graph.get(base).as_type();
  }

  let mut ordered = bases.clone();
  for owner in std::iter::once(id).chain(bases) {
    let Some(ty) = graph.get(owner).as_type() else {
      continue;
    };
    for interface in &ty.interfaces {
      if let Some(found) = graph.find_type(interface)
        && seen.insert(found)
      {
        ordered.push(found);
      }
    }
  }
  ordered
}

fn parse_entity(
  graph: &EntityGraph,
  id: EntityId,
  diagnostics: &mut Diagnostics,
) -> ParsedDocs {
  let Some(root) = graph.raw_docs(id) else {
    return ParsedDocs::default();
  };
  let entity = graph.get(id);

  let elements: &[DocElement] = if matches!(root.tag.as_str(), "doc" | "member")
  {
    &root.children
  } else {
    std::slice::from_ref(root)
  };

  // Delegates document the parameters of their invoke signature, which the
  // type record does not carry.
  let check_parameters = entity
    .as_type()
    .is_none_or(|ty| ty.kind != TypeKind::Delegate);

  let mut parsed = ParsedDocs::default();
  for element in elements {
    let kind = match element.tag.as_str() {
      "summary" => DocBlockKind::Summary,
      "remarks" => DocBlockKind::Remarks,
      "returns" => DocBlockKind::Returns,
      "value" => DocBlockKind::Value,
      "example" => DocBlockKind::Example,
      "param" => DocBlockKind::Parameter(element.name.clone().unwrap_or_default()),
      "typeparam" => {
        DocBlockKind::TypeParameter(element.name.clone().unwrap_or_default())
      },
      "exception" => {
        DocBlockKind::Exception(resolve_reference_text(
          graph,
          element.cref.as_deref().unwrap_or_default(),
        ))
      },
      "seealso" => {
        DocBlockKind::SeeAlso(resolve_reference_text(
          graph,
          element.cref.as_deref().unwrap_or_default(),
        ))
      },
      "inheritdoc" => {
        parsed.inherit = Some(element.cref.clone());
        continue;
      },
      "#text" => {
        if element.inner_text().trim().is_empty() {
          continue;
        }
        DocBlockKind::FreeText("text".to_string())
      },
      other => DocBlockKind::FreeText(other.to_string()),
    };

    if check_parameters {
      let declared = match &kind {
        DocBlockKind::Parameter(name) => {
          Some(entity.parameters().iter().any(|p| &p.name == name))
        },
        DocBlockKind::TypeParameter(name) => {
          Some(entity.type_parameters().iter().any(|p| p == name))
        },
        _ => None,
      };
      if declared == Some(false) {
        let (DocBlockKind::Parameter(name) | DocBlockKind::TypeParameter(name)) =
          &kind
        else {
          continue;
        };
        diagnostics.push(Diagnostic::UnmatchedParameter {
          entity:    entity.key.clone(),
          parameter: name.clone(),
        });
        continue;
      }
    }

    if kind.is_unique() && parsed.explicit.iter().any(|b| b.kind == kind) {
      diagnostics.push(Diagnostic::DuplicateSection {
        entity:  entity.key.clone(),
        section: kind.section(),
      });
      continue;
    }

    let content = if element.tag == "#text" {
      convert_nodes(graph, std::slice::from_ref(element))
    } else {
      convert_nodes(graph, &element.children)
    };
    parsed.explicit.push(DocBlock { kind, content });
  }

  parsed
}

fn convert_nodes(graph: &EntityGraph, elements: &[DocElement]) -> Vec<DocNode> {
  let mut nodes: Vec<DocNode> = elements
    .iter()
    .map(|e| convert_node(graph, e))
    .collect();
  trim_edges(&mut nodes);
  nodes
}

fn convert_node(graph: &EntityGraph, element: &DocElement) -> DocNode {
  match element.tag.as_str() {
    "#text" => DocNode::Text(text::normalize_whitespace(
      element.text.as_deref().unwrap_or_default(),
    )),
    "c" => {
      DocNode::Code(
        text::normalize_whitespace(&element.inner_text()).trim().to_string(),
      )
    },
    "code" => {
      DocNode::CodeBlock {
        language: element.language.clone(),
        code:     text::dedent(&element.inner_text()),
      }
    },
    "para" => DocNode::Paragraph(convert_nodes(graph, &element.children)),
    "paramref" | "typeparamref" => {
      DocNode::ParamRef(element.name.clone().unwrap_or_default())
    },
    "see" | "seealso" if element.cref.is_some() => {
      let label = text::normalize_whitespace(&element.inner_text());
      let label = label.trim();
      DocNode::Reference {
        key:  resolve_reference_text(
          graph,
          element.cref.as_deref().unwrap_or_default(),
        ),
        text: (!label.is_empty()).then(|| label.to_string()),
      }
    },
    tag => {
      DocNode::Unknown {
        tag:      tag.to_string(),
        children: convert_nodes(graph, &element.children),
      }
    },
  }
}

/// Trim whitespace at the start and end of a run of inline nodes and drop
/// text nodes left empty.
fn trim_edges(nodes: &mut Vec<DocNode>) {
  if let Some(DocNode::Text(first)) = nodes.first_mut() {
    *first = first.trim_start().to_string();
  }
  if let Some(DocNode::Text(last)) = nodes.last_mut() {
    *last = last.trim_end().to_string();
  }
  nodes.retain(|n| !matches!(n, DocNode::Text(t) if t.is_empty()));
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use serde_json::json;

  use super::*;
  use crate::metadata::AssemblyRecord;

  fn graph(value: serde_json::Value) -> EntityGraph {
    let assembly: AssemblyRecord = serde_json::from_value(value).unwrap();
    EntityGraph::from_assemblies(&[assembly]).unwrap()
  }

  fn text(s: &str) -> serde_json::Value {
    json!({ "tag": "#text", "text": s })
  }

  fn payload<'a>(
    graph: &EntityGraph,
    docs: &'a Documentation,
    key: &str,
  ) -> &'a DocPayload {
    docs.get(graph.lookup(&IdentityKey::from(key)).unwrap())
  }

  #[test]
  fn test_unmatched_parameter_is_dropped_with_warning() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [{ "namespace": "Lib", "name": "Widget", "members": [
        { "kind": "method", "name": "Run",
          "parameters": [
            { "name": "a", "type": "System.Int32" },
            { "name": "b", "type": "System.Int32" }
          ],
          "docs": { "tag": "doc", "children": [
            { "tag": "param", "name": "a", "children": [text("first")] },
            { "tag": "param", "name": "c", "children": [text("nope")] }
          ]}
        }
      ]}]
    }));

    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    let run = payload(&graph, &docs, "M:Lib.Widget.Run(System.Int32,System.Int32)");

    assert!(run.parameter("a").is_some());
    assert!(run.parameter("c").is_none());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
      diagnostics.iter().next().unwrap(),
      &Diagnostic::UnmatchedParameter {
        entity:    IdentityKey::from(
          "M:Lib.Widget.Run(System.Int32,System.Int32)"
        ),
        parameter: "c".to_string(),
      }
    );
  }

  #[test]
  fn test_parameter_match_is_case_sensitive() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [{ "namespace": "Lib", "name": "Widget", "members": [
        { "kind": "method", "name": "Run",
          "parameters": [{ "name": "value", "type": "System.Int32" }],
          "docs": { "tag": "doc", "children": [
            { "tag": "param", "name": "Value", "children": [text("x")] }
          ]}
        }
      ]}]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    let run = payload(&graph, &docs, "M:Lib.Widget.Run(System.Int32)");
    assert!(run.parameter("value").is_none());
    assert_eq!(diagnostics.summary()["unmatched-parameter"], 1);
  }

  #[test]
  fn test_duplicate_summary_is_dropped() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [{ "namespace": "Lib", "name": "Widget",
        "docs": { "tag": "doc", "children": [
          { "tag": "summary", "children": [text("first")] },
          { "tag": "summary", "children": [text("second")] }
        ]}
      }]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    let widget = payload(&graph, &docs, "T:Lib.Widget");
    assert_eq!(widget.summary().unwrap(), &[DocNode::Text(
      "first".to_string()
    )]);
    assert_eq!(diagnostics.summary()["duplicate-section"], 1);
  }

  #[test]
  fn test_unknown_tags_become_free_text_and_whitespace_is_normalized() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [{ "namespace": "Lib", "name": "Widget",
        "docs": { "tag": "doc", "children": [
          { "tag": "summary", "children": [
            text("\n   Creates   a\n   widget using "),
            { "tag": "c", "children": [text("new")] },
            text(".\n  ")
          ]},
          { "tag": "note", "children": [text("Careful.")] },
          { "tag": "example", "children": [
            { "tag": "code", "language": "csharp",
              "text": "\n    var w = new Widget();\n    w.Run();\n  " }
          ]}
        ]}
      }]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    let widget = payload(&graph, &docs, "T:Lib.Widget");

    assert_eq!(widget.summary().unwrap(), &[
      DocNode::Text("Creates a widget using ".to_string()),
      DocNode::Code("new".to_string()),
      DocNode::Text(".".to_string()),
    ]);
    let free: Vec<_> = widget.free_text().map(|(tag, _)| tag).collect();
    assert_eq!(free, vec!["note"]);
    let example = widget.examples().next().unwrap();
    assert_eq!(example, &[DocNode::CodeBlock {
      language: Some("csharp".to_string()),
      code:     "var w = new Widget();\nw.Run();".to_string(),
    }]);
    assert!(diagnostics.is_empty());
  }

  #[test]
  fn test_inline_references_are_resolved_textually() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "Widget", "members": [
          { "kind": "method", "name": "Run" },
          { "kind": "method", "name": "Run",
            "parameters": [{ "name": "x", "type": "System.Int32" }] },
          { "kind": "property", "name": "Size" }
        ]},
        { "namespace": "Lib", "name": "Gadget",
          "docs": { "tag": "doc", "children": [
            { "tag": "summary", "children": [
              { "tag": "see", "cref": "T:Lib.Widget" },
              { "tag": "see", "cref": "Widget" },
              { "tag": "see", "cref": "Widget.Size" },
              { "tag": "see", "cref": "Widget.Run" },
              { "tag": "see", "cref": "M:Lib.Widget.Run" },
              { "tag": "see", "cref": "Nowhere", "children": [text("x")] }
            ]}
          ]}
        }
      ]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    let gadget = payload(&graph, &docs, "T:Lib.Gadget");

    let keys: Vec<_> = gadget
      .summary()
      .unwrap()
      .iter()
      .filter_map(|n| {
        match n {
          DocNode::Reference { key, .. } => Some(key.to_string()),
          _ => None,
        }
      })
      .collect();
    assert_eq!(keys, vec![
      "T:Lib.Widget",
      "T:Lib.Widget",
      "P:Lib.Widget.Size",
      "G:M:Lib.Widget.Run",
      "M:Lib.Widget.Run",
      "Nowhere",
    ]);
  }

  #[test]
  fn test_inheritdoc_from_base_member_with_explicit_override() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "Base", "members": [
          { "kind": "method", "name": "Run",
            "parameters": [{ "name": "count", "type": "System.Int32" }],
            "docs": { "tag": "doc", "children": [
              { "tag": "summary", "children": [text("Base summary.")] },
              { "tag": "remarks", "children": [text("Base remarks.")] },
              { "tag": "param", "name": "count", "children": [text("How many.")] }
            ]}
          }
        ]},
        { "namespace": "Lib", "name": "Derived", "base_type": "Lib.Base",
          "members": [
          { "kind": "method", "name": "Run",
            "parameters": [{ "name": "count", "type": "System.Int32" }],
            "docs": { "tag": "doc", "children": [
              { "tag": "inheritdoc" },
              { "tag": "remarks", "children": [text("Derived remarks.")] }
            ]}
          }
        ]}
      ]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    let run = payload(&graph, &docs, "M:Lib.Derived.Run(System.Int32)");

    assert_eq!(run.summary().unwrap(), &[DocNode::Text(
      "Base summary.".to_string()
    )]);
    assert_eq!(run.remarks().unwrap(), &[DocNode::Text(
      "Derived remarks.".to_string()
    )]);
    assert!(run.parameter("count").is_some());
  }

  #[test]
  fn test_inheritdoc_falls_back_to_interfaces() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "IRunner", "kind": "interface",
          "members": [
          { "kind": "method", "name": "Run",
            "docs": { "tag": "doc", "children": [
              { "tag": "summary", "children": [text("Runs.")] }
            ]}
          }
        ]},
        { "namespace": "Lib", "name": "Runner", "interfaces": ["Lib.IRunner"],
          "members": [
          { "kind": "method", "name": "Run",
            "docs": { "tag": "doc", "children": [{ "tag": "inheritdoc" }] } }
        ]}
      ]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    let run = payload(&graph, &docs, "M:Lib.Runner.Run");
    assert_eq!(run.summary().unwrap(), &[DocNode::Text("Runs.".to_string())]);
  }

  fn cycle_types(a_first: bool) -> serde_json::Value {
    let a = json!({ "namespace": "Lib", "name": "A",
      "docs": { "tag": "doc", "children": [
        { "tag": "inheritdoc", "cref": "T:Lib.B" },
        { "tag": "remarks", "children": [text("A remarks.")] }
      ]}
    });
    let b = json!({ "namespace": "Lib", "name": "B",
      "docs": { "tag": "doc", "children": [
        { "tag": "inheritdoc", "cref": "T:Lib.A" },
        { "tag": "summary", "children": [text("B summary.")] }
      ]}
    });
    let types = if a_first { vec![a, b] } else { vec![b, a] };
    json!({ "name": "Lib", "types": types })
  }

  #[test]
  fn test_inheritdoc_cycle_keeps_explicit_blocks_in_any_order() {
    for a_first in [true, false] {
      let graph = graph(cycle_types(a_first));
      let mut diagnostics = Diagnostics::new();
      let docs = merge(&graph, &mut diagnostics);

      let a = payload(&graph, &docs, "T:Lib.A");
      assert!(a.remarks().is_some(), "a_first={a_first}");
      assert!(a.summary().is_none(), "a_first={a_first}");

      let b = payload(&graph, &docs, "T:Lib.B");
      assert!(b.summary().is_some(), "a_first={a_first}");
      assert!(b.remarks().is_none(), "a_first={a_first}");
      assert!(diagnostics.is_empty());
    }
  }

  #[test]
  fn test_inheriting_from_a_cycle_member_gets_its_explicit_blocks() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "C",
          "docs": { "tag": "doc", "children": [
            { "tag": "inheritdoc", "cref": "T:Lib.A" }
          ]}
        },
        { "namespace": "Lib", "name": "A",
          "docs": { "tag": "doc", "children": [
            { "tag": "inheritdoc", "cref": "T:Lib.B" },
            { "tag": "remarks", "children": [text("A remarks.")] }
          ]}
        },
        { "namespace": "Lib", "name": "B",
          "docs": { "tag": "doc", "children": [
            { "tag": "inheritdoc", "cref": "T:Lib.A" },
            { "tag": "summary", "children": [text("B summary.")] }
          ]}
        }
      ]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);

    let c = payload(&graph, &docs, "T:Lib.C");
    assert!(c.remarks().is_some());
    assert!(c.summary().is_none());
    assert!(payload(&graph, &docs, "T:Lib.A").summary().is_none());
  }

  #[test]
  fn test_generic_and_conversion_references() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "Widget", "members": [
          { "kind": "method", "name": "Run" },
          { "kind": "method", "name": "Run", "type_parameters": ["T"] },
          { "kind": "method", "name": "Map", "type_parameters": ["T"],
            "parameters": [{ "name": "x", "type": "T" }] }
        ]},
        { "namespace": "Lib", "name": "Money", "members": [
          { "kind": "operator", "name": "op_Explicit", "return_type": "System.Int32",
            "parameters": [{ "name": "m", "type": "Lib.Money" }] },
          { "kind": "operator", "name": "op_Implicit", "return_type": "System.Int32",
            "parameters": [{ "name": "m", "type": "Lib.Money" }] },
          { "kind": "operator", "name": "op_Implicit", "return_type": "System.Decimal",
            "parameters": [{ "name": "m", "type": "Lib.Money" }] }
        ]}
      ]
    }));
    let resolve = |text: &str| resolve_reference_text(&graph, text).to_string();

    assert_eq!(resolve("M:Lib.Widget.Run``1"), "M:Lib.Widget.Run``1");
    assert_eq!(resolve("M:Lib.Widget.Map``1"), "G:M:Lib.Widget.Map");
    assert_eq!(
      resolve("M:Lib.Money.op_Explicit(Lib.Money)"),
      "M:Lib.Money.op_Explicit(Lib.Money)~System.Int32"
    );
    assert_eq!(
      resolve("M:Lib.Money.op_Implicit(Lib.Money)~System.Decimal"),
      "M:Lib.Money.op_Implicit(Lib.Money)~System.Decimal"
    );
    // Two implicit conversions: the id without a return type is ambiguous.
    assert_eq!(
      resolve("M:Lib.Money.op_Implicit(Lib.Money)"),
      "M:Lib.Money.op_Implicit(Lib.Money)"
    );
  }

  #[test]
  fn test_entity_without_docs_has_empty_payload() {
    let graph = graph(json!({
      "name": "Lib",
      "types": [{ "namespace": "Lib", "name": "Widget" }]
    }));
    let mut diagnostics = Diagnostics::new();
    let docs = merge(&graph, &mut diagnostics);
    assert!(payload(&graph, &docs, "T:Lib.Widget").is_empty());
  }
}
