//! Rendering context and documentation content conversion.

use std::collections::HashSet;

use mddocs_core::{
  Diagnostic,
  Diagnostics,
  DocNode,
  EntityId,
  EntityKind,
  IdentityKey,
  Locator,
  Model,
  Resolution,
  Resolver,
  entity::short_type_name,
  identity,
};

use crate::document::{Block, Span};

/// Options shared by all page builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOptions {
  /// Append a notice that the page was generated.
  pub include_auto_generated_notice: bool,
  /// Show the assembly or application version.
  pub include_version:               bool,
}

/// Everything a page builder needs: the model, a resolver and the sink for
/// diagnostics found while rendering.
pub struct PageContext<'a> {
  pub model:   &'a Model,
  pub options: PageOptions,
  resolver:    Resolver<'a>,
  diagnostics: &'a mut Diagnostics,
  reported:    HashSet<(IdentityKey, IdentityKey)>,
}

impl<'a> PageContext<'a> {
  pub fn new(
    model: &'a Model,
    options: PageOptions,
    diagnostics: &'a mut Diagnostics,
  ) -> Self {
    Self {
      model,
      options,
      resolver: model.resolver(),
      diagnostics,
      reported: HashSet::new(),
    }
  }

  #[must_use]
  pub const fn resolver(&self) -> &Resolver<'a> {
    &self.resolver
  }

  /// Link target of an entity relative to the page at `from`.
  #[must_use]
  pub fn href(&self, entity: EntityId, from: &Locator) -> Option<String> {
    self
      .resolver
      .resolve_entity(entity)
      .link()
      .map(|link| link.relative_to(from))
  }

  /// A link to an entity, or plain text if it has no unit.
  #[must_use]
  pub fn entity_link(&self, entity: EntityId, label: Span, from: &Locator) -> Span {
    match self.href(entity, from) {
      Some(href) => Span::link(label, href),
      None => label,
    }
  }

  /// Render a reference to a type by full name. Types outside the model are
  /// rendered as plain text without a diagnostic.
  #[must_use]
  pub fn type_reference(&self, full_name: &str, from: &Locator) -> Span {
    let label = Span::text(short_type_name(full_name));
    match self.model.graph.find_type(full_name) {
      Some(id) => self.entity_link(id, label, from),
      None => label,
    }
  }

  /// Resolve a documentation reference. Failures are recorded once per
  /// origin and reference.
  pub fn reference(
    &mut self,
    origin: EntityId,
    key: &IdentityKey,
    text: Option<&str>,
    from: &Locator,
  ) -> Span {
    let label = text.map_or_else(|| self.reference_label(key), str::to_owned);
    match self.resolver.resolve(key) {
      Resolution::Resolved(link) => {
        Span::link(Span::code(label), link.relative_to(from))
      },
      Resolution::Unresolved(reference) => {
        let origin = self.model.graph.get(origin).key.clone();
        if self.reported.insert((origin.clone(), key.clone())) {
          self
            .diagnostics
            .push(Diagnostic::UnresolvedReference { origin, reference });
        }
        Span::code(label)
      },
    }
  }

  /// Display name of a reference target.
  #[must_use]
  pub fn reference_label(&self, key: &IdentityKey) -> String {
    let graph = &self.model.graph;
    if let Some(id) = graph.lookup(key) {
      return self.qualified_name(id);
    }
    if let Some(group) = self.model.grouping.lookup(key) {
      let owner = &graph.get(group.owner).name;
      return match group.kind {
        mddocs_core::GroupKind::Constructor => owner.clone(),
        _ => format!("{owner}.{}", group.name),
      };
    }

    let body = key.body();
    let body = body.split_once('(').map_or(body, |(name, _)| name);
    let body = identity::strip_arity(body);
    match key.prefix() {
      Some('T') => short_type_name(body),
      Some(_) => {
        let mut segments = body.rsplitn(3, '.');
        match (segments.next(), segments.next()) {
          (Some(member), Some(owner)) => format!("{owner}.{member}"),
          _ => body.to_string(),
        }
      },
      None => body.to_string(),
    }
  }

  /// `Type.Member` for members, the plain name for everything else.
  #[must_use]
  pub fn qualified_name(&self, id: EntityId) -> String {
    let graph = &self.model.graph;
    let entity = graph.get(id);
    match entity.kind {
      EntityKind::Namespace | EntityKind::Type | EntityKind::Application => {
        entity.name.clone()
      },
      EntityKind::Constructor => {
        graph
          .parent(id)
          .map_or_else(|| entity.name.clone(), |p| p.name.clone())
      },
      _ => {
        match graph.parent(id) {
          Some(parent) if !parent.name.is_empty() => {
            format!("{}.{}", parent.name, entity.name)
          },
          _ => entity.name.clone(),
        }
      },
    }
  }

  /// Convert documentation content into a single inline span.
  pub fn inline(
    &mut self,
    origin: EntityId,
    nodes: &[DocNode],
    from: &Locator,
  ) -> Span {
    let spans = nodes
      .iter()
      .map(|node| self.inline_node(origin, node, from))
      .collect();
    Span::composite(spans)
  }

  fn inline_node(&mut self, origin: EntityId, node: &DocNode, from: &Locator) -> Span {
    match node {
      DocNode::Text(text) => Span::text(text.clone()),
      DocNode::Code(code) => Span::code(code.clone()),
      DocNode::CodeBlock { code, .. } => Span::code(code.replace('\n', " ")),
      DocNode::ParamRef(name) => Span::code(name.clone()),
      DocNode::Reference { key, text } => {
        self.reference(origin, key, text.as_deref(), from)
      },
      DocNode::Paragraph(children) => {
        let inner = self.inline(origin, children, from);
        Span::composite(vec![Span::text(" "), inner, Span::text(" ")])
      },
      DocNode::Unknown { children, .. } => self.inline(origin, children, from),
    }
  }

  /// Convert documentation content into blocks: runs of inline content
  /// become paragraphs, code blocks stay code blocks.
  pub fn blocks(
    &mut self,
    origin: EntityId,
    nodes: &[DocNode],
    from: &Locator,
  ) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending: Vec<Span> = Vec::new();

    let flush = |pending: &mut Vec<Span>, blocks: &mut Vec<Block>| {
      let span = Span::composite(std::mem::take(pending));
      if !span.is_empty() {
        blocks.push(Block::Paragraph(span));
      }
    };

    for node in nodes {
      match node {
        DocNode::Paragraph(children) => {
          flush(&mut pending, &mut blocks);
          blocks.extend(self.blocks(origin, children, from));
        },
        DocNode::CodeBlock { language, code } => {
          flush(&mut pending, &mut blocks);
          blocks.push(Block::code_block(code.clone(), language.as_deref()));
        },
        other => pending.push(self.inline_node(origin, other, from)),
      }
    }
    flush(&mut pending, &mut blocks);
    blocks
  }

  /// Summary of an entity as a single span.
  pub fn summary(&mut self, entity: EntityId, from: &Locator) -> Span {
    let documentation = &self.model.documentation;
    match documentation.get(entity).summary() {
      Some(nodes) => self.inline(entity, nodes, from),
      None => Span::Empty,
    }
  }

  /// `Version: x` paragraph, if enabled and known.
  #[must_use]
  pub fn version_line(&self, version: Option<&str>) -> Option<Block> {
    let version = version.filter(|_| self.options.include_version)?;
    Some(Block::paragraph(Span::composite(vec![
      Span::strong(Span::text("Version:")),
      Span::text(" "),
      Span::text(version),
    ])))
  }

  /// Generated-page notice, if enabled.
  #[must_use]
  pub fn footer(&self) -> Vec<Block> {
    if !self.options.include_auto_generated_notice {
      return Vec::new();
    }
    vec![
      Block::ThematicBreak,
      Block::paragraph(Span::emphasis(Span::text(
        "Documentation generated by mddocs",
      ))),
    ]
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use mddocs_core::AssemblyRecord;
  use serde_json::json;

  use super::*;

  fn model(diagnostics: &mut Diagnostics) -> Model {
    let assembly: AssemblyRecord = serde_json::from_value(json!({
      "name": "Lib",
      "types": [
        { "namespace": "Lib", "name": "Widget", "members": [
          { "kind": "property", "name": "Size" }
        ]},
        { "namespace": "Lib", "name": "Gadget", "docs": { "tag": "doc", "children": [
          { "tag": "summary", "children": [
            { "tag": "#text", "text": "Uses " },
            { "tag": "see", "cref": "P:Lib.Widget.Size" },
            { "tag": "#text", "text": " and " },
            { "tag": "see", "cref": "T:System.String" },
            { "tag": "#text", "text": "." }
          ]}
        ]}}
      ]
    }))
    .unwrap();
    Model::from_assemblies(&[assembly], diagnostics).unwrap()
  }

  #[test]
  fn test_references_link_relative_and_report_unresolved_once() {
    let mut diagnostics = Diagnostics::new();
    let model = model(&mut diagnostics);
    let gadget = model.graph.find_type("Lib.Gadget").unwrap();
    let from = Locator::new("Lib/Gadget/index.md");

    let mut ctx = PageContext::new(&model, PageOptions::default(), &mut diagnostics);
    let first = ctx.summary(gadget, &from);
    let _second = ctx.summary(gadget, &from);

    assert_eq!(
      first,
      Span::Composite(vec![
        Span::text("Uses "),
        Span::link(Span::code("Widget.Size"), "../Widget/properties/Size.md"),
        Span::text(" and "),
        Span::code("String"),
        Span::text("."),
      ])
    );
    drop(ctx);
    assert_eq!(diagnostics.summary()["unresolved-reference"], 1);
  }

  #[test]
  fn test_reference_labels_drop_generic_arity() {
    let mut diagnostics = Diagnostics::new();
    let model = model(&mut diagnostics);
    let ctx = PageContext::new(&model, PageOptions::default(), &mut diagnostics);

    assert_eq!(
      ctx.reference_label(&IdentityKey::from("M:Lib.Missing.Run``1(System.Int32)")),
      "Missing.Run"
    );
    assert_eq!(ctx.reference_label(&IdentityKey::from("P:Lib.Widget.Size")), "Widget.Size");
  }

  #[test]
  fn test_footer_respects_options() {
    let mut diagnostics = Diagnostics::new();
    let model = model(&mut diagnostics);

    let ctx = PageContext::new(&model, PageOptions::default(), &mut diagnostics);
    assert!(ctx.footer().is_empty());
    assert!(ctx.version_line(Some("1.0.0")).is_none());
    drop(ctx);

    let options = PageOptions {
      include_auto_generated_notice: true,
      include_version:               true,
    };
    let ctx = PageContext::new(&model, options, &mut diagnostics);
    assert_eq!(ctx.footer().len(), 2);
    assert_eq!(ctx.footer()[0], Block::ThematicBreak);
    assert!(ctx.version_line(None).is_none());
    assert!(ctx.version_line(Some("1.0.0")).is_some());
  }
}
