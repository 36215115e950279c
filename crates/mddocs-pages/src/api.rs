//! API reference pages.

use std::collections::HashSet;

use mddocs_core::{
  DocNode,
  EntityId,
  EntityKind,
  GroupKind,
  Locator,
  OverloadGroup,
  UnitSubject,
  metadata::TypeKind,
};

use crate::{
  content::PageContext,
  document::{Block, Document, Page, Span, Table},
};

const TYPE_SECTIONS: [(TypeKind, &str); 5] = [
  (TypeKind::Class, "Classes"),
  (TypeKind::Struct, "Structs"),
  (TypeKind::Interface, "Interfaces"),
  (TypeKind::Enum, "Enums"),
  (TypeKind::Delegate, "Delegates"),
];

const MEMBER_SECTIONS: [(EntityKind, &str); 7] = [
  (EntityKind::Constructor, "Constructors"),
  (EntityKind::Field, "Fields"),
  (EntityKind::Property, "Properties"),
  (EntityKind::Indexer, "Indexers"),
  (EntityKind::Method, "Methods"),
  (EntityKind::Event, "Events"),
  (EntityKind::Operator, "Operators"),
];

/// Build one page per output unit of an API reference model.
pub fn build_pages(ctx: &mut PageContext<'_>) -> Vec<Page> {
  let model = ctx.model;
  let mut pages = Vec::with_capacity(model.units.len());

  for unit in model.units.iter() {
    let from = &unit.locator;
    let document = match unit.subject {
      UnitSubject::Entity(id) => {
        match model.graph.get(id).kind {
          EntityKind::Namespace => namespace_document(ctx, id, from),
          EntityKind::Type => type_document(ctx, id, from),
          EntityKind::Property | EntityKind::Field | EntityKind::Event => {
            member_document(ctx, id, from)
          },
          _ => continue,
        }
      },
      UnitSubject::Group(group) => {
        group_document(ctx, model.grouping.get(group), from)
      },
    };
    log::debug!("Built API page {from}");
    pages.push(Page {
      locator: unit.locator.clone(),
      document,
    });
  }
  pages
}

pub fn namespace_document(
  ctx: &mut PageContext<'_>,
  namespace: EntityId,
  from: &Locator,
) -> Document {
  let model = ctx.model;
  let entity = model.graph.get(namespace);

  let mut document = Document::new();
  let title = if entity.name.is_empty() {
    "Global Namespace".to_string()
  } else {
    format!("{} Namespace", entity.name)
  };
  document.push(Block::heading(1, title));

  for (kind, title) in TYPE_SECTIONS {
    let types: Vec<_> = model
      .graph
      .children(namespace)
      .filter(|t| t.as_type().is_some_and(|d| d.kind == kind))
      .collect();
    if types.is_empty() {
      continue;
    }

    document.push(Block::heading(2, title));
    let mut table = Table::new(vec![Span::text("Name"), Span::text("Description")]);
    for ty in types {
      let name = ctx.entity_link(ty.id, Span::text(ty.name.clone()), from);
      let summary = ctx.summary(ty.id, from);
      table.push(vec![name, summary]);
    }
    document.push(Block::Table(table));
  }

  document.extend(ctx.footer());
  document
}

pub fn type_document(ctx: &mut PageContext<'_>, ty: EntityId, from: &Locator) -> Document {
  let model = ctx.model;
  let entity = model.graph.get(ty);
  let payload = model.documentation.get(ty);

  let mut document = Document::new();
  let Some(detail) = entity.as_type() else {
    return document;
  };

  document.push(Block::heading(
    1,
    format!("{} {}", entity.name, detail.kind.label()),
  ));
  if let Some(summary) = payload.summary() {
    document.extend(ctx.blocks(ty, summary, from));
  }

  if let Some(namespace) = entity.parent {
    let label = if detail.namespace.is_empty() {
      "global"
    } else {
      detail.namespace.as_str()
    };
    let link = ctx.entity_link(namespace, Span::text(label), from);
    document.push(labelled("Namespace:", link));
  }
  document.push(labelled("Assembly:", Span::text(detail.assembly.clone())));
  document.extend(ctx.version_line(detail.version.as_deref()));

  if let Some(chain) = inheritance(ctx, ty, from) {
    document.push(labelled("Inheritance:", chain));
  }
  if !detail.interfaces.is_empty() {
    let interfaces = detail
      .interfaces
      .iter()
      .map(|i| ctx.type_reference(i, from))
      .collect();
    document.push(labelled("Implements:", join(interfaces, ", ")));
  }

  if let Some(definition) = &detail.definition {
    document.push(Block::code_block(definition.clone(), Some("csharp")));
  }

  let type_parameters = type_parameter_table(ctx, ty, &detail.type_parameters, from);
  if let Some(table) = type_parameters {
    document.push(Block::heading(2, "Type Parameters"));
    document.push(Block::Table(table));
  }

  document.extend(remarks(ctx, ty, 2, from));

  if detail.kind == TypeKind::Enum {
    document.extend(enum_fields(ctx, ty, from));
  } else {
    for (kind, title) in MEMBER_SECTIONS {
      let members: Vec<_> = model
        .graph
        .children(ty)
        .filter(|m| m.kind == kind)
        .map(|m| m.id)
        .collect();
      if members.is_empty() {
        continue;
      }

      document.push(Block::heading(2, title));
      let mut table = Table::new(vec![Span::text("Name"), Span::text("Description")]);
      for member in members {
        let label = model.graph.get(member).signature_label();
        let name = ctx.entity_link(member, Span::text(label), from);
        let summary = ctx.summary(member, from);
        table.push(vec![name, summary]);
      }
      document.push(Block::Table(table));
    }
  }

  document.extend(examples(ctx, ty, 2, from));
  document.extend(see_also(ctx, ty, 2, from));
  document.extend(ctx.footer());
  document
}

/// Page of a property, field or event.
pub fn member_document(
  ctx: &mut PageContext<'_>,
  member: EntityId,
  from: &Locator,
) -> Document {
  let model = ctx.model;
  let entity = model.graph.get(member);
  let payload = model.documentation.get(member);
  let declaring = model.graph.declaring_type(member);

  let mut document = Document::new();
  document.push(Block::heading(
    1,
    format!("{} {}", ctx.qualified_name(member), entity.kind.label()),
  ));
  if let Some(summary) = payload.summary() {
    document.extend(ctx.blocks(member, summary, from));
  }

  if let Some(declaring) = declaring {
    let link = ctx.entity_link(declaring.id, Span::text(declaring.name.clone()), from);
    document.push(labelled("Declaring Type:", link));
    let version = declaring.as_type().and_then(|t| t.version.as_deref());
    document.extend(ctx.version_line(version));
  }

  let detail = entity.as_member();
  if let Some(definition) = detail.and_then(|d| d.definition.as_ref()) {
    document.push(Block::code_block(definition.clone(), Some("csharp")));
  }

  let title = match entity.kind {
    EntityKind::Event => "Event Type",
    EntityKind::Field => "Field Value",
    _ => "Property Value",
  };
  let type_name = detail.and_then(|d| d.type_name.as_deref());
  document.extend(value_section(ctx, member, title, 2, type_name, payload.value(), from));

  document.extend(remarks(ctx, member, 2, from));
  document.extend(examples(ctx, member, 2, from));
  document.extend(see_also(ctx, member, 2, from));
  document.extend(ctx.footer());
  document
}

/// Page of an overload group: an overview table, then one anchored
/// section per overload.
pub fn group_document(
  ctx: &mut PageContext<'_>,
  group: &OverloadGroup,
  from: &Locator,
) -> Document {
  let model = ctx.model;
  let owner = model.graph.get(group.owner);

  let title = match group.kind {
    GroupKind::Constructor => format!("{} Constructors", owner.name),
    GroupKind::Method => format!("{}.{} Method", owner.name, group.name),
    GroupKind::Operator => format!("{}.{} Operator", owner.name, group.name),
    GroupKind::Indexer => format!("{}.{} Indexer", owner.name, group.name),
  };

  let mut document = Document::new();
  document.push(Block::heading(1, title));

  let link = ctx.entity_link(owner.id, Span::text(owner.name.clone()), from);
  document.push(labelled("Declaring Type:", link));
  let version = owner.as_type().and_then(|t| t.version.as_deref());
  document.extend(ctx.version_line(version));

  document.push(Block::heading(2, "Overloads"));
  let mut table = Table::new(vec![Span::text("Signature"), Span::text("Description")]);
  for &member in &group.members {
    let label = model.graph.get(member).signature_label();
    let signature = ctx.entity_link(member, Span::text(label), from);
    let summary = ctx.summary(member, from);
    table.push(vec![signature, summary]);
  }
  document.push(Block::Table(table));

  for &member in &group.members {
    document.extend(overload_section(ctx, member, from));
  }

  document.extend(ctx.footer());
  document
}

fn overload_section(ctx: &mut PageContext<'_>, member: EntityId, from: &Locator) -> Vec<Block> {
  let model = ctx.model;
  let entity = model.graph.get(member);
  let payload = model.documentation.get(member);
  let detail = entity.as_member();

  let label = entity.signature_label();
  let mut blocks = vec![
    match model.units.placement(member).and_then(|p| p.anchor.as_ref()) {
      Some(anchor) => Block::anchored_heading(2, label, anchor.as_str()),
      None => Block::heading(2, label),
    },
  ];

  if let Some(summary) = payload.summary() {
    blocks.extend(ctx.blocks(member, summary, from));
  }
  if let Some(definition) = detail.and_then(|d| d.definition.as_ref()) {
    blocks.push(Block::code_block(definition.clone(), Some("csharp")));
  }

  let parameters = entity.parameters();
  if !parameters.is_empty() {
    let mut table = Table::new(vec![
      Span::text("Name"),
      Span::text("Type"),
      Span::text("Description"),
    ]);
    for parameter in parameters {
      let description = match payload.parameter(&parameter.name) {
        Some(nodes) => ctx.inline(member, nodes, from),
        None => Span::Empty,
      };
      table.push(vec![
        Span::code(parameter.name.clone()),
        ctx.type_reference(&parameter.type_name, from),
        description,
      ]);
    }
    blocks.push(Block::heading(3, "Parameters"));
    blocks.push(Block::Table(table));
  }

  if let Some(table) = type_parameter_table(ctx, member, entity.type_parameters(), from) {
    blocks.push(Block::heading(3, "Type Parameters"));
    blocks.push(Block::Table(table));
  }

  let type_name = detail
    .and_then(|d| d.type_name.as_deref())
    .filter(|t| !is_void(t));
  match entity.kind {
    EntityKind::Method | EntityKind::Operator => {
      blocks.extend(value_section(ctx, member, "Returns", 3, type_name, payload.returns(), from));
    },
    EntityKind::Indexer => {
      blocks.extend(value_section(ctx, member, "Indexer Value", 3, type_name, payload.value(), from));
    },
    _ => {},
  }

  let exceptions: Vec<_> = payload.exceptions().collect();
  if !exceptions.is_empty() {
    let mut table = Table::new(vec![Span::text("Exception"), Span::text("Condition")]);
    for (key, content) in exceptions {
      let exception = ctx.reference(member, key, None, from);
      let condition = ctx.inline(member, content, from);
      table.push(vec![exception, condition]);
    }
    blocks.push(Block::heading(3, "Exceptions"));
    blocks.push(Block::Table(table));
  }

  blocks.extend(remarks(ctx, member, 3, from));
  blocks.extend(examples(ctx, member, 3, from));
  blocks.extend(see_also(ctx, member, 3, from));
  blocks
}

fn is_void(type_name: &str) -> bool {
  matches!(type_name, "System.Void" | "void")
}

fn enum_fields(ctx: &mut PageContext<'_>, ty: EntityId, from: &Locator) -> Vec<Block> {
  let model = ctx.model;
  let fields: Vec<_> = model
    .graph
    .children(ty)
    .filter(|f| f.kind == EntityKind::Field)
    .collect();
  if fields.is_empty() {
    return Vec::new();
  }

  let mut table = Table::new(vec![Span::text("Name"), Span::text("Description")]);
  let mut sections = Vec::new();
  for field in fields {
    let name = ctx.entity_link(field.id, Span::text(field.name.clone()), from);
    let summary = ctx.summary(field.id, from);
    table.push(vec![name, summary]);

    let anchor = model.units.placement(field.id).and_then(|p| p.anchor.as_ref());
    let title = Span::code(field.name.clone());
    sections.push(match anchor {
      Some(anchor) => Block::anchored_heading(3, title, anchor.as_str()),
      None => Block::heading(3, title),
    });
    if let Some(summary) = model.documentation.get(field.id).summary() {
      sections.extend(ctx.blocks(field.id, summary, from));
    }
    sections.extend(remarks(ctx, field.id, 4, from));
  }

  let mut blocks = vec![Block::heading(2, "Fields"), Block::Table(table)];
  blocks.extend(sections);
  blocks
}

/// Inheritance chain from the outermost known base down to the type. Bases
/// outside the model end the chain and are shown unlinked.
fn inheritance(ctx: &PageContext<'_>, ty: EntityId, from: &Locator) -> Option<Span> {
  let model = ctx.model;
  let entity = model.graph.get(ty);

  let mut chain = Vec::new();
  let mut seen = HashSet::new();
  let mut next = entity.as_type().and_then(|t| t.base_type.clone());
  while let Some(base) = next {
    if !seen.insert(base.clone()) {
      break;
    }
    next = model
      .graph
      .find_type(&base)
      .and_then(|id| model.graph.get(id).as_type())
      .and_then(|t| t.base_type.clone());
    chain.push(base);
  }
  if chain.is_empty() {
    return None;
  }

  let mut spans: Vec<Span> = chain
    .iter()
    .rev()
    .map(|base| ctx.type_reference(base, from))
    .collect();
  spans.push(Span::text(entity.name.clone()));
  Some(join(spans, " → "))
}

fn type_parameter_table(
  ctx: &mut PageContext<'_>,
  id: EntityId,
  names: &[String],
  from: &Locator,
) -> Option<Table> {
  if names.is_empty() {
    return None;
  }
  let model = ctx.model;
  let payload = model.documentation.get(id);
  let mut table = Table::new(vec![Span::text("Name"), Span::text("Description")]);
  for name in names {
    let description = match payload.type_parameter(name) {
      Some(nodes) => ctx.inline(id, nodes, from),
      None => Span::Empty,
    };
    table.push(vec![Span::code(name.clone()), description]);
  }
  Some(table)
}

/// Type of a value (return value, property value) with its documentation.
fn value_section(
  ctx: &mut PageContext<'_>,
  id: EntityId,
  title: &str,
  level: u8,
  type_name: Option<&str>,
  content: Option<&[DocNode]>,
  from: &Locator,
) -> Vec<Block> {
  if type_name.is_none() && content.is_none() {
    return Vec::new();
  }
  let mut blocks = vec![Block::heading(level, title)];
  if let Some(type_name) = type_name {
    blocks.push(Block::paragraph(ctx.type_reference(type_name, from)));
  }
  if let Some(content) = content {
    blocks.extend(ctx.blocks(id, content, from));
  }
  blocks
}

/// Remarks, followed by any unrecognized top-level sections.
fn remarks(ctx: &mut PageContext<'_>, id: EntityId, level: u8, from: &Locator) -> Vec<Block> {
  let model = ctx.model;
  let payload = model.documentation.get(id);
  let mut blocks = Vec::new();
  if let Some(remarks) = payload.remarks() {
    blocks.push(Block::heading(level, "Remarks"));
    blocks.extend(ctx.blocks(id, remarks, from));
  }
  for (_, content) in payload.free_text() {
    blocks.extend(ctx.blocks(id, content, from));
  }
  blocks
}

fn examples(ctx: &mut PageContext<'_>, id: EntityId, level: u8, from: &Locator) -> Vec<Block> {
  let model = ctx.model;
  let payload = model.documentation.get(id);
  let mut blocks = Vec::new();
  for example in payload.examples() {
    if blocks.is_empty() {
      blocks.push(Block::heading(level, "Example"));
    }
    blocks.extend(ctx.blocks(id, example, from));
  }
  blocks
}

fn see_also(ctx: &mut PageContext<'_>, id: EntityId, level: u8, from: &Locator) -> Vec<Block> {
  let model = ctx.model;
  let payload = model.documentation.get(id);
  let mut items = Vec::new();
  for (key, content) in payload.see_also() {
    let label = ctx.inline(id, content, from).plain_text();
    let label = (!label.is_empty()).then_some(label);
    items.push(ctx.reference(id, key, label.as_deref(), from));
  }
  if items.is_empty() {
    return Vec::new();
  }
  vec![Block::heading(level, "See Also"), Block::BulletList(items)]
}

fn labelled(label: &str, content: Span) -> Block {
  Block::paragraph(Span::composite(vec![
    Span::strong(Span::text(label)),
    Span::text(" "),
    content,
  ]))
}

fn join(spans: Vec<Span>, separator: &str) -> Span {
  let mut out = Vec::with_capacity(spans.len() * 2);
  for (i, span) in spans.into_iter().enumerate() {
    if i > 0 {
      out.push(Span::text(separator));
    }
    out.push(span);
  }
  Span::composite(out)
}
