//! Command-line help pages.

use mddocs_core::{
  Entity,
  EntityDetail,
  EntityId,
  EntityKind,
  UnitSubject,
  entity::{OptionDetail, ValueDetail},
};

use crate::{
  content::PageContext,
  document::{Block, Document, Page, Span, Table},
};

/// Visible parameters of one command.
struct Parameters<'m> {
  values:  Vec<(&'m Entity, &'m ValueDetail)>,
  options: Vec<(&'m Entity, &'m OptionDetail)>,
}

impl<'m> Parameters<'m> {
  fn of(ctx: &PageContext<'m>, command: EntityId) -> Self {
    let mut values = Vec::new();
    let mut options = Vec::new();
    let model = ctx.model;
    for child in model.graph.children(command) {
      if child.is_hidden() {
        continue;
      }
      match &child.detail {
        EntityDetail::Value(value) => values.push((child, value)),
        EntityDetail::Option(option) => options.push((child, option)),
        _ => {},
      }
    }
    values.sort_by_key(|(_, value)| value.index);
    Self { values, options }
  }

  fn is_empty(&self) -> bool {
    self.values.is_empty() && self.options.is_empty()
  }

  fn count(&self) -> usize {
    self.values.len() + self.options.len()
  }
}

/// Build the pages of every application in the model.
pub fn build_pages(ctx: &PageContext<'_>) -> Vec<Page> {
  let model = ctx.model;
  let mut pages = Vec::new();

  for unit in model.units.iter() {
    let UnitSubject::Entity(id) = unit.subject else {
      continue;
    };
    let document = match model.graph.get(id).kind {
      EntityKind::Application => application_document(ctx, id),
      EntityKind::Command => command_document(ctx, id),
      _ => continue,
    };
    log::debug!("Built command page {}", unit.locator);
    pages.push(Page {
      locator: unit.locator.clone(),
      document,
    });
  }
  pages
}

/// The application page: command table, or the command itself for
/// single-command applications.
pub fn application_document(ctx: &PageContext<'_>, application: EntityId) -> Document {
  let model = ctx.model;
  let app = model.graph.get(application);
  let version = match &app.detail {
    EntityDetail::Application { version } => version.as_deref(),
    _ => None,
  };

  let mut document = Document::new();
  document.push(Block::heading(
    1,
    Span::composite(vec![
      Span::code(app.name.clone()),
      Span::text(" Command Line Reference"),
    ]),
  ));
  document.extend(ctx.version_line(version));

  if model.grouping.is_single_command(&model.graph, application) {
    if let Some(&command) = model.grouping.commands_of(application).first() {
      document.extend(command_body(ctx, command));
    }
  } else {
    document.push(Block::heading(2, "Commands"));
    let from = unit_locator(ctx, application);
    let mut table = Table::new(vec![Span::text("Name"), Span::text("Description")]);
    for &command in model.grouping.commands_of(application) {
      let entity = model.graph.get(command);
      let name = ctx.entity_link(command, Span::code(entity.name.clone()), &from);
      table.push(vec![name, help_text(entity)]);
    }
    document.push(Block::Table(table));
  }

  document.extend(ctx.footer());
  document
}

/// The page of a named command.
pub fn command_document(ctx: &PageContext<'_>, command: EntityId) -> Document {
  let entity = ctx.model.graph.get(command);

  let mut document = Document::new();
  document.push(Block::heading(
    1,
    Span::composite(vec![
      Span::code(entity.name.clone()),
      Span::text(" Command"),
    ]),
  ));
  document.extend(command_body(ctx, command));
  document.extend(ctx.footer());
  document
}

fn command_body(ctx: &PageContext<'_>, command: EntityId) -> Vec<Block> {
  let model = ctx.model;
  let entity = model.graph.get(command);
  let parameters = Parameters::of(ctx, command);

  let mut blocks = Vec::new();
  let help = help_text(entity);
  if !help.is_empty() {
    blocks.push(Block::paragraph(help));
  }

  let app_name = model
    .graph
    .application_of(command)
    .map(|a| a.name.as_str())
    .unwrap_or_default();
  let command_name = entity.as_command().and_then(|c| c.name.as_deref());
  blocks.push(Block::heading(2, "Usage"));
  blocks.push(Block::code_block(
    usage(app_name, command_name, &parameters),
    None,
  ));

  if !parameters.is_empty() {
    blocks.push(Block::heading(2, "Parameters"));
    blocks.push(Block::Table(parameter_table(ctx, &parameters)));

    let multiple = parameters.count() > 1;
    let mut first = true;
    for (value, detail) in &parameters.values {
      if multiple && !first {
        blocks.push(Block::ThematicBreak);
      }
      blocks.extend(value_section(ctx, value, detail));
      first = false;
    }
    for (option, detail) in &parameters.options {
      if multiple && !first {
        blocks.push(Block::ThematicBreak);
      }
      blocks.extend(option_section(ctx, option, detail));
      first = false;
    }
  }

  blocks
}

/// Usage synopsis: `app command`, then one line per visible parameter,
/// aligned to the end of the prefix.
fn usage(app_name: &str, command_name: Option<&str>, parameters: &Parameters<'_>) -> String {
  let mut prefix = format!("{app_name} ");
  if let Some(name) = command_name {
    prefix.push_str(name);
    prefix.push(' ');
  }
  let indent = " ".repeat(prefix.chars().count());

  let mut items = Vec::with_capacity(parameters.count());
  for (_, value) in &parameters.values {
    let mut item = format!("<{}", value.name.as_deref().unwrap_or("VALUE"));
    if let Some(meta) = value.meta_value.as_deref().filter(|m| !m.is_empty()) {
      item.push(':');
      item.push_str(meta);
    }
    item.push('>');
    items.push(optional(item, value.required));
  }
  for (_, option) in &parameters.options {
    let mut item = match (option.long_name.as_deref(), option.short_name) {
      (Some(long), Some(short)) => format!("--{long}|-{short}"),
      (Some(long), None) => format!("--{long}"),
      (None, Some(short)) => format!("-{short}"),
      (None, None) => continue,
    };
    if !option.is_switch {
      item.push_str(" <");
      item.push_str(option.meta_value.as_deref().unwrap_or("VALUE"));
      item.push('>');
    }
    items.push(optional(item, option.required));
  }

  let mut out = prefix;
  for (i, item) in items.iter().enumerate() {
    if i > 0 {
      out.push('\n');
      out.push_str(&indent);
    }
    out.push_str(item);
  }
  out.trim_end().to_string()
}

fn optional(item: String, required: bool) -> String {
  if required { item } else { format!("[{item}]") }
}

fn parameter_table(ctx: &PageContext<'_>, parameters: &Parameters<'_>) -> Table {
  let has_position = !parameters.values.is_empty();
  let has_name = parameters
    .options
    .iter()
    .any(|(_, o)| o.long_name.as_deref().is_some_and(|n| !n.is_empty()));
  let has_short = parameters.options.iter().any(|(_, o)| o.short_name.is_some());

  let mut header = Vec::new();
  if has_position {
    header.push(Span::text("Position"));
  }
  if has_name || has_short {
    header.push(Span::text("Name"));
  }
  if has_name && has_short {
    header.push(Span::text("Short Name"));
  }
  header.push(Span::text("Description"));
  let mut table = Table::new(header);

  for (value, detail) in &parameters.values {
    let href = anchor_href(ctx, value.id);
    let mut row = vec![Span::text(detail.index.to_string())];
    if has_name || has_short {
      row.push(match detail.name.as_deref() {
        Some(name) if !name.is_empty() => {
          Span::link(Span::emphasis(Span::text(name)), href)
        },
        _ => Span::Empty,
      });
    }
    if has_name && has_short {
      row.push(Span::Empty);
    }
    row.push(Span::text(detail.help_text.clone().unwrap_or_default()));
    table.push(row);
  }

  for (option, detail) in &parameters.options {
    let href = anchor_href(ctx, option.id);
    let mut row = Vec::new();
    if has_position {
      row.push(Span::Empty);
    }
    if has_name {
      row.push(match detail.long_name.as_deref() {
        Some(name) if !name.is_empty() => Span::link(Span::text(name), href.clone()),
        _ => Span::Empty,
      });
    }
    if has_short {
      row.push(match detail.short_name {
        Some(short) => Span::link(Span::text(short.to_string()), href),
        None => Span::Empty,
      });
    }
    row.push(Span::text(detail.help_text.clone().unwrap_or_default()));
    table.push(row);
  }

  table
}

fn value_section(ctx: &PageContext<'_>, value: &Entity, detail: &ValueDetail) -> Vec<Block> {
  let title = match detail.name.as_deref() {
    Some(name) if !name.is_empty() => {
      Span::composite(vec![
        Span::code(name),
        Span::text(format!(" Parameter (Position {})", detail.index)),
      ])
    },
    _ => Span::text(format!("Parameter (Position {})", detail.index)),
  };
  parameter_section(
    ctx,
    value.id,
    title,
    detail.help_text.as_deref(),
    detail.default.as_deref(),
  )
}

fn option_section(ctx: &PageContext<'_>, option: &Entity, detail: &OptionDetail) -> Vec<Block> {
  let name = detail
    .long_name
    .clone()
    .or_else(|| detail.short_name.map(String::from))
    .unwrap_or_default();
  let title = Span::composite(vec![Span::code(name), Span::text(" Parameter")]);
  parameter_section(
    ctx,
    option.id,
    title,
    detail.help_text.as_deref(),
    detail.default.as_deref(),
  )
}

fn parameter_section(
  ctx: &PageContext<'_>,
  id: EntityId,
  title: Span,
  help_text: Option<&str>,
  default: Option<&str>,
) -> Vec<Block> {
  let mut blocks = vec![match anchor(ctx, id) {
    Some(anchor) => Block::anchored_heading(3, title, anchor),
    None => Block::heading(3, title),
  }];
  if let Some(help) = help_text.filter(|h| !h.is_empty()) {
    blocks.push(Block::paragraph(help));
  }
  if let Some(default) = default {
    blocks.push(Block::paragraph(Span::composite(vec![
      Span::strong(Span::text("Default value:")),
      Span::text(" "),
      Span::code(default),
    ])));
  }
  blocks
}

fn anchor(ctx: &PageContext<'_>, id: EntityId) -> Option<String> {
  ctx
    .model
    .units
    .placement(id)
    .and_then(|p| p.anchor.as_ref())
    .map(|a| a.as_str().to_string())
}

fn anchor_href(ctx: &PageContext<'_>, id: EntityId) -> String {
  anchor(ctx, id).map(|a| format!("#{a}")).unwrap_or_default()
}

fn unit_locator(ctx: &PageContext<'_>, id: EntityId) -> mddocs_core::Locator {
  ctx
    .model
    .units
    .placement(id)
    .map(|p| ctx.model.units.get(p.unit).locator.clone())
    .unwrap_or_else(|| mddocs_core::Locator::new("index.md"))
}

fn help_text(entity: &Entity) -> Span {
  let help = match &entity.detail {
    EntityDetail::Command(command) => command.help_text.as_deref(),
    EntityDetail::Option(option) => option.help_text.as_deref(),
    EntityDetail::Value(value) => value.help_text.as_deref(),
    _ => None,
  };
  help.map_or(Span::Empty, Span::text)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use mddocs_core::{ApplicationRecord, Diagnostics, IdentityKey, Model};
  use serde_json::json;

  use super::*;
  use crate::content::PageOptions;

  fn model(app: serde_json::Value) -> Model {
    let record: ApplicationRecord = serde_json::from_value(app).unwrap();
    Model::from_application(&record, &mut Diagnostics::new()).unwrap()
  }

  fn usage_of(model: &Model, key: &str) -> String {
    let mut diagnostics = Diagnostics::new();
    let ctx = PageContext::new(model, PageOptions::default(), &mut diagnostics);
    let id = model.graph.lookup(&IdentityKey::from(key)).unwrap();
    let command = model.graph.get(id);
    let parameters = Parameters::of(&ctx, id);
    usage(
      "test",
      command.as_command().and_then(|c| c.name.as_deref()),
      &parameters,
    )
  }

  #[test]
  fn test_usage_aligns_continuation_lines() {
    let model = model(json!({
      "name": "test",
      "commands": [{
        "name": "build",
        "values": [{ "index": 0, "name": "target", "required": true }],
        "options": [
          { "name": "output", "short_name": "o", "meta_value": "DIR" },
          { "name": "verbose", "value_type": "System.Boolean" }
        ]
      }]
    }));

    assert_eq!(
      usage_of(&model, "C:test:build"),
      "test build <target>\n           [--output|-o <DIR>]\n           [--verbose]"
    );
  }

  #[test]
  fn test_usage_of_unnamed_command_has_no_command_name() {
    let model = model(json!({
      "name": "tool",
      "options": [{ "short_name": "q", "required": true, "value_type": "bool" }]
    }));
    assert_eq!(usage_of(&model, "C:tool:"), "test -q");
  }

  #[test]
  fn test_usage_without_parameters_is_trimmed() {
    let model = model(json!({
      "name": "test",
      "commands": [{ "name": "status" }]
    }));
    assert_eq!(usage_of(&model, "C:test:status"), "test status");
  }
}
