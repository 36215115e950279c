#![allow(clippy::expect_used, reason = "Fine in tests")]

use mddocs_core::{ApplicationRecord, Diagnostics, IdentityKey, Model};
use mddocs_pages::{
  MarkdownWriter,
  PageContext,
  PageOptions,
  command::{application_document, command_document},
  command_line_pages,
};
use serde_json::json;

fn model(app: serde_json::Value) -> Model {
  let record: ApplicationRecord =
    serde_json::from_value(app).expect("Failed to parse fixture");
  Model::from_application(&record, &mut Diagnostics::new())
    .expect("Failed to build model")
}

fn render_command(model: &Model, key: &str) -> String {
  let mut diagnostics = Diagnostics::new();
  let ctx = PageContext::new(model, PageOptions::default(), &mut diagnostics);
  let id = model
    .graph
    .lookup(&IdentityKey::from(key))
    .expect("command missing");
  MarkdownWriter::default().render(&command_document(&ctx, id))
}

#[test]
fn test_single_optional_long_option_usage() {
  let model = model(json!({
    "name": "test",
    "commands": [{
      "name": "Command2",
      "options": [{ "name": "parameter1" }]
    }]
  }));

  let markdown = render_command(&model, "C:test:Command2");
  assert!(markdown.starts_with("# `Command2` Command\n"));
  assert!(markdown.contains("## Usage\n\n```\ntest Command2 [--parameter1 <VALUE>]\n```"));
}

#[test]
fn test_short_name_only_option_usage() {
  let model = model(json!({
    "name": "test",
    "commands": [{
      "name": "Command1",
      "options": [{ "short_name": "y", "required": true }]
    }]
  }));

  let markdown = render_command(&model, "C:test:Command1");
  assert!(markdown.contains("```\ntest Command1 -y <VALUE>\n```"));
  assert!(markdown.contains("| Name | Description |\n|-----|-----|\n| [y](#option-y) |  |"));
  assert!(markdown.contains("### `y` Parameter"));
}

#[test]
fn test_values_are_listed_before_options() {
  let model = model(json!({
    "name": "test",
    "commands": [{
      "name": "Command",
      "values": [
        { "index": 0 },
        { "index": 1, "meta_value": "INTEGER" },
        { "index": 2, "name": "Value3", "meta_value": "STRING" }
      ],
      "options": [
        { "name": "option1", "help_text": "First." },
        { "name": "option2", "default": 23 }
      ]
    }]
  }));

  let markdown = render_command(&model, "C:test:Command");
  let table = [
    "| Position | Name | Description |",
    "|-----|-----|-----|",
    "| 0 |  |  |",
    "| 1 |  |  |",
    "| 2 | [*Value3*](#value-value3) |  |",
    "|  | [option1](#option-option1) | First. |",
    "|  | [option2](#option-option2) |  |",
  ]
  .join("\n");
  assert!(markdown.contains(&table), "unexpected table in:\n{markdown}");

  assert!(markdown.contains(
    "test Command [<VALUE>]\n             [<VALUE:INTEGER>]\n             [<Value3:STRING>]"
  ));
  assert!(markdown.contains("<a id=\"value-0\"></a>\n\n### Parameter (Position 0)"));
  assert!(markdown.contains("### `Value3` Parameter (Position 2)"));
  assert!(markdown.contains("**Default value:** `23`"));
  assert_eq!(markdown.matches("\n___\n").count(), 4);
}

#[test]
fn test_hidden_parameters_produce_no_parameters_section() {
  let model = model(json!({
    "name": "test",
    "commands": [{
      "name": "secret",
      "values": [{ "index": 0, "hidden": true }],
      "options": [{ "name": "token", "hidden": true }]
    }]
  }));

  let mut diagnostics = Diagnostics::new();
  let ctx = PageContext::new(&model, PageOptions::default(), &mut diagnostics);
  let id = model
    .graph
    .lookup(&IdentityKey::from("C:test:secret"))
    .expect("command missing");
  let document = command_document(&ctx, id);

  assert!(document.heading("Usage").is_some());
  assert!(document.heading("Parameters").is_none());
  let markdown = MarkdownWriter::default().render(&document);
  assert!(!markdown.contains("token"));
}

#[test]
fn test_application_page_lists_commands() {
  let model = model(json!({
    "name": "tool",
    "version": "2.1.0",
    "commands": [
      { "name": "build", "help_text": "Builds things." },
      { "name": "clean" }
    ]
  }));

  let options = PageOptions {
    include_auto_generated_notice: true,
    include_version:               true,
  };
  let mut diagnostics = Diagnostics::new();
  let pages = command_line_pages(&model, options, &mut diagnostics);
  let locators: Vec<_> = pages.iter().map(|p| p.locator.to_string()).collect();
  assert_eq!(locators, vec![
    "index.md",
    "commands/build.md",
    "commands/clean.md"
  ]);

  let index = MarkdownWriter::default().render(&pages[0].document);
  assert!(index.starts_with("# `tool` Command Line Reference\n\n**Version:** 2.1.0\n"));
  assert!(index.contains("| [`build`](commands/build.md) | Builds things. |"));
  assert!(index.contains("*Documentation generated by mddocs*"));
}

#[test]
fn test_single_command_application_renders_inline() {
  let model = model(json!({
    "name": "tool",
    "options": [{ "name": "force", "short_name": "f", "value_type": "System.Boolean" }]
  }));

  let mut diagnostics = Diagnostics::new();
  let ctx = PageContext::new(&model, PageOptions::default(), &mut diagnostics);
  let app = model
    .graph
    .lookup(&IdentityKey::from("A:tool"))
    .expect("application missing");
  let markdown = MarkdownWriter::default().render(&application_document(&ctx, app));

  assert!(!markdown.contains("## Commands"));
  assert!(markdown.contains("```\ntool [--force|-f]\n```"));
  assert!(markdown.contains("| Name | Short Name | Description |"));
  assert!(markdown.contains("| [force](#option-force) | [f](#option-force) |  |"));
}
