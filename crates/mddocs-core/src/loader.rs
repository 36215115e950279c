//! Attribute-driven command loading.
//!
//! Derives [`ApplicationRecord`]s from assemblies using the
//! CommandLineParser attribute convention: verb classes are commands,
//! attributed properties are options and positional values. Attributes are
//! dispatched through a static table keyed by attribute type name.

use crate::{
  diagnostics::{Diagnostic, Diagnostics},
  error::{CoreError, CoreResult},
  identity,
  metadata::{
    ApplicationRecord,
    AssemblyRecord,
    AttributeRecord,
    CommandRecord,
    MemberKind,
    MemberRecord,
    OptionRecord,
    TypeRecord,
    ValueRecord,
  },
};

const VERB_ATTRIBUTE: &str = "CommandLine.VerbAttribute";
const OPTION_ATTRIBUTE: &str = "CommandLine.OptionAttribute";
const VALUE_ATTRIBUTE: &str = "CommandLine.ValueAttribute";
const TITLE_ATTRIBUTE: &str = "System.Reflection.AssemblyTitleAttribute";
const VERSION_ATTRIBUTE: &str =
  "System.Reflection.AssemblyInformationalVersionAttribute";

const STRING_TYPE: &str = "System.String";
const CHAR_TYPE: &str = "System.Char";

/// What an attribute declares about the record it is attached to.
#[derive(Debug)]
enum Declaration {
  Command(CommandRecord),
  Option(OptionRecord),
  Value(ValueRecord),
  Title(String),
  Version(String),
}

/// The record an attribute is attached to.
struct Target<'a> {
  /// Full name of the attributed item, for messages.
  name:       &'a str,
  /// Declared type of an attributed property.
  value_type: Option<&'a str>,
}

type Handler =
  fn(&AttributeRecord, &Target<'_>, &mut Diagnostics) -> CoreResult<Option<Declaration>>;

static HANDLERS: &[(&str, Handler)] = &[
  (VERB_ATTRIBUTE, verb),
  (OPTION_ATTRIBUTE, option),
  (VALUE_ATTRIBUTE, value),
  (TITLE_ATTRIBUTE, title),
  (VERSION_ATTRIBUTE, informational_version),
];

fn handler(attribute_type: &str) -> Option<Handler> {
  HANDLERS
    .iter()
    .find(|(name, _)| *name == attribute_type)
    .map(|(_, handler)| *handler)
}

/// Run every known attribute of a record through its handler.
fn declarations(
  attributes: &[AttributeRecord],
  target: &Target<'_>,
  diagnostics: &mut Diagnostics,
) -> CoreResult<Vec<Declaration>> {
  let mut found = Vec::new();
  for attribute in attributes {
    let Some(handler) = handler(&attribute.type_name) else {
      continue;
    };
    if let Some(declaration) = handler(attribute, target, diagnostics)? {
      found.push(declaration);
    }
  }
  Ok(found)
}

fn constructor_string(attribute: &AttributeRecord) -> Option<String> {
  attribute
    .constructor_arguments
    .iter()
    .find(|a| a.type_name == STRING_TYPE)
    .and_then(|a| a.value.as_str())
    .map(str::to_owned)
}

fn verb(
  attribute: &AttributeRecord,
  target: &Target<'_>,
  _: &mut Diagnostics,
) -> CoreResult<Option<Declaration>> {
  let name = constructor_string(attribute).ok_or_else(|| {
    CoreError::InvalidMetadata(format!(
      "verb attribute on `{}` has no name",
      target.name
    ))
  })?;

  Ok(Some(Declaration::Command(CommandRecord {
    name,
    help_text: attribute.named_str("HelpText"),
    hidden: attribute.named_bool("Hidden"),
    options: Vec::new(),
    values: Vec::new(),
  })))
}

fn option(
  attribute: &AttributeRecord,
  target: &Target<'_>,
  diagnostics: &mut Diagnostics,
) -> CoreResult<Option<Declaration>> {
  let mut name = None;
  let mut short_name = None;

  for argument in &attribute.constructor_arguments {
    match argument.type_name.as_str() {
      STRING_TYPE => name = argument.value.as_str().map(str::to_owned),
      CHAR_TYPE => {
        short_name = argument.value.as_str().and_then(|s| s.chars().next());
      },
      other => {
        diagnostics.push(Diagnostic::UnexpectedAttributeArgument {
          member:        target.name.to_string(),
          argument_type: other.to_string(),
        });
      },
    }
  }

  Ok(Some(Declaration::Option(OptionRecord {
    name,
    short_name,
    required: attribute.named_bool("Required"),
    hidden: attribute.named_bool("Hidden"),
    default: attribute.named("Default").cloned().filter(|v| !v.is_null()),
    help_text: attribute.named_str("HelpText"),
    meta_value: attribute.named_str("MetaValue"),
    value_type: target.value_type.map(str::to_owned),
  })))
}

fn value(
  attribute: &AttributeRecord,
  target: &Target<'_>,
  _: &mut Diagnostics,
) -> CoreResult<Option<Declaration>> {
  let index = attribute
    .constructor_arguments
    .first()
    .and_then(|a| a.value.as_u64())
    .and_then(|i| u32::try_from(i).ok())
    .ok_or_else(|| {
      CoreError::InvalidMetadata(format!(
        "value attribute on `{}` has no position",
        target.name
      ))
    })?;

  Ok(Some(Declaration::Value(ValueRecord {
    index,
    name: attribute.named_str("MetaName"),
    required: attribute.named_bool("Required"),
    hidden: attribute.named_bool("Hidden"),
    default: attribute.named("Default").cloned().filter(|v| !v.is_null()),
    help_text: attribute.named_str("HelpText"),
    meta_value: attribute.named_str("MetaValue"),
  })))
}

fn title(
  attribute: &AttributeRecord,
  _: &Target<'_>,
  _: &mut Diagnostics,
) -> CoreResult<Option<Declaration>> {
  Ok(
    constructor_string(attribute)
      .filter(|s| !s.is_empty())
      .map(Declaration::Title),
  )
}

fn informational_version(
  attribute: &AttributeRecord,
  _: &Target<'_>,
  _: &mut Diagnostics,
) -> CoreResult<Option<Declaration>> {
  Ok(
    constructor_string(attribute)
      .filter(|s| !s.is_empty())
      .map(Declaration::Version),
  )
}

/// Build the command-line application declared by an attributed assembly.
///
/// If any non-abstract type carries a verb attribute the application has
/// one command per visible verb. Otherwise it is a single-command
/// application whose options come from the first type declaring option or
/// value properties.
///
/// # Errors
///
/// Returns [`CoreError::InvalidMetadata`] for verb or value attributes
/// missing their required constructor argument.
pub fn load_application(
  assembly: &AssemblyRecord,
  diagnostics: &mut Diagnostics,
) -> CoreResult<ApplicationRecord> {
  let mut application = ApplicationRecord {
    name: assembly.name.clone(),
    version: assembly.version.clone(),
    ..Default::default()
  };

  let assembly_target = Target {
    name:       &assembly.name,
    value_type: None,
  };
  for declaration in
    declarations(&assembly.attributes, &assembly_target, diagnostics)?
  {
    match declaration {
      Declaration::Title(title) => application.name = title,
      Declaration::Version(version) => application.version = Some(version),
      _ => {},
    }
  }

  let types: Vec<&TypeRecord> =
    assembly.types.iter().filter(|t| !t.is_abstract).collect();

  let mut verbs = Vec::new();
  for ty in &types {
    let full_name = identity::full_type_name(&ty.namespace, &ty.name);
    let target = Target {
      name:       &full_name,
      value_type: None,
    };
    for declaration in declarations(&ty.attributes, &target, diagnostics)? {
      if let Declaration::Command(command) = declaration {
        verbs.push((*ty, command));
      }
    }
  }

  if verbs.is_empty() {
    log::info!(
      "No class attributed with `{VERB_ATTRIBUTE}` found, assuming an \
       application without sub-commands"
    );

    let candidates: Vec<&TypeRecord> = types
      .iter()
      .copied()
      .filter(|t| t.members.iter().any(is_parameter_property))
      .collect();

    match candidates.as_slice() {
      [] => {
        diagnostics.push(Diagnostic::NoOptionSource {
          application: application.name.clone(),
        });
      },
      [source, rest @ ..] => {
        if !rest.is_empty() {
          diagnostics.push(Diagnostic::AmbiguousOptionSource {
            chosen:  identity::full_type_name(&source.namespace, &source.name),
            ignored: rest
              .iter()
              .map(|t| identity::full_type_name(&t.namespace, &t.name))
              .collect(),
          });
        }
        let (options, values) = parameters(assembly, source, diagnostics)?;
        application.options = options;
        application.values = values;
      },
    }
  } else {
    log::info!(
      "Found class(es) attributed with `{VERB_ATTRIBUTE}`, assuming an \
       application with sub-commands"
    );

    for (ty, mut command) in verbs {
      if command.hidden {
        log::debug!("Skipping hidden verb `{}`", command.name);
        continue;
      }
      let (options, values) = parameters(assembly, ty, diagnostics)?;
      command.options = options;
      command.values = values;
      application.commands.push(command);
    }
  }

  Ok(application)
}

fn is_parameter_property(member: &MemberRecord) -> bool {
  member.kind == MemberKind::Property
    && member
      .attributes
      .iter()
      .any(|a| a.type_name == OPTION_ATTRIBUTE || a.type_name == VALUE_ATTRIBUTE)
}

/// Properties of a type followed by those inherited from base types
/// present in the same assembly.
fn all_properties<'a>(
  assembly: &'a AssemblyRecord,
  ty: &'a TypeRecord,
) -> Vec<(String, &'a MemberRecord)> {
  let mut properties = Vec::new();
  let mut visited = Vec::new();
  let mut current = Some(ty);

  while let Some(ty) = current {
    let full_name = identity::full_type_name(&ty.namespace, &ty.name);
    if visited.contains(&full_name) {
      break;
    }
    for member in ty.members.iter().filter(|m| m.kind == MemberKind::Property) {
      properties.push((format!("{full_name}.{}", member.name), member));
    }
    current = ty.base_type.as_deref().and_then(|base| {
      assembly
        .types
        .iter()
        .find(|t| identity::full_type_name(&t.namespace, &t.name) == base)
    });
    visited.push(full_name);
  }

  properties
}

fn parameters(
  assembly: &AssemblyRecord,
  ty: &TypeRecord,
  diagnostics: &mut Diagnostics,
) -> CoreResult<(Vec<OptionRecord>, Vec<ValueRecord>)> {
  let mut options = Vec::new();
  let mut values = Vec::new();

  for (name, property) in all_properties(assembly, ty) {
    let target = Target {
      name:       &name,
      value_type: property.type_name.as_deref(),
    };
    for declaration in declarations(&property.attributes, &target, diagnostics)? {
      match declaration {
        Declaration::Option(option) => options.push(option),
        Declaration::Value(value) => values.push(value),
        _ => {},
      }
    }
  }

  values.sort_by_key(|v| v.index);
  Ok((options, values))
}
