//! Identity keys.
//!
//! Every entity and overload group carries an [`IdentityKey`] derived purely
//! from its fully-qualified origin. Keys follow the documentation-comment id
//! convention (`T:Ns.Type`, `M:Ns.Type.Method(System.String)`) so that
//! `cref` strings found in documentation can be looked up directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::{MemberKind, MemberRecord, ParameterRecord};

/// Stable, collision-free identifier of an entity.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
  #[must_use]
  pub fn new(key: impl Into<String>) -> Self {
    Self(key.into())
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The single-letter kind prefix (`T`, `M`, ...) if the key has one.
  #[must_use]
  pub fn prefix(&self) -> Option<char> {
    let mut chars = self.0.chars();
    match (chars.next(), chars.next()) {
      (Some(prefix), Some(':')) if prefix.is_ascii_uppercase() => Some(prefix),
      _ => None,
    }
  }

  /// The key without its kind prefix.
  #[must_use]
  pub fn body(&self) -> &str {
    if self.prefix().is_some() {
      &self.0[2..]
    } else {
      &self.0
    }
  }
}

impl fmt::Display for IdentityKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for IdentityKey {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

/// Join a namespace and a type name into the type's full name.
#[must_use]
pub fn full_type_name(namespace: &str, name: &str) -> String {
  if namespace.is_empty() {
    name.to_string()
  } else {
    format!("{namespace}.{name}")
  }
}

#[must_use]
pub fn namespace_key(namespace: &str) -> IdentityKey {
  IdentityKey(format!("N:{namespace}"))
}

#[must_use]
pub fn type_key(type_full_name: &str) -> IdentityKey {
  IdentityKey(format!("T:{type_full_name}"))
}

/// Key of a type member. For members that can be overloaded the key also
/// carries the generic arity (``` ``N ```), the parameter list and, for
/// conversion operators, the return type (`~Type`), which keeps every legal
/// overload apart.
#[must_use]
pub fn member_key(type_full_name: &str, member: &MemberRecord) -> IdentityKey {
  let kind = member.kind;
  let prefix = match kind {
    MemberKind::Field => 'F',
    MemberKind::Property | MemberKind::Indexer => 'P',
    MemberKind::Event => 'E',
    MemberKind::Constructor | MemberKind::Method | MemberKind::Operator => 'M',
  };
  let name = if kind == MemberKind::Constructor {
    "#ctor"
  } else {
    member.name.as_str()
  };

  let mut key = format!("{prefix}:{type_full_name}.{name}");
  if !kind.is_overloadable() {
    return IdentityKey(key);
  }

  let arity = member.type_parameters.len();
  if arity > 0 && matches!(kind, MemberKind::Method | MemberKind::Operator) {
    key.push_str(&format!("``{arity}"));
  }
  if !member.parameters.is_empty() {
    key.push('(');
    key.push_str(&parameter_list(&member.parameters));
    key.push(')');
  }
  if is_conversion_operator(kind, &member.name)
    && let Some(return_type) = member.type_name.as_deref()
  {
    key.push('~');
    key.push_str(return_type);
  }
  IdentityKey(key)
}

/// `op_Implicit` and `op_Explicit` overload on their return type alone.
#[must_use]
pub fn is_conversion_operator(kind: MemberKind, name: &str) -> bool {
  kind == MemberKind::Operator && matches!(name, "op_Implicit" | "op_Explicit")
}

/// Member name of a key body segment without its generic arity suffix:
/// ``` Run``1 ``` becomes `Run`.
#[must_use]
pub fn strip_arity(name: &str) -> &str {
  name.split_once("``").map_or(name, |(name, _)| name)
}

/// Key of an overload group, `code` being the group kind's letter.
#[must_use]
pub fn group_key(code: char, type_full_name: &str, name: &str) -> IdentityKey {
  IdentityKey(format!("G:{code}:{type_full_name}.{name}"))
}

#[must_use]
pub fn application_key(application: &str) -> IdentityKey {
  IdentityKey(format!("A:{application}"))
}

/// Key of a command; the unnamed command of a single-command application
/// has an empty name segment.
#[must_use]
pub fn command_key(application: &str, command: Option<&str>) -> IdentityKey {
  IdentityKey(format!("C:{application}:{}", command.unwrap_or_default()))
}

/// Key of a named option. The long name is preferred; options declared with
/// only a short name use `-x`.
#[must_use]
pub fn option_key(
  application: &str,
  command: Option<&str>,
  long_name: Option<&str>,
  short_name: Option<char>,
) -> IdentityKey {
  let name = match (long_name, short_name) {
    (Some(long), _) => format!("--{long}"),
    (None, Some(short)) => format!("-{short}"),
    (None, None) => String::new(),
  };
  IdentityKey(format!(
    "O:{application}:{}:{name}",
    command.unwrap_or_default()
  ))
}

#[must_use]
pub fn value_key(
  application: &str,
  command: Option<&str>,
  index: u32,
) -> IdentityKey {
  IdentityKey(format!(
    "V:{application}:{}:#{index}",
    command.unwrap_or_default()
  ))
}

/// Comma separated parameter type list as used inside member keys.
#[must_use]
pub fn parameter_list(parameters: &[ParameterRecord]) -> String {
  parameters
    .iter()
    .map(|p| p.type_name.as_str())
    .collect::<Vec<_>>()
    .join(",")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn param(name: &str, type_name: &str) -> ParameterRecord {
    ParameterRecord {
      name:      name.to_string(),
      type_name: type_name.to_string(),
    }
  }

  fn member(kind: MemberKind, name: &str) -> MemberRecord {
    MemberRecord {
      kind,
      name: name.to_string(),
      parameters: Vec::new(),
      type_parameters: Vec::new(),
      type_name: None,
      definition: None,
      attributes: Vec::new(),
      docs: None,
    }
  }

  #[test]
  fn test_member_keys_include_parameters_for_overloadable_members() {
    let params = vec![param("a", "System.String"), param("b", "System.Int32")];
    let run = MemberRecord {
      parameters: params.clone(),
      ..member(MemberKind::Method, "Run")
    };
    assert_eq!(
      member_key("Ns.Type", &run).as_str(),
      "M:Ns.Type.Run(System.String,System.Int32)"
    );
    assert_eq!(
      member_key("Ns.Type", &member(MemberKind::Method, "Run")).as_str(),
      "M:Ns.Type.Run"
    );

    let ctor = MemberRecord {
      parameters: params[..1].to_vec(),
      ..member(MemberKind::Constructor, "Type")
    };
    assert_eq!(
      member_key("Ns.Type", &ctor).as_str(),
      "M:Ns.Type.#ctor(System.String)"
    );

    let indexer = MemberRecord {
      parameters: params[1..].to_vec(),
      ..member(MemberKind::Indexer, "Item")
    };
    assert_eq!(
      member_key("Ns.Type", &indexer).as_str(),
      "P:Ns.Type.Item(System.Int32)"
    );
  }

  #[test]
  fn test_generic_arity_separates_method_overloads() {
    let plain = member(MemberKind::Method, "Run");
    let generic = MemberRecord {
      type_parameters: vec!["T".to_string()],
      ..member(MemberKind::Method, "Run")
    };
    let generic_with_args = MemberRecord {
      type_parameters: vec!["TKey".to_string(), "TValue".to_string()],
      parameters: vec![param("key", "TKey")],
      ..member(MemberKind::Method, "Run")
    };

    assert_eq!(member_key("Lib.Widget", &plain).as_str(), "M:Lib.Widget.Run");
    assert_eq!(
      member_key("Lib.Widget", &generic).as_str(),
      "M:Lib.Widget.Run``1"
    );
    assert_eq!(
      member_key("Lib.Widget", &generic_with_args).as_str(),
      "M:Lib.Widget.Run``2(TKey)"
    );
  }

  #[test]
  fn test_conversion_operators_are_keyed_by_return_type() {
    let conversion = |return_type: &str| {
      MemberRecord {
        parameters: vec![param("value", "Lib.Money")],
        type_name: Some(return_type.to_string()),
        ..member(MemberKind::Operator, "op_Implicit")
      }
    };
    assert_eq!(
      member_key("Lib.Money", &conversion("System.Int32")).as_str(),
      "M:Lib.Money.op_Implicit(Lib.Money)~System.Int32"
    );
    assert_eq!(
      member_key("Lib.Money", &conversion("System.Decimal")).as_str(),
      "M:Lib.Money.op_Implicit(Lib.Money)~System.Decimal"
    );

    let addition = MemberRecord {
      parameters: vec![param("a", "Lib.Money"), param("b", "Lib.Money")],
      type_name: Some("Lib.Money".to_string()),
      ..member(MemberKind::Operator, "op_Addition")
    };
    assert_eq!(
      member_key("Lib.Money", &addition).as_str(),
      "M:Lib.Money.op_Addition(Lib.Money,Lib.Money)"
    );
  }

  #[test]
  fn test_strip_arity() {
    assert_eq!(strip_arity("Run``1"), "Run");
    assert_eq!(strip_arity("Run"), "Run");
  }

  #[test]
  fn test_member_keys_ignore_parameters_for_plain_members() {
    assert_eq!(
      member_key("Ns.Type", &member(MemberKind::Property, "Name")).as_str(),
      "P:Ns.Type.Name"
    );
    assert_eq!(
      member_key("Ns.Type", &member(MemberKind::Event, "Changed")).as_str(),
      "E:Ns.Type.Changed"
    );
  }

  #[test]
  fn test_global_namespace_types() {
    assert_eq!(full_type_name("", "Program"), "Program");
    assert_eq!(type_key(&full_type_name("A.B", "C")).as_str(), "T:A.B.C");
  }

  #[test]
  fn test_command_line_keys() {
    assert_eq!(command_key("app", None).as_str(), "C:app:");
    assert_eq!(
      option_key("app", Some("build"), None, Some('y')).as_str(),
      "O:app:build:-y"
    );
    assert_eq!(
      option_key("app", Some("build"), Some("out"), Some('o')).as_str(),
      "O:app:build:--out"
    );
    assert_eq!(value_key("app", None, 2).as_str(), "V:app::#2");
  }

  #[test]
  fn test_prefix_and_body() {
    let key = IdentityKey::from("T:Ns.Type");
    assert_eq!(key.prefix(), Some('T'));
    assert_eq!(key.body(), "Ns.Type");

    let plain = IdentityKey::from("Type");
    assert_eq!(plain.prefix(), None);
    assert_eq!(plain.body(), "Type");
  }
}
