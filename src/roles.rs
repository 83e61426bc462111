use itertools::Itertools;

use crate::config::ConfigError;

/// Space separated list of OrderCloud roles granted to shoppers,
/// e.g. `"Shopper MeAdmin"`.
#[derive(Clone, Debug, PartialEq)]
pub struct Roles(Vec<String>);

impl Roles {
  /// Roles in the same space delimited form they were configured in
  pub fn to_scope_string(&self) -> String {
    self.0.join(" ")
  }
}

/// Roles travel to OrderCloud as OAuth scope tokens, so they follow the
/// scope-token grammar: https://www.rfc-editor.org/rfc/rfc6749#section-3.3
///
/// Adapted from https://github.com/HeroicKatora/oxide-auth/blob/019b7651e97a3ee2cde40b9806a1ecf37e051942/oxide-auth/src/primitives/scope.rs#L120
pub fn parse_roles(roles: &str) -> Result<Roles, ConfigError> {
  let mut invalid = roles.chars()
    .filter(|chr| invalid_role_char(*chr))
    .peekable();

  if invalid.peek().is_some() {
    return Err(
      ConfigError::InvalidRoles(format!(
        r#"Encountered invalid character(s) in roles: "{}""#,
        invalid.join(r#"", ""#)
      ))
    )
  }

  let roles = roles.split(' ')
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect::<Vec<_>>();

  if roles.is_empty() {
    return Err(ConfigError::InvalidRoles("At least one role is required".into()))
  }

  Ok(Roles(roles))
}

fn invalid_role_char(ch: char) -> bool {
  match ch {
      '\x21' => false,
      ch if ('\x23'..='\x5b').contains(&ch) => false,
      ch if ('\x5d'..='\x7e').contains(&ch) => false,
      ' ' => false, // Space separator is a valid char
      _ => true,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_on_spaces() {
    let roles = parse_roles("Shopper  MeAdmin ").unwrap();
    assert_eq!(roles.to_scope_string(), "Shopper MeAdmin");
  }

  #[test]
  fn rejects_invalid_characters() {
    let err = parse_roles("Shopper\tMe\"Admin").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRoles(_)));
    assert!(err.to_string().contains("\"\t\", \"\"\""));
  }

  #[test]
  fn rejects_empty_list() {
    assert!(parse_roles("   ").is_err());
  }
}
