//! `${token}` substitution in connection strings

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("token pattern is valid"));

/// The only placeholder kept verbatim when no secret is supplied
const PASSWORD_TOKEN: &str = "password";

/// Resolve `${token}` placeholders against the secret.
///
/// Tokens starting with `password` (any case) take the secret. Without a
/// secret, `${password}` is left in place. Every other token becomes empty.
pub fn resolve(template: Option<&str>, secret: Option<&str>) -> Option<String> {
    template.map(|t| resolve_str(t, secret))
}

/// [`resolve`] for a string that is known to be present
pub fn resolve_str(template: &str, secret: Option<&str>) -> String {
    if template.is_empty() {
        return String::new();
    }

    TOKEN_PATTERN
        .replace_all(template, |caps: &Captures| {
            let token = &caps[1];
            match secret {
                Some(secret) if starts_with_ignore_case(token, PASSWORD_TOKEN) => {
                    secret.to_string()
                }
                None if token == PASSWORD_TOKEN => caps[0].to_string(),
                _ => String::new(),
            }
        })
        .into_owned()
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
