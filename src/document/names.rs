//! Escaping of arbitrary column and table names into XML element names.
//!
//! Characters that may not appear in a name are written as `_xHHHH_` (or
//! `_xHHHHHHHH_` outside the basic plane). An underscore that would
//! otherwise read as the start of such an escape is itself escaped.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"_x([0-9A-Fa-f]{8}|[0-9A-Fa-f]{4})_").expect("escape pattern is valid")
});

static ESCAPE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^_x([0-9A-Fa-f]{8}|[0-9A-Fa-f]{4})_").expect("escape prefix pattern is valid")
});

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Encode a name so it is a valid XML element name
pub fn encode_name(name: &str) -> Cow<'_, str> {
    let needs_escape = name.char_indices().any(|(i, c)| {
        let valid = if i == 0 { is_name_start(c) } else { is_name_char(c) };
        !valid || (c == '_' && ESCAPE_PREFIX.is_match(&name[i..]))
    });
    if !needs_escape {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len() + 8);
    for (i, c) in name.char_indices() {
        let valid = if i == 0 { is_name_start(c) } else { is_name_char(c) };
        if valid && !(c == '_' && ESCAPE_PREFIX.is_match(&name[i..])) {
            out.push(c);
        } else if (c as u32) <= 0xFFFF {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            out.push_str(&format!("_x{:08X}_", c as u32));
        }
    }
    Cow::Owned(out)
}

/// Reverse [`encode_name`]. Escapes that do not name a valid character are
/// left as written.
pub fn decode_name(name: &str) -> Cow<'_, str> {
    ESCAPE.replace_all(name, |caps: &Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
}
