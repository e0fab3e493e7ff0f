//! Decoding of textual permission expressions.
//!
//! The grammar is a bracketed, comma separated list whose first element is the
//! mode and whose remaining elements are the required tokens:
//!
//! ```text
//! expression := open element ("," element)* close
//! open       := "{" | "["
//! close      := "}" | "]"
//! element    := "'" text "'" | '"' text '"' | text
//! ```
//!
//! Elements are trimmed and blank elements are dropped. Commas inside a quoted
//! element do not split it.

use crate::error::PolicyError;
use crate::types::{CheckMode, PermissionExpression};

/// Decode a raw expression such as `{'permissions', 'user_create', 'user_update'}`.
///
/// An unrecognized leading element is not an error: it yields
/// [`CheckMode::Unrecognized`], which never matches.
///
/// ```rust
/// use permgate_core::{CheckMode, parser};
///
/// let expr = parser::decode("{'roles', 'admin', 'editor'}").unwrap();
/// assert_eq!(expr.mode(), &CheckMode::Roles);
/// assert_eq!(expr.required(), &["admin".to_string(), "editor".to_string()]);
/// ```
pub fn decode(raw: &str) -> Result<PermissionExpression, PolicyError> {
    let body = strip_brackets(raw)?;
    let elements = tokenize(body)?;

    let mut state = State::Mode;
    let mut tokens = Vec::with_capacity(elements.len().saturating_sub(1));
    for element in elements {
        state = match state {
            State::Mode => {
                let mode = element
                    .parse()
                    .unwrap_or_else(|_| CheckMode::Unrecognized(element.clone()));
                State::Required(mode)
            }
            State::Required(mode) => {
                tokens.push(element);
                State::Required(mode)
            }
        };
    }

    match state {
        State::Mode => Err(PolicyError::MalformedExpression(format!(
            "'{}' has no elements (expected {{'roles'|'permissions', 'token', ...}})",
            raw.trim()
        ))),
        State::Required(mode) => Ok(PermissionExpression::new(mode, tokens)),
    }
}

enum State {
    Mode,
    Required(CheckMode),
}

fn strip_brackets(raw: &str) -> Result<&str, PolicyError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some('{'), Some('}')) | (Some('['), Some(']')) => Ok(&trimmed[1..trimmed.len() - 1]),
        _ => Err(PolicyError::MalformedExpression(format!(
            "'{trimmed}' is not enclosed in {{...}} or [...]"
        ))),
    }
}

/// Split the bracket body on commas that are not inside a quoted element.
fn tokenize(body: &str) -> Result<Vec<String>, PolicyError> {
    let mut elements = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;

    for (idx, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            // A quote only opens at the start of an element, so `it's` stays bare.
            (None, '\'' | '"') if body[start..idx].trim().is_empty() => quote = Some(c),
            (None, ',') => {
                push_element(&mut elements, &body[start..idx]);
                start = idx + 1;
            }
            (None, _) => {}
        }
    }

    if let Some(q) = quote {
        return Err(PolicyError::MalformedExpression(format!(
            "unterminated {q} quote in '{}'",
            body.trim()
        )));
    }
    push_element(&mut elements, &body[start..]);

    Ok(elements)
}

fn push_element(elements: &mut Vec<String>, raw: &str) {
    let token = unquote(raw.trim()).trim();
    if !token.is_empty() {
        elements.push(token.to_string());
    }
}

fn unquote(s: &str) -> &str {
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        quoted_set = { "{'roles', 'admin', 'editor'}", CheckMode::Roles, &["admin", "editor"] },
        no_spaces = { "{'permissions','user_create','user_update'}", CheckMode::Permissions, &["user_create", "user_update"] },
        stringified_list = { "[roles, admin]", CheckMode::Roles, &["admin"] },
        double_quotes = { r#"{"permissions", "doc_read"}"#, CheckMode::Permissions, &["doc_read"] },
        bare_set = { "{permissions, doc_read}", CheckMode::Permissions, &["doc_read"] },
        outer_whitespace = { "  { 'roles' , 'admin' }  ", CheckMode::Roles, &["admin"] },
        blank_elements_dropped = { "{'roles',, ,'admin',}", CheckMode::Roles, &["admin"] },
        blank_quoted_dropped = { "{'roles', '', ' ', 'admin'}", CheckMode::Roles, &["admin"] },
        padded_inside_quotes = { "{' roles ', ' admin '}", CheckMode::Roles, &["admin"] },
        order_preserved = { "{'roles','c','a','b'}", CheckMode::Roles, &["c", "a", "b"] },
        mode_only = { "{'roles'}", CheckMode::Roles, &[] },
        comma_inside_quotes = { "{'permissions', 'a,b', 'c'}", CheckMode::Permissions, &["a,b", "c"] },
        apostrophe_in_bare = { "{permissions, it's}", CheckMode::Permissions, &["it's"] },
    )]
    fn test_decode(raw: &str, mode: CheckMode, tokens: &[&str]) {
        let expr = decode(raw).unwrap();
        assert_eq!(expr.mode(), &mode);
        assert_eq!(expr.tokens(), tokens);
        assert_eq!(expr.required(), tokens);
    }

    #[parameterized(
        unknown = { "{'unknownmode', 'X'}", "unknownmode" },
        wrong_case = { "{'ROLES', 'admin'}", "ROLES" },
        token_first = { "{'admin', 'roles'}", "admin" },
    )]
    fn test_decode_unrecognized_mode(raw: &str, leading: &str) {
        let expr = decode(raw).unwrap();
        assert_eq!(expr.mode(), &CheckMode::Unrecognized(leading.to_string()));
        assert!(expr.required().is_empty());
    }

    #[parameterized(
        empty_string = { "" },
        no_brackets = { "'roles', 'admin'" },
        only_open = { "{" },
        mismatched = { "{'roles', 'admin']" },
        empty_set = { "{}" },
        blank_set = { "{ , ,}" },
        unterminated_quote = { "{'roles', 'admin}" },
    )]
    fn test_decode_malformed(raw: &str) {
        let result = decode(raw);
        assert!(
            matches!(result, Err(PolicyError::MalformedExpression(_))),
            "expected malformed expression for {raw:?}, got {result:?}"
        );
    }

    #[test]
    fn test_decode_via_from_str() {
        let expr: PermissionExpression = "{'permissions', 'doc_write'}".parse().unwrap();
        assert_eq!(expr.mode(), &CheckMode::Permissions);
    }
}
