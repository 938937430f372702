//! Key conventions: `camelCase` identifiers ⇄ `snake_case` map keys.
//!
//! Both transforms are a single left-to-right scan; every character is
//! handled once, by position.

/// `orderId` → `order_id`.
///
/// Every uppercase letter becomes `_` followed by its lowercase form. All other
/// characters pass through unchanged, so an identifier that is already
/// snake case is returned as is.
pub fn to_snake(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    for c in identifier.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `order_id` → `orderId`.
///
/// Each `_` followed by a character is replaced by that character in
/// uppercase. A trailing `_` has nothing to capitalize and is kept.
pub fn to_camel(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut chars = identifier.chars();
    while let Some(c) = chars.next() {
        if c != '_' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => out.extend(next.to_uppercase()),
            None => out.push('_'),
        }
    }
    out
}
