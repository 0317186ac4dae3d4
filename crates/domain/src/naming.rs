//! Identifier to column-name conversion.

/// Convert an `UpperCamelCase` identifier into a `lower_snake_case` column
/// name.
///
/// An underscore is inserted before every ASCII uppercase letter except the
/// first character, and the letter is lowercased. Everything else passes
/// through unchanged. Acronym runs are not grouped: `HTTPCode` becomes
/// `h_t_t_p_code`.
#[must_use]
pub fn to_column_name(ident: &str) -> String {
    let mut column = String::with_capacity(ident.len() + 4);
    for (index, ch) in ident.char_indices() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                column.push('_');
            }
            column.push(ch.to_ascii_lowercase());
        } else {
            column.push(ch);
        }
    }
    column
}
