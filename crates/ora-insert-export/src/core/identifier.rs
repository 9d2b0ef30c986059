//! Identifier quoting and filesystem-name sanitization.
//!
//! A single boolean toggle controls quoting for every table and column
//! identifier written to output: unquoted (dialect case-folding applies) or
//! double-quoted with embedded double quotes doubled.

/// Quote an identifier for SQL output according to the global quoting flag.
///
/// # Examples
///
/// ```
/// use ora_insert_export::core::identifier::quote_ident;
///
/// assert_eq!(quote_ident("ORDERS", false), "ORDERS");
/// assert_eq!(quote_ident("ORDERS", true), "\"ORDERS\"");
/// assert_eq!(quote_ident("WEIRD\"NAME", true), "\"WEIRD\"\"NAME\"");
/// ```
pub fn quote_ident(name: &str, quote: bool) -> String {
    if quote {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Render a table reference the way it was configured: a bare name stays
/// bare, a schema-qualified name quotes each segment separately.
pub fn render_table_ref(qualified_name: &str, quote: bool) -> String {
    qualified_name
        .split('.')
        .map(|seg| quote_ident(seg, quote))
        .collect::<Vec<_>>()
        .join(".")
}

/// Sanitize a schema/table pair into a filesystem-legal file stem.
///
/// Dot separators become underscores (they would otherwise collide with the
/// file extension), as does any character that is illegal in common
/// filesystems.
pub fn file_stem(schema: &str, table: &str) -> String {
    let raw = format!("{}.{}", schema, table);
    raw.chars()
        .map(|c| match c {
            '.' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c => c,
        })
        .collect()
}
