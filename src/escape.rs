//! String escaping for hand-built SQL literals
//!
//! This is a manual stand-in for parameter binding and does not make
//! interpolated SQL safe. The escapes are MySQL-style backslash escapes; SQLite
//! does not interpret backslashes, so prefer bound parameters there.

/// Escape NUL, backslash, and single quote with a leading backslash
///
/// All other characters, including multi-byte ones, are copied unchanged.
pub fn escape(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\0' | '\\' | '\'' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
