//! Fragment filename to template-variable name mapping.

use std::borrow::Cow;

/// Derive the template variable name for a fragment filename.
///
/// The trailing extension is stripped, then every `_x` (underscore followed
/// by an ASCII lowercase letter) becomes `X`:
///
/// ```
/// use tessera_components::derive;
///
/// assert_eq!(derive("day_banner.html"), "dayBanner");
/// assert_eq!(derive("hero.html"), "hero");
/// ```
///
/// Digits and other punctuation pass through untouched, so the result is not
/// always a valid variable name. See [`sanitize`].
pub fn derive(file_name: &str) -> String {
    let stem = strip_extension(file_name);

    let mut out = String::with_capacity(stem.len());
    let mut chars = stem.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

/// Human-readable name shown in the component library.
///
/// `day_banner.html` becomes `day banner`.
pub fn display_name(file_name: &str) -> String {
    file_name.replacen(".html", "", 1).replace('_', " ")
}

/// Coerce a derived name into a valid template variable.
///
/// Anything outside `[A-Za-z0-9_]` becomes `_`, and a name that is empty or
/// starts with a digit gets a leading `_`. Returns `Cow::Borrowed` when the
/// input was already valid.
pub fn sanitize(identifier: &str) -> Cow<'_, str> {
    if is_valid_identifier(identifier) {
        return Cow::Borrowed(identifier);
    }

    let mut out: String = identifier
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }

    Cow::Owned(out)
}

/// Whether `identifier` can be used as a template variable name.
pub fn is_valid_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Strip everything from the last `.` to the end, unless the would-be
/// extension is empty or contains a path separator.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) => {
            let ext = &file_name[pos + 1..];
            if ext.is_empty() || ext.contains('/') {
                file_name
            } else {
                &file_name[..pos]
            }
        }
        None => file_name,
    }
}
