//! Client filename sanitization

/// Windows reserved device names, refused as whole stems.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3",
];

/// Reduces an untrusted client filename to a flat, portable name.
///
/// Path separators become word breaks, so `../../etc/passwd` ends up as
/// `etc_passwd`. Only `[A-Za-z0-9_.-]` survive, whitespace runs join with `_`
/// and leading/trailing `.`/`_` are stripped. The result may be empty, which
/// callers must treat as a rejected upload.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();

    let stem = cleaned.split('.').next().unwrap_or_default();
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        return format!("_{}", cleaned);
    }

    cleaned
}

/// Splits a sanitized name into stem and extension (with its dot).
///
/// A leading dot does not start an extension; `archive.tar.gz` splits at the last dot.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversal_is_flattened() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(secure_filename("/var/www/cover.png"), "var_www_cover.png");
        assert!(!secure_filename("../../../x.pdf").contains('/'));
    }

    #[test]
    fn test_spaces_and_symbols() {
        assert_eq!(secure_filename("My Cover (final).png"), "My_Cover_final.png");
        assert_eq!(secure_filename("  résumé.pdf "), "rsum.pdf");
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("___"), "");
    }

    #[test]
    fn test_reserved_device_names() {
        assert_eq!(secure_filename("con.txt"), "_con.txt");
        assert_eq!(secure_filename("console.txt"), "console.txt");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("dune.pdf"), ("dune", ".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }
}
