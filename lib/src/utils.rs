use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

pub fn get_default_dbdir() -> PathBuf {
    if let Ok(path) = std::env::var("SENGI_DEFAULT_DBDIR") {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(path).join("sengi");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/share/sengi");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("sengi");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn get_config_dir() -> PathBuf {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(path).join("sengi");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config/sengi");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("sengi");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    // Characters that are invalid in filenames on at least one platform,
    // plus control characters. Path separators are handled separately.
    UNSAFE.get_or_init(|| Regex::new(r#"[:*?"<>|\x00-\x1f]"#).unwrap())
}

/// Derive a filename-safe form of an engine's display name.
///
/// Path separators become `-`, other filesystem-unsafe characters are
/// stripped. The result is never empty: a name that sanitizes away
/// entirely falls back to "engine". Idempotent.
pub fn sanitize_engine_name(name: &str) -> String {
    let replaced = name.trim().replace(['/', '\\'], "-");
    let cleaned = unsafe_chars().replace_all(&replaced, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "engine".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Append `ext` (dot included) unless the name already ends with it.
/// Case-insensitive, appends at most once.
pub fn ensure_extension(name: &str, ext: &str) -> String {
    if name.to_ascii_lowercase().ends_with(&ext.to_ascii_lowercase()) {
        name.to_string()
    } else {
        format!("{}{}", name, ext)
    }
}

pub fn is_http_url(url: &str) -> bool {
    static HTTP: OnceLock<Regex> = OnceLock::new();
    HTTP.get_or_init(|| Regex::new(r"^https?://\S+$").unwrap())
        .is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("DuckDuckGo", "DuckDuckGo")]
    #[case("a/b", "a-b")]
    #[case("a\\b", "a-b")]
    #[case("Wiki: EN", "Wiki EN")]
    #[case("what?*", "what")]
    #[case("  padded  ", "padded")]
    #[case("///", "---")]
    #[case(":::", "engine")]
    #[case("", "engine")]
    fn test_sanitize_engine_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_engine_name(input), expected);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["a/b", "Wiki: EN", "plain", "x?y*z"] {
            let once = sanitize_engine_name(name);
            assert_eq!(sanitize_engine_name(&once), once);
        }
    }

    #[rstest]
    #[case("engines", ".zip", "engines.zip")]
    #[case("engines.zip", ".zip", "engines.zip")]
    #[case("engines.ZIP", ".zip", "engines.ZIP")]
    #[case("ddg", ".xml", "ddg.xml")]
    #[case("ddg.xml", ".xml", "ddg.xml")]
    fn test_ensure_extension(#[case] name: &str, #[case] ext: &str, #[case] expected: &str) {
        assert_eq!(ensure_extension(name, ext), expected);
    }

    #[test]
    fn test_ensure_extension_appends_once() {
        let once = ensure_extension("engines", ".zip");
        assert_eq!(ensure_extension(&once, ".zip"), once);
    }

    #[rstest]
    #[case("https://example.com/search?q={searchTerms}", true)]
    #[case("http://example.com", true)]
    #[case("ftp://example.com", false)]
    #[case("javascript:alert(1)", false)]
    #[case("example.com/search", false)]
    #[case("", false)]
    fn test_is_http_url(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_http_url(url), expected);
    }
}
