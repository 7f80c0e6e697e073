/*
 * url.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Link target safety and link-card URL clean-up.
 */

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use ::url::Url;

/// Decides whether a link target may be kept as-is.
pub type UrlPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Schemes accepted by [`is_safe_url`].
pub const ALLOWED_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "sftp", "mailto", "tel", "irc", "ssh", "git", "notes",
    "skype", "slack", "zoommtg", "msteams",
];

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*):").unwrap());

static PAGE_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*/pages/\d+)(?:/[^/]*)?/?$").unwrap());

/// The default link safety predicate.
///
/// Relative references and fragments are safe. Absolute URLs are safe
/// only when their scheme is in [`ALLOWED_SCHEMES`]. Whitespace and
/// control characters are ignored when reading the scheme, so
/// `java\tscript:` is still recognized.
pub fn is_safe_url(url: &str) -> bool {
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    if compact.is_empty() {
        return false;
    }
    match SCHEME_RE.captures(&compact) {
        Some(captures) => {
            let scheme = captures[1].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        None => true,
    }
}

/// Shorten a link to a page under `base_url` to its canonical form.
///
/// `<base>/.../pages/<id>/<title-slug>?query#fragment` becomes
/// `<base>/.../pages/<id>`. Any other URL, any URL that does not parse,
/// or any URL when no base is configured, is returned unchanged.
pub fn clean_up_url_if_confluence(url: &str, base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() || !url.starts_with(base) {
        return url.to_string();
    }
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let Some(page_path) = PAGE_PATH_RE
        .captures(parsed.path())
        .map(|captures| captures[1].to_string())
    else {
        return url.to_string();
    };
    parsed.set_path(&page_path);
    parsed.set_query(None);
    parsed.set_fragment(None);
    parsed.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_urls() {
        assert!(is_safe_url("https://example.com"));
        assert!(is_safe_url("HTTP://EXAMPLE.COM"));
        assert!(is_safe_url("mailto:someone@example.com"));
        assert!(is_safe_url("#section"));
        assert!(is_safe_url("../other.md"));
        assert!(is_safe_url("/absolute/path"));
    }

    #[test]
    fn test_unsafe_urls() {
        assert!(!is_safe_url(""));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("java\tscript:alert(1)"));
        assert!(!is_safe_url(" JavaScript:alert(1)"));
        assert!(!is_safe_url("vbscript:msgbox"));
        assert!(!is_safe_url("data:text/html;base64,AAAA"));
        assert!(!is_safe_url("wikilinks:Some Page"));
    }

    #[test]
    fn test_clean_up_page_url() {
        let base = "https://example.atlassian.net/";
        assert_eq!(
            clean_up_url_if_confluence(
                "https://example.atlassian.net/wiki/spaces/DOC/pages/12345/My+Page?src=contextnavpagetreemode",
                base
            ),
            "https://example.atlassian.net/wiki/spaces/DOC/pages/12345"
        );
        assert_eq!(
            clean_up_url_if_confluence("https://example.atlassian.net/wiki/spaces/DOC/pages/12345", base),
            "https://example.atlassian.net/wiki/spaces/DOC/pages/12345"
        );
        assert_eq!(
            clean_up_url_if_confluence(
                "https://example.atlassian.net/wiki/spaces/DOC/pages/12345/My+Page/#Heading-One",
                base
            ),
            "https://example.atlassian.net/wiki/spaces/DOC/pages/12345"
        );
    }

    #[test]
    fn test_clean_up_keeps_unparseable_urls() {
        let base = "https://example.atlassian.net";
        let broken = "https://example.atlassian.net:notaport/wiki/spaces/DOC/pages/1/x";
        assert_eq!(clean_up_url_if_confluence(broken, base), broken);
    }

    #[test]
    fn test_clean_up_leaves_other_urls() {
        let base = "https://example.atlassian.net";
        let other = "https://example.com/wiki/spaces/DOC/pages/12345/My+Page?x=1";
        assert_eq!(clean_up_url_if_confluence(other, base), other);
        let overview = "https://example.atlassian.net/wiki/spaces/DOC/overview?x=1";
        assert_eq!(clean_up_url_if_confluence(overview, base), overview);
        assert_eq!(clean_up_url_if_confluence(other, ""), other);
    }
}
