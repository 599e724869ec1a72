//! Markup stripping for untrusted model output.
//!
//! Every fragment coming off the wire (reasoning tokens, content deltas,
//! final text) passes through [`sanitize`] before it reaches a message's
//! displayable fields.

use std::sync::OnceLock;

use regex::Regex;

/// Matches any markup-delimited span, custom tag names included, plus an
/// unterminated tag at the end of the fragment.
fn tag_pattern() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"</?[^>]+(>|$)").expect("tag pattern compiles"))
}

/// Strip markup tags, decode the five named character entities and trim
/// surrounding whitespace.
///
/// Total and pure: never fails, empty input yields empty output.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped = tag_pattern().replace_all(text, "");
    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}
