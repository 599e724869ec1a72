//! Outbound prompt shaping for the plain endpoint.
//!
//! The plain endpoint chokes on structural characters in the question, so
//! the session strips a fixed list of literals before dispatch. This is a
//! request-side transform, distinct from the sanitizer that guards model
//! output on the way in.

/// Literal substrings removed from outbound text, in this exact order.
/// Later entries can be no-ops when an earlier removal already consumed
/// the characters they would match.
const OUTBOUND_REMOVALS: &[&str] = &[
    "\r\n", "\n", "\r", // newlines
    "\"", "'", "\u{201c}", "\u{201d}", "\u{2018}", "\u{2019}", // quotes
    ":", "\u{ff1a}", ";", "\u{ff1b}", // colon and semicolon variants
    "{", "}", "[", "]", // braces and brackets
    "<", ">", "/", "\\", // angle brackets and slashes
];

/// Rewrite outbound text by applying every removal in sequence.
pub fn shape_outbound(text: &str) -> String {
    let mut shaped = text.to_string();
    for literal in OUTBOUND_REMOVALS {
        shaped = shaped.replace(literal, "");
    }
    shaped
}
