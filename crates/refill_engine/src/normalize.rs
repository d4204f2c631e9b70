//! Leniency for an extraction service that over-escapes free-text answers.
//!
//! Only ever applied to text that failed to decode as structured JSON. The
//! replacement set mirrors what the service has been seen to emit and may
//! need adjusting for other service versions.

/// Turns literal `\n` and `\t` sequences into control characters; any
/// remaining backslash becomes a carriage return.
pub fn normalize_free_text(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace('\\', "\r")
}
