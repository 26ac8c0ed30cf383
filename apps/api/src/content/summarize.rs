//! Local, model-free text summary used by `POST /api/summarize`.

/// Texts shorter than this are returned untouched.
const MIN_SUMMARY_INPUT: usize = 50;
/// Input is cut to this many characters before summarising.
const MAX_INPUT_CHARS: usize = 1024;
const SUMMARY_CHARS: usize = 200;

/// Character-based preview: short texts pass through, longer ones keep their
/// first 200 characters followed by `...`.
pub fn summarize_text(text: &str) -> String {
    let len = text.chars().count();
    if len < MIN_SUMMARY_INPUT {
        return text.to_string();
    }

    let clipped: String = text.chars().take(MAX_INPUT_CHARS).collect();
    if clipped.chars().count() < SUMMARY_CHARS {
        return clipped;
    }

    let head: String = clipped.chars().take(SUMMARY_CHARS).collect();
    format!("{head}...")
}
