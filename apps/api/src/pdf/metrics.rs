//! Approximate glyph widths and greedy line wrapping for report text.
//!
//! Widths are in em units. The report font is a CJK gothic whose Latin glyphs are
//! roughly half-width and whose Hangul and Hanja glyphs are full-width, so two
//! buckets are enough to keep lines inside the margins.

/// Width of printable ASCII glyphs.
pub const HALF_WIDTH_EM: f32 = 0.5;
/// Width of everything else (Hangul, Hanja, full-width punctuation).
pub const FULL_WIDTH_EM: f32 = 1.0;

pub fn char_width_em(c: char) -> f32 {
    if c.is_ascii() {
        HALF_WIDTH_EM
    } else {
        FULL_WIDTH_EM
    }
}

/// Measures the rendered width of a string in em units.
pub fn measure_em(s: &str) -> f32 {
    s.chars().map(char_width_em).sum()
}

/// Wraps `text` into lines no wider than `max_em`.
///
/// Newlines are hard breaks and blank lines are kept. Words wider than a whole line
/// are split between characters.
pub fn wrap_text(text: &str, max_em: f32) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_line(line, max_em))
        .collect()
}

fn wrap_line(line: &str, max_em: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in line.split_whitespace() {
        let word_width = measure_em(word);
        let space_width = if current.is_empty() { 0.0 } else { HALF_WIDTH_EM };

        if current_width + space_width + word_width <= max_em {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width += space_width + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        if word_width <= max_em {
            current.push_str(word);
            current_width = word_width;
        } else {
            for c in word.chars() {
                let w = char_width_em(c);
                if current_width + w > max_em && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
