//! Text measurement and wrapping for the builtin Helvetica faces.
//!
//! Widths use per-class average advances rather than real font metrics.
//! That is close enough for column fitting; vertical layout does not depend
//! on it beyond the number of wrapped lines.

use super::Weight;

/// Points to millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

const LINE_SPACING: f32 = 1.15;

fn char_width_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | 'I' => 0.28,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '/' | '-' => 0.33,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.85,
        'A'..='Z' => 0.67,
        '0'..='9' => 0.556,
        'a'..='z' => 0.52,
        _ => 0.6,
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, size: f32, weight: Weight) -> f32 {
    let factor = match weight {
        Weight::Normal => 1.0,
        Weight::Bold => 1.06,
    };
    text.chars().map(char_width_em).sum::<f32>() * size * PT_TO_MM * factor
}

/// Height of one text line in millimetres.
pub fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

/// Baseline offset that vertically centres one line of `size` in a box of `height`.
pub fn centered_baseline(top: f32, height: f32, size: f32) -> f32 {
    top + (height + size * PT_TO_MM * 0.7) / 2.0
}

/// Wrap text to `max_width`. Explicit newlines always break; words longer
/// than the width are split by character.
pub fn wrap(text: &str, max_width: f32, size: f32, weight: Weight) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, size, weight) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, size, weight) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, max_width, size, weight);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }

    lines
}

fn break_word(word: &str, max_width: f32, size: f32, weight: Weight) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && text_width(&current, size, weight) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}

/// Shorten text with an ellipsis so it fits `max_width`.
pub fn truncate(text: &str, max_width: f32, size: f32, weight: Weight) -> String {
    const ELLIPSIS: &str = "...";

    if text_width(text, size, weight) <= max_width {
        return text.to_string();
    }

    let mut truncated: String = text.to_string();
    while !truncated.is_empty() && text_width(&format!("{truncated}{ELLIPSIS}"), size, weight) > max_width {
        truncated.pop();
    }
    format!("{}{ELLIPSIS}", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width("Report", 8.0, Weight::Normal);
        let large = text_width("Report", 16.0, Weight::Normal);
        assert!((large - small * 2.0).abs() < 1e-4);
        assert!(text_width("Report", 8.0, Weight::Bold) > small);
        assert_eq!(text_width("", 10.0, Weight::Normal), 0.0);
    }

    #[test]
    fn test_wrap_keeps_explicit_lines() {
        let lines = wrap("MIDTERM: 80%\nFINAL: 90%", 100.0, 10.0, Weight::Normal);
        assert_eq!(lines, vec!["MIDTERM: 80%", "FINAL: 90%"]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        let text = "Introduction to Theoretical Computer Science";
        let lines = wrap(text, 30.0, 10.0, Weight::Normal);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, Weight::Normal) <= 30.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 10.0, 10.0, Weight::Normal);
        assert!(lines.len() > 2);
        assert_eq!(lines.concat(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        for line in &lines {
            assert!(text_width(line, 10.0, Weight::Normal) <= 10.0);
        }
    }

    #[test]
    fn test_wrap_empty_text_is_one_line() {
        assert_eq!(wrap("", 20.0, 10.0, Weight::Normal), vec![String::new()]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 50.0, 10.0, Weight::Normal), "Short");
        let cut = truncate("A very long department name that does not fit", 30.0, 10.0, Weight::Normal);
        assert!(cut.ends_with("..."));
        assert!(text_width(&cut, 10.0, Weight::Normal) <= 30.0);
    }
}
