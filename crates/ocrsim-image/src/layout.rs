// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout — greedy word wrapping against a pixel width and measurement of the
// wrapped block.

use crate::font::{LineBox, SimFont};

/// Wrap `text` into lines of at most `max_width_px / glyph_width_px`
/// characters.
///
/// Any run of whitespace (including line breaks) separates words, and words
/// are joined by a single space. A word longer than a line is kept whole on a
/// line of its own. The result always holds at least one line; empty input
/// yields a single empty line.
pub fn wrap(text: &str, max_width_px: u32, glyph_width_px: u32) -> Vec<String> {
    let capacity = (max_width_px / glyph_width_px.max(1)).max(1) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= capacity {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Measured geometry of a wrapped block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Per-line ink bounds, in rendering order.
    pub lines: Vec<LineBox>,
    /// Widest line.
    pub width: u32,
    /// Sum of line heights.
    pub height: u32,
}

impl TextBlock {
    pub fn measure(lines: &[String], font: &SimFont) -> Self {
        let boxes: Vec<LineBox> = lines.iter().map(|line| font.line_box(line)).collect();
        let width = boxes.iter().map(LineBox::width).max().unwrap_or(0);
        let height = boxes.iter().map(LineBox::height).sum();
        Self {
            lines: boxes,
            width,
            height,
        }
    }
}

/// Bounding box `(width, height)` of `lines` rendered with `font`.
pub fn measure(lines: &[String], font: &SimFont) -> (u32, u32) {
    let block = TextBlock::measure(lines, font);
    (block.width, block.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap("", 100, 10), vec![String::new()]);
        assert_eq!(wrap("   \n\t ", 100, 10), vec![String::new()]);
    }

    #[test]
    fn wrap_never_returns_empty() {
        for text in ["", "a", "a b c", "supercalifragilistic", "\n\n"] {
            for width in [0, 1, 10, 1000] {
                assert!(!wrap(text, width, 10).is_empty(), "{text:?} at {width}");
            }
        }
    }

    #[test]
    fn packs_words_greedily() {
        // Ten characters per line.
        let lines = wrap("the quick brown fox jumps", 100, 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        assert!(lines.iter().all(|line| line.chars().count() <= 10));
    }

    #[test]
    fn long_words_overflow_instead_of_splitting() {
        let lines = wrap("a extraordinarily b", 50, 10);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn line_breaks_become_spaces() {
        assert_eq!(wrap("Hello\nWorld", 1000, 10), vec!["Hello World"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Each word is five characters but more bytes.
        let lines = wrap("ëëëëë ëëëëë", 110, 10);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn measure_sums_heights_and_takes_max_width() {
        let font = SimFont::builtin(8);
        let lines = vec!["abc".to_string(), "abcdef".to_string(), String::new()];
        assert_eq!(measure(&lines, &font), (48, 16));
    }
}
