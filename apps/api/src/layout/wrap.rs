//! Greedy word wrap against the static font metrics.

use crate::layout::font_metrics::FontMetricTable;

/// Text style for one run of wrapped lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub bold: bool,
}

/// Splits `text` into lines no wider than `max_width_pt`.
///
/// Explicit newlines always break. Words wider than a whole line are cut at
/// character boundaries. Blank input yields no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    style: TextStyle,
    max_width_pt: f32,
) -> Vec<String> {
    text.lines()
        .flat_map(|paragraph| wrap_paragraph(paragraph, metrics, style, max_width_pt))
        .collect()
}

fn wrap_paragraph(
    paragraph: &str,
    metrics: &FontMetricTable,
    style: TextStyle,
    max_width_pt: f32,
) -> Vec<String> {
    let width = |s: &str| metrics.width_pt(s, style.size_pt, style.bold);
    let space_w = width(" ");

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0_f32;

    for word in paragraph.split_whitespace() {
        let pieces = if width(word) > max_width_pt {
            split_long_word(word, &width, max_width_pt)
        } else {
            vec![word.to_string()]
        };

        for piece in pieces {
            let piece_w = width(&piece);
            if current.is_empty() {
                current_w = piece_w;
                current = piece;
            } else if current_w + space_w + piece_w > max_width_pt {
                lines.push(std::mem::take(&mut current));
                current_w = piece_w;
                current = piece;
            } else {
                current.push(' ');
                current.push_str(&piece);
                current_w += space_w + piece_w;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, width: &dyn Fn(&str) -> f32, max_width_pt: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if width(&piece) > max_width_pt && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
