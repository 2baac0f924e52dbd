#![forbid(unsafe_code)]

//! Width-aware text helpers for fixed-size card faces.
//!
//! Card text is laid into a fixed number of terminal cells, so truncation
//! works on display width and never splits a grapheme cluster.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Longest prefix of `text` that fits in `max_width` cells.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut used = 0;
    let mut end = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > max_width {
            break;
        }
        used += w;
        end += grapheme.len();
    }
    text[..end].to_string()
}

/// Truncate to `max_width` cells, ending with `ellipsis` when anything was cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_width: usize, ellipsis: &str) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let ellipsis_width = ellipsis.width();
    if ellipsis_width >= max_width {
        return truncate_to_width(text, max_width);
    }
    let mut out = truncate_to_width(text, max_width - ellipsis_width);
    out.push_str(ellipsis);
    out
}

/// Pad `text` with spaces on the right to exactly `width` cells, truncating
/// if it is wider.
#[must_use]
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = truncate_with_ellipsis(text, width, "…");
    let pad = width.saturating_sub(out.width());
    out.extend(std::iter::repeat_n(' ', pad));
    out
}
