#![forbid(unsafe_code)]

//! Grid geometry: where slot `i` sits for a given viewport and scroll.
//!
//! Cards have a fixed size. The column count follows the viewport width and
//! the grid is centered horizontally inside the margin.

use wallet_core::geometry::{Rect, Sides};

/// Fixed-size card grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    card_width: u16,
    card_height: u16,
    gap_x: u16,
    gap_y: u16,
    margin: Sides,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            card_width: 30,
            card_height: 9,
            gap_x: 2,
            gap_y: 1,
            margin: Sides::new(2, 1, 0, 1),
        }
    }
}

impl GridLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the card size in cells (each side at least 1).
    #[must_use]
    pub fn card_size(mut self, width: u16, height: u16) -> Self {
        self.card_width = width.max(1);
        self.card_height = height.max(1);
        self
    }

    /// Set the horizontal and vertical gaps between cards.
    #[must_use]
    pub fn gap(mut self, x: u16, y: u16) -> Self {
        self.gap_x = x;
        self.gap_y = y;
        self
    }

    /// Set the margin around the grid.
    #[must_use]
    pub fn margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub const fn card_width(&self) -> u16 {
        self.card_width
    }

    #[must_use]
    pub const fn card_height(&self) -> u16 {
        self.card_height
    }

    /// Number of columns that fit in `viewport`; always at least one.
    #[must_use]
    pub fn columns(&self, viewport: Rect) -> usize {
        let inner = viewport.inner(self.margin);
        let pitch = u32::from(self.card_width) + u32::from(self.gap_x);
        let fit = (u32::from(inner.width) + u32::from(self.gap_x)) / pitch;
        fit.max(1) as usize
    }

    /// Rectangle of slot `index`, shifted up by `scroll` rows.
    #[must_use]
    pub fn slot_rect(&self, index: usize, viewport: Rect, scroll: i32) -> Rect {
        let inner = viewport.inner(self.margin);
        let columns = self.columns(viewport);
        let used = columns as i32 * (i32::from(self.card_width) + i32::from(self.gap_x))
            - i32::from(self.gap_x);
        let left = inner.x + ((i32::from(inner.width) - used) / 2).max(0);

        let row = (index / columns) as i32;
        let col = (index % columns) as i32;
        Rect::new(
            left + col * (i32::from(self.card_width) + i32::from(self.gap_x)),
            inner.y + row * (i32::from(self.card_height) + i32::from(self.gap_y)) - scroll,
            self.card_width,
            self.card_height,
        )
    }

    /// Total height of `count` slots including the top margin.
    #[must_use]
    pub fn content_height(&self, count: usize, viewport: Rect) -> i32 {
        if count == 0 {
            return 0;
        }
        let rows = count.div_ceil(self.columns(viewport)) as i32;
        i32::from(self.margin.top)
            + rows * i32::from(self.card_height)
            + (rows - 1) * i32::from(self.gap_y)
            + i32::from(self.margin.bottom)
    }

    /// Largest useful scroll offset for `count` slots.
    #[must_use]
    pub fn max_scroll(&self, count: usize, viewport: Rect) -> i32 {
        (self.content_height(count, viewport) - i32::from(viewport.height)).max(0)
    }

    /// The delete affordance of a card occupying `card`: three cells in the
    /// top-right corner of its border.
    #[must_use]
    pub fn delete_affordance(card: Rect) -> Rect {
        Rect::new(card.right() - 4, card.top(), 3, 1)
    }
}
