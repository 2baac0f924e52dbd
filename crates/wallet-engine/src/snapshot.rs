#![forbid(unsafe_code)]

//! Layout snapshot service.
//!
//! A [`LayoutSnapshot`] maps card ids to where each card is drawn at one
//! instant, including any in-flight translate and the floating node. Two
//! snapshots taken around a mutation are what the reflow animator diffs.

use std::collections::BTreeMap;

use crate::card::CardId;
use crate::view::ViewTree;

/// Drawn position and size of one card, in cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub left: f32,
    pub top: f32,
    pub width: u16,
    pub height: u16,
}

/// Read-only id → geometry map captured at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    entries: BTreeMap<CardId, Geometry>,
}

impl LayoutSnapshot {
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Geometry> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardId, &Geometry)> {
        self.entries.iter().map(|(id, geometry)| (*id, geometry))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Record the drawn geometry of every rendered card.
#[must_use]
pub fn capture_all(view: &ViewTree) -> LayoutSnapshot {
    let layout = view.layout();
    let (width, height) = (layout.card_width(), layout.card_height());
    let mut entries = BTreeMap::new();

    for (index, node) in view.cards() {
        let (left, top) = view.visual_origin(node, Some(index));
        entries.insert(
            node.id,
            Geometry {
                left,
                top,
                width,
                height,
            },
        );
    }
    if let Some(node) = view.floating() {
        let (left, top) = view.visual_origin(node, None);
        entries.insert(
            node.id,
            Geometry {
                left,
                top,
                width,
                height,
            },
        );
    }

    LayoutSnapshot { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::CardGenerator;
    use crate::layout::GridLayout;
    use crate::render::render_all;
    use wallet_core::geometry::{Offset, Point, Rect, Sides};

    fn view(n: u32) -> ViewTree {
        let layout = GridLayout::new()
            .card_size(10, 4)
            .gap(2, 1)
            .margin(Sides::all(0));
        let mut view = ViewTree::new(layout, Rect::from_size(34, 40));
        render_all(&mut view, &CardGenerator::new(2).cards(n), None);
        view
    }

    #[test]
    fn captures_every_rendered_card() {
        let view = view(4);
        let snapshot = capture_all(&view);
        assert_eq!(snapshot.len(), 4);
        let g = snapshot.get(CardId(4)).expect("captured");
        assert_eq!((g.left, g.top, g.width, g.height), (0.0, 5.0, 10, 4));
    }

    #[test]
    fn includes_translate_and_floating_node() {
        let mut view = view(3);
        if let Some(node) = view.card_mut(CardId(1)) {
            node.style.set_translate(Offset::new(2.5, -1.0));
        }
        view.detach_to_floating(CardId(3), Point::new(40, 9));

        let snapshot = capture_all(&view);
        let g = snapshot.get(CardId(1)).expect("captured");
        assert_eq!((g.left, g.top), (2.5, -1.0));
        let g = snapshot.get(CardId(3)).expect("floating");
        assert_eq!((g.left, g.top), (40.0, 9.0));
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn empty_view_empty_snapshot() {
        let snapshot = capture_all(&view(0));
        assert!(snapshot.is_empty());
        assert!(!snapshot.contains(CardId(1)));
    }
}
