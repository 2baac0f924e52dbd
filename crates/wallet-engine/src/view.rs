#![forbid(unsafe_code)]

//! Retained view tree: one node per rendered card, plus the drag
//! placeholder and the floating (dragged) node.
//!
//! Nodes flow into grid slots in order. Each node carries a [`NodeStyle`]
//! that models a CSS-like `transform`/`transition` pair: setting the
//! translate with no transition applies instantly, and with a transition it
//! starts a [`Tween`] from wherever the node currently is.
//!
//! # Invariants
//!
//! 1. At most one placeholder exists, and only while a node is floating.
//! 2. A card id appears at most once across slots and the floating node.
//! 3. Every constructed node gets a fresh [`NodeKey`]; keys are never reused.
//! 4. The floating node is never hit-testable.

use std::fmt;
use std::time::Duration;

use ahash::AHashMap;
use wallet_core::animation::{Animation, Transition, Tween};
use wallet_core::geometry::{Offset, Point, Rect};

use crate::card::{CardFace, CardId, CardRecord};
use crate::layout::GridLayout;

/// Identity of one constructed view node.
///
/// Re-rendering a card produces a new node with a new key, so tasks tied to
/// the old node can be cancelled when it is disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// How a node is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    /// In its grid slot.
    Flow,
    /// Absolutely positioned at `origin`, outside the flow.
    Floating { origin: Point },
}

/// Hover tilt in degrees, with the glare position as fractions of the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub x_deg: f32,
    pub y_deg: f32,
    pub glare_x: f32,
    pub glare_y: f32,
}

impl Tilt {
    const MAX_DEG: f32 = 10.0;

    /// Tilt for a pointer at relative position `(rel_x, rel_y)` in `[0, 1]`.
    #[must_use]
    pub fn from_relative(rel_x: f32, rel_y: f32) -> Self {
        Self {
            x_deg: (rel_y - 0.5) * -Self::MAX_DEG,
            y_deg: (rel_x - 0.5) * Self::MAX_DEG,
            glare_x: rel_x,
            glare_y: rel_y,
        }
    }
}

/// Entrance animation state after a filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntrancePhase {
    #[default]
    Settled,
    /// Waiting for its stagger delay.
    Pending,
    /// Playing the entrance.
    Entering,
}

/// Per-node presentation state.
#[derive(Debug, Clone)]
pub struct NodeStyle {
    pub positioning: Positioning,
    /// `None` means property changes apply instantly.
    pub transition: Option<Transition>,
    pub elevated: bool,
    pub hit_testable: bool,
    /// Opacity zero.
    pub hidden: bool,
    pub tilt: Option<Tilt>,
    pub entrance: EntrancePhase,
    translate: Offset,
    tween: Option<Tween>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            positioning: Positioning::Flow,
            transition: None,
            elevated: false,
            hit_testable: true,
            hidden: false,
            tilt: None,
            entrance: EntrancePhase::Settled,
            translate: Offset::ZERO,
            tween: None,
        }
    }
}

impl NodeStyle {
    /// The translate the node is at, or heading to.
    #[must_use]
    pub const fn translate(&self) -> Offset {
        self.translate
    }

    /// Where the node is drawn right now, relative to its slot.
    #[must_use]
    pub fn visual_offset(&self) -> Offset {
        self.tween.map_or(self.translate, |tween| tween.current())
    }

    /// Set the translate. With a transition this starts a tween from the
    /// current visual offset; without one it jumps.
    pub fn set_translate(&mut self, to: Offset) {
        let from = self.visual_offset();
        self.translate = to;
        self.tween = match self.transition {
            Some(transition) if from != to => Some(Tween::new(from, to, transition)),
            _ => None,
        };
    }

    /// Advance any running tween. Returns whether it is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        tween.tick(dt);
        if tween.is_complete() {
            self.tween = None;
            return false;
        }
        true
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Drop motion and transient hover state, keeping placement flags.
    fn at_rest(mut self) -> Self {
        self.translate = Offset::ZERO;
        self.tween = None;
        self.tilt = None;
        self
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A rendered card.
#[derive(Debug, Clone)]
pub struct CardNode {
    pub key: NodeKey,
    pub id: CardId,
    pub face: CardFace,
    pub style: NodeStyle,
}

/// One grid slot.
#[derive(Debug, Clone)]
pub enum ViewNode {
    Card(CardNode),
    /// Reserves the drop location during a drag.
    Placeholder(NodeKey),
}

impl ViewNode {
    #[must_use]
    pub const fn key(&self) -> NodeKey {
        match self {
            Self::Card(node) => node.key,
            Self::Placeholder(key) => *key,
        }
    }

    #[must_use]
    pub const fn card(&self) -> Option<&CardNode> {
        match self {
            Self::Card(node) => Some(node),
            Self::Placeholder(_) => None,
        }
    }
}

/// Which part of a card a point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Body,
    Delete,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub card: CardId,
    pub region: HitRegion,
    /// Visual rectangle of the card that was hit.
    pub rect: Rect,
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// The rendered grid.
#[derive(Debug, Clone)]
pub struct ViewTree {
    layout: GridLayout,
    viewport: Rect,
    scroll: i32,
    slots: Vec<ViewNode>,
    floating: Option<CardNode>,
    positions: AHashMap<CardId, usize>,
    next_key: u64,
}

impl ViewTree {
    #[must_use]
    pub fn new(layout: GridLayout, viewport: Rect) -> Self {
        Self {
            layout,
            viewport,
            scroll: 0,
            slots: Vec::new(),
            floating: None,
            positions: AHashMap::new(),
            next_key: 0,
        }
    }

    /// Construct a fresh node for `record`.
    pub fn build_node(&mut self, record: &CardRecord) -> CardNode {
        CardNode {
            key: self.mint_key(),
            id: record.id,
            face: record.face(),
            style: NodeStyle::default(),
        }
    }

    fn mint_key(&mut self) -> NodeKey {
        self.next_key += 1;
        NodeKey(self.next_key)
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (index, slot) in self.slots.iter().enumerate() {
            if let ViewNode::Card(node) = slot {
                self.positions.insert(node.id, index);
            }
        }
    }

    /// Replace every node, including any placeholder and floating node.
    /// Returns the keys of the nodes that were disposed.
    pub fn replace_all(&mut self, nodes: Vec<CardNode>) -> Vec<NodeKey> {
        let mut disposed: Vec<NodeKey> = self.slots.drain(..).map(|slot| slot.key()).collect();
        disposed.extend(self.floating.take().map(|node| node.key));
        self.slots = nodes.into_iter().map(ViewNode::Card).collect();
        self.reindex();
        self.clamp_scroll();
        disposed
    }

    /// Remove one card's node, leaving all others untouched.
    pub fn remove_card(&mut self, id: CardId) -> Option<(usize, CardNode)> {
        let index = *self.positions.get(&id)?;
        let ViewNode::Card(node) = self.slots.remove(index) else {
            return None;
        };
        self.reindex();
        self.clamp_scroll();
        Some((index, node))
    }

    // -- drag support ------------------------------------------------------

    /// Lift card `id` out of the flow: its slot becomes a placeholder and the
    /// node floats at `origin`, elevated and inert to hit testing.
    ///
    /// Returns the slot index and the node's style from before the lift,
    /// without motion or hover state.
    pub fn detach_to_floating(&mut self, id: CardId, origin: Point) -> Option<(usize, NodeStyle)> {
        if self.floating.is_some() {
            return None;
        }
        let index = *self.positions.get(&id)?;
        let placeholder = ViewNode::Placeholder(self.mint_key());
        let ViewNode::Card(mut node) = std::mem::replace(&mut self.slots[index], placeholder)
        else {
            return None;
        };
        let saved = std::mem::take(&mut node.style).at_rest();
        node.style = NodeStyle {
            positioning: Positioning::Floating { origin },
            elevated: true,
            hit_testable: false,
            ..NodeStyle::default()
        };
        self.floating = Some(node);
        self.reindex();
        Some((index, saved))
    }

    /// Move the floating node. Returns `false` if nothing is floating.
    pub fn move_floating(&mut self, origin: Point) -> bool {
        match self.floating.as_mut() {
            Some(node) => {
                node.style.positioning = Positioning::Floating { origin };
                true
            }
            None => false,
        }
    }

    /// Move the placeholder next to the card at `candidate`.
    ///
    /// If the placeholder currently follows the candidate it goes just
    /// before it, otherwise just after it. Either way it ends up at the
    /// candidate's old index. Returns the new placeholder index.
    pub fn move_placeholder_beside(&mut self, candidate: usize) -> Option<usize> {
        let current = self.placeholder_index()?;
        if candidate == current || candidate >= self.slots.len() {
            return Some(current);
        }
        let placeholder = self.slots.remove(current);
        // Lifting the placeholder out shifts a later candidate left by one.
        let shifted = if current < candidate {
            candidate - 1
        } else {
            candidate
        };
        let target = if current > candidate {
            shifted
        } else {
            shifted + 1
        };
        self.slots.insert(target, placeholder);
        self.reindex();
        Some(target)
    }

    /// Put the floating node into the placeholder's slot with `style` and
    /// drop the placeholder. Returns the slot index.
    pub fn settle_floating(&mut self, style: NodeStyle) -> Option<usize> {
        let index = self.placeholder_index()?;
        let mut node = self.floating.take()?;
        node.style = style;
        self.slots[index] = ViewNode::Card(node);
        self.reindex();
        Some(index)
    }

    #[must_use]
    pub fn placeholder_index(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, ViewNode::Placeholder(_)))
    }

    #[must_use]
    pub const fn floating(&self) -> Option<&CardNode> {
        self.floating.as_ref()
    }

    // -- queries -----------------------------------------------------------

    #[must_use]
    pub fn slots(&self) -> &[ViewNode] {
        &self.slots
    }

    /// Card nodes in slot order with their slot index.
    pub fn cards(&self) -> impl Iterator<Item = (usize, &CardNode)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.card().map(|node| (index, node)))
    }

    /// Ids of card nodes in slot order (the floating node is not in a slot).
    #[must_use]
    pub fn order(&self) -> Vec<CardId> {
        self.cards().map(|(_, node)| node.id).collect()
    }

    #[must_use]
    pub fn slot_index(&self, id: CardId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Look up a card node in the slots or the floating node.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&CardNode> {
        match self.positions.get(&id) {
            Some(&index) => self.slots[index].card(),
            None => self.floating.as_ref().filter(|node| node.id == id),
        }
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut CardNode> {
        match self.positions.get(&id) {
            Some(&index) => match &mut self.slots[index] {
                ViewNode::Card(node) => Some(node),
                ViewNode::Placeholder(_) => None,
            },
            None => self.floating.as_mut().filter(|node| node.id == id),
        }
    }

    pub fn card_by_key_mut(&mut self, key: NodeKey) -> Option<&mut CardNode> {
        self.slots
            .iter_mut()
            .filter_map(|slot| match slot {
                ViewNode::Card(node) => Some(node),
                ViewNode::Placeholder(_) => None,
            })
            .chain(self.floating.as_mut())
            .find(|node| node.key == key)
    }

    /// Layout rectangle of slot `index` at the current scroll.
    #[must_use]
    pub fn slot_rect(&self, index: usize) -> Rect {
        self.layout.slot_rect(index, self.viewport, self.scroll)
    }

    /// Unrounded top-left corner of where `node` is drawn, in cells.
    #[must_use]
    pub fn visual_origin(&self, node: &CardNode, index: Option<usize>) -> (f32, f32) {
        let base = match (node.style.positioning, index) {
            (Positioning::Floating { origin }, _) => origin,
            (Positioning::Flow, Some(index)) => self.slot_rect(index).origin(),
            (Positioning::Flow, None) => Point::default(),
        };
        let offset = node.style.visual_offset();
        (base.x as f32 + offset.dx, base.y as f32 + offset.dy)
    }

    /// Rectangle where card `id` is drawn right now, rounded to cells.
    #[must_use]
    pub fn visual_rect(&self, id: CardId) -> Option<Rect> {
        let node = self.card(id)?;
        let (x, y) = self.visual_origin(node, self.slot_index(id));
        Some(Rect::new(
            x.round() as i32,
            y.round() as i32,
            self.layout.card_width(),
            self.layout.card_height(),
        ))
    }

    /// Topmost hit-testable card drawn under `point`. Placeholders and the
    /// floating node never match.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        self.hit_with(point, |index, node| {
            let (x, y) = self.visual_origin(node, Some(index));
            self.slot_rect(index)
                .with_origin(Point::new(x.round() as i32, y.round() as i32))
        })
    }

    /// Like [`hit_test`](Self::hit_test) but against grid slots, ignoring
    /// in-flight translates. Cards gliding through the pointer do not match
    /// twice.
    #[must_use]
    pub fn hit_test_slots(&self, point: Point) -> Option<Hit> {
        self.hit_with(point, |index, _| self.slot_rect(index))
    }

    fn hit_with(&self, point: Point, rect_of: impl Fn(usize, &CardNode) -> Rect) -> Option<Hit> {
        self.cards()
            .filter(|(_, node)| node.style.hit_testable && !node.style.hidden)
            .filter_map(|(index, node)| {
                let rect = rect_of(index, node);
                rect.contains(point).then_some((index, node.id, rect))
            })
            .last()
            .map(|(index, card, rect)| Hit {
                index,
                card,
                region: if GridLayout::delete_affordance(rect).contains(point) {
                    HitRegion::Delete
                } else {
                    HitRegion::Body
                },
                rect,
            })
    }

    // -- animation ---------------------------------------------------------

    /// Advance every node's tween. Returns whether any is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let mut running = false;
        for slot in &mut self.slots {
            if let ViewNode::Card(node) = slot {
                running |= node.style.advance(dt);
            }
        }
        if let Some(node) = self.floating.as_mut() {
            running |= node.style.advance(dt);
        }
        running
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.cards().any(|(_, node)| node.style.is_animating())
            || self
                .floating
                .as_ref()
                .is_some_and(|node| node.style.is_animating())
    }

    // -- viewport ----------------------------------------------------------

    #[must_use]
    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.clamp_scroll();
    }

    #[must_use]
    pub const fn scroll(&self) -> i32 {
        self.scroll
    }

    /// Set the scroll offset, clamped to the content. Returns the new value.
    pub fn set_scroll(&mut self, scroll: i32) -> i32 {
        self.scroll = scroll;
        self.clamp_scroll();
        self.scroll
    }

    fn clamp_scroll(&mut self) {
        let max = self.layout.max_scroll(self.slots.len(), self.viewport);
        self.scroll = self.scroll.clamp(0, max);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::CardGenerator;
    use wallet_core::animation::linear;
    use wallet_core::geometry::Sides;

    fn tree(n: u32) -> ViewTree {
        let layout = GridLayout::new()
            .card_size(10, 4)
            .gap(2, 1)
            .margin(Sides::all(0));
        let mut tree = ViewTree::new(layout, Rect::from_size(34, 40));
        let records = CardGenerator::new(1).cards(n);
        let nodes = records.iter().map(|r| tree.build_node(r)).collect();
        tree.replace_all(nodes);
        tree
    }

    fn order(tree: &ViewTree) -> Vec<u32> {
        tree.order().into_iter().map(|id| id.0).collect()
    }

    #[test]
    fn set_translate_without_transition_jumps() {
        let mut style = NodeStyle::default();
        style.set_translate(Offset::new(5.0, 0.0));
        assert_eq!(style.visual_offset(), Offset::new(5.0, 0.0));
        assert!(!style.is_animating());
    }

    #[test]
    fn set_translate_with_transition_tweens_from_current() {
        let mut style = NodeStyle::default();
        style.set_translate(Offset::new(8.0, 4.0));
        style.transition = Some(Transition::new(Duration::from_millis(100), linear));
        style.set_translate(Offset::ZERO);
        assert_eq!(style.visual_offset(), Offset::new(8.0, 4.0));
        assert!(style.advance(Duration::from_millis(50)));
        assert_eq!(style.visual_offset(), Offset::new(4.0, 2.0));
        assert!(!style.advance(Duration::from_millis(50)));
        assert_eq!(style.visual_offset(), Offset::ZERO);
    }

    #[test]
    fn replace_all_disposes_every_key() {
        let mut tree = tree(3);
        let old: Vec<NodeKey> = tree.slots().iter().map(ViewNode::key).collect();
        let disposed = tree.replace_all(Vec::new());
        assert_eq!(disposed, old);
        assert!(tree.is_empty());
    }

    #[test]
    fn keys_are_never_reused() {
        let mut tree = tree(2);
        let first: Vec<NodeKey> = tree.slots().iter().map(ViewNode::key).collect();
        let record = CardGenerator::new(1).card(1);
        let node = tree.build_node(&record);
        assert!(!first.contains(&node.key));
    }

    #[test]
    fn hit_test_finds_body_and_delete() {
        let tree = tree(4);
        let hit = tree.hit_test(Point::new(13, 2)).expect("card 2");
        assert_eq!((hit.index, hit.card, hit.region), (1, CardId(2), HitRegion::Body));
        // Card 2 spans x 12..22; its delete affordance is x 18..21 on row 0.
        let hit = tree.hit_test(Point::new(19, 0)).expect("delete");
        assert_eq!(hit.region, HitRegion::Delete);
        assert!(tree.hit_test(Point::new(11, 0)).is_none());
    }

    #[test]
    fn hit_test_skips_hidden_and_inert() {
        let mut tree = tree(2);
        tree.card_mut(CardId(1)).expect("card").style.hidden = true;
        assert!(tree.hit_test(Point::new(1, 1)).is_none());
        tree.card_mut(CardId(2)).expect("card").style.hit_testable = false;
        assert!(tree.hit_test(Point::new(13, 1)).is_none());
    }

    #[test]
    fn slot_hit_test_ignores_translate() {
        let mut tree = tree(2);
        if let Some(node) = tree.card_mut(CardId(2)) {
            node.style.set_translate(Offset::new(-12.0, 0.0));
        }
        // Card 2 is drawn over slot 0 but still owns slot 1.
        assert_eq!(tree.hit_test(Point::new(1, 1)).map(|h| h.card), Some(CardId(2)));
        assert_eq!(tree.hit_test_slots(Point::new(1, 1)).map(|h| h.card), Some(CardId(1)));
        assert!(tree.hit_test(Point::new(13, 1)).is_none());
        assert_eq!(tree.hit_test_slots(Point::new(13, 1)).map(|h| h.card), Some(CardId(2)));
    }

    #[test]
    fn detach_and_settle_round_trip() {
        let mut tree = tree(4);
        let (index, saved) = tree
            .detach_to_floating(CardId(2), Point::new(12, 0))
            .expect("detach");
        assert_eq!(index, 1);
        assert_eq!(saved.positioning, Positioning::Flow);
        assert_eq!(tree.placeholder_index(), Some(1));
        assert_eq!(order(&tree), vec![1, 3, 4]);
        assert!(tree.card(CardId(2)).is_some());
        assert!(tree.hit_test(Point::new(13, 1)).is_none());

        assert!(tree.move_floating(Point::new(30, 7)));
        assert_eq!(tree.visual_rect(CardId(2)), Some(Rect::new(30, 7, 10, 4)));

        assert_eq!(tree.settle_floating(saved), Some(1));
        assert_eq!(order(&tree), vec![1, 2, 3, 4]);
        assert!(tree.placeholder_index().is_none());
        assert!(tree.floating().is_none());
    }

    #[test]
    fn only_one_node_floats() {
        let mut tree = tree(3);
        assert!(tree.detach_to_floating(CardId(1), Point::new(0, 0)).is_some());
        assert!(tree.detach_to_floating(CardId(2), Point::new(0, 0)).is_none());
    }

    #[test]
    fn placeholder_lands_at_candidate_index() {
        let mut tree = tree(5);
        tree.detach_to_floating(CardId(2), Point::new(0, 0));
        // Placeholder at 1 precedes candidate 3: goes after it.
        assert_eq!(tree.move_placeholder_beside(3), Some(3));
        assert_eq!(order(&tree), vec![1, 3, 4, 5]);
        assert_eq!(tree.slot_index(CardId(4)), Some(2));
        // Placeholder at 3 follows candidate 0: goes before it.
        assert_eq!(tree.move_placeholder_beside(0), Some(0));
        assert_eq!(tree.slot_index(CardId(1)), Some(1));
        assert_eq!(tree.move_placeholder_beside(0), Some(0));
        assert_eq!(tree.move_placeholder_beside(99), Some(0));
    }

    #[test]
    fn remove_card_reindexes() {
        let mut tree = tree(4);
        let (index, node) = tree.remove_card(CardId(2)).expect("present");
        assert_eq!((index, node.id), (1, CardId(2)));
        assert_eq!(tree.slot_index(CardId(3)), Some(1));
        assert!(tree.remove_card(CardId(2)).is_none());
    }

    #[test]
    fn scroll_is_clamped() {
        let mut tree = tree(9);
        tree.set_viewport(Rect::from_size(34, 6));
        // Three rows of 4 with gaps: 14 tall.
        assert_eq!(tree.set_scroll(100), 8);
        assert_eq!(tree.set_scroll(-3), 0);
    }

    #[test]
    fn card_by_key_finds_floating() {
        let mut tree = tree(2);
        let key = tree.card(CardId(1)).expect("card").key;
        tree.detach_to_floating(CardId(1), Point::new(0, 0));
        assert!(tree.card_by_key_mut(key).is_some());
    }

    #[test]
    fn tilt_from_relative_position() {
        let tilt = Tilt::from_relative(1.0, 0.0);
        assert_eq!(tilt.x_deg, 5.0);
        assert_eq!(tilt.y_deg, 5.0);
        let centered = Tilt::from_relative(0.5, 0.5);
        assert_eq!(centered.x_deg, 0.0);
    }
}
