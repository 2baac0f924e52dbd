#![forbid(unsafe_code)]

//! Drag-to-reorder controller.
//!
//! A pointer-gesture state machine, `Idle → Dragging → Idle`. While dragging,
//! the card floats under the pointer and a placeholder marks where it would
//! land; the store is left alone until release.
//!
//! # Invariants
//!
//! 1. At most one [`DragSession`] exists at a time.
//! 2. The store is mutated exactly once per session, on [`DragController::end`].
//! 3. Pointer capture is acquired once on begin and released once on end.
//! 4. `session.placeholder_index` always equals the placeholder's slot.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Begin while dragging | Second press, programming error | Ignored, logged |
//! | End with no session | Duplicate release, cancel after release | No-op |
//! | Move from another pointer | Multi-touch | Ignored |
//! | Floating node lost before end | View replaced mid-drag | Session dropped, no store write |

use tracing::debug;
use wallet_core::event::{PointerCapture, PointerEvent, PointerId};
use wallet_core::geometry::Point;

use crate::card::CardId;
use crate::reflow::ReflowAnimator;
use crate::snapshot::capture_all;
use crate::store::{CardStore, MoveOutcome};
use crate::view::{HitRegion, NodeStyle, ViewTree};

/// State that exists only between gesture start and gesture end.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub card: CardId,
    pub pointer: PointerId,
    /// Pointer position minus the card's top-left corner at grab time.
    pub grab_offset: (i32, i32),
    pub placeholder_index: usize,
    pub start_index: usize,
    last_position: Point,
    moved: bool,
    saved_style: NodeStyle,
}

impl DragSession {
    /// Whether the pointer moved at all since the press.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }
}

/// What a pointer move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMove {
    /// No session, or another pointer.
    Ignored,
    /// The floating card followed the pointer.
    Followed,
    /// The placeholder moved between slots.
    PlaceholderMoved { from: usize, to: usize },
}

/// Result of ending a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOutcome {
    pub card: CardId,
    pub start_index: usize,
    pub final_index: usize,
    /// The single store write for this session.
    pub store_move: Option<MoveOutcome>,
    /// The pointer never moved: a tap rather than a drag.
    pub tapped: bool,
}

impl DragOutcome {
    /// Whether the card landed somewhere other than where it started.
    #[must_use]
    pub const fn reordered(&self) -> bool {
        self.final_index != self.start_index
    }
}

/// Owns the drag session and its pointer capture.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
    capture: PointerCapture,
    commits: u64,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging the card under a primary press, unless the press is on
    /// its delete affordance. Returns the dragged card.
    pub fn begin(&mut self, event: &PointerEvent, view: &mut ViewTree) -> Option<CardId> {
        if let Some(session) = &self.session {
            debug!(active = %session.card, "drag.begin: session already active");
            return None;
        }
        if !event.is_primary_press() {
            return None;
        }
        let hit = view.hit_test(event.position)?;
        if hit.region != HitRegion::Body {
            return None;
        }
        if !self.capture.acquire(event.pointer) {
            return None;
        }

        let origin = hit.rect.origin();
        let Some((index, saved_style)) = view.detach_to_floating(hit.card, origin) else {
            self.capture.release();
            return None;
        };
        self.session = Some(DragSession {
            card: hit.card,
            pointer: event.pointer,
            grab_offset: event.position.delta_from(origin),
            placeholder_index: index,
            start_index: index,
            last_position: event.position,
            moved: false,
            saved_style,
        });
        debug!(card = %hit.card, index, "drag.begin");
        Some(hit.card)
    }

    /// Follow the pointer and move the placeholder beside whatever card it
    /// is over.
    pub fn pointer_move(
        &mut self,
        event: &PointerEvent,
        view: &mut ViewTree,
        animator: &mut ReflowAnimator,
    ) -> DragMove {
        let Some(session) = self.session.as_mut() else {
            return DragMove::Ignored;
        };
        if event.pointer != session.pointer {
            return DragMove::Ignored;
        }
        if event.position != session.last_position {
            session.moved = true;
            session.last_position = event.position;
        }
        let (gx, gy) = session.grab_offset;
        view.move_floating(event.position.translate(-gx, -gy));

        let Some(hit) = view.hit_test_slots(event.position) else {
            return DragMove::Followed;
        };
        if hit.card == session.card || hit.index == session.placeholder_index {
            return DragMove::Followed;
        }

        let before = capture_all(view);
        let Some(to) = view.move_placeholder_beside(hit.index) else {
            return DragMove::Followed;
        };
        let after = capture_all(view);
        animator.play(&before, &after, view);

        let from = std::mem::replace(&mut session.placeholder_index, to);
        debug!(card = %session.card, over = %hit.card, from, to, "drag.placeholder");
        DragMove::PlaceholderMoved { from, to }
    }

    /// End the session: drop the card into the placeholder's slot, write the
    /// new order to the store once, and glide everything into place.
    ///
    /// Idempotent: with no session this does nothing and returns `None`.
    pub fn end(
        &mut self,
        view: &mut ViewTree,
        store: &mut CardStore,
        animator: &mut ReflowAnimator,
    ) -> Option<DragOutcome> {
        let Some(session) = self.session.take() else {
            debug!("drag.end: no active session");
            return None;
        };
        self.capture.release();

        // Final order comes from the session; the view only has to agree.
        let mut order = view.order();
        let final_index = session.placeholder_index.min(order.len());
        order.insert(final_index, session.card);

        let before = capture_all(view);
        let Some(settled) = view.settle_floating(session.saved_style) else {
            debug!(card = %session.card, "drag.end: floating node gone");
            return None;
        };
        debug_assert_eq!(settled, final_index, "placeholder slot out of step with session");
        let after = capture_all(view);

        let target = store_target(&order, final_index, store, session.card);
        let store_move = store.move_to_index(session.card, target);
        self.commits += 1;
        animator.play(&before, &after, view);

        let outcome = DragOutcome {
            card: session.card,
            start_index: session.start_index,
            final_index,
            store_move,
            tapped: !session.moved,
        };
        debug!(
            card = %outcome.card,
            from = outcome.start_index,
            to = outcome.final_index,
            tapped = outcome.tapped,
            "drag.end"
        );
        Some(outcome)
    }

    /// Keep slot indices in step with a card removed from the view at
    /// `index` mid-drag.
    pub fn on_node_removed(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if index < session.placeholder_index {
            session.placeholder_index -= 1;
        }
        if index < session.start_index {
            session.start_index -= 1;
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Whether `pointer` is the one driving the active session.
    #[must_use]
    pub fn is_driven_by(&self, pointer: PointerId) -> bool {
        self.capture.is_held_by(pointer)
    }

    #[must_use]
    pub const fn capture(&self) -> &PointerCapture {
        &self.capture
    }

    /// Store writes made so far, one per ended session.
    #[must_use]
    pub const fn commits(&self) -> u64 {
        self.commits
    }
}

/// Store index for `card` so that it keeps its visible neighbour.
///
/// The card goes right before the visible card that follows it, or right
/// after the one that precedes it when it is last. Cards hidden by a filter
/// keep their relative order.
fn store_target(order: &[CardId], index: usize, store: &CardStore, card: CardId) -> usize {
    let own = store.index_of(card).unwrap_or(0);
    let others: Vec<CardId> = store
        .snapshot()
        .iter()
        .map(|record| record.id)
        .filter(|id| *id != card)
        .collect();
    let position = |anchor: CardId| others.iter().position(|id| *id == anchor);

    if let Some(next) = order.get(index + 1) {
        position(*next).unwrap_or(own)
    } else if let Some(prev) = index.checked_sub(1).and_then(|i| order.get(i)) {
        position(*prev).map_or(own, |p| p + 1)
    } else {
        own
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSet;
    use crate::generator::CardGenerator;
    use crate::layout::GridLayout;
    use crate::render::render_all;
    use wallet_core::event::PointerEventKind;
    use wallet_core::geometry::{Rect, Sides};

    // 3 columns of 10x4 cards with 2-cell gaps: slot i sits at
    // x = 12 * (i % 3), y = 5 * (i / 3).
    fn fixture(n: u32) -> (ViewTree, CardStore, ReflowAnimator) {
        let layout = GridLayout::new()
            .card_size(10, 4)
            .gap(2, 1)
            .margin(Sides::all(0));
        let mut view = ViewTree::new(layout, Rect::from_size(34, 40));
        let store = CardStore::from_records(CardGenerator::new(3).cards(n));
        render_all(&mut view, store.snapshot(), None);
        (view, store, ReflowAnimator::default())
    }

    fn center(i: usize) -> (i32, i32) {
        (12 * (i % 3) as i32 + 4, 5 * (i / 3) as i32 + 2)
    }

    fn ids(store: &CardStore) -> Vec<u32> {
        store.ids().into_iter().map(|id| id.0).collect()
    }

    #[test]
    fn begin_detaches_card_and_captures_pointer() {
        let (mut view, _, _) = fixture(4);
        let mut drag = DragController::new();
        let (x, y) = center(1);
        assert_eq!(drag.begin(&PointerEvent::down(x, y), &mut view), Some(CardId(2)));

        let session = drag.session().expect("session");
        assert_eq!(session.start_index, 1);
        assert_eq!(session.placeholder_index, 1);
        assert_eq!(session.grab_offset, (4, 2));
        assert_eq!(view.placeholder_index(), Some(1));
        assert!(drag.is_driven_by(PointerId::PRIMARY));
        assert_eq!(drag.capture().acquired(), 1);
    }

    #[test]
    fn begin_ignores_delete_affordance_and_empty_space() {
        let (mut view, _, _) = fixture(2);
        let mut drag = DragController::new();
        assert!(drag.begin(&PointerEvent::down(7, 0), &mut view).is_none());
        assert!(drag.begin(&PointerEvent::down(11, 2), &mut view).is_none());
        assert!(!drag.is_active());
        assert_eq!(drag.capture().acquired(), 0);
    }

    #[test]
    fn begin_while_active_is_ignored() {
        let (mut view, _, _) = fixture(3);
        let mut drag = DragController::new();
        let (x, y) = center(0);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        let (x, y) = center(1);
        assert!(drag.begin(&PointerEvent::down(x, y), &mut view).is_none());
        assert_eq!(drag.session().map(|s| s.card), Some(CardId(1)));
    }

    #[test]
    fn non_primary_press_does_not_start() {
        let (mut view, _, _) = fixture(1);
        let mut drag = DragController::new();
        let press = PointerEvent::new(
            PointerEventKind::Down(wallet_core::event::PointerButton::Secondary),
            2,
            2,
        );
        assert!(drag.begin(&press, &mut view).is_none());
    }

    #[test]
    fn moves_only_reposition_placeholder() {
        let (mut view, mut store, mut animator) = fixture(6);
        let mut drag = DragController::new();
        let (x, y) = center(0);
        drag.begin(&PointerEvent::down(x, y), &mut view);

        let (x, y) = center(2);
        let step = drag.pointer_move(&PointerEvent::moved(x, y), &mut view, &mut animator);
        assert_eq!(step, DragMove::PlaceholderMoved { from: 0, to: 2 });
        assert_eq!(drag.session().map(|s| s.placeholder_index), Some(2));
        assert_eq!(view.placeholder_index(), Some(2));
        // The floating card followed the pointer.
        assert_eq!(view.visual_rect(CardId(1)), Some(Rect::new(24, 0, 10, 4)));
        // Store untouched mid-drag.
        assert_eq!(ids(&store), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(store.revision(), 0);

        // Hovering the placeholder's own slot changes nothing.
        let step = drag.pointer_move(&PointerEvent::moved(x + 1, y), &mut view, &mut animator);
        assert_eq!(step, DragMove::Followed);

        let outcome = drag.end(&mut view, &mut store, &mut animator).expect("outcome");
        assert_eq!((outcome.start_index, outcome.final_index), (0, 2));
        assert!(outcome.reordered());
        assert!(!outcome.tapped);
        assert_eq!(ids(&store), vec![2, 3, 1, 4, 5, 6]);
        assert_eq!(store.revision(), 1);
        assert_eq!(drag.commits(), 1);
    }

    #[test]
    fn moving_backward_inserts_before_candidate() {
        let (mut view, mut store, mut animator) = fixture(6);
        let mut drag = DragController::new();
        let (x, y) = center(4);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        let (x, y) = center(1);
        drag.pointer_move(&PointerEvent::moved(x, y), &mut view, &mut animator);
        let outcome = drag.end(&mut view, &mut store, &mut animator).expect("outcome");
        assert_eq!(outcome.final_index, 1);
        assert_eq!(ids(&store), vec![1, 5, 2, 3, 4, 6]);
    }

    #[test]
    fn end_is_idempotent() {
        let (mut view, mut store, mut animator) = fixture(3);
        let mut drag = DragController::new();
        let (x, y) = center(0);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        assert!(drag.end(&mut view, &mut store, &mut animator).is_some());
        let revision = store.revision();
        assert!(drag.end(&mut view, &mut store, &mut animator).is_none());
        assert_eq!(store.revision(), revision);
        assert_eq!(drag.commits(), 1);
        assert_eq!(drag.capture().acquired(), 1);
        assert_eq!(drag.capture().released(), 1);
    }

    #[test]
    fn tap_commits_noop_move() {
        let (mut view, mut store, mut animator) = fixture(3);
        let mut drag = DragController::new();
        let (x, y) = center(1);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        drag.pointer_move(&PointerEvent::moved(x, y), &mut view, &mut animator);
        let outcome = drag.end(&mut view, &mut store, &mut animator).expect("outcome");
        assert!(outcome.tapped);
        assert!(!outcome.reordered());
        assert_eq!(outcome.store_move, Some(MoveOutcome { from: 1, to: 1 }));
        assert_eq!(store.revision(), 0);
        assert_eq!(view.order(), store.ids());
    }

    #[test]
    fn other_pointer_moves_are_ignored() {
        let (mut view, _, mut animator) = fixture(3);
        let mut drag = DragController::new();
        let (x, y) = center(0);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        let (x, y) = center(2);
        let other = PointerEvent::moved(x, y).with_pointer(PointerId(7));
        assert_eq!(
            drag.pointer_move(&other, &mut view, &mut animator),
            DragMove::Ignored
        );
        assert_eq!(view.placeholder_index(), Some(0));
    }

    #[test]
    fn filtered_drag_keeps_hidden_cards_in_place() {
        let (mut view, mut store, mut animator) = fixture(6);
        // Only 2, 4, 6 visible.
        let visible: FilterSet = [CardId(2), CardId(4), CardId(6)].into_iter().collect();
        render_all(&mut view, store.snapshot(), Some(&visible));
        let mut drag = DragController::new();

        let (x, y) = center(2);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        let (x, y) = center(0);
        drag.pointer_move(&PointerEvent::moved(x, y), &mut view, &mut animator);
        let outcome = drag.end(&mut view, &mut store, &mut animator).expect("outcome");
        assert_eq!(outcome.final_index, 0);
        // 6 now sits right before 2; 1 stays first.
        assert_eq!(ids(&store), vec![1, 6, 2, 3, 4, 5]);
    }

    #[test]
    fn removal_mid_drag_shifts_indices() {
        let (mut view, _, _) = fixture(5);
        let mut drag = DragController::new();
        let (x, y) = center(3);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        let (index, _) = view.remove_card(CardId(1)).expect("present");
        drag.on_node_removed(index);
        let session = drag.session().expect("session");
        assert_eq!(session.placeholder_index, 2);
        assert_eq!(session.start_index, 2);
        assert_eq!(view.placeholder_index(), Some(2));
    }

    #[test]
    fn final_order_follows_session_index() {
        let (mut view, mut store, mut animator) = fixture(6);
        let mut drag = DragController::new();
        let (x, y) = center(0);
        drag.begin(&PointerEvent::down(x, y), &mut view);
        for i in [1, 2, 5, 4] {
            let (x, y) = center(i);
            drag.pointer_move(&PointerEvent::moved(x, y), &mut view, &mut animator);
            assert_eq!(
                drag.session().map(|s| s.placeholder_index),
                view.placeholder_index()
            );
        }
        let tracked = drag.session().map(|s| s.placeholder_index);
        let outcome = drag.end(&mut view, &mut store, &mut animator).expect("outcome");
        assert_eq!(Some(outcome.final_index), tracked);
        assert_eq!(store.index_of(CardId(1)), tracked);
        assert_eq!(view.order(), store.ids());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn store_target_anchors() {
        let store = CardStore::from_records(CardGenerator::new(1).cards(5));
        let c = |n| CardId(n);
        // Visible [2, 4, 5] after dropping 5 between 2 and 4.
        assert_eq!(store_target(&[c(2), c(5), c(4)], 1, &store, c(5)), 3);
        // Dropped last, after 4.
        assert_eq!(store_target(&[c(2), c(4), c(1)], 2, &store, c(1)), 3);
        // Alone: stays put.
        assert_eq!(store_target(&[c(3)], 0, &store, c(3)), 2);
    }
}
