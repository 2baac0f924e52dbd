#![forbid(unsafe_code)]

//! FLIP reflow animator.
//!
//! Given snapshots from before (First) and after (Last) a mutation, every
//! card present in both that moved is displaced back to where it was drawn
//! (Invert) with transitions off. On the next frame the displacement is
//! cleared with the reflow transition on (Play), and the node's tween glides
//! it home.
//!
//! # Invariants
//!
//! 1. Only ids in both snapshots are considered.
//! 2. A zero delta triggers nothing: no style change, no pending play.
//! 3. Each id is pending at most once per frame.
//!
//! # Failure Modes
//!
//! A pending id whose node disappeared before the frame (deleted, or
//! disposed by a full render) is skipped.

use std::time::Duration;

use tracing::{debug, trace};
use wallet_core::animation::{Transition, glide};
use wallet_core::geometry::Offset;

use crate::card::CardId;
use crate::snapshot::LayoutSnapshot;
use crate::view::ViewTree;

/// Default reflow glide.
pub const REFLOW_DURATION: Duration = Duration::from_millis(200);

/// Per-id displacement `before - after` for ids in both snapshots whose
/// position changed.
#[must_use]
pub fn deltas(before: &LayoutSnapshot, after: &LayoutSnapshot) -> Vec<(CardId, Offset)> {
    after
        .iter()
        .filter_map(|(id, last)| {
            let first = before.get(id)?;
            let delta = Offset::new(first.left - last.left, first.top - last.top);
            (!delta.is_zero()).then_some((id, delta))
        })
        .collect()
}

/// Drives the two-phase FLIP animation.
#[derive(Debug, Clone)]
pub struct ReflowAnimator {
    transition: Transition,
    pending: Vec<CardId>,
}

impl Default for ReflowAnimator {
    fn default() -> Self {
        Self::new(REFLOW_DURATION)
    }
}

impl ReflowAnimator {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            transition: Transition::new(duration, glide),
            pending: Vec::new(),
        }
    }

    /// Invert phase: displace every moved card back to its `before` position
    /// with transitions disabled. Returns the number of cards inverted.
    ///
    /// Call [`on_frame`](Self::on_frame) at the next frame boundary to play.
    pub fn play(
        &mut self,
        before: &LayoutSnapshot,
        after: &LayoutSnapshot,
        view: &mut ViewTree,
    ) -> usize {
        let mut inverted = 0;
        for (id, delta) in deltas(before, after) {
            let Some(node) = view.card_mut(id) else {
                continue;
            };
            let current = node.style.visual_offset();
            node.style.transition = None;
            node.style
                .set_translate(Offset::new(current.dx + delta.dx, current.dy + delta.dy));
            if !self.pending.contains(&id) {
                self.pending.push(id);
            }
            inverted += 1;
            trace!(card = %id, dx = delta.dx, dy = delta.dy, "reflow.invert");
        }
        if inverted > 0 {
            debug!(inverted, "reflow.play");
        }
        inverted
    }

    /// Play phase: clear the displacement of every pending card with the
    /// reflow transition enabled. Returns the number of cards released.
    pub fn on_frame(&mut self, view: &mut ViewTree) -> usize {
        let mut released = 0;
        for id in self.pending.drain(..) {
            let Some(node) = view.card_mut(id) else {
                trace!(card = %id, "reflow.frame: node gone");
                continue;
            };
            node.style.transition = Some(self.transition);
            node.style.set_translate(Offset::ZERO);
            released += 1;
        }
        released
    }

    /// Whether an Invert is waiting for its frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    #[must_use]
    pub fn pending(&self) -> &[CardId] {
        &self.pending
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.transition.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::CardGenerator;
    use crate::layout::GridLayout;
    use crate::render::render_all;
    use crate::snapshot::capture_all;
    use wallet_core::geometry::{Rect, Sides};

    fn view(n: u32) -> (ViewTree, Vec<crate::card::CardRecord>) {
        let layout = GridLayout::new()
            .card_size(10, 4)
            .gap(2, 1)
            .margin(Sides::all(0));
        let mut view = ViewTree::new(layout, Rect::from_size(34, 40));
        let records = CardGenerator::new(2).cards(n);
        render_all(&mut view, &records, None);
        (view, records)
    }

    #[test]
    fn identical_snapshots_do_nothing() {
        let (mut view, _) = view(4);
        let snapshot = capture_all(&view);
        let mut animator = ReflowAnimator::default();
        assert_eq!(animator.play(&snapshot, &snapshot, &mut view), 0);
        assert!(!animator.has_pending());
        assert!(!view.is_animating());
        assert!(view.cards().all(|(_, n)| n.style.translate().is_zero()));
    }

    #[test]
    fn removal_inverts_followers_then_glides_home() {
        let (mut view, _) = view(4);
        let before = capture_all(&view);
        view.remove_card(CardId(1));
        let after = capture_all(&view);

        let mut animator = ReflowAnimator::default();
        assert_eq!(animator.play(&before, &after, &mut view), 3);

        // Card 2 moved from x=12 to x=0: it is drawn where it was.
        let node = view.card(CardId(2)).expect("card");
        assert_eq!(node.style.visual_offset(), Offset::new(12.0, 0.0));
        assert!(!node.style.is_animating());
        // Card 4 wrapped from row 1 to row 0, column 2.
        let node = view.card(CardId(4)).expect("card");
        assert_eq!(node.style.visual_offset(), Offset::new(-24.0, 5.0));

        assert_eq!(animator.on_frame(&mut view), 3);
        assert!(view.is_animating());
        view.advance(Duration::from_millis(100));
        let mid = view.card(CardId(2)).expect("card").style.visual_offset();
        assert!(mid.dx > 0.0 && mid.dx < 12.0);
        view.advance(Duration::from_millis(100));
        assert!(!view.is_animating());
        assert!(view.cards().all(|(_, n)| n.style.visual_offset().is_zero()));
    }

    #[test]
    fn ids_missing_from_either_side_are_skipped() {
        let (mut view, records) = view(3);
        let before = capture_all(&view);
        render_all(&mut view, &records[1..], None);
        let after = capture_all(&view);
        let d = deltas(&before, &after);
        assert!(d.iter().all(|(id, _)| *id != CardId(1)));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn interrupted_glide_inverts_from_current_position() {
        let (mut view, _) = view(4);
        let before = capture_all(&view);
        view.remove_card(CardId(1));
        let after = capture_all(&view);
        let mut animator = ReflowAnimator::default();
        animator.play(&before, &after, &mut view);
        animator.on_frame(&mut view);
        view.advance(Duration::from_millis(50));

        let drawn = capture_all(&view);
        let before = drawn.clone();
        view.remove_card(CardId(2));
        let after = capture_all(&view);
        animator.play(&before, &after, &mut view);
        let again = capture_all(&view);
        let g0 = drawn.get(CardId(3)).expect("before");
        let g1 = again.get(CardId(3)).expect("after");
        assert!((g0.left - g1.left).abs() < 1e-3);
        assert!((g0.top - g1.top).abs() < 1e-3);
    }

    #[test]
    fn pending_node_disposed_before_frame_is_skipped() {
        let (mut view, _) = view(3);
        let before = capture_all(&view);
        view.remove_card(CardId(1));
        let after = capture_all(&view);
        let mut animator = ReflowAnimator::default();
        animator.play(&before, &after, &mut view);
        view.remove_card(CardId(2));
        assert_eq!(animator.on_frame(&mut view), 1);
        assert!(!animator.has_pending());
    }
}
