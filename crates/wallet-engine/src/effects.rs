#![forbid(unsafe_code)]

//! Removal effects.
//!
//! A [`RemovalEffect`] is told where a card was drawn when it was deleted
//! and produces falling [`Piece`]s for the renderer to draw. It owns no
//! store state; the commit that actually removes the card is scheduled by
//! the controller.
//!
//! # Shred
//!
//! [`ShredEffect`] cuts the card into vertical strips. Each strip starts a
//! little after its left neighbour, drifts sideways, tilts, and falls past
//! the card's bottom edge while fading out. Strip parameters come from an
//! xorshift PRNG seeded by the card id, so the same card always shreds the
//! same way.

use std::time::Duration;

use tracing::trace;
use wallet_core::animation::{cubic_bezier, ease_out};
use wallet_core::geometry::Rect;

use crate::card::CardId;
use crate::generator::Xorshift64;

/// Approximate pixel size of one cell, for converting pixel-tuned motion.
const CELL_PX: (f32, f32) = (8.0, 16.0);

/// One drawable fragment of a removal effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub card: CardId,
    pub rect: Rect,
    /// 1.0 fully visible, 0.0 gone.
    pub opacity: f32,
    /// Rotation about the horizontal axis, in degrees.
    pub tilt_deg: f32,
}

/// Plays the visual side of a deletion.
pub trait RemovalEffect {
    /// Start the effect for `card`, last drawn at `bounds`.
    fn play(&mut self, card: CardId, bounds: Rect);

    fn advance(&mut self, dt: Duration);

    /// Fragments to draw this frame.
    fn pieces(&self) -> Vec<Piece>;

    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone)]
struct Strip {
    x: i32,
    width: u16,
    delay: Duration,
    fall: Duration,
    tilt_deg: f32,
    drift: f32,
    drop: f32,
}

#[derive(Debug, Clone)]
struct Shred {
    card: CardId,
    bounds: Rect,
    strips: Vec<Strip>,
    elapsed: Duration,
}

impl Shred {
    fn is_done(&self) -> bool {
        self.strips
            .iter()
            .all(|strip| self.elapsed >= strip.delay + strip.fall)
    }
}

/// Vertical-strip shredder.
#[derive(Debug, Clone)]
pub struct ShredEffect {
    strip_count: usize,
    shreds: Vec<Shred>,
}

impl Default for ShredEffect {
    fn default() -> Self {
        Self::new(12)
    }
}

impl ShredEffect {
    #[must_use]
    pub fn new(strip_count: usize) -> Self {
        Self {
            strip_count: strip_count.max(1),
            shreds: Vec::new(),
        }
    }

    fn cut(&self, card: CardId, bounds: Rect) -> Vec<Strip> {
        let count = self.strip_count.min(usize::from(bounds.width).max(1));
        let width = f32::from(bounds.width);
        let mut rng = Xorshift64::new(u64::from(card.0));
        (0..count)
            .map(|i| {
                let left = (i as f32 * width / count as f32).round() as i32;
                let right = ((i + 1) as f32 * width / count as f32).round() as i32;
                Strip {
                    x: left,
                    width: (right - left).max(1) as u16,
                    delay: Duration::from_millis(15 * i as u64),
                    fall: Duration::from_secs_f32(0.6 + rng.range_f32(-0.12, 0.12)),
                    tilt_deg: rng.range_f32(-28.0, 28.0),
                    drift: rng.range_f32(-18.0, 18.0) / CELL_PX.0,
                    drop: f32::from(bounds.height) + rng.range_f32(40.0, 90.0) / CELL_PX.1,
                }
            })
            .collect()
    }
}

impl RemovalEffect for ShredEffect {
    fn play(&mut self, card: CardId, bounds: Rect) {
        let strips = self.cut(card, bounds);
        trace!(card = %card, strips = strips.len(), "shred.play");
        self.shreds.retain(|shred| shred.card != card);
        self.shreds.push(Shred {
            card,
            bounds,
            strips,
            elapsed: Duration::ZERO,
        });
    }

    fn advance(&mut self, dt: Duration) {
        for shred in &mut self.shreds {
            shred.elapsed = shred.elapsed.saturating_add(dt);
        }
        self.shreds.retain(|shred| !shred.is_done());
    }

    fn pieces(&self) -> Vec<Piece> {
        let mut pieces = Vec::new();
        for shred in &self.shreds {
            for strip in &shred.strips {
                let local = shred.elapsed.saturating_sub(strip.delay);
                let t = (local.as_secs_f32() / strip.fall.as_secs_f32()).clamp(0.0, 1.0);
                if t >= 1.0 {
                    continue;
                }
                let travel = cubic_bezier(0.16, 0.9, 0.3, 1.1, t);
                let rect = Rect::new(
                    shred.bounds.x + strip.x + (strip.drift * travel).round() as i32,
                    shred.bounds.y + (strip.drop * travel).round() as i32,
                    strip.width,
                    shred.bounds.height,
                );
                pieces.push(Piece {
                    card: shred.card,
                    rect,
                    opacity: 1.0 - ease_out(t),
                    tilt_deg: strip.tilt_deg * travel,
                });
            }
        }
        pieces
    }

    fn is_active(&self) -> bool {
        !self.shreds.is_empty()
    }
}
