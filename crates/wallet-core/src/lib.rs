#![forbid(unsafe_code)]

//! Core: geometry, input events, and animation primitives for the card wallet.
//!
//! # Role in the workspace
//! `wallet-core` is the leaf crate. It owns the value types every other layer
//! speaks in: cell-space rectangles and offsets, normalized pointer and key
//! events, and time-based animation building blocks.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Rect`], [`geometry::Point`], [`geometry::Offset`].
//! - **Event**: canonical input events plus [`event::PointerCapture`], the
//!   per-gesture listener bookkeeping used by drag sessions.
//! - **Animation**: easing curves, [`animation::Fade`], [`animation::Tween`],
//!   and stagger delays.
//! - **Text**: width-aware truncation for fixed-size card faces.
//! - **Clock**: monotonic time sources, real and manual.
//!
//! # How it fits in the system
//! `wallet-engine` builds the collection store, view tree, reflow animator,
//! and drag controller on top of these types. `wallet-core` has no notion of
//! cards or of a terminal.

pub mod animation;
pub mod clock;
pub mod event;
pub mod geometry;
pub mod text;
