#![forbid(unsafe_code)]

//! Engine: the card wallet's collection, layout, animation, and interaction.
//!
//! # Role in the workspace
//! `wallet-engine` sits between `wallet-core` (geometry, events, easing) and
//! a frontend such as `wallet-demo`. It has no terminal dependency; a
//! frontend feeds it canonical [`Event`](wallet_core::event::Event)s and
//! a monotonic time, then reads the [`view::ViewTree`] back to draw.
//!
//! # Primary responsibilities
//! - **Store**: [`store::CardStore`], the single source of truth for order.
//! - **Projection**: [`filter::FilterProjector`] and [`render::render_all`]
//!   turn the store into a [`view::ViewTree`].
//! - **Reflow**: [`snapshot::capture_all`] plus [`reflow::ReflowAnimator`]
//!   make cards glide from their old position after any layout change.
//! - **Drag**: [`drag::DragController`] reorders cards with a placeholder
//!   and commits to the store exactly once per gesture.
//! - **Removal**: [`effects::ShredEffect`] plays while a delayed commit waits
//!   on the [`scheduler::Scheduler`].
//! - **Controller**: [`app::WalletApp`] wires the above together.
//!
//! # Invariants
//! 1. Rendered cards appear in store order, restricted to the visible set.
//! 2. At most one drag session exists; it writes the store once, at the end.
//! 3. Tasks owned by a disposed node never run.

pub mod app;
pub mod card;
pub mod code_image;
pub mod config;
pub mod details;
pub mod drag;
pub mod effects;
pub mod feedback;
pub mod filter;
pub mod generator;
pub mod layout;
pub mod reflow;
pub mod render;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod view;

pub use app::{AppMsg, ViewMode, WalletApp, WalletSignal, WalletState};
pub use card::{CardId, CardKind, CardRecord};
pub use config::WalletConfig;
pub use store::CardStore;
