#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! Backends translate their native events into these types so the engine
//! never depends on a particular terminal or windowing library.
//!
//! # Design Notes
//!
//! - Pointer events carry a [`PointerId`] so that multi-pointer input can be
//!   told apart from a single dragging pointer.
//! - `Modifiers` use bitflags for easy combination.
//! - [`PointerCapture`] is the listener ledger for a gesture: move/up routing
//!   is installed once on gesture start and removed once on gesture end.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// The viewport was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Pasted text.
    Paste(String),

    /// Frame boundary from the runtime.
    Tick,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Key codes the wallet reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Up,
    Down,
    PageUp,
    PageDown,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Identifies one physical pointer for the duration of its contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

impl PointerId {
    /// The single pointer a terminal mouse reports.
    pub const PRIMARY: PointerId = PointerId(0);
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// The kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Button pressed.
    Down(PointerButton),
    /// Moved while a button is held.
    Move,
    /// Button released.
    Up(PointerButton),
    /// Contact lost without a release (focus loss, OS gesture takeover).
    Cancel,
    /// Moved with no button held.
    Hover,
    /// Wheel scrolled; positive is downward.
    Wheel(i16),
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create an event for the primary pointer.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: i32, y: i32) -> Self {
        Self {
            pointer: PointerId::PRIMARY,
            kind,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary-button press.
    #[must_use]
    pub const fn down(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    /// Move with the button held.
    #[must_use]
    pub const fn moved(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    /// Primary-button release.
    #[must_use]
    pub const fn up(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    /// Replace the pointer id.
    #[must_use]
    pub const fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }

    /// Whether this press should start a gesture (primary button only).
    #[must_use]
    pub const fn is_primary_press(&self) -> bool {
        matches!(self.kind, PointerEventKind::Down(PointerButton::Primary))
    }
}

/// Which pointer (if any) currently owns move/release routing.
///
/// Acquired when a gesture starts and released when it ends. The counters let
/// callers assert that every acquisition was matched by exactly one release.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    holder: Option<PointerId>,
    acquired: u64,
    released: u64,
}

impl PointerCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route subsequent move/up events for `pointer` to the capturing owner.
    ///
    /// Returns `false` without changing anything if a capture is already held.
    pub fn acquire(&mut self, pointer: PointerId) -> bool {
        if self.holder.is_some() {
            return false;
        }
        self.holder = Some(pointer);
        self.acquired += 1;
        true
    }

    /// Drop the capture. Returns the previous holder, or `None` if nothing
    /// was captured (the second release of a gesture is a no-op).
    pub fn release(&mut self) -> Option<PointerId> {
        let holder = self.holder.take()?;
        self.released += 1;
        Some(holder)
    }

    /// Current holder.
    #[must_use]
    pub const fn holder(&self) -> Option<PointerId> {
        self.holder
    }

    /// Whether `pointer` holds the capture.
    #[must_use]
    pub fn is_held_by(&self, pointer: PointerId) -> bool {
        self.holder == Some(pointer)
    }

    /// Total captures acquired.
    #[must_use]
    pub const fn acquired(&self) -> u64 {
        self.acquired
    }

    /// Total captures released.
    #[must_use]
    pub const fn released(&self) -> u64 {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_helpers() {
        let key = KeyEvent::new(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL);
        assert!(key.is_char('q'));
        assert!(!key.is_char('w'));
        assert!(key.ctrl());
        assert!(!KeyEvent::new(KeyCode::Enter).ctrl());
    }

    #[test]
    fn pointer_constructors() {
        let down = PointerEvent::down(3, 4);
        assert!(down.is_primary_press());
        assert_eq!(down.position, Point::new(3, 4));
        assert_eq!(down.pointer, PointerId::PRIMARY);

        let secondary = PointerEvent::new(PointerEventKind::Down(PointerButton::Secondary), 0, 0);
        assert!(!secondary.is_primary_press());

        let other = PointerEvent::moved(1, 1).with_pointer(PointerId(7));
        assert_eq!(other.pointer, PointerId(7));
        assert_eq!(other.kind, PointerEventKind::Move);
    }

    #[test]
    fn capture_is_exclusive() {
        let mut capture = PointerCapture::new();
        assert!(capture.acquire(PointerId(1)));
        assert!(!capture.acquire(PointerId(2)));
        assert!(capture.is_held_by(PointerId(1)));
        assert!(!capture.is_held_by(PointerId(2)));
        assert_eq!(capture.acquired(), 1);
    }

    #[test]
    fn capture_release_is_idempotent() {
        let mut capture = PointerCapture::new();
        assert!(capture.acquire(PointerId::PRIMARY));
        assert_eq!(capture.release(), Some(PointerId::PRIMARY));
        assert_eq!(capture.release(), None);
        assert_eq!(capture.acquired(), 1);
        assert_eq!(capture.released(), 1);
        assert!(capture.holder().is_none());
    }

    #[test]
    fn capture_counts_balance_across_sessions() {
        let mut capture = PointerCapture::new();
        for _ in 0..3 {
            assert!(capture.acquire(PointerId::PRIMARY));
            capture.release();
            capture.release();
        }
        assert_eq!(capture.acquired(), 3);
        assert_eq!(capture.released(), 3);
    }
}
