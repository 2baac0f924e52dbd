#![forbid(unsafe_code)]

//! Audio feedback through the terminal bell.

use tracing::trace;
use wallet_engine::feedback::{AudioSink, Sound};

use crate::session::TerminalSession;

/// Rings the bell for shredding; every other sound is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellSink;

impl BellSink {
    /// Whether `sound` rings the bell.
    #[must_use]
    pub const fn rings(sound: Sound) -> bool {
        matches!(sound, Sound::Shred)
    }
}

impl AudioSink for BellSink {
    fn play(&mut self, sound: Sound) {
        trace!(sound = sound.name(), "feedback.sound");
        if Self::rings(sound) {
            TerminalSession::bell();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_shred_rings() {
        assert!(BellSink::rings(Sound::Shred));
        assert!(!BellSink::rings(Sound::Click));
        assert!(!BellSink::rings(Sound::Woosh));
    }
}
