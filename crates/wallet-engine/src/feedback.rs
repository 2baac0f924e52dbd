#![forbid(unsafe_code)]

//! Fire-and-forget audio and haptic cues.
//!
//! Sinks are optional. A missing sink is a missing capability, not an error:
//! the cue is skipped and the engine carries on.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// A named sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Click,
    Shred,
    Woosh,
}

impl Sound {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Shred => "shred",
            Self::Woosh => "woosh",
        }
    }
}

/// Something the user just did that deserves a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackCue {
    /// Opening the details view.
    Click,
    /// Deleting a card.
    Shred,
    /// Picking a card up.
    Woosh,
    /// Switching view mode.
    Toggle,
}

impl FeedbackCue {
    #[must_use]
    pub const fn sound(self) -> Sound {
        match self {
            Self::Click | Self::Toggle => Sound::Click,
            Self::Shred => Sound::Shred,
            Self::Woosh => Sound::Woosh,
        }
    }

    /// Vibration pattern in milliseconds, alternating on and off.
    #[must_use]
    pub const fn haptic_pattern(self) -> &'static [u16] {
        match self {
            Self::Click => &[20],
            Self::Shred => &[10, 20, 40],
            Self::Woosh => &[8],
            Self::Toggle => &[12],
        }
    }
}

/// Plays sounds.
pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

/// Plays vibration patterns.
pub trait HapticSink {
    fn vibrate(&mut self, pattern: &[u16]);
}

/// Routes cues to whichever sinks are available.
#[derive(Default)]
pub struct Feedback {
    audio: Option<Box<dyn AudioSink>>,
    haptics: Option<Box<dyn HapticSink>>,
}

impl std::fmt::Debug for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feedback")
            .field("audio", &self.audio.is_some())
            .field("haptics", &self.haptics.is_some())
            .finish()
    }
}

impl Feedback {
    /// No sinks: every cue is skipped.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn with_haptics(mut self, sink: impl HapticSink + 'static) -> Self {
        self.haptics = Some(Box::new(sink));
        self
    }

    pub fn emit(&mut self, cue: FeedbackCue) {
        match self.audio.as_mut() {
            Some(audio) => audio.play(cue.sound()),
            None => trace!(?cue, "feedback: no audio sink"),
        }
        match self.haptics.as_mut() {
            Some(haptics) => haptics.vibrate(cue.haptic_pattern()),
            None => trace!(?cue, "feedback: no haptic sink"),
        }
    }
}

/// One delivered cue, as seen by a [`FeedbackLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackRecord {
    Sound(Sound),
    Vibrate(Vec<u16>),
}

/// Shared in-memory sink that records everything it receives.
///
/// Clone it into [`Feedback`] as both sinks and keep one handle to inspect.
#[derive(Debug, Clone, Default)]
pub struct FeedbackLog {
    records: Rc<RefCell<Vec<FeedbackRecord>>>,
}

impl FeedbackLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.records.borrow().clone()
    }

    /// Sounds received, in order.
    #[must_use]
    pub fn sounds(&self) -> Vec<Sound> {
        self.records
            .borrow()
            .iter()
            .filter_map(|record| match record {
                FeedbackRecord::Sound(sound) => Some(*sound),
                FeedbackRecord::Vibrate(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl AudioSink for FeedbackLog {
    fn play(&mut self, sound: Sound) {
        self.records.borrow_mut().push(FeedbackRecord::Sound(sound));
    }
}

impl HapticSink for FeedbackLog {
    fn vibrate(&mut self, pattern: &[u16]) {
        self.records
            .borrow_mut()
            .push(FeedbackRecord::Vibrate(pattern.to_vec()));
    }
}
