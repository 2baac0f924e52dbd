#![forbid(unsafe_code)]

//! Engine configuration.

use std::time::Duration;

use crate::layout::GridLayout;

/// Tunables for [`WalletApp`](crate::app::WalletApp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletConfig {
    /// Cards generated at startup.
    pub card_count: u32,
    /// Generator seed.
    pub seed: u64,
    pub layout: GridLayout,
    /// FLIP glide duration.
    pub reflow_duration: Duration,
    /// Delay between a delete request and the store commit.
    pub removal_delay: Duration,
    /// Entrance delay per rendered position after a filter change.
    pub entrance_step: Duration,
    pub entrance_duration: Duration,
    /// Scroll offset, in rows, that stack mode jumps to.
    pub stack_scroll: i32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            card_count: 50,
            seed: 0x5EED,
            layout: GridLayout::default(),
            reflow_duration: Duration::from_millis(200),
            removal_delay: Duration::from_millis(200),
            entrance_step: Duration::from_millis(22),
            entrance_duration: Duration::from_millis(260),
            stack_scroll: 4,
        }
    }
}

impl WalletConfig {
    #[must_use]
    pub fn card_count(mut self, count: u32) -> Self {
        self.card_count = count;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn reflow_duration(mut self, duration: Duration) -> Self {
        self.reflow_duration = duration;
        self
    }

    #[must_use]
    pub fn removal_delay(mut self, delay: Duration) -> Self {
        self.removal_delay = delay;
        self
    }

    #[must_use]
    pub fn entrance(mut self, step: Duration, duration: Duration) -> Self {
        self.entrance_step = step;
        self.entrance_duration = duration;
        self
    }

    #[must_use]
    pub fn stack_scroll(mut self, rows: i32) -> Self {
        self.stack_scroll = rows.max(0);
        self
    }
}
