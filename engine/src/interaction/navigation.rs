//! Discrete next/previous navigation from thumbs-up/thumbs-down.
//!
//! Edge-triggered: a thumb gesture fires once when it appears, never while
//! held.  After firing, a cooldown deadline blocks further steps; edges
//! inside the cooldown are consumed, not queued.

use tracing::debug;

use super::events::{InteractionEvent, NavDirection};
use super::gallery::Gallery;
use crate::tracking::gesture::HandSignal;

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    pub cooldown_ms: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 1000.0,
        }
    }
}

#[derive(Debug)]
pub struct NavigationController {
    pub config: NavigationConfig,
    /// No step fires before this time.
    cooldown_until: Option<f64>,
    was_up: bool,
    was_down: bool,
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            cooldown_until: None,
            was_up: false,
            was_down: false,
        }
    }

    pub fn in_cooldown(&self, now_ms: f64) -> bool {
        self.cooldown_until.is_some_and(|until| now_ms < until)
    }

    pub fn cooldown_until(&self) -> Option<f64> {
        self.cooldown_until
    }

    /// Observe both hands for one tick.
    ///
    /// With `suppressed` set (a drag is in progress) no step fires, but the
    /// edge latches still track the hands so a thumb held through the drag
    /// does not fire when it ends.
    pub fn update(
        &mut self,
        hands: [Option<&HandSignal>; 2],
        gallery: &Gallery,
        now_ms: f64,
        suppressed: bool,
    ) -> Vec<InteractionEvent> {
        let up = hands.iter().flatten().any(|h| h.is_thumbs_up);
        let down = hands.iter().flatten().any(|h| h.is_thumbs_down);
        let rising_up = up && !self.was_up;
        let rising_down = down && !self.was_down;
        self.was_up = up;
        self.was_down = down;

        let direction = match (rising_up, rising_down) {
            (false, false) => return Vec::new(),
            // One hand up, the other down: ambiguous.
            _ if up && down => return Vec::new(),
            (true, _) => NavDirection::Next,
            (_, true) => NavDirection::Previous,
        };
        if suppressed {
            debug!("Thumb {} ignored during drag", direction.as_str());
            return Vec::new();
        }
        if self.in_cooldown(now_ms) {
            debug!("Thumb {} ignored during cooldown", direction.as_str());
            return Vec::new();
        }
        let n = gallery.len();
        if n == 0 {
            return Vec::new();
        }

        let current = gallery.current_index().min(n - 1);
        let index = match direction {
            NavDirection::Next => (current + 1) % n,
            NavDirection::Previous => (current + n - 1) % n,
        };
        let Some(item) = gallery.items().get(index).map(|item| item.id) else {
            return Vec::new();
        };
        self.cooldown_until = Some(now_ms + self.config.cooldown_ms);
        debug!(
            "Navigate {} {} -> {}, cooldown until {:.0}ms",
            direction.as_str(),
            current,
            index,
            now_ms + self.config.cooldown_ms
        );
        vec![InteractionEvent::Navigate {
            direction,
            index,
            item,
        }]
    }

    /// Clear the cooldown deadline.
    pub fn cancel(&mut self) {
        self.cooldown_until = None;
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

// ── Tests ──────────────────────────────────────────────────
