//! Drag/select controller for the gallery hand channel.
//!
//! A pinch that starts over a gallery item picks it up; releasing inside
//! the accept region drops it (opens it in the viewer), releasing anywhere
//! else cancels.  A pinch that starts over empty gallery space scrolls the
//! gallery instead.  The target is resolved once, at engage time.

use tracing::debug;

use super::events::InteractionEvent;
use super::gallery::Gallery;
use crate::geometry::{Point, Region};
use crate::tracking::gesture::HandSignal;

// ── Config ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SelectConfig {
    /// Releasing a dragged item inside this region drops it.
    pub accept_region: Region,
    /// Scroll offset change per unit of vertical hand travel.
    pub scroll_gain: f32,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            accept_region: Region::new(0.25, 0.0, 1.0, 1.0),
            scroll_gain: 1.0,
        }
    }
}

// ── State ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SelectState {
    Idle,
    /// Pinch began over empty gallery space.
    Scrolling { last_y: f32 },
    /// An item is being dragged; `position` is the last pinch position.
    Engaged {
        item: u64,
        index: usize,
        position: Point,
    },
}

impl SelectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scrolling { .. } => "scrolling",
            Self::Engaged { .. } => "engaged",
        }
    }
}

// ── Controller ─────────────────────────────────────────────

#[derive(Debug)]
pub struct SelectController {
    pub config: SelectConfig,
    state: SelectState,
    was_pinching: bool,
}

impl SelectController {
    pub fn new(config: SelectConfig) -> Self {
        Self {
            config,
            state: SelectState::Idle,
            was_pinching: false,
        }
    }

    pub fn state(&self) -> &SelectState {
        &self.state
    }

    /// Whether an item is currently held.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectState::Engaged { .. })
    }

    /// Advance one tick.  `None` means the hand is not detected, which
    /// releases any drag in progress.
    pub fn update(&mut self, hand: Option<&HandSignal>, gallery: &mut Gallery) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        let pinch = hand
            .filter(|h| h.is_pinching && h.pinch_position.is_finite())
            .map(|h| h.pinch_position);
        let rising = pinch.is_some() && !self.was_pinching;
        self.was_pinching = pinch.is_some();

        self.state = match (std::mem::replace(&mut self.state, SelectState::Idle), pinch) {
            (SelectState::Idle, Some(pos)) if rising && gallery.layout.region.contains(pos) => {
                match gallery.item_at(pos) {
                    Some((index, item)) => {
                        debug!("Drag engaged on item {} (index {})", item.id, index);
                        events.push(InteractionEvent::Select {
                            item: item.id,
                            position: pos,
                        });
                        SelectState::Engaged {
                            item: item.id,
                            index,
                            position: pos,
                        }
                    }
                    None => {
                        debug!("Gallery scroll engaged at y={:.3}", pos.y);
                        SelectState::Scrolling { last_y: pos.y }
                    }
                }
            }
            (SelectState::Engaged { item, index, .. }, Some(pos)) => SelectState::Engaged {
                item,
                index,
                position: pos,
            },
            (SelectState::Scrolling { last_y }, Some(pos)) => {
                let before = gallery.scroll_offset();
                let after = gallery.scroll_by(-(pos.y - last_y) * self.config.scroll_gain);
                if after != before {
                    events.push(InteractionEvent::Scrolled { offset: after });
                }
                SelectState::Scrolling { last_y: pos.y }
            }
            (SelectState::Engaged { item, position, .. }, None) => {
                if self.config.accept_region.contains(position) {
                    debug!("Drag released in accept region: drop item {}", item);
                    events.push(InteractionEvent::Drop { item, position });
                } else {
                    debug!("Drag released outside accept region: cancel item {}", item);
                    events.push(InteractionEvent::Cancel { item, position });
                }
                SelectState::Idle
            }
            (SelectState::Scrolling { .. }, None) => {
                debug!("Gallery scroll released");
                SelectState::Idle
            }
            (state, _) => state,
        };
        events
    }

    /// Drop any engagement without emitting.  The pinch latch is kept, so
    /// a pinch still held does not re-engage.
    pub fn reset(&mut self) {
        self.state = SelectState::Idle;
    }
}

impl Default for SelectController {
    fn default() -> Self {
        Self::new(SelectConfig::default())
    }
}

// ── Tests ──────────────────────────────────────────────────
