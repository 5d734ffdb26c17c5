//! Move/dismiss controller: drag the open viewer with a pinch and release
//! it in the dismiss zone to close it.
//!
//! The viewer follows the hand 1:1 from the anchor captured on the pinch
//! rising edge.  Releasing inside the dismiss zone starts a timed
//! `Dismissing` state that emits exactly one `Dismiss` once its deadline
//! passes; releasing anywhere else snaps the viewer back.

use tracing::{debug, info};

use super::events::InteractionEvent;
use crate::geometry::{Point, Region};
use crate::tracking::gesture::HandSignal;

// ── Config ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DismissConfig {
    /// Drags only start inside this region (the main content area).
    pub accept_region: Region,
    /// Bottom fraction of `accept_region` that counts as the dismiss zone.
    pub dismiss_zone_fraction: f32,
    /// Delay between release in the zone and the `Dismiss` event.
    pub dismiss_delay_ms: f64,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            accept_region: Region::new(0.25, 0.0, 1.0, 1.0),
            dismiss_zone_fraction: 0.15,
            dismiss_delay_ms: 300.0,
        }
    }
}

impl DismissConfig {
    pub fn dismiss_zone(&self) -> Region {
        self.accept_region.bottom_band(self.dismiss_zone_fraction)
    }
}

// ── State ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DismissState {
    Idle,
    Dragging {
        anchor: Point,
        last_position: Point,
        in_zone: bool,
    },
    /// Released in the dismiss zone; `Dismiss` fires at `deadline_ms`.
    Dismissing { deadline_ms: f64 },
}

impl DismissState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::Dismissing { .. } => "dismissing",
        }
    }
}

// ── Controller ─────────────────────────────────────────────

#[derive(Debug)]
pub struct DismissController {
    pub config: DismissConfig,
    state: DismissState,
    was_pinching: bool,
}

impl DismissController {
    pub fn new(config: DismissConfig) -> Self {
        Self {
            config,
            state: DismissState::Idle,
            was_pinching: false,
        }
    }

    pub fn state(&self) -> &DismissState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DismissState::Dragging { .. })
    }

    pub fn is_dismissing(&self) -> bool {
        matches!(self.state, DismissState::Dismissing { .. })
    }

    /// Current viewer offset from its resting position.
    pub fn offset(&self) -> Point {
        match self.state {
            DismissState::Dragging {
                anchor,
                last_position,
                ..
            } => last_position - anchor,
            _ => Point::ZERO,
        }
    }

    /// Pending dismiss deadline, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        match self.state {
            DismissState::Dismissing { deadline_ms } => Some(deadline_ms),
            _ => None,
        }
    }

    /// Fire the pending dismiss if its deadline has passed.
    pub fn expire(&mut self, now_ms: f64) -> Vec<InteractionEvent> {
        match self.state {
            DismissState::Dismissing { deadline_ms } if now_ms >= deadline_ms => {
                info!("Viewer dismissed");
                self.state = DismissState::Idle;
                vec![InteractionEvent::Dismiss]
            }
            _ => Vec::new(),
        }
    }

    /// Advance one tick.  Expires a pending dismiss first.
    pub fn update(&mut self, hand: Option<&HandSignal>, now_ms: f64) -> Vec<InteractionEvent> {
        let mut events = self.expire(now_ms);
        let pinch = pinch_position(hand);
        let rising = pinch.is_some() && !self.was_pinching;
        self.was_pinching = pinch.is_some();
        let zone = self.config.dismiss_zone();

        self.state = match (std::mem::replace(&mut self.state, DismissState::Idle), pinch) {
            (DismissState::Idle, Some(pos)) if rising && self.config.accept_region.contains(pos) => {
                let in_zone = zone.contains(pos);
                debug!("Viewer drag anchored at ({:.3}, {:.3})", pos.x, pos.y);
                events.push(InteractionEvent::DragStateChanged {
                    is_dragging: true,
                    in_dismiss_zone: in_zone,
                });
                DismissState::Dragging {
                    anchor: pos,
                    last_position: pos,
                    in_zone,
                }
            }
            (
                DismissState::Dragging {
                    anchor,
                    last_position,
                    in_zone,
                },
                Some(pos),
            ) => {
                if pos != last_position {
                    events.push(InteractionEvent::MoveOffsetChanged {
                        offset: pos - anchor,
                    });
                }
                let now_in_zone = zone.contains(pos);
                if now_in_zone != in_zone {
                    debug!("Viewer drag in dismiss zone: {}", now_in_zone);
                    events.push(InteractionEvent::DragStateChanged {
                        is_dragging: true,
                        in_dismiss_zone: now_in_zone,
                    });
                }
                DismissState::Dragging {
                    anchor,
                    last_position: pos,
                    in_zone: now_in_zone,
                }
            }
            (DismissState::Dragging { in_zone: true, .. }, None) => {
                let deadline_ms = now_ms + self.config.dismiss_delay_ms;
                debug!("Released in dismiss zone, dismissing at {:.0}ms", deadline_ms);
                events.push(InteractionEvent::DragStateChanged {
                    is_dragging: false,
                    in_dismiss_zone: true,
                });
                DismissState::Dismissing { deadline_ms }
            }
            (DismissState::Dragging { .. }, None) => {
                debug!("Released outside dismiss zone, snapping back");
                events.push(InteractionEvent::SnapBack);
                events.push(InteractionEvent::DragStateChanged {
                    is_dragging: false,
                    in_dismiss_zone: false,
                });
                DismissState::Idle
            }
            (state, _) => state,
        };
        events
    }

    /// Track the pinch latch without acting on it, while the viewer is
    /// closed.  A pinch already held when the viewer opens is not a
    /// rising edge.
    pub fn observe(&mut self, hand: Option<&HandSignal>) {
        self.was_pinching = pinch_position(hand).is_some();
    }

    /// Abandon any drag or pending dismiss without emitting.
    pub fn cancel(&mut self) {
        if self.state != DismissState::Idle {
            debug!("Dismiss controller cancelled in state {}", self.state.as_str());
        }
        self.state = DismissState::Idle;
    }
}

fn pinch_position(hand: Option<&HandSignal>) -> Option<Point> {
    hand.filter(|h| h.is_pinching && h.pinch_position.is_finite())
        .map(|h| h.pinch_position)
}

impl Default for DismissController {
    fn default() -> Self {
        Self::new(DismissConfig::default())
    }
}

// ── Tests ──────────────────────────────────────────────────
