//! Viewer zoom/pan from a single pinching hand.
//!
//! Vertical travel zooms (down shrinks, up grows) when it dominates the
//! horizontal component; horizontal travel beyond a small dead zone pans.
//! Both may change in the same tick.  Each new pinch recalibrates from
//! scratch with no inertia.

use tracing::{debug, warn};

use super::events::InteractionEvent;
use crate::geometry::Point;
use crate::tracking::gesture::HandSignal;

// ── Config ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomPanConfig {
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Zoom change per unit of vertical travel.
    pub zoom_gain: f32,
    pub pan_min: f32,
    pub pan_max: f32,
    /// Pan change per unit of horizontal travel.
    pub pan_gain: f32,
    /// Horizontal travel per tick below this is ignored for panning.
    pub pan_dead_zone: f32,
    /// Zoom applies only when |dy| > zoom_dominance * |dx|.
    pub zoom_dominance: f32,
}

impl Default for ZoomPanConfig {
    fn default() -> Self {
        Self {
            zoom_min: 1.0,
            zoom_max: 3.0,
            zoom_gain: 4.0,
            pan_min: -0.5,
            pan_max: 0.5,
            pan_gain: 1.5,
            pan_dead_zone: 0.005,
            zoom_dominance: 0.5,
        }
    }
}

// ── Controller ─────────────────────────────────────────────

#[derive(Debug)]
pub struct ZoomPanController {
    pub config: ZoomPanConfig,
    zoom: f32,
    pan: Point,
    /// Reference position while pinching; `None` doubles as the pinch latch.
    last_position: Option<Point>,
}

impl ZoomPanController {
    pub fn new(config: ZoomPanConfig) -> Self {
        let zoom = Self::neutral_zoom(&config);
        Self {
            config,
            zoom,
            pan: Point::ZERO,
            last_position: None,
        }
    }

    fn neutral_zoom(config: &ZoomPanConfig) -> f32 {
        1.0_f32.clamp(config.zoom_min, config.zoom_max)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn is_engaged(&self) -> bool {
        self.last_position.is_some()
    }

    pub fn update(&mut self, hand: Option<&HandSignal>) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        let pinch = hand
            .filter(|h| h.is_pinching && h.pinch_position.is_finite())
            .map(|h| h.pinch_position);

        let (last, pos) = match (self.last_position, pinch) {
            (None, Some(pos)) => {
                debug!("Zoom/pan reference at ({:.3}, {:.3})", pos.x, pos.y);
                self.last_position = Some(pos);
                return events;
            }
            (Some(last), Some(pos)) => (last, pos),
            (Some(_), None) => {
                debug!("Zoom/pan released (zoom {:.2}, pan-x {:.3})", self.zoom, self.pan.x);
                self.last_position = None;
                return events;
            }
            (None, None) => return events,
        };
        self.last_position = Some(pos);

        let delta = pos - last;
        let cfg = &self.config;
        let mut zoom = self.zoom;
        let mut pan = self.pan;

        if delta.y.abs() > cfg.zoom_dominance * delta.x.abs() {
            zoom = (zoom - delta.y * cfg.zoom_gain).clamp(cfg.zoom_min, cfg.zoom_max);
        }
        if delta.x.abs() > cfg.pan_dead_zone {
            pan.x = (pan.x + delta.x * cfg.pan_gain).clamp(cfg.pan_min, cfg.pan_max);
        }

        if !zoom.is_finite() || !pan.is_finite() {
            warn!("Discarding non-finite zoom/pan update");
            return events;
        }
        if zoom != self.zoom || pan != self.pan {
            self.zoom = zoom;
            self.pan = pan;
            events.push(InteractionEvent::ZoomPanChanged { zoom, pan });
        }
        events
    }

    /// Return to neutral zoom and zero pan ("image changed").  Emits a
    /// change event if anything moved.
    pub fn reset(&mut self) -> Option<InteractionEvent> {
        self.last_position = None;
        let zoom = Self::neutral_zoom(&self.config);
        if zoom == self.zoom && self.pan == Point::ZERO {
            return None;
        }
        self.zoom = zoom;
        self.pan = Point::ZERO;
        Some(InteractionEvent::ZoomPanChanged {
            zoom,
            pan: Point::ZERO,
        })
    }
}

impl Default for ZoomPanController {
    fn default() -> Self {
        Self::new(ZoomPanConfig::default())
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::gesture::test_support::pinch_signal;
    use crate::tracking::landmarks::Handedness;

    fn pinch(x: f32, y: f32) -> HandSignal {
        pinch_signal(Handedness::Left, true, x, y)
    }

    fn changed(events: &[InteractionEvent]) -> (f32, Point) {
        match events {
            [InteractionEvent::ZoomPanChanged { zoom, pan }] => (*zoom, *pan),
            other => panic!("expected one zoom/pan change, got {:?}", other),
        }
    }

    #[test]
    fn test_rising_edge_only_anchors() {
        let mut c = ZoomPanController::default();
        assert!(c.update(Some(&pinch(0.5, 0.5))).is_empty());
        assert!(c.is_engaged());
        assert_eq!(c.zoom(), 1.0);
    }

    #[test]
    fn test_upward_motion_zooms_in() {
        let mut c = ZoomPanController::default();
        c.update(Some(&pinch(0.5, 0.5)));
        let (zoom, pan) = changed(&c.update(Some(&pinch(0.5, 0.4))));
        assert!((zoom - 1.4).abs() < 1e-4);
        assert_eq!(pan, Point::ZERO);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut c = ZoomPanController::default();
        c.update(Some(&pinch(0.5, 0.9)));
        let (zoom, _) = changed(&c.update(Some(&pinch(0.5, 0.1))));
        assert_eq!(zoom, 3.0);
        // Already at max: further upward motion changes nothing.
        assert!(c.update(Some(&pinch(0.5, 0.05))).is_empty());
        // Downward motion cannot go below min.
        let (zoom, _) = changed(&c.update(Some(&pinch(0.5, 0.95))));
        assert_eq!(zoom, 1.0);
    }

    #[test]
    fn test_horizontal_motion_pans_without_zoom() {
        let mut c = ZoomPanController::default();
        c.update(Some(&pinch(0.5, 0.5)));
        let (zoom, pan) = changed(&c.update(Some(&pinch(0.6, 0.52))));
        assert_eq!(zoom, 1.0, "dy 0.02 does not dominate dx 0.1");
        assert!((pan.x - 0.15).abs() < 1e-4);
        assert_eq!(pan.y, 0.0);
    }

    #[test]
    fn test_diagonal_motion_zooms_and_pans() {
        let mut c = ZoomPanController::default();
        c.update(Some(&pinch(0.5, 0.5)));
        let (zoom, pan) = changed(&c.update(Some(&pinch(0.55, 0.4))));
        assert!((zoom - 1.4).abs() < 1e-4);
        assert!((pan.x - 0.075).abs() < 1e-4);
    }

    #[test]
    fn test_pan_dead_zone_and_clamp() {
        let mut c = ZoomPanController::default();
        c.update(Some(&pinch(0.5, 0.5)));
        assert!(c.update(Some(&pinch(0.503, 0.5))).is_empty(), "inside dead zone");
        c.update(Some(&pinch(0.1, 0.5)));
        assert_eq!(c.pan().x, -0.5);
    }

    #[test]
    fn test_release_recalibrates() {
        let mut c = ZoomPanController::default();
        c.update(Some(&pinch(0.5, 0.5)));
        c.update(Some(&pinch(0.5, 0.4)));
        c.update(None);
        assert!(!c.is_engaged());
        // New pinch far away: anchors, no jump.
        assert!(c.update(Some(&pinch(0.9, 0.9))).is_empty());
        assert!((c.zoom() - 1.4).abs() < 1e-4, "zoom kept across pinches");
    }

    #[test]
    fn test_non_pinching_hand_releases() {
        let mut c = ZoomPanController::default();
        c.update(Some(&pinch(0.5, 0.5)));
        c.update(Some(&pinch_signal(Handedness::Left, false, 0.5, 0.1)));
        assert!(!c.is_engaged());
        assert_eq!(c.zoom(), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut c = ZoomPanController::default();
        assert!(c.reset().is_none(), "already neutral");
        c.update(Some(&pinch(0.5, 0.5)));
        c.update(Some(&pinch(0.6, 0.3)));
        let (zoom, pan) = match c.reset() {
            Some(InteractionEvent::ZoomPanChanged { zoom, pan }) => (zoom, pan),
            other => panic!("expected reset event, got {:?}", other),
        };
        assert_eq!((zoom, pan), (1.0, Point::ZERO));
        assert!(!c.is_engaged());
    }
}
