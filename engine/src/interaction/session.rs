//! Interaction session: composes the controllers over one gallery and
//! applies their side effects.
//!
//! Per-tick order:
//!   1. expire the dismiss deadline
//!   2. select controller (gallery channel)
//!   3. dismiss controller, while the viewer is open
//!   4. zoom/pan controller, while the viewer is open; sees no hand while
//!      the dismiss controller is dragging or dismissing
//!   5. navigation, suppressed while either drag is in progress
//!
//! `Drop` and `Navigate` select an item (open the viewer), cancel any
//! pending dismiss and reset zoom/pan; `Dismiss` clears the selection.
//! While the viewer is closed the dismiss controller still tracks its
//! hand, so a pinch held as the viewer opens never starts a drag.  After `teardown` every call
//! is a no-op.

use tracing::{debug, info, warn};

use super::dismiss::DismissController;
use super::events::InteractionEvent;
use super::gallery::{Gallery, GalleryItem};
use super::navigation::NavigationController;
use super::select::SelectController;
use super::zoom_pan::ZoomPanController;
use crate::config::EngineConfig;
use crate::tracking::assembler::TrackingSnapshot;
use crate::tracking::landmarks::Handedness;

/// Which physical hand drives each controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandChannels {
    pub select: Handedness,
    pub zoom_pan: Handedness,
    pub dismiss: Handedness,
}

impl Default for HandChannels {
    fn default() -> Self {
        Self {
            select: Handedness::Right,
            zoom_pan: Handedness::Left,
            dismiss: Handedness::Right,
        }
    }
}

pub struct InteractionSession {
    pub channels: HandChannels,
    gallery: Gallery,
    select: SelectController,
    zoom_pan: ZoomPanController,
    dismiss: DismissController,
    navigation: NavigationController,
    torn_down: bool,
}

impl InteractionSession {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            channels: config.channels,
            gallery: Gallery::new(config.layout.clone()),
            select: SelectController::new(config.select.clone()),
            zoom_pan: ZoomPanController::new(config.zoom_pan.clone()),
            dismiss: DismissController::new(config.dismiss.clone()),
            navigation: NavigationController::new(config.navigation.clone()),
            torn_down: false,
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn select_controller(&self) -> &SelectController {
        &self.select
    }

    pub fn zoom_pan(&self) -> &ZoomPanController {
        &self.zoom_pan
    }

    pub fn dismiss_controller(&self) -> &DismissController {
        &self.dismiss
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    /// The viewer is open whenever an item is selected.
    pub fn is_viewer_open(&self) -> bool {
        self.gallery.selected_id().is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ── Snapshot ticks ──

    /// Run every controller against one published snapshot.
    pub fn tick(&mut self, snapshot: &TrackingSnapshot, now_ms: f64) -> Vec<InteractionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        let mut events = Vec::new();

        // ── Step 1: Pending dismiss ──
        let fired = self.dismiss.expire(now_ms);
        self.apply(fired, &mut events);

        // ── Step 2: Gallery drag/scroll ──
        let fired = self
            .select
            .update(snapshot.hand(self.channels.select), &mut self.gallery);
        self.apply(fired, &mut events);

        // ── Step 3: Viewer move/dismiss ──
        let dismiss_hand = snapshot.hand(self.channels.dismiss);
        if self.is_viewer_open() {
            let fired = self.dismiss.update(dismiss_hand, now_ms);
            self.apply(fired, &mut events);
        } else {
            self.dismiss.observe(dismiss_hand);
        }

        // ── Step 4: Viewer zoom/pan ──
        let zoom_hand = if !self.is_viewer_open()
            || self.dismiss.is_dragging()
            || self.dismiss.is_dismissing()
        {
            None
        } else {
            snapshot.hand(self.channels.zoom_pan)
        };
        let fired = self.zoom_pan.update(zoom_hand);
        self.apply(fired, &mut events);

        // ── Step 5: Thumb navigation ──
        let suppressed = self.select.is_dragging() || self.dismiss.is_dragging();
        let fired = self.navigation.update(
            [snapshot.left_hand.as_ref(), snapshot.right_hand.as_ref()],
            &self.gallery,
            now_ms,
            suppressed,
        );
        self.apply(fired, &mut events);

        events
    }

    /// Fire timers without a new snapshot.
    pub fn poll(&mut self, now_ms: f64) -> Vec<InteractionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        let mut events = Vec::new();
        let fired = self.dismiss.expire(now_ms);
        self.apply(fired, &mut events);
        events
    }

    /// Earliest time a `poll` could emit something.
    pub fn next_deadline(&self) -> Option<f64> {
        if self.torn_down {
            return None;
        }
        self.dismiss.next_deadline()
    }

    /// Record controller output and apply its side effects.
    fn apply(&mut self, fired: Vec<InteractionEvent>, events: &mut Vec<InteractionEvent>) {
        for event in fired {
            let follow_up = match &event {
                InteractionEvent::Drop { item, .. } => {
                    if !self.gallery.select(*item) {
                        warn!("Dropped item {} is no longer in the collection", item);
                    }
                    self.reset_viewer()
                }
                InteractionEvent::Navigate { index, .. } => {
                    self.gallery.select_index(*index);
                    self.reset_viewer()
                }
                InteractionEvent::Dismiss => {
                    self.gallery.clear_selection();
                    self.zoom_pan.reset()
                }
                _ => None,
            };
            events.push(event);
            events.extend(follow_up);
        }
    }

    // ── Lifecycle events ──

    /// Replace the collection.  Closes the viewer if the selected item
    /// disappeared.
    pub fn set_collection(&mut self, items: Vec<GalleryItem>) -> Vec<InteractionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        let was_open = self.is_viewer_open();
        self.gallery.set_items(items);
        debug!("Collection replaced ({} items)", self.gallery.len());
        if was_open && !self.is_viewer_open() {
            return self.close_viewer();
        }
        Vec::new()
    }

    /// Selection changed outside the engine.
    pub fn selection_changed(&mut self, id: Option<u64>) -> Vec<InteractionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        match id {
            Some(id) if self.gallery.select(id) => self.image_changed(),
            Some(id) => {
                warn!("Ignoring selection of unknown item {}", id);
                Vec::new()
            }
            None => self.viewer_closed(),
        }
    }

    /// The displayed image changed: drop any viewer drag and reset zoom/pan.
    pub fn image_changed(&mut self) -> Vec<InteractionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        self.reset_viewer().into_iter().collect()
    }

    /// A new image is shown: a pending dismiss belonged to the old one.
    fn reset_viewer(&mut self) -> Option<InteractionEvent> {
        self.dismiss.cancel();
        self.zoom_pan.reset()
    }

    /// The viewer was closed outside the engine.
    pub fn viewer_closed(&mut self) -> Vec<InteractionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        self.gallery.clear_selection();
        self.close_viewer()
    }

    fn close_viewer(&mut self) -> Vec<InteractionEvent> {
        debug!("Viewer closed");
        self.reset_viewer().into_iter().collect()
    }

    /// Cancel every pending deadline.  No controller fires afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.dismiss.cancel();
        self.navigation.cancel();
        self.select.reset();
        self.torn_down = true;
        info!("Interaction session torn down");
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::events::NavDirection;
    use crate::tracking::gesture::test_support::{pinch_signal, thumb_signal};
    use crate::tracking::gesture::HandSignal;

    fn session(n: u64) -> InteractionSession {
        let mut s = InteractionSession::new(&EngineConfig::default());
        s.set_collection((0..n).map(|i| GalleryItem::new(100 + i, format!("img-{i}"))).collect());
        s
    }

    fn snap(left: Option<HandSignal>, right: Option<HandSignal>) -> TrackingSnapshot {
        TrackingSnapshot {
            left_hand: left,
            right_hand: right,
            is_ready: true,
            timestamp_ms: 0.0,
        }
    }

    fn right_pinch(pinching: bool, x: f32, y: f32) -> TrackingSnapshot {
        snap(None, Some(pinch_signal(Handedness::Right, pinching, x, y)))
    }

    fn names(events: &[InteractionEvent]) -> Vec<&'static str> {
        events.iter().map(|e| e.name()).collect()
    }

    /// Drag item `index` (column 0 or 1 of row 0) into the main area and drop it.
    fn open_item(s: &mut InteractionSession, x: f32, t: f64) -> Vec<InteractionEvent> {
        let mut all = s.tick(&right_pinch(true, x, 0.1), t);
        all.extend(s.tick(&right_pinch(true, 0.6, 0.5), t + 20.0));
        all.extend(s.tick(&right_pinch(false, 0.6, 0.5), t + 40.0));
        all
    }

    #[test]
    fn test_drop_opens_viewer() {
        let mut s = session(5);
        let events = open_item(&mut s, 0.2, 0.0);
        assert_eq!(names(&events), vec!["select", "drop"]);
        assert!(s.is_viewer_open());
        assert_eq!(s.gallery().selected_id(), Some(101));
    }

    #[test]
    fn test_drop_resets_zoom() {
        let mut s = session(5);
        open_item(&mut s, 0.05, 0.0);
        // Zoom in with the left hand.
        let left = |y| snap(Some(pinch_signal(Handedness::Left, true, 0.5, y)), None);
        s.tick(&left(0.5), 100.0);
        let events = s.tick(&left(0.4), 120.0);
        assert_eq!(names(&events), vec!["zoom-pan-changed"]);
        assert!(s.zoom_pan().zoom() > 1.0);

        s.tick(&snap(None, None), 140.0);
        let events = open_item(&mut s, 0.2, 200.0);
        assert_eq!(names(&events), vec!["select", "drop", "zoom-pan-changed"]);
        assert_eq!(s.zoom_pan().zoom(), 1.0);
    }

    #[test]
    fn test_dismiss_closes_viewer_after_delay() {
        let mut s = session(5);
        open_item(&mut s, 0.05, 0.0);

        s.tick(&right_pinch(true, 0.6, 0.4), 100.0);
        s.tick(&right_pinch(true, 0.6, 0.95), 120.0);
        let events = s.tick(&right_pinch(false, 0.6, 0.95), 140.0);
        assert_eq!(names(&events), vec!["drag-state-changed"]);
        assert_eq!(s.next_deadline(), Some(440.0));

        assert!(s.poll(300.0).is_empty());
        assert_eq!(names(&s.poll(440.0)), vec!["dismiss"]);
        assert!(!s.is_viewer_open());
        assert!(s.poll(1000.0).is_empty());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn test_dismiss_expires_on_tick() {
        let mut s = session(5);
        open_item(&mut s, 0.05, 0.0);
        s.tick(&right_pinch(true, 0.6, 0.95), 100.0);
        s.tick(&right_pinch(false, 0.6, 0.95), 120.0);
        let events = s.tick(&snap(None, None), 500.0);
        assert_eq!(names(&events), vec!["dismiss"]);
    }

    #[test]
    fn test_dismiss_drag_suppresses_zoom_pan_on_shared_hand() {
        let mut config = EngineConfig::default();
        config.channels.zoom_pan = Handedness::Right;
        let mut s = InteractionSession::new(&config);
        s.set_collection(vec![GalleryItem::new(1, "a")]);
        s.selection_changed(Some(1));

        s.tick(&right_pinch(true, 0.6, 0.4), 0.0);
        let events = s.tick(&right_pinch(true, 0.6, 0.2), 20.0);
        assert_eq!(names(&events), vec!["move-offset-changed"]);
        assert_eq!(s.zoom_pan().zoom(), 1.0, "vertical motion was a move, not a zoom");
        assert!(!s.zoom_pan().is_engaged());
    }

    #[test]
    fn test_thumb_navigation_selects() {
        let mut s = session(5);
        s.selection_changed(Some(102));
        let events = s.tick(&snap(None, Some(thumb_signal(Handedness::Right, true, false))), 0.0);
        assert_eq!(
            events,
            vec![InteractionEvent::Navigate {
                direction: NavDirection::Next,
                index: 3,
                item: 103
            }]
        );
        assert_eq!(s.gallery().selected_id(), Some(103));
    }

    #[test]
    fn test_pinch_held_while_viewer_opens_does_not_drag() {
        let mut s = session(5);
        let held = pinch_signal(Handedness::Right, true, 0.6, 0.4);
        assert!(s.tick(&snap(None, Some(held.clone())), 0.0).is_empty());

        let thumbs_up = thumb_signal(Handedness::Left, true, false);
        let events = s.tick(&snap(Some(thumbs_up.clone()), Some(held.clone())), 20.0);
        assert_eq!(names(&events), vec!["navigate"]);
        assert!(s.is_viewer_open());

        let events = s.tick(&snap(Some(thumbs_up), Some(held)), 40.0);
        assert!(events.is_empty(), "got {:?}", names(&events));
        assert!(!s.dismiss_controller().is_dragging());

        s.tick(&right_pinch(false, 0.6, 0.4), 60.0);
        let events = s.tick(&right_pinch(true, 0.6, 0.4), 80.0);
        assert_eq!(names(&events), vec!["drag-state-changed"]);
        assert!(s.dismiss_controller().is_dragging());
    }

    #[test]
    fn test_navigation_cancels_pending_dismiss() {
        let mut s = session(5);
        s.selection_changed(Some(100));
        s.tick(&right_pinch(true, 0.6, 0.95), 0.0);
        s.tick(&right_pinch(false, 0.6, 0.95), 20.0);
        assert_eq!(s.next_deadline(), Some(320.0));

        let thumbs_up = snap(Some(thumb_signal(Handedness::Left, true, false)), None);
        assert_eq!(names(&s.tick(&thumbs_up, 40.0)), vec!["navigate"]);
        assert_eq!(s.next_deadline(), None);
        assert!(s.poll(400.0).is_empty());
        assert_eq!(s.gallery().selected_id(), Some(101));
    }

    #[test]
    fn test_navigation_suppressed_during_gallery_drag() {
        let mut s = session(5);
        s.tick(&right_pinch(true, 0.05, 0.1), 0.0);
        assert!(s.select_controller().is_dragging());
        let thumbs = snap(
            Some(thumb_signal(Handedness::Left, true, false)),
            Some(pinch_signal(Handedness::Right, true, 0.3, 0.3)),
        );
        let events = s.tick(&thumbs, 20.0);
        assert!(events.is_empty(), "got {:?}", names(&events));
        assert_eq!(s.navigation().cooldown_until(), None);
    }

    #[test]
    fn test_idle_replay_is_silent() {
        let mut s = session(5);
        let idle = snap(
            Some(pinch_signal(Handedness::Left, false, 0.5, 0.5)),
            Some(pinch_signal(Handedness::Right, false, 0.05, 0.1)),
        );
        for i in 0..20 {
            assert!(s.tick(&idle, i as f64 * 20.0).is_empty());
        }
        assert!(s.tick(&snap(None, None), 500.0).is_empty());
    }

    #[test]
    fn test_collection_change_closes_vanished_viewer() {
        let mut s = session(5);
        s.selection_changed(Some(104));
        let events = s.set_collection(vec![GalleryItem::new(100, "a")]);
        assert!(events.is_empty(), "zoom was neutral");
        assert!(!s.is_viewer_open());
    }

    #[test]
    fn test_viewer_closed_cancels_pending_dismiss() {
        let mut s = session(5);
        s.selection_changed(Some(100));
        s.tick(&right_pinch(true, 0.6, 0.95), 0.0);
        s.tick(&right_pinch(false, 0.6, 0.95), 20.0);
        assert!(s.next_deadline().is_some());
        s.viewer_closed();
        assert_eq!(s.next_deadline(), None);
        assert!(s.poll(1000.0).is_empty());
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut s = session(5);
        s.selection_changed(Some(100));
        s.tick(&right_pinch(true, 0.6, 0.95), 0.0);
        s.tick(&right_pinch(false, 0.6, 0.95), 20.0);
        s.teardown();
        assert!(s.is_torn_down());
        assert_eq!(s.next_deadline(), None);
        assert!(s.poll(1000.0).is_empty());
        assert!(s
            .tick(&snap(None, Some(thumb_signal(Handedness::Right, true, false))), 2000.0)
            .is_empty());
        assert!(s.viewer_closed().is_empty());
        assert!(s.set_collection(Vec::new()).is_empty());
    }
}
