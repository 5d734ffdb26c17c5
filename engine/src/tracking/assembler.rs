//! Frame assembler: turns raw detector callbacks into throttled
//! `TrackingSnapshot` publishes.
//!
//! Pipeline per callback: throttle gate -> handedness correction ->
//! classification -> publish.  A dropped callback is never published.
//! Hands missing from a callback are `None` in that publish; nothing is
//! carried over between frames.

use tracing::{debug, info, warn};

use super::gesture::{GestureClassifier, HandSignal};
use super::landmarks::{HandLandmarks, Handedness, Landmark};

// ── Input ──────────────────────────────────────────────────

/// One hand as reported by the external detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Detector label, before mirror correction.
    pub label: Handedness,
    /// Ordered landmarks (21 expected).
    pub landmarks: Vec<Landmark>,
}

// ── Snapshot ───────────────────────────────────────────────

/// The published per-tick view of both hands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackingSnapshot {
    pub left_hand: Option<HandSignal>,
    pub right_hand: Option<HandSignal>,
    /// Detector pipeline initialized, independent of hand visibility.
    pub is_ready: bool,
    /// Publish time in milliseconds.
    pub timestamp_ms: f64,
}

impl TrackingSnapshot {
    /// Signal for the given physical hand, if detected.
    pub fn hand(&self, hand: Handedness) -> Option<&HandSignal> {
        match hand {
            Handedness::Left => self.left_hand.as_ref(),
            Handedness::Right => self.right_hand.as_ref(),
        }
    }

    /// Render as an IPC-style event s-expression.
    pub fn to_sexp(&self) -> String {
        let side = |h: &Option<HandSignal>| {
            h.as_ref()
                .map(|s| s.to_sexp())
                .unwrap_or_else(|| "nil".to_string())
        };
        format!(
            "(:type :event :event :snapshot :ready {} :timestamp-ms {:.0} :left {} :right {})",
            if self.is_ready { "t" } else { "nil" },
            self.timestamp_ms,
            side(&self.left_hand),
            side(&self.right_hand),
        )
    }
}

// ── Config ─────────────────────────────────────────────────

/// Assembler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerConfig {
    /// Callbacks arriving sooner than this after the last processed one
    /// are dropped (~60 Hz ceiling at 16 ms).
    pub publish_throttle_ms: f64,
    /// Swap Left/Right labels (front-facing camera convention).
    pub flip_handedness: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            publish_throttle_ms: 16.0,
            flip_handedness: true,
        }
    }
}

// ── Assembler ──────────────────────────────────────────────

/// Single writer of `TrackingSnapshot`.
pub struct FrameAssembler {
    pub config: AssemblerConfig,
    classifier: GestureClassifier,
    /// Time of the last callback that passed the throttle gate.
    last_processed_ms: Option<f64>,
    ready: bool,
    latest: TrackingSnapshot,
    /// Callbacks published.
    pub published: u64,
    /// Callbacks dropped by the throttle gate.
    pub dropped: u64,
}

impl FrameAssembler {
    pub fn new(config: AssemblerConfig, classifier: GestureClassifier) -> Self {
        Self {
            config,
            classifier,
            last_processed_ms: None,
            ready: false,
            latest: TrackingSnapshot::default(),
            published: 0,
            dropped: 0,
        }
    }

    /// Mark the detector pipeline initialized.  Never revoked by
    /// transient detector errors.
    pub fn set_ready(&mut self, ready: bool) {
        if ready != self.ready {
            info!("Landmark pipeline ready: {}", ready);
        }
        self.ready = ready;
        self.latest.is_ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Process one detector callback.
    ///
    /// Returns the freshly published snapshot, or `None` if the callback
    /// was dropped by the throttle gate.
    pub fn process(&mut self, detections: &[Detection], now_ms: f64) -> Option<&TrackingSnapshot> {
        // ── Step 1: Throttle ──
        if let Some(last) = self.last_processed_ms {
            if now_ms - last < self.config.publish_throttle_ms {
                self.dropped += 1;
                debug!(
                    "Throttled detector callback ({:.1}ms after last)",
                    now_ms - last
                );
                return None;
            }
        }
        self.last_processed_ms = Some(now_ms);

        // ── Step 2: Partition and classify ──
        let mut left = None;
        let mut right = None;
        for detection in detections {
            let Some(landmarks) = HandLandmarks::from_slice(&detection.landmarks) else {
                warn!(
                    "Rejected malformed {} hand ({} landmarks)",
                    detection.label.as_str(),
                    detection.landmarks.len()
                );
                continue;
            };
            let hand = if self.config.flip_handedness {
                detection.label.mirrored()
            } else {
                detection.label
            };
            let signal = self.classifier.classify(hand, landmarks);
            // Two detections with the same label: the later one wins.
            match hand {
                Handedness::Left => left = Some(signal),
                Handedness::Right => right = Some(signal),
            }
        }

        // ── Step 3: Publish ──
        self.latest = TrackingSnapshot {
            left_hand: left,
            right_hand: right,
            is_ready: self.ready,
            timestamp_ms: now_ms,
        };
        self.published += 1;
        Some(&self.latest)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> &TrackingSnapshot {
        &self.latest
    }

    /// Generate s-expression for IPC status.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:ready {} :throttle-ms {:.0} :flip-handedness {} :published {} :dropped {})",
            if self.ready { "t" } else { "nil" },
            self.config.publish_throttle_ms,
            if self.config.flip_handedness { "t" } else { "nil" },
            self.published,
            self.dropped,
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
