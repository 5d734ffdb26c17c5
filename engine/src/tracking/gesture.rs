//! Gesture classification from a single hand's landmarks.
//!
//! Detects pinch (with position and strength), thumbs up, thumbs down and
//! open palm.  Classification is a pure function of the current landmark
//! set: no memory across frames, no smoothing.

use tracing::trace;

use super::landmarks::{HandJoint, HandLandmarks, Handedness};
use crate::geometry::Point;

// ── Gesture types ──────────────────────────────────────────

/// Discrete gestures a hand can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureType {
    /// Thumb and index fingertips close together.
    Pinch,
    /// Thumb extended upward, other fingers curled.
    ThumbsUp,
    /// Thumb extended downward, other fingers curled.
    ThumbsDown,
    /// All fingers extended, thumb splayed.
    OpenPalm,
}

impl GestureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pinch => "pinch",
            Self::ThumbsUp => "thumbs-up",
            Self::ThumbsDown => "thumbs-down",
            Self::OpenPalm => "open-palm",
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Classification thresholds, in normalized landmark units.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Thumb-tip to index-tip distance below which the hand is pinching.
    pub pinch_threshold: f32,
    /// Minimum |thumb CMC.y - thumb tip.y| for thumbs up/down.
    pub thumb_gesture_threshold: f32,
    /// Horizontal thumb-tip to wrist offset that counts as extended.
    pub thumb_extension_x: f32,
    /// Vertical thumb-tip to wrist offset that counts as extended.
    pub thumb_extension_y: f32,
    /// Horizontal thumb-tip to thumb MCP offset required for an open palm.
    pub palm_thumb_spread: f32,
    /// Mirror pinch x for a front-facing camera.
    pub mirror_x: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.08,
            thumb_gesture_threshold: 0.06,
            thumb_extension_x: 0.05,
            thumb_extension_y: 0.1,
            palm_thumb_spread: 0.05,
            mirror_x: true,
        }
    }
}

// ── Signal ─────────────────────────────────────────────────

/// Per-hand, per-frame gesture signals.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSignal {
    pub handedness: Handedness,
    pub is_pinching: bool,
    /// Midpoint of thumb tip and index tip, mirrored to display space.
    pub pinch_position: Point,
    /// 0 at the pinch threshold, 1 when the tips touch.
    pub pinch_strength: f32,
    pub is_thumbs_up: bool,
    pub is_thumbs_down: bool,
    pub is_open_palm: bool,
    /// Raw landmarks, kept for downstream geometry.
    pub landmarks: HandLandmarks,
}

impl HandSignal {
    /// The single gesture this hand shows, with pinch taking priority.
    pub fn dominant_gesture(&self) -> Option<GestureType> {
        if self.is_pinching {
            Some(GestureType::Pinch)
        } else if self.is_thumbs_up {
            Some(GestureType::ThumbsUp)
        } else if self.is_thumbs_down {
            Some(GestureType::ThumbsDown)
        } else if self.is_open_palm {
            Some(GestureType::OpenPalm)
        } else {
            None
        }
    }

    /// Render as an s-expression plist.
    pub fn to_sexp(&self) -> String {
        format!(
            "(:hand :{} :gesture {} :pinching {} :pinch-x {:.4} :pinch-y {:.4} :pinch-strength {:.3} :thumbs-up {} :thumbs-down {} :open-palm {})",
            self.handedness.as_str(),
            self.dominant_gesture()
                .map(|g| format!(":{}", g.as_str()))
                .unwrap_or_else(|| "nil".to_string()),
            sexp_bool(self.is_pinching),
            self.pinch_position.x,
            self.pinch_position.y,
            self.pinch_strength,
            sexp_bool(self.is_thumbs_up),
            sexp_bool(self.is_thumbs_down),
            sexp_bool(self.is_open_palm),
        )
    }
}

fn sexp_bool(b: bool) -> &'static str {
    if b {
        "t"
    } else {
        "nil"
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Stateless gesture classifier.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    pub config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    /// Classify one hand.
    pub fn classify(&self, handedness: Handedness, landmarks: HandLandmarks) -> HandSignal {
        let (is_pinching, pinch_position, pinch_strength) = self.detect_pinch(&landmarks);
        let (is_thumbs_up, is_thumbs_down) = self.detect_thumb(&landmarks);
        let is_open_palm = self.detect_open_palm(&landmarks);

        trace!(
            hand = handedness.as_str(),
            is_pinching,
            pinch_strength,
            is_thumbs_up,
            is_thumbs_down,
            is_open_palm,
            "classified hand"
        );

        HandSignal {
            handedness,
            is_pinching,
            pinch_position,
            pinch_strength,
            is_thumbs_up,
            is_thumbs_down,
            is_open_palm,
            landmarks,
        }
    }

    /// Pinch state, mirrored midpoint and strength.
    pub fn detect_pinch(&self, hand: &HandLandmarks) -> (bool, Point, f32) {
        let thumb = hand.get(HandJoint::ThumbTip);
        let index = hand.get(HandJoint::IndexTip);
        let distance = hand.joint_distance(HandJoint::ThumbTip, HandJoint::IndexTip);
        let threshold = self.config.pinch_threshold;

        let (is_pinching, strength) = if threshold > 0.0 {
            (
                distance < threshold,
                (1.0 - distance / threshold).clamp(0.0, 1.0),
            )
        } else {
            (false, 0.0)
        };

        let mid = Point::midpoint(Point::new(thumb.x, thumb.y), Point::new(index.x, index.y));
        let position = if self.config.mirror_x {
            Point::new(1.0 - mid.x, mid.y)
        } else {
            mid
        };

        (is_pinching, position, strength)
    }

    /// Thumbs up / thumbs down.  Mutually exclusive by construction.
    pub fn detect_thumb(&self, hand: &HandLandmarks) -> (bool, bool) {
        if !fingers_curled(hand) || !self.thumb_extended(hand) {
            return (false, false);
        }
        // Positive when the tip sits above its base (image y grows down).
        let vertical = hand.get(HandJoint::ThumbCmc).y - hand.get(HandJoint::ThumbTip).y;
        let threshold = self.config.thumb_gesture_threshold;
        (vertical > threshold, vertical < -threshold)
    }

    /// All four fingers extended and the thumb splayed outward.
    pub fn detect_open_palm(&self, hand: &HandLandmarks) -> bool {
        let extended = HandJoint::finger_tip_pip_pairs()
            .iter()
            .all(|(tip, pip)| hand.get(*tip).y < hand.get(*pip).y);
        let spread =
            (hand.get(HandJoint::ThumbTip).x - hand.get(HandJoint::ThumbMcp).x).abs();
        extended && spread > self.config.palm_thumb_spread
    }

    fn thumb_extended(&self, hand: &HandLandmarks) -> bool {
        let tip = hand.get(HandJoint::ThumbTip);
        let wrist = hand.get(HandJoint::Wrist);
        (tip.x - wrist.x).abs() > self.config.thumb_extension_x
            || (tip.y - wrist.y).abs() > self.config.thumb_extension_y
    }
}

/// Every non-thumb tip is below its PIP joint in image space.
fn fingers_curled(hand: &HandLandmarks) -> bool {
    HandJoint::finger_tip_pip_pairs()
        .iter()
        .all(|(tip, pip)| hand.get(*tip).y > hand.get(*pip).y)
}

// ── Test helpers ───────────────────────────────────────────

/// Hand poses and signals shared by tests across the crate.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::tracking::landmarks::{Landmark, LANDMARK_COUNT};

    /// A loose fist: fingers curled, thumb folded against the palm.
    /// Shows no gesture.
    pub fn fist() -> [Landmark; LANDMARK_COUNT] {
        let mut p = [Landmark::default(); LANDMARK_COUNT];
        p[HandJoint::Wrist.index()] = Landmark::new(0.5, 0.8, 0.0);
        p[HandJoint::ThumbCmc.index()] = Landmark::new(0.47, 0.75, 0.0);
        p[HandJoint::ThumbMcp.index()] = Landmark::new(0.46, 0.72, 0.0);
        p[HandJoint::ThumbIp.index()] = Landmark::new(0.47, 0.72, 0.0);
        p[HandJoint::ThumbTip.index()] = Landmark::new(0.48, 0.76, 0.0);
        for (finger, x) in [(5usize, 0.45f32), (9, 0.5), (13, 0.55), (17, 0.6)] {
            p[finger] = Landmark::new(x, 0.6, 0.0); // MCP
            p[finger + 1] = Landmark::new(x, 0.5, 0.0); // PIP
            p[finger + 2] = Landmark::new(x, 0.52, 0.0); // DIP
            p[finger + 3] = Landmark::new(x, 0.55, 0.0); // tip, below PIP
        }
        p
    }

    /// Fist with the thumb pulled out sideways and raised by `vertical`
    /// above its CMC joint (negative lowers it).
    pub fn thumb_pose(vertical: f32) -> [Landmark; LANDMARK_COUNT] {
        let mut p = fist();
        p[HandJoint::ThumbCmc.index()] = Landmark::new(0.42, 0.7, 0.0);
        p[HandJoint::ThumbTip.index()] = Landmark::new(0.35, 0.7 - vertical, 0.0);
        p
    }

    /// All fingers straight up, thumb splayed.
    pub fn open_palm() -> [Landmark; LANDMARK_COUNT] {
        let mut p = fist();
        for tip in [8usize, 12, 16, 20] {
            p[tip].y = 0.3;
            p[tip - 1].y = 0.4;
        }
        p[HandJoint::ThumbTip.index()] = Landmark::new(0.35, 0.65, 0.0);
        p
    }

    /// Thumb and index tips touching at image-space (x, y).
    pub fn pinch_at(x: f32, y: f32) -> [Landmark; LANDMARK_COUNT] {
        let mut p = fist();
        p[HandJoint::ThumbTip.index()] = Landmark::new(x, y, 0.0);
        p[HandJoint::IndexTip.index()] = Landmark::new(x, y, 0.0);
        p
    }

    pub fn hand(points: &[Landmark; LANDMARK_COUNT]) -> HandLandmarks {
        HandLandmarks::from_slice(points).expect("test pose is valid")
    }

    /// A signal with only the pinch fields set, at display position (x, y).
    pub fn pinch_signal(handedness: Handedness, pinching: bool, x: f32, y: f32) -> HandSignal {
        HandSignal {
            handedness,
            is_pinching: pinching,
            pinch_position: Point::new(x, y),
            pinch_strength: if pinching { 1.0 } else { 0.0 },
            is_thumbs_up: false,
            is_thumbs_down: false,
            is_open_palm: false,
            landmarks: hand(&fist()),
        }
    }

    /// A non-pinching signal showing thumbs up or down.
    pub fn thumb_signal(handedness: Handedness, up: bool, down: bool) -> HandSignal {
        HandSignal {
            is_thumbs_up: up,
            is_thumbs_down: down,
            ..pinch_signal(handedness, false, 0.5, 0.5)
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
