//! Hand landmark data structures.
//!
//! Models the 21 anatomical points per hand reported by the external
//! landmark detector, in normalized image coordinates (x, y in [0, 1],
//! y growing downward, z relative depth).

use tracing::debug;

// ── Joint definitions ──────────────────────────────────────

/// The 21 hand landmarks, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

const ALL_JOINTS: [HandJoint; LANDMARK_COUNT] = [
    HandJoint::Wrist,
    HandJoint::ThumbCmc,
    HandJoint::ThumbMcp,
    HandJoint::ThumbIp,
    HandJoint::ThumbTip,
    HandJoint::IndexMcp,
    HandJoint::IndexPip,
    HandJoint::IndexDip,
    HandJoint::IndexTip,
    HandJoint::MiddleMcp,
    HandJoint::MiddlePip,
    HandJoint::MiddleDip,
    HandJoint::MiddleTip,
    HandJoint::RingMcp,
    HandJoint::RingPip,
    HandJoint::RingDip,
    HandJoint::RingTip,
    HandJoint::PinkyMcp,
    HandJoint::PinkyPip,
    HandJoint::PinkyDip,
    HandJoint::PinkyTip,
];

impl HandJoint {
    /// Array index (0-20) of this joint.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// Parse a joint from its name, e.g. `"thumb-tip"`.
    pub fn from_str(s: &str) -> Option<Self> {
        ALL_JOINTS.iter().copied().find(|joint| joint.as_str() == s)
    }

    /// (tip, pip) pairs for the four non-thumb fingers.
    pub fn finger_tip_pip_pairs() -> [(HandJoint, HandJoint); 4] {
        [
            (Self::IndexTip, Self::IndexPip),
            (Self::MiddleTip, Self::MiddlePip),
            (Self::RingTip, Self::RingPip),
            (Self::PinkyTip, Self::PinkyPip),
        ]
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Which physical hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a detector label. Accepts `"Left"`/`"Right"` in any case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// The opposite hand (front-facing camera label correction).
    pub fn mirrored(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ── Landmarks ──────────────────────────────────────────────

/// One tracked point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean distance in (x, y, z).
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A complete, validated set of 21 landmarks for one hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Build from detector output.
    ///
    /// Returns `None` if the slice does not hold exactly 21 points or any
    /// coordinate is non-finite, so NaNs never reach the controllers.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            debug!(
                "Hand landmarks: expected {} points, got {}",
                LANDMARK_COUNT,
                points.len()
            );
            return None;
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            debug!("Hand landmarks: non-finite coordinate at {}", ALL_JOINTS[i].as_str());
            return None;
        }
        let mut out = [Landmark::default(); LANDMARK_COUNT];
        out.copy_from_slice(points);
        Some(Self { points: out })
    }

    pub fn get(&self, joint: HandJoint) -> Landmark {
        self.points[joint.index()]
    }

    /// Distance between two joints of this hand.
    pub fn joint_distance(&self, a: HandJoint, b: HandJoint) -> f32 {
        self.get(a).distance(&self.get(b))
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_indices() {
        assert_eq!(HandJoint::Wrist.index(), 0);
        assert_eq!(HandJoint::ThumbTip.index(), 4);
        assert_eq!(HandJoint::IndexTip.index(), 8);
        assert_eq!(HandJoint::MiddlePip.index(), 10);
        assert_eq!(HandJoint::PinkyTip.index(), 20);
    }

    #[test]
    fn test_joint_names_round_trip_every_joint() {
        for joint in ALL_JOINTS {
            assert_eq!(HandJoint::from_str(joint.as_str()), Some(joint));
        }
        assert_eq!(HandJoint::from_str("palm"), None);
    }

    #[test]
    fn test_handedness_parse_and_mirror() {
        assert_eq!(Handedness::parse("Left"), Some(Handedness::Left));
        assert_eq!(Handedness::parse("right"), Some(Handedness::Right));
        assert_eq!(Handedness::parse("both"), None);
        assert_eq!(Handedness::Left.mirrored(), Handedness::Right);
        assert_eq!(Handedness::Right.as_str(), "right");
    }

    #[test]
    fn test_from_slice_wrong_count() {
        let points = vec![Landmark::default(); 20];
        assert!(HandLandmarks::from_slice(&points).is_none());
    }

    #[test]
    fn test_from_slice_rejects_nan() {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        points[HandJoint::IndexTip.index()].y = f32::NAN;
        assert!(HandLandmarks::from_slice(&points).is_none());
    }

    #[test]
    fn test_joint_distance() {
        let mut points = vec![Landmark::default(); LANDMARK_COUNT];
        points[HandJoint::ThumbTip.index()] = Landmark::new(0.0, 0.0, 0.0);
        points[HandJoint::IndexTip.index()] = Landmark::new(0.3, 0.4, 0.0);
        let hand = HandLandmarks::from_slice(&points).unwrap();
        let d = hand.joint_distance(HandJoint::ThumbTip, HandJoint::IndexTip);
        assert!((d - 0.5).abs() < 1e-6, "Expected 0.5, got {}", d);
    }
}
