//! Hand tracking: landmark model, per-hand gesture classification and
//! the frame assembler that publishes `{left, right}` snapshots.

pub mod assembler;
pub mod gesture;
pub mod landmarks;

pub use assembler::{AssemblerConfig, Detection, FrameAssembler, TrackingSnapshot};
pub use gesture::{GestureClassifier, GestureConfig, GestureType, HandSignal};
pub use landmarks::{HandJoint, HandLandmarks, Handedness, Landmark, LANDMARK_COUNT};
