//! Interaction state machines driven by `TrackingSnapshot` ticks.
//!
//! Each controller owns its state and deadlines and is advanced with an
//! injected clock; `session` composes them over a shared gallery.

pub mod dismiss;
pub mod events;
pub mod gallery;
pub mod navigation;
pub mod select;
pub mod session;
pub mod zoom_pan;

pub use dismiss::{DismissConfig, DismissController, DismissState};
pub use events::{InteractionEvent, NavDirection};
pub use gallery::{Gallery, GalleryItem, GridLayout};
pub use navigation::{NavigationConfig, NavigationController};
pub use select::{SelectConfig, SelectController, SelectState};
pub use session::{HandChannels, InteractionSession};
pub use zoom_pan::{ZoomPanConfig, ZoomPanController};
