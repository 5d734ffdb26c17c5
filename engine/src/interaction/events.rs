//! Events emitted by the interaction controllers, with their
//! s-expression wire form.

use crate::geometry::Point;

/// Direction of a discrete navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Previous,
}

impl NavDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

/// Discrete controller outputs, consumed by presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// A gallery item was picked up by a pinch.
    Select { item: u64, position: Point },
    /// A dragged item was released inside the accept region.
    Drop { item: u64, position: Point },
    /// A dragged item was released elsewhere; no-op.
    Cancel { item: u64, position: Point },
    /// The gallery scroll offset changed.
    Scrolled { offset: f32 },
    /// Viewer zoom or pan changed.
    ZoomPanChanged { zoom: f32, pan: Point },
    /// Viewer move-drag started, ended, or crossed the dismiss zone edge.
    DragStateChanged {
        is_dragging: bool,
        in_dismiss_zone: bool,
    },
    /// Viewer follows the hand by this offset while dragging.
    MoveOffsetChanged { offset: Point },
    /// Drag released outside the dismiss zone; offset returns to zero.
    SnapBack,
    /// Viewer should close.
    Dismiss,
    /// Thumb gesture moved the selection.
    Navigate {
        direction: NavDirection,
        index: usize,
        item: u64,
    },
}

impl InteractionEvent {
    /// Short event name, as used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Drop { .. } => "drop",
            Self::Cancel { .. } => "cancel",
            Self::Scrolled { .. } => "scrolled",
            Self::ZoomPanChanged { .. } => "zoom-pan-changed",
            Self::DragStateChanged { .. } => "drag-state-changed",
            Self::MoveOffsetChanged { .. } => "move-offset-changed",
            Self::SnapBack => "snap-back",
            Self::Dismiss => "dismiss",
            Self::Navigate { .. } => "navigate",
        }
    }

    /// Serialize the event as an s-expression.
    pub fn to_sexp(&self) -> String {
        let head = format!("(:type :event :event :{}", self.name());
        let body = match self {
            Self::Select { item, position }
            | Self::Drop { item, position }
            | Self::Cancel { item, position } => {
                format!(
                    " :item {} :x {:.4} :y {:.4}",
                    item, position.x, position.y
                )
            }
            Self::Scrolled { offset } => format!(" :offset {:.4}", offset),
            Self::ZoomPanChanged { zoom, pan } => {
                format!(" :zoom {:.4} :pan-x {:.4} :pan-y {:.4}", zoom, pan.x, pan.y)
            }
            Self::DragStateChanged {
                is_dragging,
                in_dismiss_zone,
            } => format!(
                " :dragging {} :in-dismiss-zone {}",
                if *is_dragging { "t" } else { "nil" },
                if *in_dismiss_zone { "t" } else { "nil" },
            ),
            Self::MoveOffsetChanged { offset } => {
                format!(" :dx {:.4} :dy {:.4}", offset.x, offset.y)
            }
            Self::SnapBack | Self::Dismiss => String::new(),
            Self::Navigate {
                direction,
                index,
                item,
            } => format!(
                " :direction :{} :index {} :item {}",
                direction.as_str(),
                index,
                item
            ),
        };
        format!("{}{})", head, body)
    }
}
