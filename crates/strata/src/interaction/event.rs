use std::fmt;

use strata_core::{constraint::Constraint, geometry::Point, graph::NodeKey};

use crate::layout::Layer;

/// A pointer event in diagram coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    position: Point,
    target: Option<String>,
}

impl PointerEvent {
    /// Creates an event at `position` with nothing under the pointer.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            target: None,
        }
    }

    /// Creates an event at `position` over node `node_id`.
    pub fn on_node(node_id: impl Into<String>, position: Point) -> Self {
        Self {
            position,
            target: Some(node_id.into()),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the id of the node under the pointer, as reported by hit-testing.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

/// The advisory drop location of the node being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCandidate {
    node_id: String,
    layer: usize,
    position: usize,
    layers: Vec<Layer>,
}

impl DragCandidate {
    pub(crate) fn new(
        node_id: impl Into<String>,
        layer: usize,
        position: usize,
        layers: Vec<Layer>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            layer,
            position,
            layers,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Returns the layer index the node would be dropped into.
    ///
    /// Equal to `layers().len()` when the drop would open a new trailing layer.
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Returns the position the node would take inside [`DragCandidate::layer`].
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the layers computed for this candidate, for previews.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns `true` if dropping here would open a new trailing layer.
    pub fn opens_new_layer(&self) -> bool {
        self.layer == self.layers.len()
    }
}

/// A constraint written when a drag was released.
///
/// Only the halves that differ from the node's last layout are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintUpdate {
    key: NodeKey,
    layer: Option<u32>,
    position: Option<u32>,
}

impl ConstraintUpdate {
    pub(crate) fn new(key: NodeKey, layer: Option<u32>, position: Option<u32>) -> Self {
        Self {
            key,
            layer,
            position,
        }
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn layer(&self) -> Option<u32> {
        self.layer
    }

    pub fn position(&self) -> Option<u32> {
        self.position
    }

    /// Returns the written halves as a [`Constraint`].
    pub fn constraint(&self) -> Constraint {
        Constraint::from_parts(self.layer, self.position)
    }
}

/// Why a drag ended without a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The pointer left the interactive surface.
    LeftSurface,
    /// An explicit cancel signal, such as the escape key.
    CancelSignal,
    /// The dragged node disappeared in a model update.
    NodeRemoved,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftSurface => write!(f, "pointer left surface"),
            Self::CancelSignal => write!(f, "cancel signal"),
            Self::NodeRemoved => write!(f, "node removed"),
        }
    }
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    IdleWithoutDrag,
    DragInProgress,
    NoTarget,
    UnknownNode,
    NotMoveable,
    ThresholdNotReached,
}

/// The outcome of one drag event.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    /// A moveable node was pressed.
    Armed { node_id: String },
    /// The pointer moved far enough to start dragging.
    Started(DragCandidate),
    /// The drop candidate was recomputed.
    Updated(DragCandidate),
    /// The drag was released at a new layer or position.
    Committed(ConstraintUpdate),
    /// The drag was released where the node already was.
    Unchanged,
    /// The press was released without movement.
    Click { node_id: String },
    Cancelled(CancelReason),
    /// An internal invariant was violated; the drag was reset.
    Aborted,
    Noop(NoopReason),
}

impl DragEffect {
    /// Returns the candidate carried by a start or update effect.
    pub fn candidate(&self) -> Option<&DragCandidate> {
        match self {
            Self::Started(candidate) | Self::Updated(candidate) => Some(candidate),
            _ => None,
        }
    }

    /// Returns the constraint written by a commit.
    pub fn constraint_update(&self) -> Option<&ConstraintUpdate> {
        match self {
            Self::Committed(update) => Some(update),
            _ => None,
        }
    }
}
