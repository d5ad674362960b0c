//! Graph node model as delivered by the layout server.
//!
//! A [`GraphNode`] is the client-side record of one laid-out node: where the
//! server put it, which layer and position it was assigned, which constraints
//! the server reports for it, and, while the user drags it, its shadow
//! geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constraint::Constraint,
    geometry::{Bounds, Point, Size},
};

/// Identity of a node across model updates: the originating document plus the
/// node id, which is unique within one diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    source_uri: String,
    node_id: String,
}

impl NodeKey {
    pub fn new(source_uri: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            source_uri: source_uri.into(),
            node_id: node_id.into(),
        }
    }

    /// Returns the URI of the document the node was synthesized from.
    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// Returns the node id.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.source_uri, self.node_id)
    }
}

/// The kind of a node, resolved once when the node is ingested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// An ordinary node taking part in layered placement
    #[default]
    Plain,
    /// A region (a container partitioning its parent)
    Region,
    /// An input/output port node attached to a region boundary
    IoPort,
}

impl NodeKind {
    /// Resolves the type tag attached to a node by the diagram synthesis.
    ///
    /// Unknown or missing tags map to [`NodeKind::Plain`].
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_core::graph::NodeKind;
    ///
    /// assert_eq!(NodeKind::from_type_tag(Some("region")), NodeKind::Region);
    /// assert_eq!(NodeKind::from_type_tag(Some("io-port")), NodeKind::IoPort);
    /// assert_eq!(NodeKind::from_type_tag(Some("state")), NodeKind::Plain);
    /// assert_eq!(NodeKind::from_type_tag(None), NodeKind::Plain);
    /// ```
    pub fn from_type_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return Self::Plain;
        };
        match tag.trim().to_ascii_lowercase().as_str() {
            "region" => Self::Region,
            "io-port" | "ioport" | "io_port" => Self::IoPort,
            _ => Self::Plain,
        }
    }

    /// Returns `true` if nodes of this kind can be dragged to a new layer or position.
    pub fn is_moveable(self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// A laid-out node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    key: NodeKey,
    kind: NodeKind,
    position: Point,
    size: Size,
    layer_id: u32,
    position_id: u32,
    reported_constraint: Constraint,
    shadow: Option<Point>,
}

impl GraphNode {
    /// Creates a node placed at `position` (top-left corner) with the given size.
    pub fn new(key: NodeKey, position: Point, size: Size) -> Self {
        Self {
            key,
            kind: NodeKind::Plain,
            position,
            size,
            layer_id: 0,
            position_id: 0,
            reported_constraint: Constraint::None,
            shadow: None,
        }
    }

    /// Sets the layer and position assigned by the last layout.
    pub fn with_placement(mut self, layer_id: u32, position_id: u32) -> Self {
        self.layer_id = layer_id;
        self.position_id = position_id;
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the constraint the layout server reports for this node.
    pub fn with_reported_constraint(mut self, constraint: Constraint) -> Self {
        self.reported_constraint = constraint;
        self
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn id(&self) -> &str {
        self.key.node_id()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the server-assigned top-left position.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the layer index assigned by the last layout.
    pub fn layer_id(&self) -> u32 {
        self.layer_id
    }

    /// Returns the ordinal position within the layer assigned by the last layout.
    pub fn position_id(&self) -> u32 {
        self.position_id
    }

    /// Returns the constraint reported by the layout server.
    pub fn reported_constraint(&self) -> Constraint {
        self.reported_constraint
    }

    /// Returns the pinned layer reported by the layout server, if any.
    pub fn layer_constraint(&self) -> Option<u32> {
        self.reported_constraint.layer()
    }

    /// Returns the pinned position reported by the layout server, if any.
    pub fn position_constraint(&self) -> Option<u32> {
        self.reported_constraint.position()
    }

    /// Returns `true` while the node is being dragged.
    pub fn is_shadow(&self) -> bool {
        self.shadow.is_some()
    }

    /// Returns the shadow (drag preview) origin, if the node is being dragged.
    pub fn shadow(&self) -> Option<Point> {
        self.shadow
    }

    pub fn set_shadow(&mut self, shadow: Option<Point>) {
        self.shadow = shadow;
    }

    /// Returns the top-left corner used for layer and position computation:
    /// the shadow origin while dragging, the server position otherwise.
    pub fn effective_position(&self) -> Point {
        self.shadow.unwrap_or(self.position)
    }

    /// Returns the bounds used for layer and position computation.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_core::geometry::{Point, Size};
    /// use strata_core::graph::{GraphNode, NodeKey};
    ///
    /// let mut node = GraphNode::new(
    ///     NodeKey::new("file:///a.sctx", "n0"),
    ///     Point::new(10.0, 20.0),
    ///     Size::new(30.0, 40.0),
    /// );
    /// assert_eq!(node.effective_bounds().min_x(), 10.0);
    ///
    /// node.set_shadow(Some(Point::new(100.0, 20.0)));
    /// assert_eq!(node.effective_bounds().min_x(), 100.0);
    /// assert_eq!(node.effective_bounds().max_x(), 130.0);
    /// ```
    pub fn effective_bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.effective_position(), self.size)
    }

    /// Returns the bounds as last laid out by the server.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (layer {}, position {})",
            self.key, self.layer_id, self.position_id
        )
    }
}
