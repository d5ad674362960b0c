//! The boundary to the external layout server.
//!
//! Inbound, the server delivers a full [`ModelSnapshot`] whenever it has
//! re-run layout. Outbound, the engine reports constraint changes as
//! [`Notification`]s through a [`LayoutServer`] implementation supplied by the
//! embedding application, which owns the actual transport.

use serde::{Deserialize, Serialize};

use strata_core::{
    constraint::{Constraint, ConstraintTarget},
    geometry::{Point, Size},
    graph::{GraphNode, NodeKey, NodeKind},
};

use crate::{constraints::ConstraintChange, error::StrataError};

/// A laid-out graph as delivered by the layout server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// URI of the document the diagram was synthesized from.
    pub source_uri: String,

    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
}

impl ModelSnapshot {
    pub fn new(source_uri: impl Into<String>) -> Self {
        Self {
            source_uri: source_uri.into(),
            nodes: Vec::new(),
        }
    }

    /// Adds a node to the snapshot.
    pub fn with_node(mut self, node: SnapshotNode) -> Self {
        self.nodes.push(node);
        self
    }
}

/// One node of a [`ModelSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,

    /// Type tag attached by the diagram synthesis, see [`NodeKind::from_type_tag`].
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,

    /// Overrides the snapshot's source URI for nodes synthesized from another document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    #[serde(default)]
    pub layer_id: u32,

    #[serde(default)]
    pub position_id: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_constraint: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_constraint: Option<u32>,
}

impl SnapshotNode {
    /// Creates an unconstrained plain node.
    pub fn new(
        id: impl Into<String>,
        position: Point,
        size: Size,
        layer_id: u32,
        position_id: u32,
    ) -> Self {
        Self {
            id: id.into(),
            type_tag: None,
            source_uri: None,
            x: position.x(),
            y: position.y(),
            width: size.width(),
            height: size.height(),
            layer_id,
            position_id,
            layer_constraint: None,
            position_constraint: None,
        }
    }

    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = Some(tag.into());
        self
    }

    /// Sets the constraints the server reports for this node.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.layer_constraint = constraint.layer();
        self.position_constraint = constraint.position();
        self
    }

    /// Converts the wire record into a [`GraphNode`], resolving its kind.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Snapshot`] for non-finite coordinates or a
    /// negative size.
    pub fn to_graph_node(&self, default_source_uri: &str) -> Result<GraphNode, StrataError> {
        let coordinates = [self.x, self.y, self.width, self.height];
        if coordinates.iter().any(|value| !value.is_finite()) {
            return Err(StrataError::invalid_node(
                &self.id,
                "geometry must be finite",
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(StrataError::invalid_node(
                &self.id,
                format!("negative size {}x{}", self.width, self.height),
            ));
        }

        let source_uri = self.source_uri.as_deref().unwrap_or(default_source_uri);
        Ok(GraphNode::new(
            NodeKey::new(source_uri, self.id.as_str()),
            Point::new(self.x, self.y),
            Size::new(self.width, self.height),
        )
        .with_placement(self.layer_id, self.position_id)
        .with_kind(NodeKind::from_type_tag(self.type_tag.as_deref()))
        .with_reported_constraint(Constraint::from_parts(
            self.layer_constraint,
            self.position_constraint,
        )))
    }
}

/// An outbound message to the layout server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Pin the given halves of a node's placement on the next layout.
    SetConstraint {
        source_uri: String,
        node_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        layer_constraint: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position_constraint: Option<u32>,
    },
    /// Drop a previously pinned constraint.
    DeleteConstraint {
        source_uri: String,
        node_id: String,
        target: ConstraintTarget,
    },
}

impl Notification {
    /// Returns the id of the node this notification refers to.
    pub fn node_id(&self) -> &str {
        match self {
            Self::SetConstraint { node_id, .. } | Self::DeleteConstraint { node_id, .. } => node_id,
        }
    }
}

impl From<ConstraintChange> for Notification {
    fn from(change: ConstraintChange) -> Self {
        match change {
            ConstraintChange::Set {
                key,
                layer,
                position,
            } => Self::SetConstraint {
                source_uri: key.source_uri().to_string(),
                node_id: key.node_id().to_string(),
                layer_constraint: layer,
                position_constraint: position,
            },
            ConstraintChange::Cleared { key, target } => Self::DeleteConstraint {
                source_uri: key.source_uri().to_string(),
                node_id: key.node_id().to_string(),
                target,
            },
        }
    }
}

/// The outbound side of the layout server connection.
pub trait LayoutServer {
    /// Delivers `notification` to the server.
    fn notify(&mut self, notification: Notification);
}

/// A [`LayoutServer`] that keeps every notification it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingServer {
    notifications: Vec<Notification>,
}

impl RecordingServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications received so far.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Removes and returns all notifications received so far.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl LayoutServer for RecordingServer {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

impl<S: LayoutServer + ?Sized> LayoutServer for &mut S {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_node_resolves_kind_and_constraint() {
        let node = SnapshotNode::new(
            "r0",
            Point::new(1.0, 2.0),
            Size::new(3.0, 4.0),
            2,
            1,
        )
        .with_type_tag("region")
        .with_constraint(Constraint::Layer(2))
        .to_graph_node("file:///a.sctx")
        .unwrap();

        assert_eq!(node.kind(), NodeKind::Region);
        assert_eq!(node.reported_constraint(), Constraint::Layer(2));
        assert_eq!(node.layer_id(), 2);
        assert_eq!(node.position_id(), 1);
        assert_eq!(node.key().source_uri(), "file:///a.sctx");
    }

    #[test]
    fn test_snapshot_node_source_uri_override() {
        let mut wire = SnapshotNode::new("n", Point::default(), Size::new(1.0, 1.0), 0, 0);
        wire.source_uri = Some("file:///other.sctx".to_string());

        let node = wire.to_graph_node("file:///a.sctx").unwrap();
        assert_eq!(node.key().source_uri(), "file:///other.sctx");
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let negative = SnapshotNode::new("n", Point::default(), Size::new(-1.0, 1.0), 0, 0);
        assert!(matches!(
            negative.to_graph_node("file:///a.sctx"),
            Err(StrataError::Snapshot(_))
        ));

        let nan = SnapshotNode::new("n", Point::new(f32::NAN, 0.0), Size::new(1.0, 1.0), 0, 0);
        assert!(nan.to_graph_node("file:///a.sctx").is_err());
    }

    #[test]
    fn test_notification_from_change() {
        let key = NodeKey::new("file:///a.sctx", "n1");
        let set = Notification::from(ConstraintChange::Set {
            key: key.clone(),
            layer: Some(2),
            position: None,
        });
        assert_eq!(
            set,
            Notification::SetConstraint {
                source_uri: "file:///a.sctx".to_string(),
                node_id: "n1".to_string(),
                layer_constraint: Some(2),
                position_constraint: None,
            }
        );

        let cleared = Notification::from(ConstraintChange::Cleared {
            key,
            target: ConstraintTarget::Both,
        });
        assert_eq!(cleared.node_id(), "n1");
    }

    #[test]
    fn test_recording_server() {
        let mut server = RecordingServer::new();
        server.notify(Notification::DeleteConstraint {
            source_uri: "file:///a.sctx".to_string(),
            node_id: "n1".to_string(),
            target: ConstraintTarget::Layer,
        });
        assert_eq!(server.notifications().len(), 1);
        assert_eq!(server.take().len(), 1);
        assert!(server.notifications().is_empty());
    }
}
