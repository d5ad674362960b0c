//! The client-side mirror of the laid-out graph.

use std::collections::HashSet;

use log::{debug, warn};

use strata_core::{
    geometry::{Bounds, Point},
    graph::GraphNode,
};

use crate::{error::StrataError, server::ModelSnapshot};

/// The current node set of one diagram.
///
/// At most one node carries shadow geometry at any time; [`Diagram::begin_shadow`]
/// clears any other shadow before setting the new one.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    source_uri: String,
    nodes: Vec<GraphNode>,
}

impl Diagram {
    /// Creates an empty diagram for the document at `source_uri`.
    pub fn new(source_uri: impl Into<String>) -> Self {
        Self {
            source_uri: source_uri.into(),
            nodes: Vec::new(),
        }
    }

    /// Creates a diagram from already ingested nodes.
    ///
    /// Shadow geometry on the given nodes is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Snapshot`] if two nodes share an id, or if the
    /// layer ids in use do not run from 0 without gaps.
    pub fn from_nodes(
        source_uri: impl Into<String>,
        nodes: impl IntoIterator<Item = GraphNode>,
    ) -> Result<Self, StrataError> {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for mut node in nodes {
            if !seen.insert(node.id().to_string()) {
                return Err(StrataError::invalid_node(node.id(), "duplicate node id"));
            }
            node.set_shadow(None);
            collected.push(node);
        }
        check_layer_ids(&collected)?;

        Ok(Self {
            source_uri: source_uri.into(),
            nodes: collected,
        })
    }

    /// Ingests a snapshot delivered by the layout server.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Snapshot`] if a node has invalid geometry, its
    /// id is not unique or its layer id skips a layer.
    pub fn from_snapshot(snapshot: &ModelSnapshot) -> Result<Self, StrataError> {
        let nodes = snapshot
            .nodes
            .iter()
            .map(|node| node.to_graph_node(&snapshot.source_uri))
            .collect::<Result<Vec<_>, _>>()?;
        let diagram = Self::from_nodes(snapshot.source_uri.as_str(), nodes)?;
        debug!(
            source_uri = diagram.source_uri(),
            nodes = diagram.len();
            "Ingested model snapshot"
        );
        Ok(diagram)
    }

    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Returns the node currently carrying shadow geometry, if any.
    pub fn shadow_node(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.is_shadow())
    }

    /// Marks node `id` as dragged with its shadow at `origin`, clearing any
    /// other shadow.
    ///
    /// Returns `false` if there is no such node.
    pub fn begin_shadow(&mut self, id: &str, origin: Point) -> bool {
        if !self.contains(id) {
            return false;
        }
        for node in &mut self.nodes {
            if node.id() == id {
                node.set_shadow(Some(origin));
            } else if node.is_shadow() {
                warn!(node_id = node.id(); "Discarding stale shadow");
                node.set_shadow(None);
            }
        }
        true
    }

    /// Moves the shadow of node `id` to `origin`.
    ///
    /// Returns `false` if node `id` is not the current shadow node.
    pub fn move_shadow(&mut self, id: &str, origin: Point) -> bool {
        match self
            .nodes
            .iter_mut()
            .find(|node| node.id() == id && node.is_shadow())
        {
            Some(node) => {
                node.set_shadow(Some(origin));
                true
            }
            None => false,
        }
    }

    /// Removes shadow geometry from every node.
    pub fn clear_shadow(&mut self) {
        for node in &mut self.nodes {
            node.set_shadow(None);
        }
    }

    /// Returns the union of the effective bounds of all nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(GraphNode::effective_bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

/// Layer ids index the computed layers, so they must form `0..n`.
fn check_layer_ids(nodes: &[GraphNode]) -> Result<(), StrataError> {
    let mut ids: Vec<u32> = nodes.iter().map(GraphNode::layer_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let gap = ids
        .iter()
        .zip(0u32..)
        .find(|(id, expected)| **id != *expected);
    match gap {
        Some((&id, expected)) => {
            let node = nodes
                .iter()
                .find(|node| node.layer_id() == id)
                .map_or("?", GraphNode::id);
            Err(StrataError::invalid_node(
                node,
                format!("layer id {id} skips layer {expected}"),
            ))
        }
        None => Ok(()),
    }
}
