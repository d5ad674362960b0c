use std::cmp::Ordering;

use strata_core::graph::GraphNode;

use super::{Layer, LayerCalculator};

/// Returns the nodes assigned to `layer_id`, in input order.
pub fn nodes_in_layer(nodes: &[GraphNode], layer_id: u32) -> Vec<&GraphNode> {
    nodes
        .iter()
        .filter(|node| node.layer_id() == layer_id)
        .collect()
}

impl LayerCalculator {
    /// Returns the index of the layer `node` falls into, judged by the
    /// horizontal center of its effective bounds.
    ///
    /// See [`LayerCalculator::layer_at`] for the lookup rules.
    pub fn layer_of_node(&self, nodes: &[GraphNode], layers: &[Layer], node: &GraphNode) -> usize {
        let candidate_x = self
            .direction
            .to_layer_frame(node.effective_bounds())
            .center()
            .x();
        self.layer_at(nodes, layers, candidate_x, Some(node.id()))
    }

    /// Returns the index of the first layer whose right boundary lies beyond
    /// `candidate_x`.
    ///
    /// A candidate right of every layer yields `layers.len()`, a new trailing
    /// layer, unless the last layer holds a single node and that node is
    /// `dragged`: moving the sole occupant of the last layer never opens a new
    /// one.
    ///
    /// # Arguments
    ///
    /// * `nodes` - The node set `layers` was computed from
    /// * `layers` - Layers as returned by [`LayerCalculator::compute_layers`]
    /// * `candidate_x` - Horizontal coordinate in the layer frame
    /// * `dragged` - Id of the node currently being dragged, if any
    pub fn layer_at(
        &self,
        nodes: &[GraphNode],
        layers: &[Layer],
        candidate_x: f32,
        dragged: Option<&str>,
    ) -> usize {
        if let Some(index) = layers.iter().position(|layer| layer.right_x() > candidate_x) {
            return index;
        }

        let Some(last) = layers.last() else {
            return 0;
        };
        let mut members = nodes
            .iter()
            .filter(|node| node.layer_id() == last.layer_id());
        if let (Some(only), None) = (members.next(), members.next()) {
            if dragged == Some(only.id()) {
                return layers.len() - 1;
            }
        }
        layers.len()
    }

    /// Returns the ordinal position `target` holds, or would take, among
    /// `layer_nodes` ordered top to bottom.
    ///
    /// A member of `layer_nodes` gets its own rank. Any other node gets the
    /// index of the first member below it, or `layer_nodes.len()` if it sits
    /// below all of them. Members with equal `y` keep their input order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strata::layout::LayerCalculator;
    /// # use strata_core::geometry::{Point, Size};
    /// # use strata_core::graph::{GraphNode, NodeKey};
    /// let node = |id: &str, y: f32| {
    ///     GraphNode::new(NodeKey::new("file:///a.sctx", id), Point::new(0.0, y), Size::new(20.0, 20.0))
    /// };
    /// let (a, b, c) = (node("a", 10.0), node("b", 50.0), node("c", 90.0));
    ///
    /// let calculator = LayerCalculator::default();
    /// assert_eq!(calculator.position_in_layer(&[&c, &a, &b], &b), 1);
    ///
    /// let outsider = node("x", 60.0);
    /// assert_eq!(calculator.position_in_layer(&[&a, &b, &c], &outsider), 2);
    /// ```
    pub fn position_in_layer(&self, layer_nodes: &[&GraphNode], target: &GraphNode) -> usize {
        let frame_y = |node: &GraphNode| {
            self.direction
                .to_layer_frame(node.effective_bounds())
                .min_y()
        };

        let mut sorted = layer_nodes.to_vec();
        sorted.sort_by(|a, b| {
            frame_y(a)
                .partial_cmp(&frame_y(b))
                .unwrap_or(Ordering::Equal)
        });

        if let Some(rank) = sorted.iter().position(|node| node.key() == target.key()) {
            return rank;
        }

        let target_y = frame_y(target);
        sorted
            .iter()
            .position(|node| frame_y(node) > target_y)
            .unwrap_or(sorted.len())
    }
}
