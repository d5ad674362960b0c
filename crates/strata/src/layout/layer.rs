use log::trace;

use strata_core::{geometry::Bounds, graph::GraphNode};

use super::LayerCalculator;

/// A vertical band of the layer frame holding the nodes of one layer.
///
/// Layers are derived state: they are recomputed from scratch on every call to
/// [`LayerCalculator::compute_layers`] and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    layer_id: u32,
    node_count: usize,
    left_x: f32,
    right_x: f32,
    mid: f32,
    top_y: f32,
    bot_y: f32,
}

impl Layer {
    /// Returns the layer id shared by the nodes this layer was built from.
    pub fn layer_id(&self) -> u32 {
        self.layer_id
    }

    /// Returns the number of nodes in this layer.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the left boundary of the band.
    pub fn left_x(&self) -> f32 {
        self.left_x
    }

    /// Returns the right boundary of the band.
    pub fn right_x(&self) -> f32 {
        self.right_x
    }

    /// Returns the centerline of the band, taken from the members' bounding
    /// box before the boundaries were adjusted.
    pub fn mid(&self) -> f32 {
        self.mid
    }

    /// Returns the top of the union bounding box over all nodes.
    pub fn top_y(&self) -> f32 {
        self.top_y
    }

    /// Returns the bottom of the union bounding box over all nodes.
    pub fn bot_y(&self) -> f32 {
        self.bot_y
    }

    /// Returns `true` if `x` lies in the half-open range `[left_x, right_x)`.
    pub fn contains_x(&self, x: f32) -> bool {
        self.left_x <= x && x < self.right_x
    }
}

impl LayerCalculator {
    /// Computes the layer bands for `nodes`.
    ///
    /// Nodes are grouped by layer id; a node being dragged contributes its
    /// shadow geometry. Adjacent layers share the boundary halfway between the
    /// right edge of the one and the left edge of the other. The outer edges of
    /// the first and last layer mirror their inner boundary around the layer's
    /// centerline, and a lone layer is padded by a fixed margin instead.
    ///
    /// Returns an empty vector for an empty node slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strata::layout::LayerCalculator;
    /// # use strata_core::geometry::{Point, Size};
    /// # use strata_core::graph::{GraphNode, NodeKey};
    /// let node = GraphNode::new(
    ///     NodeKey::new("file:///a.sctx", "n0"),
    ///     Point::new(40.0, 0.0),
    ///     Size::new(20.0, 20.0),
    /// );
    ///
    /// let layers = LayerCalculator::default().compute_layers(&[node]);
    /// assert_eq!(layers.len(), 1);
    /// assert_eq!(layers[0].left_x(), 30.0);
    /// assert_eq!(layers[0].right_x(), 70.0);
    /// ```
    pub fn compute_layers(&self, nodes: &[GraphNode]) -> Vec<Layer> {
        let mut framed: Vec<(u32, Bounds)> = nodes
            .iter()
            .map(|node| {
                (
                    node.layer_id(),
                    self.direction.to_layer_frame(node.effective_bounds()),
                )
            })
            .collect();
        // Stable: nodes sharing a layer keep their input order
        framed.sort_by_key(|(layer_id, _)| *layer_id);

        let mut groups: Vec<(u32, usize, Bounds)> = Vec::new();
        let mut total: Option<Bounds> = None;
        for (layer_id, bounds) in framed {
            total = Some(total.map_or(bounds, |total| total.merge(&bounds)));
            match groups.last_mut() {
                Some((id, count, group)) if *id == layer_id => {
                    *count += 1;
                    *group = group.merge(&bounds);
                }
                _ => groups.push((layer_id, 1, bounds)),
            }
        }

        let Some(total) = total else {
            return Vec::new();
        };

        let mut layers: Vec<Layer> = groups
            .into_iter()
            .map(|(layer_id, node_count, bounds)| Layer {
                layer_id,
                node_count,
                left_x: bounds.min_x(),
                right_x: bounds.max_x(),
                mid: bounds.center().x(),
                top_y: total.min_y(),
                bot_y: total.max_y(),
            })
            .collect();

        for i in 1..layers.len() {
            let (before, after) = layers.split_at_mut(i);
            let left = &mut before[i - 1];
            let right = &mut after[0];
            let boundary = left.right_x + (right.left_x - left.right_x) / 2.0;
            left.right_x = boundary;
            right.left_x = boundary;
        }

        match layers.as_mut_slice() {
            [] => {}
            [only] => {
                only.left_x -= self.single_layer_margin;
                only.right_x += self.single_layer_margin;
            }
            [first, ..] => first.left_x = first.mid - (first.right_x - first.mid),
        }
        // The last band spans at least the width of the band before it
        if let [.., before, last] = layers.as_mut_slice() {
            let reach = (last.left_x - before.left_x).max(2.0 * (last.mid - last.left_x));
            last.right_x = last.left_x + reach;
        }

        trace!(layers:?; "Computed layers");
        layers
    }
}
