//! The client-side constraint store.
//!
//! [`ConstraintStore`] mirrors the layer and position constraints of every
//! node, keyed by [`NodeKey`]. It is the single owner of constraint state;
//! the drag controller and the glyph decoration go through it rather than
//! keep copies.
//!
//! Mutations queue a [`ConstraintChange`] that the session forwards to the
//! layout server. Constraints mirrored from an inbound model are not queued,
//! since the server already knows them.

use indexmap::IndexMap;
use log::{debug, info};

use strata_core::{
    constraint::{Constraint, ConstraintTarget},
    graph::{GraphNode, NodeKey},
};

/// A pending change to be reported to the layout server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintChange {
    /// The given halves were set. `None` means that half was not touched.
    Set {
        key: NodeKey,
        layer: Option<u32>,
        position: Option<u32>,
    },
    /// The given halves were removed.
    Cleared {
        key: NodeKey,
        target: ConstraintTarget,
    },
}

impl ConstraintChange {
    pub fn key(&self) -> &NodeKey {
        match self {
            Self::Set { key, .. } | Self::Cleared { key, .. } => key,
        }
    }
}

/// In-memory map from node identity to its pinned layer and position.
#[derive(Debug, Default, Clone)]
pub struct ConstraintStore {
    constraints: IndexMap<NodeKey, Constraint>,
    pending: Vec<ConstraintChange>,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the constraint of `key`, [`Constraint::None`] if absent.
    pub fn get(&self, key: &NodeKey) -> Constraint {
        self.constraints.get(key).copied().unwrap_or_default()
    }

    /// Pins the layer of `key`, keeping any pinned position.
    pub fn set_layer_constraint(&mut self, key: &NodeKey, layer: u32) {
        let constraint = self.get(key).with_layer(layer);
        self.record_set(key, constraint, Some(layer), None);
    }

    /// Pins the position of `key`, keeping any pinned layer.
    pub fn set_position_constraint(&mut self, key: &NodeKey, position: u32) {
        let constraint = self.get(key).with_position(position);
        self.record_set(key, constraint, None, Some(position));
    }

    /// Pins both layer and position of `key`.
    pub fn set_both(&mut self, key: &NodeKey, layer: u32, position: u32) {
        self.record_set(
            key,
            Constraint::Both { layer, position },
            Some(layer),
            Some(position),
        );
    }

    /// Removes all constraints of `key`.
    ///
    /// Returns the removed constraint, or `None` if `key` was unconstrained.
    pub fn clear(&mut self, key: &NodeKey) -> Option<Constraint> {
        let removed = self.constraints.shift_remove(key)?;
        self.record_clear(key, ConstraintTarget::Both);
        Some(removed)
    }

    /// Removes the layer half of the constraint of `key`.
    ///
    /// Returns `true` if a layer constraint was removed.
    pub fn clear_layer(&mut self, key: &NodeKey) -> bool {
        let current = self.get(key);
        if current.layer().is_none() {
            return false;
        }
        self.replace(key, current.without_layer());
        self.record_clear(key, ConstraintTarget::Layer);
        true
    }

    /// Removes the position half of the constraint of `key`.
    ///
    /// Returns `true` if a position constraint was removed.
    pub fn clear_position(&mut self, key: &NodeKey) -> bool {
        let current = self.get(key);
        if current.position().is_none() {
            return false;
        }
        self.replace(key, current.without_position());
        self.record_clear(key, ConstraintTarget::Position);
        true
    }

    /// Mirrors the constraints reported in an inbound model.
    ///
    /// Nodes reporting no constraint are left untouched, and nothing is
    /// queued for the server.
    pub fn sync_from_model(&mut self, nodes: &[GraphNode]) {
        for node in nodes {
            let reported = node.reported_constraint();
            if !reported.is_none() {
                self.constraints.insert(node.key().clone(), reported);
            }
        }
    }

    /// Returns `true` if changes are waiting to be sent to the server.
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drains the pending changes in the order they were made.
    pub fn take_changes(&mut self) -> Vec<ConstraintChange> {
        std::mem::take(&mut self.pending)
    }

    /// Returns the keys of constraints whose node is not part of `nodes`.
    ///
    /// Orphaned constraints are kept; the layout server's model stays
    /// authoritative.
    pub fn orphans<'a>(&'a self, nodes: &[GraphNode]) -> Vec<&'a NodeKey> {
        self.constraints
            .keys()
            .filter(|key| !nodes.iter().any(|node| node.key() == *key))
            .collect()
    }

    /// Iterates over all constrained nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, Constraint)> {
        self.constraints
            .iter()
            .map(|(key, constraint)| (key, *constraint))
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    fn replace(&mut self, key: &NodeKey, constraint: Constraint) {
        if constraint.is_none() {
            self.constraints.shift_remove(key);
        } else {
            self.constraints.insert(key.clone(), constraint);
        }
    }

    fn record_set(
        &mut self,
        key: &NodeKey,
        constraint: Constraint,
        layer: Option<u32>,
        position: Option<u32>,
    ) {
        info!(node:% = key, constraint:% = constraint; "Constraint set");
        self.replace(key, constraint);
        self.pending.push(ConstraintChange::Set {
            key: key.clone(),
            layer,
            position,
        });
    }

    fn record_clear(&mut self, key: &NodeKey, target: ConstraintTarget) {
        debug!(node:% = key, target:%; "Constraint cleared");
        self.pending.push(ConstraintChange::Cleared {
            key: key.clone(),
            target,
        });
    }
}

#[cfg(test)]
mod tests {
    use strata_core::geometry::{Point, Size};

    use super::*;

    fn key(id: &str) -> NodeKey {
        NodeKey::new("file:///test.sctx", id)
    }

    #[test]
    fn test_absent_key_is_unconstrained() {
        let store = ConstraintStore::new();
        assert_eq!(store.get(&key("a")), Constraint::None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_layer_then_position_yields_both() {
        let mut store = ConstraintStore::new();
        store.set_layer_constraint(&key("a"), 2);
        store.set_position_constraint(&key("a"), 1);

        assert_eq!(
            store.get(&key("a")),
            Constraint::Both {
                layer: 2,
                position: 1
            }
        );
        assert_eq!(
            store.take_changes(),
            vec![
                ConstraintChange::Set {
                    key: key("a"),
                    layer: Some(2),
                    position: None
                },
                ConstraintChange::Set {
                    key: key("a"),
                    layer: None,
                    position: Some(1)
                },
            ]
        );
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_setting_one_half_retains_the_other() {
        let mut store = ConstraintStore::new();
        store.set_both(&key("a"), 1, 3);
        store.set_layer_constraint(&key("a"), 4);
        assert_eq!(
            store.get(&key("a")),
            Constraint::Both {
                layer: 4,
                position: 3
            }
        );
    }

    #[test]
    fn test_clear_removes_entry() {
        let mut store = ConstraintStore::new();
        store.set_both(&key("a"), 1, 3);
        store.take_changes();

        assert_eq!(
            store.clear(&key("a")),
            Some(Constraint::Both {
                layer: 1,
                position: 3
            })
        );
        assert!(store.is_empty());
        assert_eq!(
            store.take_changes(),
            vec![ConstraintChange::Cleared {
                key: key("a"),
                target: ConstraintTarget::Both
            }]
        );

        // Clearing an unconstrained node changes nothing.
        assert_eq!(store.clear(&key("a")), None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_clear_one_half() {
        let mut store = ConstraintStore::new();
        store.set_both(&key("a"), 1, 3);

        assert!(store.clear_layer(&key("a")));
        assert_eq!(store.get(&key("a")), Constraint::Position(3));
        assert!(!store.clear_layer(&key("a")));

        assert!(store.clear_position(&key("a")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_sync_from_model_is_not_dirty() {
        let nodes = [
            GraphNode::new(key("a"), Point::default(), Size::new(1.0, 1.0))
                .with_reported_constraint(Constraint::Layer(1)),
            GraphNode::new(key("b"), Point::default(), Size::new(1.0, 1.0)),
        ];
        let mut store = ConstraintStore::new();
        store.set_position_constraint(&key("b"), 0);
        store.take_changes();

        store.sync_from_model(&nodes);

        assert_eq!(store.get(&key("a")), Constraint::Layer(1));
        assert_eq!(store.get(&key("b")), Constraint::Position(0));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_orphans_are_reported_not_pruned() {
        let nodes = [GraphNode::new(
            key("a"),
            Point::default(),
            Size::new(1.0, 1.0),
        )];
        let mut store = ConstraintStore::new();
        store.set_layer_constraint(&key("a"), 0);
        store.set_layer_constraint(&key("gone"), 1);

        assert_eq!(store.orphans(&nodes), vec![&key("gone")]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut store = ConstraintStore::new();
        store.set_layer_constraint(&key("z"), 0);
        store.set_layer_constraint(&key("a"), 1);

        let ids: Vec<&str> = store.iter().map(|(key, _)| key.node_id()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }
}
