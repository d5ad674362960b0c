use std::mem;

use log::{debug, info, warn};

use strata_core::geometry::Point;

use super::{
    CancelReason, ConstraintUpdate, DragCandidate, DragEffect, DragHandler, InteractionContext,
    NoopReason, PointerEvent,
};
use crate::layout::{LayerCalculator, nodes_in_layer};

/// Lifecycle of a single node drag.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// A moveable node was pressed but the pointer has not moved yet.
    Armed {
        node_id: String,
        pointer_origin: Point,
        node_origin: Point,
    },
    Dragging {
        node_id: String,
        pointer_origin: Point,
        node_origin: Point,
        pointer: Point,
        candidate: DragCandidate,
    },
}

impl DragState {
    /// Returns the id of the node being pressed or dragged.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Armed { node_id, .. } | Self::Dragging { node_id, .. } => Some(node_id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// The [`DragHandler`] that turns drags into layer and position constraints.
///
/// While dragging, the node's shadow follows the pointer and the drop
/// candidate is recomputed on every move. Releasing the node writes a
/// constraint for whichever of layer and position differ from the node's
/// last layout.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns the current drop candidate while dragging.
    pub fn candidate(&self) -> Option<&DragCandidate> {
        match &self.state {
            DragState::Dragging { candidate, .. } => Some(candidate),
            DragState::Idle | DragState::Armed { .. } => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Re-establishes the drag after the diagram was replaced by a new model.
    ///
    /// The shadow is restored on the node with the same id. If that node no
    /// longer exists the drag is cancelled. Returns `None` when idle.
    pub fn on_model_replaced(&mut self, ctx: &mut InteractionContext<'_>) -> Option<DragEffect> {
        let node_id = self.state.node_id()?.to_string();
        if !ctx.diagram.contains(&node_id) {
            info!(node_id; "Dragged node removed by model update, cancelling drag");
            return Some(self.on_drag_cancel(ctx, CancelReason::NodeRemoved));
        }

        match mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Armed {
                node_id,
                pointer_origin,
                node_origin,
            } => {
                ctx.diagram.begin_shadow(&node_id, node_origin);
                self.state = DragState::Armed {
                    node_id,
                    pointer_origin,
                    node_origin,
                };
                None
            }
            DragState::Dragging {
                node_id,
                pointer_origin,
                node_origin,
                pointer,
                ..
            } => {
                ctx.diagram.begin_shadow(&node_id, node_origin);
                let Some(candidate) = track(ctx, &node_id, pointer_origin, node_origin, pointer)
                else {
                    return Some(abort(ctx));
                };
                self.state = DragState::Dragging {
                    node_id,
                    pointer_origin,
                    node_origin,
                    pointer,
                    candidate: candidate.clone(),
                };
                Some(DragEffect::Updated(candidate))
            }
        }
    }
}

impl DragHandler for DragController {
    fn on_drag_start(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        event: &PointerEvent,
    ) -> DragEffect {
        if !self.state.is_idle() {
            return DragEffect::Noop(NoopReason::DragInProgress);
        }
        let Some(node_id) = event.target() else {
            return DragEffect::Noop(NoopReason::NoTarget);
        };
        let Some(node) = ctx.diagram.node(node_id) else {
            debug!(node_id; "Pointer down on unknown node");
            return DragEffect::Noop(NoopReason::UnknownNode);
        };
        if !node.kind().is_moveable() {
            debug!(node_id, kind:? = node.kind(); "Pointer down on fixed node");
            return DragEffect::Noop(NoopReason::NotMoveable);
        }

        let node_origin = node.position();
        ctx.diagram.begin_shadow(node_id, node_origin);
        self.state = DragState::Armed {
            node_id: node_id.to_string(),
            pointer_origin: event.position(),
            node_origin,
        };
        debug!(node_id; "Drag armed");
        DragEffect::Armed {
            node_id: node_id.to_string(),
        }
    }

    fn on_drag_move(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        event: &PointerEvent,
    ) -> DragEffect {
        let (node_id, pointer_origin, node_origin, was_dragging) = match &self.state {
            DragState::Idle => return DragEffect::Noop(NoopReason::IdleWithoutDrag),
            DragState::Armed {
                node_id,
                pointer_origin,
                node_origin,
            } => (node_id.clone(), *pointer_origin, *node_origin, false),
            DragState::Dragging {
                node_id,
                pointer_origin,
                node_origin,
                ..
            } => (node_id.clone(), *pointer_origin, *node_origin, true),
        };

        let pointer = event.position();
        if !was_dragging && pointer.sub_point(pointer_origin).hypot() <= ctx.config.drag_threshold()
        {
            return DragEffect::Noop(NoopReason::ThresholdNotReached);
        }

        let Some(candidate) = track(ctx, &node_id, pointer_origin, node_origin, pointer) else {
            return self.reset_aborted(ctx);
        };
        if !was_dragging {
            debug!(node_id; "Drag started");
        }
        self.state = DragState::Dragging {
            node_id,
            pointer_origin,
            node_origin,
            pointer,
            candidate: candidate.clone(),
        };

        if was_dragging {
            DragEffect::Updated(candidate)
        } else {
            DragEffect::Started(candidate)
        }
    }

    fn on_drag_end(&mut self, ctx: &mut InteractionContext<'_>, event: &PointerEvent) -> DragEffect {
        let (node_id, pointer_origin, node_origin) = match mem::take(&mut self.state) {
            DragState::Idle => return DragEffect::Noop(NoopReason::IdleWithoutDrag),
            DragState::Armed { node_id, .. } => {
                ctx.diagram.clear_shadow();
                debug!(node_id; "Released without dragging");
                return DragEffect::Click { node_id };
            }
            DragState::Dragging {
                node_id,
                pointer_origin,
                node_origin,
                ..
            } => (node_id, pointer_origin, node_origin),
        };

        let candidate = track(ctx, &node_id, pointer_origin, node_origin, event.position());
        ctx.diagram.clear_shadow();
        let Some(candidate) = candidate else {
            return abort(ctx);
        };
        let Some(node) = ctx.diagram.node(&node_id) else {
            return abort(ctx);
        };

        let key = node.key().clone();
        let layer = u32::try_from(candidate.layer()).unwrap_or(u32::MAX);
        let position = u32::try_from(candidate.position()).unwrap_or(u32::MAX);
        let layer_changed = layer != node.layer_id();
        let position_changed = position != node.position_id();

        let update = match (layer_changed, position_changed) {
            (false, false) => {
                debug!(node_id; "Dropped at original placement");
                return DragEffect::Unchanged;
            }
            (true, false) => {
                ctx.store.set_layer_constraint(&key, layer);
                ConstraintUpdate::new(key, Some(layer), None)
            }
            (false, true) => {
                ctx.store.set_position_constraint(&key, position);
                ConstraintUpdate::new(key, None, Some(position))
            }
            (true, true) => {
                ctx.store.set_both(&key, layer, position);
                ConstraintUpdate::new(key, Some(layer), Some(position))
            }
        };

        info!(
            node_id,
            constraint:% = update.constraint();
            "Drag committed"
        );
        DragEffect::Committed(update)
    }

    fn on_drag_cancel(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        reason: CancelReason,
    ) -> DragEffect {
        let Some(node_id) = mem::take(&mut self.state).node_id().map(str::to_string) else {
            return DragEffect::Noop(NoopReason::IdleWithoutDrag);
        };
        ctx.diagram.clear_shadow();
        debug!(node_id, reason:%; "Drag cancelled");
        DragEffect::Cancelled(reason)
    }
}

impl DragController {
    fn reset_aborted(&mut self, ctx: &mut InteractionContext<'_>) -> DragEffect {
        self.state = DragState::Idle;
        abort(ctx)
    }
}

/// Moves the shadow of `node_id` along with the pointer and recomputes the
/// drop candidate.
///
/// Returns `None` if the recomputation has nothing to work on, which cannot
/// happen while the invariants hold.
fn track(
    ctx: &mut InteractionContext<'_>,
    node_id: &str,
    pointer_origin: Point,
    node_origin: Point,
    pointer: Point,
) -> Option<DragCandidate> {
    if ctx.diagram.is_empty() {
        warn!(node_id; "Drag recomputation with an empty diagram");
        return None;
    }

    let shadow = node_origin.add_point(pointer.sub_point(pointer_origin));
    if !ctx.diagram.move_shadow(node_id, shadow) {
        warn!(node_id; "Dragged node has no shadow");
        return None;
    }

    let nodes = ctx.diagram.nodes();
    let node = ctx.diagram.node(node_id)?;
    let calculator = LayerCalculator::from_config(ctx.config);
    let layers = calculator.compute_layers(nodes);
    let layer = calculator.layer_of_node(nodes, &layers, node);
    let members = layers
        .get(layer)
        .map(|target| nodes_in_layer(nodes, target.layer_id()))
        .unwrap_or_default();
    let position = calculator.position_in_layer(&members, node);

    Some(DragCandidate::new(node_id, layer, position, layers))
}

fn abort(ctx: &mut InteractionContext<'_>) -> DragEffect {
    warn!("Drag aborted, resetting to idle");
    ctx.diagram.clear_shadow();
    DragEffect::Aborted
}

#[cfg(test)]
mod tests {
    use strata_core::{
        constraint::Constraint,
        geometry::Size,
        graph::{GraphNode, NodeKey, NodeKind},
    };

    use super::*;
    use crate::{
        config::InteractionConfig, constraints::ConstraintStore, diagram::Diagram,
        layout::Direction,
    };

    const URI: &str = "file:///test.sctx";

    fn node(id: &str, layer: u32, position: u32, x: f32, y: f32) -> GraphNode {
        GraphNode::new(
            NodeKey::new(URI, id),
            Point::new(x, y),
            Size::new(20.0, 20.0),
        )
        .with_placement(layer, position)
    }

    /// Three layers at x = 0, 60, 120; layer 0 holds a and b, layer 1 c, layer 2 d.
    fn diagram() -> Diagram {
        Diagram::from_nodes(
            URI,
            [
                node("a", 0, 0, 0.0, 0.0),
                node("b", 0, 1, 0.0, 40.0),
                node("c", 1, 0, 60.0, 0.0),
                node("d", 2, 0, 120.0, 20.0),
            ],
        )
        .unwrap()
    }

    struct Fixture {
        diagram: Diagram,
        store: ConstraintStore,
        config: InteractionConfig,
        controller: DragController,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_config(InteractionConfig::default())
        }

        fn with_config(config: InteractionConfig) -> Self {
            Self {
                diagram: diagram(),
                store: ConstraintStore::new(),
                config,
                controller: DragController::new(),
            }
        }

        fn down(&mut self, id: &str, x: f32, y: f32) -> DragEffect {
            let mut ctx = InteractionContext::new(&mut self.diagram, &mut self.store, &self.config);
            self.controller
                .on_drag_start(&mut ctx, &PointerEvent::on_node(id, Point::new(x, y)))
        }

        fn drag(&mut self, x: f32, y: f32) -> DragEffect {
            let mut ctx = InteractionContext::new(&mut self.diagram, &mut self.store, &self.config);
            self.controller
                .on_drag_move(&mut ctx, &PointerEvent::at(Point::new(x, y)))
        }

        fn up(&mut self, x: f32, y: f32) -> DragEffect {
            let mut ctx = InteractionContext::new(&mut self.diagram, &mut self.store, &self.config);
            self.controller
                .on_drag_end(&mut ctx, &PointerEvent::at(Point::new(x, y)))
        }

        fn cancel(&mut self, reason: CancelReason) -> DragEffect {
            let mut ctx = InteractionContext::new(&mut self.diagram, &mut self.store, &self.config);
            self.controller.on_drag_cancel(&mut ctx, reason)
        }

        fn replace(&mut self, diagram: Diagram) -> Option<DragEffect> {
            self.diagram = diagram;
            let mut ctx = InteractionContext::new(&mut self.diagram, &mut self.store, &self.config);
            self.controller.on_model_replaced(&mut ctx)
        }
    }

    #[test]
    fn test_press_arms_and_marks_shadow() {
        let mut fx = Fixture::new();
        let effect = fx.down("a", 10.0, 10.0);

        assert_eq!(
            effect,
            DragEffect::Armed {
                node_id: "a".to_string()
            }
        );
        assert_eq!(
            fx.diagram.shadow_node().and_then(GraphNode::shadow),
            Some(Point::new(0.0, 0.0))
        );
    }

    #[test]
    fn test_press_on_fixed_or_unknown_node_is_ignored() {
        let mut fx = Fixture::new();
        fx.diagram = Diagram::from_nodes(
            URI,
            [node("r", 0, 0, 0.0, 0.0).with_kind(NodeKind::Region)],
        )
        .unwrap();

        assert_eq!(
            fx.down("r", 5.0, 5.0),
            DragEffect::Noop(NoopReason::NotMoveable)
        );
        assert_eq!(
            fx.down("missing", 5.0, 5.0),
            DragEffect::Noop(NoopReason::UnknownNode)
        );
        assert!(fx.controller.state().is_idle());
        assert!(fx.diagram.shadow_node().is_none());
    }

    #[test]
    fn test_second_press_while_dragging_is_ignored() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        assert_eq!(
            fx.down("c", 70.0, 10.0),
            DragEffect::Noop(NoopReason::DragInProgress)
        );
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.drag(10.0, 10.0),
            DragEffect::Noop(NoopReason::IdleWithoutDrag)
        );
    }

    #[test]
    fn test_release_without_movement_is_click() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);

        assert_eq!(
            fx.up(10.0, 10.0),
            DragEffect::Click {
                node_id: "a".to_string()
            }
        );
        assert!(fx.diagram.shadow_node().is_none());
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_threshold_keeps_small_moves_armed() {
        let mut fx = Fixture::with_config(InteractionConfig::new(Direction::Right, 5.0));
        fx.down("a", 10.0, 10.0);

        assert_eq!(
            fx.drag(13.0, 10.0),
            DragEffect::Noop(NoopReason::ThresholdNotReached)
        );
        assert!(!fx.controller.is_dragging());
        assert!(matches!(fx.drag(20.0, 10.0), DragEffect::Started(_)));
    }

    #[test]
    fn test_drag_tracks_candidate() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);

        let started = fx.drag(11.0, 10.0);
        let candidate = started.candidate().unwrap();
        assert_eq!(candidate.layer(), 0);
        assert_eq!(candidate.position(), 0);
        assert_eq!(candidate.layers().len(), 3);

        // Into layer 1, below c
        let updated = fx.drag(75.0, 40.0);
        assert!(matches!(updated, DragEffect::Updated(_)));
        let candidate = updated.candidate().unwrap();
        assert_eq!(candidate.layer(), 1);
        assert_eq!(candidate.position(), 1);
        assert_eq!(fx.controller.candidate(), Some(candidate));

        assert_eq!(
            fx.diagram.node("a").and_then(GraphNode::shadow),
            Some(Point::new(65.0, 30.0))
        );
    }

    #[test]
    fn test_drop_at_origin_writes_nothing() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        fx.drag(40.0, 10.0);

        assert_eq!(fx.up(10.0, 10.0), DragEffect::Unchanged);
        assert!(fx.store.is_empty());
        assert!(!fx.store.is_dirty());
        assert!(fx.diagram.shadow_node().is_none());
    }

    #[test]
    fn test_drop_in_other_layer_writes_layer_only() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        fx.drag(75.0, -5.0);

        // Above c, so a keeps position 0
        let effect = fx.up(75.0, -5.0);
        let update = effect.constraint_update().unwrap();
        assert_eq!(update.layer(), Some(1));
        assert_eq!(update.position(), None);
        assert_eq!(fx.store.get(&NodeKey::new(URI, "a")), Constraint::Layer(1));
    }

    #[test]
    fn test_reorder_within_layer_writes_position_only() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        fx.drag(10.0, 70.0);

        let effect = fx.up(10.0, 70.0);
        let update = effect.constraint_update().unwrap();
        assert_eq!(update.constraint(), Constraint::Position(1));
        assert_eq!(
            fx.store.get(&NodeKey::new(URI, "a")),
            Constraint::Position(1)
        );
    }

    #[test]
    fn test_move_to_other_layer_and_rank_writes_both() {
        let mut fx = Fixture::new();
        fx.down("b", 10.0, 50.0);
        fx.drag(70.0, 90.0);

        // Above c: layer 0 -> 1 and position 1 -> 0
        let effect = fx.up(75.0, 0.0);
        assert_eq!(
            effect.constraint_update().map(ConstraintUpdate::constraint),
            Some(Constraint::Both {
                layer: 1,
                position: 0
            })
        );
    }

    #[test]
    fn test_cancel_discards_shadow() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        fx.drag(70.0, 10.0);

        assert_eq!(
            fx.cancel(CancelReason::LeftSurface),
            DragEffect::Cancelled(CancelReason::LeftSurface)
        );
        assert!(fx.controller.state().is_idle());
        assert!(fx.diagram.shadow_node().is_none());
        assert!(fx.store.is_empty());
        assert_eq!(
            fx.cancel(CancelReason::CancelSignal),
            DragEffect::Noop(NoopReason::IdleWithoutDrag)
        );
    }

    #[test]
    fn test_model_update_preserves_shadow() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        fx.drag(70.0, 10.0);

        let effect = fx.replace(diagram());
        assert!(matches!(effect, Some(DragEffect::Updated(_))));
        assert_eq!(
            fx.diagram.node("a").and_then(GraphNode::shadow),
            Some(Point::new(60.0, 0.0))
        );
        assert!(fx.controller.is_dragging());
    }

    #[test]
    fn test_model_update_removing_dragged_node_cancels() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        fx.drag(70.0, 10.0);

        let without_a =
            Diagram::from_nodes(URI, [node("c", 0, 0, 0.0, 0.0)]).unwrap();
        assert_eq!(
            fx.replace(without_a),
            Some(DragEffect::Cancelled(CancelReason::NodeRemoved))
        );
        assert!(fx.controller.state().is_idle());
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_model_update_while_idle_is_silent() {
        let mut fx = Fixture::new();
        assert_eq!(fx.replace(diagram()), None);
    }

    #[test]
    fn test_move_after_shadow_lost_aborts() {
        let mut fx = Fixture::new();
        fx.down("a", 10.0, 10.0);
        fx.diagram.clear_shadow();

        assert_eq!(fx.drag(50.0, 10.0), DragEffect::Aborted);
        assert!(fx.controller.state().is_idle());
    }
}
