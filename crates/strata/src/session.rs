use log::{debug, info};
use svg::node::element as svg_element;

use strata_core::{constraint::Constraint, draw::GlyphStyle, graph::NodeKey};

use crate::{
    config::AppConfig,
    constraints::ConstraintStore,
    decorate,
    diagram::Diagram,
    error::StrataError,
    interaction::{
        CancelReason, DragCandidate, DragController, DragEffect, DragHandler, DragState,
        InteractionContext, PointerEvent,
    },
    layout::{Layer, LayerCalculator},
    server::{LayoutServer, ModelSnapshot, Notification},
};

/// The interaction state of one open diagram.
///
/// A session owns the current model, the constraint store and the drag
/// controller, and forwards every constraint change to its [`LayoutServer`].
/// The embedding application creates one per diagram and feeds it model
/// updates and pointer events.
///
/// # Examples
///
/// ```
/// use strata::{Session, config::AppConfig};
/// use strata::geometry::{Point, Size};
/// use strata::interaction::PointerEvent;
/// use strata::server::{ModelSnapshot, RecordingServer, SnapshotNode};
///
/// let snapshot = ModelSnapshot::new("file:///model.sctx")
///     .with_node(SnapshotNode::new("a", Point::new(0.0, 0.0), Size::new(20.0, 20.0), 0, 0))
///     .with_node(SnapshotNode::new("b", Point::new(60.0, 0.0), Size::new(20.0, 20.0), 1, 0));
///
/// let mut session = Session::new(AppConfig::default(), RecordingServer::new()).unwrap();
/// session.apply_model_update(&snapshot).unwrap();
///
/// session.pointer_down(&PointerEvent::on_node("a", Point::new(10.0, 10.0)));
/// session.pointer_move(&PointerEvent::at(Point::new(75.0, 5.0)));
/// session.pointer_up(&PointerEvent::at(Point::new(75.0, 5.0)));
///
/// assert_eq!(session.server().notifications().len(), 1);
/// ```
#[derive(Debug)]
pub struct Session<S: LayoutServer> {
    config: AppConfig,
    glyph_style: GlyphStyle,
    diagram: Diagram,
    store: ConstraintStore,
    controller: DragController,
    server: S,
}

impl<S: LayoutServer> Session<S> {
    /// Creates a session with an empty diagram.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Config`] if the style configuration is invalid.
    pub fn new(config: AppConfig, server: S) -> Result<Self, StrataError> {
        let glyph_style = config.style().glyph_style().map_err(StrataError::Config)?;
        Ok(Self {
            config,
            glyph_style,
            diagram: Diagram::default(),
            store: ConstraintStore::new(),
            controller: DragController::new(),
            server,
        })
    }

    /// Replaces the model with a snapshot from the layout server.
    ///
    /// A drag in progress survives if its node is still part of the model and
    /// is cancelled otherwise; the returned effect reports which.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Snapshot`] if the snapshot is malformed. The
    /// current model is kept in that case.
    pub fn apply_model_update(
        &mut self,
        snapshot: &ModelSnapshot,
    ) -> Result<Option<DragEffect>, StrataError> {
        self.diagram = Diagram::from_snapshot(snapshot)?;
        self.store.sync_from_model(self.diagram.nodes());

        let orphans = self.store.orphans(self.diagram.nodes()).len();
        if orphans > 0 {
            debug!(orphans; "Constraints without a node in the current model");
        }

        let mut ctx =
            InteractionContext::new(&mut self.diagram, &mut self.store, self.config.interaction());
        let effect = self.controller.on_model_replaced(&mut ctx);
        self.flush();
        Ok(effect)
    }

    /// Handles a pointer press.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> DragEffect {
        self.dispatch(|controller, ctx| controller.on_drag_start(ctx, event))
    }

    /// Handles pointer movement.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> DragEffect {
        self.dispatch(|controller, ctx| controller.on_drag_move(ctx, event))
    }

    /// Handles a pointer release, committing the drag.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> DragEffect {
        self.dispatch(|controller, ctx| controller.on_drag_end(ctx, event))
    }

    /// Aborts the drag in progress without writing a constraint.
    pub fn cancel(&mut self, reason: CancelReason) -> DragEffect {
        self.dispatch(|controller, ctx| controller.on_drag_cancel(ctx, reason))
    }

    /// Removes both constraint halves of `key` and notifies the server.
    ///
    /// Returns `false` if the node was unconstrained.
    pub fn clear_constraint(&mut self, key: &NodeKey) -> bool {
        let removed = self.store.clear(key).is_some();
        self.flush();
        removed
    }

    /// Removes the layer constraint of `key` and notifies the server.
    pub fn clear_layer_constraint(&mut self, key: &NodeKey) -> bool {
        let removed = self.store.clear_layer(key);
        self.flush();
        removed
    }

    /// Removes the position constraint of `key` and notifies the server.
    pub fn clear_position_constraint(&mut self, key: &NodeKey) -> bool {
        let removed = self.store.clear_position(key);
        self.flush();
        removed
    }

    pub fn constraint(&self, key: &NodeKey) -> Constraint {
        self.store.get(key)
    }

    /// Computes the layers of the current model, including any shadow.
    pub fn layers(&self) -> Vec<Layer> {
        LayerCalculator::from_config(self.config.interaction()).compute_layers(self.diagram.nodes())
    }

    /// Returns the drop candidate while a drag is in progress.
    pub fn candidate(&self) -> Option<&DragCandidate> {
        self.controller.candidate()
    }

    pub fn drag_state(&self) -> &DragState {
        self.controller.state()
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn store(&self) -> &ConstraintStore {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut S {
        &mut self.server
    }

    /// Renders the constraint glyphs of all constrained nodes.
    pub fn render_glyphs(&self) -> Vec<svg_element::Group> {
        decorate::render_glyphs(&self.diagram, &self.store, &self.glyph_style)
    }

    /// Renders node outlines and constraint glyphs as an SVG document.
    pub fn render_overlay(&self) -> svg::Document {
        decorate::render_overlay(&self.diagram, &self.store, &self.glyph_style)
    }

    fn dispatch(
        &mut self,
        handle: impl FnOnce(&mut DragController, &mut InteractionContext<'_>) -> DragEffect,
    ) -> DragEffect {
        let mut ctx =
            InteractionContext::new(&mut self.diagram, &mut self.store, self.config.interaction());
        let effect = handle(&mut self.controller, &mut ctx);
        self.flush();
        effect
    }

    /// Forwards pending store changes to the layout server.
    fn flush(&mut self) {
        for change in self.store.take_changes() {
            let notification = Notification::from(change);
            info!(node_id = notification.node_id(); "Notifying layout server");
            self.server.notify(notification);
        }
    }
}
