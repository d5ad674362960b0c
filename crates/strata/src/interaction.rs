//! Drag interaction.
//!
//! Pointer events flow into a [`DragHandler`] together with an
//! [`InteractionContext`] naming the state the handler may touch. The handler
//! answers every event with a [`DragEffect`] describing what happened.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle
//!    \------> Idle (click or cancel from Armed)
//! ```

mod controller;
mod event;

pub use controller::{DragController, DragState};
pub use event::{
    CancelReason, ConstraintUpdate, DragCandidate, DragEffect, NoopReason, PointerEvent,
};

use crate::{config::InteractionConfig, constraints::ConstraintStore, diagram::Diagram};

/// The state a drag handler operates on for the duration of one event.
#[derive(Debug)]
pub struct InteractionContext<'a> {
    pub(crate) diagram: &'a mut Diagram,
    pub(crate) store: &'a mut ConstraintStore,
    pub(crate) config: &'a InteractionConfig,
}

impl<'a> InteractionContext<'a> {
    pub fn new(
        diagram: &'a mut Diagram,
        store: &'a mut ConstraintStore,
        config: &'a InteractionConfig,
    ) -> Self {
        Self {
            diagram,
            store,
            config,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        self.diagram
    }

    pub fn store(&self) -> &ConstraintStore {
        self.store
    }

    pub fn config(&self) -> &InteractionConfig {
        self.config
    }
}

/// Reacts to the pointer gestures that make up a drag.
///
/// Implementations only touch what the [`InteractionContext`] hands them and
/// never fail: invalid events yield [`DragEffect::Noop`], broken invariants
/// [`DragEffect::Aborted`].
pub trait DragHandler {
    /// Pointer pressed; `event.target()` names the node under the pointer.
    fn on_drag_start(&mut self, ctx: &mut InteractionContext<'_>, event: &PointerEvent)
    -> DragEffect;

    /// Pointer moved while pressed.
    fn on_drag_move(&mut self, ctx: &mut InteractionContext<'_>, event: &PointerEvent)
    -> DragEffect;

    /// Pointer released. The only event that may write a constraint.
    fn on_drag_end(&mut self, ctx: &mut InteractionContext<'_>, event: &PointerEvent) -> DragEffect;

    /// The drag was interrupted before release.
    fn on_drag_cancel(&mut self, ctx: &mut InteractionContext<'_>, reason: CancelReason)
    -> DragEffect;
}
