//! Scripted interaction scenarios.
//!
//! A scenario is a TOML document holding the initial model snapshot and a
//! list of steps that stand in for the pointer events and commands of an
//! interactive editor:
//!
//! ```toml
//! [snapshot]
//! source_uri = "file:///demo.sctx"
//!
//! [[snapshot.nodes]]
//! id = "a"
//! x = 0
//! y = 0
//! width = 20
//! height = 20
//!
//! [[step]]
//! action = "down"
//! node = "a"
//! x = 10
//! y = 10
//!
//! [[step]]
//! action = "up"
//! x = 10
//! y = 10
//! ```

use log::debug;
use serde::Deserialize;

use strata::{
    Session, StrataError,
    constraint::ConstraintTarget,
    geometry::Point,
    graph::NodeKey,
    interaction::{CancelReason, DragEffect, PointerEvent},
    server::{LayoutServer, ModelSnapshot, SnapshotNode},
};

/// An initial model plus the steps replayed against it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    snapshot: ModelSnapshot,

    #[serde(rename = "step", default)]
    steps: Vec<Step>,
}

impl Scenario {
    pub fn snapshot(&self) -> &ModelSnapshot {
        &self.snapshot
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Pointer press, optionally on a node.
    Down {
        #[serde(default)]
        node: Option<String>,
        x: f32,
        y: f32,
    },
    Move {
        x: f32,
        y: f32,
    },
    Up {
        x: f32,
        y: f32,
    },
    Cancel {
        #[serde(default)]
        reason: CancelKind,
    },
    /// Remove a node's constraint, or one half of it.
    Clear {
        node: String,
        #[serde(default)]
        target: Option<ConstraintTarget>,
    },
    /// Replace the model with a new snapshot of the same document.
    Update {
        #[serde(default)]
        nodes: Vec<SnapshotNode>,
    },
}

/// Scripted cancel sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelKind {
    #[default]
    Signal,
    LeftSurface,
}

impl From<CancelKind> for CancelReason {
    fn from(kind: CancelKind) -> Self {
        match kind {
            CancelKind::Signal => Self::CancelSignal,
            CancelKind::LeftSurface => Self::LeftSurface,
        }
    }
}

/// Loads the scenario's snapshot into `session` and replays every step.
///
/// Returns the drag effects in step order. Clear steps contribute no effect.
///
/// # Errors
///
/// Returns [`StrataError::Snapshot`] if the initial snapshot or an update
/// step is rejected.
pub fn replay<S: LayoutServer>(
    session: &mut Session<S>,
    scenario: &Scenario,
) -> Result<Vec<DragEffect>, StrataError> {
    session.apply_model_update(&scenario.snapshot)?;

    let mut effects = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        debug!(index, step:?; "Replaying step");
        let effect = match step {
            Step::Down { node, x, y } => {
                let position = Point::new(*x, *y);
                let event = match node {
                    Some(id) => PointerEvent::on_node(id.as_str(), position),
                    None => PointerEvent::at(position),
                };
                Some(session.pointer_down(&event))
            }
            Step::Move { x, y } => Some(session.pointer_move(&PointerEvent::at(Point::new(*x, *y)))),
            Step::Up { x, y } => Some(session.pointer_up(&PointerEvent::at(Point::new(*x, *y)))),
            Step::Cancel { reason } => Some(session.cancel((*reason).into())),
            Step::Clear { node, target } => {
                let key = node_key(session, &scenario.snapshot, node);
                let cleared = match target.unwrap_or(ConstraintTarget::Both) {
                    ConstraintTarget::Layer => session.clear_layer_constraint(&key),
                    ConstraintTarget::Position => session.clear_position_constraint(&key),
                    ConstraintTarget::Both => session.clear_constraint(&key),
                };
                debug!(node, cleared; "Clear step");
                None
            }
            Step::Update { nodes } => {
                let snapshot = ModelSnapshot {
                    source_uri: scenario.snapshot.source_uri.clone(),
                    nodes: nodes.clone(),
                };
                session.apply_model_update(&snapshot)?
            }
        };

        if let Some(effect) = effect {
            debug!(index, effect:?; "Step effect");
            effects.push(effect);
        }
    }

    Ok(effects)
}

/// Resolves a node id to its key, falling back to the scenario's document for
/// nodes no longer in the model.
fn node_key<S: LayoutServer>(session: &Session<S>, snapshot: &ModelSnapshot, id: &str) -> NodeKey {
    session
        .diagram()
        .node(id)
        .map(|node| node.key().clone())
        .unwrap_or_else(|| NodeKey::new(snapshot.source_uri.as_str(), id))
}
