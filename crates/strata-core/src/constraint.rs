//! User-pinned layer and position constraints.
//!
//! A [`Constraint`] records which parts of a node's placement should survive the
//! next automatic re-layout. Either half can be set independently; setting one
//! half never touches the other.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which half of a constraint an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintTarget {
    Layer,
    Position,
    Both,
}

impl fmt::Display for ConstraintTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layer => write!(f, "layer"),
            Self::Position => write!(f, "position"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// The pinned layer and/or position of a node.
///
/// # Examples
///
/// ```
/// use strata_core::constraint::Constraint;
///
/// let pinned = Constraint::None.with_layer(2);
/// assert_eq!(pinned, Constraint::Layer(2));
///
/// let both = pinned.with_position(0);
/// assert_eq!(both, Constraint::Both { layer: 2, position: 0 });
///
/// // Removing one half keeps the other.
/// assert_eq!(both.without_layer(), Constraint::Position(0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    #[default]
    None,
    Layer(u32),
    Position(u32),
    Both {
        layer: u32,
        position: u32,
    },
}

impl Constraint {
    /// Builds a constraint from its two optional halves.
    pub fn from_parts(layer: Option<u32>, position: Option<u32>) -> Self {
        match (layer, position) {
            (None, None) => Self::None,
            (Some(layer), None) => Self::Layer(layer),
            (None, Some(position)) => Self::Position(position),
            (Some(layer), Some(position)) => Self::Both { layer, position },
        }
    }

    /// Returns the pinned layer, if any.
    pub fn layer(self) -> Option<u32> {
        match self {
            Self::Layer(layer) | Self::Both { layer, .. } => Some(layer),
            Self::None | Self::Position(_) => None,
        }
    }

    /// Returns the pinned position, if any.
    pub fn position(self) -> Option<u32> {
        match self {
            Self::Position(position) | Self::Both { position, .. } => Some(position),
            Self::None | Self::Layer(_) => None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// Returns this constraint with the layer half set to `layer`.
    pub fn with_layer(self, layer: u32) -> Self {
        Self::from_parts(Some(layer), self.position())
    }

    /// Returns this constraint with the position half set to `position`.
    pub fn with_position(self, position: u32) -> Self {
        Self::from_parts(self.layer(), Some(position))
    }

    /// Returns this constraint with the layer half removed.
    pub fn without_layer(self) -> Self {
        Self::from_parts(None, self.position())
    }

    /// Returns this constraint with the position half removed.
    pub fn without_position(self) -> Self {
        Self::from_parts(self.layer(), None)
    }

    /// Returns which halves are set, or `None` when unconstrained.
    pub fn target(self) -> Option<ConstraintTarget> {
        match self {
            Self::None => None,
            Self::Layer(_) => Some(ConstraintTarget::Layer),
            Self::Position(_) => Some(ConstraintTarget::Position),
            Self::Both { .. } => Some(ConstraintTarget::Both),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Layer(layer) => write!(f, "layer {layer}"),
            Self::Position(position) => write!(f, "position {position}"),
            Self::Both { layer, position } => write!(f, "layer {layer}, position {position}"),
        }
    }
}
