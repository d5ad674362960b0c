//! Layer and position calculation for interactive placement.
//!
//! The layout server assigns every node a layer index and an ordinal position
//! inside that layer. While a node is dragged, the calculator answers two
//! questions from the current geometry alone:
//!
//! - which layer band does the node's (shadow) location fall into, and
//! - which ordinal position would it take inside that band.
//!
//! # Layer Frame
//!
//! All computations run in a *layer frame* in which layers advance along `+x`
//! and positions along `+y`. For [`Direction::Right`] the layer frame is the
//! diagram frame; other directions map node bounds into it first, see
//! [`Direction::to_layer_frame`].

mod layer;
mod position;

pub use layer::Layer;
pub use position::nodes_in_layer;

use serde::Deserialize;

use strata_core::geometry::Bounds;

use crate::config::InteractionConfig;

/// Fixed padding added on both sides of the only layer of a single-layer diagram.
pub const SINGLE_LAYER_MARGIN: f32 = 10.0;

/// The direction in which consecutive layers are placed by the layout server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Layers advance left to right
    #[default]
    Right,
    /// Layers advance right to left
    Left,
    /// Layers advance top to bottom
    Down,
    /// Layers advance bottom to top
    Up,
}

impl Direction {
    /// Maps bounds from diagram coordinates into the layer frame.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strata::layout::Direction;
    /// # use strata_core::geometry::{Bounds, Point, Size};
    /// let bounds = Bounds::new_from_top_left(Point::new(10.0, 50.0), Size::new(20.0, 30.0));
    ///
    /// assert_eq!(Direction::Right.to_layer_frame(bounds), bounds);
    ///
    /// // Top-to-bottom layering: the layer axis is the diagram's y-axis.
    /// let down = Direction::Down.to_layer_frame(bounds);
    /// assert_eq!(down.min_x(), 50.0);
    /// assert_eq!(down.min_y(), 10.0);
    /// ```
    pub fn to_layer_frame(self, bounds: Bounds) -> Bounds {
        match self {
            Self::Right => bounds,
            Self::Left => bounds.mirror_x(),
            Self::Down => bounds.transpose(),
            Self::Up => bounds.transpose().mirror_x(),
        }
    }
}

/// Computes layer bands and drop positions from node geometry.
///
/// The calculator is stateless; every call recomputes from the node slice it
/// is given.
#[derive(Debug, Clone, Copy)]
pub struct LayerCalculator {
    direction: Direction,
    single_layer_margin: f32,
}

impl LayerCalculator {
    /// Creates a calculator for layers advancing in `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            single_layer_margin: SINGLE_LAYER_MARGIN,
        }
    }

    /// Creates a calculator configured from the interaction settings.
    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(config.direction()).with_single_layer_margin(config.single_layer_margin())
    }

    /// Set the padding applied to the only layer of a single-layer diagram
    pub fn with_single_layer_margin(mut self, margin: f32) -> Self {
        self.single_layer_margin = margin;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for LayerCalculator {
    fn default() -> Self {
        Self::new(Direction::default())
    }
}
