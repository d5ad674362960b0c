//! Strata - interactive layer and position constraints for layered diagrams.
//!
//! A layered layout server places every node of a diagram into a layer and
//! ranks it within that layer. Strata lets users override that placement by
//! dragging nodes: while a node is dragged it computes which layer and
//! position the node would land in, and on release it pins the changed
//! values as constraints and reports them to the server, which lays the
//! diagram out again.
//!
//! [`Session`] ties the pieces together for one open diagram.

pub mod config;
pub mod constraints;
pub mod decorate;
pub mod diagram;
pub mod interaction;
pub mod layout;
pub mod server;

mod error;
mod session;

pub use strata_core::{color, constraint, draw, geometry, graph};

pub use error::StrataError;
pub use session::Session;
