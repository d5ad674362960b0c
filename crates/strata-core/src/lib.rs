//! Strata Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Strata interactive
//! layout-constraint engine. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Graph**: The laid-out node model delivered by the layout server ([`graph`] module)
//! - **Constraints**: Layer and position pins ([`constraint::Constraint`])
//! - **Draw**: Constraint glyph rendering ([`draw`] module)

pub mod color;
pub mod constraint;
pub mod draw;
pub mod geometry;
pub mod graph;
