//! Drawing primitives for constraint decorations.
//!
//! Strata does not paint diagrams; it only produces the small vector glyphs that
//! mark constrained nodes. Glyphs are emitted as `svg` crate elements so the
//! embedding front-end can splice them into its own scene.

mod glyph;
mod stroke;

pub use glyph::{GlyphStyle, glyph_size, render_constraint_glyph, render_constraint_glyph_at};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin};
