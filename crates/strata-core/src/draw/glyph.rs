//! Constraint glyphs.
//!
//! A constrained node is decorated with a small lock icon. A layer constraint
//! adds a horizontal double arrow next to the lock, a position constraint a
//! vertical one. When both halves are pinned only the lock is drawn.
//!
//! ```text
//!   ╭─╮            ╭─╮  ↑          ╭─╮
//!  ┌┴─┴┐ ←──→     ┌┴─┴┐ │         ┌┴─┴┐
//!  └───┘          └───┘ ↓         └───┘
//!  Layer          Position        Both
//! ```
//!
//! All coordinates are relative to the glyph's top-left corner and scale with
//! [`GlyphStyle::size`].

use log::trace;
use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    constraint::Constraint,
    draw::StrokeDefinition,
    geometry::{Point, Size},
};

/// Visual parameters shared by all constraint glyphs.
#[derive(Debug, Clone)]
pub struct GlyphStyle {
    color: Color,
    size: f32,
    stroke: StrokeDefinition,
}

impl GlyphStyle {
    /// Creates a glyph style.
    ///
    /// # Arguments
    ///
    /// * `color` - Fill color of the lock body and stroke color of all outlines
    /// * `size` - Height of the lock icon in diagram units
    /// * `stroke_width` - Width of the shackle and arrow strokes
    pub fn new(color: Color, size: f32, stroke_width: f32) -> Self {
        Self {
            color,
            size,
            stroke: StrokeDefinition::rounded(color, stroke_width),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self::new(Color::default(), 10.0, 1.0)
    }
}

/// Returns the extent of the glyph drawn for `constraint`, or `None` if nothing
/// is drawn.
///
/// The lock alone is `0.7 × size` wide; an arrow widens the glyph to `1.7 × size`.
pub fn glyph_size(constraint: &Constraint, style: &GlyphStyle) -> Option<Size> {
    let s = style.size();
    match constraint {
        Constraint::None => None,
        Constraint::Both { .. } => Some(Size::new(0.7 * s, s)),
        Constraint::Layer(_) | Constraint::Position(_) => Some(Size::new(1.7 * s, s)),
    }
}

/// Renders the glyph for `constraint` with its top-left corner at the origin.
///
/// Returns `None` for [`Constraint::None`].
///
/// # Examples
///
/// ```
/// use strata_core::constraint::Constraint;
/// use strata_core::draw::{GlyphStyle, render_constraint_glyph};
///
/// let style = GlyphStyle::default();
/// assert!(render_constraint_glyph(&Constraint::None, &style).is_none());
///
/// let glyph = render_constraint_glyph(&Constraint::Layer(1), &style).unwrap();
/// assert!(glyph.to_string().contains("data-glyph=\"layer\""));
/// ```
pub fn render_constraint_glyph(
    constraint: &Constraint,
    style: &GlyphStyle,
) -> Option<svg_element::Group> {
    let kind = match constraint {
        Constraint::None => return None,
        Constraint::Layer(_) => "layer",
        Constraint::Position(_) => "position",
        Constraint::Both { .. } => "both",
    };
    trace!(constraint:% = constraint, kind; "Rendering constraint glyph");

    let (body, shackle) = lock(style);
    let mut group = svg_element::Group::new()
        .set("class", "constraint-glyph")
        .set("data-glyph", kind)
        .add(body)
        .add(shackle);

    match constraint {
        Constraint::Layer(_) => group = group.add(horizontal_arrow(style)),
        Constraint::Position(_) => group = group.add(vertical_arrow(style)),
        Constraint::Both { .. } | Constraint::None => {}
    }

    Some(group)
}

/// Renders the glyph for `constraint` translated so its top-left corner sits at `position`.
pub fn render_constraint_glyph_at(
    constraint: &Constraint,
    style: &GlyphStyle,
    position: Point,
) -> Option<svg_element::Group> {
    render_constraint_glyph(constraint, style).map(|group| {
        group.set(
            "transform",
            format!("translate({} {})", position.x(), position.y()),
        )
    })
}

fn lock(style: &GlyphStyle) -> (svg_element::Rectangle, svg_element::Path) {
    let s = style.size();

    let body = svg_element::Rectangle::new()
        .set("x", 0)
        .set("y", 0.45 * s)
        .set("width", 0.7 * s)
        .set("height", 0.55 * s)
        .set("rx", 0.1 * s)
        .set("fill", style.color().to_string())
        .set("fill-opacity", style.color().alpha());

    // Shackle: two uprights joined by a half circle over the body.
    let left = 0.15 * s;
    let right = 0.55 * s;
    let radius = (right - left) / 2.0;
    let data = format!(
        "M {left} {base} L {left} {top} A {radius} {radius} 0 0 1 {right} {top} L {right} {base}",
        base = 0.45 * s,
        top = 0.25 * s,
    );
    let shackle = apply_stroke!(
        svg_element::Path::new().set("d", data).set("fill", "none"),
        style.stroke()
    );

    (body, shackle)
}

fn horizontal_arrow(style: &GlyphStyle) -> svg_element::Path {
    let s = style.size();
    let (start, end, y) = (0.9 * s, 1.7 * s, 0.7 * s);
    let head = 0.2 * s;
    let data = format!(
        "M {start} {y} L {end} {y} \
         M {h0} {up} L {start} {y} L {h0} {down} \
         M {h1} {up} L {end} {y} L {h1} {down}",
        h0 = start + head,
        h1 = end - head,
        up = y - head,
        down = y + head,
    );
    apply_stroke!(
        svg_element::Path::new()
            .set("d", data)
            .set("fill", "none")
            .set("data-arrow", "horizontal"),
        style.stroke()
    )
}

fn vertical_arrow(style: &GlyphStyle) -> svg_element::Path {
    let s = style.size();
    let (start, end, x) = (0.0, s, 1.3 * s);
    let head = 0.2 * s;
    let data = format!(
        "M {x} {start} L {x} {end} \
         M {left} {v0} L {x} {start} L {right} {v0} \
         M {left} {v1} L {x} {end} L {right} {v1}",
        v0 = start + head,
        v1 = end - head,
        left = x - head,
        right = x + head,
    );
    apply_stroke!(
        svg_element::Path::new()
            .set("d", data)
            .set("fill", "none")
            .set("data-arrow", "vertical"),
        style.stroke()
    )
}
