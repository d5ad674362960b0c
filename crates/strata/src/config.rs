//! Configuration types for the constraint engine.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining interaction and style settings.
//! - [`InteractionConfig`] - Layering direction and drag behavior.
//! - [`StyleConfig`] - Appearance of the constraint glyphs.
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.interaction().drag_threshold(), 0.0);
//! assert!(config.style().glyph_style().is_ok());
//! ```

use serde::Deserialize;

use strata_core::{color::Color, draw::GlyphStyle};

use crate::layout::{Direction, SINGLE_LAYER_MARGIN};

/// Top-level configuration combining interaction and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Interaction configuration section.
    #[serde(default)]
    interaction: InteractionConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(interaction: InteractionConfig, style: StyleConfig) -> Self {
        Self { interaction, style }
    }

    /// Returns the interaction configuration.
    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Drag interaction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Direction in which the layout server places consecutive layers.
    direction: Direction,

    /// Pointer travel that must be exceeded before a press becomes a drag.
    drag_threshold: f32,

    /// Padding on both sides of the only layer of a single-layer diagram.
    single_layer_margin: f32,
}

impl InteractionConfig {
    /// Creates a new [`InteractionConfig`].
    ///
    /// # Arguments
    ///
    /// * `direction` - Direction in which layers advance.
    /// * `drag_threshold` - Pointer distance a press must exceed to start a drag.
    pub fn new(direction: Direction, drag_threshold: f32) -> Self {
        Self {
            direction,
            drag_threshold,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn drag_threshold(&self) -> f32 {
        self.drag_threshold
    }

    pub fn single_layer_margin(&self) -> f32 {
        self.single_layer_margin
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            drag_threshold: 0.0,
            single_layer_margin: SINGLE_LAYER_MARGIN,
        }
    }
}

/// Appearance of the constraint glyphs.
///
/// Fields that are not set fall back to [`GlyphStyle::default`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Glyph color, as a CSS color string.
    #[serde(default)]
    glyph_color: Option<String>,

    /// Glyph height in diagram units.
    #[serde(default)]
    glyph_size: Option<f32>,

    /// Stroke width of the shackle and arrows.
    #[serde(default)]
    stroke_width: Option<f32>,
}

impl StyleConfig {
    /// Returns the parsed glyph [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn glyph_color(&self) -> Result<Option<Color>, String> {
        self.glyph_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid glyph color in config: {err}"))
    }

    /// Builds the [`GlyphStyle`] described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the glyph color cannot be parsed or a dimension is
    /// not a positive number.
    pub fn glyph_style(&self) -> Result<GlyphStyle, String> {
        let defaults = GlyphStyle::default();
        let color = self.glyph_color()?.unwrap_or_else(|| defaults.color());
        let size = self.glyph_size.unwrap_or_else(|| defaults.size());
        let stroke_width = self
            .stroke_width
            .unwrap_or_else(|| defaults.stroke().width());

        if size.is_nan() || size <= 0.0 {
            return Err(format!("Invalid glyph size in config: {size}"));
        }
        if stroke_width.is_nan() || stroke_width <= 0.0 {
            return Err(format!("Invalid stroke width in config: {stroke_width}"));
        }

        Ok(GlyphStyle::new(color, size, stroke_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.interaction().direction(), Direction::Right);
        assert_eq!(config.interaction().drag_threshold(), 0.0);
        assert_eq!(config.interaction().single_layer_margin(), 10.0);

        let style = config.style().glyph_style().unwrap();
        assert_eq!(style.size(), 10.0);
    }

    #[test]
    fn test_invalid_glyph_color() {
        let style = StyleConfig {
            glyph_color: Some("not-a-color".to_string()),
            ..StyleConfig::default()
        };
        let err = style.glyph_style().unwrap_err();
        assert!(err.contains("Invalid glyph color"));
    }

    #[test]
    fn test_non_positive_glyph_size_rejected() {
        let style = StyleConfig {
            glyph_size: Some(0.0),
            ..StyleConfig::default()
        };
        assert!(style.glyph_style().is_err());
    }

    #[test]
    fn test_custom_glyph_style() {
        let style = StyleConfig {
            glyph_color: Some("steelblue".to_string()),
            glyph_size: Some(16.0),
            stroke_width: Some(2.0),
        };
        let glyph = style.glyph_style().unwrap();
        assert_eq!(glyph.size(), 16.0);
        assert_eq!(glyph.stroke().width(), 2.0);
        assert_eq!(glyph.color().to_string(), "steelblue");
    }
}
