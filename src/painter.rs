//! Dark/clear paint selection for one render.

use crate::config::{DrawingMode, RenderConfiguration};
use crate::surface::{CompositeMode, Surface};
use crate::types::{Color, Exposure};

/// How to paint one exposure on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub mode: CompositeMode,
    pub color: Color,
}

/// The renderer's drawing-mode cursor.
///
/// Owned by a single render and threaded through the compositor, net renderer and macro evaluator.
/// `inverted` is recomputed on every layer change and swaps what dark and clear paint.
#[derive(Debug, Clone)]
pub struct PainterState {
    drawing_mode: DrawingMode,
    foreground: Color,
    background: Color,
    inverted: bool,
}

impl PainterState {
    pub fn new(configuration: &RenderConfiguration) -> Self {
        Self {
            drawing_mode: configuration.drawing_mode,
            foreground: configuration.foreground,
            background: configuration.background,
            inverted: false,
        }
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub fn paint_for(&self, exposure: Exposure) -> Paint {
        let exposure = match self.inverted {
            true => !exposure,
            false => exposure,
        };

        match (self.drawing_mode, exposure) {
            (_, Exposure::Dark) => Paint {
                mode: CompositeMode::SourceOver,
                color: self.foreground,
            },
            (DrawingMode::CompositingModes, Exposure::Clear) => Paint {
                mode: CompositeMode::Clear,
                color: self.foreground,
            },
            (DrawingMode::TwoColors, Exposure::Clear) => Paint {
                mode: CompositeMode::SourceOver,
                color: self.background,
            },
        }
    }

    /// Puts the surface into the composite mode for `exposure`, returning the paint to use.
    pub fn apply(&self, surface: &mut dyn Surface, exposure: Exposure) -> Paint {
        let paint = self.paint_for(exposure);
        if surface.composite_mode() != paint.mode {
            surface.set_composite_mode(paint.mode);
        }
        paint
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn painter(drawing_mode: DrawingMode) -> PainterState {
        PainterState::new(&RenderConfiguration {
            drawing_mode,
            foreground: Color::from_rgb(255, 0, 0),
            background: Color::from_rgb(0, 0, 255),
            ..RenderConfiguration::default()
        })
    }

    #[rstest]
    #[case(DrawingMode::CompositingModes, false, Exposure::Dark, CompositeMode::SourceOver, Color::from_rgb(255, 0, 0))]
    #[case(DrawingMode::CompositingModes, false, Exposure::Clear, CompositeMode::Clear, Color::from_rgb(255, 0, 0))]
    #[case(DrawingMode::CompositingModes, true, Exposure::Dark, CompositeMode::Clear, Color::from_rgb(255, 0, 0))]
    #[case(DrawingMode::CompositingModes, true, Exposure::Clear, CompositeMode::SourceOver, Color::from_rgb(255, 0, 0))]
    #[case(DrawingMode::TwoColors, false, Exposure::Dark, CompositeMode::SourceOver, Color::from_rgb(255, 0, 0))]
    #[case(DrawingMode::TwoColors, false, Exposure::Clear, CompositeMode::SourceOver, Color::from_rgb(0, 0, 255))]
    #[case(DrawingMode::TwoColors, true, Exposure::Dark, CompositeMode::SourceOver, Color::from_rgb(0, 0, 255))]
    #[case(DrawingMode::TwoColors, true, Exposure::Clear, CompositeMode::SourceOver, Color::from_rgb(255, 0, 0))]
    fn test_paint_for_exposure(
        #[case] drawing_mode: DrawingMode,
        #[case] inverted: bool,
        #[case] exposure: Exposure,
        #[case] expected_mode: CompositeMode,
        #[case] expected_color: Color,
    ) {
        // given
        let mut painter = painter(drawing_mode);
        painter.set_inverted(inverted);

        // when
        let paint = painter.paint_for(exposure);

        // then
        assert_eq!(paint, Paint {
            mode: expected_mode,
            color: expected_color,
        });
    }
}
