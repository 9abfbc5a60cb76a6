use log::warn;
use thiserror::Error;

use crate::image::{ApertureType, Interpolation, LayerId, MacroPrimitiveKind, NetStateId};

/// A recoverable problem found while rendering.
///
/// None of these stop a render, the offending net or macro primitive is skipped and recorded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Aperture {aperture} ({aperture_type:?}) can not be drawn, only circles and rectangles can")]
    UnsupportedDrawAperture { aperture: u32, aperture_type: ApertureType },
    #[error("Unsupported interpolation {0:?} for a drawn net")]
    UnsupportedInterpolation(Interpolation),
    #[error("Unknown aperture type {0:?}")]
    UnknownApertureType(ApertureType),
    #[error("{0:?} primitive rotated while centered off-origin, center: ({1}, {2})")]
    RotatedOffOrigin(MacroPrimitiveKind, f64, f64),
    #[error("Unknown macro primitive {0:?}")]
    UnknownMacroPrimitive(MacroPrimitiveKind),
    #[error("Macro primitive {kind:?} needs {required} parameters, got {actual}")]
    MissingMacroParameter {
        kind: MacroPrimitiveKind,
        required: usize,
        actual: usize,
    },
    #[error("Macro aperture {0} has no simplified macro")]
    MissingMacro(u32),
    #[error("Circular interpolation without a circle segment")]
    MissingCircleSegment,
    #[error("Region without a region end")]
    UnterminatedRegion,
    #[error("Net refers to a missing layer {0:?}")]
    MissingLayer(LayerId),
    #[error("Net refers to a missing net state {0:?}")]
    MissingNetState(NetStateId),
}

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Image encoding error: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Index into `Image::nets`, if the problem belongs to a net.
    pub net_index: Option<usize>,
    pub error: RenderError,
}

/// Collects diagnostics for one render, logging each as it is reported.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn report(&mut self, net_index: Option<usize>, error: RenderError) {
        match net_index {
            Some(index) => warn!("Net {}: {}", index, error),
            None => warn!("{}", error),
        }
        self.entries.push(Diagnostic {
            net_index,
            error,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// What a render did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    /// Nets that painted something, a step-and-repeat grid counting once.
    pub nets_rendered: usize,
    /// Nets that were skipped because of an error.
    pub nets_skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderSummary {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_keep_report_order() {
        // given
        let mut diagnostics = Diagnostics::default();

        // when
        diagnostics.report(Some(3), RenderError::MissingCircleSegment);
        diagnostics.report(None, RenderError::UnknownMacroPrimitive(MacroPrimitiveKind::Unknown(9)));

        // then
        assert_eq!(diagnostics.len(), 2);
        let entries = diagnostics.into_vec();
        assert_eq!(entries[0].net_index, Some(3));
        assert_eq!(entries[1].error, RenderError::UnknownMacroPrimitive(MacroPrimitiveKind::Unknown(9)));
    }

    #[test]
    fn test_error_message() {
        let error = RenderError::MissingMacroParameter {
            kind: MacroPrimitiveKind::Thermal,
            required: 6,
            actual: 4,
        };

        assert_eq!(error.to_string(), "Macro primitive Thermal needs 6 parameters, got 4");
    }
}
