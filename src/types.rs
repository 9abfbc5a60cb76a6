#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Aka 'Negative' in Geometry
    Clockwise,
    /// Aka 'Positive' in Geometry
    CounterClockwise,
}

/// Photoplotter exposure of a shape: dark adds, clear erases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    Clear,
    Dark,
}

impl Exposure {
    /// Resolve a macro primitive's exposure parameter.
    ///
    /// `0` is clear, `1` is dark, anything else toggles the previous exposure.
    pub fn from_macro_parameter(value: f64, previous: Exposure) -> Self {
        if value == 0.0 {
            Exposure::Clear
        } else if value == 1.0 {
            Exposure::Dark
        } else {
            !previous
        }
    }
}

impl core::ops::Not for Exposure {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Exposure::Clear => Exposure::Dark,
            Exposure::Dark => Exposure::Clear,
        }
    }
}

impl From<bool> for Exposure {
    fn from(value: bool) -> Self {
        match value {
            true => Exposure::Dark,
            false => Exposure::Clear,
        }
    }
}

/// Layer (and knockout) polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    #[default]
    Dark,
    Clear,
}

/// Whole-image polarity, a negative image inverts every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImagePolarity {
    #[default]
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::from_rgba(0, 0, 0, 0);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 255)
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
        }
    }
}
