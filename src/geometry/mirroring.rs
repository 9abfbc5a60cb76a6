use crate::image::MirrorState;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Mirroring {
    pub x: bool,
    pub y: bool,
}

impl From<(bool, bool)> for Mirroring {
    fn from(value: (bool, bool)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// `FlipA` mirrors the A (x) axis, `FlipB` the B (y) axis.
impl From<MirrorState> for Mirroring {
    fn from(value: MirrorState) -> Self {
        match value {
            MirrorState::None => (false, false).into(),
            MirrorState::FlipA => (true, false).into(),
            MirrorState::FlipB => (false, true).into(),
            MirrorState::FlipAB => (true, true).into(),
        }
    }
}

impl Mirroring {
    /// Scale factors that apply this mirroring.
    pub fn as_f64(&self) -> [f64; 2] {
        [
            if self.x { -1.0 } else { 1.0 },
            if self.y { -1.0 } else { 1.0 },
        ]
    }
}
