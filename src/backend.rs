//! Surface implementations for concrete raster targets.

mod pixmap;

pub use pixmap::*;
