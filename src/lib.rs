mod config;
mod error;
pub mod geometry;
mod image;
mod macros;
mod net;
mod painter;
mod renderer;
mod spacial;
mod surface;
mod transform_stack;
mod types;

#[cfg(feature = "tiny-skia")]
pub mod backend;

pub use config::*;
pub use error::*;
pub use image::*;
pub use macros::*;
pub use net::*;
pub use painter::*;
pub use renderer::*;
pub use spacial::{point_on_ellipse, Position, ToVector, Vector};
pub use surface::*;
pub use transform_stack::*;
pub use types::*;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
