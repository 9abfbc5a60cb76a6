pub mod boolean;
mod bounding_box;
mod mirroring;
mod path;
pub mod shapes;
mod transform;

pub use bounding_box::*;
pub use mirroring::*;
pub use path::*;
pub use transform::*;
