//! shimmer-paint: the paint vocabulary shared between the shimmer core and its host.
//!
//! The host backend owns rasterization; this crate only describes what to draw
//! (rects, gradient brushes, blend layers) and can flatten that description into
//! plain vertex data.

mod color;
mod display_list;
mod error;
mod painter;
mod scene;
mod upload;

pub use display_list::*;
pub use error::{PaintError, Result};
pub use painter::*;
pub use scene::*;
pub use upload::*;
