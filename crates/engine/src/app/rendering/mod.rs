mod draw_list;
mod renderer;
mod transform;

pub use draw_list::{DrawList, Placeholder, PlaceholderShape, QuadDraw};
pub use renderer::{Renderer, ResourceLoadFailure};
pub use transform::IsoProjection;
