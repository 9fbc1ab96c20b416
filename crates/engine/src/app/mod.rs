mod animation;
mod input;
mod loop_runner;
mod rendering;
mod scene;

pub use animation::SpriteAnimator;
pub use input::{InputAction, InputEvent, KeyActionKind};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    DrawList, IsoProjection, Placeholder, PlaceholderShape, QuadDraw, Renderer,
    ResourceLoadFailure,
};
pub use scene::{Scene, SceneCommand, Vec2};
