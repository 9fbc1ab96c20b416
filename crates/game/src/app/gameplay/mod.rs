mod collision;
mod movement;
mod scene_impl;
mod state;
mod types;


pub(crate) use scene_impl::GameplayScene;
pub(crate) use state::GameState;
