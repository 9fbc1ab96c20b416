use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::input::InputEvent;
use super::rendering::DrawList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

pub trait Scene {
    fn load(&mut self, now: Duration);
    fn handle_input(&mut self, event: InputEvent) -> SceneCommand;
    fn update(&mut self, now: Duration);
    fn render(&self, draw_list: &mut DrawList);
    fn unload(&mut self) {}
    fn window_title(&self) -> Option<String> {
        None
    }
}
