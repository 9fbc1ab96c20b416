use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderShape {
    Diamond,
    Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub shape: PlaceholderShape,
    pub color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuadDraw {
    pub sprite_key: String,
    pub center: Vec2,
    pub size: Vec2,
    pub uv_offset: (f32, f32),
    pub uv_extent: (f32, f32),
    pub placeholder: Placeholder,
}

#[derive(Debug, Default)]
pub struct DrawList {
    quads: Vec<QuadDraw>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quad: QuadDraw) {
        self.quads.push(quad);
    }

    pub fn clear(&mut self) {
        self.quads.clear();
    }

    pub fn quads(&self) -> &[QuadDraw] {
        &self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}
