use engine::{GridPos, Placeholder, PlaceholderShape, QuadDraw, SpriteAnimator, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameStatus {
    Playing,
    Won,
    Quit,
}

impl GameStatus {
    pub(crate) fn is_finished(self) -> bool {
        self != GameStatus::Playing
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AnimatedEntity {
    pub(crate) anchor_px: Vec2,
    pub(crate) size_px: Vec2,
    pub(crate) draw_lift_px: f32,
    pub(crate) sprite_key: String,
    pub(crate) animator: SpriteAnimator,
}

impl AnimatedEntity {
    pub(crate) fn quad(&self, placeholder_color: [u8; 4]) -> QuadDraw {
        QuadDraw {
            sprite_key: self.sprite_key.clone(),
            center: Vec2::new(self.anchor_px.x, self.anchor_px.y - self.draw_lift_px),
            size: self.size_px,
            uv_offset: self.animator.atlas_offset(),
            uv_extent: self.animator.uv_extent(),
            placeholder: Placeholder {
                shape: PlaceholderShape::Rect,
                color: placeholder_color,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub(crate) cell: GridPos,
    pub(crate) entity: AnimatedEntity,
}

#[derive(Debug, Clone)]
pub(crate) struct Coin {
    pub(crate) cell: GridPos,
    pub(crate) entity: AnimatedEntity,
    pub(crate) collected: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Flag {
    pub(crate) cell: GridPos,
    pub(crate) entity: AnimatedEntity,
    pub(crate) reached: bool,
}
