use std::time::Duration;

use engine::{
    DrawList, GridPos, InputEvent, Placeholder, PlaceholderShape, QuadDraw, Scene, SceneCommand,
};
use tracing::info;

use super::state::GameState;
use super::types::GameStatus;

const WALKABLE_TILE_COLOR: [u8; 4] = [64, 128, 72, 255];
const BLOCKED_TILE_COLOR: [u8; 4] = [92, 88, 104, 255];
const CURSOR_COLOR: [u8; 4] = [236, 214, 96, 255];
const COIN_COLOR: [u8; 4] = [250, 200, 40, 255];
const FLAG_COLOR: [u8; 4] = [220, 60, 60, 255];
const PLAYER_COLOR: [u8; 4] = [70, 130, 230, 255];

#[derive(Debug)]
pub(crate) struct GameplayScene {
    title: String,
    cursor_tile: u32,
    state: GameState,
}

impl GameplayScene {
    pub(crate) fn new(title: impl Into<String>, cursor_tile: u32, state: GameState) -> Self {
        Self {
            title: title.into(),
            cursor_tile,
            state,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    fn tile_quad(&self, cell: GridPos, tile_index: u32) -> Option<QuadDraw> {
        let map = &self.state.map;
        let tile = map.tile_type(tile_index)?;
        let columns = map.tile_count().max(1) as f32;
        let color = if tile.walkable {
            WALKABLE_TILE_COLOR
        } else {
            BLOCKED_TILE_COLOR
        };
        Some(QuadDraw {
            sprite_key: map.tileset_key().to_string(),
            center: self.state.layout.project(cell),
            size: self.state.layout.tile_size(),
            uv_offset: (tile.atlas_column as f32 / columns, 0.0),
            uv_extent: (1.0 / columns, 1.0),
            placeholder: Placeholder {
                shape: PlaceholderShape::Diamond,
                color,
            },
        })
    }
}

impl Scene for GameplayScene {
    fn load(&mut self, now: Duration) {
        self.state.start_clock(now);
        info!(
            width = self.state.map.width(),
            height = self.state.map.height(),
            coins = self.state.coins_total(),
            "gameplay_loaded"
        );
    }

    fn handle_input(&mut self, event: InputEvent) -> SceneCommand {
        self.state.process_input(event);
        if self.state.status.is_finished() {
            SceneCommand::Quit
        } else {
            SceneCommand::None
        }
    }

    fn update(&mut self, now: Duration) {
        self.state.tick_animations(now);
    }

    fn render(&self, draw_list: &mut DrawList) {
        let state = &self.state;
        for (cell, tile) in state.map.cells() {
            if let Some(quad) = self.tile_quad(cell, tile.index) {
                draw_list.push(quad);
            }
        }

        if let Some(mut cursor) = self.tile_quad(state.player.cell, self.cursor_tile) {
            cursor.placeholder.color = CURSOR_COLOR;
            draw_list.push(cursor);
        }

        for coin in state.coins.iter().filter(|coin| !coin.collected) {
            draw_list.push(coin.entity.quad(COIN_COLOR));
        }
        if !state.flag.reached {
            draw_list.push(state.flag.entity.quad(FLAG_COLOR));
        }
        draw_list.push(state.player.entity.quad(PLAYER_COLOR));
    }

    fn unload(&mut self) {
        let outcome = match self.state.status {
            GameStatus::Playing => "abandoned",
            GameStatus::Won => "won",
            GameStatus::Quit => "quit",
        };
        info!(
            outcome,
            collected = self.state.coins_collected(),
            total = self.state.coins_total(),
            "gameplay_unloaded"
        );
    }

    fn window_title(&self) -> Option<String> {
        Some(format!(
            "{} | coins {}/{}",
            self.title,
            self.state.coins_collected(),
            self.state.coins_total()
        ))
    }
}
