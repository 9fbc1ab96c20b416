use std::time::Duration;

use engine::{GridPos, InputAction, InputEvent, IsoProjection, MapGrid, SpriteAnimator};
use tracing::{debug, info};

use super::collision::{resolve_collisions, PickupRadii};
use super::movement::{move_intent, resolve_move, MoveOutcome};
use super::types::{AnimatedEntity, Coin, Flag, GameStatus, Player};
use crate::app::level::{LevelConfig, LevelError, SpriteSheetConfig};

#[derive(Debug, Clone)]
pub(crate) struct GameState {
    pub(crate) map: MapGrid,
    pub(crate) layout: IsoProjection,
    pub(crate) player: Player,
    pub(crate) coins: Vec<Coin>,
    pub(crate) flag: Flag,
    pub(crate) status: GameStatus,
    radii: PickupRadii,
    cadence: Duration,
}

impl GameState {
    pub(crate) fn new(map: MapGrid, level: &LevelConfig) -> Result<Self, LevelError> {
        level.validate_against(&map)?;
        let layout = IsoProjection::for_tile_size(level.origin, map.tile_width(), map.tile_height());
        let spawn = |cell: GridPos, sheet: &SpriteSheetConfig| AnimatedEntity {
            anchor_px: layout.project(cell),
            size_px: sheet.size_px(map.tile_width(), map.tile_height()),
            draw_lift_px: sheet.draw_lift_px,
            sprite_key: sheet.sprite_key.clone(),
            animator: SpriteAnimator::new(sheet.rows, sheet.frames),
        };

        let player = Player {
            cell: level.player_start,
            entity: spawn(level.player_start, &level.player_sprite),
        };
        let coins = level
            .coins
            .iter()
            .map(|&cell| Coin {
                cell,
                entity: spawn(cell, &level.coin_sprite),
                collected: false,
            })
            .collect();
        let flag_cell = level.flag_cell(&map);
        let flag = Flag {
            cell: flag_cell,
            entity: spawn(flag_cell, &level.flag_sprite),
            reached: false,
        };

        Ok(Self {
            map,
            layout,
            player,
            coins,
            flag,
            status: GameStatus::Playing,
            radii: PickupRadii {
                coin_px: level.coin_pickup_radius_px,
                flag_px: level.flag_reach_radius_px,
            },
            cadence: level.animation_cadence(),
        })
    }

    pub(crate) fn coins_collected(&self) -> usize {
        self.coins.iter().filter(|coin| coin.collected).count()
    }

    pub(crate) fn coins_total(&self) -> usize {
        self.coins.len()
    }

    pub(crate) fn start_clock(&mut self, now: Duration) {
        for coin in &mut self.coins {
            coin.entity.animator = coin.entity.animator.starting_at(now);
        }
        self.flag.entity.animator = self.flag.entity.animator.starting_at(now);
    }

    /// Handles one key event to completion: movement, then pickups. Only
    /// presses count, and nothing is processed once the game has ended.
    pub(crate) fn process_input(&mut self, event: InputEvent) {
        if !event.is_press() || self.status.is_finished() {
            return;
        }
        if event.action == InputAction::Quit {
            self.status = GameStatus::Quit;
            return;
        }
        let Some(intent) = move_intent(event.action) else {
            return;
        };

        match resolve_move(&self.map, &self.layout, &mut self.player, intent) {
            MoveOutcome::Moved { from, to } => {
                debug!(
                    from_column = from.column,
                    from_row = from.row,
                    to_column = to.column,
                    to_row = to.row,
                    "player_moved"
                );
            }
            MoveOutcome::Blocked { candidate } => {
                debug!(
                    column = candidate.column,
                    row = candidate.row,
                    "move_blocked"
                );
            }
        }
        self.check_pickups();
        info!(
            column = self.player.cell.column,
            row = self.player.cell.row,
            "player_cell"
        );
    }

    pub(crate) fn tick_animations(&mut self, now: Duration) {
        for coin in self.coins.iter_mut().filter(|coin| !coin.collected) {
            coin.entity.animator.advance_on_tick(now, self.cadence);
        }
        if !self.flag.reached {
            self.flag.entity.animator.advance_on_tick(now, self.cadence);
        }
    }

    fn check_pickups(&mut self) {
        let player_px = self.layout.project(self.player.cell);
        let report = resolve_collisions(player_px, &mut self.coins, &mut self.flag, self.radii);
        for index in report.collected_coins {
            let cell = self.coins[index].cell;
            info!(
                column = cell.column,
                row = cell.row,
                collected = self.coins_collected(),
                total = self.coins_total(),
                "coin_collected"
            );
        }
        if report.flag_reached {
            self.status = GameStatus::Won;
            info!(
                collected = self.coins_collected(),
                total = self.coins_total(),
                "flag_reached"
            );
        }
    }
}
