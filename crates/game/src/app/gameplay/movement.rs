use engine::{GridPos, InputAction, IsoProjection, MapGrid};

use super::types::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MoveIntent {
    pub(crate) delta_column: i32,
    pub(crate) delta_row: i32,
    pub(crate) facing_row: u32,
}

impl MoveIntent {
    const fn new(delta_column: i32, delta_row: i32, facing_row: u32) -> Self {
        Self {
            delta_column,
            delta_row,
            facing_row,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveOutcome {
    Moved { from: GridPos, to: GridPos },
    Blocked { candidate: GridPos },
}

pub(crate) fn move_intent(action: InputAction) -> Option<MoveIntent> {
    let intent = match action {
        InputAction::MoveUp => MoveIntent::new(-1, -1, 1),
        InputAction::MoveLeft => MoveIntent::new(-1, 1, 2),
        InputAction::MoveDown => MoveIntent::new(1, 1, 0),
        InputAction::MoveRight => MoveIntent::new(1, -1, 3),
        InputAction::MoveUpLeft => MoveIntent::new(-1, 0, 2),
        InputAction::MoveUpRight => MoveIntent::new(0, -1, 3),
        InputAction::MoveDownLeft => MoveIntent::new(0, 1, 2),
        InputAction::MoveDownRight => MoveIntent::new(1, 0, 3),
        InputAction::Quit => return None,
    };
    Some(intent)
}

pub(crate) fn clamped_candidate(map: &MapGrid, from: GridPos, intent: MoveIntent) -> GridPos {
    let column = from.column + intent.delta_column;
    let row = from.row + intent.delta_row;
    GridPos {
        column: if axis_in_range(column, map.width()) {
            column
        } else {
            from.column
        },
        row: if axis_in_range(row, map.height()) {
            row
        } else {
            from.row
        },
    }
}

fn axis_in_range(value: i32, extent: u32) -> bool {
    value >= 0 && (value as u32) < extent
}

pub(crate) fn resolve_move(
    map: &MapGrid,
    projection: &IsoProjection,
    player: &mut Player,
    intent: MoveIntent,
) -> MoveOutcome {
    let from = player.cell;
    let candidate = clamped_candidate(map, from, intent);
    let walkable = map
        .is_walkable(candidate)
        .unwrap_or_else(|err| panic!("clamped move candidate left the map: {err}"));
    if !walkable {
        return MoveOutcome::Blocked { candidate };
    }

    let animator = &mut player.entity.animator;
    let old_row = animator.row();
    animator.set_row(intent.facing_row);
    let same_row = animator.row() == old_row;
    animator.advance_on_step(same_row);
    player.cell = candidate;
    player.entity.anchor_px = projection.project(candidate);
    MoveOutcome::Moved {
        from,
        to: candidate,
    }
}

#[cfg(test)]
mod tests {
    use engine::{SpriteAnimator, Vec2};

    use super::*;
    use crate::app::gameplay::types::AnimatedEntity;

    fn open_map(width: u32, height: u32) -> MapGrid {
        let row = vec!["0"; width as usize].join(" ");
        let rows = vec![row; height as usize].join("\n");
        MapGrid::load(&format!("tiles/t 2 114 57\n{width} {height}\n{rows}\n")).expect("map")
    }

    fn projection() -> IsoProjection {
        IsoProjection::for_tile_size(Vec2::new(397.0, 128.5), 114, 57)
    }

    fn player_at(cell: GridPos) -> Player {
        Player {
            cell,
            entity: AnimatedEntity {
                anchor_px: projection().project(cell),
                size_px: Vec2::new(114.0, 57.0),
                draw_lift_px: 0.0,
                sprite_key: "sprites/player".to_string(),
                animator: SpriteAnimator::new(4, 6),
            },
        }
    }

    fn step(map: &MapGrid, player: &mut Player, action: InputAction) -> MoveOutcome {
        let intent = move_intent(action).expect("move action");
        resolve_move(map, &projection(), player, intent)
    }

    #[test]
    fn every_move_key_has_its_delta_and_facing_row() {
        let cases = [
            (InputAction::MoveUp, (-1, -1, 1)),
            (InputAction::MoveLeft, (-1, 1, 2)),
            (InputAction::MoveDown, (1, 1, 0)),
            (InputAction::MoveRight, (1, -1, 3)),
            (InputAction::MoveUpLeft, (-1, 0, 2)),
            (InputAction::MoveUpRight, (0, -1, 3)),
            (InputAction::MoveDownLeft, (0, 1, 2)),
            (InputAction::MoveDownRight, (1, 0, 3)),
        ];
        for (action, (dc, dr, facing)) in cases {
            assert_eq!(
                move_intent(action),
                Some(MoveIntent::new(dc, dr, facing)),
                "{action:?}"
            );
        }
        assert_eq!(move_intent(InputAction::Quit), None);
    }

    #[test]
    fn axes_clamp_independently_at_the_edges() {
        let map = open_map(3, 3);
        let up = move_intent(InputAction::MoveUp).expect("up");
        assert_eq!(
            clamped_candidate(&map, GridPos::new(0, 1), up),
            GridPos::new(0, 0)
        );
        let right = move_intent(InputAction::MoveRight).expect("right");
        assert_eq!(
            clamped_candidate(&map, GridPos::new(2, 2), right),
            GridPos::new(2, 1)
        );
        assert_eq!(
            clamped_candidate(&map, GridPos::new(0, 0), up),
            GridPos::new(0, 0)
        );
    }

    #[test]
    fn no_move_sequence_leaves_the_grid() {
        let map = open_map(4, 3);
        let mut player = player_at(GridPos::new(1, 1));
        let actions = [
            InputAction::MoveUp,
            InputAction::MoveUp,
            InputAction::MoveUpLeft,
            InputAction::MoveLeft,
            InputAction::MoveDownLeft,
            InputAction::MoveDown,
            InputAction::MoveDown,
            InputAction::MoveDownRight,
            InputAction::MoveRight,
            InputAction::MoveRight,
            InputAction::MoveUpRight,
            InputAction::MoveDownRight,
        ];
        for _ in 0..5 {
            for action in actions {
                step(&map, &mut player, action);
                assert!(map.contains(player.cell), "{action:?} -> {:?}", player.cell);
            }
        }
    }

    #[test]
    fn blocked_cell_rejects_the_move_atomically() {
        let mut map = MapGrid::load("tiles/t 2 114 57\n2 2\n0 0\n0 1\n").expect("map");
        map.apply_blocked_tiles([1]);
        let mut player = player_at(GridPos::new(0, 0));
        player.entity.animator.set_row(3);
        player.entity.animator.advance_on_step(true);
        let before_anchor = player.entity.anchor_px;

        for _ in 0..2 {
            let outcome = step(&map, &mut player, InputAction::MoveDown);
            assert_eq!(
                outcome,
                MoveOutcome::Blocked {
                    candidate: GridPos::new(1, 1)
                }
            );
            assert_eq!(player.cell, GridPos::new(0, 0));
            assert_eq!(player.entity.animator.row(), 3);
            assert_eq!(player.entity.animator.frame(), 1);
            assert_eq!(player.entity.anchor_px, before_anchor);
        }
    }

    #[test]
    fn accepted_move_updates_anchor_and_step_animation() {
        let map = open_map(5, 5);
        let mut player = player_at(GridPos::new(2, 2));

        step(&map, &mut player, InputAction::MoveDown);
        assert_eq!(player.cell, GridPos::new(3, 3));
        assert_eq!(player.entity.anchor_px, projection().project(GridPos::new(3, 3)));
        assert_eq!(player.entity.animator.row(), 0);
        assert_eq!(player.entity.animator.frame(), 1);

        step(&map, &mut player, InputAction::MoveRight);
        assert_eq!(player.entity.animator.row(), 3);
        assert_eq!(player.entity.animator.frame(), 0);
    }

    #[test]
    fn single_row_sheet_keeps_cycling_frames() {
        let map = open_map(5, 5);
        let mut player = player_at(GridPos::new(0, 2));
        player.entity.animator = SpriteAnimator::new(1, 6);

        for _ in 0..3 {
            step(&map, &mut player, InputAction::MoveDownRight);
        }
        assert_eq!(player.cell, GridPos::new(3, 2));
        assert_eq!(player.entity.animator.row(), 0);
        assert_eq!(player.entity.animator.frame(), 3);
    }

    #[test]
    fn pressing_into_a_corner_still_counts_as_a_step() {
        let map = open_map(3, 3);
        let mut player = player_at(GridPos::new(0, 0));
        player.entity.animator.set_row(1);

        let outcome = step(&map, &mut player, InputAction::MoveUp);
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: GridPos::new(0, 0),
                to: GridPos::new(0, 0)
            }
        );
        assert_eq!(player.entity.animator.frame(), 1);
    }
}
