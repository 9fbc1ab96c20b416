use crate::app::Vec2;
use crate::map::GridPos;

/// `origin` is the screen anchor (diamond centre) of cell `(0, 0)`. Moving one
/// column steps right-down by `(half_width, half_height)`; moving one row
/// steps left-down by `(-half_width, half_height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    pub origin: Vec2,
    pub half_width: f32,
    pub half_height: f32,
}

impl IsoProjection {
    pub fn new(origin: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            origin,
            half_width,
            half_height,
        }
    }

    pub fn for_tile_size(origin: Vec2, tile_width: u32, tile_height: u32) -> Self {
        Self::new(origin, tile_width as f32 / 2.0, tile_height as f32 / 2.0)
    }

    pub fn project(&self, cell: GridPos) -> Vec2 {
        let col = cell.column as f32;
        let row = cell.row as f32;
        Vec2 {
            x: self.origin.x + (col - row) * self.half_width,
            y: self.origin.y + (col + row) * self.half_height,
        }
    }

    pub fn tile_size(&self) -> Vec2 {
        Vec2 {
            x: self.half_width * 2.0,
            y: self.half_height * 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> IsoProjection {
        IsoProjection::for_tile_size(Vec2::new(397.0, 128.5), 114, 57)
    }

    #[test]
    fn origin_cell_maps_to_origin() {
        assert_eq!(projection().project(GridPos::new(0, 0)), Vec2::new(397.0, 128.5));
    }

    #[test]
    fn column_and_row_steps_move_diagonally() {
        let iso = projection();
        assert_eq!(iso.project(GridPos::new(1, 0)), Vec2::new(454.0, 157.0));
        assert_eq!(iso.project(GridPos::new(0, 1)), Vec2::new(340.0, 157.0));
        assert_eq!(iso.project(GridPos::new(2, 2)), Vec2::new(397.0, 242.5));
    }

    #[test]
    fn equal_column_minus_row_share_a_screen_column() {
        let iso = projection();
        let a = iso.project(GridPos::new(3, 1));
        let b = iso.project(GridPos::new(5, 3));
        assert_eq!(a.x, b.x);
        assert!(b.y > a.y);
    }

    #[test]
    fn negative_cells_project_without_panicking() {
        let iso = projection();
        assert_eq!(iso.project(GridPos::new(-1, -1)), Vec2::new(397.0, 71.5));
    }

    #[test]
    fn tile_size_is_twice_the_half_extent() {
        assert_eq!(projection().tile_size(), Vec2::new(114.0, 57.0));
    }
}
