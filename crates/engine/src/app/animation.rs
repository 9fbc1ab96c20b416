use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteAnimator {
    row: u32,
    frame: u32,
    total_rows: u32,
    total_frames: u32,
    last_advance: Duration,
}

impl SpriteAnimator {
    pub fn new(total_rows: u32, total_frames: u32) -> Self {
        Self {
            row: 0,
            frame: 0,
            total_rows: total_rows.max(1),
            total_frames: total_frames.max(1),
            last_advance: Duration::ZERO,
        }
    }

    pub fn starting_at(mut self, now: Duration) -> Self {
        self.last_advance = now;
        self
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn last_advance(&self) -> Duration {
        self.last_advance
    }

    pub fn uv_extent(&self) -> (f32, f32) {
        (
            1.0 / self.total_frames as f32,
            1.0 / self.total_rows as f32,
        )
    }

    pub fn atlas_offset(&self) -> (f32, f32) {
        let (ds, dt) = self.uv_extent();
        (self.frame as f32 * ds, self.row as f32 * dt)
    }

    pub fn set_row(&mut self, row: u32) {
        self.row = row.min(self.total_rows - 1);
    }

    /// Wall-clock mode. Advances one frame once strictly more than `cadence`
    /// has passed since the previous advance. Returns whether it advanced.
    pub fn advance_on_tick(&mut self, now: Duration, cadence: Duration) -> bool {
        if now.saturating_sub(self.last_advance) <= cadence {
            return false;
        }
        self.frame = (self.frame + 1) % self.total_frames;
        self.last_advance = now;
        true
    }

    pub fn advance_on_step(&mut self, same_row: bool) {
        if same_row {
            self.frame = (self.frame + 1) % self.total_frames;
        } else {
            self.frame = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CADENCE: Duration = Duration::from_millis(100);

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn atlas_offset_selects_frame_column_and_row() {
        let mut animator = SpriteAnimator::new(4, 6);
        animator.set_row(2);
        animator.advance_on_step(true);
        animator.advance_on_step(true);
        animator.advance_on_step(true);

        let (s, t) = animator.atlas_offset();
        assert!(approx_eq(s, 3.0 / 6.0), "s={s}");
        assert!(approx_eq(t, 2.0 / 4.0), "t={t}");
        let (ds, dt) = animator.uv_extent();
        assert!(approx_eq(ds, 1.0 / 6.0));
        assert!(approx_eq(dt, 0.25));
    }

    #[test]
    fn tick_cycle_returns_to_first_frame() {
        let mut animator = SpriteAnimator::new(1, 10);
        let mut now = Duration::ZERO;
        for _ in 0..animator.total_frames() {
            now += CADENCE + Duration::from_millis(1);
            assert!(animator.advance_on_tick(now, CADENCE));
        }
        assert_eq!(animator.frame(), 0);
    }

    #[test]
    fn tick_requires_strictly_more_than_cadence() {
        let mut animator = SpriteAnimator::new(1, 5).starting_at(Duration::from_secs(1));

        assert!(!animator.advance_on_tick(Duration::from_secs(1) + CADENCE, CADENCE));
        assert_eq!(animator.frame(), 0);

        let later = Duration::from_secs(1) + CADENCE + Duration::from_millis(1);
        assert!(animator.advance_on_tick(later, CADENCE));
        assert_eq!(animator.frame(), 1);
        assert_eq!(animator.last_advance(), later);

        // Timer restarts from the advance, so an immediate re-poll is a no-op.
        assert!(!animator.advance_on_tick(later, CADENCE));
        assert_eq!(animator.frame(), 1);
    }

    #[test]
    fn clock_going_backwards_does_not_advance() {
        let mut animator = SpriteAnimator::new(1, 5).starting_at(Duration::from_secs(5));
        assert!(!animator.advance_on_tick(Duration::from_secs(1), CADENCE));
        assert_eq!(animator.frame(), 0);
    }

    #[test]
    fn step_on_same_row_cycles_frames() {
        let mut animator = SpriteAnimator::new(4, 3);
        animator.advance_on_step(true);
        animator.advance_on_step(true);
        assert_eq!(animator.frame(), 2);
        animator.advance_on_step(true);
        assert_eq!(animator.frame(), 0);
    }

    #[test]
    fn step_after_row_change_always_resets_frame() {
        for steps_before in 0..6 {
            let mut animator = SpriteAnimator::new(4, 6);
            for _ in 0..steps_before {
                animator.advance_on_step(true);
            }
            animator.set_row(3);
            animator.advance_on_step(false);
            assert_eq!(animator.frame(), 0, "steps_before={steps_before}");
            assert_eq!(animator.row(), 3);
        }
    }

    #[test]
    fn set_row_clamps_to_last_row() {
        let mut animator = SpriteAnimator::new(4, 6);
        animator.set_row(9);
        assert_eq!(animator.row(), 3);
    }

    #[test]
    fn zero_sized_sheet_is_treated_as_single_cell() {
        let mut animator = SpriteAnimator::new(0, 0);
        assert_eq!(animator.total_rows(), 1);
        assert_eq!(animator.total_frames(), 1);
        animator.advance_on_step(true);
        assert_eq!(animator.frame(), 0);
        assert_eq!(animator.atlas_offset(), (0.0, 0.0));
    }
}
