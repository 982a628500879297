use tessera_math::{v2i, Rect, Vec2i};

use crate::GeometryError;

/// Cyclic frame state over a `cols x rows` grid of equally sized cells.
///
/// The grid's `(0, 0)` cell sits `tile_offset` cells from the texture origin,
/// so the frame rectangle of cell `(col, row)` is
/// `((col + ox) * col_w, (row + oy) * row_h, col_w, row_h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    cols: u32,
    rows: u32,
    col_w: u32,
    row_h: u32,
    col: u32,
    row: u32,
    tile_offset: Vec2i,
    frame: Rect,
}

impl Animation {
    /// `origin` is the pixel position of the grid's first cell. It is
    /// snapped down to a whole number of cells.
    pub fn new(
        cols: u32,
        rows: u32,
        col_w: u32,
        row_h: u32,
        col: u32,
        row: u32,
        origin: Vec2i,
    ) -> Result<Self, GeometryError> {
        if cols == 0 || rows == 0 || col_w == 0 || row_h == 0 {
            return Err(GeometryError::EmptyAnimationGrid {
                cols,
                rows,
                col_w,
                row_h,
            });
        }

        if col >= cols || row >= rows {
            return Err(GeometryError::FrameOutsideGrid {
                col,
                row,
                cols,
                rows,
            });
        }

        let tile_offset = v2i(
            origin.x.div_euclid(col_w as i32),
            origin.y.div_euclid(row_h as i32),
        );

        let mut animation = Self {
            cols,
            rows,
            col_w,
            row_h,
            col,
            row,
            tile_offset,
            frame: Rect::new(0, 0, col_w as i32, row_h as i32)?,
        };
        animation.frame.set_topleft(animation.cell_origin(col, row));

        Ok(animation)
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> (u32, u32) {
        (self.col_w, self.row_h)
    }

    /// Current `(col, row)`.
    pub fn frame(&self) -> (u32, u32) {
        (self.col, self.row)
    }

    pub fn tile_offset(&self) -> Vec2i {
        self.tile_offset
    }

    pub fn frame_rect(&self) -> Rect {
        self.frame
    }

    /// Pixel extent of the whole grid.
    pub fn grid_rect(&self) -> Rect {
        let w = self.cols * self.col_w;
        let h = self.rows * self.row_h;
        let x = self.tile_offset.x * self.col_w as i32;
        let y = self.tile_offset.y * self.row_h as i32;

        Rect::new(x, y, w as i32, h as i32).unwrap_or_default()
    }

    /// Moves by `(dcol, drow)` cells, wrapping on both axes.
    ///
    /// Returns `false` without touching any state when both deltas are zero.
    pub fn step(&mut self, dcol: i32, drow: i32) -> bool {
        if dcol == 0 && drow == 0 {
            return false;
        }

        self.col = (self.col as i64 + dcol as i64).rem_euclid(self.cols as i64) as u32;
        self.row = (self.row as i64 + drow as i64).rem_euclid(self.rows as i64) as u32;
        self.frame.set_topleft(self.cell_origin(self.col, self.row));

        true
    }

    fn cell_origin(&self, col: u32, row: u32) -> Vec2i {
        v2i(
            (col as i32 + self.tile_offset.x) * self.col_w as i32,
            (row as i32 + self.tile_offset.y) * self.row_h as i32,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn walk_cycle() -> Animation {
        Animation::new(10, 2, 32, 48, 0, 0, v2i(64, 96)).unwrap()
    }

    #[test]
    fn frame_rect_includes_tile_offset() {
        let animation = walk_cycle();
        assert_eq!(v2i(2, 2), animation.tile_offset());
        assert_eq!(Rect::new(64, 96, 32, 48).unwrap(), animation.frame_rect());
        assert_eq!(Rect::new(64, 96, 320, 96).unwrap(), animation.grid_rect());
    }

    #[test]
    fn stepping_wraps_in_both_directions() {
        let mut animation = walk_cycle();

        assert!(animation.step(-1, 3));
        assert_eq!((9, 1), animation.frame());
        assert_eq!(
            Rect::new((9 + 2) * 32, (1 + 2) * 48, 32, 48).unwrap(),
            animation.frame_rect()
        );

        animation.step(25, -4);
        assert_eq!((4, 1), animation.frame());
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let mut animation = walk_cycle();
        animation.step(3, 1);
        let start = animation;

        for _ in 0..animation.cols() {
            animation.step(1, 0);
        }

        assert_eq!(start, animation);
    }

    #[test]
    fn zero_step_is_a_no_op() {
        let mut animation = walk_cycle();
        animation.step(2, 1);
        let before = animation;

        assert!(!animation.step(0, 0));
        assert!(!animation.step(0, 0));
        assert_eq!(before, animation);
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(
            Animation::new(0, 1, 8, 8, 0, 0, Vec2i::ZERO),
            Err(GeometryError::EmptyAnimationGrid { .. })
        ));
        assert!(matches!(
            Animation::new(4, 1, 8, 0, 0, 0, Vec2i::ZERO),
            Err(GeometryError::EmptyAnimationGrid { .. })
        ));
    }

    #[test]
    fn starting_frame_must_be_inside_grid() {
        assert_eq!(
            Err(GeometryError::FrameOutsideGrid {
                col: 4,
                row: 0,
                cols: 4,
                rows: 1
            }),
            Animation::new(4, 1, 8, 8, 4, 0, Vec2i::ZERO)
        );
    }
}
