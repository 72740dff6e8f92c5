use getset::CopyGetters;

use super::Block;

/// Axis-aligned pixel rectangle, half-open on the right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[inline]
    pub const fn from_origin(left: f64, top: f64, size: f64) -> Self {
        Self {
            left,
            top,
            right: left + size,
            bottom: top + size,
        }
    }

    #[inline]
    pub const fn shifted(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// Fixed-cell occupancy grid over the playfield. Dimensions never change for
/// the lifetime of a grid; a viewport resize replaces the grid wholesale.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
pub struct Grid {
    #[getset(get_copy = "pub")]
    left: f64,
    #[getset(get_copy = "pub")]
    top: f64,
    #[getset(get_copy = "pub")]
    width: f64,
    #[getset(get_copy = "pub")]
    height: f64,
    #[getset(get_copy = "pub")]
    cell: f64,
    #[getset(get_copy = "pub")]
    cols: usize,
    #[getset(get_copy = "pub")]
    rows: usize,
    cells: Vec<Option<char>>,
}

impl Grid {
    pub fn new(left: f64, top: f64, width: f64, height: f64, cell: f64) -> Self {
        debug_assert!(cell > 0.0);
        let cols = (width / cell).floor() as usize;
        let rows = (height / cell).floor() as usize;
        Self {
            left,
            top,
            width,
            height,
            cell,
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    #[inline]
    pub fn glyph_at(&self, row: usize, col: usize) -> Option<char> {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    /// All occupied cells as `(row, col, glyph)`.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|ch| (i / self.cols, i % self.cols, ch)))
    }

    /// Whether a rect may occupy its position: fully inside the horizontal
    /// bounds, not past the grid bottom, and overlapping no occupied cell.
    /// A rect past the bottom is always rejected; the caller treats that as
    /// "must settle", not as a blocked sideways move.
    pub fn can_place(&self, rect: Rect) -> bool {
        if rect.left < self.left || rect.right > self.left + self.width {
            return false;
        }
        if rect.bottom > self.top + self.height {
            return false;
        }
        let (c0, c1) = self.col_span(rect.left, rect.right);
        let (r0, r1) = self.row_span(rect.top, rect.bottom);
        for r in r0..=r1 {
            for c in c0..=c1 {
                if self.cells[r * self.cols + c].is_some() {
                    return false;
                }
            }
        }
        true
    }

    /// Write a settled block into the grid, clamping its coordinates into the
    /// valid cell range. Overwrites on repeat. Returns the landing cell.
    pub fn settle(&mut self, block: &Block) -> (usize, usize) {
        let col = self.clamp_col(((block.position.x - self.left) / self.cell).floor() as isize);
        let row = self.clamp_row(((block.position.y - self.top) / self.cell).floor() as isize);
        self.cells[row * self.cols + col] = Some(block.glyph());
        (row, col)
    }

    /// Loss condition: any occupied cell in the second row from the top
    /// (the top row itself when the grid has fewer than two rows).
    pub fn is_near_top(&self) -> bool {
        if self.rows == 0 {
            return false;
        }
        let row = if self.rows < 2 { 0 } else { 1 };
        (0..self.cols).any(|c| self.cells[row * self.cols + c].is_some())
    }

    /// Column range covered by a horizontal pixel span, half-open on the
    /// right, clamped into the grid.
    pub(super) fn col_span(&self, left: f64, right: f64) -> (usize, usize) {
        let c0 = self.clamp_col(((left - self.left) / self.cell).floor() as isize);
        let c1 = self.clamp_col(((right - 1.0 - self.left) / self.cell).floor() as isize);
        (c0, c1)
    }

    fn row_span(&self, top: f64, bottom: f64) -> (usize, usize) {
        let r0 = self.clamp_row(((top - self.top) / self.cell).floor() as isize);
        let r1 = self.clamp_row(((bottom - 1.0 - self.top) / self.cell).floor() as isize);
        (r0, r1)
    }

    pub(super) fn row_occupied(&self, row: usize, c0: usize, c1: usize) -> bool {
        row < self.rows && (c0..=c1.min(self.cols - 1)).any(|c| self.cells[row * self.cols + c].is_some())
    }

    /// Index of the row whose vertical span contains `y`, unclamped.
    pub(super) fn row_of(&self, y: f64) -> isize {
        ((y - self.top) / self.cell).floor() as isize
    }

    pub(super) fn clamp_row(&self, row: isize) -> usize {
        row.clamp(0, self.rows as isize - 1) as usize
    }

    fn clamp_col(&self, col: isize) -> usize {
        col.clamp(0, self.cols as isize - 1) as usize
    }

    #[cfg(test)]
    pub(super) fn occupy(&mut self, row: usize, col: usize, glyph: char) {
        self.cells[row * self.cols + col] = Some(glyph);
    }
}

#[cfg(test)]
mod test {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    const CELL: f64 = 10.0;

    #[inline]
    fn grid() -> Grid {
        // 8 columns by 10 rows
        Grid::new(20.0, 0.0, 80.0, 100.0, CELL)
    }

    #[inline]
    fn cell_rect(g: &Grid, row: usize, col: usize) -> Rect {
        Rect::from_origin(g.left() + col as f64 * CELL, g.top() + row as f64 * CELL, CELL)
    }

    #[inline]
    fn block_at(g: &Grid, row: usize, col: usize, glyph: char) -> Block {
        Block::new(
            0,
            glyph,
            g.left() + col as f64 * CELL,
            g.top() + row as f64 * CELL,
            CELL,
            0,
        )
    }

    #[test]
    fn dimensions() {
        let g = grid();
        assert_eq!(g.cols(), 8);
        assert_eq!(g.rows(), 10);
        assert_eq!(g.occupied_cells().count(), 0);
    }

    #[test]
    fn bounds() {
        let g = grid();
        assert!(g.can_place(cell_rect(&g, 0, 0)));
        assert!(g.can_place(cell_rect(&g, 9, 7)));
        // out the left edge
        assert!(!g.can_place(cell_rect(&g, 0, 0).shifted(-1.0, 0.0)));
        // out the right edge
        assert!(!g.can_place(cell_rect(&g, 0, 7).shifted(1.0, 0.0)));
        // past the bottom is always rejected
        assert!(!g.can_place(cell_rect(&g, 9, 0).shifted(0.0, 1.0)));
        // sticking out the top is fine, pieces spawn there
        assert!(g.can_place(cell_rect(&g, 0, 3).shifted(0.0, -5.0)));
    }

    #[test]
    fn occupancy() {
        let mut g = grid();
        g.occupy(5, 3, '日');
        assert!(!g.can_place(cell_rect(&g, 5, 3)));
        // a mid-cell rect overlaps two rows of the footprint
        assert!(!g.can_place(cell_rect(&g, 4, 3).shifted(0.0, 5.0)));
        assert!(g.can_place(cell_rect(&g, 4, 3)));
        assert!(g.can_place(cell_rect(&g, 5, 4)));
        assert_eq!(g.glyph_at(5, 3), Some('日'));
        assert_eq!(g.occupied_cells().collect::<Vec<_>>(), vec![(5, 3, '日')]);
    }

    #[test]
    fn settle_clamps() {
        let mut g = grid();
        let far = Block::new(0, '月', 1_000.0, 1_000.0, CELL, 0);
        assert_eq!(g.settle(&far), (9, 7));
        let near = Block::new(1, '水', -1_000.0, -1_000.0, CELL, 0);
        assert_eq!(g.settle(&near), (0, 0));
        // overwrite is allowed
        assert_eq!(g.settle(&Block::new(2, '火', -1_000.0, -1_000.0, CELL, 0)), (0, 0));
        assert_eq!(g.glyph_at(0, 0), Some('火'));
    }

    #[test]
    fn near_top() {
        let mut g = grid();
        assert!(!g.is_near_top());
        g.occupy(2, 0, '一');
        assert!(!g.is_near_top());
        g.occupy(1, 5, '二');
        assert!(g.is_near_top());

        // single-row grid checks its only row
        let mut short = Grid::new(0.0, 0.0, 40.0, 10.0, CELL);
        assert_eq!(short.rows(), 1);
        assert!(!short.is_near_top());
        short.occupy(0, 2, '三');
        assert!(short.is_near_top());
    }

    #[test]
    fn clear_empties() {
        let mut g = grid();
        g.occupy(1, 1, '山');
        g.occupy(9, 7, '川');
        g.clear();
        assert!(!g.is_near_top());
        assert_eq!(g.occupied_cells().count(), 0);
        assert!(g.can_place(cell_rect(&g, 1, 1)));
    }

    #[quickcheck]
    fn occupied_footprint_rejected(row: u8, col: u8, reject_row: u8, reject_col: u8) -> TestResult {
        let mut g = grid();
        let (row, col) = (row as usize % g.rows(), col as usize % g.cols());
        let (tr, tc) = (reject_row as usize % g.rows(), reject_col as usize % g.cols());
        g.occupy(row, col, '口');
        let rect = cell_rect(&g, tr, tc);
        if tr == row && tc == col {
            TestResult::from_bool(!g.can_place(rect))
        } else {
            // cell-aligned rects over empty cells are always accepted
            TestResult::from_bool(g.can_place(rect))
        }
    }

    #[quickcheck]
    fn settle_then_can_place_is_false(row: u8, col: u8) -> bool {
        let mut g = grid();
        let (row, col) = (row as usize % g.rows(), col as usize % g.cols());
        let block = block_at(&g, row, col, '田');
        let (r, c) = g.settle(&block);
        (r, c) == (row, col) && !g.can_place(block.rect())
    }
}
