//! Board module - the fixed 10x20 grid of locked cells
//!
//! Row 0 is the top, row `BOARD_HEIGHT - 1` the bottom. The board is a plain `Copy`
//! array, so every transition edits its own copy and the previous state is never
//! touched. Dimensions never change: removing rows always prepends the same number
//! of empty rows.

use arrayvec::ArrayVec;

use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// One board row
pub type Row = [Cell; BOARD_WIDTH];

/// A fresh all-empty row.
pub const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// `n` fresh empty rows (capped at the board height).
pub fn empty_rows(n: usize) -> ArrayVec<Row, BOARD_HEIGHT> {
    (0..n.min(BOARD_HEIGHT)).map(|_| EMPTY_ROW).collect()
}

/// An all-empty board.
pub fn empty_board() -> Board {
    Board::new()
}

/// The game board - 20 rows of 10 cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    #[inline(always)]
    fn in_bounds(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_HEIGHT as i32 && col >= 0 && col < BOARD_WIDTH as i32
    }

    /// Cell at `(row, col)`, `None` when out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        Self::in_bounds(row, col).then(|| self.rows[row as usize][col as usize])
    }

    /// Set cell at `(row, col)`. Returns false if out of bounds.
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if !Self::in_bounds(row, col) {
            return false;
        }
        self.rows[row as usize][col as usize] = cell;
        true
    }

    /// In bounds and filled. Out-of-bounds positions never count as filled.
    pub fn is_filled(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(Cell::Filled))
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        row < BOARD_HEIGHT && self.rows[row].iter().all(|c| c.is_filled())
    }

    /// Whether any cell of the row is filled
    pub fn row_has_block(&self, row: usize) -> bool {
        row < BOARD_HEIGHT && self.rows[row].iter().any(|c| c.is_filled())
    }

    /// Indices of full rows, top to bottom
    pub fn full_rows(&self) -> ArrayVec<usize, BOARD_HEIGHT> {
        (0..BOARD_HEIGHT).filter(|&r| self.is_row_full(r)).collect()
    }

    /// Remove the given rows and prepend as many empty rows at the top.
    ///
    /// The remaining rows keep their relative order. Indices out of range or listed
    /// twice are ignored. Returns the number of rows removed.
    pub fn remove_rows(&mut self, indices: &[usize]) -> usize {
        let mut doomed = [false; BOARD_HEIGHT];
        for &i in indices {
            if i < BOARD_HEIGHT {
                doomed[i] = true;
            }
        }

        let kept: ArrayVec<Row, BOARD_HEIGHT> = self
            .rows
            .iter()
            .zip(doomed)
            .filter_map(|(row, gone)| (!gone).then_some(*row))
            .collect();
        let removed = BOARD_HEIGHT - kept.len();

        for (dst, src) in self
            .rows
            .iter_mut()
            .zip(empty_rows(removed).into_iter().chain(kept))
        {
            *dst = src;
        }
        removed
    }

    /// Remove every full row. Returns how many were cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let full = self.full_rows();
        self.remove_rows(&full)
    }

    /// Remove the bottom row.
    pub fn drop_bottom_row(&mut self) {
        self.remove_rows(&[BOARD_HEIGHT - 1]);
    }

    /// Build from rows of `0`/non-zero values, aligned to the bottom of the board.
    ///
    /// Missing rows at the top are empty; extra rows and columns are ignored.
    pub fn from_bottom_rows(rows: &[&[u8]]) -> Self {
        let mut board = Self::new();
        let take = rows.len().min(BOARD_HEIGHT);
        let first = BOARD_HEIGHT - take;
        for (i, src) in rows[rows.len() - take..].iter().enumerate() {
            for (c, &v) in src.iter().take(BOARD_WIDTH).enumerate() {
                board.rows[first + i][c] = Cell::from(v != 0);
            }
        }
        board
    }

    pub fn filled_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_filled()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(0, 0), Some(Cell::Empty));
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, 10), None);
        assert_eq!(board.get(20, 0), None);
        assert!(!board.set(20, 0, Cell::Filled));
        assert!(board.set(19, 9, Cell::Filled));
        assert!(board.is_filled(19, 9));
        assert!(!board.is_filled(19, 10));
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(empty_rows(0).len(), 0);
        assert_eq!(empty_rows(3).len(), 3);
        assert!(empty_rows(3).iter().flatten().all(|c| c.is_empty()));
        assert_eq!(empty_rows(50).len(), BOARD_HEIGHT);
    }

    #[test]
    fn test_remove_rows_keeps_order_and_height() {
        let mut board = Board::from_bottom_rows(&[
            &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            &[0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
            &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ]);
        assert_eq!(board.full_rows().as_slice(), &[17, 19]);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.rows().len(), BOARD_HEIGHT);
        assert!(board.is_filled(18, 0));
        assert!(board.is_filled(19, 1));
        assert!(!board.row_has_block(0));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_drop_bottom_row_shifts_down() {
        let mut board = Board::from_bottom_rows(&[&[0, 0, 1], &[1]]);
        board.drop_bottom_row();
        assert!(board.is_filled(19, 2));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_remove_rows_ignores_duplicates_and_out_of_range() {
        let mut board = Board::from_bottom_rows(&[&[1]]);
        assert_eq!(board.remove_rows(&[19, 19, 40]), 1);
        assert_eq!(board.filled_count(), 0);
    }
}
