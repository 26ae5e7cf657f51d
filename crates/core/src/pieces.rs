//! Pieces module - the piece catalog, trimming and rotation
//!
//! A piece is a small cell matrix (3x3 or 4x4 in the catalog) including its blank
//! padding. The *trimmed* form drops the all-empty rows but keeps every column, so
//! a trimmed piece placed at `(row_offset, col_offset)` has its first occupied row
//! on `row_offset`.

use crate::rng::SimpleRng;
use crate::types::{Cell, MAX_PIECE_SIZE};

/// Names of the seven catalog shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Square,
    Line,
    J,
    L,
    T,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Square,
        PieceKind::Line,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Square => "square",
            PieceKind::Line => "line",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }

    /// Catalog matrix for this kind, in spawn orientation.
    pub fn piece(self) -> Piece {
        let rows: &[&[u8]] = match self {
            PieceKind::Square => &[&[0, 0, 0, 0], &[0, 1, 1, 0], &[0, 1, 1, 0], &[0, 0, 0, 0]],
            PieceKind::Line => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            PieceKind::J => &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]],
            PieceKind::L => &[&[1, 0, 0], &[1, 0, 0], &[1, 1, 0]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 0], &[0, 1, 0]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        };
        Piece::from_rows(rows)
    }
}

/// Uniformly pick a catalog piece (with replacement).
pub fn random_piece(rng: &mut SimpleRng) -> Piece {
    let idx = rng.next_range(PieceKind::ALL.len() as u32) as usize;
    PieceKind::ALL[idx].piece()
}

/// A cell matrix of up to 4x4. Cells outside `rows x cols` are always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    rows: u8,
    cols: u8,
    cells: [[Cell; MAX_PIECE_SIZE]; MAX_PIECE_SIZE],
}

impl Piece {
    /// Build a piece from rows of `0`/non-zero values.
    ///
    /// Rows and columns past `MAX_PIECE_SIZE` are ignored.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len().min(MAX_PIECE_SIZE);
        let width = rows
            .iter()
            .take(height)
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .min(MAX_PIECE_SIZE);

        let mut cells = [[Cell::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (r, row) in rows.iter().take(height).enumerate() {
            for (c, &v) in row.iter().take(width).enumerate() {
                cells[r][c] = Cell::from(v != 0);
            }
        }

        Self {
            rows: height as u8,
            cols: width as u8,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Cell at `(row, col)`; empty when outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        if row >= self.rows() || col >= self.cols() {
            return Cell::Empty;
        }
        self.cells[row][col]
    }

    /// Iterate over `(row, col)` of every filled cell, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows()).flat_map(move |r| {
            (0..self.cols()).filter_map(move |c| self.cells[r][c].is_filled().then_some((r, c)))
        })
    }

    /// Whether every cell of column `col` is empty.
    pub fn column_is_empty(&self, col: usize) -> bool {
        (0..self.rows()).all(|r| self.get(r, col).is_empty())
    }

    /// Leftmost and rightmost filled column, or `None` for a blank piece.
    pub fn column_extent(&self) -> Option<(usize, usize)> {
        let mut extent: Option<(usize, usize)> = None;
        for (_, c) in self.occupied() {
            extent = Some(match extent {
                Some((lo, hi)) => (lo.min(c), hi.max(c)),
                None => (c, c),
            });
        }
        extent
    }

    /// Drop every all-empty row. Columns are left untouched.
    pub fn trim(&self) -> Piece {
        let mut cells = [[Cell::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        let mut kept = 0;
        for r in 0..self.rows() {
            if self.cells[r].iter().any(|c| c.is_filled()) {
                cells[kept] = self.cells[r];
                kept += 1;
            }
        }
        Piece {
            rows: kept as u8,
            cols: self.cols,
            cells,
        }
    }

    /// Rotate 90° clockwise: `[row][col]` moves to `[col][size - 1 - row]`.
    ///
    /// The result is square with side `max(rows, cols)`.
    pub fn rotate(&self) -> Piece {
        let size = self.rows().max(self.cols());
        let mut cells = [[Cell::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                cells[c][size - 1 - r] = self.cells[r][c];
            }
        }
        Piece {
            rows: size as u8,
            cols: size as u8,
            cells,
        }
    }

    /// Side length used by the rotation edge nudges.
    pub fn size(&self) -> usize {
        self.rows().max(self.cols())
    }

    /// Catalog kind this matrix is a rotation of, if any.
    pub fn kind(&self) -> Option<PieceKind> {
        PieceKind::ALL.into_iter().find(|kind| {
            let mut p = kind.piece();
            (0..4).any(|_| {
                let hit = p == *self;
                p = p.rotate();
                hit
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(PieceKind::Square.piece().size(), 4);
        assert_eq!(PieceKind::Line.piece().size(), 4);
        for kind in [PieceKind::J, PieceKind::L, PieceKind::T, PieceKind::S, PieceKind::Z] {
            assert_eq!(kind.piece().size(), 3, "{kind:?}");
        }
    }

    #[test]
    fn test_every_catalog_piece_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.piece().occupied().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_trim_drops_blank_rows_only() {
        let line = PieceKind::Line.piece().trim();
        assert_eq!(line.rows(), 1);
        assert_eq!(line.cols(), 4);
        assert_eq!(line.occupied().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (0, 2), (0, 3)]);

        let square = PieceKind::Square.piece().trim();
        assert_eq!(square.rows(), 2);
        assert_eq!(square.cols(), 4);
        assert_eq!(square.column_extent(), Some((1, 2)));

        // Nothing to trim on a full-height piece.
        assert_eq!(PieceKind::J.piece().trim(), PieceKind::J.piece());
    }

    #[test]
    fn test_rotate_maps_row_to_column() {
        // Line: row 1 becomes column size-1-1 = 2.
        let rotated = PieceKind::Line.piece().rotate();
        for r in 0..4 {
            assert!(rotated.get(r, 2).is_filled());
            assert!(rotated.get(r, 0).is_empty());
        }

        // J: [[0,1,0],[0,1,0],[1,1,0]] -> [[1,0,0],[1,1,1],[0,0,0]]
        let expected = Piece::from_rows(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]);
        assert_eq!(PieceKind::J.piece().rotate(), expected);
    }

    #[test]
    fn test_rotate_is_four_cycle() {
        for kind in PieceKind::ALL {
            let p = kind.piece();
            assert_eq!(p.rotate().rotate().rotate().rotate(), p, "{kind:?}");
        }
    }

    #[test]
    fn test_column_is_empty() {
        let j = PieceKind::J.piece();
        assert!(!j.column_is_empty(0));
        assert!(j.column_is_empty(2));
        // Outside the matrix is blank.
        assert!(j.column_is_empty(3));
    }

    #[test]
    fn test_kind_recognizes_rotations() {
        let t = PieceKind::T.piece().rotate().rotate();
        assert_eq!(t.kind(), Some(PieceKind::T));
        assert_eq!(Piece::from_rows(&[&[1]]).kind(), None);
    }

    #[test]
    fn test_random_piece_is_from_catalog() {
        let mut rng = SimpleRng::new(3);
        for _ in 0..100 {
            assert!(random_piece(&mut rng).kind().is_some());
        }
    }
}
