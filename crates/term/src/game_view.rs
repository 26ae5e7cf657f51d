//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameState, Piece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const WELL_BG: Rgb = Rgb::new(30, 30, 40);

/// Column of the side panel values, relative to the panel start.
const VALUE_COL: u16 = 11;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Board layout inside the viewport, in terminal cells.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, state: &GameState, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;
        let panel_w = 2 + VALUE_COL + 6;

        let frame = Frame {
            x: viewport.width.saturating_sub(frame_w + panel_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
            w: frame_w,
            h: frame_h,
        };

        let well = CellStyle::new(Rgb::new(80, 80, 90), WELL_BG);
        fb.fill_rect(frame.x + 1, frame.y + 1, board_px_w, board_px_h, ' ', well);
        self.draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG));

        // Locked cells.
        let board = state.board();
        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                if board.is_filled(y as i32, x as i32) {
                    self.draw_block(fb, frame, x as u16, y as u16, locked_style());
                } else {
                    self.draw_empty_cell(fb, frame, x as u16, y as u16);
                }
            }
        }

        // Active piece, clipped to the board.
        if !state.is_over() {
            for (row, col) in state.active_cells() {
                if (0..BOARD_HEIGHT as i32).contains(&row) && (0..BOARD_WIDTH as i32).contains(&col) {
                    self.draw_block(fb, frame, col as u16, row as u16, active_style());
                }
            }
        }

        self.draw_side_panel(fb, state, viewport, frame);

        if state.is_over() {
            self.draw_overlay_text(fb, frame, 0, "GAME OVER");
            self.draw_overlay_text(fb, frame, 2, "SPACE: restart");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, state: &GameState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(state, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
        let Frame { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), WELL_BG).dim();
        self.fill_cell_rect(fb, frame, x, y, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, style: CellStyle) {
        self.fill_cell_rect(fb, frame, x, y, '█', style);
    }

    fn fill_cell_rect(&self, fb: &mut FrameBuffer, frame: Frame, cell_x: u16, cell_y: u16, ch: char, style: CellStyle) {
        let px = frame.x + 1 + cell_x * self.cell_w;
        let py = frame.y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, state: &GameState, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < VALUE_COL + 2 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        let counters = [
            ("SCORE", state.score()),
            ("HIGH", state.high_score()),
            ("LEVEL", state.level()),
            ("ROWS", state.total_rows_cleared()),
            ("POWER-UPS", state.power_ups_left()),
        ];
        for (name, n) in counters {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x + VALUE_COL, y, n, value);
            y = y.saturating_add(2);
        }

        fb.put_str(panel_x, y, "DEBUFF", label);
        fb.put_i32(panel_x + VALUE_COL, y, state.debuff_timer(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        self.draw_preview(fb, state.next_piece(), panel_x, y);
    }

    /// Draw the full next-piece matrix, blank padding included.
    fn draw_preview(&self, fb: &mut FrameBuffer, piece: &Piece, x: u16, y: u16) {
        let style = locked_style();
        for r in 0..piece.rows() {
            for c in 0..piece.cols() {
                if piece.get(r, c).is_filled() {
                    let px = x + c as u16 * self.cell_w;
                    fb.fill_rect(px, y + r as u16, self.cell_w, 1, '█', style);
                }
            }
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, line: u16, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn locked_style() -> CellStyle {
    CellStyle::new(Rgb::new(120, 160, 230), WELL_BG)
}

fn active_style() -> CellStyle {
    CellStyle::new(Rgb::new(240, 200, 80), WELL_BG).bold()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, PieceKind};

    fn full_view() -> Viewport {
        Viewport::new(60, 24)
    }

    #[test]
    fn test_panel_shows_counters() {
        let state = GameState::new(7);
        let fb = GameView::default().render(&state, full_view());
        for label in ["SCORE", "HIGH", "LEVEL", "ROWS", "POWER-UPS", "DEBUFF", "NEXT"] {
            assert!(fb.contains_text(label), "missing {label}");
        }
        assert!(!fb.contains_text("GAME OVER"));
    }

    #[test]
    fn test_locked_and_active_cells_drawn() {
        let board = Board::from_bottom_rows(&[&[1]]);
        let state = GameState::new(7)
            .with_board(board)
            .with_pieces(PieceKind::Line.piece(), PieceKind::Line.piece());
        let fb = GameView::default().with_anchor_y(AnchorY::Top).render(&state, full_view());

        // Bottom-left cell plus the line piece in the well, four more in the
        // preview, each two columns wide.
        let blocks = fb.cells().iter().filter(|c| c.ch == '█').count();
        assert_eq!(blocks, (1 + 4 + 4) * 2);
    }

    #[test]
    fn test_piece_outside_board_is_clipped() {
        let state = GameState::new(7)
            .with_pieces(PieceKind::Line.piece(), PieceKind::Line.piece())
            .with_position(0, -2);
        let fb = GameView::default().render(&state, full_view());
        let blocks = fb.cells().iter().filter(|c| c.ch == '█').count();
        // Two line cells fall off the left edge.
        assert_eq!(blocks, (2 + 4) * 2);
    }

    #[test]
    fn test_game_over_banner() {
        let state = GameState::new(7).with_game_over(true);
        let fb = GameView::default().render(&state, full_view());
        assert!(fb.contains_text("GAME OVER"));
        assert!(fb.contains_text("restart"));
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let state = GameState::new(7);
        let fb = GameView::default().render(&state, Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
