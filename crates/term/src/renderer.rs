//! Presents frame buffers on the real terminal.
//!
//! A frame is painted in full when there is nothing to compare against (first
//! frame, size change, `invalidate`). Otherwise only the changed runs of each row
//! are repainted, and style escapes are emitted only when a style field changes.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Raw-mode terminal sink that remembers the last frame it presented.
pub struct TerminalRenderer {
    stdout: io::Stdout,
    shown: Option<FrameBuffer>,
    out: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            out: Vec::with_capacity(8 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        self.out.clear();
        self.out.queue(terminal::EnterAlternateScreen)?;
        self.out.queue(cursor::Hide)?;
        self.out.queue(terminal::DisableLineWrap)?;
        self.write_out()
    }

    /// Undo `enter`. Also fine to call when `enter` failed halfway.
    pub fn exit(&mut self) -> Result<()> {
        self.shown = None;
        self.out.clear();
        queue_reset(&mut self.out)?;
        self.out.queue(terminal::EnableLineWrap)?;
        self.out.queue(cursor::Show)?;
        self.out.queue(terminal::LeaveAlternateScreen)?;
        self.write_out()?;
        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        Ok(())
    }

    /// Forget the presented frame so the next `present` repaints everything.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Put `fb` on screen.
    ///
    /// `fb` and the remembered frame trade places: afterwards `fb` holds the
    /// previous frame, ready to be rendered into again.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.out.clear();
        let mut previous = match self.shown.take() {
            Some(shown) if same_size(&shown, fb) => {
                encode_changes(&shown, fb, &mut self.out)?;
                shown
            }
            _ => {
                encode_frame(fb, &mut self.out)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.write_out()?;

        std::mem::swap(&mut previous, fb);
        self.shown = Some(previous);
        Ok(())
    }

    fn write_out(&mut self) -> Result<()> {
        self.stdout
            .write_all(&self.out)
            .and_then(|()| self.stdout.flush())
            .context("Failed to write to terminal")
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// A horizontal stretch of cells that differ between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

/// Iterator over the changed runs of two equally sized frames, row by row.
pub struct ChangedRuns<'a> {
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
    x: u16,
    y: u16,
}

impl<'a> ChangedRuns<'a> {
    pub fn new(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> Self {
        Self { prev, next, x: 0, y: 0 }
    }

    fn differs(&self, x: u16, y: u16) -> bool {
        self.prev.get(x, y) != self.next.get(x, y)
    }
}

impl Iterator for ChangedRuns<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let (w, h) = (self.next.width(), self.next.height());
        while self.y < h {
            while self.x < w && !self.differs(self.x, self.y) {
                self.x += 1;
            }
            if self.x < w {
                let start = self.x;
                while self.x < w && self.differs(self.x, self.y) {
                    self.x += 1;
                }
                return Some(Run {
                    x: start,
                    y: self.y,
                    len: self.x - start,
                });
            }
            self.x = 0;
            self.y += 1;
        }
        None
    }
}

/// Writes cells and keeps track of the terminal's current style.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn paint(&mut self, fb: &FrameBuffer, run: Run) -> Result<()> {
        self.out.queue(cursor::MoveTo(run.x, run.y))?;
        for x in run.x..run.x + run.len {
            let cell = fb.get(x, run.y).unwrap_or_default();
            self.set_style(cell.style)?;
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn set_style(&mut self, style: CellStyle) -> Result<()> {
        let prev = self.style.replace(style);
        if prev == Some(style) {
            return Ok(());
        }

        // Attributes can only be switched off together, which also drops colors.
        let attrs_changed = prev.map_or(true, |p| (p.bold, p.dim) != (style.bold, style.dim));
        if attrs_changed {
            self.out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        if attrs_changed || prev.map(|p| p.fg) != Some(style.fg) {
            self.out.queue(SetForegroundColor(color(style.fg)))?;
        }
        if attrs_changed || prev.map(|p| p.bg) != Some(style.bg) {
            self.out.queue(SetBackgroundColor(color(style.bg)))?;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        queue_reset(self.out)
    }
}

/// Clear the screen and paint every row of `fb`.
pub fn encode_frame(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut painter = Painter::new(out);
    for y in 0..fb.height() {
        painter.paint(fb, Run { x: 0, y, len: fb.width() })?;
    }
    painter.finish()
}

/// Paint only the cells of `next` that differ from `prev`.
pub fn encode_changes(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if !same_size(prev, next) {
        return encode_frame(next, out);
    }
    let mut painter = Painter::new(out);
    for run in ChangedRuns::new(prev, next) {
        painter.paint(next, run)?;
    }
    painter.finish()
}

fn queue_reset(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
