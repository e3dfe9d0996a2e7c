//! TerminalRenderer: flushes dirty glyphs to a real terminal.
//!
//! Encoding is split from I/O: `encode_*_into` build crossterm command sequences
//! into a byte buffer, and `TerminalRenderer` only owns the stdout handle and the
//! raw-mode / alternate-screen lifecycle.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

use crate::core::GlyphGrid;
use crate::types::COLOR_BACKGROUND;

pub struct TerminalRenderer {
    stdout: io::Stdout,
    buf: Vec<u8>,
    active: bool,
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
            buf: Vec::with_capacity(64 * 1024),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        encode_clear_into(&mut self.buf)?;
        self.flush_buf()?;
        Ok(())
    }

    /// Restore the terminal. Does nothing when the terminal was never entered or
    /// has already been restored.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Start a new frame, returning the (emptied) output buffer.
    pub fn begin_frame(&mut self) -> &mut Vec<u8> {
        self.buf.clear();
        &mut self.buf
    }

    /// Write the frame buffer to the terminal.
    pub fn present(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// Palette index to terminal color.
pub fn palette_color(index: u8) -> Color {
    Color::AnsiValue(index)
}

/// Encode a full-screen clear on the background color.
pub fn encode_clear_into(out: &mut Vec<u8>) -> Result<()> {
    out.queue(SetBackgroundColor(palette_color(COLOR_BACKGROUND)))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    Ok(())
}

/// Encode every dirty glyph into `out` and clear the dirty flags.
///
/// The cursor move is skipped when the previous glyph left the cursor on the
/// target cell, and the foreground is only set when it changes. Returns the
/// number of glyphs written.
pub fn encode_dirty_into(grid: &mut GlyphGrid, out: &mut Vec<u8>) -> Result<usize> {
    let mut cursor_at: Option<(u16, u16)> = None;
    let mut current_color: Option<u8> = None;
    let mut written = 0usize;

    grid.for_each_dirty(|x, y, ch, color| -> Result<()> {
        if cursor_at != Some((x, y)) {
            out.queue(cursor::MoveTo(x, y))?;
        }
        if current_color != Some(color) {
            out.queue(SetForegroundColor(palette_color(color)))?;
            current_color = Some(color);
        }
        out.queue(Print(ch))?;
        let advance = ch.width().unwrap_or(1).max(1) as u16;
        cursor_at = Some((x.saturating_add(advance), y));
        written += 1;
        Ok(())
    })?;

    Ok(written)
}
