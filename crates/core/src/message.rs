//! Message overlay - a centered line revealed one random character at a time.

use std::time::Duration;

use rand::Rng;

use crate::grid::GlyphGrid;
use crate::types::{MessageConfig, COLOR_HEAD};

#[derive(Debug, Clone)]
pub struct MessageOverlay {
    text: Vec<char>,
    /// Column offset of each character relative to the message start.
    offsets: Vec<u16>,
    display_width: u16,
    revealed: Vec<bool>,
    revealed_count: usize,
    reveal_delay: Duration,
    last_reveal: Duration,
}

impl MessageOverlay {
    pub fn new(config: &MessageConfig) -> Self {
        let mut offsets = Vec::with_capacity(config.text.len());
        let mut col: u16 = 0;
        for &ch in &config.text {
            offsets.push(col);
            col = col.saturating_add(char_width(ch));
        }
        Self {
            text: config.text.clone(),
            offsets,
            display_width: col,
            revealed: vec![false; config.text.len()],
            revealed_count: 0,
            reveal_delay: config.reveal_delay,
            last_reveal: Duration::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.revealed_count == self.text.len()
    }

    /// Hide every character again and restart the reveal timer at `now`.
    pub fn reset(&mut self, now: Duration) {
        self.revealed.fill(false);
        self.revealed_count = 0;
        self.last_reveal = now;
    }

    /// Reveal one more character if the delay has passed since the last reveal.
    ///
    /// Returns the index that was revealed.
    pub fn advance<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) -> Option<usize> {
        let due = self.last_reveal.checked_add(self.reveal_delay);
        if self.is_complete() || due.map_or(true, |due| now < due) {
            return None;
        }
        let index = loop {
            let i = rng.gen_range(0..self.text.len());
            if !self.revealed[i] {
                break i;
            }
        };
        self.revealed[index] = true;
        self.revealed_count += 1;
        self.last_reveal = now;
        Some(index)
    }

    /// Screen position of the first character for a `width x height` screen.
    pub fn origin(&self, width: u16, height: u16) -> (u16, u16) {
        (width.saturating_sub(self.display_width) / 2, height / 2)
    }

    /// Draw the revealed characters, clipped to the grid.
    pub fn draw(&self, grid: &mut GlyphGrid) {
        let (width, height) = (grid.width(), grid.height());
        if width == 0 || height == 0 {
            return;
        }
        let (x0, y) = self.origin(width, height);
        for (i, &ch) in self.text.iter().enumerate() {
            if !self.revealed[i] {
                continue;
            }
            let x = x0.saturating_add(self.offsets[i]);
            if x.saturating_add(char_width(ch)) > width {
                break;
            }
            grid.set(x, y, ch, COLOR_HEAD);
        }
    }
}

fn char_width(ch: char) -> u16 {
    unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0).max(1) as u16
}
