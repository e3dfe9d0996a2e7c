//! Glyph grid - per-cell render state with dirty tracking.
//!
//! Each cell remembers the value that was last flushed to the terminal, so a cell
//! that is erased and redrawn with the same content inside one tick does not
//! produce output.

use crate::types::{BLANK, COLOR_BLANK};

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub character: char,
    pub color: u8,
    pub dirty: bool,
    flushed: (char, u8),
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            character: BLANK,
            color: COLOR_BLANK,
            dirty: false,
            flushed: (BLANK, COLOR_BLANK),
        }
    }
}

impl Glyph {
    pub fn is_blank(&self) -> bool {
        self.character == BLANK && self.color == COLOR_BLANK
    }
}

/// Row-major `width x height` buffer of glyphs.
#[derive(Debug, Clone, Default)]
pub struct GlyphGrid {
    width: u16,
    height: u16,
    cells: Vec<Glyph>,
}

impl GlyphGrid {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Glyph::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[Glyph] {
        &self.cells
    }

    /// Discard every cell and reallocate for the new geometry.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> usize {
        debug_assert!(x < self.width && y < self.height, "glyph ({x}, {y}) out of range");
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[self.idx(x, y)])
    }

    #[inline]
    pub fn set(&mut self, x: u16, y: u16, character: char, color: u8) {
        let i = self.idx(x, y);
        let cell = &mut self.cells[i];
        cell.character = character;
        cell.color = color;
        cell.dirty = (character, color) != cell.flushed;
    }

    /// Mark the cell's current value as emitted.
    #[inline]
    pub fn clear_dirty(&mut self, x: u16, y: u16) {
        let i = self.idx(x, y);
        let cell = &mut self.cells[i];
        cell.flushed = (cell.character, cell.color);
        cell.dirty = false;
    }

    pub fn dirty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.dirty).count()
    }

    /// Visit dirty cells in row-major order, clearing each one once `f` accepts it.
    ///
    /// Stops at the first error; cells not yet visited stay dirty.
    pub fn for_each_dirty<E>(
        &mut self,
        mut f: impl FnMut(u16, u16, char, u8) -> Result<(), E>,
    ) -> Result<(), E> {
        let w = self.width as usize;
        if w == 0 {
            return Ok(());
        }
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if !cell.dirty {
                continue;
            }
            let x = (i % w) as u16;
            let y = (i / w) as u16;
            f(x, y, cell.character, cell.color)?;
            cell.flushed = (cell.character, cell.color);
            cell.dirty = false;
        }
        Ok(())
    }

    /// Drop the cell storage.
    pub fn release(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_blank_and_clean() {
        let grid = GlyphGrid::new(4, 3);
        assert_eq!(grid.cells().len(), 12);
        assert!(grid.cells().iter().all(|g| g.is_blank() && !g.dirty));
    }

    #[test]
    fn set_marks_dirty_until_cleared() {
        let mut grid = GlyphGrid::new(4, 3);
        grid.set(1, 2, 'A', 40);
        let g = grid.get(1, 2).unwrap();
        assert_eq!((g.character, g.color, g.dirty), ('A', 40, true));

        grid.clear_dirty(1, 2);
        assert!(!grid.get(1, 2).unwrap().dirty);
        assert_eq!(grid.get(1, 2).unwrap().character, 'A');
    }

    #[test]
    fn rewriting_the_flushed_value_is_not_dirty() {
        let mut grid = GlyphGrid::new(2, 2);
        grid.set(0, 0, 'A', 40);
        grid.clear_dirty(0, 0);

        // Erase then redraw within one frame.
        grid.set(0, 0, BLANK, COLOR_BLANK);
        assert!(grid.get(0, 0).unwrap().dirty);
        grid.set(0, 0, 'A', 40);
        assert!(!grid.get(0, 0).unwrap().dirty);
    }

    #[test]
    fn color_change_alone_is_dirty() {
        let mut grid = GlyphGrid::new(1, 1);
        grid.set(0, 0, 'A', 28);
        grid.clear_dirty(0, 0);
        grid.set(0, 0, 'A', 255);
        assert!(grid.get(0, 0).unwrap().dirty);
    }

    #[test]
    fn for_each_dirty_visits_row_major_and_clears() {
        let mut grid = GlyphGrid::new(3, 2);
        grid.set(2, 1, 'c', 1);
        grid.set(0, 1, 'b', 1);
        grid.set(1, 0, 'a', 1);

        let mut seen = Vec::new();
        grid.for_each_dirty(|x, y, ch, _| {
            seen.push((x, y, ch));
            Ok::<(), ()>(())
        })
        .unwrap();

        assert_eq!(seen, vec![(1, 0, 'a'), (0, 1, 'b'), (2, 1, 'c')]);
        assert_eq!(grid.dirty_count(), 0);
    }

    #[test]
    fn for_each_dirty_keeps_unvisited_cells_dirty_on_error() {
        let mut grid = GlyphGrid::new(2, 1);
        grid.set(0, 0, 'a', 1);
        grid.set(1, 0, 'b', 1);

        let result = grid.for_each_dirty(|x, _, _, _| if x == 1 { Err("io") } else { Ok(()) });
        assert_eq!(result, Err("io"));
        assert!(!grid.get(0, 0).unwrap().dirty);
        assert!(grid.get(1, 0).unwrap().dirty);
    }

    #[test]
    fn resize_discards_content() {
        let mut grid = GlyphGrid::new(2, 2);
        grid.set(1, 1, 'z', 9);
        grid.resize(5, 1);
        assert_eq!((grid.width(), grid.height()), (5, 1));
        assert_eq!(grid.dirty_count(), 0);
        assert!(grid.cells().iter().all(Glyph::is_blank));
    }

    #[test]
    fn get_out_of_range_is_none() {
        let grid = GlyphGrid::new(2, 2);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }
}
