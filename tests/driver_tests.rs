//! Frame driver tests against a tiny terminal emulator.
//!
//! The emulator understands only what the renderer emits (cursor moves, 256-color
//! foreground/background, full clear, printable characters), which is enough to
//! check that flushing dirty glyphs alone reproduces the engine's grid.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use matrix_rain::core::{Engine, GlyphGrid};
use matrix_rain::term::{DriverState, FrameDriver};
use matrix_rain::types::{MessageConfig, RainConfig, BLANK, COLOR_BLANK};

struct Screen {
    width: u16,
    height: u16,
    cells: Vec<(char, u8)>,
    cursor: (u16, u16),
    fg: u8,
}

impl Screen {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![(BLANK, COLOR_BLANK); width as usize * height as usize],
            cursor: (0, 0),
            fg: COLOR_BLANK,
        }
    }

    fn apply(&mut self, bytes: &[u8]) {
        let text = std::str::from_utf8(bytes).unwrap();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch != '\x1b' {
                let (x, y) = self.cursor;
                if x < self.width && y < self.height {
                    self.cells[y as usize * self.width as usize + x as usize] = (ch, self.fg);
                }
                self.cursor.0 += 1;
                continue;
            }

            assert_eq!(chars.next(), Some('['));
            let mut params = String::new();
            let op = loop {
                let c = chars.next().unwrap();
                if c.is_ascii_alphabetic() {
                    break c;
                }
                params.push(c);
            };
            let nums: Vec<u16> = params
                .split(';')
                .filter(|p| !p.is_empty())
                .map(|p| p.parse().unwrap())
                .collect();
            match op {
                'H' => self.cursor = (nums[1] - 1, nums[0] - 1),
                'J' => {
                    assert_eq!(nums, vec![2]);
                    self.cells.fill((BLANK, COLOR_BLANK));
                }
                'm' if nums.starts_with(&[38, 5]) => self.fg = nums[2] as u8,
                'm' => {}
                other => panic!("unexpected escape op {other:?}"),
            }
        }
    }

    fn matches(&self, grid: &GlyphGrid) -> bool {
        (0..grid.height()).all(|y| {
            (0..grid.width()).all(|x| {
                let g = grid.get(x, y).unwrap();
                self.cells[y as usize * self.width as usize + x as usize] == (g.character, g.color)
            })
        })
    }
}

fn driver(config: RainConfig) -> FrameDriver {
    FrameDriver::new(Engine::with_rng(config, StdRng::seed_from_u64(77)))
}

#[test]
fn flushed_output_reproduces_the_grid() {
    let config = RainConfig {
        message: Some(MessageConfig::new("knock knock", Duration::from_millis(30))),
        ..RainConfig::ascii()
    };
    let mut d = driver(config);
    let mut screen = Screen::new(60, 20);
    let mut out = Vec::new();

    for _ in 0..400 {
        out.clear();
        d.frame(Some((60, 20)), Duration::from_millis(12), &mut out)
            .unwrap();
        screen.apply(&out);
        assert!(screen.matches(d.engine().grid()));
        assert_eq!(d.engine().grid().dirty_count(), 0);
    }
    assert_eq!(d.stats().frames, 400);
    assert_eq!(d.stats().resizes, 1);
}

#[test]
fn resize_clears_and_redraws_from_scratch() {
    let mut d = driver(RainConfig::ascii());
    let mut out = Vec::new();
    for _ in 0..50 {
        out.clear();
        d.frame(Some((60, 20)), Duration::from_millis(12), &mut out)
            .unwrap();
    }

    // The terminal shrank: the new screen starts from a clear.
    let mut screen = Screen::new(30, 10);
    screen.cells.fill(('?', 99));
    out.clear();
    d.frame(Some((30, 10)), Duration::from_millis(12), &mut out)
        .unwrap();
    screen.apply(&out);

    assert_eq!(d.state(), DriverState::Running);
    assert_eq!(d.engine().pool().len(), 39);
    assert!(screen.matches(d.engine().grid()));
}

#[test]
fn idle_frames_write_nothing() {
    let mut d = driver(RainConfig::ascii());
    let mut out = Vec::new();
    d.frame(Some((40, 12)), Duration::from_millis(12), &mut out)
        .unwrap();

    out.clear();
    assert_eq!(d.frame(Some((40, 12)), Duration::ZERO, &mut out).unwrap(), 0);
    assert!(out.is_empty());
}

#[test]
fn shutdown_releases_engine() {
    let mut d = driver(RainConfig::default());
    let mut out = Vec::new();
    d.frame(Some((80, 24)), Duration::from_millis(12), &mut out)
        .unwrap();

    d.shutdown();
    assert_eq!(d.state(), DriverState::Shutdown);
    assert!(d.engine().pool().is_empty());
    assert_eq!(d.engine().grid().cells().len(), 0);

    out.clear();
    assert_eq!(
        d.frame(Some((80, 24)), Duration::from_millis(12), &mut out)
            .unwrap(),
        0
    );
}
