//! Interrupt handling: quit keys and termination signals.
//!
//! Raw mode turns Ctrl-C into a key event, so both paths end up setting the same
//! shared flag that the frame loop checks once per tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Check if a key should stop the animation.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Shared "stop now" flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the flag and hook SIGINT, SIGTERM and SIGHUP to it.
    ///
    /// Call once at startup.
    pub fn register() -> Result<Self> {
        let interrupt = Self::new();
        #[cfg(unix)]
        {
            use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
            for sig in [SIGINT, SIGTERM, SIGHUP] {
                signal_hook::flag::register(sig, Arc::clone(&interrupt.flag))?;
            }
        }
        Ok(interrupt)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Idle until `deadline`, draining terminal events.
///
/// Triggers `interrupt` and returns early on a quit key.
pub fn wait_until(deadline: Instant, interrupt: &Interrupt) -> Result<()> {
    loop {
        if interrupt.is_set() {
            return Ok(());
        }
        let timeout = deadline
            .checked_duration_since(Instant::now())
            .unwrap_or(Duration::ZERO);
        if !event::poll(timeout)? {
            return Ok(());
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && should_quit(key) {
                interrupt.trigger();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Char('Q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char(' '))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Enter)));
    }

    #[test]
    fn interrupt_is_shared_between_clones() {
        let a = Interrupt::new();
        let b = a.clone();
        assert!(!b.is_set());
        a.trigger();
        assert!(b.is_set());
    }
}
