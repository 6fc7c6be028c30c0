//! Restores the terminal when the wizard exits, by any path.

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// RAII guard around raw mode and the alternate screen.
///
/// Cleanup runs on normal scope exit, on `?` early returns, and (through
/// [`install_panic_hook`]) before a panic message is printed.
pub struct TerminalGuard {
    active: AtomicBool,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        Ok(Self {
            active: AtomicBool::new(true),
        })
    }

    /// Leave the alternate screen and raw mode, ignoring failures
    pub fn cleanup() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = io::stdout().flush();
    }

    /// Restore now instead of on drop; later calls are no-ops
    pub fn restore(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            Self::cleanup();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Restore the terminal before the default hook prints the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        TerminalGuard::cleanup();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_deactivates_once() {
        let guard = TerminalGuard {
            active: AtomicBool::new(true),
        };
        guard.restore();
        assert!(!guard.is_active());

        // Second restore and the drop are both no-ops
        guard.restore();
        drop(guard);
    }

    #[test]
    fn test_inactive_guard_drops_quietly() {
        let guard = TerminalGuard {
            active: AtomicBool::new(false),
        };
        drop(guard);
    }
}
