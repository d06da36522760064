//! Terminal backend abstraction and crossterm implementation.
//!
//! The finder draws inline below the shell prompt, so entering the terminal only toggles raw
//! input mode; there is no alternate screen. Release is tied to [`TerminalGuard`] so every exit
//! path (finish, cancel, error, panic unwinding) restores cooked mode.

use anyhow::Result;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

pub mod capabilities;
pub mod resize;
pub use capabilities::TerminalCapabilities;
pub use resize::ResizePollSource;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    /// Current (columns, rows); `None` when the size cannot be queried.
    fn size(&self) -> Option<(u16, u16)>;
}

pub struct CrosstermBackend {
    entered: bool,
    /// Raw mode was already on before we entered; leave it on when we leave.
    inherited: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self {
            entered: false,
            inherited: false,
        }
    }
}

/// Enter `backend` and return a guard that will leave on drop.
pub fn enter_guard<B: TerminalBackend>(backend: &mut B) -> Result<TerminalGuard<'_, B>> {
    backend.enter()?;
    Ok(TerminalGuard {
        backend,
        active: true,
    })
}

impl<B: TerminalBackend> TerminalGuard<'_, B> {
    pub fn size(&self) -> Option<(u16, u16)> {
        self.backend.size()
    }

    /// Leave eagerly (before the guard goes out of scope) and report the error, if any.
    pub fn release(mut self) -> Result<()> {
        self.active = false;
        self.backend.leave()
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            self.inherited = is_raw_mode_enabled().unwrap_or(false);
            enable_raw_mode()?;
            self.entered = true;
            tracing::debug!(target: "terminal", inherited = self.inherited, "raw_mode_enabled");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            self.entered = false;
            if !self.inherited {
                disable_raw_mode()?;
            }
            tracing::debug!(target: "terminal", "raw_mode_disabled");
        }
        Ok(())
    }

    fn size(&self) -> Option<(u16, u16)> {
        crossterm::terminal::size().ok()
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
