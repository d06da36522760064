#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use anyhow::{Result, bail};
use core_terminal::{TerminalBackend, TerminalCapabilities};
use sift::{Finder, FinderInit, SessionOptions};

pub const ANIMALS: [&str; 12] = [
    "Apes", "Badgers", "Cobras", "Crocodiles", "Crows", "Elephants", "Giraffes", "Goats",
    "Jaguars", "Lemurs", "Rhinoceroses", "Zebras",
];

pub fn animals() -> Vec<String> {
    ANIMALS.iter().map(|s| s.to_string()).collect()
}

/// Terminal double recording raw-mode transitions.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub entered: usize,
    pub left: usize,
    pub refuse_raw_mode: bool,
    pub size: Option<(u16, u16)>,
}

impl FakeBackend {
    pub fn sized(columns: u16, rows: u16) -> Self {
        Self {
            size: Some((columns, rows)),
            ..Default::default()
        }
    }

    pub fn without_raw_mode() -> Self {
        Self {
            refuse_raw_mode: true,
            ..Default::default()
        }
    }
}

impl TerminalBackend for FakeBackend {
    fn enter(&mut self) -> Result<()> {
        if self.refuse_raw_mode {
            bail!("raw mode unavailable");
        }
        self.entered += 1;
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        self.left += 1;
        Ok(())
    }

    fn size(&self) -> Option<(u16, u16)> {
        self.size
    }
}

/// A finder fed only through its handle: no keyboard, no resize polling, no colour.
pub fn headless(init: impl Into<FinderInit>) -> Finder {
    Finder::new(init)
        .without_keyboard()
        .without_resize_polling()
        .with_capabilities(TerminalCapabilities::monochrome())
}

pub fn headless_with(options: SessionOptions) -> Finder {
    headless(FinderInit::with_options(animals(), options))
}
