//! Batched terminal commands.
//!
//! A frame is built as a list of relative cursor moves, clears and prints, then queued and flushed
//! in one go. Everything is relative to the current cursor: the band lives inline below the shell
//! prompt, so absolute coordinates are never known.
//!
//! Invariants:
//! * Commands preserve ordering; nothing is flushed mid-frame.
//! * Zero-distance moves and empty prints are dropped when pushed. Some terminals treat a count of
//!   0 as 1.
//! * Line breaks are `\r\n`; raw mode disables output newline translation.

use anyhow::Result;
use crossterm::{
    cursor::{MoveDown, MoveToColumn, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveUp(u16),
    MoveDown(u16),
    MoveToColumn(u16),
    ClearLine,
    /// Clear from the cursor to the end of the screen.
    ClearBelow,
    Print(String),
    NewLine,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_up(&mut self, n: u16) {
        if n > 0 {
            self.cmds.push(Command::MoveUp(n));
        }
    }

    pub fn move_down(&mut self, n: u16) {
        if n > 0 {
            self.cmds.push(Command::MoveDown(n));
        }
    }

    pub fn move_to_column(&mut self, col: u16) {
        self.cmds.push(Command::MoveToColumn(col));
    }

    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    pub fn clear_below(&mut self) {
        self.cmds.push(Command::ClearBelow);
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn new_line(&mut self) {
        self.cmds.push(Command::NewLine);
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn flush<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveUp(n) => queue!(out, MoveUp(n))?,
                Command::MoveDown(n) => queue!(out, MoveDown(n))?,
                Command::MoveToColumn(col) => queue!(out, MoveToColumn(col))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::ClearBelow => queue!(out, Clear(ClearType::FromCursorDown))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::NewLine => queue!(out, Print("\r\n"))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}
