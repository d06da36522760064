//! sift: an interactive incremental filter for the terminal.
//!
//! [`Finder`] wires a [`core_session::SessionController`] to the terminal: raw mode through a
//! scoped guard, keys from `crossterm`, resize polling, and an optional line-streamed list.
//! [`FinderHandle`] lets other tasks replace the list or stop the session while it runs.

pub mod runtime;
pub mod source;

pub use core_config::{ConfigFile, FinderInit, SessionOptions};
pub use core_filter::MatchMode;
pub use core_session::{Exit, Outcome, Selected};
pub use runtime::{Finder, FinderHandle, get_input, ui_writer};
pub use source::LineStreamSource;
