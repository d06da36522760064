//! Viewport geometry, styling and the inline band renderer.
//!
//! Pipeline per repaint:
//! 1. [`viewport::vertical_window`] picks the visible ranks around the selection.
//! 2. [`viewport::LineCut`] cuts each visible row horizontally around its anchor.
//! 3. [`style::Palette::highlight`] colours matched characters that survived the cut.
//! 4. [`renderer::Renderer::paint`] erases the previous band and draws the new one through a
//!    batched [`writer::Writer`], then parks the cursor in the query.
//!
//! Invariants:
//! - Row text never exceeds `columns - gutter` columns, less any row hook output, plus two
//!   ellipsis markers and the two-column selection gutter, so rows do not wrap.
//! - Cursor movement is relative; the band's position on screen is never assumed.
//! - Colour is opt-in through [`style::Palette`]; a monochrome palette emits plain text.

pub mod decor;
pub mod renderer;
pub mod status;
pub mod style;
pub mod viewport;
pub mod writer;

pub use decor::{RowHook, RowHooks};
pub use renderer::{Frame, Renderer, RowView};
pub use status::{StatusContext, StatusSegment, compose_status, format_status};
pub use style::Palette;
pub use viewport::{CutLayout, LineCut, RESERVED_ROWS, VerticalWindow, row_budget, vertical_window};
pub use writer::{Command, Writer};
