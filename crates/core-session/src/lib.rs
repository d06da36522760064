//! Finder session controller.
//!
//! [`SessionController`] owns everything one finder session mutates: the query and selection
//! state, the source list, the current result set, the renderer and the auto-select latch. It is
//! driven one [`Event`] at a time and writes the band to any `io::Write`, which keeps it free of
//! async and testable against an in-memory buffer.
//!
//! Flow per event:
//! 1. Keys go through `translate_key` and `dispatch`.
//! 2. A changed query or mode recomputes the result set and clamps the selection.
//! 3. List updates replace the source list, appends extend it; both recompute against the
//!    current query.
//! 4. Resizes only repaint. Ctrl-l wipes the band and what lies below it first.
//! 5. An exit erases the band and yields an [`Outcome`].
//!
//! The select-one latch never finishes a session directly. It leaves a synthetic Return for the
//! caller to collect with [`SessionController::take_deferred`] and feed back on the next turn.

pub mod latch;

pub use core_actions::Exit;
pub use latch::SelectOneLatch;

use anyhow::Result;
use core_actions::{DispatchContext, dispatch, translate_key};
use core_config::{ConfigError, FinderInit, SessionOptions};
use core_events::{Event, InputEvent, KeyCode, KeyEvent, KeyModifiers};
use core_filter::{ResultSet, SourceList};
use core_render::{
    CutLayout, Frame, Palette, Renderer, RowHooks, RowView, StatusContext, vertical_window,
};
use core_state::FinderState;
use core_terminal::TerminalCapabilities;
use std::io::Write;
use tracing::{debug, info, trace};

/// Geometry assumed when the terminal cannot report its size.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub value: String,
    pub index: usize,
}

/// Result of a finished or cancelled session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub selected: Option<Selected>,
    pub query: String,
    pub status: Exit,
}

impl Outcome {
    pub fn cancelled(query: impl Into<String>) -> Self {
        Self {
            selected: None,
            query: query.into(),
            status: Exit::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit(Outcome),
}

/// Environment a session is started in.
#[derive(Debug, Clone)]
pub struct SessionEnv {
    pub capabilities: TerminalCapabilities,
    /// `(columns, rows)`; `None` falls back to [`FALLBACK_SIZE`].
    pub size: Option<(u16, u16)>,
    pub layout: CutLayout,
    /// The list arrives in updates and settles later.
    pub streaming: bool,
    /// Text drawn around each match row.
    pub hooks: RowHooks,
}

impl Default for SessionEnv {
    fn default() -> Self {
        Self {
            capabilities: TerminalCapabilities::monochrome(),
            size: None,
            layout: CutLayout::default(),
            streaming: false,
            hooks: RowHooks::default(),
        }
    }
}

#[derive(Debug)]
pub struct SessionController {
    state: FinderState,
    options: SessionOptions,
    list: SourceList,
    results: ResultSet,
    renderer: Renderer,
    hooks: RowHooks,
    size: (u16, u16),
    latch: SelectOneLatch,
    /// Match rows drawn by the last paint; the page size for Ctrl-d / Ctrl-u.
    printed_rows: usize,
    deferred_return: bool,
    outcome: Option<Outcome>,
}

impl SessionController {
    /// Validate `init` and build a session. Nothing is drawn until [`Self::start`].
    pub fn new(init: impl Into<FinderInit>, env: SessionEnv) -> Result<Self, ConfigError> {
        let (list, options) = init.into().into_parts()?;
        let state = FinderState::new(options.query.clone(), options.mode, options.keep_right);
        let list = if options.no_list {
            SourceList::default()
        } else {
            SourceList::new(list)
        };
        let latch = SelectOneLatch::new(options.select_one && !options.no_list, env.streaming);
        debug!(
            target: "session",
            items = list.len(),
            mode = %options.mode,
            no_list = options.no_list,
            streaming = env.streaming,
            hooks = !env.hooks.is_empty(),
            "session_created"
        );
        Ok(Self {
            state,
            options,
            list,
            results: ResultSet::default(),
            renderer: Renderer::new(Palette::new(env.capabilities.color), env.layout),
            hooks: env.hooks,
            size: env.size.unwrap_or(FALLBACK_SIZE),
            latch,
            printed_rows: 0,
            deferred_return: false,
            outcome: None,
        })
    }

    pub fn state(&self) -> &FinderState {
        &self.state
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn list(&self) -> &SourceList {
        &self.list
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Record the terminal geometry without painting; used before [`Self::start`].
    pub fn set_size(&mut self, size: (u16, u16)) {
        self.size = size;
    }

    pub fn latch(&self) -> SelectOneLatch {
        self.latch
    }

    pub fn printed_rows(&self) -> usize {
        self.printed_rows
    }

    /// Lines the band currently occupies on screen.
    pub fn band_extent(&self) -> u16 {
        self.renderer.extent()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// First recompute and paint.
    pub fn start<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.recompute();
        self.paint(out)
    }

    /// Synthetic Return left by the select-one latch, if any.
    pub fn take_deferred(&mut self) -> Option<Event> {
        if std::mem::take(&mut self.deferred_return) {
            Some(Event::key(KeyCode::Enter, KeyModifiers::empty()))
        } else {
            None
        }
    }

    pub fn handle<W: Write>(&mut self, event: &Event, out: &mut W) -> Result<Control> {
        if let Some(outcome) = &self.outcome {
            return Ok(Control::Exit(outcome.clone()));
        }
        trace!(target: "session", kind = event.kind(), "event");
        match event {
            Event::Input(InputEvent::Key(key)) => self.handle_key(key, out),
            Event::Input(InputEvent::Resize(columns, rows)) => {
                self.size = (*columns, *rows);
                self.paint(out)?;
                Ok(Control::Continue)
            }
            Event::ListUpdate(items) => self.replace_list(items, false, out),
            Event::ListSettled(items) => self.replace_list(items, true, out),
            Event::ListAppend(items) => self.append_list(items, out),
            Event::ListEnd => self.end_list(),
            Event::Shutdown => self.exit(Exit::Cancelled, out),
        }
    }

    /// Cancel from outside; the query is preserved.
    pub fn stop<W: Write>(&mut self, out: &mut W) -> Result<Outcome> {
        if let Some(outcome) = &self.outcome {
            return Ok(outcome.clone());
        }
        match self.exit(Exit::Cancelled, out)? {
            Control::Exit(outcome) => Ok(outcome),
            Control::Continue => Ok(Outcome::cancelled(self.state.query())),
        }
    }

    fn handle_key<W: Write>(&mut self, key: &KeyEvent, out: &mut W) -> Result<Control> {
        let Some(action) = translate_key(key) else {
            return Ok(Control::Continue);
        };
        let ctx = DispatchContext {
            match_count: self.results.len(),
            page_rows: self.printed_rows,
        };
        let result = dispatch(action, &mut self.state, ctx);
        if let Some(exit) = result.exit {
            return self.exit(exit, out);
        }
        if result.recompute {
            self.recompute();
        }
        if result.redraw {
            self.renderer.reset(out)?;
        }
        if result.dirty {
            self.paint(out)?;
        }
        Ok(Control::Continue)
    }

    fn replace_list<W: Write>(&mut self, items: &[String], settled: bool, out: &mut W) -> Result<Control> {
        if self.options.no_list {
            return Ok(Control::Continue);
        }
        self.list = SourceList::from_shared(items);
        if settled {
            self.latch.arm();
        }
        debug!(target: "session", items = self.list.len(), settled, "list_replaced");
        self.recompute();
        self.paint(out)?;
        Ok(Control::Continue)
    }

    fn append_list<W: Write>(&mut self, items: &[String], out: &mut W) -> Result<Control> {
        if self.options.no_list || items.is_empty() {
            return Ok(Control::Continue);
        }
        self.list.extend(items);
        debug!(target: "session", added = items.len(), items = self.list.len(), "list_appended");
        self.recompute();
        self.paint(out)?;
        Ok(Control::Continue)
    }

    /// The appending producer is done: arm the latch against the results already on screen.
    fn end_list(&mut self) -> Result<Control> {
        if self.options.no_list {
            return Ok(Control::Continue);
        }
        self.latch.arm();
        if self.latch.observe(self.results.len()) {
            self.deferred_return = true;
        }
        debug!(target: "session", items = self.list.len(), "list_ended");
        Ok(Control::Continue)
    }

    fn recompute(&mut self) {
        self.results = ResultSet::compute(&self.list, self.state.query(), self.state.mode);
        self.state.clamp_selection(self.results.len());
        if self.latch.observe(self.results.len()) {
            self.deferred_return = true;
        }
    }

    fn selected(&self) -> Option<Selected> {
        if self.options.no_list {
            return None;
        }
        let entry = self.results.get(self.state.selected_rank)?;
        let item = self.list.get(entry.original_index)?;
        Some(Selected {
            value: item.value.clone(),
            index: item.original_index,
        })
    }

    fn exit<W: Write>(&mut self, exit: Exit, out: &mut W) -> Result<Control> {
        self.renderer.erase(out)?;
        let selected = match exit {
            Exit::Finished => self.selected(),
            Exit::Cancelled => None,
        };
        let outcome = Outcome {
            selected,
            query: self.state.query().to_string(),
            status: exit,
        };
        info!(
            target: "session",
            status = ?exit,
            selected = outcome.selected.is_some(),
            query_len = outcome.query.len(),
            "session_end"
        );
        self.outcome = Some(outcome.clone());
        Ok(Control::Exit(outcome))
    }

    fn paint<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let (columns, rows) = self.size;
        let mut visible = Vec::new();
        let mut status = None;
        let selected = self.state.selected_rank;
        if !self.options.no_list {
            let window = vertical_window(
                self.results.len(),
                selected,
                self.options.min_rows,
                self.options.height,
                rows,
            );
            for rank in window.start..window.end {
                let Some(entry) = self.results.get(rank) else {
                    continue;
                };
                let Some(item) = self.list.get(entry.original_index) else {
                    continue;
                };
                visible.push((rank, entry, item));
            }
            status = Some(StatusContext {
                matched: self.results.len(),
                total: self.results.total(),
                mode: self.state.mode,
                keep_right: self.state.keep_right,
                scroll: self.state.horizontal_scroll,
            });
        }
        let decor: Vec<(String, String)> = visible
            .iter()
            .map(|(_, _, item)| self.hooks.around(item.original_index))
            .collect();
        let views: Vec<RowView<'_>> = visible
            .iter()
            .zip(&decor)
            .map(|((rank, entry, item), (prefix, suffix))| {
                RowView::new(item.text(), &entry.positions, entry.anchor, *rank == selected)
                    .decorated(prefix, suffix)
            })
            .collect();
        self.printed_rows = views.len();
        let frame = Frame {
            columns,
            label: &self.options.label,
            query: self.state.query(),
            cursor: self.state.editor.cursor(),
            status,
            rows: views,
            keep_right: self.state.keep_right,
            scroll: self.state.horizontal_scroll,
        };
        self.renderer.paint(&frame, out)
    }
}
