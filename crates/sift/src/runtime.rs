//! Async event loop driving one [`SessionController`].
//!
//! The loop owns the receiving end of the event channel. Terminal input, resize polling and
//! list streaming run as separate tasks and only talk to the session through that channel, so
//! every state change happens on this task, one event at a time.

use anyhow::Result;
use core_config::{ConfigFile, FinderInit, TimingConfig};
use core_events::{AsyncEventSource, EVENT_CHANNEL_CAP, Event, EventSourceRegistry};
use core_input::AsyncInputShutdown;
use core_render::{CutLayout, RowHooks};
use core_session::{Control, Outcome, SessionController, SessionEnv};
use core_terminal::{
    CrosstermBackend, ResizePollSource, TerminalBackend, TerminalCapabilities, enter_guard,
};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, trace, warn};

const TASK_JOIN_TIMEOUT: Duration = Duration::from_millis(200);

/// Builder and runner for one interactive finder session.
pub struct Finder {
    init: FinderInit,
    layout: CutLayout,
    timing: TimingConfig,
    capabilities: Option<TerminalCapabilities>,
    hooks: RowHooks,
    streaming: bool,
    keyboard: bool,
    resize_polling: bool,
    registry: EventSourceRegistry,
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

/// Cloneable handle for feeding a running [`Finder`] from other tasks.
#[derive(Clone, Debug)]
pub struct FinderHandle {
    tx: mpsc::Sender<Event>,
}

impl FinderHandle {
    /// Replace the source list; the query and cursor are kept.
    pub async fn update<I, S>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(Event::list_update(items)).await
    }

    /// Final replacement of a streamed list. Arms the select-one latch.
    pub async fn settle<I, S>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Arc<[String]> = items.into_iter().map(Into::into).collect();
        self.send(Event::ListSettled(items)).await
    }

    /// Cancel the session from outside. The query is preserved in the outcome.
    pub async fn stop(&self) -> Result<()> {
        self.send(Event::Shutdown).await
    }

    pub async fn send(&self, event: Event) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("finder session has ended"))
    }
}

impl Finder {
    pub fn new(init: impl Into<FinderInit>) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAP);
        Self {
            init: init.into(),
            layout: CutLayout::default(),
            timing: TimingConfig::default(),
            capabilities: None,
            hooks: RowHooks::default(),
            streaming: false,
            keyboard: true,
            resize_polling: true,
            registry: EventSourceRegistry::new(),
            tx,
            rx,
        }
    }

    /// Take layout and timing from a loaded config file.
    pub fn with_config(mut self, file: &ConfigFile) -> Self {
        self.layout = CutLayout {
            gutter: file.layout.gutter,
            right_margin: file.layout.right_margin,
        };
        self.timing = file.timing;
        self
    }

    /// Override colour detection.
    pub fn with_capabilities(mut self, capabilities: TerminalCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// The list arrives from a registered source or a [`FinderHandle`] and is complete only
    /// once it settles or ends. Select-one waits for that.
    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Draw `hook(original_index)` between the gutter and each match row.
    pub fn with_row_prefix<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.hooks.prefix = Some(Arc::new(hook));
        self
    }

    /// Draw `hook(original_index)` after each match row.
    pub fn with_row_suffix<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.hooks.suffix = Some(Arc::new(hook));
        self
    }

    /// Debounce window list producers should batch updates over.
    pub fn update_debounce(&self) -> Duration {
        self.timing.update_debounce()
    }

    /// Do not read keys from the controlling terminal; events come only through handles.
    pub fn without_keyboard(mut self) -> Self {
        self.keyboard = false;
        self
    }

    /// Do not poll the terminal for size changes.
    pub fn without_resize_polling(mut self) -> Self {
        self.resize_polling = false;
        self
    }

    pub fn register_source<S: AsyncEventSource>(&mut self, source: S) {
        self.registry.register(source);
    }

    pub fn handle(&self) -> FinderHandle {
        FinderHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run on the real terminal, drawing to the controlling tty.
    pub async fn run(self) -> Result<Outcome> {
        let mut backend = CrosstermBackend::new();
        let mut out = ui_writer();
        self.run_with(&mut backend, &mut out).await
    }

    /// Run against any backend and writer.
    pub async fn run_with<B, W>(self, backend: &mut B, out: &mut W) -> Result<Outcome>
    where
        B: TerminalBackend,
        W: Write,
    {
        let Finder {
            init,
            layout,
            timing,
            capabilities,
            hooks,
            streaming,
            keyboard,
            resize_polling,
            mut registry,
            tx,
            rx,
        } = self;

        let env = SessionEnv {
            capabilities: capabilities.unwrap_or_else(TerminalCapabilities::detect),
            size: None,
            layout,
            streaming,
            hooks,
        };
        let mut session = SessionController::new(init, env)?;

        let guard = match enter_guard(backend) {
            Ok(guard) => guard,
            Err(err) => {
                warn!(target: "runtime", error = %err, "terminal_unavailable");
                return Ok(Outcome::cancelled(session.state().query()));
            }
        };
        if let Some(size) = guard.size() {
            session.set_size(size);
        }
        info!(
            target: "runtime",
            columns = session.size().0,
            rows = session.size().1,
            streaming,
            "startup"
        );

        let mut tasks = RuntimeTasks::default();
        if keyboard {
            tasks.input = Some(core_input::spawn_async_input(tx.clone()));
        }
        if resize_polling {
            registry.register(ResizePollSource::crossterm(
                timing.resize_poll(),
                timing.resize_burst_poll(),
            ));
        }
        tasks.sources = registry.spawn_all(&tx);
        trace!(target: "runtime", "dropping_runtime_sender");
        drop(tx);

        let mut event_loop = EventLoop { session, rx, tasks };
        let result = event_loop.run(out).await;
        let release = guard.release();
        let outcome = result?;
        if let Err(err) = release {
            error!(target: "runtime", error = %err, "terminal_release_failed");
        }
        Ok(outcome)
    }
}

/// Prompt-only input capture: no list, no status line, never a selection.
pub async fn get_input(label: impl Into<String>) -> Result<String> {
    let options = core_config::SessionOptions {
        label: label.into(),
        no_list: true,
        ..Default::default()
    };
    let outcome = Finder::new(FinderInit::with_options(Vec::new(), options))
        .without_resize_polling()
        .run()
        .await?;
    Ok(outcome.query)
}

/// Controlling terminal when there is one, stderr otherwise. Stdout stays free for results.
pub fn ui_writer() -> Box<dyn Write + Send> {
    match std::fs::OpenOptions::new().write(true).open("/dev/tty") {
        Ok(tty) => Box::new(io::BufWriter::new(tty)),
        Err(err) => {
            debug!(target: "runtime", error = %err, "tty_unavailable_using_stderr");
            Box::new(io::stderr())
        }
    }
}

#[derive(Default)]
struct RuntimeTasks {
    sources: Vec<JoinHandle<()>>,
    input: Option<(JoinHandle<()>, AsyncInputShutdown)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    SessionExit,
    ShutdownEvent,
    ChannelClosed,
    Fault,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::SessionExit => "session_exit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
            ShutdownReason::Fault => "fault",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

struct EventLoop {
    session: SessionController,
    rx: mpsc::Receiver<Event>,
    tasks: RuntimeTasks,
}

impl EventLoop {
    async fn run<W: Write>(&mut self, out: &mut W) -> Result<Outcome> {
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let result = self.pump(out).instrument(span).await;
        self.rx.close();
        match result {
            Ok((reason, outcome)) => {
                self.finalize_shutdown(reason).await;
                Ok(outcome)
            }
            Err(err) => {
                error!(target: "runtime", error = %err, "event_loop_failed");
                self.finalize_shutdown(ShutdownReason::Fault).await;
                Err(err)
            }
        }
    }

    /// Feed events to the session until it exits. The runtime holds no sender, so a closed
    /// channel means every producer and handle is gone.
    async fn pump<W: Write>(&mut self, out: &mut W) -> Result<(ShutdownReason, Outcome)> {
        self.session.start(out)?;
        if let Some(exit) = self.drain_deferred(out)? {
            return Ok((ShutdownReason::SessionExit, exit));
        }
        while let Some(event) = self.rx.recv().await {
            let reason = match event {
                Event::Shutdown => ShutdownReason::ShutdownEvent,
                _ => ShutdownReason::SessionExit,
            };
            if let Control::Exit(outcome) = self.session.handle(&event, out)? {
                return Ok((reason, outcome));
            }
            if let Some(exit) = self.drain_deferred(out)? {
                return Ok((ShutdownReason::SessionExit, exit));
            }
        }
        let outcome = self.session.stop(out)?;
        Ok((ShutdownReason::ChannelClosed, outcome))
    }

    fn drain_deferred<W: Write>(&mut self, out: &mut W) -> Result<Option<Outcome>> {
        while let Some(event) = self.session.take_deferred() {
            debug!(target: "runtime", kind = event.kind(), "deferred_event");
            if let Control::Exit(outcome) = self.session.handle(&event, out)? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");

        while let Some(handle) = self.tasks.sources.pop() {
            let abort = handle.abort_handle();
            match tokio::time::timeout(TASK_JOIN_TIMEOUT, handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => {
                    warn!(
                        target: "runtime.shutdown",
                        reason = reason.as_str(),
                        "event_source_task_timeout"
                    );
                    abort.abort();
                }
            }
        }

        if let Some((handle, shutdown)) = self.tasks.input.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
            match tokio::time::timeout(TASK_JOIN_TIMEOUT, handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_timeout"
                ),
            }
        }

        log_shutdown_stage(reason, "complete");
    }
}
