//! Terminal geometry polling.
//!
//! Raw-mode input streams do not always surface resize notifications (for example when the UI
//! is drawn on a tty that is not the process' controlling stdin), so geometry is polled. After a
//! change the poller switches to a short interval until the size has been stable for one tick,
//! then falls back to the slow interval.

use core_events::{AsyncEventSource, Event, InputEvent, RESIZE_DETECTED};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

type SizeProbe = Box<dyn Fn() -> Option<(u16, u16)> + Send + Sync>;

pub struct ResizePollSource {
    probe: SizeProbe,
    poll: Duration,
    burst_poll: Duration,
}

impl ResizePollSource {
    pub fn new<F>(probe: F, poll: Duration, burst_poll: Duration) -> Self
    where
        F: Fn() -> Option<(u16, u16)> + Send + Sync + 'static,
    {
        Self {
            probe: Box::new(probe),
            poll,
            burst_poll,
        }
    }

    /// Poll the real terminal through crossterm.
    pub fn crossterm(poll: Duration, burst_poll: Duration) -> Self {
        Self::new(|| crossterm::terminal::size().ok(), poll, burst_poll)
    }
}

impl AsyncEventSource for ResizePollSource {
    fn name(&self) -> &'static str {
        "resize_poll"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let ResizePollSource {
            probe,
            poll,
            burst_poll,
        } = *self;
        tokio::spawn(async move {
            let mut last = probe();
            let mut bursting = false;
            loop {
                let wait = if bursting { burst_poll } else { poll };
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = tx.closed() => break,
                }
                let current = probe();
                if current == last {
                    bursting = false;
                    continue;
                }
                last = current;
                bursting = true;
                let Some((cols, rows)) = current else {
                    continue;
                };
                RESIZE_DETECTED.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: "runtime.source", cols, rows, "resize_detected");
                if tx
                    .send(Event::Input(InputEvent::Resize(cols, rows)))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        })
    }
}
