//! Line-oriented list producer.
//!
//! Reads items one per line from any async reader (stdin for the binary). Blank lines are
//! dropped. While input is arriving, lines read since the last send go out as one
//! `ListAppend` at most once per debounce window. End of input flushes the rest and sends
//! `ListEnd`, which arms the select-one latch.

use core_events::{AsyncEventSource, Event, LIST_UPDATES_SENT};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub struct LineStreamSource<R> {
    reader: R,
    debounce: Duration,
}

impl<R> LineStreamSource<R> {
    pub fn new(reader: R, debounce: Duration) -> Self {
        Self { reader, debounce }
    }
}

impl<R> AsyncEventSource for LineStreamSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    fn name(&self) -> &'static str {
        "line_stream"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let LineStreamSource { reader, debounce } = *self;
        tokio::spawn(stream_lines(reader, debounce, tx))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamEnd {
    Eof,
    ReadError,
    ChannelClosed,
}

impl StreamEnd {
    fn as_str(&self) -> &'static str {
        match self {
            StreamEnd::Eof => "eof",
            StreamEnd::ReadError => "read_error",
            StreamEnd::ChannelClosed => "channel_closed",
        }
    }
}

async fn stream_lines<R>(reader: R, debounce: Duration, tx: Sender<Event>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut pending: Vec<String> = Vec::new();
    let mut sent = 0usize;
    let mut buf = Vec::new();
    let mut throttle = tokio::time::interval(debounce.max(Duration::from_millis(1)));
    throttle.set_missed_tick_behavior(MissedTickBehavior::Delay);
    throttle.tick().await;

    let end = loop {
        tokio::select! {
            // read_until keeps partial bytes in `buf` when another branch wins
            read = reader.read_until(b'\n', &mut buf) => match read {
                Ok(0) => break StreamEnd::Eof,
                Ok(_) => {
                    if let Some(item) = take_line(&mut buf) {
                        pending.push(item);
                    }
                }
                Err(err) => {
                    warn!(target: "runtime.source", error_kind = ?err.kind(), "line_stream_read_error");
                    break StreamEnd::ReadError;
                }
            },
            _ = throttle.tick(), if !pending.is_empty() => {
                let batch = std::mem::take(&mut pending);
                sent += batch.len();
                if !send(&tx, Event::ListAppend(Arc::from(batch))).await {
                    break StreamEnd::ChannelClosed;
                }
                debug!(target: "runtime.source", items = sent, "list_append_sent");
            }
            _ = tx.closed() => break StreamEnd::ChannelClosed,
        }
    };

    if end != StreamEnd::ChannelClosed {
        sent += pending.len();
        let flushed = pending.is_empty() || send(&tx, Event::ListAppend(Arc::from(pending))).await;
        if flushed {
            send(&tx, Event::ListEnd).await;
        }
    }
    info!(target: "runtime.source", reason = end.as_str(), items = sent, "line_stream_finished");
}

/// Decode one complete line and reset `buf`. Blank lines yield `None`.
fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    let mut end = buf.len();
    while end > 0 && matches!(buf[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let line = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.clear();
    if line.trim().is_empty() { None } else { Some(line) }
}

async fn send(tx: &Sender<Event>, event: Event) -> bool {
    if tx.send(event).await.is_err() {
        return false;
    }
    LIST_UPDATES_SENT.fetch_add(1, Ordering::Relaxed);
    true
}
