//! Line-oriented event source.
//!
//! Reads newline-delimited JSON where each line is one batch (a JSON array of
//! events). Blank lines and lines starting with `#` are skipped. A line that
//! is not a JSON array is logged and skipped; malformed events inside a valid
//! batch are logged and dropped while their siblings are delivered.
//!
//! Standard input is read on a dedicated thread so a pending read never holds
//! up runtime shutdown.

use kanau::processor::Processor;
use livefeed_core::events::EventBatch;
use livefeed_core::source::{BatchHandler, DeliveryError, EventSource};
use livefeed_sdk::objects::decode_batch;
use thiserror::Error;
use std::io::{self, BufRead};
use time::OffsetDateTime;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::{LinesStream, ReceiverStream};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

/// Lines buffered between the reader thread and the source.
const READER_THREAD_BUFFER: usize = 64;

/// Line stream fed by a blocking reader thread.
pub type ThreadLines = ReceiverStream<io::Result<String>>;

/// Errors that stop the source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("no event handler registered")]
    NoHandler,
}

/// Counters reported when the source finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub batches: usize,
    pub events: usize,
    pub rejected_events: usize,
    pub invalid_lines: usize,
}

pub struct LineEventSource<S> {
    lines: S,
    restamp: bool,
    handler: Option<BatchHandler>,
}

impl<R: AsyncBufRead + Unpin> LineEventSource<LinesStream<R>> {
    pub fn new(reader: R) -> Self {
        Self::from_lines(LinesStream::new(reader.lines()))
    }
}

impl LineEventSource<ThreadLines> {
    /// Read standard input on its own thread.
    pub fn stdin() -> io::Result<Self> {
        let lines = spawn_line_reader("stdin-reader", io::BufReader::new(io::stdin()))?;
        Ok(Self::from_lines(lines))
    }
}

impl<S: Stream<Item = io::Result<String>> + Unpin> LineEventSource<S> {
    pub fn from_lines(lines: S) -> Self {
        Self {
            lines,
            restamp: false,
            handler: None,
        }
    }

    /// Stamp every event with the time its line was read.
    pub fn restamp(mut self, restamp: bool) -> Self {
        self.restamp = restamp;
        self
    }

    /// Read until end of input or shutdown, delivering each batch.
    ///
    /// The handler is dropped on return, which closes the batch channel once
    /// no other handler clone is alive.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<SourceStats, SourceError> {
        let handler = self.handler.ok_or(SourceError::NoHandler)?;
        let mut lines = self.lines;
        let mut stats = SourceStats::default();
        let mut line_no = 0usize;

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Event source received shutdown signal");
                        break;
                    }
                }

                line = lines.next() => {
                    let Some(line) = line else {
                        debug!(lines = line_no, "End of input");
                        break;
                    };
                    line_no += 1;
                    let Some(batch) = parse_line(&line?, line_no, self.restamp, &mut stats) else {
                        continue;
                    };
                    if let Err(DeliveryError::Closed) = handler.process(batch).await {
                        warn!("Scheduler stopped, no longer reading input");
                        break;
                    }
                }
            }
        }

        info!(
            batches = stats.batches,
            events = stats.events,
            rejected_events = stats.rejected_events,
            invalid_lines = stats.invalid_lines,
            "Event source finished"
        );
        Ok(stats)
    }
}

impl<S> EventSource for LineEventSource<S> {
    fn set_event_handler(&mut self, handler: BatchHandler) {
        if self.handler.replace(handler).is_some() {
            warn!("Event handler replaced; only one handler is supported");
        }
    }
}

/// Read `reader` line by line on a new thread.
///
/// The thread stops after end of input, after a read error, or once the
/// returned stream is dropped and the next line fails to send. A read that
/// never completes leaves only that thread blocked.
pub fn spawn_line_reader<R>(name: &str, reader: R) -> io::Result<ThreadLines>
where
    R: BufRead + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::channel(READER_THREAD_BUFFER);
    std::thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if line_tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(ReceiverStream::new(line_rx))
}

fn parse_line(
    line: &str,
    line_no: usize,
    restamp: bool,
    stats: &mut SourceStats,
) -> Option<EventBatch> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut decoded = match decode_batch(line) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(line = line_no, error = %e, "Skipping invalid batch line");
            stats.invalid_lines += 1;
            return None;
        }
    };

    for rejected in &decoded.rejected {
        warn!(
            line = line_no,
            index = rejected.index,
            error = %rejected.error,
            "Rejected malformed event"
        );
    }
    stats.rejected_events += decoded.rejected.len();

    if restamp {
        let now = OffsetDateTime::now_utc();
        for event in &mut decoded.events {
            event.timestamp = now;
        }
    }

    stats.batches += 1;
    stats.events += decoded.events.len();
    Some(EventBatch::new(decoded.events))
}
