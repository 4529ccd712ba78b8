use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::*;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Notify;
use xstream::{Inbound, Outbound, Segment, StreamConfig};

use crate::trace::Trace;

/// Bytes taken from the stream per read.
const READ_CHUNK: usize = 4096;

/// Outcome of one replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub delivered: u64,
    pub pending: u64,
    pub closed: bool,
    pub finished: bool,
    pub errored: bool,
}

/// Feeds a trace through a channel while draining it into a sink.
pub struct ReplaySession {
    config: StreamConfig,
}

impl ReplaySession {
    pub fn new(config: StreamConfig) -> Self {
        Self { config }
    }

    pub async fn run<W>(&self, trace: Trace, sink: &mut W) -> std::io::Result<ReplayReport>
    where
        W: AsyncWrite + Unpin,
    {
        let (inbound, outbound) = xstream::channel(&self.config);
        let ready = Arc::new(Notify::new());
        let room = Arc::new(Notify::new());
        let done = Arc::new(AtomicBool::new(false));

        info!(
            "Replaying {} segments ({} payload bytes), capacity {}",
            trace.segments.len(),
            trace.payload_bytes(),
            self.config.capacity
        );
        let start = Instant::now();

        let feeder = tokio::spawn(feed(
            inbound.clone(),
            trace,
            ready.clone(),
            room.clone(),
            done.clone(),
        ));

        let delivered = drain(&outbound, sink, &ready, &room, &done).await?;
        feeder.await.map_err(std::io::Error::other)?;

        let report = ReplayReport {
            delivered,
            pending: inbound.bytes_pending(),
            closed: inbound.is_closed(),
            finished: outbound.is_finished(),
            errored: outbound.has_error(),
        };

        let elapsed = start.elapsed();
        info!("=== Replay Complete ===");
        info!("Delivered: {} bytes", report.delivered);
        info!("Pending: {} bytes", report.pending);
        info!("Closed: {}, finished: {}", report.closed, report.finished);
        info!("Time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

        Ok(report)
    }
}

/// Receive path: behaves like a retransmitting peer. Segments still needed
/// are offered again each time the reader frees room, and the end of the
/// stream is flagged only once it fits inside the window. Stops when every
/// byte is in or when nothing left in the trace can fill the next gap.
async fn feed(
    inbound: Inbound,
    trace: Trace,
    ready: Arc<Notify>,
    room: Arc<Notify>,
    done: Arc<AtomicBool>,
) {
    let mut remaining: Vec<&Segment> = trace.segments.iter().collect();
    let mut passes = 0u64;

    while !remaining.is_empty() {
        let before = window(&inbound);
        for segment in &remaining {
            insert(&inbound, segment);
            ready.notify_one();
            tokio::task::yield_now().await;
        }
        passes += 1;

        let next_index = inbound.next_index();
        let closed = inbound.is_closed();
        remaining.retain(|segment| segment.end() > next_index || (segment.is_last && !closed));
        if remaining.is_empty() {
            break;
        }

        let (next_index, window_end) = window(&inbound);
        if (next_index, window_end) != before {
            continue;
        }
        if window_end - next_index < inbound.capacity() {
            // Buffered bytes are waiting on the reader
            room.notified().await;
            continue;
        }

        warn!(
            "Stalled at byte {} with {} segments unusable",
            next_index,
            remaining.len()
        );
        break;
    }
    debug!("Feeder finished after {} passes", passes);

    if let Some((line, e)) = &trace.malformed {
        error!("Malformed trace at line {}: {}", line, e);
        inbound.set_error();
    }

    done.store(true, Ordering::Release);
    ready.notify_one();
}

/// Returns `(next_index, window_end)` for the stream behind `inbound`.
fn window(inbound: &Inbound) -> (u64, u64) {
    let next_index = inbound.next_index();
    (next_index, next_index.saturating_add(inbound.available_capacity()))
}

fn insert(inbound: &Inbound, segment: &Segment) {
    let (_, window_end) = window(inbound);
    let is_last = segment.is_last && segment.end() <= window_end;
    trace!(
        "Insert [{}, {}){}",
        segment.offset,
        segment.end(),
        if is_last { " last" } else { "" }
    );
    inbound.insert(segment.offset, &segment.payload, is_last);
}

/// Application path: copies delivered bytes to `sink` until the stream
/// finishes or the feeder has nothing left to give.
async fn drain<W>(
    outbound: &Outbound,
    sink: &mut W,
    ready: &Notify,
    room: &Notify,
    done: &AtomicBool,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut delivered = 0u64;
    loop {
        // Load before reading so a final insert is never missed.
        let feeding_done = done.load(Ordering::Acquire);

        let chunk = outbound.read(READ_CHUNK);
        if !chunk.is_empty() {
            room.notify_one();
            sink.write_all(&chunk).await?;
            delivered += chunk.len() as u64;
            continue;
        }

        if outbound.has_error() {
            warn!("Stream reported an error after {} bytes", delivered);
            break;
        }
        if outbound.is_finished() || feeding_done {
            break;
        }

        ready.notified().await;
    }
    sink.flush().await?;
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(capacity: u64) -> ReplaySession {
        ReplaySession::new(StreamConfig::new().with_capacity(capacity))
    }

    #[tokio::test]
    async fn test_replay_out_of_order_trace() {
        let trace = Trace::parse("6 F World\n0 - Hello \n3 - lo W\n");
        let mut out = Vec::new();

        let report = session(64).run(trace, &mut out).await.unwrap();

        assert_eq!(out, b"Hello World");
        assert_eq!(report.delivered, 11);
        assert!(report.closed);
        assert!(report.finished);
        assert!(!report.errored);
    }

    #[tokio::test]
    async fn test_replay_scrambled_split() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 97) as u8).collect();
        let mut trace = Trace::split(&data, 100);
        trace.scramble(Some(42), true);
        let mut out = Vec::new();

        let report = session(data.len() as u64).run(trace, &mut out).await.unwrap();

        assert_eq!(out, data);
        assert!(report.finished);
        assert_eq!(report.pending, 0);
    }

    #[tokio::test]
    async fn test_replay_capacity_below_input() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 97) as u8).collect();
        let trace = Trace::split(&data, 100);
        let mut out = Vec::new();

        let report = session(256).run(trace, &mut out).await.unwrap();

        assert_eq!(out, data);
        assert_eq!(report.delivered, data.len() as u64);
        assert!(report.finished);
        assert_eq!(report.pending, 0);
    }

    #[tokio::test]
    async fn test_replay_capacity_below_input_scrambled() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 89) as u8).collect();
        let mut trace = Trace::split(&data, 100);
        trace.scramble(Some(7), true);
        let mut out = Vec::new();

        let report = session(256).run(trace, &mut out).await.unwrap();

        assert_eq!(out, data);
        assert!(report.closed);
        assert!(report.finished);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_replay_capacity_below_input_multi_thread() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        for seed in 0..8 {
            let mut trace = Trace::split(&data, 100);
            trace.scramble(Some(seed), seed % 2 == 0);
            let mut out = Vec::new();

            let report = session(256).run(trace, &mut out).await.unwrap();

            assert_eq!(out, data, "seed {seed}");
            assert!(report.finished, "seed {seed}");
        }
    }

    #[tokio::test]
    async fn test_replay_last_segment_beyond_window() {
        let trace = Trace::parse("8 F ijkl\n4 - efgh\n0 - abcd\n");
        let mut out = Vec::new();

        let report = session(4).run(trace, &mut out).await.unwrap();

        assert_eq!(out, b"abcdefghijkl");
        assert!(report.finished);
    }

    #[tokio::test]
    async fn test_replay_gap_never_finishes() {
        let trace = Trace::parse("0 - abc\n5 F fg\n");
        let mut out = Vec::new();

        let report = session(64).run(trace, &mut out).await.unwrap();

        assert_eq!(out, b"abc");
        assert_eq!(report.pending, 2);
        assert!(!report.closed);
        assert!(!report.finished);
    }

    #[tokio::test]
    async fn test_replay_malformed_sets_error() {
        let trace = Trace::parse("0 - abc\n3 ? def\n");
        let mut out = Vec::new();

        let report = session(64).run(trace, &mut out).await.unwrap();

        assert!(report.errored);
        assert!(!report.finished);
    }
}
