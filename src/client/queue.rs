use std::collections::VecDeque;
use tokio::sync::{Mutex, Notify};

use crate::error::LiveError;

/// Unbounded FIFO of decoded audio buffers between the inbound dispatcher
/// (single producer) and the draining consumer.
///
/// `clear` runs under the same lock as `push`, so an interruption wipe can
/// never interleave with an enqueue. Termination is a state of the queue
/// itself: a clean close ends the sequence with `None`, a transport failure
/// is handed to the consumer exactly once.
pub(crate) struct AudioQueue {
    state: Mutex<QueueState>,
    notify: Notify,
}

struct QueueState {
    chunks: VecDeque<Vec<u8>>,
    closed: bool,
    error: Option<LiveError>,
}

impl AudioQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                chunks: VecDeque::new(),
                closed: false,
                error: None,
            }),
            notify: Notify::new(),
        }
    }

    pub(crate) async fn push(&self, chunk: Vec<u8>) {
        let mut state = self.state.lock().await;
        if state.closed {
            tracing::debug!("dropping audio chunk pushed after close");
            return;
        }
        state.chunks.push_back(chunk);
        self.notify.notify_one();
    }

    /// Discards every buffered chunk. Used when a turn-complete signal
    /// invalidates audio that has not been consumed yet.
    pub(crate) async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.chunks.clear();
    }

    /// Ends the sequence cleanly; buffered chunks still drain first.
    pub(crate) async fn close(&self) {
        let mut state = self.state.lock().await;
        state.closed = true;
        self.notify.notify_one();
    }

    /// Ends the sequence with a terminal error, delivered once.
    pub(crate) async fn fail(&self, error: LiveError) {
        let mut state = self.state.lock().await;
        state.closed = true;
        state.error = Some(error);
        self.notify.notify_one();
    }

    /// Next buffered chunk, waiting for the producer if none is queued.
    /// `Ok(None)` means the sequence has finished.
    pub(crate) async fn pop(&self) -> Result<Option<Vec<u8>>, LiveError> {
        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(chunk) = state.chunks.pop_front() {
                    return Ok(Some(chunk));
                }
                if let Some(error) = state.error.take() {
                    return Err(error);
                }
                if state.closed {
                    return Ok(None);
                }
            }
            self.notify.notified().await;
        }
    }
}
