//! Progressive reveal of an already-known response string.
//!
//! The engine simulates incremental arrival by publishing a growing
//! prefix of the source text in fixed-size character batches. One owner
//! task holds all reveal state and drives it from a single periodic tick,
//! so a superseding reveal resets the state atomically and two responses'
//! characters can never interleave. The reveal is a cosmetic projection:
//! no step can fail or alter the underlying response.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Batch sizing for the reveal.
#[derive(Debug, Clone, Copy)]
pub struct RevealConfig {
    /// Characters revealed per tick.
    pub chars_per_batch: usize,
    /// Delay between ticks.
    pub batch_delay: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            chars_per_batch: 5,
            batch_delay: Duration::from_millis(12),
        }
    }
}

/// Handle to the reveal task.
///
/// `start` supersedes any reveal in progress; `subscribe` yields a watch
/// receiver over the currently visible prefix.
pub struct RevealEngine {
    cmd_tx: mpsc::UnboundedSender<String>,
    visible_tx: watch::Sender<String>,
    shutdown: CancellationToken,
}

impl RevealEngine {
    pub fn new(config: RevealConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (visible_tx, _visible_rx) = watch::channel(String::new());
        let shutdown = CancellationToken::new();

        tokio::spawn(engine_loop(
            config,
            cmd_rx,
            visible_tx.clone(),
            shutdown.clone(),
        ));

        Self {
            cmd_tx,
            visible_tx,
            shutdown,
        }
    }

    /// Begin revealing `text`, superseding any reveal in progress.
    pub fn start(&self, text: impl Into<String>) {
        let _ = self.cmd_tx.send(text.into());
    }

    /// Watch the currently visible prefix.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.visible_tx.subscribe()
    }

    /// Stop the engine; pending reveal steps never fire again.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for RevealEngine {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn engine_loop(
    config: RevealConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<String>,
    visible_tx: watch::Sender<String>,
    shutdown: CancellationToken,
) {
    let step = config.chars_per_batch.max(1);
    let mut ticker = tokio::time::interval(config.batch_delay);

    // Reveal state: the source text and the revealed byte offset, which is
    // always on a char boundary and non-decreasing within one session.
    let mut source = String::new();
    let mut revealed = 0usize;
    let mut active = false;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(text) => {
                        tracing::debug!(len = text.len(), "starting reveal");
                        source = text;
                        revealed = 0;
                        visible_tx.send_replace(String::new());
                        active = !source.is_empty();
                        if active {
                            // The first batch shows immediately; later
                            // batches follow the tick.
                            revealed = advance(&source, revealed, step);
                            visible_tx.send_replace(source[..revealed].to_string());
                            active = revealed < source.len();
                            ticker.reset();
                        }
                    }
                    None => break,
                }
            }
            _ = ticker.tick(), if active => {
                revealed = advance(&source, revealed, step);
                visible_tx.send_replace(source[..revealed].to_string());
                active = revealed < source.len();
            }
        }
    }
}

/// Byte offset after advancing `count` chars from `from`; clamps to the
/// end of the string.
fn advance(s: &str, from: usize, count: usize) -> usize {
    s[from..]
        .char_indices()
        .nth(count)
        .map(|(i, _)| from + i)
        .unwrap_or(s.len())
}
