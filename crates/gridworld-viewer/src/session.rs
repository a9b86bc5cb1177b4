//! One viewer session: events in, intents out.
//!
//! Input and output are generic so the same loop drives stdin/stdout in
//! the binary and in-memory buffers in tests.

use gridworld_overlay::ChannelSink;
use gridworld_overlay::IntentSink;
use gridworld_overlay::config::OverlayConfig;
use gridworld_types::Intent;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::error::ViewerError;
use crate::events;
use crate::host::Host;

/// Outcome of a finished session.
#[derive(Debug)]
pub struct SessionReport {
    /// Events applied to the overlay.
    pub events: u64,
    /// PACs on the map when the session ended.
    pub live: usize,
    /// Intents written to the output.
    pub intents: u64,
    /// The error that stopped reading, if input did not end cleanly.
    pub read_error: Option<std::io::Error>,
}

/// Run a session until the input ends, a `detach` arrives, or reading
/// fails.
///
/// Intents queued before a read failure are still written; the failure
/// is reported in [`SessionReport::read_error`].
pub async fn run_session<R, W>(
    input: R,
    output: W,
    config: &OverlayConfig,
) -> Result<SessionReport, ViewerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let writer = tokio::spawn(write_intents(rx, output));

    let mut host = Host::new(config, ChannelSink::new(tx));
    let mount = host.mount();
    info!(
        region = %mount.region,
        lat = mount.center.lat,
        lng = mount.center.lng,
        zoom = mount.zoom,
        mode = ?config.reconcile.mode,
        "Overlay mounted"
    );

    let (events, read_error) = pump_events(input, &mut host).await;

    let live = host.bridge().reconciler().len();
    // Dropping the host closes the intent channel and lets the writer finish.
    drop(host);
    let intents = writer.await??;

    Ok(SessionReport {
        events,
        live,
        intents,
        read_error,
    })
}

/// Feed input lines to the host. Returns the number of events applied and
/// the read error that ended the loop, if any.
async fn pump_events<R, K>(input: R, host: &mut Host<K>) -> (u64, Option<std::io::Error>)
where
    R: AsyncRead + Unpin,
    K: IntentSink,
{
    let mut lines = BufReader::new(input).lines();
    let mut applied: u64 = 0;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return (applied, None),
            Err(e) => return (applied, Some(e)),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match events::parse_line(line) {
            Ok(event) => {
                applied = applied.saturating_add(1);
                if host.handle(event).is_break() {
                    return (applied, None);
                }
            }
            Err(e) => warn!("Skipping malformed event: {e}"),
        }
    }
}

/// Write every intent as one JSON line until the channel closes.
async fn write_intents<W>(
    mut rx: UnboundedReceiver<Intent>,
    mut output: W,
) -> Result<u64, ViewerError>
where
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(intent) = rx.recv().await {
        let mut line = serde_json::to_string(&intent)?;
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
        written = written.saturating_add(1);
    }
    Ok(written)
}
