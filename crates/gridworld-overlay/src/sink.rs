//! Outbound intent sink trait and implementations.
//!
//! The bridge never talks to the transport directly. Every intent it
//! raises goes through an [`IntentSink`]; delivery is fire-and-forget with
//! no acknowledgement and no retry.

use gridworld_types::Intent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// A destination for outbound intents.
pub trait IntentSink {
    /// Hand one intent to the transport.
    fn emit(&mut self, intent: Intent);
}

/// A sink that collects intents in memory.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    intents: Vec<Intent>,
}

impl VecSink {
    /// Create an empty sink.
    pub const fn new() -> Self {
        Self {
            intents: Vec::new(),
        }
    }

    /// Intents emitted so far, oldest first.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Take every collected intent, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }
}

impl IntentSink for VecSink {
    fn emit(&mut self, intent: Intent) {
        self.intents.push(intent);
    }
}

/// A sink that forwards intents over an unbounded tokio channel.
///
/// Intents emitted after the receiver is gone are dropped with a warning.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<Intent>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel.
    pub const fn new(tx: UnboundedSender<Intent>) -> Self {
        Self { tx }
    }
}

impl IntentSink for ChannelSink {
    fn emit(&mut self, intent: Intent) {
        if let Err(e) = self.tx.send(intent) {
            warn!(event = e.0.event_name(), "Intent dropped, channel closed");
        }
    }
}
