//! Handing descriptors to the PUA

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::publication::PublicationDescriptor;

/// PUA result code for a conditional publication whose etag did not match
pub const WRONG_ETAG: i32 = 418;

/// The PUA publish operation.
///
/// Implementations own transport, dialogs, authentication and retries.
/// The call is synchronous: negative codes are failures, [`WRONG_ETAG`]
/// reports a stale etag, other values are PUA-specific success codes.
pub trait PuaPublisher: Send + Sync {
    fn send_publish(&self, publication: &PublicationDescriptor) -> i32;
}

/// Counters owned by the hosting service
#[derive(Debug, Default)]
pub struct PublishStats {
    publications_sent: AtomicU64,
}

impl PublishStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of publications handed to the PUA, whatever the PUA answered
    pub fn publications_sent(&self) -> u64 {
        self.publications_sent.load(Ordering::Relaxed)
    }

    fn record_sent(&self) {
        self.publications_sent.fetch_add(1, Ordering::Relaxed);
    }
}

/// What happened to a descriptor at dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Sending is disabled; the PUA was not contacted
    NotSent,
    /// The PUA accepted the request with this code
    Sent(i32),
    /// The PUA reported a failure
    Failed(i32),
    /// The PUA rejected the etag
    WrongEtag,
}

impl DispatchOutcome {
    pub fn from_result_code(code: i32) -> Self {
        if code < 0 {
            DispatchOutcome::Failed(code)
        } else if code == WRONG_ETAG {
            DispatchOutcome::WrongEtag
        } else {
            DispatchOutcome::Sent(code)
        }
    }

    /// True when the PUA was called
    pub fn was_dispatched(&self) -> bool {
        !matches!(self, DispatchOutcome::NotSent)
    }
}

/// Submits descriptors to the PUA unless sending is switched off
pub struct PublishDispatcher {
    publisher: Arc<dyn PuaPublisher>,
    stats: Arc<PublishStats>,
    send_enabled: bool,
}

impl PublishDispatcher {
    pub fn new(publisher: Arc<dyn PuaPublisher>, stats: Arc<PublishStats>, send_enabled: bool) -> Self {
        Self {
            publisher,
            stats,
            send_enabled,
        }
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn stats(&self) -> &Arc<PublishStats> {
        &self.stats
    }

    pub fn dispatch(&self, publication: &PublicationDescriptor) -> DispatchOutcome {
        if !self.send_enabled {
            info!("NO PUBLISH SENT, enable send_enabled to publish");
            return DispatchOutcome::NotSent;
        }

        let code = self.publisher.send_publish(publication);
        self.stats.record_sent();
        info!(uri = %publication.presentity_uri(), "Sending PUBLISH called via script");

        let outcome = DispatchOutcome::from_result_code(code);
        match outcome {
            DispatchOutcome::Failed(code) => error!(code, "Sending publish failed"),
            DispatchOutcome::WrongEtag => error!(etag = ?publication.etag(), "Wrong Etag"),
            _ => {}
        }
        outcome
    }
}
