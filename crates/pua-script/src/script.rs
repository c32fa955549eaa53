//! Script-facing entry point
//!
//! [`ScriptPublisher`] is what a routing script calls as `script_publish`.
//! Each call assembles one descriptor, dispatches it and drops it.

use std::sync::Arc;

use tracing::{debug, error};

use crate::config::PuaScriptConfig;
use crate::dispatch::{DispatchOutcome, PublishDispatcher, PublishStats, PuaPublisher};
use crate::error::{Result, ValidationWarning};
use crate::event::{DefaultEventRegistry, EventRegistry};
use crate::publication::PublicationAssembler;
use crate::tuple_id::TupleIdGenerator;

/// Return code when processing reached the dispatch step
pub const PROCESSED: i32 = 1;

/// Outcome of one `script_publish` call that reached dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub outcome: DispatchOutcome,
    pub warnings: Vec<ValidationWarning>,
}

/// Publishes presence on behalf of routing scripts
pub struct ScriptPublisher {
    config: PuaScriptConfig,
    events: Arc<dyn EventRegistry>,
    tuple_ids: TupleIdGenerator,
    dispatcher: PublishDispatcher,
}

impl ScriptPublisher {
    /// Create a publisher using the default event registry and an
    /// entropy-seeded tuple id generator
    pub fn new(
        config: PuaScriptConfig,
        publisher: Arc<dyn PuaPublisher>,
        stats: Arc<PublishStats>,
    ) -> Self {
        let dispatcher = PublishDispatcher::new(publisher, stats, config.send_enabled);
        Self {
            config,
            events: Arc::new(DefaultEventRegistry::new()),
            tuple_ids: TupleIdGenerator::new(),
            dispatcher,
        }
    }

    pub fn with_event_registry(mut self, events: Arc<dyn EventRegistry>) -> Self {
        self.events = events;
        self
    }

    pub fn with_tuple_ids(mut self, tuple_ids: TupleIdGenerator) -> Self {
        self.tuple_ids = tuple_ids;
        self
    }

    pub fn config(&self) -> &PuaScriptConfig {
        &self.config
    }

    pub fn stats(&self) -> &Arc<PublishStats> {
        self.dispatcher.stats()
    }

    /// Assemble and dispatch one publication.
    ///
    /// `uri` and `event_code` are the two optional script parameters.
    pub fn publish(&self, uri: Option<&str>, event_code: Option<&str>) -> Result<PublishReport> {
        debug!("Starting publisher");

        let assembly = PublicationAssembler::new(&self.config, self.events.as_ref(), &self.tuple_ids)
            .assemble(uri, event_code)?;
        let outcome = self.dispatcher.dispatch(&assembly.descriptor);

        Ok(PublishReport {
            outcome,
            warnings: assembly.warnings,
        })
    }

    /// Script binding of [`ScriptPublisher::publish`].
    ///
    /// Returns [`PROCESSED`] whenever dispatch was reached, even if sending is
    /// disabled or the PUA failed; otherwise the error's return code.
    pub fn script_publish(&self, uri: Option<&str>, event_code: Option<&str>) -> i32 {
        match self.publish(uri, event_code) {
            Ok(_) => PROCESSED,
            Err(e) => {
                error!(error = %e, "script_publish aborted");
                e.return_code()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::PublicationDescriptor;

    struct FixedPublisher(i32);

    impl PuaPublisher for FixedPublisher {
        fn send_publish(&self, _publication: &PublicationDescriptor) -> i32 {
            self.0
        }
    }

    fn publisher(code: i32, send_enabled: bool) -> ScriptPublisher {
        let config = PuaScriptConfig {
            send_enabled,
            default_expire: Some("3600".into()),
            default_event: Some("presence".into()),
            default_content_type: Some("application/pidf+xml".into()),
            default_etag: Some(".".into()),
            outbound_proxy: Some("sip:proxy.example.com".into()),
        };
        ScriptPublisher::new(config, Arc::new(FixedPublisher(code)), Arc::new(PublishStats::new()))
            .with_tuple_ids(TupleIdGenerator::from_seed(3))
    }

    #[test]
    fn test_failed_publish_still_processed() {
        let publisher = publisher(-1, true);
        assert_eq!(publisher.script_publish(Some("sip:a@example.com"), Some("1")), PROCESSED);
        assert_eq!(publisher.stats().publications_sent(), 1);
    }

    #[test]
    fn test_wrong_etag_outcome() {
        let publisher = publisher(418, true);
        let report = publisher.publish(Some("sip:a@example.com"), Some("3")).unwrap();
        assert_eq!(report.outcome, DispatchOutcome::WrongEtag);
    }

    #[test]
    fn test_disabled_send() {
        let publisher = publisher(200, false);
        let report = publisher.publish(Some("sip:a@example.com"), Some("2")).unwrap();
        assert_eq!(report.outcome, DispatchOutcome::NotSent);
        assert_eq!(publisher.stats().publications_sent(), 0);
    }

    #[test]
    fn test_abort_return_codes() {
        let publisher = publisher(200, true);
        assert_eq!(publisher.script_publish(None, None), -1);
        assert_eq!(publisher.script_publish(Some("sip:a@example.com"), None), crate::error::E_CFG);
        assert_eq!(publisher.script_publish(Some("sip:a@example.com"), Some("9")), -1);
        assert_eq!(publisher.stats().publications_sent(), 0);
    }
}
