//! # rvoip-pua-script
//!
//! Publish presence from SIP routing scripts without an external presence
//! agent.
//!
//! A script call names a presentity URI and a numeric state (1 open/unknown,
//! 2 closed, 3 open/busy). The crate renders a PIDF document for it, builds a
//! PUBLISH descriptor from the module settings and hands it to the presence
//! user agent (PUA), which owns transport, dialogs and retries.
//!
//! ```text
//! script_publish(uri, code)
//!     -> TupleIdGenerator + render_pidf
//!     -> PublicationAssembler
//!     -> PublishDispatcher
//!     -> PuaPublisher::send_publish
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rvoip_pua_script::{
//!     PublicationDescriptor, PublishStats, PuaPublisher, PuaScriptConfig, ScriptPublisher,
//! };
//!
//! struct LoggingPua;
//!
//! impl PuaPublisher for LoggingPua {
//!     fn send_publish(&self, publication: &PublicationDescriptor) -> i32 {
//!         println!("PUBLISH {}", publication.presentity_uri());
//!         0
//!     }
//! }
//!
//! let config = PuaScriptConfig::from_toml_str(r#"
//!     send_enabled = true
//!     default_expire = "3600"
//!     default_event = "presence"
//!     default_content_type = "application/pidf+xml"
//!     default_etag = "."
//!     outbound_proxy = "sip:proxy.example.com"
//! "#).unwrap();
//!
//! let stats = Arc::new(PublishStats::new());
//! let publisher = ScriptPublisher::new(config, Arc::new(LoggingPua), stats.clone());
//!
//! assert_eq!(publisher.script_publish(Some("sip:alice@example.com"), Some("3")), 1);
//! assert_eq!(stats.publications_sent(), 1);
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod logging;
pub mod pidf;
pub mod publication;
pub mod script;
pub mod tuple_id;
pub mod uri;

pub use config::PuaScriptConfig;
pub use dispatch::{DispatchOutcome, PublishDispatcher, PublishStats, PuaPublisher, WRONG_ETAG};
pub use error::{PuaScriptError, Result, ValidationWarning};
pub use event::{DefaultEventRegistry, EventRegistry};
pub use logging::{setup_logging, LoggingConfig};
pub use pidf::{render_pidf, BasicStatus, PresenceEvent};
pub use publication::{PublicationAssembler, PublicationDescriptor};
pub use script::{PublishReport, ScriptPublisher, PROCESSED};
pub use tuple_id::{TupleIdGenerator, TUPLE_ID_LEN};
