//! Publication descriptors and their assembly
//!
//! A [`PublicationDescriptor`] is built in full by
//! [`PublicationAssembler::assemble`] or not at all. It owns its body and id
//! and is dropped as soon as the dispatcher returns.

use tracing::{debug, error};

use crate::config::PuaScriptConfig;
use crate::error::{PuaScriptError, Result, ValidationWarning};
use crate::event::EventRegistry;
use crate::pidf::{render_pidf, PresenceEvent};
use crate::tuple_id::TupleIdGenerator;
use crate::uri::parse_sip_uri;

/// Prefix of the correlation id used for update requests
pub const ID_PREFIX: &str = "SCRIPT_PUBLISH.";

/// Publication updates an existing record
pub const UPDATE_TYPE: u32 = 1 << 2;

/// Publication originates from a routing script
pub const SCRIPT_PUBLISH: u32 = 1 << 9;

/// A complete PUBLISH request handed to the PUA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationDescriptor {
    presentity_uri: String,
    body: String,
    event: i32,
    expires: i32,
    content_type: Option<String>,
    etag: Option<String>,
    outbound_proxy: String,
    id: String,
    flag: u32,
    source_flag: u32,
}

impl PublicationDescriptor {
    pub fn presentity_uri(&self) -> &str {
        &self.presentity_uri
    }

    /// Rendered PIDF document
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Event package flag; negative when the configured name was unknown
    pub fn event(&self) -> i32 {
        self.event
    }

    /// Signed expiry in seconds
    pub fn expires(&self) -> i32 {
        self.expires
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn outbound_proxy(&self) -> &str {
        &self.outbound_proxy
    }

    /// Correlation id, `SCRIPT_PUBLISH.` followed by the presentity URI
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn flag(&self) -> u32 {
        self.flag
    }

    pub fn source_flag(&self) -> u32 {
        self.source_flag
    }

    pub fn is_update(&self) -> bool {
        self.flag & UPDATE_TYPE != 0
    }

    pub fn is_script_originated(&self) -> bool {
        self.source_flag & SCRIPT_PUBLISH != 0
    }
}

/// Result of a successful assembly
#[derive(Debug)]
pub struct Assembly {
    pub descriptor: PublicationDescriptor,
    /// Anomalies logged while assembling
    pub warnings: Vec<ValidationWarning>,
}

/// Turns script parameters and module settings into a descriptor
pub struct PublicationAssembler<'a> {
    config: &'a PuaScriptConfig,
    events: &'a dyn EventRegistry,
    tuple_ids: &'a TupleIdGenerator,
}

impl<'a> PublicationAssembler<'a> {
    pub fn new(
        config: &'a PuaScriptConfig,
        events: &'a dyn EventRegistry,
        tuple_ids: &'a TupleIdGenerator,
    ) -> Self {
        Self {
            config,
            events,
            tuple_ids,
        }
    }

    /// Validate the parameters and build the descriptor.
    ///
    /// Steps run in a fixed order: URI, event code, required settings, body,
    /// URI syntax, expiry, event package, content type and etag, id, flags.
    /// URI syntax and event package problems are only warnings.
    pub fn assemble(&self, uri: Option<&str>, event_code: Option<&str>) -> Result<Assembly> {
        let presentity_uri = match uri {
            Some(uri) if !uri.is_empty() => uri,
            _ => {
                error!("invalid uri parameter");
                return Err(PuaScriptError::MissingUri);
            }
        };
        debug!(uri = %presentity_uri, "function parameter URI");

        let presence = parse_event_code(event_code)?;
        debug!(event = presence.code(), "function parameter event");

        let settings = self.config.required().map_err(|e| {
            error!(error = %e, "incomplete configuration");
            e
        })?;

        let tuple_id = self.tuple_ids.generate();
        debug!(tuple_id = %tuple_id, "tuple id created");
        let body = render_pidf(presence, presentity_uri, &tuple_id);

        let mut warnings = Vec::new();

        if let Err(e) = parse_sip_uri(presentity_uri) {
            error!(error = %e, "bad presentity uri");
            warnings.push(ValidationWarning::BadPresentityUri(presentity_uri.to_string()));
        }

        if settings.expires.is_empty() {
            error!("empty expires parameter");
            warnings.push(ValidationWarning::EmptySetting("default_expire"));
        }
        let expires = parse_expires(settings.expires).map_err(|e| {
            error!(error = %e, "invalid expires parameter");
            e
        })?;
        debug!(expires, "expires");

        for (key, value) in [
            ("default_event", settings.event),
            ("default_content_type", settings.content_type),
            ("default_etag", settings.etag),
            ("outbound_proxy", settings.outbound_proxy),
        ] {
            if value.is_empty() {
                error!(key, "empty setting");
                warnings.push(ValidationWarning::EmptySetting(key));
            }
        }

        let event = self.events.resolve_event_flag(settings.event);
        if event < 0 {
            error!(event = %settings.event, "unknown event");
            warnings.push(ValidationWarning::UnknownEvent(settings.event.to_string()));
        }

        let content_type = normalize_content_type(settings.content_type);
        let etag = normalize_etag(settings.etag);
        let id = correlation_id(presentity_uri);

        let descriptor = PublicationDescriptor {
            presentity_uri: presentity_uri.to_string(),
            body,
            event,
            expires,
            content_type,
            etag,
            outbound_proxy: settings.outbound_proxy.to_string(),
            id,
            flag: UPDATE_TYPE,
            source_flag: SCRIPT_PUBLISH,
        };
        debug!(
            uri = %descriptor.presentity_uri,
            id = %descriptor.id,
            expires = descriptor.expires,
            "publ"
        );

        Ok(Assembly {
            descriptor,
            warnings,
        })
    }
}

/// Parse the numeric script parameter selecting the PIDF body
pub fn parse_event_code(raw: Option<&str>) -> Result<PresenceEvent> {
    let raw = raw.unwrap_or_default();
    let code = match raw.trim().parse::<i64>() {
        Ok(code) if code != 0 => code,
        _ => {
            error!(event = %raw, "Wrong event parameter");
            return Err(PuaScriptError::InvalidEventCode(raw.to_string()));
        }
    };

    PresenceEvent::try_from(code).map_err(|e| {
        error!(code, "Unknown event number");
        e
    })
}

/// Parse a signed expiry; a leading `-` negates the unsigned digits that follow
pub fn parse_expires(raw: &str) -> Result<i32> {
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PuaScriptError::InvalidExpires(raw.to_string()));
    }

    digits
        .parse::<i64>()
        .ok()
        .and_then(|value| i32::try_from(value * sign).ok())
        .ok_or_else(|| PuaScriptError::InvalidExpires(raw.to_string()))
}

/// A one-byte content type means "not set"
pub fn normalize_content_type(raw: &str) -> Option<String> {
    if raw.len() == 1 {
        None
    } else {
        Some(raw.to_string())
    }
}

/// The etag "." means "not set"
pub fn normalize_etag(raw: &str) -> Option<String> {
    if raw == "." {
        None
    } else {
        Some(raw.to_string())
    }
}

pub fn correlation_id(presentity_uri: &str) -> String {
    let mut id = String::with_capacity(ID_PREFIX.len() + presentity_uri.len());
    id.push_str(ID_PREFIX);
    id.push_str(presentity_uri);
    id
}
