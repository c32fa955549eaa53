//! # PIDF bodies for script publications
//!
//! Three fixed presence documents (RFC 3863 with the RPID extension of
//! RFC 4480) can be published from a routing script:
//!
//! | code | [`PresenceEvent`] | basic | activities |
//! |------|-------------------|-------|------------|
//! | 1 | `OpenUnknown` | open | `r:unknown` |
//! | 2 | `Closed` | closed | none |
//! | 3 | `OpenBusy` | open | `r:on-the-phone`, `r:busy` |
//!
//! Documents are built by plain concatenation into an exactly sized
//! `String`. The entity URI is inserted verbatim and is not XML-escaped, so
//! a URI containing `'` yields a malformed document.

use std::fmt;

use crate::error::{PuaScriptError, Result};

const XML_DECL: &str = "<?xml version='1.0' encoding='UTF-8'?>";
const PRESENCE_PIDF: &str = "<presence xmlns='urn:ietf:params:xml:ns:pidf' entity='";
const PRESENCE_RPID: &str = "<presence xmlns='urn:ietf:params:xml:ns:pidf' \
xmlns:dm='urn:ietf:params:xml:ns:pidf:data-model' \
xmlns:r='urn:ietf:params:xml:ns:pidf:rpid' \
xmlns:c='urn:ietf:params:xml:ns:pidf:cipid' entity='";
const TUPLE_OPEN: &str = "'><tuple id='";
const STATUS_OPEN: &str = "'><status><basic>";
const STATUS_CLOSE: &str = "</basic></status></tuple>";
const PERSON_OPEN: &str = "<dm:person id='openseruser'><r:activities>";
const PERSON_CLOSE: &str = "</r:activities></dm:person>";
const PRESENCE_CLOSE: &str = "</presence>";

/// Basic status of a tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicStatus {
    Open,
    Closed,
}

impl BasicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicStatus::Open => "open",
            BasicStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for BasicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence state selected by the numeric script parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceEvent {
    /// Online, activity unknown
    OpenUnknown,
    /// Offline
    Closed,
    /// Online but on the phone
    OpenBusy,
}

impl PresenceEvent {
    /// Script code of this state
    pub fn code(&self) -> i64 {
        match self {
            PresenceEvent::OpenUnknown => 1,
            PresenceEvent::Closed => 2,
            PresenceEvent::OpenBusy => 3,
        }
    }

    pub fn basic(&self) -> BasicStatus {
        match self {
            PresenceEvent::OpenUnknown | PresenceEvent::OpenBusy => BasicStatus::Open,
            PresenceEvent::Closed => BasicStatus::Closed,
        }
    }

    /// RPID activity elements carried in the person block
    pub fn activities(&self) -> &'static [&'static str] {
        match self {
            PresenceEvent::OpenUnknown => &["<r:unknown/>"],
            PresenceEvent::Closed => &[],
            PresenceEvent::OpenBusy => &["<r:on-the-phone/>", "<r:busy/>"],
        }
    }

    fn presence_open(&self) -> &'static str {
        if self.activities().is_empty() {
            PRESENCE_PIDF
        } else {
            PRESENCE_RPID
        }
    }
}

impl TryFrom<i64> for PresenceEvent {
    type Error = PuaScriptError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            1 => Ok(PresenceEvent::OpenUnknown),
            2 => Ok(PresenceEvent::Closed),
            3 => Ok(PresenceEvent::OpenBusy),
            other => Err(PuaScriptError::EventOutOfRange(other)),
        }
    }
}

impl fmt::Display for PresenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceEvent::OpenUnknown => write!(f, "open/unknown"),
            PresenceEvent::Closed => write!(f, "closed"),
            PresenceEvent::OpenBusy => write!(f, "open/busy"),
        }
    }
}

/// Render the PIDF document for `event` about `entity`, tagging the tuple
/// with `tuple_id`.
pub fn render_pidf(event: PresenceEvent, entity: &str, tuple_id: &str) -> String {
    let activities = event.activities();
    let basic = event.basic().as_str();

    let mut len = XML_DECL.len()
        + event.presence_open().len()
        + entity.len()
        + TUPLE_OPEN.len()
        + tuple_id.len()
        + STATUS_OPEN.len()
        + basic.len()
        + STATUS_CLOSE.len()
        + PRESENCE_CLOSE.len();
    if !activities.is_empty() {
        len += PERSON_OPEN.len()
            + activities.iter().map(|a| a.len()).sum::<usize>()
            + PERSON_CLOSE.len();
    }

    let mut body = String::with_capacity(len);
    body.push_str(XML_DECL);
    body.push_str(event.presence_open());
    body.push_str(entity);
    body.push_str(TUPLE_OPEN);
    body.push_str(tuple_id);
    body.push_str(STATUS_OPEN);
    body.push_str(basic);
    body.push_str(STATUS_CLOSE);
    if !activities.is_empty() {
        body.push_str(PERSON_OPEN);
        for activity in activities {
            body.push_str(activity);
        }
        body.push_str(PERSON_CLOSE);
    }
    body.push_str(PRESENCE_CLOSE);

    debug_assert_eq!(body.len(), len);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "sip:alice@example.com";

    #[test]
    fn test_open_unknown_document() {
        let body = render_pidf(PresenceEvent::OpenUnknown, URI, "aB3dE5gH");
        assert_eq!(
            body,
            "<?xml version='1.0' encoding='UTF-8'?>\
<presence xmlns='urn:ietf:params:xml:ns:pidf' \
xmlns:dm='urn:ietf:params:xml:ns:pidf:data-model' \
xmlns:r='urn:ietf:params:xml:ns:pidf:rpid' \
xmlns:c='urn:ietf:params:xml:ns:pidf:cipid' entity='sip:alice@example.com'>\
<tuple id='aB3dE5gH'><status><basic>open</basic></status></tuple>\
<dm:person id='openseruser'><r:activities><r:unknown/></r:activities></dm:person>\
</presence>"
        );
    }

    #[test]
    fn test_closed_document_is_minimal() {
        let body = render_pidf(PresenceEvent::Closed, URI, "00000000");
        assert_eq!(
            body,
            "<?xml version='1.0' encoding='UTF-8'?>\
<presence xmlns='urn:ietf:params:xml:ns:pidf' entity='sip:alice@example.com'>\
<tuple id='00000000'><status><basic>closed</basic></status></tuple></presence>"
        );
        assert!(!body.contains("xmlns:dm"));
        assert!(!body.contains("activities"));
    }

    #[test]
    fn test_open_busy_activities() {
        let body = render_pidf(PresenceEvent::OpenBusy, URI, "zzzzzzzz");
        assert_eq!(body.matches("<status><basic>").count(), 1);
        assert!(body.contains("<basic>open</basic>"));
        assert!(body.contains("<r:activities><r:on-the-phone/><r:busy/></r:activities>"));
        assert!(!body.contains("<r:unknown/>"));
    }

    #[test]
    fn test_basic_status_per_code() {
        for (code, expected) in [(1, "open"), (2, "closed"), (3, "open")] {
            let event = PresenceEvent::try_from(code).unwrap();
            let body = render_pidf(event, URI, "abcdefgh");
            assert_eq!(body.matches("<status><basic>").count(), 1);
            assert!(body.contains(&format!("<basic>{}</basic>", expected)));
            assert_eq!(event.code(), code);
        }
    }

    #[test]
    fn test_entity_is_verbatim() {
        let body = render_pidf(PresenceEvent::Closed, "sip:bob@example.com;transport=tcp", "x1x1x1x1");
        assert!(body.contains("entity='sip:bob@example.com;transport=tcp'"));
    }

    #[test]
    fn test_codes_outside_range() {
        assert!(PresenceEvent::try_from(0).unwrap_err().is_range_error());
        assert!(PresenceEvent::try_from(4).is_err());
        assert!(PresenceEvent::try_from(-1).is_err());
        assert_eq!(PresenceEvent::try_from(3).unwrap(), PresenceEvent::OpenBusy);
    }
}
