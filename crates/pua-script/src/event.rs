//! Event package registry
//!
//! The PUA identifies event packages by bit flags. The script module names
//! its package in configuration and resolves the flag on every publication.

use std::collections::HashMap;

/// Flag returned for names the registry does not know
pub const UNKNOWN_EVENT: i32 = -1;

pub const PRESENCE_EVENT: i32 = 1 << 0;
pub const PWINFO_EVENT: i32 = 1 << 1;
pub const BLA_EVENT: i32 = 1 << 2;
pub const MSGSUM_EVENT: i32 = 1 << 3;
pub const CONFERENCE_EVENT: i32 = 1 << 4;
pub const DIALOG_EVENT: i32 = 1 << 5;
pub const REG_EVENT: i32 = 1 << 6;

/// Resolves an event package name to its PUA flag
pub trait EventRegistry: Send + Sync {
    /// Flag for `name`, or a negative value when the package is unknown
    fn resolve_event_flag(&self, name: &str) -> i32;
}

/// Registry preloaded with the packages the PUA publishes
#[derive(Debug, Clone)]
pub struct DefaultEventRegistry {
    events: HashMap<String, i32>,
}

impl DefaultEventRegistry {
    pub fn new() -> Self {
        let events = [
            ("presence", PRESENCE_EVENT),
            ("presence.winfo", PWINFO_EVENT),
            ("dialog;sla", BLA_EVENT),
            ("message-summary", MSGSUM_EVENT),
            ("conference", CONFERENCE_EVENT),
            ("dialog", DIALOG_EVENT),
            ("reg", REG_EVENT),
        ]
        .into_iter()
        .map(|(name, flag)| (name.to_string(), flag))
        .collect();

        Self { events }
    }

    /// Add or replace a package
    pub fn register(&mut self, name: impl Into<String>, flag: i32) {
        self.events.insert(name.into(), flag);
    }
}

impl Default for DefaultEventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistry for DefaultEventRegistry {
    fn resolve_event_flag(&self, name: &str) -> i32 {
        self.events.get(name).copied().unwrap_or(UNKNOWN_EVENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_packages() {
        let registry = DefaultEventRegistry::new();
        assert_eq!(registry.resolve_event_flag("presence"), PRESENCE_EVENT);
        assert_eq!(registry.resolve_event_flag("dialog;sla"), BLA_EVENT);
        assert_eq!(registry.resolve_event_flag("message-summary"), MSGSUM_EVENT);
    }

    #[test]
    fn test_unknown_package_is_negative() {
        let registry = DefaultEventRegistry::new();
        assert!(registry.resolve_event_flag("Presence").is_negative());
        assert_eq!(registry.resolve_event_flag(""), UNKNOWN_EVENT);
    }

    #[test]
    fn test_flags_are_distinct_bits() {
        let flags = [
            PRESENCE_EVENT,
            PWINFO_EVENT,
            BLA_EVENT,
            MSGSUM_EVENT,
            CONFERENCE_EVENT,
            DIALOG_EVENT,
            REG_EVENT,
        ];
        let combined = flags.iter().fold(0, |acc, f| acc | f);
        assert_eq!(combined.count_ones() as usize, flags.len());
    }

    #[test]
    fn test_register_custom_package() {
        let mut registry = DefaultEventRegistry::new();
        registry.register("xcap-diff", 1 << 7);
        assert_eq!(registry.resolve_event_flag("xcap-diff"), 1 << 7);
    }
}
