//! Configuration for pua-script
//!
//! Settings are read once when the publisher is built. The string settings
//! stay optional at load time; a missing value only fails the invocation that
//! needs it, in the fixed order checked by [`PuaScriptConfig::required`].

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{PuaScriptError, Result};

/// Prefix of the environment variables layered over file sources
pub const ENV_PREFIX: &str = "PUA_SCRIPT";

/// Module settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PuaScriptConfig {
    /// Gate: when false the PUA is never contacted
    #[serde(alias = "send_msg")]
    pub send_enabled: bool,
    /// Signed expiry in seconds, e.g. "3600" or "-1"
    pub default_expire: Option<String>,
    /// SIP event package name resolved through the event registry
    pub default_event: Option<String>,
    /// Content type of the body; a single character means "unset"
    #[serde(alias = "default_contenttype")]
    pub default_content_type: Option<String>,
    /// Entity tag for conditional publication; "." means "unset"
    pub default_etag: Option<String>,
    /// Proxy the PUBLISH is routed through
    pub outbound_proxy: Option<String>,
}

/// Borrowed view of the settings once all of them are known to be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredSettings<'a> {
    pub expires: &'a str,
    pub event: &'a str,
    pub content_type: &'a str,
    pub etag: &'a str,
    pub outbound_proxy: &'a str,
}

impl PuaScriptConfig {
    /// Load settings from a TOML file, overridden by `PUA_SCRIPT_*` variables
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Load settings from TOML text, overridden by `PUA_SCRIPT_*` variables
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Load settings from `PUA_SCRIPT_*` environment variables only
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Enable or disable sending
    pub fn with_send_enabled(mut self, enabled: bool) -> Self {
        self.send_enabled = enabled;
        self
    }

    /// Check the required settings in order: expiry, event name,
    /// content type, etag, outbound proxy. The first missing one is reported.
    pub fn required(&self) -> Result<RequiredSettings<'_>> {
        let expires = self
            .default_expire
            .as_deref()
            .ok_or(PuaScriptError::MissingSetting("default_expire"))?;
        let event = self
            .default_event
            .as_deref()
            .ok_or(PuaScriptError::MissingSetting("default_event"))?;
        let content_type = self
            .default_content_type
            .as_deref()
            .ok_or(PuaScriptError::MissingSetting("default_content_type"))?;
        let etag = self
            .default_etag
            .as_deref()
            .ok_or(PuaScriptError::MissingSetting("default_etag"))?;
        let outbound_proxy = self
            .outbound_proxy
            .as_deref()
            .ok_or(PuaScriptError::MissingSetting("outbound_proxy"))?;

        Ok(RequiredSettings {
            expires,
            event,
            content_type,
            etag,
            outbound_proxy,
        })
    }
}
