//! Target environments and their filter properties.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter property naming the operating system.
pub const PROP_OS: &str = "osgi.os";
/// Filter property naming the windowing system.
pub const PROP_WS: &str = "osgi.ws";
/// Filter property naming the CPU architecture.
pub const PROP_ARCH: &str = "osgi.arch";
/// Filter property naming the locale.
pub const PROP_NL: &str = "osgi.nl";
const PROP_INSTALL_FEATURES: &str = "org.eclipse.update.install.features";

/// One resolution context: operating system, windowing system,
/// architecture, and optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetEnvironment {
    /// Operating system, e.g. `linux`.
    pub os: String,
    /// Windowing system, e.g. `gtk`.
    pub ws: String,
    /// Architecture, e.g. `x86_64`.
    pub arch: String,
    /// Locale, e.g. `en_US`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nl: Option<String>,
}

impl TargetEnvironment {
    /// Creates an environment without locale.
    #[must_use]
    pub fn new(os: &str, ws: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            ws: ws.to_string(),
            arch: arch.to_string(),
            nl: None,
        }
    }

    /// The environment of the running process.
    #[must_use]
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "macos" => "macosx",
            "windows" => "win32",
            other => other,
        };
        let ws = match os {
            "macosx" => "cocoa",
            "win32" => "win32",
            _ => "gtk",
        };
        let arch = match std::env::consts::ARCH {
            "powerpc" => "ppc",
            "powerpc64" => "ppc64",
            other => other,
        };
        Self::new(os, ws, arch)
    }

    /// Properties that unit and requirement filters are evaluated against.
    #[must_use]
    pub fn properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::from([
            (PROP_OS.to_string(), self.os.clone()),
            (PROP_WS.to_string(), self.ws.clone()),
            (PROP_ARCH.to_string(), self.arch.clone()),
            (PROP_INSTALL_FEATURES.to_string(), "true".to_string()),
        ]);
        if let Some(nl) = &self.nl {
            properties.insert(PROP_NL.to_string(), nl.clone());
        }
        properties
    }

    /// Publisher configuration string `ws.os.arch`.
    #[must_use]
    pub fn configuration(&self) -> String {
        format!("{}.{}.{}", self.ws, self.os, self.arch)
    }
}

impl fmt::Display for TargetEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.os, self.ws, self.arch)?;
        if let Some(nl) = &self.nl {
            write!(f, "/{nl}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_feed_filters() {
        let env = TargetEnvironment::new("linux", "gtk", "x86_64");
        let props = env.properties();
        assert_eq!(props[PROP_OS], "linux");
        assert_eq!(props[PROP_WS], "gtk");
        assert_eq!(props[PROP_ARCH], "x86_64");
        assert!(!props.contains_key(PROP_NL));
    }

    #[test]
    fn configuration_orders_ws_first() {
        let env = TargetEnvironment::new("win32", "win32", "x86");
        assert_eq!(env.configuration(), "win32.win32.x86");
        assert_eq!(env.to_string(), "win32/win32/x86");
    }

    #[test]
    fn host_uses_provisioning_names() {
        let host = TargetEnvironment::host();
        assert_ne!(host.os, "macos");
        assert_ne!(host.os, "windows");
        assert!(!host.ws.is_empty());
    }
}
