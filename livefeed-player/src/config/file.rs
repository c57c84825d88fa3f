//! TOML file configuration structures.
//!
//! These structs directly map to the `livefeed.toml` file format. Every
//! section is optional; a missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Default tracing filter, used when `RUST_LOG` is not set.
    #[serde(default)]
    pub log_filter: Option<String>,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// Where batches are read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// NDJSON file with one batch per line. Absent or `-` reads stdin.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Replace each event's timestamp with the time its line was read.
    /// Useful when replaying recorded sessions, whose messages would
    /// otherwise all be stale.
    #[serde(default)]
    pub restamp: bool,
}

impl InputConfig {
    /// The configured file, or `None` for stdin.
    pub fn file(&self) -> Option<&PathBuf> {
        self.path.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

/// Timings of the simulated gift animation. Reloadable with SIGHUP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// How long a triggered animation stays pending before it plays.
    #[serde(default = "default_pending_ms")]
    pub pending_ms: u64,
    /// How long the animation plays.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
}

fn default_pending_ms() -> u64 {
    150
}

fn default_animation_ms() -> u64 {
    3_000
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            pending_ms: default_pending_ms(),
            animation_ms: default_animation_ms(),
        }
    }
}

impl RendererConfig {
    pub fn pending(&self) -> Duration {
        Duration::from_millis(self.pending_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
log_filter = "debug,livefeed_core=trace"

[input]
path = "session.ndjson"
restamp = true

[renderer]
pending_ms = 200
animation_ms = 4500
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("debug,livefeed_core=trace"));
        assert_eq!(
            config.input.file(),
            Some(&PathBuf::from("session.ndjson"))
        );
        assert!(config.input.restamp);
        assert_eq!(config.renderer.pending(), Duration::from_millis(200));
        assert_eq!(config.renderer.animation(), Duration::from_millis(4500));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.log_filter.is_none());
        assert!(config.input.file().is_none());
        assert!(!config.input.restamp);
        assert_eq!(config.renderer, RendererConfig::default());
    }

    #[test]
    fn test_partial_renderer_section() {
        let config: FileConfig = toml::from_str("[renderer]\nanimation_ms = 1000\n").unwrap();
        assert_eq!(config.renderer.pending_ms, 150);
        assert_eq!(config.renderer.animation_ms, 1000);
    }

    #[test]
    fn test_dash_means_stdin() {
        let config: FileConfig = toml::from_str("[input]\npath = \"-\"\n").unwrap();
        assert!(config.input.file().is_none());
    }
}
